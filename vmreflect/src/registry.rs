//! Process-wide property registry.
//!
//! Declarations submit [`PropertyRegistration`]s and [`ViewModelBinding`]s to
//! link-time collections. The first query builds a [`ViewModelRegistry`] out
//! of them; it is immutable and shared afterwards.
use std::{any::Any, collections::BTreeMap, fmt};

use log::{debug, error};
use once_cell::sync::Lazy;
use vmobject::{ClassHandle, ViewModel};

use crate::{
    ops::PropertyOperations,
    property::PropertyFlags,
    utils::error::{ReflectError, ReflectResult},
};

/// A group of properties submitted by one declaration block.
///
/// Properties keep the order in which they are listed; groups are ordered by
/// module path and source line.
pub struct PropertyRegistration {
    pub properties: &'static [&'static dyn PropertyOperations],
    pub module_path: &'static str,
    pub line: u32,
}
inventory::collect!(PropertyRegistration);

impl PropertyRegistration {
    pub const fn new(
        properties: &'static [&'static dyn PropertyOperations],
        module_path: &'static str,
        line: u32,
    ) -> Self {
        Self {
            properties,
            module_path,
            line,
        }
    }
}

/// Binding of a view class to the view-model class it displays.
pub struct ViewModelBinding {
    pub view: fn() -> ClassHandle,
    pub view_model: fn() -> ClassHandle,
}
inventory::collect!(ViewModelBinding);

impl ViewModelBinding {
    pub const fn new(view: fn() -> ClassHandle, view_model: fn() -> ClassHandle) -> Self {
        Self { view, view_model }
    }
}

/// Descriptor of a registered property.
///
/// Descriptors are cheap handles: the operations object they point to is the
/// property's declaration static, so every copy designates the same instance.
#[derive(Clone, Copy)]
pub struct PropertyReflection {
    operations: &'static dyn PropertyOperations,
    owner: ClassHandle,
    flags: PropertyFlags,
}

impl PropertyReflection {
    pub fn new(operations: &'static dyn PropertyOperations) -> Self {
        Self {
            operations,
            owner: operations.owner_class(),
            flags: operations.flags(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.operations.name()
    }

    /// Class declaring the property.
    pub fn owner(&self) -> ClassHandle {
        self.owner
    }

    pub fn field_offset(&self) -> Option<usize> {
        self.operations.field_offset()
    }

    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    pub fn operations(&self) -> &'static dyn PropertyOperations {
        self.operations
    }

    /// See [`PropertyOperations::get_decayed_value`].
    #[inline]
    pub fn get_decayed_value(&self, owner: &dyn ViewModel, out: &mut dyn Any) -> bool {
        self.operations.get_decayed_value(owner, out)
    }

    /// See [`PropertyOperations::set_decayed_value`].
    pub fn set_decayed_value(
        &self,
        owner: &mut dyn ViewModel,
        value: &dyn Any,
        has_value: bool,
    ) -> ReflectResult<()> {
        self.operations.set_decayed_value(owner, value, has_value)
    }

    /// See [`PropertyOperations::add_class_property`].
    pub fn add_class_property(&self, target: ClassHandle) {
        self.operations.add_class_property(target)
    }
}

impl fmt::Debug for PropertyReflection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyReflection")
            .field("owner", &self.owner.name())
            .field("name", &self.name())
            .field("value_type", &self.operations.value_type_name())
            .field("field_offset", &self.field_offset())
            .field("flags", &self.flags)
            .finish()
    }
}

/// Properties grouped by the class declaring them, plus the view binding
/// side table.
#[derive(Debug, Default)]
pub struct ViewModelRegistry {
    properties: BTreeMap<ClassHandle, Vec<PropertyReflection>>,
    view_models: BTreeMap<ClassHandle, ClassHandle>,
}

impl ViewModelRegistry {
    /// Build a registry from explicit registrations.
    ///
    /// Fails if two properties share a name on the same owner class or if a
    /// view class is bound to two different view-model classes.
    pub fn build<'a>(
        registrations: impl IntoIterator<Item = &'a PropertyRegistration>,
        bindings: impl IntoIterator<Item = &'a ViewModelBinding>,
    ) -> ReflectResult<Self> {
        let mut registrations: Vec<_> = registrations.into_iter().collect();
        registrations.sort_by_key(|registration| (registration.module_path, registration.line));

        let mut properties: BTreeMap<ClassHandle, Vec<PropertyReflection>> = BTreeMap::new();
        for operations in registrations
            .iter()
            .flat_map(|registration| registration.properties.iter().copied())
        {
            let property = PropertyReflection::new(operations);
            let declared = properties.entry(property.owner()).or_default();
            if declared.iter().any(|other| other.name() == property.name()) {
                return Err(ReflectError::DuplicateProperty {
                    owner: property.owner().name().to_string(),
                    property: property.name().to_string(),
                });
            }
            declared.push(property);
        }

        let mut view_models = BTreeMap::new();
        for binding in bindings {
            let view = (binding.view)();
            let view_model = (binding.view_model)();
            match view_models.insert(view, view_model) {
                Some(first) if first != view_model => {
                    return Err(ReflectError::ConflictingViewModelBinding {
                        view: view.name().to_string(),
                        first: first.name().to_string(),
                        second: view_model.name().to_string(),
                    });
                }
                _ => {}
            }
        }

        for (owner, declared) in &properties {
            debug!(
                "Registered {} view-model propert{} on class `{}`",
                declared.len(),
                if declared.len() == 1 { "y" } else { "ies" },
                owner
            );
        }
        debug!("Registered {} view binding(s)", view_models.len());

        Ok(Self {
            properties,
            view_models,
        })
    }

    /// Build a registry from every registration linked into the program.
    pub fn from_inventory() -> ReflectResult<Self> {
        Self::build(
            inventory::iter::<PropertyRegistration>,
            inventory::iter::<ViewModelBinding>,
        )
    }

    /// Find the property `name` visible on `owner`.
    ///
    /// The owner class is searched first, then its ancestors; the most
    /// derived declaration wins.
    pub fn find_property(&self, owner: ClassHandle, name: &str) -> Option<&PropertyReflection> {
        owner.ancestors().find_map(|class| {
            self.declared_properties(class)
                .iter()
                .find(|property| property.name() == name)
        })
    }

    /// Properties declared directly on `owner`, in declaration order.
    pub fn declared_properties(&self, owner: ClassHandle) -> &[PropertyReflection] {
        self.properties
            .get(&owner)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every registered property, grouped by declaring class.
    pub fn all_properties(&self) -> &BTreeMap<ClassHandle, Vec<PropertyReflection>> {
        &self.properties
    }

    /// View-model class bound to `view` or to its closest bound ancestor.
    pub fn view_model_class(&self, view: ClassHandle) -> Option<ClassHandle> {
        view.ancestors()
            .find_map(|class| self.view_models.get(&class).copied())
    }

    /// Number of registered properties, across all classes.
    pub fn len(&self) -> usize {
        self.properties.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

static REGISTRY: Lazy<ViewModelRegistry> =
    Lazy::new(|| expect_consistent(ViewModelRegistry::from_inventory()));

fn expect_consistent(registry: ReflectResult<ViewModelRegistry>) -> ViewModelRegistry {
    match registry {
        Ok(registry) => registry,
        Err(err) => {
            error!("Invalid view-model property declarations: {err}");
            panic!("Invalid view-model property declarations: {err}");
        }
    }
}

/// The registry of every property declared in the program.
///
/// Built on first access.
///
/// # Panics
///
/// Panics on first access if the declarations are inconsistent, see
/// [`ViewModelRegistry::build`].
pub fn registry() -> &'static ViewModelRegistry {
    &REGISTRY
}

/// Find a property by owner class and name on the global registry.
pub fn find_property(owner: ClassHandle, name: &str) -> Option<&'static PropertyReflection> {
    registry().find_property(owner, name)
}

/// Every property of the global registry, grouped by declaring class.
pub fn all_properties() -> &'static BTreeMap<ClassHandle, Vec<PropertyReflection>> {
    registry().all_properties()
}

/// View-model class bound to `view` in the global registry.
pub fn view_model_class(view: ClassHandle) -> Option<ClassHandle> {
    registry().view_model_class(view)
}

/// Declare and register the properties of one or more view models.
///
/// Each entry defines a typed [`ViewModelProperty`](crate::ViewModelProperty)
/// static named by the entry and registers it under the owner class. Options:
///
/// - `get: path` reads the value through an accessor `fn(&Owner) -> Value`;
/// - `field: ident` backs the property by the named field (and reads it by
///   cloning when `get` is omitted);
/// - `set: path` adds a setter usable by dynamic consumers;
/// - `private_set: path` adds a setter only usable from typed code;
/// - `dynamic: false` hides the property from name-based enumeration.
///
/// `get` or `field` must come first.
///
/// ```rust
/// use vmreflect::{find_property, view_model_properties};
/// use vmreflect::vmobject::{StaticClass, view_model_class};
///
/// pub struct Door {
///     open: bool,
///     code: Option<u16>,
/// }
///
/// impl Door {
///     fn set_open(&mut self, open: bool) {
///         self.open = open;
///     }
///
///     fn code(&self) -> Option<u16> {
///         self.code
///     }
/// }
///
/// view_model_class!(Door as "Door");
///
/// view_model_properties! {
///     Door {
///         pub static OPEN: bool = "Open" { field: open, set: Door::set_open };
///         static CODE: Option<u16> = "Code" { get: Door::code };
///     }
/// }
///
/// let open = find_property(Door::static_class(), "Open").unwrap();
/// assert!(open.flags().has_public_setter());
///
/// let mut door = Door { open: false, code: None };
/// open.set_decayed_value(&mut door, &true, true).unwrap();
/// assert!(OPEN.get_value(&door));
///
/// let code = find_property(Door::static_class(), "Code").unwrap();
/// let mut out = 0u16;
/// assert!(!code.get_decayed_value(&door, &mut out));
/// ```
///
/// The backing field must have exactly the declared value type, even when
/// the value is read through `get`:
///
/// ```rust,compile_fail
/// use vmreflect::view_model_properties;
/// use vmreflect::vmobject::view_model_class;
///
/// pub struct Mismatch {
///     label: String,
/// }
///
/// impl Mismatch {
///     fn count(&self) -> i32 {
///         self.label.len() as i32
///     }
/// }
///
/// view_model_class!(Mismatch as "Mismatch");
///
/// view_model_properties! {
///     Mismatch {
///         static COUNT: i32 = "Count" { get: Mismatch::count, field: label };
///     }
/// }
/// ```
///
/// Value types without a native field kind are rejected as well:
///
/// ```rust,compile_fail
/// use vmreflect::view_model_properties;
/// use vmreflect::vmobject::view_model_class;
///
/// pub struct Timer {
///     elapsed: std::time::Duration,
/// }
///
/// view_model_class!(Timer as "Timer");
///
/// view_model_properties! {
///     Timer {
///         static ELAPSED: std::time::Duration = "Elapsed" { field: elapsed };
///     }
/// }
/// ```
#[macro_export]
macro_rules! view_model_properties {
    (@build $owner:ty, $value:ty, $name:literal; get: $getter:expr $(, $($rest:tt)*)?) => {
        $crate::view_model_properties!(
            @chain $crate::ViewModelProperty::<fn(&$owner) -> $value>::new($name, $getter), $owner;
            $($($rest)*)?
        )
    };
    (@build $owner:ty, $value:ty, $name:literal; field: $field:ident $(, $($rest:tt)*)?) => {
        $crate::view_model_properties!(
            @chain $crate::ViewModelProperty::<fn(&$owner) -> $value>::new(
                $name,
                |owner: &$owner| -> $value { ::core::clone::Clone::clone(&owner.$field) },
            )
            .with_field($crate::property_field!($owner, $field)), $owner;
            $($($rest)*)?
        )
    };
    (@chain $acc:expr, $owner:ty;) => {
        $acc
    };
    (@chain $acc:expr, $owner:ty; set: $setter:expr $(, $($rest:tt)*)?) => {
        $crate::view_model_properties!(@chain $acc.with_setter($setter), $owner; $($($rest)*)?)
    };
    (@chain $acc:expr, $owner:ty; private_set: $setter:expr $(, $($rest:tt)*)?) => {
        $crate::view_model_properties!(@chain $acc.with_private_setter($setter), $owner; $($($rest)*)?)
    };
    (@chain $acc:expr, $owner:ty; field: $field:ident $(, $($rest:tt)*)?) => {
        $crate::view_model_properties!(
            @chain $acc.with_field($crate::property_field!($owner, $field)), $owner;
            $($($rest)*)?
        )
    };
    (@chain $acc:expr, $owner:ty; dynamic: false $(, $($rest:tt)*)?) => {
        $crate::view_model_properties!(@chain $acc.hidden(), $owner; $($($rest)*)?)
    };
    (@chain $acc:expr, $owner:ty; dynamic: true $(, $($rest:tt)*)?) => {
        $crate::view_model_properties!(@chain $acc, $owner; $($($rest)*)?)
    };
    (
        $(
            $owner:ty {
                $(
                    $(#[$attr:meta])*
                    $vis:vis static $ident:ident : $value:ty = $name:literal { $($options:tt)* };
                )*
            }
        )*
    ) => {
        $(
            $(
                $(#[$attr])*
                $vis static $ident: $crate::ViewModelProperty<fn(&$owner) -> $value> =
                    $crate::view_model_properties!(@build $owner, $value, $name; $($options)*);
            )*

            $crate::inventory::submit! {
                $crate::registry::PropertyRegistration::new(
                    &[$(&$ident),*],
                    ::core::module_path!(),
                    ::core::line!(),
                )
            }
        )*
    };
}

/// Bind a view class to the view-model class it displays.
///
/// Subclasses of the view resolve to the same view model.
///
/// ```rust
/// use vmreflect::bind_view_model;
/// use vmreflect::vmobject::{StaticClass, declare_class, view_model_class};
///
/// struct Inventory;
/// struct InventoryPanel;
///
/// view_model_class!(Inventory as "Inventory");
/// declare_class!(InventoryPanel as "InventoryPanel");
/// bind_view_model!(InventoryPanel => Inventory);
///
/// assert_eq!(
///     vmreflect::view_model_class(InventoryPanel::static_class()),
///     Some(Inventory::static_class())
/// );
/// ```
#[macro_export]
macro_rules! bind_view_model {
    ($view:ty => $view_model:ty) => {
        $crate::inventory::submit! {
            $crate::registry::ViewModelBinding::new(
                <$view as $crate::vmobject::StaticClass>::static_class,
                <$view_model as $crate::vmobject::StaticClass>::static_class,
            )
        }
    };
}
