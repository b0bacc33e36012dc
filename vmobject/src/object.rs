use std::{fmt, sync::Arc};

use downcast_rs::{Downcast, impl_downcast};

use crate::class::ClassHandle;

/// Types with a statically known [`Class`](crate::Class).
pub trait StaticClass: 'static {
    /// Handle of the class describing `Self`.
    fn static_class() -> ClassHandle;
}

/// Instances of the host object model that may declare properties.
///
/// Inheritance is expressed by composition: a derived view model embeds its
/// base and returns it from [`ViewModel::base`] / [`ViewModel::base_mut`],
/// while its class names the base class as parent. Up-casts through
/// [`cast`](dyn ViewModel::cast) follow that chain.
pub trait ViewModel: Downcast {
    /// Runtime class of this instance.
    fn class(&self) -> ClassHandle;

    /// Embedded base view model, if any.
    fn base(&self) -> Option<&dyn ViewModel> {
        None
    }

    /// Mutable access to the embedded base view model, if any.
    fn base_mut(&mut self) -> Option<&mut dyn ViewModel> {
        None
    }
}
impl_downcast!(ViewModel);

impl dyn ViewModel {
    /// View this instance as an `O`, walking the embedded base chain.
    ///
    /// Returns `None` if neither this instance nor any of its bases is an `O`.
    pub fn cast<O: ViewModel>(&self) -> Option<&O> {
        if let Some(owner) = self.downcast_ref::<O>() {
            return Some(owner);
        }
        self.base()?.cast::<O>()
    }

    /// Mutable counterpart of [`cast`](dyn ViewModel::cast).
    pub fn cast_mut<O: ViewModel>(&mut self) -> Option<&mut O> {
        if self.is::<O>() {
            return self.downcast_mut::<O>();
        }
        self.base_mut()?.cast_mut::<O>()
    }

    /// Returns `true` if the runtime class of this instance is `class` or
    /// derives from it.
    pub fn is_a(&self, class: ClassHandle) -> bool {
        self.class().is_child_of(class)
    }
}

/// Nullable shared reference to a view model, the value type of object
/// reference fields.
pub struct ObjectPtr<T: ViewModel>(Option<Arc<T>>);

impl<T: ViewModel> ObjectPtr<T> {
    pub fn new(object: Arc<T>) -> Self {
        Self(Some(object))
    }

    pub const fn null() -> Self {
        Self(None)
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_deref()
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl<T: ViewModel> Default for ObjectPtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ViewModel> Clone for ObjectPtr<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ViewModel> PartialEq for ObjectPtr<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: ViewModel> Eq for ObjectPtr<T> {}

impl<T: ViewModel> From<Arc<T>> for ObjectPtr<T> {
    fn from(object: Arc<T>) -> Self {
        Self::new(object)
    }
}

impl<T: ViewModel> fmt::Debug for ObjectPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(object) => write!(f, "ObjectPtr({} @ {:p})", object.class(), Arc::as_ptr(object)),
            None => write!(f, "ObjectPtr(null)"),
        }
    }
}

/// Declare the static class of a type.
///
/// ```rust
/// # use vmobject::{StaticClass, declare_class};
/// struct Widget;
/// struct Button;
///
/// declare_class!(Widget as "Widget");
/// declare_class!(Button as "Button", extends Widget);
///
/// assert_eq!(Button::static_class().parent(), Some(Widget::static_class()));
/// ```
#[macro_export]
macro_rules! declare_class {
    ($ty:ty as $name:literal) => {
        impl $crate::StaticClass for $ty {
            fn static_class() -> $crate::ClassHandle {
                static CLASS: $crate::Class = $crate::Class::new($name, ::core::option::Option::None);
                $crate::ClassHandle::new(&CLASS)
            }
        }
    };
    ($ty:ty as $name:literal, extends $parent:ty) => {
        impl $crate::StaticClass for $ty {
            fn static_class() -> $crate::ClassHandle {
                static CLASS: $crate::Class = $crate::Class::new(
                    $name,
                    ::core::option::Option::Some(<$parent as $crate::StaticClass>::static_class),
                );
                $crate::ClassHandle::new(&CLASS)
            }
        }
    };
}

/// Declare the static class of a view model and implement [`ViewModel`].
///
/// The derived form names the embedded field holding the base view model.
///
/// ```rust
/// # use vmobject::{StaticClass, ViewModel, view_model_class};
/// struct Entity {
///     id: u64,
/// }
///
/// struct Monster {
///     entity: Entity,
///     damage: u32,
/// }
///
/// view_model_class!(Entity as "Entity");
/// view_model_class!(Monster as "Monster", extends Entity => entity);
///
/// let monster = Monster { entity: Entity { id: 3 }, damage: 10 };
/// let erased: &dyn ViewModel = &monster;
/// assert_eq!(erased.cast::<Entity>().map(|entity| entity.id), Some(3));
/// assert!(erased.is_a(Entity::static_class()));
/// ```
#[macro_export]
macro_rules! view_model_class {
    ($ty:ty as $name:literal) => {
        $crate::declare_class!($ty as $name);

        impl $crate::ViewModel for $ty {
            fn class(&self) -> $crate::ClassHandle {
                <$ty as $crate::StaticClass>::static_class()
            }
        }
    };
    ($ty:ty as $name:literal, extends $parent:ty => $base:ident) => {
        $crate::declare_class!($ty as $name, extends $parent);

        impl $crate::ViewModel for $ty {
            fn class(&self) -> $crate::ClassHandle {
                <$ty as $crate::StaticClass>::static_class()
            }

            fn base(&self) -> ::core::option::Option<&dyn $crate::ViewModel> {
                ::core::option::Option::Some(&self.$base)
            }

            fn base_mut(&mut self) -> ::core::option::Option<&mut dyn $crate::ViewModel> {
                ::core::option::Option::Some(&mut self.$base)
            }
        }
    };
}
