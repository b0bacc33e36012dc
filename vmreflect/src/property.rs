//! Typed property declarations.
use std::marker::PhantomData;

use bitflags::bitflags;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use vmobject::{StaticClass, ViewModel};

use crate::{
    member::{ClassOf, GetterMember, SetterMember, SetterOf, ValueOf},
    utils::error::{ReflectError, ReflectResult},
    value::PropertyValue,
};

bitflags! {
    /// Capabilities of a property, fixed at declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct PropertyFlags: u8 {
        /// Dynamic consumers may write the property.
        const HAS_PUBLIC_SETTER = 1 << 0;
        /// The value type is an optional wrapper.
        const IS_OPTIONAL = 1 << 1;
        /// The property is listed for name-based consumers.
        const AVAILABLE_FOR_DYNAMIC_LOOKUP = 1 << 2;
    }
}

impl PropertyFlags {
    pub fn has_public_setter(self) -> bool {
        self.contains(Self::HAS_PUBLIC_SETTER)
    }

    pub fn is_optional(self) -> bool {
        self.contains(Self::IS_OPTIONAL)
    }

    pub fn is_available_for_dynamic_lookup(self) -> bool {
        self.contains(Self::AVAILABLE_FOR_DYNAMIC_LOOKUP)
    }
}

/// Byte offset of a field of type `V` inside an `O`.
///
/// Only obtainable through [`property_field!`](crate::property_field), which
/// checks the field type at compile time, or through the unsafe
/// [`FieldOffset::from_raw`].
///
/// ```rust
/// # use vmreflect::property_field;
/// struct Gauge {
///     label: String,
///     level: u8,
/// }
///
/// let level = property_field!(Gauge, level);
/// let _: vmreflect::FieldOffset<Gauge, u8> = level;
/// assert_eq!(level.offset(), core::mem::offset_of!(Gauge, level));
/// ```
///
/// A field whose type differs from the declared value type is rejected:
///
/// ```rust,compile_fail
/// # use vmreflect::{FieldOffset, property_field};
/// struct Gauge {
///     label: String,
/// }
///
/// let _: FieldOffset<Gauge, i32> = property_field!(Gauge, label);
/// ```
pub struct FieldOffset<O, V> {
    offset: usize,
    marker: PhantomData<fn(&O) -> &V>,
}

impl<O, V> FieldOffset<O, V> {
    #[doc(hidden)]
    pub const fn checked(offset: usize, _field: fn(&O) -> PhantomData<V>) -> Self {
        Self {
            offset,
            marker: PhantomData,
        }
    }

    /// Wrap an offset computed elsewhere.
    ///
    /// # Safety
    ///
    /// `offset` must be the offset of a field of type `V` inside `O`.
    pub const unsafe fn from_raw(offset: usize) -> Self {
        Self {
            offset,
            marker: PhantomData,
        }
    }

    pub const fn offset(self) -> usize {
        self.offset
    }
}

impl<O, V> Clone for FieldOffset<O, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, V> Copy for FieldOffset<O, V> {}

#[doc(hidden)]
pub fn field_type<T>(_field: &T) -> PhantomData<T> {
    PhantomData
}

/// Offset of `$field` in `$owner`, typed by the field's exact type.
#[macro_export]
macro_rules! property_field {
    ($owner:ty, $field:ident) => {
        $crate::FieldOffset::<$owner, _>::checked(
            ::core::mem::offset_of!($owner, $field),
            |owner: &$owner| $crate::property::field_type(&owner.$field),
        )
    };
}

/// A property declared on the view model `ClassOf<G>`, read through the
/// getter pointer `G`.
///
/// The getter pointer type has to be spelled out (`ViewModelProperty::<fn(&O)
/// -> V>::new`) so that accessor functions coerce to pointers.
///
/// Declarations are `static`s, normally produced by
/// [`view_model_properties!`](crate::view_model_properties), which also
/// registers them. The static is the single erased operations object of the
/// property, see [`PropertyOperations`](crate::PropertyOperations).
///
/// ```rust
/// # use vmreflect::ViewModelProperty;
/// # use vmreflect::vmobject::view_model_class;
/// struct Lamp {
///     on: bool,
/// }
///
/// impl Lamp {
///     fn on(&self) -> bool {
///         self.on
///     }
///
///     fn set_on(&mut self, on: bool) {
///         self.on = on;
///     }
/// }
///
/// view_model_class!(Lamp as "Lamp");
///
/// static ON: ViewModelProperty<fn(&Lamp) -> bool> =
///     ViewModelProperty::<fn(&Lamp) -> bool>::new("On", Lamp::on).with_setter(Lamp::set_on);
///
/// let mut lamp = Lamp { on: false };
/// ON.set_value(&mut lamp, true).unwrap();
/// assert!(ON.get_value(&lamp));
/// assert!(ON.flags().has_public_setter());
/// ```
pub struct ViewModelProperty<G: GetterMember> {
    pub(crate) name: &'static str,
    pub(crate) getter: G,
    pub(crate) setter: Option<SetterOf<G>>,
    pub(crate) field_offset: Option<usize>,
    pub(crate) flags: PropertyFlags,
}

impl<G> ViewModelProperty<G>
where
    G: GetterMember,
    ClassOf<G>: ViewModel + StaticClass,
    ValueOf<G>: PropertyValue,
{
    /// Declare a read-only, computed property.
    pub const fn new(name: &'static str, getter: G) -> Self {
        let mut flags = PropertyFlags::AVAILABLE_FOR_DYNAMIC_LOOKUP;
        if <ValueOf<G> as PropertyValue>::IS_OPTIONAL {
            flags = flags.union(PropertyFlags::IS_OPTIONAL);
        }

        Self {
            name,
            getter,
            setter: None,
            field_offset: None,
            flags,
        }
    }

    /// Add a setter that dynamic consumers may call.
    pub const fn with_setter(self, setter: SetterOf<G>) -> Self {
        Self {
            setter: Some(setter),
            flags: self.flags.union(PropertyFlags::HAS_PUBLIC_SETTER),
            ..self
        }
    }

    /// Add a setter reserved to typed code.
    pub const fn with_private_setter(self, setter: SetterOf<G>) -> Self {
        Self {
            setter: Some(setter),
            flags: self.flags.difference(PropertyFlags::HAS_PUBLIC_SETTER),
            ..self
        }
    }

    /// Back the property with the field stored at `field` in the owner.
    pub const fn with_field(self, field: FieldOffset<ClassOf<G>, ValueOf<G>>) -> Self {
        Self {
            field_offset: Some(field.offset()),
            ..self
        }
    }

    /// Keep the property out of name-based enumeration.
    pub const fn hidden(self) -> Self {
        Self {
            flags: self
                .flags
                .difference(PropertyFlags::AVAILABLE_FOR_DYNAMIC_LOOKUP),
            ..self
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn flags(&self) -> PropertyFlags {
        self.flags
    }

    /// Byte offset of the backing field, `None` for computed properties.
    pub fn field_offset(&self) -> Option<usize> {
        self.field_offset
    }

    /// Read the value through the typed getter.
    #[inline]
    pub fn get_value(&self, owner: &ClassOf<G>) -> ValueOf<G> {
        self.getter.invoke(owner)
    }

    /// Write the value through the typed setter, public or not.
    pub fn set_value(&self, owner: &mut ClassOf<G>, value: ValueOf<G>) -> ReflectResult<()> {
        let setter = self.setter.ok_or_else(|| ReflectError::ReadOnlyProperty {
            owner: <ClassOf<G> as StaticClass>::static_class().name().to_string(),
            property: self.name.to_string(),
        })?;
        SetterMember::invoke(setter, owner, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vmobject::view_model_class;

    use super::*;

    struct Sensor {
        reading: Option<f32>,
        label: String,
    }

    impl Sensor {
        fn reading(&self) -> Option<f32> {
            self.reading
        }

        fn set_reading(&mut self, reading: Option<f32>) {
            self.reading = reading;
        }

        fn label(&self) -> String {
            self.label.clone()
        }
    }

    view_model_class!(Sensor as "Sensor");

    static READING: ViewModelProperty<fn(&Sensor) -> Option<f32>> =
        ViewModelProperty::<fn(&Sensor) -> Option<f32>>::new("Reading", Sensor::reading)
            .with_private_setter(Sensor::set_reading)
            .with_field(crate::property_field!(Sensor, reading));

    static LABEL: ViewModelProperty<fn(&Sensor) -> String> =
        ViewModelProperty::<fn(&Sensor) -> String>::new("Label", Sensor::label).hidden();

    #[test]
    fn flags_follow_declaration() {
        assert_eq!(
            READING.flags(),
            PropertyFlags::IS_OPTIONAL | PropertyFlags::AVAILABLE_FOR_DYNAMIC_LOOKUP
        );
        assert_eq!(LABEL.flags(), PropertyFlags::empty());
        assert_eq!(READING.field_offset(), Some(core::mem::offset_of!(Sensor, reading)));
        assert_eq!(LABEL.field_offset(), None);
    }

    #[test]
    fn checked_field_offset_matches_layout() {
        let reading: FieldOffset<Sensor, Option<f32>> = crate::property_field!(Sensor, reading);
        assert_eq!(reading.offset(), core::mem::offset_of!(Sensor, reading));

        let label = crate::property_field!(Sensor, label);
        let label_copy = label;
        assert_eq!(label.offset(), label_copy.offset());
        assert_eq!(label.offset(), core::mem::offset_of!(Sensor, label));
    }

    #[test]
    fn typed_access_uses_private_setter() {
        let mut sensor = Sensor {
            reading: None,
            label: "north".to_string(),
        };

        READING.set_value(&mut sensor, Some(1.5)).unwrap();
        assert_eq!(READING.get_value(&sensor), Some(1.5));
        assert_eq!(LABEL.get_value(&sensor), "north");

        let err = LABEL.set_value(&mut sensor, "south".to_string()).unwrap_err();
        assert!(err.is_read_only_property());
    }
}
