//! Erased property operations.
//!
//! Every declared property is a distinct `ViewModelProperty<G>` type. The
//! registry stores them behind the single object-safe [`PropertyOperations`]
//! interface, so a name-based consumer can read, write and natively register
//! any property with one indirect call and without knowing its value type.
use std::any::{Any, type_name};

use log::{trace, warn};
use vmobject::{ClassHandle, FieldKind, StaticClass, ViewModel};

use crate::{
    factory::PropertyFactory,
    member::{ClassOf, GetterMember, ValueOf},
    property::{PropertyFlags, ViewModelProperty},
    utils::error::{ReflectError, ReflectResult},
    value::PropertyValue,
};

/// Type-erased view of a declared property.
pub trait PropertyOperations: Send + Sync + 'static {
    /// Name of the property, unique on its owner class.
    fn name(&self) -> &'static str;

    /// Class declaring the property.
    fn owner_class(&self) -> ClassHandle;

    /// Byte offset of the backing field, `None` for computed properties.
    fn field_offset(&self) -> Option<usize>;

    fn flags(&self) -> PropertyFlags;

    /// Name of the declared value type, e.g. `core::option::Option<i32>`.
    fn value_type_name(&self) -> &'static str;

    /// Native field kind of the decayed value type.
    fn field_kind(&self) -> FieldKind;

    /// Read the decayed value of the property on `owner` into `out`.
    ///
    /// `owner` must be an instance of the owner class (or embed one through
    /// its base chain) and `out` must hold the decayed value type. Returns
    /// whether a value is present; `out` is written only in that case. Plain
    /// properties always hold a value.
    ///
    /// Violating the instance or slot contract trips a debug assertion; in
    /// release builds nothing is written and `false` is returned.
    fn get_decayed_value(&self, owner: &dyn ViewModel, out: &mut dyn Any) -> bool;

    /// Write the property on `owner` from an untyped slot holding the decayed
    /// value type.
    ///
    /// `has_value = false` clears an optional property; `value` is ignored in
    /// that case. Only properties with a public setter accept writes.
    fn set_decayed_value(
        &self,
        owner: &mut dyn ViewModel,
        value: &dyn Any,
        has_value: bool,
    ) -> ReflectResult<()>;

    /// Attach the backing field of the property to `target` as a native
    /// field. Computed properties attach nothing.
    fn add_class_property(&self, target: ClassHandle);
}

impl<G> PropertyOperations for ViewModelProperty<G>
where
    G: GetterMember,
    ClassOf<G>: ViewModel + StaticClass,
    ValueOf<G>: PropertyValue,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn owner_class(&self) -> ClassHandle {
        <ClassOf<G> as StaticClass>::static_class()
    }

    fn field_offset(&self) -> Option<usize> {
        self.field_offset
    }

    fn flags(&self) -> PropertyFlags {
        self.flags
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<ValueOf<G>>()
    }

    fn field_kind(&self) -> FieldKind {
        <<ValueOf<G> as PropertyValue>::Decayed as PropertyFactory>::field_kind()
    }

    fn get_decayed_value(&self, owner: &dyn ViewModel, out: &mut dyn Any) -> bool {
        let instance = owner.cast::<ClassOf<G>>();
        debug_assert!(
            instance.is_some(),
            "property {}.{} read on an instance of `{}`",
            self.owner_class(),
            self.name,
            owner.class()
        );
        let Some(instance) = instance else {
            return false;
        };

        let slot = out.downcast_mut::<<ValueOf<G> as PropertyValue>::Decayed>();
        debug_assert!(
            slot.is_some(),
            "property {}.{} read into a slot that does not hold `{}`",
            self.owner_class(),
            self.name,
            type_name::<<ValueOf<G> as PropertyValue>::Decayed>()
        );
        let Some(slot) = slot else {
            return false;
        };

        match self.get_value(instance).into_decayed() {
            Some(value) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    fn set_decayed_value(
        &self,
        owner: &mut dyn ViewModel,
        value: &dyn Any,
        has_value: bool,
    ) -> ReflectResult<()> {
        let owner_name = || self.owner_class().name().to_string();

        if !self.flags.has_public_setter() {
            warn!(
                "Rejected dynamic write to property {}.{}: no public setter",
                self.owner_class(),
                self.name
            );
            return Err(ReflectError::NoPublicSetter {
                owner: owner_name(),
                property: self.name.to_string(),
            });
        }

        let decayed = if has_value {
            let value = value
                .downcast_ref::<<ValueOf<G> as PropertyValue>::Decayed>()
                .ok_or_else(|| ReflectError::ValueTypeMismatch {
                    owner: owner_name(),
                    property: self.name.to_string(),
                    expected: type_name::<<ValueOf<G> as PropertyValue>::Decayed>(),
                })?;
            Some(value.clone())
        } else {
            None
        };

        let value = <ValueOf<G> as PropertyValue>::from_decayed(decayed).ok_or_else(|| {
            ReflectError::MissingValue {
                owner: owner_name(),
                property: self.name.to_string(),
            }
        })?;

        let found = owner.class();
        let instance =
            owner
                .cast_mut::<ClassOf<G>>()
                .ok_or_else(|| ReflectError::OwnerTypeMismatch {
                    owner: owner_name(),
                    property: self.name.to_string(),
                    found: found.name().to_string(),
                })?;

        self.set_value(instance, value)
    }

    fn add_class_property(&self, target: ClassHandle) {
        match self.field_offset {
            Some(offset) => {
                <<ValueOf<G> as PropertyValue>::Decayed as PropertyFactory>::add_property(
                    target, offset, self.name,
                );
            }
            None => trace!(
                "Property {}.{} is computed, no native field attached to `{}`",
                self.owner_class(),
                self.name,
                target
            ),
        }
    }
}
