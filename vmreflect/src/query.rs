//! Queries for name-based consumers of the registry.
//!
//! These mirror what an editor layer validates before exposing a property:
//! that it exists on the owner, that it may be looked up dynamically, that it
//! may be written, and that the view it is used from displays a compatible
//! view model.
#[cfg(feature = "serde")]
use serde::Serialize;
use strum::{Display, EnumIs};
use vmobject::ClassHandle;

use crate::{
    property::PropertyFlags,
    registry::{PropertyReflection, ViewModelRegistry},
    utils::error::{ReflectError, ReflectResult},
};

/// Intended use of a resolved property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIs)]
#[strum(serialize_all = "lowercase")]
pub enum PropertyAccess {
    Get,
    Set,
}

/// Owned description of a registered property, for dumps and code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PropertySummary {
    pub owner: String,
    pub name: String,
    pub value_type: &'static str,
    pub field_kind: String,
    pub field_offset: Option<usize>,
    pub flags: PropertyFlags,
}

impl From<&PropertyReflection> for PropertySummary {
    fn from(property: &PropertyReflection) -> Self {
        let operations = property.operations();
        Self {
            owner: property.owner().name().to_string(),
            name: property.name().to_string(),
            value_type: operations.value_type_name(),
            field_kind: operations.field_kind().to_string(),
            field_offset: property.field_offset(),
            flags: property.flags(),
        }
    }
}

impl ViewModelRegistry {
    /// Find a property and check that a dynamic consumer may use it for
    /// `access`.
    pub fn resolve_property(
        &self,
        owner: ClassHandle,
        name: &str,
        access: PropertyAccess,
    ) -> ReflectResult<&PropertyReflection> {
        let property =
            self.find_property(owner, name)
                .ok_or_else(|| ReflectError::PropertyNotFound {
                    owner: owner.name().to_string(),
                    property: name.to_string(),
                })?;

        let flags = property.flags();
        if !flags.is_available_for_dynamic_lookup() {
            return Err(ReflectError::NotAvailableForDynamicLookup {
                owner: property.owner().name().to_string(),
                property: name.to_string(),
            });
        }
        if access.is_set() && !flags.has_public_setter() {
            return Err(ReflectError::NoPublicSetter {
                owner: property.owner().name().to_string(),
                property: name.to_string(),
            });
        }

        Ok(property)
    }

    /// Returns `true` if `view` is bound to a view model whose instances are
    /// `owner`s, i.e. the properties of `owner` are reachable from the view.
    pub fn is_view_compatible(&self, view: ClassHandle, owner: ClassHandle) -> bool {
        self.view_model_class(view)
            .is_some_and(|view_model| owner.is_child_of(view_model))
    }

    /// Properties available for dynamic lookup and accepted by `filter`,
    /// grouped by declaring class.
    pub fn dynamic_properties<'a, F>(
        &'a self,
        filter: F,
    ) -> impl Iterator<Item = &'a PropertyReflection> + 'a
    where
        F: Fn(&PropertyReflection) -> bool + 'a,
    {
        self.all_properties()
            .values()
            .flatten()
            .filter(move |property| {
                property.flags().is_available_for_dynamic_lookup() && filter(property)
            })
    }

    /// Every property reachable on `owner`, most derived class first.
    ///
    /// A property shadowed by a declaration of the same name on a more
    /// derived class is left out.
    pub fn visible_properties(&self, owner: ClassHandle) -> Vec<&PropertyReflection> {
        let mut visible: Vec<&PropertyReflection> = Vec::new();
        for class in owner.ancestors() {
            for property in self.declared_properties(class) {
                if !visible.iter().any(|seen| seen.name() == property.name()) {
                    visible.push(property);
                }
            }
        }
        visible
    }

    /// Owned summaries of every property, ordered by owner name then
    /// declaration order.
    pub fn snapshot(&self) -> Vec<PropertySummary> {
        let mut summaries: Vec<PropertySummary> = self
            .all_properties()
            .values()
            .flatten()
            .map(PropertySummary::from)
            .collect();
        summaries.sort_by(|a, b| a.owner.cmp(&b.owner));
        summaries
    }
}
