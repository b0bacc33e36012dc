//! Class metadata
//!
//! A [`Class`] is a `'static` record describing one object type of the host
//! model: its name, its parent class (single inheritance) and the native
//! fields attached to it. Classes are referenced through [`ClassHandle`],
//! which compares by identity.
use std::fmt;

use log::debug;
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use crate::{field::FieldDescriptor, handle::StaticRef};

/// Stable identity of a [`Class`].
pub type ClassHandle = StaticRef<Class>;

/// Metadata of a single class.
///
/// Classes are meant to live in statics. The parent is stored as a function
/// returning its handle so that a class can refer to a parent declared in
/// another module or crate.
///
/// ```rust
/// # use vmobject::{Class, ClassHandle};
/// static BASE: Class = Class::new("Base", None);
/// static DERIVED: Class = Class::new("Derived", Some(base));
///
/// fn base() -> ClassHandle {
///     ClassHandle::new(&BASE)
/// }
///
/// let derived = ClassHandle::new(&DERIVED);
/// assert!(derived.is_child_of(base()));
/// assert!(!base().is_child_of(derived));
/// ```
pub struct Class {
    name: &'static str,
    parent: Option<fn() -> ClassHandle>,
    fields: RwLock<Vec<FieldDescriptor>>,
}

impl Class {
    pub const fn new(name: &'static str, parent: Option<fn() -> ClassHandle>) -> Self {
        Self {
            name,
            parent,
            fields: RwLock::new(Vec::new()),
        }
    }

    /// Name of the class.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parent class, `None` for root classes.
    pub fn parent(&self) -> Option<ClassHandle> {
        self.parent.map(|parent| parent())
    }

    /// Attach a native field descriptor to this class.
    ///
    /// The host model does not deduplicate fields: attaching the same field
    /// twice yields two descriptors. Callers register each field once.
    pub fn add_field(&self, field: FieldDescriptor) {
        debug!(
            "Attached native field `{}` ({}) at offset {} to class `{}`",
            field.name(),
            field.kind(),
            field.offset(),
            self.name
        );
        self.fields.write().push(field);
    }

    /// Read access to the fields attached directly to this class.
    ///
    /// The returned guard holds a read lock, do not call [`Self::add_field`]
    /// on the same class while it is alive.
    pub fn fields(&self) -> RwLockReadGuard<'_, Vec<FieldDescriptor>> {
        self.fields.read()
    }

    /// Look up a field attached directly to this class by name.
    pub fn find_field(&self, name: &str) -> Option<MappedRwLockReadGuard<'_, FieldDescriptor>> {
        RwLockReadGuard::try_map(self.fields.read(), |fields| {
            fields.iter().find(|field| field.name() == name)
        })
        .ok()
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("parent", &self.parent().map(|parent| parent.name()))
            .finish()
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl StaticRef<Class> {
    /// Iterate over this class and its ancestors, most derived first.
    pub fn ancestors(self) -> Ancestors {
        Ancestors { next: Some(self) }
    }

    /// Returns `true` if this class is `other` or derives from it.
    pub fn is_child_of(self, other: ClassHandle) -> bool {
        self.ancestors().any(|class| class == other)
    }
}

impl fmt::Display for StaticRef<Class> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Iterator over a class hierarchy, see [`StaticRef::ancestors`].
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<ClassHandle>,
}

impl Iterator for Ancestors {
    type Item = ClassHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
