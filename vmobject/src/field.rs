//! Native field descriptors
//!
//! A [`FieldDescriptor`] tells the host model that a class stores a value of
//! a given [`FieldKind`] at a byte offset. Kinds that refer to other metadata
//! (enumerations, object references, structures) carry the handle needed to
//! interpret the storage; arrays carry the descriptor of their element.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::EnumIs;

use crate::class::ClassHandle;

/// Width and signedness of an integral field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntWidth {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntWidth {
    /// Number of bits of storage.
    pub const fn num_bits(self) -> u32 {
        match self {
            IntWidth::I8 | IntWidth::U8 => 8,
            IntWidth::I16 | IntWidth::U16 => 16,
            IntWidth::I32 | IntWidth::U32 => 32,
            IntWidth::I64 | IntWidth::U64 => 64,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            IntWidth::I8 | IntWidth::I16 | IntWidth::I32 | IntWidth::I64
        )
    }
}

/// Width of a floating point field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FloatWidth {
    F32,
    F64,
}

/// Metadata of an enumeration usable as a field value.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: &'static str,
    variants: &'static [(&'static str, i64)],
}

impl EnumType {
    pub const fn new(name: &'static str, variants: &'static [(&'static str, i64)]) -> Self {
        Self { name, variants }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Variant names paired with their discriminant, in declaration order.
    pub fn variants(&self) -> &'static [(&'static str, i64)] {
        self.variants
    }

    pub fn value_of(&self, variant: &str) -> Option<i64> {
        self.variants
            .iter()
            .find_map(|(name, value)| (*name == variant).then_some(*value))
    }

    pub fn name_of(&self, value: i64) -> Option<&'static str> {
        self.variants
            .iter()
            .find_map(|(name, discriminant)| (*discriminant == value).then_some(*name))
    }
}

/// Metadata of an opaque structure usable as a field value.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct StructType {
    name: &'static str,
    size: usize,
    align: usize,
}

impl StructType {
    pub const fn new(name: &'static str, size: usize, align: usize) -> Self {
        Self { name, size, align }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn align(&self) -> usize {
        self.align
    }
}

/// Kind of a native field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs)]
pub enum FieldKind {
    Bool,
    Int(IntWidth),
    Float(FloatWidth),
    Str,
    /// Enumeration, interpreted through its [`EnumType`].
    Enum(&'static EnumType),
    /// Nullable reference to an instance of the given class.
    Object(ClassHandle),
    /// Inline structure described by its [`StructType`].
    Struct(&'static StructType),
    /// Homogeneous, growable container of the inner kind.
    Array(Box<FieldKind>),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Int(width) => write!(f, "{width}"),
            FieldKind::Float(width) => write!(f, "{width}"),
            FieldKind::Str => write!(f, "string"),
            FieldKind::Enum(ty) => write!(f, "enum {}", ty.name()),
            FieldKind::Object(class) => write!(f, "object {class}"),
            FieldKind::Struct(ty) => write!(f, "struct {}", ty.name()),
            FieldKind::Array(element) => write!(f, "array<{element}>"),
        }
    }
}

/// A native field attached to a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    offset: usize,
    kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, offset: usize, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            offset,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset of the storage inside an instance of the owning class.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }
}
