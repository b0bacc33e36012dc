//! Host object model used by the view-model reflection core.
//!
//! This crate plays the part of the engine-side class metadata system. It
//! exposes three layers:
//!
//! - Class metadata: [`Class`] statics identified by pointer through
//!   [`ClassHandle`], each with an optional parent forming a single
//!   inheritance chain.
//! - Native field descriptors: [`FieldDescriptor`] and [`FieldKind`], attached
//!   to a class at a byte offset so that name-based consumers can address the
//!   backing storage of a field.
//! - Instances: the [`ViewModel`] trait, implemented by every object that
//!   declares properties, with up-casting along the embedded base chain.
//!
//! Classes are usually declared through [`declare_class!`] and
//! [`view_model_class!`] rather than by hand.
pub mod class;
pub mod field;
pub mod handle;
pub mod object;

pub use class::{Ancestors, Class, ClassHandle};
pub use field::{EnumType, FieldDescriptor, FieldKind, FloatWidth, IntWidth, StructType};
pub use handle::StaticRef;
pub use object::{ObjectPtr, StaticClass, ViewModel};
