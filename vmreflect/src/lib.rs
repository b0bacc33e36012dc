//! Statically declared view-model properties with a runtime, name-based
//! registry.
//!
//! Properties are declared once, fully typed, next to the view model that
//! owns them (see [`view_model_properties!`]). Each declaration produces a
//! typed [`ViewModelProperty`] static and registers it, erased behind
//! [`PropertyOperations`], in a process-wide [`ViewModelRegistry`]. Dynamic
//! consumers then find properties by owner class and name and read, write or
//! natively register them without knowing their value types.
//!
//! ```rust
//! use vmreflect::{find_property, view_model_properties};
//! use vmreflect::vmobject::{StaticClass, view_model_class};
//!
//! pub struct Counter {
//!     count: u32,
//! }
//!
//! impl Counter {
//!     fn count(&self) -> u32 {
//!         self.count
//!     }
//! }
//!
//! view_model_class!(Counter as "Counter");
//!
//! view_model_properties! {
//!     Counter {
//!         static COUNT: u32 = "Count" { get: Counter::count, field: count };
//!     }
//! }
//!
//! let counter = Counter { count: 4 };
//! let property = find_property(Counter::static_class(), "Count").unwrap();
//!
//! let mut out = 0u32;
//! assert!(property.get_decayed_value(&counter, &mut out));
//! assert_eq!(out, 4);
//! ```
pub mod factory;
pub mod member;
pub mod ops;
pub mod property;
pub mod query;
pub mod registry;
pub mod utils;
pub mod value;

pub use factory::{PropertyFactory, ReflectedEnum, ReflectedStruct};
pub use member::{ClassOf, GetterMember, PointerToMember, SetterMember, SetterOf, ValueOf};
pub use ops::PropertyOperations;
pub use property::{FieldOffset, PropertyFlags, ViewModelProperty};
pub use query::{PropertyAccess, PropertySummary};
pub use registry::{
    PropertyReflection, PropertyRegistration, ViewModelBinding, ViewModelRegistry,
    all_properties, find_property, registry, view_model_class,
};
pub use utils::error::{ReflectError, ReflectResult};
pub use value::PropertyValue;

pub extern crate inventory;
pub extern crate vmobject;
