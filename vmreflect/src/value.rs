//! Value decay and optionality.
//!
//! Every property value type is either plain or an `Option` around a plain
//! type. [`PropertyValue`] exposes the plain ("decayed") type, whether
//! presence has to be tracked, and the conversions between the two. It is the
//! only place that decides whether a property is optional.
use vmobject::{ObjectPtr, StaticClass, ViewModel};

use crate::factory::PropertyFactory;

/// Classification of a property value type.
///
/// Implemented for every built-in plain type, for `Vec` and [`ObjectPtr`],
/// and for `Option<T>` of any plain `T`. Nested options do not implement it.
/// User enumerations and structures get an implementation from
/// [`view_model_enum!`](crate::view_model_enum) and
/// [`view_model_struct!`](crate::view_model_struct).
///
/// ```rust
/// # use vmreflect::PropertyValue;
/// fn optional<V: PropertyValue>() -> bool {
///     V::IS_OPTIONAL
/// }
///
/// assert!(optional::<Option<Vec<u8>>>());
/// assert!(!optional::<Vec<u8>>());
/// ```
///
/// ```rust,compile_fail
/// # use vmreflect::PropertyValue;
/// fn optional<V: PropertyValue>() -> bool {
///     V::IS_OPTIONAL
/// }
///
/// optional::<Option<Option<u8>>>();
/// ```
pub trait PropertyValue: Sized + 'static {
    /// The plain type, without the optional wrapper.
    type Decayed: PropertyFactory + Clone + 'static;

    /// Whether the value type is an optional wrapper.
    const IS_OPTIONAL: bool;

    /// Unwrap into the plain type. Plain values are always present.
    fn into_decayed(self) -> Option<Self::Decayed>;

    /// Rebuild a value from an optional plain value.
    ///
    /// Plain types cannot represent absence and return `None` for a `None`
    /// input; optional types always succeed.
    fn from_decayed(value: Option<Self::Decayed>) -> Option<Self>;
}

/// Implement [`PropertyValue`] for plain types that are their own decayed type.
#[doc(hidden)]
#[macro_export]
macro_rules! impl_plain_property_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::value::PropertyValue for $ty {
                type Decayed = $ty;
                const IS_OPTIONAL: bool = false;

                #[inline]
                fn into_decayed(self) -> ::core::option::Option<Self> {
                    ::core::option::Option::Some(self)
                }

                #[inline]
                fn from_decayed(value: ::core::option::Option<Self>) -> ::core::option::Option<Self> {
                    value
                }
            }
        )+
    };
}

impl_plain_property_value!(bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, String);

impl<T: PropertyFactory + Clone + 'static> PropertyValue for Vec<T> {
    type Decayed = Vec<T>;
    const IS_OPTIONAL: bool = false;

    #[inline]
    fn into_decayed(self) -> Option<Self> {
        Some(self)
    }

    #[inline]
    fn from_decayed(value: Option<Self>) -> Option<Self> {
        value
    }
}

impl<T: ViewModel + StaticClass> PropertyValue for ObjectPtr<T> {
    type Decayed = ObjectPtr<T>;
    const IS_OPTIONAL: bool = false;

    #[inline]
    fn into_decayed(self) -> Option<Self> {
        Some(self)
    }

    #[inline]
    fn from_decayed(value: Option<Self>) -> Option<Self> {
        value
    }
}

impl<T: PropertyFactory + Clone + 'static> PropertyValue for Option<T> {
    type Decayed = T;
    const IS_OPTIONAL: bool = true;

    #[inline]
    fn into_decayed(self) -> Option<T> {
        self
    }

    #[inline]
    fn from_decayed(value: Option<T>) -> Option<Self> {
        Some(value)
    }
}

/// Whether `V` tracks presence, usable in constant expressions.
pub const fn is_optional<V: PropertyValue>() -> bool {
    V::IS_OPTIONAL
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use super::*;

    fn decayed_id<V: PropertyValue>() -> TypeId {
        TypeId::of::<V::Decayed>()
    }

    #[test]
    fn optional_wrapper_is_stripped() {
        assert_eq!(decayed_id::<Option<String>>(), TypeId::of::<String>());
        assert_eq!(decayed_id::<Option<Vec<u8>>>(), TypeId::of::<Vec<u8>>());
        assert_eq!(decayed_id::<i32>(), TypeId::of::<i32>());
        assert!(is_optional::<Option<f32>>());
        assert!(!is_optional::<f32>());
    }

    #[test]
    fn plain_values_cannot_be_absent() {
        assert_eq!(<u16 as PropertyValue>::from_decayed(None), None);
        assert_eq!(<u16 as PropertyValue>::from_decayed(Some(3)), Some(3));
        assert_eq!(<Option<u16> as PropertyValue>::from_decayed(None), Some(None));
        assert_eq!(Some(5u16).into_decayed(), Some(5));
        assert_eq!(None::<u16>.into_decayed(), None);
    }
}
