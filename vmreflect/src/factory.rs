//! Native field registration per value category.
//!
//! [`PropertyFactory`] is implemented for every supported decayed value type
//! and knows which [`FieldKind`] describes it in the host object model. The
//! set of supported categories is closed: a property whose decayed type has
//! no implementation does not compile.
//!
//! | value type                      | field kind                   |
//! |---------------------------------|------------------------------|
//! | `bool`                          | [`FieldKind::Bool`]          |
//! | `i8` .. `i64`, `u8` .. `u64`    | [`FieldKind::Int`]           |
//! | `f32`, `f64`                    | [`FieldKind::Float`]         |
//! | `String`                        | [`FieldKind::Str`]           |
//! | [`view_model_enum!`] types      | [`FieldKind::Enum`]          |
//! | [`ObjectPtr<T>`]                | [`FieldKind::Object`]        |
//! | [`view_model_struct!`] types    | [`FieldKind::Struct`]        |
//! | `Vec<T>`                        | [`FieldKind::Array`] of `T`  |
//!
//! [`view_model_enum!`]: crate::view_model_enum
//! [`view_model_struct!`]: crate::view_model_struct
use vmobject::{
    ClassHandle, EnumType, FieldDescriptor, FieldKind, FloatWidth, IntWidth, ObjectPtr,
    StaticClass, StructType, ViewModel,
};

/// Registration of a decayed value type as a native field.
///
/// Types outside the supported categories have no field kind:
///
/// ```rust,compile_fail
/// # use vmreflect::PropertyFactory;
/// struct Opaque;
///
/// let _ = Opaque::field_kind();
/// ```
pub trait PropertyFactory: 'static {
    /// Field kind describing `Self` in the host object model.
    fn field_kind() -> FieldKind;

    /// Attach a field named `name`, stored at `offset`, to `target`.
    fn add_property(target: ClassHandle, offset: usize, name: &str) {
        target.add_field(FieldDescriptor::new(name, offset, Self::field_kind()));
    }
}

macro_rules! impl_property_factory {
    ($($ty:ty => $kind:expr),+ $(,)?) => {
        $(
            impl PropertyFactory for $ty {
                #[inline]
                fn field_kind() -> FieldKind {
                    $kind
                }
            }
        )+
    };
}

impl_property_factory! {
    bool => FieldKind::Bool,
    i8 => FieldKind::Int(IntWidth::I8),
    i16 => FieldKind::Int(IntWidth::I16),
    i32 => FieldKind::Int(IntWidth::I32),
    i64 => FieldKind::Int(IntWidth::I64),
    u8 => FieldKind::Int(IntWidth::U8),
    u16 => FieldKind::Int(IntWidth::U16),
    u32 => FieldKind::Int(IntWidth::U32),
    u64 => FieldKind::Int(IntWidth::U64),
    f32 => FieldKind::Float(FloatWidth::F32),
    f64 => FieldKind::Float(FloatWidth::F64),
    String => FieldKind::Str,
}

impl<T: PropertyFactory> PropertyFactory for Vec<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Array(Box::new(T::field_kind()))
    }
}

impl<T: ViewModel + StaticClass> PropertyFactory for ObjectPtr<T> {
    fn field_kind() -> FieldKind {
        FieldKind::Object(T::static_class())
    }
}

/// Enumerations usable as property values.
///
/// Implemented through [`view_model_enum!`](crate::view_model_enum).
pub trait ReflectedEnum: Clone + 'static {
    const ENUM_TYPE: &'static EnumType;
}

/// Opaque structures usable as property values.
///
/// Implemented through [`view_model_struct!`](crate::view_model_struct).
pub trait ReflectedStruct: Clone + 'static {
    const STRUCT_TYPE: &'static StructType;
}

/// Make a field-less enumeration usable as a property value.
///
/// Every listed variant is recorded with its discriminant.
///
/// ```rust
/// # use vmreflect::{PropertyFactory, ReflectedEnum, view_model_enum};
/// # use vmreflect::vmobject::FieldKind;
/// #[derive(Clone, Copy)]
/// enum Team {
///     Red,
///     Blue = 4,
/// }
///
/// view_model_enum!(Team { Red, Blue });
///
/// assert_eq!(Team::ENUM_TYPE.value_of("Blue"), Some(4));
/// assert_eq!(Team::field_kind(), FieldKind::Enum(Team::ENUM_TYPE));
/// ```
#[macro_export]
macro_rules! view_model_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::factory::ReflectedEnum for $ty {
            const ENUM_TYPE: &'static $crate::vmobject::EnumType = {
                const VARIANTS: &[(&str, i64)] = &[$((::core::stringify!($variant), $ty::$variant as i64)),+];
                &$crate::vmobject::EnumType::new(::core::stringify!($ty), VARIANTS)
            };
        }

        impl $crate::factory::PropertyFactory for $ty {
            fn field_kind() -> $crate::vmobject::FieldKind {
                $crate::vmobject::FieldKind::Enum(<$ty as $crate::factory::ReflectedEnum>::ENUM_TYPE)
            }
        }

        $crate::impl_plain_property_value!($ty);
    };
}

/// Make a structure usable as an opaque property value.
///
/// ```rust
/// # use vmreflect::{PropertyFactory, ReflectedStruct, view_model_struct};
/// #[derive(Clone)]
/// struct Vec2 {
///     x: f32,
///     y: f32,
/// }
///
/// view_model_struct!(Vec2);
///
/// assert_eq!(Vec2::STRUCT_TYPE.size(), 8);
/// assert!(Vec2::field_kind().is_struct());
/// ```
#[macro_export]
macro_rules! view_model_struct {
    ($ty:ident) => {
        impl $crate::factory::ReflectedStruct for $ty {
            const STRUCT_TYPE: &'static $crate::vmobject::StructType = &$crate::vmobject::StructType::new(
                ::core::stringify!($ty),
                ::core::mem::size_of::<$ty>(),
                ::core::mem::align_of::<$ty>(),
            );
        }

        impl $crate::factory::PropertyFactory for $ty {
            fn field_kind() -> $crate::vmobject::FieldKind {
                $crate::vmobject::FieldKind::Struct(<$ty as $crate::factory::ReflectedStruct>::STRUCT_TYPE)
            }
        }

        $crate::impl_plain_property_value!($ty);
    };
}

#[cfg(test)]
mod tests {
    use vmobject::{Class, ClassHandle};

    use super::*;

    #[derive(Clone, Copy)]
    enum Mood {
        Calm,
        Angry,
    }

    crate::view_model_enum!(Mood { Calm, Angry });

    #[test]
    fn containers_describe_their_elements() {
        assert_eq!(
            Vec::<Vec<u8>>::field_kind(),
            FieldKind::Array(Box::new(FieldKind::Array(Box::new(FieldKind::Int(
                IntWidth::U8
            )))))
        );
        assert_eq!(
            Vec::<Mood>::field_kind(),
            FieldKind::Array(Box::new(FieldKind::Enum(Mood::ENUM_TYPE)))
        );
        assert_eq!(Mood::ENUM_TYPE.variants(), &[("Calm", 0), ("Angry", 1)]);
    }

    #[test]
    fn add_property_attaches_descriptor() {
        static TARGET: Class = Class::new("FactoryTarget", None);
        let target = ClassHandle::new(&TARGET);

        f64::add_property(target, 16, "Ratio");
        String::add_property(target, 24, "Label");

        let fields = target.fields();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], FieldDescriptor::new("Ratio", 16, FieldKind::Float(FloatWidth::F64)));
        assert_eq!(fields[1].kind(), &FieldKind::Str);
    }
}
