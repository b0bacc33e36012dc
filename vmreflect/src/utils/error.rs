use strum::EnumIs;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum ReflectError {
    /// Two declarations share a name on the same owner class.
    #[error("Property `{property}` is declared more than once on class `{owner}`")]
    DuplicateProperty { owner: String, property: String },

    /// A view class is bound to two different view-model classes.
    #[error(
        "View class `{view}` is bound to view model `{first}` and to view model `{second}`; a view binds at most one view model"
    )]
    ConflictingViewModelBinding {
        view: String,
        first: String,
        second: String,
    },

    /// Neither the owner class nor any of its ancestors declares the property.
    #[error("Property {owner}.{property} does not exist")]
    PropertyNotFound { owner: String, property: String },

    /// The property was declared hidden from name-based consumers.
    #[error("Property {owner}.{property} is not available for dynamic lookup")]
    NotAvailableForDynamicLookup { owner: String, property: String },

    /// A dynamic write targeted a property without public setter.
    #[error("Property {owner}.{property} does not have public setter")]
    NoPublicSetter { owner: String, property: String },

    /// A typed write targeted a property without any setter.
    #[error("Property {owner}.{property} is read-only")]
    ReadOnlyProperty { owner: String, property: String },

    /// A plain (non optional) property was written without a value.
    #[error("Property {owner}.{property} is not optional, a value is required")]
    MissingValue { owner: String, property: String },

    /// The instance handed to an erased operation is not of the owner class.
    #[error("Property {owner}.{property} cannot be accessed on an instance of `{found}`")]
    OwnerTypeMismatch {
        owner: String,
        property: String,
        found: String,
    },

    /// The untyped value slot does not hold the decayed value type.
    #[error("Property {owner}.{property} expects a value of type `{expected}`")]
    ValueTypeMismatch {
        owner: String,
        property: String,
        expected: &'static str,
    },
}

pub type ReflectResult<T> = Result<T, ReflectError>;
