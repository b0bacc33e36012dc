//! Accessor pointer decomposition.
//!
//! A property is declared from accessor function pointers. [`PointerToMember`]
//! recovers the owner ("class") type and the value type from such a pointer
//! type so that a declaration only spells out the accessor signature once:
//!
//! - getters: `fn(&C) -> V`, either a method `fn(&self) -> V` or a free function;
//! - setters: `fn(&mut C, V)`.
//!
//! A getter whose return value borrows from the owner does not coerce to
//! `fn(&C) -> V` and is rejected at compile time, as is a setter whose owner
//! or value disagrees with the getter of the same property.

/// Owner and value types of an accessor pointer.
///
/// [`ViewModelProperty`](crate::ViewModelProperty) is parameterized by the
/// getter pointer type and derives everything else from it.
///
/// A setter has to agree with the getter on the value type:
///
/// ```rust,compile_fail
/// use vmreflect::ViewModelProperty;
/// use vmreflect::vmobject::view_model_class;
///
/// struct Gauge {
///     level: u8,
/// }
///
/// impl Gauge {
///     fn level(&self) -> u8 {
///         self.level
///     }
///
///     fn set_level(&mut self, level: u16) {
///         self.level = level as u8;
///     }
/// }
///
/// view_model_class!(Gauge as "Gauge");
///
/// static LEVEL: ViewModelProperty<fn(&Gauge) -> u8> =
///     ViewModelProperty::<fn(&Gauge) -> u8>::new("Level", Gauge::level).with_setter(Gauge::set_level);
/// ```
///
/// and on the owner type:
///
/// ```rust,compile_fail
/// use vmreflect::ViewModelProperty;
/// use vmreflect::vmobject::view_model_class;
///
/// struct Gauge {
///     level: u8,
/// }
///
/// struct Dial {
///     level: u8,
/// }
///
/// impl Gauge {
///     fn level(&self) -> u8 {
///         self.level
///     }
/// }
///
/// impl Dial {
///     fn set_level(&mut self, level: u8) {
///         self.level = level;
///     }
/// }
///
/// view_model_class!(Gauge as "Gauge");
///
/// static LEVEL: ViewModelProperty<fn(&Gauge) -> u8> =
///     ViewModelProperty::<fn(&Gauge) -> u8>::new("Level", Gauge::level).with_setter(Dial::set_level);
/// ```
pub trait PointerToMember: Copy + Send + Sync + 'static {
    type ClassType: 'static;
    type ValueType: 'static;
}

/// Accessor pointers reading a value out of their owner.
pub trait GetterMember: PointerToMember {
    fn invoke(self, owner: &Self::ClassType) -> Self::ValueType;
}

/// Accessor pointers writing a value into their owner.
pub trait SetterMember: PointerToMember {
    fn invoke(self, owner: &mut Self::ClassType, value: Self::ValueType);
}

impl<C: 'static, V: 'static> PointerToMember for fn(&C) -> V {
    type ClassType = C;
    type ValueType = V;
}

impl<C: 'static, V: 'static> GetterMember for fn(&C) -> V {
    #[inline]
    fn invoke(self, owner: &C) -> V {
        self(owner)
    }
}

impl<C: 'static, V: 'static> PointerToMember for fn(&mut C, V) {
    type ClassType = C;
    type ValueType = V;
}

impl<C: 'static, V: 'static> SetterMember for fn(&mut C, V) {
    #[inline]
    fn invoke(self, owner: &mut C, value: V) {
        self(owner, value)
    }
}

/// Owner type of an accessor pointer type.
pub type ClassOf<M> = <M as PointerToMember>::ClassType;

/// Value type of an accessor pointer type.
pub type ValueOf<M> = <M as PointerToMember>::ValueType;

/// Setter pointer type matching the getter pointer type `G`.
pub type SetterOf<G> = fn(&mut ClassOf<G>, ValueOf<G>);
