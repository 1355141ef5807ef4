//! The capability a value must provide to be stored in a
//! [`PolymorphicValue`](crate::PolymorphicValue).

/// A value that can be driven.
///
/// This is the whole capability contract: one operation, no arguments, no
/// result. Implementing it is all a type needs to do to become storable in a
/// [`PolymorphicValue`](crate::PolymorphicValue); there is no base type to
/// inherit from and no registration step. The container additionally requires
/// [`Clone`], because copying the container copies the value.
///
/// # Examples
///
/// ```
/// use polyvalue::prelude::*;
///
/// #[derive(Clone)]
/// struct Bicycle {
///     pedal_strokes: u32,
/// }
///
/// impl Drive for Bicycle {
///     fn drive(&mut self) {
///         self.pedal_strokes += 1;
///     }
/// }
///
/// let mut value: PolymorphicValue = PolymorphicValue::new(Bicycle { pedal_strokes: 0 });
/// value.drive();
/// ```
pub trait Drive {
    /// Performs the capability.
    ///
    /// Whatever this does, including panicking, is observed unchanged by the
    /// caller of [`PolymorphicValue::drive`](crate::PolymorphicValue::drive).
    fn drive(&mut self);
}
