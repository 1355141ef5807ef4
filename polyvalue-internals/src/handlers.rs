//! Handlers that define how an erased value carries out its capability.
//!
//! A handler is a separate type that knows how to drive a value of type `T`.
//! Keeping the capability on a handler rather than on `T` itself means the
//! stored types never have to know about the erasure machinery.

/// Trait for implementing how a value of type `T` is driven once its type has
/// been erased.
///
/// The handler is chosen when the value is wrapped, and is fixed for the
/// lifetime of that value and of every copy made from it.
///
/// # Examples
///
/// ```
/// use polyvalue_internals::{RawValue, handlers::DriveHandler};
///
/// #[derive(Clone)]
/// struct Odometer {
///     kilometers: u64,
/// }
///
/// struct OneKilometer;
///
/// impl DriveHandler<Odometer> for OneKilometer {
///     fn drive(value: &mut Odometer) {
///         value.kilometers += 1;
///     }
/// }
///
/// let mut raw = RawValue::new::<Odometer, OneKilometer>(Odometer { kilometers: 0 });
/// raw.as_mut().drive();
/// ```
pub trait DriveHandler<T>: 'static {
    /// Carries out the capability on `value`.
    ///
    /// Any panic raised here unwinds through the erased value unchanged.
    fn drive(value: &mut T);
}
