//! Handlers that decide how a stored value is driven.
//!
//! Every [`PolymorphicValue`](crate::PolymorphicValue) is created with a
//! handler. The handler is a type implementing [`DriveHandler<V>`] for the
//! stored value type `V`, and is fixed for the lifetime of the container and
//! of every copy made from it.
//!
//! Most code never names a handler: [`PolymorphicValue::new`] uses
//! [`Forward`], which calls the value's own [`Drive::drive`]. Custom handlers
//! are useful for types you do not own and cannot implement [`Drive`] for.
//!
//! # Examples
//!
//! ```
//! use polyvalue::{PolymorphicValue, handlers::DriveHandler};
//!
//! // A foreign type that knows nothing about `Drive`
//! #[derive(Clone)]
//! struct Locomotive {
//!     whistles: u32,
//! }
//!
//! struct Whistle;
//!
//! impl DriveHandler<Locomotive> for Whistle {
//!     fn drive(value: &mut Locomotive) {
//!         value.whistles += 1;
//!     }
//! }
//!
//! let mut value = PolymorphicValue::new_sendsync_custom::<_, Whistle>(Locomotive { whistles: 0 });
//! value.drive();
//! ```
//!
//! [`PolymorphicValue::new`]: crate::PolymorphicValue::new

pub use polyvalue_internals::handlers::DriveHandler;

use crate::Drive;

/// Handler that forwards to the value's own [`Drive`] implementation.
///
/// This is the handler used by [`PolymorphicValue::new`],
/// [`PolymorphicValue::new_sendsync`] and [`PolymorphicValue::new_local`].
///
/// [`PolymorphicValue::new`]: crate::PolymorphicValue::new
/// [`PolymorphicValue::new_sendsync`]: crate::PolymorphicValue::new_sendsync
/// [`PolymorphicValue::new_local`]: crate::PolymorphicValue::new_local
#[derive(Copy, Clone, Debug)]
pub struct Forward;

impl<V: Drive> DriveHandler<V> for Forward {
    #[inline]
    fn drive(value: &mut V) {
        value.drive();
    }
}
