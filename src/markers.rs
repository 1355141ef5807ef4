//! Marker types and traits for defining thread-safety semantics.
//!
//! A [`PolymorphicValue`](crate::PolymorphicValue) hides the type of the value
//! it holds, so the compiler can no longer see whether that value is [`Send`]
//! or [`Sync`]. The thread-safety marker records the answer instead. It is
//! the type parameter of [`PolymorphicValue<T>`](crate::PolymorphicValue):
//!
//! - [`SendSync`] (the default): the held value is `Send + Sync`, and so is the
//!   container.
//! - [`Local`]: the held value may be neither (for example it holds an `Rc`),
//!   and the container is neither `Send` nor `Sync`.
//!
//! # Design Philosophy
//!
//! The constraint is enforced at construction time. It is impossible to
//! construct a `PolymorphicValue<SendSync>` around a value that is not
//! `Send + Sync`, so you can trust that such a container really is safe to
//! send and share.
//!
//! # Examples
//!
//! ```
//! use std::rc::Rc;
//!
//! use polyvalue::prelude::*;
//!
//! #[derive(Clone)]
//! struct Shared(Rc<str>);
//!
//! impl Drive for Shared {
//!     fn drive(&mut self) {}
//! }
//!
//! // Rc is !Send + !Sync, so only the Local marker accepts it
//! let local: PolymorphicValue<markers::Local> =
//!     PolymorphicValue::new_local(Shared(Rc::from("depot")));
//! // local cannot be sent to another thread - won't compile
//! # drop(local);
//! ```
//!
//! ```compile_fail
//! use std::rc::Rc;
//!
//! use polyvalue::prelude::*;
//!
//! #[derive(Clone)]
//! struct Shared(Rc<str>);
//!
//! impl Drive for Shared {
//!     fn drive(&mut self) {}
//! }
//!
//! // This won't compile because Rc is not Send + Sync
//! let value: PolymorphicValue<markers::SendSync> = PolymorphicValue::new(Shared(Rc::from("depot")));
//! ```

/// Marker type indicating that the held value is `Send + Sync`.
///
/// This is the default thread-safety marker of
/// [`PolymorphicValue`](crate::PolymorphicValue). A
/// `PolymorphicValue<SendSync>` can be moved to another thread and shared
/// between threads.
///
/// # Examples
///
/// ```
/// use polyvalue::prelude::*;
///
/// #[derive(Clone)]
/// struct Tractor;
///
/// impl Drive for Tractor {
///     fn drive(&mut self) {}
/// }
///
/// let mut value: PolymorphicValue<markers::SendSync> = PolymorphicValue::new(Tractor);
///
/// std::thread::spawn(move || value.drive()).join().unwrap();
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct SendSync;

/// Marker type indicating that the held value may be neither `Send` nor
/// `Sync`.
///
/// Any `PolymorphicValue<SendSync>` can be turned into a
/// `PolymorphicValue<Local>` with
/// [`into_local`](crate::PolymorphicValue::into_local). The reverse is not
/// possible, since the container no longer knows its value's type.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Local;

/// Marker trait combining requirements for values stored under a given
/// thread-safety marker.
///
/// - Every `'static` type implements `ObjectMarkerFor<Local>`.
/// - Only `Send + Sync` types implement `ObjectMarkerFor<SendSync>`.
///
/// The constructors of [`PolymorphicValue`](crate::PolymorphicValue) use this
/// trait as a bound, which makes it impossible to wrap a non-thread-safe value
/// in a container claiming to be thread-safe.
pub trait ObjectMarkerFor<T>: Sized + 'static {}

impl<O: Sized + 'static> ObjectMarkerFor<Local> for O {}

impl<O: Sized + 'static> ObjectMarkerFor<SendSync> for O where O: Send + Sync {}
