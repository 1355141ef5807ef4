#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Value-semantic polymorphic containers for Rust.
//!
//! ## Overview
//!
//! A [`PolymorphicValue`] holds one value of any type that can be driven, and
//! behaves like a plain value itself:
//!
//! - it is dispatched dynamically, so callers never name the held type;
//! - [`Clone`] deep-copies the held value, so copies never share state;
//! - moving it moves one pointer, and nothing is cloned.
//!
//! The held types do not share a base type and do not know about the
//! container. All they need is the [`Drive`] capability and [`Clone`].
//!
//! ## Quick Example
//!
//! ```
//! use polyvalue::prelude::*;
//!
//! #[derive(Clone)]
//! struct Car;
//!
//! impl Drive for Car {
//!     fn drive(&mut self) {
//!         println!("Vroom, vroom. I'm a car!");
//!     }
//! }
//!
//! #[derive(Clone)]
//! struct Truck;
//!
//! impl Drive for Truck {
//!     fn drive(&mut self) {
//!         println!("VROOOM. I'm a truck!");
//!     }
//! }
//!
//! let mut vehicle: PolymorphicValue = PolymorphicValue::new(Car);
//! vehicle.drive();
//!
//! vehicle = PolymorphicValue::new(Truck);
//! vehicle.drive();
//! ```
//!
//! ## Core Concepts
//!
//! **Capability**: [`Drive`] is the only operation a stored value has to
//! provide. A value can also be stored together with a custom
//! [`handler`](handlers) when its type cannot implement [`Drive`].
//!
//! **Copying**: cloning a [`PolymorphicValue`] allocates a new container and
//! copy-constructs the held value into it through [`Clone`]. Mutating one copy
//! through [`drive`](PolymorphicValue::drive) never affects another.
//!
//! **Moving**: ordinary Rust moves transfer the allocation as-is. There is no
//! "moved-from" container to misuse: the compiler rejects any use of a
//! binding after it has been moved. When a vacant slot is needed,
//! `Option<PolymorphicValue>` costs no extra space and
//! [`Option::take`] is the move that leaves the source empty.
//!
//! **Thread safety**: [`PolymorphicValue<SendSync>`](markers::SendSync) (the
//! default) only accepts `Send + Sync` values and is itself `Send + Sync`.
//! [`PolymorphicValue<Local>`](markers::Local) accepts any value and stays on
//! its thread.
//!
//! ## Feature Flags
//!
//! - `tracing`: emit `TRACE` level [`tracing`] events when values are wrapped,
//!   cloned and driven.
//!
//! [`tracing`]: https://docs.rs/tracing

extern crate alloc;

#[macro_use]
mod macros;

mod capability;
pub mod handlers;
pub mod markers;
pub mod prelude;
mod value;

pub use self::{capability::Drive, value::PolymorphicValue};
