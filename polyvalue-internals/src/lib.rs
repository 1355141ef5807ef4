#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`polyvalue`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased data structure and unsafe
//! operations that power [`polyvalue`]. It stores a value of any type behind a
//! single owned pointer and dispatches to it through a hand-built vtable.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`polyvalue`] crate, not this one.
//!
//! # Architecture
//!
//! - [`RawValue`]: Owned value with [`Box`]-based allocation. Cloning it
//!   copy-constructs the value into a new allocation; moving it moves the
//!   pointer.
//! - [`RawValueRef`]/[`RawValueMut`]: Borrowed references (shared/mutable)
//! - [`ValueData`]: `#[repr(C)]` wrapper pairing the vtable with the value
//! - [`ValueVtable`]: Function pointers for `drop`, `clone` and `drive`
//! - [`handlers`]: The [`DriveHandler`] trait deciding how a value is driven
//!
//! # Safety Strategy
//!
//! When we erase a type like `ValueData<Car>` to `ValueData<Erased>`, we must
//! ensure that the vtable function pointers still match the actual concrete
//! type stored in memory.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: Safety-critical types keep fields
//!   module-private, making invariants locally verifiable within a single file
//! - **`#[repr(C)]` layout**: Enables safe field projection on type-erased
//!   pointers without constructing invalid references
//! - **Documented vtable contracts**: Each vtable method specifies exactly when
//!   it can be safely called
//!
//! [`polyvalue`]: https://docs.rs/polyvalue/latest/polyvalue/
//! [`ValueData`]: value::data::ValueData
//! [`ValueVtable`]: value::vtable::ValueVtable
//! [`DriveHandler`]: handlers::DriveHandler
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

pub mod handlers;
mod util;
mod value;

pub use value::{RawValue, RawValueMut, RawValueRef};
