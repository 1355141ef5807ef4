//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
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
//! let mut vehicle: PolymorphicValue = PolymorphicValue::new(Car);
//! vehicle.drive();
//! ```
//!
//! # What's Included
//!
//! - **[`PolymorphicValue`]**: The value-semantic polymorphic container
//! - **[`Drive`]**: The capability stored values provide
//! - **[`handlers`]**: The handler trait and the built-in [`Forward`](handlers::Forward) handler
//! - **[`markers`]**: Thread-safety markers

pub use crate::{Drive, PolymorphicValue, handlers, markers};
