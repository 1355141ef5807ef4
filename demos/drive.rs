//! Drives a car, then reuses the same container for a truck.
//!
//! Run with `cargo run --example drive`. Add `--features tracing` to also see
//! the container's trace events on stderr.

use std::io::{self, Write};

use polyvalue::prelude::*;
use rootcause::prelude::{Report, ResultExt};

#[derive(Clone)]
struct Car;

impl Drive for Car {
    fn drive(&mut self) {
        println!("Vroom, vroom. I'm a car!");
    }
}

#[derive(Clone)]
struct Truck;

impl Drive for Truck {
    fn drive(&mut self) {
        println!("VROOOM. I'm a truck!");
    }
}

fn main() -> Result<(), Report> {
    tracing_subscriber::fmt()
        .with_max_level(tracing_subscriber::filter::LevelFilter::TRACE)
        .with_writer(io::stderr)
        .init();

    let mut vehicle: PolymorphicValue = PolymorphicValue::new(Car);
    vehicle.drive();

    vehicle = PolymorphicValue::new(Truck);
    vehicle.drive();

    io::stdout()
        .flush()
        .context("Failed to flush the demo output")?;
    Ok(())
}
