//! Checks the events emitted with the `tracing` feature enabled.
//!
//! Run with `cargo test --features tracing`.
#![cfg(feature = "tracing")]

use std::{
    io,
    sync::{Arc, Mutex},
};

use polyvalue::prelude::*;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct Hovercraft;

impl Drive for Hovercraft {
    fn drive(&mut self) {}
}

#[test]
fn lifecycle_is_traced() {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut value = PolymorphicValue::new_sendsync(Hovercraft);
        let mut copy = value.clone();
        value.drive();
        copy.drive();
    });

    let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("wrapping value in PolymorphicValue"));
    assert!(output.contains("Hovercraft"));
    assert_eq!(output.matches("cloning PolymorphicValue").count(), 1);
    assert_eq!(output.matches("driving PolymorphicValue").count(), 2);
}
