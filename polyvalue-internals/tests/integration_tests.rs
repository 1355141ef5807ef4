//! Integration tests for the polyvalue-internals crate.
//!
//! ## RawValue Tests
//! - `test_dispatch_reaches_each_handler`: Unrelated value types dispatch to
//!   their own handlers
//! - `test_clone_is_independent`: Copies own separate allocations and state
//! - `test_clone_of_clone`: Cloning a clone behaves like cloning the original
//! - `test_move_transfers_allocation`: Moving keeps the same allocation
//! - `test_drop_counts`: Every allocation is dropped exactly once
//! - `test_zero_sized_values`: Zero-sized values still get distinct allocations
//!
//! ## Panic Tests
//! - `test_panicking_clone_leaves_source_intact`: A panicking `Clone` neither
//!   leaks nor double-drops
//! - `test_panicking_drive_propagates`: Panics from a handler unwind unchanged

use std::{
    cell::{Cell, RefCell},
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

use polyvalue_internals::{RawValue, handlers::DriveHandler};

type Log = Rc<RefCell<Vec<String>>>;

#[derive(Clone)]
struct Car {
    log: Log,
}

#[derive(Clone)]
struct Truck {
    log: Log,
    load: u32,
}

struct Named;

impl DriveHandler<Car> for Named {
    fn drive(value: &mut Car) {
        value.log.borrow_mut().push("car".to_string());
    }
}

impl DriveHandler<Truck> for Named {
    fn drive(value: &mut Truck) {
        value.load += 1;
        value
            .log
            .borrow_mut()
            .push(format!("truck carrying {}", value.load));
    }
}

#[derive(Clone)]
struct Counted {
    drops: Rc<Cell<usize>>,
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

struct Ignore;

impl DriveHandler<Counted> for Ignore {
    fn drive(_value: &mut Counted) {}
}

#[test]
fn test_dispatch_reaches_each_handler() {
    let log = Log::default();
    let mut car = RawValue::new::<Car, Named>(Car { log: log.clone() });
    let mut truck = RawValue::new::<Truck, Named>(Truck {
        log: log.clone(),
        load: 0,
    });

    car.as_mut().drive();
    truck.as_mut().drive();
    car.as_mut().drive();

    assert_eq!(*log.borrow(), ["car", "truck carrying 1", "car"]);
}

#[test]
fn test_clone_is_independent() {
    let log = Log::default();
    let mut original = RawValue::new::<Truck, Named>(Truck {
        log: log.clone(),
        load: 10,
    });
    let mut copy = original.clone();

    assert_ne!(original.as_ref().data_ptr(), copy.as_ref().data_ptr());

    copy.as_mut().drive();
    copy.as_mut().drive();
    original.as_mut().drive();

    assert_eq!(
        *log.borrow(),
        ["truck carrying 11", "truck carrying 12", "truck carrying 11"]
    );
}

#[test]
fn test_clone_of_clone() {
    let log = Log::default();
    let original = RawValue::new::<Truck, Named>(Truck {
        log: log.clone(),
        load: 5,
    });
    let mut first = original.clone();
    let mut second = first.clone();
    let mut direct = original.clone();

    first.as_mut().drive();
    second.as_mut().drive();
    direct.as_mut().drive();

    assert_eq!(
        *log.borrow(),
        ["truck carrying 6", "truck carrying 6", "truck carrying 6"]
    );
}

#[test]
fn test_move_transfers_allocation() {
    let log = Log::default();
    let value = RawValue::new::<Car, Named>(Car { log: log.clone() });
    let address = value.as_ref().data_ptr();

    let mut slot = Some(value);
    let mut moved = slot.take().unwrap();

    assert!(slot.is_none());
    assert_eq!(moved.as_ref().data_ptr(), address);
    moved.as_mut().drive();
    assert_eq!(*log.borrow(), ["car"]);
}

#[test]
fn test_drop_counts() {
    let drops = Rc::new(Cell::new(0));
    let original = RawValue::new::<Counted, Ignore>(Counted {
        drops: drops.clone(),
    });
    let copies: Vec<RawValue> = (0..3).map(|_| original.clone()).collect();
    assert_eq!(drops.get(), 0);

    let moved = original;
    assert_eq!(drops.get(), 0);

    drop(copies);
    assert_eq!(drops.get(), 3);
    drop(moved);
    assert_eq!(drops.get(), 4);
}

#[test]
fn test_zero_sized_values() {
    #[derive(Clone, Copy)]
    struct Unit;

    struct Nothing;
    impl DriveHandler<Unit> for Nothing {
        fn drive(_value: &mut Unit) {}
    }

    let mut first = RawValue::new::<Unit, Nothing>(Unit);
    let second = first.clone();
    first.as_mut().drive();

    assert_ne!(first.as_ref().data_ptr(), second.as_ref().data_ptr());
}

struct Fragile {
    drops: Rc<Cell<usize>>,
    explode_on_clone: bool,
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        if self.explode_on_clone {
            panic!("clone refused");
        }
        Fragile {
            drops: self.drops.clone(),
            explode_on_clone: false,
        }
    }
}

impl Drop for Fragile {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

struct Crash;

impl DriveHandler<Fragile> for Crash {
    fn drive(_value: &mut Fragile) {
        panic!("engine failure");
    }
}

#[test]
fn test_panicking_clone_leaves_source_intact() {
    let drops = Rc::new(Cell::new(0));
    let original = RawValue::new::<Fragile, Crash>(Fragile {
        drops: drops.clone(),
        explode_on_clone: true,
    });
    let address = original.as_ref().data_ptr();

    let result = catch_unwind(AssertUnwindSafe(|| original.clone()));
    assert!(result.is_err());
    assert_eq!(drops.get(), 0);
    assert_eq!(original.as_ref().data_ptr(), address);

    drop(original);
    assert_eq!(drops.get(), 1);
}

#[test]
fn test_panicking_drive_propagates() {
    let drops = Rc::new(Cell::new(0));
    let mut value = RawValue::new::<Fragile, Crash>(Fragile {
        drops: drops.clone(),
        explode_on_clone: false,
    });

    let result = catch_unwind(AssertUnwindSafe(|| value.as_mut().drive()));
    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"engine failure"));

    drop(value);
    assert_eq!(drops.get(), 1);
}
