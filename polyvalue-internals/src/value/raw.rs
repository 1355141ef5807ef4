//! Type-erased value pointer types.
//!
//! This module encapsulates the `ptr` field of [`RawValue`], [`RawValueRef`]
//! and [`RawValueMut`], ensuring it is only visible within this module. This
//! visibility restriction guarantees the safety invariant: **the pointer always
//! comes from `Box<ValueData<T>>`**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` field can only be set via [`RawValue::new`] or by cloning
//! through the vtable (both of which create it from `Box::into_raw`), and
//! cannot be modified afterward (no `pub` or `pub(crate)` fields), the pointer
//! provenance remains valid throughout the value's lifetime.
//!
//! The [`RawValue::drop`] implementation relies on this invariant to safely
//! reconstruct the `Box` and deallocate the memory.
//!
//! # Ownership
//!
//! A [`RawValue`] is the single owner of its allocation. Cloning never shares
//! it: [`RawValue::clone`] always produces a new box with a copy-constructed
//! value. Moving a [`RawValue`] moves the pointer and nothing else.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{handlers::DriveHandler, util::Erased, value::data::ValueData};

/// A pointer to a [`ValueData`] that is guaranteed to point to an initialized
/// instance of a [`ValueData<T>`] for some specific `T`, though we do not know
/// which actual `T` it is.
///
/// However, the pointer is allowed to transition into a non-initialized state
/// inside the [`RawValue::drop`] method.
///
/// The pointer is guaranteed to have been created using [`Box::into_raw`].
///
/// We cannot use a [`Box<ValueData<T>>`] directly, because that does not
/// allow us to type-erase the `T`.
#[repr(transparent)]
pub struct RawValue {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<T>>` for
    ///    some `T` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<T>` for the entire
    ///    lifetime of this object.
    /// 3. The pointee is properly initialized for the entire lifetime of this
    ///    object, except during the execution of the `Drop` implementation.
    /// 4. No other `RawValue` points to the same `ValueData<T>`.
    ptr: NonNull<ValueData<Erased>>,
}

impl RawValue {
    /// Creates a new [`RawValue`] which drives `value` using the handler `H`.
    ///
    /// `T` has to be [`Clone`], since copies of the returned [`RawValue`]
    /// copy-construct the value.
    #[inline]
    pub fn new<T, H>(value: T) -> Self
    where
        T: Clone + 'static,
        H: DriveHandler<T>,
    {
        Self::from_box(Box::new(ValueData::new::<H>(value)))
    }

    /// Erases the type of an owned [`ValueData<T>`].
    #[inline]
    pub(super) fn from_box<T: 'static>(data: Box<ValueData<T>>) -> Self {
        let ptr: *mut ValueData<T> = Box::into_raw(data);
        let ptr: *mut ValueData<Erased> = ptr.cast::<ValueData<Erased>>();

        // SAFETY: `Box::into_raw` returns a non-null pointer
        let ptr: NonNull<ValueData<Erased>> = unsafe { NonNull::new_unchecked(ptr) };

        Self { ptr }
    }

    /// Returns a reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_> {
        RawValueRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Returns a mutable reference to the [`ValueData`] instance.
    ///
    /// This is safe, since a [`RawValue`] is the unique owner of its
    /// allocation and we are holding `&mut self`.
    #[inline]
    pub fn as_mut(&mut self) -> RawValueMut<'_> {
        RawValueMut {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }
}

impl Clone for RawValue {
    #[inline]
    fn clone(&self) -> Self {
        self.as_ref().clone_value()
    }
}

impl core::ops::Drop for RawValue {
    #[inline]
    fn drop(&mut self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` (guaranteed by
        //    `RawValue::from_box`)
        // 2. The vtable returned by `self.as_ref().vtable()` is guaranteed to match the
        //    data in the `ValueData`.
        // 3. The pointer is initialized and has not been previously freed as guaranteed
        //    by the invariants on this type. We are correctly transferring ownership
        //    here and the pointer is not used afterwards, as we are in the drop
        //    function.
        unsafe {
            vtable.drop(self.ptr);
        }
    }
}

/// A lifetime-bound pointer to a [`ValueData`] that is guaranteed to point to
/// an initialized instance of a [`ValueData<T>`] for some specific `T`, though
/// we do not know which actual `T` it is.
///
/// We cannot use a [`&'a ValueData<T>`] directly, because that would require
/// us to know the actual type of the value, which we do not.
///
/// [`&'a ValueData<T>`]: ValueData
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct RawValueRef<'a> {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<T>>` for
    ///    some `T` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<T>` for the entire
    ///    lifetime of this object.
    ptr: NonNull<ValueData<Erased>>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a ValueData<Erased>`
    _marker: core::marker::PhantomData<&'a ValueData<Erased>>,
}

impl<'a> RawValueRef<'a> {
    /// Casts the [`RawValueRef`] to a [`ValueData<T>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `T` matches the actual value type stored in the
    ///    [`ValueData`].
    #[inline]
    pub(super) unsafe fn cast_inner<T>(self) -> &'a ValueData<T> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.vtable().type_id(), TypeId::of::<T>());

        let this = self.ptr.cast::<ValueData<T>>();
        // SAFETY: Converting the NonNull pointer to a reference is sound because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawValueRef's type invariants)
        // - The pointee is properly initialized (RawValueRef's doc comment guarantees
        //   it points to an initialized ValueData<T> for some T)
        // - The type `T` matches the actual value type (guaranteed by caller)
        // - Shared access is allowed
        // - The reference lifetime 'a is valid (tied to RawValueRef<'a>'s lifetime)
        unsafe { this.as_ref() }
    }

    /// Returns a [`NonNull`] pointer to the [`ValueData`] instance.
    #[inline]
    pub(super) fn as_ptr(self) -> *const ValueData<Erased> {
        self.ptr.as_ptr()
    }

    /// Returns the address of the owned allocation.
    ///
    /// Two live [`RawValue`]s never return the same address, so this can be
    /// used to tell a moved value (same address) from a clone (new address).
    /// The pointer must not be dereferenced.
    #[inline]
    pub fn data_ptr(self) -> *const () {
        self.as_ptr().cast::<()>()
    }

    /// Copy-constructs the held value into a new, independently owned
    /// [`RawValue`].
    #[inline]
    pub fn clone_value(self) -> RawValue {
        let vtable = self.vtable();

        // SAFETY:
        // 1. The vtable returned by `self.vtable()` is guaranteed to match the data in
        //    the `ValueData`.
        unsafe { vtable.clone(self) }
    }
}

/// A mutable lifetime-bound pointer to a [`ValueData`] that is guaranteed to
/// point to an initialized instance of a [`ValueData<T>`] for some specific
/// `T`, though we do not know which actual `T` it is.
///
/// We cannot use a [`&'a mut ValueData<T>`] directly, because that would
/// require us to know the actual type of the value, which we do not.
///
/// [`&'a mut ValueData<T>`]: ValueData
#[repr(transparent)]
pub struct RawValueMut<'a> {
    /// Pointer to the inner value data
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as long as
    /// this struct exists:
    ///
    /// 1. The pointer must have been created from a `Box<ValueData<T>>` for
    ///    some `T` using `Box::into_raw`.
    /// 2. The pointer will point to the same `ValueData<T>` for the entire
    ///    lifetime of this object.
    /// 3. This pointer is valid for exclusive mutable access to the
    ///    `ValueData` with the same semantics as a `&'a mut ValueData<T>`.
    ptr: NonNull<ValueData<Erased>>,

    /// Marker to tell the compiler that we should
    /// behave the same as a `&'a mut ValueData<Erased>`
    _marker: core::marker::PhantomData<&'a mut ValueData<Erased>>,
}

impl<'a> RawValueMut<'a> {
    /// Casts the [`RawValueMut`] to a mutable [`ValueData<T>`] reference.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The type `T` matches the actual value type stored in the
    ///    [`ValueData`]
    #[inline]
    pub(super) unsafe fn cast_inner<T>(self) -> &'a mut ValueData<T> {
        // Debug assertion to catch type mismatches in case of bugs
        debug_assert_eq!(self.as_ref().vtable().type_id(), TypeId::of::<T>());

        let mut this = self.ptr.cast::<ValueData<T>>();

        // SAFETY: Converting the NonNull pointer to a mutable reference is sound
        // because:
        // - The pointer is non-null, properly aligned, and dereferenceable (guaranteed
        //   by RawValueMut's type invariants)
        // - The pointee is properly initialized (RawValueMut's doc comment guarantees
        //   it points to an initialized ValueData<T> for some T)
        // - The type `T` matches the actual value type (guaranteed by caller)
        // - Exclusive access is guaranteed
        // - The reference lifetime 'a is valid (tied to RawValueMut<'a>'s lifetime)
        unsafe { this.as_mut() }
    }

    /// Reborrows the mutable reference to the [`ValueData`] with a shorter
    /// lifetime.
    #[inline]
    pub fn reborrow<'b>(&'b mut self) -> RawValueMut<'b> {
        RawValueMut {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Returns a shared reference to the [`ValueData`] instance.
    #[inline]
    pub fn as_ref(&self) -> RawValueRef<'_> {
        RawValueRef {
            ptr: self.ptr,
            _marker: core::marker::PhantomData,
        }
    }

    /// Drives the held value by using the [`DriveHandler::drive`] method
    /// specified by the handler used to create the [`ValueData`].
    #[inline]
    pub fn drive(self) {
        let vtable = self.as_ref().vtable();

        // SAFETY:
        // 1. The vtable returned by `self.as_ref().vtable()` is guaranteed to match the
        //    data in the `ValueData`.
        unsafe { vtable.drive(self) }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{rc::Rc, string::String, vec::Vec};
    use core::cell::{Cell, RefCell};

    use super::*;
    use crate::handlers::DriveHandler;

    struct Increment;
    impl DriveHandler<i32> for Increment {
        fn drive(value: &mut i32) {
            *value += 1;
        }
    }

    struct PushLetter;
    impl DriveHandler<String> for PushLetter {
        fn drive(value: &mut String) {
            value.push('x');
        }
    }

    /// Value which records its drives and drops in shared cells.
    #[derive(Clone)]
    struct Probe {
        drops: Rc<Cell<usize>>,
        log: Rc<RefCell<Vec<u32>>>,
        id: u32,
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    struct LogId;
    impl DriveHandler<Probe> for LogId {
        fn drive(value: &mut Probe) {
            value.log.borrow_mut().push(value.id);
        }
    }

    fn read_i32(raw: &mut RawValue) -> i32 {
        // SAFETY: Every caller in this module created `raw` from an `i32`.
        unsafe { *raw.as_mut().value_downcast_unchecked::<i32>() }
    }

    #[test]
    fn test_raw_value_size() {
        assert_eq!(
            core::mem::size_of::<RawValue>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawValue>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Result<String, RawValue>>(),
            core::mem::size_of::<String>()
        );
        assert_eq!(
            core::mem::size_of::<RawValueRef<'_>>(),
            core::mem::size_of::<usize>()
        );
        assert_eq!(
            core::mem::size_of::<Option<RawValueMut<'_>>>(),
            core::mem::size_of::<usize>()
        );
    }

    #[test]
    fn test_raw_value_get_refs() {
        let value = RawValue::new::<i32, Increment>(100);
        let value_ref = value.as_ref();

        // Accessing the pointer multiple times should be safe and consistent
        let ptr1 = value_ref.as_ptr();
        let ptr2 = value_ref.as_ptr();
        assert_eq!(ptr1, ptr2);
        assert_eq!(value_ref.data_ptr(), ptr1.cast::<()>());
    }

    #[test]
    fn test_raw_value_drive() {
        let mut value = RawValue::new::<i32, Increment>(41);
        value.as_mut().drive();
        assert_eq!(read_i32(&mut value), 42);

        let mut text = RawValue::new::<String, PushLetter>(String::from("ab"));
        text.as_mut().drive();
        text.as_mut().drive();
        // SAFETY: `text` was created from a `String`.
        let inner = unsafe { text.as_mut().value_downcast_unchecked::<String>() };
        assert_eq!(inner.as_str(), "abxx");
    }

    #[test]
    fn test_raw_value_clone_is_deep() {
        let mut original = RawValue::new::<i32, Increment>(1);
        let mut copy = original.clone();

        assert_ne!(original.as_ref().data_ptr(), copy.as_ref().data_ptr());
        assert!(core::ptr::eq(original.as_ref().vtable(), copy.as_ref().vtable()));

        copy.as_mut().drive();
        copy.as_mut().drive();
        original.as_mut().drive();

        assert_eq!(read_i32(&mut original), 2);
        assert_eq!(read_i32(&mut copy), 3);
    }

    #[test]
    fn test_raw_value_move_keeps_allocation() {
        let value = RawValue::new::<i32, Increment>(5);
        let before = value.as_ref().data_ptr();
        let moved = value;
        assert_eq!(moved.as_ref().data_ptr(), before);
    }

    #[test]
    fn test_raw_value_mut_reborrow() {
        let mut value = RawValue::new::<i32, Increment>(0);
        let expected = value.as_ref().data_ptr();
        let mut value_mut = value.as_mut();
        value_mut.reborrow().drive();
        value_mut.reborrow().drive();
        assert_eq!(value_mut.as_ref().data_ptr(), expected);
        assert_eq!(read_i32(&mut value), 2);
    }

    #[test]
    fn test_raw_value_drops_exactly_once() {
        let drops = Rc::new(Cell::new(0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let probe = Probe {
            drops: drops.clone(),
            log: log.clone(),
            id: 3,
        };

        let mut first = RawValue::new::<Probe, LogId>(probe);
        let mut second = first.clone();
        first.as_mut().drive();
        second.as_mut().drive();
        assert_eq!(*log.borrow(), [3, 3]);
        assert_eq!(drops.get(), 0);

        drop(first);
        assert_eq!(drops.get(), 1);
        drop(second);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawValue: Send, Sync);
        static_assertions::assert_not_impl_any!(RawValueRef<'_>: Send, Sync);
        static_assertions::assert_not_impl_any!(RawValueMut<'_>: Send, Sync);
    }
}
