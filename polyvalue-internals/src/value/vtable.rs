//! Vtable for type-erased value operations.
//!
//! This module contains the [`ValueVtable`] which enables driving, cloning and
//! dropping values when their concrete type `T` and handler type `H` have been
//! erased. The vtable stores function pointers that dispatch to the correct
//! typed implementations.
//!
//! This module encapsulates the fields of [`ValueVtable`] so they cannot be
//! accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's type parameters must match the actual value type
//! and handler stored in the [`ValueData`]**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`ValueVtable::new`], which pairs the function pointers
//! with specific types `T` and `H` at compile time.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{
    handlers::DriveHandler,
    util::Erased,
    value::{
        data::ValueData,
        raw::{RawValue, RawValueMut, RawValueRef},
    },
};

/// Vtable for type-erased value operations.
///
/// Contains function pointers for performing operations on values without
/// knowing their concrete type at compile time.
///
/// # Safety Invariant
///
/// The fields `drop`, `clone` and `drive` are guaranteed to point to the
/// functions defined below instantiated with the value type `T` and handler
/// type `H` that were used to create this [`ValueVtable`].
pub(crate) struct ValueVtable {
    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`ValueVtable`].
    type_id: fn() -> TypeId,
    /// Drops the [`Box<ValueData<T>>`] instance pointed to by this pointer.
    drop: unsafe fn(NonNull<ValueData<Erased>>),
    /// Allocates a new [`Box<ValueData<T>>`] holding a clone of the value.
    clone: unsafe fn(RawValueRef<'_>) -> RawValue,
    /// Drives the value using the `drive` method on the handler.
    drive: unsafe fn(RawValueMut<'_>),
}

impl ValueVtable {
    /// Creates a new [`ValueVtable`] for the value type `T` and the handler
    /// type `H`.
    pub(super) const fn new<T: Clone + 'static, H: DriveHandler<T>>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<T>,
                drop: drop::<T>,
                clone: clone::<T>,
                drive: drive::<T, H>,
            }
        }
    }

    /// Gets the [`TypeId`] of the value type that was used to create this
    /// [`ValueVtable`].
    #[inline]
    pub(super) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Drops the `Box<ValueData<T>>` instance pointed to by this pointer.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from [`Box<ValueData<T>>`] via [`Box::into_raw`]
    /// 2. This [`ValueVtable`] must be a vtable for the value type stored in
    ///    the [`ValueData`].
    /// 3. This method drops the [`Box<ValueData<T>>`], so the caller must
    ///    ensure that the pointer has not previously been dropped, that it is
    ///    able to transfer ownership of the pointer, and that it will not use
    ///    the pointer after calling this method.
    #[inline]
    pub(super) unsafe fn drop(&self, ptr: NonNull<ValueData<Erased>>) {
        // SAFETY: We know that `self.drop` points to the function `drop::<T>` below.
        // That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        // 3. Guaranteed by the caller
        unsafe {
            (self.drop)(ptr);
        }
    }

    /// Copy-constructs the value pointed to by `ptr` into a new allocation.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the value type stored in
    ///    the [`RawValueRef`].
    #[inline]
    pub(super) unsafe fn clone(&self, ptr: RawValueRef<'_>) -> RawValue {
        // SAFETY: We know that the `self.clone` field points to the function
        // `clone::<T>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.clone)(ptr) }
    }

    /// Drives the value using the [`H::drive`] function used when creating
    /// this [`ValueVtable`].
    ///
    /// [`H::drive`]: DriveHandler::drive
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This [`ValueVtable`] must be a vtable for the value type stored in
    ///    the [`RawValueMut`].
    #[inline]
    pub(super) unsafe fn drive(&self, ptr: RawValueMut<'_>) {
        // SAFETY: We know that the `self.drive` field points to the function
        // `drive::<T, H>` below. That function's safety requirements are upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.drive)(ptr) }
    }
}

/// Drops the [`Box<ValueData<T>>`] instance pointed to by this pointer.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from [`Box<ValueData<T>>`] via [`Box::into_raw`]
/// 2. The value type `T` matches the actual value type stored in the
///    [`ValueData`]
/// 3. This method drops the [`Box<ValueData<T>>`], so the caller must ensure
///    that the pointer has not previously been dropped, that it is able to
///    transfer ownership of the pointer, and that it will not use the pointer
///    after calling this method.
unsafe fn drop<T: 'static>(ptr: NonNull<ValueData<Erased>>) {
    let ptr: NonNull<ValueData<T>> = ptr.cast();
    let ptr = ptr.as_ptr();
    // SAFETY: Our pointer has the correct type as guaranteed by the caller, and it
    // came from a call to `Box::into_raw` as also guaranteed by our caller.
    let boxed = unsafe { Box::from_raw(ptr) };
    core::mem::drop(boxed);
}

/// Copy-constructs the [`ValueData<T>`] behind `ptr` into a fresh box.
///
/// If `T::clone` panics, nothing has been allocated yet and the source is
/// left untouched.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `T` matches the actual value type stored in the [`ValueData`]
unsafe fn clone<T: Clone + 'static>(ptr: RawValueRef<'_>) -> RawValue {
    // SAFETY:
    // 1. Guaranteed by the caller
    let data: &ValueData<T> = unsafe { ptr.cast_inner::<T>() };
    RawValue::from_box(Box::new(data.duplicate()))
}

/// Drives a value using its handler's drive implementation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The type `T` matches the actual value type stored in the [`ValueData`]
unsafe fn drive<T: 'static, H: DriveHandler<T>>(ptr: RawValueMut<'_>) {
    // SAFETY:
    // 1. Guaranteed by the caller
    let value: &mut T = unsafe { ptr.value_downcast_unchecked::<T>() };
    H::drive(value);
}
