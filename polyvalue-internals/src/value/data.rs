//! This module encapsulates the fields of the [`ValueData`]. Since this is
//! the only place they are visible, the [`ValueVtable`] is guaranteed to
//! always be in sync with the type of the value stored next to it. They are
//! in sync when created, the API offers no way to change the [`ValueVtable`]
//! or the value type after creation, and [`ValueData::duplicate`] copies the
//! vtable together with a value of the same type.

use crate::{
    handlers::DriveHandler,
    value::{
        raw::{RawValueMut, RawValueRef},
        vtable::ValueVtable,
    },
};

/// Type-erased value data structure with vtable-based dispatch.
///
/// This struct uses `#[repr(C)]` to enable safe field access in type-erased
/// contexts, allowing access to the vtable field even when the concrete
/// value type `T` is unknown.
#[repr(C)]
pub(super) struct ValueData<T: 'static> {
    /// The Vtable of this value
    vtable: &'static ValueVtable,
    /// The actual held value
    value: T,
}

impl<T: 'static> ValueData<T> {
    /// Creates a new [`ValueData`] which drives `value` using the handler `H`.
    #[inline]
    pub(super) fn new<H: DriveHandler<T>>(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            vtable: ValueVtable::new::<T, H>(),
            value,
        }
    }

    /// Copy-constructs a new [`ValueData`] from this one.
    ///
    /// The new instance shares the `&'static` vtable but owns an independent
    /// clone of the value.
    #[inline]
    pub(super) fn duplicate(&self) -> Self
    where
        T: Clone,
    {
        Self {
            vtable: self.vtable,
            value: self.value.clone(),
        }
    }
}

impl<'a> RawValueRef<'a> {
    /// Returns a reference to the [`ValueVtable`] of the [`ValueData`]
    /// instance.
    #[inline]
    pub(super) fn vtable(self) -> &'static ValueVtable {
        let ptr = self.as_ptr();
        // SAFETY: We don't know the actual inner value type, but we do know
        // that it points to an instance of `ValueData<T>` for some specific `T`.
        // Since `ValueData<T>` is `#[repr(C)]`, that means that it's
        // safe to create pointers to the fields before the actual value.
        //
        // We need to take care to avoid creating an actual reference to
        // the `ValueData` itself though, as that would still be undefined behavior
        // since we don't have the right type.
        let vtable_ptr: *const &'static ValueVtable = unsafe { &raw const (*ptr).vtable };

        // SAFETY: Dereferencing the pointer and getting out the `&'static
        // ValueVtable` is valid for the same reasons
        unsafe { *vtable_ptr }
    }
}

impl<'a> RawValueMut<'a> {
    /// Accesses the inner value of the [`ValueData`] instance as a mutable
    /// reference to the specified type.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the type `T` matches the actual value type
    /// stored in the [`ValueData`].
    #[inline]
    pub(super) unsafe fn value_downcast_unchecked<T: 'static>(self) -> &'a mut T {
        // SAFETY: The inner function requires that `T` matches the type stored, but
        // that is guaranteed by our caller.
        let this = unsafe { self.cast_inner::<T>() };
        &mut this.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_field_offsets() {
        use core::mem::{offset_of, size_of};

        #[repr(align(32))]
        struct LargeAlignment {
            _value: u8,
        }

        assert_eq!(offset_of!(ValueData<u8>, vtable), 0);
        assert_eq!(offset_of!(ValueData<u32>, vtable), 0);
        assert_eq!(offset_of!(ValueData<[u64; 4]>, vtable), 0);
        assert_eq!(offset_of!(ValueData<LargeAlignment>, vtable), 0);

        assert!(offset_of!(ValueData<u8>, value) >= size_of::<&'static ValueVtable>());
        assert!(offset_of!(ValueData<[u64; 4]>, value) >= size_of::<&'static ValueVtable>());
        assert!(
            offset_of!(ValueData<LargeAlignment>, value) >= size_of::<&'static ValueVtable>()
        );
    }

    #[test]
    fn test_duplicate_keeps_vtable() {
        struct Noop;
        impl DriveHandler<u32> for Noop {
            fn drive(_value: &mut u32) {}
        }

        let original = ValueData::new::<Noop>(7u32);
        let copy = original.duplicate();

        assert!(core::ptr::eq(original.vtable, copy.vtable));
        assert_eq!(copy.value, 7);
        assert!(!core::ptr::eq(&original.value, &copy.value));
    }
}
