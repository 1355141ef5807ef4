use polyvalue_internals::RawValue;

use crate::{
    Drive,
    handlers::{self, DriveHandler},
    markers::{Local, ObjectMarkerFor, SendSync},
};

/// Keeps `raw` private to this module so only `from_raw` can pair it with a
/// thread-safety marker. This can become an unsafe field once
/// rust-lang/rust#132922 lands.
mod limit_field_access {
    use core::marker::PhantomData;

    use polyvalue_internals::{RawValue, RawValueMut, RawValueRef};

    use crate::markers::SendSync;

    /// A value of some concrete type, erased behind a single capability, with
    /// ordinary value semantics.
    ///
    /// A `PolymorphicValue` owns exactly one value of a type chosen when it
    /// was created. The type is then forgotten: the container can hold a
    /// `Car` now and a `Truck` after reassignment, and callers only ever see
    /// [`drive`](PolymorphicValue::drive).
    ///
    /// - **Cloning** copy-constructs the held value into a new allocation.
    ///   The copy and the original never share state.
    /// - **Moving** transfers the existing allocation. Nothing is cloned.
    /// - **Dropping** drops the held value.
    ///
    /// There is no empty state. A binding that has been moved out of cannot
    /// be used again, which the compiler checks. Use
    /// `Option<PolymorphicValue>` when a slot may be vacant; it is the same
    /// size as `PolymorphicValue`.
    ///
    /// # Type Parameters
    /// - `ThreadSafety`: The thread safety marker for the held value. This
    ///   can either be [`SendSync`] or [`Local`].
    ///
    /// [`SendSync`]: crate::markers::SendSync
    /// [`Local`]: crate::markers::Local
    #[repr(transparent)]
    pub struct PolymorphicValue<ThreadSafety: 'static = SendSync> {
        /// # Safety
        ///
        /// The following safety invariants are guaranteed to be upheld as long
        /// as this struct exists:
        ///
        /// 1. `T` must either be `SendSync` or `Local`.
        /// 2. If `T = SendSync`: The value embedded in the [`RawValue`] must be
        ///    `Send + Sync`.
        raw: RawValue,
        _thread_safety: PhantomData<ThreadSafety>,
    }

    impl<T> PolymorphicValue<T> {
        /// Creates a new value from a raw value
        ///
        /// # Safety
        ///
        /// The caller must ensure:
        ///
        /// 1. `T` must either be `SendSync` or `Local`.
        /// 2. If `T = SendSync`: The value embedded in the [`RawValue`] must be
        ///    `Send + Sync`.
        #[must_use]
        pub(crate) unsafe fn from_raw(raw: RawValue) -> Self {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Guaranteed by caller
            // 2. Guaranteed by caller
            PolymorphicValue {
                raw,
                _thread_safety: PhantomData,
            }
        }

        /// Consumes the [`PolymorphicValue`] and returns the inner
        /// [`RawValue`].
        #[must_use]
        pub(crate) fn into_raw(self) -> RawValue {
            // SAFETY: We are destroying `self`, so we no longer
            // need to uphold any safety invariants.
            self.raw
        }

        /// Creates a lifetime-bound [`RawValueRef`] from the inner
        /// [`RawValue`].
        #[must_use]
        pub(crate) fn as_raw_ref(&self) -> RawValueRef<'_> {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Upheld as the type parameters do not change.
            // 2. A `RawValueRef` cannot change the held value.
            let raw = &self.raw;

            raw.as_ref()
        }

        /// Creates a lifetime-bound [`RawValueMut`] from the inner
        /// [`RawValue`].
        #[must_use]
        pub(crate) fn as_raw_mut(&mut self) -> RawValueMut<'_> {
            // SAFETY: We must uphold the safety invariants of the raw field:
            // 1. Upheld as the type parameters do not change.
            // 2. A `RawValueMut` can only drive the held value, it cannot
            //    replace it with a value of another type.
            let raw = &mut self.raw;

            raw.as_mut()
        }
    }
}
pub use limit_field_access::PolymorphicValue;

impl<T> PolymorphicValue<T> {
    /// Wraps `value` in a new [`PolymorphicValue`].
    ///
    /// The container will drive the value through its own [`Drive`]
    /// implementation (the [`handlers::Forward`] handler). See
    /// [`PolymorphicValue::new_custom`] if you want to control the handler
    /// used.
    ///
    /// The thread-safety marker is usually given by a type annotation. When
    /// inference needs help, use [`PolymorphicValue::new_sendsync`] or
    /// [`PolymorphicValue::new_local`].
    ///
    /// # Examples
    /// ```
    /// use polyvalue::prelude::*;
    ///
    /// #[derive(Clone)]
    /// struct Scooter;
    ///
    /// impl Drive for Scooter {
    ///     fn drive(&mut self) {
    ///         println!("Beep beep");
    ///     }
    /// }
    ///
    /// let mut value: PolymorphicValue = PolymorphicValue::new(Scooter);
    /// value.drive();
    /// ```
    ///
    /// The value must implement [`Drive`]:
    ///
    /// ```compile_fail
    /// use polyvalue::prelude::*;
    ///
    /// #[derive(Clone)]
    /// struct Parked;
    ///
    /// // Parked has no Drive implementation
    /// let value: PolymorphicValue = PolymorphicValue::new(Parked);
    /// ```
    ///
    /// It must also implement [`Clone`], since cloning the container clones
    /// the value:
    ///
    /// ```compile_fail
    /// use polyvalue::prelude::*;
    ///
    /// struct Prototype;
    ///
    /// impl Drive for Prototype {
    ///     fn drive(&mut self) {}
    /// }
    ///
    /// // Prototype is not Clone
    /// let value: PolymorphicValue = PolymorphicValue::new(Prototype);
    /// ```
    #[must_use]
    pub fn new<V>(value: V) -> Self
    where
        V: Drive + Clone + ObjectMarkerFor<T>,
    {
        Self::new_custom::<V, handlers::Forward>(value)
    }

    /// Wraps `value` in a new [`PolymorphicValue`] which drives it with the
    /// handler `H`.
    ///
    /// # Examples
    /// ```
    /// use polyvalue::{PolymorphicValue, handlers::DriveHandler};
    ///
    /// #[derive(Clone)]
    /// struct Barge {
    ///     cargo: Vec<&'static str>,
    /// }
    ///
    /// struct Unload;
    ///
    /// impl DriveHandler<Barge> for Unload {
    ///     fn drive(value: &mut Barge) {
    ///         value.cargo.pop();
    ///     }
    /// }
    ///
    /// let mut value: PolymorphicValue = PolymorphicValue::new_custom::<_, Unload>(Barge {
    ///     cargo: vec!["coal", "grain"],
    /// });
    /// value.drive();
    /// ```
    ///
    /// The handler must implement [`DriveHandler`] for the value's type:
    ///
    /// ```compile_fail
    /// use polyvalue::{PolymorphicValue, handlers::DriveHandler};
    ///
    /// #[derive(Clone)]
    /// struct Barge;
    ///
    /// #[derive(Clone)]
    /// struct Ferry;
    ///
    /// struct Unload;
    ///
    /// impl DriveHandler<Barge> for Unload {
    ///     fn drive(_value: &mut Barge) {}
    /// }
    ///
    /// // Unload only knows how to drive a Barge
    /// let value: PolymorphicValue = PolymorphicValue::new_custom::<_, Unload>(Ferry);
    /// ```
    #[must_use]
    pub fn new_custom<V, H>(value: V) -> Self
    where
        V: Clone + ObjectMarkerFor<T>,
        H: DriveHandler<V>,
    {
        trace_event!(
            value_type = core::any::type_name::<V>(),
            "wrapping value in PolymorphicValue"
        );

        let raw = RawValue::new::<V, H>(value);

        // SAFETY:
        // 1. `V` is bounded by `ObjectMarkerFor<T>` and this can only be
        //    implemented for `T=Local` and `T=SendSync`, so this is upheld.
        // 2. If `T=Local`, then this is trivially true. If `T=SendSync`, then the
        //    bound `V: ObjectMarkerFor<SendSync>` guarantees that the value is
        //    `Send+Sync`.
        unsafe { PolymorphicValue::from_raw(raw) }
    }

    /// Drives the held value.
    ///
    /// The call is dispatched to the handler chosen at construction. For
    /// values created with [`PolymorphicValue::new`], that is the value's own
    /// [`Drive::drive`]. A panic raised by the value propagates unchanged.
    ///
    /// # Examples
    /// ```
    /// use std::sync::{Arc, Mutex};
    ///
    /// use polyvalue::prelude::*;
    ///
    /// #[derive(Clone)]
    /// struct Bus {
    ///     stops: Arc<Mutex<Vec<&'static str>>>,
    /// }
    ///
    /// impl Drive for Bus {
    ///     fn drive(&mut self) {
    ///         self.stops.lock().unwrap().push("next stop");
    ///     }
    /// }
    ///
    /// let stops = Arc::new(Mutex::new(Vec::new()));
    /// let mut value: PolymorphicValue = PolymorphicValue::new(Bus { stops: stops.clone() });
    /// value.drive();
    /// assert_eq!(*stops.lock().unwrap(), ["next stop"]);
    /// ```
    #[inline]
    pub fn drive(&mut self) {
        trace_event!("driving PolymorphicValue");
        self.as_raw_mut().drive();
    }

    /// Replaces the held value with the one held by `other` and returns the
    /// previous contents.
    ///
    /// This is a move-assignment which hands the old value back instead of
    /// dropping it. Neither value is cloned.
    ///
    /// # Examples
    /// ```
    /// use polyvalue::prelude::*;
    ///
    /// #[derive(Clone)]
    /// struct Car;
    ///
    /// impl Drive for Car {
    ///     fn drive(&mut self) {}
    /// }
    ///
    /// #[derive(Clone)]
    /// struct Truck;
    ///
    /// impl Drive for Truck {
    ///     fn drive(&mut self) {}
    /// }
    ///
    /// let mut garage = PolymorphicValue::new_sendsync(Car);
    /// let car = garage.replace(PolymorphicValue::new_sendsync(Truck));
    /// assert!(!car.ptr_eq(&garage));
    /// ```
    #[must_use = "the previous value is returned; use `=` to drop it instead"]
    #[inline]
    pub fn replace(&mut self, other: Self) -> Self {
        core::mem::replace(self, other)
    }

    /// Changes the thread safety mode of the [`PolymorphicValue`] to
    /// [`Local`].
    ///
    /// This method does not actually modify the held value in any way, and
    /// does not reallocate. It only has the effect of "forgetting" that the
    /// held value might actually be [`Send`] and [`Sync`].
    #[must_use]
    pub fn into_local(self) -> PolymorphicValue<Local> {
        let raw = self.into_raw();

        // SAFETY:
        // 1. `T=Local`, so this is trivially true.
        // 2. `T=Local`, so this is trivially true.
        unsafe { PolymorphicValue::from_raw(raw) }
    }

    /// Returns the address of the allocation owned by this container.
    ///
    /// The address stays the same when the container is moved and is
    /// different for every clone. It is meant for identity checks only and
    /// must not be dereferenced.
    #[must_use]
    #[inline]
    pub fn as_ptr(&self) -> *const () {
        self.as_raw_ref().data_ptr()
    }

    /// Returns `true` if both containers own the same allocation.
    ///
    /// Since containers never share their allocation, this is only `true`
    /// when comparing a container with itself. In particular a container and
    /// its clone are never `ptr_eq`.
    #[must_use]
    #[inline]
    pub fn ptr_eq<U>(&self, other: &PolymorphicValue<U>) -> bool {
        core::ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl PolymorphicValue<SendSync> {
    /// Creates a new [`PolymorphicValue`] with [`SendSync`] thread safety.
    ///
    /// This is a convenience method that calls [`PolymorphicValue::new`] with
    /// explicit [`SendSync`] thread safety. Use this method when you're
    /// having trouble with type inference for the thread safety parameter.
    #[must_use]
    pub fn new_sendsync<V>(value: V) -> Self
    where
        V: Drive + Clone + Send + Sync + 'static,
    {
        Self::new(value)
    }

    /// Creates a new [`PolymorphicValue`] with [`SendSync`] thread safety and
    /// the given handler.
    ///
    /// This is a convenience method that calls
    /// [`PolymorphicValue::new_custom`] with explicit [`SendSync`] thread
    /// safety.
    #[must_use]
    pub fn new_sendsync_custom<V, H>(value: V) -> Self
    where
        V: Clone + Send + Sync + 'static,
        H: DriveHandler<V>,
    {
        Self::new_custom::<V, H>(value)
    }
}

impl PolymorphicValue<Local> {
    /// Creates a new [`PolymorphicValue`] with [`Local`] thread safety.
    ///
    /// This is a convenience method that calls [`PolymorphicValue::new`] with
    /// explicit [`Local`] thread safety. Use this method when you're having
    /// trouble with type inference for the thread safety parameter.
    #[must_use]
    pub fn new_local<V>(value: V) -> Self
    where
        V: Drive + Clone + 'static,
    {
        Self::new(value)
    }

    /// Creates a new [`PolymorphicValue`] with [`Local`] thread safety and the
    /// given handler.
    ///
    /// This is a convenience method that calls
    /// [`PolymorphicValue::new_custom`] with explicit [`Local`] thread safety.
    #[must_use]
    pub fn new_local_custom<V, H>(value: V) -> Self
    where
        V: Clone + 'static,
        H: DriveHandler<V>,
    {
        Self::new_custom::<V, H>(value)
    }
}

impl<T> Clone for PolymorphicValue<T> {
    /// Copy-constructs the held value into a new, independently owned
    /// [`PolymorphicValue`].
    ///
    /// If the value's [`Clone`] implementation panics, no container is created
    /// and `self` is left untouched. The default `clone_from` clones before
    /// dropping the old value, so `a.clone_from(&b)` has the same guarantee
    /// for `a`.
    fn clone(&self) -> Self {
        trace_event!("cloning PolymorphicValue");

        let raw = self.as_raw_ref().clone_value();

        // SAFETY:
        // 1. Guaranteed by the invariants of this type.
        // 2. The clone holds a value of the same type as `self`, which is
        //    `Send+Sync` if `T=SendSync` by the invariants of this type.
        unsafe { PolymorphicValue::from_raw(raw) }
    }
}

impl<T> Drive for PolymorphicValue<T> {
    #[inline]
    fn drive(&mut self) {
        PolymorphicValue::drive(self);
    }
}

impl<T> core::fmt::Debug for PolymorphicValue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PolymorphicValue").finish_non_exhaustive()
    }
}

// SAFETY: The `SendSync` marker indicates that the held value is `Send+Sync`.
// Therefore it is safe to implement `Send` for the container.
unsafe impl Send for PolymorphicValue<SendSync> {}

// SAFETY: The `SendSync` marker indicates that the held value is `Send+Sync`.
// A shared reference only allows cloning the value and reading its address,
// both of which only need `&V`. Therefore it is safe to implement `Sync` for
// the container.
unsafe impl Sync for PolymorphicValue<SendSync> {}

impl<T> Unpin for PolymorphicValue<T> {}
