//! Typed access to the content of a container.
//!
//! Matching is exact: a `u32` is never handed out as an `i32`, and nothing
//! is ever matched against the "no type" sentinel.
//!
//! The pointer-like helpers ([`any_cast`], [`any_cast_mut`]) return `None` on
//! mismatch. The reference and value helpers treat a mismatch as a bug in
//! the caller and panic; use [`BasicAny::type_info`] or the `try_` variants
//! when the type is not known for sure.

use crate::any::{Any, BasicAny, Policy};
use crate::error::CastError;
use crate::type_info::type_id;

impl<const N: usize> BasicAny<N> {
    /// Shared reference to the held `T`, for every policy.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.try_downcast_ref().ok()
    }

    /// Mutable reference to the held `T`.
    ///
    /// `None` on mismatch and for const aliases.
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.try_downcast_mut().ok()
    }

    /// Like [`BasicAny::downcast_ref`], reporting why the cast failed.
    pub fn try_downcast_ref<T: 'static>(&self) -> Result<&T, CastError> {
        self.check::<T>()?;
        // SAFETY: the container holds a live `T`.
        unsafe { self.data().cast::<T>().as_ref() }.ok_or(CastError::Empty)
    }

    /// Like [`BasicAny::downcast_mut`], reporting why the cast failed.
    pub fn try_downcast_mut<T: 'static>(&mut self) -> Result<&mut T, CastError> {
        self.check::<T>()?;
        if self.policy() == Policy::ConstRef {
            return Err(CastError::ConstAlias(self.type_info()));
        }
        // SAFETY: the container holds a live `T` it may hand out mutably.
        unsafe { self.data_mut().cast::<T>().as_mut() }.ok_or(CastError::Empty)
    }

    fn check<T: 'static>(&self) -> Result<(), CastError> {
        let expected = type_id::<T>();
        let found = self.type_info();
        if !self.has_value() {
            Err(CastError::Empty)
        } else if expected != found {
            Err(CastError::TypeMismatch { expected, found })
        } else {
            Ok(())
        }
    }
}

/// Shared reference to the held `T`, `None` on mismatch.
pub fn any_cast<T: 'static>(any: &Any) -> Option<&T> {
    any.downcast_ref()
}

/// Mutable reference to the held `T`, `None` on mismatch or for const aliases.
pub fn any_cast_mut<T: 'static>(any: &mut Any) -> Option<&mut T> {
    any.downcast_mut()
}

/// Shared reference to the held `T`.
///
/// # Panics
///
/// If the container does not hold a `T`.
pub fn any_cast_ref<T: 'static>(any: &Any) -> &T {
    any.try_downcast_ref().unwrap_or_else(|err| panic!("{}", err))
}

/// Mutable reference to the held `T`.
///
/// # Panics
///
/// If the container does not hold a `T`, or is a const alias.
pub fn any_cast_ref_mut<T: 'static>(any: &mut Any) -> &mut T {
    any.try_downcast_mut().unwrap_or_else(|err| panic!("{}", err))
}

/// Copy of the held `T`.
///
/// # Panics
///
/// If the container does not hold a `T`.
pub fn any_cast_value<T: Clone + 'static>(any: &Any) -> T {
    any_cast_ref::<T>(any).clone()
}

/// The held `T`, moved out of an owning container and copied out of an alias.
///
/// # Panics
///
/// If the container does not hold a `T`.
pub fn any_cast_into<T: Clone + 'static>(any: Any) -> T {
    match any.downcast::<T>() {
        Ok(value) => value,
        Err(any) => any_cast_value(&any),
    }
}

/// Checked [`any_cast_ref`].
pub fn try_any_cast_ref<T: 'static>(any: &Any) -> Result<&T, CastError> {
    any.try_downcast_ref()
}

/// Checked [`any_cast_ref_mut`].
pub fn try_any_cast_mut<T: 'static>(any: &mut Any) -> Result<&mut T, CastError> {
    any.try_downcast_mut()
}

/// Creates an alias of the value held by `any`, without copying it.
///
/// The alias is mutable unless `any` is itself a const alias. An empty
/// argument gives an empty result.
///
/// An owned value stored inline is first moved into a box, so the alias
/// never points into `any` itself. Both can then be used side by side, and
/// `any` may even be moved or swapped while the alias is alive.
///
/// # Safety
///
/// The aliased value must outlive the returned container and every copy of
/// it: `any` must not be reset, reassigned or dropped in the meantime, and
/// if `any` is an alias the value it refers to must stay alive and in
/// place. Writes through one side must not overlap with references obtained
/// from the other side that are still in use.
///
/// ```
/// use erased_any::{any_cast_ref_mut, any_cast_value, as_ref, Any};
///
/// let mut any = Any::new(3);
/// let alias = unsafe { as_ref(&mut any) };
///
/// *any_cast_ref_mut::<i32>(&mut any) = 9;
///
/// assert_eq!(any_cast_value::<i32>(&alias), 9);
/// ```
pub unsafe fn as_ref<const N: usize>(any: &mut BasicAny<N>) -> BasicAny<N> {
    any.spill();
    let Some(vtable) = any.vtable() else {
        return BasicAny::empty();
    };

    let policy = match any.policy() {
        Policy::ConstRef => Policy::ConstRef,
        Policy::Owner | Policy::Ref => Policy::Ref,
    };
    let pointer = match policy {
        Policy::ConstRef => any.data().cast_mut(),
        _ => any.data_mut(),
    };

    BasicAny::alias(pointer, any.type_info(), policy, vtable)
}

/// Creates a const alias of the value held by `any`, without copying it.
///
/// # Safety
///
/// Same as [`as_ref`], and the value must not be mutated while the alias
/// is used. Unlike [`as_ref`] this cannot move an inline value out of
/// `any`: when `any` owns a value stored inline, the alias points into
/// `any` itself, which then must neither move nor be borrowed mutably
/// until the alias is no longer used. Take a const alias of an alias made
/// by [`as_ref`], or store the value with [`BasicAny::new_boxed`], to lift
/// that restriction.
pub unsafe fn as_cref<const N: usize>(any: &BasicAny<N>) -> BasicAny<N> {
    match any.vtable() {
        Some(vtable) => BasicAny::alias(
            any.data().cast_mut(),
            any.type_info(),
            Policy::ConstRef,
            vtable,
        ),
        None => BasicAny::empty(),
    }
}
