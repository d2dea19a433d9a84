//! Per-type operation tables.
//!
//! A container never knows the type it holds. Everything type specific goes
//! through a single function generated for the held type, selected when the
//! value is stored and kept as a plain function pointer.

use crate::storage::{in_place, Storage};
use std::ptr;

/// Operations understood by a [`Vtable`].
///
/// The meaning of the two pointer operands depends on the opcode:
///
/// | op        | `from`                 | `to`                  | returns            |
/// |-----------|------------------------|-----------------------|--------------------|
/// | `Get`     | storage owning a `T`   | unused                | address of the `T` |
/// | `Copy`    | a `T`                  | empty storage         | `to`, or null      |
/// | `Move`    | storage owning a `T`   | empty storage         | `to`               |
/// | `Destroy` | storage owning a `T`   | unused                | null               |
/// | `Take`    | storage owning a `T`   | uninitialized `T`     | `to`               |
/// | `Compare` | a `T`                  | another `T`           | `to` if equal      |
/// | `Spill`   | storage owning a `T`   | a `Vtable` slot       | `to` if boxed now  |
///
/// `Spill` moves an inline value into a box and writes the boxed table of
/// `T` to the slot; a value that is already boxed is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Get,
    Copy,
    Move,
    Destroy,
    Take,
    Compare,
    Spill,
}

pub(crate) type Vtable = unsafe fn(Op, *const (), *const ()) -> *const ();

/// Compile-time capabilities of a held type.
///
/// Rust cannot ask whether an arbitrary `T` is `Clone` or `PartialEq`, so the
/// caller picks an implementation when storing a value. A container holding a
/// value that cannot be duplicated produces an empty copy; a value that cannot
/// be compared is only ever equal to itself.
///
/// # Examples
///
/// ```
/// use erased_any::{Any, ValueOps};
///
/// // Compare strings ignoring ASCII case
/// #[derive(Clone, Copy)]
/// struct CaseInsensitive;
///
/// impl ValueOps<String> for CaseInsensitive {
///     fn duplicate(value: &String) -> Option<String> {
///         Some(value.clone())
///     }
///
///     fn equals(lhs: &String, rhs: &String) -> bool {
///         lhs.eq_ignore_ascii_case(rhs)
///     }
/// }
///
/// let lhs = Any::new_with("Hello".to_string(), CaseInsensitive);
/// let rhs = Any::new_with("HELLO".to_string(), CaseInsensitive);
/// assert_eq!(lhs, rhs);
/// ```
pub trait ValueOps<T> {
    /// Returns a copy of `value`, or `None` when `T` cannot be copied.
    fn duplicate(value: &T) -> Option<T>;

    /// Equality of two values; `false` when `T` cannot be compared.
    fn equals(lhs: &T, rhs: &T) -> bool;
}

/// Copyable and comparable values. Used by [`Any::new`](crate::Any::new).
#[derive(Debug, Clone, Copy, Default)]
pub struct Regular;

/// Comparable values that cannot be copied.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveOnly;

/// Copyable values without equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct Incomparable;

/// Values that can be neither copied nor compared.
#[derive(Debug, Clone, Copy, Default)]
pub struct Opaque;

impl<T: Clone + PartialEq> ValueOps<T> for Regular {
    fn duplicate(value: &T) -> Option<T> {
        Some(value.clone())
    }

    fn equals(lhs: &T, rhs: &T) -> bool {
        lhs == rhs
    }
}

impl<T: PartialEq> ValueOps<T> for MoveOnly {
    fn duplicate(_: &T) -> Option<T> {
        None
    }

    fn equals(lhs: &T, rhs: &T) -> bool {
        lhs == rhs
    }
}

impl<T: Clone> ValueOps<T> for Incomparable {
    fn duplicate(value: &T) -> Option<T> {
        Some(value.clone())
    }

    fn equals(_: &T, _: &T) -> bool {
        false
    }
}

impl<T> ValueOps<T> for Opaque {
    fn duplicate(_: &T) -> Option<T> {
        None
    }

    fn equals(_: &T, _: &T) -> bool {
        false
    }
}

/// The operation table of `T` stored with capabilities `O` in a
/// `Storage<N>`, boxed regardless of size when `HEAP` is set.
///
/// # Safety
///
/// The operands must match the table in [`Op`], and every storage operand
/// must come from a container whose held type is `T`. `Destroy`, `Take` and
/// `Move` leave the source storage logically empty.
pub(crate) unsafe fn basic_vtable<T: 'static, O: ValueOps<T>, const N: usize, const HEAP: bool>(
    op: Op,
    from: *const (),
    to: *const (),
) -> *const () {
    match op {
        Op::Get => {
            // SAFETY: `from` is a storage owning a `T`.
            unsafe { Storage::<N>::instance::<T, HEAP>(from as *mut Storage<N>) as *const () }
        }
        Op::Copy => {
            // SAFETY: `from` is a live `T`.
            let value = unsafe { &*from.cast::<T>() };
            match O::duplicate(value) {
                Some(copy) => {
                    // SAFETY: `to` is a distinct, writable, empty storage.
                    unsafe { (*(to as *mut Storage<N>)).emplace::<T, HEAP>(copy) };
                    to
                }
                None => ptr::null(),
            }
        }
        Op::Move => {
            let (source, target) = (from as *mut Storage<N>, to as *mut Storage<N>);
            if in_place::<T, N, HEAP>() {
                // SAFETY: both storages are distinct; the caller forgets the
                // source afterwards.
                unsafe { ptr::copy_nonoverlapping(source.cast::<T>(), target.cast::<T>(), 1) };
            } else {
                // SAFETY: the box changes hands, no allocation happens.
                unsafe { (*target).set_pointer((*source).pointer()) };
            }
            to
        }
        Op::Destroy => {
            // SAFETY: `from` owns a `T` that is dropped exactly once here.
            drop(unsafe { (*(from as *mut Storage<N>)).take::<T, HEAP>() });
            ptr::null()
        }
        Op::Take => {
            // SAFETY: `from` owns a `T` that moves into the writable `to`.
            unsafe {
                let value = (*(from as *mut Storage<N>)).take::<T, HEAP>();
                ptr::write(to as *mut T, value);
            }
            to
        }
        Op::Compare => {
            // SAFETY: both operands are live `T`s.
            let (lhs, rhs) = unsafe { (&*from.cast::<T>(), &*to.cast::<T>()) };
            if O::equals(lhs, rhs) {
                to
            } else {
                ptr::null()
            }
        }
        Op::Spill => {
            if !in_place::<T, N, HEAP>() {
                return ptr::null();
            }
            let storage = from as *mut Storage<N>;
            // SAFETY: `from` owns an inline `T`, which moves into a box in
            // the same storage; `to` is a writable `Vtable` slot.
            unsafe {
                let value = (*storage).take::<T, HEAP>();
                (*storage).emplace::<T, true>(value);
                *(to as *mut Vtable) = basic_vtable::<T, O, N, true>;
            }
            to
        }
    }
}
