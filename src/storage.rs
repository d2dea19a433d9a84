use std::mem::{self, MaybeUninit};
use std::ptr;

/// Default inline capacity, in machine words.
pub(crate) const DEFAULT_WORDS: usize = 2;

/// Bytes of a `Storage<N>`.
///
/// The buffer also holds the heap or alias pointer, so a storage is never
/// smaller than one word: `Storage<0>` and `Storage<1>` have the same size.
pub(crate) const fn capacity<const N: usize>() -> usize {
    mem::size_of::<Storage<N>>()
}

/// Raw storage of a container.
///
/// Holds either a value inline, an owning pointer to a heap box, or a
/// non-owning pointer to somebody else's value. Which one is active is tracked
/// by the owning container, never by the storage itself.
#[repr(C)]
#[derive(Clone, Copy)]
pub(crate) union Storage<const N: usize> {
    inline: [MaybeUninit<usize>; N],
    pointer: *mut (),
}

/// Whether `T` is stored inline in a `Storage<N>`.
///
/// Moves in Rust are plain bitwise copies and cannot fail, so only size and
/// alignment matter.
pub(crate) const fn is_inline<T, const N: usize>() -> bool {
    mem::size_of::<T>() <= capacity::<N>()
        && mem::align_of::<Storage<N>>() % mem::align_of::<T>() == 0
}

/// Whether a `T` is actually placed in the buffer. `HEAP` forces a box.
pub(crate) const fn in_place<T, const N: usize, const HEAP: bool>() -> bool {
    !HEAP && is_inline::<T, N>()
}

impl<const N: usize> Storage<N> {
    pub(crate) const fn new() -> Self {
        Self {
            pointer: ptr::null_mut(),
        }
    }

    /// Alias or heap pointer. Only meaningful when one of those is active.
    pub(crate) fn pointer(&self) -> *mut () {
        // SAFETY: callers only read the pointer while it is the active field.
        unsafe { self.pointer }
    }

    pub(crate) fn set_pointer(&mut self, pointer: *mut ()) {
        self.pointer = pointer;
    }

    /// Stores `value`, inline when it fits and boxed otherwise.
    ///
    /// Whatever was held before is overwritten without being dropped.
    pub(crate) fn emplace<T, const HEAP: bool>(&mut self, value: T) {
        if in_place::<T, N, HEAP>() {
            // SAFETY: size and alignment checked by `is_inline`.
            unsafe { ptr::write((self as *mut Self).cast::<T>(), value) };
        } else {
            self.pointer = Box::into_raw(Box::new(value)).cast();
        }
    }

    /// Address of an owned `T`.
    ///
    /// # Safety
    ///
    /// `this` must point to a storage holding an owned `T` put there by
    /// [`Storage::emplace`] with the same `HEAP`.
    pub(crate) unsafe fn instance<T, const HEAP: bool>(this: *mut Self) -> *mut T {
        if in_place::<T, N, HEAP>() {
            this.cast()
        } else {
            // SAFETY: guaranteed by the caller.
            unsafe { (*this).pointer.cast() }
        }
    }

    /// Moves an owned `T` out, releasing its box if any.
    ///
    /// # Safety
    ///
    /// The storage must hold an owned `T` emplaced with the same `HEAP`,
    /// which is considered moved out afterwards and must not be dropped again.
    pub(crate) unsafe fn take<T, const HEAP: bool>(&mut self) -> T {
        if in_place::<T, N, HEAP>() {
            // SAFETY: guaranteed by the caller.
            unsafe { ptr::read((self as *mut Self).cast::<T>()) }
        } else {
            // SAFETY: the pointer comes from `Box::into_raw` in `emplace`.
            *unsafe { Box::from_raw(self.pointer.cast::<T>()) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_rule() {
        assert!(is_inline::<u8, 2>());
        assert!(is_inline::<usize, 2>());
        assert!(is_inline::<[usize; 2], 2>());
        assert!(!is_inline::<[usize; 3], 2>());
        assert!(is_inline::<[usize; 3], 3>());
        assert!(is_inline::<(), 0>());
        // a zero-word storage still holds a pointer
        assert!(is_inline::<*const u8, 0>());
    }

    #[test]
    fn test_over_aligned_types_go_to_the_heap() {
        #[repr(align(64))]
        struct Wide(u8);

        assert!(!is_inline::<Wide, 16>());
    }

    #[test]
    fn test_capacity_is_at_least_one_word() {
        assert_eq!(capacity::<0>(), mem::size_of::<usize>());
        assert_eq!(capacity::<1>(), mem::size_of::<usize>());
        assert_eq!(capacity::<3>(), 3 * mem::size_of::<usize>());
    }

    #[test]
    fn test_emplace_and_take() {
        let mut small = Storage::<2>::new();
        small.emplace::<u32, false>(7);
        assert_eq!(unsafe { *Storage::<2>::instance::<u32, false>(&mut small) }, 7);
        assert_eq!(unsafe { small.take::<u32, false>() }, 7);

        let mut large = Storage::<2>::new();
        large.emplace::<String, false>(String::from("heap"));
        // String is three words, so it is boxed
        assert!(!large.pointer().is_null());
        assert_eq!(unsafe { large.take::<String, false>() }, "heap");
    }

    #[test]
    fn test_forced_heap_placement() {
        assert!(in_place::<u32, 2, false>());
        assert!(!in_place::<u32, 2, true>());

        let mut storage = Storage::<2>::new();
        storage.emplace::<u32, true>(7);
        assert!(!storage.pointer().is_null());
        assert_eq!(unsafe { *Storage::<2>::instance::<u32, true>(&mut storage) }, 7);
        assert_eq!(unsafe { storage.take::<u32, true>() }, 7);
    }
}
