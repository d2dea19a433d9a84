use crate::storage::{self, Storage, DEFAULT_WORDS};
use crate::type_info::{type_id, TypeInfo};
use crate::vtable::{basic_vtable, Op, Regular, ValueOps, Vtable};
use std::fmt;
use std::mem;
use std::ptr;

/// Ownership mode of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    /// The container owns its value, inline or on the heap
    #[default]
    Owner,
    /// The container aliases a value owned elsewhere
    Ref,
    /// The container aliases a value owned elsewhere and only grants shared access
    ConstRef,
}

/// A type-erased value with room for `N` machine words inline.
///
/// Values that fit in the inline buffer are stored in place, larger or
/// over-aligned ones are boxed. The buffer doubles as the heap pointer, so
/// it is never smaller than one word: `BasicAny<0>` stores a `usize` inline.
///
/// A container can also alias a value owned elsewhere, see
/// [`BasicAny::from_mut`] and [`BasicAny::from_ref`].
///
/// Most code uses the [`Any`] alias with the default capacity.
pub struct BasicAny<const N: usize = DEFAULT_WORDS> {
    storage: Storage<N>,
    info: TypeInfo,
    policy: Policy,
    vtable: Option<Vtable>,
}

/// A type-erased value with the default inline capacity of two words.
///
/// # Examples
///
/// ```
/// use erased_any::{any_cast, any_cast_ref_mut, type_id, Any};
///
/// let mut any = Any::new(42i32);
/// let copy = any.clone();
///
/// *any_cast_ref_mut::<i32>(&mut any) = 7;
///
/// assert_eq!(any.type_info(), type_id::<i32>());
/// assert_eq!(any_cast::<i32>(&any), Some(&7));
/// assert_eq!(any_cast::<i32>(&copy), Some(&42));
/// assert_eq!(any_cast::<u32>(&any), None);
/// ```
pub type Any = BasicAny<DEFAULT_WORDS>;

impl<const N: usize> BasicAny<N> {
    /// Creates an empty container.
    pub const fn empty() -> Self {
        Self {
            storage: Storage::new(),
            info: TypeInfo::none(),
            policy: Policy::Owner,
            vtable: None,
        }
    }

    /// Creates a container owning `value`.
    ///
    /// Storing `()` yields an empty container.
    pub fn new<T: Clone + PartialEq + 'static>(value: T) -> Self {
        Self::new_with(value, Regular)
    }

    /// Creates a container owning `value`, copied and compared as `ops` says.
    ///
    /// ```
    /// use erased_any::{Any, MoveOnly};
    ///
    /// #[derive(PartialEq)]
    /// struct Handle(u32);
    ///
    /// let any = Any::new_with(Handle(1), MoveOnly);
    /// // Handle is not Clone, so the copy comes out empty
    /// assert!(!any.clone().has_value());
    /// ```
    pub fn new_with<T: 'static, O: ValueOps<T>>(value: T, ops: O) -> Self {
        let mut any = Self::empty();
        any.initialize::<T, O, false>(value, ops);
        any
    }

    /// Creates a container owning `value` on the heap, even if it would fit
    /// inline.
    ///
    /// The box keeps its address when the container is moved or swapped.
    /// Storing `()` yields an empty container.
    ///
    /// ```
    /// use erased_any::{any_cast, Any};
    ///
    /// let mut any = Any::new_boxed(42i32);
    /// let address = any.data();
    ///
    /// let moved = any.take();
    ///
    /// assert_eq!(moved.data(), address);
    /// assert_eq!(any_cast::<i32>(&moved), Some(&42));
    /// ```
    pub fn new_boxed<T: Clone + PartialEq + 'static>(value: T) -> Self {
        Self::new_boxed_with(value, Regular)
    }

    /// Same as [`BasicAny::new_boxed`] with explicit capabilities.
    pub fn new_boxed_with<T: 'static, O: ValueOps<T>>(value: T, ops: O) -> Self {
        let mut any = Self::empty();
        any.initialize::<T, O, true>(value, ops);
        any
    }

    /// Creates a mutable alias of `value`.
    ///
    /// # Safety
    ///
    /// `value` must outlive the returned container and every copy or alias
    /// made from it, and must not be moved in the meantime. While any of them
    /// is used, `value` must not be accessed through another borrow in a way
    /// that conflicts with the access the alias grants.
    pub unsafe fn from_mut<T: Clone + PartialEq + 'static>(value: &mut T) -> Self {
        // SAFETY: forwarded to the caller.
        unsafe { Self::from_mut_with(value, Regular) }
    }

    /// Same as [`BasicAny::from_mut`] with explicit capabilities.
    ///
    /// # Safety
    ///
    /// See [`BasicAny::from_mut`].
    pub unsafe fn from_mut_with<T: 'static, O: ValueOps<T>>(value: &mut T, _ops: O) -> Self {
        Self::alias(
            (value as *mut T).cast::<()>(),
            type_id::<T>(),
            Policy::Ref,
            basic_vtable::<T, O, N, false>,
        )
    }

    /// Creates a const alias of `value`.
    ///
    /// The alias hands out shared references only: [`BasicAny::data_mut`]
    /// returns null and mutable casts fail.
    ///
    /// # Safety
    ///
    /// `value` must outlive the returned container and every copy or alias
    /// made from it, must not be moved, and must not be mutated while any of
    /// them is used.
    pub unsafe fn from_ref<T: Clone + PartialEq + 'static>(value: &T) -> Self {
        // SAFETY: forwarded to the caller.
        unsafe { Self::from_ref_with(value, Regular) }
    }

    /// Same as [`BasicAny::from_ref`] with explicit capabilities.
    ///
    /// # Safety
    ///
    /// See [`BasicAny::from_ref`].
    pub unsafe fn from_ref_with<T: 'static, O: ValueOps<T>>(value: &T, _ops: O) -> Self {
        Self::alias(
            (value as *const T as *mut T).cast::<()>(),
            type_id::<T>(),
            Policy::ConstRef,
            basic_vtable::<T, O, N, false>,
        )
    }

    /// Builds an alias. A null `pointer` or the empty type yields an empty
    /// container.
    pub(crate) fn alias(pointer: *mut (), info: TypeInfo, policy: Policy, vtable: Vtable) -> Self {
        let mut any = Self::empty();
        if !pointer.is_null() && !info.is_none() {
            any.storage.set_pointer(pointer);
            any.info = info;
            any.policy = policy;
            any.vtable = Some(vtable);
        }
        any
    }

    /// Replaces the held value with `value`.
    ///
    /// The previous value is dropped first if the container owns it; an
    /// aliased value is left alone. Emplacing `()` resets the container.
    pub fn emplace<T: Clone + PartialEq + 'static>(&mut self, value: T) {
        self.emplace_with(value, Regular);
    }

    /// Same as [`BasicAny::emplace`] with explicit capabilities.
    pub fn emplace_with<T: 'static, O: ValueOps<T>>(&mut self, value: T, ops: O) {
        self.reset();
        self.initialize::<T, O, false>(value, ops);
    }

    /// Drops the owned value, or forgets the alias, leaving the container empty.
    pub fn reset(&mut self) {
        if let (Some(vtable), Policy::Owner) = (self.vtable, self.policy) {
            // Clear first so a panicking destructor cannot cause a second drop.
            let mut storage = mem::replace(&mut self.storage, Storage::new());
            self.clear();
            // SAFETY: the storage owned a value of the vtable's type.
            unsafe { vtable(Op::Destroy, ptr::addr_of_mut!(storage).cast::<()>(), ptr::null()) };
        } else {
            self.clear();
        }
    }

    /// Moves the content out, leaving this container empty.
    ///
    /// ```
    /// use erased_any::{any_cast, Any};
    ///
    /// let mut source = Any::new(String::from("moved"));
    /// let target = source.take();
    ///
    /// assert!(!source.has_value());
    /// assert_eq!(any_cast::<String>(&target).map(String::as_str), Some("moved"));
    /// ```
    pub fn take(&mut self) -> Self {
        let mut other = Self::empty();
        if let Some(vtable) = self.vtable {
            match self.policy {
                Policy::Owner => {
                    // SAFETY: the source owns a value of the vtable's type and
                    // is cleared right below without being dropped.
                    unsafe {
                        vtable(
                            Op::Move,
                            ptr::addr_of_mut!(self.storage).cast::<()>(),
                            ptr::addr_of_mut!(other.storage).cast::<()>(),
                        )
                    };
                }
                Policy::Ref | Policy::ConstRef => other.storage = self.storage,
            }
            other.info = self.info;
            other.policy = self.policy;
            other.vtable = Some(vtable);
        }
        self.clear();
        other
    }

    /// Exchanges the contents of two containers.
    ///
    /// Values, types and policies move together; inline values are relocated
    /// bitwise, boxes and aliases keep pointing at the same place.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves the owned value out if it is a `T`.
    ///
    /// Aliases and mismatching types are handed back unchanged.
    ///
    /// ```
    /// use erased_any::Any;
    ///
    /// let any = Any::new(vec![1, 2, 3]);
    /// let any = any.downcast::<String>().unwrap_err();
    /// assert_eq!(any.downcast::<Vec<i32>>().ok(), Some(vec![1, 2, 3]));
    /// ```
    pub fn downcast<T: 'static>(mut self) -> Result<T, Self> {
        let vtable = match self.vtable {
            Some(vtable) if self.policy == Policy::Owner && self.info == type_id::<T>() => vtable,
            _ => return Err(self),
        };

        let mut storage = mem::replace(&mut self.storage, Storage::new());
        self.clear();
        let mut value = mem::MaybeUninit::<T>::uninit();
        // SAFETY: the storage owned a `T`, and `self` no longer refers to it.
        unsafe {
            vtable(
                Op::Take,
                ptr::addr_of_mut!(storage).cast::<()>(),
                value.as_mut_ptr().cast::<()>(),
            );
            Ok(value.assume_init())
        }
    }

    /// Type of the held value, [`TypeInfo::none`] when empty.
    pub fn type_info(&self) -> TypeInfo {
        self.info
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Checks whether a value is held or aliased.
    pub fn has_value(&self) -> bool {
        self.vtable.is_some()
    }

    /// Checks whether the container owns its value. Empty containers count
    /// as owners of nothing.
    pub fn is_owner(&self) -> bool {
        self.policy == Policy::Owner
    }

    /// Address of the held value, null when empty.
    pub fn data(&self) -> *const () {
        match (self.vtable, self.policy) {
            (None, _) => ptr::null(),
            (Some(_), Policy::Ref | Policy::ConstRef) => self.storage.pointer(),
            (Some(vtable), Policy::Owner) => {
                // SAFETY: the storage owns a value of the vtable's type.
                unsafe { vtable(Op::Get, ptr::addr_of!(self.storage).cast::<()>(), ptr::null()) }
            }
        }
    }

    /// Mutable address of the held value.
    ///
    /// Null when empty and for const aliases.
    pub fn data_mut(&mut self) -> *mut () {
        match (self.vtable, self.policy) {
            (None, _) | (_, Policy::ConstRef) => ptr::null_mut(),
            (Some(_), Policy::Ref) => self.storage.pointer(),
            (Some(vtable), Policy::Owner) => {
                // SAFETY: the storage owns a value of the vtable's type.
                unsafe { vtable(Op::Get, ptr::addr_of_mut!(self.storage).cast::<()>(), ptr::null()) }
                    .cast_mut()
            }
        }
    }

    /// Whether [`BasicAny::new`] would store a `T` inline rather than boxed.
    ///
    /// [`BasicAny::new_boxed`] and [`as_ref`](crate::as_ref) on an owner box
    /// the value regardless.
    ///
    /// ```
    /// use erased_any::Any;
    ///
    /// assert!(Any::fits_inline::<u64>());
    /// assert!(!Any::fits_inline::<[u64; 8]>());
    /// ```
    pub const fn fits_inline<T>() -> bool {
        storage::is_inline::<T, N>()
    }

    pub(crate) fn vtable(&self) -> Option<Vtable> {
        self.vtable
    }

    /// Moves an inline owned value into a box, so that the value no longer
    /// lives inside the container. No-op for boxed values and aliases.
    pub(crate) fn spill(&mut self) {
        let (Some(vtable), Policy::Owner) = (self.vtable, self.policy) else {
            return;
        };

        let mut boxed = vtable;
        // SAFETY: the storage owns a value of the vtable's type and `boxed`
        // is a writable table slot.
        let moved = unsafe {
            vtable(
                Op::Spill,
                ptr::addr_of_mut!(self.storage).cast::<()>(),
                ptr::addr_of_mut!(boxed).cast::<()>(),
            )
        };
        if !moved.is_null() {
            self.vtable = Some(boxed);
        }
    }

    fn initialize<T: 'static, O: ValueOps<T>, const HEAP: bool>(&mut self, value: T, _ops: O) {
        let info = type_id::<T>();
        if info.is_none() {
            return;
        }

        self.storage.emplace::<T, HEAP>(value);
        self.info = info;
        self.policy = Policy::Owner;
        self.vtable = Some(basic_vtable::<T, O, N, HEAP>);
    }

    fn clear(&mut self) {
        self.storage = Storage::new();
        self.info = TypeInfo::none();
        self.policy = Policy::Owner;
        self.vtable = None;
    }
}

impl<const N: usize> Default for BasicAny<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> Drop for BasicAny<N> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<const N: usize> Clone for BasicAny<N> {
    /// Copies the owned value, or the alias.
    ///
    /// A value its capabilities cannot duplicate yields an empty copy.
    fn clone(&self) -> Self {
        let mut copy = Self::empty();
        let Some(vtable) = self.vtable else {
            return copy;
        };

        match self.policy {
            Policy::Owner => {
                // SAFETY: `data` points at a live value of the vtable's type
                // and the target storage is empty.
                let done = unsafe {
                    vtable(Op::Copy, self.data(), ptr::addr_of_mut!(copy.storage).cast::<()>())
                };
                if done.is_null() {
                    return copy;
                }
            }
            Policy::Ref | Policy::ConstRef => copy.storage = self.storage,
        }

        copy.info = self.info;
        copy.policy = self.policy;
        copy.vtable = Some(vtable);
        copy
    }

    /// Drops the current value before copying `source`.
    fn clone_from(&mut self, source: &Self) {
        self.reset();
        *self = source.clone();
    }
}

impl<const N: usize> PartialEq for BasicAny<N> {
    /// Two containers are equal when both are empty, or when they hold the
    /// same type and either share the same instance or compare equal.
    ///
    /// The comparison of each side is consulted, so values stored with
    /// different capabilities are only equal when both agree.
    fn eq(&self, other: &Self) -> bool {
        match (self.vtable, other.vtable) {
            (None, None) => true,
            (Some(lhs_vtable), Some(rhs_vtable)) if self.info == other.info => {
                let (lhs, rhs) = (self.data(), other.data());
                // SAFETY: both point at live values of the tables' type.
                lhs == rhs
                    || unsafe {
                        !lhs_vtable(Op::Compare, lhs, rhs).is_null()
                            && !rhs_vtable(Op::Compare, rhs, lhs).is_null()
                    }
            }
            _ => false,
        }
    }
}

impl<const N: usize> fmt::Debug for BasicAny<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = if N == DEFAULT_WORDS {
            String::from("Any")
        } else {
            format!("BasicAny<{}>", N)
        };
        f.debug_struct(&name)
            .field("type", &self.info)
            .field("policy", &self.policy)
            .finish()
    }
}
