use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

const EMPTY_NAME: &str = "<empty>";

/// Identity of the type held by an [`Any`](crate::Any).
///
/// `TypeInfo` wraps [`TypeId`] and adds a distinguished "no type" value,
/// returned for empty containers and for the unit type `()`, which plays the
/// role of `void`: nothing is ever stored for it.
///
/// # Examples
///
/// ```
/// use erased_any::{type_id, TypeInfo};
///
/// assert_eq!(type_id::<i32>(), type_id::<i32>());
/// assert_ne!(type_id::<i32>(), type_id::<u32>());
/// assert_eq!(type_id::<()>(), TypeInfo::none());
/// assert!(TypeInfo::default().is_none());
/// ```
#[derive(Clone, Copy)]
pub struct TypeInfo {
    id: Option<TypeId>,
    name: &'static str,
}

impl TypeInfo {
    /// The "no type" sentinel.
    pub const fn none() -> Self {
        Self {
            id: None,
            name: EMPTY_NAME,
        }
    }

    /// Returns the identity of `T`, or the sentinel when `T` is `()`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let id = TypeId::of::<T>();
        if id == TypeId::of::<()>() {
            return Self::none();
        }

        Self {
            id: Some(id),
            name: type_name::<T>(),
        }
    }

    /// The wrapped [`TypeId`], `None` for the sentinel.
    pub fn id(&self) -> Option<TypeId> {
        self.id
    }

    /// Human readable type name, for diagnostics only.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Checks whether this is the "no type" sentinel.
    pub fn is_none(&self) -> bool {
        self.id.is_none()
    }
}

/// Shorthand for [`TypeInfo::of`].
pub fn type_id<T: ?Sized + 'static>() -> TypeInfo {
    TypeInfo::of::<T>()
}

impl Default for TypeInfo {
    fn default() -> Self {
        Self::none()
    }
}

// Names are not guaranteed unique, so only the id takes part in comparisons.
impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TypeInfo({})", self.name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_is_stable() {
        assert_eq!(type_id::<String>(), TypeInfo::of::<String>());
        assert_eq!(type_id::<String>().id(), Some(TypeId::of::<String>()));
        assert_ne!(type_id::<String>(), type_id::<&'static str>());
        assert_ne!(type_id::<[i32; 1]>(), type_id::<[i32; 2]>());
    }

    #[test]
    fn test_unit_is_the_sentinel() {
        assert!(type_id::<()>().is_none());
        assert_eq!(type_id::<()>(), TypeInfo::default());
        assert_eq!(TypeInfo::none().name(), "<empty>");
        assert!(!type_id::<u8>().is_none());
    }

    #[test]
    fn test_hash_follows_identity() {
        let mut seen = HashSet::new();
        seen.insert(type_id::<u8>());
        seen.insert(type_id::<u8>());
        seen.insert(type_id::<u16>());
        seen.insert(TypeInfo::none());

        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_display_uses_type_name() {
        assert_eq!(type_id::<u64>().to_string(), "u64");
        assert_eq!(format!("{:?}", type_id::<u64>()), "TypeInfo(u64)");
    }
}
