use crate::TypeInfo;
use std::fmt;

/// Errors reported by the checked cast helpers.
///
/// The panicking helpers (`any_cast_ref`, `any_cast_ref_mut`, ...) panic with
/// the `Display` form of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastError {
    /// The container holds nothing
    Empty,
    /// The requested type differs from the held one
    TypeMismatch {
        expected: TypeInfo,
        found: TypeInfo,
    },
    /// Mutable access was requested through a const alias
    ConstAlias(TypeInfo),
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CastError::Empty => write!(f, "Cannot cast an empty container"),
            CastError::TypeMismatch { expected, found } => {
                write!(f, "Type mismatch: expected {}, found {}", expected, found)
            }
            CastError::ConstAlias(info) => {
                write!(f, "Cannot borrow {} mutably through a const alias", info)
            }
        }
    }
}

impl std::error::Error for CastError {}
