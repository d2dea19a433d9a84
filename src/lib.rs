//! # erased-any
//!
//! A type-erased value container with small-buffer optimization.
//!
//! `erased-any` provides [`Any`], a value type that can hold a value of any
//! `'static` type without knowing it at compile time. It is meant as a
//! building block for component and data systems that need to move
//! heterogeneous values around as plain values.
//!
//! ## Key Features
//!
//! - **Small-buffer optimization**: small values live inside the container, larger ones are boxed
//! - **Forced boxing**: [`Any::new_boxed`] keeps any value on the heap, so its address survives moves
//! - **Value semantics**: containers clone, move, swap and compare like ordinary values
//! - **Aliasing**: a container can refer to a value owned elsewhere, mutably or read-only
//! - **Exact casts**: values are only handed out as the exact type they were stored as
//! - **No trait objects**: type specific behavior goes through one function pointer per type
//!
//! ## Usage Examples
//!
//! ### Basic Usage
//!
//! ```rust
//! use erased_any::{any_cast, any_cast_value, type_id, Any};
//!
//! // Small values are stored inline
//! let number = Any::new(42i32);
//! assert!(Any::fits_inline::<i32>());
//!
//! // Larger ones go to the heap, transparently
//! let text = Any::new(String::from("Hello, world!"));
//!
//! assert_eq!(number.type_info(), type_id::<i32>());
//! assert_eq!(any_cast_value::<i32>(&number), 42);
//! assert_eq!(any_cast::<String>(&text).map(String::as_str), Some("Hello, world!"));
//!
//! // Casting to the wrong type gives nothing back
//! assert_eq!(any_cast::<u32>(&number), None);
//! ```
//!
//! ### Value Semantics
//!
//! ```rust
//! use erased_any::{any_cast_ref_mut, any_cast_value, Any};
//!
//! let mut original = Any::new(vec![1, 2, 3]);
//! let copy = original.clone();
//!
//! any_cast_ref_mut::<Vec<i32>>(&mut original).push(4);
//!
//! assert_eq!(any_cast_value::<Vec<i32>>(&copy), vec![1, 2, 3]);
//! assert_ne!(original, copy);
//!
//! // Moving out leaves the source empty
//! let moved = original.take();
//! assert!(!original.has_value());
//! assert_eq!(any_cast_value::<Vec<i32>>(&moved), vec![1, 2, 3, 4]);
//! ```
//!
//! ### Values That Cannot Be Copied Or Compared
//!
//! Rust cannot discover at runtime whether a type is `Clone` or `PartialEq`,
//! so those capabilities are picked when a value is stored. [`Any::new`]
//! requires both; [`Any::new_with`] takes a [`ValueOps`] implementation such
//! as [`MoveOnly`] or [`Opaque`].
//!
//! ```rust
//! use erased_any::{Any, Opaque};
//!
//! struct Connection {
//!     id: u32,
//! }
//!
//! let any = Any::new_with(Connection { id: 7 }, Opaque);
//!
//! // A copy of something that cannot be copied comes out empty
//! let copy = any.clone();
//! assert!(any.has_value());
//! assert!(!copy.has_value());
//!
//! // Without equality a value is only equal to itself
//! assert_eq!(any, any);
//! assert_eq!(any.downcast_ref::<Connection>().map(|c| c.id), Some(7));
//! ```
//!
//! ### Aliasing
//!
//! Aliases do not own their value and never drop it. Creating one is
//! `unsafe` because the container cannot track how long the value lives.
//! [`as_ref`] on an owner moves an inline value to the heap first, so the
//! owner and its aliases can be used side by side.
//!
//! ```rust
//! use erased_any::{any_cast_mut, any_cast_value, as_cref, Any, Policy};
//!
//! let mut value = 3;
//! let mut alias = unsafe { Any::from_mut(&mut value) };
//! let read_only = unsafe { as_cref(&alias) };
//!
//! if let Some(v) = any_cast_mut::<i32>(&mut alias) {
//!     *v = 9;
//! }
//!
//! assert_eq!(read_only.policy(), Policy::ConstRef);
//! assert_eq!(any_cast_value::<i32>(&read_only), 9);
//! ```
//!
//! ### Error Handling
//!
//! ```rust
//! use erased_any::{try_any_cast_ref, Any, CastError};
//!
//! let any = Any::new(1.5f64);
//!
//! match try_any_cast_ref::<f32>(&any) {
//!     Ok(value) => println!("Value: {}", value),
//!     Err(CastError::Empty) => println!("Nothing stored"),
//!     Err(CastError::TypeMismatch { expected, found }) => {
//!         println!("Wanted {} but found {}", expected, found)
//!     }
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

mod any;
mod cast;
mod error;
mod storage;
mod type_info;
mod vtable;

#[cfg(test)]
mod any_tests;

pub use any::{Any, BasicAny, Policy};
pub use cast::{
    any_cast, any_cast_into, any_cast_mut, any_cast_ref, any_cast_ref_mut, any_cast_value, as_cref,
    as_ref, try_any_cast_mut, try_any_cast_ref,
};
pub use error::CastError;
pub use type_info::{type_id, TypeInfo};
pub use vtable::{Incomparable, MoveOnly, Opaque, Regular, ValueOps};
