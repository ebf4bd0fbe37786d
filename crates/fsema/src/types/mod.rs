//! Value-type descriptors for declarations and constants
//!
//! Types are plain values: they are compared structurally, never mutated
//! in place, and cloned freely. Storage sizes follow the usual Fortran
//! conventions (default INTEGER/REAL/LOGICAL are 4 bytes, DOUBLE is 8).

mod array;
mod kind;
mod sema_type;

pub use array::{ArrayShape, Bound, Dimension};
pub use kind::{Category, Kind};
pub use sema_type::{CharLen, Qualifiers, SemaType, TypeKind};
