//! Syntax trees consumed by the semantic engine
//!
//! The parser lowers source text into these nodes; nothing in this crate
//! produces them except tests.

mod decl;
mod expr;
mod types;

pub use decl::*;
pub use expr::*;
pub use types::*;
