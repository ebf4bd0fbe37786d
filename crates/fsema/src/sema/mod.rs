//! Semantic analysis
//!
//! Resolves declaration statements into scope tables, typing and folding
//! the expressions they contain.

mod analyzer;
mod array;
mod decl;
mod expr;

pub use analyzer::SemanticAnalyzer;
pub use expr::{SemaExpr, SemaExprKind};

/// Analyzer options
#[derive(Debug, Clone, Copy, Default)]
pub struct SemaConfig {
    /// Declaration names compare case-sensitively
    pub case_sensitive: bool,
    /// Intrinsic names must match their canonical spelling
    pub intrinsics_case_sensitive: bool,
    /// Record warnings as errors
    pub warnings_as_errors: bool,
}
