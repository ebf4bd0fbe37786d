//! fsema - semantic core of a Fortran 77/90 front end
//!
//! Types declarations, folds constant expressions and checks intrinsic
//! calls for a FORTRAN compiler front end.
//!
//! ## Architecture
//!
//! The crate is organized into:
//! - **Types** (`types/`): Type descriptors with compare, compatible and promote
//! - **Constants** (`typeval/`): Typed constants, casts, arithmetic and TRANSFER
//! - **Scopes** (`scope/`): Declaration tables, views and implicit rules
//! - **Intrinsics** (`intrinsic/`): Intrinsic descriptor tables and registry
//! - **Semantic analysis** (`sema/`): Declaration and expression resolution
//! - **AST** (`ast/`): Syntax trees handed over by the parser
//! - **Common** (`common/`): Shared infrastructure (errors, diagnostics, spans)

pub mod ast;
pub mod common;
pub mod intrinsic;
pub mod scope;
pub mod sema;
pub mod typeval;
pub mod types;

// Re-exports for convenience
pub use common::{DiagnosticReporter, Diagnostics, SemaError, SemaResult, Span, WarningKind};
pub use intrinsic::{IntrinsicDescriptor, IntrinsicRegistry};
pub use scope::{DeclId, Declaration, ScopeArena, ScopeId, ScopeKind};
pub use sema::{SemaConfig, SemaExpr, SemanticAnalyzer};
pub use typeval::TypeVal;
pub use types::{Kind, SemaType};
