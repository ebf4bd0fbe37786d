//! Common infrastructure shared across the semantic passes

mod diagnostics;
mod error;
mod span;

pub use diagnostics::{Diagnostics, Warning, WarningKind};
pub use error::{DiagnosticReporter, SemaError, SemaResult};
pub use span::Span;
