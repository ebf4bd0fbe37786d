//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use super::{Span, Warning};

/// Semantic error with source location
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemaError {
    /// Conflicting declared type on redeclaration
    #[error("Type conflict at {span:?}: {message}")]
    TypeConflict { message: String, span: Span },

    /// Redefinition or re-initialization of a locked declaration
    #[error("Lock violation at {span:?}: {message}")]
    LockViolation { message: String, span: Span },

    /// Too few or too many intrinsic arguments
    #[error("Arity error at {span:?}: {message}")]
    Arity { message: String, span: Span },

    /// Intrinsic argument that cannot be converted to the required type
    #[error("Argument type error at {span:?}: {message}")]
    ArgumentType { message: String, span: Span },

    /// Conflicting array dimensions for the same name
    #[error("Array shape conflict at {span:?}: {message}")]
    ArrayShapeConflict { message: String, span: Span },

    /// Initializer that does not reduce to a compile-time value
    #[error("Non-constant initializer at {span:?}: {message}")]
    NonConstantInitializer { message: String, span: Span },

    /// Construct the engine deliberately does not implement
    #[error("Unsupported feature at {span:?}: {message}")]
    UnsupportedFeature { message: String, span: Span },

    #[error("Semantic error at {span:?}: {message}")]
    Semantic { message: String, span: Span },

    #[error("Type error at {span:?}: {message}")]
    Type { message: String, span: Span },
}

impl SemaError {
    pub fn type_conflict(message: impl Into<String>, span: Span) -> Self {
        Self::TypeConflict {
            message: message.into(),
            span,
        }
    }

    pub fn lock_violation(message: impl Into<String>, span: Span) -> Self {
        Self::LockViolation {
            message: message.into(),
            span,
        }
    }

    pub fn arity(message: impl Into<String>, span: Span) -> Self {
        Self::Arity {
            message: message.into(),
            span,
        }
    }

    pub fn argument_type(message: impl Into<String>, span: Span) -> Self {
        Self::ArgumentType {
            message: message.into(),
            span,
        }
    }

    pub fn array_shape_conflict(message: impl Into<String>, span: Span) -> Self {
        Self::ArrayShapeConflict {
            message: message.into(),
            span,
        }
    }

    pub fn non_constant(message: impl Into<String>, span: Span) -> Self {
        Self::NonConstantInitializer {
            message: message.into(),
            span,
        }
    }

    pub fn unsupported(message: impl Into<String>, span: Span) -> Self {
        Self::UnsupportedFeature {
            message: message.into(),
            span,
        }
    }

    pub fn semantic(message: impl Into<String>, span: Span) -> Self {
        Self::Semantic {
            message: message.into(),
            span,
        }
    }

    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        Self::Type {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::TypeConflict { span, .. }
            | Self::LockViolation { span, .. }
            | Self::Arity { span, .. }
            | Self::ArgumentType { span, .. }
            | Self::ArrayShapeConflict { span, .. }
            | Self::NonConstantInitializer { span, .. }
            | Self::UnsupportedFeature { span, .. }
            | Self::Semantic { span, .. }
            | Self::Type { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::TypeConflict { message, .. }
            | Self::LockViolation { message, .. }
            | Self::Arity { message, .. }
            | Self::ArgumentType { message, .. }
            | Self::ArrayShapeConflict { message, .. }
            | Self::NonConstantInitializer { message, .. }
            | Self::UnsupportedFeature { message, .. }
            | Self::Semantic { message, .. }
            | Self::Type { message, .. } => message,
        }
    }

    /// Short heading used when rendering the diagnostic
    fn title(&self) -> &'static str {
        match self {
            Self::TypeConflict { .. } => "Type conflict",
            Self::LockViolation { .. } => "Declaration already locked",
            Self::Arity { .. } => "Wrong number of arguments",
            Self::ArgumentType { .. } => "Incompatible argument",
            Self::ArrayShapeConflict { .. } => "Array shape conflict",
            Self::NonConstantInitializer { .. } => "Initializer not constant",
            Self::UnsupportedFeature { .. } => "Unsupported feature",
            Self::Semantic { .. } => "Semantic error",
            Self::Type { .. } => "Type error",
        }
    }
}

pub type SemaResult<T> = Result<T, SemaError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    pub fn report_error(&self, file_id: usize, error: &SemaError) {
        let span = error.span();
        let diagnostic = Diagnostic::error()
            .with_message(error.title())
            .with_labels(vec![
                Label::primary(file_id, span.range()).with_message(error.message())
            ]);

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }

    pub fn report_warning(&self, file_id: usize, warning: &Warning) {
        let diagnostic = Diagnostic::warning()
            .with_message(warning.kind.title())
            .with_labels(vec![
                Label::primary(file_id, warning.span.range()).with_message(&warning.message)
            ]);

        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_accessors() {
        let err = SemaError::type_conflict("redeclaration with different type", Span::new(3, 7));
        assert_eq!(err.span(), Span::new(3, 7));
        assert_eq!(err.message(), "redeclaration with different type");
        assert!(err.to_string().starts_with("Type conflict"));
    }

    #[test]
    fn test_reporter_accepts_files() {
        let mut reporter = DiagnosticReporter::new();
        let id = reporter.add_file("main.f", "      INTEGER X\n");
        reporter.report_error(id, &SemaError::semantic("oops", Span::new(6, 13)));
    }
}
