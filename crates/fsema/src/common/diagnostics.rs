//! Diagnostic sink collecting errors and warnings in report order

use super::{SemaError, Span};

/// Advisory conditions that never abort resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    DuplicateInitialization,
    MultipleArrayDefinitions,
    OutOfBounds,
    InitializerTruncated,
    ArgumentType,
    ElementReinitialized,
    SplitInitialization,
}

impl WarningKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::DuplicateInitialization => "Duplicate initialization",
            Self::MultipleArrayDefinitions => "Multiple array definitions",
            Self::OutOfBounds => "Initializer out of bounds",
            Self::InitializerTruncated => "Initializer truncated",
            Self::ArgumentType => "Unexpected argument type",
            Self::ElementReinitialized => "Element re-initialized",
            Self::SplitInitialization => "Initialization split across statements",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    pub span: Span,
}

/// Errors and warnings raised while resolving a compilation unit
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<SemaError>,
    warnings: Vec<Warning>,
    warnings_as_errors: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every warning as a `Semantic` error instead
    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    pub fn error(&mut self, error: SemaError) {
        tracing::debug!(%error, "error");
        self.errors.push(error);
    }

    pub fn warning(&mut self, kind: WarningKind, message: impl Into<String>, span: Span) {
        let message = message.into();
        tracing::debug!(?kind, %message, "warning");
        if self.warnings_as_errors {
            self.errors.push(SemaError::semantic(message, span));
        } else {
            self.warnings.push(Warning { kind, message, span });
        }
    }

    pub fn errors(&self) -> &[SemaError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Count warnings of one kind
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_recorded_in_order() {
        let mut diags = Diagnostics::new();
        diags.warning(WarningKind::OutOfBounds, "first", Span::default());
        diags.warning(WarningKind::InitializerTruncated, "second", Span::default());

        assert_eq!(diags.warnings().len(), 2);
        assert_eq!(diags.warnings()[0].message, "first");
        assert_eq!(diags.count(WarningKind::OutOfBounds), 1);
        assert!(!diags.has_errors());
    }

    #[test]
    fn test_warnings_as_errors() {
        let mut diags = Diagnostics::new().with_warnings_as_errors(true);
        diags.warning(WarningKind::DuplicateInitialization, "dup", Span::new(1, 2));

        assert!(diags.warnings().is_empty());
        assert_eq!(diags.errors(), &[SemaError::semantic("dup", Span::new(1, 2))]);
    }
}
