//! Semantic analyzer state

use tracing::debug;

use super::SemaConfig;
use crate::common::{Diagnostics, SemaError, SemaResult, Span};
use crate::intrinsic::IntrinsicRegistry;
use crate::scope::{DeclId, ScopeArena, ScopeId, ScopeKind};
use crate::types::SemaType;

/// Declaration resolver
///
/// Owns the scope arena and the diagnostic sink; borrows the intrinsic
/// registry, which outlives any number of analyzers.
pub struct SemanticAnalyzer<'r> {
    pub(super) arena: ScopeArena,
    pub(super) intrinsics: &'r IntrinsicRegistry,
    pub(super) diagnostics: Diagnostics,
    pub(super) config: SemaConfig,
}

impl<'r> SemanticAnalyzer<'r> {
    pub fn new(intrinsics: &'r IntrinsicRegistry) -> Self {
        Self::with_config(intrinsics, SemaConfig::default())
    }

    pub fn with_config(intrinsics: &'r IntrinsicRegistry, config: SemaConfig) -> Self {
        Self {
            arena: ScopeArena::new(),
            intrinsics,
            diagnostics: Diagnostics::new().with_warnings_as_errors(config.warnings_as_errors),
            config,
        }
    }

    pub fn config(&self) -> &SemaConfig {
        &self.config
    }

    pub fn arena(&self) -> &ScopeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut ScopeArena {
        &mut self.arena
    }

    pub fn intrinsics(&self) -> &'r IntrinsicRegistry {
        self.intrinsics
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Hand over the collected diagnostics, leaving an empty sink
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        let fresh = Diagnostics::new().with_warnings_as_errors(self.config.warnings_as_errors);
        std::mem::replace(&mut self.diagnostics, fresh)
    }

    /// Open a scope using the configured case rule
    pub fn push_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        self.arena.push(kind, parent, self.config.case_sensitive)
    }

    /// `IMPLICIT type (first-last)`
    pub fn set_implicit(
        &mut self,
        scope: ScopeId,
        first: char,
        last: char,
        ty: &SemaType,
        span: Span,
    ) -> SemaResult<()> {
        let target = self
            .arena
            .get_mut(scope)
            .ok_or_else(|| SemaError::semantic("unknown scope", span))?;
        if !target.implicit_mut().set(first, last, ty) {
            return Err(SemaError::semantic(
                format!("invalid IMPLICIT letter range {}-{}", first, last),
                span,
            ));
        }
        debug!(?scope, %first, %last, %ty, "implicit rule");
        Ok(())
    }

    /// `IMPLICIT NONE`
    pub fn implicit_none(&mut self, scope: ScopeId, span: Span) -> SemaResult<()> {
        let target = self
            .arena
            .get_mut(scope)
            .ok_or_else(|| SemaError::semantic("unknown scope", span))?;
        target.implicit_mut().clear('A', 'Z');
        Ok(())
    }

    /// Bind a procedure declaration to the scope of its body
    pub fn bind_procedure(&mut self, decl: DeclId, body: ScopeId, span: Span) -> SemaResult<()> {
        self.arena
            .decl_mut(decl)
            .ok_or_else(|| SemaError::semantic("unknown declaration", span))?
            .bind_procedure(body, span)
    }

    /// Place a declaration in an EQUIVALENCE group
    pub fn bind_equivalence(&mut self, decl: DeclId, group: u32, span: Span) -> SemaResult<()> {
        self.arena
            .decl_mut(decl)
            .ok_or_else(|| SemaError::semantic("unknown declaration", span))?
            .bind_equivalence(group, span)
    }

    /// Record an error and pass it on
    pub(super) fn report(&mut self, error: SemaError) -> SemaError {
        self.diagnostics.error(error.clone());
        error
    }
}
