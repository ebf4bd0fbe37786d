//! Declarations

use tracing::debug;

use super::ScopeId;
use crate::common::{SemaError, SemaResult, Span};
use crate::typeval::TypeVal;
use crate::types::SemaType;

/// Initial value of a declaration
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Init {
    #[default]
    None,
    Scalar(TypeVal),
    /// One slot per array element, filled as initializers arrive
    Elements(Vec<Option<TypeVal>>),
}

impl Init {
    pub fn is_none(&self) -> bool {
        matches!(self, Init::None)
    }
}

/// A named entity in a scope
///
/// A declaration starts unlocked. Initialization, procedure binding and
/// equivalence binding lock it; once locked its type can no longer change.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    name: String,
    ty: SemaType,
    init: Init,
    implicit: bool,
    locked: bool,
    procedure: Option<ScopeId>,
    equivalence: Option<u32>,
    span: Span,
}

impl Declaration {
    /// Explicitly typed declaration
    pub fn new(name: impl Into<String>, ty: SemaType, span: Span) -> Self {
        Self {
            name: name.into(),
            ty,
            init: Init::None,
            implicit: false,
            locked: false,
            procedure: None,
            equivalence: None,
            span,
        }
    }

    /// Declaration created by first use, typed by the implicit rules
    pub fn implicit(name: impl Into<String>, ty: SemaType, span: Span) -> Self {
        Self {
            implicit: true,
            ..Self::new(name, ty, span)
        }
    }

    /// Name as first written
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &SemaType {
        &self.ty
    }

    pub fn init(&self) -> &Init {
        &self.init
    }

    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_initialized(&self) -> bool {
        !self.init.is_none()
    }

    pub fn procedure(&self) -> Option<ScopeId> {
        self.procedure
    }

    pub fn equivalence(&self) -> Option<u32> {
        self.equivalence
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn set_ty(&mut self, ty: SemaType) {
        self.ty = ty;
    }

    pub(crate) fn set_explicit(&mut self) {
        self.implicit = false;
    }

    pub(crate) fn set_init(&mut self, init: Init) {
        self.init = init;
    }

    pub(crate) fn init_mut(&mut self) -> &mut Init {
        &mut self.init
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }

    /// Bind a procedure-typed declaration to the scope of its body
    pub fn bind_procedure(&mut self, scope: ScopeId, span: Span) -> SemaResult<()> {
        if !self.ty.is_procedure() {
            return Err(SemaError::semantic(
                format!("'{}' is not a procedure", self.name),
                span,
            ));
        }
        match self.procedure {
            Some(bound) if bound == scope => return Ok(()),
            Some(_) => {
                return Err(SemaError::lock_violation(
                    format!("procedure '{}' is already bound", self.name),
                    span,
                ));
            }
            None => {}
        }
        if self.locked || self.equivalence.is_some() {
            return Err(SemaError::lock_violation(
                format!("cannot bind '{}' after use", self.name),
                span,
            ));
        }

        debug!(name = %self.name, ?scope, "bound procedure");
        self.procedure = Some(scope);
        self.locked = true;
        Ok(())
    }

    /// Place the declaration in an EQUIVALENCE group
    pub fn bind_equivalence(&mut self, group: u32, span: Span) -> SemaResult<()> {
        match self.equivalence {
            Some(bound) if bound == group => return Ok(()),
            Some(_) => {
                return Err(SemaError::lock_violation(
                    format!("'{}' is already in an equivalence group", self.name),
                    span,
                ));
            }
            None => {}
        }
        if self.procedure.is_some() {
            return Err(SemaError::semantic(
                format!("procedure '{}' cannot appear in EQUIVALENCE", self.name),
                span,
            ));
        }

        debug!(name = %self.name, group, "bound equivalence");
        self.equivalence = Some(group);
        self.locked = true;
        Ok(())
    }
}
