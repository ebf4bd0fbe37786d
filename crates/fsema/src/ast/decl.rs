//! Declaration AST nodes

use super::{Expr, TypeSpec};
use crate::common::Span;

/// Declaration statement: `INTEGER A, B(10) / 10*0 /`
#[derive(Debug, Clone, PartialEq)]
pub struct DeclStmt {
    pub type_spec: TypeSpec,
    pub items: Vec<DeclItem>,
    pub span: Span,
}

impl DeclStmt {
    pub fn new(type_spec: TypeSpec, items: Vec<DeclItem>, span: Span) -> Self {
        Self {
            type_spec,
            items,
            span,
        }
    }
}

/// One declared entity with its optional initializer
#[derive(Debug, Clone, PartialEq)]
pub struct DeclItem {
    pub lhs: Lhs,
    pub init: Option<Initializer>,
    pub span: Span,
}

impl DeclItem {
    pub fn new(lhs: Lhs, span: Span) -> Self {
        Self {
            lhs,
            init: None,
            span,
        }
    }

    pub fn with_init(mut self, init: Initializer) -> Self {
        self.init = Some(init);
        self
    }
}

/// Declarator, outermost modifier first: `X(10)*8` is
/// `StarLen { parent: Array { parent: Variable } }`
#[derive(Debug, Clone, PartialEq)]
pub enum Lhs {
    Variable {
        name: String,
        span: Span,
    },
    Array {
        parent: Box<Lhs>,
        index: ArraySpec,
        span: Span,
    },
    StarLen {
        parent: Box<Lhs>,
        len: StarLength,
        span: Span,
    },
}

impl Lhs {
    pub fn var(name: impl Into<String>, span: Span) -> Self {
        Lhs::Variable {
            name: name.into(),
            span,
        }
    }

    pub fn array(self, index: ArraySpec) -> Self {
        let span = self.span().merge(index.span);
        Lhs::Array {
            parent: Box::new(self),
            index,
            span,
        }
    }

    pub fn star_len(self, len: StarLength) -> Self {
        let span = self.span();
        Lhs::StarLen {
            parent: Box::new(self),
            len,
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Lhs::Variable { span, .. } | Lhs::Array { span, .. } | Lhs::StarLen { span, .. } => {
                *span
            }
        }
    }

    /// Name of the declared variable
    pub fn base_name(&self) -> &str {
        match self {
            Lhs::Variable { name, .. } => name,
            Lhs::Array { parent, .. } | Lhs::StarLen { parent, .. } => parent.base_name(),
        }
    }
}

/// `*len` or `*(*)`
#[derive(Debug, Clone, PartialEq)]
pub enum StarLength {
    Fixed(Expr),
    Variable,
}

/// `(lower:upper, ...)`
#[derive(Debug, Clone, PartialEq)]
pub struct ArraySpec {
    pub dims: Vec<DimSpec>,
    pub span: Span,
}

impl ArraySpec {
    pub fn new(dims: Vec<DimSpec>, span: Span) -> Self {
        Self { dims, span }
    }
}

/// One dimension; a missing upper bound is the assumed size `*`
#[derive(Debug, Clone, PartialEq)]
pub struct DimSpec {
    pub lower: Option<Expr>,
    pub upper: Option<Expr>,
}

impl DimSpec {
    /// `upper` with the implied lower bound 1
    pub fn upto(upper: Expr) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }

    pub fn range(lower: Expr, upper: Expr) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn assumed() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }
}

/// Initializer of a declared item
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    /// `= expr`
    Expr(Expr),
    /// `/ v1, n*v2, ... /`
    List(Vec<ListEntry>),
}

/// Initializer list entry with an optional repeat count
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub repeat: Option<Expr>,
    pub value: Expr,
}

impl ListEntry {
    pub fn new(value: Expr) -> Self {
        Self {
            repeat: None,
            value,
        }
    }

    pub fn repeated(repeat: Expr, value: Expr) -> Self {
        Self {
            repeat: Some(repeat),
            value,
        }
    }
}
