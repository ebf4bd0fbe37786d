//! Type specifications as written in declaration statements

use super::{ArraySpec, Expr, StarLength};
use crate::common::Span;

/// Intrinsic type keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Logical,
    Integer,
    Real,
    DoublePrecision,
    Complex,
    DoubleComplex,
    Character,
    Byte,
}

/// Attributes following the type keyword (`, SAVE`, `, VOLATILE`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attributes {
    /// SAVE or STATIC
    pub save: bool,
    pub automatic: bool,
    pub volatile: bool,
    pub target: bool,
}

/// Base type of a declaration statement: `INTEGER*2`, `REAL(KIND=8)`,
/// `CHARACTER(LEN=10)`, `INTEGER, DIMENSION(3)`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: TypeName,
    /// `(KIND=expr)`
    pub kind: Option<Expr>,
    /// `*len` directly after the keyword
    pub star_len: Option<StarLength>,
    /// `CHARACTER(LEN=expr)`
    pub len: Option<StarLength>,
    pub attributes: Attributes,
    pub dimension: Option<ArraySpec>,
    pub span: Span,
}

impl TypeSpec {
    pub fn new(name: TypeName, span: Span) -> Self {
        Self {
            name,
            kind: None,
            star_len: None,
            len: None,
            attributes: Attributes::default(),
            dimension: None,
            span,
        }
    }

    pub fn with_kind(mut self, kind: Expr) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_star_len(mut self, len: StarLength) -> Self {
        self.star_len = Some(len);
        self
    }

    pub fn with_len(mut self, len: StarLength) -> Self {
        self.len = Some(len);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_dimension(mut self, dimension: ArraySpec) -> Self {
        self.dimension = Some(dimension);
        self
    }
}
