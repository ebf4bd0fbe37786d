//! Expression AST nodes

use crate::common::Span;
use crate::types::Kind;

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn int(value: i64, span: Span) -> Self {
        Self::new(ExprKind::IntLiteral { value, kind: Kind::Default }, span)
    }

    pub fn real(value: f64, span: Span) -> Self {
        Self::new(ExprKind::RealLiteral { value, kind: Kind::Default }, span)
    }

    /// Literal written with a `D` exponent
    pub fn double(value: f64, span: Span) -> Self {
        Self::new(ExprKind::RealLiteral { value, kind: Kind::Double }, span)
    }

    pub fn logical(value: bool, span: Span) -> Self {
        Self::new(ExprKind::LogicalLiteral(value), span)
    }

    pub fn string(value: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::CharLiteral(value.into()), span)
    }

    pub fn name(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Name(name.into()), span)
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>, span: Span) -> Self {
        Self::new(
            ExprKind::Call {
                name: name.into(),
                args,
            },
            span,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr, span: Span) -> Self {
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }
}

/// Expression kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal: 42, 42_8
    IntLiteral { value: i64, kind: Kind },

    /// Real literal: 1.5, 1.5D0, 1.5_8
    RealLiteral { value: f64, kind: Kind },

    /// .TRUE. / .FALSE.
    LogicalLiteral(bool),

    /// 'text' or Hollerith constant
    CharLiteral(String),

    /// (re, im)
    ComplexLiteral { re: Box<Expr>, im: Box<Expr> },

    /// Variable or named constant reference
    Name(String),

    Unary { op: UnaryOp, operand: Box<Expr> },

    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `NAME(args)`: intrinsic call, function reference or array element
    Call { name: String, args: Vec<Expr> },
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Neg,
    /// .NOT.
    Not,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    /// `**`
    Pow,
    /// `//`
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Eqv,
    Neqv,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Pow
        )
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(
            self,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Eqv | BinaryOp::Neqv
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
            BinaryOp::Concat => "//",
            BinaryOp::Eq => ".EQ.",
            BinaryOp::Ne => ".NE.",
            BinaryOp::Lt => ".LT.",
            BinaryOp::Le => ".LE.",
            BinaryOp::Gt => ".GT.",
            BinaryOp::Ge => ".GE.",
            BinaryOp::And => ".AND.",
            BinaryOp::Or => ".OR.",
            BinaryOp::Eqv => ".EQV.",
            BinaryOp::Neqv => ".NEQV.",
        }
    }
}
