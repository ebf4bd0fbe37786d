//! Typed expressions and constant expression resolution
//!
//! Only as much expression semantics as declarations need: literals,
//! names, operators, intrinsic calls, array elements and function
//! references. Every node carries its type and, when it folds, its value.

use tracing::trace;

use super::SemanticAnalyzer;
use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::common::{SemaError, SemaResult, Span};
use crate::intrinsic::IntrinsicDescriptor;
use crate::scope::{DeclId, ScopeId};
use crate::typeval::TypeVal;
use crate::types::{Category, CharLen, Kind, SemaType, TypeKind};

/// Resolved expression
#[derive(Debug, Clone, PartialEq)]
pub struct SemaExpr {
    pub kind: SemaExprKind,
    pub ty: SemaType,
    /// Folded value, present when the expression is constant
    pub constant: Option<TypeVal>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SemaExprKind {
    Constant,
    Variable(DeclId),
    Element {
        decl: DeclId,
        index: Vec<SemaExpr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<SemaExpr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<SemaExpr>,
        right: Box<SemaExpr>,
    },
    /// Run-time conversion to the node's type
    Cast {
        operand: Box<SemaExpr>,
    },
    Intrinsic {
        desc: &'static IntrinsicDescriptor,
        args: Vec<SemaExpr>,
    },
    /// Reference to a user FUNCTION
    Call {
        decl: DeclId,
        args: Vec<SemaExpr>,
    },
}

impl SemaExpr {
    pub fn constant(value: TypeVal) -> Self {
        let span = value.span();
        Self {
            kind: SemaExprKind::Constant,
            ty: value.ty().clone(),
            constant: Some(value),
            span,
        }
    }

    fn new(kind: SemaExprKind, ty: SemaType, span: Span) -> Self {
        Self {
            kind,
            ty,
            constant: None,
            span,
        }
    }

    pub fn is_constant(&self) -> bool {
        self.constant.is_some()
    }

    /// Whether the expression names storage that can be assigned
    pub fn is_variable(&self) -> bool {
        matches!(
            self.kind,
            SemaExprKind::Variable(_) | SemaExprKind::Element { .. }
        )
    }

    /// Convert to `target`
    ///
    /// Constants fold immediately. Other expressions get a `Cast` node when
    /// the conversion is numeric, logical, or between CHARACTER of one kind.
    pub fn cast(self, target: &SemaType) -> SemaResult<SemaExpr> {
        if self.ty.compare(target) {
            return Ok(self);
        }
        if let Some(value) = &self.constant {
            let folded = value.cast(target)?.with_span(self.span);
            return Ok(SemaExpr::constant(folded));
        }

        if self.ty.is_array() != target.is_array()
            || (target.is_array() && self.ty.elem_count() != target.elem_count())
        {
            return Err(SemaError::type_error(
                format!("cannot convert {} to {}", self.ty, target),
                self.span,
            ));
        }
        let (from, to) = (self.ty.base(), target.base());
        let castable = (from.is_numeric() && to.is_numeric())
            || (from.is_logical() && to.is_logical())
            || (from.is_character()
                && to.is_character()
                && from.type_kind().map(Kind::char_width) == to.type_kind().map(Kind::char_width));
        if !castable {
            return Err(SemaError::type_error(
                format!("cannot convert {} to {}", self.ty, target),
                self.span,
            ));
        }

        let span = self.span;
        Ok(SemaExpr::new(
            SemaExprKind::Cast {
                operand: Box::new(self),
            },
            target.clone(),
            span,
        ))
    }
}

impl SemanticAnalyzer<'_> {
    /// Resolve an expression in `scope`
    ///
    /// Undeclared names are declared implicitly, unlocked, so a later
    /// explicit declaration may still retype them.
    pub fn resolve_expr(&mut self, scope: ScopeId, expr: &Expr) -> SemaResult<SemaExpr> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::IntLiteral { value, kind } => {
                Ok(SemaExpr::constant(TypeVal::integer(*value, *kind, span)))
            }
            ExprKind::RealLiteral { value, kind } => {
                Ok(SemaExpr::constant(TypeVal::real(*value, *kind, span)))
            }
            ExprKind::LogicalLiteral(value) => Ok(SemaExpr::constant(TypeVal::logical(
                *value,
                Kind::Default,
                span,
            ))),
            ExprKind::CharLiteral(text) => Ok(SemaExpr::constant(TypeVal::string(text, span))),
            ExprKind::ComplexLiteral { re, im } => self.resolve_complex(scope, re, im, span),
            ExprKind::Name(name) => {
                let id = match self.arena.lookup(scope, name) {
                    Some(id) => id,
                    None => self.declare_implicit(scope, name, span)?,
                };
                let ty = self.decl_type(id, span)?;
                Ok(SemaExpr::new(SemaExprKind::Variable(id), ty, span))
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.resolve_expr(scope, operand)?;
                self.resolve_unary(*op, operand, span)
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.resolve_expr(scope, left)?;
                let right = self.resolve_expr(scope, right)?;
                self.resolve_binary(*op, left, right, span)
            }
            ExprKind::Call { name, args } => self.resolve_call(scope, name, args, span),
        }
    }

    /// Resolve an expression that must fold to a constant
    pub(super) fn resolve_constant(
        &mut self,
        scope: ScopeId,
        expr: &Expr,
        what: &str,
    ) -> SemaResult<TypeVal> {
        self.resolve_expr(scope, expr)?
            .constant
            .ok_or_else(|| SemaError::non_constant(format!("{} must be constant", what), expr.span))
    }

    /// Resolve an expression that must fold to an integer constant
    pub(super) fn resolve_integer(
        &mut self,
        scope: ScopeId,
        expr: &Expr,
        what: &str,
    ) -> SemaResult<i64> {
        let value = self.resolve_constant(scope, expr, what)?;
        value.as_integer().ok_or_else(|| {
            SemaError::type_error(format!("{} must be an integer", what), expr.span)
        })
    }

    fn decl_type(&self, id: DeclId, span: Span) -> SemaResult<SemaType> {
        self.arena
            .decl(id)
            .map(|d| d.ty().clone())
            .ok_or_else(|| SemaError::semantic("dangling declaration handle", span))
    }

    fn resolve_complex(
        &mut self,
        scope: ScopeId,
        re: &Expr,
        im: &Expr,
        span: Span,
    ) -> SemaResult<SemaExpr> {
        let re = self.resolve_constant(scope, re, "complex literal part")?;
        let im = self.resolve_constant(scope, im, "complex literal part")?;
        let (Some(re_value), Some(im_value)) = (re.as_real(), im.as_real()) else {
            return Err(SemaError::type_error(
                "complex literal parts must be numeric",
                span,
            ));
        };
        let double = [&re, &im]
            .iter()
            .any(|v| v.ty().is_real() && v.ty().type_kind().map(Kind::width) == Some(8));
        let kind = if double { Kind::Double } else { Kind::Default };
        Ok(SemaExpr::constant(TypeVal::complex(
            re_value, im_value, kind, span,
        )))
    }

    fn resolve_unary(&mut self, op: UnaryOp, operand: SemaExpr, span: Span) -> SemaResult<SemaExpr> {
        let valid = match op {
            UnaryOp::Not => operand.ty.is_logical(),
            UnaryOp::Plus | UnaryOp::Neg => operand.ty.is_numeric(),
        };
        if !valid {
            return Err(SemaError::type_error(
                format!("invalid operand of type {} for unary operator", operand.ty),
                span,
            ));
        }
        if let Some(value) = &operand.constant {
            let folded = value.fold_unary(op, span)?;
            trace!(%folded, "folded unary");
            return Ok(SemaExpr::constant(folded));
        }
        let ty = operand.ty.clone();
        Ok(SemaExpr::new(
            SemaExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
            span,
        ))
    }

    fn resolve_binary(
        &mut self,
        op: BinaryOp,
        left: SemaExpr,
        right: SemaExpr,
        span: Span,
    ) -> SemaResult<SemaExpr> {
        if let (Some(l), Some(r)) = (&left.constant, &right.constant) {
            let folded = l.fold_binary(op, r, span)?;
            trace!(op = op.symbol(), %folded, "folded binary");
            return Ok(SemaExpr::constant(folded));
        }

        let ty = binary_type(op, &left.ty, &right.ty).ok_or_else(|| {
            SemaError::type_error(
                format!(
                    "invalid operands {} and {} for '{}'",
                    left.ty,
                    right.ty,
                    op.symbol()
                ),
                span,
            )
        })?;
        Ok(SemaExpr::new(
            SemaExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
            span,
        ))
    }

    fn resolve_call(
        &mut self,
        scope: ScopeId,
        name: &str,
        args: &[Expr],
        span: Span,
    ) -> SemaResult<SemaExpr> {
        let mut resolved = Vec::with_capacity(args.len());
        for arg in args {
            resolved.push(self.resolve_expr(scope, arg)?);
        }

        // Local declarations shadow intrinsics of the same name
        if let Some(id) = self.arena.lookup(scope, name) {
            let ty = self.decl_type(id, span)?;
            if ty.is_array() {
                return self.resolve_element(id, &ty, resolved, span);
            }
            if let Some(result) = ty.result() {
                return Ok(SemaExpr::new(
                    SemaExprKind::Call {
                        decl: id,
                        args: resolved,
                    },
                    result.clone(),
                    span,
                ));
            }
            return Err(SemaError::semantic(
                format!("'{}' is neither an array nor a function", name),
                span,
            ));
        }

        let case_sensitive = self.config.intrinsics_case_sensitive;
        let Some(desc) = self.intrinsics.lookup(name, case_sensitive) else {
            return Err(SemaError::semantic(
                format!("reference to undeclared function '{}'", name),
                span,
            ));
        };
        if desc.is_subroutine() {
            return Err(SemaError::semantic(
                format!("subroutine '{}' used as a function", desc.name),
                span,
            ));
        }

        let args = self
            .intrinsics
            .check_args(desc, resolved, span, &mut self.diagnostics)?;
        let ty = self
            .intrinsics
            .return_type(desc, &args, span)?
            .ok_or_else(|| SemaError::semantic(format!("'{}' has no result", desc.name), span))?;
        if let Some(value) = self.intrinsics.fold(desc, &args, span)? {
            return Ok(SemaExpr::constant(value));
        }
        Ok(SemaExpr::new(
            SemaExprKind::Intrinsic { desc, args },
            ty,
            span,
        ))
    }

    fn resolve_element(
        &mut self,
        id: DeclId,
        ty: &SemaType,
        index: Vec<SemaExpr>,
        span: Span,
    ) -> SemaResult<SemaExpr> {
        let rank = ty.shape().map_or(0, |s| s.rank());
        if index.len() != rank {
            return Err(SemaError::semantic(
                format!("array of rank {} indexed with {} subscripts", rank, index.len()),
                span,
            ));
        }
        if let Some(bad) = index.iter().find(|i| !i.ty.is_integer()) {
            return Err(SemaError::type_error(
                format!("array subscript must be INTEGER, found {}", bad.ty),
                bad.span,
            ));
        }
        Ok(SemaExpr::new(
            SemaExprKind::Element { decl: id, index },
            ty.scalar(),
            span,
        ))
    }
}

/// Result type of a binary operation on non-constant operands
fn binary_type(op: BinaryOp, left: &SemaType, right: &SemaType) -> Option<SemaType> {
    match op {
        BinaryOp::Concat => {
            let (TypeKind::Character { kind: ka, len: la }, TypeKind::Character { kind: kb, len: lb }) =
                (&left.kind, &right.kind)
            else {
                return None;
            };
            if ka.char_width() != kb.char_width() {
                return None;
            }
            let len = match (la, lb) {
                (CharLen::Fixed(a), CharLen::Fixed(b)) => {
                    a.checked_add(*b).map_or(CharLen::Variable, CharLen::Fixed)
                }
                _ => CharLen::Variable,
            };
            Some(SemaType::character(*ka, len))
        }
        _ if op.is_logical() => {
            (left.is_logical() && right.is_logical()).then(SemaType::logical)
        }
        _ if op.is_relational() => {
            let joined = left.promote(right)?;
            let ordered = joined.is_numeric() && !joined.is_complex();
            let equality = matches!(op, BinaryOp::Eq | BinaryOp::Ne);
            (joined.is_character() || ordered || (equality && joined.is_complex()))
                .then(SemaType::logical)
        }
        BinaryOp::Pow if right.is_integer() && left.is_numeric() => Some(left.clone()),
        _ => {
            if !left.is_numeric() || !right.is_numeric() {
                return None;
            }
            let joined = left.promote(right)?;
            // BYTE arithmetic is carried out in INTEGER
            if joined.category() == Some(Category::Byte) {
                return Some(SemaType::integer());
            }
            Some(joined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrinsic::IntrinsicRegistry;
    use crate::scope::ScopeKind;
    use pretty_assertions::assert_eq;

    fn sp() -> Span {
        Span::default()
    }

    #[test]
    fn test_literals_fold() {
        let registry = IntrinsicRegistry::new();
        let mut sema = SemanticAnalyzer::new(&registry);
        let scope = sema.push_scope(ScopeKind::Program, None);

        let e = Expr::binary(BinaryOp::Mul, Expr::int(6, sp()), Expr::int(7, sp()), sp());
        let r = sema.resolve_expr(scope, &e).unwrap();
        assert!(r.is_constant());
        assert_eq!(r.constant.unwrap().as_integer(), Some(42));
    }

    #[test]
    fn test_name_declares_implicitly() {
        let registry = IntrinsicRegistry::new();
        let mut sema = SemanticAnalyzer::new(&registry);
        let scope = sema.push_scope(ScopeKind::Program, None);

        let r = sema.resolve_expr(scope, &Expr::name("N", sp())).unwrap();
        assert!(r.is_variable());
        assert!(!r.is_constant());
        assert!(r.ty.is_integer());

        let decl = sema.arena().lookup_decl(scope, "n").unwrap();
        assert!(decl.is_implicit());
        assert!(!decl.is_locked());
    }

    #[test]
    fn test_intrinsic_call_folds() {
        let registry = IntrinsicRegistry::new();
        let mut sema = SemanticAnalyzer::new(&registry);
        let scope = sema.push_scope(ScopeKind::Program, None);

        let e = Expr::call("max", vec![Expr::int(1, sp()), Expr::real(2.5, sp())], sp());
        let r = sema.resolve_expr(scope, &e).unwrap();
        assert!(r.ty.is_real());
        assert_eq!(r.constant.unwrap().as_real(), Some(2.5));
    }

    #[test]
    fn test_non_constant_operands_build_nodes() {
        let registry = IntrinsicRegistry::new();
        let mut sema = SemanticAnalyzer::new(&registry);
        let scope = sema.push_scope(ScopeKind::Program, None);

        let e = Expr::binary(BinaryOp::Add, Expr::name("I", sp()), Expr::real(1.0, sp()), sp());
        let r = sema.resolve_expr(scope, &e).unwrap();
        assert!(!r.is_constant());
        assert!(r.ty.is_real());

        let bad = Expr::binary(BinaryOp::And, Expr::name("X", sp()), Expr::logical(true, sp()), sp());
        assert!(matches!(
            sema.resolve_expr(scope, &bad),
            Err(SemaError::Type { .. })
        ));
    }

    #[test]
    fn test_cast_non_constant() {
        let registry = IntrinsicRegistry::new();
        let mut sema = SemanticAnalyzer::new(&registry);
        let scope = sema.push_scope(ScopeKind::Program, None);

        let i = sema.resolve_expr(scope, &Expr::name("I", sp())).unwrap();
        let cast = i.clone().cast(&SemaType::double()).unwrap();
        assert!(matches!(cast.kind, SemaExprKind::Cast { .. }));
        assert!(cast.ty.compare(&SemaType::double()));

        assert!(i.cast(&SemaType::logical()).is_err());
    }

    #[test]
    fn test_unknown_function_is_error() {
        let registry = IntrinsicRegistry::new();
        let mut sema = SemanticAnalyzer::new(&registry);
        let scope = sema.push_scope(ScopeKind::Program, None);

        let e = Expr::call("NOSUCH", vec![Expr::int(1, sp())], sp());
        assert!(matches!(
            sema.resolve_expr(scope, &e),
            Err(SemaError::Semantic { .. })
        ));
    }

    #[test]
    fn test_concat_length_overflow() {
        let long = SemaType::character(Kind::Default, CharLen::Fixed(3_000_000_000));
        let ty = binary_type(BinaryOp::Concat, &long, &long).unwrap();
        assert_eq!(ty.char_len(), Some(CharLen::Variable));

        let short = SemaType::character(Kind::Default, CharLen::Fixed(3));
        let ty = binary_type(BinaryOp::Concat, &short, &short).unwrap();
        assert_eq!(ty.char_len(), Some(CharLen::Fixed(6)));
    }
}
