//! Array specifications

use super::SemanticAnalyzer;
use crate::ast::{ArraySpec, Expr};
use crate::common::{SemaError, SemaResult};
use crate::scope::ScopeId;
use crate::types::{ArrayShape, Bound, Dimension};

impl SemanticAnalyzer<'_> {
    /// Resolve `(lower:upper, ...)` to a shape
    ///
    /// A missing lower bound is 1 and a missing upper bound is `*`.
    /// Bounds that are INTEGER but not constant are adjustable and left
    /// deferred.
    pub fn resolve_array_spec(&mut self, scope: ScopeId, spec: &ArraySpec) -> SemaResult<ArrayShape> {
        if spec.dims.is_empty() {
            return Err(SemaError::semantic("array specification without dimensions", spec.span));
        }
        let mut dims = Vec::with_capacity(spec.dims.len());
        for dim in &spec.dims {
            let lower = match &dim.lower {
                Some(expr) => self.resolve_bound(scope, expr)?,
                None => Bound::Const(1),
            };
            let upper = match &dim.upper {
                Some(expr) => self.resolve_bound(scope, expr)?,
                None => Bound::Deferred,
            };
            dims.push(Dimension::new(lower, upper));
        }
        Ok(ArrayShape::new(dims))
    }

    fn resolve_bound(&mut self, scope: ScopeId, expr: &Expr) -> SemaResult<Bound> {
        let bound = self.resolve_expr(scope, expr)?;
        if !bound.ty.is_integer() || !bound.ty.is_scalar() {
            return Err(SemaError::type_error(
                format!("array bound must be a scalar INTEGER, found {}", bound.ty),
                expr.span,
            ));
        }
        Ok(match bound.constant.and_then(|c| c.as_integer()) {
            Some(value) => Bound::Const(value),
            None => Bound::Deferred,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, DimSpec};
    use crate::common::Span;
    use crate::intrinsic::IntrinsicRegistry;
    use crate::scope::ScopeKind;
    use pretty_assertions::assert_eq;

    fn sp() -> Span {
        Span::default()
    }

    #[test]
    fn test_constant_bounds() {
        let registry = IntrinsicRegistry::new();
        let mut sema = SemanticAnalyzer::new(&registry);
        let scope = sema.push_scope(ScopeKind::Program, None);

        let spec = ArraySpec::new(
            vec![
                DimSpec::upto(Expr::int(10, sp())),
                DimSpec::range(
                    Expr::int(0, sp()),
                    Expr::binary(BinaryOp::Mul, Expr::int(2, sp()), Expr::int(2, sp()), sp()),
                ),
            ],
            sp(),
        );
        let shape = sema.resolve_array_spec(scope, &spec).unwrap();
        assert_eq!(
            shape.dims(),
            &[
                Dimension::upto(10),
                Dimension::new(Bound::Const(0), Bound::Const(4))
            ]
        );
        assert_eq!(shape.elem_count(), Some(50));
    }

    #[test]
    fn test_assumed_and_adjustable_bounds() {
        let registry = IntrinsicRegistry::new();
        let mut sema = SemanticAnalyzer::new(&registry);
        let scope = sema.push_scope(ScopeKind::Subroutine, None);

        let spec = ArraySpec::new(
            vec![DimSpec::upto(Expr::name("N", sp())), DimSpec::assumed()],
            sp(),
        );
        let shape = sema.resolve_array_spec(scope, &spec).unwrap();
        assert!(shape.is_deferred());
        assert_eq!(shape.dims()[1].upper, Bound::Deferred);
    }

    #[test]
    fn test_real_bound_rejected() {
        let registry = IntrinsicRegistry::new();
        let mut sema = SemanticAnalyzer::new(&registry);
        let scope = sema.push_scope(ScopeKind::Program, None);

        let spec = ArraySpec::new(vec![DimSpec::upto(Expr::real(2.0, sp()))], sp());
        assert!(matches!(
            sema.resolve_array_spec(scope, &spec),
            Err(SemaError::Type { .. })
        ));
    }
}
