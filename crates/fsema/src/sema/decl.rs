//! Declaration resolution
//!
//! Each declared item is resolved against a candidate copy of its
//! declaration. The table is only updated once every step has succeeded,
//! so a failing item never leaves a half-registered entry behind.

use tracing::debug;

use super::SemanticAnalyzer;
use crate::ast::{DeclItem, DeclStmt, Expr, Initializer, Lhs, ListEntry, StarLength, TypeName, TypeSpec};
use crate::common::{SemaError, SemaResult, Span, WarningKind};
use crate::scope::{DeclId, Declaration, Init, ScopeId};
use crate::typeval::TypeVal;
use crate::types::{CharLen, Kind, Qualifiers, SemaType};

impl SemanticAnalyzer<'_> {
    /// Resolve the base type of a declaration statement
    pub fn resolve_type_spec(&mut self, scope: ScopeId, spec: &TypeSpec) -> SemaResult<SemaType> {
        let mut ty = match spec.name {
            TypeName::Logical => SemaType::logical(),
            TypeName::Integer => SemaType::integer(),
            TypeName::Real => SemaType::real(),
            TypeName::DoublePrecision => SemaType::double(),
            TypeName::Complex => SemaType::complex(),
            TypeName::DoubleComplex => SemaType::double_complex(),
            TypeName::Character => SemaType::character(Kind::Default, CharLen::Fixed(1)),
            TypeName::Byte => SemaType::byte(),
        };

        if let Some(selector) = &spec.kind {
            let value = self.resolve_integer(scope, selector, "KIND selector")?;
            let kind = Kind::from_selector(value).ok_or_else(|| {
                SemaError::type_error(format!("invalid KIND selector {}", value), selector.span)
            })?;
            ty = ty.with_kind(kind).ok_or_else(|| {
                SemaError::type_error(format!("KIND selector not allowed for {}", ty), selector.span)
            })?;
        }

        for len in [&spec.star_len, &spec.len].into_iter().flatten() {
            ty = match len {
                StarLength::Variable if ty.is_character() => {
                    SemaType::character(ty.type_kind().unwrap_or_default(), CharLen::Variable)
                }
                StarLength::Variable => {
                    return Err(SemaError::type_error(
                        format!("assumed length is only valid for CHARACTER, not {}", ty),
                        spec.span,
                    ));
                }
                StarLength::Fixed(expr) => {
                    let n = self.resolve_star_len(scope, expr)?;
                    ty.with_star_len(n).ok_or_else(|| {
                        SemaError::type_error(format!("invalid length {} for {}", n, ty), expr.span)
                    })?
                }
            };
        }

        let attrs = spec.attributes;
        let mut qualifiers = Qualifiers::new();
        if attrs.save {
            qualifiers = qualifiers.with_static();
        }
        if attrs.automatic {
            qualifiers = qualifiers.with_automatic();
        }
        if attrs.volatile {
            qualifiers = qualifiers.with_volatile();
        }
        if attrs.target {
            qualifiers = qualifiers.with_target();
        }
        ty = ty.with_qualifiers(qualifiers);

        if let Some(dimension) = &spec.dimension {
            let shape = self.resolve_array_spec(scope, dimension)?;
            ty = SemaType::array(ty, shape);
        }
        Ok(ty)
    }

    /// Resolve every item of a declaration statement
    ///
    /// A failing item is reported and the remaining items are still
    /// resolved; the first error is returned.
    pub fn resolve_decl_stmt(&mut self, scope: ScopeId, stmt: &DeclStmt) -> SemaResult<Vec<DeclId>> {
        if stmt.items.is_empty() {
            return Err(self.report(SemaError::semantic(
                "declaration statement without entities",
                stmt.span,
            )));
        }
        let base = match self.resolve_type_spec(scope, &stmt.type_spec) {
            Ok(ty) => ty,
            Err(e) => return Err(self.report(e)),
        };

        let mut ids = Vec::with_capacity(stmt.items.len());
        let mut first_error = None;
        for item in &stmt.items {
            match self.resolve_decl_item(scope, &base, item) {
                Ok(id) => ids.push(id),
                Err(e) => {
                    let e = self.report(e);
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(ids),
        }
    }

    /// Resolve one declared item against the statement's base type
    pub fn resolve_decl_item(
        &mut self,
        scope: ScopeId,
        base: &SemaType,
        item: &DeclItem,
    ) -> SemaResult<DeclId> {
        let mut ty = base.clone();
        let mut lhs = &item.lhs;

        if let Lhs::StarLen { parent, len, span } = lhs {
            let StarLength::Fixed(expr) = len else {
                return Err(SemaError::unsupported(
                    "variable length star length in declaration list",
                    *span,
                ));
            };
            let n = self.resolve_star_len(scope, expr)?;
            ty = ty.with_star_len(n).ok_or_else(|| {
                SemaError::type_error(format!("invalid length {} for {}", n, ty), *span)
            })?;
            lhs = parent.as_ref();
        }

        if let Lhs::Array { parent, index, span } = lhs {
            let shape = self.resolve_array_spec(scope, index)?;
            if let Some(existing) = ty.shape() {
                if !existing.compare(&shape) {
                    return Err(SemaError::array_shape_conflict(
                        "conflicting array definitions in declaration",
                        *span,
                    ));
                }
                self.diagnostics.warning(
                    WarningKind::MultipleArrayDefinitions,
                    "multiple array definitions in declaration",
                    *span,
                );
            }
            ty = SemaType::array(ty, shape);
            lhs = parent.as_ref();
        }

        let Lhs::Variable { name, span } = lhs else {
            return Err(SemaError::semantic("invalid declarator", lhs.span()));
        };

        // A name reached through the view merges into its owner
        let mut candidate = match self.arena.find_visible(scope, name) {
            Some(id) => {
                let current = self
                    .arena
                    .decl(id)
                    .cloned()
                    .ok_or_else(|| SemaError::semantic("dangling declaration handle", *span))?;
                merge_declaration(current, ty, *span)?
            }
            None => Declaration::new(name.as_str(), ty, *span),
        };

        match &item.init {
            None => {}
            Some(Initializer::Expr(expr)) => self.init_expr(scope, &mut candidate, expr)?,
            Some(Initializer::List(entries)) => {
                self.init_list(scope, &mut candidate, entries, item.span)?
            }
        }

        self.commit(scope, candidate, *span)
    }

    /// Initialize one element of an array declaration, as DATA does
    ///
    /// An offset past the last element is dropped with a warning.
    pub fn init_offset(
        &mut self,
        scope: ScopeId,
        id: DeclId,
        offset: u64,
        expr: &Expr,
    ) -> SemaResult<()> {
        let value = self.resolve_constant(scope, expr, "initializer element")?;
        let mut decl = self
            .arena
            .decl(id)
            .cloned()
            .ok_or_else(|| SemaError::semantic("unknown declaration", expr.span))?;
        if decl.ty().is_procedure() {
            return Err(SemaError::semantic(
                format!("cannot initialize procedure '{}'", decl.name()),
                expr.span,
            ));
        }

        if !decl.ty().is_array() {
            if offset != 0 {
                return Err(SemaError::semantic(
                    format!("element offset {} into scalar '{}'", offset, decl.name()),
                    expr.span,
                ));
            }
            let value = value.cast(decl.ty())?.with_span(expr.span);
            self.store_scalar(&mut decl, value, expr.span)?;
        } else {
            let count = array_len(&decl, expr.span)?;
            if decl.is_locked() {
                self.diagnostics.warning(
                    WarningKind::SplitInitialization,
                    "initializing array in multiple statements",
                    expr.span,
                );
            }
            if offset >= count as u64 {
                self.diagnostics.warning(
                    WarningKind::OutOfBounds,
                    format!("initializer destination {} out of bounds", offset),
                    expr.span,
                );
                return Ok(());
            }
            let value = value.cast(decl.ty().base())?.with_span(expr.span);
            self.store_element(&mut decl, count, offset as usize, value, expr.span)?;
            decl.lock();
        }

        if let Some(slot) = self.arena.decl_mut(id) {
            *slot = decl;
        }
        Ok(())
    }

    /// Declare `name` from the scope's implicit rules
    pub fn declare_implicit(&mut self, scope: ScopeId, name: &str, span: Span) -> SemaResult<DeclId> {
        let ty = self.implicit_type(scope, name, span)?;
        self.add_implicit(scope, Declaration::implicit(name, ty, span), span)
    }

    /// Implicit declaration from a declarator, keeping any array shape
    pub fn declare_implicit_lhs(&mut self, scope: ScopeId, lhs: &Lhs) -> SemaResult<DeclId> {
        let name = lhs.base_name();
        let span = lhs.span();
        let mut ty = self.implicit_type(scope, name, span)?;
        if let Lhs::Array { index, .. } = lhs {
            let shape = self.resolve_array_spec(scope, index)?;
            ty = SemaType::array(ty, shape);
        }
        self.add_implicit(scope, Declaration::implicit(name, ty, span), span)
    }

    fn implicit_type(&self, scope: ScopeId, name: &str, span: Span) -> SemaResult<SemaType> {
        self.arena
            .get(scope)
            .and_then(|s| s.implicit().get(name))
            .cloned()
            .ok_or_else(|| SemaError::semantic(format!("no implicit type for {}", name), span))
    }

    fn add_implicit(&mut self, scope: ScopeId, decl: Declaration, span: Span) -> SemaResult<DeclId> {
        let id = self.arena.add_decl(scope, decl).map_err(|d| {
            SemaError::semantic(format!("'{}' is already declared", d.name()), span)
        })?;
        debug!(?id, "implicit declaration");
        Ok(id)
    }

    /// `*n` length; must fold to a non-negative INTEGER
    fn resolve_star_len(&mut self, scope: ScopeId, expr: &Expr) -> SemaResult<u32> {
        self.resolve_expr(scope, expr)?
            .constant
            .and_then(|c| c.as_integer())
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                SemaError::semantic("star length must be a positive whole integer", expr.span)
            })
    }

    fn commit(&mut self, scope: ScopeId, decl: Declaration, span: Span) -> SemaResult<DeclId> {
        let name = decl.name().to_string();
        if let Some(id) = self.arena.find_visible(scope, &name) {
            if let Some(slot) = self.arena.decl_mut(id) {
                *slot = decl;
            }
            debug!(%name, ?id, "updated declaration");
            return Ok(id);
        }
        let id = self
            .arena
            .add_decl(scope, decl)
            .map_err(|_| SemaError::semantic(format!("cannot declare '{}'", name), span))?;
        debug!(%name, ?id, "created declaration");
        Ok(id)
    }

    /// `= expr` initializer
    fn init_expr(&mut self, scope: ScopeId, decl: &mut Declaration, expr: &Expr) -> SemaResult<()> {
        if decl.ty().is_procedure() {
            return Err(SemaError::semantic(
                format!("cannot initialize procedure '{}'", decl.name()),
                expr.span,
            ));
        }
        // Names in a rejected initializer stay implicitly declared
        let value = self.resolve_expr(scope, expr)?;
        let Some(constant) = value.constant else {
            return Err(SemaError::non_constant("initializer is not constant", expr.span));
        };
        if decl.ty().is_composite() {
            return Err(SemaError::unsupported(
                "cannot initialize non-scalar declaration with an expression",
                expr.span,
            ));
        }
        let value = constant.cast(decl.ty())?.with_span(expr.span);
        self.store_scalar(decl, value, expr.span)
    }

    /// `/ v1, n*v2, ... /` initializer
    fn init_list(
        &mut self,
        scope: ScopeId,
        decl: &mut Declaration,
        entries: &[ListEntry],
        span: Span,
    ) -> SemaResult<()> {
        if decl.ty().is_procedure() {
            return Err(SemaError::semantic(
                format!("cannot initialize procedure '{}'", decl.name()),
                span,
            ));
        }
        let limit = if decl.ty().is_array() {
            array_len(decl, span)?
        } else {
            1
        };

        let mut values = Vec::new();
        let mut total: u64 = 0;
        for entry in entries {
            let repeat = match &entry.repeat {
                Some(expr) => {
                    let n = self.resolve_integer(scope, expr, "repeat count")?;
                    u64::try_from(n).map_err(|_| {
                        SemaError::semantic("repeat count must not be negative", expr.span)
                    })?
                }
                None => 1,
            };
            let value = self.resolve_constant(scope, &entry.value, "initializer element")?;
            total = total.saturating_add(repeat);
            let room = limit.saturating_sub(values.len()) as u64;
            for _ in 0..repeat.min(room) {
                values.push(value.clone());
            }
        }
        if values.is_empty() {
            return Ok(());
        }

        if !decl.ty().is_array() {
            if total > 1 {
                return Err(SemaError::semantic(
                    format!("too many values to initialize scalar '{}'", decl.name()),
                    span,
                ));
            }
            let value = values[0].cast(decl.ty())?.with_span(values[0].span());
            return self.store_scalar(decl, value, span);
        }

        if decl.is_locked() {
            self.diagnostics.warning(
                WarningKind::SplitInitialization,
                "initializing array in multiple statements",
                span,
            );
        }
        if total > limit as u64 {
            self.diagnostics.warning(
                WarningKind::InitializerTruncated,
                format!("array initializer too large, truncating to {} elements", limit),
                span,
            );
        }

        let base = decl.ty().base().clone();
        for (index, value) in values.iter().enumerate() {
            let value = value.cast(&base)?;
            let value_span = value.span();
            self.store_element(decl, limit, index, value, value_span)?;
        }
        decl.lock();
        debug!(name = decl.name(), elements = values.len(), "initialized array");
        Ok(())
    }

    fn store_scalar(&mut self, decl: &mut Declaration, value: TypeVal, span: Span) -> SemaResult<()> {
        if decl.is_locked() {
            return match decl.init() {
                Init::Scalar(existing) if existing.compare(&value) => {
                    self.diagnostics.warning(
                        WarningKind::DuplicateInitialization,
                        format!("duplicate initialization of '{}'", decl.name()),
                        span,
                    );
                    Ok(())
                }
                _ => Err(SemaError::lock_violation(
                    format!("can't initialize '{}' after use", decl.name()),
                    span,
                )),
            };
        }
        debug!(name = decl.name(), %value, "initialized");
        decl.set_init(Init::Scalar(value));
        decl.lock();
        Ok(())
    }

    fn store_element(
        &mut self,
        decl: &mut Declaration,
        count: usize,
        index: usize,
        value: TypeVal,
        span: Span,
    ) -> SemaResult<()> {
        if !matches!(decl.init(), Init::Elements(_)) {
            decl.set_init(Init::Elements(vec![None; count]));
        }
        let Init::Elements(slots) = decl.init_mut() else {
            return Ok(());
        };
        let Some(slot) = slots.get_mut(index) else {
            return Ok(());
        };
        match slot {
            Some(existing) if existing.compare(&value) => {
                self.diagnostics.warning(
                    WarningKind::ElementReinitialized,
                    format!("re-initialization of array element {}", index),
                    span,
                );
                Ok(())
            }
            Some(_) => Err(SemaError::lock_violation(
                format!("re-initialization of array element {} with different value", index),
                span,
            )),
            None => {
                *slot = Some(value);
                Ok(())
            }
        }
    }
}

/// Merge a redeclaration into an existing declaration
fn merge_declaration(mut decl: Declaration, ty: SemaType, span: Span) -> SemaResult<Declaration> {
    if !decl.ty().scalar().compare(&ty.scalar()) {
        if decl.is_locked() {
            return Err(SemaError::lock_violation(
                format!("redefining type of '{}' after initialization", decl.name()),
                span,
            ));
        }
        if !decl.is_implicit() {
            return Err(SemaError::type_conflict(
                format!("redeclaration of '{}' with different type", decl.name()),
                span,
            ));
        }
    }

    let shape = match (ty.shape(), decl.ty().shape()) {
        (Some(new), Some(old)) if !new.compare(old) => {
            return Err(SemaError::array_shape_conflict(
                format!("redefining array dimensions of '{}'", decl.name()),
                span,
            ));
        }
        (Some(new), _) => Some(new.clone()),
        (None, old) => old.cloned(),
    };
    let qualifiers = decl.ty().qualifiers.merge(ty.qualifiers);
    let scalar = ty.scalar();
    let merged = match shape {
        Some(shape) => SemaType::array(scalar, shape),
        None => scalar,
    }
    .with_qualifiers(qualifiers);

    if decl.is_locked() && !merged.compare(decl.ty()) {
        return Err(SemaError::lock_violation(
            format!("redefining '{}' after initialization", decl.name()),
            span,
        ));
    }

    debug!(name = decl.name(), ty = %merged, "merged declaration");
    decl.set_ty(merged);
    decl.set_explicit();
    Ok(decl)
}

/// Element count of an array declaration with known bounds
fn array_len(decl: &Declaration, span: Span) -> SemaResult<usize> {
    decl.ty()
        .elem_count()
        .filter(|_| decl.ty().shape().is_some_and(|s| !s.is_deferred()))
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            SemaError::unsupported(
                format!("cannot initialize '{}' of deferred size", decl.name()),
                span,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArraySpec, Attributes, DimSpec};
    use crate::intrinsic::IntrinsicRegistry;
    use crate::scope::ScopeKind;
    use pretty_assertions::assert_eq;

    fn sp() -> Span {
        Span::default()
    }

    fn stmt(name: TypeName, items: Vec<DeclItem>) -> DeclStmt {
        DeclStmt::new(TypeSpec::new(name, sp()), items, sp())
    }

    fn var(name: &str) -> DeclItem {
        DeclItem::new(Lhs::var(name, sp()), sp())
    }

    fn var_init(name: &str, init: Expr) -> DeclItem {
        var(name).with_init(Initializer::Expr(init))
    }

    fn vector(name: &str, len: i64) -> Lhs {
        Lhs::var(name, sp()).array(ArraySpec::new(vec![DimSpec::upto(Expr::int(len, sp()))], sp()))
    }

    fn list(values: Vec<ListEntry>) -> Initializer {
        Initializer::List(values)
    }

    fn setup(registry: &IntrinsicRegistry) -> (SemanticAnalyzer<'_>, ScopeId) {
        let mut sema = SemanticAnalyzer::new(registry);
        let scope = sema.push_scope(ScopeKind::Program, None);
        (sema, scope)
    }

    fn elements(sema: &SemanticAnalyzer<'_>, scope: ScopeId, name: &str) -> Vec<Option<i64>> {
        match sema.arena().lookup_decl(scope, name).unwrap().init() {
            Init::Elements(slots) => slots
                .iter()
                .map(|s| s.as_ref().and_then(|v| v.as_integer()))
                .collect(),
            other => panic!("expected element initializer, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_redeclaration() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let a = sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var("X")])).unwrap();
        let b = sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var("x")])).unwrap();
        assert_eq!(a, b);
        assert_eq!(sema.arena().get(scope).unwrap().decls().len(), 1);
    }

    #[test]
    fn test_conflicting_redeclaration() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var("X")])).unwrap();
        let err = sema
            .resolve_decl_stmt(scope, &stmt(TypeName::Real, vec![var("X")]))
            .unwrap_err();
        assert!(matches!(err, SemaError::TypeConflict { .. }));
        assert!(sema.arena().lookup_decl(scope, "X").unwrap().ty().is_integer());
    }

    #[test]
    fn test_implicit_then_explicit() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let used = sema.resolve_expr(scope, &Expr::name("X", sp())).unwrap();
        assert!(used.ty.is_real());

        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var("X")])).unwrap();
        let decl = sema.arena().lookup_decl(scope, "X").unwrap();
        assert!(!decl.is_implicit());
        assert!(decl.ty().is_integer());
    }

    #[test]
    fn test_duplicate_initialization() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let init = |v| stmt(TypeName::Integer, vec![var_init("X", Expr::int(v, sp()))]);
        sema.resolve_decl_stmt(scope, &init(1)).unwrap();
        sema.resolve_decl_stmt(scope, &init(1)).unwrap();
        assert_eq!(sema.diagnostics().count(WarningKind::DuplicateInitialization), 1);

        let err = sema.resolve_decl_stmt(scope, &init(2)).unwrap_err();
        assert!(matches!(err, SemaError::LockViolation { .. }));

        let decl = sema.arena().lookup_decl(scope, "X").unwrap();
        assert!(decl.is_locked());
        match decl.init() {
            Init::Scalar(v) => assert_eq!(v.as_integer(), Some(1)),
            other => panic!("unexpected initializer {:?}", other),
        }
    }

    #[test]
    fn test_retype_after_initialization() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        sema.resolve_decl_stmt(scope, &stmt(TypeName::Real, vec![var_init("X", Expr::real(1.0, sp()))]))
            .unwrap();
        let err = sema
            .resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var("X")]))
            .unwrap_err();
        assert!(matches!(err, SemaError::LockViolation { .. }));
    }

    #[test]
    fn test_initializer_is_cast() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var_init("N", Expr::real(2.9, sp()))]))
            .unwrap();
        match sema.arena().lookup_decl(scope, "N").unwrap().init() {
            Init::Scalar(v) => assert_eq!(v.as_integer(), Some(2)),
            other => panic!("unexpected initializer {:?}", other),
        }
    }

    #[test]
    fn test_transfer_initializer() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let transfer = Expr::call("TRANSFER", vec![Expr::real(1.0, sp()), Expr::int(0, sp())], sp());
        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var_init("I", transfer)]))
            .unwrap();
        match sema.arena().lookup_decl(scope, "I").unwrap().init() {
            Init::Scalar(v) => assert_eq!(v.as_integer(), Some(1065353216)),
            other => panic!("unexpected initializer {:?}", other),
        }
    }

    #[test]
    fn test_non_constant_initializer() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let err = sema
            .resolve_decl_stmt(scope, &stmt(TypeName::Real, vec![var_init("X", Expr::name("Y", sp()))]))
            .unwrap_err();
        assert!(matches!(err, SemaError::NonConstantInitializer { .. }));
        assert!(sema.arena().find_local(scope, "X").is_none());
    }

    #[test]
    fn test_failed_item_does_not_stop_statement() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var("A")])).unwrap();
        let result = sema.resolve_decl_stmt(scope, &stmt(TypeName::Real, vec![var("A"), var("B")]));
        assert!(matches!(result, Err(SemaError::TypeConflict { .. })));
        assert!(sema.arena().lookup_decl(scope, "B").unwrap().ty().is_real());
        assert_eq!(sema.diagnostics().errors().len(), 1);
    }

    #[test]
    fn test_array_list_truncates() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let values = (1..=4).map(|v| ListEntry::new(Expr::int(v, sp()))).collect();
        let item = DeclItem::new(vector("A", 3), sp()).with_init(list(values));
        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![item])).unwrap();

        assert_eq!(sema.diagnostics().count(WarningKind::InitializerTruncated), 1);
        assert_eq!(elements(&sema, scope, "A"), vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_repeat_counts() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let values = vec![
            ListEntry::repeated(Expr::int(2, sp()), Expr::int(7, sp())),
            ListEntry::new(Expr::int(9, sp())),
        ];
        let item = DeclItem::new(vector("A", 4), sp()).with_init(list(values));
        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![item])).unwrap();

        assert_eq!(elements(&sema, scope, "A"), vec![Some(7), Some(7), Some(9), None]);
        assert!(sema.diagnostics().warnings().is_empty());
    }

    #[test]
    fn test_element_reinitialization() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![DeclItem::new(vector("A", 3), sp())]))
            .unwrap();
        let id = sema.arena().find_local(scope, "A").unwrap();

        sema.init_offset(scope, id, 1, &Expr::int(5, sp())).unwrap();
        sema.init_offset(scope, id, 1, &Expr::int(5, sp())).unwrap();
        assert_eq!(sema.diagnostics().count(WarningKind::ElementReinitialized), 1);
        assert_eq!(sema.diagnostics().count(WarningKind::SplitInitialization), 1);

        let err = sema.init_offset(scope, id, 1, &Expr::int(6, sp())).unwrap_err();
        assert!(matches!(err, SemaError::LockViolation { .. }));

        sema.init_offset(scope, id, 3, &Expr::int(1, sp())).unwrap();
        assert_eq!(sema.diagnostics().count(WarningKind::OutOfBounds), 1);
        assert_eq!(elements(&sema, scope, "A"), vec![None, Some(5), None]);
    }

    #[test]
    fn test_array_expression_initializer_unsupported() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let item = DeclItem::new(vector("A", 2), sp()).with_init(Initializer::Expr(Expr::int(0, sp())));
        let err = sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![item])).unwrap_err();
        assert!(matches!(err, SemaError::UnsupportedFeature { .. }));
    }

    #[test]
    fn test_array_shape_conflicts() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![DeclItem::new(vector("A", 10), sp())]))
            .unwrap();
        let err = sema
            .resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![DeclItem::new(vector("A", 5), sp())]))
            .unwrap_err();
        assert!(matches!(err, SemaError::ArrayShapeConflict { .. }));

        // A plain redeclaration keeps the existing shape
        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var("A")])).unwrap();
        assert_eq!(sema.arena().lookup_decl(scope, "A").unwrap().ty().elem_count(), Some(10));
    }

    #[test]
    fn test_dimension_attribute_and_declarator() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);
        let dims = |n| ArraySpec::new(vec![DimSpec::upto(Expr::int(n, sp()))], sp());

        let spec = TypeSpec::new(TypeName::Real, sp()).with_dimension(dims(3));
        let same = DeclStmt::new(spec.clone(), vec![DeclItem::new(vector("A", 3), sp())], sp());
        sema.resolve_decl_stmt(scope, &same).unwrap();
        assert_eq!(sema.diagnostics().count(WarningKind::MultipleArrayDefinitions), 1);

        let different = DeclStmt::new(spec, vec![DeclItem::new(vector("B", 4), sp())], sp());
        assert!(matches!(
            sema.resolve_decl_stmt(scope, &different),
            Err(SemaError::ArrayShapeConflict { .. })
        ));
    }

    #[test]
    fn test_star_length_item() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let lhs = Lhs::var("C", sp()).star_len(StarLength::Fixed(Expr::int(5, sp())));
        let item = DeclItem::new(lhs, sp()).with_init(Initializer::Expr(Expr::string("hi", sp())));
        sema.resolve_decl_stmt(scope, &stmt(TypeName::Character, vec![item])).unwrap();

        let decl = sema.arena().lookup_decl(scope, "C").unwrap();
        assert_eq!(decl.ty().char_len(), Some(CharLen::Fixed(5)));
        match decl.init() {
            Init::Scalar(v) => assert_eq!(v.as_bytes(), Some(&b"hi   "[..])),
            other => panic!("unexpected initializer {:?}", other),
        }

        let wide = Lhs::var("I", sp()).star_len(StarLength::Fixed(Expr::int(2, sp())));
        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![DeclItem::new(wide, sp())]))
            .unwrap();
        assert_eq!(sema.arena().lookup_decl(scope, "I").unwrap().ty().size(), Some(2));
    }

    #[test]
    fn test_star_length_errors() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let variable = Lhs::var("C", sp()).star_len(StarLength::Variable);
        let err = sema
            .resolve_decl_stmt(scope, &stmt(TypeName::Character, vec![DeclItem::new(variable, sp())]))
            .unwrap_err();
        assert!(matches!(err, SemaError::UnsupportedFeature { .. }));

        let negative = Lhs::var("D", sp()).star_len(StarLength::Fixed(Expr::int(-1, sp())));
        let err = sema
            .resolve_decl_stmt(scope, &stmt(TypeName::Character, vec![DeclItem::new(negative, sp())]))
            .unwrap_err();
        assert!(matches!(err, SemaError::Semantic { .. }));
    }

    #[test]
    fn test_type_spec_modifiers() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let spec = TypeSpec::new(TypeName::Real, sp()).with_kind(Expr::int(8, sp()));
        let ty = sema.resolve_type_spec(scope, &spec).unwrap();
        assert!(ty.compare(&SemaType::double()));

        let spec = TypeSpec::new(TypeName::Character, sp()).with_len(StarLength::Variable);
        let ty = sema.resolve_type_spec(scope, &spec).unwrap();
        assert_eq!(ty.char_len(), Some(CharLen::Variable));

        let spec = TypeSpec::new(TypeName::Integer, sp()).with_attributes(Attributes {
            save: true,
            volatile: true,
            ..Attributes::default()
        });
        let ty = sema.resolve_type_spec(scope, &spec).unwrap();
        assert!(ty.qualifiers.is_static);
        assert!(ty.qualifiers.is_volatile);

        let spec = TypeSpec::new(TypeName::Integer, sp()).with_kind(Expr::int(3, sp()));
        assert!(sema.resolve_type_spec(scope, &spec).is_err());
    }

    #[test]
    fn test_qualifiers_merge_on_redeclaration() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        sema.resolve_decl_stmt(scope, &stmt(TypeName::Integer, vec![var("X")])).unwrap();
        let spec = TypeSpec::new(TypeName::Integer, sp()).with_attributes(Attributes {
            save: true,
            ..Attributes::default()
        });
        sema.resolve_decl_stmt(scope, &DeclStmt::new(spec, vec![var("X")], sp()))
            .unwrap();
        assert!(sema.arena().lookup_decl(scope, "X").unwrap().ty().qualifiers.is_static);
    }

    #[test]
    fn test_declare_implicit_lhs() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);

        let id = sema.declare_implicit_lhs(scope, &vector("K", 4)).unwrap();
        let decl = sema.arena().decl(id).unwrap();
        assert!(decl.is_implicit());
        assert!(decl.ty().base().is_integer());
        assert_eq!(decl.ty().elem_count(), Some(4));
        assert!(sema.declare_implicit(scope, "K", sp()).is_err());
    }

    #[test]
    fn test_bind_procedure_locks() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, scope) = setup(&registry);
        let body = sema.push_scope(ScopeKind::Function, Some(scope));

        let f = sema
            .arena_mut()
            .add_decl(scope, Declaration::new("F", SemaType::function(SemaType::real()), sp()))
            .unwrap();
        sema.bind_procedure(f, body, sp()).unwrap();
        assert!(sema.arena().decl(f).unwrap().is_locked());

        let g = sema
            .arena_mut()
            .add_decl(scope, Declaration::new("G", SemaType::function(SemaType::integer()), sp()))
            .unwrap();
        sema.bind_equivalence(g, 1, sp()).unwrap();
        assert!(matches!(
            sema.bind_procedure(g, body, sp()),
            Err(SemaError::LockViolation { .. })
        ));
        assert_eq!(sema.arena().decl(g).unwrap().procedure(), None);
    }

    #[test]
    fn test_redeclaration_through_view_merges_owner() {
        let registry = IntrinsicRegistry::new();
        let (mut sema, owner) = setup(&registry);
        let user = sema.push_scope(ScopeKind::Subroutine, None);

        let x = sema.declare_implicit(owner, "X", sp()).unwrap();
        sema.arena_mut().add_view(user, "X", x).unwrap();

        let ids = sema
            .resolve_decl_stmt(user, &stmt(TypeName::Integer, vec![var("X")]))
            .unwrap();
        assert_eq!(ids, vec![x]);
        assert!(sema.arena().find_local(user, "X").is_none());

        let decl = sema.arena().decl(x).unwrap();
        assert!(decl.ty().is_integer());
        assert!(!decl.is_implicit());
    }
}
