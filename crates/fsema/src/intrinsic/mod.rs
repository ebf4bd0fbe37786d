//! Intrinsic procedure registry
//!
//! Descriptors live in static tables. The registry builds a case-folded
//! name index over each table the first time it is queried.

mod check;
mod descriptor;
mod fold;
mod param;
mod tables;

use std::cell::OnceCell;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::common::{Diagnostics, SemaResult, Span};
use crate::sema::SemaExpr;
use crate::typeval::TypeVal;
use crate::types::SemaType;

pub use descriptor::{ArgSpec, Family, IntrinsicDescriptor, ReturnCallback, ReturnRule};
pub use fold::Fold;
pub use param::{Intent, Param};

type NameIndex = HashMap<String, usize>;

/// Lookup, checking and folding of intrinsic calls
///
/// Construct once and pass by reference. The indices use `OnceCell`, so
/// a registry is not shared across threads.
#[derive(Debug, Default)]
pub struct IntrinsicRegistry {
    operators: OnceCell<NameIndex>,
    functions: OnceCell<NameIndex>,
    subroutines: OnceCell<NameIndex>,
}

fn build_index(table: &'static [IntrinsicDescriptor], label: &str) -> NameIndex {
    let index: NameIndex = table
        .iter()
        .enumerate()
        .map(|(i, d)| (d.name.to_ascii_uppercase(), i))
        .collect();
    debug!(table = label, entries = index.len(), "built intrinsic index");
    index
}

fn find(
    cell: &OnceCell<NameIndex>,
    table: &'static [IntrinsicDescriptor],
    label: &str,
    name: &str,
) -> Option<&'static IntrinsicDescriptor> {
    let index = cell.get_or_init(|| build_index(table, label));
    index
        .get(&name.to_ascii_uppercase())
        .and_then(|&i| table.get(i))
}

impl IntrinsicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an operator or function intrinsic
    ///
    /// Case-sensitive mode additionally requires the canonical spelling.
    pub fn lookup(&self, name: &str, case_sensitive: bool) -> Option<&'static IntrinsicDescriptor> {
        let desc = find(&self.operators, tables::OPERATORS, "operators", name)
            .or_else(|| find(&self.functions, tables::FUNCTIONS, "functions", name))?;
        trace!(name, found = desc.name, "intrinsic lookup");
        (!case_sensitive || desc.name == name).then_some(desc)
    }

    pub fn lookup_subroutine(
        &self,
        name: &str,
        case_sensitive: bool,
    ) -> Option<&'static IntrinsicDescriptor> {
        let desc = find(&self.subroutines, tables::SUBROUTINES, "subroutines", name)?;
        (!case_sensitive || desc.name == name).then_some(desc)
    }

    /// Whether `name` is a reserved Fortran 90 intrinsic name
    pub fn is_reserved(&self, name: &str) -> bool {
        tables::RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
    }

    /// Result type of a call with these arguments; `None` for subroutines
    pub fn return_type(
        &self,
        desc: &IntrinsicDescriptor,
        args: &[SemaExpr],
        span: Span,
    ) -> SemaResult<Option<SemaType>> {
        check::return_type(desc, args, span)
    }

    /// Check arity and convert each argument to its parameter type
    ///
    /// Unexpected but convertible arguments are converted with a warning.
    pub fn check_args(
        &self,
        desc: &IntrinsicDescriptor,
        args: Vec<SemaExpr>,
        span: Span,
        diagnostics: &mut Diagnostics,
    ) -> SemaResult<Vec<SemaExpr>> {
        check::check_args(desc, args, span, diagnostics)
    }

    /// Evaluate a call whose checked arguments are all constant
    pub fn fold(
        &self,
        desc: &IntrinsicDescriptor,
        args: &[SemaExpr],
        span: Span,
    ) -> SemaResult<Option<TypeVal>> {
        let Some(fold) = desc.fold else {
            return Ok(None);
        };
        let Some(values) = args
            .iter()
            .map(|a| a.constant.clone())
            .collect::<Option<Vec<_>>>()
        else {
            return Ok(None);
        };
        let Some(ret) = self.return_type(desc, args, span)? else {
            return Ok(None);
        };
        let value = fold.apply(&values, &ret, span)?;
        trace!(name = desc.name, %value, "folded intrinsic");
        Ok(Some(value))
    }

    /// Cast operator whose result type compares equal to `ty`
    pub fn cast_function(&self, ty: &SemaType) -> Option<&'static IntrinsicDescriptor> {
        tables::OPERATORS.iter().find(|d| {
            let ReturnRule::Param(ret) = d.returns else {
                return false;
            };
            d.is_cast()
                && d.args == ArgSpec::Uniform(Param::Any)
                && ret.conversion_type().is_some_and(|t| t.compare(ty))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SemaError;
    use crate::types::Kind;
    use pretty_assertions::assert_eq;

    fn constant(value: TypeVal) -> SemaExpr {
        SemaExpr::constant(value)
    }

    fn int(v: i64) -> SemaExpr {
        constant(TypeVal::integer(v, Kind::Default, Span::default()))
    }

    fn real(v: f64) -> SemaExpr {
        constant(TypeVal::real(v, Kind::Default, Span::default()))
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let registry = IntrinsicRegistry::new();
        assert_eq!(registry.lookup("sqrt", false).map(|d| d.name), Some("SQRT"));
        assert_eq!(registry.lookup("len", false).map(|d| d.name), Some("Len"));
        assert!(registry.lookup("nosuch", false).is_none());
    }

    #[test]
    fn test_lookup_case_sensitive() {
        let registry = IntrinsicRegistry::new();
        assert!(registry.lookup("SQRT", true).is_some());
        assert!(registry.lookup("sqrt", true).is_none());
        assert!(registry.lookup("Len", true).is_some());
        assert!(registry.lookup("LEN", true).is_none());
    }

    #[test]
    fn test_subroutine_lookup() {
        let registry = IntrinsicRegistry::new();
        let desc = registry.lookup_subroutine("itime", false).unwrap();
        assert!(desc.is_subroutine());
        assert!(registry.lookup("ITime", false).is_none());
    }

    #[test]
    fn test_max_unifies_to_real() {
        let registry = IntrinsicRegistry::new();
        let mut diags = Diagnostics::new();
        let desc = registry.lookup("MAX", false).unwrap();

        let args = registry
            .check_args(desc, vec![int(1), real(2.5)], Span::default(), &mut diags)
            .unwrap();
        assert!(args.iter().all(|a| a.ty.is_real()));

        let ty = registry.return_type(desc, &args, Span::default()).unwrap().unwrap();
        assert!(ty.compare(&SemaType::real()));

        let value = registry.fold(desc, &args, Span::default()).unwrap().unwrap();
        assert_eq!(value.as_real(), Some(2.5));
    }

    #[test]
    fn test_mod_rejects_character() {
        let registry = IntrinsicRegistry::new();
        let mut diags = Diagnostics::new();
        let desc = registry.lookup("MOD", false).unwrap();
        let text = constant(TypeVal::string("a", Span::default()));

        let result = registry.check_args(desc, vec![text, int(1)], Span::default(), &mut diags);
        assert!(matches!(result, Err(SemaError::ArgumentType { .. })));
    }

    #[test]
    fn test_arity_errors_name_intrinsic() {
        let registry = IntrinsicRegistry::new();
        let mut diags = Diagnostics::new();
        let desc = registry.lookup("MOD", false).unwrap();

        let err = registry
            .check_args(desc, vec![int(1)], Span::default(), &mut diags)
            .unwrap_err();
        assert!(matches!(err, SemaError::Arity { .. }));
        assert!(err.message().contains("MOD"));
    }

    #[test]
    fn test_transfer_folds() {
        let registry = IntrinsicRegistry::new();
        let mut diags = Diagnostics::new();
        let desc = registry.lookup("transfer", false).unwrap();

        let args = registry
            .check_args(desc, vec![real(1.0), int(0)], Span::default(), &mut diags)
            .unwrap();
        let value = registry.fold(desc, &args, Span::default()).unwrap().unwrap();
        assert_eq!(value.as_integer(), Some(1065353216));
    }

    #[test]
    fn test_transfer_size_unsupported() {
        let registry = IntrinsicRegistry::new();
        let desc = registry.lookup("TRANSFER", false).unwrap();
        let result = registry.return_type(desc, &[real(1.0), int(0), int(4)], Span::default());
        assert!(matches!(result, Err(SemaError::UnsupportedFeature { .. })));
    }

    #[test]
    fn test_castable_argument_warns() {
        let registry = IntrinsicRegistry::new();
        let mut diags = Diagnostics::new();
        let desc = registry.lookup("IFIX", false).unwrap();

        let args = registry
            .check_args(desc, vec![int(3)], Span::default(), &mut diags)
            .unwrap();
        assert_eq!(diags.count(crate::common::WarningKind::ArgumentType), 1);
        assert!(args[0].ty.is_real());
    }

    #[test]
    fn test_char_kind_from_argument() {
        let registry = IntrinsicRegistry::new();
        let desc = registry.lookup("CHAR", false).unwrap();
        let ty = registry
            .return_type(desc, &[int(65), int(2)], Span::default())
            .unwrap()
            .unwrap();
        assert_eq!(ty.type_kind(), Some(Kind::Bytes(2)));
    }

    #[test]
    fn test_is_reserved() {
        let registry = IntrinsicRegistry::new();
        assert!(registry.is_reserved("transpose"));
        assert!(registry.is_reserved("TRIM"));
        assert!(!registry.is_reserved("FOO"));
    }

    #[test]
    fn test_cast_function() {
        let registry = IntrinsicRegistry::new();
        assert_eq!(registry.cast_function(&SemaType::integer()).map(|d| d.name), Some("INT"));
        assert_eq!(registry.cast_function(&SemaType::double()).map(|d| d.name), Some("DBLE"));
        assert_eq!(
            registry.cast_function(&SemaType::double_complex()).map(|d| d.name),
            Some("DCMPLX")
        );
        assert!(registry.cast_function(&SemaType::logical()).is_none());
    }
}
