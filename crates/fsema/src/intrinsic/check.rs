//! Argument checking and result typing for intrinsic calls

use super::descriptor::{Family, IntrinsicDescriptor, ReturnCallback, ReturnRule};
use super::{Intent, Param};
use crate::common::{Diagnostics, SemaError, SemaResult, Span, WarningKind};
use crate::sema::SemaExpr;
use crate::types::{Category, CharLen, Kind, SemaType};

/// Check arity, then convert every argument to its parameter class
pub(super) fn check_args(
    desc: &IntrinsicDescriptor,
    args: Vec<SemaExpr>,
    span: Span,
    diagnostics: &mut Diagnostics,
) -> SemaResult<Vec<SemaExpr>> {
    if args.len() < desc.arg_min {
        return Err(SemaError::arity(
            format!("not enough arguments for intrinsic {}", desc.name),
            span,
        ));
    }
    if desc.arg_max != 0 && args.len() > desc.arg_max {
        return Err(SemaError::arity(
            format!("too many arguments for intrinsic {}", desc.name),
            span,
        ));
    }

    match desc.family {
        Family::Operator => check_operator(desc, args, span, diagnostics),
        Family::Function | Family::Subroutine => check_positional(desc, args, diagnostics),
    }
}

/// Elemental operators unify every argument to one promoted type
fn check_operator(
    desc: &IntrinsicDescriptor,
    args: Vec<SemaExpr>,
    span: Span,
    diagnostics: &mut Diagnostics,
) -> SemaResult<Vec<SemaExpr>> {
    let mut unified: Option<SemaType> = None;
    for (i, arg) in args.iter().enumerate() {
        let (ty, valid) = param_type(arg, desc.args.param(i), desc)?;
        if !valid {
            warn_argument(desc, arg, diagnostics);
        }
        unified = Some(match unified {
            Some(current) => current.promote(&ty).ok_or_else(|| {
                SemaError::argument_type(
                    format!("incompatible argument types for intrinsic {}", desc.name),
                    span,
                )
            })?,
            None => ty,
        });
    }
    let Some(unified) = unified else {
        return Ok(args);
    };

    args.into_iter()
        .map(|arg| {
            if arg.ty.compare(&unified) {
                Ok(arg)
            } else {
                convert(desc, arg, &unified)
            }
        })
        .collect()
}

fn check_positional(
    desc: &IntrinsicDescriptor,
    args: Vec<SemaExpr>,
    diagnostics: &mut Diagnostics,
) -> SemaResult<Vec<SemaExpr>> {
    let mut checked = Vec::with_capacity(args.len());
    for (i, arg) in args.into_iter().enumerate() {
        let param = desc.args.param(i);
        if param.intent() == Intent::Out && !arg.is_variable() {
            return Err(SemaError::argument_type(
                format!("argument {} of intrinsic {} must be a variable", i + 1, desc.name),
                arg.span,
            ));
        }

        let (ty, valid) = param_type(&arg, param, desc)?;
        if !valid {
            warn_argument(desc, &arg, diagnostics);
        }
        checked.push(if arg.ty.compatible(&ty) {
            arg
        } else {
            convert(desc, arg, &ty)?
        });
    }
    Ok(checked)
}

fn warn_argument(desc: &IntrinsicDescriptor, arg: &SemaExpr, diagnostics: &mut Diagnostics) {
    diagnostics.warning(
        WarningKind::ArgumentType,
        format!("incorrect argument type {} for intrinsic {}", arg.ty, desc.name),
        arg.span,
    );
}

fn convert(desc: &IntrinsicDescriptor, arg: SemaExpr, ty: &SemaType) -> SemaResult<SemaExpr> {
    let span = arg.span;
    let from = arg.ty.clone();
    arg.cast(ty).map_err(|_| {
        SemaError::argument_type(
            format!("incompatible argument type {} for intrinsic {}", from, desc.name),
            span,
        )
    })
}

/// Type an argument is converted to, and whether it already fits the class
fn param_type(
    arg: &SemaExpr,
    param: Param,
    desc: &IntrinsicDescriptor,
) -> SemaResult<(SemaType, bool)> {
    let ty = &arg.ty;
    let (category, kind, size) = match param {
        Param::Any => return Ok((ty.clone(), true)),
        Param::Scalar => return Ok((ty.scalar(), ty.is_scalar())),
        Param::Same | Param::Callback => {
            return Err(SemaError::type_error(
                format!("intrinsic {} has an invalid argument class", desc.name),
                arg.span,
            ));
        }
        Param::Typed {
            category,
            kind,
            size,
            ..
        } => (category, kind, size),
    };
    let kind_matches = |t: &SemaType| match kind {
        Some(k) => t.type_kind().map(|tk| tk.width_in(category)) == Some(k.width_in(category)),
        None => true,
    };

    if let Some(count) = param.elem_count() {
        let fits = ty.is_array()
            && ty.elem_count() == Some(u64::from(count))
            && ty.category() == Some(category)
            && kind_matches(ty);
        if fits {
            return Ok((ty.clone(), true));
        }
        if !ty.is_array() || ty.elem_count() != Some(u64::from(count)) {
            return Err(SemaError::argument_type(
                format!("intrinsic {} requires an array of {} elements", desc.name, count),
                arg.span,
            ));
        }
    }

    if category == Category::Character && ty.is_character() && kind_matches(ty) {
        let len_fits = match ty.char_len() {
            Some(CharLen::Fixed(n)) => size == 0 || n == size,
            _ => true,
        };
        if len_fits {
            return Ok((ty.clone(), true));
        }
    }

    if category != Category::Character
        && kind.is_none()
        && !ty.is_array()
        && ty.category() == Some(category)
    {
        return Ok((ty.clone(), true));
    }

    let converted = param.conversion_type().ok_or_else(|| {
        SemaError::type_error(
            format!("intrinsic {} has an invalid argument class", desc.name),
            arg.span,
        )
    })?;
    let valid = converted.compatible(ty);
    Ok((converted, valid))
}

/// Result type of a call, `None` for subroutines
pub(super) fn return_type(
    desc: &IntrinsicDescriptor,
    args: &[SemaExpr],
    span: Span,
) -> SemaResult<Option<SemaType>> {
    match desc.returns {
        ReturnRule::None => Ok(None),
        ReturnRule::Param(param) => param_return(desc, param, args, span).map(Some),
        ReturnRule::Callback(callback) => callback_return(desc, callback, args, span).map(Some),
    }
}

fn param_return(
    desc: &IntrinsicDescriptor,
    param: Param,
    args: &[SemaExpr],
    span: Span,
) -> SemaResult<SemaType> {
    let first = args.first().map(|a| &a.ty);
    let missing = || SemaError::arity(format!("intrinsic {} requires an argument", desc.name), span);
    let (category, kind, size) = match param {
        Param::Any | Param::Callback => {
            return Err(SemaError::type_error(
                format!("intrinsic {} has no fixed result type", desc.name),
                span,
            ));
        }
        Param::Same => return first.cloned().ok_or_else(missing),
        Param::Scalar => return first.map(SemaType::scalar).ok_or_else(missing),
        Param::Typed {
            category,
            kind,
            size,
            ..
        } => (category, kind, size),
    };

    if category != Category::Character && size != 0 {
        return Err(SemaError::type_error(
            format!("intrinsic {} cannot return an array", desc.name),
            span,
        ));
    }

    if category == Category::Character {
        let kind = kind
            .or_else(|| first.filter(|t| t.is_character()).and_then(SemaType::type_kind))
            .unwrap_or_default();
        let len = if size == 0 {
            CharLen::Variable
        } else {
            CharLen::Fixed(size)
        };
        return Ok(SemaType::character(kind, len));
    }

    if let (None, Some(first)) = (kind, first) {
        let scalar = first.scalar();
        if scalar.category() == Some(category) {
            return Ok(scalar);
        }
        let floating = |c: Option<Category>| c.is_some_and(Category::is_floating);
        if floating(Some(category)) && floating(scalar.category()) {
            let kind = scalar.type_kind().unwrap_or_default();
            return Ok(SemaType::primitive(category, kind));
        }
    }

    let rtype = SemaType::primitive(category, kind.unwrap_or_default());
    match (kind, first) {
        (None, Some(first)) if category.is_numeric() && first.is_numeric() => {
            Ok(rtype.promote(&first.scalar()).unwrap_or(rtype))
        }
        _ => Ok(rtype),
    }
}

fn callback_return(
    desc: &IntrinsicDescriptor,
    callback: ReturnCallback,
    args: &[SemaExpr],
    span: Span,
) -> SemaResult<SemaType> {
    match callback {
        ReturnCallback::Char => {
            let kind = kind_argument(desc, args.get(1))?;
            Ok(SemaType::character(kind, CharLen::Fixed(1)))
        }
        ReturnCallback::Ichar => {
            let kind = kind_argument(desc, args.get(1))?;
            Ok(SemaType::primitive(Category::Integer, kind))
        }
        ReturnCallback::Transfer => match args {
            [_, mold] => Ok(mold.ty.clone()),
            [_, _, size, ..] => Err(SemaError::unsupported(
                "SIZE argument of TRANSFER is not supported",
                size.span,
            )),
            _ => Err(SemaError::arity(
                format!("not enough arguments for intrinsic {}", desc.name),
                span,
            )),
        },
    }
}

/// Kind selected by an optional constant KIND argument
fn kind_argument(desc: &IntrinsicDescriptor, arg: Option<&SemaExpr>) -> SemaResult<Kind> {
    let Some(arg) = arg else {
        return Ok(Kind::Default);
    };
    let value = arg.constant.as_ref().and_then(|c| c.as_integer()).ok_or_else(|| {
        SemaError::non_constant(
            format!("KIND argument of intrinsic {} must be an integer constant", desc.name),
            arg.span,
        )
    })?;
    Kind::from_selector(value).ok_or_else(|| {
        SemaError::argument_type(
            format!("invalid kind {} for intrinsic {}", value, desc.name),
            arg.span,
        )
    })
}
