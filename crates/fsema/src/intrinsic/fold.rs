//! Compile-time evaluation of intrinsic calls

use crate::common::{SemaError, SemaResult, Span};
use crate::typeval::{TypeVal, Value};
use crate::types::{CharLen, Kind, SemaType};

/// Constant evaluator attached to a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fold {
    /// Convert the argument to the result type; two arguments build a COMPLEX
    Cast,
    Transfer,
    Abs,
    Mod,
    Modulo,
    Max,
    Min,
    Sign,
    Dim,
    Iand,
    Ior,
    Ieor,
    Not,
    Len,
    Ichar,
    Char,
}

impl Fold {
    /// Evaluate over constant arguments already checked against the
    /// descriptor; `ret` is the computed result type
    pub fn apply(self, args: &[TypeVal], ret: &SemaType, span: Span) -> SemaResult<TypeVal> {
        let Some(first) = args.first() else {
            return Err(SemaError::arity("intrinsic requires an argument", span));
        };
        let value = match self {
            Fold::Cast => match args {
                [re, im] => {
                    let kind = ret.type_kind().unwrap_or_default();
                    let (Some(re), Some(im)) = (re.as_real(), im.as_real()) else {
                        return Err(SemaError::argument_type(
                            "CMPLX arguments must be numeric",
                            span,
                        ));
                    };
                    TypeVal::complex(re, im, kind, span)
                }
                _ => first.cast(ret)?,
            },
            // The source is the first argument, the mold the second
            Fold::Transfer => first.transfer(ret)?,
            Fold::Abs => abs(first, span)?,
            Fold::Mod => binary(args, span, i64::checked_rem, |a, b| a % b)?,
            Fold::Modulo => binary(
                args,
                span,
                |a, b| a.checked_rem(b).map(|r| if r != 0 && (r < 0) != (b < 0) { r + b } else { r }),
                |a, b| a - (a / b).floor() * b,
            )?,
            Fold::Max => extremum(args, span, true)?,
            Fold::Min => extremum(args, span, false)?,
            Fold::Sign => binary(
                args,
                span,
                |a, b| {
                    let m = a.checked_abs()?;
                    if b < 0 { m.checked_neg() } else { Some(m) }
                },
                |a, b| if b < 0.0 { -a.abs() } else { a.abs() },
            )?,
            Fold::Dim => binary(
                args,
                span,
                |a, b| if a > b { a.checked_sub(b) } else { Some(0) },
                |a, b| if a > b { a - b } else { 0.0 },
            )?,
            Fold::Iand => bitwise(args, span, |a, b| a & b)?,
            Fold::Ior => bitwise(args, span, |a, b| a | b)?,
            Fold::Ieor => bitwise(args, span, |a, b| a ^ b)?,
            Fold::Not => {
                let a = integer_arg(first, span)?;
                TypeVal::integer(!a, Kind::Default, span)
            }
            Fold::Len => {
                let len = match first.ty().char_len() {
                    Some(CharLen::Fixed(n)) => n,
                    _ => return Err(SemaError::non_constant("LEN of assumed length", span)),
                };
                TypeVal::integer(i64::from(len), Kind::Default, span)
            }
            Fold::Ichar => {
                let bytes = first
                    .as_bytes()
                    .filter(|b| !b.is_empty())
                    .ok_or_else(|| SemaError::argument_type("ICHAR needs one character", span))?;
                let width = first.ty().type_kind().unwrap_or_default().char_width() as usize;
                let mut wide = [0u8; 8];
                let n = width.min(bytes.len()).min(8);
                wide[..n].copy_from_slice(&bytes[..n]);
                TypeVal::integer(i64::from_le_bytes(wide), Kind::Default, span)
            }
            Fold::Char => {
                let code = integer_arg(first, span)?;
                let kind = ret.type_kind().unwrap_or_default();
                let width = kind.char_width() as usize;
                let limit = if width >= 8 { i64::MAX } else { (1i64 << (8 * width)) - 1 };
                if !(0..=limit).contains(&code) {
                    return Err(SemaError::argument_type(
                        format!("character code {} out of range", code),
                        span,
                    ));
                }
                let bytes = code.to_le_bytes()[..width.min(8)].to_vec();
                TypeVal::character(bytes, kind, span)
            }
        };
        Ok(value.cast(ret)?.with_span(span))
    }
}

fn integer_arg(arg: &TypeVal, span: Span) -> SemaResult<i64> {
    arg.as_integer()
        .ok_or_else(|| SemaError::argument_type(format!("{} is not an integer", arg), span))
}

fn abs(arg: &TypeVal, span: Span) -> SemaResult<TypeVal> {
    let kind = arg.ty().type_kind().unwrap_or_default();
    match *arg.value() {
        Value::Integer(v) => {
            let v = v
                .checked_abs()
                .ok_or_else(|| SemaError::semantic("ABS overflows", span))?;
            Ok(TypeVal::integer(v, kind, span))
        }
        Value::Real(v) => Ok(TypeVal::real(v.abs(), kind, span)),
        Value::Complex(re, im) => Ok(TypeVal::real(re.hypot(im), kind, span)),
        _ => Err(SemaError::argument_type(
            format!("ABS of {}", arg.ty()),
            span,
        )),
    }
}

/// Two-argument numeric fold over already unified operands
fn binary(
    args: &[TypeVal],
    span: Span,
    int_op: impl Fn(i64, i64) -> Option<i64>,
    real_op: impl Fn(f64, f64) -> f64,
) -> SemaResult<TypeVal> {
    let [a, b] = args else {
        return Err(SemaError::arity("intrinsic requires two arguments", span));
    };
    match (a.value(), b.value()) {
        (Value::Integer(x), Value::Integer(y)) => {
            if *y == 0 && int_op(1, 0).is_none() {
                return Err(SemaError::semantic("division by zero in constant expression", span));
            }
            let v = int_op(*x, *y)
                .ok_or_else(|| SemaError::semantic("arithmetic overflow in constant expression", span))?;
            Ok(TypeVal::integer(v, Kind::Default, span))
        }
        _ => {
            let (Some(x), Some(y)) = (a.as_real(), b.as_real()) else {
                return Err(SemaError::argument_type(
                    format!("cannot fold {} and {}", a.ty(), b.ty()),
                    span,
                ));
            };
            let v = real_op(x, y);
            if !v.is_finite() {
                return Err(SemaError::semantic("division by zero in constant expression", span));
            }
            Ok(TypeVal::real(v, Kind::Double, span))
        }
    }
}

fn bitwise(args: &[TypeVal], span: Span, op: impl Fn(i64, i64) -> i64) -> SemaResult<TypeVal> {
    let [a, b] = args else {
        return Err(SemaError::arity("intrinsic requires two arguments", span));
    };
    let v = op(integer_arg(a, span)?, integer_arg(b, span)?);
    Ok(TypeVal::integer(v, Kind::Default, span))
}

fn extremum(args: &[TypeVal], span: Span, max: bool) -> SemaResult<TypeVal> {
    let mut best: Option<&TypeVal> = None;
    for arg in args {
        let Some(value) = arg.as_real().filter(|_| !matches!(arg.value(), Value::Complex(..))) else {
            return Err(SemaError::argument_type(
                format!("cannot compare {}", arg.ty()),
                span,
            ));
        };
        best = match best {
            Some(current) => {
                let current_value = current.as_real().unwrap_or(value);
                let better = if max { value > current_value } else { value < current_value };
                Some(if better { arg } else { current })
            }
            None => Some(arg),
        };
    }
    best.cloned()
        .ok_or_else(|| SemaError::arity("intrinsic requires arguments", span))
}
