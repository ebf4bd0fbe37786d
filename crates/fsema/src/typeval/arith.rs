//! Constant folding of operators

use std::cmp::Ordering;

use tracing::trace;

use super::{TypeVal, Value, fits_width};
use crate::ast::{BinaryOp, UnaryOp};
use crate::common::{SemaError, SemaResult, Span};
use crate::types::{Category, Kind, SemaType};

impl TypeVal {
    pub fn fold_unary(&self, op: UnaryOp, span: Span) -> SemaResult<TypeVal> {
        let value = match (op, &self.value) {
            (UnaryOp::Plus, Value::Integer(_) | Value::Real(_) | Value::Complex(..)) => {
                self.value.clone()
            }
            (UnaryOp::Neg, Value::Integer(v)) => {
                let v = v
                    .checked_neg()
                    .filter(|n| fits_width(*n, self.int_width()))
                    .ok_or_else(|| overflow(span))?;
                Value::Integer(v)
            }
            (UnaryOp::Neg, Value::Real(v)) => Value::Real(-v),
            (UnaryOp::Neg, Value::Complex(re, im)) => Value::Complex(-re, -im),
            (UnaryOp::Not, Value::Logical(b)) => Value::Logical(!b),
            _ => {
                return Err(SemaError::type_error(
                    format!("operator not defined for {}", self.ty),
                    span,
                ));
            }
        };
        Ok(TypeVal::from_parts(self.ty.scalar(), value, span))
    }

    pub fn fold_binary(&self, op: BinaryOp, rhs: &TypeVal, span: Span) -> SemaResult<TypeVal> {
        trace!(op = op.symbol(), lhs = %self, rhs = %rhs, "fold");
        match op {
            BinaryOp::Concat => self.concat(rhs, span),
            _ if op.is_logical() => self.fold_logical(op, rhs, span),
            _ if op.is_relational() => self.fold_relational(op, rhs, span),
            BinaryOp::Pow if rhs.ty.is_integer() && !self.ty.is_integer() => {
                self.pow_integer(rhs, span)
            }
            _ => self.fold_arithmetic(op, rhs, span),
        }
    }

    fn int_width(&self) -> u32 {
        self.ty.elem_size().unwrap_or(8) as u32
    }

    fn fold_arithmetic(&self, op: BinaryOp, rhs: &TypeVal, span: Span) -> SemaResult<TypeVal> {
        let ty = self.numeric_join(op, rhs, span)?;
        let lhs = self.cast(&ty)?;
        let rhs = rhs.cast(&ty)?;
        let kind = ty.type_kind().unwrap_or_default();

        let value = match (&lhs.value, &rhs.value) {
            (Value::Integer(a), Value::Integer(b)) => {
                let v = integer_op(op, *a, *b, span)?;
                if !fits_width(v, lhs.int_width()) {
                    return Err(overflow(span));
                }
                Value::Integer(v)
            }
            (Value::Real(a), Value::Real(b)) => Value::Real(real_op(op, *a, *b, span)?),
            (Value::Complex(ar, ai), Value::Complex(br, bi)) => {
                let (re, im) = complex_op(op, (*ar, *ai), (*br, *bi), span)?;
                Value::Complex(re, im)
            }
            _ => return Err(undefined(op, &self.ty, &rhs.ty, span)),
        };

        Ok(round(TypeVal::from_parts(ty, value, span), kind))
    }

    /// `x ** n` for real or complex `x` keeps the type of `x`
    fn pow_integer(&self, rhs: &TypeVal, span: Span) -> SemaResult<TypeVal> {
        let n = rhs.as_integer().ok_or_else(|| undefined(BinaryOp::Pow, &self.ty, &rhs.ty, span))?;
        let n = i32::try_from(n).map_err(|_| overflow(span))?;
        let kind = self.ty.type_kind().unwrap_or_default();
        let value = match self.value {
            Value::Real(x) => Value::Real(x.powi(n)),
            Value::Complex(re, im) => {
                let (re, im) = complex_powi((re, im), n, span)?;
                Value::Complex(re, im)
            }
            _ => return Err(undefined(BinaryOp::Pow, &self.ty, &rhs.ty, span)),
        };
        Ok(round(TypeVal::from_parts(self.ty.scalar(), value, span), kind))
    }

    fn numeric_join(&self, op: BinaryOp, rhs: &TypeVal, span: Span) -> SemaResult<SemaType> {
        if !self.ty.is_numeric() || !rhs.ty.is_numeric() {
            return Err(undefined(op, &self.ty, &rhs.ty, span));
        }
        let ty = self
            .ty
            .promote(&rhs.ty)
            .ok_or_else(|| undefined(op, &self.ty, &rhs.ty, span))?;
        // Arithmetic on BYTE operands happens in INTEGER
        if ty.category() == Some(Category::Byte) {
            return Ok(SemaType::integer());
        }
        Ok(ty)
    }

    fn fold_relational(&self, op: BinaryOp, rhs: &TypeVal, span: Span) -> SemaResult<TypeVal> {
        let ordering = if self.ty.is_character() && rhs.ty.is_character() {
            Some(compare_blank_padded(
                self.as_bytes().unwrap_or_default(),
                rhs.as_bytes().unwrap_or_default(),
            ))
        } else {
            let ty = self.numeric_join(op, rhs, span)?;
            let lhs = self.cast(&ty)?;
            let rhs = rhs.cast(&ty)?;
            match (&lhs.value, &rhs.value) {
                (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
                (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
                (Value::Complex(ar, ai), Value::Complex(br, bi)) => {
                    if !matches!(op, BinaryOp::Eq | BinaryOp::Ne) {
                        return Err(undefined(op, &self.ty, &rhs.ty, span));
                    }
                    if ar == br && ai == bi {
                        Some(Ordering::Equal)
                    } else {
                        None
                    }
                }
                _ => return Err(undefined(op, &self.ty, &rhs.ty, span)),
            }
        };

        let result = match (op, ordering) {
            (BinaryOp::Ne, None) => true,
            (_, None) => false,
            (BinaryOp::Eq, Some(o)) => o == Ordering::Equal,
            (BinaryOp::Ne, Some(o)) => o != Ordering::Equal,
            (BinaryOp::Lt, Some(o)) => o == Ordering::Less,
            (BinaryOp::Le, Some(o)) => o != Ordering::Greater,
            (BinaryOp::Gt, Some(o)) => o == Ordering::Greater,
            (_, Some(o)) => o != Ordering::Less,
        };
        Ok(TypeVal::logical(result, Kind::Default, span))
    }

    fn fold_logical(&self, op: BinaryOp, rhs: &TypeVal, span: Span) -> SemaResult<TypeVal> {
        let (Some(a), Some(b)) = (self.as_logical(), rhs.as_logical()) else {
            return Err(undefined(op, &self.ty, &rhs.ty, span));
        };
        let result = match op {
            BinaryOp::And => a && b,
            BinaryOp::Or => a || b,
            BinaryOp::Eqv => a == b,
            _ => a != b,
        };
        let ty = self
            .ty
            .promote(&rhs.ty)
            .unwrap_or_else(SemaType::logical);
        Ok(TypeVal::from_parts(ty, Value::Logical(result), span))
    }

    fn concat(&self, rhs: &TypeVal, span: Span) -> SemaResult<TypeVal> {
        let kinds = (self.ty.type_kind(), rhs.ty.type_kind());
        match (self.as_bytes(), rhs.as_bytes(), kinds) {
            (Some(a), Some(b), (Some(ka), Some(kb))) if ka.char_width() == kb.char_width() => {
                let mut out = a.to_vec();
                out.extend_from_slice(b);
                Ok(TypeVal::character(out, ka, span))
            }
            _ => Err(undefined(BinaryOp::Concat, &self.ty, &rhs.ty, span)),
        }
    }
}

fn integer_op(op: BinaryOp, a: i64, b: i64, span: Span) -> SemaResult<i64> {
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => {
            if b == 0 {
                return Err(division_by_zero(span));
            }
            a.checked_div(b)
        }
        BinaryOp::Pow => integer_pow(a, b),
        _ => None,
    };
    result.ok_or_else(|| overflow(span))
}

/// Integer power; a negative exponent truncates toward zero
fn integer_pow(base: i64, exp: i64) -> Option<i64> {
    if exp < 0 {
        return match base {
            1 => Some(1),
            -1 => Some(if exp % 2 == 0 { 1 } else { -1 }),
            0 => None,
            _ => Some(0),
        };
    }
    base.checked_pow(u32::try_from(exp).ok()?)
}

fn real_op(op: BinaryOp, a: f64, b: f64, span: Span) -> SemaResult<f64> {
    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(division_by_zero(span));
            }
            a / b
        }
        BinaryOp::Pow => a.powf(b),
        _ => return Err(SemaError::type_error("operator not defined for REAL", span)),
    };
    if result.is_finite() {
        Ok(result)
    } else {
        Err(overflow(span))
    }
}

fn complex_op(op: BinaryOp, a: (f64, f64), b: (f64, f64), span: Span) -> SemaResult<(f64, f64)> {
    let (ar, ai) = a;
    let (br, bi) = b;
    match op {
        BinaryOp::Add => Ok((ar + br, ai + bi)),
        BinaryOp::Sub => Ok((ar - br, ai - bi)),
        BinaryOp::Mul => Ok((ar * br - ai * bi, ar * bi + ai * br)),
        BinaryOp::Div => complex_div(a, b, span),
        BinaryOp::Pow => {
            if ar == 0.0 && ai == 0.0 {
                return Ok((0.0, 0.0));
            }
            // exp(b * ln a)
            let ln_r = ar.hypot(ai).ln();
            let theta = ai.atan2(ar);
            let re = br * ln_r - bi * theta;
            let im = br * theta + bi * ln_r;
            let scale = re.exp();
            Ok((scale * im.cos(), scale * im.sin()))
        }
        _ => Err(SemaError::type_error("operator not defined for COMPLEX", span)),
    }
}

fn complex_div(a: (f64, f64), b: (f64, f64), span: Span) -> SemaResult<(f64, f64)> {
    let (ar, ai) = a;
    let (br, bi) = b;
    let denom = br * br + bi * bi;
    if denom == 0.0 {
        return Err(division_by_zero(span));
    }
    Ok(((ar * br + ai * bi) / denom, (ai * br - ar * bi) / denom))
}

fn complex_powi(base: (f64, f64), n: i32, span: Span) -> SemaResult<(f64, f64)> {
    let mut result = (1.0, 0.0);
    let mut square = base;
    let mut e = n.unsigned_abs();
    while e > 0 {
        if e & 1 == 1 {
            result = (
                result.0 * square.0 - result.1 * square.1,
                result.0 * square.1 + result.1 * square.0,
            );
        }
        square = (
            square.0 * square.0 - square.1 * square.1,
            2.0 * square.0 * square.1,
        );
        e >>= 1;
    }
    if n < 0 {
        complex_div((1.0, 0.0), result, span)
    } else {
        Ok(result)
    }
}

/// Compare as if the shorter operand were padded with blanks
fn compare_blank_padded(a: &[u8], b: &[u8]) -> Ordering {
    let len = a.len().max(b.len());
    let pad = |s: &[u8], i: usize| s.get(i).copied().unwrap_or(b' ');
    (0..len)
        .map(|i| pad(a, i).cmp(&pad(b, i)))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn round(mut v: TypeVal, kind: Kind) -> TypeVal {
    v.value = match v.value {
        Value::Real(x) => Value::Real(super::round_to(x, kind)),
        Value::Complex(re, im) => Value::Complex(super::round_to(re, kind), super::round_to(im, kind)),
        other => other,
    };
    v
}

fn overflow(span: Span) -> SemaError {
    SemaError::semantic("arithmetic overflow in constant expression", span)
}

fn division_by_zero(span: Span) -> SemaError {
    SemaError::semantic("division by zero in constant expression", span)
}

fn undefined(op: BinaryOp, lhs: &SemaType, rhs: &SemaType, span: Span) -> SemaError {
    SemaError::type_error(
        format!("operator {} not defined for {} and {}", op.symbol(), lhs, rhs),
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn int(v: i64) -> TypeVal {
        TypeVal::integer(v, Kind::Default, Span::default())
    }

    fn real(v: f64) -> TypeVal {
        TypeVal::real(v, Kind::Default, Span::default())
    }

    #[test]
    fn test_integer_arithmetic() {
        let s = Span::default();
        assert_eq!(int(7).fold_binary(BinaryOp::Add, &int(5), s).unwrap().as_integer(), Some(12));
        assert_eq!(int(7).fold_binary(BinaryOp::Div, &int(2), s).unwrap().as_integer(), Some(3));
        assert_eq!(int(-7).fold_binary(BinaryOp::Div, &int(2), s).unwrap().as_integer(), Some(-3));
        assert_eq!(int(2).fold_binary(BinaryOp::Pow, &int(10), s).unwrap().as_integer(), Some(1024));
        assert_eq!(int(2).fold_binary(BinaryOp::Pow, &int(-1), s).unwrap().as_integer(), Some(0));
    }

    #[test]
    fn test_overflow_and_division() {
        let s = Span::default();
        assert!(int(i64::from(i32::MAX)).fold_binary(BinaryOp::Add, &int(1), s).is_err());
        assert!(int(1).fold_binary(BinaryOp::Div, &int(0), s).is_err());
        assert!(real(1.0).fold_binary(BinaryOp::Div, &real(0.0), s).is_err());
    }

    #[test]
    fn test_mixed_promotes() {
        let s = Span::default();
        let v = int(1).fold_binary(BinaryOp::Add, &real(0.5), s).unwrap();
        assert!(v.ty().compare(&SemaType::real()));
        assert_eq!(v.as_real(), Some(1.5));

        let d = TypeVal::real(2.0, Kind::Double, s);
        let p = real(1.5).fold_binary(BinaryOp::Mul, &d, s).unwrap();
        assert!(p.ty().compare(&SemaType::double()));
    }

    #[test]
    fn test_real_power_of_integer() {
        let s = Span::default();
        let v = real(2.0).fold_binary(BinaryOp::Pow, &int(3), s).unwrap();
        assert!(v.ty().compare(&SemaType::real()));
        assert_eq!(v.as_real(), Some(8.0));

        let z = TypeVal::complex(0.0, 1.0, Kind::Default, s);
        let sq = z.fold_binary(BinaryOp::Pow, &int(2), s).unwrap();
        assert_eq!(sq.as_complex(), Some((-1.0, 0.0)));
    }

    #[test]
    fn test_relational() {
        let s = Span::default();
        assert_eq!(int(1).fold_binary(BinaryOp::Lt, &real(1.5), s).unwrap().as_logical(), Some(true));
        let a = TypeVal::string("AB", s);
        let b = TypeVal::string("AB  ", s);
        assert_eq!(a.fold_binary(BinaryOp::Eq, &b, s).unwrap().as_logical(), Some(true));
        let z = TypeVal::complex(1.0, 1.0, Kind::Default, s);
        assert!(z.fold_binary(BinaryOp::Lt, &z, s).is_err());
    }

    #[test]
    fn test_logical_and_concat() {
        let s = Span::default();
        let t = TypeVal::logical(true, Kind::Default, s);
        let f = TypeVal::logical(false, Kind::Default, s);
        assert_eq!(t.fold_binary(BinaryOp::Neqv, &f, s).unwrap().as_logical(), Some(true));
        assert_eq!(t.fold_unary(UnaryOp::Not, s).unwrap().as_logical(), Some(false));
        assert!(t.fold_binary(BinaryOp::And, &int(1), s).is_err());

        let ab = TypeVal::string("AB", s)
            .fold_binary(BinaryOp::Concat, &TypeVal::string("CD", s), s)
            .unwrap();
        assert_eq!(ab.as_bytes(), Some(&b"ABCD"[..]));
    }

    #[test]
    fn test_negation() {
        let s = Span::default();
        assert_eq!(int(5).fold_unary(UnaryOp::Neg, s).unwrap().as_integer(), Some(-5));
        assert_eq!(real(2.5).fold_unary(UnaryOp::Neg, s).unwrap().as_real(), Some(-2.5));
        assert!(TypeVal::string("A", s).fold_unary(UnaryOp::Neg, s).is_err());
    }
}
