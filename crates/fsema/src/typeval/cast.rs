//! Value conversion between constant types

use super::{TypeVal, Value, fits_width, round_to};
use crate::common::{SemaError, SemaResult};
use crate::types::{Category, CharLen, Kind, SemaType};

impl TypeVal {
    /// Convert to `target`, the way an assignment would
    ///
    /// Casting to a type that compares equal only swaps in the target's
    /// descriptor, so a cast to the constant's own type is the identity.
    pub fn cast(&self, target: &SemaType) -> SemaResult<TypeVal> {
        if self.ty.compare(target) {
            return Ok(TypeVal::from_parts(
                target.clone(),
                self.value.clone(),
                self.span,
            ));
        }
        if !target.is_scalar() {
            return Err(SemaError::type_error(
                format!("cannot convert constant to {}", target),
                self.span,
            ));
        }

        let category = target.category();
        let kind = target.type_kind().unwrap_or_default();
        let value = match (&self.value, category) {
            (Value::Integer(v), Some(Category::Integer | Category::Byte)) => {
                Value::Integer(self.narrow(*v, target)?)
            }
            (Value::Integer(v), Some(Category::Real)) => Value::Real(round_to(*v as f64, kind)),
            (Value::Integer(v), Some(Category::Complex)) => {
                Value::Complex(round_to(*v as f64, kind), 0.0)
            }

            (Value::Real(v), Some(Category::Integer | Category::Byte)) => {
                Value::Integer(self.narrow(self.truncate(*v)?, target)?)
            }
            (Value::Real(v), Some(Category::Real)) => Value::Real(round_to(*v, kind)),
            (Value::Real(v), Some(Category::Complex)) => Value::Complex(round_to(*v, kind), 0.0),

            (Value::Complex(re, _), Some(Category::Integer | Category::Byte)) => {
                Value::Integer(self.narrow(self.truncate(*re)?, target)?)
            }
            (Value::Complex(re, _), Some(Category::Real)) => Value::Real(round_to(*re, kind)),
            (Value::Complex(re, im), Some(Category::Complex)) => {
                Value::Complex(round_to(*re, kind), round_to(*im, kind))
            }

            (Value::Logical(b), Some(Category::Logical)) => Value::Logical(*b),

            (Value::Character(bytes), Some(Category::Character)) => {
                return self.cast_character(bytes, kind, target);
            }

            _ => {
                return Err(SemaError::type_error(
                    format!("cannot convert {} constant to {}", self.ty, target),
                    self.span,
                ));
            }
        };

        Ok(TypeVal::from_parts(target.clone(), value, self.span))
    }

    fn cast_character(&self, bytes: &[u8], kind: Kind, target: &SemaType) -> SemaResult<TypeVal> {
        let source_width = self.ty.type_kind().unwrap_or_default().char_width();
        if source_width != kind.char_width() {
            return Err(SemaError::type_error(
                format!("cannot convert {} constant to {}", self.ty, target),
                self.span,
            ));
        }

        match target.char_len() {
            Some(CharLen::Fixed(len)) => {
                let size = len as usize * kind.char_width() as usize;
                let mut out = bytes.to_vec();
                out.resize(size, b' ');
                Ok(TypeVal::from_parts(
                    target.clone(),
                    Value::Character(out),
                    self.span,
                ))
            }
            // The constant keeps its own length
            _ => Ok(TypeVal::character(bytes.to_vec(), kind, self.span)
                .with_qualifiers(target)),
        }
    }

    fn with_qualifiers(mut self, target: &SemaType) -> Self {
        self.ty.qualifiers = target.qualifiers;
        self
    }

    /// Truncate toward zero, failing outside the i64 range
    fn truncate(&self, v: f64) -> SemaResult<i64> {
        let t = v.trunc();
        if !t.is_finite() || t < i64::MIN as f64 || t >= i64::MAX as f64 {
            return Err(SemaError::type_error(
                format!("value {} does not fit in an integer", v),
                self.span,
            ));
        }
        Ok(t as i64)
    }

    fn narrow(&self, v: i64, target: &SemaType) -> SemaResult<i64> {
        let width = target.elem_size().unwrap_or(8) as u32;
        if fits_width(v, width) {
            Ok(v)
        } else {
            Err(SemaError::type_error(
                format!("value {} does not fit in {}", v, target),
                self.span,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Span;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cast_identity() {
        let values = [
            TypeVal::integer(42, Kind::Default, Span::default()),
            TypeVal::real(2.5, Kind::Double, Span::default()),
            TypeVal::logical(true, Kind::Default, Span::default()),
            TypeVal::string("abc", Span::default()),
            TypeVal::complex(1.0, -1.0, Kind::Default, Span::default()),
        ];
        for v in &values {
            assert_eq!(v.cast(v.ty()).unwrap(), *v);
        }
    }

    #[test]
    fn test_numeric_casts() {
        let r = TypeVal::real(-2.75, Kind::Default, Span::default());
        assert_eq!(r.cast(&SemaType::integer()).unwrap().as_integer(), Some(-2));

        let i = TypeVal::integer(3, Kind::Default, Span::default());
        let c = i.cast(&SemaType::complex()).unwrap();
        assert_eq!(c.as_complex(), Some((3.0, 0.0)));

        let z = TypeVal::complex(1.5, 4.0, Kind::Default, Span::default());
        assert_eq!(z.cast(&SemaType::real()).unwrap().as_real(), Some(1.5));
    }

    #[test]
    fn test_narrowing_overflow() {
        let big = TypeVal::integer(300, Kind::Default, Span::default());
        assert!(big.cast(&SemaType::byte()).is_err());
        let small = TypeVal::integer(-7, Kind::Default, Span::default());
        assert_eq!(small.cast(&SemaType::byte()).unwrap().as_integer(), Some(-7));
    }

    #[test]
    fn test_character_padding() {
        let s = TypeVal::string("AB", Span::default());
        let padded = s
            .cast(&SemaType::character(Kind::Default, CharLen::Fixed(4)))
            .unwrap();
        assert_eq!(padded.as_bytes(), Some(&b"AB  "[..]));

        let cut = s
            .cast(&SemaType::character(Kind::Default, CharLen::Fixed(1)))
            .unwrap();
        assert_eq!(cut.as_bytes(), Some(&b"A"[..]));

        let var = s
            .cast(&SemaType::character(Kind::Default, CharLen::Variable))
            .unwrap();
        assert_eq!(var.ty().char_len(), Some(CharLen::Fixed(2)));
    }

    #[test]
    fn test_incompatible_casts() {
        let s = TypeVal::string("1", Span::default());
        assert!(s.cast(&SemaType::integer()).is_err());
        let l = TypeVal::logical(true, Kind::Default, Span::default());
        assert!(l.cast(&SemaType::real()).is_err());
        let i = TypeVal::integer(1, Kind::Default, Span::default());
        assert!(i.cast(&SemaType::subroutine()).is_err());
    }
}
