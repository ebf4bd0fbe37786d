//! Typed compile-time constants
//!
//! A `TypeVal` is a realized value tagged with its `SemaType`. Casting,
//! folding and TRANSFER all produce new constants; nothing is mutated in
//! place.

mod arith;
mod cast;
mod extended;
mod transfer;

use std::fmt;

use crate::common::Span;
use crate::types::{Category, CharLen, Kind, SemaType};

/// Payload of a constant
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Logical(bool),
    /// INTEGER and BYTE
    Integer(i64),
    Real(f64),
    Complex(f64, f64),
    /// Raw element bytes, `len * char_width` long
    Character(Vec<u8>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Logical(true) => f.write_str(".TRUE."),
            Value::Logical(false) => f.write_str(".FALSE."),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{:?}", v),
            Value::Complex(re, im) => write!(f, "({:?}, {:?})", re, im),
            Value::Character(bytes) => write!(f, "'{}'", String::from_utf8_lossy(bytes)),
        }
    }
}

/// Compile-time constant with its type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeVal {
    ty: SemaType,
    value: Value,
    span: Span,
}

impl TypeVal {
    /// Caller guarantees the payload variant matches the type category
    fn from_parts(ty: SemaType, value: Value, span: Span) -> Self {
        Self { ty, value, span }
    }

    pub fn logical(value: bool, kind: Kind, span: Span) -> Self {
        Self::from_parts(
            SemaType::primitive(Category::Logical, kind),
            Value::Logical(value),
            span,
        )
    }

    /// Integer constant; the value is not range checked against `kind`
    pub fn integer(value: i64, kind: Kind, span: Span) -> Self {
        Self::from_parts(
            SemaType::primitive(Category::Integer, kind),
            Value::Integer(value),
            span,
        )
    }

    pub fn byte(value: i8, span: Span) -> Self {
        Self::from_parts(SemaType::byte(), Value::Integer(value as i64), span)
    }

    /// Real constant, rounded to the precision of `kind`
    pub fn real(value: f64, kind: Kind, span: Span) -> Self {
        Self::from_parts(
            SemaType::primitive(Category::Real, kind),
            Value::Real(round_to(value, kind)),
            span,
        )
    }

    pub fn complex(re: f64, im: f64, kind: Kind, span: Span) -> Self {
        Self::from_parts(
            SemaType::primitive(Category::Complex, kind),
            Value::Complex(round_to(re, kind), round_to(im, kind)),
            span,
        )
    }

    /// CHARACTER constant whose length is taken from the payload
    pub fn character(bytes: Vec<u8>, kind: Kind, span: Span) -> Self {
        let len = bytes.len() as u64 / u64::from(kind.char_width().max(1));
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        Self::from_parts(
            SemaType::character(kind, CharLen::Fixed(len)),
            Value::Character(bytes),
            span,
        )
    }

    pub fn string(text: &str, span: Span) -> Self {
        Self::character(text.as_bytes().to_vec(), Kind::Default, span)
    }

    pub fn ty(&self) -> &SemaType {
        &self.ty
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            Value::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_logical(&self) -> Option<bool> {
        match self.value {
            Value::Logical(v) => Some(v),
            _ => None,
        }
    }

    /// Real value of any numeric constant; complex yields its real part
    pub fn as_real(&self) -> Option<f64> {
        match self.value {
            Value::Integer(v) => Some(v as f64),
            Value::Real(v) | Value::Complex(v, _) => Some(v),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<(f64, f64)> {
        match self.value {
            Value::Integer(v) => Some((v as f64, 0.0)),
            Value::Real(v) => Some((v, 0.0)),
            Value::Complex(re, im) => Some((re, im)),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.value {
            Value::Character(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Same type (by `SemaType::compare`) and same payload
    pub fn compare(&self, other: &TypeVal) -> bool {
        self.ty.compare(&other.ty) && self.value == other.value
    }
}

impl fmt::Display for TypeVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Round a real to the precision its kind can store
fn round_to(value: f64, kind: Kind) -> f64 {
    if kind.width() == 4 {
        value as f32 as f64
    } else {
        value
    }
}

/// Whether `value` is representable in an integer of `width` bytes
fn fits_width(value: i64, width: u32) -> bool {
    if width >= 8 {
        return true;
    }
    let bits = width * 8;
    let min = -(1i64 << (bits - 1));
    let max = (1i64 << (bits - 1)) - 1;
    (min..=max).contains(&value)
}
