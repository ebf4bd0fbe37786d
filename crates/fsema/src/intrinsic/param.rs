//! Argument and return classes of intrinsic descriptors

use crate::types::{ArrayShape, Category, CharLen, Kind, SemaType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    In,
    Out,
}

/// Type class of an intrinsic argument or result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// Any type
    Any,
    /// Same type as the first argument
    Same,
    /// Any scalar type
    Scalar,
    /// Result type computed by the descriptor's callback
    Callback,
    /// Concrete category with optional kind
    ///
    /// `size` is a CHARACTER length, or for other categories the element
    /// count of a required array; zero means unconstrained.
    Typed {
        category: Category,
        kind: Option<Kind>,
        size: u32,
        intent: Intent,
    },
}

impl Param {
    const fn typed(category: Category, kind: Option<Kind>, size: u32, intent: Intent) -> Self {
        Param::Typed {
            category,
            kind,
            size,
            intent,
        }
    }

    pub const LOGICAL: Param = Param::typed(Category::Logical, None, 0, Intent::In);
    pub const INTEGER: Param = Param::typed(Category::Integer, None, 0, Intent::In);
    pub const REAL: Param = Param::typed(Category::Real, None, 0, Intent::In);
    pub const COMPLEX: Param = Param::typed(Category::Complex, None, 0, Intent::In);
    pub const CHARACTER: Param = Param::typed(Category::Character, None, 0, Intent::In);
    pub const CHARACTER_1: Param = Param::typed(Category::Character, None, 1, Intent::In);

    pub const DEF_LOGICAL: Param =
        Param::typed(Category::Logical, Some(Kind::Default), 0, Intent::In);
    pub const DEF_INTEGER: Param =
        Param::typed(Category::Integer, Some(Kind::Default), 0, Intent::In);
    pub const DEF_REAL: Param = Param::typed(Category::Real, Some(Kind::Default), 0, Intent::In);
    pub const DEF_COMPLEX: Param =
        Param::typed(Category::Complex, Some(Kind::Default), 0, Intent::In);
    pub const DEF_DOUBLE: Param = Param::typed(Category::Real, Some(Kind::Double), 0, Intent::In);
    pub const DEF_DOUBLE_COMPLEX: Param =
        Param::typed(Category::Complex, Some(Kind::Double), 0, Intent::In);
    pub const DEF_HALF_INTEGER: Param =
        Param::typed(Category::Integer, Some(Kind::Half), 0, Intent::In);

    pub const INTEGER_1: Param =
        Param::typed(Category::Integer, Some(Kind::Bytes(1)), 0, Intent::In);
    pub const INTEGER_2: Param =
        Param::typed(Category::Integer, Some(Kind::Bytes(2)), 0, Intent::In);
    pub const INTEGER_4: Param =
        Param::typed(Category::Integer, Some(Kind::Bytes(4)), 0, Intent::In);

    pub const DEF_REAL_A2: Param =
        Param::typed(Category::Real, Some(Kind::Default), 2, Intent::In);
    pub const DEF_REAL_A2_OUT: Param =
        Param::typed(Category::Real, Some(Kind::Default), 2, Intent::Out);

    pub const CHARACTER_OUT: Param = Param::typed(Category::Character, None, 0, Intent::Out);
    pub const INTEGER_OUT: Param = Param::typed(Category::Integer, None, 0, Intent::Out);
    pub const REAL_OUT: Param = Param::typed(Category::Real, None, 0, Intent::Out);

    pub const INTEGER_A3_OUT: Param = Param::typed(Category::Integer, None, 3, Intent::Out);
    pub const INTEGER_A13: Param = Param::typed(Category::Integer, None, 13, Intent::In);
    pub const INTEGER_A13_OUT: Param = Param::typed(Category::Integer, None, 13, Intent::Out);

    pub fn intent(self) -> Intent {
        match self {
            Param::Typed { intent, .. } => intent,
            _ => Intent::In,
        }
    }

    /// Element count of a required array argument
    pub fn elem_count(self) -> Option<u32> {
        match self {
            Param::Typed { category, size, .. } if category != Category::Character && size > 0 => {
                Some(size)
            }
            _ => None,
        }
    }

    /// The type an argument of this class is converted to
    ///
    /// Kindless classes fall back to the default kind; a CHARACTER class
    /// without a length accepts any length.
    pub fn conversion_type(self) -> Option<SemaType> {
        let Param::Typed {
            category,
            kind,
            size,
            ..
        } = self
        else {
            return None;
        };
        let kind = kind.unwrap_or_default();
        if category == Category::Character {
            let len = if size == 0 {
                CharLen::Variable
            } else {
                CharLen::Fixed(size)
            };
            return Some(SemaType::character(kind, len));
        }
        let scalar = SemaType::primitive(category, kind);
        Some(match self.elem_count() {
            Some(count) => SemaType::array(scalar, ArrayShape::vector(count as i64)),
            None => scalar,
        })
    }
}
