//! Type categories and kind selectors

use std::fmt;

/// Scalar type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Logical,
    Integer,
    Real,
    Complex,
    Character,
    Byte,
}

impl Category {
    /// Position in the numeric widening order, `None` for CHARACTER
    pub fn rank(self) -> Option<u8> {
        match self {
            Category::Logical => Some(0),
            Category::Byte => Some(1),
            Category::Integer => Some(2),
            Category::Real => Some(3),
            Category::Complex => Some(4),
            Category::Character => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Category::Integer | Category::Real | Category::Complex | Category::Byte
        )
    }

    /// INTEGER and BYTE share a representation
    pub fn is_integral(self) -> bool {
        matches!(self, Category::Integer | Category::Byte)
    }

    pub fn is_floating(self) -> bool {
        matches!(self, Category::Real | Category::Complex)
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Logical => "LOGICAL",
            Category::Integer => "INTEGER",
            Category::Real => "REAL",
            Category::Complex => "COMPLEX",
            Category::Character => "CHARACTER",
            Category::Byte => "BYTE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage width selector of a primitive type
///
/// `Bytes(n)` is an explicit width as written with `KIND=n` or `*n`.
/// For COMPLEX the width is per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    #[default]
    Default,
    Half,
    Double,
    Quad,
    Bytes(u8),
}

impl Kind {
    /// Widths a kind selector may name
    const WIDTHS: [u8; 6] = [1, 2, 4, 8, 10, 16];

    /// Width in bytes of one numeric or logical component
    pub fn width(self) -> u32 {
        match self {
            Kind::Default => 4,
            Kind::Half => 2,
            Kind::Double => 8,
            Kind::Quad => 16,
            Kind::Bytes(n) => n as u32,
        }
    }

    /// Width in bytes of one CHARACTER element
    pub fn char_width(self) -> u32 {
        match self {
            Kind::Default => 1,
            Kind::Half | Kind::Double => 2,
            Kind::Quad => 4,
            Kind::Bytes(n) => n as u32,
        }
    }

    pub fn from_width(width: u32) -> Option<Kind> {
        Self::WIDTHS
            .iter()
            .copied()
            .find(|w| *w as u32 == width)
            .map(Kind::Bytes)
    }

    /// Kind named by a `KIND=` selector value
    pub fn from_selector(value: i64) -> Option<Kind> {
        u32::try_from(value).ok().and_then(Self::from_width)
    }

    /// Width used for this kind in the given category
    pub fn width_in(self, category: Category) -> u32 {
        match category {
            Category::Byte => 1,
            Category::Character => self.char_width(),
            _ => self.width(),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Default => f.write_str("DEFAULT"),
            Kind::Half => f.write_str("HALF"),
            Kind::Double => f.write_str("DOUBLE"),
            Kind::Quad => f.write_str("QUAD"),
            Kind::Bytes(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(Kind::Default.width(), 4);
        assert_eq!(Kind::Double.width(), 8);
        assert_eq!(Kind::Bytes(10).width(), 10);
        assert_eq!(Kind::Default.char_width(), 1);
        assert_eq!(Kind::Double.width_in(Category::Byte), 1);
    }

    #[test]
    fn test_selector() {
        assert_eq!(Kind::from_selector(8), Some(Kind::Bytes(8)));
        assert_eq!(Kind::from_selector(3), None);
        assert_eq!(Kind::from_selector(-4), None);
    }

    #[test]
    fn test_rank_order() {
        assert!(Category::Logical.rank() < Category::Byte.rank());
        assert!(Category::Integer.rank() < Category::Real.rank());
        assert!(Category::Real.rank() < Category::Complex.rank());
        assert_eq!(Category::Character.rank(), None);
    }
}
