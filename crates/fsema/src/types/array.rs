//! Array shapes

use std::fmt;

/// One dimension bound, either folded or left to run time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Const(i64),
    /// Assumed size (`*`) or an adjustable bound
    Deferred,
}

impl Bound {
    pub fn value(self) -> Option<i64> {
        match self {
            Bound::Const(v) => Some(v),
            Bound::Deferred => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Const(v) => write!(f, "{}", v),
            Bound::Deferred => f.write_str("*"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub lower: Bound,
    pub upper: Bound,
}

impl Dimension {
    pub fn new(lower: Bound, upper: Bound) -> Self {
        Self { lower, upper }
    }

    /// `1:upper`
    pub fn upto(upper: i64) -> Self {
        Self::new(Bound::Const(1), Bound::Const(upper))
    }

    /// Number of elements; an empty range has extent zero
    pub fn extent(&self) -> Option<u64> {
        let lower = self.lower.value()?;
        let upper = self.upper.value()?;
        if upper < lower {
            Some(0)
        } else {
            u64::try_from(upper - lower + 1).ok()
        }
    }
}

/// Ordered dimension list of an array type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayShape {
    dims: Vec<Dimension>,
}

impl ArrayShape {
    pub fn new(dims: Vec<Dimension>) -> Self {
        Self { dims }
    }

    /// One-dimensional `1:len`
    pub fn vector(len: i64) -> Self {
        Self::new(vec![Dimension::upto(len)])
    }

    pub fn dims(&self) -> &[Dimension] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Shapes are comparable only with equal rank and identical bounds
    pub fn compare(&self, other: &ArrayShape) -> bool {
        self.dims == other.dims
    }

    /// Total element count, `None` when any bound is deferred
    pub fn elem_count(&self) -> Option<u64> {
        self.dims
            .iter()
            .try_fold(1u64, |acc, d| acc.checked_mul(d.extent()?))
    }

    pub fn is_deferred(&self) -> bool {
        self.elem_count().is_none()
    }
}

impl fmt::Display for ArrayShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, dim) in self.dims.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", dim.lower, dim.upper)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elem_count() {
        let shape = ArrayShape::new(vec![Dimension::upto(3), Dimension::upto(4)]);
        assert_eq!(shape.rank(), 2);
        assert_eq!(shape.elem_count(), Some(12));

        let zero_based = ArrayShape::new(vec![Dimension::new(Bound::Const(0), Bound::Const(9))]);
        assert_eq!(zero_based.elem_count(), Some(10));

        let empty = ArrayShape::new(vec![Dimension::new(Bound::Const(5), Bound::Const(1))]);
        assert_eq!(empty.elem_count(), Some(0));
    }

    #[test]
    fn test_deferred() {
        let shape = ArrayShape::new(vec![Dimension::new(Bound::Const(1), Bound::Deferred)]);
        assert!(shape.is_deferred());
        assert_eq!(shape.to_string(), "(1:*)");
    }

    #[test]
    fn test_compare() {
        assert!(ArrayShape::vector(10).compare(&ArrayShape::vector(10)));
        assert!(!ArrayShape::vector(10).compare(&ArrayShape::vector(11)));
        let matrix = ArrayShape::new(vec![Dimension::upto(10), Dimension::upto(1)]);
        assert!(!ArrayShape::vector(10).compare(&matrix));
    }
}
