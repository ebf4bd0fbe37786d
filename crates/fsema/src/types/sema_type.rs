//! Type descriptors and the compare / compatible / promote algebra

use std::fmt;

use super::{ArrayShape, Category, Kind};

/// Type descriptor for a declaration, constant or expression
#[derive(Debug, Clone, PartialEq)]
pub struct SemaType {
    pub kind: TypeKind,
    pub qualifiers: Qualifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// LOGICAL, INTEGER, REAL, COMPLEX or BYTE
    Primitive { category: Category, kind: Kind },

    Character { kind: Kind, len: CharLen },

    /// The base is never itself an array
    Array {
        base: Box<SemaType>,
        shape: ArrayShape,
    },

    /// FUNCTION (with result type) or SUBROUTINE (without)
    Procedure { result: Option<Box<SemaType>> },
}

/// CHARACTER element length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharLen {
    Fixed(u32),
    /// `CHARACTER*(*)`, known only at run time
    Variable,
}

/// Storage qualifiers, not mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Qualifiers {
    pub is_static: bool,
    pub is_automatic: bool,
    pub is_volatile: bool,
    pub is_target: bool,
}

impl Qualifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_automatic(mut self) -> Self {
        self.is_automatic = true;
        self
    }

    pub fn with_volatile(mut self) -> Self {
        self.is_volatile = true;
        self
    }

    pub fn with_target(mut self) -> Self {
        self.is_target = true;
        self
    }

    /// Logical OR of both qualifier sets
    pub fn merge(self, other: Qualifiers) -> Self {
        Self {
            is_static: self.is_static || other.is_static,
            is_automatic: self.is_automatic || other.is_automatic,
            is_volatile: self.is_volatile || other.is_volatile,
            is_target: self.is_target || other.is_target,
        }
    }
}

impl SemaType {
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            qualifiers: Qualifiers::default(),
        }
    }

    pub fn with_qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    // ==================== Constructors ====================

    /// Primitive of any category; CHARACTER gets length 1
    pub fn primitive(category: Category, kind: Kind) -> Self {
        match category {
            Category::Character => Self::character(kind, CharLen::Fixed(1)),
            Category::Byte => Self::new(TypeKind::Primitive {
                category,
                kind: Kind::Bytes(1),
            }),
            _ => Self::new(TypeKind::Primitive { category, kind }),
        }
    }

    pub fn logical() -> Self {
        Self::primitive(Category::Logical, Kind::Default)
    }

    pub fn integer() -> Self {
        Self::primitive(Category::Integer, Kind::Default)
    }

    pub fn real() -> Self {
        Self::primitive(Category::Real, Kind::Default)
    }

    /// DOUBLE PRECISION
    pub fn double() -> Self {
        Self::primitive(Category::Real, Kind::Double)
    }

    pub fn complex() -> Self {
        Self::primitive(Category::Complex, Kind::Default)
    }

    pub fn double_complex() -> Self {
        Self::primitive(Category::Complex, Kind::Double)
    }

    pub fn byte() -> Self {
        Self::primitive(Category::Byte, Kind::Bytes(1))
    }

    pub fn character(kind: Kind, len: CharLen) -> Self {
        Self::new(TypeKind::Character { kind, len })
    }

    /// Array of `base` elements; an array base is replaced by its scalar
    pub fn array(base: SemaType, shape: ArrayShape) -> Self {
        let qualifiers = base.qualifiers;
        let base = base.scalar();
        Self {
            kind: TypeKind::Array {
                base: Box::new(base),
                shape,
            },
            qualifiers,
        }
    }

    pub fn function(result: SemaType) -> Self {
        Self::new(TypeKind::Procedure {
            result: Some(Box::new(result)),
        })
    }

    pub fn subroutine() -> Self {
        Self::new(TypeKind::Procedure { result: None })
    }

    /// Apply a `*len` modifier: CHARACTER length or numeric byte width
    pub fn with_star_len(&self, len: u32) -> Option<SemaType> {
        let kind = match &self.kind {
            TypeKind::Character { kind, .. } => TypeKind::Character {
                kind: *kind,
                len: CharLen::Fixed(len),
            },
            TypeKind::Primitive { category: Category::Byte, .. } => {
                if len != 1 {
                    return None;
                }
                self.kind.clone()
            }
            TypeKind::Primitive { category: Category::Complex, .. } => {
                if len % 2 != 0 {
                    return None;
                }
                TypeKind::Primitive {
                    category: Category::Complex,
                    kind: Kind::from_width(len / 2)?,
                }
            }
            TypeKind::Primitive { category, .. } => TypeKind::Primitive {
                category: *category,
                kind: Kind::from_width(len)?,
            },
            TypeKind::Array { base, shape } => {
                let base = base.with_star_len(len)?;
                return Some(SemaType::array(base, shape.clone()).with_qualifiers(self.qualifiers));
            }
            TypeKind::Procedure { .. } => return None,
        };
        Some(Self {
            kind,
            qualifiers: self.qualifiers,
        })
    }

    /// Replace the kind selector of a scalar or of an array's base
    pub fn with_kind(&self, new_kind: Kind) -> Option<SemaType> {
        let kind = match &self.kind {
            TypeKind::Character { len, .. } => TypeKind::Character {
                kind: new_kind,
                len: *len,
            },
            TypeKind::Primitive { category: Category::Byte, .. } => return None,
            TypeKind::Primitive { category, .. } => TypeKind::Primitive {
                category: *category,
                kind: new_kind,
            },
            TypeKind::Array { base, shape } => {
                let base = base.with_kind(new_kind)?;
                return Some(SemaType::array(base, shape.clone()).with_qualifiers(self.qualifiers));
            }
            TypeKind::Procedure { .. } => return None,
        };
        Some(Self {
            kind,
            qualifiers: self.qualifiers,
        })
    }

    // ==================== Type queries ====================

    /// Scalar category, looking through arrays
    pub fn category(&self) -> Option<Category> {
        match &self.kind {
            TypeKind::Primitive { category, .. } => Some(*category),
            TypeKind::Character { .. } => Some(Category::Character),
            TypeKind::Array { base, .. } => base.category(),
            TypeKind::Procedure { .. } => None,
        }
    }

    /// Kind selector, looking through arrays
    pub fn type_kind(&self) -> Option<Kind> {
        match &self.kind {
            TypeKind::Primitive { kind, .. } | TypeKind::Character { kind, .. } => Some(*kind),
            TypeKind::Array { base, .. } => base.type_kind(),
            TypeKind::Procedure { .. } => None,
        }
    }

    pub fn char_len(&self) -> Option<CharLen> {
        match &self.kind {
            TypeKind::Character { len, .. } => Some(*len),
            TypeKind::Array { base, .. } => base.char_len(),
            _ => None,
        }
    }

    pub fn shape(&self) -> Option<&ArrayShape> {
        match &self.kind {
            TypeKind::Array { shape, .. } => Some(shape),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    /// Has per-element storage
    pub fn is_composite(&self) -> bool {
        self.is_array()
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Primitive { .. } | TypeKind::Character { .. }
        )
    }

    pub fn is_character(&self) -> bool {
        matches!(self.kind, TypeKind::Character { .. })
    }

    pub fn is_logical(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive { category: Category::Logical, .. })
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Primitive { category: Category::Integer | Category::Byte, .. }
        )
    }

    pub fn is_real(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive { category: Category::Real, .. })
    }

    pub fn is_complex(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive { category: Category::Complex, .. })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(&self.kind, TypeKind::Primitive { category, .. } if category.is_numeric())
    }

    pub fn is_procedure(&self) -> bool {
        matches!(self.kind, TypeKind::Procedure { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, TypeKind::Procedure { result: Some(_) })
    }

    pub fn is_subroutine(&self) -> bool {
        matches!(self.kind, TypeKind::Procedure { result: None })
    }

    /// Result type of a FUNCTION
    pub fn result(&self) -> Option<&SemaType> {
        match &self.kind {
            TypeKind::Procedure { result } => result.as_deref(),
            _ => None,
        }
    }

    /// Strip array-ness, keeping qualifiers
    pub fn scalar(&self) -> SemaType {
        match &self.kind {
            TypeKind::Array { base, .. } => base.as_ref().clone().with_qualifiers(self.qualifiers),
            _ => self.clone(),
        }
    }

    /// Element type of an array, the type itself otherwise
    pub fn base(&self) -> &SemaType {
        match &self.kind {
            TypeKind::Array { base, .. } => base,
            _ => self,
        }
    }

    /// Storage size of one scalar element in bytes
    pub fn elem_size(&self) -> Option<u64> {
        match &self.kind {
            TypeKind::Primitive { category: Category::Complex, kind } => Some(2 * kind.width() as u64),
            TypeKind::Primitive { category, kind } => Some(kind.width_in(*category) as u64),
            TypeKind::Character { kind, len: CharLen::Fixed(n) } => {
                Some(*n as u64 * kind.char_width() as u64)
            }
            TypeKind::Character { len: CharLen::Variable, .. } => None,
            TypeKind::Array { base, .. } => base.elem_size(),
            TypeKind::Procedure { .. } => None,
        }
    }

    /// Number of scalar elements: 1 for scalars
    pub fn elem_count(&self) -> Option<u64> {
        match &self.kind {
            TypeKind::Array { shape, .. } => shape.elem_count(),
            TypeKind::Procedure { .. } => None,
            _ => Some(1),
        }
    }

    /// Total storage size in bytes
    pub fn size(&self) -> Option<u64> {
        self.elem_size()?.checked_mul(self.elem_count()?)
    }

    // ==================== Algebra ====================

    /// Structural equality used for redeclaration checks
    ///
    /// Kinds are equal when they name the same storage width, so
    /// `INTEGER` and `INTEGER*4` compare equal. Qualifiers are ignored.
    pub fn compare(&self, other: &SemaType) -> bool {
        match (&self.kind, &other.kind) {
            (
                TypeKind::Primitive { category: ca, kind: ka },
                TypeKind::Primitive { category: cb, kind: kb },
            ) => ca == cb && ka.width_in(*ca) == kb.width_in(*cb),
            (
                TypeKind::Character { kind: ka, len: la },
                TypeKind::Character { kind: kb, len: lb },
            ) => ka.char_width() == kb.char_width() && la == lb,
            (
                TypeKind::Array { base: ba, shape: sa },
                TypeKind::Array { base: bb, shape: sb },
            ) => sa.compare(sb) && ba.compare(bb),
            (TypeKind::Procedure { result: ra }, TypeKind::Procedure { result: rb }) => {
                match (ra, rb) {
                    (Some(a), Some(b)) => a.compare(b),
                    (None, None) => true,
                    _ => false,
                }
            }
            _ => false,
        }
    }

    /// Assignment / argument compatibility, looser than `compare`
    pub fn compatible(&self, other: &SemaType) -> bool {
        match (&self.kind, &other.kind) {
            (
                TypeKind::Primitive { category: ca, .. },
                TypeKind::Primitive { category: cb, .. },
            ) => ca == cb || (ca.is_integral() && cb.is_integral()),
            (TypeKind::Character { kind: ka, .. }, TypeKind::Character { kind: kb, .. }) => {
                ka.char_width() == kb.char_width()
            }
            (
                TypeKind::Array { base: ba, shape: sa },
                TypeKind::Array { base: bb, shape: sb },
            ) => sa.compare(sb) && ba.compatible(bb),
            (TypeKind::Procedure { .. }, TypeKind::Procedure { .. }) => self.compare(other),
            _ => false,
        }
    }

    /// Numeric-widening join of two types
    ///
    /// Returns `None` where the join is undefined: CHARACTER with anything
    /// but CHARACTER of the same kind and a matching or variable length,
    /// arrays of different shape, procedures.
    pub fn promote(&self, other: &SemaType) -> Option<SemaType> {
        match (&self.kind, &other.kind) {
            (
                TypeKind::Array { base: ba, shape: sa },
                TypeKind::Array { base: bb, shape: sb },
            ) => {
                if !sa.compare(sb) {
                    return None;
                }
                Some(SemaType::array(ba.promote(bb)?, sa.clone()))
            }
            (TypeKind::Array { base, shape }, _) => {
                Some(SemaType::array(base.promote(other)?, shape.clone()))
            }
            (_, TypeKind::Array { base, shape }) => {
                Some(SemaType::array(self.promote(base)?, shape.clone()))
            }
            (
                TypeKind::Character { kind: ka, len: la },
                TypeKind::Character { kind: kb, len: lb },
            ) => {
                if ka.char_width() != kb.char_width() {
                    return None;
                }
                let len = match (la, lb) {
                    (CharLen::Variable, _) | (_, CharLen::Variable) => CharLen::Variable,
                    (CharLen::Fixed(a), CharLen::Fixed(b)) if a == b => *la,
                    _ => return None,
                };
                Some(SemaType::character(*ka, len))
            }
            (
                TypeKind::Primitive { category: ca, kind: ka },
                TypeKind::Primitive { category: cb, kind: kb },
            ) => {
                let category = if ca.rank() >= cb.rank() { *ca } else { *cb };
                let kind = if ka.width_in(*ca) >= kb.width_in(*cb) { *ka } else { *kb };
                if category == Category::Byte {
                    return Some(SemaType::byte());
                }
                Some(SemaType::primitive(category, kind))
            }
            _ => None,
        }
    }
}

impl Default for SemaType {
    fn default() -> Self {
        Self::integer()
    }
}

impl fmt::Display for SemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Primitive { category: Category::Byte, .. } => f.write_str("BYTE"),
            TypeKind::Primitive { category, kind: Kind::Default } => write!(f, "{}", category),
            TypeKind::Primitive { category: Category::Real, kind: Kind::Double } => {
                f.write_str("DOUBLE PRECISION")
            }
            TypeKind::Primitive { category: Category::Complex, kind: Kind::Double } => {
                f.write_str("DOUBLE COMPLEX")
            }
            TypeKind::Primitive { category, kind } => {
                write!(f, "{}(KIND={})", category, kind.width())
            }
            TypeKind::Character { kind, len } => {
                f.write_str("CHARACTER")?;
                if *kind != Kind::Default {
                    write!(f, "(KIND={})", kind.char_width())?;
                }
                match len {
                    CharLen::Fixed(n) => write!(f, "*{}", n),
                    CharLen::Variable => f.write_str("*(*)"),
                }
            }
            TypeKind::Array { base, shape } => write!(f, "{}, DIMENSION{}", base, shape),
            TypeKind::Procedure { result: Some(result) } => write!(f, "{} FUNCTION", result),
            TypeKind::Procedure { result: None } => f.write_str("SUBROUTINE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dimension;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sizes() {
        assert_eq!(SemaType::integer().size(), Some(4));
        assert_eq!(SemaType::double().size(), Some(8));
        assert_eq!(SemaType::double_complex().size(), Some(16));
        assert_eq!(SemaType::logical().size(), Some(4));
        assert_eq!(SemaType::byte().size(), Some(1));
        assert_eq!(SemaType::character(Kind::Default, CharLen::Fixed(12)).size(), Some(12));
        assert_eq!(SemaType::character(Kind::Default, CharLen::Variable).size(), None);

        let arr = SemaType::array(SemaType::real(), ArrayShape::vector(10));
        assert_eq!(arr.elem_count(), Some(10));
        assert_eq!(arr.size(), Some(40));
    }

    #[test]
    fn test_array_base_never_array() {
        let inner = SemaType::array(SemaType::integer(), ArrayShape::vector(3));
        let outer = SemaType::array(inner, ArrayShape::vector(5));
        assert!(!outer.base().is_array());
        assert_eq!(outer.elem_count(), Some(5));
    }

    #[test]
    fn test_compare_by_storage_width() {
        let int4 = SemaType::primitive(Category::Integer, Kind::Bytes(4));
        assert!(SemaType::integer().compare(&int4));
        assert!(!SemaType::integer().compare(&SemaType::real()));
        assert!(!SemaType::real().compare(&SemaType::double()));

        let stat = SemaType::integer().with_qualifiers(Qualifiers::new().with_static());
        assert!(stat.compare(&SemaType::integer()));
    }

    #[test]
    fn test_compatible() {
        let int2 = SemaType::primitive(Category::Integer, Kind::Half);
        assert!(SemaType::integer().compatible(&int2));
        assert!(SemaType::integer().compatible(&SemaType::byte()));
        assert!(!SemaType::integer().compatible(&SemaType::real()));

        let c5 = SemaType::character(Kind::Default, CharLen::Fixed(5));
        let c9 = SemaType::character(Kind::Default, CharLen::Fixed(9));
        assert!(c5.compatible(&c9));
        assert!(!c5.compatible(&SemaType::integer()));
    }

    #[test]
    fn test_promote_numeric() {
        let p = SemaType::integer().promote(&SemaType::real()).unwrap();
        assert!(p.compare(&SemaType::real()));

        let p = SemaType::real().promote(&SemaType::double()).unwrap();
        assert!(p.compare(&SemaType::double()));

        let p = SemaType::double().promote(&SemaType::complex()).unwrap();
        assert!(p.compare(&SemaType::double_complex()));

        let int8 = SemaType::primitive(Category::Integer, Kind::Bytes(8));
        let p = SemaType::real().promote(&int8).unwrap();
        assert_eq!(p.category(), Some(Category::Real));
        assert_eq!(p.elem_size(), Some(8));

        let p = SemaType::logical().promote(&SemaType::byte()).unwrap();
        assert_eq!(p, SemaType::byte());
    }

    #[test]
    fn test_promote_character() {
        let a = SemaType::character(Kind::Default, CharLen::Fixed(4));
        let b = SemaType::character(Kind::Default, CharLen::Variable);
        let wide = SemaType::character(Kind::Bytes(4), CharLen::Fixed(4));
        assert_eq!(a.promote(&a), Some(a.clone()));
        assert_eq!(a.promote(&b).and_then(|t| t.char_len()), Some(CharLen::Variable));
        assert_eq!(a.promote(&wide), None);
        assert_eq!(a.promote(&SemaType::integer()), None);
    }

    #[test]
    fn test_star_len() {
        let c = SemaType::character(Kind::Default, CharLen::Fixed(1)).with_star_len(8).unwrap();
        assert_eq!(c.char_len(), Some(CharLen::Fixed(8)));

        let r8 = SemaType::real().with_star_len(8).unwrap();
        assert!(r8.compare(&SemaType::double()));

        let c16 = SemaType::complex().with_star_len(16).unwrap();
        assert!(c16.compare(&SemaType::double_complex()));

        assert_eq!(SemaType::integer().with_star_len(3), None);
        assert_eq!(SemaType::subroutine().with_star_len(4), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(SemaType::integer().to_string(), "INTEGER");
        assert_eq!(SemaType::double().to_string(), "DOUBLE PRECISION");
        let shape = ArrayShape::new(vec![Dimension::upto(2), Dimension::upto(3)]);
        assert_eq!(
            SemaType::array(SemaType::real(), shape).to_string(),
            "REAL, DIMENSION(1:2,1:3)"
        );
    }
}
