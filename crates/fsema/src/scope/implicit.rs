//! IMPLICIT typing rules

use crate::types::SemaType;

const LETTERS: usize = 26;

/// Type assigned to undeclared names by their first letter
#[derive(Debug, Clone, PartialEq)]
pub struct ImplicitTable {
    types: [Option<SemaType>; LETTERS],
}

impl ImplicitTable {
    /// Default rules: I-N are INTEGER, everything else REAL
    pub fn new() -> Self {
        let mut table = Self::none();
        table.set('A', 'Z', &SemaType::real());
        table.set('I', 'N', &SemaType::integer());
        table
    }

    /// IMPLICIT NONE
    pub fn none() -> Self {
        Self {
            types: std::array::from_fn(|_| None),
        }
    }

    /// Apply `IMPLICIT type (first-last)`; returns false for a bad range
    pub fn set(&mut self, first: char, last: char, ty: &SemaType) -> bool {
        let (Some(first), Some(last)) = (letter_index(first), letter_index(last)) else {
            return false;
        };
        if first > last {
            return false;
        }
        for slot in &mut self.types[first..=last] {
            *slot = Some(ty.clone());
        }
        true
    }

    /// Remove the rule for a range, as IMPLICIT NONE does for all letters
    pub fn clear(&mut self, first: char, last: char) -> bool {
        let (Some(first), Some(last)) = (letter_index(first), letter_index(last)) else {
            return false;
        };
        for slot in self.types.iter_mut().take(last + 1).skip(first) {
            *slot = None;
        }
        true
    }

    /// Implicit type for a name, from its first letter
    pub fn get(&self, name: &str) -> Option<&SemaType> {
        let index = letter_index(name.chars().next()?)?;
        self.types[index].as_ref()
    }
}

impl Default for ImplicitTable {
    fn default() -> Self {
        Self::new()
    }
}

fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_alphabetic() {
        Some((c.to_ascii_uppercase() as u8 - b'A') as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let table = ImplicitTable::new();
        assert!(table.get("INDEX").unwrap().is_integer());
        assert!(table.get("n").unwrap().is_integer());
        assert!(table.get("X").unwrap().is_real());
        assert!(table.get("h").unwrap().is_real());
        assert!(table.get("_TMP").is_none());
        assert!(table.get("").is_none());
    }

    #[test]
    fn test_implicit_none() {
        let table = ImplicitTable::none();
        assert!(table.get("I").is_none());
    }

    #[test]
    fn test_custom_range() {
        let mut table = ImplicitTable::new();
        assert!(table.set('a', 'c', &SemaType::double()));
        assert!(table.get("B").unwrap().compare(&SemaType::double()));
        assert!(!table.set('Z', 'A', &SemaType::logical()));
        assert!(table.clear('X', 'Z'));
        assert!(table.get("Y").is_none());
    }
}
