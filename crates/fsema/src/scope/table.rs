//! Owning and reference declaration tables
//!
//! Both tables key their entries by the declared name, folded to upper
//! case unless the table is case sensitive. Folded names are interned so
//! the index maps symbols rather than owned strings.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use string_interner::{DefaultStringInterner, DefaultSymbol};
use tracing::trace;

use super::{DeclId, Declaration};

/// Folded-name index shared by both table flavours
struct NameIndex<V> {
    case_sensitive: bool,
    names: DefaultStringInterner,
    entries: HashMap<DefaultSymbol, V>,
}

impl<V: Copy> NameIndex<V> {
    fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            names: DefaultStringInterner::default(),
            entries: HashMap::new(),
        }
    }

    fn fold<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(name.to_ascii_uppercase())
        }
    }

    fn get(&self, name: &str) -> Option<V> {
        let symbol = self.names.get(self.fold(name).as_ref())?;
        self.entries.get(&symbol).copied()
    }

    /// Returns false if the folded name is already present
    fn insert(&mut self, name: &str, value: V) -> bool {
        let key = self.fold(name).into_owned();
        let symbol = self.names.get_or_intern(key);
        if self.entries.contains_key(&symbol) {
            return false;
        }
        self.entries.insert(symbol, value);
        true
    }
}

/// Declaration table that owns its entries
pub struct DeclTable {
    index: NameIndex<usize>,
    decls: Vec<Declaration>,
}

impl DeclTable {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            index: NameIndex::new(case_sensitive),
            decls: Vec::new(),
        }
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.index.case_sensitive
    }

    /// Add a declaration, handing it back if the name is taken
    pub fn add(&mut self, decl: Declaration) -> Result<usize, Declaration> {
        let slot = self.decls.len();
        if !self.index.insert(decl.name(), slot) {
            return Err(decl);
        }
        self.decls.push(decl);
        Ok(slot)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        let slot = self.index.get(name);
        trace!(name, found = slot.is_some(), "table lookup");
        slot
    }

    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.position(name).and_then(|slot| self.decls.get(slot))
    }

    pub fn find_modify(&mut self, name: &str) -> Option<&mut Declaration> {
        let slot = self.position(name)?;
        self.decls.get_mut(slot)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, slot: usize) -> Option<&Declaration> {
        self.decls.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Declaration> {
        self.decls.get_mut(slot)
    }

    /// Declarations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl fmt::Debug for DeclTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclTable")
            .field("case_sensitive", &self.index.case_sensitive)
            .field("decls", &self.decls)
            .finish()
    }
}

/// Declaration table holding handles to declarations owned elsewhere
///
/// Used for host association and COMMON blocks; dropping a view never
/// drops a declaration.
pub struct DeclView {
    index: NameIndex<DeclId>,
    ids: Vec<DeclId>,
}

impl DeclView {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            index: NameIndex::new(case_sensitive),
            ids: Vec::new(),
        }
    }

    /// Record `id` under `name`, handing the id back if the name is taken
    pub fn add(&mut self, name: &str, id: DeclId) -> Result<(), DeclId> {
        if !self.index.insert(name, id) {
            return Err(id);
        }
        self.ids.push(id);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<DeclId> {
        self.index.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl fmt::Debug for DeclView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclView")
            .field("case_sensitive", &self.index.case_sensitive)
            .field("ids", &self.ids)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Span;
    use crate::scope::ScopeId;
    use crate::types::SemaType;

    fn decl(name: &str) -> Declaration {
        Declaration::new(name, SemaType::integer(), Span::default())
    }

    #[test]
    fn test_case_insensitive() {
        let mut table = DeclTable::new(false);
        table.add(decl("Count")).unwrap();
        assert!(table.find("COUNT").is_some());
        assert!(table.find("count").is_some());
        assert_eq!(table.find("count").map(Declaration::name), Some("Count"));
        assert!(table.add(decl("COUNT")).is_err());
    }

    #[test]
    fn test_case_sensitive() {
        let mut table = DeclTable::new(true);
        table.add(decl("x")).unwrap();
        assert!(table.find("X").is_none());
        assert!(table.add(decl("X")).is_ok());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_returns_declaration() {
        let mut table = DeclTable::new(false);
        table.add(decl("A")).unwrap();
        let rejected = table.add(Declaration::new("a", SemaType::real(), Span::default()));
        let back = rejected.unwrap_err();
        assert!(back.ty().is_real());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insertion_order() {
        let mut table = DeclTable::new(false);
        for name in ["C", "A", "B"] {
            table.add(decl(name)).unwrap();
        }
        let names: Vec<_> = table.iter().map(Declaration::name).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn test_find_modify() {
        let mut table = DeclTable::new(false);
        table.add(decl("N")).unwrap();
        if let Some(d) = table.find_modify("n") {
            d.set_ty(SemaType::double());
        }
        assert!(table.find("N").unwrap().ty().compare(&SemaType::double()));
    }

    #[test]
    fn test_view_stores_handles() {
        let mut view = DeclView::new(false);
        let id = DeclId::new(ScopeId::from_raw(0), 3);
        view.add("Shared", id).unwrap();
        assert_eq!(view.get("SHARED"), Some(id));
        assert!(view.add("shared", id).is_err());
        assert_eq!(view.iter().collect::<Vec<_>>(), [id]);
    }
}
