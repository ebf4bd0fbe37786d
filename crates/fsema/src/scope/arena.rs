//! Scope arena
//!
//! Every scope lives in one arena and is addressed by `ScopeId`;
//! declarations are addressed by `DeclId`. Views and parent links hold
//! these handles instead of references.

use tracing::debug;

use super::{DeclTable, DeclView, Declaration, ImplicitTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(u32);

impl ScopeId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a declaration owned by a scope's table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId {
    pub scope: ScopeId,
    pub slot: u32,
}

impl DeclId {
    pub fn new(scope: ScopeId, slot: u32) -> Self {
        Self { scope, slot }
    }
}

/// Program unit a scope belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Program,
    Subroutine,
    Function,
    BlockData,
}

#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    implicit: ImplicitTable,
    decls: DeclTable,
    view: DeclView,
}

impl Scope {
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn implicit(&self) -> &ImplicitTable {
        &self.implicit
    }

    pub fn implicit_mut(&mut self) -> &mut ImplicitTable {
        &mut self.implicit
    }

    /// Declarations owned by this scope
    pub fn decls(&self) -> &DeclTable {
        &self.decls
    }

    pub fn decls_mut(&mut self) -> &mut DeclTable {
        &mut self.decls
    }

    /// Host-associated and COMMON declarations visible here
    pub fn view(&self) -> &DeclView {
        &self.view
    }
}

#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope; a child starts with its host's implicit rules
    pub fn push(
        &mut self,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        case_sensitive: bool,
    ) -> ScopeId {
        let implicit = parent
            .and_then(|p| self.get(p))
            .map(|p| p.implicit.clone())
            .unwrap_or_default();
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent,
            implicit,
            decls: DeclTable::new(case_sensitive),
            view: DeclView::new(case_sensitive),
        });
        debug!(?id, ?kind, ?parent, "created scope");
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.index())
    }

    pub fn get_mut(&mut self, id: ScopeId) -> Option<&mut Scope> {
        self.scopes.get_mut(id.index())
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn decl(&self, id: DeclId) -> Option<&Declaration> {
        self.get(id.scope)?.decls.get(id.slot as usize)
    }

    pub fn decl_mut(&mut self, id: DeclId) -> Option<&mut Declaration> {
        self.get_mut(id.scope)?.decls.get_mut(id.slot as usize)
    }

    /// Add a declaration to a scope's own table
    pub fn add_decl(&mut self, scope: ScopeId, decl: Declaration) -> Result<DeclId, Declaration> {
        let Some(target) = self.get_mut(scope) else {
            return Err(decl);
        };
        let slot = target.decls.add(decl)?;
        debug!(?scope, slot, "added declaration");
        Ok(DeclId::new(scope, slot as u32))
    }

    /// Make a declaration owned elsewhere visible in `scope`
    pub fn add_view(&mut self, scope: ScopeId, name: &str, id: DeclId) -> Result<(), DeclId> {
        if self.decl(id).is_none() {
            return Err(id);
        }
        match self.get_mut(scope) {
            Some(target) => target.view.add(name, id),
            None => Err(id),
        }
    }

    /// Handle of a declaration in the scope's own table
    pub fn find_local(&self, scope: ScopeId, name: &str) -> Option<DeclId> {
        let slot = self.get(scope)?.decls.position(name)?;
        Some(DeclId::new(scope, slot as u32))
    }

    /// Handle of a declaration visible in the scope itself, owned or viewed
    ///
    /// Unlike `lookup`, enclosing scopes are not searched.
    pub fn find_visible(&self, scope: ScopeId, name: &str) -> Option<DeclId> {
        let s = self.get(scope)?;
        match s.decls.position(name) {
            Some(slot) => Some(DeclId::new(scope, slot as u32)),
            None => s.view.get(name),
        }
    }

    /// Declaration reached through the scope's view
    pub fn find_in_view(&self, scope: ScopeId, name: &str) -> Option<&Declaration> {
        let id = self.get(scope)?.view.get(name)?;
        self.decl(id)
    }

    /// Mutable access through the view reaches the owning table
    pub fn find_modify_in_view(&mut self, scope: ScopeId, name: &str) -> Option<&mut Declaration> {
        let id = self.get(scope)?.view.get(name)?;
        self.decl_mut(id)
    }

    /// Search the local table, the view, then each enclosing scope
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<DeclId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.get(id)?;
            if let Some(slot) = s.decls.position(name) {
                return Some(DeclId::new(id, slot as u32));
            }
            if let Some(found) = s.view.get(name) {
                return Some(found);
            }
            current = s.parent;
        }
        None
    }

    pub fn lookup_decl(&self, scope: ScopeId, name: &str) -> Option<&Declaration> {
        self.decl(self.lookup(scope, name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Span;
    use crate::types::SemaType;

    fn decl(name: &str, ty: SemaType) -> Declaration {
        Declaration::new(name, ty, Span::default())
    }

    #[test]
    fn test_lookup_through_parents() {
        let mut arena = ScopeArena::new();
        let global = arena.push(ScopeKind::Program, None, false);
        let inner = arena.push(ScopeKind::Subroutine, Some(global), false);

        let outer_x = arena.add_decl(global, decl("X", SemaType::real())).unwrap();
        assert_eq!(arena.lookup(inner, "x"), Some(outer_x));

        let inner_x = arena.add_decl(inner, decl("X", SemaType::integer())).unwrap();
        assert_eq!(arena.lookup(inner, "X"), Some(inner_x));
        assert_eq!(arena.lookup(global, "X"), Some(outer_x));
        assert_eq!(arena.lookup(inner, "Y"), None);
    }

    #[test]
    fn test_view_mutation_reaches_owner() {
        let mut arena = ScopeArena::new();
        let owner = arena.push(ScopeKind::BlockData, None, false);
        let user = arena.push(ScopeKind::Program, None, false);

        let id = arena.add_decl(owner, decl("C", SemaType::integer())).unwrap();
        arena.add_view(user, "C", id).unwrap();
        assert_eq!(arena.lookup(user, "c"), Some(id));
        assert_eq!(arena.find_visible(user, "C"), Some(id));
        assert_eq!(arena.find_local(user, "C"), None);

        if let Some(d) = arena.find_modify_in_view(user, "C") {
            d.lock();
        }
        assert!(arena.decl(id).unwrap().is_locked());
        assert!(arena.find_in_view(user, "C").unwrap().is_locked());
    }

    #[test]
    fn test_view_rejects_dangling_handle() {
        let mut arena = ScopeArena::new();
        let s = arena.push(ScopeKind::Program, None, false);
        let bogus = DeclId::new(s, 7);
        assert_eq!(arena.add_view(s, "Z", bogus), Err(bogus));
    }

    #[test]
    fn test_child_inherits_implicit_rules() {
        let mut arena = ScopeArena::new();
        let host = arena.push(ScopeKind::Program, None, false);
        if let Some(s) = arena.get_mut(host) {
            *s.implicit_mut() = ImplicitTable::none();
        }
        let child = arena.push(ScopeKind::Function, Some(host), false);
        assert!(arena.get(child).unwrap().implicit().get("I").is_none());
    }
}
