//! Declaration tables and the scope arena

mod arena;
mod decl;
mod implicit;
mod table;

pub use arena::{DeclId, Scope, ScopeArena, ScopeId, ScopeKind};
pub use decl::{Declaration, Init};
pub use implicit::ImplicitTable;
pub use table::{DeclTable, DeclView};
