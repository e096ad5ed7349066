//! Index-addressed expression arena.
//!
//! The AST is recursive and read-only during evaluation, so nodes live in
//! contiguous arrays addressed by `ExprId`/range types instead of a pointer
//! tree. One arena is owned by one [`Program`] per parse.

use super::expr::{Branch, Expr, MapEntry};
use crate::{BranchRange, EntryRange, ExprId, ExprRange, Name, NameRange};

fn index_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("{what} arena overflow"))
}

/// Arena holding every expression of one parsed program, plus the dense
/// side tables its range-typed children point into.
#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    branches: Vec<Branch>,
    entries: Vec<MapEntry>,
    names: Vec<Name>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an expression, returning its ID.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(index_u32(self.exprs.len(), "expression"));
        self.exprs.push(expr);
        id
    }

    /// Get an expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is invalid or from another arena.
    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    /// Number of allocated expressions.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// Flatten a list of expression IDs into the arena.
    pub fn alloc_list(&mut self, ids: &[ExprId]) -> ExprRange {
        let start = index_u32(self.expr_lists.len(), "expression list");
        self.expr_lists.extend_from_slice(ids);
        ExprRange::new(start, index_u32(ids.len(), "expression list"))
    }

    /// Resolve an expression range to its IDs.
    #[inline]
    pub fn list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.to_range()]
    }

    /// Flatten the branches of an `if` chain.
    pub fn alloc_branches(&mut self, branches: &[Branch]) -> BranchRange {
        let start = index_u32(self.branches.len(), "branch");
        self.branches.extend_from_slice(branches);
        BranchRange::new(start, index_u32(branches.len(), "branch"))
    }

    /// Resolve a branch range.
    #[inline]
    pub fn branches(&self, range: BranchRange) -> &[Branch] {
        &self.branches[range.to_range()]
    }

    /// Flatten the entries of a map literal.
    pub fn alloc_entries(&mut self, entries: &[MapEntry]) -> EntryRange {
        let start = index_u32(self.entries.len(), "map entry");
        self.entries.extend_from_slice(entries);
        EntryRange::new(start, index_u32(entries.len(), "map entry"))
    }

    /// Resolve a map-entry range.
    #[inline]
    pub fn entries(&self, range: EntryRange) -> &[MapEntry] {
        &self.entries[range.to_range()]
    }

    /// Flatten a parameter name list.
    pub fn alloc_names(&mut self, names: &[Name]) -> NameRange {
        let start = index_u32(self.names.len(), "name");
        self.names.extend_from_slice(names);
        NameRange::new(start, index_u32(names.len(), "name"))
    }

    /// Resolve a name range.
    #[inline]
    pub fn names(&self, range: NameRange) -> &[Name] {
        &self.names[range.to_range()]
    }
}

/// A parsed program: the arena plus the root block.
#[derive(Clone, Debug)]
pub struct Program {
    pub arena: ExprArena,
    pub root: ExprId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::Span;

    #[test]
    fn alloc_and_get() {
        let mut arena = ExprArena::new();
        let id = arena.alloc(Expr::new(ExprKind::Null, Span::DUMMY));
        assert_eq!(arena.get(id).kind, ExprKind::Null);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn lists_round_trip() {
        let mut arena = ExprArena::new();
        let a = arena.alloc(Expr::new(ExprKind::Bool(true), Span::DUMMY));
        let b = arena.alloc(Expr::new(ExprKind::Bool(false), Span::DUMMY));
        let range = arena.alloc_list(&[a, b]);
        assert_eq!(arena.list(range), &[a, b]);
    }

    #[test]
    fn side_tables_round_trip() {
        let mut arena = ExprArena::new();
        let cond = arena.alloc(Expr::new(ExprKind::Bool(true), Span::DUMMY));
        let body = arena.alloc(Expr::new(ExprKind::Null, Span::DUMMY));
        let branches = arena.alloc_branches(&[Branch { cond, body }]);
        assert_eq!(arena.branches(branches).len(), 1);

        let names = arena.alloc_names(&[Name::EMPTY]);
        assert_eq!(arena.names(names), &[Name::EMPTY]);
    }
}
