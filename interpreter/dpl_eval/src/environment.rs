//! Lexical scopes.
//!
//! Scopes form a chain rooted at one global scope per run. A child scope is
//! created for each block-owning construct (if branch, loop iteration,
//! function call). Closures clone the [`ScopeHandle`] active at their
//! definition site; the chain is acyclic by construction (a child's parent
//! always predates it), so plain reference counting is enough.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use dpl_ir::Name;

use crate::value::Value;

/// Single-threaded shared ownership with interior mutability.
///
/// Wraps `Rc<RefCell<T>>` and keeps the allocation behind a factory method.
/// `Rc`, not `Arc`: scope chains never cross threads.
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Pointer identity.
    #[inline]
    pub fn ptr_eq(a: &LocalScope<T>, b: &LocalScope<T>) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

/// Shared handle to a scope: the unit of closure capture.
pub type ScopeHandle = LocalScope<Scope>;

/// Why a binding operation failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindError {
    /// `:=` on a name already bound in the current scope.
    Redeclared,
    /// `=` on a name not bound in any enclosing scope.
    Undefined,
}

/// A single scope: bindings plus an optional parent.
#[derive(Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<ScopeHandle>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: ScopeHandle) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.borrow().lookup(name))
    }

    fn assign(&mut self, name: Name, value: Value) -> Result<(), BindError> {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(BindError::Undefined),
        }
    }
}

/// The evaluator's view of the current scope.
///
/// Cheap to clone and to derive children from; the evaluator threads an
/// `Environment` through every evaluation step and creates a child per
/// scope-owning construct.
#[derive(Clone, Debug)]
pub struct Environment {
    current: ScopeHandle,
}

impl Environment {
    /// A fresh global scope.
    pub fn new() -> Self {
        Environment {
            current: LocalScope::new(Scope::new()),
        }
    }

    /// View an existing scope (a closure's captured scope) as an
    /// environment.
    pub fn from_handle(handle: ScopeHandle) -> Self {
        Environment { current: handle }
    }

    /// The current scope handle, for closure capture.
    pub fn handle(&self) -> ScopeHandle {
        self.current.clone()
    }

    /// Create a child environment whose parent is the current scope.
    #[must_use]
    pub fn child(&self) -> Self {
        Environment {
            current: LocalScope::new(Scope::with_parent(self.current.clone())),
        }
    }

    /// Bind unconditionally in the current scope (builtins, parameters,
    /// loop variables).
    pub fn define(&self, name: Name, value: Value) {
        self.current.borrow_mut().bindings.insert(name, value);
    }

    /// `:=` — create a binding in the current scope, shadowing any outer
    /// binding; fails if the name is already bound in this scope.
    pub fn declare(&self, name: Name, value: Value) -> Result<(), BindError> {
        let mut scope = self.current.borrow_mut();
        if scope.bindings.contains_key(&name) {
            return Err(BindError::Redeclared);
        }
        scope.bindings.insert(name, value);
        Ok(())
    }

    /// `=` — mutate the nearest enclosing scope that defines the name.
    pub fn assign(&self, name: Name, value: Value) -> Result<(), BindError> {
        self.current.borrow_mut().assign(name, value)
    }

    /// Walk the scope chain outward.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.current.borrow().lookup(name)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
