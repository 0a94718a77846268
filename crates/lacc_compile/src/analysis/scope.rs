//! Scope stack for name binding.
//!
//! LA has exactly two visibility levels: the global scope and, while a
//! subroutine body is being processed, one local scope that shadows it.
//! The stack model keeps the operations symmetric anyway: push on entry,
//! pop on exit, innermost-first lookup.

use std::collections::HashMap;

use lacc_base::Symbol;

use super::types::Ty;

#[derive(Debug, Default)]
pub struct ScopeStack {
    scopes: Vec<HashMap<Symbol, Ty>>,
}

impl ScopeStack {
    /// Starts with the global frame in place.
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a name in the innermost frame.
    ///
    /// A name visible in any frame counts as a redeclaration; the first
    /// binding is kept and `Err` tells the caller to diagnose.
    pub fn declare(&mut self, name: Symbol, ty: Ty) -> Result<(), ()> {
        if self.scopes.iter().any(|scope| scope.contains_key(&name)) {
            return Err(());
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, ty);
        }
        Ok(())
    }

    /// Innermost-first lookup; the local frame shadows the global one.
    pub fn lookup(&self, name: Symbol) -> Option<&Ty> {
        self.scopes.iter().rev().find_map(|scope| scope.get(&name))
    }
}
