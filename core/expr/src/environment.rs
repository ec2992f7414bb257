//! FILENAME: core/expr/src/environment.rs
//! PURPOSE: Named variable storage used during evaluation.
//! CONTEXT: Globals are set by the host and live as long as the environment.
//! Scopes are pushed by functions that evaluate a sub-expression repeatedly
//! with per-iteration bindings (TABLE binds $1..$k once per dataset element).
//! Lookups walk the scopes innermost first, then fall back to the globals.

use crate::value::ExprValue;
use rustc_hash::FxHashMap;

type Bindings = FxHashMap<String, ExprValue>;

/// Variable environment with a global layer and a stack of scopes.
#[derive(Debug, Default)]
pub struct Environment {
    globals: Bindings,
    scopes: Vec<Bindings>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or overwrites) a global variable.
    pub fn set_global(&mut self, name: &str, value: ExprValue) {
        // Store with uppercase key for case-insensitive lookup
        self.globals.insert(name.to_uppercase(), value);
    }

    /// Binds a variable in the innermost scope, or globally when no scope
    /// is open.
    pub fn bind(&mut self, name: &str, value: ExprValue) {
        let key = name.to_uppercase();
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(key, value);
            }
            None => {
                self.globals.insert(key, value);
            }
        }
    }

    /// Looks a variable up (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ExprValue> {
        let key = name.to_uppercase();
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&key))
            .or_else(|| self.globals.get(&key))
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Bindings::default());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Number of open scopes.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
