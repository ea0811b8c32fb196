//! Structural grammar rewriting.
//!
//! A walker rebuilds a grammar tree node by node: every combinator's
//! `map_children` returns a copy of itself with each child replaced by the
//! walker's result for that child. The walker threads the stack of named
//! rules it is currently inside, so analyses can tell *where* in the
//! grammar a node sits.

use crate::parser::Parser;

/// Rebuilding visitor over a grammar tree.
///
/// The base walker is the identity: it reproduces the tree structurally,
/// forcing lazy rule bodies along the way. `scope()` exposes the names of
/// the rules enclosing the node currently being rebuilt.
#[derive(Default)]
pub struct ScopedWalker {
    scope: Vec<String>,
}

impl ScopedWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds `parser`'s subtree, recursing through every child.
    pub fn walk<T: 'static>(&mut self, parser: &Parser<T>) -> Parser<T> {
        parser.map_children(self)
    }

    /// Names of the rules enclosing the current rebuild position,
    /// outermost first.
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub(crate) fn enter_rule(&mut self, name: &str) {
        self.scope.push(name.to_string());
    }

    pub(crate) fn exit_rule(&mut self) {
        self.scope.pop();
    }
}
