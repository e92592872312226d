//! Lexical scope stack (spec.md §4.1 "Scope stack").
//!
//! No-shadowing is implemented exactly as spec.md §9 suggests: `declare`
//! calls `lookup` first across the whole chain, not just the current frame,
//! so redeclaring a name anywhere in an enclosing scope is rejected outright
//! rather than silently shadowed.

use std::collections::HashMap;

use carlos_parser::Span;

use crate::entities::{Entity, FuncId};
use crate::error::{SemanticError, SemanticResult};

#[derive(Debug)]
struct Frame {
    names: HashMap<String, Entity>,
    in_loop: bool,
    current_function: Option<FuncId>,
}

/// A stack of name-resolution frames. The global frame (index 0) is seeded
/// by the standard-library registry before any user code is analyzed.
#[derive(Debug)]
pub struct Scope {
    frames: Vec<Frame>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            frames: vec![Frame {
                names: HashMap::new(),
                in_loop: false,
                current_function: None,
            }],
        }
    }

    fn top(&self) -> &Frame {
        self.frames.last().expect("scope stack must never be empty")
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("scope stack must never be empty")
    }

    /// Enters a plain block: `inLoop`/`currentFunction` are inherited from
    /// the enclosing frame unchanged (spec.md §4.1: "other blocks inherit").
    pub fn enter_block(&mut self) {
        let in_loop = self.top().in_loop;
        let current_function = self.top().current_function;
        self.frames.push(Frame {
            names: HashMap::new(),
            in_loop,
            current_function,
        });
    }

    /// Enters a loop body: `inLoop` becomes true regardless of the
    /// enclosing frame (spec.md §4.1: "loops propagate inLoop=true into
    /// their body frame").
    pub fn enter_loop_body(&mut self) {
        let current_function = self.top().current_function;
        self.frames.push(Frame {
            names: HashMap::new(),
            in_loop: true,
            current_function,
        });
    }

    /// Enters a function body: `inLoop` resets to false and
    /// `currentFunction` is set, regardless of the enclosing frame (spec.md
    /// §4.1).
    pub fn enter_function_body(&mut self, func: FuncId) {
        self.frames.push(Frame {
            names: HashMap::new(),
            in_loop: false,
            current_function: Some(func),
        });
    }

    pub fn leave(&mut self) {
        self.frames.pop();
        debug_assert!(!self.frames.is_empty(), "popped the global frame");
    }

    /// Declares `name` in the current (innermost) frame. Fails if `name`
    /// already resolves anywhere in the enclosing chain — the language
    /// forbids shadowing even across nested scopes (spec.md §4.1).
    pub fn declare(&mut self, name: &str, entity: Entity, span: Span) -> SemanticResult<()> {
        if self.lookup_opt(name).is_some() {
            return Err(SemanticError::AlreadyDeclared {
                name: name.to_string(),
                span,
            });
        }
        self.top_mut().names.insert(name.to_string(), entity);
        Ok(())
    }

    pub fn lookup_opt(&self, name: &str) -> Option<Entity> {
        self.frames.iter().rev().find_map(|frame| frame.names.get(name).copied())
    }

    pub fn lookup(&self, name: &str, span: Span) -> SemanticResult<Entity> {
        self.lookup_opt(name).ok_or_else(|| SemanticError::NotDeclared {
            name: name.to_string(),
            span,
        })
    }

    pub fn in_loop(&self) -> bool {
        self.top().in_loop
    }

    pub fn current_function(&self) -> Option<FuncId> {
        self.top().current_function
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::VarId;

    fn span() -> Span {
        Span::new(0, 0, 1, 1)
    }

    #[test]
    fn redeclaration_in_nested_scope_is_rejected() {
        let mut scope = Scope::new();
        scope.declare("x", Entity::Variable(VarId(0)), span()).unwrap();
        scope.enter_block();
        let err = scope.declare("x", Entity::Variable(VarId(1)), span()).unwrap_err();
        assert!(matches!(err, SemanticError::AlreadyDeclared { .. }));
    }

    #[test]
    fn lookup_walks_outward() {
        let mut scope = Scope::new();
        scope.declare("x", Entity::Variable(VarId(0)), span()).unwrap();
        scope.enter_block();
        assert_eq!(scope.lookup("x", span()).unwrap(), Entity::Variable(VarId(0)));
    }

    #[test]
    fn loop_body_sets_in_loop() {
        let mut scope = Scope::new();
        assert!(!scope.in_loop());
        scope.enter_loop_body();
        assert!(scope.in_loop());
        scope.enter_block();
        assert!(scope.in_loop(), "plain blocks inherit inLoop from their parent");
        scope.leave();
        scope.leave();
        assert!(!scope.in_loop());
    }

    #[test]
    fn function_body_resets_in_loop_and_sets_current_function() {
        let mut scope = Scope::new();
        scope.enter_loop_body();
        scope.enter_function_body(FuncId(0));
        assert!(!scope.in_loop());
        assert_eq!(scope.current_function(), Some(FuncId(0)));
    }

    #[test]
    fn unknown_name_is_not_declared() {
        let scope = Scope::new();
        let err = scope.lookup("missing", span()).unwrap_err();
        assert!(matches!(err, SemanticError::NotDeclared { .. }));
    }
}
