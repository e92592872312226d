//! The standard-library registry (spec.md §6.2).
//!
//! Installed once per analysis into a fresh `Arenas`/`Scope` pair. The
//! returned [`StdlibIds`] travels with the decorated `Program` so the
//! generator can later recognize a call to `print` (or any other built-in)
//! by entity identity rather than by name — spec.md §9 "Generator must
//! distinguish `print` from a user-defined `print` by entity identity".
//! Since every analysis allocates the registry first, in the same order,
//! the ids below are stable across runs without needing real pointers
//! (spec.md §9 "Entity identity without pointers").

use serde::{Deserialize, Serialize};

use carlos_parser::Span;

use crate::entities::{Arenas, Entity, FuncId, VarId};
use crate::scope::Scope;
use crate::types::Type;

/// A span with no real source location, used only for the synthetic
/// declarations the registry installs before any user source is read.
fn builtin_span() -> Span {
    Span::new(0, 0, 0, 0)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StdlibIds {
    pub print: FuncId,
    pub sin: FuncId,
    pub cos: FuncId,
    pub exp: FuncId,
    pub ln: FuncId,
    pub hypot: FuncId,
    pub bytes: FuncId,
    pub codepoints: FuncId,
    pub pi: VarId,
}

/// Mathematical constant `π` (spec.md §6.2), to the precision the spec
/// quotes.
pub const PI: f64 = 3.14159265358979;

/// Allocates every standard-library entity into `arenas` and declares its
/// name in the scope's global frame, pre-populating it before any user
/// declaration is analyzed (spec.md §4.1 "Pre-populate the global frame
/// with every name from the standard-library registry").
pub fn install(arenas: &mut Arenas, scope: &mut Scope) -> StdlibIds {
    let pi = arenas.alloc_variable("π", true, Type::Float);
    declare(scope, "π", Entity::Variable(pi));

    let mut func = |arenas: &mut Arenas, scope: &mut Scope, name: &str, params: Vec<Type>, ret: Type| {
        let id = arenas.alloc_function(name, Type::function(params, ret));
        declare(scope, name, Entity::Function(id));
        id
    };

    let print = func(arenas, scope, "print", vec![Type::Any], Type::Void);
    let sin = func(arenas, scope, "sin", vec![Type::Float], Type::Float);
    let cos = func(arenas, scope, "cos", vec![Type::Float], Type::Float);
    let exp = func(arenas, scope, "exp", vec![Type::Float], Type::Float);
    let ln = func(arenas, scope, "ln", vec![Type::Float], Type::Float);
    let hypot = func(arenas, scope, "hypot", vec![Type::Float, Type::Float], Type::Float);
    let bytes = func(arenas, scope, "bytes", vec![Type::String], Type::array(Type::Int));
    let codepoints = func(arenas, scope, "codepoints", vec![Type::String], Type::array(Type::Int));

    StdlibIds {
        print,
        sin,
        cos,
        exp,
        ln,
        hypot,
        bytes,
        codepoints,
        pi,
    }
}

fn declare(scope: &mut Scope, name: &str, entity: Entity) {
    scope
        .declare(name, entity, builtin_span())
        .expect("standard-library names must be unique and declared exactly once");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_and_pi_are_visible_from_the_global_frame() {
        let mut arenas = Arenas::new();
        let mut scope = Scope::new();
        let stdlib = install(&mut arenas, &mut scope);

        assert_eq!(scope.lookup_opt("print"), Some(Entity::Function(stdlib.print)));
        assert_eq!(scope.lookup_opt("π"), Some(Entity::Variable(stdlib.pi)));
        assert!(arenas.variable(stdlib.pi).read_only);
        assert_eq!(arenas.function(stdlib.print).param_types(), &[Type::Any]);
        assert_eq!(arenas.function(stdlib.print).return_type(), &Type::Void);
    }
}
