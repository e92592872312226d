//! The semantic analyzer (spec.md §4.2).
//!
//! Walks the untyped parse tree bottom-up, attaching a `Type` to every
//! expression and resolving every identifier to the entity created at its
//! declaration. Split the way the IR it produces is split: declarations,
//! statements, and expressions each get their own file; type-expression
//! resolution is shared by all three so it lives on its own.

mod decls;
mod exprs;
mod stmts;
mod types;

use carlos_parser::cst;

use crate::entities::Arenas;
use crate::error::SemanticResult;
use crate::ir;
use crate::scope::Scope;
use crate::stdlib::{self, StdlibIds};

/// Decorates a parse tree into the typed, resolved IR (spec.md §1: phase 1
/// of the pipeline). The first error aborts analysis (spec.md §7).
pub fn analyze(program: &cst::Program) -> SemanticResult<ir::Program> {
    let mut arenas = Arenas::new();
    let mut scope = Scope::new();
    let stdlib = stdlib::install(&mut arenas, &mut scope);

    let mut analyzer = Analyzer {
        arenas,
        scope,
        stdlib,
    };
    let statements = analyzer.analyze_statements(&program.statements)?;

    Ok(ir::Program {
        arenas: analyzer.arenas,
        stdlib: analyzer.stdlib,
        statements,
    })
}

#[derive(Debug)]
struct Analyzer {
    arenas: Arenas,
    scope: Scope,
    stdlib: StdlibIds,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ControlFlowErrorKind, SemanticError, StructErrorKind, TypeMismatchKind};
    use crate::ir::Stmt;
    use crate::types::Type;

    fn analyze_src(src: &str) -> SemanticResult<ir::Program> {
        analyze(&carlos_parser::parse(src).expect("source must parse"))
    }

    #[test]
    fn folds_nothing_but_types_a_simple_declaration() {
        let program = analyze_src("let x = 3 * 7; x++;").unwrap();
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Stmt::VariableDeclaration { initializer, .. } => {
                assert_eq!(*initializer.ty(), Type::Int);
            }
            other => panic!("expected a variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn rejects_assignment_to_a_const() {
        let err = analyze_src("const x = 1; x = 2;").unwrap_err();
        assert!(matches!(err, SemanticError::AssignToReadOnly { .. }));
    }

    #[test]
    fn accepts_empty_optional_round_trip_through_two_variables() {
        let program = analyze_src("let a = no int; let b = some 1; a = b; b = a;").unwrap();
        assert_eq!(program.statements.len(), 4);
    }

    #[test]
    fn rejects_direct_struct_recursion_but_accepts_optional_recursion() {
        let err = analyze_src("struct S { z: S }").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::StructError {
                kind: StructErrorKind::RecursiveStruct,
                ..
            }
        ));

        analyze_src("struct S { z: S? }").unwrap();
    }

    #[test]
    fn rejects_struct_with_duplicate_field_names() {
        let err = analyze_src("struct S { a: int, a: int }").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::StructError {
                kind: StructErrorKind::FieldsNotDistinct,
                ..
            }
        ));
    }

    #[test]
    fn rejects_calling_a_function_with_a_mismatched_argument_type() {
        let err = analyze_src("function f(x: int) {} f(false);").unwrap_err();
        assert!(matches!(err, SemanticError::NotAssignable { .. }));
    }

    #[test]
    fn rejects_break_outside_a_loop() {
        let err = analyze_src("break;").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::ControlFlow {
                kind: ControlFlowErrorKind::BreakOutsideLoop,
                ..
            }
        ));
    }

    #[test]
    fn accepts_break_inside_a_while_loop() {
        analyze_src("while true { break; }").unwrap();
    }

    #[test]
    fn rejects_return_outside_a_function() {
        let err = analyze_src("return 1;").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::ControlFlow {
                kind: ControlFlowErrorKind::ReturnOutsideFunction,
                ..
            }
        ));
    }

    #[test]
    fn rejects_returning_a_value_from_a_void_function() {
        let err = analyze_src("function f() { return 1; }").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::ControlFlow {
                kind: ControlFlowErrorKind::ReturnValueInVoid,
                ..
            }
        ));
    }

    #[test]
    fn rejects_a_missing_return_value_in_a_non_void_function() {
        let err = analyze_src("function f(): int { return; }").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::ControlFlow {
                kind: ControlFlowErrorKind::ReturnValueMissing,
                ..
            }
        ));
    }

    #[test]
    fn a_function_may_call_itself() {
        analyze_src("function fact(n: int): int { return n * fact(n - 1); }").unwrap();
    }

    #[test]
    fn else_if_chains_do_not_add_a_redundant_scope() {
        let program = analyze_src(
            "let x = 1; if x == 1 { } else if x == 2 { } else { }",
        )
        .unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn rejects_conditional_with_non_boolean_test() {
        let err = analyze_src("if 1 { }").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedBoolean,
                ..
            }
        ));
    }

    #[test]
    fn rejects_shadowing_even_in_a_nested_scope() {
        let err = analyze_src("let x = 1; if true { let x = 2; }").unwrap_err();
        assert!(matches!(err, SemanticError::AlreadyDeclared { .. }));
    }

    #[test]
    fn member_and_subscript_access_type_check() {
        let program = analyze_src(
            "struct Point { x: int, y: int } let p = Point(1, 2); let a = [1, 2, 3]; let n = p.x + a[0];",
        )
        .unwrap();
        assert_eq!(program.statements.len(), 4);
    }

    #[test]
    fn rejects_calling_a_struct_constructor_with_the_wrong_arity() {
        let err = analyze_src("struct Point { x: int, y: int } let p = Point(1);").unwrap_err();
        assert!(matches!(err, SemanticError::ArityMismatch { .. }));
    }
}
