//! End-to-end tests driving the full parse → analyze → optimize →
//! generate pipeline (spec.md §8's concrete scenarios and universal
//! invariants).

use pretty_assertions::assert_eq;

use carlos::error::SemanticError;
use carlos::{analyze_source, generate_source, optimize_source, CompileError};

fn expect_semantic_error(source: &str) -> SemanticError {
    match generate_source(source) {
        Err(CompileError::Semantic(err)) => err,
        Err(CompileError::Parse(err)) => panic!("expected a semantic error, got a parse error: {err}"),
        Ok(out) => panic!("expected a semantic error, but compilation succeeded with:\n{out}"),
    }
}

#[test]
fn scenario_1_constant_folding_across_a_declaration_and_an_increment() {
    let out = generate_source("let x = 3 * 7; x++;").unwrap();
    assert!(out.contains("let x_1 = 21;"), "expected the multiplication folded away, got:\n{out}");
    assert!(out.contains("x_1++;"), "expected the increment to reuse x's mangled name, got:\n{out}");
}

#[test]
fn scenario_2_assigning_to_a_const_is_rejected() {
    let err = expect_semantic_error("const x = 1; x = 2;");
    assert!(matches!(err, SemanticError::AssignToReadOnly { .. }), "got: {err:?}");
}

#[test]
fn scenario_3_optionals_round_trip_through_cross_assignment() {
    let program = optimize_source("let a = no int; let b = some 1; a = b; b = a;").unwrap();
    assert_eq!(program.statements.len(), 4, "optimizer must not eliminate any of these statements");
}

#[test]
fn scenario_4_direct_self_reference_is_recursive_but_optional_self_reference_is_not() {
    let err = expect_semantic_error("struct S { z: S }");
    assert!(matches!(
        err,
        SemanticError::StructError {
            kind: carlos::error::StructErrorKind::RecursiveStruct,
            ..
        }
    ));

    let out = generate_source("struct S { z: S? }").unwrap();
    assert!(out.contains("class S_"), "got:\n{out}");
}

#[test]
fn scenario_4b_array_self_reference_is_accepted() {
    generate_source("struct S { z: [S] }").expect("an array of S inside S must be accepted");
}

#[test]
fn scenario_5_calling_with_a_mismatched_argument_type_is_rejected() {
    let err = expect_semantic_error("function f(x:int){} f(false);");
    assert!(matches!(err, SemanticError::NotAssignable { .. }), "got: {err:?}");
}

#[test]
fn scenario_6_dead_branches_and_loops_optimize_away_entirely() {
    let program = optimize_source("while false { print(1); }").unwrap();
    assert!(program.statements.is_empty());

    let program = optimize_source("repeat 0 { print(1); }").unwrap();
    assert!(program.statements.is_empty());

    let program = optimize_source("for i in 5...3 { print(1); }").unwrap();
    assert!(program.statements.is_empty());
}

#[test]
fn empty_array_is_accepted_and_assignable_to_an_exactly_matching_array_type() {
    generate_source("let a = [int](); let b = [1, 2]; b = a;").expect("[int] must assign to an [int] variable");
}

#[test]
fn empty_array_is_rejected_when_assigned_to_a_mismatched_array_type() {
    expect_semantic_error("let a = [int](); let b = [\"s\"]; b = a;");
}

#[test]
fn the_first_class_function_path_compiles_through_the_full_pipeline() {
    let out = generate_source(
        "function double(x: int): int { return x * 2; } let f = double; print(f(21));",
    )
    .unwrap();
    assert!(out.contains("function double_"), "got:\n{out}");
    assert!(out.contains("console.log("), "expected the call through f to still reach print, got:\n{out}");
}

#[test]
fn an_else_if_chain_does_not_introduce_a_redundant_lexical_scope() {
    // `x` declared in the final branch must not collide with an outer `x`
    // declared earlier in a sibling branch, because each branch's block is
    // its own scope; but both branches declaring a local `x` must not be
    // rejected as a redeclaration (they are never in the same frame).
    generate_source(
        "let selector = 2; if selector == 0 { let x = 1; print(x); } else if selector == 1 { let x = 2; print(x); } else { let x = 3; print(x); }",
    )
    .expect("sibling branches may each declare their own locally-scoped x");
}

#[test]
fn every_analyzed_program_has_call_sites_checked_for_arity() {
    let err = expect_semantic_error("function f(x: int) {} f(1, 2);");
    assert!(matches!(err, SemanticError::ArityMismatch { expected: 1, got: 2, .. }));
}

#[test]
fn optimizer_is_idempotent_on_an_already_optimized_program() {
    let program = optimize_source("let x = 1 + 2; if true { print(x); } else { print(0); }").unwrap();
    let twice = carlos::optimizer::optimize_program(program.statements.clone());
    assert_eq!(program.statements, twice, "a second optimization pass must find nothing left to fold");
}

#[test]
fn generator_name_mangling_is_stable_for_repeated_references_to_the_same_entity() {
    let out = generate_source("let x = 1; print(x); print(x);").unwrap();
    let first_call = out.find("console.log(x_").expect("expected at least one print(x) call");
    let second_call = out[first_call + 1..].find("console.log(x_").map(|i| i + first_call + 1);
    assert!(second_call.is_some(), "expected a second print(x) call, got:\n{out}");
}

#[test]
fn generator_name_mangling_is_injective_across_distinct_entities_sharing_a_source_name() {
    // No-shadowing forbids the same name in nested scopes, so the only way
    // two entities can legally share a source name is across sibling
    // branches that never both execute. The test uses a parameter (not a
    // literal) so the optimizer has no constant test to fold away.
    let out = generate_source(
        "function pick(selector: boolean) { if selector { let x = 1; print(x); } else { let x = 2; print(x); } }",
    )
    .unwrap();
    let names: Vec<&str> = out
        .lines()
        .filter(|l| l.trim_start().starts_with("let x_"))
        .collect();
    assert_eq!(names.len(), 2, "expected two distinct declarations, got:\n{out}");
    assert_ne!(names[0], names[1], "two distinct x entities must mangle to different names");
}

#[test]
fn analyze_source_rejects_a_use_before_declaration() {
    let err = expect_semantic_error("print(y); let y = 1;");
    assert!(matches!(err, SemanticError::NotDeclared { .. }));
}

#[test]
fn analyze_source_succeeds_for_a_well_typed_program_with_no_optimizer_or_generator_stage() {
    analyze_source("let x = 1; let y = x + 1; print(y);").expect("well-typed program must analyze cleanly");
}
