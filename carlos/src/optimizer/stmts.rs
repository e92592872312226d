//! Statement-level rewrites (spec.md §4.3).
//!
//! Every statement optimizes to a `Vec<Stmt>`, not a single `Stmt`: a
//! statement can vanish entirely (an empty vec, e.g. `x = x` or a
//! `while false {}`) or a collapsed `if`/`repeat`/`for` can splice more
//! than one statement into its parent. The parent statement list
//! flat-maps the results (spec.md's "flatten rule"), so disappearing
//! statements leave no trace.

use crate::ir::{Alternate, Expr, Stmt};

use super::exprs::optimize_expr;

pub fn optimize_program(statements: Vec<Stmt>) -> Vec<Stmt> {
    optimize_stmts(statements)
}

fn optimize_stmts(statements: Vec<Stmt>) -> Vec<Stmt> {
    statements.into_iter().flat_map(optimize_stmt).collect()
}

fn optimize_stmt(stmt: Stmt) -> Vec<Stmt> {
    match stmt {
        Stmt::VariableDeclaration { var, initializer } => vec![Stmt::VariableDeclaration {
            var,
            initializer: optimize_expr(initializer),
        }],
        Stmt::TypeDeclaration { struct_type } => vec![Stmt::TypeDeclaration { struct_type }],
        Stmt::FunctionDeclaration { func, params, body } => vec![Stmt::FunctionDeclaration {
            func,
            params,
            body: optimize_stmts(body),
        }],
        Stmt::Assignment { target, source } => {
            let target = optimize_expr(target);
            let source = optimize_expr(source);
            if is_self_assignment(&target, &source) {
                vec![]
            } else {
                vec![Stmt::Assignment { target, source }]
            }
        }
        Stmt::Increment { target } => vec![Stmt::Increment { target: optimize_expr(target) }],
        Stmt::Decrement { target } => vec![Stmt::Decrement { target: optimize_expr(target) }],
        Stmt::Break => vec![Stmt::Break],
        Stmt::Return { value } => vec![Stmt::Return { value: optimize_expr(value) }],
        Stmt::ShortReturn => vec![Stmt::ShortReturn],
        Stmt::ExprStatement { expr } => vec![Stmt::ExprStatement { expr: optimize_expr(expr) }],

        Stmt::IfStatement { test, consequent, alternate } => match optimize_if(test, consequent, alternate) {
            Collapsed::Literal(stmts) => stmts,
            Collapsed::Kept(stmt) => vec![stmt],
        },
        Stmt::ShortIfStatement { test, consequent } => match optimize_short_if(test, consequent) {
            Collapsed::Literal(stmts) => stmts,
            Collapsed::Kept(stmt) => vec![stmt],
        },
        Stmt::WhileStatement { test, body } => {
            let test = optimize_expr(test);
            if let Some(false) = test.as_bool_literal() {
                return vec![];
            }
            vec![Stmt::WhileStatement {
                test,
                body: optimize_stmts(body),
            }]
        }
        Stmt::RepeatStatement { count, body } => {
            let count = optimize_expr(count);
            if let Some(0) = count.as_int_literal() {
                return vec![];
            }
            vec![Stmt::RepeatStatement {
                count,
                body: optimize_stmts(body),
            }]
        }
        Stmt::ForRangeStatement {
            iterator,
            low,
            op,
            high,
            body,
        } => {
            let low = optimize_expr(low);
            let high = optimize_expr(high);
            if let (Some(l), Some(h)) = (low.as_int_literal(), high.as_int_literal()) {
                if l > h {
                    return vec![];
                }
            }
            vec![Stmt::ForRangeStatement {
                iterator,
                low,
                op,
                high,
                body: optimize_stmts(body),
            }]
        }
        Stmt::ForStatement { iterator, collection, body } => {
            let collection = optimize_expr(collection);
            if matches!(collection, Expr::EmptyArray { .. }) {
                return vec![];
            }
            vec![Stmt::ForStatement {
                iterator,
                collection,
                body: optimize_stmts(body),
            }]
        }
    }
}

/// What an `if`/`short-if` rewrites to: a spliced sequence when the test
/// folded to a literal, or the same kind of statement with optimized
/// children otherwise.
#[derive(Debug)]
enum Collapsed {
    Literal(Vec<Stmt>),
    Kept(Stmt),
}

fn optimize_if(test: Expr, consequent: Vec<Stmt>, alternate: Alternate) -> Collapsed {
    let test = optimize_expr(test);
    let consequent = optimize_stmts(consequent);
    let alternate = optimize_alternate(alternate);
    match test.as_bool_literal() {
        Some(true) => Collapsed::Literal(consequent),
        Some(false) => Collapsed::Literal(match alternate {
            Alternate::Block(stmts) => stmts,
            Alternate::ElseIf(nested) => vec![*nested],
        }),
        None => Collapsed::Kept(Stmt::IfStatement { test, consequent, alternate }),
    }
}

fn optimize_short_if(test: Expr, consequent: Vec<Stmt>) -> Collapsed {
    let test = optimize_expr(test);
    let consequent = optimize_stmts(consequent);
    match test.as_bool_literal() {
        Some(true) => Collapsed::Literal(consequent),
        Some(false) => Collapsed::Literal(vec![]),
        None => Collapsed::Kept(Stmt::ShortIfStatement { test, consequent }),
    }
}

/// The tail of an else-if chain is always itself an `If` or `ShortIf`
/// (spec.md §4.2's "the trailing if opens its own scope"); optimizing it
/// can still collapse it to a literal branch, at which point it is no
/// longer an else-if shape at all and degrades to a plain block.
fn optimize_alternate(alternate: Alternate) -> Alternate {
    match alternate {
        Alternate::Block(stmts) => Alternate::Block(optimize_stmts(stmts)),
        Alternate::ElseIf(nested) => match *nested {
            Stmt::IfStatement { test, consequent, alternate } => match optimize_if(test, consequent, alternate) {
                Collapsed::Literal(stmts) => Alternate::Block(stmts),
                Collapsed::Kept(stmt) => Alternate::ElseIf(Box::new(stmt)),
            },
            Stmt::ShortIfStatement { test, consequent } => match optimize_short_if(test, consequent) {
                Collapsed::Literal(stmts) => Alternate::Block(stmts),
                Collapsed::Kept(stmt) => Alternate::ElseIf(Box::new(stmt)),
            },
            other => unreachable!("an else-if chain's tail is always an If or ShortIf, got {other:?}"),
        },
    }
}

fn is_self_assignment(target: &Expr, source: &Expr) -> bool {
    matches!((target, source), (Expr::Variable { var: t, .. }, Expr::Variable { var: s, .. }) if t == s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::VarId;
    use crate::types::Type;

    fn var(id: usize, ty: Type) -> Expr {
        Expr::Variable { var: VarId(id), ty }
    }

    #[test]
    fn removes_self_assignment() {
        let out = optimize_program(vec![Stmt::Assignment {
            target: var(0, Type::Int),
            source: var(0, Type::Int),
        }]);
        assert!(out.is_empty());
    }

    #[test]
    fn keeps_assignment_between_distinct_variables() {
        let out = optimize_program(vec![Stmt::Assignment {
            target: var(0, Type::Int),
            source: var(1, Type::Int),
        }]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn eliminates_a_while_loop_with_a_false_literal_test() {
        let out = optimize_program(vec![Stmt::WhileStatement {
            test: Expr::BoolLiteral { value: false, ty: Type::Boolean },
            body: vec![Stmt::Break],
        }]);
        assert!(out.is_empty());
    }

    #[test]
    fn eliminates_a_repeat_with_a_zero_count() {
        let out = optimize_program(vec![Stmt::RepeatStatement {
            count: Expr::IntLiteral { value: 0, ty: Type::Int },
            body: vec![Stmt::Break],
        }]);
        assert!(out.is_empty());
    }

    #[test]
    fn eliminates_a_for_range_whose_low_exceeds_its_high() {
        let out = optimize_program(vec![Stmt::ForRangeStatement {
            iterator: VarId(0),
            low: Expr::IntLiteral { value: 5, ty: Type::Int },
            op: crate::ir::RangeOp::Inclusive,
            high: Expr::IntLiteral { value: 3, ty: Type::Int },
            body: vec![Stmt::Break],
        }]);
        assert!(out.is_empty());
    }

    #[test]
    fn eliminates_a_for_each_over_an_empty_array() {
        let out = optimize_program(vec![Stmt::ForStatement {
            iterator: VarId(0),
            collection: Expr::EmptyArray { ty: Type::array(Type::Int) },
            body: vec![Stmt::Break],
        }]);
        assert!(out.is_empty());
    }

    #[test]
    fn collapses_a_short_if_with_a_true_literal_test_to_its_consequent() {
        let out = optimize_program(vec![Stmt::ShortIfStatement {
            test: Expr::BoolLiteral { value: true, ty: Type::Boolean },
            consequent: vec![Stmt::Break],
        }]);
        assert_eq!(out, vec![Stmt::Break]);
    }

    #[test]
    fn collapses_an_else_if_chain_whose_tail_test_is_now_literal() {
        let out = optimize_program(vec![Stmt::IfStatement {
            test: Expr::BoolLiteral { value: false, ty: Type::Boolean },
            consequent: vec![],
            alternate: Alternate::ElseIf(Box::new(Stmt::ShortIfStatement {
                test: Expr::BoolLiteral { value: true, ty: Type::Boolean },
                consequent: vec![Stmt::Break],
            })),
        }]);
        assert_eq!(out, vec![Stmt::Break]);
    }
}
