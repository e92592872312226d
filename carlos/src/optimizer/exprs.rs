//! Expression rewrites (spec.md §4.3).
//!
//! `optimize_expr` recurses into children first, so every fold rule below
//! only ever has to look at already-optimized operands — a literal that
//! could only be produced by folding a grandchild is visible by the time
//! the parent is considered.

use crate::ir::{BinOp, Callee, Expr, UnaryOp};
use crate::types::Type;

pub(super) fn optimize_expr(expr: Expr) -> Expr {
    match expr {
        Expr::Binary { op, left, right, ty } => {
            let left = optimize_expr(*left);
            let right = optimize_expr(*right);
            fold_binary(op, left, right, ty)
        }
        Expr::Unary { op, operand, ty } => {
            let operand = optimize_expr(*operand);
            fold_unary(op, operand, ty)
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
            ty,
        } => {
            let test = optimize_expr(*test);
            let consequent = optimize_expr(*consequent);
            let alternate = optimize_expr(*alternate);
            match test.as_bool_literal() {
                Some(true) => consequent,
                Some(false) => alternate,
                None => Expr::Conditional {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                    ty,
                },
            }
        }
        Expr::Subscript { array, index, ty } => Expr::Subscript {
            array: Box::new(optimize_expr(*array)),
            index: Box::new(optimize_expr(*index)),
            ty,
        },
        Expr::Member {
            object,
            field_index,
            is_optional_access,
            ty,
        } => Expr::Member {
            object: Box::new(optimize_expr(*object)),
            field_index,
            is_optional_access,
            ty,
        },
        Expr::ArrayExpression { elements, ty } => Expr::ArrayExpression {
            elements: elements.into_iter().map(optimize_expr).collect(),
            ty,
        },
        Expr::FunctionCall { callee, args, ty } => Expr::FunctionCall {
            callee: match callee {
                Callee::Entity(id) => Callee::Entity(id),
                Callee::Value(value) => Callee::Value(Box::new(optimize_expr(*value))),
            },
            args: args.into_iter().map(optimize_expr).collect(),
            ty,
        },
        Expr::ConstructorCall { struct_type, args, ty } => Expr::ConstructorCall {
            struct_type,
            args: args.into_iter().map(optimize_expr).collect(),
            ty,
        },
        // Literals, bare references, and empty array/optional have no
        // children to recurse into.
        other => other,
    }
}

fn fold_binary(op: BinOp, left: Expr, right: Expr, ty: Type) -> Expr {
    match op {
        // Boolean short-circuit (spec.md §4.3): only the four rules listed
        // there, not their `false`/`true`-absorbing mirror images.
        BinOp::And => {
            if let Some(true) = left.as_bool_literal() {
                return right;
            }
            if let Some(true) = right.as_bool_literal() {
                return left;
            }
        }
        BinOp::Or => {
            if let Some(false) = left.as_bool_literal() {
                return right;
            }
            if let Some(false) = right.as_bool_literal() {
                return left;
            }
        }
        // Unwrap of empty optional.
        BinOp::UnwrapElse => {
            if left.is_empty_optional() {
                return right;
            }
        }
        // Identity/absorbing rewrites (numeric).
        BinOp::Add => {
            if is_zero(&right) {
                return left;
            }
            if is_zero(&left) {
                return right;
            }
        }
        BinOp::Sub => {
            if is_zero(&right) {
                return left;
            }
            if is_zero(&left) {
                return Expr::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(right),
                    ty,
                };
            }
        }
        BinOp::Mul => {
            if is_one(&right) {
                return left;
            }
            if is_one(&left) {
                return right;
            }
            if is_zero(&right) || is_zero(&left) {
                return zero_like(&ty);
            }
        }
        BinOp::Div => {
            if is_one(&right) {
                return left;
            }
            if is_zero(&left) {
                return zero_like(&ty);
            }
        }
        BinOp::Pow => {
            if is_zero(&right) {
                return one_like(&ty);
            }
            if is_one(&left) {
                return one_like(&ty);
            }
        }
        _ => {}
    }

    try_fold_literals(op, &left, &right, &ty).unwrap_or(Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        ty,
    })
}

fn fold_unary(op: UnaryOp, operand: Expr, ty: Type) -> Expr {
    if op == UnaryOp::Neg {
        if let Some(value) = operand.as_int_literal() {
            return Expr::IntLiteral { value: -value, ty };
        }
        if let Some(value) = operand.as_float_literal() {
            return Expr::FloatLiteral { value: -value, ty };
        }
    }
    Expr::Unary {
        op,
        operand: Box::new(operand),
        ty,
    }
}

/// Evaluates `op` when both operands are literals of the same numeric
/// domain (spec.md §4.3: "matching domain (int-int or float-float)").
fn try_fold_literals(op: BinOp, left: &Expr, right: &Expr, ty: &Type) -> Option<Expr> {
    if let (Some(l), Some(r)) = (left.as_int_literal(), right.as_int_literal()) {
        return fold_int_pair(op, l, r, ty);
    }
    if let (Some(l), Some(r)) = (left.as_float_literal(), right.as_float_literal()) {
        return fold_float_pair(op, l, r);
    }
    None
}

fn fold_int_pair(op: BinOp, l: i64, r: i64, ty: &Type) -> Option<Expr> {
    match op {
        BinOp::Add => Some(Expr::IntLiteral {
            value: l.wrapping_add(r),
            ty: ty.clone(),
        }),
        BinOp::Sub => Some(Expr::IntLiteral {
            value: l.wrapping_sub(r),
            ty: ty.clone(),
        }),
        BinOp::Mul => Some(Expr::IntLiteral {
            value: l.wrapping_mul(r),
            ty: ty.clone(),
        }),
        BinOp::Div if r != 0 => Some(Expr::IntLiteral {
            value: l.wrapping_div(r),
            ty: ty.clone(),
        }),
        BinOp::Mod if r != 0 => Some(Expr::IntLiteral {
            value: l.wrapping_rem(r),
            ty: ty.clone(),
        }),
        BinOp::Pow if r >= 0 => Some(Expr::IntLiteral {
            value: l.wrapping_pow(r as u32),
            ty: ty.clone(),
        }),
        BinOp::Less => Some(bool_literal(l < r)),
        BinOp::LessEq => Some(bool_literal(l <= r)),
        BinOp::Greater => Some(bool_literal(l > r)),
        BinOp::GreaterEq => Some(bool_literal(l >= r)),
        BinOp::Eq => Some(bool_literal(l == r)),
        BinOp::NotEq => Some(bool_literal(l != r)),
        _ => None,
    }
}

fn fold_float_pair(op: BinOp, l: f64, r: f64) -> Option<Expr> {
    match op {
        BinOp::Add => Some(Expr::FloatLiteral { value: l + r, ty: Type::Float }),
        BinOp::Sub => Some(Expr::FloatLiteral { value: l - r, ty: Type::Float }),
        BinOp::Mul => Some(Expr::FloatLiteral { value: l * r, ty: Type::Float }),
        BinOp::Div if r != 0.0 => Some(Expr::FloatLiteral { value: l / r, ty: Type::Float }),
        BinOp::Mod if r != 0.0 => Some(Expr::FloatLiteral { value: l % r, ty: Type::Float }),
        BinOp::Pow => Some(Expr::FloatLiteral { value: l.powf(r), ty: Type::Float }),
        BinOp::Less => Some(bool_literal(l < r)),
        BinOp::LessEq => Some(bool_literal(l <= r)),
        BinOp::Greater => Some(bool_literal(l > r)),
        BinOp::GreaterEq => Some(bool_literal(l >= r)),
        BinOp::Eq => Some(bool_literal(l == r)),
        BinOp::NotEq => Some(bool_literal(l != r)),
        _ => None,
    }
}

fn bool_literal(value: bool) -> Expr {
    Expr::BoolLiteral { value, ty: Type::Boolean }
}

fn is_zero(expr: &Expr) -> bool {
    matches!(expr.as_int_literal(), Some(0)) || matches!(expr.as_float_literal(), Some(v) if v == 0.0)
}

fn is_one(expr: &Expr) -> bool {
    matches!(expr.as_int_literal(), Some(1)) || matches!(expr.as_float_literal(), Some(v) if v == 1.0)
}

fn zero_like(ty: &Type) -> Expr {
    if *ty == Type::Float {
        Expr::FloatLiteral { value: 0.0, ty: ty.clone() }
    } else {
        Expr::IntLiteral { value: 0, ty: ty.clone() }
    }
}

fn one_like(ty: &Type) -> Expr {
    if *ty == Type::Float {
        Expr::FloatLiteral { value: 1.0, ty: ty.clone() }
    } else {
        Expr::IntLiteral { value: 1, ty: ty.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: i64) -> Expr {
        Expr::IntLiteral { value, ty: Type::Int }
    }

    #[test]
    fn folds_a_constant_multiplication() {
        let folded = optimize_expr(Expr::Binary {
            op: BinOp::Mul,
            left: Box::new(int(3)),
            right: Box::new(int(7)),
            ty: Type::Int,
        });
        assert_eq!(folded, int(21));
    }

    #[test]
    fn removes_additive_identity() {
        let var = Expr::Variable {
            var: crate::entities::VarId(0),
            ty: Type::Int,
        };
        let folded = optimize_expr(Expr::Binary {
            op: BinOp::Add,
            left: Box::new(var.clone()),
            right: Box::new(int(0)),
            ty: Type::Int,
        });
        assert_eq!(folded, var);
    }

    #[test]
    fn short_circuits_true_and_r_to_r() {
        let var = Expr::Variable {
            var: crate::entities::VarId(0),
            ty: Type::Boolean,
        };
        let folded = optimize_expr(Expr::Binary {
            op: BinOp::And,
            left: Box::new(Expr::BoolLiteral { value: true, ty: Type::Boolean }),
            right: Box::new(var.clone()),
            ty: Type::Boolean,
        });
        assert_eq!(folded, var);
    }

    #[test]
    fn unwraps_unwrap_else_over_an_empty_optional() {
        let var = Expr::Variable {
            var: crate::entities::VarId(0),
            ty: Type::Int,
        };
        let folded = optimize_expr(Expr::Binary {
            op: BinOp::UnwrapElse,
            left: Box::new(Expr::EmptyOptional { ty: Type::optional(Type::Int) }),
            right: Box::new(var.clone()),
            ty: Type::Int,
        });
        assert_eq!(folded, var);
    }

    #[test]
    fn folds_conditional_with_a_literal_test() {
        let folded = optimize_expr(Expr::Conditional {
            test: Box::new(Expr::BoolLiteral { value: false, ty: Type::Boolean }),
            consequent: Box::new(int(1)),
            alternate: Box::new(int(2)),
            ty: Type::Int,
        });
        assert_eq!(folded, int(2));
    }
}
