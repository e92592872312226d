//! Expression lowering (spec.md §4.4).
//!
//! Every case returns a single parenthesization-safe string; composite
//! expressions wrap their children's rendered text in parentheses rather
//! than trying to track precedence, since the IR's explicit node shape
//! already encodes the grouping the source had.

use crate::ir::{BinOp, Callee, Expr, UnaryOp};

use super::Generator;

impl<'a> Generator<'a> {
    pub(super) fn generate_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::IntLiteral { value, .. } => value.to_string(),
            Expr::FloatLiteral { value, .. } => float_literal(*value),
            Expr::StringLiteral { value, .. } => format!("\"{}\"", value.escape_default()),
            Expr::BoolLiteral { value, .. } => value.to_string(),
            Expr::Variable { var, .. } => self
                .lower_builtin_var(*var)
                .map(str::to_string)
                .unwrap_or_else(|| self.mangle_var(*var)),
            Expr::FunctionRef { func, .. } => self.mangle_func(*func),
            Expr::Binary { op, left, right, .. } => {
                let left = self.generate_expr(left);
                let right = self.generate_expr(right);
                format!("({left} {} {right})", binop_str(*op))
            }
            Expr::Unary { op, operand, .. } => self.generate_unary(*op, operand),
            Expr::Conditional { test, consequent, alternate, .. } => {
                let test = self.generate_expr(test);
                let consequent = self.generate_expr(consequent);
                let alternate = self.generate_expr(alternate);
                format!("({test} ? {consequent} : {alternate})")
            }
            Expr::Subscript { array, index, .. } => {
                let array = self.generate_expr(array);
                let index = self.generate_expr(index);
                format!("{array}[{index}]")
            }
            Expr::Member {
                object,
                field_index,
                is_optional_access,
                ..
            } => {
                let struct_id = object
                    .ty()
                    .as_struct()
                    .or_else(|| object.ty().as_optional_struct())
                    .expect("a Member's object always has a Struct or Optional<Struct> type");
                let field = self.mangle_field(struct_id, *field_index);
                let object = self.generate_expr(object);
                let accessor = if *is_optional_access { "?." } else { "." };
                format!("{object}{accessor}{field}")
            }
            Expr::ArrayExpression { elements, .. } => {
                let elements: Vec<_> = elements.iter().map(|e| self.generate_expr(e)).collect();
                format!("[{}]", elements.join(", "))
            }
            Expr::EmptyArray { .. } => "[]".to_string(),
            Expr::EmptyOptional { .. } => "null".to_string(),
            Expr::FunctionCall { callee, args, .. } => {
                let args: Vec<_> = args.iter().map(|a| self.generate_expr(a)).collect();
                match callee {
                    Callee::Entity(func) => {
                        if let Some(lowered) = self.lower_builtin_call(*func, &args) {
                            lowered
                        } else {
                            let name = self.mangle_func(*func);
                            format!("{name}({})", args.join(", "))
                        }
                    }
                    Callee::Value(value) => {
                        let callee = self.generate_expr(value);
                        format!("{callee}({})", args.join(", "))
                    }
                }
            }
            Expr::ConstructorCall { struct_type, args, .. } => {
                let name = self.mangle_struct(*struct_type);
                let args: Vec<_> = args.iter().map(|a| self.generate_expr(a)).collect();
                format!("new {name}({})", args.join(", "))
            }
        }
    }

    fn generate_unary(&mut self, op: UnaryOp, operand: &Expr) -> String {
        let rendered = self.generate_expr(operand);
        match op {
            // Optional<T> is represented natively as `T | null`, so wrapping
            // a present value needs no runtime marker of its own.
            UnaryOp::Some_ => rendered,
            UnaryOp::Neg => format!("(-{rendered})"),
            UnaryOp::Not => format!("(!{rendered})"),
            UnaryOp::Len => format!("{rendered}.length"),
        }
    }
}

fn binop_str(op: BinOp) -> &'static str {
    match op {
        BinOp::Or => "||",
        BinOp::And => "&&",
        BinOp::BitOr => "|",
        BinOp::BitXor => "^",
        BinOp::BitAnd => "&",
        BinOp::Eq => "===",
        BinOp::NotEq => "!==",
        BinOp::Less => "<",
        BinOp::LessEq => "<=",
        BinOp::Greater => ">",
        BinOp::GreaterEq => ">=",
        BinOp::Shl => "<<",
        BinOp::Shr => ">>",
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Mod => "%",
        BinOp::Pow => "**",
        BinOp::UnwrapElse => "??",
    }
}

fn float_literal(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Arenas, VarId};
    use crate::generator::GeneratorConfig;
    use crate::stdlib;
    use crate::types::Type;

    fn generator(arenas: &Arenas, stdlib: &stdlib::StdlibIds) -> Generator<'_> {
        Generator::new(arenas, stdlib, GeneratorConfig::default())
    }

    fn fresh() -> (Arenas, stdlib::StdlibIds) {
        let mut arenas = Arenas::new();
        let mut scope = crate::scope::Scope::new();
        let stdlib = stdlib::install(&mut arenas, &mut scope);
        (arenas, stdlib)
    }

    #[test]
    fn equality_lowers_to_strict_equality() {
        let (arenas, stdlib) = fresh();
        let mut gen = generator(&arenas, &stdlib);
        let out = gen.generate_expr(&Expr::Binary {
            op: BinOp::Eq,
            left: Box::new(Expr::IntLiteral { value: 1, ty: Type::Int }),
            right: Box::new(Expr::IntLiteral { value: 2, ty: Type::Int }),
            ty: Type::Boolean,
        });
        assert_eq!(out, "(1 === 2)");
    }

    #[test]
    fn same_variable_id_mangles_to_the_same_name_on_reuse() {
        let (arenas, stdlib) = fresh();
        let mut gen = generator(&arenas, &stdlib);
        let first = gen.mangle_var(VarId(0));
        let second = gen.mangle_var(VarId(0));
        assert_eq!(first, second);
    }

    #[test]
    fn pi_lowers_to_the_target_constant_rather_than_a_mangled_name() {
        let (arenas, stdlib) = fresh();
        let mut gen = generator(&arenas, &stdlib);
        let out = gen.generate_expr(&Expr::Variable { var: stdlib.pi, ty: Type::Float });
        assert_eq!(out, "Math.PI");
    }

    #[test]
    fn print_call_lowers_to_console_log_even_through_a_user_named_alias() {
        let (arenas, stdlib) = fresh();
        let mut gen = generator(&arenas, &stdlib);
        let out = gen.generate_expr(&Expr::FunctionCall {
            callee: Callee::Entity(stdlib.print),
            args: vec![Expr::IntLiteral { value: 1, ty: Type::Int }],
            ty: Type::Void,
        });
        assert_eq!(out, "console.log(1)");
    }

    #[test]
    fn calling_through_a_variable_generates_a_direct_application() {
        let (arenas, stdlib) = fresh();
        let mut gen = generator(&arenas, &stdlib);
        let out = gen.generate_expr(&Expr::FunctionCall {
            callee: Callee::Value(Box::new(Expr::Variable {
                var: VarId(0),
                ty: Type::function(vec![Type::Int], Type::Int),
            })),
            args: vec![Expr::IntLiteral { value: 5, ty: Type::Int }],
            ty: Type::Int,
        });
        assert!(out.ends_with("(5)"));
    }

    #[test]
    fn some_unary_is_transparent_since_optionals_are_nullable_values() {
        let (arenas, stdlib) = fresh();
        let mut gen = generator(&arenas, &stdlib);
        let out = gen.generate_expr(&Expr::Unary {
            op: UnaryOp::Some_,
            operand: Box::new(Expr::IntLiteral { value: 3, ty: Type::Int }),
            ty: Type::optional(Type::Int),
        });
        assert_eq!(out, "3");
    }
}
