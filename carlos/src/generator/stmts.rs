//! Statement lowering (spec.md §4.4).

use crate::ir::{Alternate, RangeOp, Stmt};

use super::Generator;

impl<'a> Generator<'a> {
    pub(super) fn generate_program(&mut self, statements: &[Stmt]) {
        self.generate_statements(statements);
    }

    fn generate_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.generate_stmt(stmt);
        }
    }

    fn generate_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDeclaration { var, initializer } => {
                let read_only = self.arenas.variable(*var).read_only;
                let initializer = self.generate_expr(initializer);
                let name = self.mangle_var(*var);
                let keyword = if read_only { "const" } else { "let" };
                self.write_line(&format!("{keyword} {name} = {initializer};"));
            }
            Stmt::TypeDeclaration { struct_type } => self.generate_type_declaration(*struct_type),
            Stmt::FunctionDeclaration { func, params, body } => {
                self.generate_function_declaration(*func, params, body)
            }
            Stmt::Assignment { target, source } => {
                let target = self.generate_expr(target);
                let source = self.generate_expr(source);
                self.write_line(&format!("{target} = {source};"));
            }
            Stmt::Increment { target } => {
                let target = self.generate_expr(target);
                self.write_line(&format!("{target}++;"));
            }
            Stmt::Decrement { target } => {
                let target = self.generate_expr(target);
                self.write_line(&format!("{target}--;"));
            }
            Stmt::Break => self.write_line("break;"),
            Stmt::Return { value } => {
                let value = self.generate_expr(value);
                self.write_line(&format!("return {value};"));
            }
            Stmt::ShortReturn => self.write_line("return;"),
            Stmt::ExprStatement { expr } => {
                let expr = self.generate_expr(expr);
                self.write_line(&format!("{expr};"));
            }
            Stmt::IfStatement { test, consequent, alternate } => {
                let test = self.generate_expr(test);
                self.write_line(&format!("if ({test}) {{"));
                self.indent();
                self.generate_statements(consequent);
                self.dedent();
                self.write_line("}");
                self.generate_alternate(alternate);
            }
            Stmt::ShortIfStatement { test, consequent } => {
                let test = self.generate_expr(test);
                self.write_line(&format!("if ({test}) {{"));
                self.indent();
                self.generate_statements(consequent);
                self.dedent();
                self.write_line("}");
            }
            Stmt::WhileStatement { test, body } => {
                let test = self.generate_expr(test);
                self.write_line(&format!("while ({test}) {{"));
                self.indent();
                self.generate_statements(body);
                self.dedent();
                self.write_line("}");
            }
            Stmt::RepeatStatement { count, body } => {
                let count = self.generate_expr(count);
                let iter = self.fresh_name("i");
                self.write_line(&format!("for (let {iter} = 0; {iter} < {count}; {iter}++) {{"));
                self.indent();
                self.generate_statements(body);
                self.dedent();
                self.write_line("}");
            }
            Stmt::ForRangeStatement {
                iterator,
                low,
                op,
                high,
                body,
            } => {
                let low = self.generate_expr(low);
                let high = self.generate_expr(high);
                let comparison = match op {
                    RangeOp::Inclusive => "<=",
                    RangeOp::Exclusive => "<",
                };
                let name = self.mangle_var(*iterator);
                self.write_line(&format!(
                    "for (let {name} = {low}; {name} {comparison} {high}; {name}++) {{"
                ));
                self.indent();
                self.generate_statements(body);
                self.dedent();
                self.write_line("}");
            }
            Stmt::ForStatement { iterator, collection, body } => {
                let collection = self.generate_expr(collection);
                let name = self.mangle_var(*iterator);
                self.write_line(&format!("for (const {name} of {collection}) {{"));
                self.indent();
                self.generate_statements(body);
                self.dedent();
                self.write_line("}");
            }
        }
    }

    /// Continues an `if` as `else { ... }` or, for an else-if tail, as
    /// `else if (...) { ... }` with no extra wrapping block (spec.md §4.4:
    /// "no redundant `{ }` wrapping of an else-if").
    fn generate_alternate(&mut self, alternate: &Alternate) {
        match alternate {
            Alternate::Block(stmts) => {
                self.write_line("else {");
                self.indent();
                self.generate_statements(stmts);
                self.dedent();
                self.write_line("}");
            }
            Alternate::ElseIf(nested) => self.generate_else_if(nested),
        }
    }

    fn generate_else_if(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::IfStatement { test, consequent, alternate } => {
                let test = self.generate_expr(test);
                self.write_line(&format!("else if ({test}) {{"));
                self.indent();
                self.generate_statements(consequent);
                self.dedent();
                self.write_line("}");
                self.generate_alternate(alternate);
            }
            Stmt::ShortIfStatement { test, consequent } => {
                let test = self.generate_expr(test);
                self.write_line(&format!("else if ({test}) {{"));
                self.indent();
                self.generate_statements(consequent);
                self.dedent();
                self.write_line("}");
            }
            other => unreachable!("an else-if chain's tail is always an If or ShortIf, got {other:?}"),
        }
    }

    /// `class Name_N { constructor(field_N, ...) { this.field_N = field_N; ... } }`
    fn generate_type_declaration(&mut self, struct_type: crate::entities::StructId) {
        let field_count = self.arenas.struct_(struct_type).fields.len();
        let field_names: Vec<_> = (0..field_count).map(|i| self.mangle_field(struct_type, i)).collect();
        let name = self.mangle_struct(struct_type);

        self.write_line(&format!("class {name} {{"));
        self.indent();
        self.write_line(&format!("constructor({}) {{", field_names.join(", ")));
        self.indent();
        for field in &field_names {
            self.write_line(&format!("this.{field} = {field};"));
        }
        self.dedent();
        self.write_line("}");
        self.dedent();
        self.write_line("}");
    }

    fn generate_function_declaration(&mut self, func: crate::entities::FuncId, params: &[crate::entities::VarId], body: &[Stmt]) {
        let param_names: Vec<_> = params.iter().map(|p| self.mangle_var(*p)).collect();
        let name = self.mangle_func(func);
        self.write_line(&format!("function {name}({}) {{", param_names.join(", ")));
        self.indent();
        self.generate_statements(body);
        self.dedent();
        self.write_line("}");
    }
}

#[cfg(test)]
mod tests {
    use super::super::generate;
    use crate::entities::Arenas;
    use crate::ir::{Expr, Program, Stmt};
    use crate::stdlib;
    use crate::types::Type;

    fn program_with(statements: Vec<Stmt>, arenas: Arenas, stdlib: stdlib::StdlibIds) -> Program {
        Program { arenas, stdlib, statements }
    }

    #[test]
    fn variable_declaration_uses_const_for_a_read_only_binding() {
        let mut arenas = Arenas::new();
        let mut scope = crate::scope::Scope::new();
        let stdlib = stdlib::install(&mut arenas, &mut scope);
        let var = arenas.alloc_variable("x", true, Type::Int);
        let program = program_with(
            vec![Stmt::VariableDeclaration {
                var,
                initializer: Expr::IntLiteral { value: 1, ty: Type::Int },
            }],
            arenas,
            stdlib,
        );
        let out = generate(&program);
        assert!(out.contains("const x_"), "expected a const declaration, got: {out}");
    }

    #[test]
    fn variable_declaration_uses_let_for_a_mutable_binding() {
        let mut arenas = Arenas::new();
        let mut scope = crate::scope::Scope::new();
        let stdlib = stdlib::install(&mut arenas, &mut scope);
        let var = arenas.alloc_variable("x", false, Type::Int);
        let program = program_with(
            vec![Stmt::VariableDeclaration {
                var,
                initializer: Expr::IntLiteral { value: 1, ty: Type::Int },
            }],
            arenas,
            stdlib,
        );
        let out = generate(&program);
        assert!(out.contains("let x_"), "expected a let declaration, got: {out}");
    }

    #[test]
    fn an_else_if_chain_renders_without_a_wrapping_block() {
        let mut arenas = Arenas::new();
        let mut scope = crate::scope::Scope::new();
        let stdlib = stdlib::install(&mut arenas, &mut scope);
        let program = program_with(
            vec![Stmt::IfStatement {
                test: Expr::BoolLiteral { value: true, ty: Type::Boolean },
                consequent: vec![Stmt::Break],
                alternate: crate::ir::Alternate::ElseIf(Box::new(Stmt::ShortIfStatement {
                    test: Expr::BoolLiteral { value: false, ty: Type::Boolean },
                    consequent: vec![Stmt::Break],
                })),
            }],
            arenas,
            stdlib,
        );
        let out = generate(&program);
        assert!(out.contains("else if (false) {"), "got: {out}");
        assert!(!out.contains("else {\n  if"), "else-if should not get a nested wrapping block, got: {out}");
    }

    #[test]
    fn repeat_lowers_to_a_counting_loop_with_a_fresh_iterator() {
        let mut arenas = Arenas::new();
        let mut scope = crate::scope::Scope::new();
        let stdlib = stdlib::install(&mut arenas, &mut scope);
        let program = program_with(
            vec![Stmt::RepeatStatement {
                count: Expr::IntLiteral { value: 3, ty: Type::Int },
                body: vec![Stmt::Break],
            }],
            arenas,
            stdlib,
        );
        let out = generate(&program);
        assert!(out.contains("for (let i_"), "got: {out}");
    }

    #[test]
    fn type_declaration_renders_a_class_with_a_field_assigning_constructor() {
        let mut arenas = Arenas::new();
        let mut scope = crate::scope::Scope::new();
        let stdlib = stdlib::install(&mut arenas, &mut scope);
        let id = arenas.alloc_struct_stub("Point");
        arenas.struct_mut(id).fields.push(("x".to_string(), Type::Int));
        arenas.struct_mut(id).fields.push(("y".to_string(), Type::Int));
        let program = program_with(vec![Stmt::TypeDeclaration { struct_type: id }], arenas, stdlib);
        let out = generate(&program);
        assert!(out.contains("class Point_"), "got: {out}");
        assert!(out.contains("constructor("), "got: {out}");
        assert!(out.contains("this.x_"), "got: {out}");
    }

    #[test]
    fn two_distinct_variables_with_the_same_source_name_mangle_differently() {
        let mut arenas = Arenas::new();
        let mut scope = crate::scope::Scope::new();
        let stdlib = stdlib::install(&mut arenas, &mut scope);
        let a = arenas.alloc_variable("x", false, Type::Int);
        let b = arenas.alloc_variable("x", false, Type::Int);
        let program = program_with(
            vec![
                Stmt::VariableDeclaration {
                    var: a,
                    initializer: Expr::IntLiteral { value: 1, ty: Type::Int },
                },
                Stmt::VariableDeclaration {
                    var: b,
                    initializer: Expr::IntLiteral { value: 2, ty: Type::Int },
                },
            ],
            arenas,
            stdlib,
        );
        let out = generate(&program);
        assert_ne!(
            out.lines().next().unwrap(),
            out.lines().nth(1).unwrap(),
            "distinct entities must not collide under mangling, got: {out}"
        );
    }
}
