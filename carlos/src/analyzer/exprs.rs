//! Expressions (spec.md §4.2 "Expressions — type rules").
//!
//! Every arm below produces an `ir::Expr` whose `ty` field is the one
//! `spec.md`'s type rule for that construct assigns; there is no variant
//! that leaves a type unfilled.

use carlos_parser::{cst, Span};

use super::Analyzer;
use crate::entities::{Entity, StructId};
use crate::error::{SemanticError, SemanticResult, TypeMismatchKind};
use crate::ir::{BinOp, Callee, Expr, UnaryOp};
use crate::types::Type;

impl Analyzer {
    pub(super) fn analyze_expr(&mut self, expr: &cst::Expr) -> SemanticResult<Expr> {
        match expr {
            cst::Expr::IntLiteral(value, _) => Ok(Expr::IntLiteral { value: *value, ty: Type::Int }),
            cst::Expr::FloatLiteral(value, _) => Ok(Expr::FloatLiteral { value: *value, ty: Type::Float }),
            cst::Expr::StringLiteral(value, _) => Ok(Expr::StringLiteral {
                value: value.clone(),
                ty: Type::String,
            }),
            cst::Expr::BoolLiteral(value, _) => Ok(Expr::BoolLiteral { value: *value, ty: Type::Boolean }),
            cst::Expr::Identifier(name, span) => self.analyze_identifier(name, *span),
            cst::Expr::Binary { op, left, right, span } => self.analyze_binary(*op, left, right, *span),
            cst::Expr::Unary { op, operand, span } => self.analyze_unary(*op, operand, *span),
            cst::Expr::Conditional {
                test,
                consequent,
                alternate,
                span,
            } => self.analyze_conditional(test, consequent, alternate, *span),
            cst::Expr::Subscript { array, index, span } => self.analyze_subscript(array, index, *span),
            cst::Expr::Member {
                object,
                field,
                field_span,
                is_optional,
                span,
            } => self.analyze_member(object, field, *field_span, *is_optional, *span),
            cst::Expr::ArrayLiteral { elements, span } => self.analyze_array_literal(elements, *span),
            cst::Expr::EmptyArray { element_type, span } => {
                let base = self.resolve_type(element_type)?;
                let _ = span;
                Ok(Expr::EmptyArray { ty: Type::array(base) })
            }
            cst::Expr::EmptyOptional { base_type, span } => {
                let base = self.resolve_type(base_type)?;
                let _ = span;
                Ok(Expr::EmptyOptional { ty: Type::optional(base) })
            }
            cst::Expr::Call { callee, args, span } => self.analyze_call(callee, args, *span),
        }
    }

    /// A bare name: a variable reference, a function used as a value
    /// (spec.md §1 "first-class functions"), or a struct name, which is
    /// only meaningful as the callee of a constructor call and is rejected
    /// here.
    fn analyze_identifier(&mut self, name: &str, span: Span) -> SemanticResult<Expr> {
        match self.scope.lookup(name, span)? {
            Entity::Variable(var) => {
                let ty = self.arenas.variable(var).ty.clone();
                Ok(Expr::Variable { var, ty })
            }
            Entity::Function(func) => {
                let ty = self.arenas.function(func).ty.clone();
                Ok(Expr::FunctionRef { func, ty })
            }
            Entity::Struct(_) => Err(SemanticError::NotCallable { span }),
        }
    }

    fn analyze_binary(&mut self, op: cst::BinOp, left: &cst::Expr, right: &cst::Expr, span: Span) -> SemanticResult<Expr> {
        let left = self.analyze_expr(left)?;
        let right = self.analyze_expr(right)?;

        let (op, ty) = match op {
            cst::BinOp::Or | cst::BinOp::And => {
                require_boolean(left.ty(), span)?;
                require_boolean(right.ty(), span)?;
                (map_bin_op(op), Type::Boolean)
            }
            cst::BinOp::BitOr | cst::BinOp::BitXor | cst::BinOp::BitAnd | cst::BinOp::Shl | cst::BinOp::Shr => {
                require_integer(left.ty(), span)?;
                require_integer(right.ty(), span)?;
                (map_bin_op(op), Type::Int)
            }
            cst::BinOp::Eq | cst::BinOp::NotEq => {
                require_same_type(left.ty(), right.ty(), span)?;
                (map_bin_op(op), Type::Boolean)
            }
            cst::BinOp::Less | cst::BinOp::LessEq | cst::BinOp::Greater | cst::BinOp::GreaterEq => {
                require_number_or_string(left.ty(), span)?;
                require_same_type(left.ty(), right.ty(), span)?;
                (map_bin_op(op), Type::Boolean)
            }
            cst::BinOp::Add => {
                require_number_or_string(left.ty(), span)?;
                require_same_type(left.ty(), right.ty(), span)?;
                let ty = left.ty().clone();
                (map_bin_op(op), ty)
            }
            cst::BinOp::Sub | cst::BinOp::Mul | cst::BinOp::Div | cst::BinOp::Mod | cst::BinOp::Pow => {
                require_number(left.ty(), span)?;
                require_same_type(left.ty(), right.ty(), span)?;
                let ty = left.ty().clone();
                (map_bin_op(op), ty)
            }
            cst::BinOp::UnwrapElse => {
                let base = left
                    .ty()
                    .as_optional_base()
                    .ok_or(SemanticError::TypeMismatch {
                        kind: TypeMismatchKind::ExpectedOptional,
                        span,
                    })?
                    .clone();
                // spec.md §9 resolution: result stays Optional<T> when the
                // right operand is itself Optional<T>; otherwise it unwraps
                // to T, and the right operand must be assignable to T.
                let ty = if *right.ty() == *left.ty() {
                    left.ty().clone()
                } else if right.ty().is_assignable_to(&base) {
                    base
                } else {
                    return Err(SemanticError::NotAssignable {
                        from: right.ty().clone(),
                        to: base,
                        span,
                    });
                };
                (map_bin_op(op), ty)
            }
        };

        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        })
    }

    fn analyze_unary(&mut self, op: cst::UnaryOp, operand: &cst::Expr, span: Span) -> SemanticResult<Expr> {
        let operand = self.analyze_expr(operand)?;

        let (op, ty) = match op {
            cst::UnaryOp::Neg => {
                require_number(operand.ty(), span)?;
                (UnaryOp::Neg, operand.ty().clone())
            }
            cst::UnaryOp::Not => {
                require_boolean(operand.ty(), span)?;
                (UnaryOp::Not, Type::Boolean)
            }
            cst::UnaryOp::Len => {
                operand.ty().as_array_base().ok_or(SemanticError::TypeMismatch {
                    kind: TypeMismatchKind::ExpectedArray,
                    span,
                })?;
                (UnaryOp::Len, Type::Int)
            }
            cst::UnaryOp::Some_ => (UnaryOp::Some_, Type::optional(operand.ty().clone())),
        };

        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            ty,
        })
    }

    fn analyze_conditional(
        &mut self,
        test: &cst::Expr,
        consequent: &cst::Expr,
        alternate: &cst::Expr,
        span: Span,
    ) -> SemanticResult<Expr> {
        let test = self.analyze_expr(test)?;
        require_boolean(test.ty(), span)?;
        let consequent = self.analyze_expr(consequent)?;
        let alternate = self.analyze_expr(alternate)?;
        require_same_type(consequent.ty(), alternate.ty(), span)?;
        let ty = consequent.ty().clone();
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            ty,
        })
    }

    fn analyze_subscript(&mut self, array: &cst::Expr, index: &cst::Expr, span: Span) -> SemanticResult<Expr> {
        let array = self.analyze_expr(array)?;
        let base = array
            .ty()
            .as_array_base()
            .ok_or(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedArray,
                span,
            })?
            .clone();
        let index = self.analyze_expr(index)?;
        require_integer(index.ty(), span)?;
        Ok(Expr::Subscript {
            array: Box::new(array),
            index: Box::new(index),
            ty: base,
        })
    }

    fn analyze_member(
        &mut self,
        object: &cst::Expr,
        field: &str,
        field_span: Span,
        is_optional: bool,
        span: Span,
    ) -> SemanticResult<Expr> {
        let object = self.analyze_expr(object)?;

        let struct_id = if is_optional {
            object.ty().as_optional_struct().ok_or(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedOptionalStruct,
                span,
            })?
        } else {
            object.ty().as_struct().ok_or(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedStruct,
                span,
            })?
        };

        let data = self.arenas.struct_(struct_id);
        let field_index = data.field_index(field).ok_or(SemanticError::StructError {
            kind: crate::error::StructErrorKind::FieldNotFound,
            span: field_span,
        })?;
        let field_type = data.field_type(field).expect("field_index just confirmed this field exists").clone();

        let ty = if is_optional { Type::optional(field_type) } else { field_type };

        Ok(Expr::Member {
            object: Box::new(object),
            field_index,
            is_optional_access: is_optional,
            ty,
        })
    }

    /// Nonempty array literals; `[]` alone has no static element type and is
    /// rejected the same way an array with mismatched element types is
    /// (spec.md's empty-array syntax is `[T]()`, handled separately above).
    fn analyze_array_literal(&mut self, elements: &[cst::Expr], span: Span) -> SemanticResult<Expr> {
        let mut analyzed = Vec::with_capacity(elements.len());
        for element in elements {
            analyzed.push(self.analyze_expr(element)?);
        }
        let elem_ty = analyzed
            .first()
            .ok_or(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedArray,
                span,
            })?
            .ty()
            .clone();
        for element in &analyzed[1..] {
            require_same_type(element.ty(), &elem_ty, span)?;
        }
        Ok(Expr::ArrayExpression {
            elements: analyzed,
            ty: Type::array(elem_ty),
        })
    }

    fn analyze_call(&mut self, callee: &cst::Expr, args: &[cst::Expr], span: Span) -> SemanticResult<Expr> {
        if let cst::Expr::Identifier(name, name_span) = callee {
            match self.scope.lookup(name, *name_span)? {
                Entity::Struct(struct_id) => return self.analyze_constructor_call(struct_id, args, span),
                Entity::Function(func_id) => {
                    let ty = self.arenas.function(func_id).ty.clone();
                    let (params, ret) = ty.as_function().expect("function entity must have a FunctionType");
                    let params = params.to_vec();
                    let ret = ret.clone();
                    let args = self.analyze_call_args(args, &params, span)?;
                    return Ok(Expr::FunctionCall {
                        callee: Callee::Entity(func_id),
                        args,
                        ty: ret,
                    });
                }
                Entity::Variable(var_id) => {
                    let ty = self.arenas.variable(var_id).ty.clone();
                    let (params, ret) = ty.as_function().ok_or(SemanticError::NotCallable { span })?;
                    let params = params.to_vec();
                    let ret = ret.clone();
                    let args = self.analyze_call_args(args, &params, span)?;
                    return Ok(Expr::FunctionCall {
                        callee: Callee::Value(Box::new(Expr::Variable { var: var_id, ty })),
                        args,
                        ty: ret,
                    });
                }
            }
        }

        let callee = self.analyze_expr(callee)?;
        let (params, ret) = callee.ty().as_function().ok_or(SemanticError::NotCallable { span })?;
        let params = params.to_vec();
        let ret = ret.clone();
        let args = self.analyze_call_args(args, &params, span)?;
        Ok(Expr::FunctionCall {
            callee: Callee::Value(Box::new(callee)),
            args,
            ty: ret,
        })
    }

    fn analyze_constructor_call(&mut self, struct_id: StructId, args: &[cst::Expr], span: Span) -> SemanticResult<Expr> {
        let field_types: Vec<Type> = self.arenas.struct_(struct_id).fields.iter().map(|(_, ty)| ty.clone()).collect();
        let args = self.analyze_call_args(args, &field_types, span)?;
        Ok(Expr::ConstructorCall {
            struct_type: struct_id,
            args,
            ty: Type::Struct(struct_id),
        })
    }

    /// Arity and per-argument assignability, shared by function and
    /// constructor calls (spec.md §4.2 "Call").
    fn analyze_call_args(&mut self, args: &[cst::Expr], param_types: &[Type], span: Span) -> SemanticResult<Vec<Expr>> {
        if args.len() != param_types.len() {
            return Err(SemanticError::ArityMismatch {
                expected: param_types.len(),
                got: args.len(),
                span,
            });
        }
        let mut analyzed = Vec::with_capacity(args.len());
        for (arg, param_ty) in args.iter().zip(param_types) {
            let arg = self.analyze_expr(arg)?;
            if !arg.ty().is_assignable_to(param_ty) {
                return Err(SemanticError::NotAssignable {
                    from: arg.ty().clone(),
                    to: param_ty.clone(),
                    span,
                });
            }
            analyzed.push(arg);
        }
        Ok(analyzed)
    }
}

fn map_bin_op(op: cst::BinOp) -> BinOp {
    match op {
        cst::BinOp::Or => BinOp::Or,
        cst::BinOp::And => BinOp::And,
        cst::BinOp::BitOr => BinOp::BitOr,
        cst::BinOp::BitXor => BinOp::BitXor,
        cst::BinOp::BitAnd => BinOp::BitAnd,
        cst::BinOp::Eq => BinOp::Eq,
        cst::BinOp::NotEq => BinOp::NotEq,
        cst::BinOp::Less => BinOp::Less,
        cst::BinOp::LessEq => BinOp::LessEq,
        cst::BinOp::Greater => BinOp::Greater,
        cst::BinOp::GreaterEq => BinOp::GreaterEq,
        cst::BinOp::Shl => BinOp::Shl,
        cst::BinOp::Shr => BinOp::Shr,
        cst::BinOp::Add => BinOp::Add,
        cst::BinOp::Sub => BinOp::Sub,
        cst::BinOp::Mul => BinOp::Mul,
        cst::BinOp::Div => BinOp::Div,
        cst::BinOp::Mod => BinOp::Mod,
        cst::BinOp::Pow => BinOp::Pow,
        cst::BinOp::UnwrapElse => BinOp::UnwrapElse,
    }
}

fn require_boolean(ty: &Type, span: Span) -> SemanticResult<()> {
    if ty.is_boolean() {
        Ok(())
    } else {
        Err(SemanticError::TypeMismatch {
            kind: TypeMismatchKind::ExpectedBoolean,
            span,
        })
    }
}

fn require_integer(ty: &Type, span: Span) -> SemanticResult<()> {
    if ty.is_integer() {
        Ok(())
    } else {
        Err(SemanticError::TypeMismatch {
            kind: TypeMismatchKind::ExpectedInteger,
            span,
        })
    }
}

fn require_number(ty: &Type, span: Span) -> SemanticResult<()> {
    if ty.is_numeric() {
        Ok(())
    } else {
        Err(SemanticError::TypeMismatch {
            kind: TypeMismatchKind::ExpectedNumber,
            span,
        })
    }
}

fn require_number_or_string(ty: &Type, span: Span) -> SemanticResult<()> {
    if ty.is_numeric() || *ty == Type::String {
        Ok(())
    } else {
        Err(SemanticError::TypeMismatch {
            kind: TypeMismatchKind::ExpectedNumberOrString,
            span,
        })
    }
}

fn require_same_type(a: &Type, b: &Type, span: Span) -> SemanticResult<()> {
    if a == b {
        Ok(())
    } else {
        Err(SemanticError::TypeMismatch {
            kind: TypeMismatchKind::ExpectedSameType,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(src: &str) -> SemanticResult<crate::ir::Program> {
        super::super::analyze(&carlos_parser::parse(src).expect("source must parse"))
    }

    #[test]
    fn unwrap_else_stays_optional_when_the_fallback_is_optional() {
        let program = analyze("let a = no int; let b = some 1; let c = a ?? b;").unwrap();
        match &program.statements[2] {
            crate::ir::Stmt::VariableDeclaration { initializer, .. } => {
                assert_eq!(*initializer.ty(), Type::optional(Type::Int));
            }
            other => panic!("expected a variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn unwrap_else_unwraps_when_the_fallback_is_bare() {
        let program = analyze("let a = no int; let c = a ?? 0;").unwrap();
        match &program.statements[1] {
            crate::ir::Stmt::VariableDeclaration { initializer, .. } => {
                assert_eq!(*initializer.ty(), Type::Int);
            }
            other => panic!("expected a variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn a_function_parameter_may_be_called_as_a_value() {
        let program = analyze("function apply(f: (int)->int, x: int): int { return f(x); }").unwrap();
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn a_function_may_be_passed_as_a_plain_argument() {
        let program = analyze(
            "function apply(f: (int)->int, x: int): int { return f(x); } function inc(n: int): int { return n + 1; } let y = apply(inc, 1);",
        )
        .unwrap();
        assert_eq!(program.statements.len(), 3);
    }

    #[test]
    fn rejects_subscripting_a_non_array() {
        let err = analyze("let x = 1; let y = x[0];").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedArray,
                ..
            }
        ));
    }

    #[test]
    fn rejects_member_access_through_a_non_optional_chain_on_an_optional() {
        let err = analyze("struct S { n: int } let s = no S; let x = s.n;").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedStruct,
                ..
            }
        ));
    }

    #[test]
    fn optional_member_access_yields_an_optional_field_type() {
        let program = analyze("struct S { n: int } let s = some S(1); let x = s?.n;").unwrap();
        match program.statements.last().unwrap() {
            crate::ir::Stmt::VariableDeclaration { initializer, .. } => {
                assert_eq!(*initializer.ty(), Type::optional(Type::Int));
            }
            other => panic!("expected a variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn rejects_array_literal_with_mismatched_element_types() {
        let err = analyze("let a = [1, true];").unwrap_err();
        assert!(matches!(
            err,
            SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedSameType,
                ..
            }
        ));
    }
}
