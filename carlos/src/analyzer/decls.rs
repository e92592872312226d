//! Declarations and statement dispatch (spec.md §4.2).

use std::collections::HashSet;

use carlos_parser::cst;

use super::Analyzer;
use crate::entities::Entity;
use crate::error::{SemanticError, SemanticResult, StructErrorKind};
use crate::ir::{self, Stmt};
use crate::types::Type;

impl Analyzer {
    pub(super) fn analyze_statements(&mut self, stmts: &[cst::Stmt]) -> SemanticResult<Vec<Stmt>> {
        stmts.iter().map(|s| self.analyze_stmt(s)).collect()
    }

    fn analyze_stmt(&mut self, stmt: &cst::Stmt) -> SemanticResult<Stmt> {
        match stmt {
            cst::Stmt::VarDecl {
                is_const,
                name,
                name_span,
                initializer,
                ..
            } => self.analyze_var_decl(*is_const, name, *name_span, initializer),
            cst::Stmt::TypeDecl(decl) => self.analyze_struct_decl(decl),
            cst::Stmt::FunDecl(decl) => self.analyze_fun_decl(decl),
            cst::Stmt::Assignment { target, source, span } => self.analyze_assignment(target, source, *span),
            cst::Stmt::Increment { target, span } => self.analyze_incr_decr(target, *span, false),
            cst::Stmt::Decrement { target, span } => self.analyze_incr_decr(target, *span, true),
            cst::Stmt::Break { span } => self.analyze_break(*span),
            cst::Stmt::Return { value, span } => self.analyze_return(value, *span),
            cst::Stmt::If(if_stmt) => self.analyze_if(if_stmt),
            cst::Stmt::While { test, body, span } => self.analyze_while(test, body, *span),
            cst::Stmt::Repeat { count, body, span } => self.analyze_repeat(count, body, *span),
            cst::Stmt::ForRange {
                iterator,
                iterator_span,
                low,
                op,
                high,
                body,
                span,
            } => self.analyze_for_range(iterator, *iterator_span, low, *op, high, body, *span),
            cst::Stmt::ForEach {
                iterator,
                iterator_span,
                collection,
                body,
                span,
            } => self.analyze_for_each(iterator, *iterator_span, collection, body, *span),
            cst::Stmt::ExprStmt { expr, .. } => {
                let expr = self.analyze_expr(expr)?;
                Ok(Stmt::ExprStatement { expr })
            }
        }
    }

    fn analyze_var_decl(
        &mut self,
        is_const: bool,
        name: &str,
        name_span: carlos_parser::Span,
        initializer: &cst::Expr,
    ) -> SemanticResult<Stmt> {
        // The initializer is analyzed before `x` is declared, so it may
        // refer to earlier declarations but never to itself (spec.md §4.2:
        // "E may refer to earlier declarations but not to x").
        let initializer = self.analyze_expr(initializer)?;
        let ty = initializer.ty().clone();
        let var = self.arenas.alloc_variable(name, is_const, ty);
        self.scope.declare(name, Entity::Variable(var), name_span)?;
        Ok(Stmt::VariableDeclaration { var, initializer })
    }

    fn analyze_struct_decl(&mut self, decl: &cst::StructDecl) -> SemanticResult<Stmt> {
        // Pre-declare with no fields so a field type may mention the
        // struct indirectly, e.g. as `S?` (spec.md §4.2).
        let struct_id = self.arenas.alloc_struct_stub(decl.name.clone());
        self.scope.declare(&decl.name, Entity::Struct(struct_id), decl.name_span)?;

        let mut seen = HashSet::with_capacity(decl.fields.len());
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SemanticError::StructError {
                    kind: StructErrorKind::FieldsNotDistinct,
                    span: field.name_span,
                });
            }
            let ty = self.resolve_type(&field.ty)?;
            if ty == Type::Struct(struct_id) {
                return Err(SemanticError::StructError {
                    kind: StructErrorKind::RecursiveStruct,
                    span: field.ty.span(),
                });
            }
            fields.push((field.name.clone(), ty));
        }
        self.arenas.struct_mut(struct_id).fields = fields;

        Ok(Stmt::TypeDeclaration { struct_type: struct_id })
    }

    fn analyze_fun_decl(&mut self, decl: &cst::FunDecl) -> SemanticResult<Stmt> {
        let mut param_types = Vec::with_capacity(decl.params.len());
        for p in &decl.params {
            param_types.push(self.resolve_type(&p.ty)?);
        }
        let return_type = match &decl.return_type {
            Some(t) => self.resolve_type(t)?,
            None => Type::Void,
        };

        let func_ty = Type::function(param_types.clone(), return_type);
        let func = self.arenas.alloc_function(decl.name.clone(), func_ty);
        // Declared before the body is analyzed, so a function may call
        // itself (spec.md §3 "Forward-declared at the top of its enclosing
        // scope so bodies may self-call").
        self.scope.declare(&decl.name, Entity::Function(func), decl.name_span)?;

        self.scope.enter_function_body(func);
        let mut params = Vec::with_capacity(decl.params.len());
        for (p, ty) in decl.params.iter().zip(param_types) {
            let var = self.arenas.alloc_variable(p.name.clone(), false, ty);
            self.scope.declare(&p.name, Entity::Variable(var), p.name_span)?;
            params.push(var);
        }
        let body = self.analyze_statements(&decl.body.statements);
        self.scope.leave();
        let body = body?;

        Ok(Stmt::FunctionDeclaration { func, params, body })
    }

    pub(super) fn analyze_block(&mut self, block: &cst::Block) -> SemanticResult<Vec<ir::Stmt>> {
        self.scope.enter_block();
        let stmts = self.analyze_statements(&block.statements);
        self.scope.leave();
        stmts
    }
}
