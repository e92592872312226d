//! Non-declaration statements (spec.md §4.2).

use carlos_parser::{cst, Span};

use super::Analyzer;
use crate::error::{ControlFlowErrorKind, SemanticError, SemanticResult, TypeMismatchKind};
use crate::ir::{self, Alternate, RangeOp, Stmt};
use crate::types::Type;

impl Analyzer {
    pub(super) fn analyze_assignment(
        &mut self,
        target: &cst::Expr,
        source: &cst::Expr,
        span: Span,
    ) -> SemanticResult<Stmt> {
        let target = self.analyze_expr(target)?;
        let source = self.analyze_expr(source)?;
        if !source.ty().is_assignable_to(target.ty()) {
            return Err(SemanticError::NotAssignable {
                from: source.ty().clone(),
                to: target.ty().clone(),
                span,
            });
        }
        match assignment_root(&target) {
            None => Err(SemanticError::AssignToReadOnly {
                name: "<expression>".to_string(),
                span,
            }),
            Some(var) if self.arenas.variable(var).read_only => Err(SemanticError::AssignToReadOnly {
                name: self.arenas.variable(var).name.clone(),
                span,
            }),
            Some(_) => Ok(Stmt::Assignment { target, source }),
        }
    }

    pub(super) fn analyze_incr_decr(
        &mut self,
        target: &cst::Expr,
        span: Span,
        decrement: bool,
    ) -> SemanticResult<Stmt> {
        let target = self.analyze_expr(target)?;
        match &target {
            ir::Expr::Variable { var, ty } => {
                if !ty.is_integer() {
                    return Err(SemanticError::TypeMismatch {
                        kind: TypeMismatchKind::ExpectedInteger,
                        span,
                    });
                }
                if self.arenas.variable(*var).read_only {
                    return Err(SemanticError::AssignToReadOnly {
                        name: self.arenas.variable(*var).name.clone(),
                        span,
                    });
                }
            }
            _ => {
                return Err(SemanticError::TypeMismatch {
                    kind: TypeMismatchKind::ExpectedInteger,
                    span,
                })
            }
        }
        Ok(if decrement {
            Stmt::Decrement { target }
        } else {
            Stmt::Increment { target }
        })
    }

    pub(super) fn analyze_break(&self, span: Span) -> SemanticResult<Stmt> {
        if !self.scope.in_loop() {
            return Err(SemanticError::ControlFlow {
                kind: ControlFlowErrorKind::BreakOutsideLoop,
                span,
            });
        }
        Ok(Stmt::Break)
    }

    pub(super) fn analyze_return(&mut self, value: &Option<cst::Expr>, span: Span) -> SemanticResult<Stmt> {
        let func = self.scope.current_function().ok_or(SemanticError::ControlFlow {
            kind: ControlFlowErrorKind::ReturnOutsideFunction,
            span,
        })?;
        let return_type = self.arenas.function(func).return_type().clone();

        match value {
            None => {
                if return_type != Type::Void {
                    return Err(SemanticError::ControlFlow {
                        kind: ControlFlowErrorKind::ReturnValueMissing,
                        span,
                    });
                }
                Ok(Stmt::ShortReturn)
            }
            Some(expr) => {
                if return_type == Type::Void {
                    return Err(SemanticError::ControlFlow {
                        kind: ControlFlowErrorKind::ReturnValueInVoid,
                        span,
                    });
                }
                let expr = self.analyze_expr(expr)?;
                if !expr.ty().is_assignable_to(&return_type) {
                    return Err(SemanticError::NotAssignable {
                        from: expr.ty().clone(),
                        to: return_type,
                        span,
                    });
                }
                Ok(Stmt::Return { value: expr })
            }
        }
    }

    pub(super) fn analyze_if(&mut self, stmt: &cst::IfStmt) -> SemanticResult<Stmt> {
        let test = self.analyze_expr(&stmt.test)?;
        if !test.ty().is_boolean() {
            return Err(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedBoolean,
                span: stmt.test.span(),
            });
        }
        let consequent = self.analyze_block(&stmt.consequent)?;

        match &stmt.alternate {
            None => Ok(Stmt::ShortIfStatement { test, consequent }),
            Some(cst::Alternate::Block(block)) => {
                let alternate = self.analyze_block(block)?;
                Ok(Stmt::IfStatement {
                    test,
                    consequent,
                    alternate: Alternate::Block(alternate),
                })
            }
            // The trailing `if` of an `else if` chain opens its own scope;
            // no extra block scope wraps the chain itself (spec.md §4.2).
            Some(cst::Alternate::ElseIf(nested)) => {
                let nested = self.analyze_if(nested)?;
                Ok(Stmt::IfStatement {
                    test,
                    consequent,
                    alternate: Alternate::ElseIf(Box::new(nested)),
                })
            }
        }
    }

    pub(super) fn analyze_while(&mut self, test: &cst::Expr, body: &cst::Block, span: Span) -> SemanticResult<Stmt> {
        let test = self.analyze_expr(test)?;
        if !test.ty().is_boolean() {
            return Err(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedBoolean,
                span,
            });
        }
        self.scope.enter_loop_body();
        let body = self.analyze_statements(&body.statements);
        self.scope.leave();
        Ok(Stmt::WhileStatement { test, body: body? })
    }

    pub(super) fn analyze_repeat(&mut self, count: &cst::Expr, body: &cst::Block, span: Span) -> SemanticResult<Stmt> {
        let count = self.analyze_expr(count)?;
        if !count.ty().is_integer() {
            return Err(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedInteger,
                span,
            });
        }
        self.scope.enter_loop_body();
        let body = self.analyze_statements(&body.statements);
        self.scope.leave();
        Ok(Stmt::RepeatStatement { count, body: body? })
    }

    #[allow(clippy::too_many_arguments)]
    pub(super) fn analyze_for_range(
        &mut self,
        iterator: &str,
        iterator_span: Span,
        low: &cst::Expr,
        op: cst::RangeOp,
        high: &cst::Expr,
        body: &cst::Block,
        span: Span,
    ) -> SemanticResult<Stmt> {
        let low = self.analyze_expr(low)?;
        if !low.ty().is_integer() {
            return Err(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedInteger,
                span,
            });
        }
        let high = self.analyze_expr(high)?;
        if !high.ty().is_integer() {
            return Err(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedInteger,
                span,
            });
        }

        self.scope.enter_loop_body();
        let iter_var = self.arenas.alloc_variable(iterator, true, Type::Int);
        let result = self
            .scope
            .declare(iterator, crate::entities::Entity::Variable(iter_var), iterator_span)
            .and_then(|()| self.analyze_statements(&body.statements));
        self.scope.leave();
        let body = result?;

        let op = match op {
            cst::RangeOp::Inclusive => RangeOp::Inclusive,
            cst::RangeOp::Exclusive => RangeOp::Exclusive,
        };
        Ok(Stmt::ForRangeStatement {
            iterator: iter_var,
            low,
            op,
            high,
            body,
        })
    }

    pub(super) fn analyze_for_each(
        &mut self,
        iterator: &str,
        iterator_span: Span,
        collection: &cst::Expr,
        body: &cst::Block,
        span: Span,
    ) -> SemanticResult<Stmt> {
        let collection = self.analyze_expr(collection)?;
        let element_type = collection
            .ty()
            .as_array_base()
            .ok_or(SemanticError::TypeMismatch {
                kind: TypeMismatchKind::ExpectedArray,
                span,
            })?
            .clone();

        self.scope.enter_loop_body();
        // Range iterators are read-only per spec.md §3; the same treatment
        // is applied here for consistency (spec.md §9 leaves this an open
        // question and notes "earlier code shows both").
        let iter_var = self.arenas.alloc_variable(iterator, true, element_type);
        let result = self
            .scope
            .declare(iterator, crate::entities::Entity::Variable(iter_var), iterator_span)
            .and_then(|()| self.analyze_statements(&body.statements));
        self.scope.leave();
        let body = result?;

        Ok(Stmt::ForStatement {
            iterator: iter_var,
            collection,
            body,
        })
    }
}

/// The variable a read/write path ultimately targets, walking through
/// subscripts and non-optional member accesses (spec.md §4.2 "target's
/// entire path originates in a non-const root"). Returns `None` for
/// anything that isn't an assignable path at all.
fn assignment_root(target: &ir::Expr) -> Option<crate::entities::VarId> {
    match target {
        ir::Expr::Variable { var, .. } => Some(*var),
        ir::Expr::Subscript { array, .. } => assignment_root(array),
        ir::Expr::Member {
            object,
            is_optional_access: false,
            ..
        } => assignment_root(object),
        _ => None,
    }
}
