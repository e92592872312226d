//! Semantic error types (spec.md §7 "Error handling design").
//!
//! One `thiserror` variant per leaf kind `spec.md` lists, each carrying the
//! source span of the offending parse-tree node. Policy: the first error
//! aborts analysis (no recovery); the optimizer and generator never raise
//! these — their preconditions are guaranteed by a successful analysis, so
//! a panic in either is a bug, not a recoverable condition.

use std::fmt;

use thiserror::Error;

use carlos_parser::Span;

use crate::types::Type;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMismatchKind {
    #[error("expected a boolean")]
    ExpectedBoolean,
    #[error("expected an integer")]
    ExpectedInteger,
    #[error("expected a number")]
    ExpectedNumber,
    #[error("expected a number or string")]
    ExpectedNumberOrString,
    #[error("expected an array")]
    ExpectedArray,
    #[error("expected an optional")]
    ExpectedOptional,
    #[error("expected a struct")]
    ExpectedStruct,
    #[error("expected an optional struct")]
    ExpectedOptionalStruct,
    #[error("operands must have the same type")]
    ExpectedSameType,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructErrorKind {
    #[error("fields must be distinct")]
    FieldsNotDistinct,
    #[error("no such field")]
    FieldNotFound,
    #[error("struct type must not be recursive")]
    RecursiveStruct,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlowErrorKind {
    #[error("break can only appear in a loop")]
    BreakOutsideLoop,
    #[error("return can only appear in a function")]
    ReturnOutsideFunction,
    #[error("cannot return a value from a void function")]
    ReturnValueInVoid,
    #[error("must return a value from this function")]
    ReturnValueMissing,
}

#[derive(Error, Debug, Clone)]
pub enum SemanticError {
    #[error("{name} has not been declared at {span:?}")]
    NotDeclared { name: String, span: Span },

    #[error("{name} has already been declared at {span:?}")]
    AlreadyDeclared { name: String, span: Span },

    #[error("{name} is not a type at {span:?}")]
    NotAType { name: String, span: Span },

    #[error("not callable at {span:?}")]
    NotCallable { span: Span },

    #[error("{kind} at {span:?}")]
    TypeMismatch {
        kind: TypeMismatchKind,
        span: Span,
    },

    #[error("cannot assign a {from} to a {to} at {span:?}")]
    NotAssignable {
        from: Type,
        to: Type,
        span: Span,
    },

    #[error("{kind} at {span:?}")]
    StructError { kind: StructErrorKind, span: Span },

    #[error("expected {expected} argument(s) but got {got} at {span:?}")]
    ArityMismatch {
        expected: usize,
        got: usize,
        span: Span,
    },

    #[error("cannot assign to immutable {name} at {span:?}")]
    AssignToReadOnly { name: String, span: Span },

    #[error("{kind} at {span:?}")]
    ControlFlow {
        kind: ControlFlowErrorKind,
        span: Span,
    },
}

impl SemanticError {
    pub fn span(&self) -> Span {
        match self {
            SemanticError::NotDeclared { span, .. }
            | SemanticError::AlreadyDeclared { span, .. }
            | SemanticError::NotAType { span, .. }
            | SemanticError::NotCallable { span }
            | SemanticError::TypeMismatch { span, .. }
            | SemanticError::NotAssignable { span, .. }
            | SemanticError::StructError { span, .. }
            | SemanticError::ArityMismatch { span, .. }
            | SemanticError::AssignToReadOnly { span, .. }
            | SemanticError::ControlFlow { span, .. } => *span,
        }
    }
}

/// Renders types the way diagnostics quote them, e.g. "cannot assign a
/// boolean to a int" (spec.md §8 scenario 5's exact wording).
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Boolean => write!(f, "boolean"),
            Type::String => write!(f, "string"),
            Type::Void => write!(f, "void"),
            Type::Any => write!(f, "any"),
            Type::Array(base) => write!(f, "[{base}]"),
            Type::Optional(base) => write!(f, "{base}?"),
            Type::Function(params, ret) => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ")->{ret}")
            }
            Type::Struct(id) => write!(f, "struct#{}", id.0),
        }
    }
}

pub type SemanticResult<T> = Result<T, SemanticError>;
