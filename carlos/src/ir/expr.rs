use serde::{Deserialize, Serialize};

use crate::entities::{FuncId, StructId, VarId};
use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    UnwrapElse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
    Len,
    Some_,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    IntLiteral {
        value: i64,
        ty: Type,
    },
    FloatLiteral {
        value: f64,
        ty: Type,
    },
    StringLiteral {
        value: String,
        ty: Type,
    },
    BoolLiteral {
        value: bool,
        ty: Type,
    },
    Variable {
        var: VarId,
        ty: Type,
    },
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
        ty: Type,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        ty: Type,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
        ty: Type,
    },
    Subscript {
        array: Box<Expr>,
        index: Box<Expr>,
        ty: Type,
    },
    Member {
        object: Box<Expr>,
        field_index: usize,
        is_optional_access: bool,
        ty: Type,
    },
    ArrayExpression {
        elements: Vec<Expr>,
        ty: Type,
    },
    EmptyArray {
        ty: Type,
    },
    EmptyOptional {
        ty: Type,
    },
    FunctionCall {
        callee: Callee,
        args: Vec<Expr>,
        ty: Type,
    },
    ConstructorCall {
        struct_type: StructId,
        args: Vec<Expr>,
        ty: Type,
    },
    /// A bare reference to a declared function used as a value rather than
    /// called directly, e.g. passed to a higher-order function (spec.md §1
    /// "first-class functions"). Direct calls skip this node entirely and
    /// go straight to `FunctionCall { callee: Callee::Entity(_), .. }`.
    FunctionRef {
        func: FuncId,
        ty: Type,
    },
}

/// What a [`FunctionCall`] invokes: either a function declared (or
/// standard-library) by name — the case the generator's entity-identity
/// built-in lowering (spec.md §4.4, §9) compares against — or an arbitrary
/// function-typed expression (a parameter, a subscript, a field, …).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callee {
    Entity(FuncId),
    Value(Box<Expr>),
}

impl Expr {
    pub fn ty(&self) -> &Type {
        match self {
            Expr::IntLiteral { ty, .. }
            | Expr::FloatLiteral { ty, .. }
            | Expr::StringLiteral { ty, .. }
            | Expr::BoolLiteral { ty, .. }
            | Expr::Variable { ty, .. }
            | Expr::Binary { ty, .. }
            | Expr::Unary { ty, .. }
            | Expr::Conditional { ty, .. }
            | Expr::Subscript { ty, .. }
            | Expr::Member { ty, .. }
            | Expr::ArrayExpression { ty, .. }
            | Expr::EmptyArray { ty, .. }
            | Expr::EmptyOptional { ty, .. }
            | Expr::FunctionCall { ty, .. }
            | Expr::ConstructorCall { ty, .. }
            | Expr::FunctionRef { ty, .. } => ty,
        }
    }

    /// A best-effort "is this expression a compile-time numeric/boolean
    /// literal" test the optimizer's constant folder uses as its base case.
    pub fn as_int_literal(&self) -> Option<i64> {
        match self {
            Expr::IntLiteral { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_float_literal(&self) -> Option<f64> {
        match self {
            Expr::FloatLiteral { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool_literal(&self) -> Option<bool> {
        match self {
            Expr::BoolLiteral { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_empty_optional(&self) -> bool {
        matches!(self, Expr::EmptyOptional { .. })
    }
}
