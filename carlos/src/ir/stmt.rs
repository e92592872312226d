use serde::{Deserialize, Serialize};

use super::expr::Expr;
use crate::entities::{FuncId, StructId, VarId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeOp {
    Inclusive,
    Exclusive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Alternate {
    Block(Vec<Stmt>),
    /// The tail of an `else if` chain: always a `Stmt::If` or
    /// `Stmt::ShortIf`, never wrapped in an extra block (spec.md §4.2's
    /// "the trailing if opens its own [scope]" and §4.4's "no redundant
    /// `{ }` wrapping of an else-if").
    ElseIf(Box<Stmt>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    VariableDeclaration {
        var: VarId,
        initializer: Expr,
    },
    TypeDeclaration {
        struct_type: StructId,
    },
    FunctionDeclaration {
        func: FuncId,
        params: Vec<VarId>,
        body: Vec<Stmt>,
    },
    Assignment {
        target: Expr,
        source: Expr,
    },
    Increment {
        target: Expr,
    },
    Decrement {
        target: Expr,
    },
    Break,
    Return {
        value: Expr,
    },
    ShortReturn,
    IfStatement {
        test: Expr,
        consequent: Vec<Stmt>,
        alternate: Alternate,
    },
    ShortIfStatement {
        test: Expr,
        consequent: Vec<Stmt>,
    },
    WhileStatement {
        test: Expr,
        body: Vec<Stmt>,
    },
    RepeatStatement {
        count: Expr,
        body: Vec<Stmt>,
    },
    ForRangeStatement {
        iterator: VarId,
        low: Expr,
        op: RangeOp,
        high: Expr,
        body: Vec<Stmt>,
    },
    ForStatement {
        iterator: VarId,
        collection: Expr,
        body: Vec<Stmt>,
    },
    /// A call expression used for its side effect, e.g. `print(x);`.
    ExprStatement {
        expr: Expr,
    },
}
