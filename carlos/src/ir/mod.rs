//! Decorated intermediate representation (spec.md §3 "IR nodes").
//!
//! This is the shared currency between the analyzer, optimizer, and
//! generator: every expression variant carries a `ty: Type` field (the
//! invariant `spec.md` §3/§8 require — "every expression node has a
//! non-null type field by analyzer exit"), and every identifier use is an
//! arena id rather than a name (`spec.md`'s "points to the same entity
//! object produced at its declaration").

mod expr;
mod program;
mod stmt;

pub use expr::{BinOp, Callee, Expr, UnaryOp};
pub use program::Program;
pub use stmt::{Alternate, RangeOp, Stmt};
