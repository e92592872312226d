//! Pure IR-to-IR optimization (spec.md §4.3).
//!
//! Grounded on the teacher's `aot/optimizer` pass structure (constant
//! folding, dead-code elimination): a fixed set of rewrite rules, each
//! applied bottom-up in one pass over already-optimized children. Unlike
//! the teacher's SSA-level passes this never needs a fixed-point driver
//! loop — the rule set here is confluent in a single pass over
//! already-optimized children, so a second pass would find nothing left
//! to do (idempotence is asserted directly by the integration tests).

mod exprs;
mod stmts;

pub use stmts::optimize_program;
