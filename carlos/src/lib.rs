//! Semantic analyzer, IR optimizer, and code generator for the Carlos
//! language (spec.md §1 "Pipeline").
//!
//! An external CLI is a thin wrapper with no logic of its own: the four
//! pipeline stages below are the entire public surface a driver needs.

pub mod analyzer;
pub mod entities;
pub mod error;
pub mod generator;
pub mod ir;
pub mod optimizer;
pub mod scope;
pub mod stdlib;
pub mod types;

/// Parses and decorates `source`, stopping after analysis.
pub fn analyze_source(source: &str) -> Result<ir::Program, CompileError> {
    let program = carlos_parser::parse(source)?;
    Ok(analyzer::analyze(&program)?)
}

/// Parses, decorates, and optimizes `source`.
pub fn optimize_source(source: &str) -> Result<ir::Program, CompileError> {
    let mut program = analyze_source(source)?;
    program.statements = optimizer::optimize_program(program.statements);
    Ok(program)
}

/// Runs the full pipeline and renders the generated target source.
pub fn generate_source(source: &str) -> Result<String, CompileError> {
    let program = optimize_source(source)?;
    Ok(generator::generate(&program))
}

/// Parses `source` without analyzing it, for callers that only need the
/// untyped parse tree (e.g. a formatter).
pub fn parse_only(source: &str) -> Result<carlos_parser::Program, CompileError> {
    Ok(carlos_parser::parse(source)?)
}

/// Unifies the two failure modes a caller driving the whole pipeline can
/// hit: a source that does not parse, and one that parses but does not
/// type-check.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] carlos_parser::ParseError),
    #[error(transparent)]
    Semantic(#[from] error::SemanticError),
}
