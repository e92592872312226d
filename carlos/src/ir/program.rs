use serde::{Deserialize, Serialize};

use super::stmt::Stmt;
use crate::entities::Arenas;
use crate::stdlib::StdlibIds;

/// The decorated program, owning the entity/type arenas its statements and
/// expressions reference by id (spec.md §3 "A Program owns an ordered
/// sequence of top-level statements/declarations"). `stdlib` carries the
/// well-known ids the generator needs to recognize built-ins by identity
/// rather than by name (spec.md §4.4, §9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub arenas: Arenas,
    pub stdlib: StdlibIds,
    pub statements: Vec<Stmt>,
}
