//! Resolves parse-tree type expressions to `Type`s (spec.md §3 "Types").
//!
//! Shared by declaration, statement, and expression analysis: struct
//! fields, function signatures, `no T`, and `[T]()` all bottom out here.

use carlos_parser::cst;
use carlos_parser::Span;

use super::Analyzer;
use crate::entities::Entity;
use crate::error::{SemanticError, SemanticResult};
use crate::types::Type;

impl Analyzer {
    pub(super) fn resolve_type(&self, texpr: &cst::TypeExpr) -> SemanticResult<Type> {
        match texpr {
            cst::TypeExpr::Name(name, span) => self.resolve_named_type(name, *span),
            cst::TypeExpr::Array(inner, _) => Ok(Type::array(self.resolve_type(inner)?)),
            cst::TypeExpr::Optional(inner, _) => Ok(Type::optional(self.resolve_type(inner)?)),
            cst::TypeExpr::Function(params, ret, _) => {
                let params = params
                    .iter()
                    .map(|p| self.resolve_type(p))
                    .collect::<SemanticResult<Vec<_>>>()?;
                let ret = self.resolve_type(ret)?;
                Ok(Type::function(params, ret))
            }
        }
    }

    /// The six `int`/`float`/`boolean`/`string`/`void` aliases resolve to
    /// the primitive singletons directly (spec.md §6.2); anything else must
    /// be a declared struct name. `any` has no surface syntax — it only
    /// ever appears as the parameter type of a built-in (spec.md §6.2,
    /// `print: (any)→void`).
    fn resolve_named_type(&self, name: &str, span: Span) -> SemanticResult<Type> {
        match name {
            "int" => Ok(Type::Int),
            "float" => Ok(Type::Float),
            "boolean" => Ok(Type::Boolean),
            "string" => Ok(Type::String),
            "void" => Ok(Type::Void),
            _ => match self.scope.lookup(name, span)? {
                Entity::Struct(id) => Ok(Type::Struct(id)),
                Entity::Variable(_) | Entity::Function(_) => Err(SemanticError::NotAType {
                    name: name.to_string(),
                    span,
                }),
            },
        }
    }
}
