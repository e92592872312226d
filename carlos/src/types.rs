//! The Carlos type system (spec.md §3 "Types").
//!
//! `Type` doubles as the equivalence relation: deriving `PartialEq`
//! structurally on `Array`/`Optional`/`Function` gives exactly the
//! recursive structural equality spec.md asks for, while `Struct(StructId)`
//! compares by arena index, which gives nominal/identity equivalence for
//! structs for free — no separate equivalence function is needed.

use serde::{Deserialize, Serialize};

use crate::entities::StructId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    Int,
    Float,
    Boolean,
    String,
    Void,
    Any,
    Array(Box<Type>),
    Optional(Box<Type>),
    Function(Vec<Type>, Box<Type>),
    Struct(StructId),
}

impl Type {
    pub fn array(base: Type) -> Type {
        Type::Array(Box::new(base))
    }

    pub fn optional(base: Type) -> Type {
        Type::Optional(Box::new(base))
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Type {
        Type::Function(params, Box::new(ret))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Boolean)
    }

    pub fn as_array_base(&self) -> Option<&Type> {
        match self {
            Type::Array(base) => Some(base),
            _ => None,
        }
    }

    pub fn as_optional_base(&self) -> Option<&Type> {
        match self {
            Type::Optional(base) => Some(base),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<StructId> {
        match self {
            Type::Struct(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_optional_struct(&self) -> Option<StructId> {
        match self {
            Type::Optional(base) => base.as_struct(),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<(&[Type], &Type)> {
        match self {
            Type::Function(params, ret) => Some((params.as_slice(), ret)),
            _ => None,
        }
    }

    /// Assignability, `spec.md` §3: `to = any`, or equivalent, or `to` is a
    /// function type with a covariantly-assignable return and
    /// contravariantly-assignable parameters.
    pub fn is_assignable_to(&self, to: &Type) -> bool {
        if *to == Type::Any {
            return true;
        }
        if self == to {
            return true;
        }
        match (self, to) {
            (Type::Function(from_params, from_ret), Type::Function(to_params, to_ret)) => {
                from_params.len() == to_params.len()
                    && from_ret.is_assignable_to(to_ret)
                    && to_params
                        .iter()
                        .zip(from_params.iter())
                        .all(|(to_p, from_p)| to_p.is_assignable_to(from_p))
            }
            _ => false,
        }
    }
}
