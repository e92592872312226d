//! Arena-addressed entities (spec.md §3 "Entities", §9 "Entity identity
//! without pointers"). Every `Variable`/`Function`/`StructType` that the
//! analyzer creates lives in one of the three flat arenas below and is
//! referenced everywhere else by its id; "same entity" (spec.md's repeated
//! identity requirement) is then just id equality, and self-referential
//! struct fields fall out naturally since a `StructId` can appear inside a
//! field type before that struct's own field list is finished.

use serde::{Deserialize, Serialize};

use crate::types::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableData {
    pub name: String,
    pub read_only: bool,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionData {
    pub name: String,
    pub ty: Type,
}

impl FunctionData {
    pub fn param_types(&self) -> &[Type] {
        self.ty.as_function().expect("function entity must have a FunctionType").0
    }

    pub fn return_type(&self) -> &Type {
        self.ty.as_function().expect("function entity must have a FunctionType").1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructData {
    pub name: String,
    pub fields: Vec<(String, Type)>,
}

impl StructData {
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    pub fn field_type(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }
}

/// An entity resolvable from a name: what the scope stack actually stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    Variable(VarId),
    Function(FuncId),
    Struct(StructId),
}

/// The three flat entity arenas, owned by the decorated `Program` once
/// analysis finishes (spec.md §5: the decorated IR is a directed graph with
/// non-tree sharing; this is the "arena plus indices" strategy spec.md §9
/// recommends).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arenas {
    pub variables: Vec<VariableData>,
    pub functions: Vec<FunctionData>,
    pub structs: Vec<StructData>,
}

impl Arenas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_variable(&mut self, name: impl Into<String>, read_only: bool, ty: Type) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(VariableData {
            name: name.into(),
            read_only,
            ty,
        });
        id
    }

    pub fn alloc_function(&mut self, name: impl Into<String>, ty: Type) -> FuncId {
        let id = FuncId(self.functions.len());
        self.functions.push(FunctionData { name: name.into(), ty });
        id
    }

    /// Pre-declares a struct with no fields yet, so field types may mention
    /// it indirectly (spec.md §4.2 "Type declaration").
    pub fn alloc_struct_stub(&mut self, name: impl Into<String>) -> StructId {
        let id = StructId(self.structs.len());
        self.structs.push(StructData {
            name: name.into(),
            fields: Vec::new(),
        });
        id
    }

    pub fn variable(&self, id: VarId) -> &VariableData {
        &self.variables[id.0]
    }

    pub fn function(&self, id: FuncId) -> &FunctionData {
        &self.functions[id.0]
    }

    pub fn struct_(&self, id: StructId) -> &StructData {
        &self.structs[id.0]
    }

    pub fn struct_mut(&mut self, id: StructId) -> &mut StructData {
        &mut self.structs[id.0]
    }
}
