//! Public names of a model's six operations, derived from its type name.

use crate::case::{to_camel_case, to_pascal_case};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Make,
    Get,
    Put,
    Delete,
    Valid,
    Exists,
}

impl Operation {
    pub const ALL: [Operation; 6] = [
        Operation::Make,
        Operation::Get,
        Operation::Put,
        Operation::Delete,
        Operation::Valid,
        Operation::Exists,
    ];
}

/// `make<Type>`, `get<Type>`, `put<Type>`, `delete<Type>`, `valid<Type>?`, `<type>Exists?`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OperationNames {
    pub make: String,
    pub get: String,
    pub put: String,
    pub delete: String,
    pub valid: String,
    pub exists: String,
}

impl OperationNames {
    pub fn for_type(type_name: &str) -> Self {
        let pascal = to_pascal_case(type_name);
        Self {
            make: format!("make{}", pascal),
            get: format!("get{}", pascal),
            put: format!("put{}", pascal),
            delete: format!("delete{}", pascal),
            valid: format!("valid{}?", pascal),
            exists: format!("{}Exists?", to_camel_case(type_name)),
        }
    }

    pub fn name(&self, op: Operation) -> &str {
        match op {
            Operation::Make => &self.make,
            Operation::Get => &self.get,
            Operation::Put => &self.put,
            Operation::Delete => &self.delete,
            Operation::Valid => &self.valid,
            Operation::Exists => &self.exists,
        }
    }

    /// The operation published under `name`, if any.
    pub fn operation(&self, name: &str) -> Option<Operation> {
        Operation::ALL.into_iter().find(|op| self.name(*op) == name)
    }
}
