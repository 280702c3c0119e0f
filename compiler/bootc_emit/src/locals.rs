//! Declared-locals tracking for one function or entrypoint body.

use rustc_hash::FxHashMap;

use crate::types::DEFAULT_INT_TYPE;

/// Inferred C type of a local.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LocalType {
    Int,
    Float,
    Bool,
    Str,
    /// Any other resolved C type (records, sized integers, pointers).
    Named(String),
}

impl LocalType {
    /// Classify a resolved C type.
    pub fn from_c_type(c_type: &str) -> Self {
        match c_type {
            "int64_t" => Self::Int,
            "double" | "float" => Self::Float,
            "bool" => Self::Bool,
            "const char *" => Self::Str,
            other => Self::Named(other.to_string()),
        }
    }

    pub fn c_type(&self) -> &str {
        match self {
            Self::Int => DEFAULT_INT_TYPE,
            Self::Float => "double",
            Self::Bool => "bool",
            Self::Str => "const char *",
            Self::Named(name) => name,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float)
    }
}

/// Names already declared in the current body, with their types.
///
/// Created fresh for each body and dropped when the body is finished.
#[derive(Debug, Default)]
pub struct DeclaredLocals {
    names: FxHashMap<String, LocalType>,
}

impl DeclaredLocals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration. Returns `false` if the name was already known.
    pub fn declare(&mut self, name: &str, ty: LocalType) -> bool {
        if self.names.contains_key(name) {
            return false;
        }
        self.names.insert(name.to_string(), ty);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&LocalType> {
        self.names.get(name)
    }

    /// Forget a name whose C scope has ended (loop variables).
    pub fn forget(&mut self, name: &str) {
        self.names.remove(name);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
