//! Program unit: the resolved representation handed to the backend.

use crate::{NodeArena, NodeId, NodeKind, Span};

/// A source module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    /// Dotted module name, e.g. `demo.core`.
    pub name: String,
    pub span: Span,
}

/// A `(name, type-name)` pair, used for record fields and parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: String,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A user-defined record type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordType {
    pub name: String,
    /// Owning module, `None` for the root.
    pub module: Option<String>,
    pub fields: Vec<Field>,
}

impl RecordType {
    /// Owning module name, empty for the root.
    pub fn module_name(&self) -> &str {
        self.module.as_deref().unwrap_or("")
    }
}

/// A function declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    /// Owning module, `None` for the root.
    pub module: Option<String>,
    pub params: Vec<Field>,
    /// Declared return type; `None` means the default integer type.
    pub ret: Option<String>,
    /// Body block. `None` for declarations without a lowered body.
    pub body: Option<NodeId>,
    pub span: Span,
}

impl Function {
    /// Owning module name, empty for the root.
    pub fn module_name(&self) -> &str {
        self.module.as_deref().unwrap_or("")
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Number of top-level statements in the body block.
    ///
    /// Zero when the body is absent or is not a block.
    pub fn stmt_count(&self, arena: &NodeArena) -> usize {
        match self.body.and_then(|id| arena.kind(id)) {
            Some(NodeKind::Block(stmts)) => stmts.len(),
            _ => 0,
        }
    }
}

/// A designated program-start symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entrypoint {
    /// Module path the symbol lives in, e.g. `demo.core`.
    pub module_path: String,
    pub symbol: String,
    /// Program body to inline into `main`, when the front end lowered one.
    pub body: Option<NodeId>,
}

/// Everything the front end hands to the backend for one compilation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgramUnit {
    pub modules: Vec<Module>,
    pub records: Vec<RecordType>,
    pub functions: Vec<Function>,
    pub entrypoints: Vec<Entrypoint>,
    pub arena: NodeArena,
}

impl ProgramUnit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a function by module and name.
    pub fn find_function(&self, module: &str, name: &str) -> Option<&Function> {
        self.functions
            .iter()
            .find(|f| f.name == name && f.module_name() == module)
    }
}
