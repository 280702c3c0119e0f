//! Type Mapping: bootc type names → C types
//!
//! Resolution order:
//!
//! 1. Builtin names map directly to C types
//! 2. A record with the same name in the preferred module
//! 3. The first record with the same name in any module
//! 4. `void *` for anything else
//!
//! Resolution never fails; unknown types degrade to an untyped pointer.

use bootc_ir::RecordType;

use crate::mangle::Mangler;

/// C spelling of the untyped fallback.
pub const UNTYPED_POINTER: &str = "void *";

/// C type used when a function declares no return type.
pub const DEFAULT_INT_TYPE: &str = "int64_t";

/// Map a builtin type name to its C type.
pub fn builtin_c_type(name: &str) -> Option<&'static str> {
    let c_type = match name {
        "void" | "unit" => "void",
        "bool" => "bool",
        "i8" => "int8_t",
        "i16" => "int16_t",
        "i32" => "int32_t",
        "i64" | "int" => "int64_t",
        "u8" | "byte" => "uint8_t",
        "u16" => "uint16_t",
        "u32" => "uint32_t",
        "u64" | "uint" => "uint64_t",
        "usize" => "size_t",
        "isize" => "ptrdiff_t",
        "f32" => "float",
        "f64" | "float" | "double" => "double",
        "str" | "string" | "String" => "const char *",
        _ => return None,
    };
    Some(c_type)
}

/// Check whether a resolved C type is an arithmetic scalar (`0` is its
/// zero value).
pub fn is_scalar_c_type(c_type: &str) -> bool {
    matches!(
        c_type,
        "bool"
            | "int8_t"
            | "int16_t"
            | "int32_t"
            | "int64_t"
            | "uint8_t"
            | "uint16_t"
            | "uint32_t"
            | "uint64_t"
            | "size_t"
            | "ptrdiff_t"
            | "float"
            | "double"
    )
}

/// Resolves type names against builtins and the unit's records.
pub struct TypeResolver<'a> {
    records: &'a [RecordType],
    mangler: &'a Mangler,
}

impl<'a> TypeResolver<'a> {
    pub fn new(records: &'a [RecordType], mangler: &'a Mangler) -> Self {
        Self { records, mangler }
    }

    /// Resolve `type_name` to a C type.
    ///
    /// A qualified name such as `demo.core::Pair` supplies its own
    /// preferred module and overrides `preferred_module`.
    pub fn resolve(&self, type_name: &str, preferred_module: Option<&str>) -> String {
        let type_name = type_name.trim();
        if let Some(c_type) = builtin_c_type(type_name) {
            return c_type.to_string();
        }

        let (preferred_module, name) = match type_name.rsplit_once("::") {
            Some((module, name)) => (Some(module), name),
            None => (preferred_module, type_name),
        };

        self.find_record(name, preferred_module).map_or_else(
            || UNTYPED_POINTER.to_string(),
            |record| self.mangler.mangle_type(record.module_name(), &record.name),
        )
    }

    /// Resolve an optional return type, defaulting to [`DEFAULT_INT_TYPE`].
    pub fn resolve_return(&self, type_name: Option<&str>, preferred_module: Option<&str>) -> String {
        match type_name {
            Some(name) if !name.trim().is_empty() => self.resolve(name, preferred_module),
            _ => DEFAULT_INT_TYPE.to_string(),
        }
    }

    fn find_record(&self, name: &str, preferred_module: Option<&str>) -> Option<&'a RecordType> {
        if let Some(module) = preferred_module {
            let exact = self
                .records
                .iter()
                .find(|r| r.name == name && r.module_name() == module);
            if exact.is_some() {
                return exact;
            }
        }
        self.records.iter().find(|r| r.name == name)
    }
}
