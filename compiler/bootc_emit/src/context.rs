//! Code generation context and state.
//!
//! The `CodegenContext` holds everything one artifact's emission needs: the
//! borrowed program unit, the normalized options, the mangler, a function
//! lookup table, the current body's declared locals, and the output buffer.

use bootc_ir::{Field, Function, NodeArena, ProgramUnit};
use rustc_hash::FxHashMap;

use crate::buffer::EmitBuffer;
use crate::ident::{local_identifier, sanitize_identifier};
use crate::locals::{DeclaredLocals, LocalType};
use crate::mangle::Mangler;
use crate::options::EmitOptions;
use crate::types::TypeResolver;
use crate::EmitError;

/// Output capacity reserved for the fixed parts of an artifact.
const BASE_CAPACITY: usize = 4096;

/// Additional capacity reserved per arena node.
const BYTES_PER_NODE: usize = 32;

/// Code generation context.
pub struct CodegenContext<'a> {
    pub unit: &'a ProgramUnit,
    pub options: &'a EmitOptions,
    pub mangler: Mangler,
    /// Functions by bare name, in declaration order.
    functions: FxHashMap<&'a str, Vec<&'a Function>>,
    /// Module of the body being emitted; drives same-module preference.
    module: &'a str,
    /// Set while an entrypoint body is inlined into `int main(void)`.
    in_main: bool,
    pub locals: DeclaredLocals,
    pub out: EmitBuffer,
}

impl<'a> CodegenContext<'a> {
    /// Create a context. Fails only if the output buffer cannot reserve room
    /// for the unit.
    pub fn new(unit: &'a ProgramUnit, options: &'a EmitOptions) -> Result<Self, EmitError> {
        let mut functions: FxHashMap<&'a str, Vec<&'a Function>> = FxHashMap::default();
        for function in &unit.functions {
            functions.entry(function.name.as_str()).or_default().push(function);
        }

        Ok(Self {
            unit,
            options,
            mangler: Mangler::from_options(options),
            functions,
            module: "",
            in_main: false,
            locals: DeclaredLocals::new(),
            out: EmitBuffer::with_capacity(initial_capacity(unit))?,
        })
    }

    #[inline]
    pub fn arena(&self) -> &'a NodeArena {
        &self.unit.arena
    }

    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver::new(&self.unit.records, &self.mangler)
    }

    /// Start emitting a body: fresh locals, seeded with the parameters.
    pub fn begin_body(&mut self, module: &'a str, params: &[Field]) {
        self.module = module;
        self.locals = DeclaredLocals::new();
        for param in params {
            let c_type = self.resolver().resolve(&param.ty, Some(module));
            self.locals
                .declare(&local_identifier(&param.name), LocalType::from_c_type(&c_type));
        }
    }

    /// Start inlining an entrypoint body into `main`.
    pub fn begin_main_body(&mut self, module: &'a str) {
        self.begin_body(module, &[]);
        self.in_main = true;
    }

    /// Finish a body and drop its locals.
    pub fn end_body(&mut self) {
        self.locals = DeclaredLocals::new();
        self.module = "";
        self.in_main = false;
    }

    /// A `return` without a value; `main` must still return an `int`.
    pub fn bare_return(&self) -> &'static str {
        if self.in_main {
            "return 0;"
        } else {
            "return;"
        }
    }

    /// Look up a unit function, preferring `module` (or the current module).
    pub fn lookup_function(&self, module: Option<&str>, name: &str) -> Option<&'a Function> {
        let candidates = self.functions.get(name)?;
        match module {
            Some(module) => candidates.iter().copied().find(|f| f.module_name() == module),
            None => candidates
                .iter()
                .copied()
                .find(|f| f.module_name() == self.module)
                .or_else(|| candidates.first().copied()),
        }
    }

    /// Mangled symbol of a unit function.
    pub fn function_symbol(&self, function: &Function) -> String {
        self.mangler.mangle_function(function.module_name(), &function.name)
    }

    /// Name of the print dispatcher, inline or runtime-provided.
    pub fn print_symbol(&self) -> String {
        format!("{}rt_print", self.mangler.prefix())
    }

    /// Render a bare identifier in value position.
    ///
    /// Locals shadow functions; unknown names are sanitized.
    pub fn value_name(&self, name: &str) -> String {
        let local = local_identifier(name);
        if self.locals.contains(&local) {
            return local;
        }
        if let Some(function) = self.lookup_function(None, name) {
            return self.function_symbol(function);
        }
        local
    }

    /// Render a `module::name` path in value position.
    pub fn path_name(&self, segments: &[String]) -> String {
        if let [single] = segments {
            return self.value_name(single);
        }
        if let Some((name, module)) = segments.split_last() {
            let module = module.join(".");
            if let Some(function) = self.lookup_function(Some(&module), name) {
                return self.function_symbol(function);
            }
        }
        sanitize_identifier(&segments.join("_"))
    }

    /// `<ret> <symbol>(<params>)`, without a terminator.
    pub fn signature(&self, function: &Function) -> String {
        let resolver = self.resolver();
        let module = Some(function.module_name());
        let ret = resolver.resolve_return(function.ret.as_deref(), module);
        let params = if function.params.is_empty() {
            "void".to_string()
        } else {
            function
                .params
                .iter()
                .map(|p| format!("{} {}", resolver.resolve(&p.ty, module), local_identifier(&p.name)))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("{ret} {}({params})", self.function_symbol(function))
    }

    /// Take the generated output.
    pub fn into_output(self) -> String {
        self.out.into_string()
    }
}

/// Bytes to reserve before emitting `unit`: a fixed base plus a per-node
/// share, saturating so oversized units fail the reservation.
fn initial_capacity(unit: &ProgramUnit) -> usize {
    unit.arena
        .len()
        .saturating_mul(BYTES_PER_NODE)
        .saturating_add(BASE_CAPACITY)
}
