//! Companion header synthesis.
//!
//! The header carries the include guard, a C++ linkage wrapper, forward
//! typedefs for every record and one prototype per function. Prototypes use
//! the same mangling and type resolution as the definitions in the source
//! file, so the two always agree.

use crate::context::CodegenContext;
use crate::ident::sanitize_identifier;
use crate::unit::{BANNER, STANDARD_INCLUDES};

/// Include guard token for a header base name.
///
/// `<guard prefix><UPPER(sanitize(base))>_H`, e.g. `BOOTC_OUT_H`.
pub fn header_guard(guard_prefix: &str, base: &str) -> String {
    format!(
        "{guard_prefix}{}_H",
        sanitize_identifier(base).to_ascii_uppercase()
    )
}

/// Emit the header into `ctx.out`.
pub fn emit_header(ctx: &mut CodegenContext<'_>, base: &str) {
    let guard = header_guard(ctx.options.header_guard_prefix(), base);
    tracing::debug!(%guard, "emitting C header");

    ctx.out.writeln(BANNER);
    ctx.out.writeln(&format!("#ifndef {guard}"));
    ctx.out.writeln(&format!("#define {guard}"));
    ctx.out.newline();
    for include in STANDARD_INCLUDES {
        ctx.out.writeln(include);
    }
    ctx.out.newline();
    ctx.out.writeln("#ifdef __cplusplus");
    ctx.out.writeln("extern \"C\" {");
    ctx.out.writeln("#endif");
    ctx.out.newline();

    let unit = ctx.unit;
    if !unit.records.is_empty() {
        for record in &unit.records {
            let name = ctx.mangler.mangle_type(record.module_name(), &record.name);
            ctx.out.writeln(&format!("typedef struct {name} {name};"));
        }
        ctx.out.newline();
    }

    if !unit.functions.is_empty() {
        for function in &unit.functions {
            let signature = ctx.signature(function);
            ctx.out.writeln(&format!("{signature};"));
        }
        ctx.out.newline();
    }

    ctx.out.writeln("#ifdef __cplusplus");
    ctx.out.writeln("}");
    ctx.out.writeln("#endif");
    ctx.out.newline();
    ctx.out.writeln(&format!("#endif /* {guard} */"));
}
