//! Unit orchestration: lowers a whole program unit into one C source file.
//!
//! Output order is fixed: preamble, companion header include, module
//! listing, record types, functions, then the synthesized `main`.

use bootc_ir::{Entrypoint, Function, NodeKind, RecordType};

use crate::context::CodegenContext;
use crate::expr::emit_string_literal;
use crate::ident::local_identifier;
use crate::options::{EmitMode, RuntimeStyle};
use crate::stmt::{emit_body, emit_stmts, ends_in_return};
use crate::types::is_scalar_c_type;

pub(crate) const BANNER: &str = "/* Generated by bootc. Do not edit. */";

/// Standard includes every artifact starts with.
pub(crate) const STANDARD_INCLUDES: [&str; 3] = [
    "#include <stdint.h>",
    "#include <stddef.h>",
    "#include <stdbool.h>",
];

/// Placeholder member for records without fields; C forbids empty structs.
const EMPTY_RECORD_MEMBER: &str = "char _unused;";

/// Emit the complete source file into `ctx.out`.
///
/// `header_file` is the companion header's file name, included when header
/// emission is on.
pub fn emit_source(ctx: &mut CodegenContext<'_>, header_file: &str) {
    tracing::debug!(
        modules = ctx.unit.modules.len(),
        records = ctx.unit.records.len(),
        functions = ctx.unit.functions.len(),
        entrypoints = ctx.unit.entrypoints.len(),
        mode = %ctx.options.mode,
        "emitting C source"
    );

    emit_preamble(ctx);
    if ctx.options.emit_header {
        ctx.out.writeln(&format!("#include \"{header_file}\""));
        ctx.out.newline();
    }
    emit_module_listing(ctx);
    emit_records(ctx);
    emit_functions(ctx);
    emit_main(ctx);
}

fn emit_preamble(ctx: &mut CodegenContext<'_>) {
    ctx.out.writeln(BANNER);
    if ctx.options.emit_debug_comments {
        let options = ctx.options;
        ctx.out.writeln(&format!(
            "/* mode={} mangle={} runtime={} */",
            options.mode, options.mangle, options.runtime
        ));
    }
    for include in STANDARD_INCLUDES {
        ctx.out.writeln(include);
    }
    if ctx.options.runtime == RuntimeStyle::External {
        let runtime_header = ctx.options.runtime_header();
        ctx.out.writeln(&format!("#include \"{runtime_header}\""));
    }
    if ctx.options.wants_print_helper() {
        ctx.out.writeln("#include <stdio.h>");
        ctx.out.newline();
        emit_print_helper(ctx);
    }
    ctx.out.newline();
}

/// Inline print dispatcher used by full-mode bodies without a runtime.
fn emit_print_helper(ctx: &mut CodegenContext<'_>) {
    let print = ctx.print_symbol();
    let helpers = [
        ("i64", "int64_t v", "printf(\"%lld\\n\", (long long)v);"),
        ("f64", "double v", "printf(\"%g\\n\", v);"),
        ("bool", "bool v", "printf(\"%s\\n\", v ? \"true\" : \"false\");"),
        ("str", "const char *v", "printf(\"%s\\n\", v);"),
    ];
    for (suffix, param, body) in helpers {
        ctx.out
            .writeln(&format!("static inline void {print}_{suffix}({param}) {{ {body} }}"));
    }
    ctx.out.writeln(&format!("#define {print}(x) _Generic((x), \\"));
    ctx.out.indent();
    ctx.out.writeln(&format!("bool: {print}_bool, \\"));
    ctx.out.writeln(&format!("float: {print}_f64, \\"));
    ctx.out.writeln(&format!("double: {print}_f64, \\"));
    ctx.out.writeln(&format!("char *: {print}_str, \\"));
    ctx.out.writeln(&format!("const char *: {print}_str, \\"));
    ctx.out.writeln(&format!("default: {print}_i64)(x)"));
    ctx.out.dedent();
}

fn emit_module_listing(ctx: &mut CodegenContext<'_>) {
    let unit = ctx.unit;
    if unit.modules.is_empty() {
        ctx.out.writeln("/* modules: (none) */");
    }
    for module in &unit.modules {
        ctx.out
            .writeln(&format!("/* module: {} */", comment_text(&module.name)));
    }
    ctx.out.newline();
}

fn emit_records(ctx: &mut CodegenContext<'_>) {
    let unit = ctx.unit;
    if unit.records.is_empty() {
        return;
    }

    for record in &unit.records {
        let name = record_type_name(ctx, record);
        ctx.out.writeln(&format!("typedef struct {name} {name};"));
    }
    ctx.out.newline();

    for record in &unit.records {
        emit_record(ctx, record);
    }
}

fn emit_record(ctx: &mut CodegenContext<'_>, record: &RecordType) {
    let name = record_type_name(ctx, record);
    ctx.out.writeln(&format!(
        "/* record {} */",
        comment_text(&qualified_name(record.module_name(), &record.name))
    ));
    ctx.out.writeln(&format!("struct {name} {{"));
    ctx.out.indent();
    if record.fields.is_empty() {
        ctx.out.writeln("/* (no fields) */");
        ctx.out.writeln(EMPTY_RECORD_MEMBER);
    }
    for field in &record.fields {
        let ty = ctx.resolver().resolve(&field.ty, Some(record.module_name()));
        let field_name = local_identifier(&field.name);
        ctx.out.writeln(&format!("{ty} {field_name};"));
    }
    ctx.out.dedent();
    ctx.out.writeln("};");
    ctx.out.newline();
}

fn record_type_name(ctx: &CodegenContext<'_>, record: &RecordType) -> String {
    ctx.mangler.mangle_type(record.module_name(), &record.name)
}

fn emit_functions(ctx: &mut CodegenContext<'_>) {
    let unit = ctx.unit;
    for function in &unit.functions {
        tracing::debug!(
            module = function.module_name(),
            name = %function.name,
            "emitting function"
        );
        emit_function_preamble(ctx, function);
        match ctx.options.mode {
            EmitMode::Full => emit_full_function(ctx, function),
            EmitMode::Stubs => emit_stub_function(ctx, function),
        }
        ctx.out.newline();
    }
}

/// Doc comment, optional span comment and optional `#line` marker.
fn emit_function_preamble(ctx: &mut CodegenContext<'_>, function: &Function) {
    let stmts = function.stmt_count(ctx.arena());
    ctx.out.writeln(&format!(
        "/* fn {}: params={} stmts={stmts} */",
        comment_text(&qualified_name(function.module_name(), &function.name)),
        function.param_count(),
    ));
    if ctx.options.emit_debug_comments {
        ctx.out.writeln(&format!("/* span {} */", function.span));
    }
    if ctx.options.emit_line_markers {
        if let Some(line) = function.span.line() {
            ctx.out
                .writeln(&format!("#line {line} {}", line_marker_file(function.module_name())));
        }
    }
}

fn emit_full_function<'a>(ctx: &mut CodegenContext<'a>, function: &'a Function) {
    let ret = return_type(ctx, function);
    let signature = ctx.signature(function);
    ctx.out.writeln(&format!("{signature} {{"));
    ctx.out.indent();

    let arena = ctx.arena();
    let body = function
        .body
        .filter(|&body| matches!(arena.kind(body), Some(NodeKind::Block(_))));
    match body {
        Some(body) => {
            ctx.begin_body(function.module_name(), &function.params);
            emit_body(ctx, body);
            if ret != "void" && !ends_in_return(ctx, body) {
                ctx.out.writeln(&format!("return {};", zero_value(&ret)));
            }
            ctx.end_body();
        }
        None => emit_trivial_return(ctx, &ret),
    }

    ctx.out.dedent();
    ctx.out.writeln("}");
}

fn emit_stub_function(ctx: &mut CodegenContext<'_>, function: &Function) {
    let ret = return_type(ctx, function);
    let signature = ctx.signature(function);
    ctx.out.writeln(&format!("{signature} {{"));
    ctx.out.indent();
    for param in &function.params {
        ctx.out
            .writeln(&format!("(void){};", local_identifier(&param.name)));
    }
    ctx.out.writeln("/* stub */");
    emit_trivial_return(ctx, &ret);
    ctx.out.dedent();
    ctx.out.writeln("}");
}

fn emit_trivial_return(ctx: &mut CodegenContext<'_>, ret: &str) {
    if ret == "void" {
        ctx.out.writeln("return;");
    } else {
        ctx.out.writeln(&format!("return {};", zero_value(ret)));
    }
}

fn return_type(ctx: &CodegenContext<'_>, function: &Function) -> String {
    ctx.resolver()
        .resolve_return(function.ret.as_deref(), Some(function.module_name()))
}

/// Synthesize `int main(void)`.
fn emit_main(ctx: &mut CodegenContext<'_>) {
    let unit = ctx.unit;
    let Some(first) = unit.entrypoints.first() else {
        ctx.out.writeln("int main(void) {");
        ctx.out.indent();
        ctx.out.writeln("/* bootstrap: no entrypoints found */");
        ctx.out.writeln("return 0;");
        ctx.out.dedent();
        ctx.out.writeln("}");
        return;
    };

    ctx.out
        .writeln(&format!("/* entrypoints: {} */", unit.entrypoints.len()));
    for entry in &unit.entrypoints {
        ctx.out.writeln(&format!(
            "/* entrypoint: {} */",
            comment_text(&qualified_name(&entry.module_path, &entry.symbol))
        ));
    }

    let inline_body = match (ctx.options.mode, first.body) {
        (EmitMode::Full, Some(body)) if unit.arena.get(body).is_some() => Some(body),
        _ => None,
    };

    if let Some(body) = inline_body {
        tracing::debug!(entrypoint = %first.symbol, "inlining entrypoint body into main");
        ctx.out.writeln("int main(void) {");
        ctx.out.indent();
        ctx.begin_main_body(&first.module_path);
        match unit.arena.kind(body) {
            Some(NodeKind::Block(stmts)) => emit_stmts(ctx, stmts),
            _ => emit_body(ctx, body),
        }
        ctx.end_body();
        if !ends_in_return(ctx, body) {
            ctx.out.writeln("return 0;");
        }
    } else {
        let call = entrypoint_call(ctx, first);
        ctx.out.writeln("int main(void) {");
        ctx.out.indent();
        ctx.out.writeln(&call);
        ctx.out.writeln("return 0;");
    }
    ctx.out.dedent();
    ctx.out.writeln("}");
}

/// Build the call to the entrypoint symbol, declaring it first when no
/// unit function provides it.
fn entrypoint_call(ctx: &mut CodegenContext<'_>, entry: &Entrypoint) -> String {
    let unit = ctx.unit;
    if let Some(function) = unit.find_function(&entry.module_path, &entry.symbol) {
        let args: Vec<_> = function
            .params
            .iter()
            .map(|p| {
                let ty = ctx.resolver().resolve(&p.ty, Some(function.module_name()));
                format!("({ty}){{0}}")
            })
            .collect();
        let symbol = ctx.function_symbol(function);
        return format!("{symbol}({});", args.join(", "));
    }

    let symbol = ctx.mangler.mangle_function(&entry.module_path, &entry.symbol);
    ctx.out.writeln(&format!("extern int64_t {symbol}(void);"));
    ctx.out.newline();
    format!("{symbol}();")
}

/// Zero value for a resolved C type.
pub(crate) fn zero_value(c_type: &str) -> String {
    if c_type.ends_with('*') {
        "NULL".to_string()
    } else if is_scalar_c_type(c_type) {
        "0".to_string()
    } else {
        format!("({c_type}){{0}}")
    }
}

fn qualified_name(module: &str, name: &str) -> String {
    if module.is_empty() {
        name.to_string()
    } else {
        format!("{module}::{name}")
    }
}

/// Keep caller-provided text from closing a block comment early.
fn comment_text(text: &str) -> String {
    text.replace("*/", "* /")
}

/// Quoted file name for a `#line` marker.
fn line_marker_file(module: &str) -> String {
    if module.is_empty() {
        emit_string_literal("bootc")
    } else {
        emit_string_literal(module)
    }
}
