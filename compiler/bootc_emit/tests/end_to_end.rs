//! End-to-end emission tests: whole units in, C text or files out.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bootc_emit::{
    emit_to_buffers, emit_to_path, EmitError, EmitMode, EmitOptions, ErrorCode, MangleStyle,
    RuntimeStyle, WriteCallback,
};
use bootc_ir::{BinaryOp, Entrypoint, Field, Function, Module, ProgramUnit, RecordType, Span};
use pretty_assertions::assert_eq;

/// `demo.core` with a `Pair` record and `main(argc)`, optionally with a
/// lowered program body on the entrypoint.
fn demo_unit(entry_body: bool) -> ProgramUnit {
    let mut unit = ProgramUnit::new();
    let a = &mut unit.arena;

    let total = a.ident("total");
    let argc = a.ident("argc");
    let one = a.int("1");
    let sum = a.binary(BinaryOp::Add, argc, one);
    let assign = a.assign(total, sum);
    let print = a.ident("print");
    let total_arg = a.ident("total");
    let call = a.call(print, vec![total_arg]);
    let print_stmt = a.expr_stmt(call);
    let total_ret = a.ident("total");
    let ret = a.ret(Some(total_ret));
    let body = a.block(vec![assign, print_stmt, ret]);

    let program = if entry_body {
        let greeting = a.ident("greeting");
        let hi = a.string("hi");
        let assign = a.assign(greeting, hi);
        let print = a.ident("print");
        let greeting_arg = a.ident("greeting");
        let call = a.call(print, vec![greeting_arg]);
        let stmt = a.expr_stmt(call);
        Some(a.block(vec![assign, stmt]))
    } else {
        None
    };

    unit.modules.push(Module {
        name: "demo.core".to_string(),
        span: Span::new(0, 120).with_line(1),
    });
    unit.records.push(RecordType {
        name: "Pair".to_string(),
        module: Some("demo.core".to_string()),
        fields: vec![Field::new("left", "i64"), Field::new("right", "i64")],
    });
    unit.functions.push(Function {
        name: "main".to_string(),
        module: Some("demo.core".to_string()),
        params: vec![Field::new("argc", "i64")],
        ret: None,
        body: Some(body),
        span: Span::new(10, 80).with_line(3),
    });
    unit.entrypoints.push(Entrypoint {
        module_path: "demo.core".to_string(),
        symbol: "main".to_string(),
        body: program,
    });
    unit
}

fn full() -> EmitOptions {
    EmitOptions::default().with_mode(EmitMode::Full)
}

const PRINT_HELPER: &str = "\
#include <stdio.h>

static inline void bootc_rt_print_i64(int64_t v) { printf(\"%lld\\n\", (long long)v); }
static inline void bootc_rt_print_f64(double v) { printf(\"%g\\n\", v); }
static inline void bootc_rt_print_bool(bool v) { printf(\"%s\\n\", v ? \"true\" : \"false\"); }
static inline void bootc_rt_print_str(const char *v) { printf(\"%s\\n\", v); }
#define bootc_rt_print(x) _Generic((x), \\
  bool: bootc_rt_print_bool, \\
  float: bootc_rt_print_f64, \\
  double: bootc_rt_print_f64, \\
  char *: bootc_rt_print_str, \\
  const char *: bootc_rt_print_str, \\
  default: bootc_rt_print_i64)(x)
";

#[test]
fn full_mode_demo_inlines_entry_body() {
    let unit = demo_unit(true);
    let out = emit_to_buffers(Some(&unit), Some(&full())).unwrap();
    assert!(out.header.is_none());

    let expected = format!(
        "\
/* Generated by bootc. Do not edit. */
#include <stdint.h>
#include <stddef.h>
#include <stdbool.h>
{PRINT_HELPER}
/* module: demo.core */

typedef struct bootc_demo_core_Pair bootc_demo_core_Pair;

/* record demo.core::Pair */
struct bootc_demo_core_Pair {{
  int64_t left;
  int64_t right;
}};

/* fn demo.core::main: params=1 stmts=3 */
int64_t bootc_demo_core_main(int64_t argc) {{
  int64_t total = argc + 1;
  bootc_rt_print(total);
  return total;
}}

/* entrypoints: 1 */
/* entrypoint: demo.core::main */
int main(void) {{
  const char * greeting = \"hi\";
  bootc_rt_print(greeting);
  return 0;
}}
"
    );
    assert_eq!(out.source, expected);
}

#[test]
fn full_mode_without_entry_body_calls_stub() {
    let unit = demo_unit(false);
    let out = emit_to_buffers(Some(&unit), Some(&full())).unwrap();
    assert!(out.source.ends_with(
        "\
/* entrypoints: 1 */
/* entrypoint: demo.core::main */
int main(void) {
  bootc_demo_core_main((int64_t){0});
  return 0;
}
"
    ));
}

#[test]
fn stub_mode_demo() {
    let unit = demo_unit(true);
    let out = emit_to_buffers(Some(&unit), None).unwrap();
    assert!(!out.source.contains("stdio.h"));
    assert!(out.source.contains(
        "\
/* fn demo.core::main: params=1 stmts=3 */
int64_t bootc_demo_core_main(int64_t argc) {
  (void)argc;
  /* stub */
  return 0;
}
"
    ));
    assert!(out.source.contains("  bootc_demo_core_main((int64_t){0});\n"));
}

#[test]
fn inlined_bare_return_returns_zero_from_main() {
    let mut unit = ProgramUnit::new();
    let a = &mut unit.arena;
    let x = a.ident("x");
    let one = a.int("1");
    let assign = a.assign(x, one);
    let zero = a.int("0");
    let limit = a.int("3");
    let early = a.ret(None);
    let loop_body = a.block(vec![early]);
    let for_loop = a.for_range(None, zero, limit, None, loop_body);
    let done = a.ret(None);
    let body = a.block(vec![assign, for_loop, done]);
    unit.entrypoints.push(Entrypoint {
        module_path: String::new(),
        symbol: "main".to_string(),
        body: Some(body),
    });

    let out = emit_to_buffers(Some(&unit), Some(&full())).unwrap().source;
    assert!(out.ends_with(
        "\
int main(void) {
  int64_t x = 1;
  for (int64_t i = 0; i < 3; ++i) {
    return 0;
  }
  return 0;
}
"
    ));
    assert!(!out.contains("return;"));
}

#[test]
fn empty_unit_gets_bootstrap_main() {
    let unit = ProgramUnit::new();
    let out = emit_to_buffers(Some(&unit), None).unwrap();
    assert_eq!(
        out.source,
        "\
/* Generated by bootc. Do not edit. */
#include <stdint.h>
#include <stddef.h>
#include <stdbool.h>

/* modules: (none) */

int main(void) {
  /* bootstrap: no entrypoints found */
  return 0;
}
"
    );
}

#[test]
fn unmatched_entrypoint_is_declared_extern() {
    let mut unit = ProgramUnit::new();
    unit.entrypoints.push(Entrypoint {
        module_path: "app".to_string(),
        symbol: "start".to_string(),
        body: None,
    });
    let out = emit_to_buffers(Some(&unit), None).unwrap();
    assert!(out.source.contains(
        "\
extern int64_t bootc_app_start(void);

int main(void) {
  bootc_app_start();
  return 0;
}
"
    ));
}

#[test]
fn missing_or_malformed_body_gets_trivial_return() {
    let mut unit = ProgramUnit::new();
    let not_a_block = unit.arena.int("1");
    for (name, ret, body) in [
        ("none", None, None),
        ("dangling", Some("void"), Some(bootc_ir::NodeId::new(77))),
        ("literal", Some("f64"), Some(not_a_block)),
    ] {
        unit.functions.push(Function {
            name: name.to_string(),
            module: None,
            params: vec![],
            ret: ret.map(str::to_string),
            body,
            span: Span::DUMMY,
        });
    }
    let out = emit_to_buffers(Some(&unit), Some(&full())).unwrap().source;
    assert!(out.contains("int64_t bootc_none(void) {\n  return 0;\n}\n"));
    assert!(out.contains("void bootc_dangling(void) {\n  return;\n}\n"));
    assert!(out.contains("/* fn literal: params=0 stmts=0 */\ndouble bootc_literal(void) {\n  return 0;\n}\n"));
}

#[test]
fn body_without_trailing_return_gets_fallback() {
    let mut unit = ProgramUnit::new();
    let a = &mut unit.arena;
    let x = a.ident("x");
    let pi = a.float("3.5");
    let assign = a.assign(x, pi);
    let body = a.block(vec![assign]);
    unit.records.push(RecordType {
        name: "Empty".to_string(),
        module: None,
        fields: vec![],
    });
    unit.functions.push(Function {
        name: "make".to_string(),
        module: None,
        params: vec![],
        ret: Some("Empty".to_string()),
        body: Some(body),
        span: Span::DUMMY,
    });
    let out = emit_to_buffers(Some(&unit), Some(&full())).unwrap().source;
    assert!(out.contains(
        "struct bootc_Empty {\n  /* (no fields) */\n  char _unused;\n};\n"
    ));
    assert!(out.contains(
        "bootc_Empty bootc_make(void) {\n  double x = 3.5;\n  return (bootc_Empty){0};\n}\n"
    ));
}

#[test]
fn debug_comments_and_line_markers() {
    let unit = demo_unit(false);
    let options = full().with_debug_comments(true).with_line_markers(true);
    let out = emit_to_buffers(Some(&unit), Some(&options)).unwrap().source;
    assert!(out.contains("/* mode=full mangle=simple runtime=none */\n"));
    assert!(out.contains(
        "/* fn demo.core::main: params=1 stmts=3 */\n/* span 10..80 */\n#line 3 \"demo.core\"\n"
    ));
}

#[test]
fn external_runtime_replaces_print_helper() {
    let unit = demo_unit(true);
    let options = full()
        .with_runtime(RuntimeStyle::External)
        .with_runtime_header("rt/support.h");
    let out = emit_to_buffers(Some(&unit), Some(&options)).unwrap().source;
    assert!(out.contains("#include <stdbool.h>\n#include \"rt/support.h\"\n"));
    assert!(!out.contains("stdio.h"));
    assert!(out.contains("bootc_rt_print(greeting);"));
}

#[test]
fn hashed_mangling_is_stable() {
    let unit = demo_unit(false);
    let options = EmitOptions::default().with_mangle(MangleStyle::Hashed);
    let first = emit_to_buffers(Some(&unit), Some(&options)).unwrap();
    let second = emit_to_buffers(Some(&unit), Some(&options)).unwrap();
    assert_eq!(first, second);

    let line = first
        .source
        .lines()
        .find(|l| l.starts_with("int64_t bootc_demo_core_main__"))
        .expect("hashed definition");
    let hash = &line["int64_t bootc_demo_core_main__".len()..][..8];
    assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(line.as_bytes()["int64_t bootc_demo_core_main__".len() + 8], b'(');
}

#[test]
fn custom_namespace_prefix() {
    let unit = demo_unit(false);
    let options = EmitOptions::default().with_namespace_prefix("app_");
    let out = emit_to_buffers(Some(&unit), Some(&options)).unwrap().source;
    assert!(out.contains("typedef struct app_demo_core_Pair app_demo_core_Pair;"));
    assert!(out.contains("app_demo_core_main((int64_t){0});"));
}

#[test]
fn buffers_with_header_use_default_base() {
    let unit = demo_unit(false);
    let options = EmitOptions::default().with_header(true);
    let out = emit_to_buffers(Some(&unit), Some(&options)).unwrap();
    assert!(out.source.contains("#include \"bootc_out.h\"\n"));
    let header = out.header.expect("header requested");
    assert!(header.contains("#ifndef BOOTC_BOOTC_OUT_H\n"));
    assert!(header.contains("int64_t bootc_demo_core_main(int64_t argc);\n"));
}

#[test]
fn missing_unit_is_invalid_argument() {
    let err = emit_to_buffers(None, None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidArgument);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.c");
    let result = emit_to_path(None, &dest, None);
    assert_eq!(ErrorCode::of(&result), ErrorCode::InvalidArgument);
    assert!(!dest.exists());
}

#[test]
fn empty_path_is_invalid_argument() {
    let unit = ProgramUnit::new();
    let err = emit_to_path(Some(&unit), "", None).unwrap_err();
    assert!(matches!(err, EmitError::InvalidArgument(_)));
}

fn dir_entries(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<_> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn path_output_with_header() {
    for dest in ["out", "out.c"] {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("build");
        std::fs::create_dir(&build).unwrap();

        let unit = demo_unit(true);
        let options = full().with_header(true);
        let paths = emit_to_path(Some(&unit), build.join(dest), Some(&options)).unwrap();

        assert_eq!(paths.source, build.join("out.c"));
        assert_eq!(paths.header, Some(build.join("out.h")));
        assert_eq!(dir_entries(&build), vec!["out.c", "out.h"]);

        let source = std::fs::read_to_string(build.join("out.c")).unwrap();
        let header = std::fs::read_to_string(build.join("out.h")).unwrap();
        assert!(source.contains("#include \"out.h\"\n"));
        assert!(header.starts_with("/* Generated by bootc. Do not edit. */\n#ifndef BOOTC_OUT_H\n"));
        assert_eq!(
            emit_to_buffers(Some(&unit), Some(&options.clone().with_header_base_name("out")))
                .unwrap()
                .source,
            source
        );
    }
}

#[test]
fn header_base_name_only_renames_the_guard() {
    let dir = tempfile::tempdir().unwrap();
    let unit = demo_unit(false);
    let options = EmitOptions::default()
        .with_header(true)
        .with_header_base_name("lib");
    let paths = emit_to_path(Some(&unit), dir.path().join("out"), Some(&options)).unwrap();

    assert_eq!(paths.header, Some(dir.path().join("out.h")));
    assert_eq!(dir_entries(dir.path()), vec!["out.c", "out.h"]);

    let source = std::fs::read_to_string(&paths.source).unwrap();
    let header = std::fs::read_to_string(dir.path().join("out.h")).unwrap();
    assert!(source.contains("#include \"out.h\"\n"));
    assert!(!source.contains("lib.h"));
    assert!(header.contains("#ifndef BOOTC_LIB_H\n#define BOOTC_LIB_H\n"));
}

#[test]
fn path_output_without_header_is_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("single.c");
    let unit = ProgramUnit::new();
    let paths = emit_to_path(Some(&unit), &dest, None).unwrap();
    assert_eq!(paths.source, dest);
    assert_eq!(paths.header, None);
    assert_eq!(dir_entries(dir.path()), vec!["single.c"]);
}

#[test]
fn missing_parent_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let unit = ProgramUnit::new();
    let result = emit_to_path(Some(&unit), dir.path().join("nope").join("out.c"), None);
    assert_eq!(ErrorCode::of(&result), ErrorCode::IoError);
}

#[test]
fn callback_sink_receives_both_artifacts() {
    let seen: Arc<Mutex<Vec<(PathBuf, String)>>> = Arc::default();
    let recorder = Arc::clone(&seen);
    let options = full()
        .with_header(true)
        .with_sink(WriteCallback::new(move |path, bytes| {
            let text = String::from_utf8(bytes.to_vec()).unwrap();
            recorder.lock().unwrap().push((path.to_path_buf(), text));
            0
        }));

    let unit = demo_unit(true);
    let paths = emit_to_path(Some(&unit), "virtual/demo.h", Some(&options)).unwrap();
    assert_eq!(paths.source, PathBuf::from("virtual/demo.c"));

    let seen = seen.lock().unwrap();
    let written: Vec<_> = seen.iter().map(|(p, _)| p.clone()).collect();
    assert_eq!(
        written,
        vec![PathBuf::from("virtual/demo.c"), PathBuf::from("virtual/demo.h")]
    );
    assert!(seen[0].1.contains("#include \"demo.h\""));
    assert!(seen[1].1.contains("#define BOOTC_DEMO_H"));
}

#[test]
fn callback_failure_is_io_error() {
    let calls = Arc::new(Mutex::new(0_u32));
    let counter = Arc::clone(&calls);
    let options = EmitOptions::default()
        .with_header(true)
        .with_sink(WriteCallback::new(move |_, _| {
            *counter.lock().unwrap() += 1;
            -1
        }));

    let unit = ProgramUnit::new();
    let err = emit_to_path(Some(&unit), "x", Some(&options)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::IoError);
    assert!(matches!(err, EmitError::SinkRejected { status: -1, .. }));
    assert_eq!(*calls.lock().unwrap(), 1);
}
