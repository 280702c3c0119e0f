//! Property-based tests for identifier sanitization and symbol mangling.
//!
//! 1. Sanitization is total: any input yields a non-empty, bounded, valid
//!    C identifier
//! 2. Mangling is pure: equal inputs always give equal symbols
//! 3. Emission is deterministic for generated expression trees

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use bootc_emit::{
    emit_to_buffers, qualify, sanitize_identifier, EmitMode, EmitOptions, MangleStyle, Mangler,
    MAX_IDENT_LEN,
};
use bootc_ir::{BinaryOp, Entrypoint, NodeArena, NodeId, ProgramUnit};
use proptest::prelude::*;

fn is_identifier_shaped(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn style_strategy() -> impl Strategy<Value = MangleStyle> {
    prop_oneof![Just(MangleStyle::Simple), Just(MangleStyle::Hashed)]
}

fn binary_op_strategy() -> impl Strategy<Value = BinaryOp> {
    prop_oneof![
        Just(BinaryOp::Or),
        Just(BinaryOp::And),
        Just(BinaryOp::Eq),
        Just(BinaryOp::Lt),
        Just(BinaryOp::Add),
        Just(BinaryOp::Sub),
        Just(BinaryOp::Mul),
        Just(BinaryOp::Div),
    ]
}

/// Expression shape: a leaf identifier or a binary node.
#[derive(Debug, Clone)]
enum Shape {
    Leaf(String),
    Binary(BinaryOp, Box<Shape>, Box<Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop::string::string_regex("[a-z]{1,3}")
        .expect("valid regex")
        .prop_map(Shape::Leaf);
    leaf.prop_recursive(6, 32, 2, |inner| {
        (binary_op_strategy(), inner.clone(), inner)
            .prop_map(|(op, l, r)| Shape::Binary(op, Box::new(l), Box::new(r)))
    })
}

fn build(arena: &mut NodeArena, shape: &Shape) -> NodeId {
    match shape {
        Shape::Leaf(name) => arena.ident(name),
        Shape::Binary(op, l, r) => {
            let l = build(arena, l);
            let r = build(arena, r);
            arena.binary(*op, l, r)
        }
    }
}

proptest! {
    #[test]
    fn sanitize_is_total(s in ".*") {
        let out = sanitize_identifier(&s);
        prop_assert!(!out.is_empty());
        prop_assert!(out.len() <= MAX_IDENT_LEN);
        prop_assert!(is_identifier_shaped(&out), "not an identifier: {:?}", out);
    }

    #[test]
    fn sanitize_is_idempotent(s in ".*") {
        let once = sanitize_identifier(&s);
        prop_assert_eq!(sanitize_identifier(&once), once);
    }

    #[test]
    fn qualify_is_identifier_shaped(
        module in ".{0,40}",
        name in ".{0,40}",
    ) {
        let out = qualify("bootc_", Some(&module), Some(&name), "fn");
        prop_assert!(is_identifier_shaped(&out));
        prop_assert!(out.starts_with("bootc_"));
    }

    #[test]
    fn mangling_is_pure(
        style in style_strategy(),
        module in "[a-z.]{0,12}",
        name in "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
    ) {
        let a = Mangler::new(style, "bootc_");
        let b = Mangler::new(style, "bootc_");
        prop_assert_eq!(a.mangle_function(&module, &name), b.mangle_function(&module, &name));
        prop_assert_eq!(a.mangle_type(&module, &name), b.mangle_type(&module, &name));
    }

    #[test]
    fn hashed_suffix_shape(
        module in "[a-z.]{0,12}",
        name in "[a-z]{1,12}",
    ) {
        let simple = Mangler::new(MangleStyle::Simple, "p_").mangle_function(&module, &name);
        let hashed = Mangler::new(MangleStyle::Hashed, "p_").mangle_function(&module, &name);
        let suffix = hashed.strip_prefix(simple.as_str()).expect("hashed extends simple");
        prop_assert_eq!(suffix.len(), 10);
        prop_assert!(suffix.starts_with("__"));
        prop_assert!(suffix[2..].chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn emission_is_deterministic(shape in shape_strategy()) {
        let mut unit = ProgramUnit::new();
        let expr = build(&mut unit.arena, &shape);
        let target = unit.arena.ident("result");
        let assign = unit.arena.assign(target, expr);
        let body = unit.arena.block(vec![assign]);
        unit.entrypoints.push(Entrypoint {
            module_path: "gen".to_string(),
            symbol: "main".to_string(),
            body: Some(body),
        });

        let options = EmitOptions::default().with_mode(EmitMode::Full);
        let first = emit_to_buffers(Some(&unit), Some(&options)).unwrap();
        let second = emit_to_buffers(Some(&unit), Some(&options)).unwrap();
        prop_assert_eq!(first, second);
    }
}
