//! Expression Code Generation
//!
//! Renders expression trees as C text, inserting parentheses only where C
//! precedence and left associativity require them.
//!
//! Each node reports its own precedence; a parent demands a minimum
//! precedence for each child and the child is wrapped when it falls short.
//! Binary nodes demand their own precedence on the left and one more on the
//! right, so `a - b - c` stays flat while `a - (b - c)` keeps its parens.

use bootc_ir::{BinaryOp, Literal, NodeId, NodeKind, UnaryOp};
use bootc_stack::ensure_sufficient_stack;

use crate::context::CodegenContext;
use crate::ident::local_identifier;
use crate::locals::LocalType;

/// Literals, identifiers, paths and calls.
pub const PREC_PRIMARY: u8 = 100;
/// Prefix operators.
pub const PREC_UNARY: u8 = 90;
/// Unsupported nodes; always parenthesized inside operators.
pub const PREC_UNSUPPORTED: u8 = 0;

/// Precedence of a binary operator.
pub const fn binary_precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Or => 10,
        BinaryOp::And => 20,
        BinaryOp::Eq | BinaryOp::NotEq => 30,
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 40,
        BinaryOp::Add | BinaryOp::Sub => 50,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 60,
    }
}

/// Generate C code for an expression in a context that demands nothing.
pub fn emit_expr(ctx: &CodegenContext<'_>, id: NodeId) -> String {
    emit_expr_prec(ctx, id, 0)
}

/// Generate C code for an expression whose parent demands `min_prec`.
pub fn emit_expr_prec(ctx: &CodegenContext<'_>, id: NodeId, min_prec: u8) -> String {
    ensure_sufficient_stack(|| {
        let (text, prec) = render(ctx, id);
        if prec < min_prec {
            format!("({text})")
        } else {
            text
        }
    })
}

/// Render a node and report its precedence.
fn render(ctx: &CodegenContext<'_>, id: NodeId) -> (String, u8) {
    let Some(node) = ctx.arena().get(id) else {
        return (unsupported("dangling node"), PREC_UNSUPPORTED);
    };

    match &node.kind {
        NodeKind::Literal(lit) => (emit_literal(lit), PREC_PRIMARY),
        NodeKind::Ident(name) => (ctx.value_name(name), PREC_PRIMARY),
        NodeKind::Path(segments) => (ctx.path_name(segments), PREC_PRIMARY),

        NodeKind::Call { callee, args } => {
            let callee = emit_callee(ctx, *callee);
            let args: Vec<_> = args.iter().map(|&arg| emit_expr(ctx, arg)).collect();
            (format!("{callee}({})", args.join(", ")), PREC_PRIMARY)
        }

        NodeKind::Unary { op, operand } => {
            let mut inner = emit_expr_prec(ctx, *operand, PREC_UNARY);
            // `- -x` must not collapse into the decrement operator.
            if *op == UnaryOp::Neg && inner.starts_with('-') {
                inner = format!("({inner})");
            }
            (format!("{}{inner}", op.as_symbol()), PREC_UNARY)
        }

        NodeKind::Binary { op, left, right } => {
            let prec = binary_precedence(*op);
            let left = emit_expr_prec(ctx, *left, prec);
            let right = emit_expr_prec(ctx, *right, prec + 1);
            (format!("{left} {} {right}", op.as_symbol()), prec)
        }

        other => (unsupported(other.name()), PREC_UNSUPPORTED),
    }
}

/// Emit a callee expression (the function being called).
///
/// Unit functions win over the print builtin so a user-defined `print`
/// keeps its own symbol.
fn emit_callee(ctx: &CodegenContext<'_>, id: NodeId) -> String {
    match ctx.arena().kind(id) {
        Some(NodeKind::Ident(name)) => {
            if name == "print"
                && !ctx.locals.contains(name)
                && ctx.lookup_function(None, name).is_none()
            {
                ctx.print_symbol()
            } else {
                ctx.value_name(name)
            }
        }
        Some(NodeKind::Path(segments)) => ctx.path_name(segments),
        _ => emit_expr_prec(ctx, id, PREC_PRIMARY),
    }
}

fn unsupported(kind: &str) -> String {
    format!("0 /* unsupported expression: {kind} */")
}

/// Render a literal.
pub fn emit_literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(text) | Literal::Float(text) => strip_separators(text),
        Literal::Str(value) => emit_string_literal(value),
        Literal::Bool(b) => b.to_string(),
    }
}

/// Drop digit-grouping separators (`1_000_000`, `1,000`, `1'000`).
fn strip_separators(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '_' | ',' | '\'')).collect()
}

/// Emit a C string literal, escaping byte by byte.
///
/// Control bytes without a named escape become `\xHH`. Because a C hex
/// escape swallows every following hex digit, the literal is split
/// (`"\x01" "a"`) when a hex digit follows one; `\0` is split from
/// a following octal digit the same way. Non-ASCII text passes
/// through as UTF-8.
pub fn emit_string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut after_hex_escape = false;
    let mut after_nul = false;
    for c in s.chars() {
        if (after_hex_escape && c.is_ascii_hexdigit()) || (after_nul && matches!(c, '0'..='7')) {
            out.push_str("\" \"");
        }
        after_hex_escape = false;
        after_nul = false;
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => {
                out.push_str("\\0");
                after_nul = true;
            }
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\u{0b}' => out.push_str("\\v"),
            c if c.is_ascii_control() => {
                out.push_str(&format!("\\x{:02x}", u32::from(c)));
                after_hex_escape = true;
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Infer the C type of a value for a first assignment.
///
/// Comparisons, logical operators and `!` are `bool`; arithmetic is
/// `double` when either side is floating and `int64_t` otherwise. Strings
/// never propagate through arithmetic.
pub fn infer_local_type(ctx: &CodegenContext<'_>, id: NodeId) -> LocalType {
    ensure_sufficient_stack(|| match ctx.arena().kind(id) {
        Some(NodeKind::Literal(Literal::Bool(_))) => LocalType::Bool,
        Some(NodeKind::Literal(Literal::Float(_))) => LocalType::Float,
        Some(NodeKind::Literal(Literal::Str(_))) => LocalType::Str,
        Some(NodeKind::Ident(name)) => ctx
            .locals
            .get(&local_identifier(name))
            .cloned()
            .unwrap_or(LocalType::Int),
        Some(NodeKind::Unary { op: UnaryOp::Not, .. }) => LocalType::Bool,
        Some(NodeKind::Unary { op: UnaryOp::Neg, operand }) => {
            if infer_local_type(ctx, *operand).is_float() {
                LocalType::Float
            } else {
                LocalType::Int
            }
        }
        Some(NodeKind::Binary { op, left, right }) if op.is_arithmetic() => {
            if infer_local_type(ctx, *left).is_float() || infer_local_type(ctx, *right).is_float()
            {
                LocalType::Float
            } else {
                LocalType::Int
            }
        }
        Some(NodeKind::Binary { .. }) => LocalType::Bool,
        _ => LocalType::Int,
    })
}
