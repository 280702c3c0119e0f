//! Statement Code Generation
//!
//! Lowers statement nodes into indented C lines. Statements the emitter
//! does not understand become comment placeholders so the rest of the body
//! still lowers.

use bootc_ir::{BinaryOp, IfBranch, NodeId, NodeKind};
use bootc_stack::ensure_sufficient_stack;

use crate::context::CodegenContext;
use crate::expr::{binary_precedence, emit_expr, emit_expr_prec, infer_local_type};
use crate::ident::{is_valid_c_identifier, local_identifier};
use crate::locals::LocalType;

/// Loop variable name when the node carries none.
const DEFAULT_LOOP_VAR: &str = "i";

/// Emit C code for a single statement.
pub fn emit_stmt(ctx: &mut CodegenContext<'_>, id: NodeId) {
    ensure_sufficient_stack(|| {
        let Some(kind) = ctx.arena().kind(id) else {
            emit_unsupported(ctx, "dangling node");
            return;
        };

        match kind {
            NodeKind::Assign { target, value } => emit_assign(ctx, *target, *value),

            NodeKind::ExprStmt(expr) => {
                let expr = emit_expr(ctx, *expr);
                ctx.out.writeln(&format!("{expr};"));
            }

            NodeKind::Return(value) => {
                if let Some(value) = value {
                    let value = emit_expr(ctx, *value);
                    ctx.out.writeln(&format!("return {value};"));
                } else {
                    let ret = ctx.bare_return();
                    ctx.out.writeln(ret);
                }
            }

            NodeKind::If(branches) => emit_if_chain(ctx, branches),

            NodeKind::For {
                var,
                start,
                end,
                step,
                body,
            } => emit_for(
                ctx,
                var.as_deref().unwrap_or(DEFAULT_LOOP_VAR),
                *start,
                *end,
                *step,
                *body,
            ),

            NodeKind::Block(stmts) => {
                ctx.out.writeln("{");
                ctx.out.indent();
                emit_stmts(ctx, stmts);
                ctx.out.dedent();
                ctx.out.writeln("}");
            }

            other => emit_unsupported(ctx, other.name()),
        }
    });
}

/// Emit a sequence of statements at the current indentation.
pub fn emit_stmts(ctx: &mut CodegenContext<'_>, stmts: &[NodeId]) {
    for &stmt in stmts {
        emit_stmt(ctx, stmt);
    }
}

/// Emit the contents of a body: a block's children inline, anything else
/// as a single statement.
pub fn emit_body(ctx: &mut CodegenContext<'_>, id: NodeId) {
    match ctx.arena().kind(id) {
        Some(NodeKind::Block(stmts)) => emit_stmts(ctx, stmts),
        _ => emit_stmt(ctx, id),
    }
}

/// Check whether a body's last statement is a `return`.
pub fn ends_in_return(ctx: &CodegenContext<'_>, id: NodeId) -> bool {
    let arena = ctx.arena();
    let last = match arena.kind(id) {
        Some(NodeKind::Block(stmts)) => stmts.last().copied(),
        _ => Some(id),
    };
    matches!(last.and_then(|last| arena.kind(last)), Some(NodeKind::Return(_)))
}

fn emit_unsupported(ctx: &mut CodegenContext<'_>, kind: &str) {
    tracing::debug!(kind, "unsupported statement replaced with placeholder");
    ctx.out.writeln(&format!("/* unsupported statement: {kind} */"));
}

/// Emit an assignment, declaring the target on first use.
fn emit_assign(ctx: &mut CodegenContext<'_>, target: NodeId, value: NodeId) {
    let rendered_value = emit_expr(ctx, value);

    let declarable = match ctx.arena().kind(target) {
        Some(NodeKind::Ident(name)) => Some(name.as_str()),
        Some(NodeKind::Path(segments)) if segments.len() == 1 => {
            segments.first().map(String::as_str)
        }
        _ => None,
    }
    .filter(|name| is_valid_c_identifier(name) && !ctx.locals.contains(name));

    if let Some(name) = declarable {
        let ty = infer_local_type(ctx, value);
        ctx.out
            .writeln(&format!("{} {name} = {rendered_value};", ty.c_type()));
        ctx.locals.declare(name, ty);
    } else {
        let target = emit_expr(ctx, target);
        ctx.out.writeln(&format!("{target} = {rendered_value};"));
    }
}

/// Emit an if / else-if / else chain.
fn emit_if_chain(ctx: &mut CodegenContext<'_>, branches: &[IfBranch]) {
    let Some(first) = branches.first() else {
        return;
    };

    // A chain that opens without a condition is just a scope.
    if first.cond.is_none() {
        ctx.out.writeln("{");
        ctx.out.indent();
        emit_body(ctx, first.body);
        ctx.out.dedent();
        ctx.out.writeln("}");
        warn_dropped(branches.len() - 1);
        return;
    }

    for (index, branch) in branches.iter().enumerate() {
        match branch.cond {
            Some(cond) => {
                let cond = emit_expr(ctx, cond);
                if index == 0 {
                    ctx.out.writeln(&format!("if ({cond}) {{"));
                } else {
                    ctx.out.writeln(&format!("}} else if ({cond}) {{"));
                }
            }
            None => {
                ctx.out.writeln("} else {");
            }
        }

        ctx.out.indent();
        emit_body(ctx, branch.body);
        ctx.out.dedent();

        if branch.cond.is_none() {
            warn_dropped(branches.len() - index - 1);
            break;
        }
    }
    ctx.out.writeln("}");
}

fn warn_dropped(count: usize) {
    if count > 0 {
        tracing::warn!(count, "branches after an unconditional else were dropped");
    }
}

/// Emit a counting loop `for (T v = start; v < end; v += step)`.
///
/// The loop variable is visible to the body only.
fn emit_for(
    ctx: &mut CodegenContext<'_>,
    var: &str,
    start: NodeId,
    end: NodeId,
    step: Option<NodeId>,
    body: NodeId,
) {
    let var = local_identifier(var);
    let ty = if infer_local_type(ctx, start).is_float() {
        LocalType::Float
    } else {
        LocalType::Int
    };
    let init = emit_expr(ctx, start);

    let fresh = ctx.locals.declare(&var, ty.clone());
    let limit = emit_expr_prec(ctx, end, binary_precedence(BinaryOp::Lt) + 1);
    let advance = match step {
        Some(step) => format!("{var} += {}", emit_expr(ctx, step)),
        None => format!("++{var}"),
    };

    ctx.out.writeln(&format!(
        "for ({} {var} = {init}; {var} < {limit}; {advance}) {{",
        ty.c_type()
    ));
    ctx.out.indent();
    emit_body(ctx, body);
    ctx.out.dedent();
    ctx.out.writeln("}");

    if fresh {
        ctx.locals.forget(&var);
    }
}
