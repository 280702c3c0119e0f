//! bootc IR - resolved program representation
//!
//! The data the bootstrap front end produces and the C emitter consumes:
//! - Spans for source locations
//! - Binary/unary operators
//! - Statement/expression nodes in a flat arena, addressed by `NodeId`
//! - The `ProgramUnit` of modules, records, functions and entrypoints
//!
//! The backend only ever borrows these types immutably.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod node;
mod operators;
mod span;
mod unit;

pub use node::{IfBranch, Literal, Node, NodeArena, NodeId, NodeKind};
pub use operators::{BinaryOp, UnaryOp};
pub use span::Span;
pub use unit::{Entrypoint, Field, Function, Module, ProgramUnit, RecordType};
