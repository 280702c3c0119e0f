//! Statement/expression tree nodes.
//!
//! Nodes live in a flat [`NodeArena`] and refer to their children through
//! [`NodeId`] handles. Child order is carried by named fields, so an
//! assignment is always `{ target, value }` and a counting loop is always
//! `{ start, end, step, body }`.

use std::fmt;

use crate::{BinaryOp, Span, UnaryOp};

/// Index into the node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Invalid node ID (sentinel value).
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Literal payload.
///
/// Numeric literals keep their source text so the emitter can copy digits
/// verbatim.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Literal {
    Int(String),
    Float(String),
    Str(String),
    Bool(bool),
}

/// One `(condition, block)` pair of an if-chain.
///
/// A branch without a condition is the trailing `else`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct IfBranch {
    pub cond: Option<NodeId>,
    pub body: NodeId,
}

/// Node kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    /// Reference to a type by name.
    TypeRef(String),
    /// Parameter declaration.
    Param { name: String, ty: String },
    /// Record field declaration.
    FieldDecl { name: String, ty: String },
    /// Ordered statement list.
    Block(Vec<NodeId>),
    Literal(Literal),
    Ident(String),
    /// `a::b::c`
    Path(Vec<String>),
    Call { callee: NodeId, args: Vec<NodeId> },
    Unary { op: UnaryOp, operand: NodeId },
    Binary { op: BinaryOp, left: NodeId, right: NodeId },
    Assign { target: NodeId, value: NodeId },
    ExprStmt(NodeId),
    Return(Option<NodeId>),
    If(Vec<IfBranch>),
    /// Counting loop from `start` (inclusive) to `end` (exclusive).
    For {
        var: Option<String>,
        start: NodeId,
        end: NodeId,
        step: Option<NodeId>,
        body: NodeId,
    },
}

impl NodeKind {
    /// Short kind name, used in placeholder comments and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TypeRef(_) => "type-ref",
            Self::Param { .. } => "param",
            Self::FieldDecl { .. } => "field-decl",
            Self::Block(_) => "block",
            Self::Literal(_) => "literal",
            Self::Ident(_) => "ident",
            Self::Path(_) => "path",
            Self::Call { .. } => "call",
            Self::Unary { .. } => "unary",
            Self::Binary { .. } => "binary",
            Self::Assign { .. } => "assign",
            Self::ExprStmt(_) => "expr-stmt",
            Self::Return(_) => "return",
            Self::If(_) => "if",
            Self::For { .. } => "for",
        }
    }
}

/// A node with its source location.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Flat storage for every node of a program unit.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its handle.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let index = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        if index == u32::MAX {
            // Arena is full; callers see a dangling handle, which the
            // emitter treats as a malformed tree.
            return NodeId::INVALID;
        }
        self.nodes.push(Node { kind, span });
        NodeId::new(index)
    }

    /// Look up a node. Dangling or invalid handles yield `None`.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Look up a node's kind.
    #[inline]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -- Builders --
    //
    // Thin wrappers over `alloc` with a dummy span, used by front ends that
    // synthesize nodes and by tests.

    pub fn int(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Literal(Literal::Int(text.to_string())), Span::DUMMY)
    }

    pub fn float(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Literal(Literal::Float(text.to_string())), Span::DUMMY)
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.alloc(NodeKind::Literal(Literal::Str(value.to_string())), Span::DUMMY)
    }

    pub fn bool(&mut self, value: bool) -> NodeId {
        self.alloc(NodeKind::Literal(Literal::Bool(value)), Span::DUMMY)
    }

    pub fn ident(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::Ident(name.to_string()), Span::DUMMY)
    }

    pub fn path(&mut self, segments: &[&str]) -> NodeId {
        let segments = segments.iter().map(|s| (*s).to_string()).collect();
        self.alloc(NodeKind::Path(segments), Span::DUMMY)
    }

    pub fn call(&mut self, callee: NodeId, args: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Call { callee, args }, Span::DUMMY)
    }

    pub fn unary(&mut self, op: UnaryOp, operand: NodeId) -> NodeId {
        self.alloc(NodeKind::Unary { op, operand }, Span::DUMMY)
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.alloc(NodeKind::Binary { op, left, right }, Span::DUMMY)
    }

    pub fn assign(&mut self, target: NodeId, value: NodeId) -> NodeId {
        self.alloc(NodeKind::Assign { target, value }, Span::DUMMY)
    }

    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.alloc(NodeKind::ExprStmt(expr), Span::DUMMY)
    }

    pub fn ret(&mut self, value: Option<NodeId>) -> NodeId {
        self.alloc(NodeKind::Return(value), Span::DUMMY)
    }

    pub fn block(&mut self, stmts: Vec<NodeId>) -> NodeId {
        self.alloc(NodeKind::Block(stmts), Span::DUMMY)
    }

    pub fn if_chain(&mut self, branches: Vec<IfBranch>) -> NodeId {
        self.alloc(NodeKind::If(branches), Span::DUMMY)
    }

    pub fn for_range(
        &mut self,
        var: Option<&str>,
        start: NodeId,
        end: NodeId,
        step: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        self.alloc(
            NodeKind::For {
                var: var.map(str::to_string),
                start,
                end,
                step,
                body,
            },
            Span::DUMMY,
        )
    }
}
