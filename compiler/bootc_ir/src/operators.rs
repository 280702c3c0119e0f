//! Binary and Unary Operators
//!
//! The operator set the bootstrap front end resolves expressions to.

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Logical
    Or,
    And,

    // Equality
    Eq,
    NotEq,

    // Relational
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Additive
    Add,
    Sub,

    // Multiplicative
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Returns the C symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }

    /// `||` and `&&`.
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::Or | Self::And)
    }

    /// Equality and relational operators.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    /// Additive and multiplicative operators.
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod
        )
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    /// Returns the C symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}
