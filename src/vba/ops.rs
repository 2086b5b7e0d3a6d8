//! VBA operator definitions
use serde::{Deserialize, Serialize};

/// VBA binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VbBinOp {
    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // comparison
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // logical
    And,
    Or,
}

impl VbBinOp {
    /// Source token
    pub fn token(&self) -> &'static str {
        match self {
            VbBinOp::Add => "+",
            VbBinOp::Sub => "-",
            VbBinOp::Mul => "*",
            VbBinOp::Div => "/",
            VbBinOp::Mod => "Mod",
            VbBinOp::Pow => "^",
            VbBinOp::Eq => "=",
            VbBinOp::NotEq => "<>",
            VbBinOp::Lt => "<",
            VbBinOp::Gt => ">",
            VbBinOp::LtEq => "<=",
            VbBinOp::GtEq => ">=",
            VbBinOp::And => "And",
            VbBinOp::Or => "Or",
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            VbBinOp::Eq | VbBinOp::NotEq | VbBinOp::Lt | VbBinOp::Gt | VbBinOp::LtEq | VbBinOp::GtEq
        )
    }
}

/// VBA unary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VbUnaryOp {
    Neg,
    Plus,
    Not,
}

impl VbUnaryOp {
    /// Prefix written before the operand
    pub fn prefix(&self) -> &'static str {
        match self {
            VbUnaryOp::Neg => "-",
            VbUnaryOp::Plus => "+",
            VbUnaryOp::Not => "Not ",
        }
    }
}
