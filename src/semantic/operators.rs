//! Operator conversion module
//!
//! Fixed tables from source operators to VBA operators. An operator
//! without an entry is unsupported.

use crate::error::{PyVbaError, Result};
use crate::parser::{BinOp, BoolOp, CmpOp, UnaryOp};
use crate::vba::{VbBinOp, VbUnaryOp};

/// Convert a binary operator
pub fn convert_binop(op: BinOp, line: usize) -> Result<VbBinOp> {
    match op {
        BinOp::Add => Ok(VbBinOp::Add),
        BinOp::Sub => Ok(VbBinOp::Sub),
        BinOp::Mult => Ok(VbBinOp::Mul),
        BinOp::Div => Ok(VbBinOp::Div),
        BinOp::Mod => Ok(VbBinOp::Mod),
        BinOp::Pow => Ok(VbBinOp::Pow),
        BinOp::FloorDiv => Err(PyVbaError::unsupported("floor division operator '//'", line)),
    }
}

/// Convert a unary operator
pub fn convert_unaryop(op: UnaryOp) -> VbUnaryOp {
    match op {
        UnaryOp::USub => VbUnaryOp::Neg,
        UnaryOp::UAdd => VbUnaryOp::Plus,
        UnaryOp::Not => VbUnaryOp::Not,
    }
}

/// Convert a boolean operator
pub fn convert_boolop(op: BoolOp) -> VbBinOp {
    match op {
        BoolOp::And => VbBinOp::And,
        BoolOp::Or => VbBinOp::Or,
    }
}

/// Convert a comparison operator
pub fn convert_cmpop(op: CmpOp, line: usize) -> Result<VbBinOp> {
    match op {
        CmpOp::Eq => Ok(VbBinOp::Eq),
        CmpOp::NotEq => Ok(VbBinOp::NotEq),
        CmpOp::Lt => Ok(VbBinOp::Lt),
        CmpOp::LtE => Ok(VbBinOp::LtEq),
        CmpOp::Gt => Ok(VbBinOp::Gt),
        CmpOp::GtE => Ok(VbBinOp::GtEq),
        CmpOp::In | CmpOp::NotIn => Err(PyVbaError::unsupported("membership operator", line)),
        CmpOp::Is | CmpOp::IsNot => Err(PyVbaError::unsupported("identity operator", line)),
    }
}
