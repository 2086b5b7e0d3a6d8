//! VBA target AST
//!
//! ## Submodules
//! - `ops` - operator tokens (VbBinOp, VbUnaryOp)
//! - `exprs` - expressions (VbExpr)
//! - `nodes` - statements, declarations and procedures
//! - `modules` - procedural and class modules

pub mod exprs;
pub mod modules;
pub mod nodes;
pub mod ops;

pub use exprs::*;
pub use modules::*;
pub use nodes::*;
pub use ops::*;
