//! Handler dispatch by node kind
//!
//! Every node kind has at most one parent kind. Resolution walks from the
//! concrete kind towards `Node` and returns the first registered handler,
//! so one handler can serve a whole family (e.g. `Num` for int and float
//! literals).

use std::collections::HashMap;

use crate::error::{PyVbaError, Result};
use crate::parser::{Expr, Stmt, StmtKind};

/// Node kinds of the source AST, including abstract family kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Node,
    Stmt,
    Expr,

    // statements
    FunctionDef,
    ClassDef,
    Assign,
    AugAssign,
    Return,
    If,
    For,
    While,
    Try,
    Import,
    ExprStmt,
    Pass,
    Break,
    Continue,

    // expressions
    Name,
    Num,
    Int,
    Float,
    Str,
    List,
    Tuple,
    Dict,
    BinOp,
    UnaryOp,
    BoolOp,
    Compare,
    Call,
    Attribute,
    Subscript,
    ListComp,
}

impl NodeKind {
    /// Next more general kind
    pub fn parent(self) -> Option<NodeKind> {
        match self {
            NodeKind::Node => None,
            NodeKind::Stmt | NodeKind::Expr => Some(NodeKind::Node),
            NodeKind::FunctionDef
            | NodeKind::ClassDef
            | NodeKind::Assign
            | NodeKind::AugAssign
            | NodeKind::Return
            | NodeKind::If
            | NodeKind::For
            | NodeKind::While
            | NodeKind::Try
            | NodeKind::Import
            | NodeKind::ExprStmt
            | NodeKind::Pass
            | NodeKind::Break
            | NodeKind::Continue => Some(NodeKind::Stmt),
            NodeKind::Int | NodeKind::Float => Some(NodeKind::Num),
            NodeKind::Name
            | NodeKind::Num
            | NodeKind::Str
            | NodeKind::List
            | NodeKind::Tuple
            | NodeKind::Dict
            | NodeKind::BinOp
            | NodeKind::UnaryOp
            | NodeKind::BoolOp
            | NodeKind::Compare
            | NodeKind::Call
            | NodeKind::Attribute
            | NodeKind::Subscript
            | NodeKind::ListComp => Some(NodeKind::Expr),
        }
    }

    /// This kind followed by all of its ancestors
    pub fn ancestry(self) -> impl Iterator<Item = NodeKind> {
        std::iter::successors(Some(self), |k| k.parent())
    }

    pub fn of_stmt(stmt: &Stmt) -> Self {
        match &stmt.kind {
            StmtKind::FunctionDef(_) => NodeKind::FunctionDef,
            StmtKind::ClassDef(_) => NodeKind::ClassDef,
            StmtKind::Assign { .. } => NodeKind::Assign,
            StmtKind::AugAssign { .. } => NodeKind::AugAssign,
            StmtKind::Return(_) => NodeKind::Return,
            StmtKind::If { .. } => NodeKind::If,
            StmtKind::For { .. } => NodeKind::For,
            StmtKind::While { .. } => NodeKind::While,
            StmtKind::Try { .. } => NodeKind::Try,
            StmtKind::Import(_) => NodeKind::Import,
            StmtKind::Expr(_) => NodeKind::ExprStmt,
            StmtKind::Pass => NodeKind::Pass,
            StmtKind::Break => NodeKind::Break,
            StmtKind::Continue => NodeKind::Continue,
        }
    }

    pub fn of_expr(expr: &Expr) -> Self {
        match expr {
            Expr::Name(_) => NodeKind::Name,
            Expr::Int(_) => NodeKind::Int,
            Expr::Float(_) => NodeKind::Float,
            Expr::Str(_) => NodeKind::Str,
            Expr::List(_) => NodeKind::List,
            Expr::Tuple(_) => NodeKind::Tuple,
            Expr::Dict(_) => NodeKind::Dict,
            Expr::BinOp { .. } => NodeKind::BinOp,
            Expr::UnaryOp { .. } => NodeKind::UnaryOp,
            Expr::BoolOp { .. } => NodeKind::BoolOp,
            Expr::Compare { .. } => NodeKind::Compare,
            Expr::Call { .. } => NodeKind::Call,
            Expr::Attribute { .. } => NodeKind::Attribute,
            Expr::Subscript { .. } => NodeKind::Subscript,
            Expr::ListComp { .. } => NodeKind::ListComp,
        }
    }
}

/// Closed handler table keyed by node kind
#[derive(Debug, Clone)]
pub struct Dispatcher<H> {
    handlers: HashMap<NodeKind, H>,
}

impl<H: Copy> Dispatcher<H> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler; tables are built once and never changed afterwards
    pub fn register(mut self, kind: NodeKind, handler: H) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Most specific handler for `kind`
    pub fn resolve(&self, kind: NodeKind, line: usize) -> Result<H> {
        kind.ancestry()
            .find_map(|k| self.handlers.get(&k).copied())
            .ok_or_else(|| PyVbaError::NoHandler {
                node: format!("{kind:?}"),
                line,
            })
    }
}

impl<H: Copy> Default for Dispatcher<H> {
    fn default() -> Self {
        Self::new()
    }
}
