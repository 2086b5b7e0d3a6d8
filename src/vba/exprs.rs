//! VBA expressions
use serde::{Deserialize, Serialize};

use super::ops::{VbBinOp, VbUnaryOp};
use crate::semantic::VbType;

/// Variadic helper building a `Collection` from its arguments
pub const COLLECTION_HELPER: &str = "NewCollection";
/// Variadic helper building a `Dictionary` from alternating keys and values
pub const DICTIONARY_HELPER: &str = "NewDictionary";
/// Current-instance token
pub const ME: &str = "Me";

/// VBA expression with its resolved type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VbExpr {
    pub kind: VbExprKind,
    pub ty: VbType,
}

/// VBA expression kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VbExprKind {
    Name(String),
    IntLit(i64),
    FloatLit(f64),
    StrLit(String),
    BinOp {
        left: Box<VbExpr>,
        op: VbBinOp,
        right: Box<VbExpr>,
    },
    UnaryOp {
        op: VbUnaryOp,
        operand: Box<VbExpr>,
    },
    /// `target(args)`: a function call or collection / dictionary indexing
    Index {
        target: Box<VbExpr>,
        args: Vec<VbExpr>,
    },
    /// `object.member`
    Member {
        object: Box<VbExpr>,
        member: String,
    },
    /// `New ClassName`
    New(String),
}

impl VbExpr {
    pub fn new(kind: VbExprKind, ty: VbType) -> Self {
        Self { kind, ty }
    }

    /// Untyped name
    pub fn name(id: &str) -> Self {
        Self::new(VbExprKind::Name(id.to_string()), VbType::variant())
    }

    pub fn typed_name(id: &str, ty: VbType) -> Self {
        Self::new(VbExprKind::Name(id.to_string()), ty)
    }

    pub fn int(value: i64) -> Self {
        Self::new(VbExprKind::IntLit(value), VbType::integer())
    }

    pub fn str_lit(value: &str) -> Self {
        Self::new(VbExprKind::StrLit(value.to_string()), VbType::string())
    }

    pub fn binary(left: VbExpr, op: VbBinOp, right: VbExpr, ty: VbType) -> Self {
        Self::new(
            VbExprKind::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            ty,
        )
    }

    pub fn index(target: VbExpr, args: Vec<VbExpr>, ty: VbType) -> Self {
        Self::new(
            VbExprKind::Index {
                target: Box::new(target),
                args,
            },
            ty,
        )
    }

    /// Call of a named procedure
    pub fn call(name: &str, args: Vec<VbExpr>, ty: VbType) -> Self {
        Self::index(Self::name(name), args, ty)
    }

    pub fn member(object: VbExpr, member: &str, ty: VbType) -> Self {
        Self::new(
            VbExprKind::Member {
                object: Box::new(object),
                member: member.to_string(),
            },
            ty,
        )
    }

    /// `New <class>` typed with the class's reference type
    pub fn new_object(ty: VbType) -> Self {
        Self::new(VbExprKind::New(ty.name.clone()), ty)
    }

    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            VbExprKind::Name(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.kind {
            VbExprKind::IntLit(n) => Some(n),
            _ => None,
        }
    }
}
