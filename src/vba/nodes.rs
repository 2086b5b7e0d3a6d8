//! VBA statements, declarations and procedures
use serde::{Deserialize, Serialize};

use super::exprs::VbExpr;
use crate::semantic::VbType;

/// Procedure visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    Public,
    Private,
}

impl Scope {
    pub fn keyword(&self) -> &'static str {
        match self {
            Scope::Public => "Public",
            Scope::Private => "Private",
        }
    }
}

/// Procedure parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: VbType,
}

impl Parameter {
    pub fn new(name: &str, ty: VbType) -> Self {
        Self {
            name: name.to_string(),
            ty,
        }
    }
}

/// Module-level declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Declaration {
    /// `Dim name As T`
    Dim { name: String, ty: VbType },
    /// `Public name As T` (class instance field)
    Public { name: String, ty: VbType },
}

/// VBA statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VbStmt {
    /// Local `Dim name As T`
    Dim { name: String, ty: VbType },
    /// Value assignment `target = value`
    Let { target: VbExpr, value: VbExpr },
    /// Reference assignment `Set target = value`
    Set { target: VbExpr, value: VbExpr },
    /// `target arg1, arg2`
    Call { target: VbExpr, args: Vec<VbExpr> },
    If {
        cond: VbExpr,
        then_block: Vec<VbStmt>,
        else_ifs: Vec<(VbExpr, Vec<VbStmt>)>,
        else_block: Vec<VbStmt>,
    },
    /// `For var = from To to` ... `Next var`
    For {
        var: String,
        from: VbExpr,
        to: VbExpr,
        body: Vec<VbStmt>,
    },
    /// `For Each var In collection` ... `Next var`
    ForEach {
        var: String,
        collection: VbExpr,
        body: Vec<VbStmt>,
    },
    ExitFunction,
    ExitSub,
}

impl VbStmt {
    /// `Set` for reference types, `Let` otherwise
    pub fn assign(target: VbExpr, value: VbExpr, ty: &VbType) -> Self {
        if ty.is_reference() {
            VbStmt::Set { target, value }
        } else {
            VbStmt::Let { target, value }
        }
    }
}

/// Function (`rettype` present) or Sub procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    pub scope: Scope,
    pub params: Vec<Parameter>,
    pub rettype: Option<VbType>,
    pub body: Vec<VbStmt>,
}

impl Procedure {
    pub fn function(name: &str, params: Vec<Parameter>, rettype: VbType, body: Vec<VbStmt>) -> Self {
        Self {
            name: name.to_string(),
            scope: Scope::Public,
            params,
            rettype: Some(rettype),
            body,
        }
    }

    pub fn sub(name: &str, params: Vec<Parameter>, body: Vec<VbStmt>) -> Self {
        Self {
            name: name.to_string(),
            scope: Scope::Public,
            params,
            rettype: None,
            body,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn is_function(&self) -> bool {
        self.rettype.is_some()
    }

    pub fn param_type(&self, name: &str) -> Option<&VbType> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.ty)
    }
}
