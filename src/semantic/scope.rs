//! Scope management

use super::VbType;
use crate::vba::{Parameter, Procedure, VbStmt};

/// Function locals in first-assignment order
#[derive(Debug, Clone, Default)]
pub struct LocalTable {
    entries: Vec<(String, VbType)>,
}

impl LocalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a local at its first assignment; later calls keep the first type
    pub fn define(&mut self, name: &str, ty: VbType) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push((name.to_string(), ty));
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&VbType> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, ty)| ty)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `Dim` statements for every local
    pub fn declarations(&self) -> Vec<VbStmt> {
        self.entries
            .iter()
            .map(|(name, ty)| VbStmt::Dim {
                name: name.clone(),
                ty: ty.clone(),
            })
            .collect()
    }
}

/// State of the function being translated
#[derive(Debug, Clone)]
pub struct FunctionContext {
    /// VBA procedure name
    pub name: String,
    pub params: Vec<Parameter>,
    pub rettype: VbType,
    pub locals: LocalTable,
    /// Source name of the self parameter inside methods
    pub self_name: Option<String>,
    /// Comprehension helpers, emitted right after this procedure
    pub helpers: Vec<Procedure>,
    listcomp_count: usize,
}

impl FunctionContext {
    pub fn new(name: &str, params: Vec<Parameter>, rettype: VbType, self_name: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            params,
            rettype,
            locals: LocalTable::new(),
            self_name,
            helpers: Vec::new(),
            listcomp_count: 0,
        }
    }

    pub fn param(&self, name: &str) -> Option<&VbType> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.ty)
    }

    /// Type of a parameter or recorded local
    pub fn lookup(&self, name: &str) -> Option<&VbType> {
        self.param(name).or_else(|| self.locals.lookup(name))
    }

    pub fn is_self(&self, name: &str) -> bool {
        self.self_name.as_deref() == Some(name)
    }

    /// Record a local unless the name is already a parameter or local
    pub fn define_local(&mut self, name: &str, ty: VbType) {
        if self.param(name).is_none() {
            self.locals.define(name, ty);
        }
    }

    /// Name for the next comprehension helper of this function
    pub fn next_listcomp_name(&mut self) -> String {
        let name = format!("{}_listcomp_{}", self.name, self.listcomp_count);
        self.listcomp_count += 1;
        name
    }
}
