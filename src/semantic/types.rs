//! Type definitions
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{PyVbaError, Result};

/// Copy vs handle semantics of a VBA type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Semantics {
    /// Copied on assignment (`Let`)
    Value,
    /// Bound by handle (`Set`), allocated with `New`
    Reference,
}

/// VBA type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VbType {
    pub name: String,
    pub semantics: Semantics,
}

impl VbType {
    pub fn value(name: &str) -> Self {
        Self {
            name: name.to_string(),
            semantics: Semantics::Value,
        }
    }

    pub fn reference(name: &str) -> Self {
        Self {
            name: name.to_string(),
            semantics: Semantics::Reference,
        }
    }

    /// Untyped `Variant`; treated as a value type
    pub fn variant() -> Self {
        Self::value("Variant")
    }

    pub fn integer() -> Self {
        Self::value("Integer")
    }

    pub fn string() -> Self {
        Self::value("String")
    }

    pub fn object() -> Self {
        Self::reference("Object")
    }

    pub fn collection() -> Self {
        Self::reference("Collection")
    }

    pub fn dictionary() -> Self {
        Self::reference("Dictionary")
    }

    pub fn is_reference(&self) -> bool {
        self.semantics == Semantics::Reference
    }

    pub fn is_variant(&self) -> bool {
        self.name == "Variant"
    }
}

impl Default for VbType {
    fn default() -> Self {
        Self::variant()
    }
}

/// Mapping from type names to descriptors
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: HashMap<String, VbType>,
}

impl TypeRegistry {
    /// Registry seeded with the built-in types
    pub fn new() -> Self {
        let mut registry = Self {
            types: HashMap::new(),
        };
        for ty in [
            VbType::variant(),
            VbType::integer(),
            VbType::string(),
            VbType::object(),
            VbType::collection(),
            VbType::dictionary(),
        ] {
            registry.register(ty);
        }
        registry
    }

    /// Register (or replace) a type under its own name
    pub fn register(&mut self, ty: VbType) {
        self.types.insert(ty.name.clone(), ty);
    }

    /// Look up a type by name.
    ///
    /// The error carries line 0; callers attach the source line.
    pub fn lookup(&self, name: &str) -> Result<VbType> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| PyVbaError::UnknownType {
                name: name.to_string(),
                line: 0,
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
