//! Annotation extraction pass
//!
//! Reads `@vbmeta(param=Type, rettype=Type)` decorators off every top-level
//! function and method before translation starts, and catalogues the
//! top-level classes so constructor calls can be recognised anywhere in the
//! module.

use std::collections::{HashMap, HashSet};

use super::types::{TypeRegistry, VbType};
use crate::error::{PyVbaError, Result};
use crate::parser::{Expr, FunctionDef, Module, StmtKind};
use crate::vba::Parameter;

/// The only recognised decorator
pub const META_DECORATOR: &str = "vbmeta";
/// Annotation key carrying the return type
pub const RETTYPE_KEY: &str = "rettype";
/// Source name of the class initializer
pub const INIT_METHOD: &str = "__init__";

/// Resolved parameter and return types of one function
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    /// Explicit parameters; the self parameter of a method is not listed
    pub params: Vec<Parameter>,
    pub rettype: VbType,
}

impl Signature {
    pub fn param(&self, name: &str) -> Option<&VbType> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.ty)
    }
}

/// A top-level class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    pub name: String,
    pub has_init: bool,
    pub line: usize,
}

/// Signatures keyed by (enclosing class, function name)
#[derive(Debug, Clone, Default)]
pub struct AnnotationTable {
    functions: HashMap<String, Signature>,
    methods: HashMap<String, HashMap<String, Signature>>,
    classes: Vec<ClassInfo>,
}

impl AnnotationTable {
    pub fn signature(&self, class: Option<&str>, name: &str) -> Option<&Signature> {
        match class {
            Some(class) => self.methods.get(class).and_then(|m| m.get(name)),
            None => self.functions.get(name),
        }
    }

    pub fn function(&self, name: &str) -> Option<&Signature> {
        self.signature(None, name)
    }

    pub fn method(&self, class: &str, name: &str) -> Option<&Signature> {
        self.signature(Some(class), name)
    }

    pub fn class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.class(name).is_some()
    }

    pub fn classes(&self) -> &[ClassInfo] {
        &self.classes
    }
}

/// Run the pass over a module, registering class types in `registry`
pub fn extract(module: &Module, registry: &mut TypeRegistry) -> Result<AnnotationTable> {
    let mut table = AnnotationTable::default();

    for stmt in &module.body {
        if let StmtKind::ClassDef(class) = &stmt.kind {
            if table.is_class(&class.name) {
                return Err(duplicate("class", &class.name, stmt.line));
            }
            registry.register(VbType::reference(&class.name));
            let has_init = class
                .body
                .iter()
                .any(|s| matches!(&s.kind, StmtKind::FunctionDef(def) if def.name == INIT_METHOD));
            table.classes.push(ClassInfo {
                name: class.name.clone(),
                has_init,
                line: stmt.line,
            });
        }
    }

    for stmt in &module.body {
        match &stmt.kind {
            StmtKind::FunctionDef(def) => {
                if table.functions.contains_key(&def.name) || table.is_class(&def.name) {
                    return Err(duplicate("function", &def.name, stmt.line));
                }
                let sig = signature_of(def, false, registry, stmt.line)?;
                table.functions.insert(def.name.clone(), sig);
            }
            StmtKind::ClassDef(class) => {
                let mut methods = HashMap::new();
                for member in &class.body {
                    if let StmtKind::FunctionDef(def) = &member.kind {
                        if methods.contains_key(&def.name) {
                            return Err(duplicate("method", &def.name, member.line));
                        }
                        let sig = signature_of(def, true, registry, member.line)?;
                        methods.insert(def.name.clone(), sig);
                    }
                }
                table.methods.insert(class.name.clone(), methods);
            }
            _ => {}
        }
    }

    Ok(table)
}

fn duplicate(what: &str, name: &str, line: usize) -> PyVbaError {
    PyVbaError::unsupported(format!("duplicate definition of {} '{}'", what, name), line)
}

fn invalid(message: String, line: usize) -> PyVbaError {
    PyVbaError::InvalidAnnotation { message, line }
}

fn signature_of(
    def: &FunctionDef,
    is_method: bool,
    registry: &TypeRegistry,
    line: usize,
) -> Result<Signature> {
    let params: &[String] = if is_method {
        match def.params.split_first() {
            Some((_, rest)) => rest,
            None => {
                return Err(PyVbaError::unsupported(
                    format!("method '{}' without a self parameter", def.name),
                    line,
                ))
            }
        }
    } else {
        &def.params
    };

    let mut declared: HashMap<&str, VbType> = HashMap::new();
    let mut rettype = VbType::variant();
    let mut seen = HashSet::new();

    for decorator in &def.decorators {
        let Expr::Call {
            func,
            args,
            keywords,
        } = decorator
        else {
            return Err(invalid(
                format!("unsupported decorator on '{}'", def.name),
                line,
            ));
        };
        if func.as_name() != Some(META_DECORATOR) {
            return Err(invalid(
                format!("unsupported decorator on '{}'", def.name),
                line,
            ));
        }
        if !args.is_empty() {
            return Err(invalid(
                format!("{} takes keyword arguments only", META_DECORATOR),
                line,
            ));
        }
        for kw in keywords {
            if !seen.insert(kw.arg.as_str()) {
                return Err(invalid(format!("'{}' is annotated twice", kw.arg), line));
            }
            let Some(type_name) = kw.value.as_name() else {
                return Err(invalid(
                    format!("annotation for '{}' is not a type name", kw.arg),
                    line,
                ));
            };
            let ty = registry.lookup(type_name).map_err(|e| e.at_line(line))?;
            if kw.arg == RETTYPE_KEY {
                rettype = ty;
            } else if let Some(param) = params.iter().find(|p| **p == kw.arg) {
                declared.insert(param.as_str(), ty);
            } else {
                return Err(invalid(
                    format!("'{}' is not a parameter of '{}'", kw.arg, def.name),
                    line,
                ));
            }
        }
    }

    let params = params
        .iter()
        .map(|name| Parameter::new(name, declared.remove(name.as_str()).unwrap_or_default()))
        .collect();
    Ok(Signature { params, rettype })
}
