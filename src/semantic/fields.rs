//! Instance field inference
//!
//! Fields are never declared in the source. They are found by scanning the
//! initializer for `self.<field> = <expr>`; a bare parameter on the right
//! gives the field that parameter's annotated type, anything else is a
//! `Variant` field.

use std::collections::HashMap;

use super::annotations::{AnnotationTable, INIT_METHOD};
use super::types::VbType;
use crate::parser::{ClassDef, Expr, Module, Stmt, StmtKind};

/// Fields per class, in first-assignment order
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    classes: HashMap<String, Vec<(String, VbType)>>,
}

impl FieldTable {
    pub fn fields(&self, class: &str) -> &[(String, VbType)] {
        self.classes.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn field(&self, class: &str, name: &str) -> Option<&VbType> {
        self.fields(class)
            .iter()
            .find(|(f, _)| f == name)
            .map(|(_, ty)| ty)
    }
}

/// Infer the fields of every top-level class
pub fn infer_fields(module: &Module, annotations: &AnnotationTable) -> FieldTable {
    let mut table = FieldTable::default();
    for stmt in &module.body {
        if let StmtKind::ClassDef(class) = &stmt.kind {
            table
                .classes
                .insert(class.name.clone(), class_fields(class, annotations));
        }
    }
    table
}

fn class_fields(class: &ClassDef, annotations: &AnnotationTable) -> Vec<(String, VbType)> {
    let mut fields = Vec::new();
    let init = class.body.iter().find_map(|s| match &s.kind {
        StmtKind::FunctionDef(def) if def.name == INIT_METHOD => Some(def),
        _ => None,
    });
    let Some(init) = init else {
        return fields;
    };
    let Some(self_name) = init.params.first() else {
        return fields;
    };
    let signature = annotations.method(&class.name, INIT_METHOD);
    let param_type = |name: &str| {
        signature
            .and_then(|sig| sig.param(name))
            .cloned()
            .unwrap_or_default()
    };
    scan_block(&init.body, self_name, &param_type, &mut fields);
    fields
}

fn scan_block(
    body: &[Stmt],
    self_name: &str,
    param_type: &dyn Fn(&str) -> VbType,
    fields: &mut Vec<(String, VbType)>,
) {
    for stmt in body {
        match &stmt.kind {
            StmtKind::Assign { targets, value } => {
                for target in targets {
                    let Expr::Attribute { value: object, attr } = target else {
                        continue;
                    };
                    if object.as_name() != Some(self_name) || fields.iter().any(|(f, _)| f == attr) {
                        continue;
                    }
                    let ty = value.as_name().map(param_type).unwrap_or_default();
                    fields.push((attr.clone(), ty));
                }
            }
            StmtKind::If { body, orelse, .. } => {
                scan_block(body, self_name, param_type, fields);
                scan_block(orelse, self_name, param_type, fields);
            }
            StmtKind::For { body, .. } => scan_block(body, self_name, param_type, fields),
            _ => {}
        }
    }
}
