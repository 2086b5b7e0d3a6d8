//! Semantic analysis module
//!
//! Translates the source AST into the VBA AST. One [`Translator`] is built
//! per module and consumed by its translation; handlers are looked up in
//! closed per-kind tables.

mod analyze_expressions;
mod analyze_statements;
pub mod annotations;
pub mod closure;
pub mod dispatch;
pub mod fields;
mod lowering;
pub mod operators;
mod scope;
mod types;

pub use annotations::{AnnotationTable, ClassInfo, Signature};
pub use dispatch::{Dispatcher, NodeKind};
pub use fields::FieldTable;
pub use lowering::{constructor_name, INIT_RENAMED};
pub use scope::*;
pub use types::*;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PyVbaError, Result};
use crate::parser::{Expr, Module, Stmt, StmtKind};
use crate::vba::{
    ClassModule, ProceduralModule, Procedure, VbExpr, VbStmt, COLLECTION_LITERAL_HELPERS,
};

/// Name of the primary module unless configured otherwise
pub const DEFAULT_MODULE_NAME: &str = "PyMain";

/// Translation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateOptions {
    /// Name of the generated standard module
    pub module_name: String,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
        }
    }
}

/// Translate a module with default options
pub fn translate(module: &Module) -> Result<ProceduralModule> {
    translate_with_options(module, &TranslateOptions::default())
}

pub fn translate_with_options(module: &Module, options: &TranslateOptions) -> Result<ProceduralModule> {
    Translator::new(module, options)?.run(module)
}

pub(crate) type StmtHandler = fn(&mut Translator, &Stmt) -> Result<Vec<VbStmt>>;
pub(crate) type ExprHandler = fn(&mut Translator, &Expr) -> Result<VbExpr>;

// While, Try, Import, Break, Continue and Tuple have no handler on purpose.
static STMT_HANDLERS: Lazy<Dispatcher<StmtHandler>> = Lazy::new(|| {
    Dispatcher::<StmtHandler>::new()
        .register(NodeKind::FunctionDef, Translator::visit_function_def)
        .register(NodeKind::ClassDef, Translator::visit_class_def)
        .register(NodeKind::Assign, Translator::visit_assign)
        .register(NodeKind::AugAssign, Translator::visit_aug_assign)
        .register(NodeKind::Return, Translator::visit_return)
        .register(NodeKind::If, Translator::visit_if)
        .register(NodeKind::For, Translator::visit_for)
        .register(NodeKind::ExprStmt, Translator::visit_expr_stmt)
        .register(NodeKind::Pass, Translator::visit_pass)
});

static EXPR_HANDLERS: Lazy<Dispatcher<ExprHandler>> = Lazy::new(|| {
    Dispatcher::<ExprHandler>::new()
        .register(NodeKind::Name, Translator::visit_name)
        .register(NodeKind::Num, Translator::visit_num)
        .register(NodeKind::Str, Translator::visit_str)
        .register(NodeKind::List, Translator::visit_list)
        .register(NodeKind::Dict, Translator::visit_dict)
        .register(NodeKind::BinOp, Translator::visit_binop)
        .register(NodeKind::UnaryOp, Translator::visit_unaryop)
        .register(NodeKind::BoolOp, Translator::visit_boolop)
        .register(NodeKind::Compare, Translator::visit_compare)
        .register(NodeKind::Call, Translator::visit_call)
        .register(NodeKind::Attribute, Translator::visit_attribute)
        .register(NodeKind::Subscript, Translator::visit_subscript)
        .register(NodeKind::ListComp, Translator::visit_list_comp)
});

/// Class being lowered
pub(crate) struct ClassContext {
    pub(crate) module: ClassModule,
}

/// Source-to-VBA translator for one module
pub struct Translator {
    registry: TypeRegistry,
    annotations: AnnotationTable,
    fields: FieldTable,
    module: ProceduralModule,
    class: Option<ClassContext>,
    function: Option<FunctionContext>,
    /// Line of the statement being translated
    line: usize,
}

impl Translator {
    /// Run the annotation and field passes and prepare an empty target module
    pub fn new(module: &Module, options: &TranslateOptions) -> Result<Self> {
        let mut registry = TypeRegistry::new();
        let annotations = annotations::extract(module, &mut registry)?;
        let fields = fields::infer_fields(module, &annotations);
        Ok(Self {
            registry,
            annotations,
            fields,
            module: ProceduralModule::new(&options.module_name),
            class: None,
            function: None,
            line: 0,
        })
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn annotations(&self) -> &AnnotationTable {
        &self.annotations
    }

    /// Translate the module and hand back the finished target tree
    pub fn run(mut self, module: &Module) -> Result<ProceduralModule> {
        debug!(module = %self.module.name, statements = module.body.len(), "translating module");
        for stmt in &module.body {
            match &stmt.kind {
                StmtKind::FunctionDef(_) | StmtKind::ClassDef(_) => {
                    self.translate_stmt(stmt)?;
                }
                // module docstring
                StmtKind::Expr(Expr::Str(_)) => {}
                _ => {
                    return Err(PyVbaError::unsupported(
                        format!("{:?} statement at module level", NodeKind::of_stmt(stmt)),
                        stmt.line,
                    ))
                }
            }
        }
        self.module
            .raw_code
            .push(COLLECTION_LITERAL_HELPERS.to_string());
        Ok(self.module)
    }

    pub(crate) fn translate_stmt(&mut self, stmt: &Stmt) -> Result<Vec<VbStmt>> {
        let handler = STMT_HANDLERS.resolve(NodeKind::of_stmt(stmt), stmt.line)?;
        let outer = self.line;
        self.line = stmt.line;
        let result = handler(self, stmt);
        self.line = outer;
        result
    }

    pub(crate) fn translate_block(&mut self, body: &[Stmt]) -> Result<Vec<VbStmt>> {
        let mut stmts = Vec::new();
        for stmt in body {
            stmts.extend(self.translate_stmt(stmt)?);
        }
        Ok(stmts)
    }

    pub(crate) fn translate_expr(&mut self, expr: &Expr) -> Result<VbExpr> {
        let handler = EXPR_HANDLERS.resolve(NodeKind::of_expr(expr), self.line)?;
        handler(self, expr)
    }

    pub(crate) fn unsupported(&self, construct: impl Into<String>) -> PyVbaError {
        PyVbaError::unsupported(construct, self.line)
    }

    /// Function currently being translated
    pub(crate) fn frame(&mut self) -> Result<&mut FunctionContext> {
        let line = self.line;
        self.function
            .as_mut()
            .ok_or_else(|| PyVbaError::unsupported("statement outside a function", line))
    }

    /// Run `f` with `ctx` as the current function, then restore the outer one
    pub(crate) fn with_function<T>(
        &mut self,
        ctx: FunctionContext,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<(T, FunctionContext)> {
        let outer = self.function.replace(ctx);
        let result = f(self);
        let inner = std::mem::replace(&mut self.function, outer);
        let value = result?;
        match inner {
            Some(ctx) => Ok((value, ctx)),
            None => unreachable!("function context removed during its own translation"),
        }
    }

    pub(crate) fn class_name(&self) -> Option<&str> {
        self.class.as_ref().map(|c| c.module.name.as_str())
    }

    /// Append finished procedures to the class module being lowered, or to
    /// the primary module
    pub(crate) fn push_procedures(&mut self, procedures: Vec<Procedure>) {
        match &mut self.class {
            Some(class) => class.module.code.extend(procedures),
            None => self.module.code.extend(procedures),
        }
    }
}

#[cfg(test)]
mod tests;
