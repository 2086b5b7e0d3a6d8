//! Lowering of classes and comprehensions
//!
//! A class becomes a class module plus a constructor function in the
//! module's class-support module. A comprehension becomes a private helper
//! function taking its captured names as parameters.

use super::closure::{classify_iter, free_variables, IterSource};
use super::*;
use crate::parser::{ClassDef, Comprehension};
use crate::vba::{Declaration, Parameter, Scope};
use tracing::debug;

/// VBA name of the initializer, which must not clash with `Class_Initialize`
pub const INIT_RENAMED: &str = "init__";
/// Suffix of synthesized constructor names
pub const CONSTRUCTOR_SUFFIX: &str = "_ctor_";
/// Trailing helper parameter carrying an iterable evaluated at the call site
const ITEMS_PARAM: &str = "items__";
/// The only accepted base class
const OBJECT_BASE: &str = "object";

pub fn constructor_name(class: &str) -> String {
    format!("{}{}", class, CONSTRUCTOR_SUFFIX)
}

impl Translator {
    pub(super) fn lower_class(&mut self, class: &ClassDef) -> Result<()> {
        if class.bases.iter().any(|b| b.as_name() != Some(OBJECT_BASE)) {
            return Err(self.unsupported(format!(
                "base class other than object on '{}'",
                class.name
            )));
        }
        debug!(class = %class.name, "lowering class");

        let mut module = ClassModule::new(&class.name);
        module.declarations = self
            .fields
            .fields(&class.name)
            .iter()
            .map(|(name, ty)| Declaration::Public {
                name: name.clone(),
                ty: ty.clone(),
            })
            .collect();

        self.class = Some(ClassContext { module });
        let result = self.lower_class_body(&class.body);
        let context = self.class.take();
        result?;
        if let Some(context) = context {
            self.module.support_modules.push(context.module);
        }
        Ok(())
    }

    fn lower_class_body(&mut self, body: &[Stmt]) -> Result<()> {
        for stmt in body {
            match &stmt.kind {
                StmtKind::FunctionDef(_) | StmtKind::Pass | StmtKind::Expr(Expr::Str(_)) => {
                    self.translate_stmt(stmt)?;
                }
                _ => {
                    return Err(PyVbaError::unsupported(
                        format!("{:?} statement in a class body", NodeKind::of_stmt(stmt)),
                        stmt.line,
                    ))
                }
            }
        }
        Ok(())
    }

    /// `<Class>_ctor_(params)`: allocate, run `init__`, return the instance
    pub(super) fn synthesize_constructor(&mut self, class: &str, params: &[Parameter]) -> Result<()> {
        let ty = self.registry.lookup(class).map_err(|e| e.at_line(self.line))?;
        let name = constructor_name(class);
        let instance = VbExpr::typed_name(&name, ty.clone());
        let args = params
            .iter()
            .map(|p| VbExpr::typed_name(&p.name, p.ty.clone()))
            .collect();
        let body = vec![
            VbStmt::Set {
                target: instance.clone(),
                value: VbExpr::new_object(ty.clone()),
            },
            VbStmt::Call {
                target: VbExpr::member(instance, INIT_RENAMED, VbType::variant()),
                args,
            },
        ];
        debug!(constructor = %name, "synthesizing constructor");
        self.module
            .class_support_mut()
            .code
            .push(Procedure::function(&name, params.to_vec(), ty, body));
        Ok(())
    }

    pub(super) fn lower_list_comp(&mut self, elt: &Expr, generators: &[Comprehension]) -> Result<VbExpr> {
        let [generator] = generators else {
            return Err(self.unsupported("comprehension with more than one generator"));
        };
        if generator.ifs.len() > 1 {
            return Err(self.unsupported("comprehension with more than one filter"));
        }
        let Some(var) = generator.target.as_name() else {
            return Err(self.unsupported("comprehension target other than a single name"));
        };

        let outer = self.frame()?;
        let self_name = outer.self_name.clone();
        let helper_name = outer.next_listcomp_name();
        let captured = free_variables(elt, generator, self_name.as_deref());
        let mut params: Vec<Parameter> = captured
            .iter()
            .map(|name| Parameter::new(name, outer.lookup(name).cloned().unwrap_or_default()))
            .collect();
        let mut call_args: Vec<VbExpr> = params
            .iter()
            .map(|p| VbExpr::typed_name(&p.name, p.ty.clone()))
            .collect();

        let source = classify_iter(&generator.iter);
        if let IterSource::Value(iter) = source {
            let items = self.translate_expr(iter)?;
            params.push(Parameter::new(ITEMS_PARAM, items.ty.clone()));
            call_args.push(items);
        }
        debug!(helper = %helper_name, captured = ?captured, "synthesizing comprehension helper");

        let helper = FunctionContext::new(&helper_name, params, VbType::collection(), self_name);
        let var_ty = match source {
            IterSource::Range { .. } => VbType::integer(),
            _ => VbType::variant(),
        };

        let (body, helper) = self.with_function(helper, |t| {
            t.declare_local(var, var_ty)?;
            let result = VbExpr::typed_name(&helper_name, VbType::collection());
            let element = t.translate_expr(elt)?;
            let mut step = vec![VbStmt::Call {
                target: VbExpr::member(result.clone(), "Add", VbType::variant()),
                args: vec![element],
            }];
            if let Some(cond) = generator.ifs.first() {
                step = vec![VbStmt::If {
                    cond: t.translate_expr(cond)?,
                    then_block: step,
                    else_ifs: Vec::new(),
                    else_block: Vec::new(),
                }];
            }
            let each = match source {
                IterSource::Range { start, stop } => VbStmt::For {
                    var: var.to_string(),
                    from: t.translate_expr(start)?,
                    to: t.upper_bound(stop)?,
                    body: step,
                },
                IterSource::Name(_) => VbStmt::ForEach {
                    var: var.to_string(),
                    collection: t.translate_expr(&generator.iter)?,
                    body: step,
                },
                IterSource::Value(_) => VbStmt::ForEach {
                    var: var.to_string(),
                    collection: VbExpr::name(ITEMS_PARAM),
                    body: step,
                },
            };
            Ok(vec![
                VbStmt::Set {
                    target: result,
                    value: VbExpr::new_object(VbType::collection()),
                },
                each,
            ])
        })?;

        let mut statements = helper.locals.declarations();
        statements.extend(body);
        let procedure = Procedure::function(&helper.name, helper.params, VbType::collection(), statements)
            .with_scope(Scope::Private);

        let outer = self.frame()?;
        outer.helpers.push(procedure);
        outer.helpers.extend(helper.helpers);
        Ok(VbExpr::call(&helper_name, call_args, VbType::collection()))
    }
}
