//! Statement translation for Translator

use super::annotations::INIT_METHOD;
use super::closure::{classify_iter, IterSource};
use super::*;
use crate::parser::BinOp;
use crate::vba::{VbBinOp, VbExprKind};
use tracing::debug;

impl Translator {
    pub(super) fn visit_function_def(&mut self, stmt: &Stmt) -> Result<Vec<VbStmt>> {
        let StmtKind::FunctionDef(def) = &stmt.kind else {
            unreachable!()
        };
        if self.function.is_some() {
            return Err(self.unsupported(format!("nested function definition '{}'", def.name)));
        }
        let class = self.class_name().map(str::to_string);
        let signature = self
            .annotations
            .signature(class.as_deref(), &def.name)
            .cloned()
            .ok_or_else(|| self.unsupported(format!("function '{}' outside module or class scope", def.name)))?;

        let is_init = class.is_some() && def.name == INIT_METHOD;
        let name = if is_init { INIT_RENAMED } else { def.name.as_str() };
        let self_name = class.as_ref().and_then(|_| def.params.first().cloned());
        if let Some(param) = signature.params.iter().find(|p| p.name.eq_ignore_ascii_case(name)) {
            return Err(self.unsupported(format!(
                "parameter '{}' named like its procedure '{}'",
                param.name, name
            )));
        }
        debug!(function = %name, class = ?class, "lowering function");

        let ctx = FunctionContext::new(name, signature.params.clone(), signature.rettype.clone(), self_name);
        let (body, ctx) = self.with_function(ctx, |t| t.translate_block(&def.body))?;

        let mut statements = ctx.locals.declarations();
        statements.extend(body);
        let mut procedures = vec![Procedure::function(&ctx.name, ctx.params, ctx.rettype, statements)];
        procedures.extend(ctx.helpers);
        self.push_procedures(procedures);

        if let (true, Some(class)) = (is_init, class) {
            self.synthesize_constructor(&class, &signature.params)?;
        }
        Ok(Vec::new())
    }

    pub(super) fn visit_class_def(&mut self, stmt: &Stmt) -> Result<Vec<VbStmt>> {
        let StmtKind::ClassDef(class) = &stmt.kind else {
            unreachable!()
        };
        if self.function.is_some() || self.class.is_some() {
            return Err(self.unsupported(format!("nested class definition '{}'", class.name)));
        }
        self.lower_class(class)?;
        Ok(Vec::new())
    }

    pub(super) fn visit_assign(&mut self, stmt: &Stmt) -> Result<Vec<VbStmt>> {
        let StmtKind::Assign { targets, value } = &stmt.kind else {
            unreachable!()
        };
        let [target] = targets.as_slice() else {
            return Err(self.unsupported("multiple assignment targets"));
        };
        if matches!(target, Expr::Tuple(_) | Expr::List(_)) {
            return Err(self.unsupported("tuple unpacking in assignment"));
        }
        let rhs = self.translate_expr(value)?;
        let lhs = self.assign_target(target, &rhs.ty)?;
        let form = if lhs.ty.is_variant() { rhs.ty.clone() } else { lhs.ty.clone() };
        Ok(vec![VbStmt::assign(lhs, rhs, &form)])
    }

    /// Translate an assignment target, recording new locals with `ty`
    fn assign_target(&mut self, target: &Expr, ty: &VbType) -> Result<VbExpr> {
        match target {
            Expr::Name(id) => {
                if self.frame()?.is_self(id) {
                    return Err(self.unsupported("assignment to the self reference"));
                }
                self.declare_local(id, ty.clone())?;
                let ty = self.frame()?.lookup(id).cloned().unwrap_or_default();
                Ok(VbExpr::typed_name(id, ty))
            }
            Expr::Attribute { .. } | Expr::Subscript { .. } => self.translate_expr(target),
            _ => Err(self.unsupported("assignment target")),
        }
    }

    /// Record a local of the current function. The function's own name is
    /// its return slot in VBA (names are case-insensitive there).
    pub(super) fn declare_local(&mut self, name: &str, ty: VbType) -> Result<()> {
        let frame = self.frame()?;
        if frame.name.eq_ignore_ascii_case(name) {
            let procedure = frame.name.clone();
            return Err(self.unsupported(format!(
                "local '{}' named like its procedure '{}'",
                name, procedure
            )));
        }
        frame.define_local(name, ty);
        Ok(())
    }

    pub(super) fn visit_aug_assign(&mut self, stmt: &Stmt) -> Result<Vec<VbStmt>> {
        let StmtKind::AugAssign { target, op, value } = &stmt.kind else {
            unreachable!()
        };
        match target {
            Expr::Name(id) if self.frame()?.is_self(id) => {
                return Err(self.unsupported("assignment to the self reference"))
            }
            Expr::Name(_) | Expr::Attribute { .. } | Expr::Subscript { .. } => {}
            _ => return Err(self.unsupported("augmented assignment target")),
        }
        let current = self.translate_expr(target)?;
        let operand = self.translate_expr(value)?;
        let combined = self.binary(current.clone(), *op, operand)?;
        let form = if current.ty.is_variant() { combined.ty.clone() } else { current.ty.clone() };
        Ok(vec![VbStmt::assign(current, combined, &form)])
    }

    pub(super) fn visit_return(&mut self, stmt: &Stmt) -> Result<Vec<VbStmt>> {
        let StmtKind::Return(value) = &stmt.kind else {
            unreachable!()
        };
        let frame = self.frame()?;
        let (name, rettype) = (frame.name.clone(), frame.rettype.clone());
        let mut stmts = Vec::new();
        if let Some(value) = value {
            let value = self.translate_expr(value)?;
            let form = if rettype.is_variant() { value.ty.clone() } else { rettype.clone() };
            stmts.push(VbStmt::assign(VbExpr::typed_name(&name, rettype), value, &form));
        }
        stmts.push(VbStmt::ExitFunction);
        Ok(stmts)
    }

    pub(super) fn visit_if(&mut self, stmt: &Stmt) -> Result<Vec<VbStmt>> {
        let StmtKind::If { test, body, orelse } = &stmt.kind else {
            unreachable!()
        };
        let cond = self.translate_expr(test)?;
        let then_block = self.translate_block(body)?;

        // an else holding a lone if (how elif parses) becomes an ElseIf arm
        let mut else_ifs = Vec::new();
        let mut rest = orelse.as_slice();
        while let [Stmt {
            kind: StmtKind::If { test, body, orelse },
            line,
        }] = rest
        {
            self.line = *line;
            let cond = self.translate_expr(test)?;
            let block = self.translate_block(body)?;
            else_ifs.push((cond, block));
            rest = orelse.as_slice();
        }
        let else_block = self.translate_block(rest)?;

        Ok(vec![VbStmt::If {
            cond,
            then_block,
            else_ifs,
            else_block,
        }])
    }

    pub(super) fn visit_for(&mut self, stmt: &Stmt) -> Result<Vec<VbStmt>> {
        let StmtKind::For { target, iter, body } = &stmt.kind else {
            unreachable!()
        };
        let Some(var) = target.as_name() else {
            return Err(self.unsupported("loop target other than a single name"));
        };
        let IterSource::Range { start, stop } = classify_iter(iter) else {
            return Err(self.unsupported("loop over anything but range(start, stop)"));
        };
        let from = self.translate_expr(start)?;
        let to = self.upper_bound(stop)?;
        self.declare_local(var, VbType::integer())?;
        let body = self.translate_block(body)?;
        Ok(vec![VbStmt::For {
            var: var.to_string(),
            from,
            to,
            body,
        }])
    }

    /// Inclusive upper bound for an exclusive `stop`
    pub(super) fn upper_bound(&mut self, stop: &Expr) -> Result<VbExpr> {
        if let Expr::Int(n) = stop {
            return Ok(VbExpr::int(n - 1));
        }
        let stop = self.translate_expr(stop)?;
        let ty = if stop.ty == VbType::integer() {
            VbType::integer()
        } else {
            VbType::variant()
        };
        Ok(VbExpr::binary(stop, VbBinOp::Sub, VbExpr::int(1), ty))
    }

    pub(super) fn visit_expr_stmt(&mut self, stmt: &Stmt) -> Result<Vec<VbStmt>> {
        let StmtKind::Expr(expr) = &stmt.kind else {
            unreachable!()
        };
        match expr {
            // docstring
            Expr::Str(_) => Ok(Vec::new()),
            Expr::Call { .. } => {
                let call = self.translate_expr(expr)?;
                match call.kind {
                    VbExprKind::Index { target, args } => Ok(vec![VbStmt::Call {
                        target: *target,
                        args,
                    }]),
                    _ => Err(self.unsupported("object creation used as a statement")),
                }
            }
            _ => Err(self.unsupported("expression statement other than a call")),
        }
    }

    pub(super) fn visit_pass(&mut self, _stmt: &Stmt) -> Result<Vec<VbStmt>> {
        Ok(Vec::new())
    }

    /// Binary arithmetic with its result type
    pub(super) fn binary(&self, left: VbExpr, op: BinOp, right: VbExpr) -> Result<VbExpr> {
        let op = operators::convert_binop(op, self.line)?;
        let ty = arithmetic_type(&left.ty, op, &right.ty);
        Ok(VbExpr::binary(left, op, right, ty))
    }
}

fn arithmetic_type(left: &VbType, op: VbBinOp, right: &VbType) -> VbType {
    let integer = VbType::integer();
    let string = VbType::string();
    match op {
        VbBinOp::Add | VbBinOp::Sub | VbBinOp::Mul | VbBinOp::Mod
            if *left == integer && *right == integer =>
        {
            integer
        }
        VbBinOp::Add if *left == string && *right == string => string,
        _ => VbType::variant(),
    }
}
