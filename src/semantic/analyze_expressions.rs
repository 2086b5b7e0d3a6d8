//! Expression translation for Translator

use super::*;
use crate::parser::UnaryOp;
use crate::vba::{VbBinOp, VbExprKind, VbUnaryOp, COLLECTION_HELPER, DICTIONARY_HELPER, ME};

/// VBA spelling of `None`
const NOTHING: &str = "Nothing";

impl Translator {
    pub(super) fn visit_name(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::Name(id) = expr else { unreachable!() };
        if let Some(frame) = &self.function {
            if frame.is_self(id) {
                let ty = match self.class_name() {
                    Some(class) => self.registry.lookup(class)?,
                    None => VbType::object(),
                };
                return Ok(VbExpr::typed_name(ME, ty));
            }
        }
        match id.as_str() {
            "None" => Ok(VbExpr::typed_name(NOTHING, VbType::object())),
            "True" | "False" => Ok(VbExpr::name(id)),
            _ => {
                let ty = self
                    .function
                    .as_ref()
                    .and_then(|f| f.lookup(id))
                    .cloned()
                    .unwrap_or_default();
                Ok(VbExpr::typed_name(id, ty))
            }
        }
    }

    pub(super) fn visit_num(&mut self, expr: &Expr) -> Result<VbExpr> {
        match expr {
            Expr::Int(n) => Ok(VbExpr::int(*n)),
            Expr::Float(f) => Ok(VbExpr::new(VbExprKind::FloatLit(*f), VbType::variant())),
            _ => unreachable!(),
        }
    }

    pub(super) fn visit_str(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::Str(s) = expr else { unreachable!() };
        Ok(VbExpr::str_lit(s))
    }

    pub(super) fn visit_list(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::List(items) = expr else { unreachable!() };
        let args = self.translate_all(items)?;
        Ok(VbExpr::call(COLLECTION_HELPER, args, VbType::collection()))
    }

    pub(super) fn visit_dict(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::Dict(pairs) = expr else { unreachable!() };
        let mut args = Vec::with_capacity(pairs.len() * 2);
        for (key, value) in pairs {
            args.push(self.translate_expr(key)?);
            args.push(self.translate_expr(value)?);
        }
        Ok(VbExpr::call(DICTIONARY_HELPER, args, VbType::dictionary()))
    }

    pub(super) fn visit_binop(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::BinOp { left, op, right } = expr else {
            unreachable!()
        };
        let left = self.translate_expr(left)?;
        let right = self.translate_expr(right)?;
        self.binary(left, *op, right)
    }

    pub(super) fn visit_unaryop(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::UnaryOp { op, operand } = expr else {
            unreachable!()
        };
        let operand = self.translate_expr(operand)?;
        let op = operators::convert_unaryop(*op);
        let ty = match op {
            VbUnaryOp::Neg | VbUnaryOp::Plus if operand.ty == VbType::integer() => VbType::integer(),
            _ => VbType::variant(),
        };
        Ok(VbExpr::new(
            VbExprKind::UnaryOp {
                op,
                operand: Box::new(operand),
            },
            ty,
        ))
    }

    pub(super) fn visit_boolop(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::BoolOp { op, values } = expr else {
            unreachable!()
        };
        let op = operators::convert_boolop(*op);
        let mut values = values.iter();
        let Some(first) = values.next() else {
            return Err(self.unsupported("empty boolean operation"));
        };
        let mut folded = self.translate_expr(first)?;
        for value in values {
            let value = self.translate_expr(value)?;
            folded = VbExpr::binary(folded, op, value, VbType::variant());
        }
        Ok(folded)
    }

    pub(super) fn visit_compare(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::Compare {
            left,
            ops,
            comparators,
        } = expr
        else {
            unreachable!()
        };
        let ([op], [right]) = (ops.as_slice(), comparators.as_slice()) else {
            return Err(self.unsupported("chained comparison"));
        };
        let op = operators::convert_cmpop(*op, self.line)?;
        let left = self.translate_expr(left)?;
        let right = self.translate_expr(right)?;
        Ok(VbExpr::binary(left, op, right, VbType::variant()))
    }

    pub(super) fn visit_call(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::Call {
            func,
            args,
            keywords,
        } = expr
        else {
            unreachable!()
        };
        if !keywords.is_empty() {
            return Err(self.unsupported("keyword arguments in a call"));
        }
        match func.as_ref() {
            Expr::Name(id) if self.annotations.is_class(id) => self.construct(id, args),
            Expr::Name(id) if id == "range" => {
                Err(self.unsupported("range() outside the header of a for loop"))
            }
            Expr::Name(id) => {
                let ty = self
                    .annotations
                    .function(id)
                    .map(|sig| sig.rettype.clone())
                    .unwrap_or_default();
                let args = self.translate_all(args)?;
                Ok(VbExpr::call(id, args, ty))
            }
            Expr::Attribute { value, attr } => {
                let object = self.translate_expr(value)?;
                let ty = self
                    .annotations
                    .method(&object.ty.name, attr)
                    .map(|sig| sig.rettype.clone())
                    .unwrap_or_default();
                let args = self.translate_all(args)?;
                Ok(VbExpr::index(VbExpr::member(object, attr, ty.clone()), args, ty))
            }
            other => {
                let target = self.translate_expr(other)?;
                let args = self.translate_all(args)?;
                Ok(VbExpr::index(target, args, VbType::variant()))
            }
        }
    }

    /// Instance creation: through the constructor when the class has an
    /// initializer, a bare `New` otherwise
    fn construct(&mut self, class: &str, args: &[Expr]) -> Result<VbExpr> {
        let ty = self.registry.lookup(class).map_err(|e| e.at_line(self.line))?;
        let has_init = self.annotations.class(class).is_some_and(|c| c.has_init);
        if has_init {
            let args = self.translate_all(args)?;
            Ok(VbExpr::call(&constructor_name(class), args, ty))
        } else if args.is_empty() {
            Ok(VbExpr::new_object(ty))
        } else {
            Err(self.unsupported(format!(
                "arguments to '{}' which defines no __init__",
                class
            )))
        }
    }

    pub(super) fn visit_attribute(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::Attribute { value, attr } = expr else {
            unreachable!()
        };
        let object = self.translate_expr(value)?;
        let ty = self
            .fields
            .field(&object.ty.name, attr)
            .cloned()
            .unwrap_or_default();
        Ok(VbExpr::member(object, attr, ty))
    }

    pub(super) fn visit_subscript(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::Subscript { value, index } = expr else {
            unreachable!()
        };
        let target = self.translate_expr(value)?;
        // dictionary keys are looked up as given
        let keyed = target.ty == VbType::dictionary();
        let position = |key: VbExpr| if keyed { key } else { shifted(key) };
        let key = match index.as_ref() {
            Expr::Int(n) => position(VbExpr::int(*n)),
            Expr::UnaryOp {
                op: UnaryOp::USub,
                operand,
            } if !keyed && matches!(operand.as_ref(), Expr::Int(_)) => {
                return Err(self.unsupported("negative index"));
            }
            Expr::Str(s) => VbExpr::str_lit(s),
            other => {
                let key = self.translate_expr(other)?;
                if key.ty == VbType::integer() {
                    position(key)
                } else if key.ty == VbType::string() {
                    key
                } else {
                    return Err(self.unsupported(format!(
                        "subscript key of type {} (only Integer and String keys are supported)",
                        key.ty.name
                    )));
                }
            }
        };
        Ok(VbExpr::index(target, vec![key], VbType::variant()))
    }

    pub(super) fn visit_list_comp(&mut self, expr: &Expr) -> Result<VbExpr> {
        let Expr::ListComp { elt, generators } = expr else {
            unreachable!()
        };
        self.lower_list_comp(elt, generators)
    }

    pub(super) fn translate_all(&mut self, exprs: &[Expr]) -> Result<Vec<VbExpr>> {
        exprs.iter().map(|e| self.translate_expr(e)).collect()
    }
}

/// 0-based source index to 1-based VBA index
fn shifted(index: VbExpr) -> VbExpr {
    VbExpr::binary(index, VbBinOp::Add, VbExpr::int(1), VbType::integer())
}
