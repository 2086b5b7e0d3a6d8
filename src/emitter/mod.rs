//! Emitter module - VBA code generation

use crate::vba::{
    ClassModule, Declaration, ProceduralModule, Procedure, VbBinOp, VbExpr, VbExprKind, VbStmt,
    VbUnaryOp,
};

const INDENT: &str = "    ";

const CLASS_HEADER: [&str; 4] = ["VERSION 1.0 CLASS", "BEGIN", "    MultiUse = -1 'True", "END"];

/// Emit the text of a standard module
pub fn emit(module: &ProceduralModule) -> String {
    module.to_code()
}

/// A node that renders itself to lines of VBA
pub trait Render {
    fn render(&self) -> Vec<String>;

    fn to_code(&self) -> String {
        self.render().join("\n")
    }
}

impl Render for ProceduralModule {
    fn render(&self) -> Vec<String> {
        let mut lines = vec![
            attribute("VB_Name", &format!("\"{}\"", self.name)),
            String::new(),
            "Option Explicit".to_string(),
        ];
        for decl in &self.declarations {
            lines.extend(decl.render());
        }
        for proc in &self.code {
            lines.push(String::new());
            lines.extend(proc.render());
        }
        for raw in &self.raw_code {
            lines.push(String::new());
            lines.extend(raw.lines().map(str::to_string));
        }
        lines
    }
}

impl Render for ClassModule {
    fn render(&self) -> Vec<String> {
        let mut lines: Vec<String> = CLASS_HEADER.iter().map(|l| l.to_string()).collect();
        lines.push(attribute("VB_Name", &format!("\"{}\"", self.name)));
        for flag in ["VB_GlobalNameSpace", "VB_Creatable", "VB_PredeclaredId", "VB_Exposed"] {
            lines.push(attribute(flag, "False"));
        }
        lines.push(String::new());
        for decl in &self.declarations {
            lines.extend(decl.render());
        }
        for proc in &self.code {
            lines.push(String::new());
            lines.extend(proc.render());
        }
        lines
    }
}

fn attribute(name: &str, value: &str) -> String {
    format!("Attribute {} = {}", name, value)
}

impl Render for Declaration {
    fn render(&self) -> Vec<String> {
        match self {
            Declaration::Dim { name, ty } => vec![format!("Dim {} As {}", name, ty.name)],
            Declaration::Public { name, ty } => vec![format!("Public {} As {}", name, ty.name)],
        }
    }
}

impl Render for Procedure {
    fn render(&self) -> Vec<String> {
        let params: Vec<_> = self
            .params
            .iter()
            .map(|p| format!("{} As {}", p.name, p.ty.name))
            .collect();
        let (keyword, signature) = match &self.rettype {
            Some(ty) => (
                "Function",
                format!(
                    "{} Function {}({}) As {}",
                    self.scope.keyword(),
                    self.name,
                    params.join(", "),
                    ty.name
                ),
            ),
            None => (
                "Sub",
                format!("{} Sub {}({})", self.scope.keyword(), self.name, params.join(", ")),
            ),
        };

        let mut emitter = VbaEmitter::new();
        emitter.indent = 1;
        let mut lines = vec![signature];
        lines.extend(emitter.emit_stmts(&self.body));
        lines.push(format!("End {}", keyword));
        lines
    }
}

impl Render for VbStmt {
    fn render(&self) -> Vec<String> {
        VbaEmitter::new().emit_stmt(self)
    }
}

/// VBA statement emitter
pub struct VbaEmitter {
    indent: usize,
}

impl VbaEmitter {
    pub fn new() -> Self {
        Self { indent: 0 }
    }

    pub fn emit_stmts(&mut self, stmts: &[VbStmt]) -> Vec<String> {
        stmts.iter().flat_map(|s| self.emit_stmt(s)).collect()
    }

    fn emit_block(&mut self, stmts: &[VbStmt]) -> Vec<String> {
        self.indent += 1;
        let lines = self.emit_stmts(stmts);
        self.indent -= 1;
        lines
    }

    fn emit_stmt(&mut self, stmt: &VbStmt) -> Vec<String> {
        let indent = INDENT.repeat(self.indent);
        match stmt {
            VbStmt::Dim { name, ty } => vec![format!("{}Dim {} As {}", indent, name, ty.name)],
            VbStmt::Let { target, value } => {
                vec![format!("{}{} = {}", indent, emit_expr(target), emit_expr(value))]
            }
            VbStmt::Set { target, value } => {
                vec![format!("{}Set {} = {}", indent, emit_expr(target), emit_expr(value))]
            }
            VbStmt::Call { target, args } => {
                if args.is_empty() {
                    vec![format!("{}{}", indent, emit_expr(target))]
                } else {
                    vec![format!("{}{} {}", indent, emit_expr(target), emit_args(args))]
                }
            }
            VbStmt::If {
                cond,
                then_block,
                else_ifs,
                else_block,
            } => {
                let mut lines = vec![format!("{}If {} Then", indent, emit_expr(cond))];
                lines.extend(self.emit_block(then_block));
                for (cond, block) in else_ifs {
                    lines.push(format!("{}ElseIf {} Then", indent, emit_expr(cond)));
                    lines.extend(self.emit_block(block));
                }
                if !else_block.is_empty() {
                    lines.push(format!("{}Else", indent));
                    lines.extend(self.emit_block(else_block));
                }
                lines.push(format!("{}End If", indent));
                lines
            }
            VbStmt::For { var, from, to, body } => {
                let mut lines = vec![format!(
                    "{}For {} = {} To {}",
                    indent,
                    var,
                    emit_expr(from),
                    emit_expr(to)
                )];
                lines.extend(self.emit_block(body));
                lines.push(format!("{}Next {}", indent, var));
                lines
            }
            VbStmt::ForEach {
                var,
                collection,
                body,
            } => {
                let mut lines = vec![format!(
                    "{}For Each {} In {}",
                    indent,
                    var,
                    emit_expr(collection)
                )];
                lines.extend(self.emit_block(body));
                lines.push(format!("{}Next {}", indent, var));
                lines
            }
            VbStmt::ExitFunction => vec![format!("{}Exit Function", indent)],
            VbStmt::ExitSub => vec![format!("{}Exit Sub", indent)],
        }
    }
}

impl Default for VbaEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Binding strength in VBA, higher binds tighter
fn precedence(expr: &VbExpr) -> u8 {
    match &expr.kind {
        VbExprKind::BinOp { op, .. } => match op {
            VbBinOp::Or => 1,
            VbBinOp::And => 2,
            op if op.is_comparison() => 4,
            VbBinOp::Add | VbBinOp::Sub => 5,
            VbBinOp::Mod => 6,
            VbBinOp::Mul | VbBinOp::Div => 7,
            VbBinOp::Pow => 9,
            _ => 0,
        },
        VbExprKind::UnaryOp { op: VbUnaryOp::Not, .. } => 3,
        VbExprKind::UnaryOp { .. } => 8,
        // `New T.m` would name the type `T.m`
        VbExprKind::New(_) => 9,
        _ => 10,
    }
}

fn emit_operand(expr: &VbExpr, parent: u8, right: bool) -> String {
    let own = precedence(expr);
    let is_binary = matches!(expr.kind, VbExprKind::BinOp { .. });
    if own < parent || (right && is_binary && own == parent) {
        format!("({})", emit_expr(expr))
    } else {
        emit_expr(expr)
    }
}

fn emit_args(args: &[VbExpr]) -> String {
    args.iter().map(emit_expr).collect::<Vec<_>>().join(", ")
}

/// VBA string literal; quotes are doubled, control characters become constants
fn emit_string(value: &str) -> String {
    let mut parts = Vec::new();
    let mut current = String::new();
    for c in value.chars() {
        let constant = match c {
            '\n' => Some("vbLf"),
            '\r' => Some("vbCr"),
            '\t' => Some("vbTab"),
            '\0' => Some("vbNullChar"),
            _ => None,
        };
        match constant {
            Some(name) => {
                if !current.is_empty() {
                    parts.push(format!("\"{}\"", current));
                    current.clear();
                }
                parts.push(name.to_string());
            }
            None if c == '"' => current.push_str("\"\""),
            None => current.push(c),
        }
    }
    if !current.is_empty() || parts.is_empty() {
        parts.push(format!("\"{}\"", current));
    }
    parts.join(" & ")
}

/// Emit one expression
pub fn emit_expr(expr: &VbExpr) -> String {
    match &expr.kind {
        VbExprKind::Name(id) => id.clone(),
        VbExprKind::IntLit(n) => n.to_string(),
        VbExprKind::FloatLit(f) => format!("{:?}", f),
        VbExprKind::StrLit(s) => emit_string(s),
        VbExprKind::BinOp { left, op, right } => {
            let prec = precedence(expr);
            format!(
                "{} {} {}",
                emit_operand(left, prec, false),
                op.token(),
                emit_operand(right, prec, true)
            )
        }
        VbExprKind::UnaryOp { op, operand } => {
            format!("{}{}", op.prefix(), emit_operand(operand, precedence(expr), false))
        }
        VbExprKind::Index { target, args } => {
            format!("{}({})", emit_operand(target, 10, false), emit_args(args))
        }
        VbExprKind::Member { object, member } => {
            format!("{}.{}", emit_operand(object, 10, false), member)
        }
        VbExprKind::New(class) => format!("New {}", class),
    }
}
