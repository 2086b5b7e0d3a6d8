//! Parser module - pest-based Python parser
//!
//! Each logical line is parsed on its own with the pest grammar; block
//! structure is then rebuilt from indentation.

mod ast;
mod lines;

pub use ast::*;
pub use lines::{logical_lines, LogicalLine};

use pest::error::LineColLocation;
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::{PyVbaError, Result};

#[derive(Parser)]
#[grammar = "parser/python.pest"]
pub struct PythonParser;

/// Block header recognised on a logical line
#[derive(Debug, Clone)]
enum Header {
    Def { name: String, params: Vec<String> },
    Class { name: String, bases: Vec<Expr> },
    If(Expr),
    Elif(Expr),
    Else,
    For { target: Expr, iter: Expr },
    While(Expr),
    Try,
    Except { kind: Option<Expr>, name: Option<String> },
    Finally,
}

impl Header {
    fn keyword(&self) -> &'static str {
        match self {
            Header::Def { .. } => "def",
            Header::Class { .. } => "class",
            Header::If(_) => "if",
            Header::Elif(_) => "elif",
            Header::Else => "else",
            Header::For { .. } => "for",
            Header::While(_) => "while",
            Header::Try => "try",
            Header::Except { .. } => "except",
            Header::Finally => "finally",
        }
    }
}

#[derive(Debug, Clone)]
enum LineKind {
    Decorator(Expr),
    /// Header plus the simple statements written after its colon
    Header(Header, Vec<Stmt>),
    Simple(Vec<Stmt>),
}

#[derive(Debug, Clone)]
struct ParsedLine {
    indent: usize,
    line: usize,
    kind: LineKind,
}

/// Parse Python source code into AST
pub fn parse(source: &str) -> Result<Module> {
    let parsed = logical_lines(source)?
        .into_iter()
        .map(|l| {
            Ok(ParsedLine {
                indent: l.indent,
                line: l.line,
                kind: parse_line(&l.text, l.line)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut pos = 0;
    let body = parse_suite(&parsed, &mut pos, 0)?;
    Ok(Module { body })
}

/// Parse a run of statements sharing one indentation width
fn parse_suite(lines: &[ParsedLine], pos: &mut usize, indent: usize) -> Result<Vec<Stmt>> {
    let mut body = Vec::new();
    while let Some(line) = lines.get(*pos) {
        if line.indent < indent {
            break;
        }
        if line.indent > indent {
            let dedented = *pos > 0 && lines[*pos - 1].indent > line.indent;
            return Err(PyVbaError::ParseError {
                line: line.line,
                message: if dedented {
                    "unindent does not match any outer indentation level".to_string()
                } else {
                    "unexpected indent".to_string()
                },
            });
        }
        body.extend(parse_statement(lines, pos, indent)?);
    }
    Ok(body)
}

/// Body of a header: its inline statements, or the deeper block that follows
fn parse_body(
    lines: &[ParsedLine],
    pos: &mut usize,
    indent: usize,
    inline: Vec<Stmt>,
    header_line: usize,
) -> Result<Vec<Stmt>> {
    if !inline.is_empty() {
        return Ok(inline);
    }
    match lines.get(*pos) {
        Some(next) if next.indent > indent => parse_suite(lines, pos, next.indent),
        _ => Err(PyVbaError::ParseError {
            line: header_line,
            message: "expected an indented block".to_string(),
        }),
    }
}

/// Next line when it continues the current compound statement
fn peek_clause(lines: &[ParsedLine], pos: usize, indent: usize) -> Option<&ParsedLine> {
    lines.get(pos).filter(|l| l.indent == indent)
}

fn parse_statement(lines: &[ParsedLine], pos: &mut usize, indent: usize) -> Result<Vec<Stmt>> {
    let current = &lines[*pos];
    let line = current.line;
    *pos += 1;

    match &current.kind {
        LineKind::Simple(stmts) => Ok(stmts.clone()),
        LineKind::Decorator(first) => {
            let mut decorators = vec![first.clone()];
            while let Some(next) = peek_clause(lines, *pos, indent) {
                let LineKind::Decorator(d) = &next.kind else {
                    break;
                };
                decorators.push(d.clone());
                *pos += 1;
            }
            match peek_clause(lines, *pos, indent).map(|l| (&l.kind, l.line)) {
                Some((LineKind::Header(Header::Def { name, params }, inline), def_line)) => {
                    *pos += 1;
                    let body = parse_body(lines, pos, indent, inline.clone(), def_line)?;
                    Ok(vec![Stmt::new(
                        StmtKind::FunctionDef(FunctionDef {
                            name: name.clone(),
                            params: params.clone(),
                            decorators,
                            body,
                        }),
                        def_line,
                    )])
                }
                Some((LineKind::Header(Header::Class { .. }, _), class_line)) => {
                    Err(PyVbaError::unsupported("class decorator", class_line))
                }
                _ => Err(PyVbaError::ParseError {
                    line,
                    message: "decorator must be followed by a function definition".to_string(),
                }),
            }
        }
        LineKind::Header(header, inline) => {
            let inline = inline.clone();
            match header {
                Header::Def { name, params } => {
                    let body = parse_body(lines, pos, indent, inline, line)?;
                    Ok(vec![Stmt::new(
                        StmtKind::FunctionDef(FunctionDef {
                            name: name.clone(),
                            params: params.clone(),
                            decorators: Vec::new(),
                            body,
                        }),
                        line,
                    )])
                }
                Header::Class { name, bases } => {
                    let body = parse_body(lines, pos, indent, inline, line)?;
                    Ok(vec![Stmt::new(
                        StmtKind::ClassDef(ClassDef {
                            name: name.clone(),
                            bases: bases.clone(),
                            body,
                        }),
                        line,
                    )])
                }
                Header::If(test) => {
                    let body = parse_body(lines, pos, indent, inline, line)?;
                    let orelse = parse_if_tail(lines, pos, indent)?;
                    Ok(vec![Stmt::new(
                        StmtKind::If {
                            test: test.clone(),
                            body,
                            orelse,
                        },
                        line,
                    )])
                }
                Header::For { target, iter } => {
                    let body = parse_body(lines, pos, indent, inline, line)?;
                    reject_loop_else(lines, *pos, indent)?;
                    Ok(vec![Stmt::new(
                        StmtKind::For {
                            target: target.clone(),
                            iter: iter.clone(),
                            body,
                        },
                        line,
                    )])
                }
                Header::While(test) => {
                    let body = parse_body(lines, pos, indent, inline, line)?;
                    reject_loop_else(lines, *pos, indent)?;
                    Ok(vec![Stmt::new(
                        StmtKind::While {
                            test: test.clone(),
                            body,
                        },
                        line,
                    )])
                }
                Header::Try => {
                    let body = parse_body(lines, pos, indent, inline, line)?;
                    let (handlers, finalbody) = parse_try_tail(lines, pos, indent, line)?;
                    Ok(vec![Stmt::new(
                        StmtKind::Try {
                            body,
                            handlers,
                            finalbody,
                        },
                        line,
                    )])
                }
                Header::Elif(_) | Header::Else | Header::Except { .. } | Header::Finally => {
                    Err(PyVbaError::ParseError {
                        line,
                        message: format!("'{}' without a matching block", header.keyword()),
                    })
                }
            }
        }
    }
}

/// `elif` / `else` clauses following an `if` body
fn parse_if_tail(lines: &[ParsedLine], pos: &mut usize, indent: usize) -> Result<Vec<Stmt>> {
    let Some(next) = peek_clause(lines, *pos, indent) else {
        return Ok(Vec::new());
    };
    match &next.kind {
        LineKind::Header(Header::Elif(test), inline) => {
            let line = next.line;
            *pos += 1;
            let body = parse_body(lines, pos, indent, inline.clone(), line)?;
            let orelse = parse_if_tail(lines, pos, indent)?;
            Ok(vec![Stmt::new(
                StmtKind::If {
                    test: test.clone(),
                    body,
                    orelse,
                },
                line,
            )])
        }
        LineKind::Header(Header::Else, inline) => {
            let line = next.line;
            *pos += 1;
            parse_body(lines, pos, indent, inline.clone(), line)
        }
        _ => Ok(Vec::new()),
    }
}

fn reject_loop_else(lines: &[ParsedLine], pos: usize, indent: usize) -> Result<()> {
    match peek_clause(lines, pos, indent) {
        Some(ParsedLine {
            kind: LineKind::Header(Header::Else, _),
            line,
            ..
        }) => Err(PyVbaError::unsupported("else clause on a loop", *line)),
        _ => Ok(()),
    }
}

/// `except` / `finally` clauses following a `try` body
fn parse_try_tail(
    lines: &[ParsedLine],
    pos: &mut usize,
    indent: usize,
    try_line: usize,
) -> Result<(Vec<ExceptHandler>, Vec<Stmt>)> {
    let mut handlers = Vec::new();
    let mut finalbody = Vec::new();

    while let Some(next) = peek_clause(lines, *pos, indent) {
        let line = next.line;
        match &next.kind {
            LineKind::Header(Header::Except { kind, name }, inline) => {
                *pos += 1;
                let body = parse_body(lines, pos, indent, inline.clone(), line)?;
                handlers.push(ExceptHandler {
                    kind: kind.clone(),
                    name: name.clone(),
                    body,
                });
            }
            LineKind::Header(Header::Else, _) => {
                return Err(PyVbaError::unsupported("else clause on a try statement", line));
            }
            LineKind::Header(Header::Finally, inline) => {
                *pos += 1;
                finalbody = parse_body(lines, pos, indent, inline.clone(), line)?;
                break;
            }
            _ => break,
        }
    }

    if handlers.is_empty() && finalbody.is_empty() {
        return Err(PyVbaError::ParseError {
            line: try_line,
            message: "expected 'except' or 'finally' block".to_string(),
        });
    }
    Ok((handlers, finalbody))
}

fn syntax_error(err: pest::error::Error<Rule>, start_line: usize) -> PyVbaError {
    let (line, col) = match err.line_col {
        LineColLocation::Pos(pos) => pos,
        LineColLocation::Span(start, _) => start,
    };
    PyVbaError::ParseError {
        line: start_line + line - 1,
        message: format!("invalid syntax at column {col}: {}", err.variant.message()),
    }
}

/// Parse one logical line
fn parse_line(text: &str, line: usize) -> Result<LineKind> {
    let mut pairs = PythonParser::parse(Rule::line, text).map_err(|e| syntax_error(e, line))?;
    let inner = pairs
        .next()
        .and_then(|p| p.into_inner().next())
        .ok_or_else(|| PyVbaError::ParseError {
            line,
            message: "empty line".to_string(),
        })?;

    let builder = LineBuilder { line };
    match inner.as_rule() {
        Rule::decorator => Ok(LineKind::Decorator(builder.first_expr(inner)?)),
        Rule::simple_stmts => Ok(LineKind::Simple(builder.simple_stmts(inner)?)),
        _ => builder.header(inner),
    }
}

/// Builds AST nodes from the pairs of one logical line
struct LineBuilder {
    line: usize,
}

impl LineBuilder {
    fn error(&self, message: impl Into<String>) -> PyVbaError {
        PyVbaError::ParseError {
            line: self.line,
            message: message.into(),
        }
    }

    fn stmt(&self, kind: StmtKind) -> Stmt {
        Stmt::new(kind, self.line)
    }

    /// Build the first expression-like child of `pair`
    fn first_expr(&self, pair: Pair<Rule>) -> Result<Expr> {
        let child = pair
            .into_inner()
            .find(|p| is_expr_rule(p.as_rule()))
            .ok_or_else(|| self.error("expected an expression"))?;
        self.expr(child)
    }

    fn header(&self, pair: Pair<Rule>) -> Result<LineKind> {
        let rule = pair.as_rule();
        let mut name = None;
        let mut params = Vec::new();
        let mut bases = Vec::new();
        let mut exprs = Vec::new();
        let mut inline = Vec::new();

        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::name => name = Some(child.as_str().to_string()),
                Rule::param_list => {
                    params = child.into_inner().map(|p| p.as_str().to_string()).collect();
                }
                Rule::base_list => {
                    bases = child
                        .into_inner()
                        .map(|p| self.expr(p))
                        .collect::<Result<Vec<_>>>()?;
                }
                Rule::inline_body => {
                    if let Some(stmts) = child.into_inner().next() {
                        inline = self.simple_stmts(stmts)?;
                    }
                }
                r if is_expr_rule(r) => exprs.push(self.expr(child)?),
                _ => {}
            }
        }

        let mut exprs = exprs.into_iter();
        let header = match rule {
            Rule::def_header => Header::Def {
                name: name.ok_or_else(|| self.error("missing function name"))?,
                params,
            },
            Rule::class_header => Header::Class {
                name: name.ok_or_else(|| self.error("missing class name"))?,
                bases,
            },
            Rule::if_header => Header::If(exprs.next().ok_or_else(|| self.error("missing condition"))?),
            Rule::elif_header => Header::Elif(exprs.next().ok_or_else(|| self.error("missing condition"))?),
            Rule::else_header => Header::Else,
            Rule::for_header => {
                let target = exprs.next().ok_or_else(|| self.error("missing loop target"))?;
                let iter = exprs.next().ok_or_else(|| self.error("missing loop iterable"))?;
                Header::For { target, iter }
            }
            Rule::while_header => Header::While(exprs.next().ok_or_else(|| self.error("missing condition"))?),
            Rule::try_header => Header::Try,
            Rule::except_header => Header::Except {
                kind: exprs.next(),
                name,
            },
            Rule::finally_header => Header::Finally,
            other => return Err(self.error(format!("unexpected line form {other:?}"))),
        };
        Ok(LineKind::Header(header, inline))
    }

    fn simple_stmts(&self, pair: Pair<Rule>) -> Result<Vec<Stmt>> {
        pair.into_inner().map(|p| self.simple_stmt(p)).collect()
    }

    fn simple_stmt(&self, pair: Pair<Rule>) -> Result<Stmt> {
        let kind = match pair.as_rule() {
            Rule::pass_stmt => StmtKind::Pass,
            Rule::break_stmt => StmtKind::Break,
            Rule::continue_stmt => StmtKind::Continue,
            Rule::return_stmt => {
                let value = pair
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::expr_list)
                    .map(|p| self.expr(p))
                    .transpose()?;
                StmtKind::Return(value)
            }
            Rule::import_stmt => StmtKind::Import(pair.as_str().trim().to_string()),
            Rule::aug_assign => {
                let mut inner = pair.into_inner();
                let target = self.next_expr(&mut inner)?;
                let op = match inner.next().map(|p| p.as_str()) {
                    Some("+=") => BinOp::Add,
                    Some("-=") => BinOp::Sub,
                    Some("*=") => BinOp::Mult,
                    Some("/=") => BinOp::Div,
                    Some("//=") => BinOp::FloorDiv,
                    Some("%=") => BinOp::Mod,
                    Some("**=") => BinOp::Pow,
                    other => return Err(self.error(format!("unknown augmented operator {other:?}"))),
                };
                let value = self.next_expr(&mut inner)?;
                StmtKind::AugAssign { target, op, value }
            }
            Rule::assign => {
                let mut parts = pair
                    .into_inner()
                    .map(|p| self.expr(p))
                    .collect::<Result<Vec<_>>>()?;
                let value = parts.pop().ok_or_else(|| self.error("missing assigned value"))?;
                StmtKind::Assign {
                    targets: parts,
                    value,
                }
            }
            Rule::expr_stmt => StmtKind::Expr(self.first_expr(pair)?),
            other => return Err(self.error(format!("unexpected statement form {other:?}"))),
        };
        Ok(self.stmt(kind))
    }

    fn next_expr<'i>(&self, inner: &mut impl Iterator<Item = Pair<'i, Rule>>) -> Result<Expr> {
        let pair = inner.next().ok_or_else(|| self.error("expected an expression"))?;
        self.expr(pair)
    }

    fn expr(&self, pair: Pair<Rule>) -> Result<Expr> {
        match pair.as_rule() {
            Rule::expr => self.first_expr(pair),
            Rule::expr_list | Rule::target_list => self.expr_list(pair),
            Rule::or_test => self.bool_chain(pair, Rule::and_test, BoolOp::Or),
            Rule::and_test => self.bool_chain(pair, Rule::not_test, BoolOp::And),
            Rule::not_test => {
                let mut inner = pair.into_inner();
                let first = inner.next().ok_or_else(|| self.error("expected an expression"))?;
                if first.as_rule() == Rule::kw_not {
                    Ok(Expr::UnaryOp {
                        op: UnaryOp::Not,
                        operand: Box::new(self.next_expr(&mut inner)?),
                    })
                } else {
                    self.expr(first)
                }
            }
            Rule::comparison => self.comparison(pair),
            Rule::arith | Rule::term => self.binary_chain(pair),
            Rule::factor => {
                let mut inner = pair.into_inner();
                let first = inner.next().ok_or_else(|| self.error("expected an expression"))?;
                if first.as_rule() == Rule::unary_op {
                    let op = match first.into_inner().next().map(|p| p.as_rule()) {
                        Some(Rule::op_neg) => UnaryOp::USub,
                        _ => UnaryOp::UAdd,
                    };
                    Ok(Expr::UnaryOp {
                        op,
                        operand: Box::new(self.next_expr(&mut inner)?),
                    })
                } else {
                    self.expr(first)
                }
            }
            Rule::power => {
                let mut inner = pair.into_inner();
                let base = self.next_expr(&mut inner)?;
                match inner.next() {
                    Some(exponent) => Ok(Expr::BinOp {
                        left: Box::new(base),
                        op: BinOp::Pow,
                        right: Box::new(self.expr(exponent)?),
                    }),
                    None => Ok(base),
                }
            }
            Rule::primary => self.primary(pair),
            Rule::paren => match pair.into_inner().next() {
                Some(list) => self.expr_list(list),
                None => Ok(Expr::Tuple(Vec::new())),
            },
            Rule::list_comp => {
                let mut inner = pair.into_inner();
                let elt = self.next_expr(&mut inner)?;
                let generators = inner.map(|p| self.comprehension(p)).collect::<Result<Vec<_>>>()?;
                Ok(Expr::ListComp {
                    elt: Box::new(elt),
                    generators,
                })
            }
            Rule::list_display => Ok(Expr::List(
                pair.into_inner().map(|p| self.expr(p)).collect::<Result<Vec<_>>>()?,
            )),
            Rule::dict_display => {
                let items = pair
                    .into_inner()
                    .map(|item| {
                        let mut kv = item.into_inner();
                        Ok((self.next_expr(&mut kv)?, self.next_expr(&mut kv)?))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Expr::Dict(items))
            }
            Rule::number => self.number(pair),
            Rule::string => self.string(pair),
            Rule::name => Ok(Expr::Name(pair.as_str().to_string())),
            other => Err(self.error(format!("unexpected expression form {other:?}"))),
        }
    }

    /// `a, b` builds a tuple; a single item without trailing comma is itself
    fn expr_list(&self, pair: Pair<Rule>) -> Result<Expr> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        for child in pair.into_inner() {
            if child.as_rule() == Rule::trailing_comma {
                trailing_comma = true;
            } else {
                items.push(self.expr(child)?);
            }
        }
        if items.len() == 1 && !trailing_comma {
            Ok(items.remove(0))
        } else {
            Ok(Expr::Tuple(items))
        }
    }

    fn bool_chain(&self, pair: Pair<Rule>, operand: Rule, op: BoolOp) -> Result<Expr> {
        let mut values = pair
            .into_inner()
            .filter(|p| p.as_rule() == operand)
            .map(|p| self.expr(p))
            .collect::<Result<Vec<_>>>()?;
        if values.len() == 1 {
            Ok(values.remove(0))
        } else {
            Ok(Expr::BoolOp { op, values })
        }
    }

    fn comparison(&self, pair: Pair<Rule>) -> Result<Expr> {
        let mut inner = pair.into_inner();
        let left = self.next_expr(&mut inner)?;
        let mut ops = Vec::new();
        let mut comparators = Vec::new();
        while let Some(op) = inner.next() {
            ops.push(match op.into_inner().next().map(|p| p.as_rule()) {
                Some(Rule::op_eq) => CmpOp::Eq,
                Some(Rule::op_ne) => CmpOp::NotEq,
                Some(Rule::op_le) => CmpOp::LtE,
                Some(Rule::op_ge) => CmpOp::GtE,
                Some(Rule::op_lt) => CmpOp::Lt,
                Some(Rule::op_gt) => CmpOp::Gt,
                Some(Rule::op_not_in) => CmpOp::NotIn,
                Some(Rule::op_in) => CmpOp::In,
                Some(Rule::op_is_not) => CmpOp::IsNot,
                _ => CmpOp::Is,
            });
            comparators.push(self.next_expr(&mut inner)?);
        }
        if ops.is_empty() {
            return Ok(left);
        }
        Ok(Expr::Compare {
            left: Box::new(left),
            ops,
            comparators,
        })
    }

    /// Left-associative `+ -` and `* / // %` chains
    fn binary_chain(&self, pair: Pair<Rule>) -> Result<Expr> {
        let mut inner = pair.into_inner();
        let mut left = self.next_expr(&mut inner)?;
        while let Some(op) = inner.next() {
            let op = match op.into_inner().next().map(|p| p.as_rule()) {
                Some(Rule::op_add) => BinOp::Add,
                Some(Rule::op_sub) => BinOp::Sub,
                Some(Rule::op_mul) => BinOp::Mult,
                Some(Rule::op_div) => BinOp::Div,
                Some(Rule::op_floordiv) => BinOp::FloorDiv,
                _ => BinOp::Mod,
            };
            let right = self.next_expr(&mut inner)?;
            left = Expr::BinOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn primary(&self, pair: Pair<Rule>) -> Result<Expr> {
        let mut inner = pair.into_inner();
        let mut expr = self.next_expr(&mut inner)?;
        for trailer in inner {
            expr = match trailer.as_rule() {
                Rule::call => {
                    let mut args = Vec::new();
                    let mut keywords = Vec::new();
                    for arg in trailer.into_inner() {
                        if arg.as_rule() == Rule::keyword_arg {
                            let mut kv = arg.into_inner();
                            let name = kv.next().map(|p| p.as_str().to_string()).unwrap_or_default();
                            keywords.push(Keyword {
                                arg: name,
                                value: self.next_expr(&mut kv)?,
                            });
                        } else {
                            args.push(self.expr(arg)?);
                        }
                    }
                    Expr::Call {
                        func: Box::new(expr),
                        args,
                        keywords,
                    }
                }
                Rule::subscript => Expr::Subscript {
                    value: Box::new(expr),
                    index: Box::new(self.first_expr(trailer)?),
                },
                Rule::attribute => Expr::Attribute {
                    value: Box::new(expr),
                    attr: trailer
                        .into_inner()
                        .next()
                        .map(|p| p.as_str().to_string())
                        .ok_or_else(|| self.error("missing attribute name"))?,
                },
                other => return Err(self.error(format!("unexpected trailer {other:?}"))),
            };
        }
        Ok(expr)
    }

    fn comprehension(&self, pair: Pair<Rule>) -> Result<Comprehension> {
        let mut target = None;
        let mut iter = None;
        let mut ifs = Vec::new();
        for child in pair.into_inner() {
            match child.as_rule() {
                Rule::target_list => target = Some(self.expr(child)?),
                Rule::or_test => iter = Some(self.expr(child)?),
                Rule::comp_if => ifs.push(self.first_expr(child)?),
                _ => {}
            }
        }
        Ok(Comprehension {
            target: target.ok_or_else(|| self.error("missing comprehension target"))?,
            iter: iter.ok_or_else(|| self.error("missing comprehension iterable"))?,
            ifs,
        })
    }

    fn number(&self, pair: Pair<Rule>) -> Result<Expr> {
        let lit = pair.into_inner().next().ok_or_else(|| self.error("empty number"))?;
        let text = lit.as_str();
        match lit.as_rule() {
            Rule::int_lit => text
                .parse::<i64>()
                .map(Expr::Int)
                .map_err(|_| self.error(format!("integer literal {text} is too large"))),
            _ => text
                .parse::<f64>()
                .map(Expr::Float)
                .map_err(|_| self.error(format!("invalid float literal {text}"))),
        }
    }

    fn string(&self, pair: Pair<Rule>) -> Result<Expr> {
        let lit = pair.into_inner().next().ok_or_else(|| self.error("empty string"))?;
        let text = lit.as_str();
        let body = match lit.as_rule() {
            Rule::triple_dq | Rule::triple_sq => &text[3..text.len() - 3],
            _ => &text[1..text.len() - 1],
        };
        Ok(Expr::Str(unescape(body)))
    }
}

fn is_expr_rule(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::expr
            | Rule::expr_list
            | Rule::target_list
            | Rule::or_test
            | Rule::and_test
            | Rule::not_test
            | Rule::comparison
            | Rule::arith
            | Rule::term
            | Rule::factor
            | Rule::power
            | Rule::primary
    )
}

/// Resolve backslash escapes in a string literal body
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests;
