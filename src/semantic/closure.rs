//! Free-variable analysis for comprehensions
//!
//! VBA has no closures, so every outer name a comprehension reads becomes an
//! explicit parameter of its helper function. Captured names are listed in
//! order of first textual occurrence over the element, the iterable and the
//! filter, which keeps helper signatures and call sites stable.

use crate::parser::{Comprehension, Expr};

/// Names that never need capturing
const CONSTANT_NAMES: [&str; 3] = ["True", "False", "None"];

/// How a comprehension's iterable is consumed by its helper
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IterSource<'a> {
    /// `range(start, stop)`: a counted loop inside the helper
    Range { start: &'a Expr, stop: &'a Expr },
    /// A captured name walked with `For Each`
    Name(&'a str),
    /// Any other expression, evaluated at the call site
    Value(&'a Expr),
}

pub fn classify_iter(iter: &Expr) -> IterSource<'_> {
    match iter {
        Expr::Name(id) => IterSource::Name(id),
        Expr::Call {
            func,
            args,
            keywords,
        } if func.as_name() == Some("range") && args.len() == 2 && keywords.is_empty() => {
            IterSource::Range {
                start: &args[0],
                stop: &args[1],
            }
        }
        other => IterSource::Value(other),
    }
}

/// Outer names read by a single-generator comprehension
pub fn free_variables(elt: &Expr, generator: &Comprehension, self_name: Option<&str>) -> Vec<String> {
    let mut collector = Collector::default();
    collector.bound.extend(self_name.map(str::to_string));
    collector.bind_target(&generator.target);

    collector.visit(elt);
    if !matches!(classify_iter(&generator.iter), IterSource::Value(_)) {
        collector.visit(&generator.iter);
    }
    for cond in &generator.ifs {
        collector.visit(cond);
    }
    collector.found
}

#[derive(Default)]
struct Collector {
    bound: Vec<String>,
    found: Vec<String>,
}

impl Collector {
    fn bind_target(&mut self, target: &Expr) {
        match target {
            Expr::Name(id) => self.bound.push(id.clone()),
            Expr::Tuple(items) | Expr::List(items) => {
                for item in items {
                    self.bind_target(item);
                }
            }
            _ => {}
        }
    }

    fn visit(&mut self, expr: &Expr) {
        match expr {
            Expr::Name(id) => {
                if !CONSTANT_NAMES.contains(&id.as_str())
                    && !self.bound.contains(id)
                    && !self.found.contains(id)
                {
                    self.found.push(id.clone());
                }
            }
            Expr::Int(_) | Expr::Float(_) | Expr::Str(_) => {}
            Expr::List(items) | Expr::Tuple(items) => items.iter().for_each(|e| self.visit(e)),
            Expr::Dict(pairs) => {
                for (key, value) in pairs {
                    self.visit(key);
                    self.visit(value);
                }
            }
            Expr::BinOp { left, right, .. } => {
                self.visit(left);
                self.visit(right);
            }
            Expr::UnaryOp { operand, .. } => self.visit(operand),
            Expr::BoolOp { values, .. } => values.iter().for_each(|e| self.visit(e)),
            Expr::Compare {
                left, comparators, ..
            } => {
                self.visit(left);
                comparators.iter().for_each(|e| self.visit(e));
            }
            Expr::Call {
                func,
                args,
                keywords,
            } => {
                // bare call targets are procedures, not variables
                if func.as_name().is_none() {
                    self.visit(func);
                }
                args.iter().for_each(|e| self.visit(e));
                keywords.iter().for_each(|k| self.visit(&k.value));
            }
            Expr::Attribute { value, .. } => self.visit(value),
            Expr::Subscript { value, index } => {
                self.visit(value);
                self.visit(index);
            }
            Expr::ListComp { elt, generators } => {
                let depth = self.bound.len();
                for generator in generators {
                    self.bind_target(&generator.target);
                }
                self.visit(elt);
                for generator in generators {
                    self.visit(&generator.iter);
                    generator.ifs.iter().for_each(|e| self.visit(e));
                }
                self.bound.truncate(depth);
            }
        }
    }
}
