//! Logical line splitting - comments, bracket continuation, triple quotes

use crate::error::{PyVbaError, Result};

/// One logical line of source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Indentation width of the first physical line
    pub indent: usize,
    /// 1-based line number of the first physical line
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single(char),
    Triple(char),
}

/// Scanner state carried across the physical lines of one logical line
#[derive(Debug, Default)]
struct Scanner {
    depth: i32,
    quote: Option<Quote>,
}

impl Scanner {
    /// Scan one physical line, returning its text with any comment removed
    fn scan(&mut self, raw: &str) -> String {
        let chars: Vec<char> = raw.chars().collect();
        let mut out = String::with_capacity(raw.len());
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            match self.quote {
                Some(Quote::Triple(q)) => {
                    if c == '\\' && i + 1 < chars.len() {
                        out.push(c);
                        out.push(chars[i + 1]);
                        i += 2;
                        continue;
                    }
                    if c == q && chars.get(i + 1) == Some(&q) && chars.get(i + 2) == Some(&q) {
                        out.extend([q, q, q]);
                        self.quote = None;
                        i += 3;
                        continue;
                    }
                }
                Some(Quote::Single(q)) => {
                    if c == '\\' && i + 1 < chars.len() {
                        out.push(c);
                        out.push(chars[i + 1]);
                        i += 2;
                        continue;
                    }
                    if c == q {
                        self.quote = None;
                    }
                }
                None => match c {
                    '#' => break,
                    '"' | '\'' => {
                        if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                            out.extend([c, c, c]);
                            self.quote = Some(Quote::Triple(c));
                            i += 3;
                            continue;
                        }
                        self.quote = Some(Quote::Single(c));
                    }
                    '(' | '[' | '{' => self.depth += 1,
                    ')' | ']' | '}' => self.depth -= 1,
                    _ => {}
                },
            }
            out.push(c);
            i += 1;
        }
        out
    }
}

/// Indentation width; tabs advance to the next multiple of 8
fn indent_width(raw: &str) -> usize {
    let mut width = 0;
    for c in raw.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width = (width / 8 + 1) * 8,
            _ => break,
        }
    }
    width
}

/// Split source text into logical lines.
///
/// Blank and comment-only lines are dropped. Physical lines are joined
/// while a bracket is open, after a trailing backslash, or inside a
/// triple-quoted string.
pub fn logical_lines(source: &str) -> Result<Vec<LogicalLine>> {
    let mut lines = Vec::new();
    let mut pending: Option<LogicalLine> = None;
    let mut scanner = Scanner::default();

    for (idx, raw) in source.lines().enumerate() {
        let line_num = idx + 1;

        let mut current = match pending.take() {
            Some(current) => current,
            None => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                LogicalLine {
                    indent: indent_width(raw),
                    line: line_num,
                    text: String::new(),
                }
            }
        };

        let scanned = scanner.scan(if current.text.is_empty() {
            raw.trim_start()
        } else {
            raw
        });

        if let Some(Quote::Single(_)) = scanner.quote {
            return Err(PyVbaError::ParseError {
                line: line_num,
                message: "unterminated string literal".to_string(),
            });
        }

        let trimmed_end = scanned.trim_end();
        if scanner.quote.is_none() && trimmed_end.ends_with('\\') {
            current.text.push_str(&trimmed_end[..trimmed_end.len() - 1]);
            current.text.push(' ');
            pending = Some(current);
            continue;
        }

        current.text.push_str(&scanned);
        if scanner.quote.is_some() || scanner.depth > 0 {
            current.text.push('\n');
            pending = Some(current);
            continue;
        }

        scanner.depth = 0;
        if !current.text.trim().is_empty() {
            current.text = current.text.trim_end().to_string();
            lines.push(current);
        }
    }

    if let Some(current) = pending {
        return Err(PyVbaError::ParseError {
            line: current.line,
            message: "unexpected end of input inside an open bracket or string".to_string(),
        });
    }

    Ok(lines)
}
