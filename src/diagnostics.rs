//! Diagnostics - translation failures rendered for people and tools

use serde::Serialize;
use std::path::Path;

use crate::error::PyVbaError;

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticSpan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub span: DiagnosticSpan,
    pub phase: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Diagnostics {
    pub diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d.severity, DiagnosticSeverity::Error))
    }

    pub fn add(&mut self, diag: Diagnostic) {
        self.diagnostics.push(diag);
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for diag in &self.diagnostics {
            let file = diag.span.file.as_deref().unwrap_or("<input>");
            out.push_str(&format!(
                "[{}] {}:{}:{} {}\n",
                diag.code, file, diag.span.line, diag.span.column, diag.message
            ));
        }
        out
    }
}

pub fn span_for_line(file: Option<&Path>, line: usize, column: usize, len: usize) -> DiagnosticSpan {
    let end_col = if len == 0 {
        column
    } else {
        column + len.saturating_sub(1)
    };
    DiagnosticSpan {
        file: file.map(|p| p.display().to_string()),
        line,
        column,
        end_line: line,
        end_column: end_col,
    }
}

pub fn error_diag(code: &str, message: String, span: DiagnosticSpan, phase: &str) -> Diagnostic {
    Diagnostic {
        code: code.to_string(),
        message,
        severity: DiagnosticSeverity::Error,
        span,
        phase: phase.to_string(),
    }
}

/// Stable code and phase of an error
pub fn classify(err: &PyVbaError) -> (&'static str, &'static str) {
    match err {
        PyVbaError::ParseError { .. } => ("PV-PARSE-ERROR", "parse"),
        PyVbaError::InvalidAnnotation { .. } => ("PV-INVALID-ANNOTATION", "annotation"),
        PyVbaError::UnknownType { .. } => ("PV-UNKNOWN-TYPE", "annotation"),
        PyVbaError::NoHandler { .. } => ("PV-NO-HANDLER", "translate"),
        PyVbaError::UnsupportedConstruct { .. } => ("PV-UNSUPPORTED", "translate"),
        PyVbaError::MissingProcedure { .. } => ("PV-MISSING-PROCEDURE", "harness"),
        PyVbaError::IoError(_) => ("PV-IO-ERROR", "io"),
    }
}

/// Diagnostics for one error.
///
/// With the source at hand the span covers the offending line from its first
/// non-blank character; otherwise it points at column 1.
pub fn from_error(err: &PyVbaError, source: Option<&str>, file: Option<&Path>) -> Diagnostics {
    let (code, phase) = classify(err);
    let line = err.line().max(1);
    let text = source.and_then(|s| s.lines().nth(line - 1));
    let (column, len) = match text {
        Some(text) => {
            let trimmed = text.trim_start();
            (text.len() - trimmed.len() + 1, trimmed.trim_end().len())
        }
        None => (1, 1),
    };
    let mut diags = Diagnostics::new();
    diags.add(error_diag(
        code,
        err.to_string(),
        span_for_line(file, line, column, len),
        phase,
    ));
    diags
}
