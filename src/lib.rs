//! pyvba - Python subset to VBA translator
//!
//! # Overview
//! Translates annotated Python functions and classes into VBA standard and
//! class modules. Types come from `@vbmeta(...)` decorators; untyped values
//! become `Variant`.

pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod harness;
pub mod parser;
pub mod project;
pub mod semantic;
pub mod vba;

use std::path::Path;

pub use error::{PyVbaError, Result};
pub use semantic::{translate, translate_with_options, TranslateOptions};
pub use vba::ProceduralModule;

/// Parse Python source into its AST
pub fn parse(source: &str) -> Result<parser::Module> {
    parser::parse(source)
}

/// Parse and translate Python source
pub fn translate_source(source: &str) -> Result<ProceduralModule> {
    translate_source_with_options(source, &TranslateOptions::default())
}

pub fn translate_source_with_options(source: &str, options: &TranslateOptions) -> Result<ProceduralModule> {
    let module = parser::parse(source)?;
    semantic::translate_with_options(&module, options)
}

/// Translate Python source to the text of the primary VBA module
pub fn transpile(source: &str) -> Result<String> {
    let module = translate_source(source)?;
    Ok(emitter::emit(&module))
}

/// Translate Python source, reporting failure as diagnostics
pub fn transpile_with_diagnostics(
    source: &str,
    file: Option<&Path>,
) -> std::result::Result<ProceduralModule, diagnostics::Diagnostics> {
    transpile_with_options_and_diagnostics(source, &TranslateOptions::default(), file)
}

pub fn transpile_with_options_and_diagnostics(
    source: &str,
    options: &TranslateOptions,
    file: Option<&Path>,
) -> std::result::Result<ProceduralModule, diagnostics::Diagnostics> {
    translate_source_with_options(source, options)
        .map_err(|err| diagnostics::from_error(&err, Some(source), file))
}
