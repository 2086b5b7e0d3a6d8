//! pyvba CLI - Python subset to VBA translator

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pyvba::emitter::emit;
use pyvba::harness::render_with_stub;
use pyvba::project::VbProject;
use pyvba::{transpile_with_options_and_diagnostics, TranslateOptions};

/// pyvba - Python subset to VBA translator
#[derive(Parser, Debug)]
#[command(name = "pyvba")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Translate annotated Python code to VBA modules", long_about = None)]
struct Cli {
    /// Input Python file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory for .bas/.cls files and project.json (default: <INPUT stem>_vba)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Name of the generated standard module
    #[arg(short, long, default_value = "PyMain")]
    module_name: String,

    /// Check only (don't generate output)
    #[arg(short, long)]
    check: bool,

    /// Print the primary module to stdout instead of writing files
    #[arg(long)]
    stdout: bool,

    /// Append a harness test stub for FUNCTION to the primary module
    #[arg(long, value_name = "FUNCTION")]
    test_stub: Option<String>,

    /// Emit JSON diagnostics to stderr (on failure only)
    #[arg(long)]
    diag_json: bool,

    /// Show debug information
    #[arg(short, long)]
    debug: bool,

    /// Show progress information
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    let source = std::fs::read_to_string(&cli.input)?;
    debug!(input = %cli.input.display(), bytes = source.len(), "read source");

    let options = TranslateOptions {
        module_name: cli.module_name.clone(),
    };
    let module = match transpile_with_options_and_diagnostics(&source, &options, Some(&cli.input)) {
        Ok(module) => module,
        Err(diags) => {
            print!("{}", diags.to_text());
            if cli.diag_json {
                eprintln!("{}", diags.to_json());
            }
            std::process::exit(1);
        }
    };

    if cli.check {
        println!("Translation successful");
        return Ok(());
    }

    let primary = match &cli.test_stub {
        Some(entry) => render_with_stub(&module, entry)?,
        None => emit(&module),
    };

    if cli.stdout {
        println!("{primary}");
        return Ok(());
    }

    let mut project = VbProject::from_module(&module);
    if let Some(first) = project.modules.first_mut() {
        first.text = primary;
    }

    let output_dir = cli.output.unwrap_or_else(|| {
        let stem = cli
            .input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("module");
        PathBuf::from(format!("{stem}_vba"))
    });
    let written = project.write_to_dir(&output_dir)?;
    info!(files = written.len(), "project written");
    println!("Translated to: {}", output_dir.display());

    Ok(())
}
