//! luadoc: generate JSON documentation from annotated Lua source files.
//!
//! Two modes:
//!
//! - **single-file mode**: `luadoc api.lua [out.json]`
//! - **project mode**: `luadoc -p luadoc.json [out.json]`

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use luadoc::model::Documentation;
use luadoc::{parser, project, render};
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "luadoc",
    version,
    about = "Extract documentation from annotated Lua source files as JSON"
)]
struct Cli {
    /// Input file, then optional output file. In project mode only the output.
    #[arg(value_name = "PATHS", num_args = 0..=2)]
    paths: Vec<PathBuf>,

    /// Project configuration: a JSON object mapping namespaces to file lists
    #[arg(short = 'p', long, value_name = "CONFIG")]
    project: Option<PathBuf>,

    /// Emit single-line JSON instead of pretty-printed output
    #[arg(long)]
    compact: bool,

    /// Show debug diagnostics on stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Mode {
    Single {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    Project {
        config: PathBuf,
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn mode(&self) -> Result<Mode, clap::Error> {
        let mut paths = self.paths.iter().cloned();
        match &self.project {
            Some(config) => {
                let output = paths.next();
                if paths.next().is_some() {
                    return Err(Cli::command().error(
                        ErrorKind::TooManyValues,
                        "project mode takes at most one positional argument (the output file)",
                    ));
                }
                Ok(Mode::Project {
                    config: config.clone(),
                    output,
                })
            }
            None => match paths.next() {
                Some(input) => Ok(Mode::Single {
                    input,
                    output: paths.next(),
                }),
                None => Err(Cli::command().error(
                    ErrorKind::MissingRequiredArgument,
                    "an input file or --project <CONFIG> is required",
                )),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mode = cli.mode().unwrap_or_else(|e| e.exit());
    let (doc, output) = match mode {
        Mode::Single { input, output } => (single_file(&input)?, output),
        Mode::Project { config, output } => (project_mode(&config)?, output),
    };

    let json = render::render_json(&doc, !cli.compact)?;
    match output {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("documentation written to {}", path.display());
        }
        None => {
            io::stdout()
                .lock()
                .write_all(json.as_bytes())
                .context("failed to write stdout")?;
        }
    }
    Ok(())
}

/// Diagnostics go to stderr; stdout is reserved for the JSON document.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal())
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

fn single_file(input: &Path) -> Result<Documentation> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let doc = parser::parse_document(&content)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    info!("parsed {}", input.display());
    Ok(doc)
}

fn project_mode(config_path: &Path) -> Result<Documentation> {
    let config = project::ProjectConfig::load(config_path)?;
    info!(
        "loaded {} namespace(s) from {}",
        config.namespaces.len(),
        config_path.display()
    );
    project::parse_project(&config)
}
