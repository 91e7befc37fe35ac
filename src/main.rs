//! pycycle CLI entry point

use clap::{CommandFactory, Parser};
use commands::OutputFormat;
use anyhow::Context;
use pycycle_indexer::{IgnoreSet, ReadOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

const EXAMPLES: &str = "\
Examples:
  Get the circular imports in current project:
    $ pycycle --here
  Look for circular imports in another project:
    $ pycycle --source /home/user/workspace/awesome_project";

#[derive(Parser)]
#[command(name = "pycycle", version)]
#[command(about = "Find circular imports in Python projects", long_about = None)]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Try to find cycles in the current project
    #[arg(long, conflicts_with = "source")]
    here: bool,

    /// Try to find cycles in the path provided
    #[arg(long, value_name = "PATH")]
    source: Option<PathBuf>,

    /// Extra files or directories to skip (repeatable, comma separated)
    #[arg(long, value_name = "NAME", value_delimiter = ',')]
    ignore: Vec<String>,

    /// Source encoding to use instead of coding cookies
    #[arg(long, value_name = "ENCODING")]
    encoding: Option<String>,

    /// Stop scanning after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also list every strongly connected group of modules
    #[arg(long)]
    all_cycles: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn read_options(&self) -> ReadOptions {
        let mut options = ReadOptions::default().with_ignore(self.ignore.iter().cloned());
        if let Some(encoding) = &self.encoding {
            options = options.with_encoding(encoding.clone());
        }
        if let Some(secs) = self.timeout {
            options = options.with_deadline(Duration::from_secs(secs));
        }
        options
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "pycycle={log_level},pycycle_core={log_level},pycycle_indexer={log_level}"
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    IgnoreSet::new(&cli.ignore).context("invalid --ignore")?;

    let source = if let Some(source) = &cli.source {
        let source = std::path::absolute(source)?;
        tracing::info!("Target source provided: {}", source.display());
        source
    } else if cli.here {
        std::env::current_dir()?
    } else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let found = commands::check(&source, &cli.read_options(), cli.format, cli.all_cycles)?;
    Ok(if found { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
