//! CLI command implementations

use anyhow::Context;
use pycycle_core::{CyclePath, ParseFailure, StructuralCycle};
use pycycle_indexer::{read_project, Project, ReadOptions};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Everything printed for one checked project.
#[derive(Debug, Serialize)]
pub struct Report {
    pub source: PathBuf,
    pub cycle: bool,
    /// Empty unless `cycle` is set.
    pub path: CyclePath,
    /// Modules whose repeated import was deferred behind a definition.
    pub suppressed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structural_cycles: Option<Vec<StructuralCycle>>,
    pub failures: Vec<ParseFailure>,
    pub truncated: bool,
    pub files_scanned: usize,
}

impl Report {
    pub fn from_project(project: &Project, all_cycles: bool) -> Self {
        let detection = project.detect();
        let cycle = detection.as_ref().is_some_and(|d| d.has_cycle());
        let suppressed = detection
            .map(|d| {
                d.suppressed
                    .iter()
                    .map(|&id| project.graph[id].name.clone())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            source: project.root_path.clone(),
            cycle,
            path: if cycle { project.cycle_path() } else { CyclePath::default() },
            suppressed,
            structural_cycles: all_cycles.then(|| project.structural_cycles()),
            failures: project.failures.clone(),
            truncated: project.truncated,
            files_scanned: project.files_scanned,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cycle {
            writeln!(f, "Cycle Found :(")?;
            if !self.path.is_empty() {
                writeln!(f, "{}", self.path)?;
            }
        } else {
            writeln!(f, "No worries, no cycles here!")?;
            writeln!(f, "If you think some cycle was missed, please open an Issue on Github.")?;
        }

        if let Some(cycles) = &self.structural_cycles {
            writeln!(f, "Structural cycles: {}", cycles.len())?;
            for cycle in cycles {
                writeln!(f, "  {}", cycle.members())?;
            }
        }

        if !self.failures.is_empty() {
            writeln!(f, "Files that failed to parse: {}", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "  {}: {}", failure.path.display(), failure.reason)?;
            }
        }

        if self.truncated {
            writeln!(
                f,
                "Scan stopped at the timeout after {} files; results are partial.",
                self.files_scanned
            )?;
        }

        writeln!(f, "Finished.")
    }
}

/// Check `source` for import cycles, print the report, and return whether a
/// cycle was found.
pub fn check(
    source: &Path,
    options: &ReadOptions,
    format: OutputFormat,
    all_cycles: bool,
) -> anyhow::Result<bool> {
    let project = read_project(source, options)
        .with_context(|| format!("cannot check {}", source.display()))?;

    tracing::info!(
        "Project successfully transformed to AST, checking imports for cycles.."
    );
    let report = Report::from_project(&project, all_cycles);
    for name in &report.suppressed {
        tracing::debug!("Repeated import of '{}' is deferred inside a function or class", name);
    }

    match format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(report.cycle)
}
