//! Reads a project directory into a [`ModuleGraph`]

use crate::config::{load_pyproject, IgnoreSet, ReadOptions};
use crate::encoding::decode_source;
use crate::error::{ExtractError, ProjectError};
use crate::extractor::LanguageExtractor;
use crate::languages::PythonExtractor;
use crate::scanner::collect_sources;
use pycycle_core::{
    detect, extract_cycle_path, has_cycle, structural_cycles, CyclePath, Detection, GraphBuilder,
    ModuleGraph, ModuleId, ModuleNode, ParseFailure, ParsedModule, SourceResolver,
    StructuralCycle,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Result of [`read_project`].
#[derive(Debug, Clone)]
pub struct Project {
    pub root_path: PathBuf,
    pub graph: ModuleGraph,
    pub failures: Vec<ParseFailure>,
    /// The scan deadline cut the walk short.
    pub truncated: bool,
    pub files_scanned: usize,
}

impl Project {
    /// The first scanned module, if any file was found.
    pub fn root(&self) -> Option<ModuleId> {
        self.graph.root()
    }

    pub fn root_node(&self) -> Option<&ModuleNode> {
        self.root().and_then(|id| self.graph.node(id))
    }

    pub fn has_cycle(&self) -> bool {
        self.root().is_some_and(|root| has_cycle(&self.graph, root))
    }

    pub fn detect(&self) -> Option<Detection> {
        self.root().map(|root| detect(&self.graph, root))
    }

    /// Empty when there is no root or no cycle is reachable from it.
    pub fn cycle_path(&self) -> CyclePath {
        self.root()
            .map(|root| extract_cycle_path(&self.graph, root))
            .unwrap_or_default()
    }

    pub fn structural_cycles(&self) -> Vec<StructuralCycle> {
        structural_cycles(&self.graph)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Walk `root`, parse every source file and build the module graph.
///
/// Only an invalid root is fatal. A broken `pyproject.toml` or ignore pattern
/// is logged and skipped. Files that cannot be read, decoded or parsed are
/// recorded in [`Project::failures`].
pub fn read_project(root: impl AsRef<Path>, options: &ReadOptions) -> Result<Project, ProjectError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(ProjectError::NotADirectory(root.to_path_buf()));
    }

    let options = if options.use_pyproject {
        match load_pyproject(root) {
            Ok(Some(section)) => options.clone().merge(section),
            Ok(None) => options.clone(),
            Err(err) => {
                tracing::warn!("Ignoring project settings: {}", err);
                options.clone()
            }
        }
    } else {
        options.clone()
    };

    let started = Instant::now();
    let ignores = IgnoreSet::skipping_invalid(&options.ignore);
    let scan = collect_sources(root, &ignores, &options.extension, options.deadline);

    let extractor = PythonExtractor::new();
    let parsed: Vec<(PathBuf, Result<ParsedModule, ExtractError>)> = scan
        .files
        .par_iter()
        .map(|path| (path.clone(), parse_file(&extractor, path, options.encoding.as_deref())))
        .collect();

    let resolver = SourceResolver::with_extension(options.extension.clone());
    let mut builder = GraphBuilder::with_resolver(root, resolver);
    for (path, result) in parsed {
        match result {
            Ok(module) => {
                builder.ingest(&module);
            }
            Err(err) => builder.record_failure(path, err.to_string()),
        }
    }
    let output = builder.finish();

    tracing::info!(
        "Read {} files into {} modules and {} imports in {:?}",
        scan.files.len(),
        output.graph.module_count(),
        output.graph.import_count(),
        started.elapsed()
    );

    Ok(Project {
        root_path: root.to_path_buf(),
        graph: output.graph,
        failures: output.failures,
        truncated: scan.truncated,
        files_scanned: scan.files.len(),
    })
}

/// Read, decode and extract one file.
pub fn parse_file(
    extractor: &dyn LanguageExtractor,
    path: &Path,
    encoding: Option<&str>,
) -> Result<ParsedModule, ExtractError> {
    let bytes = std::fs::read(path)?;
    let source = decode_source(&bytes, encoding)?;
    tracing::trace!("Parsing {} as {}", path.display(), extractor.language());
    extractor.extract(path, &source)
}
