//! Error types for reading and parsing a project

use std::path::PathBuf;

/// Per-file failure. Never fatal for a project read.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported source encoding '{0}'")]
    UnsupportedEncoding(String),

    #[error("source is not valid {encoding}: {message}")]
    Decode { encoding: String, message: String },

    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser produced no syntax tree")]
    NoTree,

    #[error("syntax error at line {line}")]
    Syntax { line: u32 },
}

/// Problems with `[tool.pycycle]` or caller supplied ignore patterns.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid {}: {source}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid ignore pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
}

/// Fatal errors of [`read_project`](crate::read_project).
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}
