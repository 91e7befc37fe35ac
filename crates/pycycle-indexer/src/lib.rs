//! Project reading for pycycle: file walking, decoding and Python parsing

pub mod config;
pub mod encoding;
pub mod error;
pub mod extractor;
pub mod languages;
pub mod parser_pool;
pub mod project;
pub mod scanner;


#[cfg(test)]
pub mod test_utils;

pub use config::{load_pyproject, IgnoreSet, PycycleSection, ReadOptions, DEFAULT_IGNORES};
pub use encoding::{decode_source, detect_cookie, SourceEncoding};
pub use error::{ConfigError, ExtractError, ProjectError};
pub use extractor::LanguageExtractor;
pub use languages::PythonExtractor;
pub use parser_pool::ParserPool;
pub use project::{parse_file, read_project, Project};
pub use scanner::{collect_sources, ScanOutcome};
