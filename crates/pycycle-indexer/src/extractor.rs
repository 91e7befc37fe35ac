//! Language extractor trait definition

use crate::error::ExtractError;
use pycycle_core::ParsedModule;
use std::path::Path;

/// Turns decoded source into import and definition events.
pub trait LanguageExtractor: Send + Sync {
    /// Human readable language name, used in logs.
    fn language(&self) -> &'static str;

    fn extract(&self, path: &Path, source: &str) -> Result<ParsedModule, ExtractError>;
}
