//! Pool of tree-sitter parsers shared across rayon workers
//!
//! A `Parser` is `Send` but not `Sync`, so each parse checks one out of the
//! idle list and returns it afterwards. The pool grows to the number of
//! threads that parse at the same time and never shrinks.

use crate::error::ExtractError;
use std::sync::{Mutex, PoisonError};
use tree_sitter::{Language, Parser, Tree};

pub struct ParserPool {
    language: Language,
    idle: Mutex<Vec<Parser>>,
}

impl ParserPool {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Pool for Python sources.
    pub fn python() -> Self {
        Self::new(tree_sitter_python::LANGUAGE.into())
    }

    pub fn parse(&self, source: &str) -> Result<Tree, ExtractError> {
        let mut parser = self.checkout()?;
        let tree = parser.parse(source, None);
        self.checkin(parser);
        tree.ok_or(ExtractError::NoTree)
    }

    /// Parsers currently waiting for work.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn checkout(&self) -> Result<Parser, ExtractError> {
        let cached = self.idle.lock().unwrap_or_else(PoisonError::into_inner).pop();
        match cached {
            Some(parser) => Ok(parser),
            None => {
                tracing::trace!("Creating parser");
                let mut parser = Parser::new();
                parser.set_language(&self.language)?;
                Ok(parser)
            }
        }
    }

    fn checkin(&self, mut parser: Parser) {
        parser.reset();
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(parser);
    }
}

impl std::fmt::Debug for ParserPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserPool")
            .field("idle", &self.idle_count())
            .finish()
    }
}
