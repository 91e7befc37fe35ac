//! Python language extractor using tree-sitter

use crate::error::ExtractError;
use crate::extractor::LanguageExtractor;
use crate::parser_pool::ParserPool;
use pycycle_core::{DefinitionEvent, ImportEvent, ParsedModule};
use std::path::Path;
use tree_sitter::Node;

pub struct PythonExtractor {
    pool: ParserPool,
}

impl PythonExtractor {
    pub fn new() -> Self {
        Self::with_pool(ParserPool::python())
    }

    pub fn with_pool(pool: ParserPool) -> Self {
        Self { pool }
    }

    fn line_of(node: Node) -> u32 {
        node.start_position().row as u32 + 1
    }

    fn text<'a>(node: Node, source: &'a str) -> Option<&'a str> {
        node.utf8_text(source.as_bytes()).ok()
    }

    /// Dotted name with any whitespace between the parts removed.
    fn dotted(node: Node, source: &str) -> Option<String> {
        let name: String = Self::text(node, source)?.split_whitespace().collect();
        (!name.is_empty()).then_some(name)
    }

    /// `a.b` from either `a.b` or `a.b as c`.
    fn imported_name(node: Node, source: &str) -> Option<String> {
        match node.kind() {
            "aliased_import" => Self::dotted(node.child_by_field_name("name")?, source),
            "dotted_name" => Self::dotted(node, source),
            _ => None,
        }
    }

    fn import_statement(node: Node, source: &str, scope: Option<&str>, out: &mut ParsedModule) {
        let line = Self::line_of(node);
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            let Some(specifier) = Self::imported_name(child, source) else {
                continue;
            };
            let mut event = ImportEvent::module_level(specifier, line);
            if let Some(scope) = scope {
                event = event.inside(scope);
            }
            out.imports.push(event);
        }
    }

    fn import_from_statement(node: Node, source: &str, scope: Option<&str>, out: &mut ParsedModule) {
        let line = Self::line_of(node);
        let Some(module_node) = node.child_by_field_name("module_name") else {
            return;
        };

        let (level, specifier) = match module_node.kind() {
            "relative_import" => {
                let mut level = 0;
                let mut specifier = None;
                let mut cursor = module_node.walk();
                for part in module_node.children(&mut cursor) {
                    match part.kind() {
                        "import_prefix" => {
                            level = Self::text(part, source)
                                .map(|dots| dots.matches('.').count() as u32)
                                .unwrap_or(0);
                        }
                        "dotted_name" => specifier = Self::dotted(part, source),
                        _ => {}
                    }
                }
                (level, specifier)
            }
            _ => (0, Self::dotted(module_node, source)),
        };

        let mut names = Vec::new();
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            if let Some(name) = Self::imported_name(child, source) {
                names.push(name);
            }
        }
        let mut cursor = node.walk();
        if node.children(&mut cursor).any(|c| c.kind() == "wildcard_import") {
            names.push("*".to_string());
        }

        let scoped = |event: ImportEvent| match scope {
            Some(scope) => event.inside(scope),
            None => event,
        };

        match specifier {
            Some(specifier) => {
                out.imports.push(scoped(
                    ImportEvent::module_level(specifier, line)
                        .relative(level)
                        .names(names),
                ));
            }
            // `from . import a, b` imports the sibling modules themselves.
            None => {
                for name in names.into_iter().filter(|n| n != "*") {
                    out.imports.push(scoped(
                        ImportEvent::module_level(name.clone(), line)
                            .relative(level)
                            .names([name]),
                    ));
                }
            }
        }
    }

    fn first_error_line(root: Node) -> u32 {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                return Self::line_of(node);
            }
            let mut cursor = node.walk();
            let children: Vec<Node> = node.children(&mut cursor).filter(|c| c.has_error()).collect();
            stack.extend(children.into_iter().rev());
        }
        Self::line_of(root)
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for PythonExtractor {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extract(&self, path: &Path, source: &str) -> Result<ParsedModule, ExtractError> {
        let tree = self.pool.parse(source)?;
        let root = tree.root_node();
        if root.has_error() {
            return Err(ExtractError::Syntax {
                line: Self::first_error_line(root),
            });
        }

        let mut module = ParsedModule::new(path);

        // Pre-order walk in source order, carrying the innermost def/class name.
        let mut stack: Vec<(Node, Option<String>)> = vec![(root, None)];
        while let Some((node, scope)) = stack.pop() {
            let mut child_scope = scope.clone();
            match node.kind() {
                "import_statement" => {
                    Self::import_statement(node, source, scope.as_deref(), &mut module);
                    continue;
                }
                "import_from_statement" => {
                    Self::import_from_statement(node, source, scope.as_deref(), &mut module);
                    continue;
                }
                "future_import_statement" => continue,
                "function_definition" | "class_definition" => {
                    if let Some(name) = node
                        .child_by_field_name("name")
                        .and_then(|n| Self::text(n, source))
                    {
                        module
                            .definitions
                            .push(DefinitionEvent::new(name, Self::line_of(node)));
                        child_scope = Some(name.to_string());
                    }
                }
                _ => {}
            }

            let mut cursor = node.walk();
            let children: Vec<Node> = node.named_children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push((child, child_scope.clone()));
            }
        }

        tracing::trace!(
            "Extracted {} imports and {} definitions from {}",
            module.imports.len(),
            module.definitions.len(),
            path.display()
        );
        Ok(module)
    }
}
