use std::collections::HashMap;
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

pub mod bindings;
pub mod languages;

pub struct TreeSitterParser {
    parser: Parser,
    language_parsers: HashMap<&'static str, Language>,
}

impl TreeSitterParser {
    pub fn new() -> Self {
        let parser = Parser::new();
        let language_parsers = languages::get_language_parsers();

        Self {
            parser,
            language_parsers,
        }
    }

    pub fn parse_file(&mut self, file_path: &Path, content: &str) -> Option<(Tree, &'static str)> {
        let language_name = crate::parsers::detect_language(file_path)?;
        let language = self.language_parsers.get(language_name)?.clone();

        self.parser.set_language(&language).ok()?;
        let tree = self.parser.parse(content.as_bytes(), None)?;

        Some((tree, language_name))
    }
}

impl Default for TreeSitterParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Line (1-based) of the first error or missing node in the tree, if any.
pub fn first_error_line(node: Node) -> Option<usize> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(line) = first_error_line(child) {
            return Some(line);
        }
    }

    Some(node.start_position().row + 1)
}
