pub(crate) mod common;
mod python;

use crate::error::ExtractError;
use crate::model::Element;
use crate::parsers::treesitter::{TreeSitterParser, first_error_line};
use log::{error, trace};
use std::fs;
use std::path::Path;
use tree_sitter::Tree;

pub use python::PythonExtractor;

// Turns a parsed syntax tree into the elements it declares
pub trait LanguageExtractor {
    fn extract_elements(&self, tree: &Tree, content: &str, file: &str) -> Vec<Element>;
}

pub fn get_extractor_for_language(language: &str) -> Option<Box<dyn LanguageExtractor>> {
    match language {
        "python" => Some(Box::new(PythonExtractor::new())),
        _ => None,
    }
}

/// Extracts the elements of one source file.
///
/// `file` is the path recorded on each element, relative to the scan root.
pub fn extract_file(
    parser: &mut TreeSitterParser,
    file_path: &Path,
    file: &str,
) -> Result<Vec<Element>, ExtractError> {
    trace!("Extracting elements from: {:?}", file_path);

    let content = fs::read_to_string(file_path).map_err(|e| {
        error!("Failed to read file {:?}: {}", file_path, e);
        e
    })?;

    extract_source(parser, file_path, &content, file)
}

pub fn extract_source(
    parser: &mut TreeSitterParser,
    file_path: &Path,
    content: &str,
    file: &str,
) -> Result<Vec<Element>, ExtractError> {
    let Some((tree, language)) = parser.parse_file(file_path, content) else {
        return Err(ExtractError::Unsupported(file.to_string()));
    };

    if let Some(line) = first_error_line(tree.root_node()) {
        return Err(ExtractError::Syntax { line });
    }

    let extractor = get_extractor_for_language(language)
        .ok_or_else(|| ExtractError::Unsupported(language.to_string()))?;

    Ok(extractor.extract_elements(&tree, content, file))
}
