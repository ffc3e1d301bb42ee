use std::collections::HashMap;
use tree_sitter::Language;

use super::bindings;

pub fn get_language_parsers() -> HashMap<&'static str, Language> {
    let mut parsers = HashMap::new();

    parsers.insert("python", bindings::python_language());

    parsers
}

pub fn detect_language_from_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "py" => Some("python"),
        _ => None,
    }
}

pub fn get_supported_extensions() -> Vec<&'static str> {
    vec!["py"]
}
