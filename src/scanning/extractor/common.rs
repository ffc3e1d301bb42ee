use std::path::{Component, Path};
use tree_sitter::Node;

// Helpers shared by language extractors

pub fn get_node_text<'a>(node: Node, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

pub fn field_text<'a>(node: Node, field: &str, source: &'a str) -> Option<&'a str> {
    let child = node.child_by_field_name(field)?;
    let text = get_node_text(child, source);
    (!text.is_empty()).then_some(text)
}

pub fn start_line(node: Node) -> usize {
    node.start_position().row + 1
}

/// `path` relative to `root`, joined with `/` on every platform.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        parts.join("/")
    }
}
