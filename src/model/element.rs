use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Function,
    AsyncFunction,
    Class,
    Method,
}

impl ElementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Function => "function",
            ElementKind::AsyncFunction => "async_function",
            ElementKind::Class => "class",
            ElementKind::Method => "method",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A function, class or method found in a source file.
///
/// Methods carry their owning class as a prefix (`Greeter.greet`) and
/// `file` is always relative to the scanned root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Element {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub file: String,
    pub line: Option<usize>,
    pub doc: Option<String>,
}

impl Element {
    pub fn new(name: String, kind: ElementKind, file: String, line: Option<usize>) -> Self {
        Element {
            name,
            kind,
            file,
            line,
            doc: None,
        }
    }

    pub fn with_doc(mut self, doc: Option<String>) -> Self {
        self.doc = doc;
        self
    }

    /// Ordering used for scan output: file, then line (unknown sorts as 0), then name.
    pub fn scan_order(&self, other: &Element) -> Ordering {
        self.file
            .cmp(&other.file)
            .then_with(|| self.line.unwrap_or(0).cmp(&other.line.unwrap_or(0)))
            .then_with(|| self.name.cmp(&other.name))
    }
}

/// Raw text of one documentation file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocBlob {
    pub filename: String,
    pub content: String,
}

impl DocBlob {
    pub fn new(filename: String, content: String) -> Self {
        DocBlob { filename, content }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(file: &str, line: Option<usize>, name: &str) -> Element {
        Element::new(name.to_string(), ElementKind::Function, file.to_string(), line)
    }

    #[test]
    fn scan_order_compares_file_then_line_then_name() {
        let mut elements = vec![
            element("b.py", Some(1), "a"),
            element("a.py", Some(9), "z"),
            element("a.py", None, "y"),
            element("a.py", Some(9), "m"),
        ];
        elements.sort_by(|a, b| a.scan_order(b));

        let order: Vec<(&str, &str)> = elements
            .iter()
            .map(|e| (e.file.as_str(), e.name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![("a.py", "y"), ("a.py", "m"), ("a.py", "z"), ("b.py", "a")]
        );
    }

    #[test]
    fn element_serializes_kind_as_type() {
        let e = element("pkg/mod.py", None, "run").with_doc(Some("Run it.".to_string()));
        let value = serde_json::to_value(&e).unwrap();

        assert_eq!(value["type"], "function");
        assert_eq!(value["file"], "pkg/mod.py");
        assert!(value["line"].is_null());
        assert_eq!(value["doc"], "Run it.");
    }

    #[test]
    fn async_kind_uses_snake_case() {
        let value = serde_json::to_value(ElementKind::AsyncFunction).unwrap();
        assert_eq!(value, "async_function");
        assert_eq!(ElementKind::AsyncFunction.to_string(), "async_function");
    }
}
