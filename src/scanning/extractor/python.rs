use crate::model::{Element, ElementKind};
use crate::scanning::extractor::{LanguageExtractor, common};
use log::trace;
use regex::Regex;
use std::sync::LazyLock;
use tree_sitter::{Node, Tree};

static STRING_OPENING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^([rRuUbBfF]*)("""|'''|"|')"#).unwrap());

const TAB_SIZE: usize = 8;

/// Extracts module-level functions and classes, plus the methods defined
/// directly in each class body. Nothing deeper is visited.
pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        PythonExtractor
    }

    fn function_element(
        &self,
        node: Node,
        source: &str,
        file: &str,
        owner: Option<&str>,
    ) -> Option<Element> {
        let name = common::field_text(node, "name", source)?;

        let (kind, name) = match owner {
            Some(class_name) => (ElementKind::Method, format!("{}.{}", class_name, name)),
            None if is_async(node) => (ElementKind::AsyncFunction, name.to_string()),
            None => (ElementKind::Function, name.to_string()),
        };

        trace!("Found {}: {} at line {}", kind, name, common::start_line(node));
        Some(
            Element::new(name, kind, file.to_string(), Some(common::start_line(node)))
                .with_doc(docstring(node, source)),
        )
    }

    fn visit_class(&self, node: Node, source: &str, file: &str, elements: &mut Vec<Element>) {
        let Some(class_name) = common::field_text(node, "name", source) else {
            return;
        };

        trace!("Found class: {} at line {}", class_name, common::start_line(node));
        elements.push(
            Element::new(
                class_name.to_string(),
                ElementKind::Class,
                file.to_string(),
                Some(common::start_line(node)),
            )
            .with_doc(docstring(node, source)),
        );

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };

        let mut cursor = body.walk();
        for statement in body.named_children(&mut cursor) {
            let Some(definition) = unwrap_decorated(statement) else {
                continue;
            };
            if definition.kind() == "function_definition" {
                if let Some(method) =
                    self.function_element(definition, source, file, Some(class_name))
                {
                    elements.push(method);
                }
            }
        }
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for PythonExtractor {
    fn extract_elements(&self, tree: &Tree, content: &str, file: &str) -> Vec<Element> {
        let mut elements = Vec::new();
        let root = tree.root_node();

        let mut cursor = root.walk();
        for statement in root.named_children(&mut cursor) {
            let Some(definition) = unwrap_decorated(statement) else {
                continue;
            };
            match definition.kind() {
                "function_definition" => {
                    if let Some(function) = self.function_element(definition, content, file, None)
                    {
                        elements.push(function);
                    }
                }
                "class_definition" => self.visit_class(definition, content, file, &mut elements),
                _ => {}
            }
        }

        elements
    }
}

// `@decorator def f()` wraps the definition; the element points at the `def` line
fn unwrap_decorated(node: Node) -> Option<Node> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition")
    } else {
        Some(node)
    }
}

fn is_async(node: Node) -> bool {
    node.child(0).is_some_and(|first| first.kind() == "async")
}

/// The docstring of a function or class body, cleaned like `inspect.cleandoc`.
fn docstring(node: Node, source: &str) -> Option<String> {
    let body = node.child_by_field_name("body")?;

    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }

    let mut cursor = first.walk();
    let expressions: Vec<Node> = first
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect();
    let [expression] = expressions.as_slice() else {
        return None;
    };

    let raw = match expression.kind() {
        "string" => string_value(*expression, source)?,
        "concatenated_string" => {
            let mut cursor = expression.walk();
            let mut joined = String::new();
            for part in expression.named_children(&mut cursor) {
                if part.kind() == "comment" {
                    continue;
                }
                joined.push_str(&string_value(part, source)?);
            }
            joined
        }
        _ => return None,
    };

    Some(clean_doc(&raw))
}

// Value of a plain or raw text literal; byte strings and f-strings are not docstrings
fn string_value(node: Node, source: &str) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let text = common::get_node_text(node, source);
    let captures = STRING_OPENING.captures(text)?;
    let prefix = captures.get(1)?.as_str().to_ascii_lowercase();
    if prefix.contains('b') || prefix.contains('f') {
        return None;
    }

    let quote = captures.get(2)?.as_str();
    let start = captures.get(0)?.end();
    let end = text.len().checked_sub(quote.len())?;
    let body = text.get(start..end.max(start))?;

    if prefix.contains('r') {
        Some(body.to_string())
    } else {
        Some(unescape(body))
    }
}

/// Decodes the escapes of a non-raw literal: `\n \t \r \a \b \f \v`, quotes and
/// backslash, octal `\ooo`, `\xhh`, `\uXXXX`, `\UXXXXXXXX` and line continuations.
/// `\N{name}` and unrecognized or truncated escapes are kept as written.
fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            out.push('\\');
            break;
        };
        match escape {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'v' => out.push('\u{0b}'),
            '\\' | '\'' | '"' => out.push(escape),
            // backslash-newline is a line continuation
            '\n' => {}
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                // at most 0o777, always a valid scalar value
                out.extend(char::from_u32(value));
            }
            'x' | 'u' | 'U' => {
                let width = match escape {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let mut digits = String::with_capacity(width);
                while digits.len() < width {
                    match chars.peek() {
                        Some(d) if d.is_ascii_hexdigit() => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let decoded = (digits.len() == width)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(ch) => out.push(ch),
                    None => {
                        out.push('\\');
                        out.push(escape);
                        out.push_str(&digits);
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    out
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let spaces = TAB_SIZE - (column % TAB_SIZE);
            out.extend(std::iter::repeat_n(' ', spaces));
            column += spaces;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

fn clean_doc(doc: &str) -> String {
    let mut lines: Vec<String> = doc.split('\n').map(expand_tabs).collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim_start().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min();

    if let Some(first) = lines.first_mut() {
        *first = first.trim_start().to_string();
    }
    if let Some(margin) = margin {
        for line in lines.iter_mut().skip(1) {
            *line = line.chars().skip(margin).collect();
        }
    }

    // only lines left empty by the margin cut are dropped at the edges
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    let leading_empty = lines.iter().take_while(|line| line.is_empty()).count();

    lines[leading_empty..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::treesitter::TreeSitterParser;
    use std::path::Path;

    fn extract(source: &str) -> Vec<Element> {
        let mut parser = TreeSitterParser::new();
        let (tree, _) = parser.parse_file(Path::new("mod.py"), source).unwrap();
        PythonExtractor::new().extract_elements(&tree, source, "pkg/mod.py")
    }

    fn summary(elements: &[Element]) -> Vec<(&str, ElementKind, Option<usize>)> {
        elements
            .iter()
            .map(|e| (e.name.as_str(), e.kind, e.line))
            .collect()
    }

    #[test]
    fn extracts_functions_with_and_without_docstrings() {
        let elements = extract(
            "def hello():\n    '''Greet.'''\n    return \"Hello\"\n\ndef goodbye():\n    # Missing docstring\n    return \"Bye\"\n",
        );

        assert_eq!(
            summary(&elements),
            vec![
                ("hello", ElementKind::Function, Some(1)),
                ("goodbye", ElementKind::Function, Some(5)),
            ]
        );
        assert_eq!(elements[0].doc.as_deref(), Some("Greet."));
        assert_eq!(elements[1].doc, None);
        assert!(elements.iter().all(|e| e.file == "pkg/mod.py"));
    }

    #[test]
    fn class_methods_are_qualified() {
        let elements = extract(
            r#"
class Greeter:
    '''A greeter class.'''

    def greet(self, name):
        '''Say hello.'''
        return name

    async def greet_later(self):
        pass
"#,
        );

        assert_eq!(
            summary(&elements),
            vec![
                ("Greeter", ElementKind::Class, Some(2)),
                ("Greeter.greet", ElementKind::Method, Some(5)),
                ("Greeter.greet_later", ElementKind::Method, Some(9)),
            ]
        );
        assert_eq!(elements[0].doc.as_deref(), Some("A greeter class."));
        assert_eq!(elements[1].doc.as_deref(), Some("Say hello."));
    }

    #[test]
    fn async_functions_have_their_own_kind() {
        let elements = extract("async def fetch():\n    pass\n");
        assert_eq!(
            summary(&elements),
            vec![("fetch", ElementKind::AsyncFunction, Some(1))]
        );
    }

    #[test]
    fn nested_definitions_are_not_visited() {
        let elements = extract(
            r#"
def outer():
    def inner():
        pass
    class Local:
        pass

class Shell:
    class Inner:
        def deep(self):
            pass

    def method(self):
        def helper():
            pass

if True:
    def conditional():
        pass
"#,
        );

        let names: Vec<&str> = elements.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["outer", "Shell", "Shell.method"]);
    }

    #[test]
    fn decorated_definitions_use_the_def_line() {
        let elements = extract(
            r#"@decorator
def wrapped():
    pass

@dataclass
class Point:
    @property
    def norm(self):
        """Length."""
        return 0
"#,
        );

        assert_eq!(
            summary(&elements),
            vec![
                ("wrapped", ElementKind::Function, Some(2)),
                ("Point", ElementKind::Class, Some(6)),
                ("Point.norm", ElementKind::Method, Some(8)),
            ]
        );
        assert_eq!(elements[2].doc.as_deref(), Some("Length."));
    }

    #[test]
    fn multiline_docstrings_are_dedented() {
        let elements = extract(
            "def run():\n    \"\"\"\n    Run the job.\n\n        Indented detail.\n    \"\"\"\n",
        );
        assert_eq!(
            elements[0].doc.as_deref(),
            Some("Run the job.\n\n    Indented detail.")
        );
    }

    #[test]
    fn only_a_leading_plain_string_is_a_docstring() {
        let elements = extract(
            r#"
def assigned():
    x = 1
    "not a docstring"

def formatted():
    f"hello {name}"

def raw():
    r"C:\path"

def escaped():
    "line one\nline two"

def joined():
    "first " "second"

def commented():
    # leading comment
    """After the comment."""
"#,
        );

        let docs: Vec<(&str, Option<&str>)> = elements
            .iter()
            .map(|e| (e.name.as_str(), e.doc.as_deref()))
            .collect();
        assert_eq!(
            docs,
            vec![
                ("assigned", None),
                ("formatted", None),
                ("raw", Some(r"C:\path")),
                ("escaped", Some("line one\nline two")),
                ("joined", Some("first second")),
                ("commented", Some("After the comment.")),
            ]
        );
    }

    #[test]
    fn clean_doc_expands_tabs_and_trims_blank_edges() {
        assert_eq!(clean_doc("\n\n\tSummary.\n\tBody.\n\n"), "Summary.\nBody.");
        assert_eq!(clean_doc("Summary.\n\tBody.\n\t  More."), "Summary.\nBody.\n  More.");
        assert_eq!(clean_doc(""), "");
    }

    #[test]
    fn clean_doc_keeps_whitespace_deeper_than_the_margin() {
        assert_eq!(clean_doc("Summary.\n    Body.\n      "), "Summary.\nBody.\n  ");
        assert_eq!(clean_doc("Summary.\n    Body.\n  "), "Summary.\nBody.");
        assert_eq!(clean_doc("   \n    Body."), "Body.");
    }

    #[test]
    fn unescape_keeps_unknown_escapes() {
        assert_eq!(unescape(r"a\qb\\c\'"), "a\\qb\\c'");
        assert_eq!(unescape(r"\N{EM DASH}"), r"\N{EM DASH}");
        assert_eq!(unescape(r"short \x4 and \u12"), r"short \x4 and \u12");
        assert_eq!(unescape(r"end\"), "end\\");
    }

    #[test]
    fn unescape_decodes_numeric_and_control_escapes() {
        assert_eq!(unescape(r"\012"), "\n");
        assert_eq!(unescape(r"\0"), "\0");
        assert_eq!(unescape(r"\1234"), "S4");
        assert_eq!(unescape(r"\x41\u00e9\U0001F600"), "A\u{e9}\u{1F600}");
        assert_eq!(unescape(r"\a\b\f\v"), "\u{07}\u{08}\u{0c}\u{0b}");
        assert_eq!(unescape("one\\\ntwo"), "onetwo");
    }
}
