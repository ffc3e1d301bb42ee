use crate::model::Element;

/// Elements included in the analysis prompt.
pub const SAMPLE_SIZE: usize = 10;
pub const NO_DOC_PLACEHOLDER: &str = "<no-doc>";

const ANALYSIS_TEMPLATE: &str = "Analyze the following code for documentation inconsistencies:\n\n";
const SUGGESTION_TEMPLATE: &str = "Suggest improvements for the following documentation:\n";

pub fn sample_line(element: &Element) -> String {
    format!(
        "{} {} - doc: {}",
        element.kind,
        element.name,
        element.doc.as_deref().unwrap_or(NO_DOC_PLACEHOLDER)
    )
}

pub fn sample_payload(elements: &[Element]) -> String {
    let lines: Vec<String> = elements.iter().take(SAMPLE_SIZE).map(sample_line).collect();
    if lines.is_empty() {
        "no samples".to_string()
    } else {
        lines.join("\n")
    }
}

pub fn analysis_prompt(elements: &[Element]) -> String {
    format!("{}{}", ANALYSIS_TEMPLATE, sample_payload(elements))
}

pub fn suggestion_prompt(doc_text: &str) -> String {
    format!("{}{}", SUGGESTION_TEMPLATE, doc_text)
}
