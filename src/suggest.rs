use crate::augment::Collaborator;
use crate::augment::prompt::suggestion_prompt;
use log::{info, warn};
use serde::Serialize;

const SUMMARY_CHARS: usize = 200;
const FALLBACK_MESSAGE: &str =
    "Fallback: set OPENAI_API_KEY (and leave DOCAUDIT_LLM enabled) to get generated suggestions.";

/// Outcome of [`suggest_improvements`]: generated text, or a local summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Suggestion {
    Generated(String),
    Fallback {
        suggestion: String,
        length: usize,
        summary: String,
    },
}

pub fn suggest_improvements(doc_text: &str, collaborator: &Collaborator) -> Suggestion {
    if collaborator.resolve().is_some() {
        match collaborator.generate(&suggestion_prompt(doc_text)) {
            Ok(text) => return Suggestion::Generated(text),
            Err(e) => warn!("Suggestion request failed: {}", e),
        }
    } else {
        info!("No text generator available, summarizing locally");
    }

    fallback(doc_text)
}

fn fallback(doc_text: &str) -> Suggestion {
    let length = doc_text.chars().count();
    let summary = if length > SUMMARY_CHARS {
        let head: String = doc_text.chars().take(SUMMARY_CHARS).collect();
        format!("{}...", head)
    } else {
        doc_text.to_string()
    };

    Suggestion::Fallback {
        suggestion: FALLBACK_MESSAGE.to_string(),
        length,
        summary,
    }
}
