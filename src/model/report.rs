use super::Element;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    Fallback,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    LlmAugmented,
    Deterministic,
}

/// Result of one analysis run.
///
/// Build reports with [`Report::deterministic`] or [`Report::augmented`],
/// which keep `llm_analysis` present exactly when the mode is
/// `Mode::LlmAugmented`. The fields stay public for serialization and
/// inspection; code that sets them directly must keep that pairing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub status: Status,
    pub mode: Mode,
    pub checked_samples: usize,
    pub issues: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_analysis: Option<String>,
}

impl Report {
    pub fn deterministic(checked_samples: usize, issues: Vec<Element>) -> Self {
        Report {
            status: Status::Fallback,
            mode: Mode::Deterministic,
            checked_samples,
            issues,
            llm_analysis: None,
        }
    }

    pub fn augmented(checked_samples: usize, issues: Vec<Element>, analysis: String) -> Self {
        Report {
            status: Status::Ok,
            mode: Mode::LlmAugmented,
            checked_samples,
            issues,
            llm_analysis: Some(analysis),
        }
    }

    pub fn is_augmented(&self) -> bool {
        self.mode == Mode::LlmAugmented
    }
}
