use crate::augment::Collaborator;
use crate::augment::prompt::analysis_prompt;
use crate::checker::check_consistency;
use crate::config::{AuditConfig, ScanOptions};
use crate::model::{Element, Report};
use crate::scanning::{load_docs, scan_sources};
use log::{error, info, warn};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::OnceLock;

/// Runs the scan, load and check pipeline, then optionally asks the
/// collaborator for commentary on a sample of the elements.
///
/// Any collaborator failure, including a timeout or a panic, produces the
/// same deterministic report the pipeline alone would have produced.
pub struct Analyzer {
    options: ScanOptions,
    collaborator: Collaborator,
}

impl Analyzer {
    pub fn new(options: ScanOptions, collaborator: Collaborator) -> Self {
        Analyzer {
            options,
            collaborator,
        }
    }

    pub fn from_config(config: AuditConfig) -> Self {
        Self::new(config.scan, Collaborator::from_config(config.generator))
    }

    pub fn deterministic(options: ScanOptions) -> Self {
        Self::new(options, Collaborator::disabled())
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn collaborator(&self) -> &Collaborator {
        &self.collaborator
    }

    pub fn analyze(&self, root_path: &Path) -> Report {
        info!("Analyzing project at {:?}", root_path);

        let (elements, issues) =
            match catch_unwind(AssertUnwindSafe(|| self.deterministic_pass(root_path))) {
                Ok(result) => result,
                Err(_) => {
                    error!(
                        "Analysis of {:?} panicked; returning an empty report",
                        root_path
                    );
                    return Report::deterministic(0, Vec::new());
                }
            };

        let checked_samples = elements.len();
        let report = match self.augment(&elements) {
            Some(analysis) => Report::augmented(checked_samples, issues, analysis),
            None => Report::deterministic(checked_samples, issues),
        };

        info!(
            "Analysis complete: {} elements checked, {} undocumented ({:?})",
            report.checked_samples,
            report.issues.len(),
            report.mode
        );
        report
    }

    /// Elements found under `root_path` and the subset missing from the docs.
    pub fn deterministic_pass(&self, root_path: &Path) -> (Vec<Element>, Vec<Element>) {
        let elements = scan_sources(root_path, &self.options);
        let docs = load_docs(root_path, &self.options);
        let issues = check_consistency(&elements, &docs);
        (elements, issues)
    }

    fn augment(&self, elements: &[Element]) -> Option<String> {
        self.collaborator.resolve()?;

        match self.collaborator.generate(&analysis_prompt(elements)) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                warn!("Text generation failed, reporting deterministic results: {}", e);
                None
            }
        }
    }
}

/// Analyzes `root_path` with the process-wide analyzer.
///
/// The analyzer is configured from the environment on first use, and its
/// collaborator is initialized at most once for the life of the process.
pub fn analyze_project(root_path: &Path) -> Report {
    shared_analyzer().analyze(root_path)
}

pub fn shared_analyzer() -> &'static Analyzer {
    static SHARED: OnceLock<Analyzer> = OnceLock::new();
    SHARED.get_or_init(|| Analyzer::from_config(AuditConfig::from_env()))
}
