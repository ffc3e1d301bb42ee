pub mod augment;
pub mod checker;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod parsers;
pub mod scanning;
pub mod suggest;
pub mod utils;

pub use orchestrator::{Analyzer, analyze_project};

use log::{debug, info};
use std::io;
use std::path::Path;

/// Analyzes `root_path` and writes the JSON report to `output_path`.
pub fn analyze_to_file(root_path: &Path, output_path: &Path) -> io::Result<model::Report> {
    info!("Starting documentation audit");
    debug!("Root path: {:?}, Output path: {:?}", root_path, output_path);

    let report = analyze_project(root_path);

    info!("Exporting report to JSON at {:?}", output_path);
    utils::io::export_report_to_json(&report, output_path)?;

    Ok(report)
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
