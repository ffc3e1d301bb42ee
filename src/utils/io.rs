use crate::model::Report;
use log::{error, info};
use std::fs;
use std::io;
use std::path::Path;

pub fn report_to_json(report: &Report) -> io::Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| {
        error!("Failed to serialize report to JSON: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })
}

pub fn export_report_to_json(report: &Report, output_path: &Path) -> io::Result<()> {
    info!(
        "Exporting report with {} issues to JSON: {:?}",
        report.issues.len(),
        output_path
    );

    let json = report_to_json(report)?;

    match fs::write(output_path, &json) {
        Ok(_) => {
            info!("Successfully wrote {} bytes to {:?}", json.len(), output_path);
            Ok(())
        }
        Err(e) => {
            error!("Failed to write JSON to file {:?}: {}", output_path, e);
            Err(e)
        }
    }
}
