use crate::config::ScanOptions;
use crate::model::DocBlob;
use crate::scanning::processor::collect_files;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Reads every documentation file under `root_path`.
///
/// Directory exclusions do not apply here. Files that are unreadable or not
/// valid UTF-8 are skipped.
pub fn load_docs(root_path: &Path, options: &ScanOptions) -> Vec<DocBlob> {
    info!("Loading documentation under {:?}", root_path);

    let files = collect_files(root_path, options, false, |ext| {
        options.is_doc_extension(ext)
    });

    let mut docs = Vec::with_capacity(files.len());
    for path in files {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable documentation file {:?}: {}", path, e);
                continue;
            }
        };

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!("Loaded {} ({} bytes)", filename, content.len());
        docs.push(DocBlob::new(filename, content));
    }

    info!("Loaded {} documentation files", docs.len());
    docs
}
