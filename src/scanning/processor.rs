use crate::config::ScanOptions;
use crate::model::{Element, ElementKind};
use crate::parsers::treesitter::TreeSitterParser;
use crate::scanning::extractor::{common, extract_file};
use log::{debug, info, trace, warn};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Extracts every element from the source files under `root_path`.
///
/// Files that cannot be read or parsed are logged and skipped. The result is
/// sorted by file, line and name so repeated scans of the same tree agree.
pub fn scan_sources(root_path: &Path, options: &ScanOptions) -> Vec<Element> {
    info!("Scanning sources under {:?}", root_path);

    let files_to_process = collect_files(root_path, options, true, |ext| {
        options.is_source_extension(ext)
    });
    info!("Found {} source files to process", files_to_process.len());

    let mut parser = TreeSitterParser::new();
    let mut elements = Vec::new();

    for path in &files_to_process {
        let relative = common::relative_path(root_path, path);
        debug!("Processing file: {}", relative);
        match extract_file(&mut parser, path, &relative) {
            Ok(units) => {
                debug!("Extracted {} elements from {}", units.len(), relative);
                elements.extend(units);
            }
            Err(e) => {
                warn!("Skipping {}: {}", relative, e);
            }
        }
    }

    elements.sort_by(|a, b| a.scan_order(b));

    let mut kind_counts: BTreeMap<ElementKind, usize> = BTreeMap::new();
    for element in &elements {
        *kind_counts.entry(element.kind).or_insert(0) += 1;
    }

    info!("Extracted {} elements:", elements.len());
    for (kind, count) in kind_counts {
        info!("  {}: {}", kind, count);
    }

    elements
}

/// Walks `root_path` and returns files whose extension passes `accept`.
///
/// A missing or non-directory root yields no files. Symlinks are only
/// followed when `options.follow_links` is set; a canonical path is never
/// returned twice, which also keeps link cycles from repeating work.
pub fn collect_files<F>(
    root_path: &Path,
    options: &ScanOptions,
    apply_exclusions: bool,
    accept: F,
) -> Vec<PathBuf>
where
    F: Fn(&str) -> bool,
{
    let mut files_to_process = Vec::new();

    if !root_path.is_dir() {
        info!(
            "Root {:?} is missing or not a directory, treating it as an empty project",
            root_path
        );
        return files_to_process;
    }

    let mut visited_files = HashSet::new();
    let walker = WalkDir::new(root_path)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(apply_exclusions && is_excluded(entry, options)));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to read directory entry: {}", e);
                continue;
            }
        };

        let path = entry.path();

        // Links to files cannot form cycles, so they are read even when not following links
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && fs::metadata(path).is_ok_and(|m| m.is_file()));
        if !is_file {
            continue;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if accept(ext) => {}
            Some(_) => {
                trace!("Skipping unsupported file: {:?}", path);
                continue;
            }
            None => {
                trace!("Skipping file without extension: {:?}", path);
                continue;
            }
        }

        let canonical_path = match fs::canonicalize(path) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to canonicalize path {:?}: {}", path, e);
                continue;
            }
        };

        if !visited_files.insert(canonical_path) {
            trace!("Skipping already visited file: {:?}", path);
            continue;
        }

        files_to_process.push(path.to_path_buf());
    }

    files_to_process
}

fn is_excluded(entry: &DirEntry, options: &ScanOptions) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| options.is_excluded_dir(name))
}
