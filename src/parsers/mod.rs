pub mod treesitter;

use std::path::Path;

pub fn detect_language(file_path: &Path) -> Option<&'static str> {
    let ext = file_path.extension().and_then(|e| e.to_str())?;
    treesitter::languages::detect_language_from_extension(ext)
}
