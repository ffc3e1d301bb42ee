pub mod docs;
pub mod extractor;
pub mod processor;

pub use docs::load_docs;
pub use extractor::extract_file;
pub use processor::{collect_files, scan_sources};
