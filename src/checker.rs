use crate::model::{DocBlob, Element};
use log::{debug, info};

const CORPUS_SEPARATOR: &str = " ";

/// Joins every documentation blob into the text searched by the checker.
pub fn build_corpus(docs: &[DocBlob]) -> String {
    docs.iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join(CORPUS_SEPARATOR)
}

/// Returns the elements whose name never appears in the documentation.
///
/// The test is literal substring containment, so a short name like `get`
/// counts as documented when the corpus mentions `budget`. Order of
/// `elements` is preserved.
pub fn check_consistency(elements: &[Element], docs: &[DocBlob]) -> Vec<Element> {
    let corpus = build_corpus(docs);
    info!(
        "Checking {} elements against {} documentation files ({} bytes)",
        elements.len(),
        docs.len(),
        corpus.len()
    );

    let missing: Vec<Element> = elements
        .iter()
        .filter(|element| {
            let documented = corpus.contains(element.name.as_str());
            debug!(
                "{} {} is {}",
                element.kind,
                element.name,
                if documented { "documented" } else { "undocumented" }
            );
            !documented
        })
        .cloned()
        .collect();

    info!("{} elements are not mentioned in the documentation", missing.len());
    missing
}
