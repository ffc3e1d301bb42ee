mod element;
mod report;

pub use element::{DocBlob, Element, ElementKind};
pub use report::{Mode, Report, Status};
