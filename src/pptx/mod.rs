pub mod content_types;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod media;
pub mod notes;
pub mod package;
pub mod presentation;
pub mod rels;
pub mod timing;
pub mod xml;
