//! Part relationships (`_rels/*.rels`).

use crate::errors::Result;
use crate::pptx::package::Package;
use crate::pptx::xml::{XmlDocument, XmlElement};

pub mod reltype {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";
    pub const AUDIO: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/audio";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const MEDIA: &str = "http://schemas.microsoft.com/office/2007/relationships/media";
}

const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

/// Relationships of one source part.
#[derive(Debug, Clone)]
pub struct Relationships {
    source: String,
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Load the relationships of `source`; a missing rels part yields an empty set.
    pub fn load(package: &Package, source: &str) -> Result<Self> {
        let mut rels = Vec::new();

        if let Some(xml) = package.part(&rels_partname(source)) {
            let doc = XmlDocument::parse(xml)?;
            for element in doc.root.elements() {
                if element.local_name() != "Relationship" {
                    continue;
                }
                let (Some(id), Some(rel_type), Some(target)) = (
                    element.attr("Id"),
                    element.attr("Type"),
                    element.attr("Target"),
                ) else {
                    continue;
                };
                rels.push(Relationship {
                    id: id.to_string(),
                    rel_type: rel_type.to_string(),
                    target: target.to_string(),
                    external: element.attr("TargetMode") == Some("External"),
                });
            }
        }

        Ok(Self {
            source: source.to_string(),
            rels,
        })
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.id == id)
    }

    pub fn find_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.rel_type == rel_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    pub fn len(&self) -> usize {
        self.rels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Absolute partname of an internal relationship target.
    pub fn target_partname(&self, rel: &Relationship) -> String {
        resolve_target(&self.source, &rel.target)
    }

    /// Add an internal relationship to `target_partname` and return its new id.
    pub fn add(&mut self, rel_type: &str, target_partname: &str) -> String {
        let id = (1..)
            .map(|n| format!("rId{}", n))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or_default();

        self.rels.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: relative_target(&self.source, target_partname),
            external: false,
        });
        id
    }

    pub fn save(&self, package: &mut Package) -> Result<()> {
        let mut root = XmlElement::new("Relationships").with_attr("xmlns", RELATIONSHIPS_NS);
        for rel in &self.rels {
            let mut element = XmlElement::new("Relationship")
                .with_attr("Id", rel.id.as_str())
                .with_attr("Type", rel.rel_type.as_str())
                .with_attr("Target", rel.target.as_str());
            if rel.external {
                element.set_attr("TargetMode", "External");
            }
            root.push(element);
        }

        package.set_part(&rels_partname(&self.source), XmlDocument::new(root).to_bytes()?);
        Ok(())
    }
}

/// Partname of the rels part belonging to `source`.
pub fn rels_partname(source: &str) -> String {
    let source = source.trim_start_matches('/');
    match source.rsplit_once('/') {
        Some((dir, file)) => format!("/{}/_rels/{}.rels", dir, file),
        None if source.is_empty() => "/_rels/.rels".to_string(),
        None => format!("/_rels/{}.rels", source),
    }
}

fn base_dir(source: &str) -> &str {
    source.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Resolve a relationship target relative to its source part.
pub fn resolve_target(source: &str, target: &str) -> String {
    if target.starts_with('/') {
        return target.to_string();
    }

    let mut segments: Vec<&str> = base_dir(source)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Relative reference from `source` to the absolute `target` partname.
pub fn relative_target(source: &str, target: &str) -> String {
    let from: Vec<&str> = base_dir(source)
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();
    // The last segment of `to` is the file name and never part of the shared prefix
    let common = common.min(to.len().saturating_sub(1));

    let mut parts: Vec<&str> = std::iter::repeat("..").take(from.len() - common).collect();
    parts.extend(&to[common..]);
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rels_partname() {
        assert_eq!(
            rels_partname("/ppt/slides/slide1.xml"),
            "/ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(rels_partname("/"), "/_rels/.rels");
        assert_eq!(
            rels_partname("/ppt/presentation.xml"),
            "/ppt/_rels/presentation.xml.rels"
        );
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("/ppt/slides/slide1.xml", "../notesSlides/notesSlide1.xml"),
            "/ppt/notesSlides/notesSlide1.xml"
        );
        assert_eq!(
            resolve_target("/ppt/presentation.xml", "slides/slide2.xml"),
            "/ppt/slides/slide2.xml"
        );
        assert_eq!(
            resolve_target("/", "ppt/presentation.xml"),
            "/ppt/presentation.xml"
        );
        assert_eq!(
            resolve_target("/ppt/slides/slide1.xml", "/ppt/media/media1.mp3"),
            "/ppt/media/media1.mp3"
        );
    }

    #[test]
    fn test_relative_target() {
        assert_eq!(
            relative_target("/ppt/slides/slide1.xml", "/ppt/media/media1.mp3"),
            "../media/media1.mp3"
        );
        assert_eq!(
            relative_target("/ppt/presentation.xml", "/ppt/slides/slide1.xml"),
            "slides/slide1.xml"
        );
        assert_eq!(
            relative_target("/ppt/slides/slide1.xml", "/ppt/slides/slide2.xml"),
            "slide2.xml"
        );
    }

    #[test]
    fn test_add_and_save() {
        let mut package = Package::default();
        package.set_part(
            "/ppt/slides/_rels/slide1.xml.rels",
            br#"<?xml version="1.0"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="../notesSlides/notesSlide1.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/></Relationships>"#
                .to_vec(),
        );

        let mut rels = Relationships::load(&package, "/ppt/slides/slide1.xml").unwrap();
        assert_eq!(rels.len(), 2);
        let notes = rels.find_by_type(reltype::NOTES_SLIDE).unwrap();
        assert_eq!(
            rels.target_partname(notes),
            "/ppt/notesSlides/notesSlide1.xml"
        );

        let id = rels.add(reltype::AUDIO, "/ppt/media/media1.mp3");
        assert_eq!(id, "rId2");
        rels.save(&mut package).unwrap();

        let reloaded = Relationships::load(&package, "/ppt/slides/slide1.xml").unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.get("rId2").unwrap().target, "../media/media1.mp3");
        assert!(reloaded.get("rId3").unwrap().external);
    }

    #[test]
    fn test_load_missing_rels() {
        let package = Package::default();
        let rels = Relationships::load(&package, "/ppt/slides/slide9.xml").unwrap();
        assert!(rels.is_empty());
    }
}
