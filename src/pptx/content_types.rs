//! `[Content_Types].xml` maintenance.

use crate::errors::Result;
use crate::pptx::package::Package;
use crate::pptx::xml::{XmlDocument, XmlElement};

pub const CONTENT_TYPES_PARTNAME: &str = "/[Content_Types].xml";

pub struct ContentTypes {
    doc: XmlDocument,
}

impl ContentTypes {
    pub fn load(package: &Package) -> Result<Self> {
        let doc = XmlDocument::parse(package.require_part(CONTENT_TYPES_PARTNAME)?)?;
        Ok(Self { doc })
    }

    pub fn default_for(&self, extension: &str) -> Option<&str> {
        self.doc
            .root
            .elements()
            .filter(|e| e.local_name() == "Default")
            .find(|e| {
                e.attr("Extension")
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
            })
            .and_then(|e| e.attr("ContentType"))
    }

    /// Register a default content type for `extension` unless one exists.
    ///
    /// Returns whether the document changed.
    pub fn ensure_default(&mut self, extension: &str, content_type: &str) -> bool {
        if self.default_for(extension).is_some() {
            return false;
        }

        let element = XmlElement::new("Default")
            .with_attr("Extension", extension)
            .with_attr("ContentType", content_type);
        // Defaults come before overrides
        let position = self
            .doc
            .root
            .child_position("Override")
            .unwrap_or(self.doc.root.children.len());
        self.doc.root.insert(position, element);
        true
    }

    pub fn save(&self, package: &mut Package) -> Result<()> {
        package.set_part(CONTENT_TYPES_PARTNAME, self.doc.to_bytes()?);
        Ok(())
    }
}
