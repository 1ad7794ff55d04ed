//! Speaker note text extraction.

use crate::errors::Result;
use crate::pptx::xml::{XmlDocument, XmlElement};

/// Text of the body placeholder of a notes slide.
///
/// Paragraphs are joined with `\n`, and `a:br` breaks become `\n` as well.
/// Returns `None` when the notes slide has no body placeholder or the body
/// holds only whitespace.
pub fn notes_text(xml: &[u8]) -> Result<Option<String>> {
    let doc = XmlDocument::parse(xml)?;

    let Some(body) = doc.root.find(&is_body_placeholder) else {
        return Ok(None);
    };
    let Some(tx_body) = body.child("txBody") else {
        return Ok(None);
    };

    let mut paragraphs = Vec::new();
    for paragraph in tx_body.elements().filter(|e| e.local_name() == "p") {
        paragraphs.push(paragraph_text(paragraph)?);
    }

    let text = paragraphs.join("\n");
    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

fn is_body_placeholder(element: &XmlElement) -> bool {
    element.local_name() == "sp"
        && element
            .child("nvSpPr")
            .and_then(|nv| nv.child("nvPr"))
            .and_then(|nv| nv.child("ph"))
            .is_some_and(|ph| ph.attr("type") == Some("body"))
}

fn paragraph_text(paragraph: &XmlElement) -> Result<String> {
    let mut text = String::new();
    for element in paragraph.elements() {
        match element.local_name() {
            "r" | "fld" => {
                if let Some(t) = element.child("t") {
                    text.push_str(&t.text()?);
                }
            }
            "br" => text.push('\n'),
            _ => {}
        }
    }
    Ok(text)
}
