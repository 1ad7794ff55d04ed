//! Minimal decks for tests.

use quick_xml::escape::escape;

use crate::pptx::package::Package;

const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_NOTES: &str = "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Build a deck with one slide per entry of `notes`.
///
/// `None` leaves the slide without a notes slide; `Some(text)` adds a notes
/// slide whose body holds `text`, one paragraph per line. Slide parts are
/// numbered in reverse so that slide order only follows `presentation.xml`.
pub fn deck(notes: &[Option<&str>]) -> Vec<u8> {
    let count = notes.len();
    let mut package = Package::default();

    let mut overrides = format!(
        r#"<Override PartName="/ppt/presentation.xml" ContentType="{}"/>"#,
        CT_PRESENTATION
    );
    let mut sld_ids = String::new();
    let mut pres_rels = String::new();

    for (position, note) in notes.iter().enumerate() {
        let number = count - position;
        let slide_partname = format!("/ppt/slides/slide{}.xml", number);

        overrides.push_str(&format!(
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            slide_partname, CT_SLIDE
        ));
        sld_ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + position,
            position + 2
        ));
        pres_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide{}.xml"/>"#,
            position + 2,
            number
        ));

        package.set_part(&slide_partname, slide_xml(position + 1).into_bytes());

        let mut slide_rels = String::new();
        if let Some(text) = note {
            let notes_partname = format!("/ppt/notesSlides/notesSlide{}.xml", number);
            overrides.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                notes_partname, CT_NOTES
            ));
            slide_rels.push_str(&format!(
                r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="../notesSlides/notesSlide{}.xml"/>"#,
                number
            ));
            package.set_part(&notes_partname, notes_xml(text).into_bytes());
        }
        package.set_part(
            &format!("/ppt/slides/_rels/slide{}.xml.rels", number),
            rels_xml(&slide_rels).into_bytes(),
        );
    }

    package.set_part(
        "/[Content_Types].xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>{}</Types>"#,
            overrides
        )
        .into_bytes(),
    );
    package.set_part(
        "/_rels/.rels",
        rels_xml(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>"#)
            .into_bytes(),
    );
    package.set_part(
        "/ppt/presentation.xml",
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
            sld_ids
        )
        .into_bytes(),
    );
    package.set_part(
        "/ppt/_rels/presentation.xml.rels",
        rels_xml(&pres_rels).into_bytes(),
    );

    package.to_bytes().expect("fixture deck serializes")
}

fn rels_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        body
    )
}

fn slide_xml(index: usize) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>Slide {}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        index
    )
}

fn notes_xml(text: &str) -> String {
    let paragraphs: String = text
        .lines()
        .map(|line| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", escape(line)))
        .collect();
    let paragraphs = if paragraphs.is_empty() {
        "<a:p><a:endParaRPr lang=\"en-GB\"/></a:p>".to_string()
    } else {
        paragraphs
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Notes Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp></p:spTree></p:cSld></p:notes>"#,
        paragraphs
    )
}
