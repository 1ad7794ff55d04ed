//! Embedding audio clips into slides.
//!
//! An embedded clip is a `<p:pic>` shape that links the media part twice
//! (`a:audioFile r:link` and the PowerPoint 2010 `p14:media r:embed`), shows a
//! poster image, and gets a click-to-play `<p:audio>` node in the slide's
//! timing tree.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::errors::{constants, NarratorError, Result};
use crate::pptx::content_types::ContentTypes;
use crate::pptx::package::Package;
use crate::pptx::rels::{reltype, Relationships};
use crate::pptx::xml::{XmlDocument, XmlElement};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P14: &str = "http://schemas.microsoft.com/office/powerpoint/2010/main";
const MEDIA_EXT_URI: &str = "{DAA4B4D4-6D71-4841-9C94-3DE7FCFB9230}";

/// Speaker icon used as the poster frame when no image is supplied.
const POSTER_PNG_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Position and size of the embedded clip, in EMU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaPlacement {
    pub left: i64,
    pub top: i64,
    pub width: i64,
    pub height: i64,
}

impl MediaPlacement {
    pub fn from_cm(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: cm_to_emu(left),
            top: cm_to_emu(top),
            width: cm_to_emu(width),
            height: cm_to_emu(height),
        }
    }
}

impl Default for MediaPlacement {
    fn default() -> Self {
        Self::from_cm(
            constants::MEDIA_LEFT_CM,
            constants::MEDIA_TOP_CM,
            constants::MEDIA_WIDTH_CM,
            constants::MEDIA_HEIGHT_CM,
        )
    }
}

/// Placement as written in the config file, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub left_cm: f64,
    pub top_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            left_cm: constants::MEDIA_LEFT_CM,
            top_cm: constants::MEDIA_TOP_CM,
            width_cm: constants::MEDIA_WIDTH_CM,
            height_cm: constants::MEDIA_HEIGHT_CM,
        }
    }
}

impl From<PlacementConfig> for MediaPlacement {
    fn from(config: PlacementConfig) -> Self {
        Self::from_cm(
            config.left_cm,
            config.top_cm,
            config.width_cm,
            config.height_cm,
        )
    }
}

pub fn cm_to_emu(cm: f64) -> i64 {
    (cm * constants::EMU_PER_CM).round() as i64
}

/// Embed `audio` into the slide at `slide_partname`, whose parsed XML is `slide`.
///
/// `name` labels the shape, usually the clip's file name. Adds the media and poster parts, the three relationships, the content
/// type defaults, the `<p:pic>` shape and its timing node. The caller writes
/// `slide` back to the package. Returns the new shape id.
pub fn embed_audio(
    package: &mut Package,
    slide: &mut XmlDocument,
    slide_partname: &str,
    name: &str,
    audio: &[u8],
    placement: &MediaPlacement,
) -> Result<u32> {
    if slide.root.child("cSld").and_then(|c| c.child("spTree")).is_none() {
        return Err(NarratorError::invalid_document(format!(
            "{} has no shape tree",
            slide_partname
        )));
    }

    let media_partname = package.next_partname("/ppt/media/media", constants::AUDIO_EXTENSION);
    package.set_part(&media_partname, audio.to_vec());

    let poster = STANDARD
        .decode(POSTER_PNG_BASE64)
        .map_err(|e| NarratorError::xml(format!("Invalid poster image: {}", e)))?;
    let poster_partname = match package.find_by_content("/ppt/media/", &poster) {
        Some(existing) => existing,
        None => {
            let partname = package.next_partname("/ppt/media/image", "png");
            package.set_part(&partname, poster);
            partname
        }
    };

    let mut rels = Relationships::load(package, slide_partname)?;
    let audio_rid = rels.add(reltype::AUDIO, &media_partname);
    let media_rid = rels.add(reltype::MEDIA, &media_partname);
    let poster_rid = rels.add(reltype::IMAGE, &poster_partname);
    rels.save(package)?;

    let mut content_types = ContentTypes::load(package)?;
    let added_audio =
        content_types.ensure_default(constants::AUDIO_EXTENSION, constants::AUDIO_MIME_TYPE);
    let added_png = content_types.ensure_default("png", "image/png");
    if added_audio || added_png {
        content_types.save(package)?;
    }

    ensure_namespace(&mut slide.root, "a", NS_A);
    ensure_namespace(&mut slide.root, "r", NS_R);

    let shape_id = next_shape_id(&slide.root);
    let pic = audio_pic(shape_id, name, &audio_rid, &media_rid, &poster_rid, placement);
    if let Some(sp_tree) = slide.root.child_mut("cSld").and_then(|c| c.child_mut("spTree")) {
        match sp_tree.child_position("extLst") {
            Some(position) => sp_tree.insert(position, pic),
            None => sp_tree.push(pic),
        }
    }

    add_media_timing(&mut slide.root, shape_id);
    Ok(shape_id)
}

/// Largest shape id on the slide plus one.
pub fn next_shape_id(slide: &XmlElement) -> u32 {
    let mut max_id = 0;
    slide.walk(&mut |element| {
        if element.local_name() == "cNvPr" {
            if let Some(id) = element.attr("id").and_then(|id| id.parse::<u32>().ok()) {
                max_id = max_id.max(id);
            }
        }
    });
    max_id + 1
}

fn ensure_namespace(root: &mut XmlElement, prefix: &str, uri: &str) {
    let key = format!("xmlns:{}", prefix);
    if root.attr(&key).is_none() {
        root.set_attr(key, uri);
    }
}

fn audio_pic(
    shape_id: u32,
    name: &str,
    audio_rid: &str,
    media_rid: &str,
    poster_rid: &str,
    placement: &MediaPlacement,
) -> XmlElement {
    let c_nv_pr = XmlElement::new("p:cNvPr")
        .with_attr("id", shape_id.to_string())
        .with_attr("name", name)
        .with_attr("descr", name)
        .with_child(
            XmlElement::new("a:hlinkClick")
                .with_attr("r:id", "")
                .with_attr("action", "ppaction://media"),
        );

    let media_ext = XmlElement::new("p:extLst").with_child(
        XmlElement::new("p:ext")
            .with_attr("uri", MEDIA_EXT_URI)
            .with_child(
                XmlElement::new("p14:media")
                    .with_attr("xmlns:p14", NS_P14)
                    .with_attr("r:embed", media_rid),
            ),
    );

    let nv_pic_pr = XmlElement::new("p:nvPicPr")
        .with_child(c_nv_pr)
        .with_child(
            XmlElement::new("p:cNvPicPr")
                .with_child(XmlElement::new("a:picLocks").with_attr("noChangeAspect", "1")),
        )
        .with_child(
            XmlElement::new("p:nvPr")
                .with_child(XmlElement::new("a:audioFile").with_attr("r:link", audio_rid))
                .with_child(media_ext),
        );

    let blip_fill = XmlElement::new("p:blipFill")
        .with_child(XmlElement::new("a:blip").with_attr("r:embed", poster_rid))
        .with_child(XmlElement::new("a:stretch").with_child(XmlElement::new("a:fillRect")));

    let sp_pr = XmlElement::new("p:spPr")
        .with_child(
            XmlElement::new("a:xfrm")
                .with_child(
                    XmlElement::new("a:off")
                        .with_attr("x", placement.left.to_string())
                        .with_attr("y", placement.top.to_string()),
                )
                .with_child(
                    XmlElement::new("a:ext")
                        .with_attr("cx", placement.width.to_string())
                        .with_attr("cy", placement.height.to_string()),
                ),
        )
        .with_child(
            XmlElement::new("a:prstGeom")
                .with_attr("prst", "rect")
                .with_child(XmlElement::new("a:avLst")),
        );

    XmlElement::new("p:pic")
        .with_child(nv_pic_pr)
        .with_child(blip_fill)
        .with_child(sp_pr)
}

/// Add a click-to-play `<p:audio>` node for `shape_id` to the slide's timing tree,
/// creating the tree when the slide has none.
pub fn add_media_timing(slide: &mut XmlElement, shape_id: u32) {
    if slide.child("timing").is_none() {
        let timing = XmlElement::new("p:timing");
        match slide.child_position("extLst") {
            Some(position) => slide.insert(position, timing),
            None => slide.push(timing),
        }
    }
    let Some(timing) = slide.child_mut("timing") else {
        return;
    };

    let mut next_ctn_id = 0;
    timing.walk(&mut |element| {
        if element.local_name() == "cTn" {
            if let Some(id) = element.attr("id").and_then(|id| id.parse::<u32>().ok()) {
                next_ctn_id = next_ctn_id.max(id);
            }
        }
    });
    next_ctn_id += 1;

    if timing.child("tnLst").is_none() {
        timing.insert(0, XmlElement::new("p:tnLst"));
    }
    let Some(tn_lst) = timing.child_mut("tnLst") else {
        return;
    };

    let has_root = tn_lst.find(&|e| is_root_time_node(e)).is_some();
    if !has_root {
        tn_lst.push(
            XmlElement::new("p:par").with_child(
                XmlElement::new("p:cTn")
                    .with_attr("id", next_ctn_id.to_string())
                    .with_attr("dur", "indefinite")
                    .with_attr("restart", "never")
                    .with_attr("nodeType", "tmRoot"),
            ),
        );
        next_ctn_id += 1;
    }

    let Some(root_ctn) = tn_lst.find_mut(&|e| is_root_time_node(e)) else {
        return;
    };
    if root_ctn.child("childTnLst").is_none() {
        root_ctn.push(XmlElement::new("p:childTnLst"));
    }
    if let Some(child_tn_lst) = root_ctn.child_mut("childTnLst") {
        child_tn_lst.push(audio_time_node(next_ctn_id, shape_id));
    }
}

fn is_root_time_node(element: &XmlElement) -> bool {
    element.local_name() == "cTn" && element.attr("nodeType") == Some("tmRoot")
}

fn audio_time_node(ctn_id: u32, shape_id: u32) -> XmlElement {
    XmlElement::new("p:audio").with_child(
        XmlElement::new("p:cMediaNode")
            .with_attr("vol", constants::AUDIO_VOLUME)
            .with_child(
                XmlElement::new("p:cTn")
                    .with_attr("id", ctn_id.to_string())
                    .with_attr("fill", "hold")
                    .with_attr("display", "0")
                    .with_child(
                        XmlElement::new("p:stCondLst").with_child(
                            XmlElement::new("p:cond")
                                .with_attr("delay", constants::CLICK_DELAY),
                        ),
                    ),
            )
            .with_child(
                XmlElement::new("p:tgtEl").with_child(
                    XmlElement::new("p:spTgt").with_attr("spid", shape_id.to_string()),
                ),
            ),
    )
}
