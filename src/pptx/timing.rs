//! Autoplay delay patching for embedded media.

use tracing::debug;

use crate::errors::constants;
use crate::pptx::xml::XmlElement;

/// Make the media node targeting `shape_id` start as soon as the slide shows.
///
/// Looks in the slide's `<p:timing>` for the `cMediaNode` whose
/// `tgtEl/spTgt/@spid` is `shape_id` and sets the `delay` of its first `cond`
/// to `0`. Returns `false` and leaves the slide untouched when no such node
/// exists.
pub fn zero_autoplay_delay(slide: &mut XmlElement, shape_id: u32) -> bool {
    let spid = shape_id.to_string();
    let patched = slide
        .child_mut("timing")
        .and_then(|timing| {
            timing.find_mut(&|e| e.local_name() == "cMediaNode" && targets_shape(e, &spid))
        })
        .and_then(|media_node| media_node.descendant_mut("cond"))
        .map(|cond| cond.set_attr("delay", constants::AUTOPLAY_DELAY))
        .is_some();

    if !patched {
        debug!(shape_id = shape_id, "No timing node found for media shape");
    }
    patched
}

fn targets_shape(element: &XmlElement, spid: &str) -> bool {
    element
        .child("tgtEl")
        .and_then(|target| target.child("spTgt"))
        .is_some_and(|target| target.attr("spid") == Some(spid))
}
