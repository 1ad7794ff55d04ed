use tracing::warn;

use crate::errors::constants::MAX_TTS_TEXT_LENGTH;

/// Warn when the text is longer than the service will speak.
///
/// The request still goes out; the service truncates the audio. Returns
/// whether a warning was emitted.
pub fn warn_if_truncated(text: &str) -> bool {
    let length = text.chars().count();
    if length > MAX_TTS_TEXT_LENGTH {
        warn!(
            length = length,
            max_length = MAX_TTS_TEXT_LENGTH,
            "Speaker note is truncated > {} characters",
            MAX_TTS_TEXT_LENGTH
        );
        return true;
    }

    false
}
