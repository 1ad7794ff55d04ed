use crate::tts::{
    gcp_tts::structs::{
        audio_config::AudioConfig, synthesis_input::SynthesisInput,
        voice_selection_params::VoiceSelectionParams,
    },
    voice::VoiceConfig,
};
use crate::errors::constants;
use serde::{Deserialize, Serialize};

/// Example:
/// ```rust,ignore
/// SynthesizeRequest {
///     input: SynthesisInput {
///         text: Some(String::from("Welcome to the quarterly review.")),
///         ssml: None
///     },
///     voice: VoiceSelectionParams {
///         languageCode: String::from("en-GB"),
///         name: None,
///         ssmlGender: Some(String::from("FEMALE"))
///     },
///     audioConfig: AudioConfig {
///         audioEncoding: String::from("MP3"),
///         speakingRate: 1.0f32,
///         effectsProfileId: vec![String::from("handset-class-device")]
///     }
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
pub struct SynthesizeRequest {
    pub input: SynthesisInput,
    pub voice: VoiceSelectionParams,
    pub audioConfig: AudioConfig,
}

impl SynthesizeRequest {
    /// Build an MP3 request for plain text with the given voice.
    pub fn from_text(text: &str, voice: &VoiceConfig) -> Self {
        Self {
            input: SynthesisInput::text(text),
            voice: VoiceSelectionParams {
                languageCode: voice.language_code().to_string(),
                name: None,
                ssmlGender: voice.gender().ssml_gender().map(String::from),
            },
            audioConfig: AudioConfig {
                audioEncoding: String::from(constants::AUDIO_ENCODING),
                speakingRate: voice.speaking_rate(),
                effectsProfileId: voice.effects_profile_id().to_vec(),
            },
        }
    }
}
