use serde::{Deserialize, Serialize};

/// Example:
/// ```rust,ignore
/// AudioConfig {
///     audioEncoding: String::from("MP3"),
///     speakingRate: 1.2f32,
///     effectsProfileId: vec![String::from("handset-class-device")]
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[allow(non_snake_case)]
pub struct AudioConfig {
    pub audioEncoding: String,
    pub speakingRate: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effectsProfileId: Vec<String>,
}
