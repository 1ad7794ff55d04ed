use serde::{Deserialize, Serialize};

/// Example:
/// ```rust,ignore
/// VoiceSelectionParams {
///     languageCode: String::from("en-GB"),
///     name: None,
///     ssmlGender: Some(String::from("FEMALE"))
/// }
/// ```
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[allow(non_snake_case)]
pub struct VoiceSelectionParams {
    pub languageCode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssmlGender: Option<String>,
}
