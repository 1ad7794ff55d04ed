use serde::{Deserialize, Serialize};

/// Example:
/// ```rust,ignore
/// SynthesisInput {
///     text: Some(String::from("Welcome to the quarterly review.")),
///     ssml: None
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SynthesisInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssml: Option<String>,
}

impl SynthesisInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ssml: None,
        }
    }
}
