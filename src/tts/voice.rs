use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::{constants, NarratorError, Result};

/// Requested gender of the synthetic voice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    Neutral,
    Male,
    #[default]
    Female,
}

impl VoiceGender {
    /// Value of the `ssmlGender` field sent to the service.
    ///
    /// Neutral sends nothing so the service picks its default voice for the
    /// language instead of looking for a dedicated neutral one.
    pub fn ssml_gender(&self) -> Option<&'static str> {
        match self {
            VoiceGender::Neutral => None,
            VoiceGender::Male => Some("MALE"),
            VoiceGender::Female => Some("FEMALE"),
        }
    }
}

impl fmt::Display for VoiceGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VoiceGender::Neutral => "neutral",
            VoiceGender::Male => "male",
            VoiceGender::Female => "female",
        };
        f.write_str(name)
    }
}

impl FromStr for VoiceGender {
    type Err = NarratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "neutral" => Ok(VoiceGender::Neutral),
            "male" => Ok(VoiceGender::Male),
            "female" => Ok(VoiceGender::Female),
            other => Err(NarratorError::invalid_input(format!(
                "Unknown voice gender: {}",
                other
            ))),
        }
    }
}

/// Voice parameters applied to every synthesis request.
#[derive(Clone, Debug, PartialEq)]
pub struct VoiceConfig {
    gender: VoiceGender,
    language_code: String,
    speaking_rate: f32,
    effects_profile_id: Vec<String>,
}

impl VoiceConfig {
    pub fn new(
        gender: VoiceGender,
        language_code: impl Into<String>,
        speaking_rate: f32,
        effects_profile_id: Vec<String>,
    ) -> Result<Self> {
        let language_code = language_code.into();
        if language_code.trim().is_empty() {
            return Err(NarratorError::invalid_input("Language code cannot be empty"));
        }

        if !(constants::MIN_SPEAKING_RATE..=constants::MAX_SPEAKING_RATE).contains(&speaking_rate)
        {
            return Err(NarratorError::speaking_rate_out_of_range(speaking_rate));
        }

        Ok(Self {
            gender,
            language_code,
            speaking_rate,
            effects_profile_id,
        })
    }

    pub fn gender(&self) -> VoiceGender {
        self.gender
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn speaking_rate(&self) -> f32 {
        self.speaking_rate
    }

    pub fn effects_profile_id(&self) -> &[String] {
        &self.effects_profile_id
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            gender: VoiceGender::default(),
            language_code: constants::DEFAULT_LANGUAGE.to_string(),
            speaking_rate: constants::DEFAULT_SPEAKING_RATE,
            effects_profile_id: vec![constants::DEFAULT_EFFECTS_PROFILE.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_config_default() {
        let voice = VoiceConfig::default();
        assert_eq!(voice.gender(), VoiceGender::Female);
        assert_eq!(voice.language_code(), "en-GB");
        assert_eq!(voice.speaking_rate(), 1.0);
        assert_eq!(voice.effects_profile_id(), ["handset-class-device"]);
    }

    #[test]
    fn test_voice_config_rate_bounds() {
        assert!(VoiceConfig::new(VoiceGender::Male, "en-US", 0.25, vec![]).is_ok());
        assert!(VoiceConfig::new(VoiceGender::Male, "en-US", 4.0, vec![]).is_ok());
        assert!(matches!(
            VoiceConfig::new(VoiceGender::Male, "en-US", 0.2, vec![]),
            Err(NarratorError::SpeakingRateOutOfRange { .. })
        ));
        assert!(matches!(
            VoiceConfig::new(VoiceGender::Male, "en-US", 4.5, vec![]),
            Err(NarratorError::SpeakingRateOutOfRange { .. })
        ));
        assert!(VoiceConfig::new(VoiceGender::Male, "en-US", f32::NAN, vec![]).is_err());
    }

    #[test]
    fn test_voice_config_empty_language() {
        assert!(VoiceConfig::new(VoiceGender::Female, "  ", 1.0, vec![]).is_err());
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("MALE".parse::<VoiceGender>().unwrap(), VoiceGender::Male);
        assert_eq!(" female ".parse::<VoiceGender>().unwrap(), VoiceGender::Female);
        assert_eq!("neutral".parse::<VoiceGender>().unwrap(), VoiceGender::Neutral);
        assert!("robot".parse::<VoiceGender>().is_err());
    }

    #[test]
    fn test_ssml_gender_mapping() {
        assert_eq!(VoiceGender::Male.ssml_gender(), Some("MALE"));
        assert_eq!(VoiceGender::Female.ssml_gender(), Some("FEMALE"));
        assert_eq!(VoiceGender::Neutral.ssml_gender(), None);
    }
}
