/// Custom error types for the narrator
#[derive(Debug, thiserror::Error)]
pub enum NarratorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Speaking rate {rate} out of range ({min} to {max})")]
    SpeakingRateOutOfRange { rate: f32, min: f32, max: f32 },

    #[error("Invalid presentation: {0}")]
    InvalidDocument(String),

    #[error("Part not found in package: {0}")]
    PartNotFound(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("TTS synthesis error: {0}")]
    TTSSynthesis(String),

    #[error("TTS service returned {status}: {message}")]
    TTSService { status: u16, message: String },

    #[error("GCP authentication error: {0}")]
    GCPAuth(#[from] gcp_auth::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Slide {index}")]
    Slide {
        index: usize,
        #[source]
        source: Box<NarratorError>,
    },
}

impl NarratorError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument(message.into())
    }

    pub fn part_not_found(partname: impl Into<String>) -> Self {
        Self::PartNotFound(partname.into())
    }

    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    pub fn tts_synthesis(message: impl Into<String>) -> Self {
        Self::TTSSynthesis(message.into())
    }

    pub fn speaking_rate_out_of_range(rate: f32) -> Self {
        Self::SpeakingRateOutOfRange {
            rate,
            min: constants::MIN_SPEAKING_RATE,
            max: constants::MAX_SPEAKING_RATE,
        }
    }

    /// Attach the 1-based slide index to an error raised while processing it.
    pub fn at_slide(self, index: usize) -> Self {
        Self::Slide {
            index,
            source: Box::new(self),
        }
    }
}

impl From<quick_xml::Error> for NarratorError {
    fn from(err: quick_xml::Error) -> Self {
        NarratorError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for NarratorError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        NarratorError::Xml(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, NarratorError>;

/// Constants used throughout the application
pub mod constants {
    // TTS constants
    pub const GCP_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";
    pub const GCP_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
    pub const MAX_TTS_TEXT_LENGTH: usize = 5000;
    pub const TTS_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_SPEAKING_RATE: f32 = 1.0;
    pub const MIN_SPEAKING_RATE: f32 = 0.25;
    pub const MAX_SPEAKING_RATE: f32 = 4.0;
    pub const DEFAULT_LANGUAGE: &str = "en-GB";
    pub const DEFAULT_EFFECTS_PROFILE: &str = "handset-class-device";
    pub const AUDIO_ENCODING: &str = "MP3";

    // Media placement, in centimetres
    pub const EMU_PER_CM: f64 = 360_000.0;
    pub const MEDIA_LEFT_CM: f64 = 31.85;
    pub const MEDIA_TOP_CM: f64 = 15.95;
    pub const MEDIA_WIDTH_CM: f64 = 1.5;
    pub const MEDIA_HEIGHT_CM: f64 = 1.5;

    // Embedded media
    pub const AUDIO_MIME_TYPE: &str = "audio/mpeg3";
    pub const AUDIO_EXTENSION: &str = "mp3";
    pub const AUDIO_VOLUME: &str = "80000";
    pub const AUTOPLAY_DELAY: &str = "0";
    pub const CLICK_DELAY: &str = "indefinite";
}
