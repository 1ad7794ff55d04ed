use std::path::PathBuf;

use clap::Parser;

use crate::errors::{constants, Result};
use crate::tts::voice::{VoiceConfig, VoiceGender};

#[derive(Parser, Debug)]
#[command(name = "pptx-narrator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Turn PowerPoint speaker notes into embedded, autoplaying narration")]
pub struct Args {
    /// Presentation to read
    pub source: PathBuf,

    /// Where to write the narrated presentation
    #[arg(required_unless_present = "list_notes")]
    pub output: Option<PathBuf>,

    /// Voice gender
    #[arg(long, value_enum, default_value_t = VoiceGender::Female)]
    pub gender: VoiceGender,

    /// BCP-47 language code of the voice
    #[arg(long, value_name = "CODE", default_value = constants::DEFAULT_LANGUAGE)]
    pub lang: String,

    /// Speaking rate, 0.25 to 4.0
    #[arg(long, default_value_t = constants::DEFAULT_SPEAKING_RATE)]
    pub speed: f32,

    /// Audio effects profile, repeatable
    #[arg(long = "effect", value_name = "PROFILE")]
    pub effects: Vec<String>,

    /// Service account key file
    #[arg(long, value_name = "JSON")]
    pub credentials: Option<PathBuf>,

    /// API key, sent instead of an OAuth token
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// TOML config file
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Print the speaker notes of every slide and exit
    #[arg(long)]
    pub list_notes: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn voice(&self, effects: Vec<String>) -> Result<VoiceConfig> {
        VoiceConfig::new(self.gender, self.lang.clone(), self.speed, effects)
    }
}
