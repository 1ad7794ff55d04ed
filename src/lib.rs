// Public API for the pptx-narrator library

pub mod cli;
pub mod config;
pub mod driver;
pub mod errors;
pub mod pptx;
pub mod trace;
pub mod tts;

// Re-export commonly used types
pub use errors::{NarratorError, Result};
pub use pptx::presentation::{AnnotateReport, Presentation, Progress};
pub use tts::gcp_tts::gcp_tts::{Credentials, GCPTTS};
pub use tts::tts::SpeechSynthesizer;
pub use tts::voice::{VoiceConfig, VoiceGender};
