pub mod gcp_tts;
pub mod tts;
pub mod validator;
pub mod voice;
