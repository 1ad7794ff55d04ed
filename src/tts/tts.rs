use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::errors::Result;

/// Converts narration text into encoded audio.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and return MP3 bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Write a synthesized clip to disk.
pub async fn save_audio(path: &Path, audio: &[u8]) -> Result<()> {
    tokio::fs::write(path, audio).await?;
    info!(path = %path.display(), bytes = audio.len(), "Created \"{}\"", path.display());
    Ok(())
}
