//! Console side of the command line tool: progress lines and note listings.

use std::io::Write;
use std::path::Path;

use crate::config::Config;
use crate::errors::Result;
use crate::pptx::presentation::{AnnotateReport, Presentation, Progress};
use crate::tts::gcp_tts::gcp_tts::Credentials;
use crate::tts::voice::VoiceConfig;

/// Console text for one progress event. `Started` leaves the line open for
/// the slide's outcome.
pub fn progress_text(progress: &Progress) -> String {
    match progress {
        Progress::Started { index } => format!("Processing slide {} ... ", index),
        Progress::Skipped { .. } => "no notes\n".to_string(),
        Progress::Annotated { audio, .. } => format!("{}\n", audio.display()),
    }
}

pub fn voice_line(voice: &VoiceConfig) -> String {
    format!(
        "Voice: gender={} language={} rate={} effects={}",
        voice.gender(),
        voice.language_code(),
        voice.speaking_rate(),
        voice.effects_profile_id().join(",")
    )
}

/// API key first, then a service account file, then ambient credentials.
pub fn credentials(config: &Config) -> Credentials {
    match (&config.api_key, &config.credentials_path) {
        (Some(key), _) => Credentials::ApiKey(key.clone()),
        (None, Some(path)) => Credentials::ServiceAccount(path.clone()),
        (None, None) => Credentials::Ambient,
    }
}

/// Annotate `presentation` into `output`, reporting progress and `Done` to `out`.
pub async fn narrate<W: Write>(
    presentation: &mut Presentation,
    output: &Path,
    out: &mut W,
) -> Result<AnnotateReport> {
    let mut write_error = None;
    let report = presentation
        .annotate_with_progress(output, |progress| {
            let written = out
                .write_all(progress_text(progress).as_bytes())
                .and_then(|_| out.flush());
            if let Err(e) = written {
                write_error.get_or_insert(e);
            }
        })
        .await?;

    if let Some(e) = write_error {
        return Err(e.into());
    }
    writeln!(out, "Done")?;
    Ok(report)
}

/// Print the notes of every slide.
pub fn write_notes<W: Write>(presentation: &Presentation, out: &mut W) -> Result<()> {
    for (index, notes) in presentation.notes().enumerate() {
        match notes? {
            Some(text) => writeln!(out, "Slide {}:\n{}\n", index + 1, text)?,
            None => writeln!(out, "Slide {}: (no notes)\n", index + 1)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NarratorError;
    use crate::pptx::fixtures::deck;
    use crate::tts::tts::MockSpeechSynthesizer;
    use std::path::PathBuf;

    #[test]
    fn test_progress_text() {
        assert_eq!(
            progress_text(&Progress::Started { index: 4 }),
            "Processing slide 4 ... "
        );
        assert_eq!(progress_text(&Progress::Skipped { index: 4 }), "no notes\n");
        assert_eq!(
            progress_text(&Progress::Annotated {
                index: 4,
                audio: PathBuf::from("talk-004.mp3"),
            }),
            "talk-004.mp3\n"
        );
    }

    #[test]
    fn test_credentials_precedence() {
        let mut config = Config::default();
        assert_eq!(credentials(&config), Credentials::Ambient);

        config.credentials_path = Some(PathBuf::from("key.json"));
        assert_eq!(
            credentials(&config),
            Credentials::ServiceAccount(PathBuf::from("key.json"))
        );

        config.api_key = Some("secret".to_string());
        assert_eq!(credentials(&config), Credentials::ApiKey("secret".to_string()));
    }

    #[test]
    fn test_voice_line() {
        assert_eq!(
            voice_line(&VoiceConfig::default()),
            "Voice: gender=female language=en-GB rate=1 effects=handset-class-device"
        );
    }

    #[tokio::test]
    async fn test_narrate_prints_progress_and_done() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.pptx");
        std::fs::write(&input, deck(&[Some("Hello"), None])).unwrap();
        let output = dir.path().join("narrated.pptx");

        let mut mock = MockSpeechSynthesizer::new();
        mock.expect_synthesize()
            .times(1)
            .returning(|_| Ok(b"ID3".to_vec()));
        let mut presentation = Presentation::open(&input, Some(Box::new(mock))).unwrap();

        let mut out = Vec::new();
        narrate(&mut presentation, &output, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let expected = format!(
            "Processing slide 1 ... {}\nProcessing slide 2 ... no notes\nDone\n",
            dir.path().join("narrated-001.mp3").display()
        );
        assert_eq!(text, expected);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_narrate_failure_skips_done() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.pptx");
        std::fs::write(&input, deck(&[Some("Hello")])).unwrap();

        let mut mock = MockSpeechSynthesizer::new();
        mock.expect_synthesize().returning(|_| {
            Err(NarratorError::TTSService {
                status: 403,
                message: "denied".to_string(),
            })
        });
        let mut presentation = Presentation::open(&input, Some(Box::new(mock))).unwrap();

        let mut out = Vec::new();
        let err = narrate(&mut presentation, &dir.path().join("out.pptx"), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, NarratorError::Slide { index: 1, .. }));
        assert_eq!(String::from_utf8(out).unwrap(), "Processing slide 1 ... ");
    }

    #[test]
    fn test_write_notes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.pptx");
        std::fs::write(&input, deck(&[Some("First\nSecond"), None])).unwrap();
        let presentation = Presentation::open(&input, None).unwrap();

        let mut out = Vec::new();
        write_notes(&presentation, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Slide 1:\nFirst\nSecond\n\nSlide 2: (no notes)\n\n"
        );
    }
}
