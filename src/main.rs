use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pptx_narrator::cli::Args;
use pptx_narrator::config::Config;
use pptx_narrator::driver;
use pptx_narrator::pptx::media::MediaPlacement;
use pptx_narrator::trace::init_tracing_subscriber;
use pptx_narrator::{Presentation, GCPTTS};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing_subscriber(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_message(&err));
            ExitCode::FAILURE
        }
    }
}

fn error_message(err: &anyhow::Error) -> String {
    format!("Error: {:#}", err)
}

async fn run(args: Args) -> Result<()> {
    let mut stdout = std::io::stdout();

    if args.list_notes {
        let presentation = Presentation::open(&args.source, None)
            .with_context(|| format!("Cannot open {}", args.source.display()))?;
        driver::write_notes(&presentation, &mut stdout)?;
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .context("An output path is required")?;

    // Load config
    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Cannot load config file {}", path.display()))?,
        None => Config::default(),
    };
    let config = config.merge(
        args.credentials.clone(),
        args.api_key.clone(),
        args.effects.clone(),
    );

    let voice = args.voice(config.effects())?;
    println!("{}", driver::voice_line(&voice));

    // Create GCP TTS client
    let tts = GCPTTS::new(
        voice,
        driver::credentials(&config),
        config.endpoint().to_string(),
        config.timeout(),
    )
    .await
    .context("GCP init error")?;

    let mut presentation = Presentation::open(&args.source, Some(Box::new(tts)))
        .with_context(|| format!("Cannot open {}", args.source.display()))?
        .with_placement(MediaPlacement::from(config.placement));

    if args.source == output {
        info!("Output path equals the source, the input will be overwritten");
    }

    let report = driver::narrate(&mut presentation, &output, &mut stdout).await?;
    info!(
        annotated = report.annotated,
        skipped = report.skipped,
        output = %output.display(),
        "Finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pptx_narrator::NarratorError;

    #[test]
    fn test_error_message_names_slide_once() {
        let err = anyhow::Error::new(
            NarratorError::TTSService {
                status: 403,
                message: "quota exceeded".to_string(),
            }
            .at_slide(2),
        );

        assert_eq!(
            error_message(&err),
            "Error: Slide 2: TTS service returned 403: quota exceeded"
        );
    }

    #[tokio::test]
    async fn test_run_unreadable_input() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("missing.pptx");
        let args = Args::try_parse_from([
            "pptx-narrator",
            source.to_str().unwrap(),
            "--list-notes",
        ])
        .unwrap();

        let err = run(args).await.unwrap_err();
        assert!(error_message(&err).starts_with("Error: Cannot open"));
    }

    #[tokio::test]
    async fn test_run_requires_output() {
        let mut args =
            Args::try_parse_from(["pptx-narrator", "in.pptx", "out.pptx"]).unwrap();
        args.output = None;

        let err = run(args).await.unwrap_err();
        assert_eq!(error_message(&err), "Error: An output path is required");
    }

    #[tokio::test]
    async fn test_run_rejects_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("narrator.toml");
        std::fs::write(&config, "timeout_secs = \"soon\"").unwrap();
        let args = Args::try_parse_from([
            "pptx-narrator",
            "in.pptx",
            "out.pptx",
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();

        let err = run(args).await.unwrap_err();
        assert!(error_message(&err).starts_with("Error: Cannot load config file"));
    }
}
