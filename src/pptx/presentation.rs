//! A `.pptx` deck: slide enumeration, note extraction and narration.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::errors::{constants, NarratorError, Result};
use crate::pptx::media::{embed_audio, MediaPlacement};
use crate::pptx::notes::notes_text;
use crate::pptx::package::Package;
use crate::pptx::rels::{reltype, Relationships};
use crate::pptx::timing::zero_autoplay_delay;
use crate::pptx::xml::XmlDocument;
use crate::tts::tts::{save_audio, SpeechSynthesizer};

/// A slide in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideRef {
    /// 1-based position in the deck.
    pub index: usize,
    pub partname: String,
    pub notes_partname: Option<String>,
}

/// Per-slide progress of [`Presentation::annotate_with_progress`].
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Started { index: usize },
    Skipped { index: usize },
    Annotated { index: usize, audio: PathBuf },
}

/// Outcome of a narration run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotateReport {
    pub slides: usize,
    pub annotated: usize,
    pub skipped: usize,
    pub audio_files: Vec<PathBuf>,
}

pub struct Presentation {
    source: PathBuf,
    package: Package,
    slides: Vec<SlideRef>,
    synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    placement: MediaPlacement,
}

impl std::fmt::Debug for Presentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presentation")
            .field("source", &self.source)
            .field("slides", &self.slides.len())
            .field("synthesizer", &self.synthesizer.is_some())
            .field("placement", &self.placement)
            .finish()
    }
}

impl Presentation {
    /// Open the deck at `path`. Without a synthesizer the deck can still be
    /// read, but [`annotate`](Self::annotate) does nothing.
    pub fn open(path: &Path, synthesizer: Option<Box<dyn SpeechSynthesizer>>) -> Result<Self> {
        let package = Package::open(path)?;
        let mut presentation = Self::from_package(package, synthesizer)?;
        presentation.source = path.to_path_buf();
        info!(
            path = %path.display(),
            slides = presentation.slide_count(),
            "Opened presentation"
        );
        Ok(presentation)
    }

    pub fn from_package(
        package: Package,
        synthesizer: Option<Box<dyn SpeechSynthesizer>>,
    ) -> Result<Self> {
        let slides = slide_refs(&package)?;
        Ok(Self {
            source: PathBuf::new(),
            package,
            slides,
            synthesizer,
            placement: MediaPlacement::default(),
        })
    }

    pub fn with_placement(mut self, placement: MediaPlacement) -> Self {
        self.placement = placement;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[SlideRef] {
        &self.slides
    }

    /// Speaker notes of every slide, in order. Each call starts a fresh pass.
    pub fn notes(&self) -> impl Iterator<Item = Result<Option<String>>> + '_ {
        self.slides.iter().map(move |slide| self.read_notes(slide))
    }

    pub fn list_notes(&self) -> Result<Vec<Option<String>>> {
        self.notes().collect()
    }

    /// Notes of the slide at 1-based `index`.
    pub fn slide_notes(&self, index: usize) -> Result<Option<String>> {
        self.read_notes(self.slide(index)?)
    }

    /// Narrate every slide that has notes and save the deck to `output`.
    pub async fn annotate(&mut self, output: &Path) -> Result<AnnotateReport> {
        self.annotate_with_progress(output, |_| {}).await
    }

    #[instrument(skip(self, output, on_progress), fields(output = %output.display()))]
    pub async fn annotate_with_progress<F>(
        &mut self,
        output: &Path,
        mut on_progress: F,
    ) -> Result<AnnotateReport>
    where
        F: FnMut(&Progress),
    {
        let Some(synthesizer) = self.synthesizer.take() else {
            warn!("No speech synthesizer configured, nothing to annotate");
            return Ok(AnnotateReport::default());
        };
        let result = self
            .narrate_slides(synthesizer.as_ref(), output, &mut on_progress)
            .await;
        self.synthesizer = Some(synthesizer);
        result
    }

    async fn narrate_slides(
        &mut self,
        synthesizer: &dyn SpeechSynthesizer,
        output: &Path,
        on_progress: &mut dyn FnMut(&Progress),
    ) -> Result<AnnotateReport> {
        let mut report = AnnotateReport {
            slides: self.slides.len(),
            ..Default::default()
        };

        for slide in self.slides.clone() {
            on_progress(&Progress::Started { index: slide.index });

            let notes = self
                .read_notes(&slide)
                .map_err(|e| e.at_slide(slide.index))?;
            let Some(text) = notes else {
                info!(slide = slide.index, "no notes");
                report.skipped += 1;
                on_progress(&Progress::Skipped { index: slide.index });
                continue;
            };

            let audio = synthesizer
                .synthesize(&text)
                .await
                .map_err(|e| e.at_slide(slide.index))?;

            let audio_path = audio_path_for(output, slide.index)?;
            save_audio(&audio_path, &audio)
                .await
                .map_err(|e| e.at_slide(slide.index))?;

            let name = audio_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.embed(&slide, &name, &audio)
                .map_err(|e| e.at_slide(slide.index))?;

            report.annotated += 1;
            on_progress(&Progress::Annotated {
                index: slide.index,
                audio: audio_path.clone(),
            });
            report.audio_files.push(audio_path);
        }

        self.save(output)?;
        info!(
            annotated = report.annotated,
            skipped = report.skipped,
            "Annotated presentation"
        );
        Ok(report)
    }

    fn embed(&mut self, slide: &SlideRef, name: &str, audio: &[u8]) -> Result<()> {
        let mut doc = XmlDocument::parse(self.package.require_part(&slide.partname)?)?;
        let shape_id = embed_audio(
            &mut self.package,
            &mut doc,
            &slide.partname,
            name,
            audio,
            &self.placement,
        )?;
        zero_autoplay_delay(&mut doc.root, shape_id);
        self.package.set_part(&slide.partname, doc.to_bytes()?);
        debug!(slide = slide.index, shape_id = shape_id, "Embedded audio");
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.package.save(path)?;
        info!(path = %path.display(), "Saved presentation");
        Ok(())
    }

    /// Number of audio shapes on the slide at 1-based `index`.
    pub fn media_shape_count(&self, index: usize) -> Result<usize> {
        let doc = XmlDocument::parse(self.slide_xml(index)?)?;
        let mut count = 0;
        doc.root.walk(&mut |element| {
            if element.local_name() == "pic" && element.descendant("audioFile").is_some() {
                count += 1;
            }
        });
        Ok(count)
    }

    /// Raw XML of the slide at 1-based `index`.
    pub fn slide_xml(&self, index: usize) -> Result<&[u8]> {
        self.package.require_part(&self.slide(index)?.partname)
    }

    fn slide(&self, index: usize) -> Result<&SlideRef> {
        index
            .checked_sub(1)
            .and_then(|i| self.slides.get(i))
            .ok_or_else(|| {
                NarratorError::invalid_input(format!(
                    "Slide {} out of range (1-{})",
                    index,
                    self.slides.len()
                ))
            })
    }

    fn read_notes(&self, slide: &SlideRef) -> Result<Option<String>> {
        match &slide.notes_partname {
            Some(partname) => notes_text(self.package.require_part(partname)?),
            None => Ok(None),
        }
    }
}

/// Clip path for the slide at 1-based `index`: `{output_stem}-{index:03}.mp3`
/// next to `output`.
pub fn audio_path_for(output: &Path, index: usize) -> Result<PathBuf> {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            NarratorError::invalid_input(format!("Invalid output path: {}", output.display()))
        })?;
    Ok(output.with_file_name(format!(
        "{}-{:03}.{}",
        stem,
        index,
        constants::AUDIO_EXTENSION
    )))
}

fn slide_refs(package: &Package) -> Result<Vec<SlideRef>> {
    let root_rels = Relationships::load(package, "/")?;
    let presentation_partname = root_rels
        .find_by_type(reltype::OFFICE_DOCUMENT)
        .map(|rel| root_rels.target_partname(rel))
        .ok_or_else(|| NarratorError::invalid_document("No main presentation part"))?;

    let doc = XmlDocument::parse(package.require_part(&presentation_partname)?)?;
    let presentation_rels = Relationships::load(package, &presentation_partname)?;

    let mut slides = Vec::new();
    let Some(sld_id_lst) = doc.root.child("sldIdLst") else {
        return Ok(slides);
    };

    for sld_id in sld_id_lst.elements().filter(|e| e.local_name() == "sldId") {
        let rid = sld_id
            .attributes
            .iter()
            .find(|(key, _)| key.ends_with(":id"))
            .map(|(_, value)| value.as_str())
            .ok_or_else(|| NarratorError::invalid_document("Slide entry without r:id"))?;
        let rel = presentation_rels.get(rid).ok_or_else(|| {
            NarratorError::invalid_document(format!("Unknown slide relationship {}", rid))
        })?;
        let partname = presentation_rels.target_partname(rel);

        let slide_rels = Relationships::load(package, &partname)?;
        let notes_partname = slide_rels
            .find_by_type(reltype::NOTES_SLIDE)
            .map(|rel| slide_rels.target_partname(rel));

        slides.push(SlideRef {
            index: slides.len() + 1,
            partname,
            notes_partname,
        });
    }

    debug!(slides = slides.len(), "Enumerated slides");
    Ok(slides)
}
