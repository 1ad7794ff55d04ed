//! In-memory OPC package backed by a zip archive.

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::{NarratorError, Result};

/// A single zip entry, keyed by its partname without the leading slash.
#[derive(Debug, Clone, PartialEq)]
struct PackagePart {
    name: String,
    data: Vec<u8>,
}

/// Every part of the package, in archive order.
#[derive(Debug, Clone, Default)]
pub struct Package {
    parts: Vec<PackagePart>,
}

impl Package {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut parts = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            parts.push(PackagePart {
                name: entry.name().to_string(),
                data,
            });
        }

        debug!(parts = parts.len(), "Loaded package");
        Ok(Self { parts })
    }

    pub fn contains(&self, partname: &str) -> bool {
        let name = normalize(partname);
        self.parts.iter().any(|p| p.name == name)
    }

    pub fn part(&self, partname: &str) -> Option<&[u8]> {
        let name = normalize(partname);
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    pub fn require_part(&self, partname: &str) -> Result<&[u8]> {
        self.part(partname)
            .ok_or_else(|| NarratorError::part_not_found(partname))
    }

    /// Replace a part's content, adding the part when it does not exist yet.
    pub fn set_part(&mut self, partname: &str, data: Vec<u8>) {
        let name = normalize(partname);
        match self.parts.iter_mut().find(|p| p.name == name) {
            Some(part) => part.data = data,
            None => self.parts.push(PackagePart {
                name: name.to_string(),
                data,
            }),
        }
    }

    /// Partname of an existing part under `prefix` holding exactly `data`.
    pub fn find_by_content(&self, prefix: &str, data: &[u8]) -> Option<String> {
        let prefix = normalize(prefix);
        self.parts
            .iter()
            .find(|p| p.name.starts_with(prefix) && p.data == data)
            .map(|p| format!("/{}", p.name))
    }

    pub fn partnames(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// First unused partname of the form `{prefix}{n}.{ext}`, counting from 1.
    pub fn next_partname(&self, prefix: &str, ext: &str) -> String {
        (1..)
            .map(|n| format!("{}{}.{}", prefix, n, ext))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_default()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        self.write_entries(&mut writer)?;
        Ok(writer.finish()?.into_inner())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        debug!(path = %path.display(), "Saved package");
        Ok(())
    }

    fn write_entries<W: Write + Seek>(&self, writer: &mut ZipWriter<W>) -> Result<()> {
        for part in &self.parts {
            // Already-compressed media gains nothing from deflate
            let method = if is_precompressed(&part.name) {
                CompressionMethod::Stored
            } else {
                CompressionMethod::Deflated
            };
            let options = SimpleFileOptions::default().compression_method(method);
            writer.start_file(part.name.as_str(), options)?;
            writer.write_all(&part.data)?;
        }
        Ok(())
    }
}

fn normalize(partname: &str) -> &str {
    partname.trim_start_matches('/')
}

fn is_precompressed(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    [".mp3", ".png", ".jpg", ".jpeg", ".mp4", ".m4a"]
        .iter()
        .any(|ext| lower.ends_with(ext))
}
