use crate::core::model::SampleIssue;
use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

pub struct MmapSource {
    mmap: Option<Mmap>,
}

impl MmapSource {
    pub fn open(path: &Path) -> Result<Self, SampleIssue> {
        let file = File::open(path).map_err(|e| classify(path, e))?;
        let len = file.metadata().map_err(|e| classify(path, e))?.len();
        if len == 0 {
            return Ok(Self { mmap: None });
        }
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| classify(path, e))?;
        Ok(Self { mmap: Some(mmap) })
    }

    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or(&[])
    }
}

/// Maps `path` and validates it as UTF-8. The caller gets the borrowed text
/// through `f` so the mapping never outlives the scan.
pub fn with_text<T, F>(path: &Path, f: F) -> Result<T, SampleIssue>
where
    F: FnOnce(&str) -> T,
{
    let src = MmapSource::open(path)?;
    let text = std::str::from_utf8(src.bytes())
        .map_err(|_| SampleIssue::DecodeFailure(path.to_path_buf()))?;
    Ok(f(text))
}

fn classify(path: &Path, err: io::Error) -> SampleIssue {
    if err.kind() == io::ErrorKind::NotFound {
        SampleIssue::MissingFile(path.to_path_buf())
    } else {
        SampleIssue::Io {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

pub fn detect_input_kind(path: &Path) -> Result<InputKind> {
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        let ext = ext.to_ascii_lowercase();
        if ext == "gz" {
            return Ok(InputKind::Gzip);
        }
    }
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut magic = [0u8; 2];
    let n = file
        .read(&mut magic)
        .with_context(|| "failed to read magic bytes")?;
    if n == 2 && magic == [0x1f, 0x8b] {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

pub fn open_reader(path: &Path) -> Result<Box<dyn Read>> {
    let kind = detect_input_kind(path)?;
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    Ok(match kind {
        InputKind::Gzip => Box::new(MultiGzDecoder::new(reader)),
        InputKind::Plain => Box::new(reader),
    })
}

/// Cheap sanity check before handing a file to the external tool: the first
/// decoded byte of a FASTQ record header must be `@`.
pub fn looks_like_fastq(path: &Path) -> Result<bool> {
    let mut reader = open_reader(path)?;
    let mut first = [0u8; 1];
    let n = reader
        .read(&mut first)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    Ok(n == 1 && first[0] == b'@')
}
