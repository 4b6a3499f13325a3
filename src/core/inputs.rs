use crate::core::io::looks_like_fastq;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Regular files in `dir` whose name ends with one of `extensions`, in
/// `read_dir` order. Matching is case-insensitive.
pub fn discover_inputs(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let exts: Vec<String> = extensions.iter().map(|e| e.to_ascii_lowercase()).collect();
    let mut out = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_ascii_lowercase();
        if exts.iter().any(|e| name.ends_with(e.as_str())) {
            out.push(path);
        }
    }
    Ok(out)
}

/// Drops inputs that cannot be decoded or do not start like FASTQ.
pub fn preflight(inputs: Vec<PathBuf>) -> Vec<PathBuf> {
    inputs
        .into_iter()
        .filter(|path| match looks_like_fastq(path) {
            Ok(true) => true,
            Ok(false) => {
                warn!("skipping {}: not a FASTQ file", path.display());
                false
            }
            Err(e) => {
                warn!("skipping {}: {:#}", path.display(), e);
                false
            }
        })
        .inspect(|path| debug!("input {}", path.display()))
        .collect()
}
