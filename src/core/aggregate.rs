use crate::core::extract::extract_fields;
use crate::core::model::{
    ChartCategory, DATA_FILE, IMAGES_DIR, ImageReference, LABEL_GC_PERCENT,
    LABEL_SEQUENCE_LENGTH, LABEL_TOTAL_SEQUENCES, NOT_AVAILABLE, OverrepresentedSequence,
    SampleIssue, SampleSummary,
};
use crate::core::overrep::extract_overrepresented;
use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern, glob_with};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One extracted FastQC folder: `<root>/<sample folder>/<extracted folder>`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SampleDir {
    pub name: String,
    pub path: PathBuf,
}

impl SampleDir {
    pub fn data_file(&self) -> PathBuf {
        self.path.join(DATA_FILE)
    }
}

#[derive(Debug, Default)]
pub struct Aggregate {
    pub summaries: Vec<SampleSummary>,
    pub overrepresented: Vec<OverrepresentedSequence>,
    pub issues: Vec<SampleIssue>,
}

/// Directories exactly two levels under `root`, in `read_dir` order.
/// Hidden entries (leading `.`) are skipped at both levels, like a `*/*/`
/// glob.
///
/// The order is whatever the filesystem hands back and is not sorted, so it
/// can differ between platforms.
pub fn discover_folders(root: &Path) -> Result<Vec<SampleDir>> {
    let mut out = Vec::new();
    for outer in list_dirs(root)? {
        let inner = match list_dirs(&outer) {
            Ok(v) => v,
            Err(e) => {
                warn!("skipping {}: {:#}", outer.display(), e);
                continue;
            }
        };
        for path in inner {
            let name = path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            out.push(SampleDir { name, path });
        }
    }
    Ok(out)
}

/// Folders from [`discover_folders`] that hold a data file.
pub fn discover_samples(root: &Path) -> Result<Vec<SampleDir>> {
    let mut out = Vec::new();
    for dir in discover_folders(root)? {
        debug!("checking folder {}", dir.path.display());
        if dir.data_file().is_file() {
            out.push(dir);
        } else {
            debug!("no {} in {}", DATA_FILE, dir.path.display());
        }
    }
    Ok(out)
}

fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            out.push(path);
        }
    }
    Ok(out)
}

pub fn summarize(sample: &SampleDir, labels: &[&str]) -> (SampleSummary, Option<SampleIssue>) {
    let (fields, issue) = extract_fields(&sample.data_file(), labels);
    let get = |label: &str| {
        fields
            .get(label)
            .cloned()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    let summary = SampleSummary {
        sample_name: sample.name.clone(),
        sequence_length: get(LABEL_SEQUENCE_LENGTH),
        total_sequences: get(LABEL_TOTAL_SEQUENCES),
        gc_percent: get(LABEL_GC_PERCENT),
    };
    (summary, issue)
}

pub fn aggregate(samples: &[SampleDir], labels: &[&str]) -> Aggregate {
    let mut agg = Aggregate::default();
    for sample in samples {
        let (summary, issue) = summarize(sample, labels);
        debug!("added summary {:?}", summary);
        agg.summaries.push(summary);
        if let Some(issue) = issue {
            agg.issues.push(issue);
            // an unreadable file has no table either
            continue;
        }

        match extract_overrepresented(&sample.data_file(), &sample.name) {
            Ok(Some(rec)) => agg.overrepresented.push(rec),
            Ok(None) => {}
            Err(issue) => {
                warn!("{}", issue);
                agg.issues.push(issue);
            }
        }
    }
    if agg.summaries.is_empty() {
        info!("no FastQC data found");
    }
    if agg.overrepresented.is_empty() {
        info!("no overrepresented sequences found");
    }
    agg
}

/// Chart images for one category, in folder order. Takes every folder from
/// [`discover_folders`], with or without a data file; folders without a
/// match contribute nothing.
pub fn collect_images(folders: &[SampleDir], category: &ChartCategory) -> Vec<ImageReference> {
    let opts = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let mut out = Vec::new();
    for folder in folders {
        let images = folder.path.join(IMAGES_DIR);
        let pattern = format!(
            "{}/{}",
            Pattern::escape(&images.to_string_lossy()),
            category.file_pattern
        );
        let paths = match glob_with(&pattern, opts) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("bad chart pattern {}: {}", pattern, e);
                return out;
            }
        };
        for entry in paths {
            match entry {
                Ok(image_path) => out.push(ImageReference {
                    sample_name: folder.name.clone(),
                    image_path,
                }),
                Err(e) => warn!("{}", e),
            }
        }
    }
    out
}
