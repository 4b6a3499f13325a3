use std::path::PathBuf;
use thiserror::Error;

pub const NOT_AVAILABLE: &str = "N/A";

pub const DATA_FILE: &str = "fastqc_data.txt";
pub const IMAGES_DIR: &str = "Images";

pub const LABEL_SEQUENCE_LENGTH: &str = "Sequence length";
pub const LABEL_TOTAL_SEQUENCES: &str = "Total Sequences";
pub const LABEL_GC_PERCENT: &str = "%GC";

pub const SUMMARY_LABELS: [&str; 3] = [
    LABEL_SEQUENCE_LENGTH,
    LABEL_TOTAL_SEQUENCES,
    LABEL_GC_PERCENT,
];

/// A row type that can be laid out as a table: fixed column names plus one
/// value per column, in the same order.
pub trait Record {
    fn headers(&self) -> &'static [&'static str];
    fn values(&self) -> Vec<&str>;
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SampleSummary {
    pub sample_name: String,
    pub sequence_length: String,
    pub total_sequences: String,
    pub gc_percent: String,
}

impl Record for SampleSummary {
    fn headers(&self) -> &'static [&'static str] {
        &[
            "Folder",
            LABEL_SEQUENCE_LENGTH,
            LABEL_TOTAL_SEQUENCES,
            LABEL_GC_PERCENT,
        ]
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.sample_name.as_str(),
            self.sequence_length.as_str(),
            self.total_sequences.as_str(),
            self.gc_percent.as_str(),
        ]
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OverrepresentedSequence {
    pub sample_name: String,
    pub sequence: String,
    pub count: String,
    pub percentage: String,
    pub possible_source: String,
}

impl Record for OverrepresentedSequence {
    fn headers(&self) -> &'static [&'static str] {
        &["Folder", "Sequence", "Count", "Percentage", "Possible Source"]
    }

    fn values(&self) -> Vec<&str> {
        vec![
            self.sample_name.as_str(),
            self.sequence.as_str(),
            self.count.as_str(),
            self.percentage.as_str(),
            self.possible_source.as_str(),
        ]
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageReference {
    pub sample_name: String,
    pub image_path: PathBuf,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChartCategory {
    pub title: &'static str,
    pub file_pattern: &'static str,
}

// Report order.
pub const CHART_CATEGORIES: [ChartCategory; 4] = [
    ChartCategory {
        title: "Per base quality",
        file_pattern: "per_base_quality.png",
    },
    ChartCategory {
        title: "Adapter Content",
        file_pattern: "adapter_content.png",
    },
    ChartCategory {
        title: "per_sequence_gc_content",
        file_pattern: "per_sequence_gc_content.png",
    },
    ChartCategory {
        title: "sequence_length_distribution",
        file_pattern: "sequence_length_distribution.png",
    },
];

/// Problems that are contained to one sample. None of them stops the batch.
#[derive(Debug, Error)]
pub enum SampleIssue {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("file is not valid UTF-8: {}", .0.display())]
    DecodeFailure(PathBuf),
    #[error("overrepresented sequences row in {} has {columns} column(s), expected at least 4", .path.display())]
    MalformedSection { path: PathBuf, columns: usize },
    #[error("fastqc failed for {}: {reason}", .input.display())]
    ExternalToolFailure { input: PathBuf, reason: String },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
