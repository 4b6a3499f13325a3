use crate::core::io::with_text;
use crate::core::model::{OverrepresentedSequence, SampleIssue};
use memchr::memmem;
use std::path::Path;
use tracing::debug;

pub const SECTION_MARKER: &str = ">>Overrepresented sequences";
const END_MODULE: &str = ">>END_MODULE";
const MIN_COLUMNS: usize = 4;

/// First data row of the overrepresented-sequences table, if any.
pub fn extract_overrepresented(
    path: &Path,
    sample_name: &str,
) -> Result<Option<OverrepresentedSequence>, SampleIssue> {
    let row = with_text(path, first_row)?;
    match row {
        Row::NoSection => {
            debug!("no overrepresented section in {}", path.display());
            Ok(None)
        }
        Row::Empty => Ok(None),
        Row::Short(columns) => Err(SampleIssue::MalformedSection {
            path: path.to_path_buf(),
            columns,
        }),
        Row::Full(cols) => {
            let mut cols = cols.into_iter();
            let mut next = || cols.next().unwrap_or_default();
            Ok(Some(OverrepresentedSequence {
                sample_name: sample_name.to_string(),
                sequence: next(),
                count: next(),
                percentage: next(),
                possible_source: next(),
            }))
        }
    }
}

#[derive(Debug, PartialEq)]
enum Row {
    NoSection,
    Empty,
    Short(usize),
    Full(Vec<String>),
}

fn first_row(text: &str) -> Row {
    let Some(start) = section_start(text.as_bytes()) else {
        return Row::NoSection;
    };
    // skip the marker line itself
    let body = &text[start..];
    let mut lines = body.lines();
    lines.next();
    for line in lines {
        if line.starts_with('#') {
            continue;
        }
        if line.trim().is_empty() || line.starts_with(END_MODULE) {
            return Row::Empty;
        }
        let cols: Vec<&str> = line.trim().split('\t').collect();
        if cols.len() < MIN_COLUMNS {
            return Row::Short(cols.len());
        }
        return Row::Full(cols[..MIN_COLUMNS].iter().map(|c| c.to_string()).collect());
    }
    Row::Empty
}

/// Byte offset of the first line that begins with the section marker.
fn section_start(bytes: &[u8]) -> Option<usize> {
    memmem::find_iter(bytes, SECTION_MARKER.as_bytes())
        .find(|&pos| pos == 0 || bytes[pos - 1] == b'\n')
}
