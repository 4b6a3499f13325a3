use crate::core::io::with_text;
use crate::core::model::SampleIssue;
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

pub type FieldMap = HashMap<String, String>;

/// Label -> remainder of the last line containing the label.
///
/// Read problems are logged and handed back next to an empty map, so the
/// caller can keep going and still count them.
pub fn extract_fields(path: &Path, labels: &[&str]) -> (FieldMap, Option<SampleIssue>) {
    match try_extract_fields(path, labels) {
        Ok(map) => (map, None),
        Err(issue) => {
            warn!("{}", issue);
            (FieldMap::new(), Some(issue))
        }
    }
}

pub fn try_extract_fields(path: &Path, labels: &[&str]) -> Result<FieldMap, SampleIssue> {
    if labels.is_empty() {
        return with_text(path, |_| FieldMap::new());
    }
    let matcher = label_matcher(labels);
    with_text(path, |text| scan_fields(text, labels, &matcher))
}

fn label_matcher(labels: &[&str]) -> AhoCorasick {
    AhoCorasickBuilder::new()
        .match_kind(MatchKind::Standard)
        .build(labels)
        .expect("label automaton")
}

fn scan_fields(text: &str, labels: &[&str], matcher: &AhoCorasick) -> FieldMap {
    let mut out = FieldMap::new();
    let mut seen = vec![false; labels.len()];
    for line in text.lines() {
        seen.iter_mut().for_each(|s| *s = false);
        for mat in matcher.find_overlapping_iter(line) {
            seen[mat.pattern().as_usize()] = true;
        }
        for (idx, hit) in seen.iter().enumerate() {
            if *hit {
                let label = labels[idx];
                let value = line.replace(label, "").trim().to_string();
                // later lines overwrite earlier ones
                out.insert(label.to_string(), value);
            }
        }
    }
    out
}
