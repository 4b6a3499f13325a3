use crate::core::aggregate::{self, discover_folders, discover_samples};
use crate::core::config::ReportConfig;
use crate::core::model::{CHART_CATEGORIES, SUMMARY_LABELS};
use crate::report::html;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportState {
    HeaderWritten,
    FragmentAppended,
}

/// Append-only HTML report. Every write goes straight to the file, so an
/// interrupted run leaves a truncated but readable document behind.
pub struct ReportWriter {
    path: PathBuf,
    file: File,
    state: ReportState,
    fragments: usize,
}

impl ReportWriter {
    /// Truncates `path` and writes the page header.
    pub fn create(path: &Path, title: &str) -> Result<Self> {
        let mut file = File::create(path)
            .with_context(|| format!("failed to create report {}", path.display()))?;
        let header = html::page_header(title)?;
        file.write_all(header.as_bytes())
            .with_context(|| format!("failed to write report header to {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            state: ReportState::HeaderWritten,
            fragments: 0,
        })
    }

    pub fn state(&self) -> ReportState {
        self.state
    }

    pub fn append(&mut self, title: Option<&str>, fragment: &str) -> Result<()> {
        let mut chunk = String::with_capacity(fragment.len() + 64);
        if let Some(title) = title {
            chunk.push_str(&html::section_title(title)?);
        }
        chunk.push_str("<br/><br/>\n");
        chunk.push_str(fragment);
        self.file
            .write_all(chunk.as_bytes())
            .with_context(|| format!("failed to append to {}", self.path.display()))?;
        self.file.flush()?;
        self.state = ReportState::FragmentAppended;
        self.fragments += 1;
        Ok(())
    }

    /// Writes the closing tags. Consumes the writer; nothing can follow.
    pub fn close(mut self) -> Result<PathBuf> {
        self.file
            .write_all(html::page_footer().as_bytes())
            .with_context(|| format!("failed to close {}", self.path.display()))?;
        if let Err(e) = self.file.sync_all() {
            debug!("sync of {} failed: {}", self.path.display(), e);
        }
        debug!(
            "closed {} after {} fragment(s)",
            self.path.display(),
            self.fragments
        );
        Ok(self.path)
    }
}

#[derive(Debug)]
pub struct ReportOutcome {
    pub path: PathBuf,
    pub samples: usize,
    pub overrepresented: usize,
    pub issues: usize,
}

/// Scans `cfg.results_dir` and writes the report: summary table, the chart
/// galleries, then the overrepresented-sequence table. Empty sections are
/// left out.
pub fn build_report(cfg: &ReportConfig) -> Result<ReportOutcome> {
    info!("extracting FastQC data from {}", cfg.results_dir.display());
    let samples = discover_samples(&cfg.results_dir)?;
    let agg = aggregate::aggregate(&samples, &SUMMARY_LABELS);
    // galleries look at every folder, data file or not
    let folders = discover_folders(&cfg.results_dir)?;

    let mut report = ReportWriter::create(&cfg.report_path, &cfg.title)?;

    if !agg.summaries.is_empty() {
        report.append(None, &html::render_table(&agg.summaries)?)?;
    }

    for category in &CHART_CATEGORIES {
        let images = aggregate::collect_images(&folders, category);
        if images.is_empty() {
            debug!("no {} images", category.file_pattern);
            continue;
        }
        report.append(Some(category.title), &html::render_gallery(&images)?)?;
    }

    if !agg.overrepresented.is_empty() {
        report.append(
            Some("Overrepresented sequences"),
            &html::render_action_table(&agg.overrepresented)?,
        )?;
    }

    debug!("report state before close: {:?}", report.state());
    let path = report.close()?;
    Ok(ReportOutcome {
        path,
        samples: agg.summaries.len(),
        overrepresented: agg.overrepresented.len(),
        issues: agg.issues.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{DATA_FILE, IMAGES_DIR};
    use std::fs;
    use tempfile::tempdir;

    fn config(results: &Path, out: &Path) -> ReportConfig {
        ReportConfig {
            results_dir: results.to_path_buf(),
            report_path: out.join("report.html"),
            title: "NGS data QC wrapper".to_string(),
        }
    }

    #[test]
    fn writer_walks_its_states() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("r.html");
        let mut w = ReportWriter::create(&path, "T").unwrap();
        assert_eq!(w.state(), ReportState::HeaderWritten);
        w.append(Some("Section"), "<p>one</p>\n").unwrap();
        assert_eq!(w.state(), ReportState::FragmentAppended);

        // visible before close
        let partial = fs::read_to_string(&path).unwrap();
        assert!(partial.contains("<p>one</p>"));
        assert!(!partial.contains("</html>"));

        w.append(None, "<p>two</p>\n").unwrap();
        w.close().unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.find("<h3>Section</h3>").unwrap() < html.find("<p>one</p>").unwrap());
        assert!(html.find("<p>one</p>").unwrap() < html.find("<p>two</p>").unwrap());
        assert!(html.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn create_truncates_previous_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("r.html");
        fs::write(&path, "stale content").unwrap();
        ReportWriter::create(&path, "T").unwrap().close().unwrap();
        assert!(!fs::read_to_string(&path).unwrap().contains("stale"));
    }

    #[test]
    fn empty_results_give_header_and_footer_only() {
        let results = tempdir().unwrap();
        let out = tempdir().unwrap();
        let outcome = build_report(&config(results.path(), out.path())).unwrap();
        assert_eq!(outcome.samples, 0);

        let html = fs::read_to_string(&outcome.path).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>NGS data QC wrapper</h1>"));
        assert!(!html.contains("<table"));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn gallery_includes_folders_without_data() {
        let results = tempdir().unwrap();
        let out = tempdir().unwrap();
        let images = results.path().join("A_Results").join("A_fastqc").join(IMAGES_DIR);
        fs::create_dir_all(&images).unwrap();
        fs::write(images.join("per_base_quality.png"), b"png").unwrap();

        let outcome = build_report(&config(results.path(), out.path())).unwrap();
        assert_eq!(outcome.samples, 0);
        let html = fs::read_to_string(&outcome.path).unwrap();
        assert!(html.contains("<h3>Per base quality</h3>"));
        assert!(html.contains("A_fastqc<br/><img src="));
        assert!(!html.contains("<table class=\"data\">"));
    }

    #[test]
    fn sections_follow_the_fixed_order() {
        let results = tempdir().unwrap();
        let out = tempdir().unwrap();
        let sample = results.path().join("S1.fq.gz_Results").join("S1_fastqc");
        fs::create_dir_all(sample.join(IMAGES_DIR)).unwrap();
        fs::write(
            sample.join(DATA_FILE),
            "Total Sequences\t1000000\nSequence length\t151\n%GC\t45\n\
>>Overrepresented sequences\twarn\n#Sequence\tCount\tPercentage\tPossible Source\n\
ACGTACGTAC\t99\t0.01\tNo Hit\n\n",
        )
        .unwrap();
        for c in &CHART_CATEGORIES {
            fs::write(sample.join(IMAGES_DIR).join(c.file_pattern), b"png").unwrap();
        }

        let outcome = build_report(&config(results.path(), out.path())).unwrap();
        assert_eq!(outcome.samples, 1);
        assert_eq!(outcome.overrepresented, 1);
        assert_eq!(outcome.issues, 0);

        let html = fs::read_to_string(&outcome.path).unwrap();
        let summary = html.find("<td>1000000</td>").unwrap();
        let mut last = summary;
        for c in &CHART_CATEGORIES {
            let pos = html.find(&format!("<h3>{}</h3>", c.title)).unwrap();
            assert!(pos > last);
            last = pos;
        }
        let overrep = html.find("<h3>Overrepresented sequences</h3>").unwrap();
        assert!(overrep > last);
        assert!(html.contains("QUERY=ACGTACGTAC"));
    }
}
