use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TITLE: &str = "NGS data QC wrapper";
pub const DEFAULT_EXTENSIONS: [&str; 4] = [".fq.gz", ".fastq.gz", ".fq", ".fastq"];
pub const READY_POLL: Duration = Duration::from_millis(250);

#[derive(Clone, Debug)]
pub struct ReportConfig {
    pub results_dir: PathBuf,
    pub report_path: PathBuf,
    pub title: String,
}

impl ReportConfig {
    /// Checks the results root exists and makes it absolute, so image paths
    /// in the report resolve wherever the report is opened from.
    pub fn new(results_dir: PathBuf, report_path: PathBuf, title: String) -> Result<Self> {
        if !results_dir.is_dir() {
            bail!("results directory not found: {}", results_dir.display());
        }
        let results_dir = results_dir
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", results_dir.display()))?;
        ensure_parent(&report_path)?;
        Ok(Self {
            results_dir,
            report_path,
            title,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ToolConfig {
    pub program: PathBuf,
    pub interpreter: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
    pub threads: usize,
    pub ready_timeout: Duration,
    pub poll_interval: Duration,
}

impl ToolConfig {
    pub fn validate(&self) -> Result<()> {
        if self.program.as_os_str().is_empty() {
            bail!("--fastqc must not be empty");
        }
        if self.threads == 0 {
            bail!("--threads must be >= 1");
        }
        if let Some(dir) = &self.working_dir {
            if !dir.is_dir() {
                bail!("tool directory not found: {}", dir.display());
            }
        }
        if self.poll_interval.is_zero() {
            bail!("poll interval must be non-zero");
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub input_dir: PathBuf,
    pub extensions: Vec<String>,
    pub tool: ToolConfig,
    pub report: ReportConfig,
}

impl RunConfig {
    pub fn new(
        input_dir: PathBuf,
        extensions: Vec<String>,
        tool: ToolConfig,
        results_dir: PathBuf,
        report_path: PathBuf,
        title: String,
    ) -> Result<Self> {
        if !input_dir.is_dir() {
            bail!("input directory not found: {}", input_dir.display());
        }
        if extensions.is_empty() {
            bail!("at least one input extension is required");
        }
        tool.validate()?;
        std::fs::create_dir_all(&results_dir).with_context(|| {
            format!("failed to create results dir {}", results_dir.display())
        })?;
        let report = ReportConfig::new(results_dir, report_path, title)?;
        Ok(Self {
            input_dir,
            extensions,
            tool,
            report,
        })
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.is_dir() {
        bail!("report path must name a file: {}", path.display());
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        _ => {}
    }
    Ok(())
}
