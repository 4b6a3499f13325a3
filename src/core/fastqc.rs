use crate::core::config::ToolConfig;
use crate::core::model::{DATA_FILE, SampleIssue};
use anyhow::{Context, Result, anyhow};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// `<results>/<input file name>_Results`
pub fn output_dir_for(results_dir: &Path, input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    results_dir.join(format!("{}_Results", name))
}

pub fn command_for(tool: &ToolConfig, input: &Path, out_dir: &Path) -> Command {
    let mut cmd = match &tool.interpreter {
        Some(interp) => {
            let mut c = Command::new(interp);
            c.arg(&tool.program);
            c
        }
        None => Command::new(&tool.program),
    };
    cmd.arg(input)
        .arg("-o")
        .arg(out_dir)
        .arg("--extract")
        .arg("--threads")
        .arg(tool.threads.to_string());
    if let Some(dir) = &tool.working_dir {
        cmd.current_dir(dir);
    }
    cmd
}

/// Runs the tool on one input and waits until its data file is on disk.
/// Returns the extracted folder.
pub fn run_one(tool: &ToolConfig, results_dir: &Path, input: &Path) -> Result<PathBuf, SampleIssue> {
    let failure = |reason: String| SampleIssue::ExternalToolFailure {
        input: input.to_path_buf(),
        reason,
    };

    let out_dir = output_dir_for(results_dir, input);
    fs::create_dir_all(&out_dir)
        .map_err(|e| failure(format!("failed to create {}: {}", out_dir.display(), e)))?;

    let mut cmd = command_for(tool, input, &out_dir);
    debug!("running {:?}", cmd);
    let output = cmd.output().map_err(|e| failure(e.to_string()))?;
    if !output.stderr.is_empty() {
        debug!("fastqc stderr: {}", String::from_utf8_lossy(&output.stderr).trim_end());
    }
    if !output.status.success() {
        return Err(failure(format!("exited with {}", output.status)));
    }

    wait_ready(tool, &out_dir).map_err(|e| failure(format!("{:#}", e)))
}

/// Runs the tool over every input, one at a time. A failure is logged and
/// the batch moves on.
pub fn run_all(tool: &ToolConfig, results_dir: &Path, inputs: &[PathBuf]) -> Vec<SampleIssue> {
    let mut issues = Vec::new();
    for (i, input) in inputs.iter().enumerate() {
        info!("[{}/{}] fastqc {}", i + 1, inputs.len(), input.display());
        let t = Instant::now();
        match run_one(tool, results_dir, input) {
            Ok(dir) => info!(
                "FastQC analysis completed for {} in {:?}; results in {}",
                input.display(),
                t.elapsed(),
                dir.display()
            ),
            Err(issue) => {
                warn!("{}", issue);
                issues.push(issue);
            }
        }
    }
    issues
}

/// Polls `out_dir` until an extracted folder with a data file shows up. If
/// only the archive is there, unpacks it in place.
pub fn wait_ready(tool: &ToolConfig, out_dir: &Path) -> Result<PathBuf> {
    let deadline = Instant::now() + tool.ready_timeout;
    loop {
        if let Some(dir) = find_extracted(out_dir)? {
            return Ok(dir);
        }
        if let Some(archive) = find_archive(out_dir)? {
            debug!("extracting {}", archive.display());
            extract_archive(&archive, out_dir)?;
            if let Some(dir) = find_extracted(out_dir)? {
                return Ok(dir);
            }
        }
        if Instant::now() >= deadline {
            return Err(anyhow!(
                "no {} under {} after {:?}",
                DATA_FILE,
                out_dir.display(),
                tool.ready_timeout
            ));
        }
        thread::sleep(tool.poll_interval);
    }
}

fn find_extracted(out_dir: &Path) -> Result<Option<PathBuf>> {
    for entry in
        fs::read_dir(out_dir).with_context(|| format!("failed to list {}", out_dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() && path.join(DATA_FILE).is_file() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

fn find_archive(out_dir: &Path) -> Result<Option<PathBuf>> {
    for entry in
        fs::read_dir(out_dir).with_context(|| format!("failed to list {}", out_dir.display()))?
    {
        let path = entry?.path();
        let is_archive = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.ends_with("_fastqc.zip"));
        if is_archive && path.is_file() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

fn extract_archive(archive: &Path, out_dir: &Path) -> Result<()> {
    let file =
        File::open(archive).with_context(|| format!("failed to open {}", archive.display()))?;
    let mut zip =
        ZipArchive::new(file).with_context(|| format!("failed to read {}", archive.display()))?;
    zip.extract(out_dir)
        .with_context(|| format!("failed to extract {}", archive.display()))?;
    Ok(())
}
