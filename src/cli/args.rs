use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fastqc-digest",
    version,
    about = "Run FastQC over a folder of reads and collate one HTML report"
)]
pub struct Cli {
    /// Only errors are printed to stderr.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Include debug output on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run FastQC on every read file in a directory, then build the report.
    Run(RunArgs),
    /// Build the report from an existing FastQC results directory.
    Report(ReportArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Directory holding the read files.
    pub input_dir: PathBuf,

    /// Where FastQC output goes, one `<file>_Results` folder per input.
    #[arg(long)]
    pub results: PathBuf,

    #[command(flatten)]
    pub report: ReportOpts,

    /// FastQC executable or script.
    #[arg(long, env = "FASTQC", default_value = "fastqc")]
    pub fastqc: PathBuf,

    /// Interpreter to launch the FastQC script with, e.g. `perl`.
    #[arg(long)]
    pub interpreter: Option<PathBuf>,

    /// Working directory for the FastQC process.
    #[arg(long)]
    pub tool_dir: Option<PathBuf>,

    /// Threads handed to FastQC for each file.
    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,

    /// Input file name suffixes; repeat for several.
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Seconds to wait for FastQC output to appear after the process exits.
    #[arg(long, default_value_t = 30)]
    pub ready_timeout: u64,
}

#[derive(Args)]
pub struct ReportArgs {
    /// FastQC results root (`<root>/<sample>/<extracted>/fastqc_data.txt`).
    pub results_dir: PathBuf,

    #[command(flatten)]
    pub report: ReportOpts,
}

#[derive(Args)]
pub struct ReportOpts {
    /// Output HTML file.
    #[arg(long = "report", default_value = "my_report.html")]
    pub path: PathBuf,

    /// Page title.
    #[arg(long, default_value = crate::core::config::DEFAULT_TITLE)]
    pub title: String,
}
