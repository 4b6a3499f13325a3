use crate::cli::args::{Cli, Commands, ReportArgs, RunArgs};
use crate::core::config::{DEFAULT_EXTENSIONS, READY_POLL, ReportConfig, RunConfig, ToolConfig};
use crate::core::{fastqc, inputs};
use crate::report::assemble::{self, ReportOutcome};
use anyhow::Result;
use clap::Parser;
use std::time::{Duration, Instant};
use tracing::{Level, debug, info, warn};

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);
    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Report(args) => report(args),
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install logger: {}", e);
    }
}

fn run(args: RunArgs) -> Result<()> {
    let t0 = Instant::now();

    let cfg = stage("preflight", || {
        let extensions: Vec<String> = if args.extensions.is_empty() {
            DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
        } else {
            args.extensions
        };
        let tool = ToolConfig {
            program: args.fastqc,
            interpreter: args.interpreter,
            working_dir: args.tool_dir,
            threads: args.threads,
            ready_timeout: Duration::from_secs(args.ready_timeout),
            poll_interval: READY_POLL,
        };
        RunConfig::new(
            args.input_dir,
            extensions,
            tool,
            args.results,
            args.report.path,
            args.report.title,
        )
    })?;

    let t_inputs = Instant::now();
    let found = inputs::discover_inputs(&cfg.input_dir, &cfg.extensions)?;
    info!(
        "found {} read file(s) in {}",
        found.len(),
        cfg.input_dir.display()
    );
    let files = inputs::preflight(found);
    stage_done("inputs", t_inputs);

    let t_tool = Instant::now();
    let tool_issues = fastqc::run_all(&cfg.tool, &cfg.report.results_dir, &files);
    stage_done("fastqc", t_tool);

    let t_report = Instant::now();
    let outcome = assemble::build_report(&cfg.report)?;
    stage_done("report", t_report);

    if !tool_issues.is_empty() {
        warn!("FastQC failed for {} of {} file(s)", tool_issues.len(), files.len());
    }
    finish(&outcome, t0);
    Ok(())
}

fn report(args: ReportArgs) -> Result<()> {
    let t0 = Instant::now();
    let cfg = stage("preflight", || {
        ReportConfig::new(args.results_dir, args.report.path, args.report.title)
    })?;

    let t_report = Instant::now();
    let outcome = assemble::build_report(&cfg)?;
    stage_done("report", t_report);

    finish(&outcome, t0);
    Ok(())
}

fn finish(outcome: &ReportOutcome, t0: Instant) {
    info!(
        "HTML report generated: {} (samples={} overrepresented={} issues={})",
        outcome.path.display(),
        outcome.samples,
        outcome.overrepresented,
        outcome.issues
    );
    debug!("total={}", fmt_dur(t0.elapsed()));
}

fn stage<T, F>(name: &str, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let t = Instant::now();
    let res = f();
    debug!("stage={} time={}", name, fmt_dur(t.elapsed()));
    res
}

fn stage_done(name: &str, t: Instant) {
    debug!("stage={} time={}", name, fmt_dur(t.elapsed()));
}

fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_logger_install_is_tolerated() {
        init_logging(false, true);
        init_logging(true, false);
        tracing::debug!("still logging");
    }

    #[test]
    fn durations_are_human_sized() {
        assert_eq!(fmt_dur(Duration::from_millis(42)), "42ms");
        assert_eq!(fmt_dur(Duration::from_millis(1500)), "1.500s");
    }

    #[test]
    fn cli_parses_both_subcommands() {
        let cli = Cli::try_parse_from([
            "fastqc-digest",
            "run",
            "reads",
            "--results",
            "res",
            "--ext",
            ".fq.gz",
            "--threads",
            "4",
            "--interpreter",
            "perl",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(a) => {
                assert_eq!(a.threads, 4);
                assert_eq!(a.extensions, vec![".fq.gz".to_string()]);
                assert_eq!(a.report.path.to_str(), Some("my_report.html"));
            }
            Commands::Report(_) => panic!("expected run"),
        }

        let cli = Cli::try_parse_from(["fastqc-digest", "-q", "report", "res", "--report", "out.html"])
            .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Report(a) => assert_eq!(a.report.path.to_str(), Some("out.html")),
            Commands::Run(_) => panic!("expected report"),
        }
    }
}
