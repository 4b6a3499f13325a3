use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DATA: &str = ">>Basic Statistics\tpass\n\
#Measure\tValue\n\
Filename\tS1.fq.gz\n\
Total Sequences\t1000000\n\
Sequence length\t151\n\
%GC\t45\n\
>>END_MODULE\n\
>>Overrepresented sequences\twarn\n\
#Sequence\tCount\tPercentage\tPossible Source\n\
GATCGGAAGAGCACACGTCTGAACTCCAGTCAC\t5120\t0.512\tTruSeq Adapter, Index 1\n\
>>END_MODULE\n";

fn write_sample(root: &Path, outer: &str, inner: &str, data: &str) {
    let dir = root.join(outer).join(inner);
    fs::create_dir_all(dir.join("Images")).unwrap();
    fs::write(dir.join("fastqc_data.txt"), data).unwrap();
    fs::write(dir.join("Images").join("per_base_quality.png"), b"png").unwrap();
}

#[test]
fn report_from_results_dir() {
    let results = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_sample(results.path(), "S1.fq.gz_Results", "S1_fastqc", DATA);
    write_sample(
        results.path(),
        "S2.fq.gz_Results",
        "S2_fastqc",
        "Total Sequences\t20\n%GC\t51\n",
    );
    let report = out.path().join("report.html");

    Command::cargo_bin("fastqc-digest")
        .unwrap()
        .arg("report")
        .arg(results.path())
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stderr(predicate::str::contains("HTML report generated"));

    let html = fs::read_to_string(&report).unwrap();
    assert!(html.contains("<h1>NGS data QC wrapper</h1>"));
    assert!(html.contains("<td>S1_fastqc</td>"));
    assert!(html.contains("<td>S2_fastqc</td>"));
    assert!(html.contains("<h3>Per base quality</h3>"));
    assert!(!html.contains("<h3>Adapter Content</h3>"));
    assert!(html.contains("QUERY=GATCGGAAGAGCACACGTCTGAACTCCAGTCAC"));
    assert!(html.ends_with("</html>\n"));
}

#[test]
fn empty_results_still_produce_a_document() {
    let results = tempdir().unwrap();
    let out = tempdir().unwrap();
    let report = out.path().join("empty.html");

    Command::cargo_bin("fastqc-digest")
        .unwrap()
        .args(["-q", "report"])
        .arg(results.path())
        .arg("--report")
        .arg(&report)
        .assert()
        .success();

    let html = fs::read_to_string(&report).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(!html.contains("<table"));
}

#[test]
fn missing_results_dir_fails() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("fastqc-digest")
        .unwrap()
        .arg("report")
        .arg(dir.path().join("missing"))
        .arg("--report")
        .arg(dir.path().join("r.html"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("results directory not found"));
}

#[test]
fn run_survives_a_missing_tool() {
    let input = tempdir().unwrap();
    let work = tempdir().unwrap();
    fs::write(input.path().join("S1.fq"), b"@r1\nACGT\n+\nIIII\n").unwrap();
    let results = work.path().join("results");
    let report = work.path().join("report.html");

    Command::cargo_bin("fastqc-digest")
        .unwrap()
        .arg("run")
        .arg(input.path())
        .arg("--results")
        .arg(&results)
        .arg("--report")
        .arg(&report)
        .arg("--fastqc")
        .arg(work.path().join("no-such-fastqc"))
        .assert()
        .success()
        .stderr(predicate::str::contains("fastqc failed for"));

    assert!(results.join("S1.fq_Results").is_dir());
    assert!(fs::read_to_string(&report).unwrap().ends_with("</html>\n"));
}
