mod common;

use assert_cmd::Command;
use common::{IEEE_PAPER, project, zip_bytes};
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("texprep"))
}

/// Project directory produces a human-readable summary.
#[test]
fn test_cli_directory_summary() {
    let dir = project(&[
        ("main.tex", IEEE_PAPER),
        ("sections/method.tex", ""),
        ("figs/pipeline.png", ""),
        ("refs.bib", ""),
    ]);
    cmd()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("journal family: IEEE"))
        .stdout(predicate::str::contains("document class: IEEEtran"))
        .stdout(predicate::str::contains("template: ieee-template.docx (not installed)"))
        .stdout(predicate::str::contains("3 resolved, 0 missing required"))
        .stderr(predicate::str::contains("warning:").not());
}

/// Missing assets are warnings, not failures.
#[test]
fn test_cli_missing_assets_warn() {
    let dir = project(&[("main.tex", IEEE_PAPER)]);
    cmd()
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "warning: [MissingFigure] figure not found: figs/pipeline (main.tex)",
        ));
}

/// --strict turns a missing figure into exit code 1.
#[test]
fn test_cli_strict_exit_1() {
    let dir = project(&[("main.tex", IEEE_PAPER)]);
    cmd()
        .args(["--strict"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing required assets: figs/pipeline"));
}

/// --json prints the full report.
#[test]
fn test_cli_json_output() {
    let dir = project(&[("paper.tex", "\\documentclass[sn-apa]{sn-jnl}\n")]);
    let output = cmd().arg("--json").arg(dir.path()).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["detection"]["journal_family"], "springer_nature");
    assert_eq!(value["detection"]["bibliography_style"], "sn-apa");
    assert_eq!(value["template_name"], "springer-template.docx");
}

/// Zip archive input.
#[test]
fn test_cli_zip_input() {
    let mut archive = NamedTempFile::with_suffix(".zip").unwrap();
    let data = zip_bytes(&[("main.tex", "\\documentclass{elsarticle}\n\\journal{X}\n")]);
    std::io::Write::write_all(&mut archive, &data).unwrap();
    cmd()
        .arg(archive.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("journal family: Elsevier"))
        .stdout(predicate::str::contains("confidence: 15"));
}

/// Output to file with -o flag.
#[test]
fn test_cli_output_to_file() {
    let dir = project(&[("main.tex", "\\documentclass{acmart}")]);
    let out = NamedTempFile::new().unwrap();
    cmd()
        .arg(dir.path())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let content = std::fs::read_to_string(out.path()).unwrap();
    assert!(content.contains("journal family: ACM"));
}

/// Unsupported input file produces exit code 2.
#[test]
fn test_cli_unsupported_input_exit_2() {
    let mut tmp = NamedTempFile::with_suffix(".docx").unwrap();
    std::io::Write::write_all(&mut tmp, b"not latex").unwrap();
    cmd()
        .arg(tmp.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unsupported input"));
}

/// Missing path produces exit code 1.
#[test]
fn test_cli_missing_path_exit_1() {
    cmd()
        .arg("nonexistent_project")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: nonexistent_project"));
}
