use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn test_cli_writes_reports() {
    let out = tempfile::tempdir().unwrap();
    let input = fs::canonicalize("tests/data/otus_blast.tsv").unwrap();

    Command::cargo_bin("blastfilt")
        .unwrap()
        .arg(&input)
        .arg("--output-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(contains("12 rows, 4 self-matches removed, 0 skipped"))
        .stdout(contains("fulls_best\t4\t"));

    for suffix in &["_all", "_fulls", "_shorts", "_fulls_best", "_all_best"] {
        assert!(out.path().join(format!("otus_blast{}.tsv", suffix)).exists());
    }
}

#[test]
fn test_cli_defaults_to_working_directory() {
    let out = tempfile::tempdir().unwrap();
    let input = fs::canonicalize("tests/data/otus_blast.tsv").unwrap();

    Command::cargo_bin("blastfilt")
        .unwrap()
        .current_dir(out.path())
        .arg(&input)
        .assert()
        .success();

    assert!(out.path().join("otus_blast_all.tsv").exists());
}

#[test]
fn test_cli_threshold() {
    let out = tempfile::tempdir().unwrap();
    let input = fs::canonicalize("tests/data/otus_blast.tsv").unwrap();

    Command::cargo_bin("blastfilt")
        .unwrap()
        .arg(&input)
        .args(&["-o", out.path().to_str().unwrap(), "-t", "40"])
        .assert()
        .success()
        .stdout(contains("shorts\t0\t"));
}

#[test]
fn test_cli_missing_file() {
    Command::cargo_bin("blastfilt")
        .unwrap()
        .arg("no_such_blast_results.tsv")
        .assert()
        .failure()
        .stderr(contains("no_such_blast_results.tsv"));
}

#[test]
fn test_cli_missing_columns() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("narrow.tsv");
    fs::write(&input, "qseqid\tsseqid\nQ1\tS1\n").unwrap();

    Command::cargo_bin("blastfilt")
        .unwrap()
        .arg(&input)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(contains("Missing required column(s)"));
}

#[test]
fn test_cli_reports_skipped_rows() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("skips.tsv");
    fs::write(
        &input,
        "qseqid\tsseqid\tpident\tnident\tevalue\tbitscore\tlength\tqlen\tslen\n\
         Q1\tS1\t99.0\t100\t0.0\t200\t100\t100\t100\n\
         Q2\tS1\t99.0\t100\t0.0\t200\t100\t0\t100\n",
    )
    .unwrap();

    Command::cargo_bin("blastfilt")
        .unwrap()
        .arg(&input)
        .arg("-o")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("1 skipped"))
        .stderr(contains("record 'Q2' at line 3"));
}

#[test]
fn test_cli_requires_input() {
    Command::cargo_bin("blastfilt").unwrap().assert().failure();
}
