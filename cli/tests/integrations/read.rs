use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CAPTURED: &str = "clingo version 5.6.2
Reading from queens.lp
Solving...
Answer: 1
obj(a). obj(b). att(c).
Answer: 2
obj(a).
SATISFIABLE

Models       : 2
";

#[test]
fn test_cli_read_plain_text_from_stdin() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("read").write_stdin(CAPTURED);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Answer: 1\nobj(a). obj(b). att(c).\n"))
        .stdout(predicate::str::contains("Answer: 2\nobj(a).\n"))
        .stdout(predicate::str::contains("SATISFIABLE").not())
        .stdout(predicate::str::contains("Models").not());
}

#[test]
fn test_cli_read_grouped_table() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("output.txt");
    fs::write(&file, CAPTURED).unwrap();

    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("read").arg(&file).arg("-s").arg("by-predicate");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Predicate"))
        .stdout(predicate::str::contains("att"))
        .stdout(predicate::str::contains("(c)"));
}

#[test]
fn test_cli_read_json_lines() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("read")
        .arg("-s")
        .arg("by-predicate")
        .arg("--format")
        .arg("json")
        .write_stdin(CAPTURED);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""obj":[["a"],["b"]]"#))
        .stdout(predicate::str::contains(r#""index":2"#));
}

#[test]
fn test_cli_read_bare_lines() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("read")
        .arg("--lines")
        .arg("-s")
        .arg("no-arg")
        .write_stdin("p(1). q(2).\np(3).\n");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Answer: 1"))
        .stdout(predicate::str::contains("Answer: 2"));
}

#[test]
fn test_cli_read_unknown_stage() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("read").arg("-s").arg("by-color").write_stdin(CAPTURED);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown stage"));
}

#[test]
fn test_cli_read_conflicting_stages() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("read")
        .arg("-s")
        .arg("parse-args")
        .arg("-s")
        .arg("int-not-parsed")
        .write_stdin(CAPTURED);

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_cli_read_missing_file() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("read").arg("/nonexistent/output.txt");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("cannot open"));
}
