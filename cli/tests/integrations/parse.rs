use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_parse_lists_terms() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("parse").arg("obj(a). att(c,d). flag.");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("obj(a)"))
        .stdout(predicate::str::contains("att(c,d)"))
        .stdout(predicate::str::contains("flag"));
}

#[test]
fn test_cli_parse_careful_keeps_quoted_commas() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("parse").arg("--careful").arg(r#"msg("a,b")."#);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#"msg("a,b")"#));
}

#[test]
fn test_cli_parse_malformed_line() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("parse").arg("obj(a.");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Malformed term"));
}
