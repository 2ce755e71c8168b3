use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_solve_print_command() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("solve")
        .arg("queens.lp")
        .arg("-n")
        .arg("2")
        .arg("-c")
        .arg("n=8")
        .arg("--time-limit")
        .arg("5")
        .arg("--clingo")
        .arg("clingo")
        .arg("--print-command");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "clingo queens.lp -n 2 -c n=8 --time-limit=5",
        ));
}

#[test]
fn test_cli_solve_loads_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("b.lp"), "b.").unwrap();
    fs::write(temp_dir.path().join("a.lp"), "a.").unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not a program").unwrap();

    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("solve")
        .arg("--dir")
        .arg(temp_dir.path())
        .arg("--clingo")
        .arg("clingo")
        .arg("--print-command");

    let a = temp_dir.path().join("a.lp");
    let b = temp_dir.path().join("b.lp");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "{} {}",
            a.display(),
            b.display()
        )))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn test_cli_solve_rejects_bad_constant() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("solve").arg("-e").arg("a.").arg("-c").arg("novalue");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("NAME=VALUE"));
}

#[test]
fn test_cli_solve_without_program() {
    let mut cmd = Command::cargo_bin("aspire").unwrap();
    cmd.arg("solve").arg("--clingo").arg("clingo");

    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no program given"));
}

#[cfg(unix)]
mod with_fake_solver {
    use super::*;

    fn script(dir: &TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("solver.sh");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_cli_solve_grouped_models() {
        let temp_dir = TempDir::new().unwrap();
        let solver = script(
            &temp_dir,
            r#"
echo "clingo version 5.6.2"
echo "Solving..."
echo "Answer: 1"
echo "pick(a). obj(a). obj(b)."
echo "Answer: 2"
echo "pick(b). obj(a). obj(b)."
echo "SATISFIABLE"
exit 10
"#,
        );

        let mut cmd = Command::cargo_bin("aspire").unwrap();
        cmd.arg("solve")
            .arg(&solver)
            .arg("--clingo")
            .arg("/bin/sh")
            .arg("-s")
            .arg("by-predicate")
            .arg("-s")
            .arg("first-arg-only");

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Answer: 1"))
            .stdout(predicate::str::contains("Answer: 2"))
            .stdout(predicate::str::contains("pick"));
    }

    #[test]
    fn test_cli_solve_json_with_cost() {
        let temp_dir = TempDir::new().unwrap();
        let solver = script(
            &temp_dir,
            r#"
echo "Answer: 1"
echo "x(3)."
echo "Optimization: 3"
echo "OPTIMUM FOUND"
exit 30
"#,
        );

        let mut cmd = Command::cargo_bin("aspire").unwrap();
        cmd.arg("solve")
            .arg(&solver)
            .arg("--clingo")
            .arg("/bin/sh")
            .arg("-s")
            .arg("parse-args")
            .arg("--format")
            .arg("json");

        cmd.assert()
            .success()
            .stdout(predicate::str::contains(r#""cost":[3]"#))
            .stdout(predicate::str::contains(r#""index":1"#));
    }

    #[test]
    fn test_cli_solve_reports_solver_failure() {
        let temp_dir = TempDir::new().unwrap();
        let solver = script(
            &temp_dir,
            r#"
echo "*** ERROR: (clingo): parsing failed" >&2
exit 65
"#,
        );

        let mut cmd = Command::cargo_bin("aspire").unwrap();
        cmd.arg("solve").arg(&solver).arg("--clingo").arg("/bin/sh");

        cmd.assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Solver error"))
            .stderr(predicate::str::contains("exit code 65"))
            .stderr(predicate::str::contains("parsing failed"));
    }

    #[test]
    fn test_cli_solve_inline_program() {
        let temp_dir = TempDir::new().unwrap();
        let solver = script(
            &temp_dir,
            r#"
program=$(cat)
echo "Answer: 1"
echo "$program"
exit 10
"#,
        );

        let mut cmd = Command::cargo_bin("aspire").unwrap();
        cmd.arg("solve")
            .arg(&solver)
            .arg("-e")
            .arg("fact(1). fact(2).")
            .arg("--clingo")
            .arg("/bin/sh");

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Answer: 1\nfact(1). fact(2).\n"));
    }
}
