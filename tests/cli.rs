//! End-to-end runs of the `school` binary against a throwaway data directory

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn school(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("school").unwrap();
    cmd.env("SCHOOL_LEDGER_DATA_DIR", dir.path());
    cmd
}

#[test]
fn test_init_writes_settings() {
    let dir = TempDir::new().unwrap();

    school(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("school.db").exists());

    school(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Default admission months: 1"));
}

#[test]
fn test_admission_and_payment_flow() {
    let dir = TempDir::new().unwrap();
    school(&dir).arg("init").assert().success();

    school(&dir)
        .args(["class", "create", "Grade 1", "-a", "500", "-m", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created class: cls-1"));

    school(&dir)
        .args(["student", "create", "Asha", "--guardian", "Meera"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created student: stu-1"));

    school(&dir)
        .args(["admission", "create", "Asha", "Grade 1", "-n", "2", "-d", "2025-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Admitted Asha into Grade 1"));

    school(&dir)
        .args(["payment", "add", "Asha", "650", "-d", "2025-01-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded payment: pay-1"));

    school(&dir)
        .args(["student", "balance", "Asha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$650.00"))
        .stdout(predicate::str::contains("$150.00"))
        .stdout(predicate::str::contains("$50.00"));

    school(&dir)
        .args(["fee", "list", "--student", "Asha"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-02"))
        .stdout(predicate::str::contains("Charged $200.00, paid $150.00, due $50.00"));

    school(&dir)
        .args(["history", "--limit", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stu-1"));
}

#[test]
fn test_unknown_student_fails() {
    let dir = TempDir::new().unwrap();

    school(&dir)
        .args(["student", "show", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Student not found: Nobody"));
}

#[test]
fn test_invalid_amount_fails() {
    let dir = TempDir::new().unwrap();

    school(&dir)
        .args(["class", "create", "Grade 2", "-m", "ten"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));
}

#[test]
fn test_ipc_answers_each_request() {
    let dir = TempDir::new().unwrap();
    let requests = concat!(
        r#"{"channel": "class:create", "args": [{"name": "Grade 3", "monthly_fee": 8000}]}"#,
        "\n",
        r#"{"channel": "class:fetch", "args": [99]}"#,
        "\n",
    );

    school(&dir)
        .arg("ipc")
        .write_stdin(requests)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""message":"Class created successfully""#))
        .stdout(predicate::str::contains(r#""message":"Class not found""#));
}
