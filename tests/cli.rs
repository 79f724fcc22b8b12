use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn expenses(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("expenses").unwrap();
    cmd.env("EXPENSE_TRACKER_DATA_DIR", dir.path())
        .env_remove("EXPENSE_TRACKER_USER")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn paycheck_set_and_show() {
    let dir = TempDir::new().unwrap();

    expenses(&dir)
        .args(["--user", "alice", "paycheck", "set", "5000.50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5000.50"));

    expenses(&dir)
        .args(["--user", "alice", "paycheck", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gross salary: $5000.50"));

    expenses(&dir)
        .args(["--user", "bob", "paycheck", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No paycheck recorded"));
}

#[test]
fn expense_add_then_list() {
    let dir = TempDir::new().unwrap();

    expenses(&dir)
        .args(["--user", "alice", "expense", "add", "12.5", "-c", "Groceries", "-d", "2024-03-09"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added expense"));

    expenses(&dir)
        .env("EXPENSE_TRACKER_USER", "alice")
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("$12.50"));

    expenses(&dir)
        .args(["--user", "alice", "expense", "range", "2024-03-09", "2024-03-09"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Groceries"));
}

#[test]
fn data_commands_require_user() {
    let dir = TempDir::new().unwrap();

    expenses(&dir)
        .args(["expense", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Authentication required"));
}

#[test]
fn export_csv() {
    let dir = TempDir::new().unwrap();

    expenses(&dir)
        .args(["--user", "alice", "expense", "add", "9.99", "-c", "Music", "-t", "recurring"])
        .assert()
        .success();

    expenses(&dir)
        .args(["--user", "alice", "export", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ID,Date,Category,Type,Amount,Description"))
        .stdout(predicate::str::contains("Music,recurring,9.99"));
}

#[test]
fn config_shows_paths() {
    let dir = TempDir::new().unwrap();

    expenses(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Expense limit:   500"));
}
