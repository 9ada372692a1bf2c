use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const CBA_NOV: &str = "\x0c\
02 Nov 2023 Rent to landlord $500.00 $1,500.00
05 Nov 2023 Coffee at the
corner cafe $4.00 $1,496.00
Any pending transactions are not shown
";

const NAB_NOV: &str = "\
Account Summary
01/11/23 02/11/23 V7202 NOT A ROW ON THE COVER 1.00
\x0c\
01/11/23 02/11/23 V7202 EFTPOS WOOLWORTHS 1234 SYDNEY 45.60
02/11/23 02/11/23 INTERNET TRANSFER 7202 TO SAVINGS 100.00
03/11/23 03/11/23 7202 SALARY ACME PTY LTD 2,000.00
";

fn ledgerscan(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ledgerscan").unwrap();
    cmd.current_dir(dir).arg("--quiet").arg("--config").arg(dir.join("absent.toml"));
    cmd
}

fn statements(dir: &Path) {
    fs::write(dir.join("CBANov2023.txt"), CBA_NOV).unwrap();
    fs::write(dir.join("NAB_November2023.txt"), NAB_NOV).unwrap();
}

#[test]
fn test_parse_prints_records() {
    let dir = tempfile::tempdir().unwrap();
    statements(dir.path());

    ledgerscan(dir.path())
        .args(["parse", "CBANov2023.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CBANov2023.txt: 2 transaction(s) [CommBank]"))
        .stdout(predicate::str::contains("Coffee at the corner cafe"));
}

#[test]
fn test_parse_json() {
    let dir = tempfile::tempdir().unwrap();
    statements(dir.path());

    let out = ledgerscan(dir.path())
        .args(["parse", "--json", "NAB_November2023.txt"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(doc["format"], "nab");
    assert_eq!(doc["records"].as_array().unwrap().len(), 2);
    assert_eq!(doc["records"][1]["amount"]["value"], "2,000.00");
}

#[test]
fn test_run_dry_run_groups_by_month() {
    let dir = tempfile::tempdir().unwrap();
    statements(dir.path());

    ledgerscan(dir.path())
        .args(["run", "--source-dir", ".", "--output-dir", "out", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Nov 2023: 4 transaction(s) from CBANov2023.txt, NAB_November2023.txt",
        ))
        .stdout(predicate::str::contains("Dry run"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_run_writes_year_workbook() {
    let dir = tempfile::tempdir().unwrap();
    statements(dir.path());

    for _ in 0..2 {
        ledgerscan(dir.path())
            .args(["run", "--source-dir", ".", "--output-dir", "out"])
            .assert()
            .success();
    }

    let sheet = fs::read_to_string(dir.path().join("out/2023/Nov.csv")).unwrap();
    let lines: Vec<_> = sheet.lines().collect();
    assert_eq!(lines[0], "Date processed,Date of transaction,Details,Amount");
    assert_eq!(lines.len(), 5);
    assert!(dir.path().join("out/2023/Nov1.csv").exists());
}

#[test]
fn test_unknown_bank_fails_but_others_are_written() {
    let dir = tempfile::tempdir().unwrap();
    statements(dir.path());
    fs::write(dir.path().join("westpac_Nov2023.txt"), "anything").unwrap();

    ledgerscan(dir.path())
        .args(["run", "--source-dir", ".", "--output-dir", "out"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("westpac_Nov2023.txt: failed"));

    assert!(dir.path().join("out/2023/Nov.csv").exists());
}

#[test]
fn test_init_config_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("ledgerscan.toml");

    let mut cmd = Command::cargo_bin("ledgerscan").unwrap();
    cmd.arg("--config").arg(&config).arg("init-config").assert().success();
    assert!(fs::read_to_string(&config).unwrap().contains("[period]"));

    let mut cmd = Command::cargo_bin("ledgerscan").unwrap();
    cmd.arg("--config").arg(&config).arg("init-config").assert().failure();
}

#[test]
fn test_version_names_package_and_build() {
    let dir = tempfile::tempdir().unwrap();

    ledgerscan(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("ledgerscan {} (", env!("CARGO_PKG_VERSION"))));
}
