//! End-to-end tests for the `divyield` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SPX_EXPORT: &str = "\
secid,date,cusip,ticker,sic,index_flag,exchange_d,class,issue_type,industry_group,expiration,rate
108105,2020-03-02,64881510,SPX,,1,32768,,A,,2020-03-21,0.0192
108105,2020-03-02,64881510,SPX,,1,32768,,A,,2020-04-17,0.0191
108105,2020-03-02,64881510,SPX,,1,32768,,A,,2020-06-19,0.0190
108105,2020-03-02,64881510,SPX,,1,32768,,A,,2020-09-18,0.0188
108105,2020-03-03,64881510,SPX,,1,32768,,A,,,
108105,2020-03-03,64881510,SPX,,1,32768,,A,,2020-03-20,0.0193
";

fn divyield(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("divyield").unwrap();
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("DIVYIELD_CONFIG")
        .env_remove("DIVYIELD_DATA_DIR")
        .env_remove("DIVYIELD_START_DATE")
        .env_remove("DIVYIELD_END_DATE")
        .env_remove("DIVYIELD_INDICES")
        .env_remove("DIVYIELD_MARKET");
    cmd
}

// ============================================================================
// expirations / calendar
// ============================================================================

#[test]
fn expirations_2020_json() {
    let dir = TempDir::new().unwrap();
    divyield(dir.path())
        .args(["--format", "json", "expirations", "--start", "2020-01-01", "--end", "2020-12-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"2020-03-20\""))
        .stdout(predicate::str::contains("\"2020-06-19\""))
        .stdout(predicate::str::contains("\"2020-09-18\""))
        .stdout(predicate::str::contains("\"2020-12-18\""));
}

#[test]
fn expirations_good_friday_shift() {
    let dir = TempDir::new().unwrap();
    divyield(dir.path())
        .args(["--format", "csv", "expirations", "-s", "2008-03-01", "-e", "2008-03-31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2008-03,2008-03-21,2008-03-20,Thu,1"));
}

#[test]
fn expirations_empty_range_fails() {
    let dir = TempDir::new().unwrap();
    divyield(dir.path())
        .args(["expirations", "--start", "2020-04-01", "--end", "2020-05-31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Empty range"));
}

#[test]
fn expirations_need_a_range() {
    let dir = TempDir::new().unwrap();
    divyield(dir.path())
        .args(["expirations", "--end", "2020-12-31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required argument: --start"));
}

#[test]
fn expirations_reject_bad_rule() {
    let dir = TempDir::new().unwrap();
    divyield(dir.path())
        .args(["expirations", "-s", "2020-01-01", "-e", "2020-12-31", "--rule", "WOM-9FRI"])
        .assert()
        .failure();
}

#[test]
fn calendar_lists_good_friday() {
    let dir = TempDir::new().unwrap();
    divyield(dir.path())
        .args(["--format", "csv", "calendar", "-s", "2008-03-17", "-e", "2008-03-23", "--holidays"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2008-03-21,Fri"))
        .stdout(predicate::str::contains("2008-03-20").not());
}

// ============================================================================
// reconcile
// ============================================================================

#[test]
fn reconcile_writes_front_maturities() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("SPX.csv");
    let output = dir.path().join("SPX_front.csv");
    fs::write(&input, SPX_EXPORT).unwrap();

    divyield(dir.path())
        .args(["--quiet", "reconcile", "--start", "2020-01-01", "--end", "2020-12-31"])
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 4, "{written}");
    assert!(lines[1].contains("2020-03-02") && lines[1].contains("2020-03-20"));
    assert!(lines[2].contains("2020-03-02") && lines[2].contains("2020-06-19"));
    assert!(lines[3].contains("2020-03-03") && lines[3].contains("2020-03-20"));
}

#[test]
fn reconcile_derives_range_from_rows() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("SPX.csv");
    fs::write(&input, SPX_EXPORT).unwrap();

    // The range runs from the first row to the last expiration (2020-09-18).
    divyield(dir.path())
        .args(["--format", "json", "reconcile"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"expiration\": \"2020-03-20\""))
        .stdout(predicate::str::contains("\"expiration\": \"2020-06-19\""))
        .stdout(predicate::str::contains("2020-04-17").not())
        .stdout(predicate::str::contains("2020-09-18").not());
}

#[test]
fn reconcile_rejects_zero_maturities_in_config() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("SPX.csv");
    let output = dir.path().join("SPX_front.csv");
    let config = dir.path().join("cfg.toml");
    fs::write(&input, SPX_EXPORT).unwrap();
    fs::write(&config, "maturities_per_date = 0\n").unwrap();

    divyield(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["reconcile", "--start", "2020-01-01", "--end", "2020-12-31"])
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("maturities_per_date"));
    assert!(!output.exists());
}

#[test]
fn reconcile_rejects_zero_maturities_flag() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("SPX.csv");
    fs::write(&input, SPX_EXPORT).unwrap();

    divyield(dir.path())
        .args(["--format", "csv", "reconcile", "--maturities", "0"])
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());

    divyield(dir.path())
        .args(["--format", "csv", "reconcile", "--maturities", "1"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("2020-06-19").not());
}

// ============================================================================
// pull / load
// ============================================================================

#[test]
fn pull_then_load() {
    let dir = TempDir::new().unwrap();
    let exports = dir.path().join("exports");
    fs::create_dir(&exports).unwrap();
    fs::write(exports.join("SPX.csv"), SPX_EXPORT).unwrap();
    fs::write(
        dir.path().join("divyield.toml"),
        "data_dir = \"data\"\nstart_date = \"2020-01-01\"\nend_date = \"2020-12-31\"\nsource_dir = \"exports\"\n",
    )
    .unwrap();

    divyield(dir.path())
        .args(["--format", "csv", "pull", "--index", "spx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SPX,6,3,2,1,3"));

    assert!(dir.path().join("data/SPX_implied_div_yield.csv").is_file());
    assert!(dir.path().join("data/SPX_implied_div_yield_front.csv").is_file());

    divyield(dir.path())
        .args(["--format", "json", "load", "--index", "SPX", "--reconciled"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ticker\": \"SPX\""))
        .stdout(predicate::str::contains("2020-04-17").not());
}

#[test]
fn pull_missing_export_fails() {
    let dir = TempDir::new().unwrap();
    let exports = dir.path().join("exports");
    fs::create_dir(&exports).unwrap();

    divyield(dir.path())
        .args(["pull", "--index", "DJX", "-s", "2020-01-01", "-e", "2020-12-31"])
        .arg("--source-dir")
        .arg(&exports)
        .arg("--data-dir")
        .arg(dir.path().join("data"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("DJX"));
}

#[test]
fn load_missing_dataset_fails() {
    let dir = TempDir::new().unwrap();
    divyield(dir.path())
        .args(["load", "--index", "NDX", "--data-dir", "data"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn config_hides_password() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(
        &config,
        "[credentials]\nusername = \"analyst\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    divyield(dir.path())
        .arg("--config")
        .arg(&config)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyst"))
        .stdout(predicate::str::contains("hunter2").not());
}
