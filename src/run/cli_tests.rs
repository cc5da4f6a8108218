#![allow(clippy::unwrap_used)]

use super::*;

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// A config file pointing the search dir and ledger into `dir`.
fn write_config(dir: &Path) -> PathBuf {
    let exports = dir.join("exports");
    std::fs::create_dir_all(&exports).unwrap();
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            "search_dir = {:?}\ndatabase = {:?}\n",
            exports.display().to_string(),
            dir.join("ledger.db").display().to_string()
        ),
    )
    .unwrap();
    path
}

// ── Argument helpers ──────────────────────────────────────────

#[test]
fn test_flag_value() {
    let a = args(&["--rows", "5", "--dir", "/tmp/x"]);
    assert_eq!(flag_value(&a, "--rows"), Some("5"));
    assert_eq!(flag_value(&a, "--dir"), Some("/tmp/x"));
    assert_eq!(flag_value(&a, "--db"), None);
}

#[test]
fn test_flag_value_missing_argument() {
    assert_eq!(flag_value(&args(&["--rows"]), "--rows"), None);
}

#[test]
fn test_has_flag() {
    let a = args(&["debit", "--dry-run"]);
    assert!(has_flag(&a, "--dry-run"));
    assert!(!has_flag(&a, "--rows"));
}

#[test]
fn test_positional_skips_flag_values() {
    let a = args(&["--config", "c.toml", "credit", "--dry-run", "--rows", "3", "extra"]);
    assert_eq!(positional(&a), vec!["credit", "extra"]);
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn test_unknown_command_errors() {
    let err = as_cli(&args(&["ledgersync", "frobnicate"])).unwrap_err();
    assert!(err.to_string().contains("frobnicate"));
}

#[test]
fn test_help_and_version() {
    as_cli(&args(&["ledgersync", "help"])).unwrap();
    as_cli(&args(&["ledgersync", "--version"])).unwrap();
}

#[test]
fn test_show_requires_section() {
    assert!(as_cli(&args(&["ledgersync", "show", "savings"])).is_err());
}

#[test]
fn test_show_rejects_bad_row_count() {
    let err = as_cli(&args(&["ledgersync", "show", "debit", "--rows", "many"])).unwrap_err();
    assert!(err.to_string().contains("--rows"));
}

#[test]
fn test_normalize_requires_text() {
    assert!(as_cli(&args(&["ledgersync", "normalize"])).is_err());
}

#[test]
fn test_missing_explicit_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let missing = missing.to_str().unwrap();
    assert!(as_cli(&args(&["ledgersync", "sync", "--config", missing])).is_err());
}

#[test]
fn test_sync_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    std::fs::write(
        dir.path().join("exports").join("pscu.csv"),
        "Date,Description,Comments,Check Number,Amount,Balance\n\
         10/02/2019,SHELL OIL 57444,,,($30.00),\n\
         10/01/2019,PAYROLL DEPOSIT,,,$1500.00,\n",
    )
    .unwrap();
    let config = config.to_str().unwrap();

    as_cli(&args(&["ledgersync", "sync", "--config", config])).unwrap();
    as_cli(&args(&["ledgersync", "show", "debit", "--config", config])).unwrap();

    let ledger = SqliteLedger::open(&dir.path().join("ledger.db")).unwrap();
    assert_eq!(ledger.data_end(LedgerSection::Debit).unwrap(), Some(3));
    let rows = ledger.read_history(LedgerSection::Debit, 3).unwrap();
    assert_eq!(rows[0].merchant, "PAYROLL DEPOSIT");
    assert_eq!(rows[1].merchant, "SHELL OIL");
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    std::fs::write(
        dir.path().join("exports").join("pscu.csv"),
        "Date,Description,Comments,Check Number,Amount,Balance\n\
         10/02/2019,SHELL OIL 57444,,,($30.00),\n",
    )
    .unwrap();

    as_cli(&args(&[
        "ledgersync",
        "sync",
        "--dry-run",
        "--config",
        config.to_str().unwrap(),
    ]))
    .unwrap();

    let ledger = SqliteLedger::open(&dir.path().join("ledger.db")).unwrap();
    assert_eq!(ledger.data_end(LedgerSection::Debit).unwrap(), None);
}

#[test]
fn test_dir_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let other = dir.path().join("elsewhere");
    std::fs::create_dir_all(&other).unwrap();
    std::fs::write(
        other.join("pscu.csv"),
        "Date,Description,Comments,Check Number,Amount,Balance\n\
         10/02/2019,SHELL OIL 57444,,,($30.00),\n",
    )
    .unwrap();

    as_cli(&args(&[
        "ledgersync",
        "--config",
        config.to_str().unwrap(),
        "--dir",
        other.to_str().unwrap(),
    ]))
    .unwrap();

    let ledger = SqliteLedger::open(&dir.path().join("ledger.db")).unwrap();
    assert_eq!(ledger.data_end(LedgerSection::Debit).unwrap(), Some(2));
}

#[test]
fn test_clean_with_huge_day_count_keeps_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let export = dir.path().join("exports").join("pscu.csv");
    std::fs::write(&export, "Date,Description\n").unwrap();

    as_cli(&args(&[
        "ledgersync",
        "clean",
        "--days",
        &u64::MAX.to_string(),
        "--config",
        config.to_str().unwrap(),
    ]))
    .unwrap();

    assert!(export.exists());
}
