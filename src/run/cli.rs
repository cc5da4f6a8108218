use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::format::{format_amount, format_serial_date, truncate};
use crate::balance::evaluate_balances;
use crate::config::Config;
use crate::import::{clean_stale_files, discover_input_files};
use crate::models::LedgerSection;
use crate::normalize::{Boundary, MerchantNormalizer};
use crate::pipeline::Pipeline;
use crate::store::{LedgerStore, SqliteLedger};

const DEFAULT_SHOW_ROWS: usize = 20;
const DEFAULT_CLEAN_DAYS: u64 = 5;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

pub(crate) fn as_cli(args: &[String]) -> Result<()> {
    let command = args.get(1).map(String::as_str).unwrap_or("sync");
    let rest = args.get(2..).unwrap_or_default();

    match command {
        "sync" => cli_sync(rest),
        "show" => cli_show(rest),
        "normalize" => cli_normalize(rest),
        "clean" => cli_clean(rest),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("ledgersync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        // Flags without a command mean `sync`.
        flag if flag.starts_with("--") => cli_sync(&args[1..]),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ledgersync - reconcile bank CSV exports into a debit/credit ledger");
    println!();
    println!("Usage: ledgersync [command] [options]");
    println!();
    println!("Commands:");
    println!("  sync                          Import new transactions from exports (default)");
    println!("    --dry-run                   Report what would be appended without writing");
    println!("  show <debit|credit>           Print the most recent ledger rows");
    println!("    --rows <n>                  Number of rows (default: {DEFAULT_SHOW_ROWS})");
    println!("  normalize <description>       Print the merchant key for a description");
    println!("  clean                         Delete old exports from the search directory");
    println!("    --days <n>                  Age threshold (default: config or {DEFAULT_CLEAN_DAYS})");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Options:");
    println!("  --config <path>               Config file (default: platform config dir)");
    println!("  --dir <path>                  Directory to search for exports");
    println!("  --db <path>                   Ledger database");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Positional arguments, skipping flags and their values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--dry-run" => {}
            a if a.starts_with("--") => {
                iter.next();
            }
            a => out.push(a),
        }
    }
    out
}

fn load_config(args: &[String]) -> Result<Config> {
    let mut config = Config::load(flag_value(args, "--config").map(Path::new))?;
    if let Some(dir) = flag_value(args, "--dir") {
        config.search_dir = Some(PathBuf::from(dir));
    }
    if let Some(db) = flag_value(args, "--db") {
        config.database = Some(PathBuf::from(db));
    }
    Ok(config)
}

fn open_ledger(config: &Config) -> Result<SqliteLedger> {
    let path = config.database_path()?;
    SqliteLedger::open(&path)
}

fn cli_sync(args: &[String]) -> Result<()> {
    let config = load_config(args)?;
    let search_dir = config.search_dir()?;
    let files = discover_input_files(&search_dir, &config.extension)?;
    if files.is_empty() {
        println!("No .{} files in {}", config.extension, search_dir.display());
    }

    let mut ledger = open_ledger(&config)?;
    let report = Pipeline::new(&mut ledger, &config)
        .dry_run(has_flag(args, "--dry-run"))
        .run(&files)?;

    println!(
        "Read {} export(s), skipped {}",
        report.files_read.len(),
        report.files_skipped.len()
    );
    for skipped in &report.files_skipped {
        println!("  skipped {}", skipped.display());
    }
    for &section in LedgerSection::all() {
        if let Some(section_report) = report.section(section) {
            println!("{section_report}");
        }
    }
    if report.appended_rows() > 0 {
        println!("{} row(s) appended", report.appended_rows());
    }

    if let Some(days) = config.cleanup_after_days {
        remove_stale(&search_dir, &config.extension, days)?;
    }
    Ok(())
}

fn cli_show(args: &[String]) -> Result<()> {
    let section = positional(args)
        .first()
        .and_then(|s| LedgerSection::parse(s))
        .ok_or_else(|| anyhow::anyhow!("Usage: ledgersync show <debit|credit> [--rows <n>]"))?;
    let rows_wanted = match flag_value(args, "--rows") {
        Some(n) => n.parse::<usize>().with_context(|| format!("Invalid --rows: {n}"))?,
        None => DEFAULT_SHOW_ROWS,
    };

    let config = load_config(args)?;
    let ledger = open_ledger(&config)?;
    let Some(end) = ledger.data_end(section)? else {
        println!("{section}: empty");
        return Ok(());
    };

    let history = ledger.read_history(section, end)?;
    let balances = evaluate_balances(&history);
    let skip = history.len().saturating_sub(rows_wanted);

    println!(
        "{:<6} {:<10} {:<28} {:>12} {:>12}  Category",
        "Row", "Date", "Merchant", "Amount", "Balance"
    );
    println!("{}", "─".repeat(86));
    for (row, balance) in history.iter().zip(&balances).skip(skip) {
        println!(
            "{:<6} {:<10} {:<28} {:>12} {:>12}  {}",
            row.row,
            format_serial_date(row.date_serial),
            truncate(&row.merchant, 28),
            format_amount(row.amount),
            balance.map(format_amount).unwrap_or_default(),
            row.category,
        );
    }
    Ok(())
}

fn cli_normalize(args: &[String]) -> Result<()> {
    let words = positional(args);
    if words.is_empty() {
        anyhow::bail!("Usage: ledgersync normalize <description>");
    }
    let config = load_config(args)?;
    let normalizer = MerchantNormalizer::new(&config.merchant_exceptions);
    let raw = words.join(" ");
    println!("{}", normalizer.normalize(&raw));

    let winner = normalizer.leftmost_boundary(&raw).map(|(b, _)| b);
    for boundary in Boundary::all() {
        if let Some(at) = boundary.find(&raw) {
            let mark = if Some(*boundary) == winner { "*" } else { " " };
            println!("  {mark} {boundary:?} at byte {at}");
        }
    }
    Ok(())
}

fn cli_clean(args: &[String]) -> Result<()> {
    let config = load_config(args)?;
    let days = match flag_value(args, "--days") {
        Some(n) => n.parse::<u64>().with_context(|| format!("Invalid --days: {n}"))?,
        None => config.cleanup_after_days.unwrap_or(DEFAULT_CLEAN_DAYS),
    };
    remove_stale(&config.search_dir()?, &config.extension, days)
}

fn remove_stale(dir: &Path, extension: &str, days: u64) -> Result<()> {
    let max_age = Duration::from_secs(days.saturating_mul(SECS_PER_DAY));
    let removed = clean_stale_files(dir, extension, max_age)?;
    println!(
        "Removed {} .{extension} file(s) older than {days} days from {}",
        removed.len(),
        dir.display()
    );
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
