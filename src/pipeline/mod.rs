use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::balance::balance_formulas;
use crate::categorize::assign_categories;
use crate::config::Config;
use crate::error::{StoreError, SyncError};
use crate::import::CsvImporter;
use crate::models::{Column, LedgerSection, RowRange, Transaction};
use crate::normalize::MerchantNormalizer;
use crate::reconcile::reconcile;
use crate::store::LedgerStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SectionOutcome {
    NoNewTransactions,
    Appended(RowRange),
    /// Dry run: this many rows would be appended.
    Pending(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SectionReport {
    pub(crate) section: LedgerSection,
    pub(crate) outcome: SectionOutcome,
    /// Appended rows that received a historical category.
    pub(crate) categorized: usize,
}

impl std::fmt::Display for SectionReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.outcome {
            SectionOutcome::NoNewTransactions => write!(f, "{}: no new transactions", self.section),
            SectionOutcome::Appended(range) => write!(
                f,
                "{}: appended {} ({} new, {} categorized)",
                self.section,
                range.a1(self.section),
                range.len(),
                self.categorized
            ),
            SectionOutcome::Pending(n) => write!(f, "{}: {n} new transactions (dry run)", self.section),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RunReport {
    pub(crate) files_read: Vec<PathBuf>,
    pub(crate) files_skipped: Vec<PathBuf>,
    pub(crate) sections: Vec<SectionReport>,
}

impl RunReport {
    pub(crate) fn section(&self, section: LedgerSection) -> Option<&SectionReport> {
        self.sections.iter().find(|r| r.section == section)
    }

    pub(crate) fn appended_rows(&self) -> usize {
        self.sections
            .iter()
            .map(|r| match r.outcome {
                SectionOutcome::Appended(range) => range.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Transactions gathered from all input files, one list per section.
#[derive(Debug, Clone, Default)]
pub(crate) struct SectionBatches {
    debit: Vec<Transaction>,
    credit: Vec<Transaction>,
}

impl SectionBatches {
    fn list_mut(&mut self, section: LedgerSection) -> &mut Vec<Transaction> {
        match section {
            LedgerSection::Debit => &mut self.debit,
            LedgerSection::Credit => &mut self.credit,
        }
    }

    pub(crate) fn take(&mut self, section: LedgerSection) -> Vec<Transaction> {
        std::mem::take(self.list_mut(section))
    }
}

/// One ingest run against an injected ledger store.
pub(crate) struct Pipeline<'a, S: LedgerStore> {
    store: &'a mut S,
    normalizer: MerchantNormalizer,
    tail_rows: u32,
    skip_malformed: bool,
    dry_run: bool,
}

impl<'a, S: LedgerStore> Pipeline<'a, S> {
    pub(crate) fn new(store: &'a mut S, config: &Config) -> Self {
        Self {
            store,
            normalizer: MerchantNormalizer::new(&config.merchant_exceptions),
            tail_rows: config.tail_rows,
            skip_malformed: config.skip_malformed,
            dry_run: false,
        }
    }

    /// Reconcile and report without writing to the store.
    pub(crate) fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub(crate) fn run(&mut self, files: &[PathBuf]) -> Result<RunReport, SyncError> {
        let mut report = RunReport::default();
        let mut batches = self.collect(files, &mut report)?;

        for &section in LedgerSection::all() {
            let incoming = batches.take(section);
            let section_report = self
                .sync_section(section, incoming)
                .map_err(|source| SyncError::Store { section, source })?;
            info!("{section_report}");
            report.sections.push(section_report);
        }
        Ok(report)
    }

    /// Parse every file, merge per section, sort by date and normalize merchants.
    pub(crate) fn collect(
        &self,
        files: &[PathBuf],
        report: &mut RunReport,
    ) -> Result<SectionBatches, SyncError> {
        let mut batches = SectionBatches::default();

        for file in files {
            match CsvImporter::parse_file(file) {
                Ok(Some(batch)) => {
                    info!(
                        file = %file.display(),
                        source = %batch.source,
                        section = %batch.section,
                        count = batch.transactions.len(),
                        "parsed export"
                    );
                    batches.list_mut(batch.section).extend(batch.transactions);
                    report.files_read.push(file.clone());
                }
                Ok(None) => report.files_skipped.push(file.clone()),
                Err(e) if self.skip_malformed => {
                    warn!(file = %e.file().display(), "{e}; skipping file");
                    report.files_skipped.push(file.clone());
                }
                Err(e) => {
                    error!("{e}");
                    return Err(e.into());
                }
            }
        }

        for &section in LedgerSection::all() {
            let list = batches.list_mut(section);
            // Stable: same-day rows keep file order.
            list.sort_by_key(|t| t.date);
            for txn in list.iter_mut() {
                txn.merchant = self.normalizer.normalize(&txn.merchant);
            }
        }
        Ok(batches)
    }

    /// Reconcile one section's batch against its ledger tail and record what is new.
    pub(crate) fn sync_section(
        &mut self,
        section: LedgerSection,
        incoming: Vec<Transaction>,
    ) -> Result<SectionReport, StoreError> {
        let tail = self.store.read_tail(section, self.tail_rows)?;
        let fresh = reconcile(incoming, &tail);

        let no_news = SectionReport {
            section,
            outcome: SectionOutcome::NoNewTransactions,
            categorized: 0,
        };
        if fresh.is_empty() {
            return Ok(no_news);
        }
        if self.dry_run {
            return Ok(SectionReport {
                outcome: SectionOutcome::Pending(fresh.len()),
                ..no_news
            });
        }

        let range = self.store.append_rows(section, &fresh)?;
        self.store
            .patch_column(section, range, Column::Balance, &balance_formulas(range))?;
        let categorized = self.propagate_categories(section, range)?;

        Ok(SectionReport {
            section,
            outcome: SectionOutcome::Appended(range),
            categorized,
        })
    }

    fn propagate_categories(&mut self, section: LedgerSection, range: RowRange) -> Result<usize, StoreError> {
        let history = self.store.read_history(section, range.end)?;
        let appended: Vec<_> = history
            .iter()
            .filter(|r| range.contains(r.row))
            .cloned()
            .collect();
        let assignments = assign_categories(&appended, &history, &self.normalizer);

        let values: Vec<String> = assignments.into_iter().map(|a| a.category).collect();
        let categorized = values.iter().filter(|c| !c.is_empty()).count();
        self.store
            .patch_column(section, range, Column::Category, &values)?;
        Ok(categorized)
    }
}
