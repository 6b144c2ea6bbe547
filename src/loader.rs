use crate::error::IngestError;
use crate::extract::extract_rows_with_stats;
use crate::sectors::SectorOverrides;
use crate::types::{Project, Sector};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{NaiveDateTime, Utc};
use std::io::Cursor;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub sector_overrides: SectorOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub sheets: usize,
    pub rows_scanned: usize,
    pub candidate_rows: usize,
    pub skipped_by_rule: usize,
    pub rejected_names: usize,
    pub records: usize,
}

/// A sheet that could not be read. Its records are missing from the outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetFailure {
    pub sheet: String,
    pub sector: Sector,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub projects: Vec<Project>,
    pub failures: Vec<SheetFailure>,
    pub report: LoadReport,
}

impl IngestOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// All records when every sheet was read, otherwise nothing.
    pub fn into_projects_or_empty(self) -> Vec<Project> {
        if self.is_complete() {
            self.projects
        } else {
            Vec::new()
        }
    }
}

/// Decode a workbook and extract every sheet, in workbook order.
///
/// Only an undecodable workbook is an error; a sheet that fails to read is
/// recorded in `failures` and the remaining sheets are still processed.
pub fn ingest(bytes: &[u8], options: &IngestOptions, now: NaiveDateTime) -> Result<IngestOutcome, IngestError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let mut projects = Vec::new();
    let mut failures = Vec::new();
    let mut report = LoadReport::default();

    for (position, name) in workbook.sheet_names().into_iter().enumerate() {
        let sector = options.sector_overrides.classify(&name, position);
        report.sheets += 1;

        let range: Range<Data> = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                warn!(sheet = %name, %sector, error = %e, "failed to read sheet");
                failures.push(SheetFailure {
                    sheet: name,
                    sector,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let grid: Vec<Vec<Data>> = range.rows().map(<[Data]>::to_vec).collect();
        let (sheet_projects, stats) = extract_rows_with_stats(&grid, sector, now);
        debug!(
            sheet = %name,
            %sector,
            rows = stats.rows_scanned,
            records = sheet_projects.len(),
            "extracted sheet"
        );

        report.rows_scanned += stats.rows_scanned;
        report.candidate_rows += stats.candidate_rows;
        report.skipped_by_rule += stats.skipped_by_rule;
        report.rejected_names += stats.rejected_names;
        projects.extend(sheet_projects);
    }

    report.records = projects.len();
    info!(
        sheets = report.sheets,
        records = report.records,
        failed_sheets = failures.len(),
        "ingested workbook"
    );
    Ok(IngestOutcome {
        projects,
        failures,
        report,
    })
}

/// Every project in the workbook, or an empty set if anything failed.
///
/// Failures are logged, never returned: an empty result can mean either
/// "no data" or "could not read the workbook".
pub fn load_projects(bytes: &[u8], now: NaiveDateTime) -> Vec<Project> {
    load_projects_with(bytes, &IngestOptions::default(), now)
}

pub fn load_projects_with(bytes: &[u8], options: &IngestOptions, now: NaiveDateTime) -> Vec<Project> {
    match ingest(bytes, options, now) {
        Ok(outcome) => {
            for failure in &outcome.failures {
                error!(sheet = %failure.sheet, reason = %failure.reason, "discarding ingestion run");
            }
            outcome.into_projects_or_empty()
        }
        Err(e) => {
            error!(error = %e, "error parsing workbook");
            Vec::new()
        }
    }
}

/// [`load_projects`] evaluated against the current UTC time.
pub fn load_all_projects(bytes: &[u8]) -> Vec<Project> {
    load_projects(bytes, Utc::now().naive_utc())
}

pub fn read_workbook(path: &str) -> Result<Vec<u8>, IngestError> {
    std::fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_string(),
        source,
    })
}
