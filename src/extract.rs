use crate::sectors::leading_rows_to_skip;
use crate::status::infer_status;
use crate::types::{Project, Sector};
use crate::util::{cell_text, is_blank, normalize_number, text_or};
use calamine::Data;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

// Data rows start with a bare serial number; headers, titles and footnotes don't.
static SERIAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid serial regex"));

/// Header text that sometimes repeats under a numbered row.
const HEADER_ECHO: &str = "Name of Project";

// Column positions in every sector template.
const COL_SERIAL: usize = 0;
const COL_NAME: usize = 1;
const COL_ULB: usize = 2;
const COL_APPROVED: usize = 3;
const COL_RECEIVED: usize = 4;
const COL_COMMENCED: usize = 5;
const COL_TARGET: usize = 6;
const COL_PHYSICAL: usize = 7;
const COL_FINANCIAL: usize = 8;
const COL_REMARKS: usize = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub rows_scanned: usize,
    pub candidate_rows: usize,
    pub skipped_by_rule: usize,
    pub rejected_names: usize,
}

/// Records for one sheet, in row order.
pub fn extract_rows(grid: &[Vec<Data>], sector: Sector, now: NaiveDateTime) -> Vec<Project> {
    extract_rows_with_stats(grid, sector, now).0
}

pub fn extract_rows_with_stats(
    grid: &[Vec<Data>],
    sector: Sector,
    now: NaiveDateTime,
) -> (Vec<Project>, ExtractStats) {
    let mut stats = ExtractStats::default();
    let mut projects = Vec::new();
    let to_skip = leading_rows_to_skip(sector);

    for row in grid {
        stats.rows_scanned += 1;
        let Some(serial) = serial_number(row) else {
            continue;
        };
        stats.candidate_rows += 1;

        if stats.skipped_by_rule < to_skip {
            stats.skipped_by_rule += 1;
            continue;
        }

        match build_project(serial, row, sector, now) {
            Some(project) => projects.push(project),
            None => stats.rejected_names += 1,
        }
    }
    (projects, stats)
}

fn serial_number(row: &[Data]) -> Option<String> {
    let cell = row.get(COL_SERIAL)?;
    if is_blank(cell) {
        return None;
    }
    let text = cell_text(cell);
    let trimmed = text.trim();
    SERIAL_RE.is_match(trimmed).then(|| trimmed.to_string())
}

fn build_project(serial_number: String, row: &[Data], sector: Sector, now: NaiveDateTime) -> Option<Project> {
    let name = text_or(row.get(COL_NAME), "").trim().to_string();
    if name.is_empty() || name == HEADER_ECHO {
        return None;
    }

    let number = |col: usize| row.get(col).map(normalize_number).unwrap_or(0.0);
    let physical_progress = number(COL_PHYSICAL);
    let target_completion_date = text_or(row.get(COL_TARGET), "NA");
    let status = infer_status(physical_progress, &target_completion_date, now);

    Some(Project {
        serial_number,
        name,
        urban_local_body: text_or(row.get(COL_ULB), "").trim().to_string(),
        approved_cost: number(COL_APPROVED),
        received_amount: number(COL_RECEIVED),
        commencement_date: text_or(row.get(COL_COMMENCED), "NA"),
        target_completion_date,
        physical_progress,
        financial_progress: number(COL_FINANCIAL),
        remarks: text_or(row.get(COL_REMARKS), "").trim().to_string(),
        sector,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectStatus;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    fn project_row(serial: &str, name: &str, progress: f64, target: &str) -> Vec<Data> {
        vec![
            s(serial),
            s(name),
            s("ULB-A"),
            Data::Float(100.0),
            Data::Float(50.0),
            s("01-01-2024"),
            s(target),
            Data::Float(progress),
            Data::Float(20.0),
            Data::Empty,
        ]
    }

    #[test]
    fn water_supply_drops_first_numbered_row() {
        let grid = vec![
            vec![s("1"), s("HeaderRow")],
            project_row("2", "Real Project", 30.0, "01-01-2025"),
        ];
        let projects = extract_rows(&grid, Sector::WaterSupply, now());
        assert_eq!(projects.len(), 1);
        let p = &projects[0];
        assert_eq!(p.serial_number, "2");
        assert_eq!(p.name, "Real Project");
        assert_eq!(p.urban_local_body, "ULB-A");
        assert_eq!(p.approved_cost, 100.0);
        assert_eq!(p.received_amount, 50.0);
        assert_eq!(p.commencement_date, "01-01-2024");
        assert_eq!(p.target_completion_date, "01-01-2025");
        assert_eq!(p.physical_progress, 30.0);
        assert_eq!(p.financial_progress, 20.0);
        assert_eq!(p.remarks, "");
        assert_eq!(p.sector, Sector::WaterSupply);
        assert_eq!(p.status, ProjectStatus::Ongoing);
    }

    #[test]
    fn other_sectors_keep_first_numbered_row() {
        let grid = vec![
            project_row("1", "STP Phase 1", 0.0, "NA"),
            project_row("2", "STP Phase 2", 100.0, "NA"),
        ];
        let projects = extract_rows(&grid, Sector::SewerageSeptage, now());
        let serials: Vec<&str> = projects.iter().map(|p| p.serial_number.as_str()).collect();
        assert_eq!(serials, ["1", "2"]);
        assert_eq!(projects[1].status, ProjectStatus::Completed);
    }

    #[test]
    fn non_serial_rows_are_ignored() {
        let grid = vec![
            vec![s("Sl. No."), s("Name of Project")],
            vec![],
            vec![Data::Empty, s("Sub total")],
            vec![s("1a"), s("Annexure")],
            vec![Data::Float(0.0), s("Zero serial")],
            vec![s(" 3 "), s("Padded serial")],
            vec![Data::Float(4.0), s("Numeric serial")],
            vec![Data::Float(4.5), s("Fractional serial")],
            vec![s("* figures in lakhs")],
        ];
        let (projects, stats) = extract_rows_with_stats(&grid, Sector::GreenSpacesParks, now());
        let serials: Vec<&str> = projects.iter().map(|p| p.serial_number.as_str()).collect();
        assert_eq!(serials, ["3", "4"]);
        assert_eq!(stats.rows_scanned, 9);
        assert_eq!(stats.candidate_rows, 2);
    }

    #[test]
    fn empty_and_header_echo_names_are_rejected() {
        let grid = vec![
            vec![s("1"), s("Name of Project")],
            vec![s("2"), s("   ")],
            vec![s("3"), Data::Empty],
            vec![s("4"), s("Park at Ward 7")],
        ];
        let (projects, stats) = extract_rows_with_stats(&grid, Sector::GreenSpacesParks, now());
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].serial_number, "4");
        assert_eq!(stats.rejected_names, 3);
    }

    #[test]
    fn skip_rule_consumes_the_first_candidate_even_if_it_is_a_real_name() {
        let grid = vec![
            vec![s("Header")],
            project_row("1", "Looks Real", 10.0, "NA"),
            project_row("2", "Second", 10.0, "NA"),
            project_row("3", "Third", 10.0, "NA"),
        ];
        let (projects, stats) = extract_rows_with_stats(&grid, Sector::WaterSupply, now());
        assert_eq!(stats.skipped_by_rule, 1);
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].serial_number, "2");
    }

    #[test]
    fn short_rows_fill_defaults() {
        let grid = vec![vec![s("7"), s("  Lake Revival  "), s(" ULB-B ")]];
        let projects = extract_rows(&grid, Sector::WaterbodyRejuvenation, now());
        let p = &projects[0];
        assert_eq!(p.name, "Lake Revival");
        assert_eq!(p.urban_local_body, "ULB-B");
        assert_eq!(p.approved_cost, 0.0);
        assert_eq!(p.commencement_date, "NA");
        assert_eq!(p.target_completion_date, "NA");
        assert_eq!(p.status, ProjectStatus::NotStarted);
    }

    #[test]
    fn cost_text_and_overdue_targets() {
        let grid = vec![vec![
            s("1"),
            s("Pipeline"),
            s("ULB-C"),
            s("₹1,234.50 Cr"),
            s("Rs 600"),
            s("Not started"),
            s("31/03/2025"),
            s("0 %"),
            Data::Empty,
            s(" awaiting tender "),
        ]];
        let projects = extract_rows(&grid, Sector::SewerageSeptage, now());
        let p = &projects[0];
        assert_eq!(p.approved_cost, 1234.5);
        assert_eq!(p.received_amount, 600.0);
        assert_eq!(p.commencement_date, "Not started");
        assert_eq!(p.remarks, "awaiting tender");
        assert_eq!(p.status, ProjectStatus::Delay);
    }

    #[test]
    fn progress_above_hundred_is_kept_raw() {
        let grid = vec![project_row("1", "Overshoot", 112.0, "NA")];
        let projects = extract_rows(&grid, Sector::SewerageSeptage, now());
        assert_eq!(projects[0].physical_progress, 112.0);
        assert_eq!(projects[0].status, ProjectStatus::Completed);
    }

    #[test]
    fn extraction_is_repeatable_for_a_fixed_now() {
        let grid = vec![
            vec![s("1"), s("Skipped")],
            project_row("2", "A", 0.0, "01-01-2000"),
            project_row("3", "B", 0.0, "01-01-2999"),
        ];
        let first = extract_rows(&grid, Sector::WaterSupply, now());
        let second = extract_rows(&grid, Sector::WaterSupply, now());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first[0].status, ProjectStatus::Delay);
        assert_eq!(first[1].status, ProjectStatus::NotStarted);
    }
}
