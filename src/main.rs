// Console front end for the AMRUT 2.0 project monitoring sheet.
//
// - Option [1] loads the workbook from disk and prints what ingestion did.
// - Option [2] asks for a search term, sector and status, prints the summary
//   and a preview of the matching projects, and exports them to CSV and an
//   Excel workbook plus a JSON summary.
// - Option [3] exits.
use amrut_report::config::Config;
use amrut_report::loader::{self, IngestOptions};
use amrut_report::output;
use amrut_report::reports::{summarize, ProjectFilter};
use amrut_report::store::ProjectStore;
use amrut_report::types::{ProjectStatus, Sector};
use amrut_report::util::{format_int, format_number};
use chrono::Utc;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::path::Path;
use tracing::error;

// Loaded once, reported on many times.
static STORE: Lazy<ProjectStore> = Lazy::new(ProjectStore::new);

fn prompt(label: &str) -> String {
    print!("{}: ", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn read_choice() -> String {
    prompt("Enter choice")
}

/// Ask until the answer is blank (meaning "all") or parses.
fn prompt_optional<T: std::str::FromStr<Err = String>>(label: &str) -> Option<T> {
    loop {
        let answer = prompt(label);
        if answer.is_empty() || answer.eq_ignore_ascii_case("all") {
            return None;
        }
        match answer.parse::<T>() {
            Ok(v) => return Some(v),
            Err(e) => println!("{}. Leave blank for all.", e),
        }
    }
}

/// Handle option [1]: read and ingest the workbook.
fn handle_load(config: &Config) {
    let bytes = match loader::read_workbook(&config.workbook_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "could not read workbook");
            eprintln!("Failed to load file: {}\n", e);
            return;
        }
    };

    let options = IngestOptions {
        sector_overrides: config.sector_overrides.clone(),
    };
    let now = Utc::now().naive_utc();
    match loader::ingest(&bytes, &options, now) {
        Ok(outcome) => {
            let report = outcome.report.clone();
            println!(
                "Processing workbook... ({} sheets, {} rows scanned, {} projects loaded)",
                format_int(report.sheets),
                format_int(report.rows_scanned),
                format_int(report.records)
            );
            println!(
                "Note: {} template rows skipped, {} numbered rows without a project name.",
                format_int(report.skipped_by_rule),
                format_int(report.rejected_names)
            );
            for failure in &outcome.failures {
                println!("Warning: sheet '{}' ({}) could not be read: {}", failure.sheet, failure.sector, failure.reason);
            }
            println!();
            STORE.replace(outcome.into_projects_or_empty());
        }
        Err(e) => {
            error!(error = %e, "error parsing workbook");
            println!("No data: the workbook could not be read.\n");
            STORE.replace(Vec::new());
        }
    }
}

/// Handle option [2]: filter, summarize, preview and export.
fn handle_generate_reports(config: &Config) {
    let data = STORE.snapshot();
    if data.is_empty() {
        println!("No data loaded. Please load the workbook first (option 1).\n");
        return;
    }

    let filter = ProjectFilter {
        search: prompt("Search by Sl.No, project name or ULB (blank for all)"),
        sector: prompt_optional::<Sector>("Sector (blank for all)"),
        status: prompt_optional::<ProjectStatus>("Status (blank for all)"),
    };
    let matching = filter.apply(&data);
    let stats = summarize(matching.iter().copied());

    println!("\n{} ({} units found)\n", filter.scope_label(), format_int(stats.total_projects));
    println!("Approved Cost: {} L", format_number(stats.total_approved_cost, 1));
    println!("Received:      {} L", format_number(stats.total_received, 1));
    println!("Expenditure:   {} L", format_number(stats.total_spent, 1));
    for (status, count) in &stats.status_counts {
        println!("{:<12} {}", status.label(), format_int(*count));
    }
    for (sector, totals) in &stats.sector_stats {
        println!(
            "{}: allocated {} L, spent {} L",
            sector,
            format_number(totals.allocated, 2),
            format_number(totals.spent, 2)
        );
    }
    println!();

    let rows = output::export_rows(matching.iter().copied());
    output::preview_table_rows(&rows, 5);

    let csv_path = Path::new(&config.output_dir).join(output::export_file_name(filter.scope_label(), "csv"));
    match output::write_csv(&csv_path, &rows) {
        Ok(()) => println!("(Full table exported to {})", csv_path.display()),
        Err(e) => eprintln!("Write error: {}", e),
    }
    let xlsx_path = Path::new(&config.output_dir).join(output::export_file_name(filter.scope_label(), "xlsx"));
    match output::write_xlsx(&xlsx_path, &rows) {
        Ok(()) => println!("(Workbook exported to {})", xlsx_path.display()),
        Err(e) => eprintln!("Write error: {}", e),
    }
    let summary_path = Path::new(&config.output_dir).join("summary.json");
    match output::write_json(&summary_path, &stats) {
        Ok(()) => println!("(Summary exported to {})\n", summary_path.display()),
        Err(e) => eprintln!("Write error: {}", e),
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let config = Config::from_env();

    loop {
        println!("AMRUT 2.0 Project Monitoring");
        println!("[1] Load the workbook ({})", config.workbook_path);
        println!("[2] Generate Reports");
        println!("[3] Exit\n");
        match read_choice().as_str() {
            "1" => handle_load(&config),
            "2" => {
                println!();
                handle_generate_reports(&config);
            }
            "3" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}
