use crate::error::ExportError;
use crate::types::{ExportRow, Project};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

/// `AMRUT2.0_<scope>_Export.<ext>`
pub fn export_file_name(scope: &str, ext: &str) -> String {
    format!("AMRUT2.0_{}_Export.{}", scope, ext)
}

pub fn export_rows<'a, I>(projects: I) -> Vec<ExportRow>
where
    I: IntoIterator<Item = &'a Project>,
{
    projects.into_iter().map(ExportRow::from).collect()
}

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Workbook export: one "Projects" sheet, header row then one row per project.
pub fn write_xlsx(path: impl AsRef<Path>, rows: &[ExportRow]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Projects")?;

    for (col, header) in ExportRow::headers().iter().enumerate() {
        sheet.write_string(0, col as u16, header.as_ref())?;
    }
    for (idx, r) in rows.iter().enumerate() {
        let row = idx as u32 + 1;
        sheet.write_string(row, 0, &r.serial_number)?;
        sheet.write_string(row, 1, &r.name)?;
        sheet.write_string(row, 2, &r.urban_local_body)?;
        sheet.write_number(row, 3, r.approved_cost)?;
        sheet.write_number(row, 4, r.received_amount)?;
        sheet.write_string(row, 5, &r.commencement_date)?;
        sheet.write_string(row, 6, &r.target_completion_date)?;
        sheet.write_number(row, 7, r.physical_progress)?;
        sheet.write_number(row, 8, r.financial_progress)?;
        sheet.write_string(row, 9, r.status.label())?;
        sheet.write_string(row, 10, &r.remarks)?;
    }

    workbook.save(path)?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), ExportError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table<T>(rows: &[T], max_rows: usize) -> Option<String>
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return None;
    }
    Some(Table::new(slice).with(Style::markdown()).to_string())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    match render_table(rows, max_rows) {
        Some(table) => println!("{}\n", table),
        None => println!("(no rows)\n"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::summarize;
    use crate::types::{ProjectStatus, Sector};

    fn project() -> Project {
        Project {
            serial_number: "4".to_string(),
            name: "Rain Garden".to_string(),
            urban_local_body: "Kolasib".to_string(),
            approved_cost: 75.5,
            received_amount: 30.0,
            commencement_date: "01-06-2024".to_string(),
            target_completion_date: "NA".to_string(),
            physical_progress: 12.0,
            financial_progress: 9.25,
            remarks: "retendered".to_string(),
            sector: Sector::GreenSpacesParks,
            status: ProjectStatus::Ongoing,
        }
    }

    #[test]
    fn file_names_carry_scope() {
        assert_eq!(export_file_name("Water Supply", "csv"), "AMRUT2.0_Water Supply_Export.csv");
    }

    #[test]
    fn csv_uses_export_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let data = vec![project()];
        write_csv(&path, &export_rows(&data)).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Sl.No,Project Name,ULB,Approved Cost (Lakhs),Received Amount (Lakhs),Start Date,\
             Target Completion,Physical Progress (%),Financial Progress (Lakhs),Status,Remarks"
        );
        assert_eq!(
            lines.next().unwrap(),
            "4,Rain Garden,Kolasib,75.5,30.0,01-06-2024,NA,12.0,9.25,Ongoing,retendered"
        );
    }

    #[test]
    fn xlsx_export_reads_back_as_projects_sheet() {
        use calamine::{open_workbook_auto, Data, Reader};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export_file_name("Green Spaces & Parks", "xlsx"));
        write_xlsx(&path, &export_rows(&[project()])).unwrap();

        let mut workbook = open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), ["Projects"]);
        let range = workbook.worksheet_range("Projects").unwrap();
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], Data::String("Sl.No".to_string()));
        assert_eq!(rows[0][10], Data::String("Remarks".to_string()));
        assert_eq!(rows[1][1], Data::String("Rain Garden".to_string()));
        assert_eq!(rows[1][3], Data::Float(75.5));
        assert_eq!(rows[1][8], Data::Float(9.25));
        assert_eq!(rows[1][9], Data::String("Ongoing".to_string()));
    }

    #[test]
    fn summary_json_names_statuses_and_sectors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_json(&path, &summarize(&[project()])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["totalProjects"], 1);
        assert_eq!(value["statusCounts"]["Not started"], 0);
        assert_eq!(value["statusCounts"]["Ongoing"], 1);
        assert_eq!(value["statusCounts"]["Delay"], 0);
        assert_eq!(value["sectorStats"]["Green Spaces & Parks"]["allocated"], 75.5);
    }

    #[test]
    fn table_preview_is_markdown() {
        let rows = export_rows(&[project()]);
        let table = render_table(&rows, 2).unwrap();
        assert!(table.contains("| Sl.No"));
        assert!(table.contains("Rain Garden"));
        assert!(render_table::<ExportRow>(&[], 2).is_none());
    }
}
