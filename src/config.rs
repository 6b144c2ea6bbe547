use crate::sectors::SectorOverrides;
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub workbook_path: String,
    pub output_dir: String,
    pub sector_overrides: SectorOverrides,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok(); // Load from .env file if available
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            workbook_path: lookup("AMRUT_WORKBOOK_PATH").unwrap_or_else(|| "amrut_projects.xlsx".to_string()),
            output_dir: lookup("AMRUT_OUTPUT_DIR").unwrap_or_else(|| ".".to_string()),
            sector_overrides: lookup("AMRUT_SHEET_SECTORS")
                .map(|spec| SectorOverrides::parse(&spec))
                .unwrap_or_default(),
        }
    }
}
