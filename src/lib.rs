//! Ingestion and reporting core for the AMRUT 2.0 project monitoring sheet.
//!
//! A published workbook (one sheet per sector) goes in; a flat list of
//! normalized, status-annotated [`Project`] records comes out, along with
//! summary statistics over any filtered subset.
pub mod config;
pub mod error;
pub mod extract;
pub mod loader;
pub mod output;
pub mod reports;
pub mod sectors;
pub mod status;
pub mod store;
pub mod types;
pub mod util;

pub use loader::{ingest, load_all_projects, load_projects, IngestOptions, IngestOutcome};
pub use reports::{summarize, ProjectFilter};
pub use status::infer_status;
pub use types::{DashboardStats, Project, ProjectStatus, Sector};
