use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// Infrastructure sector a project belongs to. Assigned per worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "Water Supply")]
    WaterSupply,
    #[serde(rename = "Sewerage & Septage")]
    SewerageSeptage,
    #[serde(rename = "Waterbody Rejuvenation")]
    WaterbodyRejuvenation,
    #[serde(rename = "Green Spaces & Parks")]
    GreenSpacesParks,
}

impl Sector {
    pub const ALL: [Sector; 4] = [
        Sector::WaterSupply,
        Sector::SewerageSeptage,
        Sector::WaterbodyRejuvenation,
        Sector::GreenSpacesParks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Sector::WaterSupply => "Water Supply",
            Sector::SewerageSeptage => "Sewerage & Septage",
            Sector::WaterbodyRejuvenation => "Waterbody Rejuvenation",
            Sector::GreenSpacesParks => "Green Spaces & Parks",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown sector '{}'", wanted))
    }
}

/// Lifecycle status derived from physical progress and target date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "Not started")]
    NotStarted,
    Ongoing,
    Completed,
    Delay,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::NotStarted,
        ProjectStatus::Ongoing,
        ProjectStatus::Completed,
        ProjectStatus::Delay,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not started",
            ProjectStatus::Ongoing => "Ongoing",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Delay => "Delay",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown status '{}'", wanted))
    }
}

/// One normalized project row. Costs are in lakhs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "slNo")]
    pub serial_number: String,
    pub name: String,
    #[serde(rename = "ulb")]
    pub urban_local_body: String,
    pub approved_cost: f64,
    pub received_amount: f64,
    pub commencement_date: String,
    pub target_completion_date: String,
    pub physical_progress: f64,
    pub financial_progress: f64,
    pub remarks: String,
    pub sector: Sector,
    pub status: ProjectStatus,
}

/// Allocated versus spent for one sector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SectorTotals {
    pub allocated: f64,
    pub spent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_approved_cost: f64,
    pub total_received: f64,
    pub total_spent: f64,
    /// Every status is present, zero or not.
    pub status_counts: BTreeMap<ProjectStatus, usize>,
    /// Keyed by sector, in the order sectors were first encountered.
    #[serde(serialize_with = "ordered_map")]
    pub sector_stats: Vec<(Sector, SectorTotals)>,
}

// Pairs as a JSON object, keeping their order.
fn ordered_map<S: Serializer>(pairs: &[(Sector, SectorTotals)], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}

impl DashboardStats {
    pub fn status_count(&self, status: ProjectStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    pub fn sector(&self, sector: Sector) -> Option<SectorTotals> {
        self.sector_stats
            .iter()
            .find(|(s, _)| *s == sector)
            .map(|(_, t)| *t)
    }
}

/// Flat row handed to the tabular exporters.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ExportRow {
    #[serde(rename = "Sl.No")]
    #[tabled(rename = "Sl.No")]
    pub serial_number: String,
    #[serde(rename = "Project Name")]
    #[tabled(rename = "Project Name")]
    pub name: String,
    #[serde(rename = "ULB")]
    #[tabled(rename = "ULB")]
    pub urban_local_body: String,
    #[serde(rename = "Approved Cost (Lakhs)")]
    #[tabled(rename = "Approved Cost (Lakhs)")]
    pub approved_cost: f64,
    #[serde(rename = "Received Amount (Lakhs)")]
    #[tabled(rename = "Received Amount (Lakhs)")]
    pub received_amount: f64,
    #[serde(rename = "Start Date")]
    #[tabled(rename = "Start Date")]
    pub commencement_date: String,
    #[serde(rename = "Target Completion")]
    #[tabled(rename = "Target Completion")]
    pub target_completion_date: String,
    #[serde(rename = "Physical Progress (%)")]
    #[tabled(rename = "Physical Progress (%)")]
    pub physical_progress: f64,
    #[serde(rename = "Financial Progress (Lakhs)")]
    #[tabled(rename = "Financial Progress (Lakhs)")]
    pub financial_progress: f64,
    #[serde(rename = "Status")]
    #[tabled(rename = "Status")]
    pub status: ProjectStatus,
    #[serde(rename = "Remarks")]
    #[tabled(rename = "Remarks")]
    pub remarks: String,
}

impl From<&Project> for ExportRow {
    fn from(p: &Project) -> Self {
        ExportRow {
            serial_number: p.serial_number.clone(),
            name: p.name.clone(),
            urban_local_body: p.urban_local_body.clone(),
            approved_cost: p.approved_cost,
            received_amount: p.received_amount,
            commencement_date: p.commencement_date.clone(),
            target_completion_date: p.target_completion_date.clone(),
            physical_progress: p.physical_progress,
            financial_progress: p.financial_progress,
            status: p.status,
            remarks: p.remarks.clone(),
        }
    }
}
