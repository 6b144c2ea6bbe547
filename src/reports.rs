use crate::types::{DashboardStats, Project, ProjectStatus, Sector, SectorTotals};
use std::collections::BTreeMap;

/// Summary figures over any subset of projects.
pub fn summarize<'a, I>(data: I) -> DashboardStats
where
    I: IntoIterator<Item = &'a Project>,
{
    let mut status_counts: BTreeMap<ProjectStatus, usize> =
        ProjectStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut sector_stats: Vec<(Sector, SectorTotals)> = Vec::new();
    let mut total_approved_cost = 0.0;
    let mut total_received = 0.0;
    let mut total_spent = 0.0;
    let mut total_projects = 0;

    for p in data {
        total_projects += 1;
        total_approved_cost += p.approved_cost;
        total_received += p.received_amount;
        total_spent += p.financial_progress;

        *status_counts.entry(p.status).or_insert(0) += 1;

        let idx = match sector_stats.iter().position(|(s, _)| *s == p.sector) {
            Some(idx) => idx,
            None => {
                sector_stats.push((p.sector, SectorTotals::default()));
                sector_stats.len() - 1
            }
        };
        let totals = &mut sector_stats[idx].1;
        totals.allocated += p.approved_cost;
        totals.spent += p.financial_progress;
    }

    DashboardStats {
        total_projects,
        total_approved_cost,
        total_received,
        total_spent,
        status_counts,
        sector_stats,
    }
}

/// Search box plus sector and status pickers. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectFilter {
    pub search: String,
    pub sector: Option<Sector>,
    pub status: Option<ProjectStatus>,
}

impl ProjectFilter {
    pub fn matches(&self, p: &Project) -> bool {
        let term = self.search.to_lowercase();
        let matches_search = p.name.to_lowercase().contains(&term)
            || p.urban_local_body.to_lowercase().contains(&term)
            || p.serial_number.to_lowercase().contains(&term);
        let matches_sector = self.sector.map_or(true, |s| s == p.sector);
        let matches_status = self.status.map_or(true, |s| s == p.status);
        matches_search && matches_sector && matches_status
    }

    pub fn apply<'a>(&self, data: &'a [Project]) -> Vec<&'a Project> {
        data.iter().filter(|p| self.matches(p)).collect()
    }

    /// Label used in export file names and report titles.
    pub fn scope_label(&self) -> &'static str {
        self.sector.map_or("Overview", Sector::label)
    }
}
