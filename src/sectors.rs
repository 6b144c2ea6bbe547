// Sector assignment for worksheets, and per-sector structural quirks.
use crate::types::Sector;
use std::collections::HashMap;
use tracing::warn;

/// Fallback when a sheet name says nothing useful, indexed by sheet position.
const POSITIONAL_SECTORS: [Sector; 4] = [
    Sector::WaterSupply,
    Sector::SewerageSeptage,
    Sector::WaterbodyRejuvenation,
    Sector::GreenSpacesParks,
];

/// Leading serial-numbered rows that are template headers, not projects.
///
/// The Water Supply template numbers its first header row, so the first
/// candidate row of such a sheet is dropped. Add an entry here for any
/// other sector whose template grows the same quirk.
const SKIP_RULES: [(Sector, usize); 1] = [(Sector::WaterSupply, 1)];

pub fn leading_rows_to_skip(sector: Sector) -> usize {
    SKIP_RULES
        .iter()
        .find(|(s, _)| *s == sector)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

/// Sector from a sheet's name, falling back to its position.
pub fn classify_sheet(name: &str, position: usize) -> Sector {
    let upper = name.to_uppercase();
    if upper.contains("SEWER") {
        Sector::SewerageSeptage
    } else if upper.contains("BODY") || upper.contains("REJUVENATION") {
        Sector::WaterbodyRejuvenation
    } else if upper.contains("GREEN") || upper.contains("PARK") {
        Sector::GreenSpacesParks
    } else if upper.contains("WATER") {
        Sector::WaterSupply
    } else {
        POSITIONAL_SECTORS
            .get(position)
            .copied()
            .unwrap_or(Sector::WaterSupply)
    }
}

/// Explicit sheet-name to sector table, consulted before the name heuristics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectorOverrides {
    by_sheet: HashMap<String, Sector>,
}

impl SectorOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sheet: impl Into<String>, sector: Sector) {
        self.by_sheet.insert(sheet.into(), sector);
    }

    pub fn is_empty(&self) -> bool {
        self.by_sheet.is_empty()
    }

    /// Parse `Sheet A=Water Supply;Sheet B=Sewerage & Septage`.
    ///
    /// Malformed entries are logged and skipped.
    pub fn parse(spec: &str) -> Self {
        let mut overrides = Self::new();
        for entry in spec.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((sheet, sector)) = entry.split_once('=') else {
                warn!(entry, "ignoring sheet sector override without '='");
                continue;
            };
            match sector.parse::<Sector>() {
                Ok(sector) => overrides.insert(sheet.trim(), sector),
                Err(e) => warn!(entry, error = %e, "ignoring sheet sector override"),
            }
        }
        overrides
    }

    /// Override for an exact sheet name, else [`classify_sheet`].
    pub fn classify(&self, name: &str, position: usize) -> Sector {
        self.by_sheet
            .get(name)
            .copied()
            .unwrap_or_else(|| classify_sheet(name, position))
    }
}
