use crate::types::ProjectStatus;
use crate::util::parse_target_date;
use chrono::NaiveDateTime;

/// Derive a project's lifecycle status as of `now`.
///
/// Progress decides first. Only a project with no physical progress looks
/// at its target date, and it is `Delay` when that date has already passed.
/// The result is a point-in-time judgment: the same inputs evaluated later
/// can move from `NotStarted` to `Delay`.
pub fn infer_status(physical_progress: f64, target_completion: &str, now: NaiveDateTime) -> ProjectStatus {
    if physical_progress >= 100.0 {
        return ProjectStatus::Completed;
    }
    if physical_progress > 0.0 {
        return ProjectStatus::Ongoing;
    }
    match parse_target_date(target_completion) {
        Some(target) if target < now => ProjectStatus::Delay,
        _ => ProjectStatus::NotStarted,
    }
}
