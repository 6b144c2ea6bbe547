use crate::loader::{load_projects_with, IngestOptions};
use crate::types::Project;
use chrono::NaiveDateTime;
use std::sync::{Arc, RwLock};
use tracing::info;

/// The record set the front end currently shows.
///
/// Refreshes are not serialized: whichever run finishes last installs its
/// snapshot, regardless of when it started.
#[derive(Debug, Default)]
pub struct ProjectStore {
    current: RwLock<Arc<Vec<Project>>>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<Vec<Project>> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn replace(&self, projects: Vec<Project>) {
        let next = Arc::new(projects);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Ingest `bytes` and install the result, even when it is empty.
    pub fn refresh_from_bytes(&self, bytes: &[u8], options: &IngestOptions, now: NaiveDateTime) -> usize {
        let projects = load_projects_with(bytes, options, now);
        let count = projects.len();
        self.replace(projects);
        info!(records = count, "installed project snapshot");
        count
    }
}
