use crate::executor::{RenameOutcome, RenameResult};
use crate::rename_engine::RenamePlanEntry;

#[derive(Debug, Clone)]
pub struct FileItem {
    pub entry: RenamePlanEntry,
    /// Final name once renamed; differs from the planned one after a collision.
    pub final_name: Option<String>,
    pub status: ProcessingStatus,
    pub error_message: Option<String>,
}

impl FileItem {
    pub fn new(entry: RenamePlanEntry) -> Self {
        Self {
            entry,
            final_name: None,
            status: ProcessingStatus::Pending,
            error_message: None,
        }
    }

    pub fn apply(&mut self, result: &RenameResult) {
        match &result.outcome {
            RenameOutcome::Renamed { to } => {
                self.status = ProcessingStatus::Success;
                self.final_name = Some(to.clone());
            }
            RenameOutcome::Failed { error } => {
                self.status = ProcessingStatus::Error;
                self.error_message = Some(error.clone());
            }
            RenameOutcome::Cancelled => self.status = ProcessingStatus::Skipped,
        }
    }

    pub fn display_new_name(&self) -> &str {
        self.final_name.as_deref().unwrap_or(&self.entry.new_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingStatus {
    Pending,
    Success,
    Error,
    Skipped,
}

#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub total: usize,
    pub processed: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}
