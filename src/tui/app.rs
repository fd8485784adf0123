use std::path::PathBuf;

use ratatui::widgets::{ListState, ScrollbarState};
use tokio_util::sync::CancellationToken;

use super::models::{FileItem, ProcessingStats, ProcessingStatus};
use crate::executor::{self, RenameOutcome, RenameResult};
use crate::rename_engine::RenamePlanEntry;

#[derive(Debug)]
pub struct App {
    pub title: String,
    pub directory: PathBuf,
    pub files: Vec<FileItem>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    pub current_processing: Option<usize>,
    pub processing_progress: f64,
    pub show_help: bool,
    pub show_preview: bool,
    pub finished: bool,
    pub stats: ProcessingStats,
    pub status_message: Option<String>,
    pub cancel: CancellationToken,
    results: Vec<RenameResult>,
}

impl App {
    pub fn new(
        title: String,
        directory: PathBuf,
        plan: Vec<RenamePlanEntry>,
        cancel: CancellationToken,
    ) -> Self {
        let mut list_state = ListState::default();
        list_state.select(if plan.is_empty() { None } else { Some(0) });
        let stats = ProcessingStats {
            total: plan.len(),
            ..ProcessingStats::default()
        };

        Self {
            title,
            directory,
            scroll_state: ScrollbarState::new(plan.len()),
            files: plan.into_iter().map(FileItem::new).collect(),
            list_state,
            current_processing: None,
            processing_progress: 0.0,
            show_help: false,
            show_preview: true,
            finished: false,
            stats,
            status_message: None,
            cancel,
            results: Vec::new(),
        }
    }

    pub fn next(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.files.len() => i + 1,
            _ => 0,
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.files.len() - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    fn select(&mut self, i: usize) {
        self.list_state.select(Some(i));
        self.scroll_state = self.scroll_state.position(i);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_preview(&mut self) {
        self.show_preview = !self.show_preview;
    }

    pub fn is_processing(&self) -> bool {
        self.current_processing.is_some()
    }

    /// Start renaming; entries are then processed one per tick.
    pub fn start_processing(&mut self) {
        if self.finished || self.is_processing() || self.files.is_empty() {
            return;
        }
        self.current_processing = Some(0);
        self.status_message = None;
    }

    /// Rename the current entry and advance. Returns false when nothing is left to do.
    pub fn process_next(&mut self) -> bool {
        let Some(index) = self.current_processing else {
            return false;
        };

        let result = if self.cancel.is_cancelled() {
            RenameResult {
                entry: self.files[index].entry.clone(),
                outcome: RenameOutcome::Cancelled,
            }
        } else {
            executor::rename_entry(&self.directory, &self.files[index].entry)
        };
        self.record(index, result);

        if index + 1 < self.files.len() {
            self.current_processing = Some(index + 1);
            self.select(index + 1);
            true
        } else {
            self.current_processing = None;
            self.finished = true;
            self.status_message = Some(format!(
                "Complete! {} renamed, {} failed, {} skipped",
                self.stats.successful, self.stats.failed, self.stats.skipped
            ));
            false
        }
    }

    /// Stop after the entry in progress; the rest are reported as skipped.
    pub fn cancel_processing(&mut self) {
        self.cancel.cancel();
        while self.process_next() {}
    }

    /// Stop a running batch, or report that the preview should close.
    pub fn quit_or_stop(&mut self) -> bool {
        if self.is_processing() {
            self.cancel_processing();
            false
        } else {
            true
        }
    }

    fn record(&mut self, index: usize, result: RenameResult) {
        self.files[index].apply(&result);
        self.stats.processed += 1;
        match self.files[index].status {
            ProcessingStatus::Success => self.stats.successful += 1,
            ProcessingStatus::Error => self.stats.failed += 1,
            ProcessingStatus::Skipped => self.stats.skipped += 1,
            ProcessingStatus::Pending => {}
        }
        self.processing_progress = self.stats.processed as f64 / self.stats.total.max(1) as f64;
        self.results.push(result);
    }

    pub fn into_results(self) -> Vec<RenameResult> {
        self.results
    }
}
