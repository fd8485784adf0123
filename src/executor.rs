//! Applies a rename plan to the filesystem.
//!
//! Each entry is independent: a failure is recorded for that entry and the batch moves on.
//! The collision check runs right before each rename because earlier entries of the same
//! batch change what is in the directory.

use std::fs;
use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::rename_engine::RenamePlanEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Renamed; `to` is the final name, which carries a `_N` suffix after a collision.
    Renamed { to: String },
    Failed { error: String },
    /// Not attempted because the batch was cancelled first.
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct RenameResult {
    pub entry: RenamePlanEntry,
    pub outcome: RenameOutcome,
}

impl RenameResult {
    pub fn success(&self) -> bool {
        matches!(self.outcome, RenameOutcome::Renamed { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            RenameOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenameSummary {
    pub total: usize,
    pub renamed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl RenameSummary {
    pub fn from_results(results: &[RenameResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };
        for result in results {
            match result.outcome {
                RenameOutcome::Renamed { .. } => summary.renamed += 1,
                RenameOutcome::Failed { .. } => summary.failed += 1,
                RenameOutcome::Cancelled => summary.cancelled += 1,
            }
        }
        summary
    }
}

/// First name among `name`, `stem_1.ext`, `stem_2.ext`, ... that is free in `directory`.
///
/// A target equal to `original_name` is returned as is, since renaming a file onto itself
/// clobbers nothing.
pub fn resolve_available_name(directory: &Path, original_name: &str, name: &str) -> String {
    if name == original_name || !directory.join(name).exists() {
        return name.to_string();
    }

    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1u32;
    loop {
        let candidate = format!("{}_{}{}", stem, counter, extension);
        if !directory.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Rename a single entry inside `directory`.
pub fn rename_entry(directory: &Path, entry: &RenamePlanEntry) -> RenameResult {
    let target = resolve_available_name(directory, &entry.original_name, &entry.new_name);
    let source_path = directory.join(&entry.original_name);

    let outcome = if target == entry.original_name {
        if source_path.exists() {
            RenameOutcome::Renamed { to: target }
        } else {
            RenameOutcome::Failed {
                error: format!("source file '{}' not found", entry.original_name),
            }
        }
    } else {
        match fs::rename(&source_path, directory.join(&target)) {
            Ok(()) => RenameOutcome::Renamed { to: target },
            Err(e) => RenameOutcome::Failed {
                error: e.to_string(),
            },
        }
    };

    match &outcome {
        RenameOutcome::Renamed { to } => info!("Renamed {} -> {}", entry.original_name, to),
        RenameOutcome::Failed { error } => {
            warn!("Failed to rename {}: {}", entry.original_name, error)
        }
        RenameOutcome::Cancelled => {}
    }

    RenameResult {
        entry: entry.clone(),
        outcome,
    }
}

/// Apply every entry of a plan in order, one result per entry.
///
/// Once `cancel` fires, the remaining entries are reported as cancelled; renames that
/// already happened stay in place.
pub fn execute(
    directory: &Path,
    plan: &[RenamePlanEntry],
    cancel: &CancellationToken,
) -> Vec<RenameResult> {
    let mut results = Vec::with_capacity(plan.len());

    for entry in plan {
        if cancel.is_cancelled() {
            results.push(RenameResult {
                entry: entry.clone(),
                outcome: RenameOutcome::Cancelled,
            });
            continue;
        }
        results.push(rename_entry(directory, entry));
    }

    let summary = RenameSummary::from_results(&results);
    info!(
        "Rename batch finished: {} renamed, {} failed, {} cancelled",
        summary.renamed, summary.failed, summary.cancelled
    );
    results
}
