use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result, require_non_blank};
use crate::naming::{DEFAULT_EXTENSION, NamingTemplate, normalize_extension, sanitize_title};

/// How matching files are ordered before they are paired with episodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOrder {
    /// Sort file names before pairing.
    #[default]
    Lexicographic,
    /// Keep whatever order the directory listing yields.
    Listing,
}

#[derive(Debug, Clone)]
pub struct RenameConfig {
    pub directory: PathBuf,
    pub show_title: String,
    pub season_num: u32,
    /// Normalized, with a leading dot.
    pub extension: String,
    pub template: NamingTemplate,
    pub file_order: FileOrder,
}

/// One pairing of an existing file with its computed target name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenamePlanEntry {
    pub original_name: String,
    pub new_name: String,
    pub episode_number: usize,
    pub episode_title: String,
}

impl RenamePlanEntry {
    /// Display-only separator between the old and new name.
    pub const SEPARATOR: &'static str = "    ==>    ";

    pub fn preview_row(&self) -> [&str; 3] {
        [self.original_name.as_str(), Self::SEPARATOR, self.new_name.as_str()]
    }
}

/// Pair files with episode names.
///
/// The k-th file gets the k-th episode name; the plan stops at the shorter of the two
/// sequences. File order is taken as given, so the caller decides whether it is sorted.
pub fn plan(
    show_title: &str,
    season_num: u32,
    extension: &str,
    template: &NamingTemplate,
    files: &[String],
    episode_names: &[String],
) -> Vec<RenamePlanEntry> {
    let show_title = sanitize_title(show_title);

    files
        .iter()
        .zip(episode_names)
        .enumerate()
        .map(|(index, (file, name))| {
            let episode_title = sanitize_title(name);
            let stem = template.render(&show_title, season_num, index + 1, &episode_title);
            RenamePlanEntry {
                original_name: file.clone(),
                new_name: format!("{}{}", stem, extension),
                episode_number: index + 1,
                episode_title,
            }
        })
        .collect()
}

#[derive(Debug)]
pub struct RenameEngine {
    config: RenameConfig,
}

impl RenameEngine {
    pub fn new(config: RenameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    /// Names of regular files in the directory whose extension matches exactly.
    pub fn scan_directory(&self) -> Result<Vec<String>> {
        let directory = &self.config.directory;
        if !directory.is_dir() {
            return Err(Error::Validation(format!(
                "directory does not exist: {:?}",
                directory
            )));
        }

        let wanted = self.config.extension.trim_start_matches('.');
        let mut files = Vec::new();
        for entry in fs::read_dir(directory)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!("Skipping file with non UTF-8 name: {:?}", raw);
                    continue;
                }
            };
            let matches = Path::new(&name)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == wanted);
            if matches {
                files.push(name);
            }
        }

        if self.config.file_order == FileOrder::Lexicographic {
            files.sort();
        }
        debug!("Found {} {} files in {:?}", files.len(), self.config.extension, directory);
        Ok(files)
    }

    /// Build the rename plan for the configured directory.
    pub fn plan(&self, episode_names: &[String]) -> Result<Vec<RenamePlanEntry>> {
        let files = self.scan_directory()?;
        Ok(plan(
            &self.config.show_title,
            self.config.season_num,
            &self.config.extension,
            &self.config.template,
            &files,
            episode_names,
        ))
    }
}

/// Parse a season as typed by a user: `3`, `03`, `S03` or `Season 03`.
pub fn parse_season_input(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();
    let digits = lower
        .strip_prefix("season")
        .or_else(|| lower.strip_prefix('s'))
        .unwrap_or(&lower)
        .trim();
    digits.parse::<u32>().ok()
}

pub struct ConfigBuilder {
    directory: Option<PathBuf>,
    show_title: Option<String>,
    season: Option<String>,
    extension: Option<String>,
    default_extension: String,
    template: Option<String>,
    file_order: FileOrder,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            directory: None,
            show_title: None,
            season: None,
            extension: None,
            default_extension: DEFAULT_EXTENSION.to_string(),
            template: None,
            file_order: FileOrder::default(),
        }
    }

    pub fn directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn show_title(mut self, title: impl Into<String>) -> Self {
        self.show_title = Some(title.into());
        self
    }

    pub fn season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    pub fn extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension;
        self
    }

    pub fn default_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }

    pub fn template(mut self, template: Option<String>) -> Self {
        self.template = template;
        self
    }

    pub fn file_order(mut self, order: FileOrder) -> Self {
        self.file_order = order;
        self
    }

    pub fn build(self) -> Result<RenameConfig> {
        let directory = self
            .directory
            .ok_or_else(|| Error::Validation("directory is required".to_string()))?;

        let show_title = self.show_title.unwrap_or_default();
        require_non_blank(&show_title, "show title")?;

        let season = self.season.unwrap_or_default();
        require_non_blank(&season, "season number")?;
        let season_num = parse_season_input(&season).ok_or_else(|| {
            Error::Validation(format!("could not parse season number '{}'", season))
        })?;

        let extension = normalize_extension(
            self.extension.as_deref().unwrap_or(&self.default_extension),
            &self.default_extension,
        );
        let template = NamingTemplate::new(self.template.as_deref().unwrap_or_default());

        Ok(RenameConfig {
            directory,
            show_title: show_title.trim().to_string(),
            season_num,
            extension,
            template,
            file_order: self.file_order,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
