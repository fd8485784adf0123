//! End-to-end operations behind each user action.
//!
//! A [`Workflow`] owns the downloader and working-file locations and borrows an injected
//! [`CatalogCache`]. Every operation validates its input before touching the network or disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{self, CatalogCache};
use crate::catalog::{self, EpisodeRecord, ShowRecord};
use crate::config::Settings;
use crate::downloader::{DownloadProgress, Downloader};
use crate::error::{Error, Result, require_non_blank};
use crate::executor::{self, RenameResult};
use crate::rename_engine::{ConfigBuilder, RenameConfig, RenameEngine, RenamePlanEntry};
use crate::season;

const CATALOG_FILE: &str = "allshows.csv";
const EPISODE_FILE: &str = "list.csv";
const LIST_FILE: &str = "list.txt";

pub struct Workflow {
    settings: Settings,
    downloader: Downloader,
    cache: Arc<CatalogCache>,
}

impl Workflow {
    pub fn new(settings: Settings, cache: Arc<CatalogCache>) -> Result<Self> {
        let downloader = Downloader::new(settings.connect_timeout(), settings.read_timeout())?;
        Ok(Self::with_downloader(settings, cache, downloader))
    }

    pub fn with_downloader(
        settings: Settings,
        cache: Arc<CatalogCache>,
        downloader: Downloader,
    ) -> Self {
        Self {
            settings,
            downloader,
            cache,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.settings.working_dir.join(CATALOG_FILE)
    }

    pub fn episode_csv_path(&self) -> PathBuf {
        self.settings.working_dir.join(EPISODE_FILE)
    }

    pub fn list_path(&self) -> PathBuf {
        self.settings.working_dir.join(LIST_FILE)
    }

    /// Builder prefilled with the configured extension, template and file order.
    pub fn config_builder(&self, directory: &Path) -> ConfigBuilder {
        ConfigBuilder::new()
            .directory(directory)
            .default_extension(self.settings.default_extension.clone())
            .template(Some(self.settings.naming_template.clone()))
            .file_order(self.settings.file_order)
    }

    /// The catalog, downloaded on first use.
    pub async fn catalog<F>(
        &self,
        cancel: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<Arc<Vec<ShowRecord>>>
    where
        F: FnMut(DownloadProgress),
    {
        let path = self.catalog_path();
        let path = path.as_path();
        let url = self.settings.catalog_url.as_str();
        let downloader = &self.downloader;
        self.cache
            .get_or_load(move || async move {
                downloader.download(url, path, cancel, on_progress).await?;
                catalog::read_catalog(path)
            })
            .await
    }

    /// Shows whose title contains `query`, ignoring case.
    pub async fn search_shows<F>(
        &self,
        query: &str,
        cancel: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<Vec<ShowRecord>>
    where
        F: FnMut(DownloadProgress),
    {
        require_non_blank(query, "show title")?;
        let shows = self.catalog(cancel, on_progress).await?;
        let matches: Vec<ShowRecord> = cache::search(&shows, query).into_iter().cloned().collect();
        info!("Found {} matches for '{}'", matches.len(), query.trim());
        Ok(matches)
    }

    pub async fn find_show<F>(
        &self,
        title: &str,
        cancel: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<ShowRecord>
    where
        F: FnMut(DownloadProgress),
    {
        require_non_blank(title, "show title")?;
        let shows = self.catalog(cancel, on_progress).await?;
        cache::find_show(&shows, title)
            .cloned()
            .ok_or_else(|| Error::ShowNotFound(title.trim().to_string()))
    }

    /// Download and parse the episode export of a show. Never cached.
    pub async fn fetch_episodes<F>(
        &self,
        show: &ShowRecord,
        cancel: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<Vec<EpisodeRecord>>
    where
        F: FnMut(DownloadProgress),
    {
        let url = catalog::episode_url(&self.settings.episode_url_template, &show.tvmaze)?;
        let path = self.episode_csv_path();
        self.downloader
            .download(&url, &path, cancel, &mut *on_progress)
            .await?;
        catalog::read_episodes(&path)
    }

    /// The season index ceiling of a show.
    pub async fn season_ceiling<F>(
        &self,
        title: &str,
        cancel: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<u32>
    where
        F: FnMut(DownloadProgress),
    {
        let show = self.find_show(title, cancel, on_progress).await?;
        let episodes = self.fetch_episodes(&show, cancel, on_progress).await?;
        let ceiling = season::season_ceiling(&episodes)?;
        info!("'{}' has season ceiling {}", show.title, ceiling);
        Ok(ceiling)
    }

    /// Write the sanitized episode names of one season to the list file.
    ///
    /// Any earlier list is removed first, so a failure leaves no list behind.
    /// Returns `Ok(false)` if the episode export could not be obtained.
    pub async fn generate_episode_list<F>(
        &self,
        title: &str,
        season_num: u32,
        cancel: &CancellationToken,
        on_progress: &mut F,
    ) -> Result<bool>
    where
        F: FnMut(DownloadProgress),
    {
        require_non_blank(title, "show title")?;
        season::clear_episode_list(&self.list_path())?;
        let show = self.find_show(title, cancel, on_progress).await?;
        let url = catalog::episode_url(&self.settings.episode_url_template, &show.tvmaze)?;
        let csv_path = self.episode_csv_path();
        self.downloader
            .download(&url, &csv_path, cancel, &mut *on_progress)
            .await?;

        season::generate_season_list(&csv_path, season_num, &self.list_path())
    }

    /// Plan renames from the list file without touching any media file.
    pub fn preview(&self, config: RenameConfig) -> Result<Vec<RenamePlanEntry>> {
        let names = season::read_episode_list(&self.list_path())?;
        let engine = RenameEngine::new(config);
        let plan = engine.plan(&names)?;
        debug!("Planned {} renames", plan.len());
        Ok(plan)
    }

    /// Plan and apply renames. Individual failures are reported in the results.
    pub fn rename(
        &self,
        config: RenameConfig,
        cancel: &CancellationToken,
    ) -> Result<Vec<RenameResult>> {
        let directory = config.directory.clone();
        let plan = self.preview(config)?;
        Ok(executor::execute(&directory, &plan, cancel))
    }

    /// Remove downloaded CSVs. The episode list is kept for the rename step.
    pub fn clean_working_files(&self) -> Result<()> {
        for path in [self.catalog_path(), self.episode_csv_path()] {
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed {:?}", path),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Could not remove {:?}: {}", path, e);
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }
}
