//! Settings data structures

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::naming::{DEFAULT_EXTENSION, DEFAULT_TEMPLATE};
use crate::rename_engine::FileOrder;

pub const DEFAULT_CATALOG_URL: &str = "https://epguides.com/common/allshows.txt";
pub const DEFAULT_EPISODE_URL_TEMPLATE: &str =
    "https://epguides.com/common/exportToCSVmaze.asp?maze={maze}";

/// Main application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// URL of the "all shows" catalog
    pub catalog_url: String,

    /// Episode export URL; `{maze}` is replaced with the show's TVmaze id
    pub episode_url_template: String,

    /// Where downloaded CSVs and the episode list are kept
    pub working_dir: PathBuf,

    /// Extension used when none (or an invalid one) is given
    pub default_extension: String,

    /// Naming template for renamed files
    pub naming_template: String,

    /// Order of files before they are paired with episodes
    pub file_order: FileOrder,

    pub connect_timeout_secs: u64,

    pub read_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let working_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("epguide-rename");

        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            episode_url_template: DEFAULT_EPISODE_URL_TEMPLATE.to_string(),
            working_dir,
            default_extension: DEFAULT_EXTENSION.to_string(),
            naming_template: DEFAULT_TEMPLATE.to_string(),
            file_order: FileOrder::default(),
            connect_timeout_secs: 10,
            read_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            default_extension = "mp4"
            file_order = "listing"
            "#,
        )
        .unwrap();

        assert_eq!(settings.default_extension, "mp4");
        assert_eq!(settings.file_order, FileOrder::Listing);
        assert_eq!(settings.catalog_url, DEFAULT_CATALOG_URL);
        assert_eq!(settings.naming_template, DEFAULT_TEMPLATE);
        assert_eq!(settings.read_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_toml_round_trip() {
        let settings = Settings {
            naming_template: "{Titel} - {EpisodeName}".to_string(),
            ..Settings::default()
        };
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
