//! Season structure derived from episode records, and the episode-name list file that
//! hands a season over to the rename stage.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::catalog::{self, EpisodeRecord};
use crate::error::{Error, Result};
use crate::naming::sanitize_title;

/// Parse a season value from an episode record.
pub fn parse_season(value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| Error::MalformedData(format!("season value '{}' is not a number", value)))
}

/// The season index ceiling: the highest season number present, 0 for no episodes.
///
/// This is not a count of distinct seasons. A show with only seasons 0 and 3 yields 3,
/// and the value is used directly as the upper bound of the season picker.
pub fn season_ceiling(episodes: &[EpisodeRecord]) -> Result<u32> {
    let mut ceiling = 0;
    for episode in episodes {
        ceiling = ceiling.max(parse_season(&episode.season)?);
    }
    Ok(ceiling)
}

/// Episodes of one season in source order.
pub fn episodes_for_season(episodes: &[EpisodeRecord], season: u32) -> Result<Vec<&EpisodeRecord>> {
    let mut selected = Vec::new();
    for episode in episodes {
        if parse_season(&episode.season)? == season {
            selected.push(episode);
        }
    }

    if selected.is_empty() {
        return Err(Error::SeasonNotFound(season));
    }
    Ok(selected)
}

/// Sanitized titles of one season, ready to be used as file name components.
pub fn episode_names_for_season(episodes: &[EpisodeRecord], season: u32) -> Result<Vec<String>> {
    Ok(episodes_for_season(episodes, season)?
        .into_iter()
        .map(|episode| sanitize_title(&episode.title))
        .collect())
}

/// Labels for a season picker: `Season 01` up to the ceiling.
pub fn season_labels(ceiling: u32) -> Vec<String> {
    (1..=ceiling).map(|n| format!("Season {:02}", n)).collect()
}

/// Write one name per line, without a trailing newline.
pub fn write_episode_list(path: &Path, names: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, names.join("\n"))?;
    debug!("Wrote {} episode names to {:?}", names.len(), path);
    Ok(())
}

/// Remove the list file. A missing file is not an error.
pub fn clear_episode_list(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Cleared episode list {:?}", path);
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

pub fn read_episode_list(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::ListMissing(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(content.lines().map(|line| line.to_string()).collect())
}

/// Turn a downloaded episode export into the list file for one season.
///
/// The previous list is cleared first. Returns `Ok(false)` when the export is missing or
/// empty. A season with no episodes is an error, as is a non-numeric season value anywhere
/// in the export; in every such case no list file is left.
pub fn generate_season_list(episode_csv: &Path, season: u32, list_path: &Path) -> Result<bool> {
    clear_episode_list(list_path)?;
    let episodes = catalog::read_episodes(episode_csv)?;
    if episodes.is_empty() {
        warn!("No episodes available in {:?}", episode_csv);
        return Ok(false);
    }

    let names = episode_names_for_season(&episodes, season)?;
    write_episode_list(list_path, &names)?;
    info!("Generated list of {} episodes for season {}", names.len(), season);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(season: &str, title: &str) -> EpisodeRecord {
        EpisodeRecord {
            number: "1".to_string(),
            season: season.to_string(),
            episode: "1".to_string(),
            airdate: String::new(),
            title: title.to_string(),
            tvmaze_link: String::new(),
        }
    }

    #[test]
    fn test_season_ceiling() {
        assert_eq!(season_ceiling(&[]).unwrap(), 0);
        let episodes = vec![episode("0", "Special"), episode("3", "x"), episode("2", "y")];
        assert_eq!(season_ceiling(&episodes).unwrap(), 3);
    }

    #[test]
    fn test_season_ceiling_rejects_garbage() {
        let episodes = vec![episode("1", "a"), episode("S2", "b")];
        assert!(matches!(season_ceiling(&episodes), Err(Error::MalformedData(_))));
    }

    #[test]
    fn test_episodes_for_season_normalizes_leading_zeros() {
        let episodes = vec![episode("01", "a"), episode("2", "b"), episode("1", "c")];
        let titles: Vec<_> = episodes_for_season(&episodes, 1)
            .unwrap()
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, ["a", "c"]);
        assert!(matches!(episodes_for_season(&episodes, 5), Err(Error::SeasonNotFound(5))));
    }

    #[test]
    fn test_season_labels() {
        assert_eq!(season_labels(3), ["Season 01", "Season 02", "Season 03"]);
        assert_eq!(season_labels(10).last().unwrap(), "Season 10");
        assert!(season_labels(0).is_empty());
    }
}
