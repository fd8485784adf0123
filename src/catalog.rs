//! Parsing of the epguides catalog and per-show episode exports.
//!
//! Both documents are CSV with a fixed header. The episode export is served inside an HTML
//! page, so it is cleaned in memory before parsing. Source files on disk are never rewritten.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result, require_non_blank};

/// Header names of the "all shows" catalog, in source order.
pub const CATALOG_COLUMNS: [&str; 12] = [
    "title",
    "directory",
    "tvrage",
    "TVmaze",
    "start date",
    "end date",
    "number of episodes",
    "run time",
    "network",
    "country",
    "onhiatus",
    "onhiatusdesc",
];

/// Header names of a per-show episode export.
pub const EPISODE_COLUMNS: [&str; 6] = ["number", "season", "episode", "airdate", "title", "tvmaze link"];

const HTML_APOSTROPHE: &str = "&#039;";
const LIST_OUTPUT_TOKEN: &str = "List Output";

static HTML_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?s)<.*?>|{}", regex::escape(LIST_OUTPUT_TOKEN)))
        .expect("html noise pattern is valid")
});

/// One entry of the show catalog. Values are kept as the text found in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRecord {
    #[serde(rename(deserialize = "title"))]
    pub title: String,
    #[serde(rename(deserialize = "directory"))]
    pub directory: String,
    #[serde(rename(deserialize = "tvrage"))]
    pub tvrage: String,
    #[serde(rename(deserialize = "TVmaze"))]
    pub tvmaze: String,
    #[serde(rename(deserialize = "start date"))]
    pub start_date: String,
    #[serde(rename(deserialize = "end date"))]
    pub end_date: String,
    #[serde(rename(deserialize = "number of episodes"))]
    pub number_of_episodes: String,
    #[serde(rename(deserialize = "run time"))]
    pub run_time: String,
    #[serde(rename(deserialize = "network"))]
    pub network: String,
    #[serde(rename(deserialize = "country"))]
    pub country: String,
    #[serde(rename(deserialize = "onhiatus"))]
    pub on_hiatus: String,
    #[serde(rename(deserialize = "onhiatusdesc"))]
    pub on_hiatus_desc: String,
}

/// One row of a show's episode export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    #[serde(rename(deserialize = "number"))]
    pub number: String,
    #[serde(rename(deserialize = "season"))]
    pub season: String,
    #[serde(rename(deserialize = "episode"))]
    pub episode: String,
    #[serde(rename(deserialize = "airdate"))]
    pub airdate: String,
    #[serde(rename(deserialize = "title"))]
    pub title: String,
    #[serde(rename(deserialize = "tvmaze link"))]
    pub tvmaze_link: String,
}

/// Read the catalog file. A missing file yields an empty list.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than failing the whole catalog.
pub fn read_catalog(path: &Path) -> Result<Vec<ShowRecord>> {
    if !path.exists() {
        debug!("Catalog file {:?} does not exist", path);
        return Ok(Vec::new());
    }

    let raw = fs::read(path)?;
    let text = String::from_utf8_lossy(&raw);
    let shows = parse_catalog(text.as_bytes())?;
    info!("Loaded {} shows from {:?}", shows.len(), path);
    Ok(shows)
}

pub fn parse_catalog<R: Read>(reader: R) -> Result<Vec<ShowRecord>> {
    parse_records(reader, &CATALOG_COLUMNS)
}

/// Read and clean an episode export. A missing file yields an empty list.
pub fn read_episodes(path: &Path) -> Result<Vec<EpisodeRecord>> {
    if !path.exists() {
        debug!("Episode file {:?} does not exist", path);
        return Ok(Vec::new());
    }

    let raw = fs::read(path)?;
    let text = String::from_utf8_lossy(&raw);
    let episodes = parse_episodes(&text)?;
    info!("Loaded {} episodes from {:?}", episodes.len(), path);
    Ok(episodes)
}

/// Clean and parse the text of an episode export.
pub fn parse_episodes(text: &str) -> Result<Vec<EpisodeRecord>> {
    let cleaned = clean_episode_csv(text);
    parse_records(cleaned.as_bytes(), &EPISODE_COLUMNS)
}

/// Strip the HTML page wrapped around an episode export.
///
/// Per line: remove tags and the literal `List Output` token, decode `&#039;`, then drop
/// lines left empty.
pub fn clean_episode_csv(text: &str) -> String {
    text.lines()
        .map(|line| HTML_NOISE.replace_all(line, "").replace(HTML_APOSTROPHE, "'"))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the episode export URL for a show from its TVmaze id.
pub fn episode_url(template: &str, maze_id: &str) -> Result<String> {
    require_non_blank(maze_id, "TVmaze id")?;
    Ok(template.replace("{maze}", maze_id.trim()))
}

fn parse_records<T, R>(reader: R, columns: &[&str]) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Ok(Vec::new());
    }
    for column in columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(Error::MissingColumn(column.to_string()));
        }
    }

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<T>().enumerate() {
        let record =
            row.map_err(|e| Error::MalformedData(format!("row {}: {}", index + 1, e)))?;
        records.push(record);
    }
    Ok(records)
}
