// Integration tests for catalog and episode export parsing

mod common;

use std::fs;

use epguide_rename::Error;
use epguide_rename::catalog::{parse_catalog, parse_episodes, read_catalog, read_episodes};
use epguide_rename::season::{
    episode_names_for_season, generate_season_list, read_episode_list, season_ceiling,
};

#[test]
fn test_parse_catalog() {
    let shows = parse_catalog(common::CATALOG_CSV.as_bytes()).unwrap();
    assert_eq!(shows.len(), 3);
    assert_eq!(shows[0].title, "Example Show");
    assert_eq!(shows[0].tvmaze, "1234");
    assert_eq!(shows[1].network, "BBC");
    assert_eq!(shows[1].end_date, "___ ____");
    assert_eq!(shows[2].on_hiatus, "");
}

#[test]
fn test_catalog_without_tvmaze_column_is_rejected() {
    let csv = "title,directory,tvrage\nShow,Show,1\n";
    match parse_catalog(csv.as_bytes()) {
        Err(Error::MissingColumn(column)) => assert_eq!(column, "TVmaze"),
        other => panic!("expected missing column, got {:?}", other),
    }
}

#[test]
fn test_absent_or_empty_sources_yield_nothing() {
    let dir = tempfile::tempdir().unwrap();
    assert!(read_catalog(&dir.path().join("allshows.csv")).unwrap().is_empty());
    assert!(read_episodes(&dir.path().join("list.csv")).unwrap().is_empty());

    let empty = dir.path().join("empty.csv");
    fs::write(&empty, "").unwrap();
    assert!(read_catalog(&empty).unwrap().is_empty());
    assert!(read_episodes(&empty).unwrap().is_empty());
}

#[test]
fn test_episode_export_with_html_noise() {
    let episodes = parse_episodes(common::EPISODE_EXPORT).unwrap();
    assert_eq!(episodes.len(), 5);
    assert_eq!(episodes[1].title, "Who's There?");
    assert_eq!(episodes[4].season, "2");
    assert_eq!(season_ceiling(&episodes).unwrap(), 2);

    let names = episode_names_for_season(&episodes, 1).unwrap();
    assert_eq!(names, ["Pilot", "Who's There", "Finale"]);
}

#[test]
fn test_cleanup_leaves_source_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.csv");
    fs::write(&path, common::EPISODE_EXPORT).unwrap();

    assert_eq!(read_episodes(&path).unwrap().len(), 5);
    assert_eq!(fs::read_to_string(&path).unwrap(), common::EPISODE_EXPORT);
}

#[test]
fn test_non_numeric_season_is_malformed() {
    let text = "number,season,episode,airdate,title,tvmaze link\n1,one,1,,Pilot,\n";
    let episodes = parse_episodes(text).unwrap();
    assert!(matches!(season_ceiling(&episodes), Err(Error::MalformedData(_))));
}

#[test]
fn test_generate_season_list() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("list.csv");
    let list = dir.path().join("work").join("list.txt");

    assert!(!generate_season_list(&csv, 1, &list).unwrap());
    assert!(matches!(read_episode_list(&list), Err(Error::ListMissing(_))));

    fs::write(&csv, common::EPISODE_EXPORT).unwrap();
    assert!(generate_season_list(&csv, 2, &list).unwrap());
    assert_eq!(fs::read_to_string(&list).unwrap(), "Return\nEnding");
    assert_eq!(read_episode_list(&list).unwrap(), ["Return", "Ending"]);

    assert!(matches!(
        generate_season_list(&csv, 7, &list),
        Err(Error::SeasonNotFound(7))
    ));
    assert!(!list.exists());
}

#[test]
fn test_empty_export_clears_previous_list() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("list.csv");
    let list = dir.path().join("list.txt");
    fs::write(&list, "Old\nNames").unwrap();

    fs::write(&csv, "").unwrap();
    assert!(!generate_season_list(&csv, 1, &list).unwrap());
    assert!(matches!(read_episode_list(&list), Err(Error::ListMissing(_))));
}

#[test]
fn test_catalog_with_latin1_byte_keeps_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("allshows.csv");
    let mut bytes = common::CATALOG_CSV.as_bytes().to_vec();
    bytes.extend_from_slice(b"Am\xe9lie,Amelie,103,4321,Apr 2001,May 2001,1,120 min,UGC,FR,,\n");
    fs::write(&path, &bytes).unwrap();

    let shows = read_catalog(&path).unwrap();
    assert_eq!(shows.len(), 4);
    assert_eq!(shows[0].title, "Example Show");
    assert_eq!(shows[3].title, "Am\u{FFFD}lie");
    assert_eq!(shows[3].tvmaze, "4321");
}
