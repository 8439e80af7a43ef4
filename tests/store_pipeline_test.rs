use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::time::Duration as StdDuration;
use tempfile::tempdir;
use tweetmap::ingest::ingest_lines;
use tweetmap::render::NoopPacer;
use tweetmap::{
    EventStore, Player, SqliteStore, StoreError, TextSink, TweetmapError, aggregate_store,
};

fn tweet(id: &str, created_at: &str, lon: f64, lat: f64) -> String {
    json!({
        "id_str": id,
        "lang": "en",
        "created_at": created_at,
        "coordinates": { "type": "Point", "coordinates": [lon, lat] },
        "place": {
            "id": "01a9a39529b27f36",
            "country_code": "US",
            "name": "Manhattan",
            "place_type": "city",
            "url": "https://api.twitter.com/1.1/geo/id/01a9a39529b27f36.json"
        }
    })
    .to_string()
}

fn seeded_store(path: &std::path::Path) -> SqliteStore {
    let mut store = SqliteStore::open(path).expect("Failed to open store");
    store.create_schema().expect("Failed to create schema");

    let input = [
        tweet("3", "Wed Oct 10 00:03:05 +0000 2018", -73.98, 40.75),
        tweet("1", "Wed Oct 10 00:00:30 +0000 2018", -74.00, 40.71),
        tweet("2", "Wed Oct 10 00:01:10 +0000 2018", -73.99, 40.73),
    ]
    .join("\n");

    let stats = ingest_lines(input.as_bytes(), &mut store).expect("Ingest failed");
    assert_eq!(stats.accepted, 3);
    store
}

/// Ingest, aggregate and play back from one database file
#[test]
fn test_ingest_aggregate_play() {
    let dir = tempdir().unwrap();
    let store = seeded_store(&dir.path().join("tweets.db"));

    let timeline = aggregate_store(&store, Duration::seconds(60)).expect("Aggregation failed");
    let sizes: Vec<usize> = timeline.iter().map(|w| w.len()).collect();
    assert_eq!(sizes, vec![2, 0, 1]);
    assert_eq!(
        timeline.first_start(),
        Utc.with_ymd_and_hms(2018, 10, 10, 0, 0, 30).unwrap()
    );

    let mut player = Player::with_pacer(StdDuration::from_millis(100), NoopPacer);
    let mut sink = TextSink::new(Vec::new());
    let stats = player.play(&timeline, &mut sink).expect("Playback failed");
    assert_eq!(stats.frames, timeline.len());

    let text = String::from_utf8(sink.into_inner()).unwrap();
    assert!(text.starts_with("[1/3] 2018-10-10 00:00:30 (UTC): 2 points"));
}

/// The coordinate file lists every stored tweet, latitude first
#[test]
fn test_export_coordinate_file() {
    let dir = tempdir().unwrap();
    let store = seeded_store(&dir.path().join("tweets.db"));
    let coords = dir.path().join("coords");

    let written = tweetmap::export::export_coordinates(&store, &coords).unwrap();
    assert_eq!(written, 3);

    let contents = std::fs::read_to_string(&coords).unwrap();
    let first = contents.lines().next().unwrap();
    assert_eq!(first, "40.75 -73.98");
}

/// A corrupt row in the database rejects the whole batch
#[test]
fn test_corrupt_row_aborts_aggregation() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tweets.db");
    drop(seeded_store(&path));

    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute(
        "UPDATE TWEET SET CREATED_AT = '2018-10-10 00:01:10' WHERE TWEET_ID = '2'",
        [],
    )
    .unwrap();
    drop(conn);

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.load_records().unwrap().len(), 3);
    assert!(matches!(
        aggregate_store(&store, Duration::seconds(60)),
        Err(TweetmapError::MalformedTimestamp { value }) if value == "2018-10-10 00:01:10"
    ));
}

/// A database without tables surfaces as an event store error
#[test]
fn test_uninitialized_database_is_store_error() {
    let dir = tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("empty.db")).unwrap();

    assert!(matches!(
        aggregate_store(&store, Duration::seconds(60)),
        Err(TweetmapError::EventStore(StoreError::Sqlite(_)))
    ));
}

/// An initialized but empty database has nothing to aggregate
#[test]
fn test_empty_database_is_empty_input() {
    let dir = tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("empty.db")).unwrap();
    store.create_schema().unwrap();

    assert!(matches!(
        aggregate_store(&store, Duration::seconds(60)),
        Err(TweetmapError::EmptyInput)
    ));
}
