//! SQLite event store.
//!
//! Places and tweets live in two tables. A tweet's location is its own exact
//! coordinate when it had one, otherwise the centroid of its place.

use super::EventStore;
use crate::decode::{RawRecord, format_timestamp};
use crate::error::StoreError;
use crate::ingest::ValidatedTweet;
use geo::Point;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS PLACE (
        PLACE_ID VARCHAR(50) NOT NULL PRIMARY KEY,
        COUNTRY_CODE VARCHAR(5) NOT NULL,
        NAME VARCHAR(50) NOT NULL,
        COORDINATES TEXT
    );
    CREATE TABLE IF NOT EXISTS TWEET (
        TWEET_ID VARCHAR(50) NOT NULL PRIMARY KEY,
        CREATED_AT VARCHAR(50) NOT NULL,
        LANG VARCHAR(5) NOT NULL,
        COORDINATES TEXT,
        PLACE_ID VARCHAR(50) NOT NULL REFERENCES PLACE (PLACE_ID)
    );
";

/// Event store on top of a SQLite database file
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.pragma_update(None, "foreign_keys", true)?;
        log::debug!("Opened event store at {}", path.as_ref().display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", true)?;
        Ok(Self { conn })
    }

    /// Create the PLACE and TWEET tables if they do not exist yet.
    pub fn create_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Record an accepted tweet and its place.
    ///
    /// Returns `false` if a tweet with the same id was already stored. A place
    /// seen before keeps its first stored row.
    pub fn record(&mut self, tweet: &ValidatedTweet) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT OR IGNORE INTO PLACE (PLACE_ID, COUNTRY_CODE, NAME, COORDINATES)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                tweet.place.id,
                tweet.place.country_code,
                tweet.place.name,
                tweet.place.centroid.as_ref().map(encode_point),
            ],
        )?;

        let inserted = tx.execute(
            "INSERT OR IGNORE INTO TWEET (TWEET_ID, CREATED_AT, LANG, COORDINATES, PLACE_ID)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                tweet.id,
                format_timestamp(&tweet.created_at),
                tweet.lang,
                tweet.coordinate.as_ref().map(encode_point),
                tweet.place.id,
            ],
        )?;

        tx.commit()?;

        if inserted == 0 {
            log::debug!("Tweet {} already stored", tweet.id);
        }
        Ok(inserted > 0)
    }

    pub fn count_tweets(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM TWEET", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Stored creation time of one tweet, if it exists.
    pub fn created_at(&self, tweet_id: &str) -> Result<Option<String>, StoreError> {
        let created_at = self
            .conn
            .query_row(
                "SELECT CREATED_AT FROM TWEET WHERE TWEET_ID = ?1",
                [tweet_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(created_at)
    }
}

impl EventStore for SqliteStore {
    fn load_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(TWEET.COORDINATES, PLACE.COORDINATES), TWEET.CREATED_AT
             FROM TWEET, PLACE
             WHERE TWEET.PLACE_ID = PLACE.PLACE_ID
             ORDER BY TWEET.ROWID ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RawRecord {
                coordinates: row.get(0)?,
                created_at: row.get(1)?,
            })
        })?;

        let records = rows.collect::<Result<Vec<_>, _>>()?;
        log::debug!("Loaded {} records from SQLite", records.len());
        Ok(records)
    }
}

fn encode_point(point: &Point<f64>) -> String {
    format!("[{}, {}]", point.x(), point.y())
}
