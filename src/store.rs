//! SQLite weather store.
//!
//! One table, keyed by local timestamp. Loads are transactional upserts:
//! re-running for the same forecast hour overwrites the prior row, and a
//! failure partway through a batch rolls the whole batch back. Rows are
//! never deleted here; hours that age out of the forward window simply
//! accumulate.

use crate::transform::WeatherSample;
use chrono::{DateTime, FixedOffset};
use rusqlite::{params, Connection};
use std::path::Path;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad timestamp in table: {0:?}")]
    BadTimestamp(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// SQLite-backed sample store.
pub struct WeatherDb {
    conn: Connection,
}

impl WeatherDb {
    /// Open (or create) the database at the given path.
    ///
    /// Creates the parent directory and the table if absent. Timestamps
    /// are stored as RFC 3339 text; with one fixed offset per deployment
    /// they sort lexicographically in chronological order.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS weather (
                time           TEXT PRIMARY KEY,
                temperature_c  REAL NOT NULL,
                humidity       REAL NOT NULL,
                extracted_at   TEXT NOT NULL
            );",
        )?;

        Ok(Self { conn })
    }

    /// Upsert a batch of samples in one transaction.
    ///
    /// Insert on a new timestamp, overwrite every other column on an
    /// existing one. Returns the number of samples written.
    pub fn upsert_batch(&mut self, samples: &[WeatherSample]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO weather (time, temperature_c, humidity, extracted_at) \
                 VALUES (?1, ?2, ?3, ?4) \
                 ON CONFLICT(time) DO UPDATE SET \
                    temperature_c = excluded.temperature_c, \
                    humidity = excluded.humidity, \
                    extracted_at = excluded.extracted_at",
            )?;
            for sample in samples {
                stmt.execute(params![
                    sample.time.to_rfc3339(),
                    sample.temperature_c,
                    sample.humidity,
                    sample.extracted_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(samples.len())
    }

    /// Full-table scan, ordered by time ascending.
    pub fn all_samples(&self) -> Result<Vec<WeatherSample>> {
        let mut stmt = self.conn.prepare(
            "SELECT time, temperature_c, humidity, extracted_at \
             FROM weather ORDER BY time ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut samples = Vec::new();
        for row in rows {
            let (time, temperature_c, humidity, extracted_at) = row?;
            samples.push(WeatherSample {
                time: parse_stored(&time)?,
                temperature_c,
                humidity,
                extracted_at: parse_stored(&extracted_at)?,
            });
        }
        Ok(samples)
    }

    /// Number of rows in the table.
    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

fn parse_stored(ts: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(ts).map_err(|_| StoreError::BadTimestamp(ts.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use tempfile::tempdir;

    fn sample(hour: u32, temp: f64, hum: f64) -> WeatherSample {
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        WeatherSample {
            time: offset.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap(),
            temperature_c: temp,
            humidity: hum,
            extracted_at: offset.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn test_db() -> (WeatherDb, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = WeatherDb::open(&dir.path().join("test.db")).unwrap();
        (db, dir)
    }

    #[test]
    fn open_creates_table_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("weather.db");
        let db = WeatherDb::open(&db_path).unwrap();
        assert_eq!(db.count().unwrap(), 0);
        drop(db);
        WeatherDb::open(&db_path).unwrap(); // should not error
    }

    #[test]
    fn upsert_then_scan_round_trips_ordered() {
        let (mut db, _dir) = test_db();
        // Insert out of order; the scan must come back ascending.
        db.upsert_batch(&[sample(3, 22.0, 70.0), sample(1, 20.0, 80.0)])
            .unwrap();

        let all = db.all_samples().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].time < all[1].time);
        assert_eq!(all[0].temperature_c, 20.0);
        assert_eq!(all[1].humidity, 70.0);
    }

    #[test]
    fn reload_of_identical_batch_is_a_no_op() {
        let (mut db, _dir) = test_db();
        let batch = vec![sample(0, 20.1, 80.0), sample(1, 20.5, 78.0)];
        db.upsert_batch(&batch).unwrap();
        let before = db.all_samples().unwrap();

        db.upsert_batch(&batch).unwrap();
        let after = db.all_samples().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn upsert_overwrites_existing_key() {
        let (mut db, _dir) = test_db();
        db.upsert_batch(&[sample(0, 20.1, 80.0)]).unwrap();
        db.upsert_batch(&[sample(0, 25.9, 60.0)]).unwrap();

        let all = db.all_samples().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].temperature_c, 25.9);
        assert_eq!(all[0].humidity, 60.0);
    }

    #[test]
    fn uncommitted_transaction_leaves_prior_state() {
        let (mut db, _dir) = test_db();
        db.upsert_batch(&[sample(0, 20.1, 80.0)]).unwrap();

        // Simulate a run dying mid-batch: writes inside a transaction
        // that is dropped without commit must not become visible.
        {
            let tx = db.conn.transaction().unwrap();
            tx.execute(
                "INSERT INTO weather (time, temperature_c, humidity, extracted_at) \
                 VALUES (?1, ?2, ?3, ?4)",
                params!["2025-01-02T00:00:00+05:30", 99.0, 1.0, "2025-01-02T00:00:00+05:30"],
            )
            .unwrap();
            // dropped here, no commit
        }

        let all = db.all_samples().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].temperature_c, 20.1);
    }

    #[test]
    fn empty_batch_is_fine() {
        let (mut db, _dir) = test_db();
        assert_eq!(db.upsert_batch(&[]).unwrap(), 0);
        assert!(db.all_samples().unwrap().is_empty());
    }
}
