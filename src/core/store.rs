use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use crate::core::error::SniffError;
use crate::core::time::now_utc;
use crate::core::types::{HistoryEntry, SignalMap};

/// SQLite log of recorded scans.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn new(path: &Path) -> Result<Self, SniffError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, SniffError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), SniffError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS scans (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              fingerprint TEXT NOT NULL,
              url TEXT NOT NULL,
              risk_percentage INTEGER NOT NULL,
              recorded_at TEXT NOT NULL,
              features_json TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_scans_fingerprint ON scans(fingerprint);
            CREATE INDEX IF NOT EXISTS idx_scans_recorded_at ON scans(recorded_at);
            ",
        )?;
        Ok(())
    }

    pub fn record(&mut self, entry: &HistoryEntry) -> Result<i64, SniffError> {
        let features_json = serde_json::to_string(&entry.features)?;
        self.conn.execute(
            "INSERT INTO scans (fingerprint, url, risk_percentage, recorded_at, features_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.fingerprint,
                entry.url,
                entry.risk_percentage as i64,
                stored_timestamp(&entry.timestamp),
                features_json
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn record_all(&mut self, entries: &[HistoryEntry]) -> Result<usize, SniffError> {
        let tx = self.conn.transaction()?;
        for entry in entries {
            let features_json = serde_json::to_string(&entry.features)?;
            tx.execute(
                "INSERT INTO scans (fingerprint, url, risk_percentage, recorded_at, features_json)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.fingerprint,
                    entry.url,
                    entry.risk_percentage as i64,
                    stored_timestamp(&entry.timestamp),
                    features_json
                ],
            )?;
        }
        tx.commit()?;
        Ok(entries.len())
    }

    /// Newest `limit` entries, returned oldest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, SniffError> {
        let mut stmt = self.conn.prepare(
            "SELECT fingerprint, url, risk_percentage, recorded_at, features_json
             FROM scans ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            let (fingerprint, url, risk, recorded_at, features_json) = row?;
            out.push(HistoryEntry {
                timestamp: parse_timestamp(&recorded_at)?,
                url,
                fingerprint,
                risk_percentage: risk.clamp(0, 100) as u8,
                features: serde_json::from_str::<SignalMap>(&features_json)?,
            });
        }
        out.reverse();
        Ok(out)
    }

    pub fn count(&self) -> Result<u64, SniffError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))?;
        Ok(n as u64)
    }

    /// Deletes entries older than the retention window; 0 keeps everything.
    pub fn purge_older_than(&mut self, retention_days: u32) -> Result<usize, SniffError> {
        if retention_days == 0 {
            return Ok(0);
        }
        let cutoff = now_utc() - chrono::Duration::days(retention_days as i64);
        self.purge_before(&cutoff)
    }

    pub fn purge_before(&mut self, cutoff: &DateTime<Utc>) -> Result<usize, SniffError> {
        let removed = self.conn.execute(
            "DELETE FROM scans WHERE recorded_at < ?1",
            params![stored_timestamp(cutoff)],
        )?;
        Ok(removed)
    }

    /// Keeps only the newest `capacity` rows.
    pub fn trim_to(&mut self, capacity: usize) -> Result<usize, SniffError> {
        let removed = self.conn.execute(
            "DELETE FROM scans WHERE id NOT IN
             (SELECT id FROM scans ORDER BY id DESC LIMIT ?1)",
            params![capacity as i64],
        )?;
        Ok(removed)
    }
}

/// Fixed-width UTC form so text comparison orders like time.
fn stored_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, SniffError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SniffError::Db(format!("bad timestamp {}: {}", value, e)))
}
