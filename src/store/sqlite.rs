//! SQLite-backed result store.

use crate::constants::store::DATE_FORMAT;
use crate::error::Result;
use crate::health::HealthLabel;
use crate::store::{AnalysisRecord, ResultStore, StoreSummary};
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::{debug, info};

/// Result store in a single SQLite file.
pub struct SqliteResultStore {
    conn: Connection,
}

impl SqliteResultStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.ensure_schema()?;
        debug!("Opened result store at {}", path.display());
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS analysis_results (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              filename TEXT NOT NULL,
              temperature REAL NOT NULL,
              result TEXT NOT NULL,
              date TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    fn query_records(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<AnalysisRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(AnalysisRecord {
                id: row.get(0)?,
                filename: row.get(1)?,
                temperature: row.get(2)?,
                result: row.get(3)?,
                date: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl ResultStore for SqliteResultStore {
    fn save(&mut self, identifier: &str, temperature: f64, label: &str) -> Result<i64> {
        let date = chrono::Local::now().format(DATE_FORMAT).to_string();
        self.conn.execute(
            "INSERT INTO analysis_results (filename, temperature, result, date) VALUES (?1, ?2, ?3, ?4)",
            params![identifier, temperature, label, date],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("Saved result #{id}: {identifier} | {temperature:.2}°C | {label}");
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<AnalysisRecord>> {
        self.query_records(
            "SELECT id, filename, temperature, result, date FROM analysis_results ORDER BY id DESC",
            &[],
        )
    }

    fn search(&self, keyword: &str) -> Result<Vec<AnalysisRecord>> {
        let pattern = format!("%{keyword}%");
        self.query_records(
            "SELECT id, filename, temperature, result, date FROM analysis_results \
             WHERE date LIKE ?1 OR result LIKE ?1 ORDER BY id DESC",
            &[&pattern as &dyn rusqlite::ToSql],
        )
    }

    fn delete(&mut self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM analysis_results WHERE id = ?1", params![id])?;
        if removed > 0 {
            info!("Deleted result #{id}");
        }
        Ok(removed > 0)
    }

    fn summary(&self) -> Result<StoreSummary> {
        let mut stmt = self
            .conn
            .prepare("SELECT result, COUNT(*) FROM analysis_results GROUP BY result")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut summary = StoreSummary::default();
        for row in rows {
            let (result, count) = row?;
            let count = usize::try_from(count).unwrap_or(0);
            summary.total += count;
            match result.parse::<HealthLabel>() {
                Ok(HealthLabel::Healthy) => summary.healthy += count,
                Ok(HealthLabel::FeverOnly) => summary.fever_only += count,
                Ok(HealthLabel::SuspectedBirdFlu) => summary.suspected += count,
                Ok(HealthLabel::DetectionFailed) => summary.detection_failed += count,
                Err(_) => summary.other += count,
            }
        }
        Ok(summary)
    }
}
