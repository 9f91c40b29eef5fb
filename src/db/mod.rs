//! Database module - SQLite log of performed sets

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::exercises::canonical_name;
use crate::session::{Session, group_sessions};

/// Performed set record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedSet {
    pub id: Option<i64>,
    pub date: DateTime<Utc>,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub target_reps: Option<u32>, // Reps the plan asked for
    pub rpe: Option<f64>,         // Self-reported effort, 1-10
    pub notes: Option<String>,
}

/// Database wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Throwaway database for tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS sets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                exercise TEXT NOT NULL,
                weight REAL NOT NULL,
                reps INTEGER NOT NULL,
                target_reps INTEGER,
                rpe REAL,
                notes TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sets_exercise ON sets (exercise, date)",
            [],
        )?;

        Ok(())
    }

    /// Add new set record under the lift's catalog name
    pub fn add_set(&self, set: &LoggedSet) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sets (date, exercise, weight, reps, target_reps, rpe, notes) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                set.date.to_rfc3339(),
                canonical_name(&set.exercise),
                set.weight,
                set.reps,
                set.target_reps,
                set.rpe,
                set.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all sets, newest first
    pub fn get_sets(&self) -> Result<Vec<LoggedSet>> {
        self.query_sets(
            "SELECT id, date, exercise, weight, reps, target_reps, rpe, notes FROM sets ORDER BY date DESC, id DESC",
            None,
        )
    }

    /// Get sets for one exercise (any alias), newest first
    pub fn get_sets_for(&self, exercise: &str) -> Result<Vec<LoggedSet>> {
        self.query_sets(
            "SELECT id, date, exercise, weight, reps, target_reps, rpe, notes FROM sets WHERE exercise = ?1 ORDER BY date DESC, id DESC",
            Some(&canonical_name(exercise)),
        )
    }

    /// Sessions for one exercise, oldest first
    pub fn sessions_for(&self, exercise: &str) -> Result<Vec<Session>> {
        let mut sets = self.get_sets_for(exercise)?;
        sets.reverse();
        Ok(group_sessions(&sets))
    }

    fn query_sets(&self, sql: &str, exercise: Option<&str>) -> Result<Vec<LoggedSet>> {
        let mut stmt = self.conn.prepare(sql)?;

        let sets = match exercise {
            Some(name) => stmt
                .query_map(params![name], Self::map_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], Self::map_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(sets)
    }

    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LoggedSet> {
        let date_str: String = row.get(1)?;
        Ok(LoggedSet {
            id: Some(row.get(0)?),
            date: DateTime::parse_from_rfc3339(&date_str)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?,
            exercise: row.get(2)?,
            weight: row.get(3)?,
            reps: row.get(4)?,
            target_reps: row.get(5)?,
            rpe: row.get(6)?,
            notes: row.get(7)?,
        })
    }
}
