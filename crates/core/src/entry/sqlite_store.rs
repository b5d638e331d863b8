//! SQLite-backed entry store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, types::Type, Connection};

use super::{
    AidEntry, Analysis, EntryError, EntryFilter, EntryStatus, EntryStore, EscalationSnapshot,
    NewEntry,
};

const SELECT_COLUMNS: &str =
    "id, name, original_text, analysis, status, created_at, crisis_activated_at";

/// SQLite-backed entry store.
pub struct SqliteEntryStore {
    conn: Mutex<Connection>,
}

impl SqliteEntryStore {
    /// Create a new SQLite entry store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, EntryError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite entry store (useful for testing).
    pub fn in_memory() -> Result<Self, EntryError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), EntryError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                name TEXT,
                original_text TEXT NOT NULL,
                analysis TEXT NOT NULL,
                location TEXT,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL,
                crisis_activated_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_entries_location ON entries(location);
            CREATE INDEX IF NOT EXISTS idx_entries_status ON entries(status);
            "#,
        )?;
        Ok(())
    }

    fn build_where_clause(filter: &EntryFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref location) = filter.location {
            conditions.push("location = ?");
            params.push(Box::new(location.clone()));
        }

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            params.push(Box::new(status.as_str()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<AidEntry> {
        let id: String = row.get(0)?;
        let name: Option<String> = row.get(1)?;
        let original_text: String = row.get(2)?;
        let analysis_json: String = row.get(3)?;
        let status_str: String = row.get(4)?;
        let created_at_str: String = row.get(5)?;
        let crisis_activated_at_str: Option<String> = row.get(6)?;

        let analysis: Analysis = serde_json::from_str(&analysis_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        let status = status_str.parse().unwrap_or(EntryStatus::Active);

        // Timestamps are always written as RFC 3339 by this store
        let timestamp = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let crisis_activated_at = crisis_activated_at_str.and_then(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
        });

        Ok(AidEntry {
            id,
            name,
            original_text,
            analysis,
            status,
            timestamp,
            crisis_activated_at,
        })
    }
}

impl EntryStore for SqliteEntryStore {
    fn insert(&self, entry: NewEntry) -> Result<AidEntry, EntryError> {
        let conn = self.conn.lock().unwrap();

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();
        let status = EntryStatus::Active;

        let analysis_json = serde_json::to_string(&entry.analysis)
            .map_err(|e| EntryError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO entries (id, name, original_text, analysis, location, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                entry.name,
                entry.original_text,
                analysis_json,
                entry.analysis.location,
                status.as_str(),
                now.to_rfc3339(),
            ],
        )?;

        Ok(AidEntry {
            id,
            name: entry.name,
            original_text: entry.original_text,
            analysis: entry.analysis,
            status,
            timestamp: now,
            crisis_activated_at: None,
        })
    }

    fn get(&self, id: &str) -> Result<Option<AidEntry>, EntryError> {
        let conn = self.conn.lock().unwrap();

        let result = conn.query_row(
            &format!("SELECT {} FROM entries WHERE id = ?", SELECT_COLUMNS),
            params![id],
            Self::row_to_entry,
        );

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, filter: &EntryFilter) -> Result<Vec<AidEntry>, EntryError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT {} FROM entries {} ORDER BY seq ASC LIMIT ? OFFSET ?",
            SELECT_COLUMNS, where_clause
        );

        let mut stmt = conn.prepare(&sql)?;

        // SQLite treats a negative LIMIT as "no limit"
        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit.unwrap_or(-1)));
        all_params.push(Box::new(filter.offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt.query_map(param_refs.as_slice(), Self::row_to_entry)?;

        let mut entries = Vec::new();
        for row_result in rows {
            entries.push(row_result?);
        }

        Ok(entries)
    }

    fn count(&self, filter: &EntryFilter) -> Result<i64, EntryError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!("SELECT COUNT(*) FROM entries {}", where_clause);

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let count: i64 = conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))?;

        Ok(count)
    }

    fn escalate_location(
        &self,
        location: &str,
        at: DateTime<Utc>,
    ) -> Result<EscalationSnapshot, EntryError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        let active_entries = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {} FROM entries WHERE location = ? AND status = ? ORDER BY seq ASC",
                SELECT_COLUMNS
            ))?;
            let rows = stmt.query_map(
                params![location, EntryStatus::Active.as_str()],
                Self::row_to_entry,
            )?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let transitioned = tx.execute(
            "UPDATE entries SET status = ?, crisis_activated_at = COALESCE(crisis_activated_at, ?) WHERE location = ?",
            params![EntryStatus::CrisisMode.as_str(), at.to_rfc3339(), location],
        )?;

        tx.commit()?;

        Ok(EscalationSnapshot {
            active_entries,
            transitioned,
            activated_at: at,
        })
    }
}
