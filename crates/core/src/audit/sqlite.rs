use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::{AuditError, AuditEvent, AuditFilter, AuditRecord, AuditStore};

/// SQLite-backed audit store
pub struct SqliteAuditStore {
    conn: Mutex<Connection>,
}

impl SqliteAuditStore {
    /// Create a new SQLite audit store, creating the database file and tables if needed
    pub fn new(path: &Path) -> Result<Self, AuditError> {
        let conn = Connection::open(path).map_err(|e| AuditError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite audit store (useful for testing)
    pub fn in_memory() -> Result<Self, AuditError> {
        let conn = Connection::open_in_memory().map_err(|e| AuditError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), AuditError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS audit_events (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                event_type TEXT NOT NULL,
                entry_id TEXT,
                location TEXT,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_audit_events_timestamp ON audit_events(timestamp);
            CREATE INDEX IF NOT EXISTS idx_audit_events_entry_id ON audit_events(entry_id);
            CREATE INDEX IF NOT EXISTS idx_audit_events_location ON audit_events(location);
            CREATE INDEX IF NOT EXISTS idx_audit_events_event_type ON audit_events(event_type);
            "#,
        )
        .map_err(|e| AuditError::Database(e.to_string()))
    }

    fn build_where_clause(filter: &AuditFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref entry_id) = filter.entry_id {
            conditions.push("entry_id = ?");
            params.push(Box::new(entry_id.clone()));
        }

        if let Some(ref location) = filter.location {
            conditions.push("location = ?");
            params.push(Box::new(location.clone()));
        }

        if let Some(ref event_type) = filter.event_type {
            conditions.push("event_type = ?");
            params.push(Box::new(event_type.clone()));
        }

        if let Some(ref from) = filter.from {
            conditions.push("timestamp >= ?");
            params.push(Box::new(from.to_rfc3339()));
        }

        if let Some(ref to) = filter.to {
            conditions.push("timestamp <= ?");
            params.push(Box::new(to.to_rfc3339()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }
}

impl AuditStore for SqliteAuditStore {
    fn insert(&self, record: &AuditRecord) -> Result<i64, AuditError> {
        let conn = self.conn.lock().unwrap();

        let data_json = serde_json::to_string(&record.data)
            .map_err(|e| AuditError::Serialization(e.to_string()))?;

        conn.execute(
            "INSERT INTO audit_events (timestamp, event_type, entry_id, location, data) VALUES (?, ?, ?, ?, ?)",
            params![
                record.timestamp.to_rfc3339(),
                record.event_type,
                record.entry_id,
                record.location,
                data_json,
            ],
        )
        .map_err(|e| AuditError::Database(e.to_string()))?;

        Ok(conn.last_insert_rowid())
    }

    fn query(&self, filter: &AuditFilter) -> Result<Vec<AuditRecord>, AuditError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT id, timestamp, event_type, entry_id, location, data FROM audit_events {} ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?",
            where_clause
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| AuditError::Database(e.to_string()))?;

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));

        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(|e| AuditError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row_result in rows {
            let (id, timestamp_str, event_type, entry_id, location, data_json) =
                row_result.map_err(|e| AuditError::Database(e.to_string()))?;

            let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|e| AuditError::Database(format!("Invalid timestamp: {}", e)))?
                .into();

            let data: AuditEvent = serde_json::from_str(&data_json)
                .map_err(|e| AuditError::Serialization(e.to_string()))?;

            records.push(AuditRecord {
                id,
                timestamp,
                event_type,
                entry_id,
                location,
                data,
            });
        }

        Ok(records)
    }

    fn count(&self, filter: &AuditFilter) -> Result<i64, AuditError> {
        let conn = self.conn.lock().unwrap();

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!("SELECT COUNT(*) FROM audit_events {}", where_clause);

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| AuditError::Database(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_store() -> SqliteAuditStore {
        SqliteAuditStore::in_memory().unwrap()
    }

    fn record_for(event: AuditEvent) -> AuditRecord {
        AuditRecord {
            id: 0,
            timestamp: Utc::now(),
            event_type: event.event_type().to_string(),
            entry_id: event.entry_id().map(String::from),
            location: event.location().map(String::from),
            data: event,
        }
    }

    fn service_started() -> AuditRecord {
        record_for(AuditEvent::ServiceStarted {
            version: "0.1.0".to_string(),
            config_hash: "abc123".to_string(),
        })
    }

    fn entry_submitted(entry_id: &str, location: &str) -> AuditRecord {
        record_for(AuditEvent::EntrySubmitted {
            entry_id: entry_id.to_string(),
            name: None,
            location: Some(location.to_string()),
            need: true,
            priority: "high".to_string(),
            items: 1,
        })
    }

    #[test]
    fn test_insert_and_query() {
        let store = create_test_store();
        let id = store.insert(&service_started()).unwrap();
        assert!(id > 0);

        let results = store.query(&AuditFilter::new()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, id);
        assert_eq!(results[0].event_type, "service_started");
    }

    #[test]
    fn test_query_by_event_type() {
        let store = create_test_store();
        store.insert(&service_started()).unwrap();
        store.insert(&entry_submitted("e-1", "İzmir")).unwrap();
        store.insert(&entry_submitted("e-2", "Ankara")).unwrap();

        let results = store
            .query(&AuditFilter::new().with_event_type("entry_submitted"))
            .unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_query_by_entry_id_and_location() {
        let store = create_test_store();
        store.insert(&entry_submitted("e-1", "İzmir")).unwrap();
        store.insert(&entry_submitted("e-2", "İzmir")).unwrap();
        store.insert(&entry_submitted("e-3", "Ankara")).unwrap();

        let results = store.query(&AuditFilter::new().with_entry_id("e-1")).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].entry_id.as_deref(), Some("e-1"));

        let results = store.query(&AuditFilter::new().with_location("İzmir")).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_query_newest_first() {
        let store = create_test_store();
        store.insert(&entry_submitted("e-1", "Van")).unwrap();
        store.insert(&entry_submitted("e-2", "Van")).unwrap();

        let results = store.query(&AuditFilter::new()).unwrap();
        assert_eq!(results[0].entry_id.as_deref(), Some("e-2"));
    }

    #[test]
    fn test_query_with_time_range() {
        let store = create_test_store();

        let now = Utc::now();
        let mut old_record = service_started();
        old_record.timestamp = now - Duration::hours(2);
        store.insert(&old_record).unwrap();

        let mut new_record = service_started();
        new_record.timestamp = now;
        store.insert(&new_record).unwrap();

        let filter = AuditFilter::new().with_time_range(Some(now - Duration::hours(1)), None);
        assert_eq!(store.query(&filter).unwrap().len(), 1);
    }

    #[test]
    fn test_pagination_and_count() {
        let store = create_test_store();
        for i in 0..5 {
            store
                .insert(&entry_submitted(&format!("e-{}", i), "Bursa"))
                .unwrap();
        }

        let page = store
            .query(&AuditFilter::new().with_limit(2).with_offset(4))
            .unwrap();
        assert_eq!(page.len(), 1);

        assert_eq!(store.count(&AuditFilter::new().with_limit(2)).unwrap(), 5);
        assert_eq!(
            store
                .count(&AuditFilter::new().with_event_type("service_started"))
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("audit.db");

        let store = SqliteAuditStore::new(&db_path).unwrap();
        store.insert(&service_started()).unwrap();
        assert!(db_path.exists());
        assert_eq!(store.query(&AuditFilter::new()).unwrap().len(), 1);
    }
}
