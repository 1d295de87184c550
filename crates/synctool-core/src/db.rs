use crate::schema::{quote_ident, FieldKind, ModelDef, ModelSpec};
use crate::{Queryset, Result, SyncError};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};
use synctool_models::{Pk, SyncRecord};
use tracing::debug;

const META_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS synctool_sync_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL,
    records INTEGER NOT NULL,
    synced_at INTEGER NOT NULL
);
"#;

/// A sync log row.
#[derive(Debug, Clone)]
pub struct SyncLogEntry {
    pub id: i64,
    pub url: String,
    pub records: u64,
    pub synced_at: i64,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        conn.execute_batch(META_SQL)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs arbitrary DDL/DML. Used for table setup in operator tooling
    /// and tests.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(sql)?;
        Ok(())
    }

    /// Resolves a [`ModelSpec`] against the live schema.
    pub fn introspect(&self, spec: &ModelSpec) -> Result<ModelDef> {
        let conn = self.conn.lock().unwrap();
        ModelDef::introspect(&conn, spec)
    }

    /// Evaluates a queryset into feed records, ordered by primary key.
    pub fn query(&self, model: &ModelDef, queryset: &Queryset) -> Result<Vec<SyncRecord>> {
        let conn = self.conn.lock().unwrap();

        let mut columns = vec![quote_ident(&model.pk_column)];
        columns.extend(model.fields.iter().map(|f| quote_ident(&f.name)));

        let mut sql = format!(
            "SELECT {} FROM {}",
            columns.join(", "),
            quote_ident(&model.table),
        );
        if let Some(filter) = &queryset.filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }
        sql.push_str(&format!(" ORDER BY {}", quote_ident(&model.pk_column)));

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;

        let label = model.label().to_string();
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let pk = match row.get_ref(0)? {
                ValueRef::Integer(n) => Pk::Int(n),
                ValueRef::Text(t) => Pk::Text(String::from_utf8_lossy(t).into_owned()),
                _ => {
                    return Err(SyncError::UnsupportedColumn {
                        table: model.table.clone(),
                        column: model.pk_column.clone(),
                    })
                }
            };

            let mut fields = Map::new();
            for (idx, field) in model.fields.iter().enumerate() {
                let value = read_value(row.get_ref(idx + 1)?, field.kind, model, &field.name)?;
                fields.insert(field.name.clone(), value);
            }

            records.push(SyncRecord {
                model: label.clone(),
                pk,
                fields,
            });
        }

        Ok(records)
    }

    /// Upserts one feed record into the model's table.
    ///
    /// Every feed field must be a column; columns the feed omits are set
    /// to NULL.
    pub fn save_record(&self, model: &ModelDef, record: &SyncRecord) -> Result<()> {
        for name in record.fields.keys() {
            if model.field(name).is_none() {
                return Err(SyncError::UnknownField {
                    model: record.model.clone(),
                    field: name.clone(),
                });
            }
        }

        let conn = self.conn.lock().unwrap();

        let mut columns = vec![quote_ident(&model.pk_column)];
        columns.extend(model.fields.iter().map(|f| quote_ident(&f.name)));
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();

        let sql = format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
            quote_ident(&model.table),
            columns.join(", "),
            placeholders.join(", "),
        );

        let mut values: Vec<rusqlite::types::Value> = Vec::with_capacity(columns.len());
        values.push(bind_pk(&record.pk));
        for field in &model.fields {
            let value = record.fields.get(&field.name).unwrap_or(&Value::Null);
            values.push(bind_value(value)?);
        }

        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.execute(rusqlite::params_from_iter(values))?;

        Ok(())
    }

    /// Removes every row of the model.
    pub fn delete_all(&self, model: &ModelDef) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(&format!("DELETE FROM {}", quote_ident(&model.table)), [])?;
        Ok(deleted)
    }

    pub fn count(&self, model: &ModelDef) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(&model.table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Re-synchronizes the AUTOINCREMENT counter for the model's table
    /// after inserts with explicit primary keys.
    ///
    /// Tables without an entry in `sqlite_sequence` (plain rowid tables,
    /// text primary keys) are left alone; their counters self-correct.
    pub fn reset_sequence(&self, model: &ModelDef) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        let has_sequence_table: bool = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'sqlite_sequence'",
            [],
            |row| row.get::<_, i64>(0).map(|c| c > 0),
        )?;
        if !has_sequence_table {
            return Ok(());
        }

        let updated = conn.execute(
            &format!(
                "UPDATE sqlite_sequence SET seq = (SELECT COALESCE(MAX({}), 0) FROM {}) WHERE name = ?1",
                quote_ident(&model.pk_column),
                quote_ident(&model.table),
            ),
            [&model.table],
        )?;

        if updated == 0 {
            debug!(table = %model.table, "no sequence entry, skipping reset");
        }

        Ok(())
    }

    /// Appends a row to the sync history.
    pub fn record_sync(&self, url: &str, records: u64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO synctool_sync_log (url, records, synced_at) VALUES (?1, ?2, ?3)",
            params![url, records as i64, chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// The most recent sync, if any.
    pub fn last_sync(&self) -> Result<Option<SyncLogEntry>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, url, records, synced_at FROM synctool_sync_log ORDER BY id DESC LIMIT 1",
        )?;

        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(SyncLogEntry {
                id: row.get(0)?,
                url: row.get(1)?,
                records: row.get::<_, i64>(2)? as u64,
                synced_at: row.get(3)?,
            })),
            None => Ok(None),
        }
    }
}

fn read_value(value: ValueRef<'_>, kind: FieldKind, model: &ModelDef, column: &str) -> Result<Value> {
    let value = match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::from(n),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => {
            let text = String::from_utf8_lossy(t).into_owned();
            match kind {
                FieldKind::Json => serde_json::from_str(&text)?,
                _ => Value::String(text),
            }
        }
        ValueRef::Blob(_) => {
            return Err(SyncError::UnsupportedColumn {
                table: model.table.clone(),
                column: column.to_string(),
            })
        }
    };

    Ok(value)
}

fn bind_pk(pk: &Pk) -> rusqlite::types::Value {
    match pk {
        Pk::Int(n) => rusqlite::types::Value::Integer(*n),
        Pk::Text(s) => rusqlite::types::Value::Text(s.clone()),
    }
}

fn bind_value(value: &Value) -> Result<rusqlite::types::Value> {
    let bound = match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Bool(b) => rusqlite::types::Value::Integer(*b as i64),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                rusqlite::types::Value::Integer(i)
            } else {
                rusqlite::types::Value::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => rusqlite::types::Value::Text(s.clone()),
        // Nested values (m2m pk lists and the like) are stored as JSON text.
        Value::Array(_) | Value::Object(_) => {
            rusqlite::types::Value::Text(serde_json::to_string(value)?)
        }
    };

    Ok(bound)
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod db_tests;
