use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode};
use tracing::debug;

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Value};

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
///
/// Foreign keys are enforced on every connection it opens.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path)
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        register_functions(&conn)?;

        debug!("opened sqlite store at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        register_functions(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SQLError> {
        self.conn
            .lock()
            .map_err(|e| SQLError::Connection(e.to_string()))
    }
}

/// Register `fold(text)`: Unicode lowercase, NULL-preserving.
///
/// Built-in `LIKE` and `lower()` only fold ASCII; comparing `fold(a) LIKE
/// fold(b)` gives a case-insensitive match for every script.
fn register_functions(conn: &Connection) -> Result<(), SQLError> {
    conn.create_scalar_function(
        "fold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
    .map_err(|e| SQLError::Connection(e.to_string()))
}

fn bind_params(params: &[Value]) -> Vec<Box<dyn rusqlite::types::ToSql + '_>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + '_> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Text(s) => Box::new(s.as_str()),
            }
        })
        .collect()
}

/// Classify a rusqlite failure, splitting out constraint violations so
/// callers can tell "duplicate" from "broken".
fn classify(e: rusqlite::Error, fallback: fn(String) -> SQLError) -> SQLError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            SQLError::Constraint(e.to_string())
        }
        _ => fallback(e.to_string()),
    }
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self.lock()?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let mut columns = Vec::with_capacity(column_names.len());
                for (i, name) in column_names.iter().enumerate() {
                    columns.push((name.clone(), row_value_at(row, i)?));
                }
                Ok(Row { columns })
            })
            .map_err(|e| classify(e, SQLError::Query))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| classify(e, SQLError::Query))
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self.lock()?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        let affected = conn
            .execute(sql, param_refs.as_slice())
            .map_err(|e| classify(e, SQLError::Execution))?;

        Ok(affected as u64)
    }

    fn exec_batch(&self, sql: &str) -> Result<(), SQLError> {
        self.lock()?
            .execute_batch(sql)
            .map_err(|e| classify(e, SQLError::Execution))
    }
}

/// Read the column at `idx` using its storage class.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Value> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        // Counters and ids never hold reals or blobs; render them as text.
        ValueRef::Real(f) => Value::Text(f.to_string()),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Text(String::from_utf8_lossy(b).into_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .exec_batch(
                "CREATE TABLE parents (id TEXT PRIMARY KEY, n INTEGER NOT NULL DEFAULT 0);
                 CREATE TABLE children (
                     id TEXT PRIMARY KEY,
                     parent_id TEXT NOT NULL REFERENCES parents(id) ON DELETE CASCADE
                 );",
            )
            .unwrap();
        store
    }

    #[test]
    fn exec_and_query() {
        let store = store();
        let n = store.exec("INSERT INTO parents (id) VALUES (?1)", &[Value::from("a")]).unwrap();
        assert_eq!(n, 1);

        let rows = store.query("SELECT id, n FROM parents", &[]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get_str("id"), Some("a"));
        assert_eq!(rows[0].get_i64("n"), Some(0));
    }

    #[test]
    fn null_round_trips() {
        let store = store();
        let row = store
            .query_opt("SELECT NULL AS x, ?1 AS y", &[Value::Null])
            .unwrap()
            .unwrap();
        assert_eq!(row.get("x"), Some(&Value::Null));
        assert_eq!(row.get("y"), Some(&Value::Null));
    }

    #[test]
    fn unique_violation_is_classified() {
        let store = store();
        store.exec("INSERT INTO parents (id) VALUES ('a')", &[]).unwrap();
        let err = store.exec("INSERT INTO parents (id) VALUES ('a')", &[]).unwrap_err();
        assert!(err.is_unique_violation(), "{err}");
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let store = store();
        let err = store
            .exec("INSERT INTO children (id, parent_id) VALUES ('c', 'missing')", &[])
            .unwrap_err();
        assert!(matches!(err, SQLError::Constraint(_)));

        store.exec("INSERT INTO parents (id) VALUES ('a')", &[]).unwrap();
        store.exec("INSERT INTO children (id, parent_id) VALUES ('c', 'a')", &[]).unwrap();
        store.exec("DELETE FROM parents WHERE id = 'a'", &[]).unwrap();
        assert!(store.query("SELECT id FROM children", &[]).unwrap().is_empty());
    }

    #[test]
    fn fold_lowercases_unicode() {
        let store = store();
        let row = store
            .query_opt(
                "SELECT fold(?1) AS f, fold(NULL) AS n, fold('ÉCOLE') LIKE fold('%école%') AS m",
                &[Value::from("Ünïcode ÉCOLE")],
            )
            .unwrap()
            .unwrap();
        assert_eq!(row.get_str("f"), Some("ünïcode école"));
        assert_eq!(row.get("n"), Some(&Value::Null));
        assert_eq!(row.get_i64("m"), Some(1));
    }

    #[test]
    fn open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        {
            let store = SqliteStore::open(&path).unwrap();
            store.exec_batch("CREATE TABLE t (id TEXT PRIMARY KEY)").unwrap();
            store.exec("INSERT INTO t (id) VALUES ('x')", &[]).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        let row = store.query_opt("SELECT id FROM t", &[]).unwrap().unwrap();
        assert_eq!(row.get_str("id"), Some("x"));
    }
}
