//! Managed SQLite connection pool.
//!
//! Handlers check a connection out at entry and the guard returns it to the
//! idle set on drop, so release happens on every exit path including errors.
//! Checkout opens a fresh connection when the idle set is empty; the idle set
//! is capped to avoid holding file handles the service no longer needs.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use super::sqlite::open_database;
use super::DatabaseError;

const MAX_IDLE: usize = 8;

struct PoolInner {
    path: PathBuf,
    idle: Mutex<Vec<Connection>>,
}

/// Shared handle to the patient database. Cheap to clone.
#[derive(Clone)]
pub struct SqlitePool {
    inner: Arc<PoolInner>,
}

impl SqlitePool {
    /// Create a pool for the database at `path`, running migrations once
    /// through an initial connection that seeds the idle set.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = open_database(path)?;
        let pool = SqlitePool {
            inner: Arc::new(PoolInner {
                path: path.to_path_buf(),
                idle: Mutex::new(vec![conn]),
            }),
        };
        Ok(pool)
    }

    /// Check a connection out. Reuses an idle connection when one exists,
    /// otherwise opens a new one against the already-migrated database.
    pub fn checkout(&self) -> Result<PooledConnection, DatabaseError> {
        let reused = {
            let mut idle = self
                .inner
                .idle
                .lock()
                .map_err(|_| DatabaseError::Pool("idle set lock poisoned".into()))?;
            idle.pop()
        };

        let conn = match reused {
            Some(conn) => conn,
            None => {
                let conn = Connection::open(&self.inner.path)?;
                conn.execute_batch("PRAGMA foreign_keys=ON;")?;
                conn
            }
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(&self.inner),
        })
    }

    #[cfg(test)]
    fn idle_count(&self) -> usize {
        self.inner.idle.lock().unwrap().len()
    }
}

/// Checked-out connection. Derefs to `rusqlite::Connection` and returns
/// itself to the pool when dropped.
pub struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<PoolInner>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection taken before drop")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().expect("connection taken before drop")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Ok(mut idle) = self.pool.idle.lock() {
                if idle.len() < MAX_IDLE {
                    idle.push(conn);
                }
                // Over the cap (or poisoned lock): the connection just closes.
            }
        }
    }
}
