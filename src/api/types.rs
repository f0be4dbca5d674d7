use crate::db::SqlitePool;

/// Shared state handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct ApiContext {
    pub pool: SqlitePool,
}

impl ApiContext {
    pub fn new(pool: SqlitePool) -> Self {
        ApiContext { pool }
    }
}
