//! Unit of Work
//!
//! Wraps one connection in one SQLite transaction. Every multi-row mutation of
//! the tree (node row, closure rows, payload row, path propagation) runs inside
//! a single `UnitOfWork` so either all of it becomes visible or none of it does.
//!
//! The transaction is opened with `BEGIN IMMEDIATE`: the write lock is taken
//! before the first read, so two writers that both read `ancestorsOf(parent)`
//! and then insert are serialized by the store instead of interleaving.
//!
//! A unit that is dropped while still open takes its connection with it and
//! SQLite rolls the transaction back when the connection closes. This is the
//! only rollback a cancelled operation gets: when the future owning the unit
//! is dropped mid-operation (timeout, aborted task), `rollback()` never runs
//! and `Drop` cannot await, so nothing but the connection close undoes the
//! partial writes. A unit must therefore never share its connection.

use crate::db::error::DatabaseError;
use libsql::Connection;

pub struct UnitOfWork {
    conn: Connection,
    open: bool,
}

impl UnitOfWork {
    /// Start an immediate transaction on `conn`
    pub async fn begin(conn: Connection) -> Result<Self, DatabaseError> {
        conn.execute("BEGIN IMMEDIATE", ())
            .await
            .map_err(|e| DatabaseError::transaction("begin", e))?;
        Ok(Self { conn, open: true })
    }

    /// Connection bound to this transaction
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub async fn commit(mut self) -> Result<(), DatabaseError> {
        self.open = false;
        if let Err(e) = self.conn.execute("COMMIT", ()).await {
            // A failed COMMIT can leave the transaction open; make sure it is not
            let _rollback = self.conn.execute("ROLLBACK", ()).await;
            return Err(DatabaseError::transaction("commit", e));
        }
        Ok(())
    }

    pub async fn rollback(mut self) -> Result<(), DatabaseError> {
        self.open = false;
        self.conn
            .execute("ROLLBACK", ())
            .await
            .map_err(|e| DatabaseError::transaction("rollback", e))?;
        Ok(())
    }

    /// Commit if `result` is Ok, roll back otherwise, and hand `result` back.
    ///
    /// A commit failure replaces the Ok value with the commit error. A rollback
    /// failure is logged; the caller still sees the original error.
    pub async fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback().await {
                    tracing::warn!("Rollback after failed operation also failed: {}", rollback_err);
                }
                Err(err)
            }
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.open {
            tracing::debug!("Unit of work dropped while open; discarding its transaction");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::db::DatabaseService;
    use tempfile::TempDir;

    async fn node_count(db: &DatabaseService) -> i64 {
        let conn = db.connect_with_timeout().await.unwrap();
        let mut rows = conn.query("SELECT COUNT(*) FROM nodes", ()).await.unwrap();
        rows.next().await.unwrap().unwrap().get(0).unwrap()
    }

    async fn insert_root(conn: &libsql::Connection, name: &str) {
        conn.execute(
            "INSERT INTO nodes (name, node_type, path, created_at, modified_at)
             VALUES (?1, 'client', '/' || ?1, '2024-01-01T00:00:00.000000Z', '2024-01-01T00:00:00.000000Z')",
            libsql::params![name],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_dropped_unit_discards_writes_and_releases_lock() {
        let temp_dir = TempDir::new().unwrap();
        let db = DatabaseService::new(temp_dir.path().join("test.db"))
            .await
            .unwrap();

        let uow = db.begin().await.unwrap();
        insert_root(uow.conn(), "Acme").await;
        drop(uow);

        assert_eq!(node_count(&db).await, 0);

        // The write lock went away with the connection
        let uow = db.begin().await.unwrap();
        insert_root(uow.conn(), "Globex").await;
        uow.commit().await.unwrap();
        assert_eq!(node_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_writes() {
        let temp_dir = TempDir::new().unwrap();
        let db = DatabaseService::new(temp_dir.path().join("test.db"))
            .await
            .unwrap();

        let uow = db.begin().await.unwrap();
        insert_root(uow.conn(), "Acme").await;
        uow.rollback().await.unwrap();

        assert_eq!(node_count(&db).await, 0);
    }
}
