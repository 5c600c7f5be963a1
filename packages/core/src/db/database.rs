//! Store bootstrap: opening the libsql file, creating the tree schema and
//! handing out configured connections.
//!
//! # Architecture
//!
//! - **Any location**: the file path comes from `StoreConfig`
//! - **WAL journal**: readers keep going while one writer holds the lock
//! - **Foreign keys**: Enabled on every connection; they drive subtree deletion
//! - **Idempotent schema**: `CREATE TABLE IF NOT EXISTS` on every open
//!
//! # Tables
//!
//! - `nodes`: adjacency list, `parent_id` cascades on delete
//! - `node_closure`: every (ancestor, descendant, depth) triple, cascading on both ends
//! - `payload_<type>`: one typed payload table per `NodeType`, keyed by node id
//!
//! # Connection Patterns
//!
//! Use `connect_with_timeout()` for reads and `begin()` for anything that writes.
//! Every write runs on its own connection inside a `UnitOfWork`, so dropping the
//! unit (or the future that owns it) discards uncommitted work.

use crate::config::StoreConfig;
use crate::db::error::DatabaseError;
use crate::db::transaction::UnitOfWork;
use crate::models::NodeType;
use libsql::{Builder, Database};
use std::path::PathBuf;
use std::sync::Arc;

/// Database service for managing the libsql database and schema
///
/// # Examples
///
/// ```no_run
/// use heattree_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = DatabaseService::new(PathBuf::from("/var/lib/heattree/tree.db")).await?;
///     let conn = store.connect_with_timeout().await?;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Location of the SQLite file
    pub db_path: PathBuf,

    busy_timeout_ms: u64,
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService")
            .field("db_path", &self.db_path)
            .field("busy_timeout_ms", &self.busy_timeout_ms)
            .finish()
    }
}

impl DatabaseService {
    /// Open (or create) the database at `db_path` with default settings
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        Self::open(&StoreConfig::new(db_path)).await
    }

    /// Open (or create) the database described by `config`
    ///
    /// Creates missing parent directories, then the file, then any missing
    /// tables and indexes. Opening an existing store leaves its rows alone.
    ///
    /// # Errors
    ///
    /// `PermissionDenied` / `DirectoryCreationFailed` for the directory,
    /// `ConnectionFailed` for the file, `InitializationFailed` for the schema.
    pub async fn open(config: &StoreConfig) -> Result<Self, DatabaseError> {
        let db_path = config.database_path.clone();
        let is_new_store = !db_path.exists();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::DirectoryCreationFailed(e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::connection_failed(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
            busy_timeout_ms: config.busy_timeout_ms,
        };

        service.initialize_schema(is_new_store).await?;

        tracing::info!(
            "Opened record tree database at {} (new: {})",
            service.db_path.display(),
            is_new_store
        );

        Ok(service)
    }

    /// Run a PRAGMA through `query()` (some pragmas answer with a row) and
    /// step it once.
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut rows = conn.query(pragma, ()).await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        rows.next().await.map_err(|e| {
            DatabaseError::sql_execution(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// `nodes`, `node_closure`, the payload tables and their indexes; every
    /// statement is `IF NOT EXISTS`.
    async fn initialize_schema(&self, is_new_store: bool) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        let node_types = NodeType::ALL
            .iter()
            .map(|t| format!("'{}'", t.as_str()))
            .collect::<Vec<_>>()
            .join(", ");

        // AUTOINCREMENT keeps ids of deleted nodes from being handed out again
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS nodes (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    node_type TEXT NOT NULL CHECK (node_type IN ({})),
                    parent_id INTEGER,
                    path TEXT NOT NULL,
                    data_status TEXT NOT NULL DEFAULT 'new'
                        CHECK (data_status IN ('new', 'old', 'opened')),
                    description TEXT,
                    created_at TEXT NOT NULL,
                    modified_at TEXT NOT NULL,
                    -- Deleting a node removes its whole subtree
                    FOREIGN KEY (parent_id) REFERENCES nodes(id) ON DELETE CASCADE
                )",
                node_types
            ),
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!("Failed to create nodes table: {}", e))
        })?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS node_closure (
                ancestor_id INTEGER NOT NULL,
                descendant_id INTEGER NOT NULL,
                depth INTEGER NOT NULL CHECK (depth >= 0),
                PRIMARY KEY (ancestor_id, descendant_id),
                FOREIGN KEY (ancestor_id) REFERENCES nodes(id) ON DELETE CASCADE,
                FOREIGN KEY (descendant_id) REFERENCES nodes(id) ON DELETE CASCADE
            ) WITHOUT ROWID",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::initialization_failed(format!(
                "Failed to create node_closure table: {}",
                e
            ))
        })?;

        for node_type in NodeType::ALL {
            let table = node_type.payload_table();
            conn.execute(
                &format!(
                    "CREATE TABLE IF NOT EXISTS {} (
                        node_id INTEGER PRIMARY KEY,
                        data TEXT NOT NULL DEFAULT '{{}}',
                        updated_at TEXT NOT NULL,
                        FOREIGN KEY (node_id) REFERENCES nodes(id) ON DELETE CASCADE
                    )",
                    table
                ),
                (),
            )
            .await
            .map_err(|e| {
                DatabaseError::initialization_failed(format!(
                    "Failed to create {} table: {}",
                    table, e
                ))
            })?;
        }

        self.create_core_indexes(&conn).await?;

        // Flush the fresh schema out of the WAL so later connections see it at once
        if is_new_store {
            self.execute_pragma(&conn, "PRAGMA wal_checkpoint(TRUNCATE)")
                .await?;
        }

        Ok(())
    }

    /// Create core indexes for the node and closure tables
    async fn create_core_indexes(&self, conn: &libsql::Connection) -> Result<(), DatabaseError> {
        let indexes = [
            // Adjacency lookups and the parent_id cascade
            (
                "idx_nodes_parent",
                "CREATE INDEX IF NOT EXISTS idx_nodes_parent ON nodes(parent_id)",
            ),
            (
                "idx_nodes_type",
                "CREATE INDEX IF NOT EXISTS idx_nodes_type ON nodes(node_type)",
            ),
            (
                "idx_nodes_modified",
                "CREATE INDEX IF NOT EXISTS idx_nodes_modified ON nodes(modified_at)",
            ),
            // Ancestor queries and the descendant_id cascade
            (
                "idx_closure_descendant",
                "CREATE INDEX IF NOT EXISTS idx_closure_descendant ON node_closure(descendant_id, depth)",
            ),
        ];

        for (name, sql) in indexes {
            conn.execute(sql, ()).await.map_err(|e| {
                DatabaseError::initialization_failed(format!(
                    "Failed to create index '{}': {}",
                    name, e
                ))
            })?;
        }

        Ok(())
    }

    /// Get a raw connection without pragmas applied
    ///
    /// Foreign keys are OFF on such a connection; prefer `connect_with_timeout()`.
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::LibsqlError)
    }

    /// Get a connection with busy timeout and foreign keys configured
    ///
    /// SQLite scopes both settings to the connection, so every connection the
    /// store hands out goes through here. Without `foreign_keys = ON` deletes
    /// would not cascade to children, closure rows or payloads.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(
            &conn,
            &format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms),
        )
        .await?;
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        Ok(conn)
    }

    /// Open a write transaction on a fresh connection
    pub async fn begin(&self) -> Result<UnitOfWork, DatabaseError> {
        let conn = self.connect_with_timeout().await?;
        UnitOfWork::begin(conn).await
    }
}
