//! The connection handle.
//!
//! [`Database`] owns one connection and remembers the outcome of the last
//! statement it executed: the returned rows, the affected-row count and the
//! last error text. Reading the rows back is a separate step ([`Database::fetch`]),
//! so the usual flow is
//!
//! ```ignore
//! use pgcrud::{AddressingMode, Database, DbConfig, builder};
//!
//! let mut db = Database::connect(&DbConfig::from_env()?).await?;
//!
//! db.execute(&builder::select("users").order_by("id DESC").limit(10).build()?).await?;
//! if db.have_results() {
//!     let users = db.fetch(AddressingMode::Assoc)?;
//! }
//!
//! let removed = db.delete(builder::delete("sessions").where_eq("user_id", 7)).await?;
//! db.close().await?;
//! ```
//!
//! Every query method takes `&mut self`, so one handle never has two
//! statements in flight and a result is always read before it is replaced.
//! Share a handle between tasks behind a mutex, or open one per worker.

mod config;

pub use config::DbConfig;

use crate::builder::{BuildStatement, DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
use crate::client::{GenericClient, QueryOutput};
use crate::error::{CrudError, CrudResult};
use crate::normalize::{AddressingMode, NormalizedResult, normalize};
use crate::statement::Statement;
use crate::value::escape_literal;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// A single database connection plus the result of its last statement.
pub struct Database<C: GenericClient = tokio_postgres::Client> {
    client: C,
    query_timeout: Option<Duration>,
    slow_query_threshold: Option<Duration>,
    rows: Vec<C::Row>,
    affected: u64,
    last_error: Option<String>,
    connection: Option<JoinHandle<()>>,
}

impl Database<tokio_postgres::Client> {
    /// Open a connection and set its client encoding.
    ///
    /// The driver's connection task is spawned on the current tokio runtime.
    pub async fn connect(config: &DbConfig) -> CrudResult<Self> {
        let (client, connection) = config
            .to_pg_config()
            .connect(tokio_postgres::NoTls)
            .await
            .map_err(|e| {
                tracing::error!(
                    target: "pgcrud.sql",
                    host = %config.host,
                    port = config.port,
                    error = %e,
                    "connect failed"
                );
                CrudError::Connection(e.to_string())
            })?;

        let handle = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(target: "pgcrud.sql", error = %e, "connection closed with error");
            }
        });

        let mut db = Self::open(client, config).await?;
        db.connection = Some(handle);
        tracing::info!(
            target: "pgcrud.sql",
            host = %config.host,
            port = config.port,
            dbname = config.dbname.as_deref().unwrap_or("-"),
            "connected"
        );
        Ok(db)
    }
}

impl<C: GenericClient> Database<C> {
    /// Wrap an already-connected client.
    ///
    /// Sets the client encoding to `config.charset`; a failure here is a
    /// [`CrudError::Connection`].
    pub async fn open(client: C, config: &DbConfig) -> CrudResult<Self> {
        let set_charset = format!("SET client_encoding TO {}", escape_literal(&config.charset)?);
        client.batch_execute(&set_charset).await.map_err(|e| {
            CrudError::Connection(format!(
                "failed to set client encoding '{}': {}",
                config.charset,
                error_text(&e)
            ))
        })?;

        Ok(Self {
            client,
            query_timeout: config.get_query_timeout(),
            slow_query_threshold: config.get_slow_query_threshold(),
            rows: Vec::new(),
            affected: 0,
            last_error: None,
            connection: None,
        })
    }

    /// The underlying client.
    pub fn client(&self) -> &C {
        &self.client
    }

    async fn execute_with_timeout<T, F>(&self, future: F) -> CrudResult<T>
    where
        F: std::future::Future<Output = CrudResult<T>> + Send,
    {
        match self.query_timeout {
            Some(timeout) => {
                tokio::pin!(future);
                tokio::select! {
                    result = &mut future => result,
                    _ = tokio::time::sleep(timeout) => {
                        if let Some(cancel_token) = self.client.cancel_token() {
                            tokio::spawn(async move {
                                let _ = cancel_token.cancel_query(tokio_postgres::NoTls).await;
                            });
                        }
                        Err(CrudError::Timeout(timeout))
                    }
                }
            }
            None => future.await,
        }
    }

    /// Execute a statement and keep its result.
    ///
    /// Returns the affected-row count. The previous result is replaced; on
    /// failure it is cleared and the error text is kept for [`Database::last_error`].
    pub async fn execute(&mut self, statement: &Statement) -> CrudResult<u64> {
        let params = statement.params_ref();
        tracing::debug!(
            target: "pgcrud.sql",
            kind = statement.kind().as_str(),
            param_count = params.len(),
            sql = %statement.sql(),
            "execute"
        );

        let start = Instant::now();
        let result = self
            .execute_with_timeout(self.client.query_counted(statement.sql(), &params))
            .await;
        let elapsed = start.elapsed();

        match result {
            Ok(QueryOutput { rows, affected }) => {
                if self.slow_query_threshold.is_some_and(|t| elapsed > t) {
                    tracing::warn!(
                        target: "pgcrud.sql",
                        kind = statement.kind().as_str(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        sql = %statement.sql(),
                        "slow query"
                    );
                }
                self.rows = rows;
                self.affected = affected;
                self.last_error = None;
                Ok(affected)
            }
            Err(e) => {
                tracing::error!(
                    target: "pgcrud.sql",
                    kind = statement.kind().as_str(),
                    sql = %statement.sql(),
                    error = %e,
                    "query failed"
                );
                self.rows.clear();
                self.affected = 0;
                self.last_error = Some(error_text(&e));
                Err(e)
            }
        }
    }

    /// Build a statement and execute it.
    ///
    /// A build failure is returned without contacting the server and leaves
    /// the previous result untouched.
    pub async fn run(&mut self, builder: &impl BuildStatement) -> CrudResult<u64> {
        let statement = builder.build()?;
        self.execute(&statement).await
    }

    /// Execute SQL text without parameters.
    pub async fn execute_sql(&mut self, sql: &str) -> CrudResult<u64> {
        self.execute(&Statement::raw(sql)).await
    }

    /// Normalize the rows of the last statement.
    pub fn fetch(&self, mode: AddressingMode) -> CrudResult<NormalizedResult> {
        normalize(&self.rows, mode)
    }

    /// Whether the last statement returned at least one row.
    pub fn have_results(&self) -> bool {
        self.row_count() >= 1
    }

    /// Rows returned by the last statement.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows affected (or returned) by the last statement.
    pub fn affected_rows(&self) -> u64 {
        self.affected
    }

    /// Error text of the last failed statement, cleared by the next success.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Quote a value as a string literal. Only needed for hand-written SQL;
    /// builder values are always bound as parameters.
    pub fn escape(&self, value: &str) -> CrudResult<String> {
        escape_literal(value)
    }

    /// Execute an INSERT, returning the number of inserted rows.
    pub async fn insert(&mut self, builder: InsertBuilder) -> CrudResult<u64> {
        self.run(&builder).await
    }

    /// Execute an UPDATE, returning the number of updated rows.
    pub async fn update(&mut self, builder: UpdateBuilder) -> CrudResult<u64> {
        self.run(&builder).await
    }

    /// Execute a DELETE. `true` when at least one row was removed.
    pub async fn delete(&mut self, builder: DeleteBuilder) -> CrudResult<bool> {
        Ok(self.run(&builder).await? > 0)
    }

    /// Execute a SELECT and fetch its rows.
    pub async fn select(
        &mut self,
        builder: SelectBuilder,
        mode: AddressingMode,
    ) -> CrudResult<NormalizedResult> {
        self.run(&builder).await?;
        self.fetch(mode)
    }

    /// Close the connection.
    ///
    /// Waits for the driver task to finish when the handle was created by
    /// [`Database::connect`].
    pub async fn close(self) -> CrudResult<()> {
        let Database {
            client, connection, ..
        } = self;
        drop(client);
        if let Some(handle) = connection {
            handle
                .await
                .map_err(|e| CrudError::Connection(format!("connection task failed: {e}")))?;
        }
        tracing::info!(target: "pgcrud.sql", "closed");
        Ok(())
    }
}

/// Driver text for query failures, the full message otherwise.
fn error_text(err: &CrudError) -> String {
    match err {
        CrudError::Query { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
