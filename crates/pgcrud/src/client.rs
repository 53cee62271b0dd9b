//! Connection collaborator trait.

use crate::error::{CrudError, CrudResult};
use crate::normalize::RawRow;
use futures_util::TryStreamExt;
use tokio_postgres::types::ToSql;

/// Rows and affected-row count reported for one statement.
#[derive(Debug)]
pub struct QueryOutput<R> {
    pub rows: Vec<R>,
    /// Rows returned or touched, as reported by the server's command tag.
    pub affected: u64,
}

/// What [`Database`](crate::Database) needs from a connection.
///
/// Implemented for `tokio_postgres::Client`. Tests and wrappers can provide
/// their own implementation and hand it to [`Database::open`](crate::Database::open).
pub trait GenericClient: Send + Sync {
    /// Row type produced by this client.
    type Row: RawRow + Send;

    /// Execute one statement and collect its rows together with the
    /// affected-row count.
    fn query_counted(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = CrudResult<QueryOutput<Self::Row>>> + Send;

    /// Execute a parameterless statement (or several, `;`-separated).
    fn batch_execute(&self, sql: &str) -> impl std::future::Future<Output = CrudResult<()>> + Send;

    /// Return a cancellation token for the underlying connection, if supported.
    ///
    /// Used to cancel the server-side query when a timeout triggers.
    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        None
    }
}

impl GenericClient for tokio_postgres::Client {
    type Row = tokio_postgres::Row;

    async fn query_counted(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> CrudResult<QueryOutput<tokio_postgres::Row>> {
        let stream = tokio_postgres::Client::query_raw(self, sql, params.iter().copied())
            .await
            .map_err(CrudError::from_db_error)?;
        let mut stream = std::pin::pin!(stream);

        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await.map_err(CrudError::from_db_error)? {
            rows.push(row);
        }
        let affected = stream.rows_affected().unwrap_or(rows.len() as u64);
        Ok(QueryOutput { rows, affected })
    }

    async fn batch_execute(&self, sql: &str) -> CrudResult<()> {
        tokio_postgres::Client::batch_execute(self, sql)
            .await
            .map_err(CrudError::from_db_error)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Client::cancel_token(self))
    }
}
