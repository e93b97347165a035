//! Executor capability shared by connections and transactions.

use crate::error::{ModelError, ModelResult};
use crate::rebind::BindType;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A trait that unifies database clients and transactions.
///
/// Insert and update helpers accept any `GenericClient`, so the same call works on a plain
/// connection, a pooled connection or an open transaction.
pub trait GenericClient: Send + Sync {
    /// Placeholder style expected by this client.
    ///
    /// Postgres clients use `$1, $2, ...`.
    fn bind_type(&self) -> BindType {
        BindType::Dollar
    }

    /// Rewrite `?` placeholders to this client's style.
    fn rebind(&self, sql: &str) -> String {
        self.bind_type().rebind(sql)
    }

    /// Execute a statement and return the number of affected rows.
    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send;

    /// Execute a query and return the **first** row.
    ///
    /// Returns `ModelError::NotFound` if no rows are returned.
    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = ModelResult<Row>> + Send;

    /// Return a cancellation token for the underlying connection, if supported.
    ///
    /// Used to cancel a statement server-side when a timeout fires.
    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        None
    }
}

fn first_row(rows: Vec<Row>) -> ModelResult<Row> {
    rows.into_iter()
        .next()
        .ok_or_else(|| ModelError::not_found("Expected one row, got none"))
}

impl GenericClient for tokio_postgres::Client {
    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<u64> {
        Ok(tokio_postgres::Client::execute(self, sql, params).await?)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<Row> {
        first_row(tokio_postgres::Client::query(self, sql, params).await?)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Client::cancel_token(self))
    }
}

impl GenericClient for tokio_postgres::Transaction<'_> {
    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<u64> {
        Ok(tokio_postgres::Transaction::execute(self, sql, params).await?)
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<Row> {
        first_row(tokio_postgres::Transaction::query(self, sql, params).await?)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        Some(tokio_postgres::Transaction::cancel_token(self))
    }
}

// ===== deadpool-postgres support =====

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::ClientWrapper {
    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<u64> {
        // Delegate to the deref target (tokio_postgres::Client).
        GenericClient::execute(&**self, sql, params).await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<Row> {
        GenericClient::query_one(&**self, sql, params).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        GenericClient::cancel_token(&**self)
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Client {
    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<u64> {
        GenericClient::execute(&**self, sql, params).await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<Row> {
        GenericClient::query_one(&**self, sql, params).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        GenericClient::cancel_token(&**self)
    }
}

#[cfg(feature = "pool")]
impl GenericClient for deadpool_postgres::Transaction<'_> {
    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<u64> {
        GenericClient::execute(&**self, sql, params).await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<Row> {
        GenericClient::query_one(&**self, sql, params).await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        GenericClient::cancel_token(&**self)
    }
}

// ===== Reference implementation =====

impl<C: GenericClient> GenericClient for &C {
    fn bind_type(&self) -> BindType {
        (*self).bind_type()
    }

    fn rebind(&self, sql: &str) -> String {
        (*self).rebind(sql)
    }

    fn execute(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send {
        (*self).execute(sql, params)
    }

    fn query_one(
        &self,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> impl std::future::Future<Output = ModelResult<Row>> + Send {
        (*self).query_one(sql, params)
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        (*self).cancel_token()
    }
}
