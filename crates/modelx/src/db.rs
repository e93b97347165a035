//! [`Db`]: a client or transaction plus execution settings.
//!
//! # Example
//!
//! ```ignore
//! use modelx::{Db, ExecConfig};
//! use std::time::Duration;
//!
//! let mut db = Db::connect("postgres://...").await?
//!     .with_config(ExecConfig::new().query_timeout(Duration::from_secs(5)));
//!
//! db.insert(&user).await?;
//!
//! let tx = db.transaction().await?;
//! tx.update(&user).await?;
//! tx.commit().await?;
//! ```

use crate::client::GenericClient;
use crate::config::{ExecConfig, TransactionOptions};
use crate::error::{ModelError, ModelResult};
use crate::exec;
use crate::model::Modeler;
use crate::rebind::BindType;
use crate::statement::Statement;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, ToSql};

/// A connection or transaction with [`ExecConfig`] applied to every statement.
///
/// `Db` is itself a [`GenericClient`], so it can be passed to the [`exec`] helpers or to
/// [`ModelerExt`](crate::ModelerExt) methods.
pub struct Db<C> {
    client: C,
    config: ExecConfig,
}

impl<C> Db<C> {
    /// Wrap a client with the default configuration.
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: ExecConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ExecConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    pub fn inner(&self) -> &C {
        &self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C: GenericClient> Db<C> {
    /// Insert `record`. See [`exec::insert`].
    pub async fn insert<M: Modeler + Sync>(&self, record: &M) -> ModelResult<u64> {
        exec::insert(self, record).await
    }

    /// Update `record`. See [`exec::update`].
    pub async fn update<M: Modeler + Sync>(&self, record: &M) -> ModelResult<u64> {
        exec::update(self, record).await
    }

    /// Insert `record` and return its stored key. See [`exec::insert_returning`].
    pub async fn insert_returning<M, K>(&self, record: &M) -> ModelResult<K>
    where
        M: Modeler + Sync,
        K: for<'r> FromSql<'r>,
    {
        exec::insert_returning(self, record).await
    }

    /// Execute a statement built elsewhere.
    pub async fn execute_statement(&self, stmt: &Statement<'_>) -> ModelResult<u64> {
        exec::execute_statement(self, stmt).await
    }

    async fn run<T, F>(&self, sql: &str, param_count: usize, future: F) -> ModelResult<T>
    where
        F: std::future::Future<Output = ModelResult<T>> + Send,
    {
        let start = Instant::now();
        let result = self.with_timeout(future).await;
        self.log(sql, param_count, start.elapsed(), result.as_ref().err());
        result
    }

    async fn with_timeout<T, F>(&self, future: F) -> ModelResult<T>
    where
        F: std::future::Future<Output = ModelResult<T>> + Send,
    {
        match self.config.query_timeout {
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
                        Err(ModelError::Timeout(timeout))
                    }
                }
            }
            None => future.await,
        }
    }

    #[cfg(feature = "tracing")]
    fn log(&self, sql: &str, param_count: usize, elapsed: Duration, error: Option<&ModelError>) {
        if !self.config.logging_enabled {
            return;
        }
        let sql = self.config.truncate_sql(sql);
        if let Some(error) = error {
            tracing::debug!(
                target: "modelx.sql",
                param_count,
                elapsed_ms = elapsed.as_millis() as u64,
                sql = %sql,
                %error,
                "statement failed"
            );
            return;
        }
        match self.config.slow_statement_threshold {
            Some(threshold) if elapsed > threshold => tracing::warn!(
                target: "modelx.sql",
                param_count,
                elapsed_ms = elapsed.as_millis() as u64,
                sql = %sql,
                "slow statement"
            ),
            _ => tracing::debug!(
                target: "modelx.sql",
                param_count,
                elapsed_ms = elapsed.as_millis() as u64,
                sql = %sql,
            ),
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn log(&self, _: &str, _: usize, _: Duration, _: Option<&ModelError>) {}
}

impl<C: GenericClient> GenericClient for Db<C> {
    fn bind_type(&self) -> BindType {
        self.config
            .bind_type
            .unwrap_or_else(|| self.client.bind_type())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<u64> {
        self.run(sql, params.len(), self.client.execute(sql, params))
            .await
    }

    async fn query_one(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> ModelResult<Row> {
        self.run(sql, params.len(), self.client.query_one(sql, params))
            .await
    }

    fn cancel_token(&self) -> Option<tokio_postgres::CancelToken> {
        self.client.cancel_token()
    }
}

impl Db<tokio_postgres::Client> {
    /// Connect without TLS and drive the connection on a spawned task.
    pub async fn connect(database_url: &str) -> ModelResult<Self> {
        let (client, connection) = tokio_postgres::connect(database_url, tokio_postgres::NoTls)
            .await
            .map_err(|e| ModelError::Connection(e.to_string()))?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                #[cfg(feature = "tracing")]
                tracing::error!(target: "modelx.conn", error = %e, "connection closed with error");
                #[cfg(not(feature = "tracing"))]
                let _ = e;
            }
        });
        Ok(Self::new(client))
    }

    /// Begin a transaction that shares this handle's configuration.
    pub async fn transaction(&mut self) -> ModelResult<Db<tokio_postgres::Transaction<'_>>> {
        let tx = self.client.transaction().await?;
        Ok(Db {
            client: tx,
            config: self.config.clone(),
        })
    }

    /// Begin a transaction with explicit options.
    pub async fn transaction_with(
        &mut self,
        options: TransactionOptions,
    ) -> ModelResult<Db<tokio_postgres::Transaction<'_>>> {
        let tx = options.apply(self.client.build_transaction()).start().await?;
        Ok(Db {
            client: tx,
            config: self.config.clone(),
        })
    }
}

impl Db<tokio_postgres::Transaction<'_>> {
    pub async fn commit(self) -> ModelResult<()> {
        Ok(self.client.commit().await?)
    }

    pub async fn rollback(self) -> ModelResult<()> {
        Ok(self.client.rollback().await?)
    }
}

#[cfg(feature = "pool")]
impl Db<deadpool_postgres::Client> {
    /// Check out a connection from `pool`.
    pub async fn from_pool(pool: &deadpool_postgres::Pool) -> ModelResult<Self> {
        Ok(Self::new(pool.get().await?))
    }

    /// Begin a transaction that shares this handle's configuration.
    pub async fn transaction(&mut self) -> ModelResult<Db<deadpool_postgres::Transaction<'_>>> {
        let tx = self.client.transaction().await?;
        Ok(Db {
            client: tx,
            config: self.config.clone(),
        })
    }

    /// Begin a transaction with explicit options.
    pub async fn transaction_with(
        &mut self,
        options: TransactionOptions,
    ) -> ModelResult<Db<deadpool_postgres::Transaction<'_>>> {
        let tx = options
            .apply_pooled(self.client.build_transaction())
            .start()
            .await?;
        Ok(Db {
            client: tx,
            config: self.config.clone(),
        })
    }
}

#[cfg(feature = "pool")]
impl Db<deadpool_postgres::Transaction<'_>> {
    pub async fn commit(self) -> ModelResult<()> {
        Ok(self.client.commit().await?)
    }

    pub async fn rollback(self) -> ModelResult<()> {
        Ok(self.client.rollback().await?)
    }
}
