//! Build-and-execute helpers.
//!
//! ```ignore
//! use modelx::ModelerExt;
//!
//! let user = User { id: 0, name: "foo".into(), age: 18 };
//! user.insert(&client).await?;                    // key left to the database
//! let id: i64 = user.insert_returning(&client).await?;
//! ```

use crate::client::GenericClient;
use crate::error::ModelResult;
use crate::model::Modeler;
use crate::statement::{Statement, insert_statement, update_statement};
use tokio_postgres::types::FromSql;

/// Rebind `stmt` for `conn` and execute it, returning the affected row count.
pub async fn execute_statement<C: GenericClient>(
    conn: &C,
    stmt: &Statement<'_>,
) -> ModelResult<u64> {
    trace_statement(stmt);
    let sql = conn.rebind(stmt.sql());
    conn.execute(&sql, &stmt.params()).await
}

#[cfg(feature = "tracing")]
fn trace_statement(stmt: &Statement<'_>) {
    tracing::debug!(
        target: "modelx.sql",
        kind = %stmt.kind(),
        table = stmt.table(),
        param_count = stmt.args().len(),
        "executing statement"
    );
}

#[cfg(not(feature = "tracing"))]
fn trace_statement(_: &Statement<'_>) {}

/// Insert `record`, leaving a zero key to the database.
pub async fn insert<C: GenericClient, M: Modeler>(conn: &C, record: &M) -> ModelResult<u64> {
    let stmt = insert_statement(record)?;
    execute_statement(conn, &stmt).await
}

/// Update the row identified by `record`'s key.
pub async fn update<C: GenericClient, M: Modeler>(conn: &C, record: &M) -> ModelResult<u64> {
    let stmt = update_statement(record)?;
    execute_statement(conn, &stmt).await
}

/// Insert `record` and return the key the row was stored with.
pub async fn insert_returning<C, M, K>(conn: &C, record: &M) -> ModelResult<K>
where
    C: GenericClient,
    M: Modeler,
    K: for<'r> FromSql<'r>,
{
    let stmt = insert_statement(record)?.returning(record.key_name());
    trace_statement(&stmt);
    let sql = conn.rebind(stmt.sql());
    let row = conn.query_one(&sql, &stmt.params()).await?;
    Ok(row.try_get(0)?)
}

/// Method-call syntax for [`insert`], [`update`] and [`insert_returning`].
pub trait ModelerExt: Modeler + Sync {
    /// Insert this record. See [`insert`].
    fn insert<C: GenericClient>(
        &self,
        conn: &C,
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send;

    /// Update this record. See [`update`].
    fn update<C: GenericClient>(
        &self,
        conn: &C,
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send;

    /// Insert this record and return its stored key. See [`insert_returning`].
    fn insert_returning<C, K>(
        &self,
        conn: &C,
    ) -> impl std::future::Future<Output = ModelResult<K>> + Send
    where
        C: GenericClient,
        K: for<'r> FromSql<'r>;
}

impl<M: Modeler + Sync> ModelerExt for M {
    fn insert<C: GenericClient>(
        &self,
        conn: &C,
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send {
        insert(conn, self)
    }

    fn update<C: GenericClient>(
        &self,
        conn: &C,
    ) -> impl std::future::Future<Output = ModelResult<u64>> + Send {
        update(conn, self)
    }

    fn insert_returning<C, K>(
        &self,
        conn: &C,
    ) -> impl std::future::Future<Output = ModelResult<K>> + Send
    where
        C: GenericClient,
        K: for<'r> FromSql<'r>,
    {
        insert_returning(conn, self)
    }
}
