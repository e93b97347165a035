//! Transaction helper macro.
//!
//! Prefer passing a transaction into APIs that accept [`GenericClient`](crate::GenericClient):
//! inserts and updates run the same way on a connection or inside a transaction.
//!
//! # Example
//!
//! ```ignore
//! use modelx::{Db, ModelResult};
//!
//! # async fn demo(mut db: Db<tokio_postgres::Client>, user: User) -> ModelResult<()> {
//! modelx::transaction!(&mut db, tx, {
//!     tx.insert(&user).await?;
//!     tx.update(&user).await?;
//!     Ok(())
//! })?;
//! # Ok(()) }
//! ```

/// Runs the given block inside a database transaction.
///
/// - Begins a transaction via `$db.transaction().await` (a [`Db`](crate::Db) wrapping a
///   `tokio_postgres::Client` or a pooled client).
/// - Commits on `Ok(_)`.
/// - Rolls back on `Err(_)`; a failed rollback is reported as
///   [`ModelError::RollbackFailed`](crate::ModelError::RollbackFailed).
///
/// The block must evaluate to `modelx::ModelResult<T>`.
#[macro_export]
macro_rules! transaction {
    ($db:expr, $tx:ident, $body:block) => {{
        let $tx = ($db).transaction().await?;
        $crate::__finish_transaction!($tx, $body)
    }};
}

/// Same as [`transaction!`] with explicit [`TransactionOptions`](crate::TransactionOptions).
#[macro_export]
macro_rules! transaction_with {
    ($db:expr, $tx:ident, $opts:expr, $body:block) => {{
        let $tx = ($db).transaction_with($opts).await?;
        $crate::__finish_transaction!($tx, $body)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __finish_transaction {
    ($tx:ident, $body:block) => {{
        let __modelx_tx_body_result: $crate::ModelResult<_> = async { $body }.await;
        match __modelx_tx_body_result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(error) => match $tx.rollback().await {
                Ok(()) => Err(error),
                Err($crate::ModelError::Execution(rollback)) => {
                    Err($crate::ModelError::RollbackFailed {
                        error: Box::new(error),
                        rollback,
                    })
                }
                Err(other) => Err(other),
            },
        }
    }};
}
