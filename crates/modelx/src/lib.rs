//! # modelx
//!
//! Generate and run `INSERT` / `UPDATE` statements from the fields of a record.
//!
//! ## Features
//!
//! - **Derived field sets**: `#[derive(Modeler)]` exposes a struct's fields as columns
//! - **Deterministic SQL**: columns are always emitted in sorted order
//! - **Generated keys**: a zero primary key is left out of INSERTs so the database assigns one
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//! - **Thin**: connections, pools and transactions are plain tokio-postgres / deadpool
//!
//! ```ignore
//! use modelx::{Modeler, ModelerExt};
//!
//! #[derive(Modeler)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(id)]
//!     id: i64,
//!     name: String,
//!     age: i32,
//! }
//!
//! // INSERT INTO users(age,name) VALUES ($1,$2)
//! let mut user = User { id: 0, name: "foo".into(), age: 18 };
//! user.id = user.insert_returning(&client).await?;
//!
//! // UPDATE users SET age=$1,name=$2 WHERE id = $3
//! user.name = "bar".into();
//! user.update(&client).await?;
//! ```

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod exec;
pub mod mapper;
pub mod model;
pub mod prelude;
pub mod rebind;
pub mod statement;
pub mod transaction;
pub mod value;

pub use client::GenericClient;
pub use config::{ExecConfig, TransactionIsolation, TransactionOptions};
pub use db::Db;
pub use error::{ModelError, ModelResult};
pub use exec::{ModelerExt, execute_statement, insert, insert_returning, update};
pub use mapper::{Binding, FieldMap, bind, field_map};
pub use model::{Fields, Modeler};
pub use rebind::{BindType, rebind};
pub use statement::{
    Statement, StatementKind, build_insert, build_update, insert_statement, update_statement,
};
pub use value::{IsZero, SqlValue};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};

#[cfg(feature = "derive")]
pub use modelx_derive::{Fields, Modeler};
