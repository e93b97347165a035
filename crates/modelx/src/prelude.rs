//! Commonly used types and traits.
//!
//! ```ignore
//! use modelx::prelude::*;
//! ```

pub use crate::client::GenericClient;
pub use crate::config::{ExecConfig, TransactionOptions};
pub use crate::db::Db;
pub use crate::error::{ModelError, ModelResult};
pub use crate::exec::ModelerExt;
pub use crate::model::{Fields, Modeler};
pub use crate::value::{IsZero, SqlValue};

#[cfg(feature = "derive")]
pub use modelx_derive::{Fields, Modeler};
