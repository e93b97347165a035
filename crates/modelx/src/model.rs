//! Record capability traits.
//!
//! A record is anything that can name its fields ([`Fields`]) and say which table and key
//! column it maps to ([`Modeler`]). Both are normally derived:
//!
//! ```ignore
//! use modelx::Modeler;
//!
//! #[derive(Modeler)]
//! #[orm(table = "users")]
//! struct User {
//!     #[orm(id)]
//!     id: i64,
//!     name: String,
//!     age: i32,
//! }
//! ```

use crate::value::SqlValue;
use std::sync::Arc;

/// A type with a named set of readable fields.
pub trait Fields {
    /// Column names in declaration order.
    ///
    /// Outer fields come before the fields of flattened members. The binder sorts and
    /// deduplicates this list once per distinct declaration.
    fn field_names() -> Vec<&'static str>;

    /// Read the value bound to column `name`, or `None` if the type has no such column.
    fn field(&self, name: &str) -> Option<&dyn SqlValue>;
}

/// A record that can be inserted into or updated in a table.
pub trait Modeler: Fields {
    /// Table name.
    fn table_name(&self) -> &str;

    /// Primary key column name.
    fn key_name(&self) -> &str;
}

macro_rules! impl_forwarding {
    ($($wrapper:ty),*) => {
        $(
            impl<M: Fields> Fields for $wrapper {
                fn field_names() -> Vec<&'static str> {
                    M::field_names()
                }

                fn field(&self, name: &str) -> Option<&dyn SqlValue> {
                    (**self).field(name)
                }
            }

            impl<M: Modeler> Modeler for $wrapper {
                fn table_name(&self) -> &str {
                    (**self).table_name()
                }

                fn key_name(&self) -> &str {
                    (**self).key_name()
                }
            }
        )*
    };
}

impl_forwarding!(Box<M>, Arc<M>);

impl<M: Fields> Fields for &M {
    fn field_names() -> Vec<&'static str> {
        M::field_names()
    }

    fn field(&self, name: &str) -> Option<&dyn SqlValue> {
        (**self).field(name)
    }
}

impl<M: Modeler> Modeler for &M {
    fn table_name(&self) -> &str {
        (**self).table_name()
    }

    fn key_name(&self) -> &str {
        (**self).key_name()
    }
}
