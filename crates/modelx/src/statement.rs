//! INSERT / UPDATE statement builder.
//!
//! Statements are built from the ordered bindings produced by [`crate::mapper::bind`] and
//! use `?` placeholders; executors rewrite them with [`crate::rebind`].
//!
//! - INSERT leaves out the key column when its value is zero, so the database can
//!   generate the key. A non-zero key is written as given.
//! - UPDATE never leaves out the key: it is always the last argument, bound to
//!   `WHERE <key> = ?`.

use crate::error::{ModelError, ModelResult};
use crate::mapper::{Binding, bind};
use crate::model::Modeler;
use crate::rebind::BindType;
use crate::value::SqlValue;
use std::collections::HashSet;
use std::fmt;
use tokio_postgres::types::ToSql;

/// Kind of a generated statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Insert,
    Update,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => f.write_str("INSERT"),
            Self::Update => f.write_str("UPDATE"),
        }
    }
}

/// A generated statement: `?`-placeholder SQL plus its arguments in placeholder order.
#[must_use]
pub struct Statement<'a> {
    kind: StatementKind,
    table: String,
    sql: String,
    args: Vec<&'a dyn SqlValue>,
}

impl<'a> Statement<'a> {
    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// SQL text with `?` placeholders.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// SQL text rewritten to the given placeholder style.
    pub fn rebind(&self, bind_type: BindType) -> String {
        bind_type.rebind(&self.sql)
    }

    /// Arguments in placeholder order.
    pub fn args(&self) -> &[&'a dyn SqlValue] {
        &self.args
    }

    /// Arguments as tokio-postgres parameters.
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args.iter().map(|a| a.as_sql()).collect()
    }

    /// Append `RETURNING <column>` to an INSERT.
    pub fn returning(mut self, column: &str) -> Self {
        self.sql.push_str(" RETURNING ");
        self.sql.push_str(column);
        self
    }

    pub fn into_parts(self) -> (String, Vec<&'a dyn SqlValue>) {
        (self.sql, self.args)
    }
}

impl fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statement")
            .field("kind", &self.kind)
            .field("table", &self.table)
            .field("sql", &self.sql)
            .field("args", &self.args)
            .finish()
    }
}

/// Locate the key binding and reject duplicate columns.
fn find_key(table: &str, key: &str, bindings: &[Binding<'_>]) -> ModelResult<usize> {
    let mut seen = HashSet::with_capacity(bindings.len());
    let mut key_idx = None;
    for (i, b) in bindings.iter().enumerate() {
        if !seen.insert(b.name) {
            return Err(ModelError::DuplicateColumn {
                table: table.to_string(),
                column: b.name.to_string(),
            });
        }
        if b.name == key {
            key_idx = Some(i);
        }
    }
    key_idx.ok_or_else(|| ModelError::key_not_declared(table, key))
}

/// Build `INSERT INTO <table>(<cols>) VALUES (?,...)`.
///
/// The key binding is left out when its value is zero.
pub fn build_insert<'a>(
    table: &str,
    key: &str,
    bindings: Vec<Binding<'a>>,
) -> ModelResult<Statement<'a>> {
    let key_idx = find_key(table, key, &bindings)?;
    let elide_key = bindings[key_idx].value.is_zero();

    let mut columns = Vec::with_capacity(bindings.len());
    let mut args = Vec::with_capacity(bindings.len());
    for (i, b) in bindings.into_iter().enumerate() {
        if i == key_idx && elide_key {
            continue;
        }
        columns.push(b.name);
        args.push(b.value);
    }

    if columns.is_empty() {
        return Err(ModelError::empty_column_set(table, StatementKind::Insert));
    }

    let marks = vec!["?"; columns.len()].join(",");
    let sql = format!(
        "INSERT INTO {}({}) VALUES ({})",
        table,
        columns.join(","),
        marks
    );

    Ok(Statement {
        kind: StatementKind::Insert,
        table: table.to_string(),
        sql,
        args,
    })
}

/// Build `UPDATE <table> SET <col>=?,... WHERE <key> = ?`.
///
/// The key value is the last argument, whatever its value.
pub fn build_update<'a>(
    table: &str,
    key: &str,
    bindings: Vec<Binding<'a>>,
) -> ModelResult<Statement<'a>> {
    let key_idx = find_key(table, key, &bindings)?;

    let mut assignments = Vec::with_capacity(bindings.len());
    let mut args = Vec::with_capacity(bindings.len());
    let mut key_value = None;
    for (i, b) in bindings.into_iter().enumerate() {
        if i == key_idx {
            key_value = Some(b.value);
            continue;
        }
        assignments.push(format!("{}=?", b.name));
        args.push(b.value);
    }

    if assignments.is_empty() {
        return Err(ModelError::empty_column_set(table, StatementKind::Update));
    }
    let key_value = key_value.ok_or_else(|| ModelError::key_not_declared(table, key))?;
    args.push(key_value);

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        table,
        assignments.join(","),
        key
    );

    Ok(Statement {
        kind: StatementKind::Update,
        table: table.to_string(),
        sql,
        args,
    })
}

/// Bind `record` and build its INSERT statement.
pub fn insert_statement<M: Modeler>(record: &M) -> ModelResult<Statement<'_>> {
    let bindings = bind(record)?;
    build_insert(record.table_name(), record.key_name(), bindings)
}

/// Bind `record` and build its UPDATE statement.
pub fn update_statement<M: Modeler>(record: &M) -> ModelResult<Statement<'_>> {
    let bindings = bind(record)?;
    build_update(record.table_name(), record.key_name(), bindings)
}
