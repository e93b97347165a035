//! Placeholder styles and `?` rebinding.
//!
//! Statements are built with `?` placeholders and rewritten for the target database right
//! before execution. Postgres uses [`BindType::Dollar`].

/// Placeholder style of a database driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindType {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
    /// `:arg1`, `:arg2`, ...
    Named,
    /// `@p1`, `@p2`, ...
    At,
}

impl BindType {
    /// Placeholder style used by a driver, by its common name.
    ///
    /// Unknown drivers get [`BindType::Question`].
    pub fn for_driver(driver: &str) -> Self {
        match driver {
            "postgres" | "pgx" | "pq-timeouts" | "cloudsqlpostgres" | "ql" | "nrpostgres"
            | "cockroach" => Self::Dollar,
            "oci8" | "ora" | "goracle" | "godror" => Self::Named,
            "sqlserver" | "azuresql" => Self::At,
            _ => Self::Question,
        }
    }

    /// Rewrite `?` placeholders in `sql` to this style.
    pub fn rebind(self, sql: &str) -> String {
        rebind(self, sql)
    }
}

/// Rewrite each `?` in `sql` to the placeholder style `bind_type`, numbering from 1.
pub fn rebind(bind_type: BindType, sql: &str) -> String {
    let prefix = match bind_type {
        BindType::Question => return sql.to_string(),
        BindType::Dollar => "$",
        BindType::Named => ":arg",
        BindType::At => "@p",
    };

    let mut out = String::with_capacity(sql.len() + 10);
    let mut n = 0_usize;
    for part in sql.split('?') {
        if n > 0 {
            out.push_str(prefix);
            out.push_str(&n.to_string());
        }
        out.push_str(part);
        n += 1;
    }
    out
}
