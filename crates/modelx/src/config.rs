//! Execution and transaction settings.

use crate::rebind::BindType;
use std::time::Duration;

/// Settings applied by [`Db`](crate::Db) to every statement it runs.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Statement timeout. `None` waits as long as the database does.
    pub query_timeout: Option<Duration>,
    /// Placeholder style override. `None` uses the wrapped client's style.
    pub bind_type: Option<BindType>,
    /// Whether to log statements (requires the `tracing` feature).
    pub logging_enabled: bool,
    /// Truncate logged SQL to this many bytes. `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Statements slower than this are logged at `warn`.
    pub slow_statement_threshold: Option<Duration>,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            query_timeout: None,
            bind_type: None,
            logging_enabled: true,
            max_sql_length: Some(200),
            slow_statement_threshold: None,
        }
    }
}

impl ExecConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the statement timeout.
    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Override the placeholder style.
    pub fn bind_type(mut self, bind_type: BindType) -> Self {
        self.bind_type = Some(bind_type);
        self
    }

    /// Enable or disable statement logging.
    pub fn logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in logs.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Set the slow statement threshold.
    pub fn slow_statement_threshold(mut self, threshold: Duration) -> Self {
        self.slow_statement_threshold = Some(threshold);
        self
    }

    pub(crate) fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while end > 0 && !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end]).into()
            }
            _ => sql.into(),
        }
    }
}

/// Transaction isolation level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionIsolation {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl From<TransactionIsolation> for tokio_postgres::IsolationLevel {
    fn from(level: TransactionIsolation) -> Self {
        match level {
            TransactionIsolation::ReadUncommitted => Self::ReadUncommitted,
            TransactionIsolation::ReadCommitted => Self::ReadCommitted,
            TransactionIsolation::RepeatableRead => Self::RepeatableRead,
            TransactionIsolation::Serializable => Self::Serializable,
        }
    }
}

/// Options for beginning a transaction. Unset options use the server defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    pub isolation_level: Option<TransactionIsolation>,
    pub read_only: Option<bool>,
    pub deferrable: Option<bool>,
}

impl TransactionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isolation_level(mut self, level: TransactionIsolation) -> Self {
        self.isolation_level = Some(level);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn deferrable(mut self, deferrable: bool) -> Self {
        self.deferrable = Some(deferrable);
        self
    }

    pub(crate) fn apply<'a>(
        &self,
        mut builder: tokio_postgres::TransactionBuilder<'a>,
    ) -> tokio_postgres::TransactionBuilder<'a> {
        if let Some(level) = self.isolation_level {
            builder = builder.isolation_level(level.into());
        }
        if let Some(read_only) = self.read_only {
            builder = builder.read_only(read_only);
        }
        if let Some(deferrable) = self.deferrable {
            builder = builder.deferrable(deferrable);
        }
        builder
    }

    #[cfg(feature = "pool")]
    pub(crate) fn apply_pooled<'a>(
        &self,
        mut builder: deadpool_postgres::TransactionBuilder<'a>,
    ) -> deadpool_postgres::TransactionBuilder<'a> {
        if let Some(level) = self.isolation_level {
            builder = builder.isolation_level(level.into());
        }
        if let Some(read_only) = self.read_only {
            builder = builder.read_only(read_only);
        }
        if let Some(deferrable) = self.deferrable {
            builder = builder.deferrable(deferrable);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let config = ExecConfig::new()
            .query_timeout(Duration::from_secs(5))
            .bind_type(BindType::Question)
            .logging(false)
            .slow_statement_threshold(Duration::from_millis(100));

        assert_eq!(config.query_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.bind_type, Some(BindType::Question));
        assert!(!config.logging_enabled);
        assert_eq!(config.slow_statement_threshold, Some(Duration::from_millis(100)));
    }

    #[test]
    fn truncation() {
        let config = ExecConfig::new().max_sql_length(10);
        assert_eq!(config.truncate_sql("SELECT * FROM users"), "SELECT * F...");
        assert_eq!(config.truncate_sql("SELECT 1"), "SELECT 1");

        // Never splits a multi-byte character.
        let config = ExecConfig::new().max_sql_length(2);
        assert_eq!(config.truncate_sql("éé"), "é...");

        let config = ExecConfig::new().no_truncate();
        assert_eq!(config.truncate_sql("SELECT * FROM users"), "SELECT * FROM users");
    }

    #[test]
    fn transaction_options_builder() {
        let opts = TransactionOptions::new()
            .isolation_level(TransactionIsolation::Serializable)
            .read_only(true);
        assert_eq!(opts.isolation_level, Some(TransactionIsolation::Serializable));
        assert_eq!(opts.read_only, Some(true));
        assert_eq!(opts.deferrable, None);
    }
}
