use syn::{Error, LitStr, Result};

pub(crate) fn is_valid_sql_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A table name may be schema-qualified (`public.users`).
pub(crate) fn is_valid_table_name(s: &str) -> bool {
    let mut parts = s.split('.');
    let valid = parts.by_ref().take(2).all(is_valid_sql_ident);
    valid && parts.next().is_none()
}

pub(crate) fn parse_sql_ident(lit: &LitStr, what: &str) -> Result<String> {
    let s = lit.value();
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::new(lit.span(), format!("{what} must not be empty")));
    }
    if !is_valid_sql_ident(s) {
        return Err(Error::new(
            lit.span(),
            format!("{what} must be a valid SQL identifier (expected [A-Za-z_][A-Za-z0-9_]*)"),
        ));
    }
    Ok(s.to_string())
}

pub(crate) fn parse_table_name(lit: &LitStr) -> Result<String> {
    let s = lit.value();
    let s = s.trim();
    if !is_valid_table_name(s) {
        return Err(Error::new(
            lit.span(),
            "table must be a valid SQL identifier, optionally schema-qualified (schema.table)",
        ));
    }
    Ok(s.to_string())
}
