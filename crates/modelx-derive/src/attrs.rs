//! Parsing of struct-level and field-level `#[orm(...)]` attributes.

use crate::sql_ident::{parse_sql_ident, parse_table_name};
use syn::{Error, LitStr, Result};

/// Struct-level attributes: `#[orm(table = "users", key = "user_id")]`.
#[derive(Default)]
pub(crate) struct StructAttrs {
    pub table: Option<LitStr>,
    pub key: Option<LitStr>,
}

impl syn::parse::Parse for StructAttrs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attrs = StructAttrs::default();

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            let _: syn::Token![=] = input.parse()?;
            let value: LitStr = input.parse()?;

            match ident.to_string().as_str() {
                "table" => attrs.table = Some(value),
                "key" => attrs.key = Some(value),
                other => {
                    return Err(Error::new(
                        ident.span(),
                        format!("unknown struct attribute `{other}` (expected `table` or `key`)"),
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attrs)
    }
}

/// Field-level attributes: `id`, `skip`, `flatten`, `column = "..."`.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub is_id: bool,
    pub skip: bool,
    pub flatten: bool,
    pub column: Option<LitStr>,
}

impl syn::parse::Parse for FieldAttrs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attrs = FieldAttrs::default();

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;

            match ident.to_string().as_str() {
                "id" => attrs.is_id = true,
                "skip" => attrs.skip = true,
                "flatten" => attrs.flatten = true,
                "column" => {
                    let _: syn::Token![=] = input.parse()?;
                    attrs.column = Some(input.parse()?);
                }
                other => {
                    return Err(Error::new(
                        ident.span(),
                        format!(
                            "unknown field attribute `{other}` (expected `id`, `skip`, `flatten` or `column`)"
                        ),
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attrs)
    }
}

pub(crate) fn get_struct_attrs(input: &syn::DeriveInput) -> Result<StructAttrs> {
    let mut merged = StructAttrs::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }

        let parsed: StructAttrs = attr.parse_args()?;
        if parsed.table.is_some() {
            merged.table = parsed.table;
        }
        if parsed.key.is_some() {
            merged.key = parsed.key;
        }
    }

    Ok(merged)
}

pub(crate) fn get_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut merged = FieldAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }

        let parsed: FieldAttrs = attr.parse_args()?;
        merged.is_id |= parsed.is_id;
        merged.skip |= parsed.skip;
        merged.flatten |= parsed.flatten;
        if parsed.column.is_some() {
            merged.column = parsed.column;
        }
    }

    if merged.skip && (merged.is_id || merged.flatten || merged.column.is_some()) {
        return Err(Error::new_spanned(
            field,
            "`skip` cannot be combined with other field attributes",
        ));
    }
    if merged.flatten && (merged.is_id || merged.column.is_some()) {
        return Err(Error::new_spanned(
            field,
            "`flatten` cannot be combined with `id` or `column`",
        ));
    }

    Ok(merged)
}

impl StructAttrs {
    pub fn table_name(&self) -> Option<Result<String>> {
        self.table.as_ref().map(parse_table_name)
    }

    pub fn key_name(&self) -> Option<Result<String>> {
        self.key.as_ref().map(|lit| parse_sql_ident(lit, "key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn parses_struct_attrs() {
        let input: syn::DeriveInput = parse_quote! {
            #[orm(table = "users", key = "user_id")]
            struct User { user_id: i64 }
        };
        let attrs = get_struct_attrs(&input).unwrap();
        assert_eq!(attrs.table_name().unwrap().unwrap(), "users");
        assert_eq!(attrs.key_name().unwrap().unwrap(), "user_id");
    }

    #[test]
    fn later_struct_attrs_override() {
        let input: syn::DeriveInput = parse_quote! {
            #[orm(table = "a")]
            #[orm(table = "b")]
            struct User { id: i64 }
        };
        let attrs = get_struct_attrs(&input).unwrap();
        assert_eq!(attrs.table_name().unwrap().unwrap(), "b");
        assert!(attrs.key_name().is_none());
    }

    #[test]
    fn rejects_unknown_struct_attr() {
        let input: syn::DeriveInput = parse_quote! {
            #[orm(tabel = "users")]
            struct User { id: i64 }
        };
        assert!(get_struct_attrs(&input).is_err());
    }

    #[test]
    fn rejects_invalid_table() {
        let input: syn::DeriveInput = parse_quote! {
            #[orm(table = "users; drop table users")]
            struct User { id: i64 }
        };
        let attrs = get_struct_attrs(&input).unwrap();
        assert!(attrs.table_name().unwrap().is_err());
    }

    #[test]
    fn parses_field_attrs() {
        let field: syn::Field = parse_quote! {
            #[orm(id, column = "user_id")]
            id: i64
        };
        let attrs = get_field_attrs(&field).unwrap();
        assert!(attrs.is_id);
        assert_eq!(attrs.column.unwrap().value(), "user_id");

        let field: syn::Field = parse_quote! {
            #[orm(flatten)]
            audit: Audit
        };
        assert!(get_field_attrs(&field).unwrap().flatten);
    }

    #[test]
    fn rejects_conflicting_field_attrs() {
        let field: syn::Field = parse_quote! {
            #[orm(skip, id)]
            id: i64
        };
        assert!(get_field_attrs(&field).is_err());

        let field: syn::Field = parse_quote! {
            #[orm(flatten, column = "x")]
            audit: Audit
        };
        assert!(get_field_attrs(&field).is_err());

        let field: syn::Field = parse_quote! {
            #[orm(primary)]
            id: i64
        };
        assert!(get_field_attrs(&field).is_err());
    }
}
