//! Code generation for `#[derive(Fields)]` and `#[derive(Modeler)]`.

use crate::attrs::{get_field_attrs, get_struct_attrs};
use crate::sql_ident::parse_sql_ident;
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashMap;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Error, Fields, Result};

const DEFAULT_KEY: &str = "id";

struct Column {
    member: syn::Ident,
    name: String,
}

struct Flattened {
    member: syn::Ident,
    ty: syn::Type,
}

/// The column layout of a struct after attribute processing.
struct Layout {
    columns: Vec<Column>,
    flattened: Vec<Flattened>,
    id_column: Option<String>,
}

fn collect_layout(input: &DeriveInput, derive_name: &str) -> Result<Layout> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(Error::new_spanned(
                    input,
                    format!("{derive_name} can only be derived for structs with named fields"),
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                input,
                format!("{derive_name} can only be derived for structs"),
            ));
        }
    };

    let mut layout = Layout {
        columns: Vec::new(),
        flattened: Vec::new(),
        id_column: None,
    };
    let mut seen: HashMap<String, syn::Ident> = HashMap::new();

    for field in fields {
        let Some(member) = field.ident.clone() else {
            continue;
        };
        let attrs = get_field_attrs(field)?;

        if attrs.skip {
            continue;
        }
        if attrs.flatten {
            layout.flattened.push(Flattened {
                member,
                ty: field.ty.clone(),
            });
            continue;
        }

        let name = match &attrs.column {
            Some(lit) => parse_sql_ident(lit, "column")?,
            None => member.unraw().to_string(),
        };

        if let Some(previous) = seen.get(&name) {
            return Err(Error::new_spanned(
                field,
                format!("column `{name}` is already mapped by field `{previous}`"),
            ));
        }
        seen.insert(name.clone(), member.clone());

        if attrs.is_id {
            if layout.id_column.is_some() {
                return Err(Error::new_spanned(
                    field,
                    "only one field can be marked with #[orm(id)]",
                ));
            }
            layout.id_column = Some(name.clone());
        }

        layout.columns.push(Column { member, name });
    }

    Ok(layout)
}

fn fields_impl(input: &DeriveInput, layout: &Layout) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let column_names: Vec<&str> = layout.columns.iter().map(|c| c.name.as_str()).collect();
    let members: Vec<&syn::Ident> = layout.columns.iter().map(|c| &c.member).collect();
    let flat_members: Vec<&syn::Ident> = layout.flattened.iter().map(|f| &f.member).collect();
    let flat_types: Vec<&syn::Type> = layout.flattened.iter().map(|f| &f.ty).collect();

    quote! {
        impl #impl_generics ::modelx::Fields for #name #ty_generics #where_clause {
            fn field_names() -> ::std::vec::Vec<&'static str> {
                #[allow(unused_mut)]
                let mut names: ::std::vec::Vec<&'static str> = ::std::vec![#(#column_names),*];
                #(
                    names.extend(<#flat_types as ::modelx::Fields>::field_names());
                )*
                names
            }

            fn field(&self, name: &str) -> ::core::option::Option<&dyn ::modelx::SqlValue> {
                let found: ::core::option::Option<&dyn ::modelx::SqlValue> = match name {
                    #(
                        #column_names => ::core::option::Option::Some(
                            &self.#members as &dyn ::modelx::SqlValue
                        ),
                    )*
                    _ => ::core::option::Option::None,
                };
                found
                #(
                    .or_else(|| ::modelx::Fields::field(&self.#flat_members, name))
                )*
            }
        }
    }
}

pub(crate) fn expand_fields(input: DeriveInput) -> Result<TokenStream> {
    let layout = collect_layout(&input, "Fields")?;
    Ok(fields_impl(&input, &layout))
}

pub(crate) fn expand_modeler(input: DeriveInput) -> Result<TokenStream> {
    let struct_attrs = get_struct_attrs(&input)?;
    let layout = collect_layout(&input, "Modeler")?;

    let table = match struct_attrs.table_name() {
        Some(table) => table?,
        None => {
            return Err(Error::new_spanned(
                &input,
                "Modeler requires #[orm(table = \"table_name\")]",
            ));
        }
    };

    let key = match (struct_attrs.key_name().transpose()?, &layout.id_column) {
        (Some(key), Some(id)) if key != *id => {
            return Err(Error::new_spanned(
                &input,
                format!("#[orm(key = \"{key}\")] conflicts with the #[orm(id)] column `{id}`"),
            ));
        }
        (Some(key), _) => key,
        (None, Some(id)) => id.clone(),
        (None, None) => DEFAULT_KEY.to_string(),
    };

    let fields = fields_impl(&input, &layout);

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        #fields

        impl #impl_generics ::modelx::Modeler for #name #ty_generics #where_clause {
            fn table_name(&self) -> &str {
                #table
            }

            fn key_name(&self) -> &str {
                #key
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn modeler_uses_id_attribute_for_key() {
        let input: DeriveInput = parse_quote! {
            #[orm(table = "users")]
            struct User {
                #[orm(id, column = "user_id")]
                id: i64,
                name: String,
            }
        };
        let tokens = expand_modeler(input).unwrap().to_string();
        assert!(tokens.contains("\"user_id\""));
        assert!(tokens.contains("\"users\""));
        assert!(tokens.contains("Modeler for User"));
    }

    #[test]
    fn layout_skips_and_flattens() {
        let input: DeriveInput = parse_quote! {
            struct Row {
                r#type: String,
                #[orm(skip)]
                cached: i32,
                #[orm(flatten)]
                audit: Audit,
            }
        };
        let layout = collect_layout(&input, "Fields").unwrap();
        let names: Vec<&str> = layout.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["type"]);
        assert_eq!(layout.flattened.len(), 1);
        assert!(layout.id_column.is_none());
    }

    #[test]
    fn rejects_duplicate_columns() {
        let input: DeriveInput = parse_quote! {
            #[orm(table = "users")]
            struct User {
                id: i64,
                #[orm(column = "id")]
                other: i64,
            }
        };
        let err = expand_modeler(input).unwrap_err().to_string();
        assert!(err.contains("already mapped"), "{err}");
    }

    #[test]
    fn rejects_missing_table() {
        let input: DeriveInput = parse_quote! {
            struct User { id: i64 }
        };
        assert!(expand_modeler(input).is_err());
    }

    #[test]
    fn rejects_conflicting_key() {
        let input: DeriveInput = parse_quote! {
            #[orm(table = "users", key = "uid")]
            struct User {
                #[orm(id)]
                id: i64,
            }
        };
        let err = expand_modeler(input).unwrap_err().to_string();
        assert!(err.contains("conflicts"), "{err}");
    }

    #[test]
    fn rejects_two_ids() {
        let input: DeriveInput = parse_quote! {
            #[orm(table = "users")]
            struct User {
                #[orm(id)]
                a: i64,
                #[orm(id)]
                b: i64,
            }
        };
        assert!(expand_modeler(input).is_err());
    }

    #[test]
    fn rejects_tuple_structs_and_enums() {
        let input: DeriveInput = parse_quote! {
            struct Pair(i64, String);
        };
        assert!(expand_fields(input).is_err());

        let input: DeriveInput = parse_quote! {
            enum Kind { A, B }
        };
        assert!(expand_fields(input).is_err());
    }
}
