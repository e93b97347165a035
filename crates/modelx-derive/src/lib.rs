//! Derive macros for modelx.
//!
//! - `#[derive(Fields)]` exposes a struct's named fields as columns.
//! - `#[derive(Modeler)]` does the same and also binds the struct to a table and key.
//!
//! Struct attributes (`Modeler` only):
//! - `#[orm(table = "users")]`, required, may be schema-qualified
//! - `#[orm(key = "user_id")]`, optional, defaults to the `#[orm(id)]` field or `id`
//!
//! Field attributes:
//! - `#[orm(id)]` marks the key column
//! - `#[orm(column = "name")]` overrides the column name
//! - `#[orm(skip)]` leaves the field out of every statement
//! - `#[orm(flatten)]` inlines the columns of a nested `Fields` type

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod expand;
mod sql_ident;

#[proc_macro_derive(Fields, attributes(orm))]
pub fn derive_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::expand_fields(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

#[proc_macro_derive(Modeler, attributes(orm))]
pub fn derive_modeler(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand::expand_modeler(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
