//! Procedural macros for sqliter.
//!
//! `#[derive(Record)]` turns a struct into a table mapping at compile time: a
//! const field table, value extraction and row decoding. The generated code
//! refers to `sqliter_core`, which the deriving crate must depend on.

use proc_macro::TokenStream;

mod parse;
mod validate;

use parse::{RecordDef, parse_record, type_string};

/// Derive macro for the `Record` trait.
///
/// # Attributes
///
/// - `#[sqliter(column = "name")]` - Persist this field in column `name`.
///   Fields without a column are not persisted and must implement `Default`.
/// - `#[sqliter(primary_key)]` - Primary key; excluded from INSERT, used as the UPDATE key
/// - `#[sqliter(unique)]` - UNIQUE constraint; also eligible as the UPDATE key
/// - `#[sqliter(index)]` - Create `<table>_<column>_idx`
/// - `#[sqliter(attr = "PRIMARY KEY UNIQUE INDEX")]` - Same flags as one string
///
/// The table name is the struct name lower-cased. Persisted field types must
/// implement `TypeInfo` and `FromValue`.
///
/// # Example
///
/// ```ignore
/// use sqliter::Record;
///
/// #[derive(Record, Default)]
/// struct TestStruct {
///     #[sqliter(column = "db_a", primary_key)]
///     a: i32,
///     #[sqliter(column = "db_b")]
///     b: String,
///     scratch: Vec<u8>,
/// }
///
/// assert_eq!(TestStruct::TABLE_NAME, "teststruct");
/// ```
#[proc_macro_derive(Record, attributes(sqliter))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);

    let record = match parse_record(&input) {
        Ok(r) => r,
        Err(e) => return e.to_compile_error().into(),
    };

    if let Err(e) = validate::validate_record(&record) {
        return e.to_compile_error().into();
    }

    generate_record_impl(&record).into()
}

/// Generate the Record trait implementation from the parsed definition.
fn generate_record_impl(record: &RecordDef) -> proc_macro2::TokenStream {
    let name = &record.name;
    let table_name = &record.table_name;
    let (impl_generics, ty_generics, where_clause) = record.generics.split_for_impl();

    let field_infos = generate_field_infos(record);
    let values = generate_values(record);
    let from_row = generate_from_row(record);
    let load_row = generate_load_row(record);

    quote::quote! {
        impl #impl_generics sqliter_core::Record for #name #ty_generics #where_clause {
            const TABLE_NAME: &'static str = #table_name;

            const FIELDS: &'static [sqliter_core::FieldInfo] = &[#(#field_infos),*];

            fn values(&self) -> ::std::vec::Vec<sqliter_core::Value> {
                #values
            }

            fn from_row(row: &sqliter_core::Row) -> sqliter_core::Result<Self> {
                #from_row
            }

            fn load_row(&mut self, row: &sqliter_core::Row) -> sqliter_core::Result<()> {
                #load_row
            }
        }
    }
}

fn generate_field_infos(record: &RecordDef) -> Vec<proc_macro2::TokenStream> {
    record
        .persisted()
        .map(|(field, column)| {
            let field_name = field.name.to_string();
            let column_name = &column.name;
            let ty = &field.ty;
            let rust_type = type_string(ty);
            let bits = column.flags.bits();
            quote::quote! {
                sqliter_core::FieldInfo::new(
                    #field_name,
                    #column_name,
                    <#ty as sqliter_core::TypeInfo>::SQL_TYPE,
                )
                .rust_type(#rust_type)
                .flags(sqliter_core::ColumnFlags::from_bits(#bits))
            }
        })
        .collect()
}

fn generate_values(record: &RecordDef) -> proc_macro2::TokenStream {
    let conversions = record.persisted().map(|(field, _)| {
        let field_name = &field.name;
        quote::quote! { sqliter_core::TypeInfo::to_value(&self.#field_name) }
    });

    quote::quote! {
        vec![#(#conversions),*]
    }
}

fn generate_from_row(record: &RecordDef) -> proc_macro2::TokenStream {
    let extractions = record.persisted().map(|(field, column)| {
        let field_name = &field.name;
        let column_name = &column.name;
        quote::quote! { #field_name: row.get_named(#column_name)? }
    });

    let defaults = record.excluded().map(|field| {
        let field_name = &field.name;
        quote::quote! { #field_name: ::core::default::Default::default() }
    });

    quote::quote! {
        Ok(Self {
            #(#extractions,)*
            #(#defaults,)*
        })
    }
}

/// Decode every column before assigning so a failed decode leaves `self` intact.
fn generate_load_row(record: &RecordDef) -> proc_macro2::TokenStream {
    let (decodes, assigns): (Vec<_>, Vec<_>) = record
        .persisted()
        .map(|(field, column)| {
            let field_name = &field.name;
            let column_name = &column.name;
            let ty = &field.ty;
            let local = quote::format_ident!("__{}", field_name);
            (
                quote::quote! { let #local: #ty = row.get_named(#column_name)?; },
                quote::quote! { self.#field_name = #local; },
            )
        })
        .unzip();

    quote::quote! {
        #(#decodes)*
        #(#assigns)*
        Ok(())
    }
}
