//! Parsing logic for the Record derive macro.
//!
//! Extracts the `#[sqliter(...)]` field attributes from the derive input and
//! builds the `RecordDef`/`FieldDef` structures used for code generation.

use proc_macro2::Span;
use quote::ToTokens;
use sqliter_core::ColumnFlags;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{
    Attribute, Data, DeriveInput, Error, Field, Fields, Generics, Ident, Lit, LitStr, Result, Type,
};

/// Parsed record definition from a struct with `#[derive(Record)]`.
#[derive(Debug)]
pub struct RecordDef {
    /// The struct name (e.g., `TestStruct`).
    pub name: Ident,
    /// The SQL table name (e.g., `"teststruct"`).
    pub table_name: String,
    /// Every field, persisted or not, in declaration order.
    pub fields: Vec<FieldDef>,
    pub generics: Generics,
}

impl RecordDef {
    /// Fields that carry a column name.
    pub fn persisted(&self) -> impl Iterator<Item = (&FieldDef, &ColumnDef)> {
        self.fields
            .iter()
            .filter_map(|f| f.column.as_ref().map(|c| (f, c)))
    }

    /// Fields without a column name.
    pub fn excluded(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.column.is_none())
    }
}

/// Parsed struct field.
#[derive(Debug)]
pub struct FieldDef {
    pub name: Ident,
    pub ty: Type,
    /// `None` when the field has no `column = "..."`; such fields are not persisted.
    pub column: Option<ColumnDef>,
}

/// Column mapping of a persisted field.
#[derive(Debug)]
pub struct ColumnDef {
    pub name: String,
    /// Span of the column name literal, for diagnostics.
    pub span: Span,
    pub flags: ColumnFlags,
}

/// Parse a `#[derive(Record)]` input.
pub fn parse_record(input: &DeriveInput) -> Result<RecordDef> {
    let name = input.ident.clone();
    let generics = input.generics.clone();

    let fields = match &input.data {
        Data::Struct(data) => parse_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not unions",
            ));
        }
    };

    Ok(RecordDef {
        table_name: table_name(&name),
        name,
        fields,
        generics,
    })
}

/// Table name for a struct: its simple name, lower-cased, no pluralization.
pub fn table_name(ident: &Ident) -> String {
    ident.unraw().to_string().to_lowercase()
}

fn parse_fields(fields: &Fields) -> Result<Vec<FieldDef>> {
    match fields {
        Fields::Named(named) => named.named.iter().map(parse_field).collect(),
        Fields::Unnamed(_) => Err(Error::new(
            Span::call_site(),
            "Record requires a struct with named fields, not a tuple struct",
        )),
        Fields::Unit => Err(Error::new(
            Span::call_site(),
            "Record requires a struct with fields, not a unit struct",
        )),
    }
}

fn parse_field(field: &Field) -> Result<FieldDef> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    Ok(FieldDef {
        column: parse_field_attrs(&field.attrs, &name)?,
        name,
        ty: field.ty.clone(),
    })
}

/// Intermediate struct for collecting field attributes.
#[derive(Default)]
struct FieldAttrs {
    column: Option<LitStr>,
    flags: ColumnFlags,
    /// First flag seen, used to point at orphaned flags.
    first_flag: Option<Span>,
}

/// Parse all `#[sqliter(...)]` attributes on a field.
///
/// Supported keys:
/// - `column = "name"` (required for the field to be persisted)
/// - `primary_key`, `unique`, `index`
/// - `attr = "PRIMARY KEY UNIQUE INDEX"` (any combination, case-insensitive)
fn parse_field_attrs(attrs: &[Attribute], field_name: &Ident) -> Result<Option<ColumnDef>> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("sqliter") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let path = &meta.path;

            if path.is_ident("column") {
                let value: Lit = meta.value()?.parse()?;
                if let Lit::Str(lit_str) = value {
                    if result.column.is_some() {
                        return Err(Error::new_spanned(lit_str, "duplicate `column` attribute"));
                    }
                    result.column = Some(lit_str);
                } else {
                    return Err(Error::new_spanned(
                        value,
                        "expected string literal for column name",
                    ));
                }
            } else if let Some(flag) = flag_keyword(path) {
                result.flags = result.flags | flag;
                result.first_flag.get_or_insert(path.span());
            } else if path.is_ident("attr") {
                let value: Lit = meta.value()?.parse()?;
                if let Lit::Str(lit_str) = value {
                    result.flags = result.flags | parse_attr_string(&lit_str)?;
                    result.first_flag.get_or_insert(lit_str.span());
                } else {
                    return Err(Error::new_spanned(
                        value,
                        "expected string literal for attr",
                    ));
                }
            } else {
                let name = path.to_token_stream().to_string();
                return Err(meta.error(format!(
                    "unknown sqliter attribute `{}` on field `{}`",
                    name, field_name
                )));
            }
            Ok(())
        })?;
    }

    match result.column {
        Some(lit) => Ok(Some(ColumnDef {
            name: lit.value(),
            span: lit.span(),
            flags: result.flags,
        })),
        None => match result.first_flag {
            Some(span) => Err(Error::new(
                span,
                format!(
                    "field `{}` has column flags but no `column = \"...\"`; unnamed fields are not persisted",
                    field_name
                ),
            )),
            None => Ok(None),
        },
    }
}

fn flag_keyword(path: &syn::Path) -> Option<ColumnFlags> {
    if path.is_ident("primary_key") {
        Some(ColumnFlags::PRIMARY_KEY)
    } else if path.is_ident("unique") {
        Some(ColumnFlags::UNIQUE)
    } else if path.is_ident("index") {
        Some(ColumnFlags::INDEX)
    } else {
        None
    }
}

/// Parse the legacy attribute string (`"PRIMARY KEY"`, `"unique index"`, ...)
/// with the same rules the runtime uses, reporting errors at the literal.
pub fn parse_attr_string(lit: &LitStr) -> Result<ColumnFlags> {
    ColumnFlags::parse(&lit.value()).map_err(|e| Error::new_spanned(lit, e))
}

/// Render a field type the way it was written, without token spacing.
pub fn type_string(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
}
