//! Derive macro for structmap records.
//!
//! `#[derive(Record)]` generates a cached field descriptor plus index-based
//! field accessors for a struct with named fields.
//!
//! # Container Attributes
//!
//! - `#[structmap(rename_all = "...")]` - Rename every declared field name
//!   (`camelCase`, `snake_case`, `PascalCase`, `kebab-case`,
//!   `SCREAMING_SNAKE_CASE`, `lowercase`, `UPPERCASE`, `SCREAMING-KEBAB-CASE`)
//! - `#[structmap(name = "...")]` - Type name reported in errors
//!
//! # Field Attributes
//!
//! - `#[structmap(tag(json = "alias", ...))]` - Per-tag-key aliases
//! - `#[structmap(rename = "...")]` - Override the declared name
//! - `#[structmap(skip)]` - Never read or write this field
//! - `#[structmap(scalar)]` - Treat the field type as a scalar even when it is
//!   not spelled as one (a type alias such as `type Id = u64`)
//! - `#[serde(rename = "...")]` / `#[serde(skip)]` - Honored as the `serde`
//!   tag key and as `skip`
//!
//! Only `pub` fields take part. Scalar detection reads the type as written:
//! the last path segment must name a supported scalar (`u8`, `String`, ...).
//! Other fields, aliases included, are described but never mapped unless
//! marked `#[structmap(scalar)]`; the type must then implement `ScalarField`.

use proc_macro::TokenStream;
use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, FieldsNamed, Path, Type, Visibility, parse_macro_input};

mod attrs;

use attrs::{ContainerAttrs, FieldAttrs};

const SCALAR_TYPES: &[&str] = &[
    "bool", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize", "f32", "f64",
    "String",
];

#[proc_macro_derive(Record, attributes(structmap))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = resolve_runtime_crate().and_then(|runtime| expand_record(&input, &runtime));
    match expanded {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn resolve_runtime_crate() -> syn::Result<Path> {
    match crate_name("structmap") {
        // The runtime aliases itself (`extern crate self as structmap`) so the
        // absolute path also works in its own tests.
        Ok(FoundCrate::Itself) => Ok(syn::parse_quote!(::structmap)),
        Ok(FoundCrate::Name(name)) => {
            let ident = syn::Ident::new(&name.replace('-', "_"), Span::call_site());
            Ok(syn::parse_quote!(::#ident))
        }
        Err(_) => Err(syn::Error::new(
            Span::call_site(),
            "could not resolve `structmap`; add it as a dependency (renamed dependencies are supported)",
        )),
    }
}

/// One declared field, after attribute normalization.
struct FieldModel {
    ident: syn::Ident,
    ty: Type,
    name: String,
    tags: Vec<(String, String)>,
    exported: bool,
    scalar: bool,
}

impl FieldModel {
    fn is_mapped(&self) -> bool {
        self.exported && self.scalar
    }
}

struct RecordModel {
    type_name: String,
    fields: Vec<FieldModel>,
}

fn analyze(input: &DeriveInput) -> syn::Result<RecordModel> {
    let named = validate_input(input)?;
    let container = ContainerAttrs::parse(&input.attrs)?;

    let mut fields = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let attrs = FieldAttrs::parse(&field.attrs)?;
        let source_name = ident.unraw().to_string();
        let name = match (attrs.rename, container.rename_all) {
            (Some(rename), _) => rename,
            (None, Some(rule)) => rule.apply(&source_name),
            (None, None) => source_name,
        };
        fields.push(FieldModel {
            exported: matches!(field.vis, Visibility::Public(_)) && !attrs.skip,
            scalar: attrs.scalar || is_scalar_type(&field.ty),
            ty: field.ty.clone(),
            ident,
            name,
            tags: attrs.tags,
        });
    }

    let type_name = container
        .name
        .unwrap_or_else(|| input.ident.unraw().to_string());
    Ok(RecordModel { type_name, fields })
}

fn expand_record(input: &DeriveInput, runtime: &Path) -> syn::Result<TokenStream2> {
    let model = analyze(input)?;
    let name = &input.ident;
    let type_name = &model.type_name;

    let descriptors = model.fields.iter().map(|field| {
        let declared = &field.name;
        let ty = &field.ty;
        let kind = if field.scalar {
            quote! { #runtime::FieldKind::Scalar(<#ty as #runtime::ScalarField>::KIND) }
        } else {
            let spelled = ty.to_token_stream().to_string();
            quote! { #runtime::FieldKind::Other(#spelled) }
        };
        let tags = field.tags.iter().map(|(key, alias)| quote! { (#key, #alias) });
        let unexported = (!field.exported).then(|| quote! { .unexported() });
        quote! {
            #runtime::FieldDesc::new(#declared, #kind)
                .with_tags(&[#(#tags),*])
                #unexported
        }
    });

    let mapped: Vec<(usize, &FieldModel)> = model
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.is_mapped())
        .collect();

    let getters = mapped.iter().map(|(index, field)| {
        let ident = &field.ident;
        quote! {
            #index => ::std::option::Option::Some(#runtime::ScalarField::to_value(&self.#ident)),
        }
    });

    let setters = mapped.iter().map(|(index, field)| {
        let ident = &field.ident;
        quote! {
            #index => {
                self.#ident = #runtime::ScalarField::from_carrier(value)?;
                ::std::result::Result::Ok(())
            }
        }
    });

    Ok(quote! {
        #[automatically_derived]
        impl #runtime::Record for #name {
            fn descriptor() -> &'static #runtime::RecordDescriptor {
                static DESCRIPTOR: ::std::sync::OnceLock<#runtime::RecordDescriptor> =
                    ::std::sync::OnceLock::new();
                DESCRIPTOR.get_or_init(|| {
                    #runtime::RecordDescriptor::new(
                        #type_name,
                        ::std::vec![#(#descriptors),*],
                    )
                })
            }

            fn field_value(&self, index: usize) -> ::std::option::Option<#runtime::Value> {
                match index {
                    #(#getters)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_field_value(
                &mut self,
                index: usize,
                value: #runtime::Carrier,
            ) -> ::std::result::Result<(), #runtime::ConvertError> {
                match index {
                    #(#setters)*
                    _ => ::std::result::Result::Err(#runtime::ConvertError::NoSuchField { index }),
                }
            }
        }
    })
}

fn validate_input(input: &DeriveInput) -> syn::Result<&FieldsNamed> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs; hint: wrap a concrete instantiation in its own struct",
        ));
    }

    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(named),
            Fields::Unit => Err(syn::Error::new_spanned(
                input,
                "Unit structs are not supported as records; hint: use a named-field struct",
            )),
            Fields::Unnamed(_) => Err(syn::Error::new_spanned(
                input,
                "Tuple structs are not supported as records; hint: use a named-field struct",
            )),
        },
        Data::Enum(data) => Err(syn::Error::new(
            data.enum_token.span(),
            "Record does not support enums; hint: use a struct with named fields",
        )),
        Data::Union(data) => Err(syn::Error::new(
            data.union_token.span(),
            "Record does not support `union` items; hint: use a struct with named fields",
        )),
    }
}

/// Syntactic check on the last path segment; the kind itself comes from
/// `ScalarField::KIND`.
fn is_scalar_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            path.path.segments.last().is_some_and(|segment| {
                segment.arguments.is_none()
                    && SCALAR_TYPES.iter().any(|name| segment.ident == *name)
            })
        }
        Type::Group(group) => is_scalar_type(&group.elem),
        Type::Paren(paren) => is_scalar_type(&paren.elem),
        _ => false,
    }
}
