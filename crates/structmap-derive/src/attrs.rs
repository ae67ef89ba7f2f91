//! Parsing of `#[structmap(...)]` and compatible `#[serde(...)]` attributes.

use convert_case::{Case, Casing};
use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, ExprLit, Lit, Meta, MetaList};

/// Tag key under which `#[serde(rename = "...")]` is registered.
pub(crate) const SERDE_TAG_KEY: &str = "serde";

const UNSUPPORTED_CONTAINER_ATTR_HINT: &str = "unsupported #[structmap(...)] attribute on a struct; hint: supported keys are `name` and `rename_all`";

const UNSUPPORTED_FIELD_ATTR_HINT: &str = "unsupported #[structmap(...)] attribute on a field; hint: supported keys are `rename`, `scalar`, `skip` and `tag(...)`";

#[derive(Default)]
pub(crate) struct ContainerAttrs {
    pub name: Option<String>,
    pub rename_all: Option<RenameRule>,
}

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
    pub scalar: bool,
    pub tags: Vec<(String, String)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RenameRule {
    Camel,
    Snake,
    Pascal,
    Kebab,
    ScreamingSnake,
    Lower,
    Upper,
    ScreamingKebab,
}

impl RenameRule {
    pub(crate) fn apply(self, name: &str) -> String {
        let case = match self {
            RenameRule::Camel => Case::Camel,
            RenameRule::Snake => Case::Snake,
            RenameRule::Pascal => Case::Pascal,
            RenameRule::Kebab => Case::Kebab,
            RenameRule::ScreamingSnake => Case::UpperSnake,
            RenameRule::Lower => return name.to_lowercase(),
            RenameRule::Upper => return name.to_uppercase(),
            RenameRule::ScreamingKebab => Case::UpperKebab,
        };
        name.to_case(case)
    }
}

impl ContainerAttrs {
    pub(crate) fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = ContainerAttrs::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("structmap")) {
            for meta in parse_meta_list(attr)? {
                match meta {
                    Meta::NameValue(meta) if meta.path.is_ident("name") => {
                        out.name = Some(parse_string_expr(&meta.value, meta.span())?);
                    }
                    Meta::NameValue(meta) if meta.path.is_ident("rename_all") => {
                        out.rename_all = Some(parse_rename_rule(&meta.value, meta.span())?);
                    }
                    _ => {
                        return Err(syn::Error::new_spanned(meta, UNSUPPORTED_CONTAINER_ATTR_HINT));
                    }
                }
            }
        }
        Ok(out)
    }
}

impl FieldAttrs {
    pub(crate) fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = FieldAttrs::default();
        for attr in attrs {
            if attr.path().is_ident("structmap") {
                parse_structmap_field_meta(attr, &mut out)?;
            }
        }
        // serde attributes only fill what #[structmap] left unset.
        for attr in attrs {
            if attr.path().is_ident("serde") {
                parse_serde_field_meta(attr, &mut out)?;
            }
        }
        Ok(out)
    }

    fn push_tag(&mut self, key: String, alias: String, span: Span) -> syn::Result<()> {
        if self.tags.iter().any(|(existing, _)| *existing == key) {
            return Err(syn::Error::new(
                span,
                format!("duplicate tag key `{key}`; hint: each tag key may appear once per field"),
            ));
        }
        self.tags.push((key, alias));
        Ok(())
    }
}

fn parse_structmap_field_meta(attr: &Attribute, out: &mut FieldAttrs) -> syn::Result<()> {
    for meta in parse_meta_list(attr)? {
        match meta {
            Meta::NameValue(meta) if meta.path.is_ident("rename") => {
                out.rename = Some(parse_string_expr(&meta.value, meta.span())?);
            }
            Meta::Path(path) if path.is_ident("skip") => {
                out.skip = true;
            }
            Meta::Path(path) if path.is_ident("scalar") => {
                out.scalar = true;
            }
            Meta::List(list) if list.path.is_ident("tag") => {
                parse_tag_list(&list, out)?;
            }
            _ => {
                return Err(syn::Error::new_spanned(meta, UNSUPPORTED_FIELD_ATTR_HINT));
            }
        }
    }
    Ok(())
}

fn parse_tag_list(list: &MetaList, out: &mut FieldAttrs) -> syn::Result<()> {
    let entries = list
        .parse_args_with(syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated)?;
    if entries.is_empty() {
        return Err(syn::Error::new_spanned(
            list,
            "empty tag list; hint: use tag(key = \"alias\")",
        ));
    }
    for entry in entries {
        let Meta::NameValue(entry) = entry else {
            return Err(syn::Error::new_spanned(
                entry,
                "expected `key = \"alias\"` inside tag(...)",
            ));
        };
        let Some(key) = entry.path.get_ident() else {
            return Err(syn::Error::new_spanned(
                &entry.path,
                "tag keys must be plain identifiers; hint: use tag(json = \"...\")",
            ));
        };
        let alias = parse_string_expr(&entry.value, entry.span())?;
        out.push_tag(key.unraw().to_string(), alias, entry.span())?;
    }
    Ok(())
}

fn parse_serde_field_meta(attr: &Attribute, out: &mut FieldAttrs) -> syn::Result<()> {
    for meta in parse_meta_list(attr)? {
        match meta {
            Meta::NameValue(meta) if meta.path.is_ident("rename") => {
                if !out.tags.iter().any(|(key, _)| key == SERDE_TAG_KEY) {
                    let alias = parse_string_expr(&meta.value, meta.span())?;
                    out.push_tag(SERDE_TAG_KEY.to_string(), alias, meta.span())?;
                }
            }
            Meta::Path(path) if path.is_ident("skip") => {
                out.skip = true;
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_meta_list(attr: &Attribute) -> syn::Result<Vec<Meta>> {
    let metas = attr
        .parse_args_with(syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated)?;
    Ok(metas.into_iter().collect())
}

fn parse_string_expr(expr: &Expr, span: Span) -> syn::Result<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Ok(value.value()),
        _ => Err(syn::Error::new(
            span,
            "expected string literal; hint: wrap the value in quotes",
        )),
    }
}

fn parse_rename_rule(expr: &Expr, span: Span) -> syn::Result<RenameRule> {
    let value = parse_string_expr(expr, span)?;
    match value.as_str() {
        "camelCase" => Ok(RenameRule::Camel),
        "snake_case" => Ok(RenameRule::Snake),
        "PascalCase" => Ok(RenameRule::Pascal),
        "kebab-case" => Ok(RenameRule::Kebab),
        "SCREAMING_SNAKE_CASE" => Ok(RenameRule::ScreamingSnake),
        "lowercase" => Ok(RenameRule::Lower),
        "UPPERCASE" => Ok(RenameRule::Upper),
        "SCREAMING-KEBAB-CASE" => Ok(RenameRule::ScreamingKebab),
        _ => Err(syn::Error::new(span, "unsupported rename_all value")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn field_attrs(input: syn::DeriveInput) -> syn::Result<FieldAttrs> {
        let syn::Data::Struct(data) = input.data else {
            panic!("expected a struct");
        };
        let field = data.fields.into_iter().next().expect("one field");
        FieldAttrs::parse(&field.attrs)
    }

    #[test]
    fn container_attrs_read_name_and_rename_all() {
        let input: syn::DeriveInput = parse_quote! {
            #[structmap(name = "Renamed", rename_all = "PascalCase")]
            pub struct Sample {
                pub a: u8,
            }
        };
        let attrs = ContainerAttrs::parse(&input.attrs).unwrap();
        assert_eq!(attrs.name.as_deref(), Some("Renamed"));
        assert_eq!(attrs.rename_all, Some(RenameRule::Pascal));
    }

    #[test]
    fn unknown_container_key_is_rejected() {
        let input: syn::DeriveInput = parse_quote! {
            #[structmap(flatten)]
            pub struct Sample {
                pub a: u8,
            }
        };
        let err = ContainerAttrs::parse(&input.attrs).err().unwrap();
        assert!(err.to_string().contains("supported keys are `name` and `rename_all`"));
    }

    #[test]
    fn field_tags_collect_in_order() {
        let input: syn::DeriveInput = parse_quote! {
            struct Sample {
                #[structmap(tag(json = "f32", r#type = "float"))]
                pub float32: f32
            }
        };
        let attrs = field_attrs(input).unwrap();
        assert_eq!(
            attrs.tags,
            vec![
                ("json".to_string(), "f32".to_string()),
                ("type".to_string(), "float".to_string()),
            ]
        );
        assert!(!attrs.skip);
    }

    #[test]
    fn scalar_flag_is_opt_in() {
        let input: syn::DeriveInput = parse_quote! {
            struct Sample {
                #[structmap(scalar, rename = "id")]
                pub id: SensorId
            }
        };
        let attrs = field_attrs(input).unwrap();
        assert!(attrs.scalar);
        assert_eq!(attrs.rename.as_deref(), Some("id"));
    }

    #[test]
    fn duplicate_tag_keys_are_rejected() {
        let input: syn::DeriveInput = parse_quote! {
            struct Sample {
                #[structmap(tag(json = "a"), tag(json = "b"))]
                pub value: i32
            }
        };
        let err = field_attrs(input).err().unwrap();
        assert!(err.to_string().starts_with("duplicate tag key `json`"));
    }

    #[test]
    fn serde_attrs_fill_the_serde_tag_and_skip() {
        let input: syn::DeriveInput = parse_quote! {
            struct Sample {
                #[serde(rename = "wire", default)]
                pub value: i32
            }
        };
        let attrs = field_attrs(input).unwrap();
        assert_eq!(attrs.tags, vec![("serde".to_string(), "wire".to_string())]);

        let input: syn::DeriveInput = parse_quote! {
            struct Sample {
                #[serde(skip)]
                pub cache: u64
            }
        };
        assert!(field_attrs(input).unwrap().skip);
    }

    #[test]
    fn explicit_serde_tag_wins_over_serde_rename() {
        let input: syn::DeriveInput = parse_quote! {
            struct Sample {
                #[structmap(tag(serde = "explicit"))]
                #[serde(rename = "ignored")]
                pub value: i32
            }
        };
        let attrs = field_attrs(input).unwrap();
        assert_eq!(attrs.tags, vec![("serde".to_string(), "explicit".to_string())]);
    }

    #[test]
    fn tag_values_must_be_strings() {
        let input: syn::DeriveInput = parse_quote! {
            struct Sample {
                #[structmap(tag(json = 5))]
                pub value: i32
            }
        };
        let err = field_attrs(input).err().unwrap();
        assert!(err.to_string().contains("expected string literal"));
    }

    #[test]
    fn rename_rules_apply_convert_case() {
        assert_eq!(RenameRule::Pascal.apply("uint8"), "Uint8");
        assert_eq!(RenameRule::Pascal.apply("float32"), "Float32");
        assert_eq!(RenameRule::Camel.apply("sensor_id"), "sensorId");
        assert_eq!(RenameRule::ScreamingSnake.apply("sensor_id"), "SENSOR_ID");
        assert_eq!(RenameRule::Kebab.apply("sensor_id"), "sensor-id");
    }
}
