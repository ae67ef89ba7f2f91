//! Per-type field metadata consumed by the mapping engine.

use crate::kind::ScalarKind;

/// Declared kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    /// Any other type, by its source spelling. Never mapped.
    Other(&'static str),
}

/// Metadata for one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDesc {
    /// Declared name, after any container-level renaming.
    pub name: &'static str,
    pub kind: FieldKind,
    /// Alias table: `(tag key, alias)`.
    pub tags: &'static [(&'static str, &'static str)],
    /// Whether the engine may read and write this field.
    pub exported: bool,
}

impl FieldDesc {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            tags: &[],
            exported: true,
        }
    }

    pub const fn scalar(name: &'static str, kind: ScalarKind) -> Self {
        Self::new(name, FieldKind::Scalar(kind))
    }

    pub const fn with_tags(mut self, tags: &'static [(&'static str, &'static str)]) -> Self {
        self.tags = tags;
        self
    }

    pub const fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Alias stored under `key`, if any.
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(tag_key, _)| *tag_key == key)
            .map(|(_, alias)| *alias)
    }

    /// External key for this field under `tag_key`.
    ///
    /// An empty `tag_key`, a missing alias, or an empty alias all fall back to
    /// the declared name.
    pub fn resolve_name(&self, tag_key: &str) -> &'static str {
        if tag_key.is_empty() {
            return self.name;
        }
        match self.tag(tag_key) {
            Some(alias) if !alias.is_empty() => alias,
            _ => self.name,
        }
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.kind {
            FieldKind::Scalar(kind) => Some(kind),
            FieldKind::Other(_) => None,
        }
    }

    /// Exported and of a supported kind.
    pub fn is_mappable(&self) -> bool {
        self.exported && self.scalar_kind().is_some()
    }
}

/// Ordered field metadata for a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub type_name: &'static str,
    pub fields: Vec<FieldDesc>,
}

impl RecordDescriptor {
    pub fn new(type_name: &'static str, fields: Vec<FieldDesc>) -> Self {
        Self { type_name, fields }
    }

    /// Looks a field up by declared name.
    pub fn field(&self, name: &str) -> Option<&FieldDesc> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// `(index, field, kind)` for every mappable field, in declaration order.
    pub fn mappable_fields(&self) -> impl Iterator<Item = (usize, &FieldDesc, ScalarKind)> + '_ {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.exported)
            .filter_map(|(index, field)| field.scalar_kind().map(|kind| (index, field, kind)))
    }

    /// External keys the engine reads and writes under `tag_key`.
    pub fn keys<'a>(&'a self, tag_key: &'a str) -> impl Iterator<Item = &'static str> + 'a {
        self.mappable_fields()
            .map(move |(_, field, _)| field.resolve_name(tag_key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordDescriptor {
        RecordDescriptor::new(
            "Sample",
            vec![
                FieldDesc::scalar("Uint8", ScalarKind::U8),
                FieldDesc::scalar("Float32", ScalarKind::F32).with_tags(&[("json", "f32")]),
                FieldDesc::scalar("Blank", ScalarKind::I32).with_tags(&[("json", "")]),
                FieldDesc::new("Nested", FieldKind::Other("Vec<u8>")),
                FieldDesc::scalar("hidden", ScalarKind::I64).unexported(),
            ],
        )
    }

    #[test]
    fn resolve_name_prefers_non_empty_aliases() {
        let desc = sample();
        let float = desc.field("Float32").unwrap();
        assert_eq!(float.resolve_name("json"), "f32");
        assert_eq!(float.resolve_name(""), "Float32");
        assert_eq!(float.resolve_name("yaml"), "Float32");

        let blank = desc.field("Blank").unwrap();
        assert_eq!(blank.tag("json"), Some(""));
        assert_eq!(blank.resolve_name("json"), "Blank");
    }

    #[test]
    fn mappable_fields_skip_unexported_and_unsupported() {
        let desc = sample();
        let names: Vec<_> = desc
            .mappable_fields()
            .map(|(index, field, _)| (index, field.name))
            .collect();
        assert_eq!(names, vec![(0, "Uint8"), (1, "Float32"), (2, "Blank")]);
        assert!(!desc.field("hidden").unwrap().is_mappable());
        assert!(!desc.field("Nested").unwrap().is_mappable());
    }

    #[test]
    fn keys_follow_the_tag() {
        let desc = sample();
        assert_eq!(
            desc.keys("json").collect::<Vec<_>>(),
            vec!["Uint8", "f32", "Blank"]
        );
    }
}
