//! Documents: JSON objects keyed by field name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One persisted or in-memory model instance.
pub type Document = Map<String, Value>;

/// Field holding the store-assigned identity.
pub const ID_FIELD: &str = "id";
/// Field holding the store's optimistic-concurrency token.
pub const REVISION_FIELD: &str = "revision";

/// Result of a successful delete: the deleted id and the revision the store recorded for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub id: String,
    pub revision: String,
}

/// True when a value counts as unset for a required field: null, "", [] or {}.
pub fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// A document with every field set to null.
pub fn template<'a, I>(fields: I) -> Document
where
    I: IntoIterator<Item = &'a String>,
{
    fields.into_iter().map(|f| (f.clone(), Value::Null)).collect()
}

/// Overlay `src` onto `base`; keys of `src` win.
pub fn merge_into(base: &mut Document, src: Document) {
    for (k, v) in src {
        base.insert(k, v);
    }
}

/// Keep only the given fields that hold a non-null value.
pub fn prune<'a, I>(doc: &Document, fields: I) -> Document
where
    I: IntoIterator<Item = &'a String>,
{
    fields
        .into_iter()
        .filter_map(|f| match doc.get(f) {
            Some(v) if !v.is_null() => Some((f.clone(), v.clone())),
            _ => None,
        })
        .collect()
}

/// String value of `id`, if set.
pub fn doc_id(doc: &Document) -> Option<&str> {
    doc.get(ID_FIELD).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// String value of `revision`, if set.
pub fn doc_revision(doc: &Document) -> Option<&str> {
    doc.get(REVISION_FIELD).and_then(Value::as_str).filter(|s| !s.is_empty())
}
