//! Sort clauses for the request body.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::query::clause::resolve_path;
use crate::query::options::to_object;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// How multi-valued fields are reduced before sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    Min,
    Max,
    Sum,
    Avg,
    Median,
}

/// Options of one sort entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SortMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmapped_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<SortOrder> for SortOptions {
    fn from(order: SortOrder) -> Self {
        SortOptions {
            order: Some(order),
            ..Default::default()
        }
    }
}

/// One sort entry: either a bare field name (`"_score"`) or
/// `{ field: options }`.
#[derive(Debug, Clone, PartialEq)]
pub struct SortField {
    field: String,
    options: Option<SortOptions>,
}

impl SortField {
    /// A bare entry sorting on `field` with engine defaults.
    pub fn new<S: Into<String>>(field: S) -> Self {
        SortField {
            field: field.into(),
            options: None,
        }
    }

    /// An entry with explicit options.
    pub fn with_options<S: Into<String>, O: Into<SortOptions>>(field: S, options: O) -> Self {
        SortField {
            field: field.into(),
            options: Some(options.into()),
        }
    }

    /// Get the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the options, if any.
    pub fn options(&self) -> Option<&SortOptions> {
        self.options.as_ref()
    }

    /// Check whether a dot-separated key selects this entry.
    ///
    /// The first segment is the field name; further segments must resolve
    /// inside the options (`"price.order"`). A bare entry only matches its
    /// exact field name.
    pub fn matches_path(&self, path: &str) -> bool {
        if path == self.field {
            return true;
        }
        let Some(rest) = path
            .strip_prefix(self.field.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
        else {
            return false;
        };
        let segments: Vec<&str> = rest.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return false;
        }
        match &self.options {
            Some(options) => to_object(options)
                .is_ok_and(|options| resolve_path(&Value::Object(options), &segments)),
            None => false,
        }
    }
}

impl From<&str> for SortField {
    fn from(field: &str) -> Self {
        SortField::new(field)
    }
}

impl From<String> for SortField {
    fn from(field: String) -> Self {
        SortField::new(field)
    }
}

impl Serialize for SortField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.options {
            None => serializer.serialize_str(&self.field),
            Some(options) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&self.field, options)?;
                map.end()
            }
        }
    }
}

/// Shorthand for [`SortField::with_options`]: `{ field: options }`.
pub fn field<S: Into<String>, O: Into<SortOptions>>(name: S, options: O) -> SortField {
    SortField::with_options(name, options)
}

/// An ordered list of sort entries, attached to a request next to its
/// query.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sort {
    fields: Vec<SortField>,
}

impl Sort {
    /// Create a sort from entries in priority order.
    pub fn new<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<SortField>,
    {
        Sort {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Append entries after the existing ones.
    pub fn add<I, F>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = F>,
        F: Into<SortField>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        log::trace!("sort: {} entr(ies)", self.fields.len());
        self
    }

    /// Remove every entry selected by any of `keys` and return how many were
    /// removed.
    pub fn remove<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        let before = self.fields.len();
        self.fields
            .retain(|entry| !keys.iter().any(|key| entry.matches_path(key.as_ref())));
        let removed = before - self.fields.len();
        log::debug!("sort: removed {removed} entr(ies)");
        removed
    }

    /// Get the entries.
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_serialization() {
        let sort = Sort::new([
            field("post_date", SortOrder::Asc),
            SortField::new("user"),
            field("age", SortOrder::Desc),
            "_score".into(),
        ]);

        assert_eq!(
            serde_json::to_value(&sort).unwrap(),
            json!([
                {"post_date": {"order": "asc"}},
                "user",
                {"age": {"order": "desc"}},
                "_score"
            ])
        );
    }

    #[test]
    fn test_sort_add_and_remove() {
        let mut sort = Sort::new(["_score"]);
        sort.add([
            field("price", SortOptions {
                order: Some(SortOrder::Asc),
                mode: Some(SortMode::Avg),
                ..Default::default()
            }),
            field("date", SortOrder::Desc),
        ]);
        assert_eq!(sort.len(), 3);

        assert_eq!(sort.remove(["price"]), 1);
        assert_eq!(
            sort.fields(),
            &[SortField::new("_score"), field("date", SortOrder::Desc)]
        );

        assert_eq!(sort.remove(["date.order", "_score"]), 2);
        assert!(sort.is_empty());
    }

    #[test]
    fn test_matches_path() {
        let entry = field("price", SortOrder::Asc);
        assert!(entry.matches_path("price"));
        assert!(entry.matches_path("price.order"));
        assert!(!entry.matches_path("price.mode"));
        assert!(!entry.matches_path("pricey"));
        assert!(!entry.matches_path("price."));

        let bare = SortField::new("_score");
        assert!(bare.matches_path("_score"));
        assert!(!bare.matches_path("_score.order"));
    }
}
