//! The clause value type shared by every constructor and builder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EsQueryError, Result};

/// The type tag of a clause, i.e. its single top-level key.
///
/// The string forms are the query-DSL keys and must never change. Keys this
/// crate has no constructor for are carried as [`ClauseKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    MatchAll,
    Match,
    MatchBoolPrefix,
    MatchPhrase,
    MatchPhrasePrefix,
    MultiMatch,
    CombinedFields,
    QueryString,
    SimpleQueryString,
    Fuzzy,
    Range,
    Regexp,
    Term,
    Terms,
    Prefix,
    Exists,
    Ids,
    Nested,
    Bool,
    /// Any other query-DSL key, e.g. `wildcard` or `constant_score`.
    Other(String),
}

impl ClauseKind {
    /// All clause kinds with a dedicated variant.
    pub const ALL: [ClauseKind; 19] = [
        ClauseKind::MatchAll,
        ClauseKind::Match,
        ClauseKind::MatchBoolPrefix,
        ClauseKind::MatchPhrase,
        ClauseKind::MatchPhrasePrefix,
        ClauseKind::MultiMatch,
        ClauseKind::CombinedFields,
        ClauseKind::QueryString,
        ClauseKind::SimpleQueryString,
        ClauseKind::Fuzzy,
        ClauseKind::Range,
        ClauseKind::Regexp,
        ClauseKind::Term,
        ClauseKind::Terms,
        ClauseKind::Prefix,
        ClauseKind::Exists,
        ClauseKind::Ids,
        ClauseKind::Nested,
        ClauseKind::Bool,
    ];

    /// The query-DSL key for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            ClauseKind::MatchAll => "match_all",
            ClauseKind::Match => "match",
            ClauseKind::MatchBoolPrefix => "match_bool_prefix",
            ClauseKind::MatchPhrase => "match_phrase",
            ClauseKind::MatchPhrasePrefix => "match_phrase_prefix",
            ClauseKind::MultiMatch => "multi_match",
            ClauseKind::CombinedFields => "combined_fields",
            ClauseKind::QueryString => "query_string",
            ClauseKind::SimpleQueryString => "simple_query_string",
            ClauseKind::Fuzzy => "fuzzy",
            ClauseKind::Range => "range",
            ClauseKind::Regexp => "regexp",
            ClauseKind::Term => "term",
            ClauseKind::Terms => "terms",
            ClauseKind::Prefix => "prefix",
            ClauseKind::Exists => "exists",
            ClauseKind::Ids => "ids",
            ClauseKind::Nested => "nested",
            ClauseKind::Bool => "bool",
            ClauseKind::Other(key) => key.as_str(),
        }
    }

    /// Whether the body is keyed by field name, `{ field: {...} }`.
    fn is_field_keyed(&self) -> bool {
        matches!(
            self,
            ClauseKind::Match
                | ClauseKind::MatchBoolPrefix
                | ClauseKind::MatchPhrase
                | ClauseKind::MatchPhrasePrefix
                | ClauseKind::Fuzzy
                | ClauseKind::Range
                | ClauseKind::Regexp
                | ClauseKind::Term
                | ClauseKind::Terms
                | ClauseKind::Prefix
        )
    }

    /// Whether the body names its fields in values (`field`, `path`,
    /// `fields`) rather than keys.
    fn names_fields_in_values(&self) -> bool {
        matches!(
            self,
            ClauseKind::Exists
                | ClauseKind::Nested
                | ClauseKind::MultiMatch
                | ClauseKind::CombinedFields
                | ClauseKind::QueryString
                | ClauseKind::SimpleQueryString
        )
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClauseKind {
    type Err = EsQueryError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(EsQueryError::validation("Clause type must not be empty"));
        }
        Ok(ClauseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .unwrap_or_else(|| ClauseKind::Other(s.to_string())))
    }
}

/// A single query clause: `{ kind: body }`.
///
/// Clauses are immutable once built. Compound clauses embed their children
/// in the body, so a clause owns its whole subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Clause {
    kind: ClauseKind,
    body: Value,
}

impl Clause {
    /// Create a clause from a kind and an already shaped body.
    pub fn new(kind: ClauseKind, body: Value) -> Self {
        Clause { kind, body }
    }

    /// Build a clause from a raw single-key JSON object such as
    /// `{"match_all": {}}`. Any key is accepted, so clauses without a
    /// constructor here (`{"wildcard": {...}}`) can still join a tree.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(EsQueryError::validation("Clause must be a JSON object"));
        };
        if map.len() != 1 {
            return Err(EsQueryError::validation(format!(
                "Clause must have exactly one top-level key, got {}",
                map.len()
            )));
        }
        let Some((key, body)) = map.into_iter().next() else {
            return Err(EsQueryError::validation("Clause must not be empty"));
        };

        Ok(Clause::new(key.parse()?, body))
    }

    /// Get the clause type.
    pub fn kind(&self) -> &ClauseKind {
        &self.kind
    }

    /// Get the clause body (everything under the type key).
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The field names this clause targets.
    ///
    /// Field-keyed bodies report their keys (minus sibling options such as
    /// `slop`). `exists` reports `field`, `nested` its `path`, and the
    /// multi-field text queries their `fields` without `^boost` suffixes.
    /// Other kinds target no field.
    pub fn field_names(&self) -> Vec<&str> {
        let Value::Object(body) = &self.body else {
            return Vec::new();
        };

        match &self.kind {
            kind if kind.is_field_keyed() => body
                .keys()
                .map(String::as_str)
                .filter(|key| !SIBLING_KEYS.contains(key))
                .collect(),
            ClauseKind::Exists => body.get("field").and_then(Value::as_str).into_iter().collect(),
            ClauseKind::Nested => body.get("path").and_then(Value::as_str).into_iter().collect(),
            ClauseKind::MultiMatch
            | ClauseKind::CombinedFields
            | ClauseKind::QueryString
            | ClauseKind::SimpleQueryString => body
                .get("fields")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .filter_map(Value::as_str)
                .filter_map(|field| field.split('^').next())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Check whether a dot-separated key selects this clause.
    ///
    /// The key may start at the type key (`"match.title"`) or directly at a
    /// field (`"title"`). For kinds that target fields, the first segment
    /// after the type key must be one of [`Clause::field_names`]; remaining
    /// segments must resolve inside that field's options. For kinds that
    /// target no field (`bool`, `ids`, unknown kinds) the segments resolve
    /// through the body. Array elements are never traversed.
    pub fn matches_path(&self, path: &str) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return false;
        }

        (segments[0] == self.kind.as_str() && self.matches_body_path(&segments[1..]))
            || self.matches_body_path(&segments)
    }

    fn matches_body_path(&self, segments: &[&str]) -> bool {
        let Some((head, rest)) = segments.split_first() else {
            return true;
        };

        if self.kind.is_field_keyed() {
            self.field_names().contains(head)
                && self
                    .body
                    .get(*head)
                    .is_some_and(|options| resolve_path(options, rest))
        } else if self.kind.names_fields_in_values() {
            rest.is_empty() && self.field_names().contains(head)
        } else {
            resolve_path(&self.body, segments)
        }
    }
}

impl From<Clause> for Value {
    fn from(clause: Clause) -> Self {
        let mut map = Map::new();
        map.insert(clause.kind.as_str().to_string(), clause.body);
        Value::Object(map)
    }
}

impl TryFrom<Value> for Clause {
    type Error = EsQueryError;

    fn try_from(value: Value) -> Result<Self> {
        Clause::from_value(value)
    }
}

/// Options some field-keyed clauses carry next to the field entry.
const SIBLING_KEYS: [&str; 4] = ["minimum_should_match", "slop", "boost", "_name"];

/// Walk `segments` through nested objects starting at `value`.
pub(crate) fn resolve_path(value: &Value, segments: &[&str]) -> bool {
    match segments.split_first() {
        None => true,
        Some((head, rest)) => match value {
            Value::Object(map) => map.get(*head).is_some_and(|v| resolve_path(v, rest)),
            _ => false,
        },
    }
}
