//! Leaf clause constructors.
//!
//! Every function returns a fresh [`Clause`]. Field-level clauses produce
//! `{ kind: { field: options } }`; the text-query family produces
//! `{ kind: { query, ...options } }`. Options are copied into the body as
//! given, including fields this crate does not recognize.
//!
//! The range constructor lives in [`crate::query::range`] because it parses
//! a shorthand syntax and can therefore fail.

use serde_json::{Map, Value};

use crate::query::clause::{Clause, ClauseKind};
use crate::query::options::{
    CombinedFieldsOptions, FuzzyOptions, MatchBoolPrefixOptions, MatchOptions,
    MatchPhraseOptions, MatchPhrasePrefixOptions, MinimumShouldMatch, MultiMatchOptions,
    NestedOptions, PrefixOptions, QueryStringOptions, RegexpOptions, SimpleQueryStringOptions,
    TermOptions, TermsOptions, encode_options,
};

/// Build `{ kind: { field: options, ...siblings } }`.
pub(crate) fn field_clause(
    kind: ClauseKind,
    field: String,
    options: Map<String, Value>,
    siblings: Map<String, Value>,
) -> Clause {
    let mut body = Map::new();
    body.insert(field, Value::Object(options));
    body.extend(siblings);
    Clause::new(kind, Value::Object(body))
}

/// Build `{ kind: { lead_key: lead, ...options } }`. Options win on a key
/// collision.
fn flat_clause(kind: ClauseKind, lead_key: &str, lead: Value, options: Map<String, Value>) -> Clause {
    let mut body = Map::new();
    body.insert(lead_key.to_string(), lead);
    body.extend(options);
    Clause::new(kind, Value::Object(body))
}

/// A clause matching every document.
pub fn match_all() -> Clause {
    Clause::new(ClauseKind::MatchAll, Value::Object(Map::new()))
}

/// Full-text `match` on one field.
///
/// `options` may be a bare scalar, which becomes `{ "query": scalar }`.
///
/// ```
/// use esquery::query::match_query;
/// use serde_json::json;
///
/// let clause = match_query("title", "rust");
/// assert_eq!(
///     serde_json::to_value(&clause).unwrap(),
///     json!({"match": {"title": {"query": "rust"}}})
/// );
/// ```
pub fn match_query<F, O>(field: F, options: O) -> Clause
where
    F: Into<String>,
    O: Into<MatchOptions>,
{
    field_clause(
        ClauseKind::Match,
        field.into(),
        encode_options(&options.into()),
        Map::new(),
    )
}

/// `match_bool_prefix` on one field.
///
/// A `minimum_should_match` is emitted next to the field entry.
pub fn match_bool_prefix<F, O>(
    field: F,
    options: O,
    minimum_should_match: Option<MinimumShouldMatch>,
) -> Clause
where
    F: Into<String>,
    O: Into<MatchBoolPrefixOptions>,
{
    let mut siblings = Map::new();
    if let Some(msm) = minimum_should_match {
        siblings.insert("minimum_should_match".to_string(), msm_value(msm));
    }
    field_clause(
        ClauseKind::MatchBoolPrefix,
        field.into(),
        encode_options(&options.into()),
        siblings,
    )
}

/// `match_phrase` on one field, with an optional `slop` next to the field
/// entry.
pub fn match_phrase<F, O>(field: F, options: O, slop: Option<u32>) -> Clause
where
    F: Into<String>,
    O: Into<MatchPhraseOptions>,
{
    let mut siblings = Map::new();
    if let Some(slop) = slop {
        siblings.insert("slop".to_string(), Value::from(slop));
    }
    field_clause(
        ClauseKind::MatchPhrase,
        field.into(),
        encode_options(&options.into()),
        siblings,
    )
}

/// `match_phrase_prefix` on one field.
pub fn match_phrase_prefix<F, O>(field: F, options: O) -> Clause
where
    F: Into<String>,
    O: Into<MatchPhrasePrefixOptions>,
{
    field_clause(
        ClauseKind::MatchPhrasePrefix,
        field.into(),
        encode_options(&options.into()),
        Map::new(),
    )
}

/// `multi_match` of one query text over several fields.
pub fn multi_match<Q: Into<Value>>(query: Q, options: MultiMatchOptions) -> Clause {
    flat_clause(ClauseKind::MultiMatch, "query", query.into(), encode_options(&options))
}

/// `combined_fields` of one query text over several fields.
pub fn combined_fields<Q: Into<Value>>(query: Q, options: CombinedFieldsOptions) -> Clause {
    flat_clause(
        ClauseKind::CombinedFields,
        "query",
        query.into(),
        encode_options(&options),
    )
}

/// `query_string` in the engine's Lucene-like syntax.
pub fn query_string<Q: Into<Value>>(query: Q, options: QueryStringOptions) -> Clause {
    flat_clause(ClauseKind::QueryString, "query", query.into(), encode_options(&options))
}

/// `simple_query_string`.
pub fn simple_query_string<Q: Into<Value>>(query: Q, options: SimpleQueryStringOptions) -> Clause {
    flat_clause(
        ClauseKind::SimpleQueryString,
        "query",
        query.into(),
        encode_options(&options),
    )
}

/// `exists` for one field.
pub fn exists<F: Into<String>>(field: F) -> Clause {
    flat_clause(ClauseKind::Exists, "field", Value::String(field.into()), Map::new())
}

/// `fuzzy` on one field. A bare scalar becomes `{ "value": scalar }`.
pub fn fuzzy<F, O>(field: F, options: O) -> Clause
where
    F: Into<String>,
    O: Into<FuzzyOptions>,
{
    field_clause(
        ClauseKind::Fuzzy,
        field.into(),
        encode_options(&options.into()),
        Map::new(),
    )
}

/// `ids` over a list of document ids.
pub fn ids<I, S>(values: I) -> Clause
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let values = values
        .into_iter()
        .map(|id| Value::String(id.into()))
        .collect();
    flat_clause(ClauseKind::Ids, "values", Value::Array(values), Map::new())
}

/// `prefix` on one field. A bare scalar becomes `{ "value": scalar }`.
pub fn prefix<F, O>(field: F, options: O) -> Clause
where
    F: Into<String>,
    O: Into<PrefixOptions>,
{
    field_clause(
        ClauseKind::Prefix,
        field.into(),
        encode_options(&options.into()),
        Map::new(),
    )
}

/// `regexp` on one field. A bare scalar becomes `{ "value": scalar }`.
pub fn regexp<F, O>(field: F, options: O) -> Clause
where
    F: Into<String>,
    O: Into<RegexpOptions>,
{
    field_clause(
        ClauseKind::Regexp,
        field.into(),
        encode_options(&options.into()),
        Map::new(),
    )
}

/// Exact `term` on one field. A bare scalar becomes `{ "value": scalar }`.
pub fn term<F, O>(field: F, options: O) -> Clause
where
    F: Into<String>,
    O: Into<TermOptions>,
{
    field_clause(
        ClauseKind::Term,
        field.into(),
        encode_options(&options.into()),
        Map::new(),
    )
}

/// `terms`: any of several exact values on one field.
pub fn terms<F, I, V>(field: F, values: I, options: TermsOptions) -> Clause
where
    F: Into<String>,
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let field: String = field.into();
    let values = values.into_iter().map(Into::into).collect();
    flat_clause(
        ClauseKind::Terms,
        &field,
        Value::Array(values),
        encode_options(&options),
    )
}

/// `nested` query under `path`. A bare clause becomes the nested `query`.
pub fn nested<P, O>(path: P, options: O) -> Clause
where
    P: Into<String>,
    O: Into<NestedOptions>,
{
    flat_clause(
        ClauseKind::Nested,
        "path",
        Value::String(path.into()),
        encode_options(&options.into()),
    )
}

fn msm_value(msm: MinimumShouldMatch) -> Value {
    match msm {
        MinimumShouldMatch::Count(n) => Value::from(n),
        MinimumShouldMatch::Expression(s) => Value::String(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::options::{Fuzziness, Operator};
    use serde_json::json;

    fn json_of(clause: &Clause) -> Value {
        serde_json::to_value(clause).unwrap()
    }

    #[test]
    fn test_bare_scalar_equals_explicit_record() {
        assert_eq!(
            match_query("title", "rust"),
            match_query("title", MatchOptions::new("rust"))
        );
        assert_eq!(match_query("year", 2024), match_query("year", MatchOptions::new(2024)));
        assert_eq!(
            match_query("published", true),
            match_query("published", MatchOptions::new(true))
        );
        assert_eq!(
            match_phrase_prefix("title", "quick bro"),
            match_phrase_prefix("title", MatchPhrasePrefixOptions::new("quick bro"))
        );
        assert_eq!(term("user", "kimchy"), term("user", TermOptions::new("kimchy")));
        assert_eq!(fuzzy("user", "ki"), fuzzy("user", FuzzyOptions::new("ki")));
        assert_eq!(prefix("user", "ki"), prefix("user", PrefixOptions::new("ki")));
        assert_eq!(regexp("user", "k.*y"), regexp("user", RegexpOptions::new("k.*y")));
    }

    #[test]
    fn test_match_with_options() {
        let clause = match_query(
            "message",
            MatchOptions {
                operator: Some(Operator::And),
                fuzziness: Some(Fuzziness::Auto),
                ..MatchOptions::new("this is a test")
            },
        );

        assert_eq!(
            json_of(&clause),
            json!({"match": {"message": {
                "query": "this is a test",
                "operator": "AND",
                "fuzziness": "AUTO"
            }}})
        );
    }

    #[test]
    fn test_sibling_options() {
        let clause = match_bool_prefix("message", "quick brown f", Some(2.into()));
        assert_eq!(
            json_of(&clause),
            json!({"match_bool_prefix": {
                "message": {"query": "quick brown f"},
                "minimum_should_match": 2
            }})
        );

        let clause = match_phrase("message", "this is a test", Some(3));
        assert_eq!(
            json_of(&clause),
            json!({"match_phrase": {"message": {"query": "this is a test"}, "slop": 3}})
        );

        let clause = match_phrase("message", "this is a test", None);
        assert_eq!(
            json_of(&clause),
            json!({"match_phrase": {"message": {"query": "this is a test"}}})
        );
    }

    #[test]
    fn test_text_query_family() {
        let clause = multi_match(
            "brown fox",
            MultiMatchOptions {
                fields: vec!["subject".to_string(), "message".to_string()],
                ..Default::default()
            },
        );
        assert_eq!(
            json_of(&clause),
            json!({"multi_match": {"query": "brown fox", "fields": ["subject", "message"]}})
        );

        let clause = query_string("(new york city) OR (big apple)", QueryStringOptions {
            default_field: Some("content".to_string()),
            ..Default::default()
        });
        assert_eq!(
            json_of(&clause),
            json!({"query_string": {
                "query": "(new york city) OR (big apple)",
                "default_field": "content"
            }})
        );

        let clause = simple_query_string("\"fried eggs\" +(eggplant | potato)", Default::default());
        assert_eq!(clause.kind(), &ClauseKind::SimpleQueryString);

        let clause = combined_fields("database systems", CombinedFieldsOptions {
            fields: vec!["title".to_string(), "abstract".to_string()],
            operator: Some(Operator::And),
            ..Default::default()
        });
        assert_eq!(
            json_of(&clause),
            json!({"combined_fields": {
                "query": "database systems",
                "fields": ["title", "abstract"],
                "operator": "AND"
            }})
        );
    }

    #[test]
    fn test_term_level_clauses() {
        assert_eq!(json_of(&exists("user")), json!({"exists": {"field": "user"}}));
        assert_eq!(
            json_of(&ids(["1", "4", "100"])),
            json!({"ids": {"values": ["1", "4", "100"]}})
        );
        assert_eq!(
            json_of(&terms("user.id", ["kimchy", "elkbee"], TermsOptions {
                boost: Some(1.0),
                ..Default::default()
            })),
            json!({"terms": {"user.id": ["kimchy", "elkbee"], "boost": 1.0}})
        );
        assert_eq!(
            json_of(&term("user.id", TermOptions {
                boost: Some(1.5),
                ..TermOptions::new("kimchy")
            })),
            json!({"term": {"user.id": {"value": "kimchy", "boost": 1.5}}})
        );
        assert_eq!(json_of(&match_all()), json!({"match_all": {}}));
    }

    #[test]
    fn test_nested_wraps_inner_clause() {
        let clause = nested("obj1", match_query("obj1.name", "blue"));
        assert_eq!(
            json_of(&clause),
            json!({"nested": {
                "path": "obj1",
                "query": {"match": {"obj1.name": {"query": "blue"}}}
            }})
        );
    }

    #[test]
    fn test_unknown_options_are_preserved() {
        let clause = term("user", TermOptions::new("kimchy").with_extra("_name", "who"));
        assert_eq!(
            json_of(&clause),
            json!({"term": {"user": {"value": "kimchy", "_name": "who"}}})
        );
    }
}
