//! Turning built expressions into a request body.
//!
//! [`es_query`] merges the top-level members of each expression into one
//! JSON object, in argument order, and renders it as compact text. A member
//! supplied by a later expression replaces one of the same name from an
//! earlier expression. Only data reaches the output: builders contribute
//! the envelope they describe, never themselves.
//!
//! ```
//! use esquery::query::{Query, Sort, SortOrder, field, match_query};
//! use esquery::serializer::es_query;
//!
//! let mut query = Query::new(match_query("title", "rust"));
//! query.size(5);
//! let sort = Sort::new([field("date", SortOrder::Desc)]);
//!
//! let body = es_query(&[&query, &sort]).unwrap();
//! assert_eq!(
//!     body,
//!     r#"{"query":{"match":{"title":{"query":"rust"}}},"size":5,"sort":[{"date":{"order":"desc"}}]}"#
//! );
//! ```

use serde_json::{Map, Value};

use crate::error::{EsQueryError, Result};
use crate::query::{Clause, Container, Envelope, NotQuery, OrQuery, Query, Sort};

/// Something that contributes top-level members to a request body.
pub trait Expression {
    /// The members this expression adds, keyed by top-level name.
    fn members(&self) -> Result<Map<String, Value>>;
}

impl Expression for Envelope {
    fn members(&self) -> Result<Map<String, Value>> {
        into_object(serde_json::to_value(self)?)
    }
}

impl Expression for Query {
    fn members(&self) -> Result<Map<String, Value>> {
        self.envelope().members()
    }
}

impl Expression for OrQuery {
    fn members(&self) -> Result<Map<String, Value>> {
        self.envelope().members()
    }
}

impl Expression for NotQuery {
    fn members(&self) -> Result<Map<String, Value>> {
        self.envelope().members()
    }
}

impl Expression for Sort {
    fn members(&self) -> Result<Map<String, Value>> {
        let mut members = Map::new();
        members.insert("sort".to_string(), serde_json::to_value(self)?);
        Ok(members)
    }
}

/// A bare clause contributes `{ kind: body }` at the top level.
impl Expression for Clause {
    fn members(&self) -> Result<Map<String, Value>> {
        into_object(serde_json::to_value(self)?)
    }
}

/// A bare container contributes `{ occur: [...] }` at the top level.
impl Expression for Container {
    fn members(&self) -> Result<Map<String, Value>> {
        into_object(serde_json::to_value(self)?)
    }
}

/// Hand-written members (e.g. `_source`, `track_total_hits`) pass through.
impl Expression for Map<String, Value> {
    fn members(&self) -> Result<Map<String, Value>> {
        Ok(self.clone())
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(EsQueryError::validation(format!(
            "Expression must encode as a JSON object, got {other}"
        ))),
    }
}

/// Merge the members of every expression into one object.
pub fn merge(expressions: &[&dyn Expression]) -> Result<Map<String, Value>> {
    let mut body = Map::new();
    for expression in expressions {
        for (key, value) in expression.members()? {
            if body.contains_key(&key) {
                log::debug!("request body: `{key}` replaced by a later expression");
            }
            body.insert(key, value);
        }
    }
    Ok(body)
}

/// Merge the expressions and render the body as compact JSON text.
///
/// Keys are emitted in sorted order, so the same tree always renders to the
/// same bytes.
pub fn es_query(expressions: &[&dyn Expression]) -> Result<String> {
    let body = merge(expressions)?;
    Ok(serde_json::to_string(&body)?)
}

pub use self::es_query as build;
pub use self::es_query as build_query;
pub use self::es_query as elastic_search_query;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Paging, must, term};
    use serde_json::json;

    #[test]
    fn test_envelope_members() {
        let mut query = Query::new(term("a", 1));
        query.from(10).size(5);

        let body: Value = serde_json::from_str(&es_query(&[&query]).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"query": {"term": {"a": {"value": 1}}}, "from": 10, "size": 5})
        );
    }

    #[test]
    fn test_later_expressions_win() {
        let first = Query::with_paging(term("a", 1), Paging::new(None, Some(5)));
        let second = Query::new(term("b", 2));

        let body = merge(&[&first, &second]).unwrap();
        assert_eq!(body["query"], json!({"term": {"b": {"value": 2}}}));
        // `size` only came from the first expression.
        assert_eq!(body["size"], json!(5));
    }

    #[test]
    fn test_non_object_members_are_rejected() {
        let err = into_object(json!([1, 2])).unwrap_err();
        assert!(matches!(err, EsQueryError::Validation(_)));
        assert!(into_object(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_raw_members_and_containers() {
        let mut extra = Map::new();
        extra.insert("track_total_hits".to_string(), json!(true));

        let body = merge(&[&must([term("a", 1)]), &extra]).unwrap();
        assert_eq!(
            Value::Object(body),
            json!({"must": [{"term": {"a": {"value": 1}}}], "track_total_hits": true})
        );
    }

    #[test]
    fn test_aliases_render_identically() {
        let query = OrQuery::new(Default::default());
        let expected = es_query(&[&query]).unwrap();

        assert_eq!(build(&[&query]).unwrap(), expected);
        assert_eq!(build_query(&[&query]).unwrap(), expected);
        assert_eq!(elastic_search_query(&[&query]).unwrap(), expected);
        assert_eq!(expected, r#"{"query":{"bool":{"should":[]}}}"#);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(es_query(&[]).unwrap(), "{}");
    }
}
