//! Integration tests for building and serializing request bodies.

use esquery::error::Result;
use esquery::prelude::*;
use serde_json::{Value, json};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[test]
fn test_bare_scalars_match_explicit_records() -> Result<()> {
    let scalar = es_query(&[&Query::new(match_query("title", "rust"))])?;
    let record = es_query(&[&Query::new(match_query("title", MatchOptions {
        query: json!("rust"),
        ..Default::default()
    }))])?;
    assert_eq!(scalar, record);

    for (bare, explicit) in [
        (match_query("n", 7), match_query("n", MatchOptions::new(7))),
        (match_query("b", false), match_query("b", MatchOptions::new(false))),
        (term("t", 1.5), term("t", TermOptions::new(1.5))),
        (prefix("p", "ab"), prefix("p", PrefixOptions::new("ab"))),
    ] {
        assert_eq!(bare, explicit);
    }

    Ok(())
}

#[test]
fn test_range_shorthand() -> Result<()> {
    let clause = range("age >= 18", RangeOptions::default())?;
    assert_eq!(
        serde_json::to_value(&clause)?,
        json!({"range": {"age": {"gte": "18"}}})
    );

    let clause = range("age > 10 < 20", RangeOptions::default())?;
    assert_eq!(
        serde_json::to_value(&clause)?,
        json!({"range": {"age": {"gt": "10", "lt": "20"}}})
    );

    let err = range("age >", RangeOptions::default()).unwrap_err();
    assert!(matches!(err, EsQueryError::Validation(_)));

    Ok(())
}

#[test]
fn test_bool_of_containers() -> Result<()> {
    let a = match_query("title", "rust");
    let b = term("lang", "en");

    let clause = bool_query([BoolPart::from(must([a.clone()])), should([b.clone()]).into()]);
    assert_eq!(
        serde_json::to_value(&clause)?,
        json!({"bool": {
            "must": [{"match": {"title": {"query": "rust"}}}],
            "should": [{"term": {"lang": {"value": "en"}}}]
        }})
    );

    // The second `must` replaces the first instead of merging with it.
    let clause = bool_query([must([a]), must([b])]);
    assert_eq!(
        serde_json::to_value(&clause)?,
        json!({"bool": {"must": [{"term": {"lang": {"value": "en"}}}]}})
    );

    Ok(())
}

#[test]
fn test_query_paging_serialization() -> Result<()> {
    init_logging();

    let mut query = Query::new(match_query("title", "rust"));
    query.from(10).size(5);

    let body = es_query(&[&query])?;
    assert_eq!(
        parse(&body),
        json!({
            "query": {"match": {"title": {"query": "rust"}}},
            "from": 10,
            "size": 5
        })
    );
    for builder_name in ["replace", "add", "remove"] {
        assert!(!body.contains(builder_name));
    }

    Ok(())
}

#[test]
fn test_query_and_sort_merge() -> Result<()> {
    let query = NotQuery::new([term("status", "deleted")]);
    let mut sort = Sort::new([field("date", SortOrder::Desc)]);
    sort.add(["_score"]);

    let body = es_query(&[&query, &sort])?;
    assert_eq!(
        parse(&body),
        json!({
            "query": {"bool": {"must_not": [{"term": {"status": {"value": "deleted"}}}]}},
            "sort": [{"date": {"order": "desc"}}, "_score"]
        })
    );

    Ok(())
}

#[test]
fn test_serialization_is_idempotent() -> Result<()> {
    let mut query = OrQuery::from_args([
        OrArg::from(match_query("title", "rust")),
        OrArg::from(range("year >= 2020", RangeOptions::default())?),
        OrArg::generator(|| vec![exists("author"), ids(["1", "2"])]),
        OrArg::From(0),
        OrArg::Size(10),
    ])?;
    query.add([nested("comments", match_query("comments.text", "great"))]);

    let first = es_query(&[&query])?;
    let second = es_query(&[&query])?;
    assert_eq!(first, second);
    assert_eq!(build_again(&query)?, first);

    Ok(())
}

fn build_again(query: &OrQuery) -> Result<String> {
    esquery::serializer::build_query(&[query])
}

#[test]
fn test_full_request() -> Result<()> {
    let root = bool_query([
        BoolPart::from(must([multi_match("rust async", MultiMatchOptions {
            fields: vec!["title^2".to_string(), "body".to_string()],
            match_type: Some(MultiMatchType::BestFields),
            ..Default::default()
        })])),
        filter([
            range("published >= 2023-01-01", RangeOptions {
                format: Some("yyyy-MM-dd".to_string()),
                ..Default::default()
            })?,
            terms("tags", ["rust", "tokio"], TermsOptions::default()),
        ])
        .into(),
        must_not([term("draft", true)]).into(),
        MinimumShouldMatch::from(1).into(),
    ]);

    let mut query = Query::with_paging(root, Paging::new(Some(0), Some(10)));
    query.sort(Sort::new([field("published", SortOrder::Desc)]));

    assert_eq!(
        parse(&es_query(&[&query])?),
        json!({
            "query": {"bool": {
                "must": [{"multi_match": {
                    "query": "rust async",
                    "fields": ["title^2", "body"],
                    "type": "best_fields"
                }}],
                "filter": [
                    {"range": {"published": {"gte": "2023-01-01", "format": "yyyy-MM-dd"}}},
                    {"terms": {"tags": ["rust", "tokio"]}}
                ],
                "must_not": [{"term": {"draft": {"value": true}}}],
                "minimum_should_match": 1
            }},
            "from": 0,
            "size": 10,
            "sort": [{"published": {"order": "desc"}}]
        })
    );

    Ok(())
}
