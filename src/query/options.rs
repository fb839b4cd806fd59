//! Option records for the leaf clause constructors.
//!
//! Each record mirrors the options of one query-DSL clause. Recognized
//! options are typed fields; anything else goes into `extra` and is emitted
//! unchanged, so options newer than this crate still reach the engine.
//! Nothing here is validated against the engine's own rules.
//!
//! Records that carry a `query` or `value` can be built from a bare scalar:
//!
//! ```
//! use esquery::query::MatchOptions;
//!
//! let options = MatchOptions::from("quick brown fox");
//! assert_eq!(options.query, "quick brown fox");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EsQueryError, Result};
use crate::query::clause::Clause;

/// Fuzziness accepted by the match family and fuzzy clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fuzziness {
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2")]
    Two,
}

/// Boolean operator joining analyzed terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    And,
    Or,
}

/// What to match when the analyzer removes every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroTermsQuery {
    None,
    All,
}

/// How a multi_match query combines its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiMatchType {
    BestFields,
    MostFields,
    CrossFields,
    Phrase,
    PhrasePrefix,
    BoolPrefix,
}

/// Range relation for range fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RangeRelation {
    Intersects,
    Contains,
    Within,
}

/// Score mode of a nested query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    Avg,
    Max,
    Min,
    None,
    Sum,
}

/// Multi-term rewrite method.
///
/// The `top_terms*` methods carry their size, e.g. `top_terms_10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Rewrite {
    ConstantScore,
    ConstantScoreBoolean,
    ScoringBoolean,
    TopTermsBlendedFreqs(u32),
    TopTermsBoost(u32),
    TopTerms(u32),
}

impl fmt::Display for Rewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rewrite::ConstantScore => f.write_str("constant_score"),
            Rewrite::ConstantScoreBoolean => f.write_str("constant_score_boolean"),
            Rewrite::ScoringBoolean => f.write_str("scoring_boolean"),
            Rewrite::TopTermsBlendedFreqs(n) => write!(f, "top_terms_blended_freqs_{n}"),
            Rewrite::TopTermsBoost(n) => write!(f, "top_terms_boost_{n}"),
            Rewrite::TopTerms(n) => write!(f, "top_terms_{n}"),
        }
    }
}

impl FromStr for Rewrite {
    type Err = EsQueryError;

    fn from_str(s: &str) -> Result<Self> {
        let sized = |prefix: &str| -> Option<Result<u32>> {
            s.strip_prefix(prefix).map(|n| {
                n.parse::<u32>().map_err(|_| {
                    EsQueryError::validation(format!("Invalid rewrite size in {s:?}"))
                })
            })
        };

        match s {
            "constant_score" => Ok(Rewrite::ConstantScore),
            "constant_score_boolean" => Ok(Rewrite::ConstantScoreBoolean),
            "scoring_boolean" => Ok(Rewrite::ScoringBoolean),
            _ => {
                // Longest prefixes first: "top_terms_" is a prefix of the others.
                if let Some(n) = sized("top_terms_blended_freqs_") {
                    return n.map(Rewrite::TopTermsBlendedFreqs);
                }
                if let Some(n) = sized("top_terms_boost_") {
                    return n.map(Rewrite::TopTermsBoost);
                }
                if let Some(n) = sized("top_terms_") {
                    return n.map(Rewrite::TopTerms);
                }
                Err(EsQueryError::validation(format!(
                    "Unknown rewrite method: {s}"
                )))
            }
        }
    }
}

impl From<Rewrite> for String {
    fn from(rewrite: Rewrite) -> Self {
        rewrite.to_string()
    }
}

impl TryFrom<String> for Rewrite {
    type Error = EsQueryError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Minimum number of optional clauses (or terms) that must match.
///
/// Either a count or an engine expression such as `"75%"` or `"3<90%"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinimumShouldMatch {
    Count(i64),
    Expression(String),
}

impl From<i64> for MinimumShouldMatch {
    fn from(count: i64) -> Self {
        MinimumShouldMatch::Count(count)
    }
}

impl From<i32> for MinimumShouldMatch {
    fn from(count: i32) -> Self {
        MinimumShouldMatch::Count(count.into())
    }
}

impl From<&str> for MinimumShouldMatch {
    fn from(expression: &str) -> Self {
        MinimumShouldMatch::Expression(expression.to_string())
    }
}

impl From<String> for MinimumShouldMatch {
    fn from(expression: String) -> Self {
        MinimumShouldMatch::Expression(expression)
    }
}

/// Implements `new` and the bare-scalar conversions for a record whose
/// required member is `$field`.
macro_rules! scalar_options {
    (@from $options:ident, $($scalar:ty),+) => {
        $(
            impl From<$scalar> for $options {
                fn from(scalar: $scalar) -> Self {
                    $options::new(scalar)
                }
            }
        )+
    };
    ($options:ident, $field:ident) => {
        impl $options {
            /// Create options with only the required member set.
            pub fn new<V: Into<Value>>($field: V) -> Self {
                $options {
                    $field: $field.into(),
                    ..Default::default()
                }
            }

            /// Add an option this record does not know about.
            pub fn with_extra<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
                self.extra.insert(key.into(), value.into());
                self
            }
        }

        scalar_options!(@from $options, &str, String, bool, i32, i64, u32, u64, f64, Value);
    };
}

/// Options of a `match` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub query: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_generate_synonyms_phrase_query: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<Fuzziness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_transpositions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_rewrite: Option<Rewrite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lenient: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<MinimumShouldMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_terms_query: Option<ZeroTermsQuery>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

scalar_options!(MatchOptions, query);

/// Options of a `match_bool_prefix` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchBoolPrefixOptions {
    pub query: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<Fuzziness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_transpositions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_rewrite: Option<Rewrite>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

scalar_options!(MatchBoolPrefixOptions, query);

/// Options of a `match_phrase` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchPhraseOptions {
    pub query: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_terms_query: Option<ZeroTermsQuery>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

scalar_options!(MatchPhraseOptions, query);

/// Options of a `match_phrase_prefix` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchPhrasePrefixOptions {
    pub query: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slop: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_terms_query: Option<ZeroTermsQuery>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

scalar_options!(MatchPhrasePrefixOptions, query);

/// Options of a `multi_match` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiMatchOptions {
    pub fields: Vec<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MultiMatchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options of a `combined_fields` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedFieldsOptions {
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_generate_synonyms_phrase_query: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<MinimumShouldMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_terms_query: Option<ZeroTermsQuery>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options of a `query_string` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStringOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_leading_wildcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze_wildcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_generate_synonyms_phrase_query: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_position_increments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_max_expansions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_prefix_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_transpositions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lenient: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_determinized_states: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<MinimumShouldMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_slop: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_field_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<Rewrite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options of a `simple_query_string` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleQueryStringOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_leading_wildcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyze_wildcard: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_generate_synonyms_phrase_query: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_position_increments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_max_expansions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_prefix_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_transpositions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lenient: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_determinized_states: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<MinimumShouldMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase_slop: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_field_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_fields: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options of a `fuzzy` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FuzzyOptions {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzziness: Option<Fuzziness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transpositions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<Rewrite>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

scalar_options!(FuzzyOptions, value);

/// Options of a `range` clause.
///
/// Bounds are kept as JSON values so numbers, dates and date math all pass
/// through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gte: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lte: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation: Option<RangeRelation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options of a `regexp` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegexpOptions {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_determinized_states: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<Rewrite>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

scalar_options!(RegexpOptions, value);

/// Options of a `term` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermOptions {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

scalar_options!(TermOptions, value);

/// Options of a `prefix` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrefixOptions {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<Rewrite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_insensitive: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

scalar_options!(PrefixOptions, value);

/// Options of a `terms` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermsOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options of a `nested` clause.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Clause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_mode: Option<ScoreMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_unmapped: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Clause> for NestedOptions {
    fn from(query: Clause) -> Self {
        NestedOptions {
            query: Some(query),
            ..Default::default()
        }
    }
}

/// Encode an option record as a JSON object.
pub(crate) fn to_object<T: Serialize>(options: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(options)? {
        Value::Object(map) => Ok(map),
        other => Err(EsQueryError::validation(format!(
            "Options must encode as a JSON object, got {other}"
        ))),
    }
}

/// [`to_object`] for the infallible constructors.
///
/// Every record here has string keys only, so encoding cannot fail; a
/// failure is logged and leaves the options out.
pub(crate) fn encode_options<T: Serialize>(options: &T) -> Map<String, Value> {
    to_object(options).unwrap_or_else(|err| {
        log::error!("dropping options that failed to encode: {err}");
        Map::new()
    })
}
