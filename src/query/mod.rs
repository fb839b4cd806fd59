//! Query-DSL building blocks.
//!
//! Leaf constructors ([`match_query`], [`term`], [`range`], ...) produce
//! [`Clause`] values. [`must`], [`should`], [`must_not`] and [`filter`]
//! collect clauses into a [`Container`], and [`bool_query`] merges
//! containers into a `bool` clause. [`Query`], [`OrQuery`] and [`NotQuery`]
//! wrap a root clause into a request [`Envelope`] with paging, and [`Sort`]
//! holds sort entries next to it.
//!
//! # Example
//!
//! ```
//! use esquery::query::*;
//!
//! let root = bool_query([
//!     BoolPart::from(must([match_query("content", "rust programming")])),
//!     filter([range("created_at >= 2024-01-01", RangeOptions::default()).unwrap()]).into(),
//! ]);
//! let mut query = Query::new(root);
//! query.size(20);
//! ```

pub mod boolean;
pub mod clause;
pub mod leaf;
pub mod options;
pub mod range;
pub mod request;
pub mod sort;

pub use self::boolean::{
    BoolClause, BoolPart, Container, Occur, bool_query, filter, must, must_not, should,
};
pub use self::clause::{Clause, ClauseKind};
pub use self::leaf::{
    combined_fields, exists, fuzzy, ids, match_all, match_bool_prefix, match_phrase,
    match_phrase_prefix, match_query, multi_match, nested, prefix, query_string, regexp,
    simple_query_string, term, terms,
};
pub use self::options::{
    CombinedFieldsOptions, Fuzziness, FuzzyOptions, MatchBoolPrefixOptions, MatchOptions,
    MatchPhraseOptions, MatchPhrasePrefixOptions, MinimumShouldMatch, MultiMatchOptions,
    MultiMatchType, NestedOptions, Operator, PrefixOptions, QueryStringOptions, RangeOptions,
    RangeRelation, RegexpOptions, Rewrite, ScoreMode, SimpleQueryStringOptions, TermOptions,
    TermsOptions, ZeroTermsQuery,
};
pub use self::range::{RangeOperator, RangeShorthand, range};
pub use self::request::{
    ClauseGenerator, Envelope, NotQuery, OrArg, OrQuery, OrQueryConfig, Paging, Query,
};
pub use self::sort::{Sort, SortField, SortMode, SortOptions, SortOrder, field};
