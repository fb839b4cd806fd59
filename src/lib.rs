//! # esquery
//!
//! Build Elasticsearch/OpenSearch query-DSL request bodies from composable
//! helpers instead of hand-written JSON.
//!
//! ## Features
//!
//! - One constructor per leaf clause, with typed option records that still
//!   pass unknown options through
//! - Range shorthand such as `"age > 10 < 20"`
//! - `must`/`should`/`must_not`/`filter` containers with add and remove
//! - Request builders with paging and sort
//! - Deterministic, compact JSON output
//!
//! ```
//! use esquery::prelude::*;
//!
//! let mut query = OrQuery::new(OrQueryConfig::default());
//! query
//!     .add([match_query("title", "rust"), term("tags", "systems")])
//!     .size(10);
//! query.remove(["tags"]);
//!
//! let body = es_query(&[&query]).unwrap();
//! assert_eq!(
//!     body,
//!     r#"{"query":{"bool":{"should":[{"match":{"title":{"query":"rust"}}}]}},"size":10}"#
//! );
//! ```

pub mod error;
pub mod query;
pub mod serializer;

pub mod prelude {
    pub use crate::error::{EsQueryError, Result};
    pub use crate::query::*;
    pub use crate::serializer::{Expression, es_query};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
