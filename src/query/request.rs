//! Request envelope builders.
//!
//! A builder owns its root clause and paging state and is mutated through
//! `&mut self` methods that chain. [`Query::envelope`] and friends produce
//! the plain [`Envelope`] data that the serializer consumes; builders never
//! appear in the output themselves.
//!
//! ```
//! use esquery::query::{Query, match_query};
//!
//! let mut query = Query::new(match_query("title", "rust"));
//! query.from(10).size(5);
//!
//! let envelope = query.envelope();
//! assert_eq!(envelope.from, Some(10));
//! assert_eq!(envelope.size, Some(5));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EsQueryError, Result};
use crate::query::boolean::{BoolClause, must_not, remove_matching, should};
use crate::query::clause::Clause;
use crate::query::sort::{Sort, SortField};

/// Paging parameters of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// Offset of the first hit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
    /// Maximum number of hits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl Paging {
    /// Create paging parameters.
    pub fn new(from: Option<u64>, size: Option<u64>) -> Self {
        Paging { from, size }
    }
}

/// The top-level request body: `{ query, from?, size?, sort? }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub query: Clause,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Vec<SortField>>,
}

impl Envelope {
    fn new(query: Clause, paging: Paging, sort: Option<&Sort>) -> Self {
        Envelope {
            query,
            from: paging.from,
            size: paging.size,
            sort: sort.map(|sort| sort.fields().to_vec()),
        }
    }
}

/// Envelope builder around a single root clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    root: Clause,
    paging: Paging,
    /// Paging given at construction; [`Query::replace`] restores it.
    initial_paging: Paging,
    sort: Option<Sort>,
}

impl Query {
    /// Create a builder without paging.
    pub fn new<C: Into<Clause>>(root: C) -> Self {
        Self::with_paging(root, Paging::default())
    }

    /// Create a builder with paging. The paging is remembered and re-applied
    /// by every [`Query::replace`].
    pub fn with_paging<C: Into<Clause>>(root: C, paging: Paging) -> Self {
        Query {
            root: root.into(),
            paging,
            initial_paging: paging,
            sort: None,
        }
    }

    /// Swap the root clause and reset paging to the construction-time
    /// values, discarding any `from`/`size` set since.
    pub fn replace<C: Into<Clause>>(&mut self, root: C) -> &mut Self {
        self.root = root.into();
        self.paging = self.initial_paging;
        log::trace!("query: root replaced, paging reset to {:?}", self.paging);
        self
    }

    /// Set the offset of the first hit.
    pub fn from(&mut self, from: u64) -> &mut Self {
        self.paging.from = Some(from);
        self
    }

    /// Set the maximum number of hits.
    pub fn size(&mut self, size: u64) -> &mut Self {
        self.paging.size = Some(size);
        self
    }

    /// Attach a sort, replacing any previous one.
    pub fn sort(&mut self, sort: Sort) -> &mut Self {
        self.sort = Some(sort);
        self
    }

    /// Get the root clause.
    pub fn root(&self) -> &Clause {
        &self.root
    }

    /// Get the current paging.
    pub fn paging(&self) -> Paging {
        self.paging
    }

    /// Snapshot the request body.
    pub fn envelope(&self) -> Envelope {
        Envelope::new(self.root.clone(), self.paging, self.sort.as_ref())
    }
}

/// Configuration record for [`OrQuery`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrQueryConfig {
    /// Clauses of the `should` list, in order.
    #[serde(default)]
    pub expressions: Vec<Clause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl OrQueryConfig {
    /// Load a configuration from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| EsQueryError::configuration(format!("Invalid OrQuery config: {e}")))
    }
}

/// A closure producing clauses to splice into a list.
pub type ClauseGenerator = Box<dyn FnOnce() -> Vec<Clause>>;

/// One tagged argument of [`OrQuery::from_args`].
pub enum OrArg {
    /// A clause appended to `should`.
    Clause(Clause),
    /// Invoked once; its clauses are appended to `should`.
    Generator(ClauseGenerator),
    /// Offset of the first hit.
    From(u64),
    /// Maximum number of hits.
    Size(u64),
}

impl OrArg {
    /// Wrap a closure as a generator argument.
    pub fn generator<F>(generator: F) -> Self
    where
        F: FnOnce() -> Vec<Clause> + 'static,
    {
        OrArg::Generator(Box::new(generator))
    }
}

impl fmt::Debug for OrArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrArg::Clause(clause) => f.debug_tuple("Clause").field(clause).finish(),
            OrArg::Generator(_) => f.write_str("Generator(..)"),
            OrArg::From(from) => f.debug_tuple("From").field(from).finish(),
            OrArg::Size(size) => f.debug_tuple("Size").field(size).finish(),
        }
    }
}

impl From<Clause> for OrArg {
    fn from(clause: Clause) -> Self {
        OrArg::Clause(clause)
    }
}

/// Envelope builder for `{ bool: { should: [...] } }`: any clause may match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrQuery {
    should: Vec<Clause>,
    paging: Paging,
}

impl OrQuery {
    /// Create a builder from a configuration record.
    pub fn new(config: OrQueryConfig) -> Self {
        OrQuery {
            should: config.expressions,
            paging: Paging::new(config.from, config.size),
        }
    }

    /// Create a builder from a list of tagged arguments.
    ///
    /// Clauses and generator output are appended in argument order. Giving
    /// `From` or `Size` more than once is a configuration error.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = OrArg>,
    {
        let mut query = OrQuery::default();
        for arg in args {
            match arg {
                OrArg::Clause(clause) => {
                    query.should.push(clause);
                }
                OrArg::Generator(generator) => {
                    query.should.extend(generator());
                }
                OrArg::From(from) => {
                    if query.paging.from.replace(from).is_some() {
                        return Err(EsQueryError::configuration(
                            "OrQuery: `from` given more than once",
                        ));
                    }
                }
                OrArg::Size(size) => {
                    if query.paging.size.replace(size).is_some() {
                        return Err(EsQueryError::configuration(
                            "OrQuery: `size` given more than once",
                        ));
                    }
                }
            }
        }
        Ok(query)
    }

    /// Append clauses to `should`.
    pub fn add<I>(&mut self, clauses: I) -> &mut Self
    where
        I: IntoIterator<Item = Clause>,
    {
        self.should.extend(clauses);
        log::trace!("or query: {} should clause(s)", self.should.len());
        self
    }

    /// Invoke `generator` once and append its clauses to `should`.
    pub fn add_with<F>(&mut self, generator: F) -> &mut Self
    where
        F: FnOnce() -> Vec<Clause>,
    {
        self.add(generator())
    }

    /// Remove every `should` clause matched by any of `keys`.
    pub fn remove<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        let removed = remove_matching(&mut self.should, &keys);
        log::debug!("or query: removed {removed} clause(s)");
        removed
    }

    /// Set the offset of the first hit.
    pub fn from(&mut self, from: u64) -> &mut Self {
        self.paging.from = Some(from);
        self
    }

    /// Set the maximum number of hits.
    pub fn size(&mut self, size: u64) -> &mut Self {
        self.paging.size = Some(size);
        self
    }

    /// Get the `should` clauses.
    pub fn clauses(&self) -> &[Clause] {
        &self.should
    }

    /// Get the current paging.
    pub fn paging(&self) -> Paging {
        self.paging
    }

    /// Snapshot the request body.
    pub fn envelope(&self) -> Envelope {
        let root = BoolClause::new().with(should(self.should.clone())).build();
        Envelope::new(root, self.paging, None)
    }
}

/// Envelope builder for `{ bool: { must_not: [...] } }`: no clause may
/// match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotQuery {
    must_not: Vec<Clause>,
    paging: Paging,
}

impl NotQuery {
    /// Create a builder excluding `clauses`.
    pub fn new<I>(clauses: I) -> Self
    where
        I: IntoIterator<Item = Clause>,
    {
        Self::with_paging(clauses, Paging::default())
    }

    /// Create a builder with paging.
    pub fn with_paging<I>(clauses: I, paging: Paging) -> Self
    where
        I: IntoIterator<Item = Clause>,
    {
        NotQuery {
            must_not: clauses.into_iter().collect(),
            paging,
        }
    }

    /// Append clauses to `must_not`.
    pub fn add<I>(&mut self, clauses: I) -> &mut Self
    where
        I: IntoIterator<Item = Clause>,
    {
        self.must_not.extend(clauses);
        log::trace!("not query: {} must_not clause(s)", self.must_not.len());
        self
    }

    /// Remove every `must_not` clause matched by any of `keys`.
    pub fn remove<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        let removed = remove_matching(&mut self.must_not, &keys);
        log::debug!("not query: removed {removed} clause(s)");
        removed
    }

    /// Set the offset of the first hit.
    pub fn from(&mut self, from: u64) -> &mut Self {
        self.paging.from = Some(from);
        self
    }

    /// Set the maximum number of hits.
    pub fn size(&mut self, size: u64) -> &mut Self {
        self.paging.size = Some(size);
        self
    }

    /// Get the `must_not` clauses.
    pub fn clauses(&self) -> &[Clause] {
        &self.must_not
    }

    /// Get the current paging.
    pub fn paging(&self) -> Paging {
        self.paging
    }

    /// Snapshot the request body.
    pub fn envelope(&self) -> Envelope {
        let root = BoolClause::new()
            .with(must_not(self.must_not.clone()))
            .build();
        Envelope::new(root, self.paging, None)
    }
}
