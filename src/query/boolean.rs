//! Boolean composition: occurrence containers and the `bool` clause.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::{EsQueryError, Result};
use crate::query::clause::{Clause, ClauseKind};
use crate::query::options::{MinimumShouldMatch, encode_options};

/// Occurrence requirements for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    /// The clause must match and contributes to the score.
    Must,
    /// The clause should match (equivalent to OR).
    Should,
    /// The clause must not match (equivalent to NOT).
    MustNot,
    /// The clause must match but does not score.
    Filter,
}

impl Occur {
    /// The key this occurrence uses inside a `bool` clause.
    pub fn key(&self) -> &'static str {
        match self {
            Occur::Must => "must",
            Occur::Should => "should",
            Occur::MustNot => "must_not",
            Occur::Filter => "filter",
        }
    }
}

/// An ordered list of clauses under one occurrence key.
///
/// Serializes as `{ "<occur>": [clauses...] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    occur: Occur,
    clauses: Vec<Clause>,
}

impl Container {
    /// Create a container holding `clauses` in order.
    pub fn new<I>(occur: Occur, clauses: I) -> Self
    where
        I: IntoIterator<Item = Clause>,
    {
        Container {
            occur,
            clauses: clauses.into_iter().collect(),
        }
    }

    /// Get the occurrence.
    pub fn occur(&self) -> Occur {
        self.occur
    }

    /// Get the clauses.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Take the clauses out of the container.
    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Check if the container has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Append clauses in the given order. Duplicates are kept.
    pub fn add<I>(&mut self, clauses: I) -> &mut Self
    where
        I: IntoIterator<Item = Clause>,
    {
        let before = self.clauses.len();
        self.clauses.extend(clauses);
        log::trace!(
            "{}: added {} clause(s)",
            self.occur.key(),
            self.clauses.len() - before
        );
        self
    }

    /// Alias of [`Container::add`].
    pub fn more<I>(&mut self, clauses: I) -> &mut Self
    where
        I: IntoIterator<Item = Clause>,
    {
        self.add(clauses)
    }

    /// Remove every clause matched by any of `keys` and return how many were
    /// removed. See [`Clause::matches_path`] for the key syntax.
    pub fn remove<I, K>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let keys: Vec<K> = keys.into_iter().collect();
        let removed = remove_matching(&mut self.clauses, &keys);
        log::debug!("{}: removed {removed} clause(s)", self.occur.key());
        removed
    }
}

impl Serialize for Container {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.occur.key(), &self.clauses)?;
        map.end()
    }
}

/// Drop every clause that any key matches, keeping the order of the rest.
pub(crate) fn remove_matching<K: AsRef<str>>(clauses: &mut Vec<Clause>, keys: &[K]) -> usize {
    let before = clauses.len();
    clauses.retain(|clause| !keys.iter().any(|key| clause.matches_path(key.as_ref())));
    before - clauses.len()
}

/// A `must` container.
pub fn must<I: IntoIterator<Item = Clause>>(clauses: I) -> Container {
    Container::new(Occur::Must, clauses)
}

/// A `should` container.
pub fn should<I: IntoIterator<Item = Clause>>(clauses: I) -> Container {
    Container::new(Occur::Should, clauses)
}

/// A `must_not` container.
pub fn must_not<I: IntoIterator<Item = Clause>>(clauses: I) -> Container {
    Container::new(Occur::MustNot, clauses)
}

/// A `filter` container.
pub fn filter<I: IntoIterator<Item = Clause>>(clauses: I) -> Container {
    Container::new(Occur::Filter, clauses)
}

/// One argument of [`bool_query`].
#[derive(Debug, Clone, PartialEq)]
pub enum BoolPart {
    /// An occurrence container.
    Occur(Container),
    /// `minimum_should_match`.
    MinimumShouldMatch(MinimumShouldMatch),
    /// `boost`. Non-finite values are dropped by [`BoolClause::set`];
    /// use [`BoolPart::boost`] to have them reported instead.
    Boost(f64),
}

impl BoolPart {
    /// A `boost` part, rejecting NaN and infinities.
    pub fn boost(boost: f64) -> Result<Self> {
        if !boost.is_finite() {
            return Err(EsQueryError::validation(format!(
                "bool boost must be finite, got {boost}"
            )));
        }
        Ok(BoolPart::Boost(boost))
    }
}

impl From<Container> for BoolPart {
    fn from(container: Container) -> Self {
        BoolPart::Occur(container)
    }
}

impl From<MinimumShouldMatch> for BoolPart {
    fn from(msm: MinimumShouldMatch) -> Self {
        BoolPart::MinimumShouldMatch(msm)
    }
}

/// The body of a `bool` clause.
///
/// Each key holds at most one value. Setting a key that is already present
/// replaces it entirely: two `must` containers do not merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoolClause {
    #[serde(skip_serializing_if = "Option::is_none")]
    must: Option<Vec<Clause>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    should: Option<Vec<Clause>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    must_not: Option<Vec<Clause>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Vec<Clause>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum_should_match: Option<MinimumShouldMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    boost: Option<f64>,
}

impl BoolClause {
    /// Create an empty bool body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one part, replacing any earlier value under the same key.
    pub fn with<P: Into<BoolPart>>(mut self, part: P) -> Self {
        self.set(part.into());
        self
    }

    /// Merge one part in place, replacing any earlier value under the same
    /// key.
    pub fn set(&mut self, part: BoolPart) -> &mut Self {
        let (key, replaced) = match part {
            BoolPart::Occur(container) => {
                let occur = container.occur();
                let slot = match occur {
                    Occur::Must => &mut self.must,
                    Occur::Should => &mut self.should,
                    Occur::MustNot => &mut self.must_not,
                    Occur::Filter => &mut self.filter,
                };
                (occur.key(), slot.replace(container.into_clauses()).is_some())
            }
            BoolPart::MinimumShouldMatch(msm) => (
                "minimum_should_match",
                self.minimum_should_match.replace(msm).is_some(),
            ),
            BoolPart::Boost(boost) if !boost.is_finite() => {
                log::warn!("bool: ignoring non-finite boost {boost}");
                return self;
            }
            BoolPart::Boost(boost) => ("boost", self.boost.replace(boost).is_some()),
        };

        if replaced {
            log::debug!("bool: `{key}` given more than once, keeping the last value");
        }
        self
    }

    /// Get the clauses stored under an occurrence key.
    pub fn clauses(&self, occur: Occur) -> Option<&[Clause]> {
        match occur {
            Occur::Must => self.must.as_deref(),
            Occur::Should => self.should.as_deref(),
            Occur::MustNot => self.must_not.as_deref(),
            Occur::Filter => self.filter.as_deref(),
        }
    }

    /// Finish into a `{ "bool": {...} }` clause.
    pub fn build(self) -> Clause {
        Clause::from(self)
    }
}

impl From<BoolClause> for Clause {
    fn from(bool_clause: BoolClause) -> Self {
        Clause::new(ClauseKind::Bool, Value::Object(encode_options(&bool_clause)))
    }
}

/// Merge containers and modifiers into a `bool` clause, in order. A key
/// supplied twice keeps only the last value.
///
/// ```
/// use esquery::query::{BoolPart, bool_query, must, should, term};
/// use serde_json::json;
///
/// let clause = bool_query([BoolPart::from(must([term("a", 1)])), should([term("b", 2)]).into()]);
/// assert_eq!(
///     serde_json::to_value(&clause).unwrap(),
///     json!({"bool": {
///         "must": [{"term": {"a": {"value": 1}}}],
///         "should": [{"term": {"b": {"value": 2}}}]
///     }})
/// );
/// ```
pub fn bool_query<I, P>(parts: I) -> Clause
where
    I: IntoIterator<Item = P>,
    P: Into<BoolPart>,
{
    parts
        .into_iter()
        .fold(BoolClause::new(), |bool_clause, part| bool_clause.with(part))
        .build()
}
