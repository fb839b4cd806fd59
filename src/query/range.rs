//! Range clause construction, including the comparison shorthand.
//!
//! Besides a plain field name, [`range`] accepts a field string with
//! embedded comparisons, e.g. `"age >= 18"` or `"age > 10 < 20"`. Each
//! operator sets the matching bound (`gt`, `gte`, `lt`, `lte`) with the
//! following token as a string value; bounds that are not mentioned keep
//! whatever the options record already holds.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{EsQueryError, Result};
use crate::query::clause::{Clause, ClauseKind};
use crate::query::leaf::field_clause;
use crate::query::options::{RangeOptions, to_object};

/// Comparison tokens. `>=`/`<=` come first so they win over `>`/`<`.
static OPERATOR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(>=|<=|>|<)").expect("valid range operator pattern"));

/// A comparison operator of the range shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOperator {
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `<`
    Lt,
    /// `<=`
    Lte,
}

impl RangeOperator {
    /// The shorthand token.
    pub fn symbol(&self) -> &'static str {
        match self {
            RangeOperator::Gt => ">",
            RangeOperator::Gte => ">=",
            RangeOperator::Lt => "<",
            RangeOperator::Lte => "<=",
        }
    }
}

impl fmt::Display for RangeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for RangeOperator {
    type Err = EsQueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            ">" => Ok(RangeOperator::Gt),
            ">=" => Ok(RangeOperator::Gte),
            "<" => Ok(RangeOperator::Lt),
            "<=" => Ok(RangeOperator::Lte),
            _ => Err(EsQueryError::validation(format!(
                "Unknown range operator: {s}"
            ))),
        }
    }
}

/// A parsed range field string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeShorthand {
    field: String,
    bounds: Vec<(RangeOperator, String)>,
}

impl RangeShorthand {
    /// Parse a field string.
    ///
    /// A string without any operator is taken verbatim as the field name.
    /// Otherwise the text before the first operator is the field, and every
    /// operator must be followed by exactly one value token.
    pub fn parse(input: &str) -> Result<Self> {
        let matches: Vec<_> = OPERATOR_PATTERN.find_iter(input).collect();
        let Some(first) = matches.first() else {
            return Ok(RangeShorthand {
                field: input.to_string(),
                bounds: Vec::new(),
            });
        };

        let field = input[..first.start()].trim();
        if field.is_empty() {
            return Err(EsQueryError::validation(format!(
                "Range shorthand {input:?} has no field name"
            )));
        }
        if field.contains(char::is_whitespace) {
            return Err(EsQueryError::validation(format!(
                "Range shorthand {input:?} has stray tokens before the first operator"
            )));
        }

        let mut bounds = Vec::with_capacity(matches.len());
        for (i, m) in matches.iter().enumerate() {
            let end = matches.get(i + 1).map_or(input.len(), |next| next.start());
            let value = input[m.end()..end].trim();
            if value.is_empty() {
                return Err(EsQueryError::validation(format!(
                    "Range operator {} in {input:?} has no value",
                    m.as_str()
                )));
            }
            if value.contains(char::is_whitespace) {
                return Err(EsQueryError::validation(format!(
                    "Range operator {} in {input:?} is followed by more than one token",
                    m.as_str()
                )));
            }
            bounds.push((m.as_str().parse()?, value.to_string()));
        }

        log::debug!(
            "parsed range shorthand {input:?}: field {field}, {} bound(s)",
            bounds.len()
        );

        Ok(RangeShorthand {
            field: field.to_string(),
            bounds,
        })
    }

    /// Get the bare field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Get the parsed bounds, in input order.
    pub fn bounds(&self) -> &[(RangeOperator, String)] {
        &self.bounds
    }

    /// Write the parsed bounds into `options`. A later operator of the same
    /// kind overwrites an earlier one.
    pub fn apply(&self, mut options: RangeOptions) -> RangeOptions {
        for (op, value) in &self.bounds {
            let value = Some(Value::String(value.clone()));
            match op {
                RangeOperator::Gt => options.gt = value,
                RangeOperator::Gte => options.gte = value,
                RangeOperator::Lt => options.lt = value,
                RangeOperator::Lte => options.lte = value,
            }
        }
        options
    }
}

/// Build a `range` clause.
///
/// ```
/// use esquery::query::{range, RangeOptions};
/// use serde_json::json;
///
/// let clause = range("age >= 18", RangeOptions::default()).unwrap();
/// assert_eq!(
///     serde_json::to_value(&clause).unwrap(),
///     json!({"range": {"age": {"gte": "18"}}})
/// );
/// ```
pub fn range<F: AsRef<str>>(field: F, options: RangeOptions) -> Result<Clause> {
    let shorthand = RangeShorthand::parse(field.as_ref())?;
    let options = shorthand.apply(options);

    Ok(field_clause(
        ClauseKind::Range,
        shorthand.field,
        to_object(&options)?,
        Map::new(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::options::RangeRelation;
    use serde_json::json;

    fn json_of(clause: &Clause) -> Value {
        serde_json::to_value(clause).unwrap()
    }

    #[test]
    fn test_single_operator() {
        let clause = range("age >= 18", RangeOptions::default()).unwrap();
        assert_eq!(json_of(&clause), json!({"range": {"age": {"gte": "18"}}}));

        let clause = range("age <= 65", RangeOptions::default()).unwrap();
        assert_eq!(json_of(&clause), json!({"range": {"age": {"lte": "65"}}}));
    }

    #[test]
    fn test_between() {
        let clause = range("age > 10 < 20", RangeOptions::default()).unwrap();
        assert_eq!(
            json_of(&clause),
            json!({"range": {"age": {"gt": "10", "lt": "20"}}})
        );
    }

    #[test]
    fn test_compact_form() {
        let clause = range("age>=18<=65", RangeOptions::default()).unwrap();
        assert_eq!(
            json_of(&clause),
            json!({"range": {"age": {"gte": "18", "lte": "65"}}})
        );
    }

    #[test]
    fn test_explicit_bounds_are_kept() {
        let options = RangeOptions {
            lt: Some(json!(100)),
            relation: Some(RangeRelation::Within),
            ..Default::default()
        };
        let clause = range("age > 10", options).unwrap();
        assert_eq!(
            json_of(&clause),
            json!({"range": {"age": {"gt": "10", "lt": 100, "relation": "WITHIN"}}})
        );
    }

    #[test]
    fn test_shorthand_overrides_same_bound() {
        let options = RangeOptions {
            gt: Some(json!(5)),
            ..Default::default()
        };
        let clause = range("age > 10", options).unwrap();
        assert_eq!(json_of(&clause), json!({"range": {"age": {"gt": "10"}}}));
    }

    #[test]
    fn test_plain_field() {
        let options = RangeOptions {
            gte: Some(json!("now-1d/d")),
            ..Default::default()
        };
        let clause = range("timestamp", options).unwrap();
        assert_eq!(
            json_of(&clause),
            json!({"range": {"timestamp": {"gte": "now-1d/d"}}})
        );
    }

    #[test]
    fn test_malformed_shorthand() {
        assert!(range("age >=", RangeOptions::default()).is_err());
        assert!(range("> 10", RangeOptions::default()).is_err());
        assert!(range("age > 10 20", RangeOptions::default()).is_err());
        assert!(range("age years > 10", RangeOptions::default()).is_err());
        assert!(range("age > < 20", RangeOptions::default()).is_err());
    }

    #[test]
    fn test_parse_exposes_bounds() {
        let shorthand = RangeShorthand::parse("price >= 5 < 9.5").unwrap();
        assert_eq!(shorthand.field(), "price");
        assert_eq!(
            shorthand.bounds(),
            &[
                (RangeOperator::Gte, "5".to_string()),
                (RangeOperator::Lt, "9.5".to_string())
            ]
        );
        assert_eq!("<=".parse::<RangeOperator>().unwrap(), RangeOperator::Lte);
    }
}
