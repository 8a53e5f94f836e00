//! Query expression parameter bags.
//!
//! A `QueryExpr` carries the semantic parameters of one query kind and
//! nothing else. The active driver lowers it into a backend query object at
//! execution time, so a bad field name or pattern only surfaces when the
//! backend rejects the search, never while the expression is being built.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Customization hook invoked on a freshly built expression, exactly once,
/// before the factory wraps it in a directive. The hook mutates in place;
/// nothing is returned.
pub type Hook<'a> = &'a mut dyn FnMut(&mut QueryExpr);

/// One bound of a range expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RangeBound {
    Unbounded,
    Included(Value),
    Excluded(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryExpr {
    /// Analyzed terms split by document frequency: terms whose ratio of
    /// matching documents stays below `cutoff_frequency` are required,
    /// the frequent ones merely boost relevance.
    Common {
        field: String,
        value: String,
        cutoff_frequency: f32,
    },
    Fuzzy {
        field: String,
        value: String,
        distance: u8,
        transpositions: bool,
        prefix: bool,
    },
    /// Analyzed full-text match on a single field (terms OR-ed together).
    Match { field: String, value: String },
    MatchAll,
    MatchPhrase { field: String, value: String },
    MatchPhrasePrefix { field: String, value: String },
    MultiMatch { fields: Vec<String>, value: String },
    /// Raw query string handed to the backend's own parser.
    QueryString { query: String },
    Range {
        field: String,
        lower: RangeBound,
        upper: RangeBound,
    },
    Regexp {
        field: String,
        pattern: String,
        boost: f32,
    },
    /// Exact, un-analyzed term.
    Term { field: String, value: Value },
    Terms { field: String, values: Vec<Value> },
    Wildcard {
        field: String,
        pattern: String,
        boost: f32,
    },
}
