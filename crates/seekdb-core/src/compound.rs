//! Buckets an ordered directive sequence into one boolean compound query.

use serde::{Deserialize, Serialize};

use crate::directive::{Directive, Occur};
use crate::expr::QueryExpr;

/// A sort criterion attached to a compound query. Relevance is expressed as
/// a descending sort on the reserved `_score` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn relevance() -> Self {
        SortSpec {
            field: "_score".to_string(),
            descending: true,
        }
    }

    pub fn is_relevance(&self) -> bool {
        self.field == "_score"
    }
}

/// The boolean combination of all directives for one search call.
///
/// Built fresh per call and never persisted. An empty instance (all buckets
/// and the sort list empty) is the match-everything sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompoundQuery {
    pub must: Vec<QueryExpr>,
    pub should: Vec<QueryExpr>,
    pub must_not: Vec<QueryExpr>,
    pub sort: Vec<SortSpec>,
}

impl CompoundQuery {
    /// Bucket `directives` by role, preserving input order within each
    /// bucket, and append a relevance sort. An empty input degenerates to
    /// the match-everything sentinel with no sort override.
    pub fn build(directives: Vec<Directive>) -> Self {
        if directives.is_empty() {
            return CompoundQuery::default();
        }

        let mut compound = CompoundQuery::default();
        for directive in directives {
            let (occur, expr) = directive.into_parts();
            match occur {
                Occur::Must => compound.must.push(expr),
                Occur::Should => compound.should.push(expr),
                Occur::MustNot => compound.must_not.push(expr),
            }
        }
        compound.sort.push(SortSpec::relevance());
        compound
    }

    pub fn is_match_all(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }

    pub fn clause_count(&self) -> usize {
        self.must.len() + self.should.len() + self.must_not.len()
    }
}
