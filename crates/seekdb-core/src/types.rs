//! Result types shared by every driver.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A field-keyed record, both for documents handed to `add` and for the
/// field data of a returned hit.
pub type Document = serde_json::Map<String, Value>;

/// One normalized hit: the backend's field data carried verbatim, plus the
/// relevance score the backend assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f32,
    pub fields: Document,
}

impl SearchHit {
    pub fn new(score: f32, fields: Document) -> Self {
        SearchHit { score, fields }
    }

    /// Raw stored data for `field`, exactly as the backend reported it.
    pub fn field(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// First stored value for `field`. Backends report multi-valued fields
    /// as arrays; single values are returned as-is.
    pub fn first(&self, field: &str) -> Option<&Value> {
        match self.fields.get(field) {
            Some(Value::Array(values)) => values.first(),
            other => other,
        }
    }
}

/// The outcome of one search call: the returned page of hits plus the
/// aggregates the backend reported. Immutable once built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultCollection {
    hits: Vec<SearchHit>,
    total_hits: u64,
    max_score: f32,
    total_time_ms: u64,
}

impl ResultCollection {
    /// The backend may page server-side, so `hits` holds only the returned
    /// page and `total_hits` may exceed its length, never the reverse.
    pub fn new(hits: Vec<SearchHit>, total_hits: u64, max_score: f32, total_time_ms: u64) -> Self {
        debug_assert!(hits.len() as u64 <= total_hits);
        ResultCollection {
            hits,
            total_hits,
            max_score,
            total_time_ms,
        }
    }

    pub fn empty() -> Self {
        ResultCollection::default()
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    pub fn into_hits(self) -> Vec<SearchHit> {
        self.hits
    }

    pub fn total_hits(&self) -> u64 {
        self.total_hits
    }

    pub fn max_score(&self) -> f32 {
        self.max_score
    }

    pub fn total_time_ms(&self) -> u64 {
        self.total_time_ms
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

impl IntoIterator for ResultCollection {
    type Item = SearchHit;
    type IntoIter = std::vec::IntoIter<SearchHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a SearchHit;
    type IntoIter = std::slice::Iter<'a, SearchHit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}

/// A length-aware page view over a result collection. `total` always comes
/// from the collection's total hit count, not from the in-memory slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated {
    items: Vec<SearchHit>,
    per_page: usize,
    current_page: usize,
    total: u64,
}

impl Paginated {
    pub fn new(items: Vec<SearchHit>, per_page: usize, current_page: usize, total: u64) -> Self {
        Paginated {
            items,
            per_page,
            current_page,
            total,
        }
    }

    pub fn items(&self) -> &[SearchHit] {
        &self.items
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page as u64).max(1)
    }

    pub fn has_more_pages(&self) -> bool {
        (self.current_page as u64) < self.last_page()
    }
}
