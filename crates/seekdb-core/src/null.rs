//! Inert driver for environments where search is disabled.

use serde_json::Value;

use crate::directive::Directive;
use crate::expr::{Hook, RangeBound};
use crate::traits::Driver;
use crate::types::{Document, Paginated, ResultCollection};

/// A capability-compatible no-op driver.
///
/// Factories return `None` without building an expression or invoking the
/// hook, searches yield empty collections without contacting any backend,
/// and mutations are accepted and discarded. Error-free by construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDriver;

impl NullDriver {
    pub fn new() -> Self {
        NullDriver
    }
}

impl Driver for NullDriver {
    fn common(
        &self,
        _field: &str,
        _value: &str,
        _cutoff_frequency: f32,
        _hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        None
    }

    fn fuzzy(&self, _field: &str, _value: &str, _hook: Option<Hook<'_>>) -> Option<Directive> {
        None
    }

    fn match_query(&self, _field: &str, _value: &str, _hook: Option<Hook<'_>>) -> Option<Directive> {
        None
    }

    fn match_all(&self, _hook: Option<Hook<'_>>) -> Option<Directive> {
        None
    }

    fn match_phrase(&self, _field: &str, _value: &str, _hook: Option<Hook<'_>>) -> Option<Directive> {
        None
    }

    fn match_phrase_prefix(
        &self,
        _field: &str,
        _value: &str,
        _hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        None
    }

    fn multi_match(
        &self,
        _fields: &[&str],
        _value: &str,
        _hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        None
    }

    fn query_string(&self, _query: &str, _hook: Option<Hook<'_>>) -> Option<Directive> {
        None
    }

    fn range(
        &self,
        _field: &str,
        _lower: RangeBound,
        _upper: RangeBound,
        _hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        None
    }

    fn regexp(
        &self,
        _field: &str,
        _pattern: &str,
        _boost: f32,
        _hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        None
    }

    fn term(&self, _field: &str, _value: Value, _hook: Option<Hook<'_>>) -> Option<Directive> {
        None
    }

    fn terms(&self, _field: &str, _values: Vec<Value>, _hook: Option<Hook<'_>>) -> Option<Directive> {
        None
    }

    fn wildcard(
        &self,
        _field: &str,
        _pattern: &str,
        _boost: f32,
        _hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        None
    }

    fn get(
        &self,
        _doc_types: &[&str],
        _directives: Vec<Directive>,
    ) -> anyhow::Result<ResultCollection> {
        Ok(ResultCollection::empty())
    }

    fn paginate(
        &self,
        _doc_types: &[&str],
        _directives: Vec<Directive>,
        page: usize,
        per_page: usize,
        _offset: usize,
    ) -> anyhow::Result<Paginated> {
        Ok(Paginated::new(Vec::new(), per_page, page, 0))
    }

    fn add(&self, _doc_type: &str, _id: &str, _document: Document) -> anyhow::Result<&Self> {
        Ok(self)
    }

    fn add_multiple(
        &self,
        _doc_type: &str,
        _documents: Vec<(String, Document)>,
    ) -> anyhow::Result<&Self> {
        Ok(self)
    }

    fn delete(&self, _doc_type: &str, _id: &str) -> anyhow::Result<&Self> {
        Ok(self)
    }
}
