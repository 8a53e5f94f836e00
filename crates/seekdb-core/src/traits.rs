use serde_json::Value;

use crate::directive::Directive;
use crate::expr::{Hook, RangeBound};
use crate::types::{Document, Paginated, ResultCollection};

/// The polymorphic search entry point.
///
/// Two implementations conform: the tantivy-backed driver and the inert
/// [`NullDriver`](crate::null::NullDriver). Which one a caller holds is
/// decided once, at construction time; call sites stay generic over
/// `D: Driver` and never inspect the variant.
///
/// Factory operations build one expression each, run the optional hook on it
/// exactly once, and wrap it in a [`Directive`] tagged `Must`. They return
/// `None` when the driver is inert, so directive lists compose with
/// `Option`/`flatten` instead of branching. Factories never validate their
/// parameters; a bad field name or pattern is rejected by the backend when
/// the compound query executes.
///
/// A driver holds no per-call mutable state: every `get`/`paginate` builds
/// its own compound query and result collection, so concurrent calls against
/// one instance are safe by construction.
pub trait Driver: Send + Sync {
    fn common(
        &self,
        field: &str,
        value: &str,
        cutoff_frequency: f32,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive>;

    fn fuzzy(&self, field: &str, value: &str, hook: Option<Hook<'_>>) -> Option<Directive>;

    fn match_query(&self, field: &str, value: &str, hook: Option<Hook<'_>>) -> Option<Directive>;

    fn match_all(&self, hook: Option<Hook<'_>>) -> Option<Directive>;

    fn match_phrase(&self, field: &str, value: &str, hook: Option<Hook<'_>>) -> Option<Directive>;

    fn match_phrase_prefix(
        &self,
        field: &str,
        value: &str,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive>;

    fn multi_match(
        &self,
        fields: &[&str],
        value: &str,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive>;

    fn query_string(&self, query: &str, hook: Option<Hook<'_>>) -> Option<Directive>;

    fn range(
        &self,
        field: &str,
        lower: RangeBound,
        upper: RangeBound,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive>;

    fn regexp(
        &self,
        field: &str,
        pattern: &str,
        boost: f32,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive>;

    fn term(&self, field: &str, value: Value, hook: Option<Hook<'_>>) -> Option<Directive>;

    fn terms(&self, field: &str, values: Vec<Value>, hook: Option<Hook<'_>>) -> Option<Directive>;

    fn wildcard(
        &self,
        field: &str,
        pattern: &str,
        boost: f32,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive>;

    /// Execute the directives as one compound query scoped to `doc_types`
    /// (an empty slice searches every type). One synchronous round trip; a
    /// backend failure propagates unchanged, without retry.
    fn get(&self, doc_types: &[&str], directives: Vec<Directive>)
        -> anyhow::Result<ResultCollection>;

    /// Execute and wrap one page. `page` is 1-based; `offset` shifts the
    /// whole window. The page total comes from the collection's total hit
    /// count, not from the returned slice.
    fn paginate(
        &self,
        doc_types: &[&str],
        directives: Vec<Directive>,
        page: usize,
        per_page: usize,
        offset: usize,
    ) -> anyhow::Result<Paginated>;

    /// Index (or replace, matching on id) a single document. Returns the
    /// driver for fluent chaining.
    fn add(&self, doc_type: &str, id: &str, document: Document) -> anyhow::Result<&Self>;

    /// Index a batch of `(id, document)` pairs under one backend call. No
    /// transaction guarantee beyond what that call provides.
    fn add_multiple(
        &self,
        doc_type: &str,
        documents: Vec<(String, Document)>,
    ) -> anyhow::Result<&Self>;

    /// Remove the document with the given id.
    fn delete(&self, doc_type: &str, id: &str) -> anyhow::Result<&Self>;
}
