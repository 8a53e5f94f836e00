use std::path::Path;
use std::time::Instant;

use parking_lot::Mutex;
use serde_json::Value;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{BooleanQuery, Occur as TantivyOccur, Query, TermSetQuery};
use tantivy::schema::{Field, Schema};
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tantivy::Document as _;
use tracing::debug;

use seekdb_core::{
    CompoundQuery, Directive, Document, Driver, Error, Hook, Occur, Paginated, QueryExpr,
    RangeBound, ResultCollection, SearchConfig, SearchHit,
};

use crate::compile::{self, CompileCtx};

/// The active driver: one host-owned tantivy index, searched and mutated
/// through the [`Driver`] contract.
///
/// All backend handles are acquired once at construction. Searches go
/// through a point-in-time searcher per call; mutations serialize on the
/// writer lock, commit, and reload the reader so later reads observe them.
pub struct TantivyDriver {
    index: Index,
    reader: IndexReader,
    writer: Mutex<IndexWriter>,
    schema: Schema,
    id_field: Field,
    id_field_name: String,
    doc_type_field: Field,
    doc_type_field_name: String,
    default_limit: usize,
}

impl TantivyDriver {
    /// Wrap an index the host application opened or created. The schema must
    /// carry the configured id and doc-type fields; everything else about it
    /// is the host's business.
    pub fn new(index: Index, config: &SearchConfig) -> anyhow::Result<Self> {
        let schema = index.schema();
        let id_field = schema.get_field(&config.id_field)?;
        let doc_type_field = schema.get_field(&config.doc_type_field)?;
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let writer: IndexWriter = index.writer(config.writer_heap_bytes)?;
        Ok(TantivyDriver {
            index,
            reader,
            writer: Mutex::new(writer),
            schema,
            id_field,
            id_field_name: config.id_field.clone(),
            doc_type_field,
            doc_type_field_name: config.doc_type_field.clone(),
            default_limit: config.default_limit,
        })
    }

    /// Open an existing index directory.
    pub fn open_in_dir<P: AsRef<Path>>(dir: P, config: &SearchConfig) -> anyhow::Result<Self> {
        let index = Index::open_in_dir(dir.as_ref())
            .map_err(|e| Error::BackendUnavailable(e.to_string()))?;
        Self::new(index, config)
    }

    fn directive(&self, mut expr: QueryExpr, hook: Option<Hook<'_>>) -> Option<Directive> {
        if let Some(hook) = hook {
            hook(&mut expr);
        }
        Some(Directive::new(expr, Occur::Must))
    }

    /// One synchronous search round trip: build, compile, scope, execute,
    /// and map the raw result set.
    fn execute(
        &self,
        doc_types: &[&str],
        directives: Vec<Directive>,
        limit: usize,
        offset: usize,
    ) -> anyhow::Result<ResultCollection> {
        let compound = CompoundQuery::build(directives);
        let searcher = self.reader.searcher();
        let ctx = CompileCtx {
            index: &self.index,
            schema: &self.schema,
            searcher: &searcher,
        };
        let query = compile::compound(&ctx, &compound)?;
        let query = self.scoped(query, doc_types);
        debug!(
            doc_types = ?doc_types,
            clauses = compound.clause_count(),
            sort = ?compound.sort,
            limit,
            offset,
            "executing compound query"
        );

        let started = Instant::now();
        let (top_docs, total_hits) = searcher.search(
            &query,
            &(TopDocs::with_limit(limit.max(1)).and_offset(offset), Count),
        )?;
        let total_time_ms = started.elapsed().as_millis() as u64;

        let mut max_score = 0.0f32;
        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            max_score = max_score.max(score);
            let doc: TantivyDocument = searcher.doc(address)?;
            hits.push(SearchHit::new(score, named_fields(&doc, &self.schema)?));
        }
        Ok(ResultCollection::new(
            hits,
            total_hits as u64,
            max_score,
            total_time_ms,
        ))
    }

    fn scoped(&self, query: Box<dyn Query>, doc_types: &[&str]) -> Box<dyn Query> {
        if doc_types.is_empty() {
            return query;
        }
        let terms = doc_types
            .iter()
            .map(|doc_type| Term::from_field_text(self.doc_type_field, doc_type))
            .collect::<Vec<_>>();
        Box::new(BooleanQuery::new(vec![
            (TantivyOccur::Must, query),
            (
                TantivyOccur::Must,
                Box::new(TermSetQuery::new(terms)) as Box<dyn Query>,
            ),
        ]))
    }

    /// Serialize the field map and let the backend parse it against its own
    /// schema. No shape validation happens here.
    fn parse_document(
        &self,
        doc_type: &str,
        id: &str,
        document: &Document,
    ) -> anyhow::Result<TantivyDocument> {
        let mut object = document.clone();
        object.insert(self.id_field_name.clone(), Value::String(id.to_string()));
        object.insert(
            self.doc_type_field_name.clone(),
            Value::String(doc_type.to_string()),
        );
        let json = serde_json::to_string(&object)?;
        let doc = TantivyDocument::parse_json(&self.schema, &json)?;
        Ok(doc)
    }
}

fn named_fields(doc: &TantivyDocument, schema: &Schema) -> anyhow::Result<Document> {
    let named = doc.to_named_doc(schema);
    match serde_json::to_value(&named)? {
        Value::Object(fields) => Ok(fields),
        _ => Ok(Document::new()),
    }
}

impl Driver for TantivyDriver {
    fn common(
        &self,
        field: &str,
        value: &str,
        cutoff_frequency: f32,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        self.directive(
            QueryExpr::Common {
                field: field.to_string(),
                value: value.to_string(),
                cutoff_frequency,
            },
            hook,
        )
    }

    fn fuzzy(&self, field: &str, value: &str, hook: Option<Hook<'_>>) -> Option<Directive> {
        self.directive(
            QueryExpr::Fuzzy {
                field: field.to_string(),
                value: value.to_string(),
                distance: 2,
                transpositions: true,
                prefix: false,
            },
            hook,
        )
    }

    fn match_query(&self, field: &str, value: &str, hook: Option<Hook<'_>>) -> Option<Directive> {
        self.directive(
            QueryExpr::Match {
                field: field.to_string(),
                value: value.to_string(),
            },
            hook,
        )
    }

    fn match_all(&self, hook: Option<Hook<'_>>) -> Option<Directive> {
        self.directive(QueryExpr::MatchAll, hook)
    }

    fn match_phrase(&self, field: &str, value: &str, hook: Option<Hook<'_>>) -> Option<Directive> {
        self.directive(
            QueryExpr::MatchPhrase {
                field: field.to_string(),
                value: value.to_string(),
            },
            hook,
        )
    }

    fn match_phrase_prefix(
        &self,
        field: &str,
        value: &str,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        self.directive(
            QueryExpr::MatchPhrasePrefix {
                field: field.to_string(),
                value: value.to_string(),
            },
            hook,
        )
    }

    fn multi_match(
        &self,
        fields: &[&str],
        value: &str,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        self.directive(
            QueryExpr::MultiMatch {
                fields: fields.iter().map(ToString::to_string).collect(),
                value: value.to_string(),
            },
            hook,
        )
    }

    fn query_string(&self, query: &str, hook: Option<Hook<'_>>) -> Option<Directive> {
        self.directive(
            QueryExpr::QueryString {
                query: query.to_string(),
            },
            hook,
        )
    }

    fn range(
        &self,
        field: &str,
        lower: RangeBound,
        upper: RangeBound,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        self.directive(
            QueryExpr::Range {
                field: field.to_string(),
                lower,
                upper,
            },
            hook,
        )
    }

    fn regexp(
        &self,
        field: &str,
        pattern: &str,
        boost: f32,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        self.directive(
            QueryExpr::Regexp {
                field: field.to_string(),
                pattern: pattern.to_string(),
                boost,
            },
            hook,
        )
    }

    fn term(&self, field: &str, value: Value, hook: Option<Hook<'_>>) -> Option<Directive> {
        self.directive(
            QueryExpr::Term {
                field: field.to_string(),
                value,
            },
            hook,
        )
    }

    fn terms(&self, field: &str, values: Vec<Value>, hook: Option<Hook<'_>>) -> Option<Directive> {
        self.directive(
            QueryExpr::Terms {
                field: field.to_string(),
                values,
            },
            hook,
        )
    }

    fn wildcard(
        &self,
        field: &str,
        pattern: &str,
        boost: f32,
        hook: Option<Hook<'_>>,
    ) -> Option<Directive> {
        self.directive(
            QueryExpr::Wildcard {
                field: field.to_string(),
                pattern: pattern.to_string(),
                boost,
            },
            hook,
        )
    }

    fn get(
        &self,
        doc_types: &[&str],
        directives: Vec<Directive>,
    ) -> anyhow::Result<ResultCollection> {
        self.execute(doc_types, directives, self.default_limit, 0)
    }

    fn paginate(
        &self,
        doc_types: &[&str],
        directives: Vec<Directive>,
        page: usize,
        per_page: usize,
        offset: usize,
    ) -> anyhow::Result<Paginated> {
        let current_page = page.max(1);
        let window = per_page.max(1);
        let results = self.execute(
            doc_types,
            directives,
            window,
            offset + (current_page - 1) * window,
        )?;
        let total = results.total_hits();
        Ok(Paginated::new(
            results.into_hits(),
            per_page,
            current_page,
            total,
        ))
    }

    fn add(&self, doc_type: &str, id: &str, document: Document) -> anyhow::Result<&Self> {
        let doc = self.parse_document(doc_type, id, &document)?;
        {
            let mut writer = self.writer.lock();
            writer.delete_term(Term::from_field_text(self.id_field, id));
            writer.add_document(doc)?;
            writer.commit()?;
        }
        self.reader.reload()?;
        debug!(doc_type, id, "indexed document");
        Ok(self)
    }

    fn add_multiple(
        &self,
        doc_type: &str,
        documents: Vec<(String, Document)>,
    ) -> anyhow::Result<&Self> {
        let count = documents.len();
        {
            let mut writer = self.writer.lock();
            for (id, document) in &documents {
                let doc = self.parse_document(doc_type, id, document)?;
                writer.delete_term(Term::from_field_text(self.id_field, id));
                writer.add_document(doc)?;
            }
            writer.commit()?;
        }
        self.reader.reload()?;
        debug!(doc_type, count, "indexed document batch");
        Ok(self)
    }

    fn delete(&self, doc_type: &str, id: &str) -> anyhow::Result<&Self> {
        {
            let mut writer = self.writer.lock();
            writer.delete_term(Term::from_field_text(self.id_field, id));
            writer.commit()?;
        }
        self.reader.reload()?;
        debug!(doc_type, id, "deleted document");
        Ok(self)
    }
}
