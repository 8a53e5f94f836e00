//! Lowering from expression param bags to tantivy query objects.
//!
//! This is the single place where field names are resolved against the
//! schema, so every malformed parameter surfaces here, at execution time,
//! as a backend rejection rather than in a factory.

use std::ops::Bound;

use serde_json::Value;
use tantivy::query::{
    AllQuery, BooleanQuery, BoostQuery, EmptyQuery, FuzzyTermQuery, Occur, PhrasePrefixQuery,
    PhraseQuery, Query, QueryParser, RangeQuery, RegexQuery, TermQuery, TermSetQuery,
};
use tantivy::schema::{Field, FieldType, IndexRecordOption, Schema};
use tantivy::{Index, Searcher, Term};

use seekdb_core::{CompoundQuery, Error, QueryExpr, RangeBound};

pub(crate) struct CompileCtx<'a> {
    pub index: &'a Index,
    pub schema: &'a Schema,
    pub searcher: &'a Searcher,
}

/// Lower a compound query. The match-all sentinel becomes `AllQuery`;
/// anything else becomes one boolean query built from the three buckets in
/// order.
pub(crate) fn compound(
    ctx: &CompileCtx<'_>,
    compound: &CompoundQuery,
) -> anyhow::Result<Box<dyn Query>> {
    if compound.is_match_all() {
        return Ok(Box::new(AllQuery));
    }

    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(compound.clause_count());
    // A purely negative boolean matches nothing in tantivy; anchor it on
    // match-all so exclusion-only searches behave like filters.
    if compound.must.is_empty() && compound.should.is_empty() {
        clauses.push((Occur::Must, Box::new(AllQuery)));
    }
    for e in &compound.must {
        clauses.push((Occur::Must, expr(ctx, e)?));
    }
    for e in &compound.should {
        clauses.push((Occur::Should, expr(ctx, e)?));
    }
    for e in &compound.must_not {
        clauses.push((Occur::MustNot, expr(ctx, e)?));
    }
    Ok(Box::new(BooleanQuery::new(clauses)))
}

/// The pass-through to tantivy's query constructors.
pub(crate) fn expr(ctx: &CompileCtx<'_>, expr: &QueryExpr) -> anyhow::Result<Box<dyn Query>> {
    match expr {
        QueryExpr::Common {
            field,
            value,
            cutoff_frequency,
        } => common(ctx, field, value, *cutoff_frequency),
        QueryExpr::Fuzzy {
            field,
            value,
            distance,
            transpositions,
            prefix,
        } => {
            let (resolved, _) = resolve(ctx, field)?;
            let term = Term::from_field_text(resolved, value);
            let query = if *prefix {
                FuzzyTermQuery::new_prefix(term, *distance, *transpositions)
            } else {
                FuzzyTermQuery::new(term, *distance, *transpositions)
            };
            Ok(Box::new(query))
        }
        QueryExpr::Match { field, value } => match_terms(ctx, field, value),
        QueryExpr::MatchAll => Ok(Box::new(AllQuery)),
        QueryExpr::MatchPhrase { field, value } => phrase(ctx, field, value, false),
        QueryExpr::MatchPhrasePrefix { field, value } => phrase(ctx, field, value, true),
        QueryExpr::MultiMatch { fields, value } => {
            let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(fields.len());
            for field in fields {
                clauses.push((Occur::Should, match_terms(ctx, field, value)?));
            }
            Ok(Box::new(BooleanQuery::new(clauses)))
        }
        QueryExpr::QueryString { query } => {
            let parser = QueryParser::for_index(ctx.index, default_text_fields(ctx.schema));
            let parsed = parser
                .parse_query(query)
                .map_err(|e| Error::MalformedQuery(e.to_string()))?;
            Ok(parsed)
        }
        QueryExpr::Range {
            field,
            lower,
            upper,
        } => {
            let (resolved, field_type) = resolve(ctx, field)?;
            Ok(Box::new(RangeQuery::new(
                bound(resolved, field_type, field, lower)?,
                bound(resolved, field_type, field, upper)?,
            )))
        }
        QueryExpr::Regexp {
            field,
            pattern,
            boost,
        } => {
            let (resolved, _) = resolve(ctx, field)?;
            let query = RegexQuery::from_pattern(pattern, resolved)
                .map_err(|e| Error::MalformedQuery(e.to_string()))?;
            Ok(boosted(Box::new(query), *boost))
        }
        QueryExpr::Term { field, value } => {
            let term = typed_term(ctx, field, value)?;
            Ok(Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)))
        }
        QueryExpr::Terms { field, values } => {
            let terms = values
                .iter()
                .map(|v| typed_term(ctx, field, v))
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok(Box::new(TermSetQuery::new(terms)))
        }
        QueryExpr::Wildcard {
            field,
            pattern,
            boost,
        } => {
            let (resolved, _) = resolve(ctx, field)?;
            let query = RegexQuery::from_pattern(&wildcard_to_regex(pattern), resolved)
                .map_err(|e| Error::MalformedQuery(e.to_string()))?;
            Ok(boosted(Box::new(query), *boost))
        }
    }
}

/// Analyzed terms split by document frequency: rare terms are required,
/// terms above the cutoff ratio only contribute to scoring.
fn common(
    ctx: &CompileCtx<'_>,
    field: &str,
    value: &str,
    cutoff_frequency: f32,
) -> anyhow::Result<Box<dyn Query>> {
    let terms = analyze(ctx, field, value)?;
    if terms.is_empty() {
        return Ok(Box::new(EmptyQuery));
    }
    let num_docs = ctx.searcher.num_docs();
    let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::with_capacity(terms.len());
    for (_, term) in terms {
        let doc_freq = ctx.searcher.doc_freq(&term)?;
        let frequent = num_docs > 0 && (doc_freq as f32 / num_docs as f32) > cutoff_frequency;
        let occur = if frequent { Occur::Should } else { Occur::Must };
        clauses.push((
            occur,
            Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)),
        ));
    }
    Ok(Box::new(BooleanQuery::new(clauses)))
}

/// Analyzed single-field match: terms OR-ed together.
fn match_terms(ctx: &CompileCtx<'_>, field: &str, value: &str) -> anyhow::Result<Box<dyn Query>> {
    let mut terms = analyze(ctx, field, value)?;
    if terms.is_empty() {
        return Ok(Box::new(EmptyQuery));
    }
    if terms.len() == 1 {
        let (_, term) = terms.remove(0);
        return Ok(Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)));
    }
    let clauses: Vec<(Occur, Box<dyn Query>)> = terms
        .into_iter()
        .map(|(_, term)| {
            (
                Occur::Should,
                Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs)) as Box<dyn Query>,
            )
        })
        .collect();
    Ok(Box::new(BooleanQuery::new(clauses)))
}

fn phrase(
    ctx: &CompileCtx<'_>,
    field: &str,
    value: &str,
    prefix: bool,
) -> anyhow::Result<Box<dyn Query>> {
    let mut terms = analyze(ctx, field, value)?;
    if terms.is_empty() {
        return Ok(Box::new(EmptyQuery));
    }
    if terms.len() == 1 {
        let (_, term) = terms.remove(0);
        return Ok(if prefix {
            Box::new(FuzzyTermQuery::new_prefix(term, 0, false))
        } else {
            Box::new(TermQuery::new(term, IndexRecordOption::WithFreqs))
        });
    }
    Ok(if prefix {
        Box::new(PhrasePrefixQuery::new(
            terms.into_iter().map(|(_, term)| term).collect(),
        ))
    } else {
        Box::new(PhraseQuery::new_with_offset(terms))
    })
}

/// Tokenize `text` with the field's own analyzer, keeping token positions
/// for phrase queries.
fn analyze(ctx: &CompileCtx<'_>, field: &str, text: &str) -> anyhow::Result<Vec<(usize, Term)>> {
    let (resolved, field_type) = resolve(ctx, field)?;
    if !matches!(field_type, FieldType::Str(_)) {
        return Err(Error::MalformedQuery(format!("field `{field}` is not a text field")).into());
    }
    let mut analyzer = ctx.index.tokenizer_for_field(resolved)?;
    let mut stream = analyzer.token_stream(text);
    let mut terms = Vec::new();
    while stream.advance() {
        let token = stream.token();
        terms.push((token.position, Term::from_field_text(resolved, &token.text)));
    }
    Ok(terms)
}

fn resolve<'a>(ctx: &CompileCtx<'a>, field: &str) -> anyhow::Result<(Field, &'a FieldType)> {
    let resolved = ctx
        .schema
        .get_field(field)
        .map_err(|_| Error::MalformedQuery(format!("unknown field `{field}`")))?;
    Ok((resolved, ctx.schema.get_field_entry(resolved).field_type()))
}

fn typed_term(ctx: &CompileCtx<'_>, field: &str, value: &Value) -> anyhow::Result<Term> {
    let (resolved, field_type) = resolve(ctx, field)?;
    term_for(resolved, field_type, field, value)
}

fn term_for(field: Field, field_type: &FieldType, name: &str, value: &Value) -> anyhow::Result<Term> {
    let mismatch = || Error::MalformedQuery(format!("value {value} does not fit field `{name}`"));
    let term = match field_type {
        FieldType::Str(_) => Term::from_field_text(field, value.as_str().ok_or_else(mismatch)?),
        FieldType::U64(_) => Term::from_field_u64(field, value.as_u64().ok_or_else(mismatch)?),
        FieldType::I64(_) => Term::from_field_i64(field, value.as_i64().ok_or_else(mismatch)?),
        FieldType::F64(_) => Term::from_field_f64(field, value.as_f64().ok_or_else(mismatch)?),
        FieldType::Bool(_) => Term::from_field_bool(field, value.as_bool().ok_or_else(mismatch)?),
        _ => {
            return Err(
                Error::MalformedQuery(format!("field `{name}` does not support term queries"))
                    .into(),
            )
        }
    };
    Ok(term)
}

fn bound(
    field: Field,
    field_type: &FieldType,
    name: &str,
    range_bound: &RangeBound,
) -> anyhow::Result<Bound<Term>> {
    Ok(match range_bound {
        RangeBound::Unbounded => Bound::Unbounded,
        RangeBound::Included(value) => Bound::Included(term_for(field, field_type, name, value)?),
        RangeBound::Excluded(value) => Bound::Excluded(term_for(field, field_type, name, value)?),
    })
}

/// Every tokenized text field; raw (keyword-style) fields are not useful
/// free-text targets.
fn default_text_fields(schema: &Schema) -> Vec<Field> {
    schema
        .fields()
        .filter_map(|(field, entry)| match entry.field_type() {
            FieldType::Str(options) => options
                .get_indexing_options()
                .filter(|indexing| indexing.tokenizer() != "raw")
                .map(|_| field),
            _ => None,
        })
        .collect()
}

fn wildcard_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() * 2);
    for c in pattern.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            c if "\\.+()[]{}|^$".contains(c) => {
                regex.push('\\');
                regex.push(c);
            }
            c => regex.push(c),
        }
    }
    regex
}

fn boosted(query: Box<dyn Query>, boost: f32) -> Box<dyn Query> {
    if (boost - 1.0).abs() < f32::EPSILON {
        query
    } else {
        Box::new(BoostQuery::new(query, boost))
    }
}
