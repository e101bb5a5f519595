//! Tantivy-backed index

use super::traits::{IndexError, SearchIndex};
use crate::results::{FacetResult, Hit, SearchResult, TermFacet};
use crate::search::{FacetRequest, QueryKind, SearchRequest};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use tantivy::aggregation::agg_req::Aggregations;
use tantivy::aggregation::AggregationCollector;
use tantivy::collector::{Count, TopDocs};
use levenshtein_automata::{Distance, LevenshteinAutomatonBuilder};
use tantivy::query::{
    BooleanQuery, EmptyQuery, FuzzyTermQuery, Occur, Query, QueryParser, RegexQuery, TermQuery,
};
use tantivy::schema::{Field, FieldType, IndexRecordOption, Schema, Value};
use tantivy::snippet::SnippetGenerator;
use tantivy::{
    DocAddress, Document, Index, IndexReader, ReloadPolicy, Score, Searcher, TantivyDocument, Term,
};
use tracing::{debug, warn};

/// Default maximum number of characters in a highlighted fragment
const DEFAULT_FRAGMENT_MAX_CHARS: usize = 150;

/// A pre-built tantivy index opened for reading
pub struct TantivyIndex {
    index: Index,
    reader: IndexReader,
    schema: Schema,
    /// Indexed text fields searched when a query names no field
    default_fields: Vec<Field>,
    /// Stored field carrying the external document id
    id_field: Option<Field>,
    fragment_max_chars: usize,
}

impl TantivyIndex {
    /// Open an index directory
    pub fn open(path: &Path, id_field: &str) -> Result<Self, IndexError> {
        if !path.is_dir() {
            return Err(IndexError::NotFound(path.to_path_buf()));
        }

        let index = Index::open_in_dir(path).map_err(|e| IndexError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Self::from_index(index, id_field)
    }

    /// Wrap an already opened index
    pub fn from_index(index: Index, id_field: &str) -> Result<Self, IndexError> {
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()?;
        let schema = index.schema();

        let default_fields: Vec<Field> = schema
            .fields()
            .filter(|(_, entry)| entry.is_indexed() && matches!(entry.field_type(), FieldType::Str(_)))
            .map(|(field, _)| field)
            .collect();

        let id_field = match schema.get_field(id_field) {
            Ok(field) => Some(field),
            Err(_) => {
                warn!(
                    "Id field '{}' not in schema, falling back to document addresses",
                    id_field
                );
                None
            }
        };

        debug!(
            "Opened index with {} default search fields",
            default_fields.len()
        );

        Ok(Self {
            index,
            reader,
            schema,
            default_fields,
            id_field,
            fragment_max_chars: DEFAULT_FRAGMENT_MAX_CHARS,
        })
    }

    /// Set the maximum fragment length used for highlighting
    pub fn with_fragment_max_chars(mut self, max_chars: usize) -> Self {
        self.fragment_max_chars = max_chars;
        self
    }

    /// Translate a query shape into a tantivy query over the default fields
    fn build_query(&self, kind: &QueryKind) -> Result<Box<dyn Query>, IndexError> {
        if kind.text().trim().is_empty() {
            return Ok(Box::new(EmptyQuery));
        }

        match kind {
            QueryKind::QueryString(text) => {
                let parser = QueryParser::for_index(&self.index, self.default_fields.clone());
                parser
                    .parse_query(text)
                    .map_err(|e| IndexError::InvalidQuery(e.to_string()))
            }
            QueryKind::Prefix(text) => {
                // Term dictionary regexes are anchored, so this is a prefix match
                let pattern = format!("{}.*", regex::escape(text));
                let mut clauses: Vec<(Occur, Box<dyn Query>)> = Vec::new();
                for &field in &self.default_fields {
                    let query = RegexQuery::from_pattern(&pattern, field)
                        .map_err(|e| IndexError::InvalidQuery(e.to_string()))?;
                    clauses.push((Occur::Should, Box::new(query)));
                }
                Ok(Box::new(BooleanQuery::new(clauses)))
            }
            QueryKind::Fuzzy { term, fuzziness } => {
                let clauses: Vec<(Occur, Box<dyn Query>)> = self
                    .default_fields
                    .iter()
                    .map(|&field| {
                        let query =
                            FuzzyTermQuery::new(Term::from_field_text(field, term), *fuzziness, false);
                        (Occur::Should, Box::new(query) as Box<dyn Query>)
                    })
                    .collect();
                Ok(Box::new(BooleanQuery::new(clauses)))
            }
        }
    }

    /// Query over the indexed terms a fuzzy term matches, for highlighting.
    ///
    /// The fuzzy automaton reports no terms of its own, so the term
    /// dictionaries are walked with the same edit distance.
    fn fuzzy_highlight_query(
        &self,
        searcher: &Searcher,
        term: &str,
        fuzziness: u8,
    ) -> Result<Box<dyn Query>, IndexError> {
        let dfa = LevenshteinAutomatonBuilder::new(fuzziness, false).build_dfa(term);
        let mut matched = std::collections::BTreeSet::new();

        for &field in &self.default_fields {
            for segment in searcher.segment_readers() {
                let inverted = segment.inverted_index(field)?;
                let mut stream = inverted.terms().stream()?;
                while stream.advance() {
                    if let Distance::Exact(_) = dfa.eval(stream.key()) {
                        if let Ok(text) = std::str::from_utf8(stream.key()) {
                            matched.insert((field, text.to_string()));
                        }
                    }
                }
            }
        }

        debug!("Fuzzy term '{}' highlights {} indexed terms", term, matched.len());

        let clauses: Vec<(Occur, Box<dyn Query>)> = matched
            .into_iter()
            .map(|(field, text)| {
                let query = TermQuery::new(
                    Term::from_field_text(field, &text),
                    IndexRecordOption::WithFreqs,
                );
                (Occur::Should, Box::new(query) as Box<dyn Query>)
            })
            .collect();
        Ok(Box::new(BooleanQuery::new(clauses)))
    }

    fn snippet_generators(
        &self,
        searcher: &Searcher,
        query: &dyn Query,
    ) -> Result<Vec<(String, SnippetGenerator)>, IndexError> {
        let mut generators = Vec::new();
        for &field in &self.default_fields {
            if !self.schema.get_field_entry(field).is_stored() {
                continue;
            }
            let mut generator = SnippetGenerator::create(searcher, query, field)?;
            generator.set_max_num_chars(self.fragment_max_chars);
            generators.push((self.schema.get_field_name(field).to_string(), generator));
        }
        Ok(generators)
    }

    fn to_hit(
        &self,
        searcher: &Searcher,
        doc: &TantivyDocument,
        score: Score,
        address: DocAddress,
        generators: &[(String, SnippetGenerator)],
    ) -> Result<Hit, IndexError> {
        let id = self
            .id_field
            .and_then(|field| doc.get_first(field))
            .and_then(|value| value.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}:{}", address.segment_ord, address.doc_id));

        let location = searcher
            .segment_reader(address.segment_ord)
            .segment_id()
            .uuid_string();

        let mut hit = Hit::new(id, f64::from(score)).with_index(location);

        for (name, mut values) in doc.to_named_doc(&self.schema).0 {
            let value = if values.len() == 1 {
                serde_json::to_value(values.remove(0))?
            } else {
                serde_json::to_value(values)?
            };
            hit.fields.insert(name, value);
        }

        for (name, generator) in generators {
            let snippet = generator.snippet_from_doc(doc);
            if !snippet.highlighted().is_empty() {
                hit.fragments.insert(name.clone(), vec![snippet.to_html()]);
            }
        }

        Ok(hit)
    }

    fn facets(
        &self,
        searcher: &Searcher,
        query: &dyn Query,
        total_hits: u64,
        requests: &BTreeMap<String, FacetRequest>,
    ) -> Result<BTreeMap<String, FacetResult>, IndexError> {
        let mut results = BTreeMap::new();
        let mut aggs = serde_json::Map::new();

        for (name, facet) in requests {
            let fast = self
                .schema
                .get_field(&facet.field)
                .map(|field| self.schema.get_field_entry(field).is_fast())
                .unwrap_or(false);

            if !fast || facet.size == 0 {
                if !fast {
                    warn!(
                        "Facet field '{}' is missing or not a fast field, returning no buckets",
                        facet.field
                    );
                }
                results.insert(
                    name.clone(),
                    FacetResult {
                        field: facet.field.clone(),
                        missing: if fast { 0 } else { total_hits },
                        ..Default::default()
                    },
                );
                continue;
            }

            aggs.insert(
                name.clone(),
                json!({ "terms": { "field": facet.field.as_str(), "size": facet.size } }),
            );
        }

        if aggs.is_empty() {
            return Ok(results);
        }

        let aggs: Aggregations = serde_json::from_value(serde_json::Value::Object(aggs))?;
        let collector = AggregationCollector::from_aggs(aggs, Default::default());
        let output = serde_json::to_value(searcher.search(query, &collector)?)?;

        for (name, facet) in requests {
            if results.contains_key(name) {
                continue;
            }

            let bucket_result = &output[name.as_str()];
            let terms: Vec<TermFacet> = bucket_result["buckets"]
                .as_array()
                .map(|buckets| {
                    buckets
                        .iter()
                        .map(|bucket| TermFacet {
                            term: match &bucket["key"] {
                                serde_json::Value::String(s) => s.clone(),
                                other => other.to_string(),
                            },
                            count: bucket["doc_count"].as_u64().unwrap_or(0),
                        })
                        .collect()
                })
                .unwrap_or_default();

            let other = bucket_result["sum_other_doc_count"].as_u64().unwrap_or(0);
            let total = terms.iter().map(|t| t.count).sum::<u64>() + other;

            results.insert(
                name.clone(),
                FacetResult {
                    field: facet.field.clone(),
                    total,
                    missing: total_hits.saturating_sub(total),
                    other,
                    terms,
                },
            );
        }

        Ok(results)
    }
}

impl SearchIndex for TantivyIndex {
    fn search(&self, request: &SearchRequest) -> Result<SearchResult, IndexError> {
        let start = Instant::now();
        let searcher = self.reader.searcher();
        let query = self.build_query(&request.query)?;

        // TopDocs sizes its buffer from offset + limit, so bound both by the hit count
        let count = searcher.search(&*query, &Count)?;
        let top_docs = if request.size == 0 || request.from >= count {
            Vec::new()
        } else {
            let limit = request.size.min(count - request.from);
            let top = TopDocs::with_limit(limit).and_offset(request.from);
            searcher.search(&*query, &top)?
        };
        let total_hits = count as u64;

        let generators = match (&request.query, request.highlight && !top_docs.is_empty()) {
            (_, false) => Vec::new(),
            (QueryKind::Fuzzy { term, fuzziness }, true) => {
                let highlight = self.fuzzy_highlight_query(&searcher, term, *fuzziness)?;
                self.snippet_generators(&searcher, &*highlight)?
            }
            (_, true) => self.snippet_generators(&searcher, &*query)?,
        };

        let mut hits = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            hits.push(self.to_hit(&searcher, &doc, score, address, &generators)?);
        }

        let facets = self.facets(&searcher, &*query, total_hits, &request.facets)?;

        Ok(SearchResult {
            total_hits,
            max_score: hits.first().map(|h| h.score).unwrap_or(0.0),
            took_ms: start.elapsed().as_millis() as u64,
            hits,
            facets,
        })
    }

    fn doc_count(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}
