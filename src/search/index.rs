//
//  index.rs
//  notegraph
//
//  Created by hak (tharun)
//

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};
use tracing::debug;

use super::tokenizer::tokenize;

/// Term counts for one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentVector {
    pub id: String,
    /// Raw occurrence count per term.
    pub term_counts: HashMap<String, usize>,
    pub total_terms: usize,
}

impl DocumentVector {
    fn from_tokens(id: &str, tokens: Vec<String>) -> Self {
        let total_terms = tokens.len();
        let mut term_counts = HashMap::new();
        for token in tokens {
            *term_counts.entry(token).or_insert(0) += 1;
        }
        Self {
            id: id.to_string(),
            term_counts,
            total_terms,
        }
    }

    fn tf(&self, term: &str) -> f64 {
        match (self.term_counts.get(term), self.total_terms) {
            (Some(&count), total) if total > 0 => count as f64 / total as f64,
            _ => 0.0,
        }
    }
}

/// One scored search or similarity result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    /// Cosine similarity rounded to 4 decimals, always in (0, 1].
    pub score: f64,
}

#[derive(Debug, Default)]
struct MagnitudeCache {
    dirty: bool,
    values: HashMap<String, f64>,
}

/// TF-IDF index over document term vectors.
///
/// IDF depends on the whole corpus, so every mutation only marks the cached
/// vector magnitudes dirty. The first comparison after a mutation recomputes
/// all of them at once. This cache is the only state carried between calls
/// besides the vectors themselves; it sits behind a lock so queries can take
/// `&self`.
#[derive(Debug, Default)]
pub struct SearchIndex {
    documents: HashMap<String, DocumentVector>,
    /// Number of documents containing each term.
    doc_freq: HashMap<String, usize>,
    magnitudes: RwLock<MagnitudeCache>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole index with the given `(id, text)` pairs.
    pub fn build_index<'a>(&mut self, documents: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.documents.clear();
        self.doc_freq.clear();
        for (id, text) in documents {
            self.add_document(id, text);
        }
        self.mark_dirty();
        debug!(
            documents = self.documents.len(),
            terms = self.doc_freq.len(),
            "search index rebuilt"
        );
    }

    /// Add or replace one document.
    pub fn update_document(&mut self, id: &str, text: &str) {
        self.remove_vector(id);
        self.add_document(id, text);
        self.mark_dirty();
    }

    /// Drop a document. Unknown ids are ignored.
    pub fn remove_document(&mut self, id: &str) {
        if self.remove_vector(id) {
            self.mark_dirty();
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    pub fn document(&self, id: &str) -> Option<&DocumentVector> {
        self.documents.get(id)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Number of documents containing `term` (already tokenized).
    pub fn doc_freq(&self, term: &str) -> usize {
        self.doc_freq.get(term).copied().unwrap_or(0)
    }

    /// Smoothed inverse document frequency, never negative.
    pub fn idf(&self, term: &str) -> f64 {
        let total = self.documents.len() as f64;
        ((total + 1.0) / (self.doc_freq(term) as f64 + 1.0)).ln()
    }

    /// Rank documents by cosine similarity to a free-text query.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        if limit == 0 {
            return Vec::new();
        }
        let query_vector = DocumentVector::from_tokens("", tokenize(query));
        if query_vector.total_terms == 0 {
            return Vec::new();
        }

        let query_weights = self.weights(&query_vector);
        let query_magnitude = magnitude(query_weights.values().copied());
        if query_magnitude == 0.0 {
            return Vec::new();
        }

        let magnitudes = self.magnitudes();
        let scored = self.documents.values().filter_map(|doc| {
            let doc_magnitude = magnitudes.values.get(&doc.id).copied().unwrap_or(0.0);
            if doc_magnitude == 0.0 {
                return None;
            }
            let dot: f64 = query_weights
                .iter()
                .map(|(term, weight)| weight * doc.tf(term) * self.idf(term))
                .sum();
            Some((doc.id.clone(), dot / (query_magnitude * doc_magnitude)))
        });

        rank(scored, limit)
    }

    /// Documents most similar to `id`, excluding itself. Empty for unknown ids.
    pub fn find_similar(&self, id: &str, limit: usize) -> Vec<SearchHit> {
        let Some(source) = self.documents.get(id) else {
            return Vec::new();
        };
        if limit == 0 {
            return Vec::new();
        }

        let magnitudes = self.magnitudes();
        let source_magnitude = magnitudes.values.get(id).copied().unwrap_or(0.0);
        if source_magnitude == 0.0 {
            return Vec::new();
        }
        let source_weights = self.weights(source);

        let scored = self
            .documents
            .values()
            .filter(|doc| doc.id != id)
            .filter_map(|doc| {
                let doc_magnitude = magnitudes.values.get(&doc.id).copied().unwrap_or(0.0);
                if doc_magnitude == 0.0 {
                    return None;
                }
                let dot: f64 = source_weights
                    .iter()
                    .filter(|(term, _)| doc.term_counts.contains_key(**term))
                    .map(|(term, weight)| weight * doc.tf(term) * self.idf(term))
                    .sum();
                Some((doc.id.clone(), dot / (source_magnitude * doc_magnitude)))
            });

        rank(scored, limit)
    }

    fn add_document(&mut self, id: &str, text: &str) {
        let vector = DocumentVector::from_tokens(id, tokenize(text));
        for term in vector.term_counts.keys() {
            *self.doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
        self.documents.insert(id.to_string(), vector);
    }

    fn remove_vector(&mut self, id: &str) -> bool {
        let Some(old) = self.documents.remove(id) else {
            return false;
        };
        for term in old.term_counts.keys() {
            if let Some(count) = self.doc_freq.get_mut(term) {
                *count -= 1;
                if *count == 0 {
                    self.doc_freq.remove(term);
                }
            }
        }
        true
    }

    fn mark_dirty(&mut self) {
        self.magnitudes
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .dirty = true;
    }

    /// TF-IDF weight of every term in `vector` against the current corpus.
    fn weights<'v>(&self, vector: &'v DocumentVector) -> HashMap<&'v str, f64> {
        vector
            .term_counts
            .keys()
            .map(|term| (term.as_str(), vector.tf(term) * self.idf(term)))
            .collect()
    }

    /// Cached magnitudes, recomputed for every document if stale.
    fn magnitudes(&self) -> RwLockReadGuard<'_, MagnitudeCache> {
        {
            let cache = self
                .magnitudes
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if !cache.dirty {
                return cache;
            }
        }

        {
            let mut cache = self
                .magnitudes
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if cache.dirty {
                cache.values = self
                    .documents
                    .values()
                    .map(|doc| {
                        let weights = self.weights(doc);
                        (doc.id.clone(), magnitude(weights.values().copied()))
                    })
                    .collect();
                cache.dirty = false;
                debug!(documents = cache.values.len(), "recomputed vector magnitudes");
            }
        }

        self.magnitudes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn magnitude(weights: impl Iterator<Item = f64>) -> f64 {
    weights.map(|w| w * w).sum::<f64>().sqrt()
}

fn round4(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

/// Keep positive scores, best first (ties by id), rounded and truncated.
fn rank(scored: impl Iterator<Item = (String, f64)>, limit: usize) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = scored
        .filter(|(_, score)| *score > 0.0)
        .map(|(id, score)| SearchHit {
            id,
            score: round4(score).min(1.0),
        })
        .filter(|hit| hit.score > 0.0)
        .collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
    hits.truncate(limit);
    hits
}
