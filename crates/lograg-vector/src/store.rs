//! In-memory vector store with exact cosine search.
//!
//! Search is an exhaustive scan, O(n·d) per query. The store is sized for the
//! lines of a single uploaded log, so no index structure is kept.

use lograg_core::{Error, Result, VectorEntry};

/// `dot(a,b) / (|a|·|b|)`, accumulated in f64.
///
/// Returns negative infinity when either vector has zero magnitude, when the
/// lengths differ, or when the inputs are not finite, so such a vector never
/// wins a comparison.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() { return f64::NEG_INFINITY; }
    let (mut dot, mut norm_a, mut norm_b) = (0f64, 0f64, 0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 { return f64::NEG_INFINITY; }
    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_nan() { f64::NEG_INFINITY } else { similarity }
}

/// A search hit. `score` is the cosine similarity to the query.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub entry: &'a VectorEntry,
    pub score: f64,
}

/// Append-only collection of embedded log lines.
///
/// All vectors share one length: either fixed up front with
/// [`VectorStore::with_dimension`] or taken from the first appended entry.
/// The store has a single owner; ingestion borrows it mutably, so it cannot
/// be searched while a pass is still appending.
#[derive(Debug, Default)]
pub struct VectorStore {
    entries: Vec<VectorEntry>,
    dimension: Option<usize>,
}

impl VectorStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_dimension(dimension: usize) -> Self { Self { entries: Vec::new(), dimension: Some(dimension) } }

    pub fn dimension(&self) -> Option<usize> { self.dimension }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn entries(&self) -> &[VectorEntry] { &self.entries }

    pub fn iter(&self) -> impl Iterator<Item = &VectorEntry> { self.entries.iter() }

    pub fn append(&mut self, entry: VectorEntry) -> Result<()> {
        let expected = self.dimension.unwrap_or(entry.vector.len());
        ensure_dimension(expected, entry.vector.len())?;
        self.dimension = Some(expected);
        self.entries.push(entry);
        Ok(())
    }

    /// Append every entry or none of them.
    pub fn append_batch(&mut self, entries: Vec<VectorEntry>) -> Result<()> {
        let Some(first) = entries.first() else { return Ok(()) };
        let expected = self.dimension.unwrap_or(first.vector.len());
        for entry in &entries { ensure_dimension(expected, entry.vector.len())?; }
        self.dimension = Some(expected);
        self.entries.extend(entries);
        Ok(())
    }

    /// The entry most similar to `query`, or `None` when the store is empty.
    /// Ties go to the entry inserted first.
    pub fn search(&self, query: &[f32]) -> Result<Option<Match<'_>>> {
        if self.entries.is_empty() { return Ok(None); }
        self.check_query(query)?;
        let mut best: Option<Match<'_>> = None;
        for entry in &self.entries {
            let score = cosine_similarity(query, &entry.vector);
            match best {
                Some(ref b) if score <= b.score => {}
                _ => best = Some(Match { entry, score }),
            }
        }
        Ok(best)
    }

    /// Up to `k` best matches in descending score order; ties keep insertion order.
    pub fn top_k(&self, query: &[f32], k: usize) -> Result<Vec<Match<'_>>> {
        if self.entries.is_empty() || k == 0 { return Ok(Vec::new()); }
        self.check_query(query)?;
        let mut matches: Vec<Match<'_>> = self
            .entries
            .iter()
            .map(|entry| Match { entry, score: cosine_similarity(query, &entry.vector) })
            .collect();
        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches.truncate(k);
        Ok(matches)
    }

    fn check_query(&self, query: &[f32]) -> Result<()> {
        match self.dimension {
            Some(expected) => ensure_dimension(expected, query.len()),
            None => Ok(()),
        }
    }
}

fn ensure_dimension(expected: usize, actual: usize) -> Result<()> {
    if expected == actual { Ok(()) } else { Err(Error::DimensionMismatch { expected, actual }) }
}
