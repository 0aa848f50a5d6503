//! Canonical ranking
//!
//! Every corpus entry is scored once and the results are sorted once, ascending
//! by distance with identifier tie-breaks. "Most similar" is a prefix of that
//! ordering and "least similar" a suffix, so the two can never disagree.

use crate::distance::{checked_norm, distance_with_query_norm};
use hearth_core::{CorpusEntry, Result, Vector};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

/// An identifier with its distance to the query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub identifier: String,
    pub score: f32,
}

/// Corpus entries ordered from most to least similar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    items: Vec<RankedItem>,
    excluded: Vec<String>,
}

impl Ranking {
    /// All ranked items, ascending by distance.
    pub fn items(&self) -> &[RankedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries left out because their vector has zero norm.
    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    /// The `k` most similar items (`k` clamped to the ranking size).
    pub fn top_k(&self, k: usize) -> &[RankedItem] {
        &self.items[..k.min(self.items.len())]
    }

    /// The `k` least similar items, still in ascending order: the last item is
    /// the least similar of the whole corpus.
    pub fn bottom_k(&self, k: usize) -> &[RankedItem] {
        let n = self.items.len();
        &self.items[n - k.min(n)..]
    }
}

/// Score every entry against `query` and sort ascending by distance.
///
/// # Errors
/// - [`hearth_core::Error::UndefinedSimilarity`] if the query has (near-)zero norm
/// - [`hearth_core::Error::InvalidDimension`] if the query and the corpus differ in dimension
///
/// Entries with zero-norm vectors are not errors: they are left out of the
/// ordering and listed in [`Ranking::excluded`].
pub fn rank(query: &Vector, corpus: &[CorpusEntry]) -> Result<Ranking> {
    let query_norm = checked_norm(query, "query")?;

    let scored: Vec<(&CorpusEntry, Option<f32>)> = corpus
        .par_iter()
        .map(|entry| {
            distance_with_query_norm(query, query_norm, entry.vector())
                .transpose()
                .map(|score| (entry, score))
        })
        .collect::<Result<_>>()?;

    let mut items = Vec::with_capacity(scored.len());
    let mut excluded = Vec::new();
    for (entry, score) in scored {
        match score {
            Some(score) => items.push(RankedItem {
                identifier: entry.identifier().to_string(),
                score,
            }),
            None => excluded.push(entry.identifier().to_string()),
        }
    }

    if !excluded.is_empty() {
        warn!(
            "{} corpus entries have zero-norm vectors and were not ranked",
            excluded.len()
        );
    }

    items.sort_unstable_by(|a, b| {
        OrderedFloat(a.score)
            .cmp(&OrderedFloat(b.score))
            .then_with(|| a.identifier.cmp(&b.identifier))
    });

    debug!("Ranked {} of {} corpus entries", items.len(), corpus.len());
    Ok(Ranking { items, excluded })
}

/// The `k` most similar items of `ranked`.
pub fn top_k(ranked: &Ranking, k: usize) -> &[RankedItem] {
    ranked.top_k(k)
}

/// The `k` least similar items of `ranked`.
pub fn bottom_k(ranked: &Ranking, k: usize) -> &[RankedItem] {
    ranked.bottom_k(k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::{CorpusIndex, EmbeddingRecord, Error};
    use std::collections::HashSet;

    fn corpus(rows: &[(&str, &[f32])]) -> CorpusIndex {
        let records = rows
            .iter()
            .map(|(id, v)| EmbeddingRecord::new(*id, v.to_vec()))
            .collect();
        CorpusIndex::load(records, vec![]).unwrap()
    }

    fn ids(items: &[RankedItem]) -> Vec<&str> {
        items.iter().map(|i| i.identifier.as_str()).collect()
    }

    #[test]
    fn test_reference_scenario() {
        let index = corpus(&[("A", &[1.0, 0.0]), ("B", &[0.0, 1.0]), ("C", &[-1.0, 0.0])]);
        let ranking = rank(&Vector::new(vec![1.0, 0.0]), index.entries()).unwrap();

        assert_eq!(ids(ranking.items()), vec!["A", "B", "C"]);
        let scores: Vec<f32> = ranking.items().iter().map(|i| i.score).collect();
        assert!(scores[0].abs() < 1e-6);
        assert!((scores[1] - 1.0).abs() < 1e-6);
        assert!((scores[2] - 2.0).abs() < 1e-6);

        assert_eq!(ids(top_k(&ranking, 1)), vec!["A"]);
        assert_eq!(ids(bottom_k(&ranking, 1)), vec!["C"]);
    }

    #[test]
    fn test_every_entry_ranked_once() {
        let rows: Vec<(String, Vec<f32>)> = (0..50)
            .map(|i| {
                let angle = i as f32 * 0.37;
                (format!("img-{:02}", i), vec![angle.cos(), angle.sin(), 0.1])
            })
            .collect();
        let records = rows
            .iter()
            .map(|(id, v)| EmbeddingRecord::new(id.clone(), v.clone()))
            .collect();
        let index = CorpusIndex::load(records, vec![]).unwrap();

        let ranking = rank(&Vector::new(vec![0.3, 0.7, 0.2]), index.entries()).unwrap();
        assert_eq!(ranking.len(), 50);
        let unique: HashSet<&str> = ranking.items().iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(unique.len(), 50);
        assert!(ranking.items().windows(2).all(|w| w[0].score <= w[1].score));

        let top: HashSet<_> = ids(ranking.top_k(25)).into_iter().collect();
        let bottom: HashSet<_> = ids(ranking.bottom_k(25)).into_iter().collect();
        assert!(top.is_disjoint(&bottom));
    }

    #[test]
    fn test_ties_break_by_identifier() {
        let index = corpus(&[
            ("zeta", &[0.0, 1.0]),
            ("alpha", &[0.0, 2.0]),
            ("mid", &[0.0, 1.0]),
            ("best", &[1.0, 0.0]),
        ]);
        let query = Vector::new(vec![1.0, 0.0]);
        for _ in 0..10 {
            let ranking = rank(&query, index.entries()).unwrap();
            assert_eq!(ids(ranking.items()), vec!["best", "alpha", "mid", "zeta"]);
        }
    }

    #[test]
    fn test_k_is_clamped() {
        let index = corpus(&[("A", &[1.0, 0.0]), ("B", &[0.0, 1.0])]);
        let ranking = rank(&Vector::new(vec![1.0, 0.0]), index.entries()).unwrap();
        assert_eq!(ranking.top_k(10).len(), 2);
        assert_eq!(ranking.bottom_k(10).len(), 2);
        assert!(ranking.top_k(0).is_empty());
        assert!(ranking.bottom_k(0).is_empty());
    }

    #[test]
    fn test_zero_norm_query_is_undefined() {
        let index = corpus(&[("A", &[1.0, 0.0])]);
        let err = rank(&Vector::new(vec![0.0, 0.0]), index.entries()).unwrap_err();
        assert!(matches!(err, Error::UndefinedSimilarity(_)));
    }

    #[test]
    fn test_zero_norm_candidate_is_excluded() {
        let index = corpus(&[("A", &[1.0, 0.0]), ("blank", &[0.0, 0.0]), ("B", &[0.0, 1.0])]);
        let ranking = rank(&Vector::new(vec![1.0, 0.0]), index.entries()).unwrap();
        assert_eq!(ids(ranking.items()), vec!["A", "B"]);
        assert_eq!(ranking.excluded(), &["blank".to_string()]);
    }

    #[test]
    fn test_dimension_mismatch_fails_query() {
        let index = corpus(&[("A", &[1.0, 0.0])]);
        assert!(matches!(
            rank(&Vector::new(vec![1.0, 0.0, 0.0]), index.entries()),
            Err(Error::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_empty_corpus() {
        let ranking = rank(&Vector::new(vec![1.0]), &[]).unwrap();
        assert!(ranking.is_empty());
        assert!(ranking.top_k(3).is_empty());
    }
}
