//! Anchor reference sets and similarity aggregation.
//!
//! Each stance label carries a curated set of reference statements. At
//! startup the statements are batch-encoded into per-label embedding
//! matrices; at query time the engine scores a text embedding against every
//! matrix with top-k-mean cosine similarity. The store is immutable after
//! construction and safe to share across concurrent calls.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, VordrError};
use crate::providers::traits::EmbeddingProvider;
use crate::types::{SimilarityScores, StanceLabel};

/// How many of the highest per-example similarities feed the aggregate.
///
/// Top-k mean rather than single-best-match or full-mean: a few mismatched
/// reference examples can't dominate the score, while strong alignment with
/// the closest cluster of anchors still is rewarded.
pub const TOP_K: usize = 5;

/// One label's reference statements and their embedding matrix.
#[derive(Debug, Clone)]
pub struct AnchorSet {
    /// The stance label these anchors represent.
    pub label: StanceLabel,
    /// Reference statements, in file order.
    pub examples: Vec<String>,
    /// One embedding row per example.
    pub embeddings: Vec<Vec<f32>>,
}

/// Immutable per-label anchor embedding matrices.
///
/// Constructed once during initialization and passed by reference into the
/// engine. A label whose example file is missing or empty is skipped with a
/// warning — the store functions with a reduced label set, and the
/// feature-build step decides how to treat the gap.
#[derive(Debug)]
pub struct AnchorStore {
    sets: BTreeMap<StanceLabel, AnchorSet>,
    dimensions: usize,
}

impl AnchorStore {
    /// Load anchor sets from a directory of `<label_key>.txt` files
    /// (one example statement per line), encoding each label's examples
    /// as one batch through the shared embedding collaborator.
    pub async fn load(dir: &Path, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        let mut sets = BTreeMap::new();
        let mut dimensions = 0_usize;

        for label in StanceLabel::ALL {
            let path = dir.join(format!("{}.txt", label.key()));

            let contents = match std::fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    warn!(label = label.key(), path = %path.display(), error = %e,
                        "anchor file missing, label will be absent from similarity scores");
                    continue;
                }
            };

            let examples: Vec<String> = contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();

            if examples.is_empty() {
                warn!(label = label.key(), path = %path.display(),
                    "anchor file empty, label will be absent from similarity scores");
                continue;
            }

            let refs: Vec<&str> = examples.iter().map(String::as_str).collect();
            let embeddings = embedder.embed_batch(&refs).await?;

            let rows: Vec<Vec<f32>> = embeddings.into_iter().map(|e| e.values).collect();
            for row in &rows {
                if dimensions == 0 {
                    dimensions = row.len();
                } else if row.len() != dimensions {
                    return Err(VordrError::Configuration(format!(
                        "Anchor embedding dimensionality mismatch for '{}': expected {}, got {}",
                        label.key(),
                        dimensions,
                        row.len()
                    )));
                }
            }

            debug!(label = label.key(), examples = examples.len(), "loaded anchor set");
            sets.insert(
                label,
                AnchorSet {
                    label,
                    examples,
                    embeddings: rows,
                },
            );
        }

        if sets.is_empty() {
            warn!(dir = %dir.display(), "no anchor sets loaded, similarity queries will fail");
        }

        Ok(Self { sets, dimensions })
    }

    /// Build a store directly from pre-encoded sets. Rows must share one
    /// dimensionality.
    pub fn from_sets(sets: Vec<AnchorSet>) -> Result<Self> {
        let mut dimensions = 0_usize;
        let mut map = BTreeMap::new();

        for set in sets {
            for row in &set.embeddings {
                if dimensions == 0 {
                    dimensions = row.len();
                } else if row.len() != dimensions {
                    return Err(VordrError::Configuration(format!(
                        "Anchor embedding dimensionality mismatch for '{}'",
                        set.label.key()
                    )));
                }
            }
            map.insert(set.label, set);
        }

        Ok(Self {
            sets: map,
            dimensions,
        })
    }

    /// Labels with a loaded anchor set.
    pub fn labels(&self) -> impl Iterator<Item = StanceLabel> + '_ {
        self.sets.keys().copied()
    }

    /// Whether no anchor sets loaded.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Embedding dimensionality shared by all sets (0 when empty).
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Top-k-mean cosine similarity of a query embedding against every
    /// loaded anchor set.
    ///
    /// # Errors
    ///
    /// `AnchorsNotLoaded` when no set loaded at all — similarity is
    /// foundational to the feature schema and cannot be skipped per-call.
    /// `DataError` when the query dimensionality disagrees with the store.
    pub fn similarity(&self, query: &[f32]) -> Result<SimilarityScores> {
        if self.sets.is_empty() {
            return Err(VordrError::AnchorsNotLoaded);
        }
        if query.len() != self.dimensions {
            return Err(VordrError::DataError(format!(
                "Query embedding has {} dimensions, anchors have {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scores = SimilarityScores::new();
        for (label, set) in &self.sets {
            let mut sims: Vec<f32> = set
                .embeddings
                .iter()
                .map(|row| cosine_similarity(query, row))
                .collect();

            // Mean of the TOP_K best matches; all of them when fewer exist.
            sims.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
            let k = sims.len().min(TOP_K);
            let mean = sims[..k].iter().sum::<f32>() / k as f32;

            scores.insert(*label, mean);
        }

        Ok(scores)
    }
}

/// Cosine similarity between two equal-length vectors.
///
/// Returns 0.0 when either vector has zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(label: StanceLabel, rows: Vec<Vec<f32>>) -> AnchorSet {
        AnchorSet {
            label,
            examples: rows.iter().map(|_| "example".to_string()).collect(),
            embeddings: rows,
        }
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.5, -0.3, 0.8];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_of_opposite_vectors_is_minus_one() {
        let sim = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]);
        assert!((sim + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_norm_guard() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn similarity_with_exactly_five_examples_is_full_mean() {
        // Five orthogonal-ish rows: with k = 5 the aggregate equals the
        // plain mean of all five cosines.
        let rows: Vec<Vec<f32>> = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
        ];
        let store =
            AnchorStore::from_sets(vec![set(StanceLabel::Neutral, rows.clone())]).unwrap();

        let query = vec![1.0, 0.0, 0.0];
        let expected: f32 = rows
            .iter()
            .map(|row| cosine_similarity(&query, row))
            .sum::<f32>()
            / 5.0;

        let scores = store.similarity(&query).unwrap();
        let actual = scores.get(StanceLabel::Neutral).unwrap();
        assert!((actual - expected).abs() < 1e-6);
    }

    #[test]
    fn similarity_with_fewer_than_five_uses_all() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let store = AnchorStore::from_sets(vec![set(StanceLabel::ProIndia, rows)]).unwrap();

        let scores = store.similarity(&[1.0, 0.0]).unwrap();
        // (1.0 + 0.0) / 2
        assert!((scores.get(StanceLabel::ProIndia).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn similarity_takes_top_k_of_larger_sets() {
        // Six rows: five aligned with the query, one opposite. The opposite
        // row must fall outside the top 5 and not drag the mean down.
        let mut rows = vec![vec![1.0, 0.0]; 5];
        rows.push(vec![-1.0, 0.0]);
        let store = AnchorStore::from_sets(vec![set(StanceLabel::AntiIndia, rows)]).unwrap();

        let scores = store.similarity(&[1.0, 0.0]).unwrap();
        assert!((scores.get(StanceLabel::AntiIndia).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn empty_store_is_hard_error() {
        let store = AnchorStore::from_sets(vec![]).unwrap();
        let err = store.similarity(&[1.0, 0.0]).unwrap_err();
        assert!(matches!(err, VordrError::AnchorsNotLoaded));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let store =
            AnchorStore::from_sets(vec![set(StanceLabel::Neutral, vec![vec![1.0, 0.0]])]).unwrap();
        let err = store.similarity(&[1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, VordrError::DataError(_)));
    }

    #[test]
    fn mismatched_set_dimensions_rejected_at_construction() {
        let result = AnchorStore::from_sets(vec![
            set(StanceLabel::Neutral, vec![vec![1.0, 0.0]]),
            set(StanceLabel::ProIndia, vec![vec![1.0, 0.0, 0.0]]),
        ]);
        assert!(result.is_err());
    }
}
