//! Persona-labeled learner segmentation.
//!
//! Wires the scaler and k-means together, then ranks clusters by the mean
//! of their centroid's four cognitive dimensions (descending) and maps the
//! ranks onto a fixed, ordered persona list. The persona follows the rank,
//! never the numeric cluster id k-means happened to assign.

use crate::cluster::{KMeans, KMeansModel, DEFAULT_CLUSTERS, DEFAULT_MAX_ITER};
use crate::error::Result;
use crate::preprocessing::StandardScaler;
use crate::record::{cognitive_matrix, CognitiveProfile, LearnerRecord};
use crate::traits::{Estimator, UnsupervisedEstimator};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ordered persona catalog: highest-ranked cluster first.
pub const PERSONA_CATALOG: [(&str, &str); 4] = [
    (
        "High Achievers",
        "Consistently strong across all cognitive skills.",
    ),
    (
        "Steady Performers",
        "Solid skills with headroom in one or two areas.",
    ),
    (
        "Developing Learners",
        "Building fundamentals; benefits from guided practice.",
    ),
    (
        "Struggling Learners",
        "Needs targeted support across core skills.",
    ),
];

/// Configuration for learner segmentation.
///
/// # Examples
///
/// ```
/// use pronostico::prelude::*;
///
/// let records: Vec<LearnerRecord> = (0..6)
///     .map(|i| {
///         let base = if i < 3 { 20.0 } else { 80.0 };
///         LearnerRecord::new(
///             format!("s-{i}"),
///             "demo",
///             CognitiveProfile::new(base + i as f64, base, base + 2.0, base + 1.0),
///             base,
///             100.0,
///         )
///     })
///     .collect();
///
/// let segmentation = Segmenter::new()
///     .with_clusters(2)
///     .with_random_state(42)
///     .fit(&records)
///     .unwrap();
///
/// assert_eq!(segmentation.summaries().len(), 2);
/// assert_eq!(segmentation.summaries()[0].persona, "High Achievers");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segmenter {
    n_clusters: usize,
    max_iter: usize,
    random_state: Option<u64>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter {
    /// Creates a segmenter with the default cluster count (4).
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_clusters: DEFAULT_CLUSTERS,
            max_iter: DEFAULT_MAX_ITER,
            random_state: None,
        }
    }

    /// Sets the number of clusters.
    #[must_use]
    pub fn with_clusters(mut self, n_clusters: usize) -> Self {
        self.n_clusters = n_clusters;
        self
    }

    /// Sets the k-means iteration cap.
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the random seed for reproducible segmentation.
    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }
}

impl Estimator for Segmenter {
    type Fitted = Segmentation;

    /// Normalizes, clusters, and derives persona summaries.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EngineError::EmptyDataset`] when there are
    /// fewer records than clusters.
    fn fit(&self, records: &[LearnerRecord]) -> Result<Segmentation> {
        let features = cognitive_matrix(records)?;
        let scaler = StandardScaler::fit(&features)?;
        let normalized = scaler.transform(&features)?;

        let mut kmeans = KMeans::new(self.n_clusters).with_max_iter(self.max_iter);
        if let Some(seed) = self.random_state {
            kmeans = kmeans.with_random_state(seed);
        }
        let model = kmeans.fit(&normalized)?;

        let (summaries, by_cluster) = build_summaries(records, &scaler, &model)?;

        Ok(Segmentation {
            scaler,
            model,
            summaries,
            by_cluster,
        })
    }
}

/// Per-cluster summary exposed to presentation collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    /// Numeric cluster id assigned by k-means.
    pub cluster: usize,
    /// Persona label derived from the cluster's rank.
    pub persona: String,
    /// Human-readable persona description.
    pub description: String,
    /// Number of member records.
    pub size: usize,
    /// Mean outcome (`exam_score`) of the members; 0.0 for an empty cluster.
    pub avg_score: f64,
    /// Centroid scaled back to original feature units.
    pub centroid: CognitiveProfile,
}

/// Immutable fitted segmentation: scaler, centroids, and ranked summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    scaler: StandardScaler,
    model: KMeansModel,
    summaries: Vec<ClusterSummary>,
    /// Maps a k-means cluster id to its position in `summaries`.
    by_cluster: Vec<usize>,
}

impl Segmentation {
    /// Returns the cluster summaries in rank order (top persona first).
    #[must_use]
    pub fn summaries(&self) -> &[ClusterSummary] {
        &self.summaries
    }

    /// Returns the fitted scaler used for normalization.
    #[must_use]
    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    /// Returns the underlying k-means model.
    #[must_use]
    pub fn kmeans(&self) -> &KMeansModel {
        &self.model
    }

    /// Assigns a profile to its nearest cluster and returns that cluster's
    /// summary. Normalizes with the stored training statistics first.
    #[must_use]
    pub fn assign(&self, profile: &CognitiveProfile) -> &ClusterSummary {
        let normalized = self
            .scaler
            .transform_row(&profile.as_array())
            .expect("scaler is always fitted on four cognitive features");
        let cluster = self.model.assign_row(&normalized);
        &self.summaries[self.by_cluster[cluster]]
    }
}

/// Persona name and description for a rank, falling back past the catalog.
fn persona_for_rank(rank: usize) -> (String, String) {
    match PERSONA_CATALOG.get(rank) {
        Some(&(name, description)) => (name.to_string(), description.to_string()),
        None => (
            format!("Segment {}", rank + 1),
            "Additional learner segment.".to_string(),
        ),
    }
}

/// Ranks clusters by mean normalized centroid value (descending) and builds
/// the summary list plus the cluster-id-to-rank map.
fn build_summaries(
    records: &[LearnerRecord],
    scaler: &StandardScaler,
    model: &KMeansModel,
) -> Result<(Vec<ClusterSummary>, Vec<usize>)> {
    let k = model.n_clusters();
    let centroids = model.centroids();
    let dims = centroids.n_cols();

    // Rank key: mean of the centroid's dimensions in normalized space
    let mut order: Vec<(usize, f64)> = (0..k)
        .map(|c| {
            let mean = (0..dims).map(|j| centroids.get(c, j)).sum::<f64>() / dims as f64;
            (c, mean)
        })
        .collect();
    order.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut summaries = Vec::with_capacity(k);
    let mut by_cluster = vec![0; k];

    for (rank, &(cluster, _)) in order.iter().enumerate() {
        let members: Vec<&LearnerRecord> = records
            .iter()
            .zip(model.labels().iter())
            .filter(|(_, &label)| label == cluster)
            .map(|(record, _)| record)
            .collect();

        let size = members.len();
        let avg_score = if size == 0 {
            0.0
        } else {
            members.iter().map(|r| r.exam_score).sum::<f64>() / size as f64
        };

        let normalized_centroid: Vec<f64> = (0..dims).map(|j| centroids.get(cluster, j)).collect();
        let original_units = scaler.inverse_transform_row(&normalized_centroid)?;

        let (persona, description) = persona_for_rank(rank);

        summaries.push(ClusterSummary {
            cluster,
            persona,
            description,
            size,
            avg_score,
            centroid: CognitiveProfile::from_array([
                original_units[0],
                original_units[1],
                original_units[2],
                original_units[3],
            ]),
        });
        by_cluster[cluster] = rank;
    }

    Ok((summaries, by_cluster))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::primitives::Matrix;

    fn record(id: &str, level: f64, exam: f64) -> LearnerRecord {
        LearnerRecord::new(
            id,
            "test",
            CognitiveProfile::new(level, level, level, level),
            exam,
            120.0,
        )
    }

    fn two_tier_records() -> Vec<LearnerRecord> {
        vec![
            record("low-1", 18.0, 25.0),
            record("low-2", 22.0, 30.0),
            record("low-3", 20.0, 28.0),
            record("high-1", 78.0, 85.0),
            record("high-2", 82.0, 88.0),
            record("high-3", 80.0, 90.0),
        ]
    }

    #[test]
    fn test_fewer_records_than_clusters_errors() {
        let records = vec![record("a", 50.0, 50.0), record("b", 60.0, 60.0)];
        let result = Segmenter::new().with_clusters(3).fit(&records);
        assert!(matches!(result, Err(EngineError::EmptyDataset { .. })));
    }

    #[test]
    fn test_empty_records_error() {
        let result = Segmenter::new().fit(&[]);
        assert!(matches!(result, Err(EngineError::EmptyDataset { .. })));
    }

    #[test]
    fn test_default_cluster_count() {
        let segmenter = Segmenter::new();
        assert_eq!(segmenter.n_clusters, DEFAULT_CLUSTERS);
    }

    #[test]
    fn test_summaries_are_rank_ordered() {
        for seed in 0..8 {
            let segmentation = Segmenter::new()
                .with_clusters(2)
                .with_random_state(seed)
                .fit(&two_tier_records())
                .expect("fits");

            let summaries = segmentation.summaries();
            assert_eq!(summaries.len(), 2);
            assert_eq!(summaries[0].persona, "High Achievers");
            assert_eq!(summaries[1].persona, "Steady Performers");

            // Rank key is the centroid mean, top persona first
            let mean =
                |s: &ClusterSummary| {
                    let a = s.centroid.as_array();
                    a.iter().sum::<f64>() / a.len() as f64
                };
            assert!(mean(&summaries[0]) >= mean(&summaries[1]));
        }
    }

    #[test]
    fn test_two_tier_split_for_some_seed() {
        let split = (0..16).any(|seed| {
            let segmentation = Segmenter::new()
                .with_clusters(2)
                .with_random_state(seed)
                .fit(&two_tier_records())
                .expect("fits");
            let top = &segmentation.summaries()[0];
            let bottom = &segmentation.summaries()[1];
            top.size == 3
                && bottom.size == 3
                && (top.avg_score - 87.666_666_666_666_67).abs() < 1e-6
                && (bottom.avg_score - 27.666_666_666_666_668).abs() < 1e-6
        });
        assert!(split, "no seed in 0..16 produced the clean two-tier split");
    }

    #[test]
    fn test_assign_returns_nearest_summary() {
        for seed in 0..4 {
            let segmentation = Segmenter::new()
                .with_clusters(2)
                .with_random_state(seed)
                .fit(&two_tier_records())
                .expect("fits");

            let profile = CognitiveProfile::new(79.0, 81.0, 80.0, 80.0);
            let summary = segmentation.assign(&profile);
            let normalized = segmentation
                .scaler()
                .transform_row(&profile.as_array())
                .expect("four features");
            assert_eq!(summary.cluster, segmentation.kmeans().assign_row(&normalized));
        }
    }

    #[test]
    fn test_persona_follows_rank_not_cluster_id() {
        // Cluster 0 is the low centroid, cluster 1 the high one; the top
        // persona must land on cluster 1.
        let records = two_tier_records();
        let features = cognitive_matrix(&records).expect("non-empty");
        let scaler = StandardScaler::fit(&features).expect("non-empty");
        let centroids = Matrix::from_vec(
            2,
            4,
            vec![-1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0],
        )
        .expect("valid");
        let model = KMeansModel::from_parts(centroids, vec![0, 0, 0, 1, 1, 1]);

        let (summaries, by_cluster) =
            build_summaries(&records, &scaler, &model).expect("summaries");

        assert_eq!(summaries[0].persona, "High Achievers");
        assert_eq!(summaries[0].cluster, 1);
        assert_eq!(summaries[1].cluster, 0);
        assert_eq!(by_cluster[1], 0);
        assert_eq!(by_cluster[0], 1);
        assert!((summaries[0].avg_score - 87.666_666_666_666_67).abs() < 1e-9);
    }

    #[test]
    fn test_empty_cluster_summary() {
        let records = two_tier_records();
        let features = cognitive_matrix(&records).expect("non-empty");
        let scaler = StandardScaler::fit(&features).expect("non-empty");
        let centroids = Matrix::from_vec(
            2,
            4,
            vec![0.0, 0.0, 0.0, 0.0, 5.0, 5.0, 5.0, 5.0],
        )
        .expect("valid");
        // Nobody assigned to cluster 1
        let model = KMeansModel::from_parts(centroids, vec![0; 6]);

        let (summaries, _) = build_summaries(&records, &scaler, &model).expect("summaries");
        let empty = summaries
            .iter()
            .find(|s| s.cluster == 1)
            .expect("cluster 1 present");
        assert_eq!(empty.size, 0);
        assert!((empty.avg_score - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_persona_catalog_fallback_past_four() {
        let (name, description) = persona_for_rank(4);
        assert_eq!(name, "Segment 5");
        assert!(!description.is_empty());

        let (top, _) = persona_for_rank(0);
        assert_eq!(top, "High Achievers");
    }

    #[test]
    fn test_centroid_scaled_back_to_original_units() {
        // Singleton clusters put centroids exactly on the input points.
        let split = (0..32).any(|seed| {
            let records = vec![record("low", 10.0, 10.0), record("high", 90.0, 90.0)];
            let segmentation = Segmenter::new()
                .with_clusters(2)
                .with_random_state(seed)
                .fit(&records)
                .expect("fits");
            let top = &segmentation.summaries()[0];
            let bottom = &segmentation.summaries()[1];
            top.size == 1
                && bottom.size == 1
                && (top.centroid.comprehension - 90.0).abs() < 5.0
                && (bottom.centroid.comprehension - 10.0).abs() < 5.0
                && (top.avg_score - 90.0).abs() < 1e-9
                && (bottom.avg_score - 10.0).abs() < 1e-9
        });
        assert!(split, "no seed in 0..32 picked two distinct initial centroids");
    }

    #[test]
    fn test_segmentation_serde_round_trip() {
        let segmentation = Segmenter::new()
            .with_clusters(2)
            .with_random_state(42)
            .fit(&two_tier_records())
            .expect("fits");
        let json = serde_json::to_string(&segmentation).expect("serialize");
        let back: Segmentation = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(segmentation.summaries(), back.summaries());
    }
}
