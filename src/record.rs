//! Learner record data model.
//!
//! Records are fixed-shape immutable inputs; the engine never mutates them.
//! Range validation ([0,100] for scores, [30,300] typical for engagement) is
//! the ingestion layer's responsibility.

use crate::error::{EngineError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Number of cognitive feature dimensions used for clustering.
pub const COGNITIVE_DIMENSIONS: usize = 4;

/// Feature names in regression coefficient order.
pub const FEATURE_NAMES: [&str; 5] = [
    "comprehension",
    "retention",
    "focus",
    "problem_solving",
    "engagement",
];

/// The four cognitive feature scalars of a learner, each in [0,100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CognitiveProfile {
    /// Reading and concept comprehension.
    pub comprehension: f64,
    /// Knowledge retention over time.
    pub retention: f64,
    /// Sustained attention.
    pub focus: f64,
    /// Multi-step problem solving.
    pub problem_solving: f64,
}

impl CognitiveProfile {
    /// Creates a profile from the four cognitive scores.
    #[must_use]
    pub fn new(comprehension: f64, retention: f64, focus: f64, problem_solving: f64) -> Self {
        Self {
            comprehension,
            retention,
            focus,
            problem_solving,
        }
    }

    /// Returns the profile as an array in [`FEATURE_NAMES`] order
    /// (engagement excluded).
    #[must_use]
    pub fn as_array(&self) -> [f64; COGNITIVE_DIMENSIONS] {
        [
            self.comprehension,
            self.retention,
            self.focus,
            self.problem_solving,
        ]
    }

    /// Builds a profile from an array in [`FEATURE_NAMES`] order.
    #[must_use]
    pub fn from_array(values: [f64; COGNITIVE_DIMENSIONS]) -> Self {
        Self {
            comprehension: values[0],
            retention: values[1],
            focus: values[2],
            problem_solving: values[3],
        }
    }
}

/// A single learner observation: identifier, cohort label, cognitive
/// profile, outcome score, and engagement minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerRecord {
    /// Unique learner identifier.
    pub id: String,
    /// Group label (class, course, or cohort).
    pub cohort: String,
    /// The four cognitive feature scalars.
    pub profile: CognitiveProfile,
    /// Continuous outcome in [0,100].
    pub exam_score: f64,
    /// Auxiliary engagement scalar, typically [30,300] minutes.
    pub engagement_minutes: f64,
}

impl LearnerRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        cohort: impl Into<String>,
        profile: CognitiveProfile,
        exam_score: f64,
        engagement_minutes: f64,
    ) -> Self {
        Self {
            id: id.into(),
            cohort: cohort.into(),
            profile,
            exam_score,
            engagement_minutes,
        }
    }
}

/// Stacks the cognitive profiles of `records` into an n x 4 matrix.
///
/// # Errors
///
/// Returns [`EngineError::EmptyDataset`] if `records` is empty.
pub fn cognitive_matrix(records: &[LearnerRecord]) -> Result<Matrix<f64>> {
    if records.is_empty() {
        return Err(EngineError::empty_dataset("no records to stack"));
    }

    let mut data = Vec::with_capacity(records.len() * COGNITIVE_DIMENSIONS);
    for record in records {
        data.extend_from_slice(&record.profile.as_array());
    }

    Matrix::from_vec(records.len(), COGNITIVE_DIMENSIONS, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> LearnerRecord {
        LearnerRecord::new(
            "s-001",
            "cohort-a",
            CognitiveProfile::new(70.0, 65.0, 80.0, 75.0),
            72.0,
            140.0,
        )
    }

    #[test]
    fn test_profile_array_round_trip() {
        let profile = CognitiveProfile::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(CognitiveProfile::from_array(profile.as_array()), profile);
    }

    #[test]
    fn test_cognitive_matrix_shape() {
        let records = vec![sample_record(), sample_record()];
        let m = cognitive_matrix(&records).expect("non-empty records");
        assert_eq!(m.shape(), (2, COGNITIVE_DIMENSIONS));
        assert!((m.get(0, 0) - 70.0).abs() < 1e-12);
        assert!((m.get(1, 3) - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_cognitive_matrix_empty() {
        let result = cognitive_matrix(&[]);
        assert!(matches!(
            result,
            Err(crate::error::EngineError::EmptyDataset { .. })
        ));
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = sample_record();
        let json = serde_json::to_string(&record).expect("serialize");
        let back: LearnerRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(record, back);
    }
}
