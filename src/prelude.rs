//! Convenience re-exports for common usage.
//!
//! ```
//! use pronostico::prelude::*;
//! ```

pub use crate::cluster::{KMeans, KMeansModel, DEFAULT_CLUSTERS, DEFAULT_MAX_ITER};
pub use crate::error::{EngineError, Result};
pub use crate::metrics::{inertia, mae, mse, pearson, r_squared, rmse};
pub use crate::persona::{ClusterSummary, Segmentation, Segmenter, PERSONA_CATALOG};
pub use crate::preprocessing::StandardScaler;
pub use crate::primitives::{Matrix, Vector};
pub use crate::record::{
    cognitive_matrix, CognitiveProfile, LearnerRecord, COGNITIVE_DIMENSIONS, FEATURE_NAMES,
};
pub use crate::regression::{Prediction, ScoreModel, ScorePredictor, ENGAGEMENT_DIVISOR};
pub use crate::traits::{Estimator, UnsupervisedEstimator};
