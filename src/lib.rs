//! # pronostico
//!
//! An in-process predictive analytics engine for learner outcomes: score
//! prediction via linear regression, learner segmentation via k-means over
//! standardized cognitive features, and persona labeling of the resulting
//! clusters. No network, no external runtime; models are plain serializable
//! values.
//!
//! All estimators follow the same pattern: a configuration value with
//! builder-style `with_*` methods, a `fit` that borrows the training data
//! and returns an immutable fitted model, and prediction methods on the
//! fitted model. A model cannot exist untrained.
//!
//! ## Quick start
//!
//! ```
//! use pronostico::prelude::*;
//!
//! const C: [f64; 8] = [5.0, 12.0, 8.0, 15.0, 3.0, 10.0, 7.0, 14.0];
//! const R: [f64; 8] = [7.0, 3.0, 12.0, 9.0, 15.0, 5.0, 11.0, 6.0];
//! const F: [f64; 8] = [30.0, 10.0, 50.0, 20.0, 40.0, 60.0, 25.0, 35.0];
//! const P: [f64; 8] = [40.0, 70.0, 20.0, 55.0, 35.0, 15.0, 65.0, 45.0];
//! const E: [f64; 8] = [100.0, 150.0, 90.0, 200.0, 120.0, 60.0, 180.0, 140.0];
//!
//! let records: Vec<LearnerRecord> = (0..8)
//!     .map(|i| {
//!         LearnerRecord::new(
//!             format!("s-{i}"),
//!             "cohort-a",
//!             CognitiveProfile::new(C[i], R[i], F[i], P[i]),
//!             2.0 * C[i] + 3.0 * R[i] + 1.0,
//!             E[i],
//!         )
//!     })
//!     .collect();
//!
//! // Score prediction
//! let model = ScorePredictor::new().fit(&records).unwrap();
//! assert!((model.coefficient("comprehension").unwrap() - 2.0).abs() < 1e-6);
//!
//! let prediction = model.predict(&CognitiveProfile::new(10.0, 10.0, 40.0, 40.0), 120.0);
//! assert!((0.0..=100.0).contains(&prediction.score));
//! assert!((0.6..=0.95).contains(&prediction.confidence));
//!
//! // Persona-labeled segmentation
//! let segmentation = Segmenter::new()
//!     .with_clusters(2)
//!     .with_random_state(42)
//!     .fit(&records)
//!     .unwrap();
//! assert_eq!(segmentation.summaries()[0].persona, "High Achievers");
//! ```
//!
//! ## Modules
//!
//! - [`primitives`]: dense row-major [`primitives::Matrix`] and
//!   [`primitives::Vector`], with Gauss-Jordan inversion
//! - [`regression`]: [`regression::ScorePredictor`] fitting via the normal
//!   equations
//! - [`preprocessing`]: [`preprocessing::StandardScaler`] z-score normalizer
//! - [`cluster`]: [`cluster::KMeans`] (Lloyd's algorithm)
//! - [`persona`]: [`persona::Segmenter`] mapping ranked clusters to ordered
//!   persona labels
//! - [`metrics`]: R², MSE, MAE, RMSE, Pearson correlation, inertia

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cluster;
pub mod error;
pub mod metrics;
pub mod persona;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod record;
pub mod regression;
pub mod traits;

pub use error::{EngineError, Result};
