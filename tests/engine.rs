//! End-to-end tests for the prediction and segmentation pipelines.

use pronostico::prelude::*;

const C: [f64; 8] = [5.0, 12.0, 8.0, 15.0, 3.0, 10.0, 7.0, 14.0];
const R: [f64; 8] = [7.0, 3.0, 12.0, 9.0, 15.0, 5.0, 11.0, 6.0];
const F: [f64; 8] = [30.0, 10.0, 50.0, 20.0, 40.0, 60.0, 25.0, 35.0];
const P: [f64; 8] = [40.0, 70.0, 20.0, 55.0, 35.0, 15.0, 65.0, 45.0];
const E: [f64; 8] = [100.0, 150.0, 90.0, 200.0, 120.0, 60.0, 180.0, 140.0];

/// Records whose exam score is exactly 1 + 2*comprehension + 3*retention.
fn linear_records() -> Vec<LearnerRecord> {
    (0..8)
        .map(|i| {
            LearnerRecord::new(
                format!("s-{i}"),
                "cohort-a",
                CognitiveProfile::new(C[i], R[i], F[i], P[i]),
                1.0 + 2.0 * C[i] + 3.0 * R[i],
                E[i],
            )
        })
        .collect()
}

#[test]
fn test_regression_recovers_planted_coefficients() {
    let model = ScorePredictor::new()
        .fit(&linear_records())
        .expect("full-rank design");

    assert!((model.intercept() - 1.0).abs() < 1e-6);
    assert!((model.coefficient("comprehension").unwrap() - 2.0).abs() < 1e-6);
    assert!((model.coefficient("retention").unwrap() - 3.0).abs() < 1e-6);
    assert!(model.coefficient("focus").unwrap().abs() < 1e-6);
    assert!(model.coefficient("problem_solving").unwrap().abs() < 1e-6);
    assert!(model.coefficient("engagement").unwrap().abs() < 1e-6);
}

#[test]
fn test_regression_perfect_fit_has_unit_r_squared() {
    let records = linear_records();
    let model = ScorePredictor::new().fit(&records).expect("full-rank design");
    assert!((model.score(&records) - 1.0).abs() < 1e-9);

    let predicted = Vector::from_vec(
        records
            .iter()
            .map(|r| model.predict(&r.profile, r.engagement_minutes).score)
            .collect(),
    );
    let actual = Vector::from_vec(records.iter().map(|r| r.exam_score).collect());
    assert!(mse(&predicted, &actual) < 1e-12);
    assert!(rmse(&predicted, &actual) < 1e-6);
}

#[test]
fn test_prediction_output_contract() {
    let model = ScorePredictor::new()
        .fit(&linear_records())
        .expect("full-rank design");

    for profile in [
        CognitiveProfile::new(0.0, 0.0, 0.0, 0.0),
        CognitiveProfile::new(100.0, 100.0, 100.0, 100.0),
        CognitiveProfile::new(-500.0, 900.0, 50.0, 50.0),
    ] {
        let prediction = model.predict(&profile, 150.0);
        assert!((0.0..=100.0).contains(&prediction.score));
        assert!((0.6..=0.95).contains(&prediction.confidence));

        let total: f64 = prediction.feature_importance.values().sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(prediction.feature_importance.len(), FEATURE_NAMES.len());
    }
}

#[test]
fn test_engagement_signal_scaled_by_divisor() {
    // exam = minutes / 2 = (minutes / 100) * 50, so the fitted coefficient
    // on the scaled engagement regressor is 50.
    let records: Vec<LearnerRecord> = (0..8)
        .map(|i| {
            LearnerRecord::new(
                format!("s-{i}"),
                "cohort-a",
                CognitiveProfile::new(C[i], R[i], F[i], P[i]),
                E[i] / 2.0,
                E[i],
            )
        })
        .collect();

    let model = ScorePredictor::new().fit(&records).expect("full-rank design");
    assert!((model.coefficient("engagement").unwrap() - 50.0).abs() < 1e-6);
}

#[test]
fn test_regression_empty_records_error() {
    let result = ScorePredictor::new().fit(&[]);
    assert!(matches!(result, Err(EngineError::EmptyDataset { .. })));
}

#[test]
fn test_regression_degenerate_design_error() {
    // Eight copies of one row cannot identify six coefficients.
    let records: Vec<LearnerRecord> = (0..8)
        .map(|i| {
            LearnerRecord::new(
                format!("s-{i}"),
                "cohort-a",
                CognitiveProfile::new(50.0, 60.0, 70.0, 80.0),
                75.0,
                120.0,
            )
        })
        .collect();

    let result = ScorePredictor::new().fit(&records);
    assert!(matches!(result, Err(EngineError::SingularMatrix { .. })));
}

#[test]
fn test_segmentation_two_tier_cohort() {
    // Two learners at opposite ends; for some seed the init picks both
    // points and each becomes a singleton cluster sitting exactly on it.
    let records = vec![
        LearnerRecord::new(
            "low",
            "cohort-a",
            CognitiveProfile::new(10.0, 10.0, 10.0, 10.0),
            10.0,
            60.0,
        ),
        LearnerRecord::new(
            "high",
            "cohort-a",
            CognitiveProfile::new(90.0, 90.0, 90.0, 90.0),
            90.0,
            240.0,
        ),
    ];

    let split = (0..32).any(|seed| {
        let segmentation = Segmenter::new()
            .with_clusters(2)
            .with_random_state(seed)
            .fit(&records)
            .expect("fits");
        let top = &segmentation.summaries()[0];
        let bottom = &segmentation.summaries()[1];

        top.persona == "High Achievers"
            && bottom.persona == "Steady Performers"
            && top.size == 1
            && bottom.size == 1
            && (top.centroid.comprehension - 90.0).abs() < 5.0
            && (top.centroid.problem_solving - 90.0).abs() < 5.0
            && (bottom.centroid.comprehension - 10.0).abs() < 5.0
            && (top.avg_score - 90.0).abs() < 1e-9
            && (bottom.avg_score - 10.0).abs() < 1e-9
    });
    assert!(split, "no seed in 0..32 produced two singleton clusters");
}

#[test]
fn test_segmentation_rank_order_invariant() {
    let records = linear_records();

    for seed in 0..8 {
        let segmentation = Segmenter::new()
            .with_clusters(3)
            .with_random_state(seed)
            .fit(&records)
            .expect("fits");

        let summaries = segmentation.summaries();
        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].persona, "High Achievers");
        assert_eq!(summaries[1].persona, "Steady Performers");
        assert_eq!(summaries[2].persona, "Developing Learners");

        let sizes: usize = summaries.iter().map(|s| s.size).sum();
        assert_eq!(sizes, records.len());

        // Ranking is by centroid mean in normalized space
        let normalized_mean = |s: &ClusterSummary| {
            let z = segmentation
                .scaler()
                .transform_row(&s.centroid.as_array())
                .expect("four features");
            z.iter().sum::<f64>() / z.len() as f64
        };
        for pair in summaries.windows(2) {
            assert!(normalized_mean(&pair[0]) >= normalized_mean(&pair[1]) - 1e-9);
        }
    }
}

#[test]
fn test_segmentation_assign_consistent_with_training() {
    let records = linear_records();
    let segmentation = Segmenter::new()
        .with_clusters(2)
        .with_random_state(11)
        .fit(&records)
        .expect("fits");

    // Every training record lands in the cluster its label says.
    for (record, &label) in records.iter().zip(segmentation.kmeans().labels()) {
        let summary = segmentation.assign(&record.profile);
        assert_eq!(summary.cluster, label);
    }
}

#[test]
fn test_segmentation_fewer_records_than_clusters() {
    let records = linear_records();
    let result = Segmenter::new().with_clusters(9).fit(&records);
    assert!(matches!(result, Err(EngineError::EmptyDataset { .. })));
}

#[test]
fn test_pearson_tracks_planted_signal() {
    let records = linear_records();
    let retention = Vector::from_vec(records.iter().map(|r| r.profile.retention).collect());
    let exam = Vector::from_vec(records.iter().map(|r| r.exam_score).collect());

    // Retention carries the largest coefficient, so it correlates positively.
    assert!(pearson(&retention, &exam) > 0.0);
    assert!((pearson(&exam, &exam) - 1.0).abs() < 1e-12);
}

#[test]
fn test_models_survive_serde_round_trip() {
    let records = linear_records();

    let model = ScorePredictor::new().fit(&records).expect("full-rank design");
    let json = serde_json::to_string(&model).expect("serialize");
    let back: ScoreModel = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(model, back);

    let segmentation = Segmenter::new()
        .with_clusters(2)
        .with_random_state(42)
        .fit(&records)
        .expect("fits");
    let json = serde_json::to_string(&segmentation).expect("serialize");
    let back: Segmentation = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(segmentation.summaries(), back.summaries());

    let profile = CognitiveProfile::new(50.0, 50.0, 50.0, 50.0);
    assert_eq!(
        segmentation.assign(&profile).cluster,
        back.assign(&profile).cluster
    );
}
