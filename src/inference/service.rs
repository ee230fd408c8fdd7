//! The inference pipeline: scale, classify, package.

use std::time::Instant;

use crate::artefact::domain::{ArtefactSet, FittedScaler};
use crate::common::error::{DiabError, DiabResult};
use crate::data::domain::{FeatureVector, FEATURE_ORDER};

use super::domain::{Classifier, Prediction};
use super::engines::engine_for;

/// Scaler plus classifier, shared read-only by every request.
pub struct Pipeline {
    scaler: FittedScaler,
    classifier: Box<dyn Classifier>,
}

impl Pipeline {
    pub fn new(scaler: FittedScaler, classifier: Box<dyn Classifier>) -> Self {
        Self { scaler, classifier }
    }

    pub fn from_artefacts(artefacts: ArtefactSet) -> Self {
        Self::new(artefacts.scaler, engine_for(artefacts.classifier))
    }

    pub fn scaler_kind(&self) -> &'static str {
        self.scaler.kind()
    }

    pub fn classifier_kind(&self) -> &'static str {
        self.classifier.kind()
    }

    /// Run a single validated record through the scaler and classifier.
    pub fn predict(&self, features: &FeatureVector) -> DiabResult<Prediction> {
        let start = Instant::now();

        let scaled = self.scaler.transform(&features.ordered());
        if let Some(idx) = scaled.iter().position(|v| !v.is_finite()) {
            return Err(DiabError::inference(format!(
                "scaled {} is not finite",
                FEATURE_ORDER[idx]
            )));
        }

        let label = self.classifier.predict(&scaled)?;
        let probabilities = self.classifier.predict_proba(&scaled)?;
        probabilities.check()?;

        tracing::debug!(
            label = label.as_u8(),
            probability = probabilities.positive,
            dur_ms = start.elapsed().as_secs_f64() * 1000.0,
            "prediction"
        );
        Ok(Prediction {
            label,
            probabilities,
        })
    }

    /// Predict every record in order. All or nothing: the first failure aborts
    /// the batch and names the failing record's index.
    pub fn predict_batch(&self, batch: &[FeatureVector]) -> DiabResult<Vec<Prediction>> {
        batch
            .iter()
            .enumerate()
            .map(|(index, features)| {
                self.predict(features).map_err(|err| DiabError::BatchRecord {
                    index,
                    source: Box::new(err),
                })
            })
            .collect::<DiabResult<Vec<_>>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::domain::{FittedClassifier, LogisticModel};
    use crate::common::error::DiabCode;
    use crate::data::domain::{Feature, FEATURE_COUNT};
    use crate::data::service::validate_values;
    use crate::inference::domain::{ClassProbabilities, Label, PROBABILITY_SUM_TOLERANCE};

    fn identity_scaler() -> FittedScaler {
        FittedScaler::Standard {
            mean: [0.0; FEATURE_COUNT],
            scale: [1.0; FEATURE_COUNT],
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::from_artefacts(ArtefactSet {
            scaler: FittedScaler::Standard {
                mean: [3.8, 121.7, 72.4, 29.2, 140.7, 32.5, 0.47, 33.2],
                scale: [3.4, 30.4, 12.1, 8.8, 86.4, 6.9, 0.33, 11.8],
            },
            classifier: FittedClassifier::Logistic(LogisticModel {
                coefficients: [0.39, 1.12, -0.05, 0.05, -0.07, 0.68, 0.30, 0.17],
                intercept: -0.86,
            }),
        })
    }

    fn record(glucose: f64, bmi: f64) -> FeatureVector {
        let mut values = FeatureVector::example().ordered();
        values[Feature::Glucose.index()] = glucose;
        values[Feature::Bmi.index()] = bmi;
        validate_values(values).unwrap()
    }

    /// Fails on any record whose raw glucose is 150 (identity scaler).
    struct FailsOnGlucose150;

    impl Classifier for FailsOnGlucose150 {
        fn kind(&self) -> &'static str {
            "test"
        }

        fn predict_proba(&self, scaled: &[f64; FEATURE_COUNT]) -> DiabResult<ClassProbabilities> {
            if scaled[Feature::Glucose.index()] == 150.0 {
                return Err(DiabError::inference("shape mismatch"));
            }
            Ok(ClassProbabilities::from_positive(0.4))
        }
    }

    /// Returns probabilities that do not form a distribution.
    struct Broken;

    impl Classifier for Broken {
        fn kind(&self) -> &'static str {
            "broken"
        }

        fn predict_proba(&self, _: &[f64; FEATURE_COUNT]) -> DiabResult<ClassProbabilities> {
            Ok(ClassProbabilities {
                negative: f64::NAN,
                positive: 0.5,
            })
        }
    }

    #[test]
    fn example_yields_a_consistent_prediction() {
        let prediction = pipeline().predict(&FeatureVector::example()).unwrap();
        let p = prediction.probabilities;

        assert!((0.0..=1.0).contains(&p.positive));
        assert!((0.0..=1.0).contains(&p.negative));
        assert!((p.positive + p.negative - 1.0).abs() < PROBABILITY_SUM_TOLERANCE);
        assert_eq!(prediction.label, p.argmax());
        assert_eq!(prediction.label, Label::Negative);
    }

    #[test]
    fn extreme_record_is_positive() {
        let values = [17.0, 199.0, 122.0, 99.0, 846.0, 67.1, 2.42, 81.0];
        let prediction = pipeline().predict(&validate_values(values).unwrap()).unwrap();
        assert_eq!(prediction.label, Label::Positive);
        assert!(prediction.probabilities.positive > 0.99);
    }

    #[test]
    fn batch_matches_single_predictions_bit_for_bit() {
        let pipeline = pipeline();
        let batch = vec![record(90.0, 22.0), record(160.0, 41.0), FeatureVector::example()];

        let batched = pipeline.predict_batch(&batch).unwrap();
        assert_eq!(batched.len(), batch.len());
        for (features, from_batch) in batch.iter().zip(&batched) {
            let single = pipeline.predict(features).unwrap();
            assert_eq!(single.label, from_batch.label);
            assert_eq!(
                single.probabilities.positive.to_bits(),
                from_batch.probabilities.positive.to_bits()
            );
            assert_eq!(
                single.probabilities.negative.to_bits(),
                from_batch.probabilities.negative.to_bits()
            );
        }
    }

    #[test]
    fn empty_batch_is_empty() {
        assert!(pipeline().predict_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn one_failing_record_aborts_the_whole_batch() {
        let pipeline = Pipeline::new(identity_scaler(), Box::new(FailsOnGlucose150));
        let batch = vec![record(100.0, 30.0), record(150.0, 30.0), record(120.0, 30.0)];

        let err = pipeline.predict_batch(&batch).unwrap_err();
        assert!(matches!(err, DiabError::BatchRecord { index: 1, .. }));
        assert_eq!(err.code(), DiabCode::Inference);
        assert_eq!(err.to_string(), "record 1: shape mismatch");
    }

    #[test]
    fn invalid_probabilities_are_inference_failures() {
        let pipeline = Pipeline::new(identity_scaler(), Box::new(Broken));
        let err = pipeline.predict(&FeatureVector::example()).unwrap_err();
        assert_eq!(err.code(), DiabCode::Inference);
    }

    #[test]
    fn kinds_are_reported() {
        let pipeline = pipeline();
        assert_eq!(pipeline.scaler_kind(), "standard");
        assert_eq!(pipeline.classifier_kind(), "logistic");
    }
}
