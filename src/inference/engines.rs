//! Concrete classifiers backed by the fitted artefacts.

use crate::artefact::domain::{FittedClassifier, LogisticModel, TreeEnsemble};
use crate::common::error::DiabResult;
use crate::data::domain::FEATURE_COUNT;

use super::domain::{ClassProbabilities, Classifier};

/// Logistic function, evaluated without overflow for large |margin|.
pub fn sigmoid(margin: f64) -> f64 {
    if margin >= 0.0 {
        1.0 / (1.0 + (-margin).exp())
    } else {
        let e = margin.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticModel {
    fn kind(&self) -> &'static str {
        "logistic"
    }

    fn predict_proba(&self, scaled: &[f64; FEATURE_COUNT]) -> DiabResult<ClassProbabilities> {
        let margin = self
            .coefficients
            .iter()
            .zip(scaled)
            .fold(self.intercept, |acc, (w, x)| acc + w * x);
        Ok(ClassProbabilities::from_positive(sigmoid(margin)))
    }
}

impl Classifier for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "gradient_boosting"
    }

    fn predict_proba(&self, scaled: &[f64; FEATURE_COUNT]) -> DiabResult<ClassProbabilities> {
        let margin = self
            .trees
            .iter()
            .fold(self.base_margin, |acc, tree| acc + tree.leaf_value(scaled));
        Ok(ClassProbabilities::from_positive(sigmoid(margin)))
    }
}

/// Box the fitted classifier behind the [`Classifier`] seam.
pub fn engine_for(classifier: FittedClassifier) -> Box<dyn Classifier> {
    match classifier {
        FittedClassifier::Logistic(model) => Box::new(model),
        FittedClassifier::GradientBoosting(ensemble) => Box::new(ensemble),
    }
}
