//! Domain definitions for predictions and the classifier seam.

use crate::common::error::{DiabError, DiabResult};
use crate::data::domain::FEATURE_COUNT;

/// Tolerance for `negative + positive == 1`.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Hard class decision.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Label {
    Negative = 0,
    Positive = 1,
}

impl Label {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_positive(self) -> bool {
        self == Label::Positive
    }
}

/// Per-class probabilities for one record.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClassProbabilities {
    pub negative: f64,
    pub positive: f64,
}

impl ClassProbabilities {
    pub fn from_positive(positive: f64) -> Self {
        Self {
            negative: 1.0 - positive,
            positive,
        }
    }

    /// Class with the higher probability; ties go to the negative class.
    pub fn argmax(&self) -> Label {
        if self.positive > self.negative {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Reject anything that is not a probability distribution over two classes.
    pub fn check(&self) -> DiabResult<()> {
        for (name, p) in [("negative", self.negative), ("positive", self.positive)] {
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(DiabError::inference(format!(
                    "classifier returned {p} for the {name} class"
                )));
            }
        }
        let sum = self.negative + self.positive;
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(DiabError::inference(format!(
                "class probabilities sum to {sum}"
            )));
        }
        Ok(())
    }
}

/// Result of running one feature vector through the pipeline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Prediction {
    pub label: Label,
    pub probabilities: ClassProbabilities,
}

impl Prediction {
    /// Probability of the class that was predicted.
    pub fn confidence(&self) -> f64 {
        match self.label {
            Label::Positive => self.probabilities.positive,
            Label::Negative => self.probabilities.negative,
        }
    }
}

/// A fitted binary classifier over scaled features.
///
/// Implementations must be pure: the same input always yields the same output
/// and nothing is mutated, so one instance can serve concurrent requests.
pub trait Classifier: Send + Sync {
    fn kind(&self) -> &'static str;

    fn predict_proba(&self, scaled: &[f64; FEATURE_COUNT]) -> DiabResult<ClassProbabilities>;

    /// Hard label. Defaults to the more probable class.
    fn predict(&self, scaled: &[f64; FEATURE_COUNT]) -> DiabResult<Label> {
        Ok(self.predict_proba(scaled)?.argmax())
    }
}
