//! Patient feature definitions and the validated feature vector.
//!
//! The order of [`FEATURE_ORDER`] is the column order the scaler and classifier
//! were fitted with. Artefacts carry their own column list and are rejected at
//! load time if it differs.

use std::fmt;

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 8;

/// One of the eight patient measurements accepted by the model.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Feature {
    Pregnancies,
    Glucose,
    BloodPressure,
    SkinThickness,
    Insulin,
    Bmi,
    DiabetesPedigreeFunction,
    Age,
}

/// Training-time column order.
pub const FEATURE_ORDER: [Feature; FEATURE_COUNT] = [
    Feature::Pregnancies,
    Feature::Glucose,
    Feature::BloodPressure,
    Feature::SkinThickness,
    Feature::Insulin,
    Feature::Bmi,
    Feature::DiabetesPedigreeFunction,
    Feature::Age,
];

/// Closed interval `[min, max]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Feature {
    /// Field name used by both front ends.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Pregnancies => "pregnancies",
            Feature::Glucose => "glucose",
            Feature::BloodPressure => "blood_pressure",
            Feature::SkinThickness => "skin_thickness",
            Feature::Insulin => "insulin",
            Feature::Bmi => "bmi",
            Feature::DiabetesPedigreeFunction => "diabetes_pedigree_function",
            Feature::Age => "age",
        }
    }

    /// Column name the artefacts were fitted with.
    pub fn column(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Pregnancies",
            Feature::Glucose => "Glucose",
            Feature::BloodPressure => "BloodPressure",
            Feature::SkinThickness => "SkinThickness",
            Feature::Insulin => "Insulin",
            Feature::Bmi => "BMI",
            Feature::DiabetesPedigreeFunction => "DiabetesPedigreeFunction",
            Feature::Age => "Age",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Pregnancies",
            Feature::Glucose => "Glucose",
            Feature::BloodPressure => "Blood Pressure",
            Feature::SkinThickness => "Skin Thickness",
            Feature::Insulin => "Insulin",
            Feature::Bmi => "BMI",
            Feature::DiabetesPedigreeFunction => "Diabetes Pedigree Function",
            Feature::Age => "Age",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Feature::Pregnancies => "Number of pregnancies",
            Feature::Glucose => "Plasma glucose concentration",
            Feature::BloodPressure => "Diastolic blood pressure (mm Hg)",
            Feature::SkinThickness => "Triceps skin fold thickness (mm)",
            Feature::Insulin => "2-Hour serum insulin (mu U/ml)",
            Feature::Bmi => "Body mass index (weight in kg/(height in m)^2)",
            Feature::DiabetesPedigreeFunction => "Diabetes pedigree function",
            Feature::Age => "Age (years)",
        }
    }

    /// Accepted inclusive range.
    pub fn range(self) -> FeatureRange {
        match self {
            Feature::Pregnancies => FeatureRange::new(0.0, 17.0),
            Feature::Glucose => FeatureRange::new(44.0, 199.0),
            Feature::BloodPressure => FeatureRange::new(24.0, 122.0),
            Feature::SkinThickness => FeatureRange::new(7.0, 99.0),
            Feature::Insulin => FeatureRange::new(14.0, 846.0),
            Feature::Bmi => FeatureRange::new(18.2, 67.1),
            Feature::DiabetesPedigreeFunction => FeatureRange::new(0.078, 2.42),
            Feature::Age => FeatureRange::new(21.0, 81.0),
        }
    }

    /// Starting value of the UI control, also the documented example input.
    pub fn default_value(self) -> f64 {
        match self {
            Feature::Pregnancies => 3.0,
            Feature::Glucose => 117.0,
            Feature::BloodPressure => 72.0,
            Feature::SkinThickness => 29.0,
            Feature::Insulin => 125.0,
            Feature::Bmi => 32.3,
            Feature::DiabetesPedigreeFunction => 0.3725,
            Feature::Age => 29.0,
        }
    }

    /// Whether the measurement is a whole number in practice.
    pub fn is_integral(self) -> bool {
        !matches!(self, Feature::Bmi | Feature::DiabetesPedigreeFunction)
    }

    /// Position in [`FEATURE_ORDER`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column names in training order, as artefacts must list them.
pub fn training_columns() -> [&'static str; FEATURE_COUNT] {
    FEATURE_ORDER.map(Feature::column)
}

/// A complete, range-checked patient record.
///
/// Only produced by the validator in [`crate::data::service`], so holding one
/// means every field is present and inside its range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub(crate) fn from_checked(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Values in training column order.
    pub fn ordered(&self) -> [f64; FEATURE_COUNT] {
        self.values
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    /// The documented example patient (every field at its UI default).
    pub fn example() -> Self {
        Self::from_checked(FEATURE_ORDER.map(Feature::default_value))
    }
}
