//! Fitted artefacts produced by the offline training process.
//!
//! Artefacts are decoded into the loose `*Artefact` shapes first, then checked
//! and converted into fixed-width fitted types. Anything that would make
//! inference silently wrong (column order, vector lengths, non-finite
//! parameters, malformed trees) is rejected here, before a request is served.

use serde::Deserialize;

use crate::common::error::{DiabError, DiabResult};
use crate::data::domain::{training_columns, FEATURE_COUNT};

/// Supported classifier families.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ModelKind {
    Logistic,
    GradientBoosting,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Logistic => "logistic",
            ModelKind::GradientBoosting => "gradient_boosting",
        }
    }
}

/// Scaler file contents, as written by the training job.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerArtefact {
    Standard {
        feature_names: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    MinMax {
        feature_names: Vec<String>,
        min: Vec<f64>,
        scale: Vec<f64>,
    },
}

/// Classifier file contents, as written by the training job.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtefact {
    Logistic {
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
    GradientBoosting {
        feature_names: Vec<String>,
        #[serde(default = "default_base_score")]
        base_score: f64,
        trees: Vec<TreeArtefact>,
    },
}

fn default_base_score() -> f64 {
    0.5
}

#[derive(Clone, Debug, Deserialize)]
pub struct TreeArtefact {
    pub nodes: Vec<TreeNode>,
}

/// Tree node. Splits send `x[feature] < threshold` to `left`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f64,
    },
}

/// A scaler whose parameters have been checked against the feature contract.
#[derive(Clone, Debug, PartialEq)]
pub enum FittedScaler {
    /// `(x - mean) / scale`
    Standard {
        mean: [f64; FEATURE_COUNT],
        scale: [f64; FEATURE_COUNT],
    },
    /// `x * scale + min`
    MinMax {
        min: [f64; FEATURE_COUNT],
        scale: [f64; FEATURE_COUNT],
    },
}

impl FittedScaler {
    pub fn kind(&self) -> &'static str {
        match self {
            FittedScaler::Standard { .. } => "standard",
            FittedScaler::MinMax { .. } => "min_max",
        }
    }

    /// Apply the fitted transform. Pure; the fitted state is never touched.
    pub fn transform(&self, x: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        match self {
            FittedScaler::Standard { mean, scale } => {
                for i in 0..FEATURE_COUNT {
                    out[i] = (x[i] - mean[i]) / scale[i];
                }
            }
            FittedScaler::MinMax { min, scale } => {
                for i in 0..FEATURE_COUNT {
                    out[i] = x[i] * scale[i] + min[i];
                }
            }
        }
        out
    }
}

impl TryFrom<ScalerArtefact> for FittedScaler {
    type Error = DiabError;

    fn try_from(artefact: ScalerArtefact) -> DiabResult<Self> {
        match artefact {
            ScalerArtefact::Standard {
                feature_names,
                mean,
                scale,
            } => {
                check_feature_names("scaler", &feature_names)?;
                let mean = fixed("scaler", "mean", mean)?;
                let scale = fixed("scaler", "scale", scale)?;
                if let Some(idx) = scale.iter().position(|s| *s == 0.0) {
                    return Err(DiabError::invalid_artefact(
                        "scaler",
                        format!("scale[{idx}] is zero"),
                    ));
                }
                Ok(FittedScaler::Standard { mean, scale })
            }
            ScalerArtefact::MinMax {
                feature_names,
                min,
                scale,
            } => {
                check_feature_names("scaler", &feature_names)?;
                Ok(FittedScaler::MinMax {
                    min: fixed("scaler", "min", min)?,
                    scale: fixed("scaler", "scale", scale)?,
                })
            }
        }
    }
}

/// `p1 = sigmoid(intercept + coefficients . x)`
#[derive(Clone, Debug, PartialEq)]
pub struct LogisticModel {
    pub coefficients: [f64; FEATURE_COUNT],
    pub intercept: f64,
}

/// A single regression tree, validated so every walk from the root terminates.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

impl Tree {
    /// Leaf value reached by `x`.
    pub fn leaf_value(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if x[*feature] < *threshold { *left } else { *right },
                TreeNode::Leaf { leaf } => return *leaf,
            }
        }
    }

    fn checked(tree_idx: usize, nodes: Vec<TreeNode>) -> DiabResult<Self> {
        let invalid = |reason: String| DiabError::invalid_artefact("classifier", format!("tree {tree_idx}: {reason}"));

        if nodes.is_empty() {
            return Err(invalid("no nodes".to_string()));
        }
        for (idx, node) in nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= FEATURE_COUNT {
                        return Err(invalid(format!("node {idx} splits on feature {feature}")));
                    }
                    if !threshold.is_finite() {
                        return Err(invalid(format!("node {idx} has a non-finite threshold")));
                    }
                    // Children after their parent rules out cycles.
                    for child in [*left, *right] {
                        if child <= idx || child >= nodes.len() {
                            return Err(invalid(format!("node {idx} points at node {child}")));
                        }
                    }
                }
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(invalid(format!("node {idx} has a non-finite leaf")));
                    }
                }
            }
        }
        Ok(Self { nodes })
    }
}

/// Boosted trees, XGBoost convention: `p1 = sigmoid(logit(base_score) + sum(leaves))`.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeEnsemble {
    pub base_margin: f64,
    pub trees: Vec<Tree>,
}

/// A classifier whose parameters have been checked against the feature contract.
#[derive(Clone, Debug, PartialEq)]
pub enum FittedClassifier {
    Logistic(LogisticModel),
    GradientBoosting(TreeEnsemble),
}

impl FittedClassifier {
    pub fn kind(&self) -> ModelKind {
        match self {
            FittedClassifier::Logistic(_) => ModelKind::Logistic,
            FittedClassifier::GradientBoosting(_) => ModelKind::GradientBoosting,
        }
    }
}

impl TryFrom<ClassifierArtefact> for FittedClassifier {
    type Error = DiabError;

    fn try_from(artefact: ClassifierArtefact) -> DiabResult<Self> {
        match artefact {
            ClassifierArtefact::Logistic {
                feature_names,
                coefficients,
                intercept,
            } => {
                check_feature_names("classifier", &feature_names)?;
                if !intercept.is_finite() {
                    return Err(DiabError::invalid_artefact("classifier", "intercept is not finite"));
                }
                Ok(FittedClassifier::Logistic(LogisticModel {
                    coefficients: fixed("classifier", "coefficients", coefficients)?,
                    intercept,
                }))
            }
            ClassifierArtefact::GradientBoosting {
                feature_names,
                base_score,
                trees,
            } => {
                check_feature_names("classifier", &feature_names)?;
                if !(base_score > 0.0 && base_score < 1.0) {
                    return Err(DiabError::invalid_artefact(
                        "classifier",
                        format!("base_score {base_score} outside (0, 1)"),
                    ));
                }
                if trees.is_empty() {
                    return Err(DiabError::invalid_artefact("classifier", "ensemble has no trees"));
                }
                let trees = trees
                    .into_iter()
                    .enumerate()
                    .map(|(idx, tree)| Tree::checked(idx, tree.nodes))
                    .collect::<DiabResult<Vec<_>>>()?;
                Ok(FittedClassifier::GradientBoosting(TreeEnsemble {
                    base_margin: (base_score / (1.0 - base_score)).ln(),
                    trees,
                }))
            }
        }
    }
}

/// Both artefacts, checked and ready for inference.
#[derive(Clone, Debug)]
pub struct ArtefactSet {
    pub scaler: FittedScaler,
    pub classifier: FittedClassifier,
}

/// The artefact must list exactly the training columns, in training order.
fn check_feature_names(artefact: &'static str, names: &[String]) -> DiabResult<()> {
    let expected = training_columns();
    if names.len() != expected.len() {
        return Err(DiabError::invalid_artefact(
            artefact,
            format!(
                "expected {} feature columns, found {}",
                expected.len(),
                names.len()
            ),
        ));
    }
    for (idx, (found, wanted)) in names.iter().zip(expected).enumerate() {
        if found != wanted {
            return Err(DiabError::invalid_artefact(
                artefact,
                format!(
                    "feature column {idx} is {found:?}, expected {wanted:?} (training order: {})",
                    expected.join(", ")
                ),
            ));
        }
    }
    Ok(())
}

fn fixed(artefact: &'static str, field: &str, values: Vec<f64>) -> DiabResult<[f64; FEATURE_COUNT]> {
    if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
        return Err(DiabError::invalid_artefact(
            artefact,
            format!("{field}[{idx}] is not finite"),
        ));
    }
    let len = values.len();
    <[f64; FEATURE_COUNT]>::try_from(values).map_err(|_| {
        DiabError::invalid_artefact(
            artefact,
            format!("{field} has {len} values, expected {FEATURE_COUNT}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns() -> Vec<String> {
        training_columns().iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn standard_scaler_standardises() {
        let artefact: ScalerArtefact = serde_json::from_value(json!({
            "kind": "standard",
            "feature_names": columns(),
            "mean": [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            "scale": [2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 0.5]
        }))
        .unwrap();
        let scaler = FittedScaler::try_from(artefact).unwrap();

        let out = scaler.transform(&[3.0, 2.0, 1.0, 4.0, 5.0, 6.0, 7.0, 9.0]);
        assert_eq!(out, [1.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
        assert_eq!(scaler.kind(), "standard");
    }

    #[test]
    fn min_max_scaler_applies_scale_then_offset() {
        let artefact: ScalerArtefact = serde_json::from_value(json!({
            "kind": "min_max",
            "feature_names": columns(),
            "min": vec![-1.0; 8],
            "scale": vec![0.5; 8]
        }))
        .unwrap();
        let scaler = FittedScaler::try_from(artefact).unwrap();
        assert_eq!(scaler.transform(&[4.0; 8]), [1.0; 8]);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let mut scale = vec![1.0; 8];
        scale[3] = 0.0;
        let artefact = ScalerArtefact::Standard {
            feature_names: columns(),
            mean: vec![0.0; 8],
            scale,
        };
        let err = FittedScaler::try_from(artefact).unwrap_err();
        assert!(err.to_string().contains("scale[3] is zero"));
    }

    #[test]
    fn swapped_columns_fail_loudly() {
        let mut names = columns();
        names.swap(1, 2);
        let artefact = ClassifierArtefact::Logistic {
            feature_names: names,
            coefficients: vec![0.0; 8],
            intercept: 0.0,
        };
        let err = FittedClassifier::try_from(artefact).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("feature column 1 is \"BloodPressure\""), "{msg}");
        assert!(msg.contains("expected \"Glucose\""), "{msg}");
    }

    #[test]
    fn wrong_vector_length_is_rejected() {
        let artefact = ClassifierArtefact::Logistic {
            feature_names: columns(),
            coefficients: vec![0.1; 7],
            intercept: 0.0,
        };
        let err = FittedClassifier::try_from(artefact).unwrap_err();
        assert!(err.to_string().contains("coefficients has 7 values, expected 8"));
    }

    #[test]
    fn tree_nodes_decode_untagged() {
        let artefact: ClassifierArtefact = serde_json::from_value(json!({
            "kind": "gradient_boosting",
            "feature_names": columns(),
            "trees": [{"nodes": [
                {"feature": 1, "threshold": 0.5, "left": 1, "right": 2},
                {"leaf": -0.4},
                {"leaf": 0.6}
            ]}]
        }))
        .unwrap();
        let FittedClassifier::GradientBoosting(ensemble) = FittedClassifier::try_from(artefact).unwrap() else {
            panic!("expected an ensemble");
        };
        assert_eq!(ensemble.base_margin, 0.0);

        let mut x = [0.0; 8];
        assert_eq!(ensemble.trees[0].leaf_value(&x), -0.4);
        x[1] = 0.5;
        assert_eq!(ensemble.trees[0].leaf_value(&x), 0.6);
    }

    #[test]
    fn cyclic_tree_is_rejected() {
        let artefact = ClassifierArtefact::GradientBoosting {
            feature_names: columns(),
            base_score: 0.5,
            trees: vec![TreeArtefact {
                nodes: vec![
                    TreeNode::Split {
                        feature: 0,
                        threshold: 0.0,
                        left: 1,
                        right: 0,
                    },
                    TreeNode::Leaf { leaf: 0.1 },
                ],
            }],
        };
        let err = FittedClassifier::try_from(artefact).unwrap_err();
        assert!(err.to_string().contains("tree 0: node 0 points at node 0"));
    }

    #[test]
    fn split_on_unknown_feature_is_rejected() {
        let artefact = ClassifierArtefact::GradientBoosting {
            feature_names: columns(),
            base_score: 0.5,
            trees: vec![TreeArtefact {
                nodes: vec![
                    TreeNode::Split {
                        feature: 8,
                        threshold: 0.0,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { leaf: 0.1 },
                    TreeNode::Leaf { leaf: 0.2 },
                ],
            }],
        };
        assert!(FittedClassifier::try_from(artefact).is_err());
    }

    #[test]
    fn base_score_must_be_a_probability() {
        for base_score in [0.0, 1.0, 1.5] {
            let artefact = ClassifierArtefact::GradientBoosting {
                feature_names: columns(),
                base_score,
                trees: vec![TreeArtefact {
                    nodes: vec![TreeNode::Leaf { leaf: 0.0 }],
                }],
            };
            assert!(FittedClassifier::try_from(artefact).is_err(), "{base_score}");
        }
    }
}
