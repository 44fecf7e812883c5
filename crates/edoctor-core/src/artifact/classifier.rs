use serde::{Deserialize, Serialize};

use super::ensure_finite;
use crate::error::{EDoctorError, Result};

/// A trained classifier reduced to its prediction contract.
pub trait Classifier: Send + Sync {
    fn n_features(&self) -> usize;

    fn predict_one(&self, features: &[f64]) -> Result<i64>;

    fn predict(&self, batch: &[Vec<f64>]) -> Result<Vec<i64>> {
        batch
            .iter()
            .map(|features| self.predict_one(features))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    TreeEnsemble(TreeEnsemble),
    Linear(LinearClassifier),
}

impl ClassifierArtifact {
    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Self::TreeEnsemble(model) => model.validate(),
            Self::Linear(model) => model.validate(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TreeEnsemble(_) => "tree_ensemble",
            Self::Linear(_) => "linear",
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn n_features(&self) -> usize {
        match self {
            Self::TreeEnsemble(model) => model.n_features,
            Self::Linear(model) => model.n_features,
        }
    }

    fn predict_one(&self, features: &[f64]) -> Result<i64> {
        match self {
            Self::TreeEnsemble(model) => model.predict_one(features),
            Self::Linear(model) => model.predict_one(features),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Go `left` when `features[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Per-class weights, aligned with the ensemble's `classes`.
    Leaf { value: Vec<f64> },
}

/// Forest of decision trees; each tree votes with its normalised leaf
/// distribution and the heaviest class wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<Vec<TreeNode>>,
}

impl TreeEnsemble {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.n_features == 0 {
            return Err("n_features must be positive".to_string());
        }
        if self.classes.is_empty() {
            return Err("classes must not be empty".to_string());
        }
        if self.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }
        for (tree_index, tree) in self.trees.iter().enumerate() {
            if tree.is_empty() {
                return Err(format!("tree {tree_index} has no nodes"));
            }
            for (node_index, node) in tree.iter().enumerate() {
                self.validate_node(tree.len(), node_index, node)
                    .map_err(|reason| format!("tree {tree_index} node {node_index}: {reason}"))?;
            }
        }
        Ok(())
    }

    fn validate_node(
        &self,
        tree_len: usize,
        node_index: usize,
        node: &TreeNode,
    ) -> std::result::Result<(), String> {
        match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= self.n_features {
                    return Err(format!(
                        "feature {feature} out of range for {} features",
                        self.n_features
                    ));
                }
                if threshold.is_nan() {
                    return Err("threshold is NaN".to_string());
                }
                // Children strictly after the parent keeps every walk finite.
                for child in [*left, *right] {
                    if child <= node_index || child >= tree_len {
                        return Err(format!("child index {child} is not a forward reference"));
                    }
                }
                Ok(())
            }
            TreeNode::Leaf { value } => {
                if value.len() != self.classes.len() {
                    return Err(format!(
                        "leaf has {} weights for {} classes",
                        value.len(),
                        self.classes.len()
                    ));
                }
                ensure_finite(value, "value")?;
                if value.iter().any(|weight| *weight < 0.0) {
                    return Err("leaf weights must be non-negative".to_string());
                }
                if value.iter().sum::<f64>() <= 0.0 {
                    return Err("leaf weights sum to zero".to_string());
                }
                Ok(())
            }
        }
    }
}

fn walk_tree<'a>(tree: &'a [TreeNode], features: &[f64]) -> Result<&'a [f64]> {
    let mut index = 0;
    loop {
        match tree.get(index) {
            Some(TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let value = features.get(*feature).ok_or_else(|| {
                    EDoctorError::Internal(format!("split references missing feature {feature}"))
                })?;
                index = if *value <= *threshold { *left } else { *right };
            }
            Some(TreeNode::Leaf { value }) => return Ok(value.as_slice()),
            None => {
                return Err(EDoctorError::Internal(format!(
                    "tree walk reached missing node {index}"
                )));
            }
        }
    }
}

impl Classifier for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_one(&self, features: &[f64]) -> Result<i64> {
        check_width(self.n_features, features)?;
        let mut votes = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = walk_tree(tree, features)?;
            let total: f64 = leaf.iter().sum();
            for (vote, weight) in votes.iter_mut().zip(leaf) {
                *vote += weight / total;
            }
        }
        pick_class(&self.classes, &votes)
    }
}

/// Multinomial linear model: `argmax(W x + b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.n_features == 0 {
            return Err("n_features must be positive".to_string());
        }
        if self.classes.is_empty() {
            return Err("classes must not be empty".to_string());
        }
        if self.coefficients.len() != self.classes.len()
            || self.intercepts.len() != self.classes.len()
        {
            return Err(format!(
                "expected {} coefficient rows and intercepts, got {} and {}",
                self.classes.len(),
                self.coefficients.len(),
                self.intercepts.len()
            ));
        }
        for (row_index, row) in self.coefficients.iter().enumerate() {
            if row.len() != self.n_features {
                return Err(format!(
                    "coefficient row {row_index} has {} entries for {} features",
                    row.len(),
                    self.n_features
                ));
            }
            ensure_finite(row, "coefficients")?;
        }
        ensure_finite(&self.intercepts, "intercepts")
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_one(&self, features: &[f64]) -> Result<i64> {
        check_width(self.n_features, features)?;
        let scores = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                row.iter()
                    .zip(features)
                    .map(|(weight, value)| weight * value)
                    .sum::<f64>()
                    + intercept
            })
            .collect::<Vec<_>>();
        pick_class(&self.classes, &scores)
    }
}

fn check_width(expected: usize, features: &[f64]) -> Result<()> {
    if features.len() != expected {
        return Err(EDoctorError::Internal(format!(
            "classifier expects {expected} features, got {}",
            features.len()
        )));
    }
    Ok(())
}

/// Overflowing inputs surface as NaN or infinite scores; those never pick a class.
fn pick_class(classes: &[i64], scores: &[f64]) -> Result<i64> {
    if scores.iter().any(|score| !score.is_finite()) {
        return Err(EDoctorError::validation(
            "features",
            "values are too large for the model to score",
        ));
    }
    Ok(classes[argmax(scores)])
}

/// First index of the maximum; ties go to the lower index.
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (index, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = index;
        }
    }
    best
}
