//! Gradient-boosted tree ensemble for binary dropout classification
//!
//! The artifact is a JSON export of a boosted ensemble trained with a binary
//! logistic objective on standardized features:
//!
//! ```json
//! {
//!   "name": "dropout-xgb",
//!   "version": "2024.1",
//!   "num_features": 36,
//!   "base_margin": 0.0,
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 24, "threshold": -0.41, "left": 1, "right": 2 },
//!         { "leaf": -0.8 },
//!         { "leaf": 0.6 }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Split nodes send `x < threshold` to the left child. The raw margin is the
//! base margin plus one leaf value per tree; `p_graduate = sigmoid(margin)`.

use crate::classifier::{ClassLabel, Classifier, StandardizedVector};
use dropwatch_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Decision threshold on `p_graduate` for the label
pub const LABEL_THRESHOLD: f64 = 0.5;

/// A tree node, either a split or a leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Terminal node carrying a margin contribution
    Leaf { leaf: f64 },

    /// Internal node comparing one standardized feature
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single regression tree, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// Serialized form of the ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedTreeArtifact {
    /// Model name
    pub name: String,

    /// Model version
    #[serde(default = "default_version")]
    pub version: String,

    /// Feature count the ensemble was trained on
    pub num_features: usize,

    /// Margin before any tree contributes
    #[serde(default)]
    pub base_margin: f64,

    /// Trees of the ensemble
    pub trees: Vec<Tree>,
}

fn default_version() -> String {
    "unversioned".to_string()
}

impl BoostedTreeArtifact {
    /// Check structural soundness of every tree
    ///
    /// Children must come after their parent, which rules out cycles and
    /// bounds every traversal by the tree's node count.
    pub fn validate(&self) -> Result<()> {
        if self.num_features == 0 {
            return Err(Error::model_unavailable("artifact declares zero features"));
        }
        if self.trees.is_empty() {
            return Err(Error::model_unavailable("artifact contains no trees"));
        }
        if !self.base_margin.is_finite() {
            return Err(Error::model_unavailable("base_margin is not finite"));
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(Error::model_unavailable(format!("tree {} has no nodes", t)));
            }

            for (i, node) in tree.nodes.iter().enumerate() {
                match *node {
                    Node::Leaf { leaf } => {
                        if !leaf.is_finite() {
                            return Err(Error::model_unavailable(format!(
                                "tree {} node {}: leaf value is not finite",
                                t, i
                            )));
                        }
                    }
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if feature >= self.num_features {
                            return Err(Error::model_unavailable(format!(
                                "tree {} node {}: feature index {} out of range (num_features = {})",
                                t, i, feature, self.num_features
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(Error::model_unavailable(format!(
                                "tree {} node {}: threshold is not finite",
                                t, i
                            )));
                        }
                        for child in [left, right] {
                            if child <= i || child >= tree.nodes.len() {
                                return Err(Error::model_unavailable(format!(
                                    "tree {} node {}: child index {} invalid",
                                    t, i, child
                                )));
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

/// Boosted tree ensemble implementing [`Classifier`]
#[derive(Debug, Clone)]
pub struct BoostedTreeClassifier {
    artifact: BoostedTreeArtifact,
}

impl BoostedTreeClassifier {
    /// Build from a validated artifact
    pub fn new(artifact: BoostedTreeArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    /// Parse and validate a JSON artifact
    pub fn from_json(json: &str) -> Result<Self> {
        let artifact: BoostedTreeArtifact = serde_json::from_str(json)
            .map_err(|e| Error::model_unavailable(format!("malformed artifact: {}", e)))?;
        Self::new(artifact)
    }

    /// Underlying artifact
    pub fn artifact(&self) -> &BoostedTreeArtifact {
        &self.artifact
    }

    /// Number of trees in the ensemble
    pub fn tree_count(&self) -> usize {
        self.artifact.trees.len()
    }

    /// Raw log-odds of graduating
    pub fn margin(&self, features: &StandardizedVector) -> Result<f64> {
        let values = features.as_slice();
        if values.len() != self.artifact.num_features {
            return Err(Error::classifier(format!(
                "expected {} features, got {}",
                self.artifact.num_features,
                values.len()
            )));
        }

        let mut margin = self.artifact.base_margin;
        for tree in &self.artifact.trees {
            margin += eval_tree(tree, values)?;
        }
        Ok(margin)
    }
}

/// Walk one tree to its leaf
fn eval_tree(tree: &Tree, features: &[f64]) -> Result<f64> {
    let mut idx = 0usize;

    // Validation guarantees children follow parents, so this terminates
    loop {
        let node = tree
            .nodes
            .get(idx)
            .ok_or_else(|| Error::classifier(format!("node index {} out of bounds", idx)))?;

        match *node {
            Node::Leaf { leaf } => return Ok(leaf),
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let value = features.get(feature).copied().ok_or_else(|| {
                    Error::classifier(format!("feature index {} out of bounds", feature))
                })?;
                idx = if value < threshold { left } else { right };
            }
        }
    }
}

/// Numerically stable logistic function
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

impl Classifier for BoostedTreeClassifier {
    fn name(&self) -> &str {
        &self.artifact.name
    }

    fn version(&self) -> &str {
        &self.artifact.version
    }

    fn num_features(&self) -> usize {
        self.artifact.num_features
    }

    fn predict_label(&self, features: &StandardizedVector) -> Result<ClassLabel> {
        let [_, p_graduate] = self.predict_probabilities(features)?;
        Ok(if p_graduate > LABEL_THRESHOLD {
            ClassLabel::Graduate
        } else {
            ClassLabel::Dropout
        })
    }

    fn predict_probabilities(&self, features: &StandardizedVector) -> Result<[f64; 2]> {
        let p_graduate = sigmoid(self.margin(features)?);
        Ok([1.0 - p_graduate, p_graduate])
    }
}
