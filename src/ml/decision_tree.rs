//! Gini decision tree for binary classification
//!
//! Building block of the random forest. Splits are chosen by gini impurity
//! gain over midpoint thresholds; feature subsampling per split is driven by
//! a seeded RNG so training is reproducible.

use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of the tree
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples allowed in a leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Random seed for feature subsampling
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

/// Tree node: either a split on one feature or a leaf with a class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Feature index for the split (leaf if None)
    pub feature_idx: Option<usize>,
    /// Threshold for the split
    pub threshold: Option<f64>,
    /// Predicted class at a leaf (majority of its samples)
    pub value: f64,
    /// Fraction of positive samples at this node
    pub positive_ratio: f64,
    /// Samples that reached this node during fitting
    pub n_samples: usize,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(labels: &[f64]) -> Self {
        let ratio = positive_ratio(labels);
        Self {
            feature_idx: None,
            threshold: None,
            value: if ratio > 0.5 { 1.0 } else { 0.0 },
            positive_ratio: ratio,
            n_samples: labels.len(),
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Binary classification decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<TreeNode>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self { config, root: None }
    }

    /// Train on the given samples
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) {
        assert_eq!(x.nrows(), y.len(), "X and y must have same number of samples");

        let indices: Vec<usize> = (0..x.nrows()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        self.root = Some(self.build_node(x, y, &indices, 0, &mut rng));
    }

    fn build_node(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> TreeNode {
        let labels: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let impurity = gini(&labels);

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || impurity < 1e-10
        {
            return TreeNode::leaf(&labels);
        }

        match self.find_best_split(x, y, indices, impurity, rng) {
            Some((feature_idx, threshold, left_indices, right_indices)) => {
                if left_indices.len() < self.config.min_samples_leaf
                    || right_indices.len() < self.config.min_samples_leaf
                {
                    return TreeNode::leaf(&labels);
                }

                let left = self.build_node(x, y, &left_indices, depth + 1, rng);
                let right = self.build_node(x, y, &right_indices, depth + 1, rng);

                let ratio = positive_ratio(&labels);
                TreeNode {
                    feature_idx: Some(feature_idx),
                    threshold: Some(threshold),
                    value: if ratio > 0.5 { 1.0 } else { 0.0 },
                    positive_ratio: ratio,
                    n_samples: indices.len(),
                    left: Some(Box::new(left)),
                    right: Some(Box::new(right)),
                }
            }
            None => TreeNode::leaf(&labels),
        }
    }

    /// Best gini-gain split over a random subset of features
    fn find_best_split(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        parent_impurity: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<(usize, f64, Vec<usize>, Vec<usize>)> {
        let n_features = x.ncols();
        let max_features = self.config.max_features.unwrap_or(n_features).min(n_features);

        let mut feature_indices: Vec<usize> = (0..n_features).collect();
        feature_indices.shuffle(rng);
        feature_indices.truncate(max_features);
        // Stable candidate order so equal-gain ties resolve identically
        feature_indices.sort_unstable();

        let mut best_gain = 0.0;
        let mut best: Option<(usize, f64, Vec<usize>, Vec<usize>)> = None;

        for &feature_idx in &feature_indices {
            let mut values: Vec<f64> = indices.iter().map(|&i| x[[i, feature_idx]]).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();

            for window in values.windows(2) {
                let threshold = (window[0] + window[1]) / 2.0;

                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                    .iter()
                    .partition(|&&i| x[[i, feature_idx]] <= threshold);

                if left_idx.is_empty() || right_idx.is_empty() {
                    continue;
                }

                let left_labels: Vec<f64> = left_idx.iter().map(|&i| y[i]).collect();
                let right_labels: Vec<f64> = right_idx.iter().map(|&i| y[i]).collect();

                let n_left = left_idx.len() as f64;
                let n_right = right_idx.len() as f64;
                let weighted = (n_left * gini(&left_labels) + n_right * gini(&right_labels))
                    / (n_left + n_right);
                let gain = parent_impurity - weighted;

                if gain > best_gain {
                    best_gain = gain;
                    best = Some((feature_idx, threshold, left_idx, right_idx));
                }
            }
        }

        best
    }

    /// Predict the class for a single sample
    pub fn predict_one(&self, features: &[f64]) -> f64 {
        match &self.root {
            Some(node) => Self::traverse(node, features),
            None => 0.0,
        }
    }

    fn traverse(node: &TreeNode, features: &[f64]) -> f64 {
        match (node.feature_idx, node.threshold, &node.left, &node.right) {
            (Some(feature_idx), Some(threshold), Some(left), Some(right)) => {
                if features[feature_idx] <= threshold {
                    Self::traverse(left, features)
                } else {
                    Self::traverse(right, features)
                }
            }
            _ => node.value,
        }
    }

    /// Predict classes for every row
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::from_iter(
            x.rows()
                .into_iter()
                .map(|row| self.predict_one(&row.to_vec())),
        )
    }

    pub fn depth(&self) -> usize {
        fn node_depth(node: &TreeNode) -> usize {
            if node.is_leaf() {
                1
            } else {
                1 + node
                    .left
                    .as_deref()
                    .map(node_depth)
                    .unwrap_or(0)
                    .max(node.right.as_deref().map(node_depth).unwrap_or(0))
            }
        }
        self.root.as_ref().map(node_depth).unwrap_or(0)
    }
}

fn positive_ratio(labels: &[f64]) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    labels.iter().filter(|&&v| v > 0.5).count() as f64 / labels.len() as f64
}

/// Gini impurity for binary labels
fn gini(labels: &[f64]) -> f64 {
    let p = positive_ratio(labels);
    2.0 * p * (1.0 - p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[1.0, 1.0, 1.0]), 0.0);
        assert_eq!(gini(&[0.0, 0.0]), 0.0);
        assert!((gini(&[0.0, 1.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_tree_learns_threshold() {
        let n = 100;
        let x = Array2::from_shape_fn((n, 1), |(i, _)| i as f64 / 10.0);
        let y = Array1::from_shape_fn(n, |i| if i as f64 / 10.0 > 5.0 { 1.0 } else { 0.0 });

        let mut tree = DecisionTree::new(TreeConfig::default());
        tree.fit(&x, &y);

        let pred = tree.predict(&x);
        let correct = pred
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| (*p - *t).abs() < 1e-12)
            .count();
        assert!(correct as f64 / n as f64 > 0.95);
    }

    #[test]
    fn test_depth_limit_respected() {
        let n = 200;
        let x = Array2::from_shape_fn((n, 2), |(i, j)| ((i * 7 + j * 13) % 29) as f64);
        let y = Array1::from_shape_fn(n, |i| ((i * 3) % 2) as f64);

        let mut tree = DecisionTree::new(TreeConfig {
            max_depth: 3,
            ..Default::default()
        });
        tree.fit(&x, &y);

        assert!(tree.depth() <= 4); // root level plus 3 split levels
    }

    #[test]
    fn test_same_seed_same_tree() {
        let x = array![[1.0, 5.0], [2.0, 4.0], [3.0, 3.0], [4.0, 2.0], [5.0, 1.0], [6.0, 0.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut a = DecisionTree::new(TreeConfig {
            max_features: Some(1),
            ..Default::default()
        });
        let mut b = DecisionTree::new(TreeConfig {
            max_features: Some(1),
            ..Default::default()
        });
        a.fit(&x, &y);
        b.fit(&x, &y);

        let probe = array![[2.5, 3.5], [4.5, 1.5]];
        assert_eq!(a.predict(&probe), b.predict(&probe));
    }
}
