//! Random forest classifier
//!
//! Bagged gini decision trees with majority vote. Defaults mirror the model
//! the feature table was originally validated with: 200 trees, depth 6,
//! seed 42. All randomness (bootstrap sampling, per-split feature
//! subsampling) derives from the configured seed, so identical inputs always
//! produce the identical fitted model.

use super::classifier::Classifier;
use super::decision_tree::{DecisionTree, TreeConfig};
use anyhow::{Context, Result};
use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Random forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree
    pub max_depth: usize,
    /// Minimum samples to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples in a leaf
    pub min_samples_leaf: usize,
    /// Features per split (None = sqrt of the feature count)
    pub max_features: Option<usize>,
    /// Bootstrap sampling of training rows
    pub bootstrap: bool,
    /// Random seed
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: 6,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Random forest binary classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    /// Forest with the default configuration (200 trees, depth 6, seed 42)
    pub fn with_defaults() -> Self {
        Self::new(ForestConfig::default())
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Fraction of trees voting for the positive class, per sample
    pub fn predict_proba(&self, x: &Array2<f64>) -> Array1<f64> {
        if self.trees.is_empty() {
            return Array1::from_elem(x.nrows(), 0.5);
        }

        let votes: Vec<Array1<f64>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect();

        let mut sum = Array1::zeros(x.nrows());
        for v in &votes {
            sum = sum + v;
        }
        sum / self.trees.len() as f64
    }

    /// Save the fitted forest as JSON
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create model file: {:?}", path.as_ref()))?;
        serde_json::to_writer(file, self)?;
        Ok(())
    }

    /// Load a fitted forest from JSON
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("Failed to open model file: {:?}", path.as_ref()))?;
        let forest = serde_json::from_reader(file)?;
        Ok(forest)
    }

    fn bootstrap_indices(n: usize, seed: u64) -> Vec<usize> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..n).map(|_| rng.gen_range(0..n)).collect()
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) {
        assert_eq!(x.nrows(), y.len(), "X and y must have same number of samples");

        let n_samples = x.nrows();
        let n_features = x.ncols();
        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize)
            .max(1);

        self.trees = (0..self.config.n_trees)
            .into_par_iter()
            .map(|i| {
                let tree_seed = self.config.seed.wrapping_add(i as u64);
                let mut tree = DecisionTree::new(TreeConfig {
                    max_depth: self.config.max_depth,
                    min_samples_split: self.config.min_samples_split,
                    min_samples_leaf: self.config.min_samples_leaf,
                    max_features: Some(max_features),
                    seed: tree_seed,
                });

                if self.config.bootstrap {
                    let indices = Self::bootstrap_indices(n_samples, tree_seed);
                    let x_boot = x.select(Axis(0), &indices);
                    let y_boot =
                        Array1::from_vec(indices.iter().map(|&idx| y[idx]).collect());
                    tree.fit(&x_boot, &y_boot);
                } else {
                    tree.fit(x, y);
                }

                tree
            })
            .collect();
    }

    fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        self.predict_proba(x)
            .mapv(|p| if p > 0.5 { 1.0 } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn threshold_data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| {
            if j == 0 {
                i as f64 / 10.0
            } else {
                ((i * 31) % 17) as f64
            }
        });
        let y = Array1::from_shape_fn(n, |i| if i as f64 / 10.0 > (n as f64 / 20.0) { 1.0 } else { 0.0 });
        (x, y)
    }

    #[test]
    fn test_forest_learns_threshold() {
        let (x, y) = threshold_data(200);

        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 20,
            ..Default::default()
        });
        forest.fit(&x, &y);
        assert_eq!(forest.n_trees(), 20);

        let pred = forest.predict(&x);
        let correct = pred
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| (*p - *t).abs() < 1e-12)
            .count();
        assert!(correct as f64 / x.nrows() as f64 > 0.9);
    }

    #[test]
    fn test_seeded_fit_is_reproducible() {
        let (x, y) = threshold_data(120);

        let mut a = RandomForest::new(ForestConfig {
            n_trees: 10,
            ..Default::default()
        });
        let mut b = RandomForest::new(ForestConfig {
            n_trees: 10,
            ..Default::default()
        });
        a.fit(&x, &y);
        b.fit(&x, &y);

        assert_eq!(a.predict(&x), b.predict(&x));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (x, y) = threshold_data(80);

        let mut forest = RandomForest::new(ForestConfig {
            n_trees: 5,
            ..Default::default()
        });
        forest.fit(&x, &y);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        forest.save_json(&path).unwrap();

        let loaded = RandomForest::load_json(&path).unwrap();
        assert_eq!(loaded.n_trees(), 5);
        assert_eq!(loaded.predict(&x), forest.predict(&x));
    }

    #[test]
    fn test_unfitted_forest_predicts_neutral() {
        let forest = RandomForest::with_defaults();
        let proba = forest.predict_proba(&Array2::zeros((3, 2)));
        assert!(proba.iter().all(|&p| (p - 0.5).abs() < 1e-12));
    }
}
