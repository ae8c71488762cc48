//! Model interface, random forest, metrics, and walk-forward validation

pub mod classifier;
pub mod decision_tree;
pub mod forest;
pub mod metrics;
pub mod walk_forward;

pub use classifier::{Classifier, MajorityClassifier};
pub use decision_tree::DecisionTree;
pub use forest::{ForestConfig, RandomForest};
pub use metrics::{ClassReport, Metrics};
pub use walk_forward::{FoldScore, WalkForwardConfig, WalkForwardEvaluator, WalkForwardReport};
