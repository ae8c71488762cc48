//! Supervised target construction
//!
//! The label for each feature row is the sign of the *next* row's primary
//! wave: 1 when the upcoming single-step swing is strictly positive, 0
//! otherwise. The last row has no successor and is dropped.

use super::encoder::FeatureTable;
use crate::data::Dataset;
use crate::error::{PipelineError, PipelineResult};
use ndarray::{s, Array1};

/// Name of the target column
pub const TARGET_NAME: &str = "f1_dir";

/// Attaches the binary direction target to an encoded feature table
pub struct LabelBuilder;

impl LabelBuilder {
    /// Build the labeled dataset from a feature table ordered by pivot index.
    ///
    /// Consumes the table: the last row is removed, every remaining row `i`
    /// gets `label = 1.0` iff `f1[i + 1] > 0`.
    pub fn attach(table: FeatureTable) -> PipelineResult<Dataset> {
        let n = table.n_rows();
        if n < 2 {
            return Err(PipelineError::NoValidRows);
        }

        let f1 = table.column("f1")?;

        let labels: Vec<f64> = (0..n - 1)
            .map(|i| {
                if table.x[[i + 1, f1]] > 0.0 {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();

        let x = table.x.slice(s![..n - 1, ..]).to_owned();
        let timestamps = table.timestamps[..n - 1].to_vec();

        Ok(Dataset::new(
            x,
            Array1::from_vec(labels),
            table.feature_names,
            TARGET_NAME.to_string(),
            timestamps,
        ))
    }
}
