use crate::dataset::Dataset;
use common::FetchError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Network, HTTP status or CSV parse failure.
    #[error("Failed to load {dataset} dataset: {reason}")]
    DataFetch {
        dataset: Dataset,
        reason: String,
        transient: bool,
    },

    /// The predicted dish has no row. Catalog and dataset have drifted apart.
    #[error("No {dataset} record for '{food_name}'")]
    RecordNotFound { dataset: Dataset, food_name: String },

    #[error("Label index {index} is outside the catalog (size {len})")]
    UnknownLabel { index: usize, len: usize },
}

impl LookupError {
    pub(crate) fn fetch(dataset: Dataset, err: FetchError) -> Self {
        LookupError::DataFetch {
            dataset,
            transient: err.is_transient(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn parse(dataset: Dataset, err: csv::Error) -> Self {
        LookupError::DataFetch {
            dataset,
            reason: format!("malformed CSV: {}", err),
            transient: false,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, LookupError::DataFetch { transient: true, .. })
    }
}
