//! Per-metric results of an information gain query.

use serde::{Deserialize, Serialize};

/// Outcome of computing one metric.
///
/// Ordered by severity so the call-level status is the maximum of the
/// per-metric statuses: `Succeeded < UnknownMetric < Failed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgRetrievalStatus {
    /// Gain computed
    Succeeded,
    /// The metric name is not registered
    UnknownMetric,
    /// The computation failed
    Failed,
}

/// Result for one requested metric. The gain exists only on success.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgRetrievalResult {
    /// Gain computed
    Succeeded {
        /// Predicted information gain
        predicted_gain: f64,
    },
    /// The metric name is not registered
    UnknownMetric,
    /// The computation failed
    Failed,
}

impl IgRetrievalResult {
    /// Status tag of this result.
    pub fn status(&self) -> IgRetrievalStatus {
        match self {
            IgRetrievalResult::Succeeded { .. } => IgRetrievalStatus::Succeeded,
            IgRetrievalResult::UnknownMetric => IgRetrievalStatus::UnknownMetric,
            IgRetrievalResult::Failed => IgRetrievalStatus::Failed,
        }
    }

    /// Predicted gain, if the metric succeeded.
    pub fn predicted_gain(&self) -> Option<f64> {
        match self {
            IgRetrievalResult::Succeeded { predicted_gain } => Some(*predicted_gain),
            _ => None,
        }
    }

    /// Check for success.
    pub fn is_success(&self) -> bool {
        matches!(self, IgRetrievalResult::Succeeded { .. })
    }
}

/// Answer to an information gain query: call-level status plus one result
/// per requested metric, aligned with the request's `metric_names`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IgResponse {
    /// Worst status among `results`
    pub status: IgRetrievalStatus,
    /// Results in request order
    pub results: Vec<IgRetrievalResult>,
}

impl IgResponse {
    /// Build a response, deriving the call-level status from the results.
    pub fn from_results(results: Vec<IgRetrievalResult>) -> Self {
        let status = results
            .iter()
            .map(IgRetrievalResult::status)
            .max()
            .unwrap_or(IgRetrievalStatus::Succeeded);
        Self { status, results }
    }

    /// Check whether every metric succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.status == IgRetrievalStatus::Succeeded
    }

    /// Gains of the successful entries, `None` for the others.
    pub fn gains(&self) -> Vec<Option<f64>> {
        self.results.iter().map(|r| r.predicted_gain()).collect()
    }
}
