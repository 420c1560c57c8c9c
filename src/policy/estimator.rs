// Value-estimator capability consumed by the policy
// Implemented by tabular or function-approximation backends

use crate::error::{AgentError, AgentResult};

/// Capability the policy requires from a value-function backend.
///
/// The backend may be tabular or approximation-based; the policy only ever
/// asks for the greedy action and, when running the state-visit schedule,
/// how often a state has been seen. States are opaque semantic vectors.
pub trait ValueEstimator {
    /// Greedy action for `state` together with its estimated value.
    ///
    /// The returned index must lie in the action range the policy was
    /// configured with. This is an evaluation-only query: it must not
    /// update any learnable parameters.
    fn best_action_and_value(&self, state: &[f64]) -> AgentResult<(usize, f64)>;

    /// Number of times `state` has been visited.
    ///
    /// Only invoked when the policy uses the state-visit exploration
    /// schedule. Backends that do not keep visit statistics can rely on
    /// this default, which reports the capability as missing.
    fn visit_count(&self, state: &[f64]) -> AgentResult<u64> {
        let _ = state;
        Err(AgentError::estimator(
            "estimator does not track state visit counts",
        ))
    }
}
