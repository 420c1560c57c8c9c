// Policy configuration as loaded by training loops
// Mirrors the constructor arguments of `Agent::new`

use serde::{Deserialize, Serialize};

fn default_schedule() -> String {
    "dqn".to_string()
}

/// Declarative policy configuration.
///
/// Deserializable from JSON so a training loop can keep policy parameters
/// next to its own settings. Validation happens when the config is turned
/// into an agent, not at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Number of actions available in the environment
    pub n_actions: usize,
    /// Short name of the exploration schedule: "s", "t" or "dqn"
    #[serde(default = "default_schedule")]
    pub eps_greedy_function: String,
    /// Threshold parameter for the "s" and "t" schedules
    #[serde(default)]
    pub n0: Option<f64>,
    /// Probability of forcing a random action, independent of epsilon
    #[serde(default)]
    pub stochasticity_factor: f64,
}
