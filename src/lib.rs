// epsilon-agent - epsilon-greedy action selection for RL training loops
// Learning, value representation and environments live with the caller;
// this crate only decides between exploiting and exploring.

pub mod config;
pub mod error;
pub mod logging;
pub mod policy;

pub use config::PolicyConfig;
pub use error::{AgentError, AgentResult};
pub use policy::{Agent, ExplorationSchedule, ValueEstimator};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
