// Exploration-rate schedules for the epsilon-greedy policy
// Each variant maps the live selection context to an epsilon in [0, 1]

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult};

/// Floor of the step-decay schedule; epsilon never drops below this.
const STEP_DECAY_FLOOR: f64 = 0.05;
/// Decaying span of the step-decay schedule.
const STEP_DECAY_SPAN: f64 = 0.85;
/// Time constant of the step-decay exponential, in selection steps.
const STEP_DECAY_STEPS: f64 = 1000.0;

/// Exploration-rate schedule, fixed for the lifetime of an agent.
///
/// The schedule is a pure function of the live selection context: the
/// agent's step counter, the current episode index and (for
/// [`ExplorationSchedule::StateVisit`]) a fresh visit count for the state
/// being acted on. Nothing is precomputed at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExplorationSchedule {
    /// Epsilon decays with how often the state has been visited:
    /// `n0 / (n0 + N(s))`.
    StateVisit { n0: f64 },
    /// Epsilon decays with the episode index: `n0 / (n0 + t)`.
    EpisodeBased { n0: f64 },
    /// Epsilon decays with the total number of selection steps, as in the
    /// DQN paper: `0.05 + 0.85 * exp(-steps_done / 1000)`.
    StepDecay,
}

impl ExplorationSchedule {
    /// Resolve a schedule from its short name and optional `n0` threshold.
    ///
    /// Recognized names are `"s"` (state-visit), `"t"` (episode-based) and
    /// `"dqn"` (step-decay). `n0` is required by `"s"` and `"t"` and must
    /// be absent for `"dqn"`; any other combination is a configuration
    /// error.
    pub fn parse(name: &str, n0: Option<f64>) -> AgentResult<Self> {
        match (name, n0) {
            ("dqn", None) => Ok(Self::StepDecay),
            ("dqn", Some(_)) => Err(AgentError::configuration(
                "N0 is not applicable to the dqn schedule",
            )),
            ("s", Some(n0)) => Ok(Self::StateVisit { n0 }),
            ("t", Some(n0)) => Ok(Self::EpisodeBased { n0 }),
            ("s" | "t", None) => Err(AgentError::configuration(
                "N0 is required for this schedule",
            )),
            _ => Err(AgentError::configuration(format!(
                "unknown exploration schedule: {name:?}"
            ))),
        }
    }

    /// Whether evaluating this schedule needs a state visit count.
    pub fn requires_visit_counts(&self) -> bool {
        matches!(self, Self::StateVisit { .. })
    }

    /// Evaluate epsilon for the current selection context.
    ///
    /// `visit_count` is only read by the state-visit variant; callers pass
    /// `None` for the other variants.
    pub fn epsilon(&self, steps_done: u64, episode: u64, visit_count: Option<u64>) -> f64 {
        match *self {
            Self::StateVisit { n0 } => {
                let visits = visit_count.unwrap_or(0) as f64;
                n0 / (n0 + visits)
            }
            Self::EpisodeBased { n0 } => n0 / (n0 + episode as f64),
            Self::StepDecay => {
                STEP_DECAY_FLOOR + STEP_DECAY_SPAN * (-(steps_done as f64) / STEP_DECAY_STEPS).exp()
            }
        }
    }
}
