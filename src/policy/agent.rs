// Epsilon-greedy action selection over a value-estimator backend
// The agent owns the step counter and RNG; learning lives elsewhere

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::config::PolicyConfig;
use crate::error::{AgentError, AgentResult};
use crate::policy::{ExplorationSchedule, ValueEstimator};

/// Agent choosing actions with an epsilon-greedy strategy.
///
/// On every [`Agent::act`] call the agent either exploits (returns the
/// estimator's greedy action) or explores (returns a uniformly random
/// action). The exploration probability comes from the configured
/// [`ExplorationSchedule`]; an independent `stochasticity_factor` draw can
/// force a random action on top of that, e.g. for robustness testing.
#[derive(Debug)]
pub struct Agent<E> {
    /// Value-function backend queried for greedy actions and visit counts
    estimator: E,
    /// Number of actions available in the environment
    n_actions: usize,
    /// Exploration-rate schedule, fixed at construction
    schedule: ExplorationSchedule,
    /// Probability of forcing a random action, independent of epsilon
    stochasticity_factor: f64,
    /// Total number of `act` calls made, across all episodes
    steps_done: u64,
    rng: StdRng,
}

impl<E: ValueEstimator> Agent<E> {
    /// Create an agent with an OS-seeded random source.
    ///
    /// `eps_greedy_function` is one of `"s"`, `"t"` or `"dqn"`; `n0` must
    /// accompany `"s"` and `"t"` and be absent for `"dqn"`. See
    /// [`ExplorationSchedule::parse`] for the schedule semantics.
    pub fn new(
        estimator: E,
        n_actions: usize,
        eps_greedy_function: &str,
        n0: Option<f64>,
        stochasticity_factor: f64,
    ) -> AgentResult<Self> {
        Self::with_rng(
            estimator,
            n_actions,
            eps_greedy_function,
            n0,
            stochasticity_factor,
            StdRng::from_os_rng(),
        )
    }

    /// Create an agent with a deterministic random source.
    ///
    /// Two agents built from the same seed and configuration produce the
    /// same action sequence against the same estimator.
    pub fn with_seed(
        estimator: E,
        n_actions: usize,
        eps_greedy_function: &str,
        n0: Option<f64>,
        stochasticity_factor: f64,
        seed: u64,
    ) -> AgentResult<Self> {
        Self::with_rng(
            estimator,
            n_actions,
            eps_greedy_function,
            n0,
            stochasticity_factor,
            StdRng::seed_from_u64(seed),
        )
    }

    /// Create an agent from a deserialized [`PolicyConfig`].
    pub fn from_config(estimator: E, config: &PolicyConfig) -> AgentResult<Self> {
        Self::new(
            estimator,
            config.n_actions,
            &config.eps_greedy_function,
            config.n0,
            config.stochasticity_factor,
        )
    }

    fn with_rng(
        estimator: E,
        n_actions: usize,
        eps_greedy_function: &str,
        n0: Option<f64>,
        stochasticity_factor: f64,
        rng: StdRng,
    ) -> AgentResult<Self> {
        if n_actions == 0 {
            return Err(AgentError::configuration(
                "n_actions must be a positive integer",
            ));
        }
        if !(0.0..=1.0).contains(&stochasticity_factor) {
            return Err(AgentError::configuration(format!(
                "stochasticity_factor must lie in [0, 1], got {stochasticity_factor}"
            )));
        }

        let schedule = ExplorationSchedule::parse(eps_greedy_function, n0)?;

        debug!(
            "epsilon-greedy agent created: schedule={:?}, n_actions={}, stochasticity_factor={}",
            schedule, n_actions, stochasticity_factor
        );

        Ok(Self {
            estimator,
            n_actions,
            schedule,
            stochasticity_factor,
            steps_done: 0,
            rng,
        })
    }

    /// Choose an action for `state` in `current_episode`.
    ///
    /// Increments the step counter exactly once per call, before any
    /// branching, so the step-decay schedule sees every call ever made —
    /// including ones that end up random. Estimator failures propagate
    /// unchanged; no recovery is attempted here.
    pub fn act(&mut self, state: &[f64], current_episode: u64) -> AgentResult<usize> {
        self.steps_done += 1;

        // Two independent draws: one against epsilon, one against the
        // stochasticity override. They must not share a sample.
        let t_draw: f64 = self.rng.random();
        let s_draw: f64 = self.rng.random();

        let eps = self.evaluate_epsilon(state, current_episode)?;

        if t_draw > eps && s_draw > self.stochasticity_factor {
            let (action, value) = self.estimator.best_action_and_value(state)?;
            trace!(
                "exploit: step={} eps={:.4} action={} value={:.4}",
                self.steps_done,
                eps,
                action,
                value
            );
            Ok(action)
        } else {
            let action = self.rng.random_range(0..self.n_actions);
            trace!(
                "explore: step={} eps={:.4} action={}",
                self.steps_done,
                eps,
                action
            );
            Ok(action)
        }
    }

    /// Evaluate the exploration rate at the current step counter without
    /// selecting an action. Useful for logging and diagnostics.
    pub fn epsilon(&self, state: &[f64], current_episode: u64) -> AgentResult<f64> {
        self.evaluate_epsilon(state, current_episode)
    }

    fn evaluate_epsilon(&self, state: &[f64], current_episode: u64) -> AgentResult<f64> {
        let visits = if self.schedule.requires_visit_counts() {
            Some(self.estimator.visit_count(state)?)
        } else {
            None
        };
        Ok(self
            .schedule
            .epsilon(self.steps_done, current_episode, visits))
    }

    /// Total number of `act` calls made so far
    pub fn steps_done(&self) -> u64 {
        self.steps_done
    }

    /// Number of actions available to the agent
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// The exploration schedule this agent was built with
    pub fn schedule(&self) -> ExplorationSchedule {
        self.schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Estimator that always reports the same greedy action and a shared,
    /// externally mutable visit count.
    #[derive(Debug)]
    struct StubEstimator {
        best: (usize, f64),
        visits: Rc<Cell<u64>>,
    }

    impl StubEstimator {
        fn new(best_action: usize, best_value: f64) -> Self {
            Self {
                best: (best_action, best_value),
                visits: Rc::new(Cell::new(0)),
            }
        }
    }

    impl ValueEstimator for StubEstimator {
        fn best_action_and_value(&self, _state: &[f64]) -> AgentResult<(usize, f64)> {
            Ok(self.best)
        }

        fn visit_count(&self, _state: &[f64]) -> AgentResult<u64> {
            Ok(self.visits.get())
        }
    }

    /// Estimator whose greedy query always fails.
    struct FailingEstimator;

    impl ValueEstimator for FailingEstimator {
        fn best_action_and_value(&self, _state: &[f64]) -> AgentResult<(usize, f64)> {
            Err(AgentError::estimator("greedy query failed"))
        }
    }

    #[test]
    fn test_rejects_zero_actions() {
        let err = Agent::new(StubEstimator::new(0, 0.0), 0, "dqn", None, 0.0).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_rejects_out_of_range_stochasticity() {
        let err = Agent::new(StubEstimator::new(0, 0.0), 4, "dqn", None, 1.5).unwrap_err();
        assert!(err.is_configuration());
        let err = Agent::new(StubEstimator::new(0, 0.0), 4, "dqn", None, -0.1).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_construction_validates_schedule_parameters() {
        let estimator = || StubEstimator::new(0, 0.0);
        assert!(Agent::new(estimator(), 4, "dqn", Some(3.0), 0.0)
            .unwrap_err()
            .is_configuration());
        assert!(Agent::new(estimator(), 4, "s", None, 0.0)
            .unwrap_err()
            .is_configuration());
        assert!(Agent::new(estimator(), 4, "t", None, 0.0)
            .unwrap_err()
            .is_configuration());
        assert!(Agent::new(estimator(), 4, "unknown", None, 0.0)
            .unwrap_err()
            .is_configuration());
    }

    #[test]
    fn test_actions_stay_in_range() {
        let mut agent =
            Agent::with_seed(StubEstimator::new(2, 1.0), 4, "dqn", None, 0.5, 7).unwrap();
        let state = [0.5, -0.5];
        for episode in 0..50 {
            for _ in 0..20 {
                let action = agent.act(&state, episode).unwrap();
                assert!(action < 4);
            }
        }
    }

    #[test]
    fn test_steps_done_increments_once_per_call() {
        // Exploring branch only
        let mut agent =
            Agent::with_seed(StubEstimator::new(0, 0.0), 3, "dqn", None, 1.0, 1).unwrap();
        assert_eq!(agent.steps_done(), 0);
        for i in 1..=100 {
            agent.act(&[0.0], 0).unwrap();
            assert_eq!(agent.steps_done(), i);
        }

        // Exploiting branch only
        let mut agent =
            Agent::with_seed(StubEstimator::new(0, 0.0), 3, "t", Some(0.0), 0.0, 1).unwrap();
        for i in 1..=100 {
            agent.act(&[0.0], 1).unwrap();
            assert_eq!(agent.steps_done(), i);
        }
    }

    #[test]
    fn test_steps_done_counts_failed_calls() {
        let mut agent =
            Agent::with_seed(FailingEstimator, 3, "t", Some(0.0), 0.0, 1).unwrap();
        assert!(agent.act(&[0.0], 1).is_err());
        assert_eq!(agent.steps_done(), 1);
    }

    #[test]
    fn test_same_seed_same_action_sequence() {
        let run = || {
            let mut agent =
                Agent::with_seed(StubEstimator::new(1, 2.0), 6, "dqn", None, 0.3, 42).unwrap();
            (0..200)
                .map(|episode| agent.act(&[1.0, 2.0], episode).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_full_stochasticity_never_exploits() {
        // The greedy branch would error; with stochasticity_factor = 1.0
        // it must never be reached.
        let mut agent = Agent::with_seed(FailingEstimator, 4, "dqn", None, 1.0, 11).unwrap();
        let mut counts = [0u32; 4];
        for _ in 0..4000 {
            let action = agent.act(&[0.0], 0).unwrap();
            counts[action] += 1;
        }
        // Uniform over four actions: each count is ~1000. A bound of 200
        // around the mean keeps the test far from both failure modes.
        for count in counts {
            assert!(
                (800..=1200).contains(&count),
                "action counts not uniform: {counts:?}"
            );
        }
    }

    #[test]
    fn test_zero_epsilon_always_returns_best_action() {
        // "t" with n0 = 0 pins epsilon to 0 for every episode t > 0.
        let mut agent =
            Agent::with_seed(StubEstimator::new(3, 9.9), 5, "t", Some(0.0), 0.0, 5).unwrap();
        for _ in 0..100 {
            assert_eq!(agent.act(&[0.1, 0.2], 1).unwrap(), 3);
        }
    }

    #[test]
    fn test_estimator_error_propagates() {
        let mut agent =
            Agent::with_seed(FailingEstimator, 5, "t", Some(0.0), 0.0, 5).unwrap();
        let err = agent.act(&[0.0], 1).unwrap_err();
        assert!(matches!(err, AgentError::Estimator { .. }));
    }

    #[test]
    fn test_state_visit_schedule_reads_live_counts() {
        let estimator = StubEstimator::new(2, 1.0);
        let visits = Rc::clone(&estimator.visits);
        let agent = Agent::with_seed(estimator, 4, "s", Some(5.0), 0.0, 3).unwrap();

        let state = [0.0];
        assert!((agent.epsilon(&state, 0).unwrap() - 1.0).abs() < 1e-12);
        visits.set(5);
        assert!((agent.epsilon(&state, 0).unwrap() - 0.5).abs() < 1e-12);
        visits.set(45);
        assert!((agent.epsilon(&state, 0).unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_state_visit_schedule_without_visit_stats_fails() {
        let mut agent =
            Agent::with_seed(FailingEstimator, 4, "s", Some(5.0), 0.0, 3).unwrap();
        let err = agent.act(&[0.0], 0).unwrap_err();
        assert!(matches!(err, AgentError::Estimator { .. }));
    }

    #[test]
    fn test_epsilon_accessor_does_not_advance_counter() {
        let agent = Agent::with_seed(StubEstimator::new(0, 0.0), 4, "dqn", None, 0.0, 1).unwrap();
        assert!((agent.epsilon(&[0.0], 0).unwrap() - 0.90).abs() < 1e-12);
        assert_eq!(agent.steps_done(), 0);
    }

    #[test]
    fn test_step_decay_epsilon_follows_counter() {
        let mut agent =
            Agent::with_seed(StubEstimator::new(0, 0.0), 4, "dqn", None, 0.0, 1).unwrap();
        let before = agent.epsilon(&[0.0], 0).unwrap();
        agent.act(&[0.0], 0).unwrap();
        let after = agent.epsilon(&[0.0], 0).unwrap();
        assert!(after < before);
    }

    #[test]
    fn test_from_config() {
        let config = PolicyConfig {
            n_actions: 5,
            eps_greedy_function: "t".to_string(),
            n0: Some(0.0),
            stochasticity_factor: 0.0,
        };
        let mut agent = Agent::from_config(StubEstimator::new(3, 9.9), &config).unwrap();
        assert_eq!(agent.act(&[0.0], 1).unwrap(), 3);

        let bad = PolicyConfig {
            eps_greedy_function: "dqn".to_string(),
            n0: Some(1.0),
            ..config
        };
        assert!(Agent::from_config(StubEstimator::new(0, 0.0), &bad)
            .unwrap_err()
            .is_configuration());
    }
}
