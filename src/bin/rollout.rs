// Demo rollout for the epsilon-greedy agent
// Drives the policy against a fixed stub estimator and logs how the
// action distribution shifts as epsilon decays

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use epsilon_agent::{logging, Agent, AgentResult, ValueEstimator};

#[derive(Parser, Debug)]
#[command(about = "Roll out the epsilon-greedy agent against a stub estimator")]
struct Args {
    /// Number of episodes to simulate
    #[arg(long, default_value_t = 20)]
    episodes: u64,

    /// Selection steps per episode
    #[arg(long, default_value_t = 200)]
    steps: u64,

    /// Number of actions available
    #[arg(long, default_value_t = 5)]
    n_actions: usize,

    /// Exploration schedule: "s", "t" or "dqn"
    #[arg(long, default_value = "dqn")]
    schedule: String,

    /// Threshold parameter for the "s" and "t" schedules
    #[arg(long)]
    n0: Option<f64>,

    /// Probability of forcing a random action, independent of epsilon
    #[arg(long, default_value_t = 0.0)]
    stochasticity: f64,

    /// RNG seed for a reproducible rollout
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Action the stub estimator reports as greedy
    #[arg(long, default_value_t = 0)]
    best_action: usize,
}

/// Estimator that always prefers one action and pretends every state has
/// been visited a fixed number of times.
struct StubEstimator {
    best_action: usize,
    visits: u64,
}

impl ValueEstimator for StubEstimator {
    fn best_action_and_value(&self, _state: &[f64]) -> AgentResult<(usize, f64)> {
        Ok((self.best_action, 1.0))
    }

    fn visit_count(&self, _state: &[f64]) -> AgentResult<u64> {
        Ok(self.visits)
    }
}

fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    logging::init_logging();

    let args = Args::parse();

    let estimator = StubEstimator {
        best_action: args.best_action,
        visits: 0,
    };

    let mut agent = Agent::with_seed(
        estimator,
        args.n_actions,
        &args.schedule,
        args.n0,
        args.stochasticity,
        args.seed,
    )
    .context("failed to build agent")?;

    info!(
        "rollout starting: epsilon-agent v{}, schedule={:?}, episodes={}, steps={}",
        epsilon_agent::version(),
        agent.schedule(),
        args.episodes,
        args.steps
    );

    let state = vec![0.0; 4];
    for episode in 0..args.episodes {
        let mut counts = vec![0u64; args.n_actions];
        for _ in 0..args.steps {
            let action = agent
                .act(&state, episode)
                .context("action selection failed")?;
            counts[action] += 1;
        }

        let eps = agent.epsilon(&state, episode)?;
        let greedy_share = counts[args.best_action] as f64 / args.steps as f64;
        info!(
            "episode {:>3}: eps={:.4} greedy_share={:.3} counts={:?}",
            episode, eps, greedy_share, counts
        );
    }

    info!("rollout finished after {} steps", agent.steps_done());
    Ok(())
}
