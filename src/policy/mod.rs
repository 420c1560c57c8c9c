// Main module for the epsilon-greedy policy components

pub mod agent;
pub mod estimator;
pub mod schedule;

// Re-export main components for easier access
pub use agent::Agent;
pub use estimator::ValueEstimator;
pub use schedule::ExplorationSchedule;
