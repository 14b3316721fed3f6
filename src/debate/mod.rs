// src/debate/mod.rs
// Two-debater orchestration

mod debater;
pub mod generator;
pub mod runner;

pub use debater::Debater;
pub use generator::{ResponseGenerator, TurnError, TurnOutcome};
pub use runner::{DebateRunner, DebateSummary, TurnRecord};
