pub mod metropolis;

pub use metropolis::{accept, metropolis_step, metropolis_step_at, MetropolisEngine, StepOutcome};
