pub mod trajectory;
pub mod walkers;

pub use trajectory::{run_trajectory, Trajectory};
pub use walkers::{run_walkers, run_walkers_with_progress};
