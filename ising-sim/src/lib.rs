//! Single-site Metropolis sampling of the 2D Ising model with open boundary
//! conditions.
//!
//! Energies use one convention throughout: `E = 2 * Σ -s_i s_j` over each
//! adjacent pair, so flipping site `i` changes it by `4 * s_i * Σ_j s_j`.

pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod rng;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::{Temperature, TrajectoryConfig, WalkerConfig};
pub use error::{ErrorKind, IsingError, Result};
pub use geometry::{make_lattice, Lattice, LatticeKind, Site};
pub use mcmc::{metropolis_step, MetropolisEngine, StepOutcome};
pub use rng::RandomSource;
pub use simulation::{run_trajectory, run_walkers, Trajectory};
pub use spins::{energy_delta, energy_per_site, total_energy, total_energy_bulk};
pub use statistics::WalkerResults;
