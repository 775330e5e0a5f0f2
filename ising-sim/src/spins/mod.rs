pub mod energy;

pub use energy::{energy_delta, energy_per_site, total_energy, total_energy_bulk};
