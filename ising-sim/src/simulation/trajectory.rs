use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::config::TrajectoryConfig;
use crate::error::Result;
use crate::geometry::Lattice;
use crate::mcmc::MetropolisEngine;
use crate::rng::RandomSource;

/// Finite, lazy sequence of lattice snapshots.
///
/// Each call to [`next`](Iterator::next) runs `stepsize` Metropolis
/// micro-steps on the owned lattice and then yields a copy of it, so callers
/// may mutate snapshots freely. Once `steps` snapshots have been produced the
/// iterator is exhausted for good; a fresh run needs a fresh lattice and
/// [`RandomSource`].
///
/// Dropping the iterator early is fine: the lattice stays as it was after the
/// last completed micro-step and is reachable through [`Trajectory::lattice`]
/// or [`Trajectory::into_parts`].
#[derive(Debug)]
pub struct Trajectory {
    lattice: Lattice,
    rng: RandomSource,
    engine: MetropolisEngine,
    stepsize: usize,
    remaining: usize,
}

/// Start a trajectory from `initial`.
///
/// Fails with a config error on bad `config` before any micro-step runs.
pub fn run_trajectory(
    initial: Lattice,
    config: &TrajectoryConfig,
    rng: RandomSource,
) -> Result<Trajectory> {
    let temperature = config.check()?;
    let stepsize = config.stepsize_for(initial.n_spins());
    let engine = MetropolisEngine::with_temperature(temperature).tracking_energy(&initial);

    debug!(
        rows = initial.rows(),
        cols = initial.cols(),
        steps = config.steps,
        stepsize,
        temperature = temperature.get(),
        "starting trajectory"
    );

    Ok(Trajectory {
        lattice: initial,
        rng,
        engine,
        stepsize,
        remaining: config.steps,
    })
}

impl Trajectory {
    /// The live lattice.
    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    /// Total energy of the live lattice, maintained incrementally.
    pub fn energy(&self) -> f64 {
        self.engine.energy().unwrap_or_default()
    }

    pub fn engine(&self) -> &MetropolisEngine {
        &self.engine
    }

    pub fn stepsize(&self) -> usize {
        self.stepsize
    }

    pub fn into_parts(self) -> (Lattice, RandomSource, MetropolisEngine) {
        (self.lattice, self.rng, self.engine)
    }
}

impl Iterator for Trajectory {
    type Item = Lattice;

    fn next(&mut self) -> Option<Lattice> {
        if self.remaining == 0 {
            return None;
        }
        let n_accepted = self
            .engine
            .sweep(&mut self.lattice, &mut self.rng, self.stepsize);
        self.remaining -= 1;
        trace!(
            remaining = self.remaining,
            n_accepted,
            energy = self.energy(),
            "snapshot"
        );
        if self.remaining == 0 {
            debug!(
                acceptance_rate = self.engine.acceptance_rate(),
                energy = self.energy(),
                "trajectory finished"
            );
        }
        Some(self.lattice.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Trajectory {}

impl FusedIterator for Trajectory {}
