use rayon::prelude::*;
use tracing::info;
use validator::Validate;

use crate::config::{TrajectoryConfig, WalkerConfig};
use crate::error::Result;
use crate::geometry::Lattice;
use crate::rng::RandomSource;
use crate::spins::energy::energy_per_site;
use crate::statistics::{sokal_tau, AutocorrAccum, Moments, WalkerResults};

use super::trajectory::run_trajectory;

/// Observables of a single walker, one entry per snapshot.
struct WalkerTrace {
    magnetisation: Vec<f64>,
    energy: Vec<f64>,
    acceptance_rate: f64,
}

fn run_walker(initial: &Lattice, config: &TrajectoryConfig, seed: u64) -> Result<WalkerTrace> {
    let mut trajectory =
        run_trajectory(initial.clone(), config, RandomSource::seed_from_u64(seed))?;
    let mut magnetisation = Vec::with_capacity(config.steps);
    let mut energy = Vec::with_capacity(config.steps);
    for snapshot in trajectory.by_ref() {
        magnetisation.push(snapshot.magnetisation());
        energy.push(energy_per_site(&snapshot));
    }

    Ok(WalkerTrace {
        magnetisation,
        energy,
        acceptance_rate: trajectory.engine().acceptance_rate(),
    })
}

/// Run `n_repeats` independent walkers at every temperature, all starting
/// from a copy of `initial`.
///
/// See [`run_walkers_with_progress`].
pub fn run_walkers(initial: &Lattice, config: &WalkerConfig) -> Result<WalkerResults> {
    run_walkers_with_progress(initial, config, &|| {})
}

/// Like [`run_walkers`], calling `on_walker` once per finished walker.
///
/// Walkers are numbered temperature-major (`k = t * n_repeats + r`) and
/// walker `k` draws from its own [`RandomSource`] seeded with
/// `base_seed + k`, so results do not depend on scheduling and are identical
/// whether or not `config.sequential` is set.
pub fn run_walkers_with_progress(
    initial: &Lattice,
    config: &WalkerConfig,
    on_walker: &(dyn Fn() + Sync),
) -> Result<WalkerResults> {
    config.validate()?;

    let n_temps = config.temperatures.len();
    let n_repeats = config.n_repeats;
    let steps = config.steps;
    let stepsize = config.stepsize.unwrap_or(initial.n_spins());

    info!(
        rows = initial.rows(),
        cols = initial.cols(),
        n_temps,
        n_repeats,
        steps,
        stepsize,
        sequential = config.sequential,
        "running walkers"
    );

    let jobs: Vec<(usize, TrajectoryConfig)> = config
        .temperatures
        .iter()
        .flat_map(|&t| std::iter::repeat(config.trajectory(t)).take(n_repeats))
        .enumerate()
        .collect();

    let work = |(k, traj_cfg): &(usize, TrajectoryConfig)| {
        let trace = run_walker(initial, traj_cfg, config.base_seed.wrapping_add(*k as u64));
        on_walker();
        trace
    };

    let traces: Vec<Result<WalkerTrace>> = if config.sequential {
        jobs.iter().map(work).collect()
    } else {
        jobs.par_iter().map(work).collect()
    };
    let traces: Vec<WalkerTrace> = traces.into_iter().collect::<Result<Vec<_>>>()?;

    let mut mags_moments = Moments::new(n_temps);
    let mut energy_moments = Moments::new(n_temps);

    let ac_max_lag = config
        .autocorrelation_max_lag
        .map(|k| k.min(steps / 4).max(1));
    let mut m2_autocorrelation: Vec<Vec<f64>> = Vec::new();

    let mut mags_buf = vec![0.0f64; n_temps];
    let mut energies_buf = vec![0.0f64; n_temps];
    for r in 0..n_repeats {
        let mut m2_accum = ac_max_lag.map(|k| AutocorrAccum::new(k, n_temps));
        for step in 0..steps {
            for t in 0..n_temps {
                let trace = &traces[t * n_repeats + r];
                mags_buf[t] = trace.magnetisation[step];
                energies_buf[t] = trace.energy[step];
            }
            mags_moments.record(&mags_buf);
            energy_moments.record(&energies_buf);

            if let Some(acc) = m2_accum.as_mut() {
                let m2: Vec<f64> = mags_buf.iter().map(|m| m * m).collect();
                acc.push(&m2);
            }
        }

        if let Some(acc) = m2_accum {
            let gamma = acc.finish();
            if m2_autocorrelation.is_empty() {
                m2_autocorrelation = gamma;
            } else {
                for (a_row, g_row) in m2_autocorrelation.iter_mut().zip(gamma.iter()) {
                    for (a, &g) in a_row.iter_mut().zip(g_row.iter()) {
                        *a += g;
                    }
                }
            }
        }
    }
    for row in m2_autocorrelation.iter_mut() {
        for v in row.iter_mut() {
            *v /= n_repeats as f64;
        }
    }
    let mags2_tau: Vec<f64> = m2_autocorrelation
        .iter()
        .map(Vec::as_slice)
        .map(sokal_tau)
        .collect();

    let mut magnetisation = Vec::with_capacity(n_temps);
    let mut energy = Vec::with_capacity(n_temps);
    let mut acceptance_rate = Vec::with_capacity(n_temps);
    let mut traces = traces.into_iter();
    for _ in 0..n_temps {
        let mut mag_t = Vec::with_capacity(n_repeats);
        let mut energy_t = Vec::with_capacity(n_repeats);
        let mut rate_t = Vec::with_capacity(n_repeats);
        for trace in traces.by_ref().take(n_repeats) {
            mag_t.push(trace.magnetisation);
            energy_t.push(trace.energy);
            rate_t.push(trace.acceptance_rate);
        }
        magnetisation.push(mag_t);
        energy.push(energy_t);
        acceptance_rate.push(rate_t);
    }

    let results = WalkerResults {
        temperatures: config.temperatures.clone(),
        flips: (0..steps).map(|k| k * stepsize).collect(),
        magnetisation,
        energy,
        acceptance_rate,
        mags: mags_moments.mean(),
        mags2: mags_moments.mean_square(),
        energies: energy_moments.mean(),
        energies2: energy_moments.mean_square(),
        mags2_autocorrelation: m2_autocorrelation,
        mags2_tau,
    };

    info!(mags2 = ?results.mags2, energies = ?results.energies, "walkers finished");
    Ok(results)
}
