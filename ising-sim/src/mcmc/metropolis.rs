use crate::config::Temperature;
use crate::error::Result;
use crate::geometry::{Lattice, Site};
use crate::rng::RandomSource;
use crate::spins::energy::{delta_at, total_energy};

/// Result of one Metropolis micro-step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub site: Site,
    pub accepted: bool,
    /// Energy change of the proposed flip, whether or not it was applied.
    pub delta: f64,
}

/// Metropolis acceptance rule.
///
/// Downhill moves (`delta < 0`) are accepted without touching `rng`.
/// Otherwise exactly one uniform `u` is drawn and the move is accepted iff
/// `exp(-delta / T) > u`.
#[inline]
pub fn accept(delta: f64, temperature: Temperature, rng: &mut RandomSource) -> bool {
    delta < 0.0 || (-delta / temperature.get()).exp() > rng.uniform()
}

#[inline]
fn step_at_index(
    lattice: &mut Lattice,
    i: usize,
    temperature: Temperature,
    rng: &mut RandomSource,
) -> (bool, f64) {
    let delta = delta_at(lattice, i);
    let accepted = accept(delta, temperature, rng);
    if accepted {
        lattice.flip_at(i);
    }
    (accepted, delta)
}

/// Propose flipping a uniformly drawn site and apply the Metropolis rule.
pub fn metropolis_step(
    lattice: &mut Lattice,
    temperature: f64,
    rng: &mut RandomSource,
) -> Result<StepOutcome> {
    let temperature = Temperature::new(temperature)?;
    let site = rng.site(lattice.rows(), lattice.cols());
    let i = lattice.index_of(site)?;
    let (accepted, delta) = step_at_index(lattice, i, temperature, rng);
    Ok(StepOutcome {
        site,
        accepted,
        delta,
    })
}

/// [`metropolis_step`] with the proposal fixed to `site`. Only the uniform
/// draw (if any) consumes `rng`.
pub fn metropolis_step_at(
    lattice: &mut Lattice,
    site: Site,
    temperature: f64,
    rng: &mut RandomSource,
) -> Result<StepOutcome> {
    let temperature = Temperature::new(temperature)?;
    let i = lattice.index_of(site)?;
    let (accepted, delta) = step_at_index(lattice, i, temperature, rng);
    Ok(StepOutcome {
        site,
        accepted,
        delta,
    })
}

/// Single-site Metropolis sampler at a fixed temperature.
///
/// Optionally carries the running total energy of the lattice it drives,
/// updated by `delta` on every accepted flip, plus proposal counters.
#[derive(Debug, Clone)]
pub struct MetropolisEngine {
    temperature: Temperature,
    energy: Option<f64>,
    proposed: u64,
    accepted: u64,
}

impl MetropolisEngine {
    pub fn new(temperature: f64) -> Result<Self> {
        Ok(Self::with_temperature(Temperature::new(temperature)?))
    }

    pub fn with_temperature(temperature: Temperature) -> Self {
        Self {
            temperature,
            energy: None,
            proposed: 0,
            accepted: 0,
        }
    }

    /// Start tracking the total energy of `lattice`. Every later call must
    /// drive the same lattice or the tracked value is meaningless.
    pub fn tracking_energy(mut self, lattice: &Lattice) -> Self {
        self.energy = Some(total_energy(lattice));
        self
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn energy(&self) -> Option<f64> {
        self.energy
    }

    pub fn proposed(&self) -> u64 {
        self.proposed
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Accepted / proposed, or 0 before the first proposal.
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.proposed as f64
    }

    /// One micro-step: one site draw, then at most one uniform draw.
    #[inline]
    pub fn step(&mut self, lattice: &mut Lattice, rng: &mut RandomSource) -> StepOutcome {
        let site = rng.site(lattice.rows(), lattice.cols());
        let i = site.row * lattice.cols() + site.col;
        let (accepted, delta) = step_at_index(lattice, i, self.temperature, rng);

        self.proposed += 1;
        if accepted {
            self.accepted += 1;
            if let Some(e) = self.energy.as_mut() {
                *e += delta;
            }
        }
        StepOutcome {
            site,
            accepted,
            delta,
        }
    }

    /// `n_steps` micro-steps. Returns how many were accepted.
    #[cfg_attr(feature = "profile", inline(never))]
    pub fn sweep(&mut self, lattice: &mut Lattice, rng: &mut RandomSource, n_steps: usize) -> usize {
        let mut n_accepted = 0;
        for _ in 0..n_steps {
            if self.step(lattice, rng).accepted {
                n_accepted += 1;
            }
        }
        n_accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, IsingError};
    use crate::spins::energy::energy_delta;

    #[test]
    fn downhill_always_accepted() {
        let t = Temperature::new(0.01).unwrap();
        let mut rng = RandomSource::seed_from_u64(0);
        let before = rng.clone();
        for delta in [-1e-12, -4.0, -16.0] {
            assert!(accept(delta, t, &mut rng));
        }
        // no uniform was consumed
        assert_eq!(rng, before);
    }

    #[test]
    fn uphill_draws_once() {
        let t = Temperature::new(2.0).unwrap();
        let mut rng = RandomSource::seed_from_u64(4);
        let mut reference = rng.clone();
        let accepted = accept(8.0, t, &mut rng);
        let u = reference.uniform();
        assert_eq!(accepted, (-4.0f64).exp() > u);
        assert_eq!(rng, reference);
    }

    #[test]
    fn acceptance_frequency() {
        let mut rng = RandomSource::seed_from_u64(123);
        let n = 200_000;
        for (delta, t) in [(0.0, 1.0), (4.0, 2.5), (8.0, 4.0), (16.0, 3.0)] {
            let temp = Temperature::new(t).unwrap();
            let p: f64 = (-delta / t).exp();
            let hits = (0..n).filter(|_| accept(delta, temp, &mut rng)).count();
            let freq = hits as f64 / n as f64;
            let sigma = (p * (1.0 - p) / n as f64).sqrt().max(1e-6);
            assert!(
                (freq - p).abs() < 5.0 * sigma,
                "delta={delta} T={t}: freq {freq} vs p {p}"
            );
        }
    }

    #[test]
    fn step_at_site() {
        let mut lat = Lattice::all_up(4).unwrap();
        let mut rng = RandomSource::seed_from_u64(1);
        // At very high temperature an uphill corner flip is almost surely taken;
        // check the outcome is consistent with the lattice either way.
        let out = metropolis_step_at(&mut lat, (0, 0).into(), 1e9, &mut rng).unwrap();
        assert_eq!(out.delta, 8.0);
        assert_eq!(lat.get((0, 0).into()).unwrap() == -1, out.accepted);

        // Flipping it back is downhill and must be accepted.
        if out.accepted {
            let back = metropolis_step_at(&mut lat, (0, 0).into(), 0.1, &mut rng).unwrap();
            assert!(back.accepted);
            assert_eq!(back.delta, -8.0);
            assert_eq!(lat, Lattice::all_up(4).unwrap());
        }
    }

    #[test]
    fn rejects_bad_input() {
        let mut lat = Lattice::all_up(3).unwrap();
        let mut rng = RandomSource::seed_from_u64(1);
        assert_eq!(
            metropolis_step(&mut lat, 0.0, &mut rng).unwrap_err(),
            IsingError::InvalidTemperature(0.0)
        );
        let err = metropolis_step_at(&mut lat, (3, 3).into(), 1.0, &mut rng).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(lat, Lattice::all_up(3).unwrap());
        assert!(MetropolisEngine::new(-2.0).is_err());
    }

    #[test]
    fn rejected_step_leaves_lattice() {
        let mut lat = Lattice::all_up(5).unwrap();
        let mut rng = RandomSource::seed_from_u64(8);
        for _ in 0..200 {
            let before = lat.clone();
            let out = metropolis_step(&mut lat, 0.05, &mut rng).unwrap();
            if !out.accepted {
                assert_eq!(lat, before);
            }
        }
    }

    #[test]
    fn tracked_energy_stays_exact() {
        let mut rng = RandomSource::seed_from_u64(77);
        let mut lat = Lattice::random(12, 0.5, &mut rng).unwrap();
        let mut engine = MetropolisEngine::new(2.2).unwrap().tracking_energy(&lat);
        for _ in 0..50 {
            engine.sweep(&mut lat, &mut rng, 100);
            assert_eq!(engine.energy().unwrap(), total_energy(&lat));
        }
        assert_eq!(engine.proposed(), 5000);
        assert!(engine.accepted() > 0 && engine.accepted() < 5000);
        assert!(engine.acceptance_rate() > 0.0 && engine.acceptance_rate() < 1.0);
    }

    #[test]
    fn step_reports_delta_before_flip() {
        let mut rng = RandomSource::seed_from_u64(5);
        let mut lat = Lattice::random(6, 0.5, &mut rng).unwrap();
        let mut engine = MetropolisEngine::new(1.5).unwrap();
        for _ in 0..100 {
            let before = lat.clone();
            let out = engine.step(&mut lat, &mut rng);
            assert_eq!(out.delta, energy_delta(&before, out.site).unwrap());
        }
    }

    #[test]
    fn same_seed_same_chain() {
        let run = || {
            let mut rng = RandomSource::seed_from_u64(2);
            let mut lat = Lattice::all_up(8).unwrap();
            let mut engine = MetropolisEngine::new(3.0).unwrap();
            let outs: Vec<_> = (0..500).map(|_| engine.step(&mut lat, &mut rng)).collect();
            (lat, outs)
        };
        assert_eq!(run(), run());
    }
}
