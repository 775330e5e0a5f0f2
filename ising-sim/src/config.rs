use validator::{Validate, ValidationError};

use crate::error::{IsingError, Result};

/// A finite, strictly positive temperature.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature(f64);

impl Temperature {
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(IsingError::InvalidTemperature(value));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Temperature {
    type Error = IsingError;
    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

fn valid_temperature(t: f64) -> bool {
    t.is_finite() && t > 0.0
}

fn validate_trajectory_config(cfg: &TrajectoryConfig) -> std::result::Result<(), ValidationError> {
    if cfg.steps < 1 {
        return Err(ValidationError::new("steps must be >= 1"));
    }
    if cfg.stepsize == Some(0) {
        return Err(ValidationError::new("stepsize must be >= 1"));
    }
    if !valid_temperature(cfg.temperature) {
        return Err(ValidationError::new("temperature must be finite and > 0"));
    }
    Ok(())
}

/// Parameters of one trajectory.
#[derive(Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "validate_trajectory_config"))]
pub struct TrajectoryConfig {
    /// Number of snapshots emitted.
    pub steps: usize,
    /// Micro-steps between snapshots. `None` means one per site.
    pub stepsize: Option<usize>,
    pub temperature: f64,
}

impl TrajectoryConfig {
    pub fn new(steps: usize, temperature: f64) -> Self {
        Self {
            steps,
            stepsize: None,
            temperature,
        }
    }

    pub fn with_stepsize(mut self, stepsize: usize) -> Self {
        self.stepsize = Some(stepsize);
        self
    }

    /// `stepsize`, falling back to `n_spins` micro-steps per snapshot.
    pub fn stepsize_for(&self, n_spins: usize) -> usize {
        self.stepsize.unwrap_or(n_spins)
    }

    /// Validate, reporting a bad temperature as `InvalidTemperature`.
    pub fn check(&self) -> Result<Temperature> {
        let temperature = Temperature::new(self.temperature)?;
        self.validate()?;
        Ok(temperature)
    }
}

fn validate_walker_config(cfg: &WalkerConfig) -> std::result::Result<(), ValidationError> {
    if cfg.temperatures.is_empty() {
        return Err(ValidationError::new("temperatures must not be empty"));
    }
    if !cfg.temperatures.iter().all(|&t| valid_temperature(t)) {
        return Err(ValidationError::new(
            "every temperature must be finite and > 0",
        ));
    }
    if cfg.n_repeats < 1 {
        return Err(ValidationError::new("n_repeats must be >= 1"));
    }
    if cfg.steps < 1 {
        return Err(ValidationError::new("steps must be >= 1"));
    }
    if cfg.stepsize == Some(0) {
        return Err(ValidationError::new("stepsize must be >= 1"));
    }
    Ok(())
}

/// Repeated independent trajectories over a set of temperatures.
#[derive(Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "validate_walker_config"))]
pub struct WalkerConfig {
    pub temperatures: Vec<f64>,
    /// Walkers per temperature.
    pub n_repeats: usize,
    pub steps: usize,
    pub stepsize: Option<usize>,
    /// Walker `k` (temperature-major) is seeded with `base_seed + k`.
    pub base_seed: u64,
    /// Largest lag of the magnetisation autocorrelation; `None` skips it.
    pub autocorrelation_max_lag: Option<usize>,
    /// Run walkers on the current thread instead of the rayon pool.
    pub sequential: bool,
}

impl WalkerConfig {
    pub fn trajectory(&self, temperature: f64) -> TrajectoryConfig {
        TrajectoryConfig {
            steps: self.steps,
            stepsize: self.stepsize,
            temperature,
        }
    }
}
