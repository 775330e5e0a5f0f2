/// Observables recorded by [`run_walkers`](crate::simulation::run_walkers).
///
/// Trace arrays have shape `[n_temps][n_repeats][steps]`; summaries are
/// indexed by temperature and averaged over every snapshot of every repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkerResults {
    pub temperatures: Vec<f64>,
    /// Flip axis of the traces: `k * stepsize` for snapshot `k`.
    pub flips: Vec<usize>,
    /// Mean spin of each snapshot.
    pub magnetisation: Vec<Vec<Vec<f64>>>,
    /// Energy per site of each snapshot.
    pub energy: Vec<Vec<Vec<f64>>>,
    /// Fraction of accepted proposals per walker, shape `[n_temps][n_repeats]`.
    pub acceptance_rate: Vec<Vec<f64>>,
    /// ⟨m⟩.
    pub mags: Vec<f64>,
    /// ⟨m²⟩.
    pub mags2: Vec<f64>,
    /// ⟨E/N⟩.
    pub energies: Vec<f64>,
    /// ⟨(E/N)²⟩.
    pub energies2: Vec<f64>,
    /// Normalized autocorrelation Γ(δ) of m², shape [n_temps][max_lag+1],
    /// averaged over repeats. Empty if autocorrelation_max_lag is None.
    pub mags2_autocorrelation: Vec<Vec<f64>>,
    /// Sokal integrated autocorrelation time of m², in snapshots.
    pub mags2_tau: Vec<f64>,
}

impl WalkerResults {
    /// Magnetisation trace averaged over repeats, shape `[n_temps][steps]`.
    pub fn mean_magnetisation(&self) -> Vec<Vec<f64>> {
        self.magnetisation
            .iter()
            .map(|repeats| {
                let n = repeats.len() as f64;
                let steps = repeats.first().map_or(0, |r| r.len());
                (0..steps)
                    .map(|k| repeats.iter().map(|r| r[k]).sum::<f64>() / n)
                    .collect()
            })
            .collect()
    }
}
