/// Streaming autocorrelation of several observable series.
///
/// Computes the normalized autocorrelation function Γ(δ), δ = 0..=max_lag,
/// for each series (one per temperature in the walker driver) without storing
/// the full history. Memory is O(max_lag × n_series).
#[derive(Debug, Clone)]
pub struct AutocorrAccum {
    max_lag: usize,
    n_series: usize,
    /// Ring buffer of the last `max_lag + 1` values, shape [n_series][max_lag+1].
    ring: Vec<Vec<f64>>,
    /// Running sum of o, shape [n_series].
    sum_o: Vec<f64>,
    /// Running sum of o², shape [n_series].
    sum_o2: Vec<f64>,
    /// Running sum of o(t)·o(t−δ), shape [n_series][max_lag+1].
    sum_prod: Vec<Vec<f64>>,
    n_recorded: usize,
    ring_pos: usize,
}

impl AutocorrAccum {
    /// `max_lag` is raised to at least 1.
    pub fn new(max_lag: usize, n_series: usize) -> Self {
        let max_lag = max_lag.max(1);
        Self {
            max_lag,
            n_series,
            ring: (0..n_series).map(|_| vec![0.0; max_lag + 1]).collect(),
            sum_o: vec![0.0; n_series],
            sum_o2: vec![0.0; n_series],
            sum_prod: (0..n_series).map(|_| vec![0.0; max_lag + 1]).collect(),
            n_recorded: 0,
            ring_pos: 0,
        }
    }

    /// Push one value per series.
    #[allow(clippy::needless_range_loop)]
    pub fn push(&mut self, values: &[f64]) {
        let pos = self.ring_pos;
        let cap = self.max_lag + 1;
        let n_back = self.n_recorded.min(self.max_lag);
        for t in 0..self.n_series {
            let o = values[t];
            self.ring[t][pos] = o;
            self.sum_o[t] += o;
            self.sum_o2[t] += o * o;

            for delta in 0..=n_back {
                let idx = (pos + cap - delta) % cap;
                self.sum_prod[t][delta] += o * self.ring[t][idx];
            }
        }
        self.n_recorded += 1;
        self.ring_pos = (pos + 1) % cap;
    }

    pub fn n_recorded(&self) -> usize {
        self.n_recorded
    }

    /// Γ(δ) per series, shape [n_series][max_lag+1].
    pub fn finish(&self) -> Vec<Vec<f64>> {
        let m = self.n_recorded as f64;
        (0..self.n_series)
            .map(|t| {
                let mean = self.sum_o[t] / m;
                let var = self.sum_o2[t] / m - mean * mean;
                (0..=self.max_lag)
                    .map(|delta| {
                        let count = self.n_recorded.saturating_sub(delta) as f64;
                        let scale = (self.sum_o2[t] / m).max(f64::MIN_POSITIVE);
                        if count <= 0.0 || var <= 1e-12 * scale {
                            return if delta == 0 { 1.0 } else { 0.0 };
                        }
                        (self.sum_prod[t][delta] / count - mean * mean) / var
                    })
                    .collect()
            })
            .collect()
    }
}

/// Integrated autocorrelation time with Sokal's self-consistent window
/// (stop at the first W ≥ 5τ).
pub fn sokal_tau(gamma: &[f64]) -> f64 {
    let mut tau = 0.5;
    for (w, &g) in gamma.iter().enumerate().skip(1) {
        tau += g;
        if w as f64 >= 5.0 * tau {
            return tau;
        }
    }
    tau
}

/// Γ(δ) of a complete series, computed directly.
pub fn autocorrelation(series: &[f64], max_lag: usize) -> Vec<f64> {
    let mut acc = AutocorrAccum::new(max_lag, 1);
    for &o in series {
        acc.push(&[o]);
    }
    acc.finish().swap_remove(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn constant_series() {
        let g = autocorrelation(&[0.3; 50], 4);
        assert_eq!(g, vec![1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(sokal_tau(&g), 0.5);
    }

    #[test]
    fn alternating_series() {
        let series: Vec<f64> = (0..1000).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let g = autocorrelation(&series, 3);
        assert_abs_diff_eq!(g[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(g[1], -1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(g[2], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn matches_direct_estimate() {
        // slowly varying deterministic series
        let series: Vec<f64> = (0..400).map(|i| (i as f64 * 0.05).sin()).collect();
        let max_lag = 6;
        let g = autocorrelation(&series, max_lag);

        let n = series.len() as f64;
        let mean = series.iter().sum::<f64>() / n;
        let var = series.iter().map(|x| x * x).sum::<f64>() / n - mean * mean;
        for delta in 1..=max_lag {
            let pairs = series.len() - delta;
            let prod: f64 = (delta..series.len())
                .map(|t| series[t] * series[t - delta])
                .sum();
            let expected = (prod / pairs as f64 - mean * mean) / var;
            assert_abs_diff_eq!(g[delta], expected, epsilon = 1e-9);
        }
        assert!(sokal_tau(&g) > 1.0);
    }

    #[test]
    fn several_series() {
        let mut acc = AutocorrAccum::new(2, 2);
        for i in 0..100 {
            acc.push(&[1.0, if i % 2 == 0 { 1.0 } else { -1.0 }]);
        }
        assert_eq!(acc.n_recorded(), 100);
        let g = acc.finish();
        assert_eq!(g.len(), 2);
        assert_eq!(g[0][1], 0.0);
        assert!(g[1][1] < -0.9);
    }
}
