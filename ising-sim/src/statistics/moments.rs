/// First and second running moments of one observable, kept per temperature.
///
/// The walker driver records one row per snapshot index, holding the value of
/// every temperature for a single repeat.
#[derive(Debug, Clone, Default)]
pub struct Moments {
    samples: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl Moments {
    pub fn new(n_temps: usize) -> Self {
        Self {
            samples: 0,
            sum: vec![0.0; n_temps],
            sum_sq: vec![0.0; n_temps],
        }
    }

    /// Add one value per temperature.
    pub fn record(&mut self, row: &[f64]) {
        debug_assert_eq!(row.len(), self.sum.len());
        self.samples += 1;
        for ((s, s2), &x) in self.sum.iter_mut().zip(self.sum_sq.iter_mut()).zip(row) {
            *s += x;
            *s2 += x * x;
        }
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// ⟨x⟩ per temperature; zeros before anything is recorded.
    pub fn mean(&self) -> Vec<f64> {
        self.scaled(&self.sum)
    }

    /// ⟨x²⟩ per temperature.
    pub fn mean_square(&self) -> Vec<f64> {
        self.scaled(&self.sum_sq)
    }

    fn scaled(&self, totals: &[f64]) -> Vec<f64> {
        let n = self.samples.max(1) as f64;
        totals.iter().map(|t| t / n).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_and_mean_square() {
        let mut acc = Moments::new(2);
        for row in [[1.0, -0.5], [0.0, -0.5], [-1.0, 1.0]] {
            acc.record(&row);
        }
        assert_eq!(acc.samples(), 3);
        let mean = acc.mean();
        assert_relative_eq!(mean[0], 0.0);
        assert_relative_eq!(mean[1], 0.0);
        let sq = acc.mean_square();
        assert_relative_eq!(sq[0], 2.0 / 3.0);
        assert_relative_eq!(sq[1], 0.5);
    }

    #[test]
    fn nothing_recorded() {
        let acc = Moments::new(3);
        assert_eq!(acc.samples(), 0);
        assert_eq!(acc.mean(), vec![0.0; 3]);
        assert_eq!(acc.mean_square(), vec![0.0; 3]);
    }
}
