use crate::error::Result;
use crate::geometry::{Lattice, Site};

/// Factor applied to each bond term `-s_i * s_j` in [`total_energy`].
pub const PAIR_SCALE: f64 = 2.0;

/// Factor in [`energy_delta`]. Flipping `s_i` turns every bond term touching
/// `i` from `-s_i s_j` into `+s_i s_j`, so each changes by `2 * PAIR_SCALE * s_i s_j`.
pub const FLIP_SCALE: f64 = 2.0 * PAIR_SCALE;

/// Total interaction energy with open boundary conditions.
///
/// Each adjacent pair is counted once by pairing every site with its forward
/// neighbor in both dimensions. Works on any rectangular lattice.
pub fn total_energy(lattice: &Lattice) -> f64 {
    let spins = lattice.spins();
    let mut total = 0i64;

    #[allow(clippy::needless_range_loop)]
    for i in 0..lattice.n_spins() {
        let si = spins[i] as i64;
        for d in 0..2 {
            if let Some(j) = lattice.neighbor(i, d, true) {
                total -= si * spins[j] as i64;
            }
        }
    }

    PAIR_SCALE * total as f64
}

/// [`total_energy`] computed from shifted slices instead of a neighbor loop.
///
/// Vertical bonds pair rows `0..N-1` with rows `1..N`; horizontal bonds pair
/// adjacent entries within each row. Kept as an independent cross-check.
pub fn total_energy_bulk(lattice: &Lattice) -> f64 {
    let spins = lattice.spins();
    let cols = lattice.cols();

    let vertical: i64 = spins[..spins.len() - cols]
        .iter()
        .zip(&spins[cols..])
        .map(|(&a, &b)| (a * b) as i64)
        .sum();
    let horizontal: i64 = spins
        .chunks_exact(cols)
        .flat_map(|row| row.windows(2))
        .map(|w| (w[0] * w[1]) as i64)
        .sum();

    PAIR_SCALE * -(vertical + horizontal) as f64
}

/// [`total_energy`] divided by the number of sites.
pub fn energy_per_site(lattice: &Lattice) -> f64 {
    total_energy(lattice) / lattice.n_spins() as f64
}

/// Sum of the in-bounds neighbor spins of flat index `i`.
#[inline]
pub(crate) fn local_field(lattice: &Lattice, i: usize) -> i32 {
    let spins = lattice.spins();
    let mut h = 0i32;
    for d in 0..2 {
        if let Some(j) = lattice.neighbor(i, d, true) {
            h += spins[j] as i32;
        }
        if let Some(j) = lattice.neighbor(i, d, false) {
            h += spins[j] as i32;
        }
    }
    h
}

/// Energy change from flipping flat index `i`. No bounds check beyond slice
/// indexing.
#[inline]
pub(crate) fn delta_at(lattice: &Lattice, i: usize) -> f64 {
    let si = lattice.spins()[i] as i32;
    FLIP_SCALE * (si * local_field(lattice, i)) as f64
}

/// Change in [`total_energy`] if the spin at `site` were flipped.
///
/// O(1): only the (up to four) neighbors of `site` are read, and the lattice
/// is not modified.
pub fn energy_delta(lattice: &Lattice, site: Site) -> Result<f64> {
    let i = lattice.index_of(site)?;
    Ok(delta_at(lattice, i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::rng::RandomSource;
    use approx::assert_relative_eq;

    fn uniform_energy(n: usize) -> f64 {
        let l = n as f64;
        -(4.0 * (l - 2.0).powi(2) + 12.0 * (l - 2.0) + 8.0)
    }

    #[test]
    fn closed_form_uniform() {
        for n in [2, 3, 4, 10, 100] {
            let up = Lattice::all_up(n).unwrap();
            let down = Lattice::all_down(n).unwrap();
            assert_eq!(total_energy(&up), uniform_energy(n));
            assert_eq!(total_energy(&down), uniform_energy(n));
        }
        assert_eq!(total_energy(&Lattice::all_up(4).unwrap()), -48.0);
    }

    #[test]
    fn single_site_has_no_bonds() {
        let lat = Lattice::all_up(1).unwrap();
        assert_eq!(total_energy(&lat), 0.0);
        assert_eq!(total_energy_bulk(&lat), 0.0);
        assert_eq!(energy_delta(&lat, (0, 0).into()).unwrap(), 0.0);
    }

    #[test]
    fn corner_delta() {
        let lat = Lattice::all_up(4).unwrap();
        assert_eq!(energy_delta(&lat, (0, 0).into()).unwrap(), 8.0);
        assert_eq!(energy_delta(&lat, (0, 1).into()).unwrap(), 12.0);
        assert_eq!(energy_delta(&lat, (1, 1).into()).unwrap(), 16.0);
    }

    #[test]
    fn delta_out_of_bounds() {
        let lat = Lattice::all_up(4).unwrap();
        let err = energy_delta(&lat, (0, 4).into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn implementations_agree() {
        let mut rng = RandomSource::seed_from_u64(2024);
        let fixed = Lattice::from_rows(&[
            [1i8, 1, -1, -1, 1],
            [-1, 1, 1, -1, -1],
            [1, -1, -1, 1, 1],
            [1, 1, -1, 1, -1],
        ])
        .unwrap();
        let lattices = [
            Lattice::all_up(100).unwrap(),
            Lattice::all_down(100).unwrap(),
            Lattice::random(100, 0.5, &mut rng).unwrap(),
            fixed,
        ];
        for lat in &lattices {
            assert_relative_eq!(total_energy(lat), total_energy_bulk(lat));
        }
    }

    #[test]
    fn checkerboard_is_maximal() {
        let n = 6;
        let spins = (0..n * n)
            .map(|i| if (i / n + i % n) % 2 == 0 { 1 } else { -1 })
            .collect();
        let lat = Lattice::from_spins(n, n, spins).unwrap();
        assert_eq!(total_energy(&lat), -uniform_energy(n));
    }

    #[test]
    fn delta_matches_recomputation_everywhere() {
        let mut rng = RandomSource::seed_from_u64(99);
        let lat = Lattice::random(7, 0.4, &mut rng).unwrap();
        let e0 = total_energy(&lat);
        for i in 0..lat.n_spins() {
            let site = lat.site_of(i);
            let mut flipped = lat.clone();
            flipped.flip(site).unwrap();
            assert_eq!(
                total_energy(&flipped),
                e0 + energy_delta(&lat, site).unwrap()
            );
        }
    }

    #[test]
    fn per_site() {
        let lat = Lattice::all_up(4).unwrap();
        assert_relative_eq!(energy_per_site(&lat), -3.0);
    }
}
