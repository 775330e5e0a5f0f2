use crate::error::{IsingError, Result};
use crate::rng::RandomSource;

/// A lattice coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Site {
    pub row: usize,
    pub col: usize,
}

impl From<(usize, usize)> for Site {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// Which factory [`make_lattice`] should use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LatticeKind {
    AllUp,
    AllDown,
    /// Each cell is +1 with probability `up_fraction`.
    Random { up_fraction: f64 },
}

/// Rectangular grid of ±1 spins with open boundary conditions.
///
/// Sites are stored in row-major order: site `(r, c)` lives at flat index
/// `r * cols + c`. Dimension 0 runs down the rows, dimension 1 along the
/// columns. Every stored value is exactly +1 or -1 and the shape never changes
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lattice {
    rows: usize,
    cols: usize,
    spins: Vec<i8>,
}

impl Lattice {
    /// N×N lattice of +1 spins.
    pub fn all_up(n: usize) -> Result<Self> {
        Self::filled(n, n, 1)
    }

    /// N×N lattice of -1 spins.
    pub fn all_down(n: usize) -> Result<Self> {
        Self::filled(n, n, -1)
    }

    /// N×N lattice where every cell is independently +1 with probability
    /// `up_fraction` and -1 otherwise.
    ///
    /// One Bernoulli draw per cell in row-major order, so the number of up
    /// spins is only `up_fraction * N²` on average.
    pub fn random(n: usize, up_fraction: f64, rng: &mut RandomSource) -> Result<Self> {
        if !(0.0..=1.0).contains(&up_fraction) {
            return Err(IsingError::InvalidUpFraction(up_fraction));
        }
        check_dims(n, n)?;
        let spins = (0..n * n)
            .map(|_| if rng.bernoulli(up_fraction) { 1 } else { -1 })
            .collect();
        Ok(Self {
            rows: n,
            cols: n,
            spins,
        })
    }

    /// Wrap externally supplied row-major spins.
    pub fn from_spins(rows: usize, cols: usize, spins: Vec<i8>) -> Result<Self> {
        check_dims(rows, cols)?;
        if spins.len() != rows * cols {
            return Err(IsingError::SpinCountMismatch {
                rows,
                cols,
                expected: rows * cols,
                actual: spins.len(),
            });
        }
        if let Some((index, &value)) = spins
            .iter()
            .enumerate()
            .find(|&(_, &s)| s != 1 && s != -1)
        {
            return Err(IsingError::InvalidSpin { index, value });
        }
        Ok(Self { rows, cols, spins })
    }

    /// Build from a slice of equally long rows.
    pub fn from_rows<R: AsRef<[i8]>>(rows: &[R]) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.as_ref().len());
        check_dims(n_rows, n_cols)?;

        let mut spins = Vec::with_capacity(n_rows * n_cols);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != n_cols {
                return Err(IsingError::RaggedRows {
                    row,
                    len: r.len(),
                    expected: n_cols,
                });
            }
            spins.extend_from_slice(r);
        }
        Self::from_spins(n_rows, n_cols, spins)
    }

    fn filled(rows: usize, cols: usize, spin: i8) -> Result<Self> {
        check_dims(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            spins: vec![spin; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn n_spins(&self) -> usize {
        self.spins.len()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major spin values.
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    /// One row of spins. Panics if `r >= rows`, like slice indexing.
    pub fn row(&self, r: usize) -> &[i8] {
        &self.spins[r * self.cols..(r + 1) * self.cols]
    }

    pub fn contains(&self, site: Site) -> bool {
        site.row < self.rows && site.col < self.cols
    }

    /// Flat index of `site`, or `SiteOutOfBounds`.
    pub fn index_of(&self, site: Site) -> Result<usize> {
        if !self.contains(site) {
            return Err(IsingError::SiteOutOfBounds {
                row: site.row,
                col: site.col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(site.row * self.cols + site.col)
    }

    pub fn site_of(&self, flat_idx: usize) -> Site {
        Site {
            row: flat_idx / self.cols,
            col: flat_idx % self.cols,
        }
    }

    pub fn get(&self, site: Site) -> Result<i8> {
        Ok(self.spins[self.index_of(site)?])
    }

    /// Flip the spin at `site` in place.
    pub fn flip(&mut self, site: Site) -> Result<()> {
        let idx = self.index_of(site)?;
        self.flip_at(idx);
        Ok(())
    }

    #[inline]
    pub(crate) fn flip_at(&mut self, flat_idx: usize) {
        self.spins[flat_idx] = -self.spins[flat_idx];
    }

    /// Copy with every spin reversed.
    pub fn inverted(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            spins: self.spins.iter().map(|&s| -s).collect(),
        }
    }

    /// Mean spin, in `[-1, 1]`.
    pub fn magnetisation(&self) -> f64 {
        let sum: i64 = self.spins.iter().map(|&s| s as i64).sum();
        sum as f64 / self.spins.len() as f64
    }

    /// Neighbor of `flat_idx` in dimension `dim` (0 = rows, 1 = columns).
    /// `forward = true` means the +1 direction. Returns `None` past an edge:
    /// boundaries are open, nothing wraps.
    #[inline]
    pub fn neighbor(&self, flat_idx: usize, dim: usize, forward: bool) -> Option<usize> {
        let (stride, size) = if dim == 0 {
            (self.cols, self.rows)
        } else {
            (1, self.cols)
        };
        let coord = (flat_idx / stride) % size;

        if forward {
            (coord + 1 < size).then(|| flat_idx + stride)
        } else {
            (coord > 0).then(|| flat_idx - stride)
        }
    }

    /// In-bounds neighbors of `site`: up to four, fewer on edges and corners.
    pub fn neighbors(&self, site: Site) -> Result<Vec<Site>> {
        let idx = self.index_of(site)?;
        let mut out = Vec::with_capacity(4);
        for dim in 0..2 {
            for forward in [false, true] {
                if let Some(j) = self.neighbor(idx, dim, forward) {
                    out.push(self.site_of(j));
                }
            }
        }
        Ok(out)
    }
}

/// Build an N×N lattice of the requested kind.
///
/// `rng` is only consulted for [`LatticeKind::Random`], which fails with
/// `MissingRandomSource` when it is `None`.
pub fn make_lattice(kind: LatticeKind, n: usize, rng: Option<&mut RandomSource>) -> Result<Lattice> {
    match kind {
        LatticeKind::AllUp => Lattice::all_up(n),
        LatticeKind::AllDown => Lattice::all_down(n),
        LatticeKind::Random { up_fraction } => {
            let rng = rng.ok_or(IsingError::MissingRandomSource)?;
            Lattice::random(n, up_fraction, rng)
        }
    }
}

fn check_dims(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(IsingError::EmptyLattice { rows, cols });
    }
    Ok(())
}
