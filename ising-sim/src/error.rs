use thiserror::Error;

/// Broad class of an [`IsingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad lattice dimensions, spin values, or site coordinates.
    InvalidInput,
    /// Supplied data does not form a rectangular lattice of the stated shape.
    Shape,
    /// Out-of-range simulation parameters.
    Config,
}

/// Errors reported at the boundary of the offending call.
///
/// Nothing is clamped or corrected: a trajectory that hits one of these
/// never starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsingError {
    #[error("lattice dimensions must be positive, got {rows}x{cols}")]
    EmptyLattice { rows: usize, cols: usize },

    #[error("site ({row}, {col}) is outside the {rows}x{cols} lattice")]
    SiteOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("spin at index {index} is {value}, expected +1 or -1")]
    InvalidSpin { index: usize, value: i8 },

    #[error("a {rows}x{cols} lattice needs {expected} spins, got {actual}")]
    SpinCountMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} has {len} spins, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("temperature must be finite and strictly positive, got {0}")]
    InvalidTemperature(f64),

    #[error("up_fraction must lie in [0, 1], got {0}")]
    InvalidUpFraction(f64),

    #[error("a random lattice needs a random source")]
    MissingRandomSource,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl IsingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyLattice { .. } | Self::SiteOutOfBounds { .. } | Self::InvalidSpin { .. } => {
                ErrorKind::InvalidInput
            }
            Self::SpinCountMismatch { .. } | Self::RaggedRows { .. } => ErrorKind::Shape,
            Self::InvalidTemperature(_)
            | Self::InvalidUpFraction(_)
            | Self::MissingRandomSource
            | Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<validator::ValidationErrors> for IsingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Config(format!("{errors}"))
    }
}

pub type Result<T> = std::result::Result<T, IsingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let oob = IsingError::SiteOutOfBounds {
            row: 4,
            col: 0,
            rows: 4,
            cols: 4,
        };
        assert_eq!(oob.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            IsingError::RaggedRows {
                row: 1,
                len: 2,
                expected: 3
            }
            .kind(),
            ErrorKind::Shape
        );
        assert_eq!(IsingError::InvalidTemperature(0.0).kind(), ErrorKind::Config);
        assert_eq!(
            oob.to_string(),
            "site (4, 0) is outside the 4x4 lattice"
        );
    }
}
