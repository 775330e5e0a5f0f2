pub mod lattice;

pub use lattice::{make_lattice, Lattice, LatticeKind, Site};
