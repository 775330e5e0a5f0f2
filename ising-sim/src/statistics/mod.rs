pub mod autocorrelation;
pub mod results;
mod moments;

pub use autocorrelation::{autocorrelation, sokal_tau, AutocorrAccum};
pub use results::WalkerResults;
pub use moments::Moments;
