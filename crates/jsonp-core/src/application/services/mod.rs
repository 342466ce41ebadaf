//! Application services

pub mod proximity;

pub use proximity::{NeighbourLink, ProximityAnalyzer, ProximityReport};
