//! Application layer - analysis over domain data

pub mod services;

pub use services::{NeighbourLink, ProximityAnalyzer, ProximityReport};
