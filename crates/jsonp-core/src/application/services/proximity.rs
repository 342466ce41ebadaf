//! Nearest-neighbour analysis over a catalog snapshot
//!
//! Every quake is compared against every other one, so the work is
//! quadratic in the snapshot size; quakes are processed in parallel.

use jsonp_domain::{GeoPoint, Quake};
use rayon::prelude::*;
use serde::Serialize;

/// A neighbouring quake and its distance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighbourLink {
    /// The neighbouring quake
    pub to: Quake,
    /// Great-circle distance from the reported quake
    pub distance_km: f64,
}

/// Closest neighbours of one quake
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityReport {
    /// Catalog id of the reported quake
    pub quake_id: String,
    /// Its epicentre
    pub quake_location: GeoPoint,
    /// Nearest first
    #[serde(rename = "closest_3")]
    pub closest: Vec<NeighbourLink>,
    /// Mean position of `closest`; `None` when there are no neighbours
    pub center_coordinates: Option<GeoPoint>,
}

/// Computes [`ProximityReport`]s
#[derive(Debug, Clone, Copy)]
pub struct ProximityAnalyzer {
    neighbours: usize,
}

impl Default for ProximityAnalyzer {
    fn default() -> Self {
        Self { neighbours: 3 }
    }
}

impl ProximityAnalyzer {
    /// Analyzer keeping `neighbours` nearest quakes per report
    pub fn new(neighbours: usize) -> Self {
        Self { neighbours }
    }

    /// Neighbours kept per report
    pub fn neighbours(&self) -> usize {
        self.neighbours
    }

    /// One report per quake, in input order
    pub fn analyze(&self, quakes: &[Quake]) -> Vec<ProximityReport> {
        (0..quakes.len())
            .into_par_iter()
            .map(|i| self.report_for(i, quakes))
            .collect()
    }

    fn report_for(&self, index: usize, quakes: &[Quake]) -> ProximityReport {
        let quake = &quakes[index];
        let origin = quake.location();

        let mut links: Vec<NeighbourLink> = quakes
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .map(|(_, other)| NeighbourLink {
                distance_km: origin.distance_km(&other.location()),
                to: other.clone(),
            })
            .collect();

        links.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        links.truncate(self.neighbours);

        let locations: Vec<GeoPoint> = links.iter().map(|l| l.to.location()).collect();

        ProximityReport {
            quake_id: quake.id.clone(),
            quake_location: origin,
            center_coordinates: GeoPoint::centroid(&locations),
            closest: links,
        }
    }
}
