//! Seismic catalog entries
//!
//! Mirrors the GeoJSON shape returned by FDSN event endpoints with
//! `format=json`. Fields the catalog adds beyond these are ignored.

use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// Top-level FDSN GeoJSON response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Catalog entries, newest first as served
    #[serde(default)]
    pub features: Vec<Quake>,
}

/// A single catalog event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quake {
    /// Catalog identifier
    pub id: String,
    /// Event attributes
    pub properties: QuakeProperties,
}

/// Attributes of a catalog event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuakeProperties {
    /// Latitude, degrees
    pub lat: f64,
    /// Longitude, degrees
    pub lon: f64,
    /// Magnitude
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mag: Option<f64>,
    /// Hypocentre depth, km
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    /// Origin time as served (ISO-8601)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Flinn-Engdahl region name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flynn_region: Option<String>,
}

impl Quake {
    /// Epicentre
    #[must_use]
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.properties.lat, self.properties.lon)
    }

    /// One-line summary, e.g. `M4.2 - Depth: 10km`
    #[must_use]
    pub fn summary(&self) -> String {
        let mag = self
            .properties
            .mag
            .map_or_else(|| "?".to_string(), |m| m.to_string());
        let depth = self
            .properties
            .depth
            .map_or_else(|| "?".to_string(), |d| d.to_string());
        format!("M{mag} - Depth: {depth}km")
    }
}
