//! Domain Value Objects
//!
//! Immutable objects that represent concepts in the domain
//! with no conceptual identity, only defined by their attributes.

mod callback_name;
mod geo_point;
mod payload;

pub use callback_name::CallbackName;
pub use geo_point::{EARTH_MEAN_RADIUS_KM, GeoPoint};
pub use payload::Payload;
