//! Turns fused records into broadcast sentences.

mod aircraft;
mod gps;

pub use aircraft::{AircraftSerializer, Reference};
pub use gps::GpsSerializer;
