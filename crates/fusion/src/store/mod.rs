//! Typed stores: one per record kind, each merging updates from any number
//! of producers and publishing its fused state once per serve cycle.

mod aircraft;
mod atmosphere;
mod gps;
mod wind;

pub use aircraft::{AircraftStore, DELETE_THRESHOLD, NO_FLARM_THRESHOLD};
pub use atmosphere::AtmosphereStore;
pub use gps::{GpsStore, GpsUpdate};
pub use wind::WindStore;

/// Receives `(record, sentence)` once per record and cycle.
///
/// Runs with the record's lock held, so it must return quickly and must not
/// call back into the store.
pub type Publish<R> = Box<dyn Fn(&R, &str) + Send + Sync>;
