//! Fused aircraft and environment state for the flightbridge service.
//!
//! Producers push decoded reports into typed stores; each store arbitrates
//! between competing sources so that a record never regresses to staler or
//! lower-priority data. Once per cycle the driving loop calls `access` on
//! every store, which ages the records, evicts the dead ones and publishes a
//! freshly generated sentence per record.
//!
//! ```
//! use flightbridge_fusion::{
//!     AircraftKind, AircraftStore, AircraftTrack, IdKind, Location, SourceKind, Timestamp,
//! };
//!
//! let store = AircraftStore::new(50_000, |_track, sentence| print!("{sentence}"));
//! store.set_reference(Location::new(49.0, 8.0, 100).unwrap(), 1013.25);
//! store.update(
//!     AircraftTrack::new(
//!         0,
//!         "AABBCC",
//!         IdKind::Icao,
//!         AircraftKind::Glider,
//!         SourceKind::Flarm,
//!         Location::new(49.01, 8.0, 900).unwrap(),
//!         Timestamp::from_millis(1),
//!     )
//!     .unwrap(),
//! );
//! store.access();
//! ```

pub mod error;
pub mod math;
pub mod nmea;
pub mod object;
pub mod serialize;
pub mod store;
pub mod table;
pub mod text;
pub mod time;

pub use error::{Error, Result};
pub use object::{
    AircraftKind, AircraftTrack, AtmosphereReading, Freshness, Fusable, GpsFix, IdKind, Location,
    Movement, SourceKind, WindReading, OUTDATED,
};
pub use store::{AircraftStore, AtmosphereStore, GpsStore, GpsUpdate, WindStore};
pub use text::FixedString;
pub use time::{TimeFormat, Timestamp};
