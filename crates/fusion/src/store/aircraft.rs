use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::Publish;
use crate::object::{AircraftTrack, Fusable, Location, SourceKind, OUTDATED};
use crate::serialize::{AircraftSerializer, Reference};
use crate::table::Table;

/// Age at which a silent Flarm track falls back to transponder preference.
pub const NO_FLARM_THRESHOLD: u32 = OUTDATED;

/// Age at which a silent track is dropped.
pub const DELETE_THRESHOLD: u32 = 120;

/// All tracked aircraft, keyed by a hash of their identifier.
pub struct AircraftStore {
    table: Table<AircraftTrack>,
    reference: Mutex<Reference>,
    max_distance: i32,
    publish: Publish<AircraftTrack>,
}

impl AircraftStore {
    pub fn new<F>(max_distance: i32, publish: F) -> Self
    where
        F: Fn(&AircraftTrack, &str) + Send + Sync + 'static,
    {
        Self {
            table: Table::new(),
            reference: Mutex::new(Reference::default()),
            max_distance,
            publish: Box::new(publish),
        }
    }

    /// Merges a report into the track with the same identifier, or starts a
    /// new track. Reports losing arbitration are dropped silently.
    pub fn update(&self, track: AircraftTrack) {
        let key = key_of(track.id());
        let (mut existing, rejected) = self.table.insert(key, track);
        if let Some(track) = rejected {
            if !existing.try_update(track) {
                trace!(id = existing.id(), "aircraft update lost arbitration");
            }
        }
    }

    /// Sets the position and pressure the next `access` measures from.
    pub fn set_reference(&self, location: Location, pressure: f64) {
        *self.reference.lock() = Reference { location, pressure };
    }

    /// Runs one serve cycle over every track: age, demote, evict, serialize
    /// and publish.
    pub fn access(&self) {
        let serializer = AircraftSerializer::new(*self.reference.lock(), self.max_distance);
        let mut cursor = self.table.begin();
        while let Some(mut track) = cursor {
            track.age();
            let age = track.update_age();
            if age == NO_FLARM_THRESHOLD && track.source() == SourceKind::Flarm {
                debug!(id = track.id(), "flarm silent, preferring transponder");
                track.demote();
            }
            if age >= DELETE_THRESHOLD {
                debug!(id = track.id(), "dropping stale aircraft");
                cursor = track.erase();
                continue;
            }
            match serializer.serialize(&mut track) {
                Ok(()) => {
                    let record: &AircraftTrack = &track;
                    (self.publish)(record, record.sentence());
                }
                Err(e) => debug!(id = track.id(), error = %e, "skipping aircraft this cycle"),
            }
            cursor = track.advance();
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Copy of the current track for `id`.
    pub fn snapshot(&self, id: &str) -> Option<AircraftTrack> {
        self.table.get(key_of(id)).map(|track| (*track).clone())
    }
}

fn key_of(id: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}
