use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::Publish;
use crate::error::{Error, Result};
use crate::object::{Fusable, GpsFix, Location};
use crate::serialize::GpsSerializer;

/// Outcome of a GPS update that was not refused outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsUpdate {
    Applied,
    /// Lost arbitration against the stored fix.
    Rejected,
    /// Applied, and good enough to become the permanent ground reference.
    /// The caller should stop feeding fixes.
    Latched,
}

struct GpsState {
    fix: GpsFix,
    locked: bool,
}

/// The single reference position.
pub struct GpsStore {
    state: Mutex<GpsState>,
    ground_mode: bool,
    publish: Publish<GpsFix>,
}

impl GpsStore {
    pub fn new<F>(fallback: GpsFix, ground_mode: bool, publish: F) -> Self
    where
        F: Fn(&GpsFix, &str) + Send + Sync + 'static,
    {
        Self {
            state: Mutex::new(GpsState {
                fix: fallback,
                locked: false,
            }),
            ground_mode,
            publish: Box::new(publish),
        }
    }

    /// Fails with [`Error::PositionLocked`] once a fix has been latched.
    pub fn update(&self, fix: GpsFix) -> Result<GpsUpdate> {
        let mut state = self.state.lock();
        if state.locked {
            return Err(Error::PositionLocked);
        }
        if !state.fix.try_update(fix) {
            return Ok(GpsUpdate::Rejected);
        }
        if self.ground_mode && state.fix.is_good() {
            state.locked = true;
            info!(
                latitude = state.fix.location().latitude(),
                longitude = state.fix.location().longitude(),
                "GPS position latched"
            );
            return Ok(GpsUpdate::Latched);
        }
        Ok(GpsUpdate::Applied)
    }

    pub fn location(&self) -> Location {
        *self.state.lock().fix.location()
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().locked
    }

    pub fn access(&self) {
        self.access_at(Utc::now());
    }

    /// Serve cycle with an explicit wall clock for the sentence time fields.
    pub fn access_at(&self, now: DateTime<Utc>) {
        let mut state = self.state.lock();
        state.fix.age();
        match GpsSerializer.serialize(&mut state.fix, now) {
            Ok(()) => {
                let fix = &state.fix;
                (self.publish)(fix, fix.sentence());
            }
            Err(e) => debug!(error = %e, "skipping GPS position this cycle"),
        }
    }
}
