//! The fused stores shared by every feed task and the serve loop.

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, info, trace};

use flightbridge_common::{Config, Protocol};
use flightbridge_fusion::{
    AircraftStore, AircraftTrack, AtmosphereReading, AtmosphereStore, GpsFix, GpsStore, GpsUpdate,
    Location, Timestamp, WindReading, WindStore,
};

use crate::decode::{self, sensor::SensorReading, DecodeError};

/// What a feed should do after handing over a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct AppState {
    pub aircraft: AircraftStore,
    pub gps: GpsStore,
    pub atmosphere: AtmosphereStore,
    pub wind: WindStore,
    max_height: i32,
    max_dist: i32,
}

impl AppState {
    /// Builds the stores, each publishing into `tx`.
    pub fn new(config: &Config, tx: &broadcast::Sender<String>) -> Result<Self> {
        let location = Location::new(config.latitude, config.longitude, config.altitude)
            .context("Invalid fallback position")?;
        let fallback_fix = GpsFix::new(0, location, config.geoid, f64::MAX, 0, 0, Timestamp::default())
            .context("Invalid fallback geoid")?;
        let fallback_atmosphere = AtmosphereReading::new(0, config.pressure, "")
            .context("Invalid fallback pressure")?;

        Ok(Self {
            aircraft: AircraftStore::new(config.max_dist, publisher::<AircraftTrack>(tx)),
            gps: GpsStore::new(fallback_fix, config.gnd_mode, publisher::<GpsFix>(tx)),
            atmosphere: AtmosphereStore::new(fallback_atmosphere, publisher::<AtmosphereReading>(tx)),
            wind: WindStore::new(publisher::<WindReading>(tx)),
            max_height: config.max_height,
            max_dist: config.max_dist,
        })
    }

    pub fn max_dist(&self) -> i32 {
        self.max_dist
    }

    /// One serve cycle over all stores.
    pub fn serve(&self) {
        self.aircraft
            .set_reference(self.gps.location(), self.atmosphere.pressure());
        self.aircraft.access();
        self.gps.access();
        self.atmosphere.access();
        self.wind.access();
    }

    /// Decodes one input line and pushes it into the matching store.
    pub fn ingest(&self, protocol: Protocol, priority: u32, line: &str) -> Flow {
        let now = Utc::now();
        let result = match protocol {
            Protocol::Aprs => decode::aprs::decode(line, priority, now).map(|track| {
                if track.location().altitude() <= self.max_height {
                    self.aircraft.update(track);
                }
                Flow::Continue
            }),
            Protocol::Sbs => decode::sbs::decode(line, priority, now).map(|track| {
                if track.location().altitude() <= self.max_height {
                    self.aircraft.update(track);
                }
                Flow::Continue
            }),
            Protocol::Gps => decode::gps::decode(line, priority, now).map(|fix| self.ingest_fix(fix)),
            Protocol::Sensor => decode::sensor::decode(line, priority).map(|reading| {
                match reading {
                    SensorReading::Atmosphere(reading) => self.atmosphere.update(reading),
                    SensorReading::Wind(reading) => self.wind.update(reading),
                };
                Flow::Continue
            }),
        };
        match result {
            Ok(flow) => flow,
            Err(DecodeError::Unsupported) => Flow::Continue,
            Err(e) => {
                trace!(?protocol, error = %e, "dropping input line");
                Flow::Continue
            }
        }
    }

    fn ingest_fix(&self, fix: GpsFix) -> Flow {
        match self.gps.update(fix) {
            Ok(GpsUpdate::Latched) => {
                info!("Received good GPS position, stopping GPS feed");
                Flow::Stop
            }
            Ok(GpsUpdate::Applied) | Ok(GpsUpdate::Rejected) => Flow::Continue,
            Err(e) => {
                debug!(error = %e, "GPS update refused");
                Flow::Stop
            }
        }
    }
}

/// Publish callback forwarding non-empty sentences to the broadcast channel.
fn publisher<R: 'static>(tx: &broadcast::Sender<String>) -> impl Fn(&R, &str) + Send + Sync + 'static {
    let tx = tx.clone();
    move |_: &R, sentence: &str| {
        if !sentence.is_empty() {
            // No connected clients is fine
            let _ = tx.send(sentence.to_string());
        }
    }
}
