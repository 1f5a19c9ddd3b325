use crate::error::Result;
use crate::math::{self, icao_height, round_to_int, saturate};
use crate::nmea::append_sentence;
use crate::object::{AircraftTrack, Location, SourceKind};

const MIN_HEADING: i32 = 0;
const MAX_HEADING: i32 = 359;
const MIN_GND_SPEED_KMH: f64 = 0.0;
const MAX_GND_SPEED_KMH: f64 = 10_000.0;
const MIN_CLIMB_RATE: f64 = -32.8;
const MAX_CLIMB_RATE: f64 = 32.8;

/// The receiver's own position and pressure, updated once per cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference {
    pub location: Location,
    pub pressure: f64,
}

impl Default for Reference {
    fn default() -> Self {
        Self {
            location: Location::default(),
            pressure: math::STD_PRESSURE,
        }
    }
}

/// Position of an aircraft relative to the reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Relative {
    pub bearing: f64,
    pub distance: f64,
    pub north: i32,
    pub east: i32,
    pub vertical: i32,
}

/// Writes `PFLAU` and `PFLAA` sentences describing a track relative to the
/// reference.
#[derive(Debug, Clone, Copy)]
pub struct AircraftSerializer {
    reference: Reference,
    reference_height: i32,
    max_distance: i32,
}

impl AircraftSerializer {
    pub fn new(reference: Reference, max_distance: i32) -> Self {
        Self {
            reference,
            reference_height: icao_height(reference.pressure),
            max_distance,
        }
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub(crate) fn relative(&self, track: &AircraftTrack) -> Relative {
        let from = &self.reference.location;
        let to = &track.location;
        let distance =
            math::haversine_distance(from.latitude(), from.longitude(), to.latitude(), to.longitude());
        let bearing =
            math::initial_bearing(from.latitude(), from.longitude(), to.latitude(), to.longitude());
        let bearing_rad = math::radian(bearing);
        let vertical = match track.source {
            SourceKind::Transponder => to.altitude() - self.reference_height,
            SourceKind::Flarm => to.altitude() - from.altitude(),
        };
        Relative {
            bearing,
            distance,
            north: round_to_int(bearing_rad.cos() * distance),
            east: round_to_int(bearing_rad.sin() * distance),
            vertical,
        }
    }

    /// Regenerates the track's sentence buffer. Tracks beyond the distance
    /// filter end up with an empty buffer. On error the buffer is empty too.
    pub fn serialize(&self, track: &mut AircraftTrack) -> Result<()> {
        track.sentence.clear();
        let rel = self.relative(track);
        if rel.distance > f64::from(self.max_distance) {
            return Ok(());
        }
        self.write(track, &rel).inspect_err(|_| track.sentence.clear())
    }

    fn write(&self, track: &mut AircraftTrack, rel: &Relative) -> Result<()> {
        let out = &mut track.sentence;
        let id = track.id.as_str();
        append_sentence(
            out,
            format_args!(
                "$PFLAU,,,,1,0,{},0,{},{},{}*",
                round_to_int(rel.bearing),
                rel.vertical,
                round_to_int(rel.distance),
                id
            ),
        )?;
        let id_kind = track.id_kind as u8;
        let aircraft_kind = track.aircraft_kind as u8;
        match &track.movement {
            Some(movement) => append_sentence(
                out,
                format_args!(
                    "$PFLAA,0,{},{},{},{},{},{:03},,{},{:.1},{:X}*",
                    rel.north,
                    rel.east,
                    rel.vertical,
                    id_kind,
                    id,
                    saturate(round_to_int(movement.heading), MIN_HEADING, MAX_HEADING),
                    round_to_int(saturate(
                        movement.gnd_speed * math::MS_2_KMH,
                        MIN_GND_SPEED_KMH,
                        MAX_GND_SPEED_KMH
                    )),
                    saturate(movement.climb_rate, MIN_CLIMB_RATE, MAX_CLIMB_RATE),
                    aircraft_kind
                ),
            ),
            None => append_sentence(
                out,
                format_args!(
                    "$PFLAA,0,{},{},{},{},{},,,,,{:X}*",
                    rel.north, rel.east, rel.vertical, id_kind, id, aircraft_kind
                ),
            ),
        }
    }
}
