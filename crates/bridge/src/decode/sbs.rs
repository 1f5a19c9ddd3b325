//! BaseStation (SBS-1) airborne position messages.

use chrono::{DateTime, Utc};
use flightbridge_fusion::math::{round_to_int, FEET_2_M};
use flightbridge_fusion::{
    AircraftKind, AircraftTrack, IdKind, Location, SourceKind, TimeFormat, Timestamp,
};

use super::{fields, parse, DecodeError, Result};

/// Decodes `MSG,3` lines; every other message type is unsupported.
pub fn decode(line: &str, priority: u32, now: DateTime<Utc>) -> Result<AircraftTrack> {
    if !line.starts_with("MSG,3,") {
        return Err(DecodeError::Unsupported);
    }
    let f = fields::<16>(line).ok_or(DecodeError::Format("SBS message"))?;

    let id = f[4];
    let timestamp = Timestamp::parse(f[7], TimeFormat::HhColonMmColonSs, now)?;
    let altitude_ft: f64 = parse(f[11], "altitude")?;
    let location = Location::new(
        parse(f[14], "latitude")?,
        parse(f[15], "longitude")?,
        round_to_int(altitude_ft * FEET_2_M),
    )?;

    Ok(AircraftTrack::new(
        priority,
        id,
        IdKind::Icao,
        AircraftKind::PoweredAircraft,
        SourceKind::Transponder,
        location,
        timestamp,
    )?)
}
