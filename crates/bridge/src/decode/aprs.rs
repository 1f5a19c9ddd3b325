//! APRS position beacons as relayed by OGN/APRS-IS servers.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use flightbridge_fusion::math::{round_to_int, FEET_2_M, FPM_2_MS, KTS_2_MS};
use flightbridge_fusion::{
    AircraftKind, AircraftTrack, IdKind, Location, Movement, SourceKind, TimeFormat, Timestamp,
};
use regex::{Captures, Regex};

use super::{degrees, parse, DecodeError, Result};

/// Position report with optional course/speed, precision extension, OGN
/// device id and climb rate.
static BEACON_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<call>[^>]+)>[^:]+:[/@](?P<time>\d{6})h",
        r"(?P<lat>\d{4}\.\d{2})(?P<ns>[NS]).",
        r"(?P<lon>\d{5}\.\d{2})(?P<ew>[EW]).",
        r"(?:(?P<course>\d{3})/(?P<speed>\d{3}))?/A=(?P<alt>-?\d{5,6})",
        r"(?:\s+!W(?P<latx>\d)(?P<lonx>\d)!)?",
        r"(?:.*?\bid(?P<flags>[0-9A-Fa-f]{2})(?P<id>[0-9A-Fa-f]{6}))?",
        r"(?:.*?\s(?P<climb>[+-]\d+)fpm)?",
    ))
    .expect("Invalid APRS beacon regex")
});

/// Decodes one beacon. Server comments (`#...`) and non-position packets are
/// unsupported.
pub fn decode(line: &str, priority: u32, now: DateTime<Utc>) -> Result<AircraftTrack> {
    if line.starts_with('#') {
        return Err(DecodeError::Unsupported);
    }
    let caps = BEACON_REGEX
        .captures(line)
        .ok_or(DecodeError::Unsupported)?;

    let timestamp = Timestamp::parse(&caps["time"], TimeFormat::Hhmmss, now)?;
    let latitude = degrees(&extended(&caps["lat"], caps.name("latx")), &caps["ns"], "latitude")?;
    let longitude = degrees(&extended(&caps["lon"], caps.name("lonx")), &caps["ew"], "longitude")?;
    let altitude_ft: f64 = parse(&caps["alt"], "altitude")?;
    let location = Location::new(latitude, longitude, round_to_int(altitude_ft * FEET_2_M))?;

    let (id, id_kind, aircraft_kind) = identity(&caps)?;
    let track = AircraftTrack::new(
        priority,
        id,
        id_kind,
        aircraft_kind,
        SourceKind::Flarm,
        location,
        timestamp,
    )?;

    match (caps.name("course"), caps.name("speed"), caps.name("climb")) {
        (Some(course), Some(speed), Some(climb)) => {
            let heading: f64 = parse(course.as_str(), "course")?;
            let knots: f64 = parse(speed.as_str(), "speed")?;
            let fpm: f64 = parse(climb.as_str(), "climb rate")?;
            Ok(track.with_movement(Movement {
                heading,
                gnd_speed: knots * KTS_2_MS,
                climb_rate: fpm * FPM_2_MS,
            }))
        }
        _ => Ok(track),
    }
}

/// Appends the `!Wab!` precision digit to the minutes.
fn extended(value: &str, extra: Option<regex::Match<'_>>) -> String {
    match extra {
        Some(digit) => format!("{value}{}", digit.as_str()),
        None => value.to_string(),
    }
}

/// Identifier and kinds from the OGN `id` field, or from a prefixed
/// callsign such as `FLRDDA5BA` when the field is absent.
fn identity<'c>(caps: &'c Captures<'_>) -> Result<(&'c str, IdKind, AircraftKind)> {
    if let (Some(flags), Some(id)) = (caps.name("flags"), caps.name("id")) {
        let flags = u8::from_str_radix(flags.as_str(), 16).map_err(|_| DecodeError::Format("id flags"))?;
        return Ok((
            id.as_str(),
            IdKind::from_bits(flags),
            AircraftKind::from_bits(flags >> 2),
        ));
    }
    let call = caps.name("call").map_or("", |m| m.as_str());
    let id_kind = match call.get(..3) {
        Some("ICA") => IdKind::Icao,
        Some("FLR") => IdKind::Flarm,
        Some("OGN") => IdKind::Ogn,
        _ => return Err(DecodeError::Format("aircraft id")),
    };
    match call.get(3..) {
        Some(id) if id.len() == 6 => Ok((id, id_kind, AircraftKind::Unknown)),
        _ => Err(DecodeError::Format("aircraft id")),
    }
}
