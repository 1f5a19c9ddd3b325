//! NMEA `GGA` fixes from a GPS receiver.

use chrono::{DateTime, Utc};
use flightbridge_fusion::math::round_to_int;
use flightbridge_fusion::{GpsFix, Location, TimeFormat, Timestamp};

use super::{check_nmea, degrees, fields, parse, DecodeError, Result};

/// Decodes `$GPGGA`/`$GNGGA` sentences carrying a valid fix.
pub fn decode(line: &str, priority: u32, now: DateTime<Utc>) -> Result<GpsFix> {
    let line = line.trim_end();
    if !(line.starts_with("$GPGGA,") || line.starts_with("$GNGGA,")) {
        return Err(DecodeError::Unsupported);
    }
    check_nmea(line)?;
    let f = fields::<13>(line).ok_or(DecodeError::Format("GGA sentence"))?;

    let fix_quality: u8 = parse(f[6], "fix quality")?;
    if fix_quality == 0 {
        return Err(DecodeError::Format("fix, receiver has none"));
    }
    let altitude: f64 = parse(f[9], "altitude")?;
    let location = Location::new(
        degrees(f[2], f[3], "latitude")?,
        degrees(f[4], f[5], "longitude")?,
        round_to_int(altitude),
    )?;

    Ok(GpsFix::new(
        priority,
        location,
        parse(f[11], "geoid separation")?,
        parse(f[8], "dilution")?,
        parse(f[7], "satellite count")?,
        fix_quality,
        Timestamp::parse(f[1], TimeFormat::Hhmmss, now)?,
    )?)
}
