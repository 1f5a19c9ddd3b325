use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::error::Result;
use crate::nmea::append_sentence;
use crate::object::GpsFix;

/// Writes `GPGGA` and `GPRMC` sentences for the reference position.
///
/// The GGA fix quality is always reported as 1, whatever the source fix
/// said; some consumers drop positions with any other value.
#[derive(Debug, Clone, Copy, Default)]
pub struct GpsSerializer;

/// An angle split into whole degrees and minutes scaled by `10^decimals`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DegMin {
    degrees: u32,
    minutes: u32,
    fraction: u32,
}

impl DegMin {
    fn new(angle: f64, decimals: u32) -> Self {
        let scale = 10u64.pow(decimals);
        // Rounding on the integer grid keeps minutes below 60.
        let total = (angle.abs() * 60.0 * scale as f64).round() as u64;
        let per_degree = 60 * scale;
        Self {
            degrees: (total / per_degree) as u32,
            minutes: ((total % per_degree) / scale) as u32,
            fraction: (total % scale) as u32,
        }
    }
}

impl GpsSerializer {
    pub fn serialize(&self, fix: &mut GpsFix, now: DateTime<Utc>) -> Result<()> {
        fix.sentence.clear();
        self.write(fix, now).inspect_err(|_| fix.sentence.clear())
    }

    fn write(&self, fix: &mut GpsFix, now: DateTime<Utc>) -> Result<()> {
        let out = &mut fix.sentence;
        let loc = &fix.location;
        let ns = if loc.latitude() < 0.0 { 'S' } else { 'N' };
        let ew = if loc.longitude() < 0.0 { 'W' } else { 'E' };
        let (hour, minute, second) = (now.hour(), now.minute(), now.second());

        let lat = DegMin::new(loc.latitude(), 4);
        let lon = DegMin::new(loc.longitude(), 4);
        append_sentence(
            out,
            format_args!(
                "$GPGGA,{:02}{:02}{:02},{:02}{:02}.{:04},{},{:03}{:02}.{:04},{},1,{:02},1,{},M,{:.1},M,,*",
                hour,
                minute,
                second,
                lat.degrees,
                lat.minutes,
                lat.fraction,
                ns,
                lon.degrees,
                lon.minutes,
                lon.fraction,
                ew,
                fix.satellites,
                loc.altitude(),
                fix.geoid
            ),
        )?;

        let lat = DegMin::new(loc.latitude(), 3);
        let lon = DegMin::new(loc.longitude(), 3);
        append_sentence(
            out,
            format_args!(
                "$GPRMC,{:02}{:02}{:02},A,{:02}{:02}.{:03},{},{:03}{:02}.{:03},{},0,0,{:02}{:02}{:02},001.0,W*",
                hour,
                minute,
                second,
                lat.degrees,
                lat.minutes,
                lat.fraction,
                ns,
                lon.degrees,
                lon.minutes,
                lon.fraction,
                ew,
                now.day(),
                now.month(),
                now.year() % 100
            ),
        )
    }
}
