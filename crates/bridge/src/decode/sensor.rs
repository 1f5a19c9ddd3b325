//! Weather station sentences: `MDA` (pressure) and `MWV` (wind).

use flightbridge_fusion::{AtmosphereReading, FixedString, WindReading};

use super::{check_nmea, fields, parse, DecodeError, Result};

#[derive(Debug)]
pub enum SensorReading {
    Atmosphere(AtmosphereReading),
    Wind(WindReading),
}

pub fn decode(line: &str, priority: u32) -> Result<SensorReading> {
    let line = line.trim_end();
    if line.starts_with("$WIMDA,") {
        check_nmea(line)?;
        let f = fields::<4>(line).ok_or(DecodeError::Format("MDA sentence"))?;
        let bars: f64 = parse(f[3], "pressure")?;
        let reading = AtmosphereReading::new(priority, bars * 1000.0, terminated(line)?.as_str())?;
        Ok(SensorReading::Atmosphere(reading))
    } else if line.starts_with("$WIMWV,") {
        check_nmea(line)?;
        let f = fields::<6>(line).ok_or(DecodeError::Format("MWV sentence"))?;
        if !f[5].starts_with('A') {
            return Err(DecodeError::Format("MWV sentence, status invalid"));
        }
        Ok(SensorReading::Wind(WindReading::new(priority, terminated(line)?.as_str())?))
    } else {
        Err(DecodeError::Unsupported)
    }
}

/// The sentence as it goes back out on the wire.
fn terminated(line: &str) -> Result<FixedString<128>> {
    let mut text = FixedString::<128>::try_from(line)?;
    text.push_str("\r\n")?;
    Ok(text)
}
