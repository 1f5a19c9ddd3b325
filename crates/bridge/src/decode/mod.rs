//! Line decoders for the supported input protocols.
//!
//! Each decoder turns one input line into a validated record. Anything that
//! does not parse, fails its checksum or violates a physical bound is
//! rejected here and never reaches a store.

pub mod aprs;
pub mod gps;
pub mod sbs;
pub mod sensor;

use flightbridge_fusion::nmea;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

#[derive(Error, Debug, PartialEq)]
pub enum DecodeError {
    /// A well-formed line this bridge has no use for.
    #[error("unsupported sentence")]
    Unsupported,

    #[error("malformed {0}")]
    Format(&'static str),

    #[error("checksum mismatch")]
    Checksum,

    #[error(transparent)]
    Invalid(#[from] flightbridge_fusion::Error),
}

/// Splits a comma separated line into its first `N` fields.
pub(crate) fn fields<const N: usize>(line: &str) -> Option<[&str; N]> {
    let mut out = [""; N];
    let mut parts = line.split(',');
    for slot in out.iter_mut() {
        *slot = parts.next()?;
    }
    Some(out)
}

pub(crate) fn parse<T: std::str::FromStr>(value: &str, what: &'static str) -> Result<T> {
    value.trim().parse().map_err(|_| DecodeError::Format(what))
}

/// Converts `[d]ddmm.mm...` plus a hemisphere letter into signed degrees.
pub(crate) fn degrees(value: &str, hemisphere: &str, what: &'static str) -> Result<f64> {
    let dot = value.find('.').unwrap_or(value.len());
    if dot < 3 {
        return Err(DecodeError::Format(what));
    }
    let (deg, min) = value
        .get(..dot - 2)
        .zip(value.get(dot - 2..))
        .ok_or(DecodeError::Format(what))?;
    let deg: f64 = parse(deg, what)?;
    let min: f64 = parse(min, what)?;
    let magnitude = deg + min / 60.0;
    match hemisphere {
        "N" | "E" => Ok(magnitude),
        "S" | "W" => Ok(-magnitude),
        _ => Err(DecodeError::Format(what)),
    }
}

pub(crate) fn check_nmea(line: &str) -> Result<()> {
    if nmea::verify(line) {
        Ok(())
    } else {
        Err(DecodeError::Checksum)
    }
}
