use crate::error::{Error, Result};

/// A bounded geographic position. Altitude is in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Location {
    latitude: f64,
    longitude: f64,
    altitude: i32,
}

impl Location {
    pub const MIN_LATITUDE: f64 = -90.0;
    pub const MAX_LATITUDE: f64 = 90.0;
    pub const MIN_LONGITUDE: f64 = -180.0;
    pub const MAX_LONGITUDE: f64 = 180.0;
    pub const MIN_ALTITUDE: i32 = -11_000;
    pub const MAX_ALTITUDE: i32 = 100_000;

    pub fn new(latitude: f64, longitude: f64, altitude: i32) -> Result<Self> {
        if !(Self::MIN_LATITUDE..=Self::MAX_LATITUDE).contains(&latitude) {
            return Err(Error::bounds("latitude", latitude));
        }
        if !(Self::MIN_LONGITUDE..=Self::MAX_LONGITUDE).contains(&longitude) {
            return Err(Error::bounds("longitude", longitude));
        }
        if !(Self::MIN_ALTITUDE..=Self::MAX_ALTITUDE).contains(&altitude) {
            return Err(Error::bounds("altitude", altitude));
        }
        Ok(Self {
            latitude,
            longitude,
            altitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn altitude(&self) -> i32 {
        self.altitude
    }
}
