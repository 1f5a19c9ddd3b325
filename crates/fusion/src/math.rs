//! Unit conversions and spherical geodesy.

pub const KTS_2_MS: f64 = 0.514_444;
pub const MS_2_KMH: f64 = 3.6;
pub const FEET_2_M: f64 = 0.3048;
pub const FPM_2_MS: f64 = 0.005_08;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// ICAO standard atmosphere sea level pressure in hPa.
pub const STD_PRESSURE: f64 = 1013.25;

#[inline]
pub fn radian(deg: f64) -> f64 {
    deg.to_radians()
}

#[inline]
pub fn degree(rad: f64) -> f64 {
    rad.to_degrees()
}

/// Rounds half away from zero and saturates at the `i32` range.
#[inline]
pub fn round_to_int(value: f64) -> i32 {
    value.round() as i32
}

#[inline]
pub fn saturate<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Height in meters of the given pressure level in the ICAO standard atmosphere.
pub fn icao_height(pressure: f64) -> i32 {
    round_to_int(288.15 * (1.0 - (pressure / STD_PRESSURE).powf(0.190_295)) / 0.0065)
}

/// Great-circle distance in meters between two points given in degrees.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = radian(lat1);
    let lat2_rad = radian(lat2);
    let delta_lat = lat2_rad - lat1_rad;
    let delta_lon = radian(lon2 - lon1);

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial bearing in degrees [0, 360) from the first point towards the second.
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = radian(lat1);
    let lat2_rad = radian(lat2);
    let delta_lon = radian(lon2 - lon1);

    let y = delta_lon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();
    (degree(y.atan2(x)) + 360.0) % 360.0
}
