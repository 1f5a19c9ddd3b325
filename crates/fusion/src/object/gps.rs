use super::{Freshness, Fusable, Location};
use crate::error::{Error, Result};
use crate::text::FixedString;
use crate::time::Timestamp;

/// A GPS fix of the reference (receiver) position.
#[derive(Debug, Clone)]
pub struct GpsFix {
    pub(crate) freshness: Freshness,
    pub(crate) location: Location,
    pub(crate) geoid: f64,
    pub(crate) dilution: f64,
    pub(crate) satellites: u8,
    pub(crate) fix_quality: u8,
    pub(crate) timestamp: Timestamp,
    pub(crate) sentence: FixedString<192>,
}

impl GpsFix {
    pub const MIN_GEOID: f64 = -108.0;
    pub const MAX_GEOID: f64 = 86.0;

    /// Thresholds for latching a fix in ground mode.
    pub const GOOD_SATELLITES: u8 = 7;
    pub const GOOD_FIX_QUALITY: u8 = 1;
    pub const GOOD_DILUTION: f64 = 2.0;

    pub fn new(
        priority: u32,
        location: Location,
        geoid: f64,
        dilution: f64,
        satellites: u8,
        fix_quality: u8,
        timestamp: Timestamp,
    ) -> Result<Self> {
        if !(Self::MIN_GEOID..=Self::MAX_GEOID).contains(&geoid) {
            return Err(Error::bounds("geoid", geoid));
        }
        Ok(Self {
            freshness: Freshness::new(priority),
            location,
            geoid,
            dilution,
            satellites,
            fix_quality,
            timestamp,
            sentence: FixedString::new(),
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn geoid(&self) -> f64 {
        self.geoid
    }

    pub fn dilution(&self) -> f64 {
        self.dilution
    }

    pub fn satellites(&self) -> u8 {
        self.satellites
    }

    pub fn fix_quality(&self) -> u8 {
        self.fix_quality
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn sentence(&self) -> &str {
        self.sentence.as_str()
    }

    /// Good enough to serve as a permanent ground reference.
    pub fn is_good(&self) -> bool {
        self.satellites >= Self::GOOD_SATELLITES
            && self.fix_quality >= Self::GOOD_FIX_QUALITY
            && self.dilution <= Self::GOOD_DILUTION
    }
}

impl Fusable for GpsFix {
    fn freshness(&self) -> &Freshness {
        &self.freshness
    }

    fn freshness_mut(&mut self) -> &mut Freshness {
        &mut self.freshness
    }

    fn assign(&mut self, other: Self) {
        self.location = other.location;
        self.geoid = other.geoid;
        self.dilution = other.dilution;
        self.satellites = other.satellites;
        self.fix_quality = other.fix_quality;
        self.timestamp = other.timestamp;
    }

    fn can_update(&self, existing: &Self) -> bool {
        self.timestamp > existing.timestamp && self.freshness.may_supersede(&existing.freshness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(priority: u32, ts: i64) -> GpsFix {
        GpsFix::new(priority, Location::default(), 48.0, 1.0, 8, 1, Timestamp::from_millis(ts)).unwrap()
    }

    #[test]
    fn geoid_is_bounded() {
        let loc = Location::default();
        let ts = Timestamp::default();
        assert!(GpsFix::new(0, loc, 86.0, 1.0, 5, 1, ts).is_ok());
        assert!(GpsFix::new(0, loc, 86.1, 1.0, 5, 1, ts).is_err());
        assert!(GpsFix::new(0, loc, -108.5, 1.0, 5, 1, ts).is_err());
    }

    #[test]
    fn needs_newer_timestamp_and_priority() {
        let mut existing = fix(1, 100);
        assert!(!existing.try_update(fix(5, 100)));
        assert!(!existing.try_update(fix(0, 200)));
        assert!(existing.try_update(fix(1, 200)));
    }

    #[test]
    fn quality_gates() {
        assert!(fix(0, 0).is_good());
        let weak = GpsFix::new(0, Location::default(), 0.0, 2.5, 9, 1, Timestamp::default()).unwrap();
        assert!(!weak.is_good());
        let few = GpsFix::new(0, Location::default(), 0.0, 1.0, 6, 1, Timestamp::default()).unwrap();
        assert!(!few.is_good());
        let nofix = GpsFix::new(0, Location::default(), 0.0, 1.0, 9, 0, Timestamp::default()).unwrap();
        assert!(!nofix.is_good());
    }
}
