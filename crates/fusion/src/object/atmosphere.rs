use super::{Freshness, Fusable};
use crate::error::{Error, Result};
use crate::math::STD_PRESSURE;
use crate::text::FixedString;

/// Barometric pressure in hPa plus the sentence it was read from.
#[derive(Debug, Clone)]
pub struct AtmosphereReading {
    pub(crate) freshness: Freshness,
    pub(crate) pressure: f64,
    pub(crate) sentence: FixedString<128>,
}

impl AtmosphereReading {
    pub const MIN_PRESSURE: f64 = 0.0;
    pub const MAX_PRESSURE: f64 = 2000.0;

    pub fn new(priority: u32, pressure: f64, sentence: &str) -> Result<Self> {
        if !(Self::MIN_PRESSURE..=Self::MAX_PRESSURE).contains(&pressure) {
            return Err(Error::bounds("pressure", pressure));
        }
        Ok(Self {
            freshness: Freshness::new(priority),
            pressure,
            sentence: FixedString::try_from(sentence)?,
        })
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn sentence(&self) -> &str {
        self.sentence.as_str()
    }
}

impl Default for AtmosphereReading {
    fn default() -> Self {
        Self {
            freshness: Freshness::new(0),
            pressure: STD_PRESSURE,
            sentence: FixedString::new(),
        }
    }
}

impl Fusable for AtmosphereReading {
    fn freshness(&self) -> &Freshness {
        &self.freshness
    }

    fn freshness_mut(&mut self) -> &mut Freshness {
        &mut self.freshness
    }

    fn assign(&mut self, other: Self) {
        self.pressure = other.pressure;
        self.sentence = other.sentence;
    }
}
