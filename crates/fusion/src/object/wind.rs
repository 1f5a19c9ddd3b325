use super::{Freshness, Fusable};
use crate::error::Result;
use crate::text::FixedString;

/// A wind sentence, passed through verbatim.
#[derive(Debug, Clone, Default)]
pub struct WindReading {
    pub(crate) freshness: Freshness,
    pub(crate) sentence: FixedString<128>,
}

impl WindReading {
    pub fn new(priority: u32, sentence: &str) -> Result<Self> {
        Ok(Self {
            freshness: Freshness::new(priority),
            sentence: FixedString::try_from(sentence)?,
        })
    }

    pub fn sentence(&self) -> &str {
        self.sentence.as_str()
    }

    pub(crate) fn clear(&mut self) {
        self.sentence.clear();
    }
}

impl Fusable for WindReading {
    fn freshness(&self) -> &Freshness {
        &self.freshness
    }

    fn freshness_mut(&mut self) -> &mut Freshness {
        &mut self.freshness
    }

    fn assign(&mut self, other: Self) {
        self.sentence = other.sentence;
    }
}
