//! Fusable records: the entities a store holds and the rules deciding when
//! an incoming report may overwrite a stored one.

mod aircraft;
mod atmosphere;
mod gps;
mod location;
mod wind;

pub use aircraft::{AircraftKind, AircraftTrack, IdKind, Identifier, Movement, SourceKind};
pub use atmosphere::AtmosphereReading;
pub use gps::GpsFix;
pub use location::Location;
pub use wind::WindReading;

/// Cycles without a successful merge after which a record is stale.
pub const OUTDATED: u32 = 4;

/// Priority and age bookkeeping carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Freshness {
    last_priority: u32,
    update_age: u32,
}

impl Freshness {
    pub const fn new(priority: u32) -> Self {
        Self {
            last_priority: priority,
            update_age: 0,
        }
    }

    pub fn priority(&self) -> u32 {
        self.last_priority
    }

    pub fn update_age(&self) -> u32 {
        self.update_age
    }

    pub fn is_outdated(&self) -> bool {
        self.update_age >= OUTDATED
    }

    /// The base rule: equal or higher priority wins, anything wins over stale.
    pub fn may_supersede(&self, existing: &Freshness) -> bool {
        self.last_priority >= existing.last_priority || existing.is_outdated()
    }

    fn merged(&mut self, priority: u32) {
        self.last_priority = priority;
        self.update_age = 0;
    }

    fn age(&mut self) {
        self.update_age = self.update_age.saturating_add(1);
    }
}

/// A record that can be merged with newer reports of the same entity.
pub trait Fusable: Sized {
    fn freshness(&self) -> &Freshness;

    fn freshness_mut(&mut self) -> &mut Freshness;

    /// Copies the payload of `other` into `self`. Bookkeeping is handled by
    /// [`Fusable::try_update`].
    fn assign(&mut self, other: Self);

    /// Whether `self`, as an incoming report, may overwrite `existing`.
    fn can_update(&self, existing: &Self) -> bool {
        self.freshness().may_supersede(existing.freshness())
    }

    /// Merges `incoming` into `self` if the overwrite rule allows it.
    /// A `false` return is ordinary contention, not a failure.
    fn try_update(&mut self, incoming: Self) -> bool {
        if !incoming.can_update(self) {
            return false;
        }
        let priority = incoming.freshness().priority();
        self.assign(incoming);
        self.freshness_mut().merged(priority);
        true
    }

    /// Counts one serve cycle without a merge.
    fn age(&mut self) {
        self.freshness_mut().age();
    }

    fn update_age(&self) -> u32 {
        self.freshness().update_age()
    }

    fn priority(&self) -> u32 {
        self.freshness().priority()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_rule() {
        let low = Freshness::new(0);
        let high = Freshness::new(3);
        assert!(high.may_supersede(&low));
        assert!(low.may_supersede(&low));
        assert!(!low.may_supersede(&high));

        let mut stale = high;
        for _ in 0..OUTDATED {
            stale.age();
        }
        assert!(low.may_supersede(&stale));
    }

    #[test]
    fn merge_resets_age() {
        let mut f = Freshness::new(1);
        f.age();
        f.age();
        assert_eq!(f.update_age(), 2);
        f.merged(5);
        assert_eq!(f.update_age(), 0);
        assert_eq!(f.priority(), 5);
    }
}
