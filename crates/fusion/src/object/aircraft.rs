use super::{Freshness, Fusable, Location, OUTDATED};
use crate::error::{Error, Result};
use crate::text::FixedString;
use crate::time::Timestamp;

/// Compact aircraft identifier, 6 to 8 characters.
pub type Identifier = FixedString<8>;

/// Address type of the identifier, numbered as in the FLARM protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IdKind {
    Random = 0,
    Icao = 1,
    Flarm = 2,
    Ogn = 3,
}

impl IdKind {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            1 => IdKind::Icao,
            2 => IdKind::Flarm,
            3 => IdKind::Ogn,
            _ => IdKind::Random,
        }
    }
}

/// Aircraft category, numbered as in the FLARM protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AircraftKind {
    Unknown = 0x0,
    Glider = 0x1,
    TowPlane = 0x2,
    Helicopter = 0x3,
    Parachute = 0x4,
    DropPlane = 0x5,
    HangGlider = 0x6,
    ParaGlider = 0x7,
    PoweredAircraft = 0x8,
    JetAircraft = 0x9,
    Ufo = 0xA,
    Balloon = 0xB,
    Airship = 0xC,
    Uav = 0xD,
    StaticObject = 0xF,
}

impl AircraftKind {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0x1 => AircraftKind::Glider,
            0x2 => AircraftKind::TowPlane,
            0x3 => AircraftKind::Helicopter,
            0x4 => AircraftKind::Parachute,
            0x5 => AircraftKind::DropPlane,
            0x6 => AircraftKind::HangGlider,
            0x7 => AircraftKind::ParaGlider,
            0x8 => AircraftKind::PoweredAircraft,
            0x9 => AircraftKind::JetAircraft,
            0xA => AircraftKind::Ufo,
            0xB => AircraftKind::Balloon,
            0xC => AircraftKind::Airship,
            0xD => AircraftKind::Uav,
            0xF => AircraftKind::StaticObject,
            _ => AircraftKind::Unknown,
        }
    }
}

/// Where a track came from. Flarm positions are preferred over transponder
/// (pressure altitude) reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Flarm,
    Transponder,
}

/// Heading in degrees, ground speed and climb rate in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Movement {
    pub heading: f64,
    pub gnd_speed: f64,
    pub climb_rate: f64,
}

/// One fused aircraft, keyed in the table by its identifier.
#[derive(Debug, Clone)]
pub struct AircraftTrack {
    pub(crate) freshness: Freshness,
    pub(crate) id: Identifier,
    pub(crate) id_kind: IdKind,
    pub(crate) aircraft_kind: AircraftKind,
    pub(crate) source: SourceKind,
    pub(crate) location: Location,
    /// `None` when the source reports position only.
    pub(crate) movement: Option<Movement>,
    pub(crate) timestamp: Timestamp,
    pub(crate) sentence: FixedString<192>,
}

impl AircraftTrack {
    pub fn new(
        priority: u32,
        id: &str,
        id_kind: IdKind,
        aircraft_kind: AircraftKind,
        source: SourceKind,
        location: Location,
        timestamp: Timestamp,
    ) -> Result<Self> {
        if !(6..=8).contains(&id.len()) {
            return Err(Error::InvalidIdentifier(id.to_string()));
        }
        Ok(Self {
            freshness: Freshness::new(priority),
            id: Identifier::try_from(id)?,
            id_kind,
            aircraft_kind,
            source,
            location,
            movement: None,
            timestamp,
            sentence: FixedString::new(),
        })
    }

    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = Some(movement);
        self
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn id_kind(&self) -> IdKind {
        self.id_kind
    }

    pub fn aircraft_kind(&self) -> AircraftKind {
        self.aircraft_kind
    }

    pub fn source(&self) -> SourceKind {
        self.source
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn movement(&self) -> Option<&Movement> {
        self.movement.as_ref()
    }

    pub fn has_full_info(&self) -> bool {
        self.movement.is_some()
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Text generated by the last serve cycle.
    pub fn sentence(&self) -> &str {
        self.sentence.as_str()
    }

    /// Falls back to the coarser source once the Flarm beacon went quiet.
    pub(crate) fn demote(&mut self) {
        self.source = SourceKind::Transponder;
    }
}

impl Fusable for AircraftTrack {
    fn freshness(&self) -> &Freshness {
        &self.freshness
    }

    fn freshness_mut(&mut self) -> &mut Freshness {
        &mut self.freshness
    }

    fn assign(&mut self, other: Self) {
        self.id = other.id;
        self.id_kind = other.id_kind;
        self.aircraft_kind = other.aircraft_kind;
        self.source = other.source;
        self.location = other.location;
        self.movement = other.movement;
        self.timestamp = other.timestamp;
    }

    fn can_update(&self, existing: &Self) -> bool {
        if self.timestamp <= existing.timestamp {
            return false;
        }
        existing.freshness.update_age() >= OUTDATED
            || (existing.source == SourceKind::Transponder && self.source == SourceKind::Flarm)
            || (existing.source == self.source && self.priority() >= existing.priority())
    }
}
