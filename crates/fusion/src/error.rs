use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Faults raised by the fusion core.
///
/// Arbitration rejections are not errors and never show up here; they are the
/// `false` returned by [`Fusable::try_update`](crate::Fusable::try_update).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A physical value outside its valid range, rejected at construction.
    #[error("{field} out of bounds: {value}")]
    OutOfBounds { field: &'static str, value: f64 },

    #[error("identifier '{0}' must be 6 to 8 characters")]
    InvalidIdentifier(String),

    #[error("invalid time of day '{0}'")]
    InvalidTime(String),

    /// A write would exceed a fixed-capacity text buffer.
    #[error("text exceeds buffer capacity of {capacity} bytes")]
    Overflow { capacity: usize },

    /// The GPS reference has been latched; no more fixes are accepted.
    #[error("GPS position is locked")]
    PositionLocked,
}

impl Error {
    pub(crate) fn bounds(field: &'static str, value: impl Into<f64>) -> Self {
        Error::OutOfBounds {
            field,
            value: value.into(),
        }
    }
}
