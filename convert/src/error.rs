//! Error types for conversion and settings loading.

use crate::scene::{EntityId, ShapeId};
use crate::schedule::ConverterId;

/// Structural and registration errors raised by converters and the
/// [`ConversionContext`](crate::ConversionContext).
///
/// Unsupported geometry is not an error: shape mappers warn and leave the
/// target untouched instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The converter's entity no longer exists.
    MissingEntity(EntityId),
    /// One side of a shape pair was deleted or replaced by another kind.
    MissingPairedShape {
        entity: EntityId,
        shape: ShapeId,
    },
    /// The hidden entity holding a latent body or attachment is gone.
    MissingScratchEntity(EntityId),
    /// The live dynamics body expected on the entity is absent.
    MissingBody(EntityId),
    /// The converter type was never registered with a conversion order.
    UnknownConverterType(&'static str),
    /// Batch sizes must be at least 1.
    InvalidBatchSize(&'static str),
    /// A frame-spread sweep is already running.
    SweepInProgress,
    /// No converter with this id is registered.
    UnknownConverter(ConverterId),
    /// No copy function is registered for this attachment pair.
    MissingAdapter {
        from: &'static str,
        to: &'static str,
    },
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEntity(e) => write!(f, "entity {e:?} does not exist"),
            Self::MissingPairedShape { entity, shape } => {
                write!(f, "entity {entity:?} is missing paired shape {shape:?}")
            }
            Self::MissingScratchEntity(e) => {
                write!(f, "scratch entity for {e:?} is missing")
            }
            Self::MissingBody(e) => write!(f, "entity {e:?} has no live dynamics body"),
            Self::UnknownConverterType(name) => {
                write!(f, "converter type {name} has no registered conversion order")
            }
            Self::InvalidBatchSize(name) => {
                write!(f, "conversion order for {name} has a batch size of 0")
            }
            Self::SweepInProgress => f.write_str("a conversion sweep is already in progress"),
            Self::UnknownConverter(id) => write!(f, "converter {id:?} is not registered"),
            Self::MissingAdapter { from, to } => {
                write!(f, "no attachment adapter from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for ConversionError {}

/// Errors that can occur while loading or saving settings.
#[derive(Debug)]
pub enum SettingsError {
    /// Failed to parse RON text.
    Parse(ron::error::SpannedError),
    /// Failed to serialize to RON.
    Serialize(ron::Error),
    /// Parsed settings failed validation.
    Invalid(ConversionError),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "settings parse error: {e}"),
            Self::Serialize(e) => write!(f, "settings serialize error: {e}"),
            Self::Invalid(e) => write!(f, "invalid settings: {e}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Serialize(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<ron::error::SpannedError> for SettingsError {
    fn from(e: ron::error::SpannedError) -> Self {
        Self::Parse(e)
    }
}

impl From<ron::Error> for SettingsError {
    fn from(e: ron::Error) -> Self {
        Self::Serialize(e)
    }
}
