use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::ConversionError;

/// When and how much of one converter type runs during a sweep.
///
/// Shared by every instance of the type. Lower priorities convert first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOrder {
    pub priority: i32,
    /// Conversions per tick when going 3D→2D.
    /// Default: 100
    pub batch_to_planar: u32,
    /// Conversions per tick when going 2D→3D.
    /// Default: 100
    pub batch_to_volume: u32,
}

impl Default for ConversionOrder {
    fn default() -> Self {
        Self {
            priority: 0,
            batch_to_planar: 100,
            batch_to_volume: 100,
        }
    }
}

impl ConversionOrder {
    pub fn new(priority: i32, batch_to_planar: u32, batch_to_volume: u32) -> Self {
        Self {
            priority,
            batch_to_planar,
            batch_to_volume,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Same batch size in both directions.
    pub fn with_batch(mut self, batch: u32) -> Self {
        self.batch_to_planar = batch;
        self.batch_to_volume = batch;
        self
    }

    pub fn with_batch_to_planar(mut self, batch: u32) -> Self {
        self.batch_to_planar = batch;
        self
    }

    pub fn with_batch_to_volume(mut self, batch: u32) -> Self {
        self.batch_to_volume = batch;
        self
    }

    pub fn batch(&self, direction: Direction) -> u32 {
        match direction {
            Direction::ToPlanar => self.batch_to_planar,
            Direction::ToVolume => self.batch_to_volume,
        }
    }

    /// Batch sizes must be at least 1. `name` labels the error.
    pub fn validate(&self, name: &'static str) -> Result<(), ConversionError> {
        if self.batch_to_planar == 0 || self.batch_to_volume == 0 {
            return Err(ConversionError::InvalidBatchSize(name));
        }
        Ok(())
    }

    /// Shape converters run first so bodies see final geometry.
    pub fn shapes() -> Self {
        Self::default().with_priority(-100)
    }

    pub fn bodies() -> Self {
        Self::default().with_priority(-50)
    }

    pub fn attachments() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_priorities_are_ordered() {
        assert!(ConversionOrder::shapes().priority < ConversionOrder::bodies().priority);
        assert!(ConversionOrder::bodies().priority < ConversionOrder::attachments().priority);
    }

    #[test]
    fn zero_batch_is_rejected() {
        let order = ConversionOrder::default().with_batch_to_volume(0);
        assert_eq!(
            order.validate("Test"),
            Err(ConversionError::InvalidBatchSize("Test"))
        );
        assert!(ConversionOrder::default().validate("Test").is_ok());
    }

    #[test]
    fn batch_follows_direction() {
        let order = ConversionOrder::new(0, 3, 7);
        assert_eq!(order.batch(Direction::ToPlanar), 3);
        assert_eq!(order.batch(Direction::ToVolume), 7);
    }
}
