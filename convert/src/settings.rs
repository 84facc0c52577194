//! Context-wide conversion settings, persisted as RON.

use serde::{Deserialize, Serialize};

use dimshift_geometry::{OutlineSettings, PolygonMeshOptions};

use crate::error::SettingsError;
use crate::order::ConversionOrder;

/// How structural problems are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConversionMode {
    /// Missing paired shapes or scratch entities are errors.
    #[default]
    Runtime,
    /// Missing structure is recreated with defaults and a warning.
    Editing,
}

/// Settings shared by every converter of a [`ConversionContext`](crate::ConversionContext).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    pub mode: ConversionMode,
    /// Outline settings for mesh converters created by the context.
    pub outline: OutlineSettings,
    pub mesh_options: PolygonMeshOptions,
    /// Run the box plausibility check before polygon→box conversion.
    /// Default: true
    pub safe_box_conversion: bool,
    /// Suppress pre-existing overlaps after a body goes planar.
    /// Default: true
    pub suppress_overlaps: bool,
    pub shape_order: ConversionOrder,
    pub body_order: ConversionOrder,
    pub attachment_order: ConversionOrder,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            mode: ConversionMode::Runtime,
            outline: OutlineSettings::default(),
            mesh_options: PolygonMeshOptions::default(),
            safe_box_conversion: true,
            suppress_overlaps: true,
            shape_order: ConversionOrder::shapes(),
            body_order: ConversionOrder::bodies(),
            attachment_order: ConversionOrder::attachments(),
        }
    }
}

impl ConversionSettings {
    pub fn with_mode(mut self, mode: ConversionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_outline(mut self, outline: OutlineSettings) -> Self {
        self.outline = outline;
        self
    }

    pub fn with_suppress_overlaps(mut self, suppress: bool) -> Self {
        self.suppress_overlaps = suppress;
        self
    }

    /// Same batch size for every builtin order, both directions.
    pub fn with_batch(mut self, batch: u32) -> Self {
        self.shape_order = self.shape_order.with_batch(batch);
        self.body_order = self.body_order.with_batch(batch);
        self.attachment_order = self.attachment_order.with_batch(batch);
        self
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.shape_order
            .validate("shape_order")
            .and_then(|_| self.body_order.validate("body_order"))
            .and_then(|_| self.attachment_order.validate("attachment_order"))
            .map_err(SettingsError::Invalid)
    }

    /// Parse and validate RON text. Missing fields take their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = ron::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_ron_string(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ron_round_trip() {
        let settings = ConversionSettings::default()
            .with_mode(ConversionMode::Editing)
            .with_batch(25)
            .with_outline(OutlineSettings::default().with_resolution(64));
        let text = settings.to_ron_string().unwrap();
        assert_eq!(ConversionSettings::from_ron_str(&text).unwrap(), settings);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings = ConversionSettings::from_ron_str("(mode: Editing)").unwrap();
        assert_eq!(settings.mode, ConversionMode::Editing);
        assert_eq!(settings.shape_order, ConversionOrder::shapes());
        assert!(settings.suppress_overlaps);
    }

    #[test]
    fn zero_batch_fails_validation() {
        let err = ConversionSettings::from_ron_str("(body_order: (batch_to_planar: 0))").unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn malformed_text_is_a_parse_error() {
        let err = ConversionSettings::from_ron_str("(mode: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
