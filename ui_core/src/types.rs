// Strong typing over strings. Newtypes for host time, screen geometry and config.

use serde::{Deserialize, Serialize};

use crate::error::UiError;

/// Host clock reading in milliseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Millis(u64);

impl Millis {
    pub fn new(ms: u64) -> Self {
        Millis(ms)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Deadline `delay_ms` after this instant.
    pub fn after(&self, delay_ms: u64) -> Self {
        Millis(self.0.saturating_add(delay_ms))
    }
}

/// Bounding box in CSS pixels, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Page scroll offsets at the time a trigger was measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// A measured trigger element: its box plus the scroll it was measured under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TriggerRegion {
    pub rect: Rect,
    #[serde(default)]
    pub scroll: ScrollOffset,
}

impl TriggerRegion {
    pub fn new(rect: Rect, scroll: ScrollOffset) -> Self {
        TriggerRegion { rect, scroll }
    }
}

/// Which side of the trigger an overlay sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Bottom,
    Left,
    Right,
    /// Unrecognized names fall back here.
    #[default]
    #[serde(other)]
    Top,
}

impl Placement {
    pub const ALL: [Placement; 4] = [
        Placement::Top,
        Placement::Bottom,
        Placement::Left,
        Placement::Right,
    ];

    /// Parse a placement name. Anything unknown is `Top`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "bottom" => Placement::Bottom,
            "left" => Placement::Left,
            "right" => Placement::Right,
            _ => Placement::Top,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Top => "top",
            Placement::Bottom => "bottom",
            Placement::Left => "left",
            Placement::Right => "right",
        }
    }

    /// Translate fractions (of the overlay's own size) that put the overlay's
    /// edge on the computed anchor point.
    pub fn anchor(&self) -> (f64, f64) {
        match self {
            Placement::Top => (-0.5, -1.0),
            Placement::Bottom => (-0.5, 0.0),
            Placement::Left => (-1.0, -0.5),
            Placement::Right => (0.0, -0.5),
        }
    }
}

/// Computed overlay anchor in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TooltipPosition {
    pub x: f64,
    pub y: f64,
    pub placement: Placement,
}

/// Configuration passed from JS. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub tooltip: TooltipSettings,
    #[serde(default)]
    pub particles: ParticleSettings,
}

/// Tooltip debounce settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TooltipSettings {
    #[serde(default = "default_show_delay")]
    pub show_delay_ms: u64,
    #[serde(default)]
    pub hide_delay_ms: u64,
}

impl Default for TooltipSettings {
    fn default() -> Self {
        TooltipSettings {
            show_delay_ms: default_show_delay(),
            hide_delay_ms: 0,
        }
    }
}

impl UiConfig {
    /// Parse the JSON config handed to the engine constructor.
    pub fn from_json(json: &str) -> Result<Self, UiError> {
        serde_json::from_str(json).map_err(|e| UiError::InvalidConfig(e.to_string()))
    }
}

fn default_show_delay() -> u64 {
    180
}

/// Particle emitter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleSettings {
    /// Extra time a batch stays alive after its longest particle.
    #[serde(default = "default_grace")]
    pub grace_ms: u64,
    /// Upper bound of the random lifetime added to each particle.
    #[serde(default = "default_lifetime_jitter")]
    pub lifetime_jitter_ms: u64,
    /// Fixed seed for reproducible bursts. Host clock otherwise.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        ParticleSettings {
            grace_ms: default_grace(),
            lifetime_jitter_ms: default_lifetime_jitter(),
            seed: None,
        }
    }
}

fn default_grace() -> u64 {
    100
}

fn default_lifetime_jitter() -> u64 {
    200
}

/// A request to burst an effect at a screen point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl EffectRequest {
    pub fn new(kind: impl Into<String>, x: f64, y: f64) -> Self {
        EffectRequest {
            kind: kind.into(),
            x,
            y,
        }
    }
}

/// A single live particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Particle {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub size: f64,
    pub lifetime_ms: u64,
    pub dx: f64,
    pub dy: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_after_saturates() {
        assert_eq!(Millis::new(100).after(80), Millis::new(180));
        assert_eq!(Millis::new(u64::MAX).after(1), Millis::new(u64::MAX));
    }

    #[test]
    fn rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.bottom(), 60.0);
    }

    #[test]
    fn unknown_placement_is_top() {
        assert_eq!(Placement::from_name("diagonal"), Placement::Top);
        let parsed: Placement = serde_json::from_str(r#""diagonal""#).unwrap();
        assert_eq!(parsed, Placement::Top);
        let parsed: Placement = serde_json::from_str(r#""left""#).unwrap();
        assert_eq!(parsed, Placement::Left);
    }

    #[test]
    fn config_defaults_from_empty_json() {
        let config: UiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.tooltip.show_delay_ms, 180);
        assert_eq!(config.tooltip.hide_delay_ms, 0);
        assert_eq!(config.particles.grace_ms, 100);
        assert_eq!(config.particles.lifetime_jitter_ms, 200);
        assert!(config.particles.seed.is_none());
    }

    #[test]
    fn effect_request_coordinates_default_to_zero() {
        let req: EffectRequest = serde_json::from_str(r#"{"type":"fire"}"#).unwrap();
        assert_eq!(req, EffectRequest::new("fire", 0.0, 0.0));
    }

    #[test]
    fn particle_serializes_camel_case() {
        let p = Particle {
            id: "fire_1_0".to_string(),
            x: 0.0,
            y: 0.0,
            color: "#ff6b35".to_string(),
            size: 4.0,
            lifetime_ms: 600,
            dx: 0.0,
            dy: -30.0,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"lifetimeMs\":600"));
    }
}
