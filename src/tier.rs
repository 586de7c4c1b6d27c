//! Device capability tier.
//!
//! Selected once at startup from the touch capability and logical core count, then
//! handed to every effect so population sizes and visual flourishes scale together.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Machines at or below this many logical cores get the constrained tier.
pub const LOW_END_CORES: u32 = 4;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderQualityTier {
    pub constrained: bool,
    // Background pools
    pub bokeh_count: usize,
    pub star_count: usize,
    // Fireworks
    pub firework_bursts: usize,
    pub firework_frames: u32,
    pub sparks_per_burst: usize,
    pub accent_sparks: usize,
    pub spark_speed: (f64, f64),
    pub spark_trails: bool,
    /// Translucent wash between frames instead of a full clear.
    pub fade_trails: bool,
    // Confetti
    pub confetti_count: usize,
    pub confetti_duration: u32,
    pub glyph_confetti: bool,
    // Emoji rain
    pub emoji_drops: usize,
    pub emoji_interval_ms: f64,
}

impl RenderQualityTier {
    pub fn full() -> Self {
        Self {
            constrained: false,
            bokeh_count: 80,
            star_count: 140,
            firework_bursts: 14,
            firework_frames: 420,
            sparks_per_burst: 80,
            accent_sparks: 24,
            spark_speed: (2.0, 7.0),
            spark_trails: true,
            fade_trails: true,
            confetti_count: 200,
            confetti_duration: 320,
            glyph_confetti: true,
            emoji_drops: 40,
            emoji_interval_ms: 150.0,
        }
    }

    pub fn constrained() -> Self {
        Self {
            constrained: true,
            bokeh_count: 40,
            star_count: 70,
            firework_bursts: 8,
            firework_frames: 300,
            sparks_per_burst: 45,
            accent_sparks: 0,
            spark_speed: (1.5, 5.0),
            spark_trails: false,
            fade_trails: false,
            confetti_count: 110,
            confetti_duration: 240,
            glyph_confetti: false,
            emoji_drops: 22,
            emoji_interval_ms: 260.0,
        }
    }

    /// Touch devices and machines with few cores are treated as constrained.
    pub fn detect(touch_capable: bool, logical_cores: u32) -> Self {
        if touch_capable || logical_cores <= LOW_END_CORES {
            Self::constrained()
        } else {
            Self::full()
        }
    }
}

impl Default for RenderQualityTier {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_tiers() {
        assert!(!RenderQualityTier::detect(false, 8).constrained);
        assert!(RenderQualityTier::detect(true, 16).constrained);
        assert!(RenderQualityTier::detect(false, 4).constrained);
        // hardwareConcurrency may be unreported (0)
        assert!(RenderQualityTier::detect(false, 0).constrained);
    }

    #[test]
    fn test_constrained_is_never_richer() {
        let full = RenderQualityTier::full();
        let low = RenderQualityTier::constrained();
        assert!(low.bokeh_count < full.bokeh_count);
        assert!(low.sparks_per_burst < full.sparks_per_burst);
        assert!(low.confetti_duration <= full.confetti_duration);
        assert!(!low.spark_trails && !low.fade_trails && !low.glyph_confetti);
        assert_eq!(low.accent_sparks, 0);
    }
}

#[cfg(all(test, feature = "serde_json"))]
mod override_tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_full_defaults() {
        let tier: RenderQualityTier =
            serde_json::from_str(r#"{"constrained":true,"bokeh_count":20}"#).unwrap();
        assert!(tier.constrained);
        assert_eq!(tier.bokeh_count, 20);
        assert_eq!(
            tier,
            RenderQualityTier {
                constrained: true,
                bokeh_count: 20,
                ..RenderQualityTier::full()
            }
        );
    }

    #[test]
    fn test_empty_object_is_full_tier() {
        let tier: RenderQualityTier = serde_json::from_str("{}").unwrap();
        assert_eq!(tier, RenderQualityTier::full());
    }

    #[test]
    fn test_malformed_override_is_rejected() {
        assert!(serde_json::from_str::<RenderQualityTier>(r#"{"bokeh_count":"#).is_err());
        assert!(serde_json::from_str::<RenderQualityTier>(r#"{"bokeh_count":-3}"#).is_err());
        assert!(serde_json::from_str::<RenderQualityTier>(r#""full""#).is_err());
    }
}
