//! Preset catalog for quick setup.
//!
//! Presets are fixed, user-selectable value pairs that bulk-fill the setup
//! forms. The catalog is part of the crate API so clients render the same
//! choices the flow accepts.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::basket::BasketConfig;
use super::grinder::GrinderConfig;

/// A predefined grinder scale range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GrinderPreset {
    pub label: &'static str,
    pub scale_min: i32,
    pub scale_max: i32,
}

/// Grinder ranges covering the common dial layouts.
pub const GRINDER_PRESETS: [GrinderPreset; 4] = [
    GrinderPreset {
        label: "1-10",
        scale_min: 1,
        scale_max: 10,
    },
    GrinderPreset {
        label: "30-80",
        scale_min: 30,
        scale_max: 80,
    },
    GrinderPreset {
        label: "50-60",
        scale_min: 50,
        scale_max: 60,
    },
    GrinderPreset {
        label: "0-100",
        scale_min: 0,
        scale_max: 100,
    },
];

impl GrinderPreset {
    pub fn config(&self) -> GrinderConfig {
        GrinderConfig {
            scale_min: self.scale_min,
            scale_max: self.scale_max,
        }
    }
}

/// A predefined basket dose profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasketPreset {
    Single,
    Double,
}

/// Basket profiles in catalog order.
pub const BASKET_PRESETS: [BasketPreset; 2] = [BasketPreset::Single, BasketPreset::Double];

impl BasketPreset {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Double => "Double",
        }
    }

    /// The dose ranges this preset fills in. Returned inactive; the flow
    /// decides whether the profile becomes the active one.
    pub fn config(&self) -> BasketConfig {
        match self {
            Self::Single => BasketConfig::new(dec!(7.0), dec!(10.0), dec!(14.0), dec!(24.0)),
            Self::Double => BasketConfig::new(dec!(16.0), dec!(20.0), dec!(32.0), dec!(48.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_grinder_preset_is_valid() {
        for preset in GRINDER_PRESETS {
            assert!(
                preset.config().is_valid(),
                "preset {} should be valid",
                preset.label
            );
        }
    }

    #[test]
    fn every_basket_preset_is_valid() {
        for preset in BASKET_PRESETS {
            assert!(
                preset.config().is_valid(),
                "preset {} should be valid",
                preset.label()
            );
        }
    }

    #[test]
    fn basket_preset_serde_uses_snake_case() {
        let json = serde_json::to_string(&BasketPreset::Double).unwrap();
        assert_eq!(json, "\"double\"");
        let parsed: BasketPreset = serde_json::from_str("\"single\"").unwrap();
        assert_eq!(parsed, BasketPreset::Single);
    }
}
