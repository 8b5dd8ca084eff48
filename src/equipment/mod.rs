//! Equipment configuration value objects and the preset catalog.

pub mod basket;
pub mod grinder;
pub mod presets;

pub use basket::{BasketConfig, BasketDoseViolation};
pub use grinder::{GrinderConfig, GrinderScaleViolation};
pub use presets::{BASKET_PRESETS, BasketPreset, GRINDER_PRESETS, GrinderPreset};
