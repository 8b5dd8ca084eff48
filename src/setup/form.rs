//! Form state and the validation engine for the setup wizard.
//!
//! Validation is pure and re-runs on every input mutation. Per-field errors
//! cover parse failures only; range invariants are checked on the parsed
//! configuration once every field parses, and the first violation surfaces
//! as the form's general error.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::equipment::presets::{BasketPreset, GrinderPreset};
use crate::equipment::{BasketConfig, GrinderConfig};

/// Error text for unparseable numeric input.
pub const NOT_A_NUMBER: &str = "Not a valid number";

/// One text input plus its parse error, if any.
///
/// Blank fields carry no error message but leave the form invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which grinder field an input targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrinderField {
    ScaleMin,
    ScaleMax,
}

/// Raw input and validation results for the grinder step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GrinderForm {
    pub scale_min: Field,
    pub scale_max: Field,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_error: Option<String>,
    pub is_valid: bool,
}

impl GrinderForm {
    /// Set one field's raw text and revalidate the whole form.
    pub fn set(&mut self, field: GrinderField, raw: &str) {
        let target = match field {
            GrinderField::ScaleMin => &mut self.scale_min,
            GrinderField::ScaleMax => &mut self.scale_max,
        };
        target.raw = raw.to_string();
        self.revalidate();
    }

    /// Bulk-fill both fields from a preset, clearing previous errors.
    pub fn apply_preset(&mut self, preset: GrinderPreset) {
        self.scale_min.raw = preset.scale_min.to_string();
        self.scale_max.raw = preset.scale_max.to_string();
        self.revalidate();
    }

    /// The parsed configuration, if both fields hold integers.
    pub fn parsed(&self) -> Option<GrinderConfig> {
        let scale_min = parse_int(&self.scale_min.raw)?;
        let scale_max = parse_int(&self.scale_max.raw)?;
        Some(GrinderConfig {
            scale_min,
            scale_max,
        })
    }

    pub fn revalidate(&mut self) {
        self.scale_min.error = int_parse_error(&self.scale_min.raw);
        self.scale_max.error = int_parse_error(&self.scale_max.raw);
        self.general_error = None;
        self.is_valid = false;

        if let Some(config) = self.parsed() {
            match config.validate().first() {
                Some(violation) => self.general_error = Some(violation.to_string()),
                None => self.is_valid = true,
            }
        }
    }
}

/// Which basket field an input targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BasketField {
    CoffeeInMin,
    CoffeeInMax,
    CoffeeOutMin,
    CoffeeOutMax,
}

/// Raw input and validation results for the basket step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BasketForm {
    pub coffee_in_min: Field,
    pub coffee_in_max: Field,
    pub coffee_out_min: Field,
    pub coffee_out_max: Field,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_error: Option<String>,
    pub is_valid: bool,
}

impl BasketForm {
    pub fn set(&mut self, field: BasketField, raw: &str) {
        let target = match field {
            BasketField::CoffeeInMin => &mut self.coffee_in_min,
            BasketField::CoffeeInMax => &mut self.coffee_in_max,
            BasketField::CoffeeOutMin => &mut self.coffee_out_min,
            BasketField::CoffeeOutMax => &mut self.coffee_out_max,
        };
        target.raw = raw.to_string();
        self.revalidate();
    }

    pub fn apply_preset(&mut self, preset: BasketPreset) {
        let config = preset.config();
        self.coffee_in_min.raw = config.coffee_in_min.to_string();
        self.coffee_in_max.raw = config.coffee_in_max.to_string();
        self.coffee_out_min.raw = config.coffee_out_min.to_string();
        self.coffee_out_max.raw = config.coffee_out_max.to_string();
        self.revalidate();
    }

    /// The parsed configuration (inactive, fresh id), if all fields hold
    /// decimals.
    pub fn parsed(&self) -> Option<BasketConfig> {
        Some(BasketConfig::new(
            parse_decimal(&self.coffee_in_min.raw)?,
            parse_decimal(&self.coffee_in_max.raw)?,
            parse_decimal(&self.coffee_out_min.raw)?,
            parse_decimal(&self.coffee_out_max.raw)?,
        ))
    }

    pub fn revalidate(&mut self) {
        self.coffee_in_min.error = decimal_parse_error(&self.coffee_in_min.raw);
        self.coffee_in_max.error = decimal_parse_error(&self.coffee_in_max.raw);
        self.coffee_out_min.error = decimal_parse_error(&self.coffee_out_min.raw);
        self.coffee_out_max.error = decimal_parse_error(&self.coffee_out_max.raw);
        self.general_error = None;
        self.is_valid = false;

        if let Some(config) = self.parsed() {
            match config.validate().first() {
                Some(violation) => self.general_error = Some(violation.to_string()),
                None => self.is_valid = true,
            }
        }
    }
}

fn parse_int(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

fn int_parse_error(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i32>()
        .err()
        .map(|_| NOT_A_NUMBER.to_string())
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

fn decimal_parse_error(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<Decimal>()
        .err()
        .map(|_| NOT_A_NUMBER.to_string())
}
