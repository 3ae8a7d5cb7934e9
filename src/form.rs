use serde::Deserialize;
use serde_json::{Map, Value};
use serde_with::{serde_as, NoneAsEmptyString};

use crate::models::{DesignRequest, FieldValue};

pub const CLOTHING_TYPES: &[&str] = &[
    "T-Shirt", "Button-Up Shirt", "Sweater", "Hoodie", "Dress", "Pants", "Shorts", "Jacket", "Coat", "Skirt",
];
pub const STYLES: &[&str] = &[
    "Casual", "Formal", "Athletic", "Vintage", "Modern", "Bohemian", "Minimalist", "Streetwear", "Elegant",
];
pub const FITS: &[&str] = &["Slim", "Regular", "Relaxed", "Oversized"];
pub const MATERIALS: &[&str] = &["Cotton", "Linen", "Polyester", "Wool", "Silk", "Denim", "Blend"];

const STEP: f64 = 0.5;
const UNIT: &str = "inches";

/// Declared bounds of one numeric form field.
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
}

pub const CHEST: Range = Range { label: "Chest", min: 20.0, max: 60.0 };
pub const WAIST: Range = Range { label: "Waist", min: 18.0, max: 50.0 };
pub const LENGTH: Range = Range { label: "Length", min: 15.0, max: 40.0 };
pub const SLEEVES: Range = Range { label: "Sleeve length", min: 16.0, max: 40.0 };

/// The HTML measurement form as posted by the browser.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementForm {
    #[serde(default)]
    pub clothing_type: String,
    #[serde(default)]
    pub style: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub chest: Option<f64>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub waist: Option<f64>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub length: Option<f64>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub sleeves: Option<f64>,
    #[serde(default)]
    pub fit: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub preferences: String,
}

impl Default for MeasurementForm {
    fn default() -> Self {
        Self {
            clothing_type: "T-Shirt".into(),
            style: "Casual".into(),
            chest: Some(38.0),
            waist: Some(32.0),
            length: Some(28.0),
            sleeves: Some(32.0),
            fit: "Regular".into(),
            material: "Cotton".into(),
            color: "Black".into(),
            preferences: String::new(),
        }
    }
}

fn check_number(range: Range, value: Option<f64>, required: bool, errors: &mut Vec<String>) {
    let Some(v) = value else {
        if required {
            errors.push(format!("{} is required", range.label));
        }
        return;
    };
    if !v.is_finite() || v < range.min || v > range.max {
        errors.push(format!("{} must be between {} and {} {}", range.label, range.min, range.max, UNIT));
    } else if ((v / STEP).round() * STEP - v).abs() > 1e-9 {
        errors.push(format!("{} must be in steps of {} {}", range.label, STEP, UNIT));
    }
}

fn check_choice(label: &str, value: &str, options: &[&str], required: bool, errors: &mut Vec<String>) {
    let value = value.trim();
    if value.is_empty() {
        if required {
            errors.push(format!("{label} is required"));
        }
    } else if !options.contains(&value) {
        errors.push(format!("{label} must be one of: {}", options.join(", ")));
    }
}

impl MeasurementForm {
    /// Every rule the form violates, in field order. Empty means submittable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        check_choice("Clothing type", &self.clothing_type, CLOTHING_TYPES, true, &mut errors);
        check_choice("Style", &self.style, STYLES, false, &mut errors);
        check_number(CHEST, self.chest, true, &mut errors);
        check_number(WAIST, self.waist, true, &mut errors);
        check_number(LENGTH, self.length, true, &mut errors);
        check_number(SLEEVES, self.sleeves, false, &mut errors);
        check_choice("Fit", &self.fit, FITS, true, &mut errors);
        check_choice("Material", &self.material, MATERIALS, true, &mut errors);
        if self.color.trim().is_empty() {
            errors.push("Color is required".to_string());
        }
        errors
    }

    /// Validates and builds the request, attaching unit suffixes to each measurement.
    pub fn into_request(self) -> Result<DesignRequest, Vec<String>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut measurements = Map::new();
        let numbers = [("chest", self.chest), ("waist", self.waist), ("length", self.length), ("sleeves", self.sleeves)];
        for (name, value) in numbers {
            if let Some(v) = value {
                measurements.insert(name.to_string(), Value::String(format!("{v} {UNIT}")));
            }
        }
        for (name, value) in [("fit", &self.fit), ("color", &self.color), ("material", &self.material)] {
            measurements.insert(name.to_string(), Value::String(value.trim().to_string()));
        }

        let style = Some(self.style.trim().to_string()).filter(|s| !s.is_empty());
        let preferences = Some(self.preferences.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(FieldValue::Text);

        Ok(DesignRequest {
            measurements: FieldValue::KeyValueMap(measurements),
            clothing_type: self.clothing_type.trim().to_string(),
            style,
            preferences,
        })
    }
}
