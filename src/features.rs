//! Feature record construction and the compact prompt line.
//!
//! The compact line is embedded verbatim into the LLM prompt, so its field
//! order and the `NA` spelling must not change.

use std::fmt;

use serde::Serialize;

use crate::models::{GrowthStage, LatestSnapshot};

// ---

/// Rounded, display-ready projection of a snapshot. `None` is the NA marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    // ---
    pub moisture: Option<f64>,
    #[serde(rename = "tempC")]
    pub temp_c: Option<f64>,
    pub humidity: Option<f64>,
    pub light_lux: Option<f64>,
    pub color_index: Option<f64>,
    pub ec: Option<f64>,
    pub ph: Option<f64>,
    #[serde(rename = "soil_tempC")]
    pub soil_temp_c: Option<f64>,
    pub growth_stage: GrowthStage,
}

/// Round to `decimals` places; non-finite input or output becomes NA.
pub fn round_to(value: Option<f64>, decimals: i32) -> Option<f64> {
    // ---
    let v = value.filter(|v| v.is_finite())?;
    let scale = 10f64.powi(decimals);
    Some((v * scale).round() / scale).filter(|r| r.is_finite())
}

/// Build the feature record for a snapshot.
pub fn build_features(snapshot: &LatestSnapshot) -> FeatureRecord {
    // ---
    let s = &snapshot.sample;
    FeatureRecord {
        moisture: round_to(s.moisture, 1),
        temp_c: round_to(s.temperature_c, 1),
        humidity: round_to(s.humidity_pct, 1),
        light_lux: round_to(s.light_lux, 0),
        color_index: round_to(snapshot.color_index, 2),
        ec: round_to(snapshot.ec_ms_cm, 2),
        ph: round_to(snapshot.ph, 2),
        soil_temp_c: round_to(snapshot.soil_temp_c, 1),
        growth_stage: snapshot.growth_stage,
    }
}

/// A value rendered at fixed precision, or `NA`.
pub(crate) struct Na(pub Option<f64>, pub usize);

impl fmt::Display for Na {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.*}", self.1, v),
            None => f.write_str("NA"),
        }
    }
}

/// Serialize the record as the single-line `key=value` prompt string.
pub fn render_compact(fv: &FeatureRecord) -> String {
    // ---
    format!(
        "moisture={}%, tempC={}, humidity={}%, light_lux={}, color_index={}, \
         ec={}, ph={}, soil_tempC={}, growth_stage={}",
        Na(fv.moisture, 1),
        Na(fv.temp_c, 1),
        Na(fv.humidity, 1),
        Na(fv.light_lux, 0),
        Na(fv.color_index, 2),
        Na(fv.ec, 2),
        Na(fv.ph, 2),
        Na(fv.soil_temp_c, 1),
        fv.growth_stage.as_str(),
    )
}
