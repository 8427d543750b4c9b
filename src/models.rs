//! Data models for the plant telemetry pipeline.
//!
//! `RawSample` mirrors what the device writes into the realtime database.
//! Every field is optional and untrusted, so deserialization coerces each
//! field on its own and never rejects a record because of one bad value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---

/// Raw sensor record as stored under `/nodes/{id}/latest` or `/history`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSample {
    // ---
    /// Soil moisture, percent.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub soil: Option<f64>,

    /// Air temperature, Fahrenheit.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temp: Option<f64>,

    /// Relative humidity, percent.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub hum: Option<f64>,

    /// Illuminance, lux.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub light: Option<f64>,

    /// Seconds since the Unix epoch.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ts: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub color_index: Option<f64>,

    /// Electrical conductivity, mS/cm.
    #[serde(default, rename = "ec_mScm", deserialize_with = "lenient_f64")]
    pub ec_ms_cm: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub ph: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub soil_temp_c: Option<f64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub growth_stage: Option<String>,
}

/// A sample mapped onto canonical units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NormalizedSample {
    // ---
    pub ts: Option<f64>,
    pub moisture: Option<f64>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub light_lux: Option<f64>,
}

/// Plant growth stage reported by an external classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthStage {
    Seedling,
    Veg,
    Flower,
    #[default]
    Unknown,
}

impl GrowthStage {
    // ---
    /// Parse a stage label; anything unrecognized is `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "seedling" => Self::Seedling,
            "veg" | "vegetative" => Self::Veg,
            "flower" | "flowering" => Self::Flower,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seedling => "seedling",
            Self::Veg => "veg",
            Self::Flower => "flower",
            Self::Unknown => "unknown",
        }
    }
}

/// The reading used as "current state" for a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestSnapshot {
    // ---
    pub sample: NormalizedSample,
    pub color_index: Option<f64>,
    pub ec_ms_cm: Option<f64>,
    pub ph: Option<f64>,
    pub soil_temp_c: Option<f64>,
    pub growth_stage: GrowthStage,
}

impl LatestSnapshot {
    // ---
    /// Promote a history sample to a snapshot. Enrichment fields stay NA.
    pub fn from_sample(sample: NormalizedSample) -> Self {
        Self {
            sample,
            ..Self::default()
        }
    }
}

// ---

/// Coerce an untrusted JSON value into a finite `f64`.
///
/// Numbers and numeric strings are accepted; everything else is `None`.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    // ---
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_f64(&value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_sample_from_device_record() {
        // ---
        let raw: RawSample = serde_json::from_value(json!({
            "soil": 41.5, "temp": 77.0, "hum": 58, "light": 9200, "ts": 1_700_000_000
        }))
        .unwrap();

        assert_eq!(raw.soil, Some(41.5));
        assert_eq!(raw.temp, Some(77.0));
        assert_eq!(raw.hum, Some(58.0));
        assert_eq!(raw.light, Some(9200.0));
        assert_eq!(raw.ts, Some(1_700_000_000.0));
        assert_eq!(raw.growth_stage, None);
    }

    #[test]
    fn test_malformed_fields_degrade_individually() {
        // ---
        let raw: RawSample = serde_json::from_value(json!({
            "soil": "42.5",
            "temp": "warm",
            "hum": true,
            "light": {"lux": 3},
            "ts": null,
            "ph": "NaN",
            "growth_stage": 3
        }))
        .unwrap();

        assert_eq!(raw.soil, Some(42.5));
        assert_eq!(raw.temp, None);
        assert_eq!(raw.hum, None);
        assert_eq!(raw.light, None);
        assert_eq!(raw.ts, None);
        assert_eq!(raw.ph, None);
        assert_eq!(raw.growth_stage, None);
    }

    #[test]
    fn test_empty_record_is_all_absent() {
        // ---
        let raw: RawSample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(raw, RawSample::default());
    }

    #[test]
    fn test_enrichment_fields() {
        // ---
        let raw: RawSample = serde_json::from_value(json!({
            "ec_mScm": 2.1, "soil_temp_c": "23.8", "color_index": 0.62, "growth_stage": "veg"
        }))
        .unwrap();

        assert_eq!(raw.ec_ms_cm, Some(2.1));
        assert_eq!(raw.soil_temp_c, Some(23.8));
        assert_eq!(raw.color_index, Some(0.62));
        assert_eq!(raw.growth_stage.as_deref(), Some("veg"));
    }

    #[test]
    fn test_growth_stage_parse() {
        // ---
        assert_eq!(GrowthStage::parse("Seedling"), GrowthStage::Seedling);
        assert_eq!(GrowthStage::parse(" veg "), GrowthStage::Veg);
        assert_eq!(GrowthStage::parse("flowering"), GrowthStage::Flower);
        assert_eq!(GrowthStage::parse("fruiting"), GrowthStage::Unknown);
        assert_eq!(GrowthStage::default().as_str(), "unknown");
    }
}
