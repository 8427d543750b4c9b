//! Unit conversion from device fields to the canonical schema.

use crate::models::{GrowthStage, LatestSnapshot, NormalizedSample, RawSample};

// ---

/// Fahrenheit to Celsius. Missing in, missing out.
pub fn f_to_c(temp_f: Option<f64>) -> Option<f64> {
    temp_f
        .map(|f| (f - 32.0) * 5.0 / 9.0)
        .filter(|c| c.is_finite())
}

/// Map a raw record onto canonical units.
///
/// `soil`, `hum` and `light` are copied as-is; `temp` is converted to Celsius.
/// The timestamp passes through untouched, so records without one are still
/// returned and only filtered later when a history window is built.
pub fn normalize(raw: &RawSample) -> NormalizedSample {
    // ---
    NormalizedSample {
        ts: raw.ts,
        moisture: raw.soil,
        temperature_c: f_to_c(raw.temp),
        humidity_pct: raw.hum,
        light_lux: raw.light,
    }
}

/// Normalize a `latest` record, carrying the optional enrichment fields.
pub fn normalize_latest(raw: &RawSample) -> LatestSnapshot {
    // ---
    LatestSnapshot {
        sample: normalize(raw),
        color_index: raw.color_index,
        ec_ms_cm: raw.ec_ms_cm,
        ph: raw.ph,
        soil_temp_c: raw.soil_temp_c,
        growth_stage: raw
            .growth_stage
            .as_deref()
            .map(GrowthStage::parse)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_fahrenheit_conversion() {
        // ---
        assert_eq!(f_to_c(Some(32.0)), Some(0.0));
        assert_eq!(f_to_c(Some(212.0)), Some(100.0));
        assert_eq!(f_to_c(None), None);

        let c = f_to_c(Some(77.0)).unwrap();
        assert!((c - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fields_normalize_to_none() {
        // ---
        let n = normalize(&RawSample::default());
        assert_eq!(n, NormalizedSample::default());
        assert!(n.ts.is_none());
        assert!(n.moisture.is_none());
        assert!(n.temperature_c.is_none());
        assert!(n.humidity_pct.is_none());
        assert!(n.light_lux.is_none());
    }

    #[test]
    fn test_field_mapping() {
        // ---
        let raw = RawSample {
            soil: Some(40.0),
            temp: Some(50.0),
            hum: Some(60.0),
            light: Some(1200.0),
            ts: Some(1_000.0),
            ..RawSample::default()
        };
        let n = normalize(&raw);

        assert_eq!(n.ts, Some(1_000.0));
        assert_eq!(n.moisture, Some(40.0));
        assert_eq!(n.temperature_c, Some(10.0));
        assert_eq!(n.humidity_pct, Some(60.0));
        assert_eq!(n.light_lux, Some(1200.0));
    }

    #[test]
    fn test_latest_defaults_enrichment_to_na() {
        // ---
        let raw = RawSample {
            soil: Some(33.0),
            ..RawSample::default()
        };
        let latest = normalize_latest(&raw);

        assert_eq!(latest.sample.moisture, Some(33.0));
        assert_eq!(latest.ec_ms_cm, None);
        assert_eq!(latest.ph, None);
        assert_eq!(latest.soil_temp_c, None);
        assert_eq!(latest.color_index, None);
        assert_eq!(latest.growth_stage, GrowthStage::Unknown);
    }

    #[test]
    fn test_latest_keeps_enrichment() {
        // ---
        let raw = RawSample {
            ph: Some(6.4),
            growth_stage: Some("flower".to_string()),
            ..RawSample::default()
        };
        let latest = normalize_latest(&raw);

        assert_eq!(latest.ph, Some(6.4));
        assert_eq!(latest.growth_stage, GrowthStage::Flower);
    }
}
