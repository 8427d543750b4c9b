//! History window digest: per-metric average, range and trend.
//!
//! The digest turns an unordered, partially-missing set of samples into a
//! single fixed-format line for the prompt. Trends are two-point slopes
//! between the first and last present value of each metric. This is
//! sensitive to noise at either endpoint; a least-squares fit is not used.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::features::Na;
use crate::models::NormalizedSample;

// ---

/// Floor for the elapsed time of a trend, in seconds.
const MIN_ELAPSED_SECS: f64 = 1e-6;

/// Why no digest could be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryGap {
    /// No sample carried a timestamp.
    NoHistory,
    /// Fewer than two samples remained in the window.
    InsufficientPoints,
}

impl fmt::Display for HistoryGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHistory => f.write_str("no_history"),
            Self::InsufficientPoints => f.write_str("insufficient_points"),
        }
    }
}

/// Statistics for one metric over the window. `None` is NA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub trend_per_hour: Option<f64>,
}

/// Read-only summary of a history window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryDigest {
    // ---
    /// Samples retained in the window.
    pub samples: usize,
    pub start_ts: f64,
    pub end_ts: f64,
    pub window_hours: f64,
    pub moisture: MetricSummary,
    pub temperature_c: MetricSummary,
    pub humidity_pct: MetricSummary,
    pub light_lux: MetricSummary,
}

impl HistoryDigest {
    // ---
    pub fn window_start(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.start_ts)
    }

    pub fn window_end(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.end_ts)
    }
}

fn to_datetime(ts: f64) -> Option<DateTime<Utc>> {
    // ---
    let secs = ts.floor();
    let nanos = ((ts - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
}

impl fmt::Display for HistoryDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ---
        let (m, t, h, l) = (
            &self.moisture,
            &self.temperature_c,
            &self.humidity_pct,
            &self.light_lux,
        );
        write!(
            f,
            "window={:.1}h; \
             moisture avg {}% (min {} max {}), trend {}%/h; \
             tempC avg {} (min {} max {}), trend {}°C/h; \
             humidity avg {}% (min {} max {}), trend {}%/h; \
             light avg {} lux (min {} max {}), trend {} lux/h.",
            self.window_hours,
            Na(m.avg, 1),
            Na(m.min, 1),
            Na(m.max, 1),
            Na(m.trend_per_hour, 1),
            Na(t.avg, 1),
            Na(t.min, 1),
            Na(t.max, 1),
            Na(t.trend_per_hour, 1),
            Na(h.avg, 1),
            Na(h.min, 1),
            Na(h.max, 1),
            Na(h.trend_per_hour, 1),
            Na(l.avg, 0),
            Na(l.min, 0),
            Na(l.max, 0),
            Na(l.trend_per_hour, 0),
        )
    }
}

// ---

/// Samples with a timestamp, stably sorted ascending by that timestamp.
///
/// Duplicate timestamps are kept and retain their input order.
pub fn time_ordered(samples: &[NormalizedSample]) -> Vec<(f64, &NormalizedSample)> {
    // ---
    let mut ordered: Vec<(f64, &NormalizedSample)> = samples
        .iter()
        .filter_map(|s| s.ts.filter(|t| t.is_finite()).map(|t| (t, s)))
        .collect();
    ordered.sort_by(|a, b| a.0.total_cmp(&b.0));
    ordered
}

/// The last `limit` time-ordered samples; `limit <= 0` keeps everything.
pub fn window(samples: &[NormalizedSample], limit: i64) -> Vec<(f64, &NormalizedSample)> {
    // ---
    let mut ordered = time_ordered(samples);
    if let Ok(keep) = usize::try_from(limit) {
        if keep > 0 && ordered.len() > keep {
            ordered.drain(..ordered.len() - keep);
        }
    }
    ordered
}

fn summarize_metric(
    window: &[(f64, &NormalizedSample)],
    field: impl Fn(&NormalizedSample) -> Option<f64>,
) -> MetricSummary {
    // ---
    let series: Vec<(f64, f64)> = window
        .iter()
        .filter_map(|(t, s)| field(s).map(|v| (*t, v)))
        .collect();

    let (Some(&(t0, v0)), Some(&(t1, v1))) = (series.first(), series.last()) else {
        return MetricSummary::default();
    };

    let values = series.iter().map(|(_, v)| *v);
    let sum: f64 = values.clone().sum();
    let min = values.clone().fold(f64::INFINITY, f64::min);
    let max = values.fold(f64::NEG_INFINITY, f64::max);

    let trend_per_hour = if series.len() >= 2 {
        let hours = (t1 - t0).max(MIN_ELAPSED_SECS) / 3600.0;
        finite((v1 - v0) / hours)
    } else {
        None
    };

    MetricSummary {
        avg: finite(sum / series.len() as f64),
        min: finite(min),
        max: finite(max),
        trend_per_hour,
    }
}

fn finite(v: f64) -> Option<f64> {
    Some(v).filter(|v| v.is_finite())
}

/// Digest the most recent `limit` samples of `history`.
pub fn digest(history: &[NormalizedSample], limit: i64) -> Result<HistoryDigest, HistoryGap> {
    // ---
    let recent = window(history, limit);
    if recent.is_empty() {
        return Err(HistoryGap::NoHistory);
    }
    if recent.len() < 2 {
        return Err(HistoryGap::InsufficientPoints);
    }

    let start_ts = recent[0].0;
    let end_ts = recent[recent.len() - 1].0;

    Ok(HistoryDigest {
        samples: recent.len(),
        start_ts,
        end_ts,
        window_hours: ((end_ts - start_ts) / 3600.0).max(0.0),
        moisture: summarize_metric(&recent, |s| s.moisture),
        temperature_c: summarize_metric(&recent, |s| s.temperature_c),
        humidity_pct: summarize_metric(&recent, |s| s.humidity_pct),
        light_lux: summarize_metric(&recent, |s| s.light_lux),
    })
}

/// Render the digest line, or `no_history` / `insufficient_points`.
pub fn summarize(history: &[NormalizedSample], limit: i64) -> String {
    // ---
    match digest(history, limit) {
        Ok(d) => d.to_string(),
        Err(gap) => gap.to_string(),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn sample(ts: f64, moisture: f64) -> NormalizedSample {
        // ---
        NormalizedSample {
            ts: Some(ts),
            moisture: Some(moisture),
            temperature_c: Some(20.0),
            humidity_pct: Some(50.0),
            light_lux: Some(1000.0),
        }
    }

    #[test]
    fn test_empty_history() {
        // ---
        assert_eq!(summarize(&[], 48), "no_history");
    }

    #[test]
    fn test_samples_without_timestamp() {
        // ---
        let mut s = sample(0.0, 40.0);
        s.ts = None;
        assert_eq!(summarize(&[s, s, s], 48), "no_history");
        assert_eq!(digest(&[s], 0), Err(HistoryGap::NoHistory));
    }

    #[test]
    fn test_single_sample() {
        // ---
        assert_eq!(summarize(&[sample(100.0, 40.0)], 48), "insufficient_points");
    }

    #[test]
    fn test_limit_of_one_is_insufficient() {
        // ---
        let history = [sample(0.0, 40.0), sample(60.0, 41.0)];
        assert_eq!(summarize(&history, 1), "insufficient_points");
    }

    #[test]
    fn test_moisture_trend_per_hour() {
        // ---
        let history = [sample(0.0, 40.0), sample(3600.0, 30.0)];
        let d = digest(&history, 48).unwrap();

        assert_eq!(d.moisture.trend_per_hour, Some(-10.0));
        assert_eq!(d.window_hours, 1.0);
        assert!(summarize(&history, 48).contains("trend -10.0%/h"));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        // ---
        let history = [
            sample(7200.0, 30.0),
            sample(0.0, 40.0),
            sample(3600.0, 50.0),
        ];
        let d = digest(&history, 0).unwrap();

        assert_eq!(d.start_ts, 0.0);
        assert_eq!(d.end_ts, 7200.0);
        assert_eq!(d.moisture.avg, Some(40.0));
        assert_eq!(d.moisture.min, Some(30.0));
        assert_eq!(d.moisture.max, Some(50.0));
        assert_eq!(d.moisture.trend_per_hour, Some(-5.0));
    }

    #[test]
    fn test_truncation_uses_most_recent() {
        // ---
        let history: Vec<_> = (0..100).map(|i| sample(i as f64 * 600.0, 40.0)).collect();
        let d = digest(&history, 10).unwrap();

        assert_eq!(d.samples, 10);
        assert_eq!(d.start_ts, 90.0 * 600.0);
        assert!((d.window_hours - 1.5).abs() < 1e-9);
        assert!(summarize(&history, 10).starts_with("window=1.5h;"));

        let all = digest(&history, 0).unwrap();
        assert_eq!(all.samples, 100);
        assert!((all.window_hours - 16.5).abs() < 1e-9);

        let negative = digest(&history, -5).unwrap();
        assert_eq!(negative.samples, 100);
    }

    #[test]
    fn test_metrics_filtered_independently() {
        // ---
        let mut a = sample(0.0, 40.0);
        let mut b = sample(1800.0, 35.0);
        let mut c = sample(3600.0, 30.0);
        a.light_lux = None;
        c.light_lux = None;
        b.humidity_pct = None;
        c.humidity_pct = None;
        a.temperature_c = None;
        b.temperature_c = None;
        c.temperature_c = None;

        let d = digest(&[a, b, c], 0).unwrap();

        assert_eq!(d.moisture.trend_per_hour, Some(-10.0));
        assert_eq!(d.light_lux.avg, Some(1000.0));
        assert_eq!(d.light_lux.trend_per_hour, None);
        assert_eq!(d.humidity_pct.min, Some(50.0));
        assert_eq!(d.humidity_pct.trend_per_hour, None);
        assert_eq!(d.temperature_c, MetricSummary::default());

        let line = d.to_string();
        assert!(line.contains("tempC avg NA (min NA max NA), trend NA°C/h;"));
        assert!(line.contains("light avg 1000 lux (min 1000 max 1000), trend NA lux/h."));
    }

    #[test]
    fn test_full_line_format() {
        // ---
        let history = [
            NormalizedSample {
                ts: Some(0.0),
                moisture: Some(40.0),
                temperature_c: Some(20.0),
                humidity_pct: Some(60.0),
                light_lux: Some(1000.0),
            },
            NormalizedSample {
                ts: Some(7200.0),
                moisture: Some(36.0),
                temperature_c: Some(24.0),
                humidity_pct: Some(50.0),
                light_lux: Some(3000.0),
            },
        ];

        assert_eq!(
            summarize(&history, 48),
            "window=2.0h; \
             moisture avg 38.0% (min 36.0 max 40.0), trend -2.0%/h; \
             tempC avg 22.0 (min 20.0 max 24.0), trend 2.0°C/h; \
             humidity avg 55.0% (min 50.0 max 60.0), trend -5.0%/h; \
             light avg 2000 lux (min 1000 max 3000), trend 1000 lux/h."
        );
    }

    #[test]
    fn test_duplicate_timestamps_keep_input_order() {
        // ---
        let history = [sample(0.0, 10.0), sample(3600.0, 20.0), sample(3600.0, 30.0)];
        let ordered = time_ordered(&history);
        let moistures: Vec<_> = ordered.iter().map(|(_, s)| s.moisture).collect();
        assert_eq!(moistures, vec![Some(10.0), Some(20.0), Some(30.0)]);

        let d = digest(&history, 0).unwrap();
        assert_eq!(d.moisture.trend_per_hour, Some(20.0));
    }

    #[test]
    fn test_zero_span_stays_finite() {
        // ---
        let history = [sample(500.0, 40.0), sample(500.0, 40.0)];
        let d = digest(&history, 0).unwrap();

        assert_eq!(d.window_hours, 0.0);
        assert_eq!(d.moisture.trend_per_hour, Some(0.0));
    }

    #[test]
    fn test_window_bounds_as_datetime() {
        // ---
        let history = [sample(1_700_000_000.0, 40.0), sample(1_700_003_600.0, 41.0)];
        let d = digest(&history, 0).unwrap();

        assert_eq!(d.window_start().unwrap().timestamp(), 1_700_000_000);
        assert_eq!(d.window_end().unwrap().timestamp(), 1_700_003_600);
    }
}
