use crate::record::{OutlierRecord, OutlierSeverity, PlayerRecord};

/// Below this sample size the interquartile envelope is too noisy to trust,
/// so detection skips the feature entirely.
pub const MIN_POPULATION: usize = 10;

const IQR_FENCE: f64 = 1.5;
const EXTREME_SIGMA: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub q1: f64,
    pub q3: f64,
    pub low: f64,
    pub high: f64,
}

/// Interquartile envelope for a population sample, or `None` when the sample
/// is below `MIN_POPULATION`.
pub fn envelope(values: &[f64]) -> Option<Envelope> {
    if values.len() < MIN_POPULATION {
        return None;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = percentile(&sorted, 25.0);
    let q3 = percentile(&sorted, 75.0);
    let iqr = q3 - q1;
    Some(Envelope {
        q1,
        q3,
        low: q1 - IQR_FENCE * iqr,
        high: q3 + IQR_FENCE * iqr,
    })
}

/// Scan one feature across the population. Non-finite values never enter the
/// sample; they are the imputer's problem, not the detector's.
pub fn detect_feature_outliers(players: &[PlayerRecord], feature: &str) -> Vec<OutlierRecord> {
    let sample: Vec<(u32, f64)> = players
        .iter()
        .filter_map(|p| {
            p.features
                .get(feature)
                .copied()
                .filter(|v| v.is_finite())
                .map(|v| (p.id, v))
        })
        .collect();

    let values: Vec<f64> = sample.iter().map(|&(_, v)| v).collect();
    let Some(env) = envelope(&values) else {
        return Vec::new();
    };

    // Severity stats come from the in-envelope values; a single wild value
    // would otherwise inflate the stddev enough to downgrade itself.
    let inliers: Vec<f64> = values
        .iter()
        .copied()
        .filter(|&v| v >= env.low && v <= env.high)
        .collect();
    let n = inliers.len().max(1) as f64;
    let mean = inliers.iter().sum::<f64>() / n;
    let variance = inliers.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    sample
        .into_iter()
        .filter(|&(_, v)| v < env.low || v > env.high)
        .map(|(player_id, value)| {
            let severity = if stddev > 0.0 && (value - mean).abs() > EXTREME_SIGMA * stddev {
                OutlierSeverity::Extreme
            } else {
                OutlierSeverity::Moderate
            };
            OutlierRecord {
                player_id,
                feature: feature.to_string(),
                value,
                expected_low: env.low,
                expected_high: env.high,
                severity,
            }
        })
        .collect()
}

/// Linear-interpolation percentile over an already-sorted slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = idx - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
