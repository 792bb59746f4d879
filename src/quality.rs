use std::collections::BTreeMap;

use log::info;
use rayon::prelude::*;

use crate::catalog::REQUIRED_FEATURES;
use crate::config::ModelConfig;
use crate::error::CoreError;
use crate::outlier;
use crate::record::{
    FreshnessSummary, ImputationRecord, OutlierRecord, PlayerRecord, QualityReport, SourceHealth,
    ValidationReport,
};
use crate::store::{EntityStore, StoreFilter};

/// Freshness and upstream health live on the ingestion side; callers hand the
/// latest snapshot in and the report passes it through untouched.
#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub freshness: FreshnessSummary,
    pub sources: BTreeMap<String, SourceHealth>,
}

/// Classify every required feature of one record as missing, invalid,
/// out-of-range, or valid. Out-of-range values are reported but do not make
/// the record invalid; they feed the outlier path instead.
pub fn validate(player: &PlayerRecord, cfg: &ModelConfig) -> ValidationReport {
    let mut missing = Vec::new();
    let mut invalid = Vec::new();
    let mut out_of_range = Vec::new();

    for feature in REQUIRED_FEATURES {
        match player.features.get(feature) {
            None => missing.push(feature.to_string()),
            Some(v) if !v.is_finite() => invalid.push(feature.to_string()),
            Some(v) if !cfg.range_for(feature).contains(*v) => {
                out_of_range.push(feature.to_string())
            }
            Some(_) => {}
        }
    }

    let total = REQUIRED_FEATURES.len() as f64;
    let quality_score =
        ((1.0 - missing.len() as f64 / total) + (1.0 - invalid.len() as f64 / total)) / 2.0;

    ValidationReport {
        is_valid: missing.is_empty() && invalid.is_empty(),
        missing,
        invalid,
        out_of_range,
        quality_score,
    }
}

pub fn validate_id(
    store: &dyn EntityStore,
    id: u32,
    cfg: &ModelConfig,
) -> Result<ValidationReport, CoreError> {
    let Some(player) = store.get(id) else {
        return Err(CoreError::NotFound(id));
    };
    Ok(validate(&player, cfg))
}

/// Population-wide quality assessment: completeness, the outlier scan over
/// every monitored feature, recent imputations, and pass-through telemetry.
pub fn assess(
    store: &dyn EntityStore,
    telemetry: &TelemetrySnapshot,
    recent_imputations: Vec<ImputationRecord>,
) -> QualityReport {
    let players = store.list(&StoreFilter::all());
    let total_records = players.len();

    let missing_points: usize = players
        .iter()
        .map(|p| {
            REQUIRED_FEATURES
                .iter()
                .filter(|f| !p.features.contains_key(**f))
                .count()
        })
        .sum();

    let total_points = total_records * REQUIRED_FEATURES.len();
    let completeness = if total_points > 0 {
        1.0 - missing_points as f64 / total_points as f64
    } else {
        1.0
    };

    // Features are independent, so the per-feature scans parallelize cleanly.
    let mut outliers: Vec<OutlierRecord> = REQUIRED_FEATURES
        .par_iter()
        .flat_map_iter(|feature| outlier::detect_feature_outliers(&players, feature))
        .collect();
    outliers.sort_by(|a, b| {
        a.feature
            .cmp(&b.feature)
            .then(a.player_id.cmp(&b.player_id))
    });

    info!(
        "quality assessment: {total_records} records, {missing_points} missing points, \
         {} outliers",
        outliers.len()
    );

    QualityReport {
        total_records,
        missing_points,
        completeness,
        outliers,
        imputations: recent_imputations,
        freshness: telemetry.freshness.clone(),
        sources: telemetry.sources.clone(),
    }
}
