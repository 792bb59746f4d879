use log::{debug, warn};

use crate::catalog::{COMPARISON_FEATURES, REQUIRED_FEATURES};
use crate::config::ModelConfig;
use crate::error::CoreError;
use crate::record::{FeatureSet, ImputationMethod, ImputationRecord, PlayerRecord};
use crate::store::{EntityStore, StoreFilter};

/// Peer candidate cap; beyond this the weighted average barely moves.
pub const MAX_PEERS: usize = 50;

const NEAREST_NEIGHBOR_CONFIDENCE: f64 = 0.70;
const FALLBACK_MEAN_CONFIDENCE: f64 = 0.40;

/// Fill the missing or invalid required features of one player from its
/// positional peers, persisting each estimate back through the store. A
/// feature that cannot be estimated is simply left missing.
pub fn impute_player(
    store: &dyn EntityStore,
    id: u32,
    cfg: &ModelConfig,
) -> Result<Vec<ImputationRecord>, CoreError> {
    let Some(target) = store.get(id) else {
        return Err(CoreError::NotFound(id));
    };

    let peers: Vec<PlayerRecord> = store
        .list(&StoreFilter::position(target.position))
        .into_iter()
        .filter(|p| p.id != target.id)
        .take(MAX_PEERS)
        .collect();

    let mut records = Vec::new();
    for feature in REQUIRED_FEATURES {
        let original = target.features.get(feature).copied();
        if matches!(original, Some(v) if v.is_finite()) {
            continue;
        }

        let Some((imputed, method)) = estimate(&target, &peers, feature, cfg) else {
            debug!("player {id}: no estimate available for {feature}");
            continue;
        };

        store.update_feature(id, feature, imputed)?;
        records.push(ImputationRecord {
            player_id: id,
            feature: feature.to_string(),
            original,
            imputed,
            method,
            confidence: match method {
                ImputationMethod::NearestNeighbor => NEAREST_NEIGHBOR_CONFIDENCE,
                ImputationMethod::FallbackMean => FALLBACK_MEAN_CONFIDENCE,
            },
        });
    }
    Ok(records)
}

/// Batch pass over the whole population. Per-player failures are logged and
/// skipped so one bad record cannot abort a maintenance run.
pub fn impute_population(store: &dyn EntityStore, cfg: &ModelConfig) -> Vec<ImputationRecord> {
    let mut out = Vec::new();
    for player in store.list(&StoreFilter::all()) {
        match impute_player(store, player.id, cfg) {
            Ok(records) => out.extend(records),
            Err(err) => warn!("imputation skipped for player {}: {err}", player.id),
        }
    }
    out
}

fn estimate(
    target: &PlayerRecord,
    peers: &[PlayerRecord],
    feature: &str,
    cfg: &ModelConfig,
) -> Option<(f64, ImputationMethod)> {
    if !peers.is_empty() {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for peer in peers {
            let Some(value) = peer.features.get(feature).copied().filter(|v| v.is_finite())
            else {
                continue;
            };
            let Some(sim) = similarity(&target.features, &peer.features, cfg) else {
                continue;
            };
            weighted_sum += sim * value;
            weight_total += sim;
        }
        if weight_total > 0.0 {
            return Some((weighted_sum / weight_total, ImputationMethod::NearestNeighbor));
        }
    }

    cfg.group_mean(target.position, feature)
        .map(|mean| (mean, ImputationMethod::FallbackMean))
}

/// Normalized-distance similarity over the fixed comparison subset. `None`
/// when the pair shares no comparable feature.
fn similarity(target: &FeatureSet, peer: &FeatureSet, cfg: &ModelConfig) -> Option<f64> {
    let mut diff_sum = 0.0;
    let mut compared = 0usize;
    for feature in COMPARISON_FEATURES {
        let (Some(a), Some(b)) = (finite(target, feature), finite(peer, feature)) else {
            continue;
        };
        let width = cfg.range_for(feature).width();
        if width <= 0.0 {
            continue;
        }
        diff_sum += (a - b).abs() / width;
        compared += 1;
    }
    if compared == 0 {
        return None;
    }
    Some((1.0 - diff_sum / compared as f64).max(0.0))
}

fn finite(set: &FeatureSet, feature: &str) -> Option<f64> {
    set.get(feature).copied().filter(|v| v.is_finite())
}
