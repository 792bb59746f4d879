use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, FeatureRange};
use crate::record::{PositionGroup, StatType};

const OPPONENT_K: f64 = 0.01;
const DEFAULT_TEAM_STRENGTH: f64 = 70.0;

/// Static model configuration. All tables are plain data so a deployment can
/// swap them out via JSON without touching orchestration code. Keys of the
/// composed tables are `"GROUP:stat"` / `"GROUP:feature"` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub opponent_k: f64,
    pub default_team_strength: f64,
    /// Per-feature range overrides layered over the built-in catalog.
    pub feature_ranges: BTreeMap<String, FeatureRange>,
    /// `(position group, stat type)` contribution multipliers.
    pub position_multipliers: BTreeMap<String, f64>,
    /// Base expectation per stat type when a player has no history.
    pub stat_defaults: BTreeMap<String, f64>,
    /// `(position group, feature)` means used as the imputation fallback.
    pub group_means: BTreeMap<String, f64>,
    /// Team name -> strength on a roughly 0-100 scale.
    pub team_strengths: BTreeMap<String, f64>,
    /// Match-rating baseline per position group.
    pub rating_baselines: BTreeMap<String, f64>,
    /// Rating bonus per unit of expected contribution, per stat type.
    pub rating_bonuses: BTreeMap<String, f64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            opponent_k: OPPONENT_K,
            default_team_strength: DEFAULT_TEAM_STRENGTH,
            feature_ranges: BTreeMap::new(),
            position_multipliers: builtin_position_multipliers(),
            stat_defaults: builtin_stat_defaults(),
            group_means: builtin_group_means(),
            team_strengths: BTreeMap::new(),
            rating_baselines: builtin_rating_baselines(),
            rating_bonuses: builtin_rating_bonuses(),
        }
    }
}

static BUILTIN: Lazy<ModelConfig> = Lazy::new(ModelConfig::default);

impl ModelConfig {
    pub fn builtin() -> &'static ModelConfig {
        &BUILTIN
    }

    pub fn range_for(&self, feature: &str) -> FeatureRange {
        self.feature_ranges
            .get(feature)
            .copied()
            .unwrap_or_else(|| catalog::range_for(feature))
    }

    pub fn position_multiplier(&self, group: PositionGroup, stat: StatType) -> f64 {
        self.position_multipliers
            .get(&group_stat_key(group, stat.key()))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn stat_default(&self, stat: StatType) -> f64 {
        self.stat_defaults.get(stat.key()).copied().unwrap_or(0.5)
    }

    pub fn group_mean(&self, group: PositionGroup, feature: &str) -> Option<f64> {
        self.group_means
            .get(&group_stat_key(group, feature))
            .copied()
    }

    pub fn team_strength(&self, team: &str) -> f64 {
        self.team_strengths
            .get(team)
            .copied()
            .unwrap_or(self.default_team_strength)
    }

    pub fn rating_baseline(&self, group: PositionGroup) -> f64 {
        self.rating_baselines
            .get(group.code())
            .copied()
            .unwrap_or(6.8)
    }

    pub fn rating_bonus(&self, stat: StatType) -> f64 {
        self.rating_bonuses.get(stat.key()).copied().unwrap_or(0.3)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read model config {}", path.display()))?;
        serde_json::from_str(&raw).context("parse model config")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).context("serialize model config")?;
        fs::write(&tmp, json).context("write model config")?;
        fs::rename(&tmp, path).context("swap model config")?;
        Ok(())
    }
}

pub fn group_stat_key(group: PositionGroup, key: &str) -> String {
    format!("{}:{}", group.code(), key)
}

fn builtin_position_multipliers() -> BTreeMap<String, f64> {
    let rows: [(PositionGroup, [f64; 8]); 4] = [
        // goals, assists, goal_contributions, saves, tackles, interceptions,
        // clean_sheets, key_passes
        (
            PositionGroup::Goalkeeper,
            [0.0, 0.0, 0.0, 1.5, 0.0, 0.0, 1.0, 0.0],
        ),
        (
            PositionGroup::Defender,
            [0.7, 0.8, 0.7, 0.0, 1.5, 1.3, 0.8, 0.7],
        ),
        (
            PositionGroup::Midfielder,
            [1.0, 1.2, 1.1, 0.0, 1.0, 1.0, 0.5, 1.3],
        ),
        (
            PositionGroup::Forward,
            [1.5, 1.2, 1.4, 0.0, 0.6, 0.6, 0.3, 1.1],
        ),
    ];
    let stats = [
        StatType::Goals,
        StatType::Assists,
        StatType::GoalContributions,
        StatType::Saves,
        StatType::Tackles,
        StatType::Interceptions,
        StatType::CleanSheets,
        StatType::KeyPasses,
    ];

    let mut out = BTreeMap::new();
    for (group, weights) in rows {
        for (stat, w) in stats.iter().zip(weights) {
            out.insert(group_stat_key(group, stat.key()), w);
        }
    }
    out
}

fn builtin_stat_defaults() -> BTreeMap<String, f64> {
    [
        (StatType::Goals, 0.3),
        (StatType::Assists, 0.25),
        (StatType::GoalContributions, 0.5),
        (StatType::Saves, 3.0),
        (StatType::Tackles, 2.5),
        (StatType::Interceptions, 1.5),
        (StatType::CleanSheets, 0.3),
        (StatType::KeyPasses, 1.2),
    ]
    .into_iter()
    .map(|(stat, v)| (stat.key().to_string(), v))
    .collect()
}

fn builtin_group_means() -> BTreeMap<String, f64> {
    // Order follows catalog::REQUIRED_FEATURES.
    let rows: [(PositionGroup, [f64; 10]); 4] = [
        (
            PositionGroup::Goalkeeper,
            [6.7, 0.72, 0.0, 0.52, 0.0, 0.1, 14.0, 0.5, 1.0, 420.0],
        ),
        (
            PositionGroup::Defender,
            [6.8, 0.84, 0.30, 0.58, 0.2, 0.3, 0.0, 11.0, 7.0, 400.0],
        ),
        (
            PositionGroup::Midfielder,
            [6.9, 0.86, 0.38, 0.52, 0.8, 1.0, 0.0, 9.0, 5.0, 380.0],
        ),
        (
            PositionGroup::Forward,
            [7.0, 0.78, 0.45, 0.46, 2.0, 1.1, 0.0, 4.0, 2.0, 370.0],
        ),
    ];

    let mut out = BTreeMap::new();
    for (group, means) in rows {
        for (feature, mean) in catalog::REQUIRED_FEATURES.iter().zip(means) {
            out.insert(group_stat_key(group, feature), mean);
        }
    }
    out
}

fn builtin_rating_baselines() -> BTreeMap<String, f64> {
    [
        (PositionGroup::Goalkeeper, 6.7),
        (PositionGroup::Defender, 6.8),
        (PositionGroup::Midfielder, 6.9),
        (PositionGroup::Forward, 7.0),
    ]
    .into_iter()
    .map(|(group, v)| (group.code().to_string(), v))
    .collect()
}

fn builtin_rating_bonuses() -> BTreeMap<String, f64> {
    [
        (StatType::Goals, 1.2),
        (StatType::Assists, 0.9),
        (StatType::GoalContributions, 0.8),
        (StatType::Saves, 0.15),
        (StatType::Tackles, 0.25),
        (StatType::Interceptions, 0.25),
        (StatType::CleanSheets, 0.8),
        (StatType::KeyPasses, 0.3),
    ]
    .into_iter()
    .map(|(stat, v)| (stat.key().to_string(), v))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_every_group_and_stat() {
        let cfg = ModelConfig::default();
        for group in PositionGroup::ALL {
            for stat in StatType::ALL {
                let key = group_stat_key(group, stat.key());
                assert!(cfg.position_multipliers.contains_key(&key), "missing {key}");
            }
            for feature in catalog::REQUIRED_FEATURES {
                assert!(cfg.group_mean(group, feature).is_some());
            }
        }
        for stat in StatType::ALL {
            assert!(cfg.stat_defaults.contains_key(stat.key()));
        }
    }

    #[test]
    fn goalkeepers_zero_out_outfield_stats() {
        let cfg = ModelConfig::default();
        let gk = PositionGroup::Goalkeeper;
        assert_eq!(cfg.position_multiplier(gk, StatType::Goals), 0.0);
        assert_eq!(cfg.position_multiplier(gk, StatType::Tackles), 0.0);
        assert!(cfg.position_multiplier(gk, StatType::Saves) > 1.0);
        assert!(cfg.position_multiplier(gk, StatType::CleanSheets) > 0.0);
    }

    #[test]
    fn unknown_team_gets_default_strength() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.team_strength("Nowhere FC"), cfg.default_team_strength);
    }

    #[test]
    fn partial_json_keeps_builtin_defaults() {
        let cfg: ModelConfig = serde_json::from_str(r#"{"opponent_k": 0.02}"#).unwrap();
        assert_eq!(cfg.opponent_k, 0.02);
        assert!(!cfg.position_multipliers.is_empty());
    }
}
