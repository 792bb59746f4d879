use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{self, REQUIRED_FEATURES};
use crate::config::ModelConfig;
use crate::record::{FeatureSet, PlayerRecord, PositionGroup, StatType};
use crate::store::MemoryStore;

const TEAMS: [(&str, f64); 6] = [
    ("Crestfield", 88.0),
    ("Harbour Town", 84.0),
    ("Milldale United", 79.0),
    ("Northgate", 74.0),
    ("Oakwell Rovers", 69.0),
    ("Valley Rangers", 64.0),
];

/// Seeded synthetic population for the demo binary and benches. Deliberately
/// includes missing features and the occasional wild value so the quality
/// pipeline has real work to do; the seed keeps runs reproducible.
pub fn sample_store(seed: u64, player_count: usize) -> MemoryStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let store = MemoryStore::new();

    for id in 0..player_count as u32 {
        let (team, _) = TEAMS[rng.gen_range(0..TEAMS.len())];
        let position = PositionGroup::ALL[rng.gen_range(0..PositionGroup::ALL.len())];
        let stat_type = primary_stat(position);

        let mut features = FeatureSet::new();
        for feature in REQUIRED_FEATURES {
            // Roughly one in eight points is missing upstream.
            if rng.gen_bool(0.125) {
                continue;
            }
            let range = catalog::range_for(feature);
            let mut value = rng.gen_range(range.min..=range.min + range.width() * 0.6);
            // A rare stale-feed artifact lands well outside the valid range.
            if rng.gen_bool(0.01) {
                value = range.max * 3.0;
            }
            features.insert(feature.to_string(), value);
        }

        let match_count = rng.gen_range(0..=30u32);
        let minutes_per_match = rng.gen_range(20.0..=90.0);
        let stat_per_match = match stat_type {
            StatType::Saves => rng.gen_range(1.0..=5.0),
            StatType::Tackles => rng.gen_range(0.5..=4.0),
            StatType::Goals => rng.gen_range(0.0..=0.9),
            _ => rng.gen_range(0.0..=1.5),
        };

        store.insert(PlayerRecord {
            id,
            name: format!("Player {id}"),
            team: team.to_string(),
            position,
            stat_type,
            features,
            total_stat: stat_per_match * match_count as f64,
            total_minutes: minutes_per_match * match_count as f64,
            match_count,
            rolling_avg: stat_per_match,
        });
    }

    store
}

/// Builtin config plus strengths for the synthetic teams.
pub fn sample_config() -> ModelConfig {
    let mut cfg = ModelConfig::default();
    for (team, strength) in TEAMS {
        cfg.team_strengths.insert(team.to_string(), strength);
    }
    cfg
}

fn primary_stat(position: PositionGroup) -> StatType {
    match position {
        PositionGroup::Goalkeeper => StatType::Saves,
        PositionGroup::Defender => StatType::Tackles,
        PositionGroup::Midfielder => StatType::KeyPasses,
        PositionGroup::Forward => StatType::Goals,
    }
}
