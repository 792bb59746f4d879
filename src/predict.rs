use crate::config::ModelConfig;
use crate::error::CoreError;
use crate::opponent::opponent_multiplier;
use crate::probability::to_probability;
use crate::record::{MatchContext, PlayerRecord, PredictionResult};
use crate::store::EntityStore;

const MIN_EXPECTED_MINUTES: f64 = 15.0;
const MAX_EXPECTED_MINUTES: f64 = 90.0;
const DEFAULT_EXPECTED_MINUTES: f64 = 75.0;

const MIN_RATING: f64 = 5.0;
const MAX_RATING: f64 = 10.0;

const MAX_CONFIDENCE: f64 = 0.95;
const BASE_CONFIDENCE: f64 = 0.5;
const CONFIDENCE_PER_MATCH: f64 = 0.05;

/// Forecast one player's primary-stat contribution for an upcoming fixture.
/// Pure function of the record plus static configuration; missing history
/// falls back to the per-stat default table rather than failing.
pub fn predict(player: &PlayerRecord, ctx: &MatchContext, cfg: &ModelConfig) -> PredictionResult {
    let base = if player.match_count > 0 {
        player.total_stat / player.match_count as f64
    } else {
        cfg.stat_default(player.stat_type)
    };

    let own = cfg.team_strength(&ctx.own_team);
    let opp = cfg.team_strength(&ctx.opponent_team);
    let opp_mult = opponent_multiplier(player.stat_type, own, opp, cfg.opponent_k);
    let pos_mult = cfg.position_multiplier(player.position, player.stat_type);

    let expected = (base * opp_mult * pos_mult).max(0.0);
    let probability = to_probability(expected, player.stat_type.semantic_class());

    let per_90 = if player.total_minutes > 0.0 {
        player.total_stat / (player.total_minutes / 90.0)
    } else {
        base
    };

    let expected_minutes = if player.match_count > 0 {
        (player.total_minutes / player.match_count as f64)
            .clamp(MIN_EXPECTED_MINUTES, MAX_EXPECTED_MINUTES)
    } else {
        DEFAULT_EXPECTED_MINUTES
    };

    let expected_rating = (cfg.rating_baseline(player.position)
        + cfg.rating_bonus(player.stat_type) * expected)
        .clamp(MIN_RATING, MAX_RATING);

    let confidence = (BASE_CONFIDENCE + CONFIDENCE_PER_MATCH * player.match_count as f64)
        .min(MAX_CONFIDENCE);

    PredictionResult {
        expected_contribution: round2(expected),
        probability: round3(probability),
        per_90: round2(per_90),
        rolling_avg: round2(player.rolling_avg),
        confidence: round2(confidence),
        expected_minutes: round2(expected_minutes),
        expected_rating: round2(expected_rating),
    }
}

pub fn predict_id(
    store: &dyn EntityStore,
    id: u32,
    ctx: &MatchContext,
    cfg: &ModelConfig,
) -> Result<PredictionResult, CoreError> {
    let Some(player) = store.get(id) else {
        return Err(CoreError::NotFound(id));
    };
    Ok(predict(&player, ctx, cfg))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PositionGroup, StatType};
    use crate::store::MemoryStore;

    fn ctx(own: &str, opp: &str) -> MatchContext {
        MatchContext {
            own_team: own.to_string(),
            opponent_team: opp.to_string(),
        }
    }

    fn striker() -> PlayerRecord {
        PlayerRecord {
            id: 9,
            name: "Striker".to_string(),
            team: "Alpha".to_string(),
            position: PositionGroup::Forward,
            stat_type: StatType::Goals,
            features: Default::default(),
            total_stat: 4.0,
            total_minutes: 850.0,
            match_count: 10,
            rolling_avg: 0.6,
        }
    }

    fn strengths(cfg: &mut ModelConfig) {
        cfg.team_strengths.insert("Alpha".to_string(), 90.0);
        cfg.team_strengths.insert("Beta".to_string(), 80.0);
    }

    #[test]
    fn forward_reference_scenario() {
        // base 0.4, opponent multiplier 1.1, position multiplier 1.5.
        let mut cfg = ModelConfig::default();
        strengths(&mut cfg);

        let result = predict(&striker(), &ctx("Alpha", "Beta"), &cfg);
        assert!((result.expected_contribution - 0.66).abs() < 1e-9);
        assert!((result.probability - 0.483).abs() < 1e-9);
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.expected_minutes, 85.0);
    }

    #[test]
    fn no_history_falls_back_to_stat_default() {
        let cfg = ModelConfig::default();
        let keeper = PlayerRecord {
            id: 1,
            name: "Keeper".to_string(),
            team: "Gamma".to_string(),
            position: PositionGroup::Goalkeeper,
            stat_type: StatType::Saves,
            features: Default::default(),
            total_stat: 0.0,
            total_minutes: 0.0,
            match_count: 0,
            rolling_avg: 0.0,
        };

        let result = predict(&keeper, &ctx("Gamma", "Delta"), &cfg);
        // default 3.0, neutral opponent, GK saves multiplier 1.5.
        assert!((result.expected_contribution - 4.5).abs() < 1e-9);
        assert_eq!(result.expected_minutes, DEFAULT_EXPECTED_MINUTES);
        assert_eq!(result.confidence, BASE_CONFIDENCE);
        assert_eq!(result.per_90, 3.0);
    }

    #[test]
    fn goalkeeper_outfield_stats_zero_out() {
        let cfg = ModelConfig::default();
        let mut keeper = striker();
        keeper.position = PositionGroup::Goalkeeper;
        keeper.stat_type = StatType::Goals;

        let result = predict(&keeper, &ctx("Alpha", "Beta"), &cfg);
        assert_eq!(result.expected_contribution, 0.0);
        assert_eq!(result.probability, 0.0);
    }

    #[test]
    fn clean_sheet_probability_is_pass_through() {
        let mut cfg = ModelConfig::default();
        strengths(&mut cfg);
        let defender = PlayerRecord {
            id: 4,
            name: "Defender".to_string(),
            team: "Alpha".to_string(),
            position: PositionGroup::Defender,
            stat_type: StatType::CleanSheets,
            features: Default::default(),
            total_stat: 5.0,
            total_minutes: 900.0,
            match_count: 10,
            rolling_avg: 0.5,
        };

        let result = predict(&defender, &ctx("Alpha", "Beta"), &cfg);
        // 0.5 * 1.1 * 0.8 = 0.44, reported directly rather than through Poisson.
        assert!((result.expected_contribution - 0.44).abs() < 1e-9);
        assert!((result.probability - 0.44).abs() < 1e-9);
    }

    #[test]
    fn defensive_stat_gains_against_stronger_opponent() {
        let mut cfg = ModelConfig::default();
        strengths(&mut cfg);
        let mut midfielder = striker();
        midfielder.position = PositionGroup::Midfielder;
        midfielder.stat_type = StatType::Tackles;
        midfielder.total_stat = 25.0;

        let vs_stronger = predict(&midfielder, &ctx("Beta", "Alpha"), &cfg);
        let vs_weaker = predict(&midfielder, &ctx("Alpha", "Beta"), &cfg);
        assert!(vs_stronger.expected_contribution > vs_weaker.expected_contribution);
    }

    #[test]
    fn rating_and_minutes_stay_in_their_domains() {
        let mut cfg = ModelConfig::default();
        strengths(&mut cfg);
        let mut monster = striker();
        monster.total_stat = 60.0; // 6 goals per match
        monster.total_minutes = 200.0; // 20 minutes per match

        let result = predict(&monster, &ctx("Alpha", "Beta"), &cfg);
        assert!(result.expected_rating <= MAX_RATING);
        assert!(result.expected_minutes >= MIN_EXPECTED_MINUTES);
        assert!((0.0..=1.0).contains(&result.probability));
    }

    #[test]
    fn unknown_player_is_not_found() {
        let store = MemoryStore::new();
        let cfg = ModelConfig::default();
        assert!(matches!(
            predict_id(&store, 123, &ctx("A", "B"), &cfg),
            Err(CoreError::NotFound(123))
        ));
    }
}
