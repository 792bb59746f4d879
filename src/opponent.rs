use crate::record::StatType;

/// Multiplicative adjustment from the two team-strength scalars:
/// `1 + k * edge`. Attacking stats use own minus opponent; workload-defensive
/// stats (saves, tackles, interceptions) invert the sign because facing a
/// stronger opponent means more defending to do. No clamp here; the expected
/// contribution is floored at zero downstream.
pub fn opponent_multiplier(stat: StatType, own_strength: f64, opp_strength: f64, k: f64) -> f64 {
    let edge = if stat.is_defensive_workload() {
        opp_strength - own_strength
    } else {
        own_strength - opp_strength
    };
    1.0 + k * edge
}
