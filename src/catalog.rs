use serde::{Deserialize, Serialize};

/// Closed valid range for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Fallback for features without a catalog entry.
pub const DEFAULT_RANGE: FeatureRange = FeatureRange::new(0.0, 1000.0);

/// The fixed required set for validation and imputation walks.
pub const REQUIRED_FEATURES: [&str; 10] = [
    "form_rating",
    "pass_accuracy",
    "shot_accuracy",
    "duel_win_rate",
    "goals_last_5",
    "assists_last_5",
    "saves_last_5",
    "tackles_last_5",
    "interceptions_last_5",
    "minutes_last_5",
];

/// Similarity is computed over this subset only, independent of the feature
/// being imputed.
pub const COMPARISON_FEATURES: [&str; 4] = [
    "form_rating",
    "minutes_last_5",
    "goals_last_5",
    "assists_last_5",
];

pub fn range_for(feature: &str) -> FeatureRange {
    match feature {
        "form_rating" => FeatureRange::new(0.0, 10.0),
        "pass_accuracy" | "shot_accuracy" | "duel_win_rate" => FeatureRange::new(0.0, 1.0),
        "goals_last_5" | "assists_last_5" => FeatureRange::new(0.0, 15.0),
        "saves_last_5" | "interceptions_last_5" => FeatureRange::new(0.0, 40.0),
        "tackles_last_5" => FeatureRange::new(0.0, 50.0),
        "minutes_last_5" => FeatureRange::new(0.0, 450.0),
        _ => DEFAULT_RANGE,
    }
}
