use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named numeric features for one player. Absent key = missing; a present
/// value may still be non-finite (invalid) or outside its catalog range.
pub type FeatureSet = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PositionGroup {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PositionGroup {
    pub const ALL: [PositionGroup; 4] = [
        PositionGroup::Goalkeeper,
        PositionGroup::Defender,
        PositionGroup::Midfielder,
        PositionGroup::Forward,
    ];

    pub fn code(self) -> &'static str {
        match self {
            PositionGroup::Goalkeeper => "GK",
            PositionGroup::Defender => "DEF",
            PositionGroup::Midfielder => "MID",
            PositionGroup::Forward => "FWD",
        }
    }

    pub fn from_code(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "GK" | "G" | "GOALKEEPER" => Some(PositionGroup::Goalkeeper),
            "DEF" | "D" | "CB" | "LB" | "RB" | "DEFENDER" => Some(PositionGroup::Defender),
            "MID" | "M" | "CM" | "DM" | "AM" | "MIDFIELDER" => Some(PositionGroup::Midfielder),
            "FWD" | "F" | "ST" | "CF" | "LW" | "RW" | "FORWARD" => Some(PositionGroup::Forward),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatType {
    Goals,
    Assists,
    GoalContributions,
    Saves,
    Tackles,
    Interceptions,
    CleanSheets,
    KeyPasses,
}

/// How an expected value converts to an occurrence probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticClass {
    /// Count per match; P(at least one) via Poisson.
    Count,
    /// Already a probability; pass through with a clamp.
    Probability,
}

impl StatType {
    pub const ALL: [StatType; 8] = [
        StatType::Goals,
        StatType::Assists,
        StatType::GoalContributions,
        StatType::Saves,
        StatType::Tackles,
        StatType::Interceptions,
        StatType::CleanSheets,
        StatType::KeyPasses,
    ];

    pub fn key(self) -> &'static str {
        match self {
            StatType::Goals => "goals",
            StatType::Assists => "assists",
            StatType::GoalContributions => "goal_contributions",
            StatType::Saves => "saves",
            StatType::Tackles => "tackles",
            StatType::Interceptions => "interceptions",
            StatType::CleanSheets => "clean_sheets",
            StatType::KeyPasses => "key_passes",
        }
    }

    pub fn semantic_class(self) -> SemanticClass {
        match self {
            StatType::CleanSheets => SemanticClass::Probability,
            _ => SemanticClass::Count,
        }
    }

    /// Workload-defensive stats rise against stronger opposition, so the
    /// opponent adjustment flips sign for them.
    pub fn is_defensive_workload(self) -> bool {
        matches!(
            self,
            StatType::Saves | StatType::Tackles | StatType::Interceptions
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: u32,
    pub name: String,
    pub team: String,
    pub position: PositionGroup,
    pub stat_type: StatType,
    #[serde(default)]
    pub features: FeatureSet,
    // Historical aggregates for the primary stat.
    #[serde(default)]
    pub total_stat: f64,
    #[serde(default)]
    pub total_minutes: f64,
    #[serde(default)]
    pub match_count: u32,
    #[serde(default)]
    pub rolling_avg: f64,
}

#[derive(Debug, Clone)]
pub struct MatchContext {
    pub own_team: String,
    pub opponent_team: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlierSeverity {
    Moderate,
    Extreme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierRecord {
    pub player_id: u32,
    pub feature: String,
    pub value: f64,
    pub expected_low: f64,
    pub expected_high: f64,
    pub severity: OutlierSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputationMethod {
    NearestNeighbor,
    FallbackMean,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationRecord {
    pub player_id: u32,
    pub feature: String,
    pub original: Option<f64>,
    pub imputed: f64,
    pub method: ImputationMethod,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceHealth {
    Healthy,
    Degraded,
    Failed,
}

/// Opaque freshness summary supplied by the ingestion side; the core only
/// passes it through into the quality report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreshnessSummary {
    pub newest: Option<DateTime<Utc>>,
    pub oldest: Option<DateTime<Utc>>,
    pub stale_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_records: usize,
    pub missing_points: usize,
    pub completeness: f64,
    pub outliers: Vec<OutlierRecord>,
    pub imputations: Vec<ImputationRecord>,
    pub freshness: FreshnessSummary,
    pub sources: BTreeMap<String, SourceHealth>,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub missing: Vec<String>,
    pub invalid: Vec<String>,
    pub out_of_range: Vec<String>,
    pub quality_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub expected_contribution: f64,
    pub probability: f64,
    pub per_90: f64,
    pub rolling_avg: f64,
    pub confidence: f64,
    pub expected_minutes: f64,
    pub expected_rating: f64,
}
