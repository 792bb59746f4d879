use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::{PlayerRecord, PositionGroup};

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default)]
pub struct StoreFilter {
    pub position: Option<PositionGroup>,
    pub team: Option<String>,
}

impl StoreFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn position(group: PositionGroup) -> Self {
        Self {
            position: Some(group),
            team: None,
        }
    }

    fn matches(&self, player: &PlayerRecord) -> bool {
        if let Some(group) = self.position {
            if player.position != group {
                return false;
            }
        }
        if let Some(team) = &self.team {
            if &player.team != team {
                return false;
            }
        }
        true
    }
}

/// The persistent-store boundary. The core only ever reads snapshots and
/// issues idempotent per-feature upserts; everything else is the store's
/// business.
pub trait EntityStore {
    fn get(&self, id: u32) -> Option<PlayerRecord>;
    fn list(&self, filter: &StoreFilter) -> Vec<PlayerRecord>;
    fn update_feature(&self, id: u32, feature: &str, value: f64) -> Result<(), CoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    players: RwLock<BTreeMap<u32, PlayerRecord>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    players: Vec<PlayerRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_players(players: impl IntoIterator<Item = PlayerRecord>) -> Self {
        let store = Self::new();
        for player in players {
            store.insert(player);
        }
        store
    }

    pub fn insert(&self, player: PlayerRecord) {
        let mut guard = self.players.write().unwrap_or_else(|p| p.into_inner());
        guard.insert(player.id, player);
    }

    pub fn len(&self) -> usize {
        let guard = self.players.read().unwrap_or_else(|p| p.into_inner());
        guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw =
            fs::read_to_string(path).with_context(|| format!("read snapshot {}", path.display()))?;
        let snapshot: SnapshotFile = serde_json::from_str(&raw).context("parse snapshot")?;
        if snapshot.version != SNAPSHOT_VERSION {
            bail!(
                "snapshot version {} unsupported (want {SNAPSHOT_VERSION})",
                snapshot.version
            );
        }
        Ok(Self::from_players(snapshot.players))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let players = self.list(&StoreFilter::all());
        let snapshot = SnapshotFile {
            version: SNAPSHOT_VERSION,
            players,
        };
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(&snapshot).context("serialize snapshot")?;
        fs::write(&tmp, json).context("write snapshot")?;
        fs::rename(&tmp, path).context("swap snapshot")?;
        Ok(())
    }
}

impl EntityStore for MemoryStore {
    fn get(&self, id: u32) -> Option<PlayerRecord> {
        let guard = self.players.read().unwrap_or_else(|p| p.into_inner());
        guard.get(&id).cloned()
    }

    fn list(&self, filter: &StoreFilter) -> Vec<PlayerRecord> {
        let guard = self.players.read().unwrap_or_else(|p| p.into_inner());
        guard
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    fn update_feature(&self, id: u32, feature: &str, value: f64) -> Result<(), CoreError> {
        let mut guard = self.players.write().unwrap_or_else(|p| p.into_inner());
        let Some(player) = guard.get_mut(&id) else {
            return Err(CoreError::NotFound(id));
        };
        player.features.insert(feature.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::StatType;

    fn player(id: u32, team: &str, position: PositionGroup) -> PlayerRecord {
        PlayerRecord {
            id,
            name: format!("P{id}"),
            team: team.to_string(),
            position,
            stat_type: StatType::Goals,
            features: Default::default(),
            total_stat: 0.0,
            total_minutes: 0.0,
            match_count: 0,
            rolling_avg: 0.0,
        }
    }

    #[test]
    fn filter_by_position_and_team() {
        let store = MemoryStore::from_players([
            player(1, "A", PositionGroup::Forward),
            player(2, "A", PositionGroup::Defender),
            player(3, "B", PositionGroup::Forward),
        ]);

        assert_eq!(store.list(&StoreFilter::all()).len(), 3);
        assert_eq!(
            store.list(&StoreFilter::position(PositionGroup::Forward)).len(),
            2
        );
        let filter = StoreFilter {
            position: Some(PositionGroup::Forward),
            team: Some("B".to_string()),
        };
        let hits = store.list(&filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 3);
    }

    #[test]
    fn update_feature_is_an_idempotent_upsert() {
        let store = MemoryStore::from_players([player(1, "A", PositionGroup::Forward)]);
        store.update_feature(1, "form_rating", 7.1).unwrap();
        store.update_feature(1, "form_rating", 7.1).unwrap();
        let got = store.get(1).unwrap();
        assert_eq!(got.features.get("form_rating"), Some(&7.1));
        assert_eq!(got.features.len(), 1);

        assert!(matches!(
            store.update_feature(99, "form_rating", 1.0),
            Err(CoreError::NotFound(99))
        ));
    }

    #[test]
    fn snapshot_round_trip() {
        let dir = std::env::temp_dir().join("formcast_store_test");
        let path = dir.join("snapshot.json");
        let store = MemoryStore::from_players([
            player(1, "A", PositionGroup::Forward),
            player(2, "B", PositionGroup::Goalkeeper),
        ]);
        store.save(&path).unwrap();
        let loaded = MemoryStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(2).unwrap().position, PositionGroup::Goalkeeper);
        let _ = std::fs::remove_dir_all(dir);
    }
}
