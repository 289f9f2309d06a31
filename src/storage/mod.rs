//! Persistence layer.
//!
//! Saves and loads the whole book (games + bets) as a JSON snapshot.
//! The in-memory book stays authoritative; the snapshot only lets a
//! restarted server pick up where it left off.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{Bet, Game};

/// Everything the book owns, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub games: Vec<Game>,
    pub bets: Vec<Bet>,
}

/// Where snapshots go. Implementations must fail fast: no retries.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved snapshot. `None` means fresh start.
    fn load(&self) -> Result<Option<BookSnapshot>>;

    fn save(&self, snapshot: &BookSnapshot) -> Result<()>;

    fn delete(&self) -> Result<()>;
}

/// Snapshot stored as a pretty-printed JSON file. Saves go to a sibling
/// `.tmp` file first and are renamed into place.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<BookSnapshot>> {
        let path = self.path.display();

        if !self.path.exists() {
            info!(%path, "No saved book found, starting fresh");
            return Ok(None);
        }

        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read snapshot from {path}"))?;

        let snapshot: BookSnapshot = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse snapshot from {path}"))?;

        info!(
            %path,
            games = snapshot.games.len(),
            bets = snapshot.bets.len(),
            "Book loaded from disk"
        );

        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &BookSnapshot) -> Result<()> {
        let path = self.path.display();
        let json = serde_json::to_string_pretty(snapshot).context("Failed to serialise book snapshot")?;

        let tmp = self.temp_path();
        std::fs::write(&tmp, &json)
            .with_context(|| format!("Failed to write snapshot to {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| format!("Failed to move snapshot into {path}"))?;

        debug!(%path, games = snapshot.games.len(), bets = snapshot.bets.len(), "Snapshot saved");
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Failed to delete snapshot {}", self.path.display()))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BetStatus, BetType};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn temp_store() -> JsonFileStore {
        let mut p = std::env::temp_dir();
        p.push(format!("masterleague_test_book_{}.json", uuid::Uuid::new_v4()));
        JsonFileStore::new(p)
    }

    fn sample_snapshot() -> BookSnapshot {
        let game = Game {
            id: "g-1".to_string(),
            name: "A vs B".to_string(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            home_odd: dec!(2.0),
            draw_odd: dec!(3.0),
            away_odd: dec!(4.0),
            is_active: true,
            created_at: Utc::now(),
        };
        let bet = Bet {
            id: "b-1".to_string(),
            player_name: "Ana".to_string(),
            game_id: game.id.clone(),
            game_name: game.name.clone(),
            bet_type: BetType::Home,
            amount: dec!(1000000),
            odd: dec!(2.0),
            possible_win: dec!(2000000),
            status: BetStatus::Ganhou,
            created_at: Utc::now(),
        };
        BookSnapshot {
            games: vec![game],
            bets: vec![bet],
        }
    }

    #[test]
    fn test_save_and_load() {
        let store = temp_store();
        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.games.len(), 1);
        assert_eq!(loaded.bets[0].player_name, "Ana");
        assert_eq!(loaded.bets[0].status, BetStatus::Ganhou);
        assert_eq!(loaded.bets[0].possible_win, dec!(2000000));
        assert_eq!(loaded.games[0].away_odd, dec!(4.0));

        store.delete().unwrap();
    }

    #[test]
    fn test_fractional_money_round_trips_exactly() {
        let store = temp_store();
        let mut snapshot = sample_snapshot();
        snapshot.games[0].home_odd = dec!(1.2345678901);
        snapshot.bets[0].amount = dec!(1234567);
        snapshot.bets[0].odd = dec!(1.2345678901);
        snapshot.bets[0].possible_win = dec!(1524156.7763770867);
        store.save(&snapshot).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"possibleWin\": 1524156.7763770867"));

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.bets[0].possible_win.to_string(), "1524156.7763770867");

        store.delete().unwrap();
    }

    #[test]
    fn test_save_replaces_previous_file_and_leaves_no_temp() {
        let store = temp_store();
        std::fs::write(store.path(), "{ truncated").unwrap();

        store.save(&sample_snapshot()).unwrap();
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().unwrap().unwrap().bets.len(), 1);

        store.delete().unwrap();
    }

    #[test]
    fn test_interrupted_save_keeps_last_snapshot() {
        let store = temp_store();
        store.save(&sample_snapshot()).unwrap();

        // a crash between write and rename leaves only a partial temp file
        std::fs::write(store.temp_path(), "{ \"games\": [").unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.games.len(), 1);

        std::fs::remove_file(store.temp_path()).unwrap();
        store.delete().unwrap();
    }

    #[test]
    fn test_load_nonexistent() {
        let store = temp_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_file_errors() {
        let store = temp_store();
        std::fs::write(store.path(), "{ not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("Failed to parse snapshot"));
        store.delete().unwrap();
    }

    #[test]
    fn test_save_into_missing_directory_errors() {
        let mut p = std::env::temp_dir();
        p.push(format!("masterleague_missing_dir_{}", uuid::Uuid::new_v4()));
        p.push("book.json");
        let store = JsonFileStore::new(p);
        assert!(store.save(&BookSnapshot::default()).is_err());
    }

    #[test]
    fn test_delete_state() {
        let store = temp_store();
        store.save(&BookSnapshot::default()).unwrap();
        assert!(store.path().exists());

        store.delete().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_delete_nonexistent_ok() {
        assert!(temp_store().delete().is_ok());
    }
}
