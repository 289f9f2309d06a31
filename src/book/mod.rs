//! The sportsbook service: catalog, ledger, and settlement behind one
//! write path.
//!
//! Every mutation takes the relevant lock, updates the in-memory book
//! (authoritative), then persists a snapshot before returning. Locks are
//! always taken catalog first, then ledger.

pub mod catalog;
pub mod ledger;
pub mod settlement;
pub mod validator;

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::storage::{BookSnapshot, SnapshotStore};
use crate::types::{Bet, BetSlip, BetStatus, BookError, Game, LedgerSummary, NewGame, StakeLimits};
use catalog::OddsCatalog;
use ledger::BetLedger;

pub struct Sportsbook {
    catalog: RwLock<OddsCatalog>,
    ledger: RwLock<BetLedger>,
    limits: StakeLimits,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl Sportsbook {
    /// An empty, purely in-memory book.
    pub fn new(limits: StakeLimits) -> Self {
        Self {
            catalog: RwLock::new(OddsCatalog::new()),
            ledger: RwLock::new(BetLedger::new()),
            limits,
            store: None,
        }
    }

    /// A book backed by a snapshot store, restored from it if a snapshot
    /// exists.
    pub fn with_store(limits: StakeLimits, store: Arc<dyn SnapshotStore>) -> Result<Self> {
        let snapshot = store.load()?.unwrap_or_default();
        info!(
            games = snapshot.games.len(),
            bets = snapshot.bets.len(),
            "Book restored"
        );
        Ok(Self {
            catalog: RwLock::new(OddsCatalog::from_games(snapshot.games)),
            ledger: RwLock::new(BetLedger::from_bets(snapshot.bets)),
            limits,
            store: Some(store),
        })
    }

    // -- Catalog ----------------------------------------------------------

    pub async fn add_game(&self, new: NewGame) -> Result<Game, BookError> {
        let mut catalog = self.catalog.write().await;
        let game = catalog.add_game(new)?;
        let ledger = self.ledger.read().await;
        self.persist(&catalog, &ledger)?;
        Ok(game)
    }

    pub async fn remove_game(&self, id: &str) -> Result<bool, BookError> {
        let mut catalog = self.catalog.write().await;
        if !catalog.remove_game(id) {
            return Ok(false);
        }
        let ledger = self.ledger.read().await;
        self.persist(&catalog, &ledger)?;
        Ok(true)
    }

    /// Games open for betting, insertion order.
    pub async fn active_games(&self) -> Vec<Game> {
        self.catalog.read().await.active_games()
    }

    pub async fn all_games(&self) -> Vec<Game> {
        self.catalog.read().await.list_games().to_vec()
    }

    // -- Ledger -----------------------------------------------------------

    pub async fn place_bet(&self, slip: &BetSlip) -> Result<Bet, BookError> {
        let catalog = self.catalog.read().await;
        let mut ledger = self.ledger.write().await;
        let bet = ledger.place_bet(&catalog, &self.limits, slip)?;
        self.persist(&catalog, &ledger)?;
        Ok(bet)
    }

    /// All bets, newest first.
    pub async fn bets(&self) -> Vec<Bet> {
        self.ledger.read().await.list_bets()
    }

    pub async fn update_status(&self, bet_id: &str, status: BetStatus) -> Result<Bet, BookError> {
        let catalog = self.catalog.read().await;
        let mut ledger = self.ledger.write().await;
        let bet = ledger.update_status(bet_id, status)?;
        self.persist(&catalog, &ledger)?;
        Ok(bet)
    }

    pub async fn summary(&self) -> Result<LedgerSummary, BookError> {
        self.ledger.read().await.summary()
    }

    /// Capture the current book.
    pub async fn snapshot(&self) -> BookSnapshot {
        let catalog = self.catalog.read().await;
        let ledger = self.ledger.read().await;
        BookSnapshot {
            games: catalog.list_games().to_vec(),
            bets: ledger.bets_in_order().to_vec(),
        }
    }

    /// Write the snapshot once. On failure the in-memory change stands and
    /// the caller gets `Persistence`.
    fn persist(&self, catalog: &OddsCatalog, ledger: &BetLedger) -> Result<(), BookError> {
        let Some(store) = &self.store else {
            return Ok(());
        };
        let snapshot = BookSnapshot {
            games: catalog.list_games().to_vec(),
            bets: ledger.bets_in_order().to_vec(),
        };
        store.save(&snapshot).map_err(|e| {
            error!(error = %format!("{e:#}"), "Failed to persist book");
            BookError::Persistence(e.to_string())
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
