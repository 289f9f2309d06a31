//! Bet ledger: placed bets and their lifecycle.
//!
//! Bets are stored in insertion order and listed newest first. The odd and
//! possible win are snapshots taken at placement.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use super::catalog::OddsCatalog;
use super::settlement;
use super::validator;
use crate::types::{Bet, BetSlip, BetStatus, BookError, LedgerSummary, StakeLimits};

/// Payout for a stake at a given odd. Exact, never rounded.
pub fn compute_possible_win(amount: Decimal, odd: Decimal) -> Result<Decimal, BookError> {
    amount
        .checked_mul(odd)
        .ok_or(BookError::Overflow("possibleWin"))
}

fn accumulate(total: &mut Decimal, value: Decimal, what: &'static str) -> Result<(), BookError> {
    *total = total.checked_add(value).ok_or(BookError::Overflow(what))?;
    Ok(())
}

pub struct BetLedger {
    bets: Vec<Bet>,
}

impl Default for BetLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BetLedger {
    pub fn new() -> Self {
        Self { bets: Vec::new() }
    }

    /// Rebuild a ledger from previously stored bets (insertion order).
    pub fn from_bets(bets: Vec<Bet>) -> Self {
        Self { bets }
    }

    /// Validate a slip against the catalog and record the bet as pending.
    pub fn place_bet(
        &mut self,
        catalog: &OddsCatalog,
        limits: &StakeLimits,
        slip: &BetSlip,
    ) -> Result<Bet, BookError> {
        let valid = validator::validate(catalog, limits, slip).map_err(|e| {
            warn!(
                player = %slip.player_name,
                game_id = %slip.game_id,
                code = e.code(),
                error = %e,
                "Bet rejected"
            );
            e
        })?;

        let odd = valid.game.odd_for(valid.bet_type);
        let possible_win = compute_possible_win(valid.amount, odd)?;
        let bet = Bet {
            id: Uuid::new_v4().to_string(),
            player_name: valid.player_name,
            game_id: valid.game.id.clone(),
            game_name: valid.game.name.clone(),
            bet_type: valid.bet_type,
            amount: valid.amount,
            odd,
            possible_win,
            status: BetStatus::Pendente,
            created_at: Utc::now(),
        };

        info!(
            bet_id = %bet.id,
            player = %bet.player_name,
            game = %bet.game_name,
            bet_type = %bet.bet_type,
            amount = %bet.amount,
            odd = %bet.odd,
            possible_win = %bet.possible_win,
            "Bet placed"
        );

        self.bets.push(bet.clone());
        Ok(bet)
    }

    /// All bets, most recent first. Bets sharing a timestamp keep
    /// newest-inserted first.
    pub fn list_bets(&self) -> Vec<Bet> {
        let mut bets: Vec<Bet> = self.bets.iter().rev().cloned().collect();
        bets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bets
    }

    /// Bets in the order they were placed.
    pub fn bets_in_order(&self) -> &[Bet] {
        &self.bets
    }

    pub fn get(&self, id: &str) -> Option<&Bet> {
        self.bets.iter().find(|b| b.id == id)
    }

    /// Settle a pending bet. The only mutation allowed on a stored bet.
    pub fn update_status(&mut self, bet_id: &str, new_status: BetStatus) -> Result<Bet, BookError> {
        let bet = self
            .bets
            .iter_mut()
            .find(|b| b.id == bet_id)
            .ok_or_else(|| BookError::BetNotFound(bet_id.to_string()))?;

        bet.status = settlement::transition(bet.status, new_status)?;

        info!(
            bet_id = %bet.id,
            player = %bet.player_name,
            status = %bet.status,
            possible_win = %bet.possible_win,
            "Bet settled"
        );
        Ok(bet.clone())
    }

    /// Aggregate counts and money totals over every bet.
    pub fn summary(&self) -> Result<LedgerSummary, BookError> {
        let mut summary = LedgerSummary {
            total_bets: self.bets.len() as u64,
            pending: 0,
            won: 0,
            lost: 0,
            total_staked: Decimal::ZERO,
            pending_liability: Decimal::ZERO,
            paid_out: Decimal::ZERO,
            retained: Decimal::ZERO,
            win_rate: 0.0,
        };

        for bet in &self.bets {
            accumulate(&mut summary.total_staked, bet.amount, "totalStaked")?;
            match bet.status {
                BetStatus::Pendente => {
                    summary.pending += 1;
                    accumulate(&mut summary.pending_liability, bet.possible_win, "pendingLiability")?;
                }
                BetStatus::Ganhou => {
                    summary.won += 1;
                    accumulate(&mut summary.paid_out, bet.possible_win, "paidOut")?;
                }
                BetStatus::Perdeu => {
                    summary.lost += 1;
                    accumulate(&mut summary.retained, bet.amount, "retained")?;
                }
            }
        }

        let settled = summary.won + summary.lost;
        if settled > 0 {
            summary.win_rate = (summary.won as f64 / settled as f64) * 100.0;
        }
        Ok(summary)
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
