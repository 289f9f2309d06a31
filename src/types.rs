//! Shared types for the Master League book.
//!
//! Games, bets, their enums, and the error taxonomy used by the catalog,
//! ledger, settlement, and HTTP layers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A listed game with three mutually exclusive priced outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub name: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub home_odd: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub draw_odd: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub away_odd: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} x {}) [1: {} | X: {} | 2: {}]",
            self.name, self.home_team, self.away_team, self.home_odd, self.draw_odd, self.away_odd,
        )
    }
}

impl Game {
    /// The odd offered for a given outcome.
    pub fn odd_for(&self, bet_type: BetType) -> Decimal {
        match bet_type {
            BetType::Home => self.home_odd,
            BetType::Draw => self.draw_odd,
            BetType::Away => self.away_odd,
        }
    }
}

/// Admin input for a new game, before validation.
#[derive(Debug, Clone, Default)]
pub struct NewGame {
    pub name: String,
    pub home_team: String,
    pub away_team: String,
    pub home_odd: Option<Decimal>,
    pub draw_odd: Option<Decimal>,
    pub away_odd: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Outcome a bet is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Home,
    Draw,
    Away,
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetType::Home => write!(f, "home"),
            BetType::Draw => write!(f, "draw"),
            BetType::Away => write!(f, "away"),
        }
    }
}

impl std::str::FromStr for BetType {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "home" => Ok(BetType::Home),
            "draw" => Ok(BetType::Draw),
            "away" => Ok(BetType::Away),
            other => Err(BookError::InvalidBetType(other.to_string())),
        }
    }
}

/// Bet lifecycle status. `Pendente` is initial, the other two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BetStatus {
    Pendente,
    Ganhou,
    Perdeu,
}

impl BetStatus {
    pub const ALL: &'static [BetStatus] = &[BetStatus::Pendente, BetStatus::Ganhou, BetStatus::Perdeu];

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BetStatus::Pendente)
    }
}

impl fmt::Display for BetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetStatus::Pendente => write!(f, "Pendente"),
            BetStatus::Ganhou => write!(f, "Ganhou"),
            BetStatus::Perdeu => write!(f, "Perdeu"),
        }
    }
}

impl std::str::FromStr for BetStatus {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pendente" => Ok(BetStatus::Pendente),
            "Ganhou" => Ok(BetStatus::Ganhou),
            "Perdeu" => Ok(BetStatus::Perdeu),
            other => Err(BookError::UnknownStatus(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Bet
// ---------------------------------------------------------------------------

/// A placed wager. `odd` and `possible_win` are captured at placement and
/// never recomputed, even if the game is later removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bet {
    pub id: String,
    pub player_name: String,
    pub game_id: String,
    pub game_name: String,
    pub bet_type: BetType,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub odd: Decimal,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub possible_win: Decimal,
    pub status: BetStatus,
    pub created_at: DateTime<Utc>,
}

impl fmt::Display for Bet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} ({}) €{} @ {} -> €{} [{}]",
            self.player_name,
            self.game_name,
            self.bet_type,
            self.amount,
            self.odd,
            self.possible_win,
            self.status,
        )
    }
}

/// Raw bet request as submitted by a player. Every field is unparsed text
/// so the validator owns the full rule order.
#[derive(Debug, Clone, Default)]
pub struct BetSlip {
    pub player_name: String,
    pub game_id: String,
    pub bet_type: String,
    pub amount: String,
}

// ---------------------------------------------------------------------------
// Stake limits and odd bounds
// ---------------------------------------------------------------------------

/// Largest odd a game may offer.
pub const MAX_ODD: u64 = 10_000;

/// Most decimal places an odd may carry.
pub const MAX_ODD_SCALE: u32 = 10;

/// Ceiling for the configured maximum stake. Together with the odd bounds
/// this keeps every payout well inside `Decimal`'s exact range.
pub const MAX_STAKE_CEILING: u64 = 1_000_000_000_000;

/// Inclusive stake bounds in currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeLimits {
    pub min: Decimal,
    pub max: Decimal,
}

impl Default for StakeLimits {
    fn default() -> Self {
        Self {
            min: Decimal::from(500_000u64),
            max: Decimal::from(5_000_000u64),
        }
    }
}

impl StakeLimits {
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min && amount <= self.max
    }
}

// ---------------------------------------------------------------------------
// Ledger summary
// ---------------------------------------------------------------------------

/// Aggregate view over every bet in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub total_bets: u64,
    pub pending: u64,
    pub won: u64,
    pub lost: u64,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_staked: Decimal,
    /// Sum of `possible_win` over bets still pending.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub pending_liability: Decimal,
    /// Sum of `possible_win` over won bets.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub paid_out: Decimal,
    /// Sum of stakes over lost bets.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub retained: Decimal,
    /// Won / settled, as a percentage. 0 when nothing is settled.
    pub win_rate: f64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain errors for the catalog, ledger, and settlement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Bet amount must be between €{min} and €{max}, got €{amount}")]
    AmountOutOfRange {
        amount: String,
        min: Decimal,
        max: Decimal,
    },

    #[error(
        "Invalid odd for {field}: must be greater than 0, at most {max}, with at most {scale} decimal places",
        max = MAX_ODD,
        scale = MAX_ODD_SCALE
    )]
    InvalidOdd { field: &'static str },

    #[error("Game not found: {0}")]
    GameNotFound(String),

    #[error("Invalid bet type: {0}")]
    InvalidBetType(String),

    #[error("Bet not found: {0}")]
    BetNotFound(String),

    #[error("Invalid status: {0}")]
    UnknownStatus(String),

    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: BetStatus, to: BetStatus },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

impl BookError {
    /// Stable taxonomy name, used as the `code` of HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            BookError::MissingField(_) => "MissingField",
            BookError::InvalidAmount(_) => "InvalidAmount",
            BookError::AmountOutOfRange { .. } => "AmountOutOfRange",
            BookError::InvalidOdd { .. } => "InvalidOdd",
            BookError::GameNotFound(_) => "GameNotFound",
            BookError::InvalidBetType(_) => "InvalidBetType",
            BookError::BetNotFound(_) => "BetNotFound",
            BookError::UnknownStatus(_) => "UnknownStatus",
            BookError::InvalidTransition { .. } => "InvalidTransition",
            BookError::Persistence(_) => "Persistence",
            BookError::Overflow(_) => "Overflow",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
