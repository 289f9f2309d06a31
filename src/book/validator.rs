//! Bet validator.
//!
//! Pure checks over a raw `BetSlip`, applied in a fixed order where the
//! first failure wins:
//!
//! 1. every field present and non-blank
//! 2. amount is an integer-valued number
//! 3. amount within the stake limits
//! 4. game id resolves in the catalog
//! 5. bet type is one of home / draw / away

use rust_decimal::Decimal;
use std::str::FromStr;

use super::catalog::OddsCatalog;
use crate::types::{BetSlip, BetType, BookError, Game, StakeLimits};

/// A slip that passed every rule, with its fields parsed.
#[derive(Debug, Clone)]
pub struct ValidatedBet<'a> {
    pub player_name: String,
    pub game: &'a Game,
    pub bet_type: BetType,
    pub amount: Decimal,
}

pub fn validate<'a>(
    catalog: &'a OddsCatalog,
    limits: &StakeLimits,
    slip: &BetSlip,
) -> Result<ValidatedBet<'a>, BookError> {
    let player_name = slip.player_name.trim();
    let game_id = slip.game_id.trim();
    let bet_type = slip.bet_type.trim();
    let amount = slip.amount.trim();

    if player_name.is_empty() {
        return Err(BookError::MissingField("playerName"));
    }
    if game_id.is_empty() {
        return Err(BookError::MissingField("gameId"));
    }
    if bet_type.is_empty() {
        return Err(BookError::MissingField("betType"));
    }
    if amount.is_empty() {
        return Err(BookError::MissingField("amount"));
    }

    let amount = match parse_whole_amount(amount)? {
        Some(parsed) if limits.contains(parsed) => parsed,
        parsed => {
            return Err(BookError::AmountOutOfRange {
                amount: parsed.map_or_else(|| amount.to_string(), |a| a.to_string()),
                min: limits.min,
                max: limits.max,
            })
        }
    };

    let game = catalog
        .get(game_id)
        .ok_or_else(|| BookError::GameNotFound(game_id.to_string()))?;

    let bet_type = BetType::from_str(bet_type)?;

    Ok(ValidatedBet {
        player_name: player_name.to_string(),
        game,
        bet_type,
        amount,
    })
}

/// Parse a stake that must carry no fractional part. Accepts plain
/// decimals ("1000000", "1000000.0") and scientific notation ("1e6").
///
/// `Ok(None)` is a whole number too large for `Decimal`, which can only
/// ever be out of range.
fn parse_whole_amount(raw: &str) -> Result<Option<Decimal>, BookError> {
    let amount = match Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        Ok(amount) => amount,
        Err(_) if is_integer_literal(raw) => return Ok(None),
        Err(_) => return Err(BookError::InvalidAmount(raw.to_string())),
    };

    if !amount.fract().is_zero() {
        return Err(BookError::InvalidAmount(raw.to_string()));
    }
    Ok(Some(amount.normalize()))
}

/// Whether `raw` spells a finite, integer-valued number in plain or
/// scientific notation, whatever its magnitude.
fn is_integer_literal(raw: &str) -> bool {
    let (mantissa, exponent) = match raw.split_once(['e', 'E']) {
        Some((m, e)) => match e.parse::<i64>() {
            Ok(exp) => (m, exp),
            Err(_) => return false,
        },
        None => (raw, 0),
    };
    let mantissa = mantissa.strip_prefix(['+', '-']).unwrap_or(mantissa);
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return false;
    }

    // the last non-zero digit must sit left of the decimal point once the
    // exponent is applied
    let digits = format!("{int_part}{frac_part}");
    let significant = digits.trim_end_matches('0').len() as i64;
    significant <= (int_part.len() as i64).saturating_add(exponent)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
