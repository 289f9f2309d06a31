//! Settlement state machine.
//!
//! `Pendente -> Ganhou | Perdeu`, one-way. Terminal states accept nothing.

use crate::types::{BetStatus, BookError};

/// Check a requested status change and return the new status.
pub fn transition(from: BetStatus, to: BetStatus) -> Result<BetStatus, BookError> {
    if from.is_terminal() || !to.is_terminal() {
        return Err(BookError::InvalidTransition { from, to });
    }
    Ok(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_can_settle() {
        assert_eq!(transition(BetStatus::Pendente, BetStatus::Ganhou), Ok(BetStatus::Ganhou));
        assert_eq!(transition(BetStatus::Pendente, BetStatus::Perdeu), Ok(BetStatus::Perdeu));
    }

    #[test]
    fn test_every_other_pair_rejected() {
        for &from in BetStatus::ALL {
            for &to in BetStatus::ALL {
                let allowed = from == BetStatus::Pendente && to != BetStatus::Pendente;
                assert_eq!(transition(from, to).is_ok(), allowed, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_terminal_states_stay_terminal() {
        let err = transition(BetStatus::Ganhou, BetStatus::Perdeu).unwrap_err();
        assert_eq!(
            err,
            BookError::InvalidTransition {
                from: BetStatus::Ganhou,
                to: BetStatus::Perdeu
            }
        );
    }
}
