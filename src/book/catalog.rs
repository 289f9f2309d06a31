//! Odds catalog: the admin-managed list of games.
//!
//! Games are kept in insertion order. Removing a game never touches bets;
//! those carry their own snapshot of the name and odd.

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{BookError, Game, NewGame, MAX_ODD, MAX_ODD_SCALE};

pub struct OddsCatalog {
    games: Vec<Game>,
}

impl Default for OddsCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl OddsCatalog {
    pub fn new() -> Self {
        Self { games: Vec::new() }
    }

    /// Rebuild a catalog from previously stored games, keeping their order.
    pub fn from_games(games: Vec<Game>) -> Self {
        Self { games }
    }

    /// Validate and store a new game. Fails on any blank text field or
    /// any missing odd, and on odds that are non-positive, above `MAX_ODD`,
    /// or finer than `MAX_ODD_SCALE` decimal places.
    pub fn add_game(&mut self, new: NewGame) -> Result<Game, BookError> {
        let name = required_text(&new.name, "name")?;
        let home_team = required_text(&new.home_team, "homeTeam")?;
        let away_team = required_text(&new.away_team, "awayTeam")?;
        let home_odd = positive_odd(new.home_odd, "homeOdd")?;
        let draw_odd = positive_odd(new.draw_odd, "drawOdd")?;
        let away_odd = positive_odd(new.away_odd, "awayOdd")?;

        let game = Game {
            id: Uuid::new_v4().to_string(),
            name,
            home_team,
            away_team,
            home_odd,
            draw_odd,
            away_odd,
            is_active: true,
            created_at: Utc::now(),
        };

        info!(game_id = %game.id, game = %game, "Game added");
        self.games.push(game.clone());
        Ok(game)
    }

    /// Remove a game by id. Returns whether anything was removed.
    pub fn remove_game(&mut self, id: &str) -> bool {
        match self.games.iter().position(|g| g.id == id) {
            Some(idx) => {
                let game = self.games.remove(idx);
                info!(game_id = %game.id, name = %game.name, "Game removed");
                true
            }
            None => {
                debug!(game_id = id, "Remove requested for unknown game");
                false
            }
        }
    }

    /// All games, insertion order.
    pub fn list_games(&self) -> &[Game] {
        &self.games
    }

    /// Games still open for betting, insertion order.
    pub fn active_games(&self) -> Vec<Game> {
        self.games.iter().filter(|g| g.is_active).cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

fn required_text(value: &str, field: &'static str) -> Result<String, BookError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn positive_odd(value: Option<Decimal>, field: &'static str) -> Result<Decimal, BookError> {
    let odd = value.ok_or(BookError::MissingField(field))?.normalize();
    if odd <= Decimal::ZERO || odd > Decimal::from(MAX_ODD) || odd.scale() > MAX_ODD_SCALE {
        return Err(BookError::InvalidOdd { field });
    }
    Ok(odd)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_game(name: &str) -> NewGame {
        NewGame {
            name: name.to_string(),
            home_team: "Brasil".to_string(),
            away_team: "Argentina".to_string(),
            home_odd: Some(dec!(1.75)),
            draw_odd: Some(dec!(3.10)),
            away_odd: Some(dec!(2.40)),
        }
    }

    #[test]
    fn test_add_game_assigns_id_and_defaults() {
        let mut catalog = OddsCatalog::new();
        let game = catalog.add_game(new_game("Brasil vs Argentina")).unwrap();

        assert!(!game.id.is_empty());
        assert!(game.is_active);
        assert_eq!(game.home_odd, dec!(1.75));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(&game.id), Some(&game));
    }

    #[test]
    fn test_add_game_unique_ids() {
        let mut catalog = OddsCatalog::new();
        let a = catalog.add_game(new_game("A")).unwrap();
        let b = catalog.add_game(new_game("A")).unwrap();
        assert_ne!(a.id, b.id);
        // no uniqueness on names
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_add_game_trims_text() {
        let mut catalog = OddsCatalog::new();
        let game = catalog.add_game(new_game("  Final  ")).unwrap();
        assert_eq!(game.name, "Final");
    }

    #[test]
    fn test_add_game_rejects_blank_fields() {
        let mut catalog = OddsCatalog::new();

        let err = catalog.add_game(new_game("   ")).unwrap_err();
        assert_eq!(err, BookError::MissingField("name"));

        let mut input = new_game("X");
        input.away_team = String::new();
        assert_eq!(
            catalog.add_game(input).unwrap_err(),
            BookError::MissingField("awayTeam")
        );

        let mut input = new_game("X");
        input.draw_odd = None;
        assert_eq!(
            catalog.add_game(input).unwrap_err(),
            BookError::MissingField("drawOdd")
        );

        assert!(catalog.is_empty());
    }

    #[test]
    fn test_add_game_rejects_non_positive_odds() {
        let mut catalog = OddsCatalog::new();

        let mut input = new_game("X");
        input.home_odd = Some(Decimal::ZERO);
        assert_eq!(
            catalog.add_game(input).unwrap_err(),
            BookError::InvalidOdd { field: "homeOdd" }
        );

        let mut input = new_game("X");
        input.away_odd = Some(dec!(-1.5));
        assert_eq!(
            catalog.add_game(input).unwrap_err(),
            BookError::InvalidOdd { field: "awayOdd" }
        );

        assert!(catalog.is_empty());
    }

    #[test]
    fn test_add_game_bounds_odds() {
        let mut catalog = OddsCatalog::new();

        let mut input = new_game("X");
        input.home_odd = Some(dec!(100000000000000000000000));
        assert_eq!(
            catalog.add_game(input).unwrap_err(),
            BookError::InvalidOdd { field: "homeOdd" }
        );

        let mut input = new_game("X");
        input.draw_odd = Some(dec!(1.00000000001));
        assert_eq!(
            catalog.add_game(input).unwrap_err(),
            BookError::InvalidOdd { field: "drawOdd" }
        );
        assert!(catalog.is_empty());

        let mut input = new_game("Edges");
        input.home_odd = Some(Decimal::from(MAX_ODD));
        input.away_odd = Some(dec!(1.2345678901));
        // trailing zeros do not count against the scale
        input.draw_odd = Some(dec!(3.100000000000000));
        let game = catalog.add_game(input).unwrap();
        assert_eq!(game.home_odd, dec!(10000));
        assert_eq!(game.away_odd, dec!(1.2345678901));
        assert_eq!(game.draw_odd, dec!(3.1));
    }

    #[test]
    fn test_remove_game() {
        let mut catalog = OddsCatalog::new();
        let game = catalog.add_game(new_game("A")).unwrap();

        assert!(catalog.remove_game(&game.id));
        assert!(catalog.get(&game.id).is_none());
        assert!(!catalog.remove_game(&game.id));
    }

    #[test]
    fn test_remove_unknown_game_returns_false() {
        let mut catalog = OddsCatalog::new();
        assert!(!catalog.remove_game("does-not-exist"));
    }

    #[test]
    fn test_list_games_insertion_order() {
        let mut catalog = OddsCatalog::new();
        let a = catalog.add_game(new_game("A")).unwrap();
        let b = catalog.add_game(new_game("B")).unwrap();
        let c = catalog.add_game(new_game("C")).unwrap();
        catalog.remove_game(&b.id);

        let names: Vec<_> = catalog.list_games().iter().map(|g| g.id.clone()).collect();
        assert_eq!(names, vec![a.id, c.id]);
    }

    #[test]
    fn test_active_games_filter() {
        let mut a = OddsCatalog::new().add_game(new_game("A")).unwrap();
        a.is_active = false;
        let mut other = OddsCatalog::new();
        let b = other.add_game(new_game("B")).unwrap();

        let catalog = OddsCatalog::from_games(vec![a, b.clone()]);
        assert_eq!(catalog.list_games().len(), 2);
        assert_eq!(catalog.active_games(), vec![b]);
    }
}
