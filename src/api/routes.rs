//! REST route handlers.
//!
//! All endpoints speak camelCase JSON. State is shared via `Arc<ApiState>`.
//! Bodies that fail to parse are answered with 400 rather than axum's
//! default 422.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::book::Sportsbook;
use crate::types::{Bet, BetSlip, BetStatus, BookError, Game, LedgerSummary, NewGame};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Shared state accessible by all route handlers.
pub struct ApiState {
    pub book: Sportsbook,
    admin_password: Option<SecretString>,
}

impl ApiState {
    pub fn new(book: Sportsbook, admin_password: Option<SecretString>) -> Self {
        Self { book, admin_password }
    }

    fn password_matches(&self, attempt: &str) -> bool {
        match &self.admin_password {
            Some(secret) => secret.expose_secret().as_str() == attempt,
            None => false,
        }
    }
}

pub type AppState = Arc<ApiState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub name: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub home_odd: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub draw_odd: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::arbitrary_precision_option")]
    pub away_odd: Option<Decimal>,
}

impl From<CreateGameRequest> for NewGame {
    fn from(req: CreateGameRequest) -> Self {
        NewGame {
            name: req.name.unwrap_or_default(),
            home_team: req.home_team.unwrap_or_default(),
            away_team: req.away_team.unwrap_or_default(),
            home_odd: req.home_odd,
            draw_odd: req.draw_odd,
            away_odd: req.away_odd,
        }
    }
}

/// Body of `POST /api/bets`. Client-computed `gameName`, `odd`, and
/// `possibleWin` are not read; the server resolves them from the catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBetRequest {
    pub player_name: Option<String>,
    pub game_id: Option<String>,
    pub bet_type: Option<String>,
    /// Number or numeric string.
    pub amount: Option<serde_json::Value>,
}

impl From<CreateBetRequest> for BetSlip {
    fn from(req: CreateBetRequest) -> Self {
        let amount = match req.amount {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
        };
        BetSlip {
            player_name: req.player_name.unwrap_or_default(),
            game_id: req.game_id.unwrap_or_default(),
            bet_type: req.bet_type.unwrap_or_default(),
            amount,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Everything a handler can fail with, rendered as `ErrorBody`.
#[derive(Debug)]
pub enum ApiError {
    Book(BookError),
    InvalidBody(String),
}

impl From<BookError> for ApiError {
    fn from(e: BookError) -> Self {
        ApiError::Book(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::InvalidBody(msg) => (StatusCode::BAD_REQUEST, "InvalidBody", msg),
            ApiError::Book(e) => {
                let status = match &e {
                    BookError::BetNotFound(_) => StatusCode::NOT_FOUND,
                    BookError::Persistence(_) | BookError::Overflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, e.code(), e.to_string())
            }
        };
        let body = ErrorBody {
            message,
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SuccessResponse>), ApiError> {
    let Json(req) = payload?;
    let attempt = req.password.unwrap_or_default();

    if state.password_matches(&attempt) {
        info!("Admin login succeeded");
        Ok((
            StatusCode::OK,
            Json(SuccessResponse {
                success: true,
                message: "Login successful".to_string(),
            }),
        ))
    } else {
        warn!("Admin login rejected");
        Ok((
            StatusCode::UNAUTHORIZED,
            Json(SuccessResponse {
                success: false,
                message: "Invalid password".to_string(),
            }),
        ))
    }
}

/// GET /api/games
pub async fn list_games(State(state): State<AppState>) -> Json<Vec<Game>> {
    Json(state.book.active_games().await)
}

/// POST /api/games
pub async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<Json<Game>, ApiError> {
    let Json(req) = payload?;
    let game = state.book.add_game(req.into()).await?;
    Ok(Json(game))
}

/// DELETE /api/games/:id
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    if state.book.remove_game(&id).await? {
        Ok(Json(SuccessResponse {
            success: true,
            message: "Game deleted".to_string(),
        })
        .into_response())
    } else {
        let body = ErrorBody {
            message: format!("Game not found: {id}"),
            code: "GameNotFound".to_string(),
        };
        Ok((StatusCode::NOT_FOUND, Json(body)).into_response())
    }
}

/// GET /api/bets
pub async fn list_bets(State(state): State<AppState>) -> Json<Vec<Bet>> {
    Json(state.book.bets().await)
}

/// GET /api/bets/summary
pub async fn bets_summary(State(state): State<AppState>) -> Result<Json<LedgerSummary>, ApiError> {
    Ok(Json(state.book.summary().await?))
}

/// POST /api/bets
pub async fn create_bet(
    State(state): State<AppState>,
    payload: Result<Json<CreateBetRequest>, JsonRejection>,
) -> Result<Json<Bet>, ApiError> {
    let Json(req) = payload?;
    let bet = state.book.place_bet(&req.into()).await?;
    Ok(Json(bet))
}

/// PATCH /api/bets/:id/status
pub async fn update_bet_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> Result<Json<Bet>, ApiError> {
    let Json(req) = payload?;
    let status: BetStatus = req
        .status
        .ok_or(BookError::MissingField("status"))?
        .parse()?;
    let bet = state.book.update_status(&id, status).await?;
    Ok(Json(bet))
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
