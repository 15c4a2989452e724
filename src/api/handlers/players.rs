use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::AppState;
use crate::api::errors::ApiError;
use crate::api::models::{
    CreatePlayerRequest, HeadToHeadResponse, PlayerDetailResponse, PlayerListResponse,
    PlayerMatchView, PlayerNames, PlayerRef,
};
use crate::database::LadderRepository;
use crate::domain::Player;
use crate::errors::LadderError;
use crate::rating::stats::{PlayerStats, head_to_head};
use crate::rating::trajectory::rating_trajectory;
use crate::rating::types::PlayerId;
use crate::services::SubmissionService;

pub async fn get_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let players = state.repository.list_players()?;
    Ok(Json(PlayerListResponse::ranked(players)))
}

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let service = SubmissionService::new(state.repository.clone());
    let player = service.register_player(&request.display_name)?;
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn get_player_detail(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<PlayerId>,
) -> Result<Json<PlayerDetailResponse>, ApiError> {
    let player = require_player(&state, player_id)?;
    let history = state.repository.list_matches_for_player(player_id)?;
    let names = PlayerNames::new(&state.repository.list_players()?);

    let stats = PlayerStats::compute(player_id, &history);
    let trajectory = rating_trajectory(player_id, &history).iter().collect();
    let matches = history
        .iter()
        .map(|record| PlayerMatchView::new(player_id, record, &names))
        .collect();

    let compare_with = state
        .repository
        .top_players_excluding(player_id, state.config.ladder.compare_suggestions)?
        .into_iter()
        .map(|p| PlayerRef {
            id: p.id,
            display_name: p.display_name,
        })
        .collect();

    Ok(Json(PlayerDetailResponse {
        player,
        stats,
        trajectory,
        matches,
        compare_with,
    }))
}

pub async fn get_head_to_head_comparison(
    State(state): State<Arc<AppState>>,
    Path((player1_id, player2_id)): Path<(PlayerId, PlayerId)>,
) -> Result<Json<HeadToHeadResponse>, ApiError> {
    if player1_id == player2_id {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Cannot compare a player with themselves",
        ));
    }

    let player1 = require_player(&state, player1_id)?;
    let player2 = require_player(&state, player2_id)?;

    let shared = state.repository.list_matches_between(player1_id, player2_id)?;
    let names = PlayerNames::new(&[player1.clone(), player2.clone()]);

    let stats = head_to_head(player1_id, player2_id, &shared);
    let matches = shared
        .iter()
        .map(|record| PlayerMatchView::new(player1_id, record, &names))
        .collect();

    Ok(Json(HeadToHeadResponse {
        player1,
        player2,
        stats,
        matches,
    }))
}

fn require_player(state: &AppState, player_id: PlayerId) -> Result<Player, ApiError> {
    state
        .repository
        .get_player(player_id)?
        .ok_or_else(|| LadderError::PlayerNotFound(player_id).into())
}
