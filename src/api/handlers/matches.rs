use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;

use super::AppState;
use crate::api::errors::ApiError;
use crate::api::models::{MatchView, PlayerNames, RecentMatchesParams};
use crate::database::LadderRepository;
use crate::domain::MatchSubmission;
use crate::services::SubmissionService;

pub async fn get_recent_matches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentMatchesParams>,
) -> Result<Json<Vec<MatchView>>, ApiError> {
    let limit = state.config.ladder.recent_matches_limit(params.limit);
    let recent = state.repository.list_recent_matches(limit)?;
    let names = PlayerNames::new(&state.repository.list_players()?);

    Ok(Json(
        recent
            .iter()
            .map(|record| MatchView::new(record, &names))
            .collect(),
    ))
}

pub async fn submit_match(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<MatchSubmission>,
) -> Result<(StatusCode, Json<MatchView>), ApiError> {
    let service = SubmissionService::new(state.repository.clone());
    let recorded = service.submit_match(&submission)?;
    let names = PlayerNames::new(&[recorded.side_a, recorded.side_b]);

    Ok((StatusCode::CREATED, Json(MatchView::new(&recorded.record, &names))))
}
