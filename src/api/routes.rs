use axum::{Router, routing::get};
use std::sync::Arc;

use crate::api::handlers::{
    AppState,
    matches::{get_recent_matches, submit_match},
    players::{create_player, get_head_to_head_comparison, get_player_detail, get_players},
    rules::get_rules,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/players", get(get_players).post(create_player))
        .route("/api/player/:id", get(get_player_detail))
        .route("/api/compare/:player1_id/:player2_id", get(get_head_to_head_comparison))
        .route("/api/matches", get(get_recent_matches).post(submit_match))
        .route("/api/rules", get(get_rules))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::SharedRepository;
    use crate::config::settings::AppConfig;
    use crate::database::{
        LadderRepository, MatchFilter, SettleFn, SqliteRepository, create_memory_pool,
    };
    use crate::domain::{MatchRecord, NewMatchRecord, Player, RecordedMatch};
    use crate::errors::LadderResult;
    use crate::rating::types::{PlayerId, RatingValue};
    use anyhow::Result;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use chrono::{DateTime, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn sqlite() -> SqliteRepository {
        SqliteRepository::open(create_memory_pool().unwrap()).unwrap()
    }

    fn app_with(repository: SharedRepository) -> Router {
        create_router(Arc::new(AppState {
            repository,
            config: AppConfig::default(),
        }))
    }

    fn app() -> Router {
        app_with(Arc::new(sqlite()))
    }

    /// Stores matches normally but cannot list players.
    struct UnlistableRepository(SqliteRepository);

    impl LadderRepository for UnlistableRepository {
        fn list_players(&self) -> Result<Vec<Player>> {
            anyhow::bail!("players table is locked")
        }

        fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
            self.0.get_player(id)
        }

        fn top_players_excluding(&self, excluded: PlayerId, limit: usize) -> Result<Vec<Player>> {
            self.0.top_players_excluding(excluded, limit)
        }

        fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>> {
            self.0.list_matches(filter)
        }

        fn insert_player(&self, display_name: &str, created_at: DateTime<Utc>) -> Result<Player> {
            self.0.insert_player(display_name, created_at)
        }

        fn insert_match(&self, record: &NewMatchRecord) -> Result<MatchRecord> {
            self.0.insert_match(record)
        }

        fn apply_rating(&self, id: PlayerId, rating: RatingValue) -> Result<()> {
            self.0.apply_rating(id, rating)
        }

        fn commit_match(
            &self,
            record: &NewMatchRecord,
            new_rating_a: RatingValue,
            new_rating_b: RatingValue,
        ) -> Result<MatchRecord> {
            self.0.commit_match(record, new_rating_a, new_rating_b)
        }

        fn record_match(
            &self,
            side_a: PlayerId,
            side_b: PlayerId,
            settle: SettleFn<'_>,
        ) -> LadderResult<RecordedMatch> {
            self.0.record_match(side_a, side_b, settle)
        }

        fn apply_ratings(&self, updates: &[(PlayerId, RatingValue)]) -> Result<()> {
            self.0.apply_ratings(updates)
        }
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn register(app: &Router, name: &str) -> i64 {
        let body = json!({ "displayName": name });
        let (status, body) = send(app, Method::POST, "/api/players", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    async fn post_match(app: &Router, result: Value) -> (StatusCode, Value) {
        send(app, Method::POST, "/api/matches", Some(result)).await
    }

    fn result(a: i64, b: i64, score: (i64, i64), stars: (f64, f64)) -> Value {
        json!({
            "sideA": a,
            "sideB": b,
            "scoreA": score.0,
            "scoreB": score.1,
            "strengthA": stars.0,
            "strengthB": stars.1,
        })
    }

    #[tokio::test]
    async fn test_register_and_list_players() {
        let app = app();
        let ana = register(&app, "  Ana ").await;
        register(&app, "Bruno").await;

        let (status, body) = send(&app, Method::GET, "/api/players", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["items"][0]["rank"], 1);
        assert_eq!(body["items"][0]["id"], ana);
        assert_eq!(body["items"][0]["displayName"], "Ana");
        assert_eq!(body["items"][0]["rating"], 1200.0);
    }

    #[tokio::test]
    async fn test_blank_name_is_unprocessable() {
        let app = app();
        let blank = json!({ "displayName": "   " });
        let (status, body) = send(&app, Method::POST, "/api/players", Some(blank)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Display name must not be empty");
    }

    #[tokio::test]
    async fn test_submit_match_updates_leaderboard() {
        let app = app();
        let ana = register(&app, "Ana").await;
        let bruno = register(&app, "Bruno").await;

        let (status, body) = post_match(&app, result(ana, bruno, (2, 0), (3.0, 3.0))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["transfer"], 22.0);
        assert_eq!(body["winnerId"], ana);
        assert_eq!(body["sideB"]["displayName"], "Bruno");

        let (_, players) = send(&app, Method::GET, "/api/players", None).await;
        assert_eq!(players["items"][0]["rating"], 1222.0);
        assert_eq!(players["items"][1]["rating"], 1178.0);
    }

    #[tokio::test]
    async fn test_submission_errors_map_to_status_codes() {
        let app = app();
        let ana = register(&app, "Ana").await;

        let (status, _) = post_match(&app, result(ana, ana, (1, 0), (3.0, 3.0))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = post_match(&app, result(ana, 99, (1, 0), (3.0, 3.0))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = post_match(&app, result(ana, 99, (1, 0), (3.2, 3.0))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, recent) = send(&app, Method::GET, "/api/matches", None).await;
        assert_eq!(recent, json!([]));
    }

    #[tokio::test]
    async fn test_player_detail_and_compare() {
        let app = app();
        let ana = register(&app, "Ana").await;
        let bruno = register(&app, "Bruno").await;
        post_match(&app, result(ana, bruno, (2, 0), (3.0, 3.0))).await;
        post_match(&app, result(bruno, ana, (1, 1), (3.0, 3.0))).await;

        let uri = format!("/api/player/{bruno}");
        let (status, detail) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["stats"]["totalMatches"], 2);
        assert_eq!(detail["stats"]["losses"], 1);
        assert_eq!(detail["stats"]["draws"], 1);
        assert_eq!(detail["trajectory"][0]["rating"], 1178.0);
        assert_eq!(detail["matches"][0]["outcome"], "draw");
        assert_eq!(detail["matches"][1]["pointsChange"], -22.0);
        assert_eq!(detail["compareWith"][0]["id"], ana);

        let uri = format!("/api/compare/{ana}/{bruno}");
        let (status, compare) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(compare["stats"]["totalMatches"], 2);
        assert_eq!(compare["stats"]["first"]["wins"], 1);
        assert_eq!(compare["stats"]["second"]["wins"], 0);
        assert_eq!(compare["matches"][1]["pointsChange"], 22.0);

        let (status, _) = send(&app, Method::GET, &format!("/api/compare/{ana}/{ana}"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(&app, Method::GET, &format!("/api/compare/{ana}/404"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::GET, "/api/player/404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_recent_matches_limit_is_clamped() {
        let app = app();
        let ana = register(&app, "Ana").await;
        let bruno = register(&app, "Bruno").await;
        for _ in 0..3 {
            post_match(&app, result(ana, bruno, (1, 0), (3.0, 3.0))).await;
        }

        let (_, recent) = send(&app, Method::GET, "/api/matches?limit=2", None).await;
        assert_eq!(recent.as_array().unwrap().len(), 2);

        let (_, recent) = send(&app, Method::GET, "/api/matches?limit=0", None).await;
        assert_eq!(recent.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_committed_match_is_reported_even_if_player_listing_fails() {
        let inner = sqlite();
        let ana = inner.insert_player("Ana", Utc::now()).unwrap();
        let bruno = inner.insert_player("Bruno", Utc::now()).unwrap();
        let app = app_with(Arc::new(UnlistableRepository(inner.clone())));

        let (status, body) = post_match(&app, result(ana.id, bruno.id, (2, 0), (3.0, 3.0))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["sideA"]["displayName"], "Ana");
        assert_eq!(body["sideB"]["displayName"], "Bruno");
        assert_eq!(inner.list_recent_matches(10).unwrap().len(), 1);
        assert_eq!(inner.get_player(ana.id).unwrap().unwrap().rating, 1222.0);
    }

    #[tokio::test]
    async fn test_rules_are_published() {
        let (status, rules) = send(&app(), Method::GET, "/api/rules", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rules["baseExchange"], 20.0);
        assert_eq!(rules["startingRating"], 1200.0);
        assert_eq!(rules["minTeamStrength"], 0.5);
        assert_eq!(rules["maxTeamStrength"], 5.0);
    }
}
