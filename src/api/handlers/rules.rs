use axum::response::Json;

use crate::api::models::RulesResponse;

pub async fn get_rules() -> Json<RulesResponse> {
    Json(RulesResponse::current())
}
