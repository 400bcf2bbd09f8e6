use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::history::HistoryList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::Pagination,
    services::history_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_history))
}

#[utoipa::path(
    get,
    path = "/api/history",
    params(Pagination),
    responses(
        (status = 200, description = "Purchase history, most recent first", body = ApiResponse<HistoryList>)
    ),
    security(("bearer_auth" = [])),
    tag = "History"
)]
pub async fn list_history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<HistoryList>>> {
    let resp = history_service::list_history(&state, &user, pagination).await?;
    Ok(Json(resp))
}
