use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    auth::extractors::AuthUser,
    dashboard::{
        dto::{CategoryAmount, DailyTotals, MonthlyTotals, SpendingAlert, Summary},
        services,
    },
    error::AppResult,
    state::AppState,
};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/summary", get(summary))
        .route("/dashboard/category-breakdown", get(category_breakdown))
        .route("/dashboard/monthly", get(monthly))
        .route("/dashboard/daily", get(daily))
        .route("/dashboard/spending-alerts", get(spending_alerts))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn summary(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Summary>> {
    let txs = state.transactions.list_by_user(auth.id).await?;
    Ok(Json(services::summary(&txs)))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn category_breakdown(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<CategoryAmount>>> {
    let txs = state.transactions.list_by_user(auth.id).await?;
    Ok(Json(services::category_breakdown(&txs)))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn monthly(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<MonthlyTotals>>> {
    let txs = state.transactions.list_by_user(auth.id).await?;
    Ok(Json(services::monthly_trend(&txs)))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn daily(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<DailyTotals>>> {
    let txs = state.transactions.list_by_user(auth.id).await?;
    Ok(Json(services::daily_stats(&txs)))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn spending_alerts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<SpendingAlert>>> {
    let txs = state.transactions.list_by_user(auth.id).await?;
    Ok(Json(services::spending_alerts(
        &txs,
        &auth.profile,
        OffsetDateTime::now_utc(),
    )))
}
