use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    transactions::{dto::TransactionRequest, repo_types::Transaction},
};

const NOT_FOUND: &str = "Transaction not found";

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transaction/all", get(list_transactions))
        .route("/transaction/create", post(create_transaction))
        .route("/transaction/update/:id", put(update_transaction))
        .route("/transaction/delete/:id", delete(delete_transaction))
}

// An id that is not a UUID cannot name anything the caller owns.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(NOT_FOUND))
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<Transaction>>> {
    let rows = state.transactions.list_by_user(auth.id).await?;
    Ok(Json(rows))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id))]
pub async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let Json(payload) = payload?;
    let new = payload.into_new()?;
    let created = state.transactions.create(auth.id, &new).await?;
    info!(transaction_id = %created.id, "transaction created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id))]
pub async fn update_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> AppResult<Json<Transaction>> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let patch = payload.into_patch()?;

    match state.transactions.update(auth.id, id, &patch).await? {
        Some(updated) => {
            info!(transaction_id = %id, "transaction updated");
            Ok(Json(updated))
        }
        None => {
            warn!(transaction_id = %id, "update on missing or foreign transaction");
            Err(AppError::NotFound(NOT_FOUND))
        }
    }
}

#[instrument(skip(state, auth), fields(user_id = %auth.id))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id)?;
    if !state.transactions.delete(auth.id, id).await? {
        warn!(transaction_id = %id, "delete on missing or foreign transaction");
        return Err(AppError::NotFound(NOT_FOUND));
    }
    info!(transaction_id = %id, "transaction deleted");
    Ok(Json(json!({ "message": "Transaction deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_read_as_not_found() {
        let err = parse_id("64b7f0c2e1").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(parse_id(&Uuid::new_v4().to_string()).is_ok());
    }
}
