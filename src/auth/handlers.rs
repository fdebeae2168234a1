use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, SaveProfileRequest, SignupRequest, UserProfile},
        extractors::AuthUser,
        jwt::JwtKeys,
        password::{hash_password, verify_login},
        repo::is_unique_violation,
        session,
    },
    error::{AppError, AppResult},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid Username or Password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/save", post(save_profile))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, CookieJar, Json<PublicUser>)> {
    let Json(payload) = payload?;
    let account = payload.validate().map_err(|e| {
        warn!(error = %e, "signup rejected");
        e
    })?;

    // Two independent uniqueness checks; both must pass.
    if state.users.find_by_username(&account.username).await?.is_some() {
        warn!(username = %account.username, "username already taken");
        return Err(AppError::validation("Username is already taken"));
    }
    if state.users.find_by_email(&account.email).await?.is_some() {
        warn!(email = %account.email, "email already taken");
        return Err(AppError::validation("Email is already taken"));
    }

    let hash = hash_password(&account.password)?;

    let user = match state
        .users
        .create(&account.username, &account.email, &hash)
        .await
    {
        Ok(u) => u,
        Err(e) if is_unique_violation(&e) => {
            warn!(username = %account.username, "signup lost a uniqueness race");
            return Err(AppError::validation("Username or Email is already taken"));
        }
        Err(e) => return Err(AppError::Internal(e.context("create user failed"))),
    };

    let keys = JwtKeys::from_ref(&state);
    let jar = session::issue(CookieJar::new(), &keys, &state.config.cookie, user.id)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, jar, Json(PublicUser::from(&user))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(CookieJar, Json<PublicUser>)> {
    let Json(payload) = payload?;
    let (Some(username), Some(password)) = (payload.username, payload.password) else {
        return Err(AppError::validation("Username and Password are required"));
    };
    // Same normalization as signup.
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::validation("Username and Password are required"));
    }

    let found = state.users.find_by_username(username).await?;
    let matches = verify_login(&password, found.as_ref().map(|u| u.password_hash.as_str()))?;

    let user = match found {
        Some(u) if matches => u,
        Some(u) => {
            warn!(user_id = %u.id, "login invalid password");
            return Err(AppError::validation(INVALID_CREDENTIALS));
        }
        None => {
            warn!(username = %username, "login unknown username");
            return Err(AppError::validation(INVALID_CREDENTIALS));
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let jar = session::issue(CookieJar::new(), &keys, &state.config.cookie, user.id)?;

    info!(user_id = %user.id, "user logged in");
    Ok((jar, Json(PublicUser::from(&user))))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> (CookieJar, Json<Value>) {
    let jar = session::clear(CookieJar::new(), &state.config.cookie);
    (jar, Json(json!({ "message": "Logged out Successfully" })))
}

#[instrument(skip(auth), fields(user_id = %auth.id))]
pub async fn get_me(auth: AuthUser) -> Json<UserProfile> {
    Json(auth.profile)
}

#[instrument(skip(state, auth, payload), fields(user_id = %auth.id))]
pub async fn save_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<SaveProfileRequest>, JsonRejection>,
) -> AppResult<Json<UserProfile>> {
    let Json(payload) = payload?;
    let patch = payload.validate()?;

    let updated = state
        .users
        .update_profile(auth.id, &patch)
        .await?
        .ok_or(AppError::NotFound("Credentials not found"))?;

    info!("profile updated");
    Ok(Json(updated.into()))
}
