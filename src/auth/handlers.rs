use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{
            AccessTokenResponse, LoginRequest, MeResponse, MessageResponse, RefreshRequest,
            RegisterRequest, TokenPair, DEFAULT_ROLE, LOGOUT_SUCCESS, REGISTER_SUCCESS,
        },
        errors::AuthError,
        extractors::AuthUser,
    },
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AuthError::InvalidInput("Invalid email".into()));
    }
    Ok(email)
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    let email = normalize_email(&payload.email)?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AuthError::InvalidInput("Name is required".into()));
    }
    if payload.password.is_empty() {
        return Err(AuthError::InvalidInput("Password is required".into()));
    }
    let role = payload
        .role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_ROLE);

    state
        .auth
        .register(name, &email, &payload.password, role)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(REGISTER_SUCCESS)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let email = normalize_email(&payload.email)?;
    let pair = state.auth.login(&email, &payload.password).await?;
    Ok(Json(pair))
}

#[instrument(skip(state, payload))]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Response, AuthError> {
    if state.auth.logout(&payload.refresh_token).await? {
        Ok((StatusCode::OK, Json(MessageResponse::new(LOGOUT_SUCCESS))).into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Response, AuthError> {
    match state.auth.refresh(&payload.refresh_token).await? {
        Some(access_token) => Ok(Json(AccessTokenResponse { access_token }).into_response()),
        None => Ok((
            StatusCode::UNAUTHORIZED,
            Json(MessageResponse::new("Invalid refresh token")),
        )
            .into_response()),
    }
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(identity): AuthUser) -> Json<MeResponse> {
    Json(identity.into())
}
