use crate::{
    auth::cookie::{cleared_cookie, session_cookie, token_from_headers},
    error::{AppError, Result},
    state::AppState,
    user::{MessageResponse, UserResponse},
};
use super::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use validator::Validate;

fn with_cookie(mut response: Response, cookie: &str) -> Result<Response> {
    let value = HeaderValue::from_str(cookie).map_err(|_| AppError::InternalError)?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/user/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error or user already exists")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response> {
    payload.validate()?;

    // An invalid or stale session simply counts as anonymous here.
    let caller = match token_from_headers(&headers) {
        Some(token) => state.auth_service.resolve_session(&token).await.ok(),
        None => None,
    };

    let (user, token) = state.auth_service.register(&payload, caller.as_ref()).await?;

    let response = (StatusCode::CREATED, Json(UserResponse::from(user))).into_response();
    match token {
        Some(token) => with_cookie(
            response,
            &session_cookie(
                &token,
                state.auth_service.session_max_age_secs(),
                state.config.cookie_secure,
            ),
        ),
        None => Ok(response),
    }
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/user/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Account deactivated"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    payload.validate()?;

    let (user, token) = state.auth_service.login(&payload.email, &payload.password).await?;

    let response = Json(LoginResponse {
        status: true,
        message: "Login Successful".to_string(),
        data: user.into(),
    })
    .into_response();

    with_cookie(
        response,
        &session_cookie(
            &token,
            state.auth_service.session_max_age_secs(),
            state.config.cookie_secure,
        ),
    )
}

/// Logout (expire the session cookie)
#[utoipa::path(
    post,
    path = "/api/user/logout",
    responses(
        (status = 200, description = "Logged out successfully", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>) -> Result<Response> {
    let response = Json(MessageResponse::ok("Logged out Successfully")).into_response();
    with_cookie(response, &cleared_cookie(state.config.cookie_secure))
}
