use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    middleware::CurrentUser,
    state::AppState,
    user::{
        user_dto::{
            ChangePasswordRequest, MessageResponse, ProfileResponse, UpdateProfileRequest,
            UpdateUserStatusRequest,
        },
        user_models::TeamMember,
    },
};

/// List every user (admin only)
#[utoipa::path(
    get,
    path = "/api/user/get-team",
    tag = "users",
    responses(
        (status = 200, description = "Team list", body = Vec<TeamMember>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    security(("cookie_auth" = []))
)]
pub async fn get_team_list(State(state): State<AppState>) -> Result<Json<Vec<TeamMember>>> {
    let team = state.user_service.get_team().await?;
    Ok(Json(team))
}

/// Update name, title or role of the caller (or of `_id` for administrators)
#[utoipa::path(
    put,
    path = "/api/user/profile",
    tag = "users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ProfileResponse),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "User not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    payload.validate()?;

    let user = state.user_service.update_profile(&current, payload).await?;

    Ok(Json(ProfileResponse {
        status: true,
        message: "Profile Updated Successfully".to_string(),
        user,
    }))
}

/// Change the caller's password
#[utoipa::path(
    put,
    path = "/api/user/change-password",
    tag = "users",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid input")
    ),
    security(("cookie_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    payload.validate()?;

    state.user_service.change_password(current.id, payload).await?;

    Ok(Json(MessageResponse::ok("Password Changed Successfully")))
}

/// Activate or disable a user account (admin only)
#[utoipa::path(
    put,
    path = "/api/user/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateUserStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "User not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn activate_user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> Result<Json<MessageResponse>> {
    let is_active = state.user_service.set_active(user_id, payload.is_active).await?;

    let verb = if is_active { "activated" } else { "disabled" };
    Ok(Json(MessageResponse::ok(format!("User account has been {verb}"))))
}

/// Delete a user account (admin only)
#[utoipa::path(
    delete,
    path = "/api/user/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "User not found")
    ),
    security(("cookie_auth" = []))
)]
pub async fn delete_user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.user_service.delete_user(user_id).await?;

    Ok(Json(MessageResponse::ok("User deleted Successfully")))
}
