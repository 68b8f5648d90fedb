use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use crate::{
    error::{AppError, Result},
    middleware::CurrentUser,
};

/// Must be layered inside `auth_middleware`, which resolves `is_admin` from
/// the user record on every request.
pub async fn admin_authorization(
    current: CurrentUser,
    request: Request,
    next: Next,
) -> Result<Response> {
    if !current.is_admin {
        return Err(AppError::Forbidden(
            "Not authorized as admin. Try login as admin".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
