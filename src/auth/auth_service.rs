use std::sync::Arc;

use crate::auth::{create_jwt, hash_password, verify_jwt, verify_password};
use crate::auth::auth_dto::RegisterRequest;
use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::state::Config;
use crate::user::user_models::User;
use crate::user::user_repository::{NewUser, UserRepository};
use uuid::Uuid;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    config: Arc<Config>,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, config: Arc<Config>) -> Self {
        Self { user_repo, config }
    }

    /// Registers a user. Only an administrator registering themselves (no
    /// `caller`) gets a session token.
    ///
    /// The admin flag is only honoured when an administrator is creating the
    /// account or when no administrator exists yet.
    pub async fn register(
        &self,
        payload: &RegisterRequest,
        caller: Option<&CurrentUser>,
    ) -> Result<(User, Option<String>)> {
        if self.user_repo.find_by_email(&payload.email).await?.is_some() {
            return Err(AppError::BadRequest("User already exists".into()));
        }

        let caller_is_admin = caller.map(|c| c.is_admin).unwrap_or(false);
        let is_admin = payload.is_admin && (caller_is_admin || !self.user_repo.any_admin().await?);

        let password_hash = hash_password(&payload.password)?;
        let user = self
            .user_repo
            .create(NewUser {
                name: &payload.name,
                title: &payload.title,
                role: &payload.role,
                email: &payload.email,
                password_hash: &password_hash,
                is_admin,
            })
            .await
            .map_err(|e| match e {
                AppError::Database(sqlx::Error::Database(ref db_err))
                    if db_err.is_unique_violation() =>
                {
                    AppError::BadRequest("User already exists".into())
                }
                other => other,
            })?;

        tracing::info!(user_id = %user.id, is_admin, "User registered");

        let token = match caller {
            None if user.is_admin => Some(self.issue_token(user.id)?),
            _ => None,
        };

        Ok((user, token))
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".into()))?;

        if !user.is_active {
            return Err(AppError::BadRequest(
                "User account has been deactivated, contact the admin".into(),
            ));
        }

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Authentication("Invalid email or password".into()));
        }

        let token = self.issue_token(user.id)?;
        Ok((user, token))
    }

    /// Resolves a session token to the signed-in user.
    pub async fn resolve_session(&self, token: &str) -> Result<CurrentUser> {
        let claims = verify_jwt(token, &self.config.jwt_secret)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| not_authorized())?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(not_authorized)?;

        if !user.is_active {
            return Err(AppError::Unauthorized(
                "User account has been deactivated, contact the admin".into(),
            ));
        }

        Ok(CurrentUser {
            id: user.id,
            is_admin: user.is_admin,
        })
    }

    pub fn session_max_age_secs(&self) -> i64 {
        self.config.jwt_expiration_hours * 3600
    }

    fn issue_token(&self, user_id: Uuid) -> Result<String> {
        create_jwt(user_id, &self.config.jwt_secret, self.config.jwt_expiration_hours)
    }
}

fn not_authorized() -> AppError {
    AppError::Unauthorized("Not authorized. Try login again".into())
}
