use crate::{
    auth::hash_password,
    error::{AppError, Result},
    middleware::CurrentUser,
    user::{
        user_dto::{ChangePasswordRequest, UpdateProfileRequest},
        user_models::{TeamMember, UserResponse},
        user_repository::UserRepository,
    },
};
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    pub async fn get_team(&self) -> Result<Vec<TeamMember>> {
        self.user_repository.find_team().await
    }

    pub async fn update_profile(
        &self,
        current: &CurrentUser,
        payload: UpdateProfileRequest,
    ) -> Result<UserResponse> {
        let target = profile_target(current, payload.id);

        let user = self
            .user_repository
            .update_profile(
                target,
                payload.name.as_deref(),
                payload.title.as_deref(),
                payload.role.as_deref(),
            )
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    pub async fn change_password(&self, user_id: Uuid, payload: ChangePasswordRequest) -> Result<()> {
        let password_hash = hash_password(&payload.password)?;
        let updated = self.user_repository.update_password(user_id, &password_hash).await?;

        if updated == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    /// Returns the new active flag.
    pub async fn set_active(&self, user_id: Uuid, is_active: bool) -> Result<bool> {
        let user = self
            .user_repository
            .update_active_status(user_id, is_active)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(user_id = %user.id, is_active = user.is_active, "User status changed");
        Ok(user.is_active)
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        if self.user_repository.delete(user_id).await? == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(%user_id, "User deleted");
        Ok(())
    }
}

/// Administrators may edit any profile by id; everyone else edits their own.
fn profile_target(current: &CurrentUser, requested: Option<Uuid>) -> Uuid {
    match requested {
        Some(id) if current.is_admin => id,
        _ => current.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            is_admin,
        }
    }

    #[test]
    fn test_admin_may_target_other_profile() {
        let admin = user(true);
        let other = Uuid::new_v4();
        assert_eq!(profile_target(&admin, Some(other)), other);
        assert_eq!(profile_target(&admin, None), admin.id);
    }

    #[test]
    fn test_member_always_edits_self() {
        let member = user(false);
        assert_eq!(profile_target(&member, Some(Uuid::new_v4())), member.id);
    }
}
