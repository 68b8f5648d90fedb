use crate::error::Result;
use sqlx::PgPool;
use uuid::Uuid;
use super::user_models::{RecentUser, TaskMember, TeamMember, User};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

pub struct NewUser<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub role: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_admin: bool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: NewUser<'_>) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, title, role, email, password_hash, is_admin)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *"
        )
        .bind(user.name)
        .bind(user.title)
        .bind(user.role)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn any_admin(&self) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE is_admin)")
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn find_team(&self) -> Result<Vec<TeamMember>> {
        let members = sqlx::query_as::<_, TeamMember>(
            "SELECT id, name, title, role, email, is_active FROM users ORDER BY seq"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Users among `ids`; unknown ids are skipped.
    pub async fn find_members(&self, ids: &[Uuid]) -> Result<Vec<TaskMember>> {
        let members = sqlx::query_as::<_, TaskMember>(
            "SELECT id, name, title, role, email FROM users WHERE id = ANY($1)"
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    /// Newest active users first.
    pub async fn find_recent_active(&self, limit: i64) -> Result<Vec<RecentUser>> {
        let users = sqlx::query_as::<_, RecentUser>(
            "SELECT id, name, title, role, is_admin, created_at
             FROM users
             WHERE is_active
             ORDER BY seq DESC
             LIMIT $1"
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<&str>,
        title: Option<&str>,
        role: Option<&str>,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET
                name = COALESCE(NULLIF($1, ''), name),
                title = COALESCE(NULLIF($2, ''), title),
                role = COALESCE(NULLIF($3, ''), role),
                updated_at = NOW()
             WHERE id = $4
             RETURNING *"
        )
        .bind(name)
        .bind(title)
        .bind(role)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn update_password(&self, user_id: Uuid, password_hash: &str) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2"
        )
        .bind(password_hash)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn update_active_status(&self, user_id: Uuid, is_active: bool) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING *"
        )
        .bind(is_active)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
