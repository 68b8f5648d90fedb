use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            title: user.title,
            role: user.role,
            email: user.email,
            is_admin: user.is_admin,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// Row of the admin team listing.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: String,
    pub is_active: bool,
}

/// Contact card of a task's team member, shown with the dashboard's recent
/// tasks.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct TaskMember {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub role: String,
    pub email: String,
}

/// Recently created active user, as shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentUser {
    pub id: Uuid,
    pub name: String,
    pub title: String,
    pub role: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}
