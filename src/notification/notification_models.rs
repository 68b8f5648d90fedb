use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::user::UserSet;

/// A broadcast notice about a task. `team` is the recipient snapshot taken
/// when the notice was created; `is_read` holds the recipients that have
/// acknowledged it and only ever grows.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    #[serde(rename = "task")]
    pub task_id: Uuid,
    #[sqlx(try_from = "Vec<Uuid>")]
    #[schema(value_type = Vec<Uuid>)]
    pub team: UserSet,
    pub text: String,
    #[sqlx(try_from = "Vec<Uuid>")]
    #[schema(value_type = Vec<Uuid>)]
    pub is_read: UserSet,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_recipient(&self, user_id: Uuid) -> bool {
        self.team.contains(user_id)
    }

    pub fn is_unread_by(&self, user_id: Uuid) -> bool {
        self.is_recipient(user_id) && !self.is_read.contains(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TaskRef {
    pub id: Uuid,
    pub title: String,
}

/// Unread notice with the referenced task's title joined in.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadNotification {
    pub id: Uuid,
    #[schema(value_type = Vec<Uuid>)]
    pub team: UserSet,
    pub text: String,
    pub task: TaskRef,
    #[schema(value_type = Vec<Uuid>)]
    pub is_read: UserSet,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub(crate) struct UnreadNotificationRow {
    pub id: Uuid,
    pub task_id: Uuid,
    pub task_title: String,
    #[sqlx(try_from = "Vec<Uuid>")]
    pub team: UserSet,
    pub text: String,
    #[sqlx(try_from = "Vec<Uuid>")]
    pub is_read: UserSet,
    pub created_at: DateTime<Utc>,
}

impl From<UnreadNotificationRow> for UnreadNotification {
    fn from(row: UnreadNotificationRow) -> Self {
        Self {
            id: row.id,
            team: row.team,
            text: row.text,
            task: TaskRef {
                id: row.task_id,
                title: row.task_title,
            },
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}
