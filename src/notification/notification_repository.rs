use crate::error::Result;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use super::notification_models::{Notification, UnreadNotification, UnreadNotificationRow};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// New notices start with an empty read set.
    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        recipients: &[Uuid],
        text: &str,
        task_id: Uuid,
    ) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (team, text, task_id)
             VALUES ($1, $2, $3)
             RETURNING *"
        )
        .bind(recipients)
        .bind(text)
        .bind(task_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(notification)
    }

    pub async fn find_unread(&self, user_id: Uuid) -> Result<Vec<UnreadNotification>> {
        let rows = sqlx::query_as::<_, UnreadNotificationRow>(
            "SELECT n.id, n.task_id, t.title AS task_title, n.team, n.text, n.is_read, n.created_at
             FROM notifications n
             JOIN tasks t ON t.id = n.task_id
             WHERE $1 = ANY(n.team) AND NOT ($1 = ANY(n.is_read))
             ORDER BY n.seq DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UnreadNotification::from).collect())
    }

    /// Adds `user_id` to the read set of every notice it has not read yet.
    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = array_append(is_read, $1)
             WHERE $1 = ANY(team) AND NOT ($1 = ANY(is_read))"
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = array_append(is_read, $1)
             WHERE id = $2 AND $1 = ANY(team) AND NOT ($1 = ANY(is_read))"
        )
        .bind(user_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
