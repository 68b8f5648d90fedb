//! Fixtures for tests that run against a Postgres database migrated by
//! `#[sqlx::test(migrations = "./migrations")]`.

use sqlx::PgPool;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::notification::{Notification, NotificationRepository, NotificationService};
use crate::task::{task_dto::CreateTaskRequest, Priority, Requester, Stage, TaskRepository, TaskService};

pub(crate) struct Services {
    pub tasks: TaskService,
    pub notifications: NotificationService,
    pub notification_tx: broadcast::Sender<Notification>,
}

pub(crate) fn services(pool: &PgPool) -> Services {
    let (notification_tx, _) = broadcast::channel(16);
    let notification_repository = NotificationRepository::new(pool.clone());

    Services {
        tasks: TaskService::new(
            pool.clone(),
            TaskRepository::new(pool.clone()),
            notification_repository.clone(),
            notification_tx.clone(),
        ),
        notifications: NotificationService::new(notification_repository),
        notification_tx,
    }
}

pub(crate) fn task_request(title: &str, team: &[Uuid]) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.to_string(),
        team: team.to_vec(),
        stage: Some(Stage::Todo),
        priority: Some(Priority::High),
        date: None,
        assets: Vec::new(),
    }
}

pub(crate) fn admin() -> Requester {
    Requester { id: Uuid::new_v4(), is_admin: true }
}

pub(crate) async fn notification_count(pool: &PgPool, task_id: Uuid) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE task_id = $1")
        .bind(task_id)
        .fetch_one(pool)
        .await
        .unwrap()
}
