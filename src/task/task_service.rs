use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::notification::{assignment_message, Notification, NotificationRepository};
use crate::task::task_dto::{
    CreateSubTaskRequest, CreateTaskRequest, PostActivityRequest, TaskFilters, TrashAction,
    UpdateTaskRequest,
};
use crate::task::task_models::{Activity, ActivityType, Requester, SubTask, Task};
use crate::task::task_repository::{NewTask, TaskChanges, TaskRepository};
use crate::user::UserSet;

/// Service layer for task‑related business logic.
#[derive(Clone)]
pub struct TaskService {
    db: DbPool,
    repo: TaskRepository,
    notifications: NotificationRepository,
    notification_tx: broadcast::Sender<Notification>,
}

impl TaskService {
    pub fn new(
        db: DbPool,
        repo: TaskRepository,
        notifications: NotificationRepository,
        notification_tx: broadcast::Sender<Notification>,
    ) -> Self {
        Self {
            db,
            repo,
            notifications,
            notification_tx,
        }
    }

    pub async fn list_tasks(&self, requester: Requester, filters: TaskFilters) -> Result<Vec<Task>> {
        self.repo.find_visible(requester, &filters).await
    }

    pub async fn get_task(&self, requester: Requester, task_id: Uuid) -> Result<Task> {
        let task = self.find(task_id).await?;

        if !requester.can_view(&task) {
            return Err(AppError::Forbidden("You are not a member of this task".into()));
        }

        Ok(task)
    }

    /// Creates the task and its assignment notice in one transaction.
    pub async fn create_task(&self, author_id: Uuid, payload: CreateTaskRequest) -> Result<Task> {
        let priority = payload.priority.unwrap_or_default();
        let date = payload.date.unwrap_or_else(|| Utc::now().date_naive());
        let team = UserSet::from(payload.team);
        let text = assignment_message(team.len(), priority, date);

        let new_task = NewTask {
            title: payload.title,
            stage: payload.stage.unwrap_or_default(),
            priority,
            date,
            team,
            assets: payload.assets,
            activities: vec![Activity {
                kind: ActivityType::Assigned,
                text: text.clone(),
                author_id,
                timestamp: Utc::now(),
            }],
            sub_tasks: Vec::new(),
        };

        self.insert_with_notification(new_task, &text).await
    }

    /// Copies a task (team, sub-tasks and assets are cloned, not shared) under
    /// a new title and notifies its team.
    pub async fn duplicate_task(&self, task_id: Uuid) -> Result<Task> {
        let source = self.find(task_id).await?;
        let text = assignment_message(source.team.len(), source.priority, source.date);

        let copy = NewTask {
            title: format!("{} - Duplicate", source.title),
            stage: source.stage,
            priority: source.priority,
            date: source.date,
            team: source.team,
            assets: source.assets,
            activities: Vec::new(),
            sub_tasks: source.sub_tasks,
        };

        self.insert_with_notification(copy, &text).await
    }

    pub async fn update_task(&self, task_id: Uuid, payload: UpdateTaskRequest) -> Result<Task> {
        let changes = TaskChanges {
            title: payload.title,
            stage: payload.stage,
            priority: payload.priority,
            date: payload.date,
            team: payload.team.map(UserSet::from),
            assets: payload.assets,
        };

        self.repo
            .update(task_id, changes)
            .await?
            .ok_or_else(not_found)
    }

    /// Team members and administrators may post on a task.
    pub async fn post_activity(
        &self,
        requester: Requester,
        task_id: Uuid,
        payload: PostActivityRequest,
    ) -> Result<()> {
        self.get_task(requester, task_id).await?;

        let activity = Activity {
            kind: payload.kind,
            text: payload.text,
            author_id: requester.id,
            timestamp: Utc::now(),
        };

        if self.repo.append_activity(task_id, &activity).await? == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    pub async fn add_sub_task(&self, task_id: Uuid, payload: CreateSubTaskRequest) -> Result<()> {
        let sub_task = SubTask {
            title: payload.title,
            date: payload.date,
            tag: payload.tag,
        };

        if self.repo.append_sub_task(task_id, &sub_task).await? == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    pub async fn trash_task(&self, task_id: Uuid) -> Result<()> {
        if self.repo.set_trashed(task_id, true).await? == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    /// Hard delete or restore from the trash. Single-task actions need an id.
    pub async fn apply_trash_action(&self, action: TrashAction, task_id: Option<Uuid>) -> Result<u64> {
        let require_id =
            || task_id.ok_or_else(|| AppError::Validation("Task id is required".into()));

        let affected = match action {
            TrashAction::Delete => self.repo.delete(require_id()?).await?,
            TrashAction::DeleteAll => self.repo.delete_trashed().await?,
            TrashAction::Restore => self.repo.set_trashed(require_id()?, false).await?,
            TrashAction::RestoreAll => self.repo.restore_all().await?,
        };

        if affected == 0 && matches!(action, TrashAction::Delete | TrashAction::Restore) {
            return Err(not_found());
        }

        tracing::info!(?action, affected, "Trash action applied");
        Ok(affected)
    }

    async fn find(&self, task_id: Uuid) -> Result<Task> {
        self.repo.find_by_id(task_id).await?.ok_or_else(not_found)
    }

    async fn insert_with_notification(&self, new_task: NewTask, text: &str) -> Result<Task> {
        let mut tx = self.db.begin().await?;

        let task = self.repo.create_with_tx(&mut tx, new_task).await?;

        let notification = match self
            .notifications
            .create_with_tx(&mut tx, &task.team.to_vec(), text, task.id)
            .await
        {
            Ok(notification) => notification,
            Err(e) => {
                tracing::error!(task_id = %task.id, "Failed to create assignment notification: {}", e);
                return Err(e);
            }
        };

        tx.commit().await?;

        tracing::info!(task_id = %task.id, recipients = task.team.len(), "Task created");

        // No subscribers is fine.
        let _ = self.notification_tx.send(notification);

        Ok(task)
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{admin, notification_count, services, task_request};
    use sqlx::PgPool;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_writes_and_broadcasts_one_notification(pool: PgPool) {
        let s = services(&pool);
        let mut rx = s.notification_tx.subscribe();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let task = s.tasks.create_task(a, task_request("Sprint plan", &[a, b])).await.unwrap();

        assert_eq!(notification_count(&pool, task.id).await, 1);
        let sent = rx.try_recv().unwrap();
        assert_eq!(sent.task_id, task.id);
        assert_eq!(sent.team, task.team);
        assert_eq!(sent.is_read.len(), 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(task.activities.len(), 1);
        assert_eq!(task.activities[0].text, sent.text);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_writes_one_notification_for_the_copy(pool: PgPool) {
        let s = services(&pool);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let source = s.tasks.create_task(a, task_request("Audit", &[a, b])).await.unwrap();
        let mut rx = s.notification_tx.subscribe();

        let copy = s.tasks.duplicate_task(source.id).await.unwrap();

        assert_ne!(copy.id, source.id);
        assert_eq!(copy.title, "Audit - Duplicate");
        assert_eq!(copy.team, source.team);
        assert!(copy.activities.is_empty());
        assert_eq!(notification_count(&pool, copy.id).await, 1);
        assert_eq!(notification_count(&pool, source.id).await, 1);
        assert_eq!(rx.try_recv().unwrap().task_id, copy.id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_unknown_task_is_not_found(pool: PgPool) {
        let s = services(&pool);

        let result = s.tasks.duplicate_task(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_repeated_team_ids_collapse(pool: PgPool) {
        let s = services(&pool);
        let mut rx = s.notification_tx.subscribe();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        let task = s.tasks.create_task(a, task_request("Retro", &[a, a, b])).await.unwrap();

        assert_eq!(task.team.len(), 2);
        let sent = rx.try_recv().unwrap();
        assert_eq!(sent.team.len(), 2);
        assert!(sent.text.contains("and 1 others"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_search_treats_wildcards_literally(pool: PgPool) {
        let s = services(&pool);
        let a = Uuid::new_v4();
        s.tasks.create_task(a, task_request("Budget 100%", &[a])).await.unwrap();
        s.tasks.create_task(a, task_request("Roadmap", &[a])).await.unwrap();
        let search = |term: &str| TaskFilters {
            stage: None,
            is_trashed: false,
            search: Some(term.to_string()),
        };

        let percent = s.tasks.list_tasks(admin(), search("%")).await.unwrap();
        let underscore = s.tasks.list_tasks(admin(), search("_")).await.unwrap();

        let titles: Vec<String> = percent.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Budget 100%".to_string()]);
        assert!(underscore.is_empty());
    }
}
