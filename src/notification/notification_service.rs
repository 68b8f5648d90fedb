use crate::error::Result;
use uuid::Uuid;

use super::{
    notification_ledger::ReadTarget,
    notification_models::UnreadNotification,
    notification_repository::NotificationRepository,
};

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository) -> Self {
        Self { repo }
    }

    pub async fn list_unread(&self, user_id: Uuid) -> Result<Vec<UnreadNotification>> {
        self.repo.find_unread(user_id).await
    }

    /// Unknown ids and notices the caller is not a recipient of are no-ops.
    pub async fn mark_read(&self, user_id: Uuid, target: ReadTarget) -> Result<u64> {
        let marked = match target {
            ReadTarget::All => self.repo.mark_all_read(user_id).await?,
            ReadTarget::One(id) => self.repo.mark_read(id, user_id).await?,
        };

        tracing::debug!(%user_id, ?target, marked, "Notifications marked read");
        Ok(marked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{services, task_request};
    use sqlx::PgPool;

    #[sqlx::test(migrations = "./migrations")]
    async fn test_mark_all_only_affects_caller(pool: PgPool) {
        let s = services(&pool);
        let (a, b, outsider) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        s.tasks.create_task(a, task_request("Quarterly report", &[a, b])).await.unwrap();

        assert_eq!(s.notifications.mark_read(b, ReadTarget::All).await.unwrap(), 1);
        assert_eq!(s.notifications.mark_read(outsider, ReadTarget::All).await.unwrap(), 0);

        let unread_a = s.notifications.list_unread(a).await.unwrap();
        assert_eq!(unread_a.len(), 1);
        assert!(unread_a[0].is_read.contains(b));
        assert!(s.notifications.list_unread(b).await.unwrap().is_empty());
        assert!(s.notifications.list_unread(outsider).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_mark_read_is_idempotent(pool: PgPool) {
        let s = services(&pool);
        let a = Uuid::new_v4();
        s.tasks.create_task(a, task_request("One", &[a])).await.unwrap();
        s.tasks.create_task(a, task_request("Two", &[a])).await.unwrap();

        assert_eq!(s.notifications.mark_read(a, ReadTarget::All).await.unwrap(), 2);
        assert_eq!(s.notifications.mark_read(a, ReadTarget::All).await.unwrap(), 0);
        assert!(s.notifications.list_unread(a).await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_mark_one_leaves_others_unread(pool: PgPool) {
        let s = services(&pool);
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        s.tasks.create_task(a, task_request("Shared", &[a, b])).await.unwrap();
        s.tasks.create_task(a, task_request("Solo", &[a])).await.unwrap();

        let shared = s.notifications.list_unread(b).await.unwrap()[0].id;
        assert_eq!(s.notifications.mark_read(a, ReadTarget::One(shared)).await.unwrap(), 1);
        assert_eq!(s.notifications.mark_read(a, ReadTarget::One(shared)).await.unwrap(), 0);

        let titles: Vec<String> = s
            .notifications
            .list_unread(a)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.task.title)
            .collect();
        assert_eq!(titles, vec!["Solo".to_string()]);
        assert_eq!(s.notifications.list_unread(b).await.unwrap().len(), 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_non_recipient_and_unknown_id_are_noops(pool: PgPool) {
        let s = services(&pool);
        let (a, outsider) = (Uuid::new_v4(), Uuid::new_v4());
        s.tasks.create_task(a, task_request("Private", &[a])).await.unwrap();
        let id = s.notifications.list_unread(a).await.unwrap()[0].id;

        assert_eq!(s.notifications.mark_read(outsider, ReadTarget::One(id)).await.unwrap(), 0);
        assert_eq!(
            s.notifications.mark_read(a, ReadTarget::One(Uuid::new_v4())).await.unwrap(),
            0
        );

        let unread = s.notifications.list_unread(a).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert!(!unread[0].is_read.contains(outsider));
        assert_eq!(unread[0].is_read.len(), 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unread_newest_first_with_task_title(pool: PgPool) {
        let s = services(&pool);
        let a = Uuid::new_v4();
        let first = s.tasks.create_task(a, task_request("First", &[a])).await.unwrap();
        let second = s.tasks.create_task(a, task_request("Second", &[a])).await.unwrap();

        let unread = s.notifications.list_unread(a).await.unwrap();

        let refs: Vec<(Uuid, String)> =
            unread.iter().map(|n| (n.task.id, n.task.title.clone())).collect();
        assert_eq!(
            refs,
            vec![(second.id, "Second".to_string()), (first.id, "First".to_string())]
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_concurrent_marks_are_all_recorded(pool: PgPool) {
        let s = services(&pool);
        let team: Vec<Uuid> = (0..20).map(|_| Uuid::new_v4()).collect();
        let task = s.tasks.create_task(team[0], task_request("Launch", &team)).await.unwrap();

        let handles: Vec<_> = team
            .iter()
            .map(|user| {
                let notifications = s.notifications.clone();
                let user = *user;
                tokio::spawn(async move { notifications.mark_read(user, ReadTarget::All).await })
            })
            .collect();
        for handle in futures::future::join_all(handles).await {
            assert_eq!(handle.unwrap().unwrap(), 1);
        }

        let readers: i32 =
            sqlx::query_scalar("SELECT cardinality(is_read) FROM notifications WHERE task_id = $1")
                .bind(task.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(readers, 20);
        for user in &team {
            assert!(s.notifications.list_unread(*user).await.unwrap().is_empty());
        }
    }
}
