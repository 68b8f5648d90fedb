use crate::error::Result;
use crate::task::task_dto::TaskFilters;
use crate::task::{Requester, TaskRepository};
use crate::user::{UserRepository, UserSet};

use super::aggregator::{
    compute_dashboard, DashboardSummary, LAST_TASKS_LIMIT, RECENT_USERS_LIMIT,
};

#[derive(Clone)]
pub struct DashboardService {
    task_repo: TaskRepository,
    user_repo: UserRepository,
}

impl DashboardService {
    pub fn new(task_repo: TaskRepository, user_repo: UserRepository) -> Self {
        Self { task_repo, user_repo }
    }

    pub async fn summary(&self, requester: Requester) -> Result<DashboardSummary> {
        let filters = TaskFilters {
            stage: None,
            is_trashed: false,
            search: None,
        };
        let tasks = self.task_repo.find_visible(requester, &filters).await?;

        let recent_users = if requester.is_admin {
            self.user_repo.find_recent_active(RECENT_USERS_LIMIT).await?
        } else {
            Vec::new()
        };

        let team_ids: UserSet = tasks
            .iter()
            .take(LAST_TASKS_LIMIT)
            .flat_map(|task| task.team.to_vec())
            .collect();
        let members = self.user_repo.find_members(&team_ids.to_vec()).await?;

        tracing::debug!(user_id = %requester.id, tasks = tasks.len(), "Computing dashboard");

        Ok(compute_dashboard(requester, tasks, recent_users, &members))
    }
}
