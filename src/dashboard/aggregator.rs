//! Dashboard statistics over the tasks a requester can see.
//!
//! The repository hands over the visible, non-trashed tasks newest first;
//! everything here is a single pass over that slice with no I/O.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{ser::SerializeMap, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::task::{Activity, Priority, Requester, Stage, SubTask, Task};
use crate::user::{RecentUser, TaskMember};

pub const LAST_TASKS_LIMIT: usize = 10;
pub const RECENT_USERS_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PriorityTotal {
    pub name: Priority,
    pub total: usize,
}

/// Task count per stage in order of first appearance. Serialises as a JSON
/// object keyed by the stage name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageCounts(pub Vec<(Stage, usize)>);

impl StageCounts {
    fn add(&mut self, stage: Stage) {
        match self.0.iter_mut().find(|(s, _)| *s == stage) {
            Some((_, count)) => *count += 1,
            None => self.0.push((stage, 1)),
        }
    }
}

impl Serialize for StageCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (stage, count) in &self.0 {
            map.serialize_entry(stage.as_str(), count)?;
        }
        map.end()
    }
}

/// A recent task with its team resolved to contact cards.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTask {
    pub id: Uuid,
    pub title: String,
    pub stage: Stage,
    pub priority: Priority,
    pub date: NaiveDate,
    pub team: Vec<TaskMember>,
    pub assets: Vec<String>,
    pub activities: Vec<Activity>,
    pub sub_tasks: Vec<SubTask>,
    pub is_trashed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DashboardTask {
    /// Team ids without a matching member (deleted accounts) are dropped.
    fn resolve(task: Task, members: &HashMap<Uuid, &TaskMember>) -> Self {
        let team = task
            .team
            .to_vec()
            .into_iter()
            .filter_map(|id| members.get(&id).map(|m| (*m).clone()))
            .collect();

        Self {
            id: task.id,
            title: task.title,
            stage: task.stage,
            priority: task.priority,
            date: task.date,
            team,
            assets: task.assets,
            activities: task.activities,
            sub_tasks: task.sub_tasks,
            is_trashed: task.is_trashed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_tasks: usize,
    #[serde(rename = "last10Task")]
    pub last_10_task: Vec<DashboardTask>,
    /// Only populated for administrators.
    pub users: Vec<RecentUser>,
    /// Stages with no tasks are absent.
    #[schema(value_type = Object)]
    pub tasks: StageCounts,
    /// Task count per priority in order of first appearance.
    pub graph_data: Vec<PriorityTotal>,
}

/// `members` supplies the contact cards for the teams of the recent tasks.
pub fn compute_dashboard(
    requester: Requester,
    tasks: Vec<Task>,
    recent_users: Vec<RecentUser>,
    members: &[TaskMember],
) -> DashboardSummary {
    let mut by_stage = StageCounts::default();
    let mut by_priority: Vec<PriorityTotal> = Vec::new();

    for task in &tasks {
        by_stage.add(task.stage);

        match by_priority.iter_mut().find(|p| p.name == task.priority) {
            Some(entry) => entry.total += 1,
            None => by_priority.push(PriorityTotal {
                name: task.priority,
                total: 1,
            }),
        }
    }

    let total_tasks = tasks.len();
    let directory: HashMap<Uuid, &TaskMember> = members.iter().map(|m| (m.id, m)).collect();
    let last_10_task = tasks
        .into_iter()
        .take(LAST_TASKS_LIMIT)
        .map(|task| DashboardTask::resolve(task, &directory))
        .collect();

    DashboardSummary {
        total_tasks,
        last_10_task,
        users: if requester.is_admin { recent_users } else { Vec::new() },
        tasks: by_stage,
        graph_data: by_priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::task_models::tests::task;

    fn admin() -> Requester {
        Requester { id: Uuid::new_v4(), is_admin: true }
    }

    fn recent_user(name: &str) -> RecentUser {
        RecentUser {
            id: Uuid::new_v4(),
            name: name.to_string(),
            title: "Engineer".to_string(),
            role: "Developer".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    fn member(name: &str) -> TaskMember {
        TaskMember {
            id: Uuid::new_v4(),
            name: name.to_string(),
            title: "Engineer".to_string(),
            role: "Developer".to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    #[test]
    fn test_groups_by_stage_and_priority() {
        let tasks = vec![
            task(Stage::Todo, Priority::High, &[]),
            task(Stage::Todo, Priority::Low, &[]),
            task(Stage::Completed, Priority::High, &[]),
        ];

        let summary = compute_dashboard(admin(), tasks, Vec::new(), &[]);

        assert_eq!(summary.total_tasks, 3);
        assert_eq!(
            summary.tasks,
            StageCounts(vec![(Stage::Todo, 2), (Stage::Completed, 1)])
        );
        assert_eq!(
            summary.graph_data,
            vec![
                PriorityTotal { name: Priority::High, total: 2 },
                PriorityTotal { name: Priority::Low, total: 1 },
            ]
        );
    }

    #[test]
    fn test_stage_keys_keep_first_seen_order() {
        let tasks = vec![
            task(Stage::Todo, Priority::Normal, &[]),
            task(Stage::Completed, Priority::Normal, &[]),
            task(Stage::InProgress, Priority::Normal, &[]),
            task(Stage::Completed, Priority::Normal, &[]),
        ];

        let summary = compute_dashboard(admin(), tasks, Vec::new(), &[]);
        let json = serde_json::to_string(&summary.tasks).unwrap();

        assert_eq!(json, r#"{"todo":1,"completed":2,"in-progress":1}"#);
    }

    #[test]
    fn test_empty_input() {
        let summary = compute_dashboard(admin(), Vec::new(), Vec::new(), &[]);

        assert_eq!(summary.total_tasks, 0);
        assert!(summary.last_10_task.is_empty());
        assert_eq!(summary.tasks, StageCounts::default());
        assert!(summary.graph_data.is_empty());
    }

    #[test]
    fn test_last_tasks_keep_input_order_and_cap_at_ten() {
        let tasks: Vec<Task> = (0..13)
            .map(|_| task(Stage::InProgress, Priority::Normal, &[]))
            .collect();
        let expected: Vec<Uuid> = tasks.iter().take(10).map(|t| t.id).collect();

        let summary = compute_dashboard(admin(), tasks, Vec::new(), &[]);

        assert_eq!(summary.total_tasks, 13);
        let ids: Vec<Uuid> = summary.last_10_task.iter().map(|t| t.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_recent_tasks_carry_team_contact_cards() {
        let ada = member("Ada");
        let gone = Uuid::new_v4();
        let tasks = vec![task(Stage::Todo, Priority::High, &[ada.id, gone])];

        let summary = compute_dashboard(admin(), tasks, Vec::new(), &[ada.clone()]);

        assert_eq!(summary.last_10_task[0].team, vec![ada.clone()]);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["last10Task"][0]["team"][0]["email"], "ada@example.com");
        assert_eq!(json["last10Task"][0]["subTasks"], serde_json::json!([]));
    }

    #[test]
    fn test_priority_totals_sum_to_total() {
        let tasks = vec![
            task(Stage::Todo, Priority::Medium, &[]),
            task(Stage::Todo, Priority::Normal, &[]),
            task(Stage::Completed, Priority::Medium, &[]),
            task(Stage::InProgress, Priority::Low, &[]),
            task(Stage::InProgress, Priority::High, &[]),
        ];

        let summary = compute_dashboard(admin(), tasks, Vec::new(), &[]);

        let sum: usize = summary.graph_data.iter().map(|p| p.total).sum();
        assert_eq!(sum, summary.total_tasks);
        let stage_sum: usize = summary.tasks.0.iter().map(|(_, n)| n).sum();
        assert_eq!(stage_sum, summary.total_tasks);
        assert_eq!(summary.graph_data[0].name, Priority::Medium);
        assert_eq!(summary.graph_data.len(), 4);
    }

    #[test]
    fn test_users_only_for_admins() {
        let users = vec![recent_user("Ada"), recent_user("Linus")];
        let member = Requester { id: Uuid::new_v4(), is_admin: false };

        let summary = compute_dashboard(member, Vec::new(), users.clone(), &[]);
        assert!(summary.users.is_empty());

        let summary = compute_dashboard(admin(), Vec::new(), users.clone(), &[]);
        assert_eq!(summary.users, users);
    }

    #[test]
    fn test_json_shape() {
        let tasks = vec![task(Stage::InProgress, Priority::High, &[])];

        let json =
            serde_json::to_value(compute_dashboard(admin(), tasks, Vec::new(), &[])).unwrap();

        assert_eq!(json["totalTasks"], 1);
        assert_eq!(json["last10Task"].as_array().unwrap().len(), 1);
        assert_eq!(json["tasks"]["in-progress"], 1);
        assert_eq!(json["graphData"][0], serde_json::json!({ "name": "high", "total": 1 }));
        assert_eq!(json["users"], serde_json::json!([]));
    }
}
