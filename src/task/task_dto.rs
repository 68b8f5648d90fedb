use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use super::task_models::{ActivityType, Priority, Stage, Task};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[serde(default)]
    pub team: Vec<Uuid>,
    pub stage: Option<Stage>,
    pub priority: Option<Priority>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub assets: Vec<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: Option<String>,
    pub team: Option<Vec<Uuid>>,
    pub stage: Option<Stage>,
    pub priority: Option<Priority>,
    pub date: Option<NaiveDate>,
    pub assets: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PostActivityRequest {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    #[serde(alias = "activity")]
    #[validate(length(min = 1))]
    pub text: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSubTaskRequest {
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub tag: String,
}

/// Query string of the task listing. Values arrive as raw text so that a bad
/// stage is reported through the regular error envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub stage: Option<String>,
    pub is_trashed: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskFilters {
    pub stage: Option<Stage>,
    pub is_trashed: bool,
    pub search: Option<String>,
}

impl TryFrom<TaskQuery> for TaskFilters {
    type Error = AppError;

    fn try_from(query: TaskQuery) -> Result<Self, Self::Error> {
        let stage = match query.stage.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<Stage>()?),
        };

        Ok(Self {
            stage,
            is_trashed: query
                .is_trashed
                .as_deref()
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashAction {
    Delete,
    DeleteAll,
    Restore,
    RestoreAll,
}

impl std::str::FromStr for TrashAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delete" => Ok(TrashAction::Delete),
            "deleteAll" => Ok(TrashAction::DeleteAll),
            "restore" => Ok(TrashAction::Restore),
            "restoreAll" => Ok(TrashAction::RestoreAll),
            other => Err(AppError::Validation(format!("invalid actionType: {other:?}"))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashActionQuery {
    pub action_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub status: bool,
    pub message: String,
    pub task: Task,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    pub status: bool,
    pub tasks: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_normalizes_enums() {
        let req: CreateTaskRequest = serde_json::from_value(serde_json::json!({
            "title": "Ship it",
            "team": [],
            "stage": "IN PROGRESS",
            "priority": "High",
            "date": "2026-10-18"
        }))
        .unwrap();
        assert_eq!(req.stage, Some(Stage::InProgress));
        assert_eq!(req.priority, Some(Priority::High));
        assert!(req.assets.is_empty());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_unknown_priority() {
        let result = serde_json::from_value::<CreateTaskRequest>(serde_json::json!({
            "title": "Ship it",
            "priority": "someday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_title_fails_validation() {
        let req: CreateTaskRequest =
            serde_json::from_value(serde_json::json!({ "title": "" })).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_activity_accepts_legacy_field_name() {
        let req: PostActivityRequest = serde_json::from_value(serde_json::json!({
            "type": "Commented",
            "activity": "Looks good"
        }))
        .unwrap();
        assert_eq!(req.kind, ActivityType::Commented);
        assert_eq!(req.text, "Looks good");
    }

    #[test]
    fn test_filters_from_query() {
        let filters = TaskFilters::try_from(TaskQuery {
            stage: Some("Completed".into()),
            is_trashed: Some("true".into()),
            search: Some("  ".into()),
        })
        .unwrap();
        assert_eq!(filters.stage, Some(Stage::Completed));
        assert!(filters.is_trashed);
        assert_eq!(filters.search, None);

        let defaults = TaskFilters::try_from(TaskQuery::default()).unwrap();
        assert_eq!(defaults.stage, None);
        assert!(!defaults.is_trashed);

        assert!(TaskFilters::try_from(TaskQuery {
            stage: Some("later".into()),
            ..TaskQuery::default()
        })
        .is_err());
    }

    #[test]
    fn test_trash_action_parse() {
        assert_eq!("restoreAll".parse::<TrashAction>().unwrap(), TrashAction::RestoreAll);
        assert!("purge".parse::<TrashAction>().is_err());
    }
}
