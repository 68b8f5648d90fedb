use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{middleware::CurrentUser, user::UserSet};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Case-insensitive text parsing, `as_str`/`Display` and `Deserialize` for a
/// unit enum whose canonical form is the first literal of each arm.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($text $(| $alias)* => Ok($name::$variant),)+
                    _ => Err(ParseEnumError { kind: $kind, value: s.to_string() }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    #[default]
    Todo,
    InProgress,
    Completed,
}

text_enum!(Stage, "stage", {
    Todo => "todo",
    InProgress => "in-progress" | "in progress" | "in_progress",
    Completed => "completed",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Normal,
    Low,
}

text_enum!(Priority, "priority", {
    High => "high",
    Medium => "medium",
    Normal => "normal",
    Low => "low",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityType {
    Assigned,
    Started,
    InProgress,
    Bug,
    Completed,
    Commented,
}

text_enum!(ActivityType, "activity type", {
    Assigned => "assigned",
    Started => "started",
    InProgress => "in-progress" | "in progress" | "in_progress",
    Bug => "bug",
    Completed => "completed",
    Commented => "commented",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub text: String,
    pub author_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubTask {
    pub title: String,
    pub date: NaiveDate,
    pub tag: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub stage: Stage,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    pub date: NaiveDate,
    #[sqlx(try_from = "Vec<Uuid>")]
    #[schema(value_type = Vec<Uuid>)]
    pub team: UserSet,
    pub assets: Vec<String>,
    #[sqlx(json)]
    pub activities: Vec<Activity>,
    #[sqlx(json)]
    pub sub_tasks: Vec<SubTask>,
    pub is_trashed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Who is asking, for visibility decisions over tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: Uuid,
    pub is_admin: bool,
}

impl Requester {
    /// Administrators see every task; members only tasks they are assigned to.
    pub fn can_view(&self, task: &Task) -> bool {
        self.is_admin || task.team.contains(self.id)
    }
}

impl From<&CurrentUser> for Requester {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id,
            is_admin: user.is_admin,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn task(stage: Stage, priority: Priority, team: &[Uuid]) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            title: "Write the release notes".to_string(),
            stage,
            priority,
            date: now.date_naive(),
            team: team.iter().copied().collect(),
            assets: Vec::new(),
            activities: Vec::new(),
            sub_tasks: Vec::new(),
            is_trashed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stage_parse_is_case_insensitive() {
        assert_eq!("TODO".parse::<Stage>().unwrap(), Stage::Todo);
        assert_eq!("In Progress".parse::<Stage>().unwrap(), Stage::InProgress);
        assert_eq!(" in-progress ".parse::<Stage>().unwrap(), Stage::InProgress);
        assert_eq!("Completed".parse::<Stage>().unwrap(), Stage::Completed);
    }

    #[test]
    fn test_unknown_values_rejected() {
        let err = "blocked".parse::<Stage>().unwrap_err();
        assert_eq!(err.kind, "stage");
        assert!("urgent".parse::<Priority>().is_err());
        assert!("".parse::<ActivityType>().is_err());
    }

    #[test]
    fn test_stage_and_priority_display() {
        assert_eq!(Stage::InProgress.to_string(), "in-progress");
        assert_eq!(Priority::High.to_string(), "high");
        assert_eq!(Priority::Normal.as_str(), "normal");
        assert_eq!(ActivityType::Commented.to_string(), "commented");
    }

    #[test]
    fn test_serde_uses_lowercase_and_accepts_any_case() {
        assert_eq!(
            serde_json::to_value(Stage::InProgress).unwrap(),
            serde_json::json!("in-progress")
        );
        let p: Priority = serde_json::from_value(serde_json::json!("MEDIUM")).unwrap();
        assert_eq!(p, Priority::Medium);
        assert!(serde_json::from_value::<Priority>(serde_json::json!("critical")).is_err());
    }

    #[test]
    fn test_activity_json_shape() {
        let activity = Activity {
            kind: ActivityType::Bug,
            text: "Crashes on save".to_string(),
            author_id: Uuid::nil(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&activity).unwrap();
        assert_eq!(json["type"], "bug");
        assert_eq!(json["authorId"], Uuid::nil().to_string());
    }

    #[test]
    fn test_visibility() {
        let member = Uuid::new_v4();
        let outsider = Uuid::new_v4();
        let t = task(Stage::Todo, Priority::Low, &[member]);

        assert!(Requester { id: member, is_admin: false }.can_view(&t));
        assert!(!Requester { id: outsider, is_admin: false }.can_view(&t));
        assert!(Requester { id: outsider, is_admin: true }.can_view(&t));
    }
}
