//! Read-state rules for broadcast notifications.
//!
//! A notification is unread for a user when the user is in its recipient set
//! and not in its `is_read` set. Marking read adds the user to `is_read` and is
//! a no-op for non-recipients, repeated calls and unknown ids. The repository
//! applies the same predicate inside a single `UPDATE` so that concurrent
//! acknowledgements from different users are never lost.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{error::AppError, task::Priority};
use super::notification_dto::MarkReadQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    All,
    One(Uuid),
}

impl TryFrom<MarkReadQuery> for ReadTarget {
    type Error = AppError;

    fn try_from(query: MarkReadQuery) -> Result<Self, Self::Error> {
        if query.is_read_type.as_deref() == Some("all") {
            return Ok(ReadTarget::All);
        }

        let raw = query
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Notification id is required".to_string()))?;

        Uuid::parse_str(raw.trim())
            .map(ReadTarget::One)
            .map_err(|_| AppError::Validation(format!("invalid notification id: {raw:?}")))
    }
}

/// Body of the notice sent to a task's team when it is created or duplicated.
pub fn assignment_message(team_size: usize, priority: Priority, date: NaiveDate) -> String {
    let mut text = String::from("New task has been assigned to you");
    if team_size > 1 {
        text.push_str(&format!(" and {} others", team_size - 1));
    }
    text.push_str(&format!(
        ". The task priority is set a {} priority, so check and act accordingly. \
         The task date is {}. Thank you!!!",
        priority,
        date.format("%a %b %d %Y"),
    ));
    text
}
