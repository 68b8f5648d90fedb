use crate::error::Result;
use crate::user::UserSet;
use chrono::NaiveDate;
use sqlx::{types::Json, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    task_dto::TaskFilters,
    task_models::{Activity, Priority, Requester, Stage, SubTask, Task},
};

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

pub struct NewTask {
    pub title: String,
    pub stage: Stage,
    pub priority: Priority,
    pub date: NaiveDate,
    pub team: UserSet,
    pub assets: Vec<String>,
    pub activities: Vec<Activity>,
    pub sub_tasks: Vec<SubTask>,
}

#[derive(Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub stage: Option<Stage>,
    pub priority: Option<Priority>,
    pub date: Option<NaiveDate>,
    pub team: Option<UserSet>,
    pub assets: Option<Vec<String>>,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Tasks visible to `requester`, newest first.
    pub async fn find_visible(&self, requester: Requester, filters: &TaskFilters) -> Result<Vec<Task>> {
        let mut query = "SELECT * FROM tasks WHERE is_trashed = $1".to_string();
        let mut params_count = 1;

        if !requester.is_admin {
            params_count += 1;
            query.push_str(&format!(" AND ${} = ANY(team)", params_count));
        }

        if filters.stage.is_some() {
            params_count += 1;
            query.push_str(&format!(" AND stage = ${}", params_count));
        }

        if filters.search.is_some() {
            params_count += 1;
            query.push_str(&format!(" AND title ILIKE ${} ESCAPE '\\'", params_count));
        }

        query.push_str(" ORDER BY seq DESC");

        let mut db_query = sqlx::query_as::<_, Task>(&query).bind(filters.is_trashed);

        if !requester.is_admin {
            db_query = db_query.bind(requester.id);
        }

        if let Some(stage) = filters.stage {
            db_query = db_query.bind(stage.as_str());
        }

        if let Some(search) = &filters.search {
            db_query = db_query.bind(format!("%{}%", escape_like(search)));
        }

        let tasks = db_query.fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        task: NewTask,
    ) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, stage, priority, date, team, assets, activities, sub_tasks)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
        .bind(task.title)
        .bind(task.stage.as_str())
        .bind(task.priority.as_str())
        .bind(task.date)
        .bind(task.team.to_vec())
        .bind(task.assets)
        .bind(Json(task.activities))
        .bind(Json(task.sub_tasks))
        .fetch_one(&mut **tx)
        .await?;

        Ok(task)
    }

    pub async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            "UPDATE tasks SET
                title = COALESCE($1, title),
                stage = COALESCE($2, stage),
                priority = COALESCE($3, priority),
                date = COALESCE($4, date),
                team = COALESCE($5, team),
                assets = COALESCE($6, assets),
                updated_at = NOW()
             WHERE id = $7
             RETURNING *"
        )
        .bind(changes.title)
        .bind(changes.stage.map(|s| s.as_str()))
        .bind(changes.priority.map(|p| p.as_str()))
        .bind(changes.date)
        .bind(changes.team.map(|team| team.to_vec()))
        .bind(changes.assets)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    /// Appends in a single statement so concurrent posts are not lost.
    pub async fn append_activity(&self, id: Uuid, activity: &Activity) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tasks SET activities = activities || $1, updated_at = NOW() WHERE id = $2"
        )
        .bind(Json(std::slice::from_ref(activity)))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn append_sub_task(&self, id: Uuid, sub_task: &SubTask) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tasks SET sub_tasks = sub_tasks || $1, updated_at = NOW() WHERE id = $2"
        )
        .bind(Json(std::slice::from_ref(sub_task)))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn set_trashed(&self, id: Uuid, is_trashed: bool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tasks SET is_trashed = $1, updated_at = NOW() WHERE id = $2"
        )
        .bind(is_trashed)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn restore_all(&self) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE tasks SET is_trashed = false, updated_at = NOW() WHERE is_trashed"
        )
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn delete_trashed(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE is_trashed")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Makes `%`, `_` and `\` in user input match literally under `ESCAPE '\'`.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralises_wildcards() {
        assert_eq!(escape_like("release"), "release");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
