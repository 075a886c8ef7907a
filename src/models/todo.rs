use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::db::DbPool;
use crate::error::AppError;

/// A to-do item as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub task: String,
    pub completed: bool,
    /// Owner of the item.
    pub user_id: i64,
}

/// Payload for creating a to-do. `completed` defaults to `false`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewTodo {
    #[validate(length(min = 1, max = 500))]
    pub task: String,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TodoUpdate {
    #[validate(length(min = 1, max = 500))]
    pub task: Option<String>,
    pub completed: Option<bool>,
}

// Ownership is not checked here; callers go through `auth::guard` first.
impl Todo {
    pub async fn list_for_owner(pool: &DbPool, user_id: i64) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(
            "SELECT id, task, completed, user_id FROM todos WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(todos)
    }

    pub async fn insert(pool: &DbPool, user_id: i64, input: &NewTodo) -> Result<Todo, AppError> {
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (task, completed, user_id) VALUES ($1, $2, $3)
             RETURNING id, task, completed, user_id",
        )
        .bind(&input.task)
        .bind(input.completed)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(todo)
    }

    /// Returns `None` rather than an error when the id is unknown.
    pub async fn get_by_id(pool: &DbPool, id: i64) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, task, completed, user_id FROM todos WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(todo)
    }

    pub async fn update(
        pool: &DbPool,
        id: i64,
        changes: &TodoUpdate,
    ) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(
            "UPDATE todos
             SET task = COALESCE($1, task), completed = COALESCE($2, completed)
             WHERE id = $3
             RETURNING id, task, completed, user_id",
        )
        .bind(&changes.task)
        .bind(changes.completed)
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(todo)
    }

    /// Deletes the row and hands back what was removed.
    pub async fn delete(pool: &DbPool, id: i64) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(
            "DELETE FROM todos WHERE id = $1 RETURNING id, task, completed, user_id",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(todo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::models::User;
    use pretty_assertions::assert_eq;

    async fn pool_with_users() -> (DbPool, i64, i64) {
        let pool = connect_in_memory().await.unwrap();
        let first = User::insert(&pool, "test@test.com", "hash").await.unwrap();
        let second = User::insert(&pool, "test2@test2.com", "hash").await.unwrap();
        (pool, first.id, second.id)
    }

    fn new_todo(task: &str, completed: bool) -> NewTodo {
        NewTodo {
            task: task.to_string(),
            completed,
        }
    }

    #[test]
    fn test_new_todo_validation() {
        assert!(new_todo("do something", false).validate().is_ok());
        assert!(new_todo("", false).validate().is_err());
        assert!(new_todo(&"a".repeat(501), false).validate().is_err());
    }

    #[test]
    fn test_completed_defaults_to_false() {
        let input: NewTodo = serde_json::from_str(r#"{"task": "do something"}"#).unwrap();
        assert!(!input.completed);
    }

    #[test]
    fn test_update_validation() {
        assert!(TodoUpdate::default().validate().is_ok());
        let empty_task = TodoUpdate {
            task: Some(String::new()),
            completed: None,
        };
        assert!(empty_task.validate().is_err());
    }

    #[actix_rt::test]
    async fn test_list_is_scoped_to_owner() {
        let (pool, first, second) = pool_with_users().await;

        let mine = Todo::insert(&pool, first, &new_todo("do something", false))
            .await
            .unwrap();
        Todo::insert(&pool, second, &new_todo("do something else", true))
            .await
            .unwrap();

        let listed = Todo::list_for_owner(&pool, first).await.unwrap();
        assert_eq!(listed, vec![mine]);
    }

    #[actix_rt::test]
    async fn test_update_only_touches_given_fields() {
        let (pool, first, _) = pool_with_users().await;
        let todo = Todo::insert(&pool, first, &new_todo("do something", false))
            .await
            .unwrap();

        let changes = TodoUpdate {
            task: None,
            completed: Some(true),
        };
        let updated = Todo::update(&pool, todo.id, &changes).await.unwrap().unwrap();
        assert_eq!(
            updated,
            Todo {
                completed: true,
                ..todo.clone()
            }
        );

        let renamed = TodoUpdate {
            task: Some("do it now".to_string()),
            completed: None,
        };
        let updated = Todo::update(&pool, todo.id, &renamed).await.unwrap().unwrap();
        assert_eq!(updated.task, "do it now");
        assert!(updated.completed);
    }

    #[actix_rt::test]
    async fn test_missing_rows_are_absent() {
        let (pool, _, _) = pool_with_users().await;

        assert!(Todo::get_by_id(&pool, 404).await.unwrap().is_none());
        assert!(Todo::update(&pool, 404, &TodoUpdate::default())
            .await
            .unwrap()
            .is_none());
        assert!(Todo::delete(&pool, 404).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_delete_then_lookup_is_absent() {
        let (pool, first, _) = pool_with_users().await;
        let todo = Todo::insert(&pool, first, &new_todo("do something", false))
            .await
            .unwrap();

        let deleted = Todo::delete(&pool, todo.id).await.unwrap();
        assert_eq!(deleted, Some(todo.clone()));
        assert!(Todo::get_by_id(&pool, todo.id).await.unwrap().is_none());
    }
}
