use crate::auth::extractors::AuthenticatedUser;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::Todo;

/// Fails with `Forbidden` unless `user` is the owner.
pub fn ensure_owner(user: &AuthenticatedUser, owner_id: i64) -> Result<(), AppError> {
    if user.user_id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have permission to access this to-do".into(),
        ))
    }
}

/// Loads a to-do and checks that `user` owns it.
///
/// A missing id is `NotFound`; an existing item owned by someone else is `Forbidden`.
pub async fn owned_todo(
    pool: &DbPool,
    user: &AuthenticatedUser,
    todo_id: i64,
) -> Result<Todo, AppError> {
    let todo = Todo::get_by_id(pool, todo_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("To-do {} not found", todo_id)))?;
    ensure_owner(user, todo.user_id)?;
    Ok(todo)
}
