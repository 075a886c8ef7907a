use crate::{
    auth::{owned_todo, AuthenticatedUser},
    db::DbPool,
    error::AppError,
    models::{NewTodo, Todo, TodoUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use log::info;
use validator::Validate;

// Every handler here sits behind `RequireSession` (see `routes::config`).

/// Lists the caller's to-dos, oldest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Todo` objects owned by the caller.
/// - `401 Unauthorized`: no valid session.
#[get("")]
pub async fn list_todos(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = Todo::list_for_owner(&pool, user.user_id).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Creates a to-do owned by the caller.
///
/// ## Request Body:
/// - `task`: 1 to 500 characters (required).
/// - `completed` (optional): defaults to `false`.
///
/// ## Responses:
/// - `200 OK`: the created `Todo`, including its generated `id` and the caller's `user_id`.
/// - `400 Bad Request`: malformed body or invalid `task`.
/// - `401 Unauthorized`: no valid session.
#[post("")]
pub async fn create_todo(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    payload: web::Json<NewTodo>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let todo = Todo::insert(&pool, user.user_id, &payload).await?;
    info!("user {} created to-do {}", user.user_id, todo.id);
    Ok(HttpResponse::Ok().json(todo))
}

/// Fetches a single to-do.
///
/// ## Responses:
/// - `200 OK`, `401 Unauthorized`, `403 Forbidden` (someone else's), `404 Not Found`.
#[get("/{id}")]
pub async fn get_todo(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    todo_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let todo = owned_todo(&pool, &user, todo_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Updates `task` and/or `completed` on a to-do the caller owns.
///
/// Fields missing from the body are left untouched.
///
/// ## Responses:
/// - `200 OK`: the full updated `Todo`.
/// - `400 Bad Request`, `401 Unauthorized`, `403 Forbidden`, `404 Not Found`.
#[put("/{id}")]
pub async fn update_todo(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    todo_id: web::Path<i64>,
    payload: web::Json<TodoUpdate>,
) -> Result<impl Responder, AppError> {
    payload.validate()?;
    let todo = owned_todo(&pool, &user, todo_id.into_inner()).await?;

    // The row can vanish between the ownership check and the update.
    let updated = Todo::update(&pool, todo.id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("To-do {} not found", todo.id)))?;
    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a to-do the caller owns and returns the removed record.
///
/// ## Responses:
/// - `200 OK`: the deleted `Todo`.
/// - `401 Unauthorized`, `403 Forbidden`, `404 Not Found`.
#[delete("/{id}")]
pub async fn delete_todo(
    pool: web::Data<DbPool>,
    user: AuthenticatedUser,
    todo_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let todo = owned_todo(&pool, &user, todo_id.into_inner()).await?;

    let deleted = Todo::delete(&pool, todo.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("To-do {} not found", todo.id)))?;
    info!("user {} deleted to-do {}", user.user_id, deleted.id);
    Ok(HttpResponse::Ok().json(deleted))
}
