#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    test,
};
use serde_json::json;
use todo_api::{
    db,
    models::{Credentials, NewTodo, Todo, User},
    services::users,
    AuthSettings, Config, DbPool,
};

pub const EMAIL_1: &str = "test@test.com";
pub const PASSWORD_1: &str = "123456";
pub const EMAIL_2: &str = "test2@test2.com";
pub const PASSWORD_2: &str = "1234567";

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_port: 0,
        server_host: "127.0.0.1".to_string(),
        allowed_origins: Vec::new(),
        auth: AuthSettings {
            // Minimum bcrypt cost keeps the suite fast.
            bcrypt_cost: 4,
            ..AuthSettings::default()
        },
    }
}

pub async fn test_pool() -> DbPool {
    db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database")
}

/// Creates a user directly, bypassing HTTP.
pub async fn create_user(pool: &DbPool, email: &str, password: &str) -> User {
    users::register(
        pool,
        &test_config().auth,
        &Credentials {
            email: email.to_string(),
            password: password.to_string(),
        },
    )
    .await
    .expect("Failed to create user")
}

pub async fn insert_todo(pool: &DbPool, user_id: i64, task: &str, completed: bool) -> Todo {
    Todo::insert(
        pool,
        user_id,
        &NewTodo {
            task: task.to_string(),
            completed,
        },
    )
    .await
    .expect("Failed to insert to-do")
}

pub fn session_cookie_of<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "session")
        .map(|c| c.into_owned())
}

/// Signs in through the API and returns the session cookie.
pub async fn login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    email: &str,
    password: &str,
) -> Cookie<'static> {
    let req = test::TestRequest::post()
        .uri("/api/v1/users/sessions")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "login failed for {}", email);
    session_cookie_of(&resp).expect("login response carried no session cookie")
}

/// Creates the user and signs them in.
pub async fn register_and_login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    pool: &DbPool,
    email: &str,
    password: &str,
) -> (User, Cookie<'static>) {
    let user = create_user(pool, email, password).await;
    let cookie = login(app, email, password).await;
    (user, cookie)
}
