use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use log::warn;
use serde_json::json;

use crate::db::{self, DbPool};

/// Health check endpoint
///
/// Reports liveness and whether the database answers. Responds `503` when it does not.
#[get("/health")]
pub async fn health(pool: web::Data<DbPool>) -> impl Responder {
    match db::ping(&pool).await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "ok",
            "timestamp": Utc::now()
        })),
        Err(e) => {
            warn!("health check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "database": "unreachable",
                "timestamp": Utc::now()
            }))
        }
    }
}
