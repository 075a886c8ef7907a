use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::debug;

use crate::auth::extractors::AuthenticatedUser;
use crate::config::AuthSettings;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::Session;

/// Rejects requests without a live session cookie.
///
/// On success the resolved `AuthenticatedUser` is placed in the request
/// extensions for the `AuthenticatedUser` extractor to pick up. Expects
/// `web::Data<DbPool>` and `web::Data<AuthSettings>` to be registered on the app.
pub struct RequireSession;

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireSessionService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionService {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireSessionService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // The session lookup is async, so the inner service is shared into the future.
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let resolved = resolve_session(&req).await;
            match resolved {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                // Rendered here so the rejection never reaches the inner service.
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

async fn resolve_session(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let pool = req
        .app_data::<web::Data<DbPool>>()
        .ok_or_else(|| AppError::InternalServerError("Database pool not configured".into()))?;
    let settings = req
        .app_data::<web::Data<AuthSettings>>()
        .ok_or_else(|| AppError::InternalServerError("Auth settings not configured".into()))?;

    let token = match req.cookie(&settings.cookie_name) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => {
            debug!("no session cookie on {} {}", req.method(), req.path());
            return Err(AppError::Unauthorized(
                "You must be signed in to continue".into(),
            ));
        }
    };

    match Session::find_active(pool.get_ref(), &token).await? {
        Some(session) => Ok(AuthenticatedUser {
            user_id: session.user_id,
            session_token: session.token,
        }),
        None => {
            debug!("unknown or expired session on {} {}", req.method(), req.path());
            Err(AppError::Unauthorized(
                "Your session is invalid or has expired".into(),
            ))
        }
    }
}
