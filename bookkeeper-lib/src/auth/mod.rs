use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, HttpMessage, HttpResponse, Scope};
use bookkeeper_repo::session_repo::SessionRepo;
use bookkeeper_repo::user_repo::{User, UserRepo};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::warn;
use tracing_actix_web::RootSpan;

pub mod github;
pub mod handlers;

pub type UserId = String;

pub const SESSION_COOKIE: &str = "session_id";

pub fn auth_service() -> Scope {
    web::scope("/auth")
        .service(handlers::login)
        .service(handlers::callback)
        .service(handlers::me)
        .service(handlers::logout)
}

/// Resolves a session cookie value to its user. Expired sessions are deleted
/// on the spot and treated as absent.
pub async fn resolve_user(
    session_id: &str,
    session_repo: &Arc<dyn SessionRepo>,
    user_repo: &Arc<dyn UserRepo>,
) -> Option<User> {
    let session = session_repo.get_session(session_id).await.ok()?;
    if session.is_expired() {
        if let Err(err) = session_repo.delete_session(&session.id).await {
            warn!(%err, "Unable to delete expired session");
        }
        return None;
    }
    user_repo.get_user(&session.user_id).await.ok()
}

/// Middleware guarding a scope with session-cookie authentication. On success
/// the user id is injected into the request extensions and the [RootSpan];
/// otherwise the request is answered with 401 without reaching the handler.
pub struct SessionAuth {
    pub session_repo: Arc<dyn SessionRepo>,
    pub user_repo: Arc<dyn UserRepo>,
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Transform = SessionAuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthMiddleware {
            service: Rc::new(service),
            session_repo: self.session_repo.clone(),
            user_repo: self.user_repo.clone(),
        }))
    }
}

pub struct SessionAuthMiddleware<S> {
    service: Rc<S>,
    session_repo: Arc<dyn SessionRepo>,
    user_repo: Arc<dyn UserRepo>,
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let session_repo = self.session_repo.clone();
        let user_repo = self.user_repo.clone();

        Box::pin(async move {
            let session_id = req.cookie(SESSION_COOKIE).map(|c| c.value().to_owned());
            let user = match session_id {
                Some(session_id) => resolve_user(&session_id, &session_repo, &user_repo).await,
                None => None,
            };

            match user {
                Some(user) => {
                    if let Some(root_span) = req.extensions().get::<RootSpan>() {
                        root_span.record("user_id", user.id.as_str());
                    }
                    req.extensions_mut().insert::<UserId>(user.id);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                None => {
                    let response = HttpResponse::Unauthorized()
                        .json(serde_json::json!({ "error": "Unauthorized" }));
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}
