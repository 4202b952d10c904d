use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use bookkeeper_repo::session_repo::{Session, SessionRepo, SessionRepoError};
use bookkeeper_repo::user_repo::{User, UserRepo, UserRepoError};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::auth::github::GithubClient;
use crate::auth::{resolve_user, SESSION_COOKIE};
use crate::error::HandlerError;

#[get("/login")]
pub async fn login(github: web::Data<GithubClient>, req: HttpRequest) -> impl Responder {
    let redirect_uri = callback_uri(&req);
    HttpResponse::Found()
        .insert_header((header::LOCATION, github.authorize_url(&redirect_uri)))
        .finish()
}

#[derive(Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
}

#[get("/callback")]
pub async fn callback(
    github: web::Data<GithubClient>,
    user_repo: web::Data<Arc<dyn UserRepo>>,
    session_repo: web::Data<Arc<dyn SessionRepo>>,
    query: web::Query<CallbackQuery>,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    let Some(code) = &query.code else {
        return Err(HandlerError::BadRequest("No code provided".to_owned()));
    };

    let access_token = github.exchange_code(code).await?;
    let github_user = github.get_user(&access_token).await?;

    let github_id = github_user.id.to_string();
    let user = match user_repo.get_user_by_github_id(&github_id).await {
        Ok(user) => user,
        Err(UserRepoError::UserNotFound(_)) => {
            let user = User::new(
                github_id,
                github_user.login.clone(),
                github_user.name.or_else(|| Some(github_user.login)),
                github_user.avatar_url,
            );
            user_repo.create_user(user.clone()).await?;
            info!(user_id = %user.id, "Created user from GitHub login");
            user
        }
        Err(err) => return Err(err.into()),
    };

    let session = Session::new(user.id.clone());
    session_repo.create_session(session.clone()).await?;
    info!(user_id = %user.id, "Logged in");

    let secure = req.connection_info().scheme() == "https";
    let cookie = Cookie::build(SESSION_COOKIE, session.id)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::days(Session::TTL_DAYS))
        .finish();

    Ok(HttpResponse::Found()
        .cookie(cookie)
        .insert_header((header::LOCATION, "/dashboard"))
        .finish())
}

#[get("/me")]
pub async fn me(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    session_repo: web::Data<Arc<dyn SessionRepo>>,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    let user = match req.cookie(SESSION_COOKIE) {
        Some(cookie) => resolve_user(cookie.value(), &session_repo, &user_repo).await,
        None => None,
    };
    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}

#[post("/logout")]
pub async fn logout(
    session_repo: web::Data<Arc<dyn SessionRepo>>,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        match session_repo.delete_session(cookie.value()).await {
            // already gone, nothing to do
            Ok(()) | Err(SessionRepoError::SessionNotFound) => {}
            Err(err) => return Err(err.into()),
        }
    }

    let removal = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .max_age(CookieDuration::ZERO)
        .finish();
    Ok(HttpResponse::Ok()
        .cookie(removal)
        .json(json!({ "success": true })))
}

fn callback_uri(req: &HttpRequest) -> String {
    let conn = req.connection_info();
    format!("{}://{}/api/auth/callback", conn.scheme(), conn.host())
}
