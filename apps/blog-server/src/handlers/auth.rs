//! Account handlers: registration, login and account removal.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};
use std::sync::Arc;

use blog_core::domain::User;
use blog_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use blog_shared::Envelope;
use blog_shared::dto::{AccountDeleted, AccountResponse, Credentials, TokenResponse};

use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, Identity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn issue_token(tokens: &Arc<dyn TokenService>, user: &User) -> AppResult<TokenResponse> {
    let token = tokens
        .issue(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(TokenResponse {
        access_token: token.value,
        token_type: "Bearer".to_string(),
        expires_in: token.lifetime_secs.max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<Credentials>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = state.users.save(User::new(email, password_hash)).await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok(HttpResponse::Created().json(issue_token(token_service.get_ref(), &user)?))
}

/// POST /api/auth/login
///
/// Besides the JSON token, sets an HttpOnly cookie so plain HTML forms
/// on the blog pages are authenticated too.
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<Credentials>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let email = req.email.trim().to_lowercase();

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        tracing::debug!(user_id = %user.id, "Rejected login with wrong password");
        return Err(AppError::Unauthorized);
    }

    let auth = issue_token(token_service.get_ref(), &user)?;
    let cookie = Cookie::build(ACCESS_TOKEN_COOKIE, auth.access_token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(auth.expires_in as i64))
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(auth))
}

async fn load_user(users: &dyn UserRepository, identity: &Identity) -> AppResult<User> {
    users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", identity.user_id)))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = load_user(state.users.as_ref(), &identity).await?;

    Ok(HttpResponse::Ok().json(Envelope::new(AccountResponse {
        id: user.id.to_string(),
        email: user.email,
        created_at: user.created_at.to_rfc3339(),
    })))
}

/// DELETE /api/auth/me
///
/// Removes the account and every post it authored.
pub async fn delete_me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts_removed = state.accounts.delete_account(identity.user_id).await?;

    let mut expired = Cookie::new(ACCESS_TOKEN_COOKIE, "");
    expired.set_path("/");
    expired.make_removal();

    Ok(HttpResponse::Ok().cookie(expired).json(
        Envelope::new(AccountDeleted {
            id: identity.user_id.to_string(),
            posts_removed,
        })
        .with_message("Account deleted"),
    ))
}
