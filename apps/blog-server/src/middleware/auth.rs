//! Author identity extractors.
//!
//! Credentials come from `Authorization: Bearer <token>` or, for browser
//! form posts, from the cookie set at login.

use actix_web::dev::Payload;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use std::fmt;
use std::future::{Ready, ready};
use std::sync::Arc;
use uuid::Uuid;

use blog_core::ports::{AuthError, TokenClaims, TokenService};
use blog_shared::Problem;

/// Cookie carrying the access token for browser form posts.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated author. Rejects the request with 401 when absent.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
        }
    }
}

#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AuthError::Missing | AuthError::Expired | AuthError::Malformed(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Signing(_) | AuthError::Hashing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let problem = match &self.0 {
            AuthError::Missing => Problem::unauthorized()
                .with_detail("Send a Bearer token or log in to get an access_token cookie."),
            AuthError::Expired => Problem::new(401, "Token Expired")
                .with_detail("Your session has expired. Log in again."),
            AuthError::Malformed(detail) => {
                Problem::new(401, "Invalid Token").with_detail(detail.clone())
            }
            other => {
                tracing::error!(error = %other, "Authentication backend failure");
                Problem::internal()
            }
        };

        HttpResponse::build(self.status_code()).json(problem)
    }
}

fn credentials(req: &HttpRequest) -> Result<String, AuthError> {
    match req.headers().get(header::AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|token| token.trim().to_owned())
            .ok_or_else(|| AuthError::Malformed("expected a Bearer token".to_string())),
        None => req
            .cookie(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::Missing),
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let Some(tokens) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService not registered as app data");
        return Err(AuthError::Signing("token service unavailable".to_string()));
    };

    let token = credentials(req)?;
    tokens.verify(&token).map(Identity::from)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(AuthenticationError))
    }
}

/// Author if one is logged in; anonymous requests still reach the handler.
pub struct OptionalIdentity(pub Option<Identity>);

impl OptionalIdentity {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|identity| identity.user_id)
    }
}

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = match authenticate(req) {
            Ok(identity) => Some(identity),
            Err(AuthError::Missing) => None,
            Err(err) => {
                tracing::debug!(error = %err, "Ignoring unusable credentials");
                None
            }
        };
        ready(Ok(OptionalIdentity(identity)))
    }
}
