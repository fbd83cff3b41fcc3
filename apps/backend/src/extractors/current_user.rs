use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::Serialize;

use super::app_state;
use crate::auth::jwt::Claims;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::repos::users::{self, User};

/// The authenticated user, loaded by the `sub` of the verified token that
/// `JwtExtract` left in the request extensions.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub sub: String,
    pub email: String,
    pub username: Option<String>,
    pub is_admin: bool,
}

impl CurrentUser {
    fn from_parts(user: User, email: String) -> Self {
        Self {
            id: user.id,
            sub: user.sub,
            email,
            username: user.username,
            is_admin: user.is_admin,
        }
    }

    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .unwrap_or_else(|| format!("user-{}", self.id))
    }
}

pub(crate) async fn resolve_current_user(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    if let Some(user) = req.extensions().get::<CurrentUser>() {
        return Ok(user.clone());
    }

    let claims = req
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or_else(AppError::unauthorized_missing_bearer)?;

    let user = if let Some(shared) = SharedTxn::from_req(req) {
        users::find_user_by_sub(shared.transaction(), &claims.sub).await?
    } else {
        let state = app_state(req)?;
        users::find_user_by_sub(require_db(&state)?, &claims.sub).await?
    };
    let user = user.ok_or_else(AppError::forbidden_user_not_found)?;

    let current = CurrentUser::from_parts(user, claims.email);
    req.extensions_mut().insert(current.clone());
    Ok(current)
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve_current_user(&req).await })
    }
}
