use std::time::SystemTime;

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::jwt::mint_access_token;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::logging::pii::Redacted;
use crate::services::users::ensure_user;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub name: Option<String>,
    pub google_sub: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchange a verified Google identity for a backend access token. Creates
/// the user on first login.
async fn login(
    req: HttpRequest,
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest {
        email,
        name,
        google_sub,
    } = body.into_inner();
    let is_admin = app_state.admin_emails.is_admin(&email);

    let (user, email) = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(ensure_user(txn, &email, name.as_deref(), &google_sub, is_admin).await?)
        })
    })
    .await?;

    info!(user_id = user.id, email = %Redacted(&email), is_admin = user.is_admin, "Login");
    let token = mint_access_token(&user.sub, &email, SystemTime::now(), &app_state.security)?;
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login));
}
