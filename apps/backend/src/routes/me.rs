use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AppError;
use crate::extractors::CurrentUser;

#[derive(Debug, Serialize)]
struct MeResponse {
    id: i64,
    sub: String,
    email: String,
    username: Option<String>,
    display_name: String,
    is_admin: bool,
}

async fn me(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(MeResponse {
        display_name: user.display_name(),
        id: user.id,
        sub: user.sub,
        email: user.email,
        username: user.username,
        is_admin: user.is_admin,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/me", web::get().to(me));
}
