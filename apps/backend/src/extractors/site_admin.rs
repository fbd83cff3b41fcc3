use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use super::current_user::{resolve_current_user, CurrentUser};
use crate::error::AppError;
use crate::errors::ErrorCode;

/// A site administrator (email listed in `ADMIN_EMAILS` at last login).
#[derive(Debug, Clone)]
pub struct SiteAdmin(pub CurrentUser);

impl FromRequest for SiteAdmin {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = resolve_current_user(&req).await?;
            if !user.is_admin {
                return Err(AppError::forbidden(
                    ErrorCode::AdminRequired,
                    "Site administrator access required",
                ));
            }
            Ok(SiteAdmin(user))
        })
    }
}
