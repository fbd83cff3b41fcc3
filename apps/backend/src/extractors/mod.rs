pub mod current_user;
pub mod league_id;
pub mod league_member;
pub mod site_admin;
pub mod validated_json;

use actix_web::{web, HttpRequest};

pub use current_user::CurrentUser;
pub use league_id::{parse_path_id, LeagueId};
pub use league_member::LeagueMember;
pub use site_admin::SiteAdmin;
pub use validated_json::ValidatedJson;

use crate::error::AppError;
use crate::state::app_state::AppState;

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::internal("AppState not configured"))
}
