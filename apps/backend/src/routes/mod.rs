use actix_web::web;

use crate::middleware::jwt_extract::JwtExtract;

pub mod admin;
pub mod auth;
pub mod bracket;
pub mod enterprise;
pub mod health;
pub mod leaderboard;
pub mod leagues;
pub mod me;
pub mod predictions;
pub mod tournaments;

/// Everything under `/api` that needs a bearer token. `main` mounts it
/// behind [`JwtExtract`].
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(me::configure_routes)
        .configure(tournaments::configure_routes)
        .configure(admin::configure_routes)
        .configure(leagues::configure_routes)
        .configure(enterprise::configure_routes)
        .configure(predictions::configure_routes)
        .configure(bracket::configure_routes)
        .configure(leaderboard::configure_routes);
}

/// Full route table without rate limiting; used by tests and non-server
/// contexts. `main` wires the same pieces with the login limiter.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes)
        .service(web::scope("/api/auth").configure(auth::configure_routes))
        .service(
            web::scope("/api")
                .wrap(JwtExtract)
                .configure(configure_api),
        );
}
