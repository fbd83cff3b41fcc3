use actix_extensible_rate_limit::backend::memory::InMemoryBackend;
use actix_extensible_rate_limit::RateLimiter;
use actix_web::{web, App, HttpServer};
use db_infra::config::db::{DbKind, RuntimeEnv};
use polla_backend::config::admin_emails::AdminEmails;
use polla_backend::config::server::ServerConfig;
use polla_backend::infra::state::build_state;
use polla_backend::middleware::rate_limit::login_rate_limit_config;
use polla_backend::middleware::{
    cors_middleware, JwtExtract, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use polla_backend::routes;
use polla_backend::state::security_config::SecurityConfig;
use polla_backend::telemetry;
use tracing::{error, info};

fn exit_with(msg: &str, err: impl std::fmt::Display) -> ! {
    error!(error = %err, "{msg}");
    eprintln!("❌ {msg}: {err}");
    std::process::exit(1);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let server = ServerConfig::from_env().unwrap_or_else(|e| exit_with("Invalid server config", e));
    let security = SecurityConfig::from_env().unwrap_or_else(|e| exit_with("Invalid security config", e));
    let db_kind = std::env::var("POLLA_DB_KIND")
        .unwrap_or_else(|_| "postgres".to_string())
        .parse::<DbKind>()
        .unwrap_or_else(|e| exit_with("Invalid POLLA_DB_KIND", e));

    let (host, port) = server.bind_addr();
    println!("🚀 Starting Polla Backend on http://{host}:{port}");

    let app_state = build_state()
        .with_db(RuntimeEnv::Prod, db_kind)
        .with_security(security)
        .with_admin_emails(AdminEmails::from_env())
        .build()
        .await
        .unwrap_or_else(|e| exit_with("Failed to build application state", e));

    info!(?db_kind, "Database connected and migrated");
    println!("✅ Database connected");

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);
    // One backend shared by all workers so the login limit is per process.
    let login_limit_backend = InMemoryBackend::builder().build();
    let cors_origins = server.cors_origins.clone();

    HttpServer::new(move || {
        let login_limiter =
            RateLimiter::builder(login_limit_backend.clone(), login_rate_limit_config().build())
                .add_headers()
                .build();

        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::health::configure_routes)
            .service(
                web::scope("/api/auth")
                    .wrap(login_limiter)
                    .configure(routes::auth::configure_routes),
            )
            .service(
                web::scope("/api")
                    .wrap(JwtExtract)
                    .configure(routes::configure_api),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
