use actix_cors::Cors;
use actix_web::{self, middleware::Logger, App, HttpServer};
use std::sync::LazyLock;
use std::time::Duration;

use applicant_intake::{
    configs::{connect_database, init_schema},
    constants,
    modules::application::retention::spawn_retention_sweeper,
    AppState,
};

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let state = match ENV.database_url.as_deref() {
        Some(url) => {
            let pool = connect_database(url)
                .await
                .map_err(|_| std::io::Error::other("Database connection error"))?;
            init_schema(&pool).await.map_err(|_| std::io::Error::other("Database schema error"))?;
            AppState::postgres(pool)
        }
        None => {
            log::warn!("DATABASE_URL not set, applications are kept in memory only");
            AppState::in_memory()
        }
    };

    spawn_retention_sweeper(
        state.applications.clone(),
        Duration::from_secs(ENV.retention_sweep_secs.max(1)),
    );

    let max_payload_bytes = ENV.max_payload_bytes;
    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let state = state.clone();
        let cors = Cors::default()
            .allowed_origin(ENV.frontend_url.as_str())
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_header(actix_web::http::header::CONTENT_TYPE)
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .service(health_check)
            .configure(move |cfg| state.configure(cfg, max_payload_bytes))
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
