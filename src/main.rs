use actix_web::{middleware, web, App, HttpServer};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::str::FromStr;

use tarot_meiga::{auth, db, routes, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let db_url = env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://./data/tarot_meiga.db".to_string());
    db::ensure_sqlite_dir(&db_url)?;

    let connect_options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    db::run_migrations(&pool).await?;
    auth::seed_admin(&pool).await?;
    db::seed_bonos_default(&pool).await?;

    let state = AppState::from_env(pool);

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(3000);

    let address = format!("0.0.0.0:{port}");
    log::info!("Starting Tarot Meiga on http://{address}");

    HttpServer::new(move || {
        // Webhook first: it needs the raw body, ahead of the JSON scopes.
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes::webhook::configure)
            .configure(routes::admin::configure)
            .configure(routes::public::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
