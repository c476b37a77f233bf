mod handlers;

use actix_files as fs;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::var;
use handlers::AppState;
use irdump_spider::config::Config;
use irdump_spider::quote::YahooFinance;
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND: &str = "127.0.0.1:8000";

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().map_err(io::Error::other)?;
    let quotes = YahooFinance::new(&config).map_err(io::Error::other)?;
    let tera = handlers::templates().map_err(io::Error::other)?;
    let bind = var("IRDUMP_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());

    tracing::info!(
        "serving {} on http://{bind}",
        config.data_root.display()
    );

    let data_root = config.data_root.clone();
    let state = web::Data::new(AppState {
        data_root: config.data_root,
        quotes: Arc::new(quotes),
        tera,
    });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .service(fs::Files::new("/data", &data_root))
            .service(handlers::index)
            .service(handlers::company_page)
    })
    .bind(bind)?
    .run()
    .await
}
