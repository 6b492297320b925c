use std::sync::Arc;

use tower_http::cors::CorsLayer;

use bracket_backend::api;
use bracket_backend::challonge::ChallongeClient;
use bracket_backend::config::Config;
use bracket_backend::db::Database;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::load();

    let db = Database::new(&config.database_url)
        .await
        .expect("Failed to initialize database");
    let db = Arc::new(db);

    let challonge = if config.challonge_api_key.is_some() {
        let client = ChallongeClient::new(&config).expect("Failed to build Challonge client");
        Some(Arc::new(client))
    } else {
        tracing::warn!("CHALLONGE_API_KEY not set; Challonge mirror endpoint is disabled");
        None
    };

    let app = api::router(db, challonge).layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind HTTP listener");

    tracing::info!("bracket backend listening on {addr}");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
