mod db;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    // GitHub stats client is optional: without it the stats route serves
    // an empty summary.
    let github = match services::github::GithubClient::from_env() {
        Ok(client) => {
            tracing::info!(user = client.user(), "GitHub stats client initialized");
            Some(client)
        }
        Err(e) => {
            tracing::warn!(error = %e, "GitHub stats client not configured; serving empty summary");
            None
        }
    };

    let state = state::AppState::new(pool, github);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "skysite listening");
    axum::serve(listener, app).await.expect("server failed");
}
