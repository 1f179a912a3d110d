use billing_service::{build_server, AppConfig, AppState};
use dotenvy::dotenv;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let host = config.host.clone();
    let port = config.port;

    log::info!("Using data file {}", config.data_file.display());
    log::info!("Starting server at http://{}:{}", host, port);

    build_server(AppState::new(config), &host, port)?.await
}
