//! Creates the data file with the seeded delivery partners if it does not
//! exist yet.

use billing_service::infrastructure::json_store::JsonFileStore;
use billing_service::AppConfig;
use dotenvy::dotenv;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env()?;
    let store = JsonFileStore::new(config.data_file);

    if store.initialize()? {
        println!("Database initialized at {}", store.path().display());
    } else {
        println!("Database already exists at {}", store.path().display());
    }
    Ok(())
}
