pub mod analytics;
pub mod customers;
pub mod delivery;
pub mod delivery_partners;
pub mod invoices;
pub mod orders;
pub mod payments;

use std::sync::Arc;

use actix_web::web;

use crate::config::AppConfig;
use crate::domain::errors::DomainError;
use crate::domain::ports::MessageSender;
use crate::errors::AppError;
use crate::infrastructure::json_store::JsonFileStore;
use crate::infrastructure::printing::PrintDispatcher;
use crate::infrastructure::whatsapp::WhatsAppSender;

/// Shared state handed to every handler through `web::Data`.
pub struct AppState {
    pub store: JsonFileStore,
    pub sender: Arc<dyn MessageSender>,
    pub printer: PrintDispatcher,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            store: JsonFileStore::new(config.data_file.clone()),
            sender: Arc::new(WhatsAppSender::new(config.whatsapp.api_url.clone())),
            printer: PrintDispatcher::new(config.print_agent_url.clone()),
            config,
        }
    }

    pub fn with_sender(mut self, sender: Arc<dyn MessageSender>) -> Self {
        self.sender = sender;
        self
    }
}

/// Runs blocking store work on the actix thread pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??)
}

/// Trimmed value of a required text field, `None` when absent or blank.
pub(crate) fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
