use async_trait::async_trait;

use super::document::Document;
use super::errors::DomainError;

/// Owner of the single persisted document.
pub trait DocumentStore: Clone + Send + Sync + 'static {
    /// Reads the whole document, creating and persisting the seeded default
    /// on first access.
    fn load(&self) -> Result<Document, DomainError>;

    /// Replaces the whole persisted document.
    fn save(&self, doc: &Document) -> Result<(), DomainError>;

    /// One load → mutate → save cycle. The document is only written back when
    /// `f` succeeds.
    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Document) -> Result<T, DomainError>;
}

/// Text notification announcing an invoice to a customer.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceNotice {
    pub phone_number: String,
    pub pdf_url: String,
    pub customer_name: String,
    pub total_amount: f64,
}

/// Credentials for the messaging API, supplied per call.
#[derive(Debug, Clone, PartialEq)]
pub struct MessagingCredentials {
    pub access_token: String,
    pub sender_id: String,
}

#[async_trait]
pub trait MessageSender: Send + Sync + 'static {
    async fn send_invoice_notice(
        &self,
        notice: &InvoiceNotice,
        credentials: &MessagingCredentials,
    ) -> Result<(), DomainError>;
}
