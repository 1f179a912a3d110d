use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::order::Order;

/// Days between issue and due date.
pub const PAYMENT_TERM_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Processing,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub order_id: String,
    /// Copy of the order taken when the invoice was generated.
    pub order: Order,
    pub invoice_number: String,
    pub issued_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub pdf_url: String,
    #[serde(default)]
    pub is_sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn due_date_for(issued: DateTime<Utc>) -> DateTime<Utc> {
        issued + Duration::days(PAYMENT_TERM_DAYS)
    }

    pub fn download_path(id: &str) -> String {
        format!("/invoices/{id}/download")
    }
}
