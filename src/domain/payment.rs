use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::order::PaymentMethod;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub order_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
    /// Defaults to the moment the payment is recorded.
    pub paid_at: Option<DateTime<Utc>>,
}
