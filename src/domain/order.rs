use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::customer::{Customer, CustomerDetails};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPartner {
    pub id: String,
    pub name: String,
    /// Flat fee added to every order delivered by this partner.
    pub charges: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Received,
    Processing,
    Invoiced,
    Delivered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum PaymentMethod {
    #[serde(rename = "UPI")]
    Upi,
    Online,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Online => "Online",
            PaymentMethod::Cash => "Cash",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// The generated order number, e.g. `ORD-QBX-20240115-03`.
    pub id: String,
    pub customer_id: String,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub delivery_partner_id: String,
    pub delivery_partner: DeliveryPartner,
    pub service_fee: f64,
    pub gst: f64,
    /// Fixed at creation. Only recomputed when an update asks for it.
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn items_subtotal(items: &[OrderItem]) -> f64 {
        items.iter().map(OrderItem::line_total).sum()
    }

    pub fn compute_total(items: &[OrderItem], delivery_charges: f64, service_fee: f64) -> f64 {
        Self::items_subtotal(items) + delivery_charges + service_fee
    }

    pub fn recalculate_total(&mut self) {
        self.total_amount =
            Self::compute_total(&self.items, self.delivery_partner.charges, self.service_fee);
    }
}

/// Item as supplied on order intake. A missing id is generated.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartnerSelection {
    /// One of the partners stored in the document.
    Existing(String),
    /// Partner described inline; gets a fresh `dp_` id.
    AdHoc { name: String, charges: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer: CustomerDetails,
    pub items: Vec<NewOrderItem>,
    pub delivery_partner: PartnerSelection,
    pub service_fee: f64,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    /// Replaces the embedded snapshot only; the stored customer is untouched.
    pub customer: Option<Customer>,
    pub items: Option<Vec<OrderItem>>,
    pub delivery_partner_id: Option<String>,
    pub service_fee: Option<f64>,
    pub gst: Option<f64>,
    pub total_amount: Option<f64>,
    pub status: Option<OrderStatus>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub recalculate_total: bool,
}
