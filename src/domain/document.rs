use serde::{Deserialize, Serialize};

use super::customer::Customer;
use super::invoice::Invoice;
use super::order::{DeliveryPartner, Order};
use super::payment::Payment;

/// The whole persisted state. Loaded and saved wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub delivery_partners: Vec<DeliveryPartner>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl Document {
    /// Empty collections plus the three fixed delivery partners.
    pub fn seeded() -> Self {
        let partner = |id: &str, name: &str, charges: f64| DeliveryPartner {
            id: id.to_string(),
            name: name.to_string(),
            charges,
        };
        Self {
            delivery_partners: vec![
                partner("dp1", "Express Delivery", 80.0),
                partner("dp2", "Speedy Shipping", 100.0),
                partner("dp3", "Fast Freight", 120.0),
            ],
            ..Self::default()
        }
    }

    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn customer_by_phone(&self, phone: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.phone == phone)
    }

    pub fn delivery_partner(&self, id: &str) -> Option<&DeliveryPartner> {
        self.delivery_partners.iter().find(|p| p.id == id)
    }

    pub fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    pub fn invoice(&self, id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    /// Order with customer and partner replaced by the stored records when
    /// they still exist, keeping the embedded snapshots otherwise.
    pub fn resolved_order(&self, order: &Order) -> Order {
        let mut resolved = order.clone();
        if let Some(customer) = self.customer(&order.customer_id) {
            resolved.customer = customer.clone();
        }
        if let Some(partner) = self.delivery_partner(&order.delivery_partner_id) {
            resolved.delivery_partner = partner.clone();
        }
        resolved
    }

    /// Invoice with its order re-read from the order collection, falling back
    /// to the snapshot taken at generation time.
    pub fn resolved_invoice(&self, invoice: &Invoice) -> Invoice {
        let mut resolved = invoice.clone();
        if let Some(order) = self.order(&invoice.order_id) {
            resolved.order = order.clone();
        }
        resolved
    }
}
