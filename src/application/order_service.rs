use chrono::{Local, Utc};

use crate::domain::customer::Customer;
use crate::domain::document::Document;
use crate::domain::errors::DomainError;
use crate::domain::ids;
use crate::domain::order::{
    DeliveryPartner, NewOrder, Order, OrderItem, OrderPatch, OrderStatus, PartnerSelection,
};
use crate::domain::ports::DocumentStore;
use crate::domain::sequence;

pub struct OrderService<S> {
    store: S,
}

/// Existing customer with this phone number, or a freshly stored one.
fn resolve_customer(doc: &mut Document, order: &NewOrder) -> Customer {
    if let Some(existing) = doc.customer_by_phone(&order.customer.phone) {
        return existing.clone();
    }
    let customer = Customer::new(
        ids::next_id(ids::CUSTOMER),
        order.customer.clone(),
        Utc::now(),
    );
    doc.customers.push(customer.clone());
    log::info!("Created customer {} for new phone number", customer.id);
    customer
}

fn resolve_partner(doc: &Document, selection: &PartnerSelection) -> Result<DeliveryPartner, DomainError> {
    match selection {
        PartnerSelection::Existing(id) => doc
            .delivery_partner(id)
            .cloned()
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown delivery partner '{id}'"))),
        PartnerSelection::AdHoc { name, charges } => Ok(DeliveryPartner {
            id: ids::next_id(ids::DELIVERY_PARTNER),
            name: name.clone(),
            charges: *charges,
        }),
    }
}

/// An order carries at least one item and every quantity is at least 1.
fn validate_quantities<I>(quantities: I) -> Result<(), DomainError>
where
    I: IntoIterator<Item = u32>,
{
    let mut any = false;
    for quantity in quantities {
        if quantity == 0 {
            return Err(DomainError::InvalidInput(
                "item quantity must be at least 1".to_string(),
            ));
        }
        any = true;
    }
    if !any {
        return Err(DomainError::InvalidInput(
            "an order needs at least one item".to_string(),
        ));
    }
    Ok(())
}

impl<S: DocumentStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All orders with customer and partner resolved against the stored records.
    pub fn list(&self) -> Result<Vec<Order>, DomainError> {
        let doc = self.store.load()?;
        Ok(doc.orders.iter().map(|o| doc.resolved_order(o)).collect())
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Order>, DomainError> {
        let doc = self.store.load()?;
        Ok(doc.order(id).map(|o| doc.resolved_order(o)))
    }

    /// Records a new order. The customer is looked up by phone (and created
    /// when unknown) before anything is snapshotted into the order.
    pub fn create(&self, new_order: NewOrder) -> Result<Order, DomainError> {
        validate_quantities(new_order.items.iter().map(|i| i.quantity))?;

        self.store.transaction(|doc| {
            let partner = resolve_partner(doc, &new_order.delivery_partner)?;
            let customer = resolve_customer(doc, &new_order);

            let items: Vec<OrderItem> = new_order
                .items
                .into_iter()
                .map(|item| OrderItem {
                    id: item.id.unwrap_or_else(|| ids::next_id(ids::ORDER_ITEM)),
                    name: item.name,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect();
            let total_amount =
                Order::compute_total(&items, partner.charges, new_order.service_fee);

            let now = Utc::now();
            let order = Order {
                id: sequence::next_order_number(&doc.orders, now.with_timezone(&Local)),
                customer_id: customer.id.clone(),
                customer,
                items,
                delivery_partner_id: partner.id.clone(),
                delivery_partner: partner,
                service_fee: new_order.service_fee,
                gst: 0.0,
                total_amount,
                status: OrderStatus::Received,
                payment_method: new_order.payment_method,
                created_at: now,
                updated_at: now,
            };
            doc.orders.push(order.clone());
            log::info!("Created order {} totalling {}", order.id, order.total_amount);
            Ok(order)
        })
    }

    /// Shallow merge of `patch` onto the stored order.
    pub fn update(&self, id: &str, patch: OrderPatch) -> Result<Option<Order>, DomainError> {
        if let Some(items) = &patch.items {
            validate_quantities(items.iter().map(|i| i.quantity))?;
        }
        self.store.transaction(|doc| {
            let partner = patch
                .delivery_partner_id
                .as_deref()
                .and_then(|pid| doc.delivery_partner(pid).cloned());
            let Some(order) = doc.orders.iter_mut().find(|o| o.id == id) else {
                return Ok(None);
            };

            if let Some(customer) = patch.customer {
                order.customer = customer;
            }
            if let Some(items) = patch.items {
                order.items = items;
            }
            if let Some(partner_id) = patch.delivery_partner_id {
                order.delivery_partner_id = partner_id;
            }
            if let Some(partner) = partner {
                order.delivery_partner = partner;
            }
            if let Some(fee) = patch.service_fee {
                order.service_fee = fee;
            }
            if let Some(gst) = patch.gst {
                order.gst = gst;
            }
            if let Some(total) = patch.total_amount {
                order.total_amount = total;
            }
            if let Some(status) = patch.status {
                order.status = status;
            }
            if let Some(method) = patch.payment_method {
                order.payment_method = method;
            }
            if patch.recalculate_total {
                order.recalculate_total();
            }
            order.updated_at = Utc::now();
            Ok(Some(order.clone()))
        })
    }

    pub fn delete(&self, id: &str) -> Result<bool, DomainError> {
        self.store.transaction(|doc| {
            let Some(index) = doc.orders.iter().position(|o| o.id == id) else {
                return Ok(false);
            };
            doc.orders.remove(index);
            log::info!("Deleted order {id}");
            Ok(true)
        })
    }
}
