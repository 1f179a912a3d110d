use chrono::Utc;

use crate::domain::errors::DomainError;
use crate::domain::ids;
use crate::domain::payment::{NewPayment, Payment};
use crate::domain::ports::DocumentStore;

pub struct PaymentService<S> {
    store: S,
}

impl<S: DocumentStore> PaymentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Payment>, DomainError> {
        Ok(self.store.load()?.payments)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .store
            .load()?
            .payments
            .into_iter()
            .find(|p| p.id == id))
    }

    pub fn list_by_order(&self, order_id: &str) -> Result<Vec<Payment>, DomainError> {
        Ok(self
            .store
            .load()?
            .payments
            .into_iter()
            .filter(|p| p.order_id == order_id)
            .collect())
    }

    /// Records a payment. The order id is stored as given, not checked.
    pub fn create(&self, payment: NewPayment) -> Result<Payment, DomainError> {
        self.store.transaction(|doc| {
            let payment = Payment {
                id: ids::next_id(ids::PAYMENT),
                order_id: payment.order_id,
                amount: payment.amount,
                method: payment.method,
                transaction_id: payment.transaction_id,
                paid_at: payment.paid_at.unwrap_or_else(Utc::now),
            };
            doc.payments.push(payment.clone());
            log::info!("Recorded payment {} for order {}", payment.id, payment.order_id);
            Ok(payment)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::PaymentMethod;
    use crate::infrastructure::json_store::JsonFileStore;

    fn service() -> (tempfile::TempDir, PaymentService<JsonFileStore>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("database.json"));
        (dir, PaymentService::new(store))
    }

    fn payment(order_id: &str, method: PaymentMethod) -> NewPayment {
        NewPayment {
            order_id: order_id.to_string(),
            amount: 680.0,
            method,
            transaction_id: Some("UTR123".to_string()),
            paid_at: None,
        }
    }

    #[test]
    fn create_then_fetch() {
        let (_dir, service) = service();
        let created = service.create(payment("ORD-1", PaymentMethod::Upi)).unwrap();

        assert!(created.id.starts_with("pay_"));
        assert_eq!(service.get_by_id(&created.id).unwrap(), Some(created));
        assert!(service.get_by_id("pay_0").unwrap().is_none());
    }

    #[test]
    fn list_by_order_filters() {
        let (_dir, service) = service();
        service.create(payment("ORD-1", PaymentMethod::Upi)).unwrap();
        service.create(payment("ORD-2", PaymentMethod::Cash)).unwrap();
        service.create(payment("ORD-1", PaymentMethod::Online)).unwrap();

        let for_first = service.list_by_order("ORD-1").unwrap();
        assert_eq!(for_first.len(), 2);
        assert!(for_first.iter().all(|p| p.order_id == "ORD-1"));
        assert_eq!(service.list().unwrap().len(), 3);
    }
}
