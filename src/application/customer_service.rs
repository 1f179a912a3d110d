use chrono::Utc;

use crate::domain::customer::{Customer, CustomerDetails, CustomerPatch};
use crate::domain::errors::DomainError;
use crate::domain::ids;
use crate::domain::ports::DocumentStore;

pub struct CustomerService<S> {
    store: S,
}

impl<S: DocumentStore> CustomerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Customer>, DomainError> {
        Ok(self.store.load()?.customers)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Customer>, DomainError> {
        Ok(self.store.load()?.customer(id).cloned())
    }

    pub fn find_by_phone(&self, phone: &str) -> Result<Option<Customer>, DomainError> {
        Ok(self.store.load()?.customer_by_phone(phone).cloned())
    }

    pub fn create(&self, details: CustomerDetails) -> Result<Customer, DomainError> {
        self.store.transaction(|doc| {
            let customer = Customer::new(ids::next_id(ids::CUSTOMER), details, Utc::now());
            doc.customers.push(customer.clone());
            log::info!("Created customer {}", customer.id);
            Ok(customer)
        })
    }

    pub fn update(&self, id: &str, patch: CustomerPatch) -> Result<Option<Customer>, DomainError> {
        self.store.transaction(|doc| {
            let Some(customer) = doc.customers.iter_mut().find(|c| c.id == id) else {
                return Ok(None);
            };
            customer.apply(patch);
            Ok(Some(customer.clone()))
        })
    }
}
