use crate::domain::errors::DomainError;
use crate::domain::order::DeliveryPartner;
use crate::domain::ports::DocumentStore;

pub struct DeliveryPartnerService<S> {
    store: S,
}

impl<S: DocumentStore> DeliveryPartnerService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<DeliveryPartner>, DomainError> {
        Ok(self.store.load()?.delivery_partners)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<DeliveryPartner>, DomainError> {
        Ok(self.store.load()?.delivery_partner(id).cloned())
    }
}
