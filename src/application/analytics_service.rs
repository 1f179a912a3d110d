use chrono::Local;

use crate::domain::analytics::{self, AnalyticsReport};
use crate::domain::errors::DomainError;
use crate::domain::ports::DocumentStore;

pub struct AnalyticsService<S> {
    store: S,
}

impl<S: DocumentStore> AnalyticsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn report(&self) -> Result<AnalyticsReport, DomainError> {
        Ok(analytics::summarize(&self.store.load()?, Local::now()))
    }
}
