use chrono::{Local, Utc};

use crate::domain::errors::DomainError;
use crate::domain::ids;
use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::ports::DocumentStore;
use crate::domain::sequence;

pub struct InvoiceService<S> {
    store: S,
}

impl<S: DocumentStore> InvoiceService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All invoices, each with its order re-read when it still exists.
    pub fn list(&self) -> Result<Vec<Invoice>, DomainError> {
        let doc = self.store.load()?;
        Ok(doc.invoices.iter().map(|i| doc.resolved_invoice(i)).collect())
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Invoice>, DomainError> {
        let doc = self.store.load()?;
        Ok(doc.invoice(id).map(|i| doc.resolved_invoice(i)))
    }

    /// Issues an invoice for `order_id`, due seven days from now. The order
    /// (with its customer and partner resolved) is copied into the invoice.
    /// Returns `None` when the order does not exist.
    pub fn generate(&self, order_id: &str) -> Result<Option<Invoice>, DomainError> {
        self.store.transaction(|doc| {
            let Some(order) = doc.order(order_id).map(|o| doc.resolved_order(o)) else {
                return Ok(None);
            };

            let now = Utc::now();
            let id = ids::next_id(ids::INVOICE);
            let invoice = Invoice {
                pdf_url: Invoice::download_path(&id),
                id,
                order_id: order.id.clone(),
                order,
                invoice_number: sequence::next_invoice_number(
                    &doc.invoices,
                    now.with_timezone(&Local),
                ),
                issued_date: now,
                due_date: Invoice::due_date_for(now),
                is_sent: false,
                sent_at: None,
                status: InvoiceStatus::Pending,
                created_at: now,
            };
            doc.invoices.push(invoice.clone());
            log::info!(
                "Generated invoice {} for order {}",
                invoice.invoice_number,
                invoice.order_id
            );
            Ok(Some(invoice))
        })
    }

    pub fn update_status(
        &self,
        id: &str,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>, DomainError> {
        self.store.transaction(|doc| {
            let Some(invoice) = doc.invoices.iter_mut().find(|i| i.id == id) else {
                return Ok(None);
            };
            invoice.status = status;
            Ok(Some(invoice.clone()))
        })
    }

    /// Flags the invoice as delivered to the customer.
    pub fn mark_sent(&self, id: &str) -> Result<Option<Invoice>, DomainError> {
        self.store.transaction(|doc| {
            let Some(invoice) = doc.invoices.iter_mut().find(|i| i.id == id) else {
                return Ok(None);
            };
            invoice.is_sent = true;
            invoice.sent_at = Some(Utc::now());
            Ok(Some(invoice.clone()))
        })
    }

    pub fn delete(&self, id: &str) -> Result<bool, DomainError> {
        self.store.transaction(|doc| {
            let Some(index) = doc.invoices.iter().position(|i| i.id == id) else {
                return Ok(false);
            };
            doc.invoices.remove(index);
            log::info!("Deleted invoice {id}");
            Ok(true)
        })
    }
}
