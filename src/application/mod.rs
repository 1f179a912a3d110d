pub mod analytics_service;
pub mod customer_service;
pub mod delivery_partner_service;
pub mod invoice_service;
pub mod order_service;
pub mod payment_service;
