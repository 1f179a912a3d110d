pub mod analytics;
pub mod customer;
pub mod document;
pub mod errors;
pub mod ids;
pub mod invoice;
pub mod order;
pub mod payment;
pub mod ports;
pub mod sequence;
