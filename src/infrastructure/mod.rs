pub mod json_store;
pub mod pdf;
pub mod printing;
pub mod whatsapp;
