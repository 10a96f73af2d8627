pub mod appointment;
pub mod case;
pub mod case_status_history;
pub mod dentist;
pub mod inventory_category;
pub mod inventory_item;
pub mod invoice;
pub mod invoice_item;
pub mod message;
pub mod patient;
pub mod supplier;
pub mod user;
