pub mod appointments;
pub mod cases;
pub mod dentists;
pub mod inventory;
pub mod invoices;
pub mod messages;
pub mod patients;
pub mod reports;
