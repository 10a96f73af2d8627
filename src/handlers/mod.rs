pub mod appointments;
pub mod auth;
pub mod cases;
pub mod dentists;
pub mod health;
pub mod inventory;
pub mod invoices;
pub mod messages;
pub mod patients;
pub mod reports;

use crate::db::DbPool;
use crate::events::EventSender;
use rust_decimal::Decimal;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub cases: Arc<crate::services::cases::CaseService>,
    pub invoices: Arc<crate::services::invoices::InvoiceService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub patients: Arc<crate::services::patients::PatientService>,
    pub dentists: Arc<crate::services::dentists::DentistService>,
    pub messages: Arc<crate::services::messages::MessageService>,
    pub appointments: Arc<crate::services::appointments::AppointmentService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        default_tax_rate: Decimal,
    ) -> Self {
        Self {
            cases: Arc::new(crate::services::cases::CaseService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            invoices: Arc::new(crate::services::invoices::InvoiceService::new(
                db_pool.clone(),
                event_sender.clone(),
                default_tax_rate,
            )),
            inventory: Arc::new(crate::services::inventory::InventoryService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            patients: Arc::new(crate::services::patients::PatientService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            dentists: Arc::new(crate::services::dentists::DentistService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            messages: Arc::new(crate::services::messages::MessageService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            appointments: Arc::new(crate::services::appointments::AppointmentService::new(
                db_pool.clone(),
                event_sender,
            )),
            reports: Arc::new(crate::services::reports::ReportService::new(db_pool)),
        }
    }
}
