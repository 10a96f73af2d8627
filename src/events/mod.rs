use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// The events that can occur across the lab workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Case events
    CaseCreated(Uuid),
    CaseUpdated(Uuid),
    CaseDeleted(Uuid),
    CaseStatusChanged {
        case_id: Uuid,
        old_status: String,
        new_status: String,
    },

    // Invoice events
    InvoiceIssued(Uuid),
    InvoiceUpdated(Uuid),
    InvoiceDeleted(Uuid),
    InvoicePaid {
        invoice_id: Uuid,
        total: rust_decimal::Decimal,
    },
    InvoiceStatusChanged {
        invoice_id: Uuid,
        old_status: String,
        new_status: String,
    },

    // Inventory events
    InventoryItemCreated(Uuid),
    InventoryItemUpdated(Uuid),
    InventoryItemDeleted(Uuid),
    InventoryRestocked {
        item_id: Uuid,
        quantity_added: i32,
        new_quantity: i32,
    },
    LowStock {
        item_id: Uuid,
        quantity: i32,
        reorder_level: i32,
    },

    // Patient / dentist events
    PatientCreated(Uuid),
    PatientUpdated(Uuid),
    DentistCreated(Uuid),

    // Messaging events
    MessageSent {
        message_id: Uuid,
        case_id: Uuid,
        recipient_id: Uuid,
    },

    // Appointment events
    AppointmentScheduled(Uuid),
    AppointmentUpdated(Uuid),
    AppointmentCancelled(Uuid),

    // User events
    UserRegistered(Uuid),
    UserLoggedIn(Uuid),

    // Generic event for custom messages
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

impl Event {
    /// Create a generic event with string data
    pub fn with_data(data: String) -> Self {
        Event::Generic {
            message: data,
            timestamp: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }
}

// Consumes events from the channel and logs them. Alerting hooks hang off here.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::CaseStatusChanged {
                case_id,
                old_status,
                new_status,
            } => {
                info!(
                    "Case {} moved from {} to {}",
                    case_id, old_status, new_status
                );
            }
            Event::InvoicePaid { invoice_id, total } => {
                info!("Invoice {} paid in full: {}", invoice_id, total);
            }
            Event::LowStock {
                item_id,
                quantity,
                reorder_level,
            } => {
                warn!(
                    "Low stock alert: item {} has {} units (reorder level {})",
                    item_id, quantity, reorder_level
                );
            }
            Event::InventoryRestocked {
                item_id,
                quantity_added,
                new_quantity,
            } => {
                info!(
                    "Item {} restocked: +{} units, now {}",
                    item_id, quantity_added, new_quantity
                );
            }
            Event::MessageSent {
                message_id,
                case_id,
                recipient_id,
            } => {
                info!(
                    "Message {} sent on case {} to user {}",
                    message_id, case_id, recipient_id
                );
            }
            other => {
                info!("Event: {:?}", other);
            }
        }
    }

    warn!("Event processing loop has ended");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn event_sender_delivers_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        let case_id = Uuid::new_v4();

        sender.send(Event::CaseCreated(case_id)).await.unwrap();

        match rx.recv().await {
            Some(Event::CaseCreated(id)) => assert_eq!(id, case_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_fails_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender.send(Event::with_data("orphan".into())).await;
        assert!(result.is_err());
    }
}
