use crate::{
    db::DbPool,
    entities::invoice::{self, ActiveModel as InvoiceActiveModel, Entity as InvoiceEntity},
    entities::invoice_item::{self, ActiveModel as ItemActiveModel, Entity as ItemEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Attempts at allocating a unique invoice number before giving up
const INVOICE_NUMBER_ATTEMPTS: u32 = 3;

/// Billing states. `paid` is terminal; `overdue` is derived at read time
/// for unpaid invoices past their due date and never stored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Overdue,
    Paid,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct InvoiceItemRequest {
    #[validate(length(min = 1, message = "Item description is required"))]
    pub description: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    pub unit_price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInvoiceRequest {
    pub patient_id: Uuid,
    pub dentist_id: Uuid,
    pub case_id: Option<Uuid>,
    pub due_date: NaiveDate,
    pub issue_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[validate]
    pub items: Vec<InvoiceItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateInvoiceRequest {
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[validate]
    pub items: Option<Vec<InvoiceItemRequest>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateInvoiceStatusRequest {
    pub status: InvoiceStatus,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceItemResponse {
    pub id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub invoice_number: String,
    /// Effective status: stored value, or `overdue` when an unpaid
    /// invoice is past its due date.
    pub status: String,
    pub patient_id: Uuid,
    pub dentist_id: Uuid,
    pub case_id: Option<Uuid>,
    pub amount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub notes: Option<String>,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    pub items: Vec<InvoiceItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceResponse>,
    pub total: u64,
}

/// Service for invoices and their line items. Totals are always computed
/// here, never taken from the client.
#[derive(Clone)]
pub struct InvoiceService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
    tax_rate: Decimal,
}

impl InvoiceService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Option<Arc<EventSender>>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            tax_rate,
        }
    }

    /// Creates an invoice with at least one line item. The subtotal is
    /// the sum of quantity x unit price over the items, tax is the
    /// subtotal times the configured rate rounded to cents, and the
    /// grand total is their sum.
    #[instrument(skip(self, request), fields(patient_id = %request.patient_id, dentist_id = %request.dentist_id))]
    pub async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
    ) -> Result<InvoiceResponse, ServiceError> {
        request.validate()?;

        if request.items.is_empty() {
            return Err(ServiceError::ValidationError(
                "An invoice requires at least one line item".to_string(),
            ));
        }

        let (amount, tax, total) = self.compute_totals(&request.items);

        // Invoice numbers are allocated by counting within the year, so
        // two concurrent creates can collide on the unique column. Retry
        // the whole transaction on a unique violation.
        let mut attempt = 0;
        let (created, items) = loop {
            attempt += 1;
            match self.insert_invoice(&request, amount, tax, total).await {
                Ok(inserted) => break inserted,
                Err(ServiceError::DatabaseError(e))
                    if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
                        && attempt < INVOICE_NUMBER_ATTEMPTS =>
                {
                    warn!(attempt, "Invoice number collided, retrying");
                }
                Err(e) => return Err(e),
            }
        };

        let invoice_id = created.id;
        info!(invoice_id = %invoice_id, invoice_number = %created.invoice_number, total = %total, "Invoice created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::InvoiceIssued(invoice_id)).await {
                warn!(error = %e, invoice_id = %invoice_id, "Failed to send invoice issued event");
            }
        }

        Ok(model_to_response(created, items))
    }

    /// One transactional attempt at inserting an invoice and its items
    /// under a freshly allocated number.
    async fn insert_invoice(
        &self,
        request: &CreateInvoiceRequest,
        amount: Decimal,
        tax: Decimal,
        total: Decimal,
    ) -> Result<(invoice::Model, Vec<invoice_item::Model>), ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();
        let today = now.date_naive();
        let invoice_id = Uuid::new_v4();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start invoice creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        let invoice_number = next_invoice_number(&txn, today.year()).await?;

        let model = InvoiceActiveModel {
            id: Set(invoice_id),
            invoice_number: Set(invoice_number),
            status: Set(InvoiceStatus::Unpaid.to_string()),
            patient_id: Set(request.patient_id),
            dentist_id: Set(request.dentist_id),
            case_id: Set(request.case_id),
            amount: Set(amount),
            tax: Set(tax),
            total: Set(total),
            notes: Set(request.notes.clone()),
            issue_date: Set(request.issue_date.unwrap_or(today)),
            due_date: Set(request.due_date),
            paid_date: Set(None),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = model.insert(&txn).await?;

        let mut items = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let line_amount = item.unit_price * Decimal::from(item.quantity);
            let inserted = ItemActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                description: Set(item.description.clone()),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                amount: Set(line_amount),
            }
            .insert(&txn)
            .await?;
            items.push(inserted);
        }

        txn.commit().await?;

        Ok((created, items))
    }

    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn get_invoice(&self, invoice_id: Uuid) -> Result<InvoiceResponse, ServiceError> {
        let db = &*self.db_pool;

        let invoice = InvoiceEntity::find_by_id(invoice_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        let items = self.fetch_items(invoice_id).await?;
        Ok(model_to_response(invoice, items))
    }

    /// Lists invoices, newest first. The optional status filter matches
    /// the effective (derived) status, so `overdue` finds unpaid
    /// invoices past their due date.
    #[instrument(skip(self))]
    pub async fn list_invoices(
        &self,
        status: Option<InvoiceStatus>,
    ) -> Result<InvoiceListResponse, ServiceError> {
        let db = &*self.db_pool;

        let invoices = InvoiceEntity::find()
            .order_by_desc(invoice::Column::CreatedAt)
            .all(db)
            .await?;

        let mut responses = Vec::with_capacity(invoices.len());
        for model in invoices {
            let items = self.fetch_items(model.id).await?;
            responses.push(model_to_response(model, items));
        }

        if let Some(wanted) = status {
            let wanted = wanted.to_string();
            responses.retain(|inv| inv.status == wanted);
        }

        let total = responses.len() as u64;
        Ok(InvoiceListResponse {
            invoices: responses,
            total,
        })
    }

    /// Updates invoice fields. When a new item list is supplied it
    /// replaces the old one and the totals are recomputed; an empty
    /// list is rejected since an invoice must keep at least one item.
    #[instrument(skip(self, request), fields(invoice_id = %invoice_id))]
    pub async fn update_invoice(
        &self,
        invoice_id: Uuid,
        request: UpdateInvoiceRequest,
    ) -> Result<InvoiceResponse, ServiceError> {
        request.validate()?;

        if let Some(items) = &request.items {
            if items.is_empty() {
                return Err(ServiceError::ValidationError(
                    "An invoice requires at least one line item".to_string(),
                ));
            }
        }

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await?;

        let invoice = InvoiceEntity::find_by_id(invoice_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        let mut active: InvoiceActiveModel = invoice.into();
        if let Some(due_date) = request.due_date {
            active.due_date = Set(due_date);
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }

        if let Some(items) = request.items {
            let (amount, tax, total) = self.compute_totals(&items);
            active.amount = Set(amount);
            active.tax = Set(tax);
            active.total = Set(total);

            ItemEntity::delete_many()
                .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
                .exec(&txn)
                .await?;

            for item in items {
                let line_amount = item.unit_price * Decimal::from(item.quantity);
                ItemActiveModel {
                    id: Set(Uuid::new_v4()),
                    invoice_id: Set(invoice_id),
                    description: Set(item.description),
                    quantity: Set(item.quantity),
                    unit_price: Set(item.unit_price),
                    amount: Set(line_amount),
                }
                .insert(&txn)
                .await?;
            }
        }

        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::InvoiceUpdated(invoice_id)).await {
                warn!(error = %e, invoice_id = %invoice_id, "Failed to send invoice updated event");
            }
        }

        let items = self.fetch_items(invoice_id).await?;
        Ok(model_to_response(updated, items))
    }

    /// Moves an invoice to a new billing status. Paying stamps
    /// `paid_date`; a paid invoice can never leave that state.
    #[instrument(skip(self), fields(invoice_id = %invoice_id, new_status = %new_status))]
    pub async fn update_status(
        &self,
        invoice_id: Uuid,
        new_status: InvoiceStatus,
    ) -> Result<InvoiceResponse, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let invoice = InvoiceEntity::find_by_id(invoice_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        let old_status = invoice.status.clone();

        if old_status == InvoiceStatus::Paid.to_string() && new_status != InvoiceStatus::Paid {
            return Err(ServiceError::Conflict(
                "A paid invoice cannot change status".to_string(),
            ));
        }

        let total = invoice.total;
        let mut active: InvoiceActiveModel = invoice.into();
        active.status = Set(new_status.to_string());
        if new_status == InvoiceStatus::Paid {
            active.paid_date = Set(Some(now.date_naive()));
        }
        active.updated_at = Set(Some(now));

        let updated = active.update(db).await?;

        info!(invoice_id = %invoice_id, old_status = %old_status, new_status = %new_status, "Invoice status updated");

        if let Some(event_sender) = &self.event_sender {
            let event = if new_status == InvoiceStatus::Paid {
                Event::InvoicePaid { invoice_id, total }
            } else {
                Event::InvoiceStatusChanged {
                    invoice_id,
                    old_status,
                    new_status: new_status.to_string(),
                }
            };
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, invoice_id = %invoice_id, "Failed to send invoice status event");
            }
        }

        let items = self.fetch_items(invoice_id).await?;
        Ok(model_to_response(updated, items))
    }

    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn delete_invoice(&self, invoice_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        InvoiceEntity::find_by_id(invoice_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        let txn = db.begin().await?;
        ItemEntity::delete_many()
            .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
            .exec(&txn)
            .await?;
        InvoiceEntity::delete_by_id(invoice_id).exec(&txn).await?;
        txn.commit().await?;

        info!(invoice_id = %invoice_id, "Invoice deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::InvoiceDeleted(invoice_id)).await {
                warn!(error = %e, invoice_id = %invoice_id, "Failed to send invoice deleted event");
            }
        }

        Ok(())
    }

    fn compute_totals(&self, items: &[InvoiceItemRequest]) -> (Decimal, Decimal, Decimal) {
        let amount: Decimal = items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum();
        let tax = (amount * self.tax_rate).round_dp(2);
        let total = amount + tax;
        (amount, tax, total)
    }

    async fn fetch_items(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<invoice_item::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(ItemEntity::find()
            .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
            .all(db)
            .await?)
    }
}

/// Next invoice number within a year: INV-<year>-<zero-padded sequence>.
async fn next_invoice_number<C: sea_orm::ConnectionTrait>(
    conn: &C,
    year: i32,
) -> Result<String, ServiceError> {
    let prefix = format!("INV-{}-", year);
    let count = InvoiceEntity::find()
        .filter(invoice::Column::InvoiceNumber.starts_with(prefix.clone()))
        .count(conn)
        .await?;
    Ok(format!("{}{:06}", prefix, count + 1))
}

/// Effective status as reported to clients: unpaid invoices past their
/// due date read as overdue.
pub fn effective_status(status: &str, due_date: NaiveDate, today: NaiveDate) -> String {
    if status == InvoiceStatus::Unpaid.to_string() && due_date < today {
        InvoiceStatus::Overdue.to_string()
    } else {
        status.to_string()
    }
}

fn model_to_response(model: invoice::Model, items: Vec<invoice_item::Model>) -> InvoiceResponse {
    let today = Utc::now().date_naive();
    InvoiceResponse {
        id: model.id,
        invoice_number: model.invoice_number,
        status: effective_status(&model.status, model.due_date, today),
        patient_id: model.patient_id,
        dentist_id: model.dentist_id,
        case_id: model.case_id,
        amount: model.amount,
        tax: model.tax,
        total: model.total,
        notes: model.notes,
        issue_date: model.issue_date,
        due_date: model.due_date,
        paid_date: model.paid_date,
        items: items
            .into_iter()
            .map(|item| InvoiceItemResponse {
                id: item.id,
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
                amount: item.amount,
            })
            .collect(),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn parse_invoice_status(value: &str) -> Result<InvoiceStatus, ServiceError> {
    InvoiceStatus::from_str(value)
        .map_err(|_| ServiceError::InvalidStatus(format!("Unknown invoice status: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn service_with_rate(rate: Decimal) -> InvoiceService {
        InvoiceService::new(
            Arc::new(sea_orm::DatabaseConnection::default()),
            None,
            rate,
        )
    }

    fn item(quantity: i32, unit_price: Decimal) -> InvoiceItemRequest {
        InvoiceItemRequest {
            description: "Crown".to_string(),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn totals_sum_lines_and_apply_tax() {
        let service = service_with_rate(dec!(0.08));
        let items = vec![
            item(1, dec!(950.00)),
            item(1, dec!(200.00)),
            item(1, dec!(200.00)),
        ];

        let (amount, tax, total) = service.compute_totals(&items);
        assert_eq!(amount, dec!(1350.00));
        assert_eq!(tax, dec!(108.00));
        assert_eq!(total, dec!(1458.00));
    }

    #[test]
    fn tax_rounds_to_cents() {
        let service = service_with_rate(dec!(0.08));
        let items = vec![item(3, dec!(33.33))];

        let (amount, tax, total) = service.compute_totals(&items);
        assert_eq!(amount, dec!(99.99));
        // 99.99 * 0.08 = 7.9992
        assert_eq!(tax, dec!(8.00));
        assert_eq!(total, dec!(107.99));
    }

    #[test]
    fn quantity_multiplies_unit_price() {
        let service = service_with_rate(dec!(0.08));
        let (amount, _, _) = service.compute_totals(&[item(4, dec!(25.50))]);
        assert_eq!(amount, dec!(102.00));
    }

    #[test]
    fn unpaid_past_due_reads_as_overdue() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let tomorrow = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();

        assert_eq!(effective_status("unpaid", yesterday, today), "overdue");
        assert_eq!(effective_status("unpaid", today, today), "unpaid");
        assert_eq!(effective_status("unpaid", tomorrow, today), "unpaid");
        // Paid invoices never read as overdue
        assert_eq!(effective_status("paid", yesterday, today), "paid");
    }

    #[test]
    fn invoice_statuses_round_trip() {
        for status in ["unpaid", "overdue", "paid"] {
            assert_eq!(parse_invoice_status(status).unwrap().to_string(), status);
        }
        assert!(parse_invoice_status("void").is_err());
    }

    #[test]
    fn zero_quantity_item_fails_validation() {
        let request = item(0, dec!(10.00));
        assert!(request.validate().is_err());
    }
}
