use crate::{
    db::DbPool,
    entities::case::{self, ActiveModel as CaseActiveModel, Entity as CaseEntity},
    entities::case_status_history::{
        self, ActiveModel as HistoryActiveModel, Entity as HistoryEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use strum::{Display, EnumIter, EnumString};
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Workflow states a lab case passes through. Any transition between two
/// distinct states is permitted; re-submitting the current state is not.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    New,
    InProgress,
    PendingReview,
    Completed,
    Delivered,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CasePriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCaseRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub priority: CasePriority,
    pub patient_id: Uuid,
    pub dentist_id: Uuid,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCaseRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<CasePriority>,
    pub patient_id: Option<Uuid>,
    pub dentist_id: Option<Uuid>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCaseStatusRequest {
    pub status: CaseStatus,
    #[validate(length(min = 1, message = "Notes are required when changing status"))]
    pub notes: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseResponse {
    pub id: Uuid,
    pub case_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub patient_id: Uuid,
    pub dentist_id: Uuid,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseListResponse {
    pub cases: Vec<CaseResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CaseStatusHistoryResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    pub status: String,
    pub notes: String,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub dentist_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
}

/// Service for managing lab cases and their status history
#[derive(Clone)]
pub struct CaseService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl CaseService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a new case. Fresh cases always start in `new`; the case
    /// number is assigned server-side from the creation timestamp, and
    /// the history trail is seeded with the creation entry.
    #[instrument(skip(self, request), fields(patient_id = %request.patient_id, dentist_id = %request.dentist_id))]
    pub async fn create_case(
        &self,
        request: CreateCaseRequest,
        created_by: Uuid,
    ) -> Result<CaseResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let now = Utc::now();
        let case_id = Uuid::new_v4();
        let case_number = format!("CASE-{}", now.timestamp_millis());

        let txn = db.begin().await?;

        let model = CaseActiveModel {
            id: Set(case_id),
            case_number: Set(case_number),
            title: Set(request.title),
            description: Set(request.description),
            status: Set(CaseStatus::New.to_string()),
            priority: Set(request.priority.to_string()),
            patient_id: Set(request.patient_id),
            dentist_id: Set(request.dentist_id),
            due_date: Set(request.due_date),
            created_at: Set(now),
            updated_at: Set(None),
        };

        let created = model.insert(&txn).await.map_err(|e| {
            error!(error = %e, case_id = %case_id, "Failed to create case");
            ServiceError::DatabaseError(e)
        })?;

        let history = HistoryActiveModel {
            id: Set(Uuid::new_v4()),
            case_id: Set(case_id),
            status: Set(CaseStatus::New.to_string()),
            notes: Set("Case created".to_string()),
            changed_by: Set(created_by),
            changed_at: Set(now),
        };
        history.insert(&txn).await?;

        txn.commit().await?;

        info!(case_id = %case_id, case_number = %created.case_number, "Case created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::CaseCreated(case_id)).await {
                warn!(error = %e, case_id = %case_id, "Failed to send case created event");
            }
        }

        Ok(model_to_response(created))
    }

    #[instrument(skip(self), fields(case_id = %case_id))]
    pub async fn get_case(&self, case_id: Uuid) -> Result<CaseResponse, ServiceError> {
        let db = &*self.db_pool;

        let case = CaseEntity::find_by_id(case_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Case {} not found", case_id)))?;

        Ok(model_to_response(case))
    }

    /// Lists cases with optional status/dentist/patient filters,
    /// newest first.
    #[instrument(skip(self, filter))]
    pub async fn list_cases(
        &self,
        filter: CaseFilter,
        page: u64,
        per_page: u64,
    ) -> Result<CaseListResponse, ServiceError> {
        let db = &*self.db_pool;

        let mut query = CaseEntity::find();
        if let Some(status) = filter.status {
            query = query.filter(case::Column::Status.eq(status.to_string()));
        }
        if let Some(dentist_id) = filter.dentist_id {
            query = query.filter(case::Column::DentistId.eq(dentist_id));
        }
        if let Some(patient_id) = filter.patient_id {
            query = query.filter(case::Column::PatientId.eq(patient_id));
        }

        let paginator = query
            .order_by_desc(case::Column::CreatedAt)
            .paginate(db, per_page.max(1));

        let total = paginator.num_items().await?;
        let cases = paginator.fetch_page(page.saturating_sub(1)).await?;

        Ok(CaseListResponse {
            cases: cases.into_iter().map(model_to_response).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Applies a partial update to case metadata. Status is deliberately
    /// not touched here; it only moves through [`update_status`].
    ///
    /// [`update_status`]: CaseService::update_status
    #[instrument(skip(self, request), fields(case_id = %case_id))]
    pub async fn update_case(
        &self,
        case_id: Uuid,
        request: UpdateCaseRequest,
    ) -> Result<CaseResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        let case = CaseEntity::find_by_id(case_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Case {} not found", case_id)))?;

        let mut active: CaseActiveModel = case.into();
        if let Some(title) = request.title {
            active.title = Set(title);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(priority) = request.priority {
            active.priority = Set(priority.to_string());
        }
        if let Some(patient_id) = request.patient_id {
            active.patient_id = Set(patient_id);
        }
        if let Some(dentist_id) = request.dentist_id {
            active.dentist_id = Set(dentist_id);
        }
        if let Some(due_date) = request.due_date {
            active.due_date = Set(Some(due_date));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::CaseUpdated(case_id)).await {
                warn!(error = %e, case_id = %case_id, "Failed to send case updated event");
            }
        }

        Ok(model_to_response(updated))
    }

    /// Moves a case to a new status and records the transition.
    ///
    /// The status overwrite and the history insert happen in one
    /// transaction so the audit trail can never miss a change. A request
    /// for the status the case is already in is rejected, as is one with
    /// blank notes; neither produces a history row.
    #[instrument(skip(self, request), fields(case_id = %case_id, new_status = %request.status))]
    pub async fn update_status(
        &self,
        case_id: Uuid,
        request: UpdateCaseStatusRequest,
        changed_by: Uuid,
    ) -> Result<CaseResponse, ServiceError> {
        if request.notes.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Notes are required when changing status".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, case_id = %case_id, "Failed to start status update transaction");
            ServiceError::DatabaseError(e)
        })?;

        let case = CaseEntity::find_by_id(case_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Case {} not found", case_id)))?;

        let old_status = case.status.clone();
        let new_status = request.status.to_string();

        if old_status == new_status {
            return Err(ServiceError::InvalidOperation(format!(
                "Case is already in status {}",
                old_status
            )));
        }

        let mut active: CaseActiveModel = case.into();
        active.status = Set(new_status.clone());
        active.updated_at = Set(Some(now));
        let updated = active.update(&txn).await?;

        let history = HistoryActiveModel {
            id: Set(Uuid::new_v4()),
            case_id: Set(case_id),
            status: Set(new_status.clone()),
            notes: Set(request.notes),
            changed_by: Set(changed_by),
            changed_at: Set(now),
        };
        history.insert(&txn).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, case_id = %case_id, "Failed to commit status update transaction");
            ServiceError::DatabaseError(e)
        })?;

        info!(case_id = %case_id, old_status = %old_status, new_status = %new_status, "Case status updated");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::CaseStatusChanged {
                    case_id,
                    old_status,
                    new_status,
                })
                .await
            {
                warn!(error = %e, case_id = %case_id, "Failed to send status change event");
            }
        }

        Ok(model_to_response(updated))
    }

    /// Returns the full status trail for a case, oldest first.
    #[instrument(skip(self), fields(case_id = %case_id))]
    pub async fn get_status_history(
        &self,
        case_id: Uuid,
    ) -> Result<Vec<CaseStatusHistoryResponse>, ServiceError> {
        let db = &*self.db_pool;

        // 404 rather than an empty list for an unknown case
        CaseEntity::find_by_id(case_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Case {} not found", case_id)))?;

        let entries = HistoryEntity::find()
            .filter(case_status_history::Column::CaseId.eq(case_id))
            .order_by_asc(case_status_history::Column::ChangedAt)
            .all(db)
            .await?;

        Ok(entries
            .into_iter()
            .map(|entry| CaseStatusHistoryResponse {
                id: entry.id,
                case_id: entry.case_id,
                status: entry.status,
                notes: entry.notes,
                changed_by: entry.changed_by,
                changed_at: entry.changed_at,
            })
            .collect())
    }

    #[instrument(skip(self), fields(case_id = %case_id))]
    pub async fn delete_case(&self, case_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let case = CaseEntity::find_by_id(case_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Case {} not found", case_id)))?;

        let txn = db.begin().await?;

        HistoryEntity::delete_many()
            .filter(case_status_history::Column::CaseId.eq(case_id))
            .exec(&txn)
            .await?;
        CaseEntity::delete_by_id(case.id).exec(&txn).await?;

        txn.commit().await?;

        info!(case_id = %case_id, "Case deleted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::CaseDeleted(case_id)).await {
                warn!(error = %e, case_id = %case_id, "Failed to send case deleted event");
            }
        }

        Ok(())
    }
}

fn model_to_response(model: case::Model) -> CaseResponse {
    CaseResponse {
        id: model.id,
        case_number: model.case_number,
        title: model.title,
        description: model.description,
        status: model.status,
        priority: model.priority,
        patient_id: model.patient_id,
        dentist_id: model.dentist_id,
        due_date: model.due_date,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// Parse a stored or wire status string.
pub fn parse_case_status(value: &str) -> Result<CaseStatus, ServiceError> {
    CaseStatus::from_str(value)
        .map_err(|_| ServiceError::InvalidStatus(format!("Unknown case status: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn statuses_use_snake_case_on_the_wire() {
        assert_eq!(CaseStatus::InProgress.to_string(), "in_progress");
        assert_eq!(CaseStatus::PendingReview.to_string(), "pending_review");
        assert_eq!(
            serde_json::to_string(&CaseStatus::PendingReview).unwrap(),
            "\"pending_review\""
        );
    }

    #[test]
    fn every_status_round_trips() {
        for status in CaseStatus::iter() {
            assert_eq!(parse_case_status(&status.to_string()).unwrap(), status);
        }
        assert!(parse_case_status("shipped").is_err());
    }

    #[test]
    fn case_number_format() {
        let number = format!("CASE-{}", Utc::now().timestamp_millis());
        assert!(number.starts_with("CASE-"));
        assert!(number[5..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn status_update_requires_notes() {
        let request = UpdateCaseStatusRequest {
            status: CaseStatus::InProgress,
            notes: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn priorities_round_trip() {
        for p in CasePriority::iter() {
            assert_eq!(CasePriority::from_str(&p.to_string()).unwrap(), p);
        }
    }
}
