use crate::{
    db::DbPool,
    entities::appointment::{
        self, ActiveModel as AppointmentActiveModel, Entity as AppointmentEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub dentist_id: Uuid,
    pub case_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    /// Wall-clock time as "HH:MM"
    #[validate(length(min = 5, max = 5, message = "Time must be in HH:MM format"))]
    pub appointment_time: String,
    #[validate(length(min = 1, message = "Appointment type is required"))]
    pub appointment_type: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateAppointmentRequest {
    pub appointment_date: Option<NaiveDate>,
    #[validate(length(min = 5, max = 5, message = "Time must be in HH:MM format"))]
    pub appointment_time: Option<String>,
    pub appointment_type: Option<String>,
    /// One of "scheduled", "completed", "cancelled"
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentResponse {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub dentist_id: Uuid,
    pub case_id: Option<Uuid>,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub appointment_type: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<appointment::Model> for AppointmentResponse {
    fn from(model: appointment::Model) -> Self {
        Self {
            id: model.id,
            patient_id: model.patient_id,
            dentist_id: model.dentist_id,
            case_id: model.case_id,
            appointment_date: model.appointment_date,
            appointment_time: model.appointment_time,
            appointment_type: model.appointment_type,
            status: model.status,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

const APPOINTMENT_STATUSES: [&str; 3] = ["scheduled", "completed", "cancelled"];

/// Service for fitting/consultation appointments
#[derive(Clone)]
pub struct AppointmentService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl AppointmentService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(patient_id = %request.patient_id, dentist_id = %request.dentist_id))]
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<AppointmentResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let appointment_id = Uuid::new_v4();

        let created = AppointmentActiveModel {
            id: Set(appointment_id),
            patient_id: Set(request.patient_id),
            dentist_id: Set(request.dentist_id),
            case_id: Set(request.case_id),
            appointment_date: Set(request.appointment_date),
            appointment_time: Set(request.appointment_time),
            appointment_type: Set(request.appointment_type),
            status: Set("scheduled".to_string()),
            notes: Set(request.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?;

        info!(appointment_id = %appointment_id, "Appointment scheduled");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::AppointmentScheduled(appointment_id))
                .await
            {
                warn!(error = %e, appointment_id = %appointment_id, "Failed to send appointment event");
            }
        }

        Ok(created.into())
    }

    #[instrument(skip(self), fields(appointment_id = %appointment_id))]
    pub async fn get_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<AppointmentResponse, ServiceError> {
        let db = &*self.db_pool;
        let appointment = AppointmentEntity::find_by_id(appointment_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Appointment {} not found", appointment_id))
            })?;
        Ok(appointment.into())
    }

    #[instrument(skip(self))]
    pub async fn list_appointments(&self) -> Result<Vec<AppointmentResponse>, ServiceError> {
        let db = &*self.db_pool;
        let appointments = AppointmentEntity::find()
            .order_by_asc(appointment::Column::AppointmentDate)
            .order_by_asc(appointment::Column::AppointmentTime)
            .all(db)
            .await?;
        Ok(appointments.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), fields(dentist_id = %dentist_id))]
    pub async fn list_for_dentist(
        &self,
        dentist_id: Uuid,
    ) -> Result<Vec<AppointmentResponse>, ServiceError> {
        self.list_filtered(appointment::Column::DentistId.eq(dentist_id))
            .await
    }

    #[instrument(skip(self), fields(patient_id = %patient_id))]
    pub async fn list_for_patient(
        &self,
        patient_id: Uuid,
    ) -> Result<Vec<AppointmentResponse>, ServiceError> {
        self.list_filtered(appointment::Column::PatientId.eq(patient_id))
            .await
    }

    #[instrument(skip(self), fields(date = %date))]
    pub async fn list_for_date(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentResponse>, ServiceError> {
        self.list_filtered(appointment::Column::AppointmentDate.eq(date))
            .await
    }

    async fn list_filtered(
        &self,
        condition: sea_orm::sea_query::SimpleExpr,
    ) -> Result<Vec<AppointmentResponse>, ServiceError> {
        let db = &*self.db_pool;
        let appointments = AppointmentEntity::find()
            .filter(condition)
            .order_by_asc(appointment::Column::AppointmentDate)
            .order_by_asc(appointment::Column::AppointmentTime)
            .all(db)
            .await?;
        Ok(appointments.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, request), fields(appointment_id = %appointment_id))]
    pub async fn update_appointment(
        &self,
        appointment_id: Uuid,
        request: UpdateAppointmentRequest,
    ) -> Result<AppointmentResponse, ServiceError> {
        request.validate()?;

        if let Some(status) = &request.status {
            if !APPOINTMENT_STATUSES.contains(&status.as_str()) {
                return Err(ServiceError::InvalidStatus(format!(
                    "Unknown appointment status: {}",
                    status
                )));
            }
        }

        let db = &*self.db_pool;
        let appointment = AppointmentEntity::find_by_id(appointment_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Appointment {} not found", appointment_id))
            })?;

        let cancelled = request.status.as_deref() == Some("cancelled");

        let mut active: AppointmentActiveModel = appointment.into();
        if let Some(date) = request.appointment_date {
            active.appointment_date = Set(date);
        }
        if let Some(time) = request.appointment_time {
            active.appointment_time = Set(time);
        }
        if let Some(appointment_type) = request.appointment_type {
            active.appointment_type = Set(appointment_type);
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        if let Some(event_sender) = &self.event_sender {
            let event = if cancelled {
                Event::AppointmentCancelled(appointment_id)
            } else {
                Event::AppointmentUpdated(appointment_id)
            };
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, appointment_id = %appointment_id, "Failed to send appointment event");
            }
        }

        Ok(updated.into())
    }

    #[instrument(skip(self), fields(appointment_id = %appointment_id))]
    pub async fn delete_appointment(&self, appointment_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let appointment = AppointmentEntity::find_by_id(appointment_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Appointment {} not found", appointment_id))
            })?;

        AppointmentEntity::delete_by_id(appointment.id).exec(db).await?;
        info!(appointment_id = %appointment_id, "Appointment deleted");
        Ok(())
    }
}
