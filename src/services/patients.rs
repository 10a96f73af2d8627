use crate::{
    db::DbPool,
    entities::patient::{self, ActiveModel as PatientActiveModel, Entity as PatientEntity},
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
pub struct CreatePatientRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub dentist_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePatientRequest {
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub dentist_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub dentist_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<patient::Model> for PatientResponse {
    fn from(model: patient::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            date_of_birth: model.date_of_birth,
            dentist_id: model.dentist_id,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Service for patient records
#[derive(Clone)]
pub struct PatientService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl PatientService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_patient(
        &self,
        request: CreatePatientRequest,
    ) -> Result<PatientResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let patient_id = Uuid::new_v4();

        let created = PatientActiveModel {
            id: Set(patient_id),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            email: Set(request.email),
            phone: Set(request.phone),
            date_of_birth: Set(request.date_of_birth),
            dentist_id: Set(request.dentist_id),
            notes: Set(request.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?;

        info!(patient_id = %patient_id, "Patient created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::PatientCreated(patient_id)).await {
                warn!(error = %e, patient_id = %patient_id, "Failed to send patient created event");
            }
        }

        Ok(created.into())
    }

    #[instrument(skip(self), fields(patient_id = %patient_id))]
    pub async fn get_patient(&self, patient_id: Uuid) -> Result<PatientResponse, ServiceError> {
        let db = &*self.db_pool;
        let patient = PatientEntity::find_by_id(patient_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Patient {} not found", patient_id)))?;
        Ok(patient.into())
    }

    #[instrument(skip(self))]
    pub async fn list_patients(&self) -> Result<Vec<PatientResponse>, ServiceError> {
        let db = &*self.db_pool;
        let patients = PatientEntity::find()
            .order_by_asc(patient::Column::LastName)
            .all(db)
            .await?;
        Ok(patients.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), fields(dentist_id = %dentist_id))]
    pub async fn list_patients_for_dentist(
        &self,
        dentist_id: Uuid,
    ) -> Result<Vec<PatientResponse>, ServiceError> {
        let db = &*self.db_pool;
        let patients = PatientEntity::find()
            .filter(patient::Column::DentistId.eq(dentist_id))
            .order_by_asc(patient::Column::LastName)
            .all(db)
            .await?;
        Ok(patients.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, request), fields(patient_id = %patient_id))]
    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<PatientResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let patient = PatientEntity::find_by_id(patient_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Patient {} not found", patient_id)))?;

        let mut active: PatientActiveModel = patient.into();
        if let Some(first_name) = request.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = request.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(email) = request.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(date_of_birth) = request.date_of_birth {
            active.date_of_birth = Set(Some(date_of_birth));
        }
        if let Some(dentist_id) = request.dentist_id {
            active.dentist_id = Set(Some(dentist_id));
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::PatientUpdated(patient_id)).await {
                warn!(error = %e, patient_id = %patient_id, "Failed to send patient updated event");
            }
        }

        Ok(updated.into())
    }

    #[instrument(skip(self), fields(patient_id = %patient_id))]
    pub async fn delete_patient(&self, patient_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let patient = PatientEntity::find_by_id(patient_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Patient {} not found", patient_id)))?;

        PatientEntity::delete_by_id(patient.id).exec(db).await?;
        info!(patient_id = %patient_id, "Patient deleted");
        Ok(())
    }
}
