use crate::{
    db::DbPool,
    entities::dentist::{self, ActiveModel as DentistActiveModel, Entity as DentistEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDentistRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub clinic_name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DentistResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub clinic_name: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<dentist::Model> for DentistResponse {
    fn from(model: dentist::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            clinic_name: model.clinic_name,
            address: model.address,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Service for the referring-dentist directory
#[derive(Clone)]
pub struct DentistService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl DentistService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn create_dentist(
        &self,
        request: CreateDentistRequest,
    ) -> Result<DentistResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let dentist_id = Uuid::new_v4();

        let created = DentistActiveModel {
            id: Set(dentist_id),
            first_name: Set(request.first_name),
            last_name: Set(request.last_name),
            email: Set(request.email),
            phone: Set(request.phone),
            clinic_name: Set(request.clinic_name),
            address: Set(request.address),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?;

        info!(dentist_id = %dentist_id, "Dentist created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::DentistCreated(dentist_id)).await {
                warn!(error = %e, dentist_id = %dentist_id, "Failed to send dentist created event");
            }
        }

        Ok(created.into())
    }

    #[instrument(skip(self), fields(dentist_id = %dentist_id))]
    pub async fn get_dentist(&self, dentist_id: Uuid) -> Result<DentistResponse, ServiceError> {
        let db = &*self.db_pool;
        let dentist = DentistEntity::find_by_id(dentist_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Dentist {} not found", dentist_id)))?;
        Ok(dentist.into())
    }

    #[instrument(skip(self))]
    pub async fn list_dentists(&self) -> Result<Vec<DentistResponse>, ServiceError> {
        let db = &*self.db_pool;
        let dentists = DentistEntity::find()
            .order_by_asc(dentist::Column::LastName)
            .all(db)
            .await?;
        Ok(dentists.into_iter().map(Into::into).collect())
    }
}
