use crate::{
    db::DbPool,
    entities::case::Entity as CaseEntity,
    entities::message::{self, ActiveModel as MessageActiveModel, Entity as MessageEntity},
    entities::user::{self, Entity as UserEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    pub case_id: Uuid,
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 4000, message = "Message content is required"))]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    pub case_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub read: bool,
    pub sent_at: DateTime<Utc>,
}

impl From<message::Model> for MessageResponse {
    fn from(model: message::Model) -> Self {
        Self {
            id: model.id,
            case_id: model.case_id,
            sender_id: model.sender_id,
            recipient_id: model.recipient_id,
            content: model.content,
            read: model.read,
            sent_at: model.sent_at,
        }
    }
}

/// A user another account can message, derived from the users table
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

/// Service for per-case messaging between lab staff and dentists
#[derive(Clone)]
pub struct MessageService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl MessageService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Sends a message on a case. `sent_at` is stamped server-side and
    /// messages start unread.
    #[instrument(skip(self, request), fields(case_id = %request.case_id, sender_id = %sender_id))]
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        request: SendMessageRequest,
    ) -> Result<MessageResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;

        CaseEntity::find_by_id(request.case_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Case {} not found", request.case_id))
            })?;

        UserEntity::find_by_id(request.recipient_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Recipient {} not found", request.recipient_id))
            })?;

        let message_id = Uuid::new_v4();
        let created = MessageActiveModel {
            id: Set(message_id),
            case_id: Set(request.case_id),
            sender_id: Set(sender_id),
            recipient_id: Set(request.recipient_id),
            content: Set(request.content),
            read: Set(false),
            sent_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;

        info!(message_id = %message_id, case_id = %created.case_id, "Message sent");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::MessageSent {
                    message_id,
                    case_id: created.case_id,
                    recipient_id: created.recipient_id,
                })
                .await
            {
                warn!(error = %e, message_id = %message_id, "Failed to send message event");
            }
        }

        Ok(created.into())
    }

    /// Message thread for a case, oldest first.
    #[instrument(skip(self), fields(case_id = %case_id))]
    pub async fn list_for_case(&self, case_id: Uuid) -> Result<Vec<MessageResponse>, ServiceError> {
        let db = &*self.db_pool;

        CaseEntity::find_by_id(case_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Case {} not found", case_id)))?;

        let messages = MessageEntity::find()
            .filter(message::Column::CaseId.eq(case_id))
            .order_by_asc(message::Column::SentAt)
            .all(db)
            .await?;

        Ok(messages.into_iter().map(Into::into).collect())
    }

    /// All active accounts except the caller, for the contact picker.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_contacts(&self, user_id: Uuid) -> Result<Vec<ContactResponse>, ServiceError> {
        let db = &*self.db_pool;

        let users = UserEntity::find()
            .filter(user::Column::Id.ne(user_id))
            .filter(user::Column::Active.eq(true))
            .order_by_asc(user::Column::Username)
            .all(db)
            .await?;

        Ok(users
            .into_iter()
            .map(|u| ContactResponse {
                id: u.id,
                username: u.username,
                first_name: u.first_name,
                last_name: u.last_name,
                role: u.role,
            })
            .collect())
    }
}
