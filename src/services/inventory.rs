use crate::{
    db::DbPool,
    entities::inventory_category::{
        self, ActiveModel as CategoryActiveModel, Entity as CategoryEntity,
    },
    entities::inventory_item::{self, ActiveModel as ItemActiveModel, Entity as ItemEntity},
    entities::supplier::{self, ActiveModel as SupplierActiveModel, Entity as SupplierEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryItemRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: i32,
    pub unit_price: Decimal,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateInventoryItemRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    pub unit: Option<String>,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RestockRequest {
    pub item_id: Uuid,
    #[validate(range(min = 1, message = "Restock quantity must be positive"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    pub contact_person: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InventoryItemResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit: String,
    pub reorder_level: i32,
    pub unit_price: Decimal,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub last_ordered: Option<chrono::NaiveDate>,
    /// Derived: quantity at or below the reorder level
    pub low_stock: bool,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: Option<chrono::DateTime<Utc>>,
}

impl From<inventory_item::Model> for InventoryItemResponse {
    fn from(item: inventory_item::Model) -> Self {
        let low_stock = item.is_low_stock();
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            quantity: item.quantity,
            unit: item.unit,
            reorder_level: item.reorder_level,
            unit_price: item.unit_price,
            category_id: item.category_id,
            supplier_id: item.supplier_id,
            last_ordered: item.last_ordered,
            low_stock,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Service for lab materials: stock levels, categories and suppliers
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: Option<Arc<EventSender>>,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_item(
        &self,
        request: CreateInventoryItemRequest,
    ) -> Result<InventoryItemResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let item_id = Uuid::new_v4();

        let created = ItemActiveModel {
            id: Set(item_id),
            name: Set(request.name),
            description: Set(request.description),
            quantity: Set(request.quantity),
            unit: Set(request.unit),
            reorder_level: Set(request.reorder_level),
            unit_price: Set(request.unit_price),
            category_id: Set(request.category_id),
            supplier_id: Set(request.supplier_id),
            last_ordered: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?;

        info!(item_id = %item_id, name = %created.name, "Inventory item created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::InventoryItemCreated(item_id)).await {
                warn!(error = %e, item_id = %item_id, "Failed to send item created event");
            }
        }
        self.alert_if_low(&created).await;

        Ok(created.into())
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn get_item(&self, item_id: Uuid) -> Result<InventoryItemResponse, ServiceError> {
        let db = &*self.db_pool;
        let item = ItemEntity::find_by_id(item_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", item_id))
            })?;
        Ok(item.into())
    }

    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<InventoryItemResponse>, ServiceError> {
        let db = &*self.db_pool;
        let items = ItemEntity::find()
            .order_by_asc(inventory_item::Column::Name)
            .all(db)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    /// Items whose quantity has fallen to or below their reorder level.
    #[instrument(skip(self))]
    pub async fn list_low_stock(&self) -> Result<Vec<InventoryItemResponse>, ServiceError> {
        let db = &*self.db_pool;
        let items = ItemEntity::find()
            .filter(
                sea_orm::sea_query::Expr::col(inventory_item::Column::Quantity).lte(
                    sea_orm::sea_query::Expr::col(inventory_item::Column::ReorderLevel),
                ),
            )
            .order_by_asc(inventory_item::Column::Name)
            .all(db)
            .await?;
        Ok(items.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, request), fields(item_id = %item_id))]
    pub async fn update_item(
        &self,
        item_id: Uuid,
        request: UpdateInventoryItemRequest,
    ) -> Result<InventoryItemResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let item = ItemEntity::find_by_id(item_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", item_id))
            })?;

        let mut active: ItemActiveModel = item.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(quantity) = request.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(unit) = request.unit {
            active.unit = Set(unit);
        }
        if let Some(reorder_level) = request.reorder_level {
            active.reorder_level = Set(reorder_level);
        }
        if let Some(unit_price) = request.unit_price {
            active.unit_price = Set(unit_price);
        }
        if let Some(category_id) = request.category_id {
            active.category_id = Set(Some(category_id));
        }
        if let Some(supplier_id) = request.supplier_id {
            active.supplier_id = Set(Some(supplier_id));
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::InventoryItemUpdated(item_id)).await {
                warn!(error = %e, item_id = %item_id, "Failed to send item updated event");
            }
        }
        self.alert_if_low(&updated).await;

        Ok(updated.into())
    }

    /// Adds stock to an item and stamps the order date.
    #[instrument(skip(self, request), fields(item_id = %request.item_id, quantity = request.quantity))]
    pub async fn restock(
        &self,
        request: RestockRequest,
    ) -> Result<InventoryItemResponse, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let item = ItemEntity::find_by_id(request.item_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", request.item_id))
            })?;

        let new_quantity = item.quantity.checked_add(request.quantity).ok_or_else(|| {
            ServiceError::ValidationError(format!(
                "Restocking {} would overflow the stock level",
                request.quantity
            ))
        })?;
        let mut active: ItemActiveModel = item.into();
        active.quantity = Set(new_quantity);
        active.last_ordered = Set(Some(Utc::now().date_naive()));
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(db).await?;

        info!(item_id = %request.item_id, added = request.quantity, new_quantity, "Inventory restocked");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::InventoryRestocked {
                    item_id: request.item_id,
                    quantity_added: request.quantity,
                    new_quantity,
                })
                .await
            {
                warn!(error = %e, item_id = %request.item_id, "Failed to send restock event");
            }
        }

        Ok(updated.into())
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_item(&self, item_id: Uuid) -> Result<(), ServiceError> {
        let db = &*self.db_pool;
        let item = ItemEntity::find_by_id(item_id)
            .one(db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory item {} not found", item_id))
            })?;

        ItemEntity::delete_by_id(item.id).exec(db).await?;

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::InventoryItemDeleted(item_id)).await {
                warn!(error = %e, item_id = %item_id, "Failed to send item deleted event");
            }
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<inventory_category::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(CategoryEntity::find()
            .order_by_asc(inventory_category::Column::Name)
            .all(db)
            .await?)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<inventory_category::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        let existing = CategoryEntity::find()
            .filter(inventory_category::Column::Name.eq(request.name.clone()))
            .one(db)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Category {} already exists",
                request.name
            )));
        }

        Ok(CategoryActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            description: Set(request.description),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?)
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        let db = &*self.db_pool;
        Ok(SupplierEntity::find()
            .order_by_asc(supplier::Column::Name)
            .all(db)
            .await?)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_supplier(
        &self,
        request: CreateSupplierRequest,
    ) -> Result<supplier::Model, ServiceError> {
        request.validate()?;

        let db = &*self.db_pool;
        Ok(SupplierActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            contact_person: Set(request.contact_person),
            email: Set(request.email),
            phone: Set(request.phone),
            address: Set(request.address),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await?)
    }

    async fn alert_if_low(&self, item: &inventory_item::Model) {
        if !item.is_low_stock() {
            return;
        }
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::LowStock {
                    item_id: item.id,
                    quantity: item.quantity,
                    reorder_level: item.reorder_level,
                })
                .await
            {
                warn!(error = %e, item_id = %item.id, "Failed to send low stock event");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn restock_quantity_must_be_positive() {
        let request = RestockRequest {
            item_id: Uuid::new_v4(),
            quantity: 0,
        };
        assert!(request.validate().is_err());

        let request = RestockRequest {
            item_id: Uuid::new_v4(),
            quantity: -5,
        };
        assert!(request.validate().is_err());

        let request = RestockRequest {
            item_id: Uuid::new_v4(),
            quantity: 25,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn new_item_rejects_negative_stock() {
        let request = CreateInventoryItemRequest {
            name: "Alginate".to_string(),
            description: None,
            quantity: -1,
            unit: "kg".to_string(),
            reorder_level: 2,
            unit_price: dec!(15.00),
            category_id: None,
            supplier_id: None,
        };
        assert!(request.validate().is_err());
    }
}
