use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "inventory_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    pub description: Option<String>,
    pub quantity: i32,
    /// Unit of measure, e.g. "pcs", "g", "ml"
    pub unit: String,
    /// Stock at or below this level is considered low
    pub reorder_level: i32,
    pub unit_price: Decimal,
    pub category_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub last_ordered: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Low stock is derived, never stored.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_category::Entity",
        from = "Column::CategoryId",
        to = "super::inventory_category::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::Id"
    )]
    Supplier,
}

impl Related<super::inventory_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn item(quantity: i32, reorder_level: i32) -> Model {
        Model {
            id: Uuid::new_v4(),
            name: "Zirconia block".into(),
            description: None,
            quantity,
            unit: "pcs".into(),
            reorder_level,
            unit_price: dec!(42.00),
            category_id: None,
            supplier_id: None,
            last_ordered: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn low_stock_at_or_below_reorder_level() {
        assert!(item(3, 5).is_low_stock());
        assert!(item(5, 5).is_low_stock());
        assert!(!item(6, 5).is_low_stock());
        assert!(item(0, 0).is_low_stock());
    }
}
