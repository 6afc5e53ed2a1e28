//! Costs: money going out.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "costs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub amount_minor: i64,
    pub category_id: Uuid,
    pub nomenclature_id: Option<Uuid>,
    pub fund_id: Option<Uuid>,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cost {
    pub id: Uuid,
    pub amount_minor: i64,
    pub category_id: Uuid,
    pub nomenclature_id: Option<Uuid>,
    pub fund_id: Option<Uuid>,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for Cost {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            amount_minor: value.amount_minor,
            category_id: value.category_id,
            nomenclature_id: value.nomenclature_id,
            fund_id: value.fund_id,
            date: value.date,
            description: value.description,
            created_at: value.created_at,
        }
    }
}
