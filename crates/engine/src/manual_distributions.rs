//! Manual allocations of unallocated money into a single fund.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "manual_fund_distributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub fund_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::funds::Entity",
        from = "Column::FundId",
        to = "super::funds::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Fund,
}

impl Related<super::funds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fund.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualDistribution {
    pub id: Uuid,
    pub fund_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for ManualDistribution {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            fund_id: value.fund_id,
            amount_minor: value.amount_minor,
            date: value.date,
            note: value.note,
            created_at: value.created_at,
        }
    }
}
