//! Transfers of already allocated money between two funds.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fund_transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub from_fund_id: Uuid,
    pub to_fund_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundTransfer {
    pub id: Uuid,
    pub from_fund_id: Uuid,
    pub to_fund_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for FundTransfer {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            from_fund_id: value.from_fund_id,
            to_fund_id: value.to_fund_id,
            amount_minor: value.amount_minor,
            date: value.date,
            note: value.note,
            created_at: value.created_at,
        }
    }
}
