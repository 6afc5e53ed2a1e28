//! Receipts: money coming in.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::FundDistribution;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub sponsor_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sponsors::Entity",
        from = "Column::SponsorId",
        to = "super::sponsors::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Sponsor,
    #[sea_orm(has_many = "super::fund_distributions::Entity")]
    Distributions,
}

impl Related<super::sponsors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sponsor.def()
    }
}

impl Related<super::fund_distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Distributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub sponsor_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for Receipt {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            amount_minor: value.amount_minor,
            date: value.date,
            sponsor_id: value.sponsor_id,
            description: value.description,
            created_at: value.created_at,
        }
    }
}

/// A receipt together with the automatic distributions it produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceiptDetail {
    pub receipt: Receipt,
    pub distributions: Vec<FundDistribution>,
}

impl ReceiptDetail {
    /// The part of the receipt no fund received.
    #[must_use]
    pub fn undistributed_minor(&self) -> i64 {
        self.receipt.amount_minor
            - self
                .distributions
                .iter()
                .map(|d| d.amount_minor)
                .sum::<i64>()
    }
}
