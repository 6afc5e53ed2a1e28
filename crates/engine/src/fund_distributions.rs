//! Automatic distributions created alongside a receipt.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "fund_distributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub receipt_id: Uuid,
    pub fund_id: Uuid,
    /// Percentage of the fund when the receipt was recorded.
    pub percentage_bp: i64,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::receipts::Entity",
        from = "Column::ReceiptId",
        to = "super::receipts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Receipt,
    #[sea_orm(
        belongs_to = "super::funds::Entity",
        from = "Column::FundId",
        to = "super::funds::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Fund,
}

impl Related<super::receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Receipt.def()
    }
}

impl Related<super::funds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fund.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundDistribution {
    pub id: Uuid,
    pub receipt_id: Uuid,
    pub fund_id: Uuid,
    pub percentage_bp: i64,
    pub amount_minor: i64,
}

impl From<Model> for FundDistribution {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            receipt_id: value.receipt_id,
            fund_id: value.fund_id,
            percentage_bp: value.percentage_bp,
            amount_minor: value.amount_minor,
        }
    }
}
