//! The module contains the representation of a fund.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::distribution::FundShare;

/// A fund.
///
/// A fund is a named bucket that receives `percentage_bp` of every receipt
/// while it is active. Percentages of the active funds are expected to sum to
/// 100% but this is never enforced: the fund balance report shows the
/// difference instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fund {
    pub id: Uuid,
    pub name: String,
    pub percentage_bp: i64,
    pub active: bool,
    pub description: Option<String>,
}

impl Fund {
    /// The share this fund takes from a new receipt, if any.
    #[must_use]
    pub fn share(&self) -> Option<FundShare> {
        self.active.then_some(FundShare {
            fund_id: self.id,
            percentage_bp: self.percentage_bp,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "funds")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub name_norm: String,
    pub percentage_bp: i64,
    pub active: bool,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fund_distributions::Entity")]
    Distributions,
    #[sea_orm(has_many = "super::manual_distributions::Entity")]
    ManualDistributions,
}

impl Related<super::fund_distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Distributions.def()
    }
}

impl Related<super::manual_distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManualDistributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Fund {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            percentage_bp: value.percentage_bp,
            active: value.active,
            description: value.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_fund_takes_no_share() {
        let mut fund = Fund {
            id: Uuid::new_v4(),
            name: "Repairs".to_string(),
            percentage_bp: 2500,
            active: true,
            description: None,
        };
        assert_eq!(
            fund.share(),
            Some(FundShare {
                fund_id: fund.id,
                percentage_bp: 2500
            })
        );

        fund.active = false;
        assert_eq!(fund.share(), None);
    }
}
