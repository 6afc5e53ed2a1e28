//! Nomenclature: the catalog of items costs can refer to.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "nomenclature")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub name_norm: String,
    pub unit: Option<String>,
    /// Category used for costs that name this item but no category.
    pub category_id: Option<Uuid>,
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
pub struct NomenclatureItem {
    pub id: Uuid,
    pub name: String,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
}

impl From<Model> for NomenclatureItem {
    fn from(value: Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            unit: value.unit,
            category_id: value.category_id,
        }
    }
}
