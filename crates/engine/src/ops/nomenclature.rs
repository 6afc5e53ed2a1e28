use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, NomenclatureItem, NomenclatureNew, NomenclatureUpdate, ResultEngine, costs,
    nomenclature,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, categories::require_category, with_tx};

pub(super) async fn require_item<C: ConnectionTrait>(
    db: &C,
    item_id: Uuid,
) -> ResultEngine<nomenclature::Model> {
    nomenclature::Entity::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("nomenclature item not exists".to_string()))
}

async fn ensure_unique_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    name_norm: &str,
    except: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query =
        nomenclature::Entity::find().filter(nomenclature::Column::NameNorm.eq(name_norm));
    if let Some(id) = except {
        query = query.filter(nomenclature::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}

impl Engine {
    pub async fn create_nomenclature(
        &self,
        cmd: NomenclatureNew,
    ) -> ResultEngine<NomenclatureItem> {
        let (name, name_norm) = normalize_required_name(&cmd.name, "nomenclature")?;
        with_tx!(self, |db_tx| {
            ensure_unique_name(&db_tx, &name, &name_norm, None).await?;
            if let Some(category_id) = cmd.category_id {
                require_category(&db_tx, category_id).await?;
            }

            let model = nomenclature::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                name_norm: ActiveValue::Set(name_norm),
                unit: ActiveValue::Set(normalize_optional_text(cmd.unit.as_deref())),
                category_id: ActiveValue::Set(cmd.category_id),
            };
            let model = model.insert(&db_tx).await?;
            Ok(NomenclatureItem::from(model))
        })
    }

    pub async fn nomenclature_item(&self, item_id: Uuid) -> ResultEngine<NomenclatureItem> {
        require_item(&self.database, item_id)
            .await
            .map(NomenclatureItem::from)
    }

    /// Items ordered by name, optionally only those of one category.
    pub async fn list_nomenclature(
        &self,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Vec<NomenclatureItem>> {
        let mut query = nomenclature::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(nomenclature::Column::CategoryId.eq(category_id));
        }
        let items = query
            .order_by_asc(nomenclature::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(NomenclatureItem::from)
            .collect();
        Ok(items)
    }

    pub async fn update_nomenclature(
        &self,
        item_id: Uuid,
        cmd: NomenclatureUpdate,
    ) -> ResultEngine<NomenclatureItem> {
        with_tx!(self, |db_tx| {
            let model = require_item(&db_tx, item_id).await?;
            let mut active: nomenclature::ActiveModel = model.into();

            if let Some(name) = cmd.name.as_deref() {
                let (name, name_norm) = normalize_required_name(name, "nomenclature")?;
                ensure_unique_name(&db_tx, &name, &name_norm, Some(item_id)).await?;
                active.name = ActiveValue::Set(name);
                active.name_norm = ActiveValue::Set(name_norm);
            }
            if let Some(unit) = cmd.unit.as_deref() {
                active.unit = ActiveValue::Set(normalize_optional_text(Some(unit)));
            }
            if let Some(category_id) = cmd.category_id {
                require_category(&db_tx, category_id).await?;
                active.category_id = ActiveValue::Set(Some(category_id));
            }

            let model = active.update(&db_tx).await?;
            Ok(NomenclatureItem::from(model))
        })
    }

    /// Delete an item no cost refers to.
    pub async fn delete_nomenclature(&self, item_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_item(&db_tx, item_id).await?;
            let references = costs::Entity::find()
                .filter(costs::Column::NomenclatureId.eq(item_id))
                .count(&db_tx)
                .await?;
            if references > 0 {
                return Err(EngineError::InUse(model.name));
            }

            nomenclature::Entity::delete_by_id(item_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
