use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    CategoryNew, CategoryUpdate, EngineError, ExpenseCategory, ResultEngine, categories, costs,
    nomenclature,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

pub(super) async fn require_category<C: ConnectionTrait>(
    db: &C,
    category_id: Uuid,
) -> ResultEngine<categories::Model> {
    categories::Entity::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
}

async fn ensure_unique_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    name_norm: &str,
    except: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query =
        categories::Entity::find().filter(categories::Column::NameNorm.eq(name_norm));
    if let Some(id) = except {
        query = query.filter(categories::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}

impl Engine {
    pub async fn create_category(&self, cmd: CategoryNew) -> ResultEngine<ExpenseCategory> {
        let (name, name_norm) = normalize_required_name(&cmd.name, "category")?;
        with_tx!(self, |db_tx| {
            ensure_unique_name(&db_tx, &name, &name_norm, None).await?;

            let model = categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                name_norm: ActiveValue::Set(name_norm),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
            };
            let model = model.insert(&db_tx).await?;
            Ok(ExpenseCategory::from(model))
        })
    }

    pub async fn category(&self, category_id: Uuid) -> ResultEngine<ExpenseCategory> {
        require_category(&self.database, category_id)
            .await
            .map(ExpenseCategory::from)
    }

    pub async fn list_categories(&self) -> ResultEngine<Vec<ExpenseCategory>> {
        let categories = categories::Entity::find()
            .order_by_asc(categories::Column::NameNorm)
            .all(&self.database)
            .await?
            .into_iter()
            .map(ExpenseCategory::from)
            .collect();
        Ok(categories)
    }

    pub async fn update_category(
        &self,
        category_id: Uuid,
        cmd: CategoryUpdate,
    ) -> ResultEngine<ExpenseCategory> {
        with_tx!(self, |db_tx| {
            let model = require_category(&db_tx, category_id).await?;
            let mut active: categories::ActiveModel = model.into();

            if let Some(name) = cmd.name.as_deref() {
                let (name, name_norm) = normalize_required_name(name, "category")?;
                ensure_unique_name(&db_tx, &name, &name_norm, Some(category_id)).await?;
                active.name = ActiveValue::Set(name);
                active.name_norm = ActiveValue::Set(name_norm);
            }
            if let Some(description) = cmd.description.as_deref() {
                active.description = ActiveValue::Set(normalize_optional_text(Some(description)));
            }

            let model = active.update(&db_tx).await?;
            Ok(ExpenseCategory::from(model))
        })
    }

    /// Delete a category no cost or nomenclature item refers to.
    pub async fn delete_category(&self, category_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_category(&db_tx, category_id).await?;
            let references = costs::Entity::find()
                .filter(costs::Column::CategoryId.eq(category_id))
                .count(&db_tx)
                .await?
                + nomenclature::Entity::find()
                    .filter(nomenclature::Column::CategoryId.eq(category_id))
                    .count(&db_tx)
                    .await?;
            if references > 0 {
                return Err(EngineError::InUse(model.name));
            }

            categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
