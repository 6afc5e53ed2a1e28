use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Cost, CostNew, CostUpdate, EngineError, MoneyCents, ResultEngine, costs,
    util::{DateRange, normalize_optional_text, validate_positive_amount},
};

use super::{
    Engine, categories::require_category, filter_date_range, funds::require_fund,
    nomenclature::require_item, with_tx,
};

pub(super) async fn require_cost<C: ConnectionTrait>(
    db: &C,
    cost_id: Uuid,
) -> ResultEngine<costs::Model> {
    costs::Entity::find_by_id(cost_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("cost not exists".to_string()))
}

/// Pick the category of a cost: the explicit one, else the nomenclature
/// item's default.
async fn resolve_category<C: ConnectionTrait>(
    db: &C,
    category_id: Option<Uuid>,
    nomenclature_id: Option<Uuid>,
) -> ResultEngine<Option<Uuid>> {
    let item_category = match nomenclature_id {
        Some(item_id) => require_item(db, item_id).await?.category_id,
        None => None,
    };
    let category_id = category_id.or(item_category);
    if let Some(category_id) = category_id {
        require_category(db, category_id).await?;
    }
    Ok(category_id)
}

impl Engine {
    pub async fn create_cost(&self, cmd: CostNew) -> ResultEngine<Cost> {
        validate_positive_amount(cmd.amount_minor, "cost")?;

        with_tx!(self, |db_tx| {
            let category_id = resolve_category(&db_tx, cmd.category_id, cmd.nomenclature_id)
                .await?
                .ok_or_else(|| {
                    EngineError::InvalidName("cost needs a category".to_string())
                })?;
            if let Some(fund_id) = cmd.fund_id {
                require_fund(&db_tx, fund_id).await?;
            }

            let model = costs::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                category_id: ActiveValue::Set(category_id),
                nomenclature_id: ActiveValue::Set(cmd.nomenclature_id),
                fund_id: ActiveValue::Set(cmd.fund_id),
                date: ActiveValue::Set(cmd.date),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = model.insert(&db_tx).await?;
            tracing::info!(
                cost = %model.id,
                amount = %MoneyCents::new(model.amount_minor),
                "cost recorded"
            );
            Ok(Cost::from(model))
        })
    }

    pub async fn cost(&self, cost_id: Uuid) -> ResultEngine<Cost> {
        require_cost(&self.database, cost_id).await.map(Cost::from)
    }

    /// Costs in `range`, newest first, optionally of one category.
    pub async fn list_costs(
        &self,
        range: DateRange,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Vec<Cost>> {
        range.validate()?;
        let mut query = filter_date_range(costs::Entity::find(), costs::Column::Date, &range);
        if let Some(category_id) = category_id {
            query = query.filter(costs::Column::CategoryId.eq(category_id));
        }
        let costs = query
            .order_by_desc(costs::Column::Date)
            .order_by_desc(costs::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Cost::from)
            .collect();
        Ok(costs)
    }

    /// Update a cost.
    ///
    /// Changing only the nomenclature item also moves the cost to the item's
    /// category when the item has one.
    pub async fn update_cost(&self, cost_id: Uuid, cmd: CostUpdate) -> ResultEngine<Cost> {
        if let Some(amount_minor) = cmd.amount_minor {
            validate_positive_amount(amount_minor, "cost")?;
        }

        with_tx!(self, |db_tx| {
            let model = require_cost(&db_tx, cost_id).await?;
            let mut active: costs::ActiveModel = model.into();

            if let Some(amount_minor) = cmd.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(date) = cmd.date {
                active.date = ActiveValue::Set(date);
            }
            if cmd.category_id.is_some() || cmd.nomenclature_id.is_some() {
                if let Some(category_id) =
                    resolve_category(&db_tx, cmd.category_id, cmd.nomenclature_id).await?
                {
                    active.category_id = ActiveValue::Set(category_id);
                }
                if let Some(item_id) = cmd.nomenclature_id {
                    active.nomenclature_id = ActiveValue::Set(Some(item_id));
                }
            }
            if let Some(fund_id) = cmd.fund_id {
                require_fund(&db_tx, fund_id).await?;
                active.fund_id = ActiveValue::Set(Some(fund_id));
            }
            if let Some(description) = cmd.description.as_deref() {
                active.description = ActiveValue::Set(normalize_optional_text(Some(description)));
            }

            let model = active.update(&db_tx).await?;
            Ok(Cost::from(model))
        })
    }

    pub async fn delete_cost(&self, cost_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_cost(&db_tx, cost_id).await?;
            costs::Entity::delete_by_id(cost_id).exec(&db_tx).await?;
            tracing::info!(cost = %cost_id, "cost deleted");
            Ok(())
        })
    }
}
