use sea_orm::{
    ActiveValue, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, Fund, FundNew, FundShare, FundUpdate, ResultEngine, costs, fund_distributions,
    fund_transfers, funds, manual_distributions,
    util::{normalize_optional_text, normalize_required_name, validate_percentage},
};

use super::{Engine, with_tx};

pub(super) async fn require_fund<C: ConnectionTrait>(
    db: &C,
    fund_id: Uuid,
) -> ResultEngine<funds::Model> {
    funds::Entity::find_by_id(fund_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("fund not exists".to_string()))
}

/// All funds, ordered by name.
pub(super) async fn all_funds<C: ConnectionTrait>(db: &C) -> ResultEngine<Vec<Fund>> {
    let funds = funds::Entity::find()
        .order_by_asc(funds::Column::NameNorm)
        .all(db)
        .await?
        .into_iter()
        .map(Fund::from)
        .collect();
    Ok(funds)
}

/// Shares of the currently active funds, in name order.
pub(super) async fn active_shares<C: ConnectionTrait>(db: &C) -> ResultEngine<Vec<FundShare>> {
    Ok(all_funds(db)
        .await?
        .iter()
        .filter_map(Fund::share)
        .collect())
}

async fn ensure_unique_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    name_norm: &str,
    except: Option<Uuid>,
) -> ResultEngine<()> {
    let mut query = funds::Entity::find().filter(funds::Column::NameNorm.eq(name_norm));
    if let Some(id) = except {
        query = query.filter(funds::Column::Id.ne(id));
    }
    if query.one(db).await?.is_some() {
        return Err(EngineError::ExistingKey(name.to_string()));
    }
    Ok(())
}

impl Engine {
    pub async fn create_fund(&self, cmd: FundNew) -> ResultEngine<Fund> {
        let (name, name_norm) = normalize_required_name(&cmd.name, "fund")?;
        validate_percentage(cmd.percentage_bp)?;

        with_tx!(self, |db_tx| {
            ensure_unique_name(&db_tx, &name, &name_norm, None).await?;

            let model = funds::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                name: ActiveValue::Set(name),
                name_norm: ActiveValue::Set(name_norm),
                percentage_bp: ActiveValue::Set(cmd.percentage_bp),
                active: ActiveValue::Set(cmd.active),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
            };
            let model = model.insert(&db_tx).await?;
            tracing::info!(fund = %model.name, percentage_bp = model.percentage_bp, "fund created");
            Ok(Fund::from(model))
        })
    }

    pub async fn fund(&self, fund_id: Uuid) -> ResultEngine<Fund> {
        require_fund(&self.database, fund_id).await.map(Fund::from)
    }

    /// Funds ordered by name; inactive ones only when asked for.
    pub async fn list_funds(&self, include_inactive: bool) -> ResultEngine<Vec<Fund>> {
        let funds = all_funds(&self.database).await?;
        Ok(funds
            .into_iter()
            .filter(|fund| include_inactive || fund.active)
            .collect())
    }

    /// Update a fund.
    ///
    /// Percentage changes only affect receipts recorded afterwards: existing
    /// distributions keep the percentage they were created with.
    pub async fn update_fund(&self, fund_id: Uuid, cmd: FundUpdate) -> ResultEngine<Fund> {
        if let Some(percentage_bp) = cmd.percentage_bp {
            validate_percentage(percentage_bp)?;
        }

        with_tx!(self, |db_tx| {
            let model = require_fund(&db_tx, fund_id).await?;
            let mut active: funds::ActiveModel = model.into();

            if let Some(name) = cmd.name.as_deref() {
                let (name, name_norm) = normalize_required_name(name, "fund")?;
                ensure_unique_name(&db_tx, &name, &name_norm, Some(fund_id)).await?;
                active.name = ActiveValue::Set(name);
                active.name_norm = ActiveValue::Set(name_norm);
            }
            if let Some(percentage_bp) = cmd.percentage_bp {
                active.percentage_bp = ActiveValue::Set(percentage_bp);
            }
            if let Some(is_active) = cmd.active {
                active.active = ActiveValue::Set(is_active);
            }
            if let Some(description) = cmd.description.as_deref() {
                active.description = ActiveValue::Set(normalize_optional_text(Some(description)));
            }

            let model = active.update(&db_tx).await?;
            Ok(Fund::from(model))
        })
    }

    /// Delete a fund with no history.
    ///
    /// Funds that received money, were part of a transfer or paid a cost must
    /// be deactivated instead.
    pub async fn delete_fund(&self, fund_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = require_fund(&db_tx, fund_id).await?;

            let references = fund_distributions::Entity::find()
                .filter(fund_distributions::Column::FundId.eq(fund_id))
                .count(&db_tx)
                .await?
                + manual_distributions::Entity::find()
                    .filter(manual_distributions::Column::FundId.eq(fund_id))
                    .count(&db_tx)
                    .await?
                + fund_transfers::Entity::find()
                    .filter(
                        fund_transfers::Column::FromFundId
                            .eq(fund_id)
                            .or(fund_transfers::Column::ToFundId.eq(fund_id)),
                    )
                    .count(&db_tx)
                    .await?
                + costs::Entity::find()
                    .filter(costs::Column::FundId.eq(fund_id))
                    .count(&db_tx)
                    .await?;
            if references > 0 {
                return Err(EngineError::InUse(model.name));
            }

            funds::Entity::delete_by_id(fund_id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
