use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, ManualDistribution, ManualDistributionNew, ManualDistributionUpdate, MoneyCents,
    ResultEngine, UnallocatedBalance, fund_distributions, manual_distributions, receipts,
    util::{DateRange, normalize_optional_text, validate_positive_amount},
};

use super::{Engine, filter_date_range, funds::require_fund, sum_column, with_tx};

/// Compute the unallocated balance from the current rows.
pub(super) async fn unallocated<C: ConnectionTrait>(db: &C) -> ResultEngine<UnallocatedBalance> {
    Ok(UnallocatedBalance {
        receipts_minor: sum_column(
            db,
            receipts::Entity::find(),
            receipts::Column::AmountMinor,
        )
        .await?,
        auto_distributed_minor: sum_column(
            db,
            fund_distributions::Entity::find(),
            fund_distributions::Column::AmountMinor,
        )
        .await?,
        manual_distributed_minor: sum_column(
            db,
            manual_distributions::Entity::find(),
            manual_distributions::Column::AmountMinor,
        )
        .await?,
    })
}

fn ensure_available(balance: &UnallocatedBalance, amount_minor: i64) -> ResultEngine<()> {
    let available = balance.unallocated_minor();
    if amount_minor > available {
        return Err(EngineError::InsufficientFunds(format!(
            "requested {}, unallocated {}",
            MoneyCents::new(amount_minor),
            MoneyCents::new(available)
        )));
    }
    Ok(())
}

pub(super) async fn require_manual<C: ConnectionTrait>(
    db: &C,
    distribution_id: Uuid,
) -> ResultEngine<manual_distributions::Model> {
    manual_distributions::Entity::find_by_id(distribution_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("manual distribution not exists".to_string()))
}

impl Engine {
    /// Money received but not yet assigned to any fund.
    pub async fn unallocated_balance(&self) -> ResultEngine<UnallocatedBalance> {
        unallocated(&self.database).await
    }

    /// Move part of the unallocated balance into a fund.
    ///
    /// The amount must not exceed the balance at the time of the call.
    pub async fn create_manual_distribution(
        &self,
        cmd: ManualDistributionNew,
    ) -> ResultEngine<ManualDistribution> {
        validate_positive_amount(cmd.amount_minor, "distribution")?;

        with_tx!(self, |db_tx| {
            require_fund(&db_tx, cmd.fund_id).await?;
            ensure_available(&unallocated(&db_tx).await?, cmd.amount_minor)?;

            let model = manual_distributions::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                fund_id: ActiveValue::Set(cmd.fund_id),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                date: ActiveValue::Set(cmd.date),
                note: ActiveValue::Set(normalize_optional_text(cmd.note.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = model.insert(&db_tx).await?;
            tracing::info!(
                fund = %model.fund_id,
                amount = %MoneyCents::new(model.amount_minor),
                "manual distribution recorded"
            );
            Ok(ManualDistribution::from(model))
        })
    }

    pub async fn manual_distribution(
        &self,
        distribution_id: Uuid,
    ) -> ResultEngine<ManualDistribution> {
        require_manual(&self.database, distribution_id)
            .await
            .map(ManualDistribution::from)
    }

    /// Manual distributions in `range`, newest first, optionally into one fund.
    pub async fn list_manual_distributions(
        &self,
        range: DateRange,
        fund_id: Option<Uuid>,
    ) -> ResultEngine<Vec<ManualDistribution>> {
        range.validate()?;
        let mut query = filter_date_range(
            manual_distributions::Entity::find(),
            manual_distributions::Column::Date,
            &range,
        );
        if let Some(fund_id) = fund_id {
            query = query.filter(manual_distributions::Column::FundId.eq(fund_id));
        }
        let distributions = query
            .order_by_desc(manual_distributions::Column::Date)
            .order_by_desc(manual_distributions::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(ManualDistribution::from)
            .collect();
        Ok(distributions)
    }

    /// Update a manual distribution.
    ///
    /// A new amount is checked against the balance this distribution leaves
    /// once its own amount is given back.
    pub async fn update_manual_distribution(
        &self,
        distribution_id: Uuid,
        cmd: ManualDistributionUpdate,
    ) -> ResultEngine<ManualDistribution> {
        if let Some(amount_minor) = cmd.amount_minor {
            validate_positive_amount(amount_minor, "distribution")?;
        }

        with_tx!(self, |db_tx| {
            let model = require_manual(&db_tx, distribution_id).await?;
            if let Some(amount_minor) = cmd.amount_minor {
                let mut balance = unallocated(&db_tx).await?;
                balance.manual_distributed_minor -= model.amount_minor;
                ensure_available(&balance, amount_minor)?;
            }
            let mut active: manual_distributions::ActiveModel = model.into();

            if let Some(fund_id) = cmd.fund_id {
                require_fund(&db_tx, fund_id).await?;
                active.fund_id = ActiveValue::Set(fund_id);
            }
            if let Some(amount_minor) = cmd.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(date) = cmd.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(note) = cmd.note.as_deref() {
                active.note = ActiveValue::Set(normalize_optional_text(Some(note)));
            }

            let model = active.update(&db_tx).await?;
            Ok(ManualDistribution::from(model))
        })
    }

    /// Delete a manual distribution, returning its amount to the unallocated
    /// balance.
    pub async fn delete_manual_distribution(&self, distribution_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_manual(&db_tx, distribution_id).await?;
            manual_distributions::Entity::delete_by_id(distribution_id)
                .exec(&db_tx)
                .await?;
            tracing::info!(distribution = %distribution_id, "manual distribution deleted");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_above_balance_is_rejected() {
        let balance = UnallocatedBalance {
            receipts_minor: 1000,
            auto_distributed_minor: 800,
            manual_distributed_minor: 0,
        };
        assert!(ensure_available(&balance, 200).is_ok());
        assert_eq!(
            ensure_available(&balance, 201),
            Err(EngineError::InsufficientFunds(
                "requested 2.01, unallocated 2.00".to_string()
            ))
        );
    }
}
