use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, FundTransfer, FundTransferNew, FundTransferUpdate, MoneyCents, ResultEngine,
    fund_transfers,
    util::{DateRange, normalize_optional_text, validate_positive_amount},
};

use super::{Engine, filter_date_range, funds::require_fund, with_tx};

pub(super) async fn require_transfer<C: ConnectionTrait>(
    db: &C,
    transfer_id: Uuid,
) -> ResultEngine<fund_transfers::Model> {
    fund_transfers::Entity::find_by_id(transfer_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("fund transfer not exists".to_string()))
}

fn ensure_distinct(from_fund_id: Uuid, to_fund_id: Uuid) -> ResultEngine<()> {
    if from_fund_id == to_fund_id {
        return Err(EngineError::InvalidName(
            "a transfer needs two different funds".to_string(),
        ));
    }
    Ok(())
}

impl Engine {
    /// Move allocated money from one fund to another.
    pub async fn create_fund_transfer(&self, cmd: FundTransferNew) -> ResultEngine<FundTransfer> {
        validate_positive_amount(cmd.amount_minor, "transfer")?;
        ensure_distinct(cmd.from_fund_id, cmd.to_fund_id)?;

        with_tx!(self, |db_tx| {
            require_fund(&db_tx, cmd.from_fund_id).await?;
            require_fund(&db_tx, cmd.to_fund_id).await?;

            let model = fund_transfers::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                from_fund_id: ActiveValue::Set(cmd.from_fund_id),
                to_fund_id: ActiveValue::Set(cmd.to_fund_id),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                date: ActiveValue::Set(cmd.date),
                note: ActiveValue::Set(normalize_optional_text(cmd.note.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = model.insert(&db_tx).await?;
            tracing::info!(
                from = %model.from_fund_id,
                to = %model.to_fund_id,
                amount = %MoneyCents::new(model.amount_minor),
                "fund transfer recorded"
            );
            Ok(FundTransfer::from(model))
        })
    }

    pub async fn fund_transfer(&self, transfer_id: Uuid) -> ResultEngine<FundTransfer> {
        require_transfer(&self.database, transfer_id)
            .await
            .map(FundTransfer::from)
    }

    /// Transfers in `range`, newest first, optionally touching one fund on
    /// either side.
    pub async fn list_fund_transfers(
        &self,
        range: DateRange,
        fund_id: Option<Uuid>,
    ) -> ResultEngine<Vec<FundTransfer>> {
        range.validate()?;
        let mut query = filter_date_range(
            fund_transfers::Entity::find(),
            fund_transfers::Column::Date,
            &range,
        );
        if let Some(fund_id) = fund_id {
            query = query.filter(
                fund_transfers::Column::FromFundId
                    .eq(fund_id)
                    .or(fund_transfers::Column::ToFundId.eq(fund_id)),
            );
        }
        let transfers = query
            .order_by_desc(fund_transfers::Column::Date)
            .order_by_desc(fund_transfers::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(FundTransfer::from)
            .collect();
        Ok(transfers)
    }

    pub async fn update_fund_transfer(
        &self,
        transfer_id: Uuid,
        cmd: FundTransferUpdate,
    ) -> ResultEngine<FundTransfer> {
        if let Some(amount_minor) = cmd.amount_minor {
            validate_positive_amount(amount_minor, "transfer")?;
        }

        with_tx!(self, |db_tx| {
            let model = require_transfer(&db_tx, transfer_id).await?;
            let from_fund_id = cmd.from_fund_id.unwrap_or(model.from_fund_id);
            let to_fund_id = cmd.to_fund_id.unwrap_or(model.to_fund_id);
            ensure_distinct(from_fund_id, to_fund_id)?;
            let mut active: fund_transfers::ActiveModel = model.into();

            if let Some(fund_id) = cmd.from_fund_id {
                require_fund(&db_tx, fund_id).await?;
                active.from_fund_id = ActiveValue::Set(fund_id);
            }
            if let Some(fund_id) = cmd.to_fund_id {
                require_fund(&db_tx, fund_id).await?;
                active.to_fund_id = ActiveValue::Set(fund_id);
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
            Ok(FundTransfer::from(model))
        })
    }

    pub async fn delete_fund_transfer(&self, transfer_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_transfer(&db_tx, transfer_id).await?;
            fund_transfers::Entity::delete_by_id(transfer_id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
