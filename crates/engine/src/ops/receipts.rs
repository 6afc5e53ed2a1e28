use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    BasisPoints, EngineError, FundDistribution, MoneyCents, Receipt, ReceiptDetail, ReceiptNew,
    ReceiptUpdate, ResultEngine, allocate, fund_distributions, receipts,
    util::{DateRange, normalize_optional_text, validate_positive_amount},
};

use super::{Engine, filter_date_range, funds::active_shares, sponsors::require_sponsor, with_tx};

pub(super) async fn require_receipt<C: ConnectionTrait>(
    db: &C,
    receipt_id: Uuid,
) -> ResultEngine<receipts::Model> {
    receipts::Entity::find_by_id(receipt_id)
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("receipt not exists".to_string()))
}

async fn distributions_of<C: ConnectionTrait>(
    db: &C,
    receipt_id: Uuid,
) -> ResultEngine<Vec<fund_distributions::Model>> {
    Ok(fund_distributions::Entity::find()
        .filter(fund_distributions::Column::ReceiptId.eq(receipt_id))
        .all(db)
        .await?)
}

impl Engine {
    /// Record a receipt and split it across the active funds.
    ///
    /// The receipt and its distributions are written in the same DB
    /// transaction. With no active fund the whole amount stays unallocated.
    pub async fn create_receipt(&self, cmd: ReceiptNew) -> ResultEngine<ReceiptDetail> {
        validate_positive_amount(cmd.amount_minor, "receipt")?;

        with_tx!(self, |db_tx| {
            if let Some(sponsor_id) = cmd.sponsor_id {
                require_sponsor(&db_tx, sponsor_id).await?;
            }

            let receipt = receipts::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                amount_minor: ActiveValue::Set(cmd.amount_minor),
                date: ActiveValue::Set(cmd.date),
                sponsor_id: ActiveValue::Set(cmd.sponsor_id),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let receipt = receipt.insert(&db_tx).await?;

            let shares = active_shares(&db_tx).await?;
            let mut distributions = Vec::new();
            for allocation in allocate(receipt.amount_minor, &shares) {
                let model = fund_distributions::ActiveModel {
                    id: ActiveValue::Set(Uuid::new_v4()),
                    receipt_id: ActiveValue::Set(receipt.id),
                    fund_id: ActiveValue::Set(allocation.fund_id),
                    percentage_bp: ActiveValue::Set(allocation.percentage_bp),
                    amount_minor: ActiveValue::Set(allocation.amount_minor),
                };
                distributions.push(FundDistribution::from(model.insert(&db_tx).await?));
            }

            let detail = ReceiptDetail {
                receipt: Receipt::from(receipt),
                distributions,
            };
            tracing::info!(
                receipt = %detail.receipt.id,
                amount = %MoneyCents::new(detail.receipt.amount_minor),
                funds = detail.distributions.len(),
                undistributed = %MoneyCents::new(detail.undistributed_minor()),
                "receipt recorded"
            );
            Ok(detail)
        })
    }

    /// A receipt with its automatic distributions.
    pub async fn receipt(&self, receipt_id: Uuid) -> ResultEngine<ReceiptDetail> {
        let receipt = require_receipt(&self.database, receipt_id).await?;
        let distributions = distributions_of(&self.database, receipt_id)
            .await?
            .into_iter()
            .map(FundDistribution::from)
            .collect();
        Ok(ReceiptDetail {
            receipt: Receipt::from(receipt),
            distributions,
        })
    }

    /// Receipts in `range`, newest first, optionally from one sponsor.
    pub async fn list_receipts(
        &self,
        range: DateRange,
        sponsor_id: Option<Uuid>,
    ) -> ResultEngine<Vec<Receipt>> {
        range.validate()?;
        let mut query = filter_date_range(
            receipts::Entity::find(),
            receipts::Column::Date,
            &range,
        );
        if let Some(sponsor_id) = sponsor_id {
            query = query.filter(receipts::Column::SponsorId.eq(sponsor_id));
        }
        let receipts = query
            .order_by_desc(receipts::Column::Date)
            .order_by_desc(receipts::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Receipt::from)
            .collect();
        Ok(receipts)
    }

    /// Update a receipt.
    ///
    /// A new amount is redistributed with the percentages stored on the
    /// existing distributions, so later fund changes do not leak into old
    /// receipts.
    pub async fn update_receipt(
        &self,
        receipt_id: Uuid,
        cmd: ReceiptUpdate,
    ) -> ResultEngine<ReceiptDetail> {
        if let Some(amount_minor) = cmd.amount_minor {
            validate_positive_amount(amount_minor, "receipt")?;
        }

        with_tx!(self, |db_tx| {
            let model = require_receipt(&db_tx, receipt_id).await?;
            let amount_changed = cmd
                .amount_minor
                .is_some_and(|amount| amount != model.amount_minor);
            let mut active: receipts::ActiveModel = model.into();

            if let Some(amount_minor) = cmd.amount_minor {
                active.amount_minor = ActiveValue::Set(amount_minor);
            }
            if let Some(date) = cmd.date {
                active.date = ActiveValue::Set(date);
            }
            if let Some(sponsor_id) = cmd.sponsor_id {
                require_sponsor(&db_tx, sponsor_id).await?;
                active.sponsor_id = ActiveValue::Set(Some(sponsor_id));
            }
            if let Some(description) = cmd.description.as_deref() {
                active.description = ActiveValue::Set(normalize_optional_text(Some(description)));
            }
            let receipt = active.update(&db_tx).await?;

            let distributions = if amount_changed {
                redistribute(&db_tx, &receipt).await?
            } else {
                distributions_of(&db_tx, receipt_id)
                    .await?
                    .into_iter()
                    .map(FundDistribution::from)
                    .collect()
            };

            Ok(ReceiptDetail {
                receipt: Receipt::from(receipt),
                distributions,
            })
        })
    }

    /// Delete a receipt together with its automatic distributions.
    pub async fn delete_receipt(&self, receipt_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            require_receipt(&db_tx, receipt_id).await?;
            fund_distributions::Entity::delete_many()
                .filter(fund_distributions::Column::ReceiptId.eq(receipt_id))
                .exec(&db_tx)
                .await?;
            receipts::Entity::delete_by_id(receipt_id)
                .exec(&db_tx)
                .await?;
            tracing::info!(receipt = %receipt_id, "receipt deleted");
            Ok(())
        })
    }
}

async fn redistribute(
    db_tx: &DatabaseTransaction,
    receipt: &receipts::Model,
) -> ResultEngine<Vec<FundDistribution>> {
    let mut distributions = Vec::new();
    for model in distributions_of(db_tx, receipt.id).await? {
        let amount_minor = MoneyCents::new(receipt.amount_minor)
            .share(BasisPoints::new(model.percentage_bp))
            .cents();
        let mut active: fund_distributions::ActiveModel = model.into();
        active.amount_minor = ActiveValue::Set(amount_minor);
        distributions.push(FundDistribution::from(active.update(db_tx).await?));
    }
    Ok(distributions)
}
