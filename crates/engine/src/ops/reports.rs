use std::collections::HashMap;

use sea_orm::{JoinType, QueryFilter, QuerySelect, RelationTrait, prelude::*};
use uuid::Uuid;

use crate::{
    ExpenseReport, FundBalanceReport, ResultEngine, SponsorReport, categories, costs,
    fund_distributions, fund_transfers, manual_distributions, receipts,
    reports::{FundLedger, ReportRecord, group_totals},
    sponsors,
    util::DateRange,
};

use super::{Engine, filter_date_range, funds::all_funds};

/// Label of the group collecting receipts without a sponsor.
const ANONYMOUS_LABEL: &str = "Anonymous";

impl Engine {
    /// Costs in `range` grouped by expense category.
    pub async fn expense_report(&self, range: DateRange) -> ResultEngine<ExpenseReport> {
        range.validate()?;
        let labels: HashMap<Uuid, String> = categories::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let costs = filter_date_range(costs::Entity::find(), costs::Column::Date, &range)
            .all(&self.database)
            .await?;
        let records = costs.into_iter().map(|cost| ReportRecord {
            key: cost.category_id,
            label: labels
                .get(&cost.category_id)
                .cloned()
                .unwrap_or_else(|| cost.category_id.to_string()),
            amount_minor: cost.amount_minor,
        });
        Ok(group_totals(range, records))
    }

    /// Receipts in `range` grouped by sponsor.
    pub async fn sponsor_report(&self, range: DateRange) -> ResultEngine<SponsorReport> {
        range.validate()?;
        let labels: HashMap<Uuid, String> = sponsors::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect();

        let receipts = filter_date_range(receipts::Entity::find(), receipts::Column::Date, &range)
            .all(&self.database)
            .await?;
        let records = receipts.into_iter().map(|receipt| {
            let label = receipt
                .sponsor_id
                .and_then(|id| labels.get(&id).cloned())
                .unwrap_or_else(|| ANONYMOUS_LABEL.to_string());
            ReportRecord {
                key: receipt.sponsor_id,
                label,
                amount_minor: receipt.amount_minor,
            }
        });
        Ok(group_totals(range, records))
    }

    /// Per-fund movements and balances over `range`.
    ///
    /// Automatic distributions are dated by their receipt.
    pub async fn fund_balance_report(&self, range: DateRange) -> ResultEngine<FundBalanceReport> {
        range.validate()?;
        let funds = all_funds(&self.database).await?;
        let mut ledger = FundLedger::new(&funds);

        let receipts = filter_date_range(receipts::Entity::find(), receipts::Column::Date, &range)
            .all(&self.database)
            .await?;
        for receipt in &receipts {
            ledger.add_receipt(receipt.amount_minor);
        }

        let mut auto = fund_distributions::Entity::find()
            .join(JoinType::InnerJoin, fund_distributions::Relation::Receipt.def());
        if let Some(from) = range.from {
            auto = auto.filter(receipts::Column::Date.gte(from));
        }
        if let Some(to) = range.to {
            auto = auto.filter(receipts::Column::Date.lte(to));
        }
        for distribution in auto.all(&self.database).await? {
            ledger.add_auto_distribution(distribution.fund_id, distribution.amount_minor);
        }

        let manual = filter_date_range(
            manual_distributions::Entity::find(),
            manual_distributions::Column::Date,
            &range,
        )
        .all(&self.database)
        .await?;
        for distribution in manual {
            ledger.add_manual_distribution(distribution.fund_id, distribution.amount_minor);
        }

        let transfers = filter_date_range(
            fund_transfers::Entity::find(),
            fund_transfers::Column::Date,
            &range,
        )
        .all(&self.database)
        .await?;
        for transfer in transfers {
            ledger.add_transfer(
                transfer.from_fund_id,
                transfer.to_fund_id,
                transfer.amount_minor,
            );
        }

        let costs = filter_date_range(costs::Entity::find(), costs::Column::Date, &range)
            .filter(costs::Column::FundId.is_not_null())
            .all(&self.database)
            .await?;
        for cost in costs {
            if let Some(fund_id) = cost.fund_id {
                ledger.add_cost(fund_id, cost.amount_minor);
            }
        }

        Ok(ledger.finish(range))
    }
}
