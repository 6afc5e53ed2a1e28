use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*};
use uuid::Uuid;

use crate::{
    ResultEngine, costs, distribution::total_percentage, fund_transfers, funds,
    manual_distributions, receipts, sponsors,
};

use super::{Engine, distributions::unallocated, funds::active_shares, sum_column};

/// Number of activity entries returned when the caller does not ask.
pub const DEFAULT_ACTIVITY_LIMIT: u64 = 10;
/// Upper bound for the activity limit.
pub const MAX_ACTIVITY_LIMIT: u64 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_receipts_minor: i64,
    pub total_costs_minor: i64,
    /// `total_receipts_minor - total_costs_minor`
    pub net_balance_minor: i64,
    pub unallocated_minor: i64,
    pub sponsors: u64,
    pub active_funds: u64,
    pub receipts: u64,
    pub costs: u64,
    pub active_percentage_bp: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Receipt,
    Cost,
    ManualDistribution,
    FundTransfer,
}

/// One line of the recent activity feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub id: Uuid,
    pub date: NaiveDate,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Merge the per-kind feeds, newest first, keeping at most `limit` entries.
fn merge_activity(mut entries: Vec<ActivityEntry>, limit: usize) -> Vec<ActivityEntry> {
    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    entries.truncate(limit);
    entries
}

impl Engine {
    pub async fn dashboard_stats(&self) -> ResultEngine<DashboardStats> {
        let db = &self.database;
        let balance = unallocated(db).await?;
        let total_costs_minor =
            sum_column(db, costs::Entity::find(), costs::Column::AmountMinor).await?;
        let active_percentage_bp = total_percentage(&active_shares(db).await?).value();

        Ok(DashboardStats {
            total_receipts_minor: balance.receipts_minor,
            total_costs_minor,
            net_balance_minor: balance.receipts_minor - total_costs_minor,
            unallocated_minor: balance.unallocated_minor(),
            sponsors: sponsors::Entity::find().count(db).await?,
            active_funds: funds::Entity::find()
                .filter(funds::Column::Active.eq(true))
                .count(db)
                .await?,
            receipts: receipts::Entity::find().count(db).await?,
            costs: costs::Entity::find().count(db).await?,
            active_percentage_bp,
        })
    }

    /// The most recent receipts, costs, manual distributions and transfers.
    ///
    /// `limit` defaults to [`DEFAULT_ACTIVITY_LIMIT`] and is clamped to
    /// `1..=MAX_ACTIVITY_LIMIT`.
    pub async fn recent_activity(&self, limit: Option<u64>) -> ResultEngine<Vec<ActivityEntry>> {
        let limit = limit
            .unwrap_or(DEFAULT_ACTIVITY_LIMIT)
            .clamp(1, MAX_ACTIVITY_LIMIT);
        let db = &self.database;
        let mut entries = Vec::new();

        let receipts = receipts::Entity::find()
            .order_by_desc(receipts::Column::Date)
            .order_by_desc(receipts::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;
        entries.extend(receipts.into_iter().map(|r| ActivityEntry {
            kind: ActivityKind::Receipt,
            id: r.id,
            date: r.date,
            amount_minor: r.amount_minor,
            description: r.description,
            created_at: r.created_at,
        }));

        let costs = costs::Entity::find()
            .order_by_desc(costs::Column::Date)
            .order_by_desc(costs::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;
        entries.extend(costs.into_iter().map(|c| ActivityEntry {
            kind: ActivityKind::Cost,
            id: c.id,
            date: c.date,
            amount_minor: c.amount_minor,
            description: c.description,
            created_at: c.created_at,
        }));

        let manual = manual_distributions::Entity::find()
            .order_by_desc(manual_distributions::Column::Date)
            .order_by_desc(manual_distributions::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;
        entries.extend(manual.into_iter().map(|m| ActivityEntry {
            kind: ActivityKind::ManualDistribution,
            id: m.id,
            date: m.date,
            amount_minor: m.amount_minor,
            description: m.note,
            created_at: m.created_at,
        }));

        let transfers = fund_transfers::Entity::find()
            .order_by_desc(fund_transfers::Column::Date)
            .order_by_desc(fund_transfers::Column::CreatedAt)
            .limit(limit)
            .all(db)
            .await?;
        entries.extend(transfers.into_iter().map(|t| ActivityEntry {
            kind: ActivityKind::FundTransfer,
            id: t.id,
            date: t.date,
            amount_minor: t.amount_minor,
            description: t.note,
            created_at: t.created_at,
        }));

        Ok(merge_activity(entries, limit as usize))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry(kind: ActivityKind, day: u32, second: u32) -> ActivityEntry {
        ActivityEntry {
            kind,
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            amount_minor: 100,
            description: None,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, second).unwrap(),
        }
    }

    #[test]
    fn activity_is_newest_first_and_truncated() {
        let merged = merge_activity(
            vec![
                entry(ActivityKind::Receipt, 1, 0),
                entry(ActivityKind::Cost, 3, 0),
                entry(ActivityKind::FundTransfer, 2, 5),
                entry(ActivityKind::ManualDistribution, 2, 9),
            ],
            3,
        );

        let kinds: Vec<_> = merged.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [
                ActivityKind::Cost,
                ActivityKind::ManualDistribution,
                ActivityKind::FundTransfer
            ]
        );
    }
}
