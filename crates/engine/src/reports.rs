//! Report aggregation.
//!
//! Reports filter records by a date range, group them by a dimension and
//! compute per-group totals with their share of the overall total. The
//! arithmetic lives here, away from the database, so it can be checked on
//! plain values.

use std::{collections::HashMap, hash::Hash};

use uuid::Uuid;

use crate::{BasisPoints, Fund, distribution::UnallocatedBalance, money::FULL_BP, util::DateRange};

/// One record to be grouped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRecord<K> {
    pub key: K,
    pub label: String,
    pub amount_minor: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportGroup<K> {
    pub key: K,
    pub label: String,
    pub count: usize,
    pub total_minor: i64,
    /// Share of the report total, in basis points.
    pub share_bp: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupedReport<K> {
    pub range: DateRange,
    pub groups: Vec<ReportGroup<K>>,
    pub total_minor: i64,
}

impl<K> GroupedReport<K> {
    /// No records fell in the range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Costs grouped by expense category.
pub type ExpenseReport = GroupedReport<Uuid>;

/// Receipts grouped by sponsor, `None` collecting anonymous receipts.
pub type SponsorReport = GroupedReport<Option<Uuid>>;

/// Group `records` by key.
///
/// Groups are ordered by total descending, then label ascending. The label of
/// a group is the one of its first record.
pub fn group_totals<K, I>(range: DateRange, records: I) -> GroupedReport<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = ReportRecord<K>>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<ReportGroup<K>> = Vec::new();

    for record in records {
        let position = *index.entry(record.key.clone()).or_insert_with(|| {
            groups.push(ReportGroup {
                key: record.key.clone(),
                label: record.label.clone(),
                count: 0,
                total_minor: 0,
                share_bp: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[position];
        group.count += 1;
        group.total_minor = group.total_minor.saturating_add(record.amount_minor);
    }

    let total_minor = groups
        .iter()
        .fold(0i64, |total, g| total.saturating_add(g.total_minor));
    for group in &mut groups {
        group.share_bp = BasisPoints::of(group.total_minor, total_minor).value();
    }
    groups.sort_by(|a, b| {
        b.total_minor
            .cmp(&a.total_minor)
            .then_with(|| a.label.cmp(&b.label))
    });

    GroupedReport {
        range,
        groups,
        total_minor,
    }
}

/// Movements of a single fund over the report range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundBalanceRow {
    pub fund_id: Uuid,
    pub name: String,
    pub active: bool,
    pub percentage_bp: i64,
    pub auto_minor: i64,
    pub manual_minor: i64,
    pub transfers_in_minor: i64,
    pub transfers_out_minor: i64,
    pub costs_minor: i64,
}

impl FundBalanceRow {
    fn new(fund: &Fund) -> Self {
        Self {
            fund_id: fund.id,
            name: fund.name.clone(),
            active: fund.active,
            percentage_bp: fund.percentage_bp,
            auto_minor: 0,
            manual_minor: 0,
            transfers_in_minor: 0,
            transfers_out_minor: 0,
            costs_minor: 0,
        }
    }

    #[must_use]
    pub fn allocated_minor(&self) -> i64 {
        self.auto_minor.saturating_add(self.manual_minor)
    }

    #[must_use]
    pub fn balance_minor(&self) -> i64 {
        self.allocated_minor()
            .saturating_add(self.transfers_in_minor)
            .saturating_sub(self.transfers_out_minor)
            .saturating_sub(self.costs_minor)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FundBalanceReport {
    pub range: DateRange,
    pub rows: Vec<FundBalanceRow>,
    /// Sum of the active funds' percentages.
    pub active_percentage_bp: i64,
    /// `100% - active_percentage_bp`: positive is a shortfall, negative an
    /// excess.
    pub difference_bp: i64,
    pub receipts_minor: i64,
    pub unallocated_minor: i64,
    pub total_balance_minor: i64,
}

impl FundBalanceReport {
    /// Nothing moved in the range. The percentage summary is still filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Accumulates fund movements into a [`FundBalanceReport`].
///
/// Movements naming a fund that was not passed to [`FundLedger::new`] are
/// ignored. A ledger that recorded no movement at all finishes with no rows.
/// Amounts saturate at the `i64` bounds.
#[derive(Debug)]
pub struct FundLedger {
    rows: Vec<FundBalanceRow>,
    index: HashMap<Uuid, usize>,
    active_percentage_bp: i64,
    balance: UnallocatedBalance,
    movements: usize,
}

impl FundLedger {
    #[must_use]
    pub fn new(funds: &[Fund]) -> Self {
        let mut rows: Vec<FundBalanceRow> = funds.iter().map(FundBalanceRow::new).collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        let index = rows
            .iter()
            .enumerate()
            .map(|(position, row)| (row.fund_id, position))
            .collect();
        let active_percentage_bp = funds
            .iter()
            .filter(|f| f.active)
            .map(|f| f.percentage_bp)
            .sum();
        Self {
            rows,
            index,
            active_percentage_bp,
            balance: UnallocatedBalance::default(),
            movements: 0,
        }
    }

    fn row_mut(&mut self, fund_id: Uuid) -> Option<&mut FundBalanceRow> {
        let position = *self.index.get(&fund_id)?;
        self.rows.get_mut(position)
    }

    pub fn add_receipt(&mut self, amount_minor: i64) {
        self.movements += 1;
        self.balance.receipts_minor = self.balance.receipts_minor.saturating_add(amount_minor);
    }

    pub fn add_auto_distribution(&mut self, fund_id: Uuid, amount_minor: i64) {
        self.movements += 1;
        let balance = &mut self.balance.auto_distributed_minor;
        *balance = balance.saturating_add(amount_minor);
        if let Some(row) = self.row_mut(fund_id) {
            row.auto_minor = row.auto_minor.saturating_add(amount_minor);
        }
    }

    pub fn add_manual_distribution(&mut self, fund_id: Uuid, amount_minor: i64) {
        self.movements += 1;
        let balance = &mut self.balance.manual_distributed_minor;
        *balance = balance.saturating_add(amount_minor);
        if let Some(row) = self.row_mut(fund_id) {
            row.manual_minor = row.manual_minor.saturating_add(amount_minor);
        }
    }

    pub fn add_transfer(&mut self, from_fund_id: Uuid, to_fund_id: Uuid, amount_minor: i64) {
        self.movements += 1;
        if let Some(row) = self.row_mut(from_fund_id) {
            row.transfers_out_minor = row.transfers_out_minor.saturating_add(amount_minor);
        }
        if let Some(row) = self.row_mut(to_fund_id) {
            row.transfers_in_minor = row.transfers_in_minor.saturating_add(amount_minor);
        }
    }

    pub fn add_cost(&mut self, fund_id: Uuid, amount_minor: i64) {
        self.movements += 1;
        if let Some(row) = self.row_mut(fund_id) {
            row.costs_minor = row.costs_minor.saturating_add(amount_minor);
        }
    }

    #[must_use]
    pub fn finish(self, range: DateRange) -> FundBalanceReport {
        let rows = if self.movements == 0 {
            Vec::new()
        } else {
            self.rows
        };
        let total_balance_minor = rows
            .iter()
            .fold(0i64, |total, row| total.saturating_add(row.balance_minor()));
        FundBalanceReport {
            range,
            rows,
            active_percentage_bp: self.active_percentage_bp,
            difference_bp: FULL_BP - self.active_percentage_bp,
            receipts_minor: self.balance.receipts_minor,
            unallocated_minor: self.balance.unallocated_minor(),
            total_balance_minor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: u8, label: &str, amount_minor: i64) -> ReportRecord<u8> {
        ReportRecord {
            key,
            label: label.to_string(),
            amount_minor,
        }
    }

    fn fund(name: &str, percentage_bp: i64, active: bool) -> Fund {
        Fund {
            id: Uuid::new_v4(),
            name: name.to_string(),
            percentage_bp,
            active,
            description: None,
        }
    }

    #[test]
    fn groups_sum_to_total() {
        let report = group_totals(
            DateRange::all(),
            vec![
                record(1, "Food", 300),
                record(2, "Rent", 1000),
                record(1, "Food", 200),
                record(3, "Misc", 500),
            ],
        );

        assert_eq!(report.total_minor, 2000);
        assert_eq!(
            report.groups.iter().map(|g| g.total_minor).sum::<i64>(),
            report.total_minor
        );
        assert_eq!(report.groups[0].label, "Rent");
        assert_eq!(report.groups[0].share_bp, 5000);
        // Food and Misc tie on 500: label order breaks the tie.
        assert_eq!(report.groups[1].label, "Food");
        assert_eq!(report.groups[1].count, 2);
        assert_eq!(report.groups[2].label, "Misc");
        assert_eq!(report.groups[2].share_bp, 2500);
    }

    #[test]
    fn empty_input_gives_empty_report() {
        let report = group_totals::<u8, _>(DateRange::all(), Vec::new());
        assert!(report.is_empty());
        assert_eq!(report.total_minor, 0);
    }

    #[test]
    fn fund_ledger_balances() {
        let savings = fund("Savings", 6000, true);
        let events = fund("Events", 3000, true);
        let old = fund("Old", 5000, false);
        let mut ledger = FundLedger::new(&[savings.clone(), events.clone(), old.clone()]);

        ledger.add_receipt(10_000);
        ledger.add_auto_distribution(savings.id, 6000);
        ledger.add_auto_distribution(events.id, 3000);
        ledger.add_manual_distribution(old.id, 500);
        ledger.add_transfer(savings.id, events.id, 1000);
        ledger.add_cost(events.id, 2500);

        let report = ledger.finish(DateRange::all());
        assert_eq!(report.active_percentage_bp, 9000);
        assert_eq!(report.difference_bp, 1000);
        assert_eq!(report.unallocated_minor, 500);

        let names: Vec<_> = report.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Events", "Old", "Savings"]);

        let events_row = &report.rows[0];
        assert_eq!(events_row.balance_minor(), 3000 + 1000 - 2500);
        let savings_row = &report.rows[2];
        assert_eq!(savings_row.balance_minor(), 5000);
        assert_eq!(report.total_balance_minor, 1500 + 500 + 5000);
    }

    #[test]
    fn over_allocation_shows_negative_difference() {
        let ledger = FundLedger::new(&[fund("A", 7000, true), fund("B", 5000, true)]);
        let report = ledger.finish(DateRange::all());
        assert_eq!(report.difference_bp, -2000);
    }

    #[test]
    fn ledger_without_movements_has_no_rows() {
        let ledger = FundLedger::new(&[fund("Savings", 6000, true), fund("Events", 4000, true)]);
        let report = ledger.finish(DateRange::all());
        assert!(report.is_empty());
        assert_eq!(report.total_balance_minor, 0);
        assert_eq!(report.active_percentage_bp, 10_000);
        assert_eq!(report.difference_bp, 0);
    }

    #[test]
    fn large_totals_saturate() {
        let report = group_totals(
            DateRange::all(),
            vec![record(1, "A", i64::MAX), record(2, "B", i64::MAX)],
        );
        assert_eq!(report.total_minor, i64::MAX);

        let savings = fund("Savings", 10_000, true);
        let mut ledger = FundLedger::new(&[savings.clone()]);
        ledger.add_receipt(i64::MAX);
        ledger.add_receipt(1);
        ledger.add_auto_distribution(savings.id, i64::MAX);
        let report = ledger.finish(DateRange::all());
        assert_eq!(report.receipts_minor, i64::MAX);
        assert_eq!(report.unallocated_minor, 0);
    }
}
