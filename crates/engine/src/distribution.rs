//! Fund distribution arithmetic.
//!
//! A receipt is split across the active funds proportionally to each fund's
//! percentage: `amount = round(receipt * percentage / 100, 2)`. Percentages are
//! not required to sum to 100%; whatever is left over stays unallocated.

use uuid::Uuid;

use crate::{BasisPoints, MoneyCents};

/// The share an active fund takes from each receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FundShare {
    pub fund_id: Uuid,
    pub percentage_bp: i64,
}

/// One computed allocation of a receipt into a fund.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    pub fund_id: Uuid,
    pub percentage_bp: i64,
    pub amount_minor: i64,
}

/// Split `amount_minor` across `shares`.
///
/// Produces one allocation per share with a non-zero percentage, in input
/// order. No shares means no allocations: the whole amount stays unallocated.
#[must_use]
pub fn allocate(amount_minor: i64, shares: &[FundShare]) -> Vec<Allocation> {
    shares
        .iter()
        .filter(|share| share.percentage_bp != 0)
        .map(|share| Allocation {
            fund_id: share.fund_id,
            percentage_bp: share.percentage_bp,
            amount_minor: MoneyCents::new(amount_minor)
                .share(BasisPoints::new(share.percentage_bp))
                .cents(),
        })
        .collect()
}

/// Sum of the active percentages.
#[must_use]
pub fn total_percentage(shares: &[FundShare]) -> BasisPoints {
    BasisPoints::new(shares.iter().map(|s| s.percentage_bp).sum())
}

/// Components of the unallocated balance.
///
/// `unallocated = receipts - automatic distributions - manual distributions`,
/// always derived from current rows and never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnallocatedBalance {
    pub receipts_minor: i64,
    pub auto_distributed_minor: i64,
    pub manual_distributed_minor: i64,
}

impl UnallocatedBalance {
    #[must_use]
    pub fn unallocated_minor(&self) -> i64 {
        self.receipts_minor
            .saturating_sub(self.auto_distributed_minor)
            .saturating_sub(self.manual_distributed_minor)
    }

    /// Whether a new manual distribution can be created at all.
    #[must_use]
    pub fn can_distribute(&self) -> bool {
        self.unallocated_minor() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share(percentage_bp: i64) -> FundShare {
        FundShare {
            fund_id: Uuid::new_v4(),
            percentage_bp,
        }
    }

    fn total(allocations: &[Allocation]) -> i64 {
        allocations.iter().map(|a| a.amount_minor).sum()
    }

    #[test]
    fn sixty_forty_split() {
        let shares = [share(6000), share(4000)];
        let allocations = allocate(100_000, &shares);

        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].amount_minor, 60_000);
        assert_eq!(allocations[0].fund_id, shares[0].fund_id);
        assert_eq!(allocations[1].amount_minor, 40_000);
        assert_eq!(total(&allocations), 100_000);
    }

    #[test]
    fn no_active_funds_allocates_nothing() {
        assert!(allocate(100_000, &[]).is_empty());
    }

    #[test]
    fn zero_percentage_fund_is_skipped() {
        let allocations = allocate(1000, &[share(0), share(10_000)]);
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].amount_minor, 1000);
    }

    #[test]
    fn shortfall_stays_unallocated() {
        let allocations = allocate(100_000, &[share(5000), share(3000)]);
        assert_eq!(total(&allocations), 80_000);
    }

    #[test]
    fn full_split_is_exact_within_rounding() {
        let shares = [share(3333), share(3333), share(3334)];
        for amount in [1, 7, 99, 1001, 123_457, 9_999_999] {
            let allocated = total(&allocate(amount, &shares));
            assert!(
                (allocated - amount).abs() <= shares.len() as i64,
                "amount {amount} allocated {allocated}"
            );
        }
    }

    #[test]
    fn over_allocation_exceeds_receipt() {
        let shares = [share(7000), share(5000)];
        assert_eq!(total_percentage(&shares), BasisPoints::new(12_000));
        assert_eq!(total(&allocate(1000, &shares)), 1200);
    }

    #[test]
    fn unallocated_balance_components() {
        let balance = UnallocatedBalance {
            receipts_minor: 1000,
            auto_distributed_minor: 600,
            manual_distributed_minor: 400,
        };
        assert_eq!(balance.unallocated_minor(), 0);
        assert!(!balance.can_distribute());

        let balance = UnallocatedBalance {
            manual_distributed_minor: 100,
            ..balance
        };
        assert_eq!(balance.unallocated_minor(), 300);
        assert!(balance.can_distribute());
    }
}
