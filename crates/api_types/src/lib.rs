//! JSON request and response bodies shared by the server and the client.
//!
//! Amounts are integer minor units (`*_minor`), percentages basis points
//! (`*_bp`, 10000 = 100%), dates `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Optional inclusive date range accepted by lists and reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub mod auth {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UserView {
        pub username: String,
    }
}

pub mod sponsor {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SponsorNew {
        pub name: String,
        pub contact: Option<String>,
        pub note: Option<String>,
    }

    /// Partial update: absent fields are left untouched, `""` clears text.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct SponsorUpdate {
        pub name: Option<String>,
        pub contact: Option<String>,
        pub note: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SponsorView {
        pub id: Uuid,
        pub name: String,
        pub contact: Option<String>,
        pub note: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod fund {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct FundNew {
        pub name: String,
        pub percentage_bp: i64,
        /// Defaults to `true`.
        pub active: Option<bool>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct FundUpdate {
        pub name: Option<String>,
        pub percentage_bp: Option<i64>,
        pub active: Option<bool>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct FundListQuery {
        pub include_inactive: Option<bool>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FundView {
        pub id: Uuid,
        pub name: String,
        pub percentage_bp: i64,
        pub active: bool,
        pub description: Option<String>,
    }

    /// `unallocated_minor = receipts - auto distributed - manual distributed`.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct UnallocatedView {
        pub receipts_minor: i64,
        pub auto_distributed_minor: i64,
        pub manual_distributed_minor: i64,
        pub unallocated_minor: i64,
        pub can_distribute: bool,
    }

    impl UnallocatedView {
        /// Whether a manual distribution may be offered at all.
        pub fn can_distribute(&self) -> bool {
            self.unallocated_minor > 0
        }
    }
}

pub mod receipt {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ReceiptNew {
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub sponsor_id: Option<Uuid>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ReceiptUpdate {
        pub amount_minor: Option<i64>,
        pub date: Option<NaiveDate>,
        pub sponsor_id: Option<Uuid>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ReceiptListQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub sponsor_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReceiptView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub sponsor_id: Option<Uuid>,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DistributionView {
        pub id: Uuid,
        pub fund_id: Uuid,
        /// Fund percentage when the receipt was recorded.
        pub percentage_bp: i64,
        pub amount_minor: i64,
    }

    /// A receipt with its automatic distributions.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReceiptDetailView {
        #[serde(flatten)]
        pub receipt: ReceiptView,
        pub distributions: Vec<DistributionView>,
        pub undistributed_minor: i64,
    }
}

pub mod cost {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CostNew {
        pub amount_minor: i64,
        pub date: NaiveDate,
        /// Required unless the nomenclature item carries a category.
        pub category_id: Option<Uuid>,
        pub nomenclature_id: Option<Uuid>,
        pub fund_id: Option<Uuid>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CostUpdate {
        pub amount_minor: Option<i64>,
        pub date: Option<NaiveDate>,
        pub category_id: Option<Uuid>,
        pub nomenclature_id: Option<Uuid>,
        pub fund_id: Option<Uuid>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CostListQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub category_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CostView {
        pub id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub category_id: Uuid,
        pub nomenclature_id: Option<Uuid>,
        pub fund_id: Option<Uuid>,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
    }
}

pub mod nomenclature {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct NomenclatureNew {
        pub name: String,
        pub unit: Option<String>,
        pub category_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct NomenclatureUpdate {
        pub name: Option<String>,
        pub unit: Option<String>,
        pub category_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct NomenclatureListQuery {
        pub category_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct NomenclatureView {
        pub id: Uuid,
        pub name: String,
        pub unit: Option<String>,
        pub category_id: Option<Uuid>,
    }
}

pub mod distribution {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct ManualDistributionNew {
        pub fund_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub note: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ManualDistributionUpdate {
        pub fund_id: Option<Uuid>,
        pub amount_minor: Option<i64>,
        pub date: Option<NaiveDate>,
        pub note: Option<String>,
    }

    /// Filter for manual distributions and transfers.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct FundMovementQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub fund_id: Option<Uuid>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ManualDistributionView {
        pub id: Uuid,
        pub fund_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub note: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod transfer {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct FundTransferNew {
        pub from_fund_id: Uuid,
        pub to_fund_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub note: Option<String>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct FundTransferUpdate {
        pub from_fund_id: Option<Uuid>,
        pub to_fund_id: Option<Uuid>,
        pub amount_minor: Option<i64>,
        pub date: Option<NaiveDate>,
        pub note: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FundTransferView {
        pub id: Uuid,
        pub from_fund_id: Uuid,
        pub to_fund_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub note: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod report {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ReportGroupView<K> {
        pub key: K,
        pub label: String,
        pub count: usize,
        pub total_minor: i64,
        pub share_bp: i64,
    }

    /// Grouped totals; an empty `groups` list means no data in the range.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct GroupedReportView<K> {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub groups: Vec<ReportGroupView<K>>,
        pub total_minor: i64,
    }

    pub type ExpenseReportView = GroupedReportView<Uuid>;

    /// `key` is `null` for the anonymous group.
    pub type SponsorReportView = GroupedReportView<Option<Uuid>>;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FundBalanceRowView {
        pub fund_id: Uuid,
        pub name: String,
        pub active: bool,
        pub percentage_bp: i64,
        pub auto_minor: i64,
        pub manual_minor: i64,
        pub transfers_in_minor: i64,
        pub transfers_out_minor: i64,
        pub costs_minor: i64,
        pub balance_minor: i64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FundBalanceReportView {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub rows: Vec<FundBalanceRowView>,
        pub active_percentage_bp: i64,
        /// `10000 - active_percentage_bp`: positive is a shortfall.
        pub difference_bp: i64,
        pub receipts_minor: i64,
        pub unallocated_minor: i64,
        pub total_balance_minor: i64,
    }
}

pub mod dashboard {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct DashboardStatsView {
        pub total_receipts_minor: i64,
        pub total_costs_minor: i64,
        pub net_balance_minor: i64,
        pub unallocated_minor: i64,
        pub sponsors: u64,
        pub active_funds: u64,
        pub receipts: u64,
        pub costs: u64,
        pub active_percentage_bp: i64,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ActivityKind {
        Receipt,
        Cost,
        ManualDistribution,
        FundTransfer,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ActivityQuery {
        /// Defaults to 10, at most 100.
        pub limit: Option<u64>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ActivityView {
        pub kind: ActivityKind,
        pub id: Uuid,
        pub date: NaiveDate,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}
