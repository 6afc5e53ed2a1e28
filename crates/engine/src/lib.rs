//! Persistence and domain logic for fundbook.
//!
//! [`Engine`] is the single entry point: every operation opens a DB
//! transaction, validates its input and maps rows into the plain domain types
//! re-exported here.

pub use categories::ExpenseCategory;
pub use commands::{
    CategoryNew, CategoryUpdate, CostNew, CostUpdate, FundNew, FundTransferNew, FundTransferUpdate,
    FundUpdate, ManualDistributionNew, ManualDistributionUpdate, NomenclatureNew,
    NomenclatureUpdate, ReceiptNew, ReceiptUpdate, SponsorNew, SponsorUpdate,
};
pub use costs::Cost;
pub use distribution::{Allocation, FundShare, UnallocatedBalance, allocate};
pub use error::EngineError;
pub use fund_distributions::FundDistribution;
pub use fund_transfers::FundTransfer;
pub use funds::Fund;
pub use manual_distributions::ManualDistribution;
pub use money::{BasisPoints, MAX_AMOUNT_MINOR, MoneyCents};
pub use nomenclature::NomenclatureItem;
pub use ops::{ActivityEntry, ActivityKind, DashboardStats, Engine, EngineBuilder};
pub use receipts::{Receipt, ReceiptDetail};
pub use reports::{
    ExpenseReport, FundBalanceReport, FundBalanceRow, GroupedReport, ReportGroup, SponsorReport,
};
pub use sessions::Session;
pub use sponsors::Sponsor;
pub use users::{User, check_password};
pub use util::DateRange;

mod categories;
mod commands;
mod costs;
mod distribution;
mod error;
mod fund_distributions;
mod fund_transfers;
mod funds;
mod manual_distributions;
mod money;
mod nomenclature;
mod ops;
mod receipts;
mod reports;
mod sessions;
mod sponsors;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
