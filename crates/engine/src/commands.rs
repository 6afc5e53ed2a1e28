//! Command structs for engine write operations.
//!
//! These types group parameters for create/update operations, keeping call
//! sites readable and avoiding long argument lists. In update commands `None`
//! leaves a field untouched; for optional text fields an empty string clears
//! the value.

use chrono::NaiveDate;
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct SponsorNew {
    pub name: String,
    pub contact: Option<String>,
    pub note: Option<String>,
}

impl SponsorNew {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct SponsorUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub note: Option<String>,
}

impl SponsorUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.contact.is_none() && self.note.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct FundNew {
    pub name: String,
    pub percentage_bp: i64,
    pub active: bool,
    pub description: Option<String>,
}

impl FundNew {
    /// An active fund taking `percentage_bp` of each receipt.
    #[must_use]
    pub fn new(name: impl Into<String>, percentage_bp: i64) -> Self {
        Self {
            name: name.into(),
            percentage_bp,
            active: true,
            description: None,
        }
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct FundUpdate {
    pub name: Option<String>,
    pub percentage_bp: Option<i64>,
    pub active: Option<bool>,
    pub description: Option<String>,
}

impl FundUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.percentage_bp.is_none()
            && self.active.is_none()
            && self.description.is_none()
    }
}

/// Record a receipt; its automatic distributions are created with it.
#[derive(Clone, Debug)]
pub struct ReceiptNew {
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub sponsor_id: Option<Uuid>,
    pub description: Option<String>,
}

impl ReceiptNew {
    #[must_use]
    pub fn new(amount_minor: i64, date: NaiveDate) -> Self {
        Self {
            amount_minor,
            date,
            sponsor_id: None,
            description: None,
        }
    }

    #[must_use]
    pub fn sponsor_id(mut self, sponsor_id: Uuid) -> Self {
        self.sponsor_id = Some(sponsor_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReceiptUpdate {
    pub amount_minor: Option<i64>,
    pub date: Option<NaiveDate>,
    pub sponsor_id: Option<Uuid>,
    pub description: Option<String>,
}

impl ReceiptUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount_minor.is_none()
            && self.date.is_none()
            && self.sponsor_id.is_none()
            && self.description.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct CostNew {
    pub amount_minor: i64,
    pub date: NaiveDate,
    /// Falls back to the nomenclature item's category when `None`.
    pub category_id: Option<Uuid>,
    pub nomenclature_id: Option<Uuid>,
    pub fund_id: Option<Uuid>,
    pub description: Option<String>,
}

impl CostNew {
    #[must_use]
    pub fn new(amount_minor: i64, date: NaiveDate) -> Self {
        Self {
            amount_minor,
            date,
            category_id: None,
            nomenclature_id: None,
            fund_id: None,
            description: None,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn nomenclature_id(mut self, nomenclature_id: Uuid) -> Self {
        self.nomenclature_id = Some(nomenclature_id);
        self
    }

    #[must_use]
    pub fn fund_id(mut self, fund_id: Uuid) -> Self {
        self.fund_id = Some(fund_id);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct CostUpdate {
    pub amount_minor: Option<i64>,
    pub date: Option<NaiveDate>,
    pub category_id: Option<Uuid>,
    pub nomenclature_id: Option<Uuid>,
    pub fund_id: Option<Uuid>,
    pub description: Option<String>,
}

impl CostUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.amount_minor.is_none()
            && self.date.is_none()
            && self.category_id.is_none()
            && self.nomenclature_id.is_none()
            && self.fund_id.is_none()
            && self.description.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct CategoryNew {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CategoryUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

#[derive(Clone, Debug, Default)]
pub struct NomenclatureNew {
    pub name: String,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Clone, Debug, Default)]
pub struct NomenclatureUpdate {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
}

impl NomenclatureUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.unit.is_none() && self.category_id.is_none()
    }
}

/// Allocate part of the unallocated balance into one fund.
#[derive(Clone, Debug)]
pub struct ManualDistributionNew {
    pub fund_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ManualDistributionUpdate {
    pub fund_id: Option<Uuid>,
    pub amount_minor: Option<i64>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl ManualDistributionUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fund_id.is_none()
            && self.amount_minor.is_none()
            && self.date.is_none()
            && self.note.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct FundTransferNew {
    pub from_fund_id: Uuid,
    pub to_fund_id: Uuid,
    pub amount_minor: i64,
    pub date: NaiveDate,
    pub note: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct FundTransferUpdate {
    pub from_fund_id: Option<Uuid>,
    pub to_fund_id: Option<Uuid>,
    pub amount_minor: Option<i64>,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

impl FundTransferUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.from_fund_id.is_none()
            && self.to_fund_id.is_none()
            && self.amount_minor.is_none()
            && self.date.is_none()
            && self.note.is_none()
    }
}
