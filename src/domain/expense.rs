//! Persisted expense snapshots and the aggregation outputs derived from them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::member::MemberId;

/// The fixed category list offered by the expense form.
pub const EXPENSE_CATEGORIES: [&str; 13] = [
    "Important Documents",
    "Preparation",
    "Currency Conversion",
    "Local Transit",
    "Food",
    "Leisure",
    "Memento",
    "Sight Seeing",
    "Misc",
    "Transit - Flight",
    "Transit - Train",
    "Stays - Hotel",
    "Stays - Hostel",
];

/// Description the external service uses for debt settlements; such
/// records are not spending and are skipped by analytics.
pub const SETTLEMENT_DESCRIPTION: &str = "Payment";

/// One member's persisted split of a single expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberShare {
    pub member_id: MemberId,
    pub paid_share: Decimal,
    pub owed_share: Decimal,
}

/// A stored expense as read back from the persistence collaborator.
///
/// `stay_start`/`stay_end` are present only for lodging records and
/// denote the half-open date range `[stay_start, stay_end)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub id: String,
    pub description: String,
    pub amount_base_currency: Decimal,
    pub category: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub stay_start: Option<NaiveDate>,
    pub stay_end: Option<NaiveDate>,
    #[serde(default)]
    pub shares: Vec<MemberShare>,
}

impl ExpenseRecord {
    /// True when the record carries a usable stay range (`start < end`).
    pub fn has_stay_range(&self) -> bool {
        matches!(
            (self.stay_start, self.stay_end),
            (Some(start), Some(end)) if start < end
        )
    }

    /// True for debt-settlement records, which analytics ignores.
    pub fn is_settlement(&self) -> bool {
        self.description.trim().eq_ignore_ascii_case(SETTLEMENT_DESCRIPTION)
    }
}

/// A single day's slice of an expense after apportionment.
///
/// `date` is `None` when the source record carried no date at all; such
/// contributions land in the missing-key bucket during day grouping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyContribution {
    pub date: Option<NaiveDate>,
    pub amount: Decimal,
}

/// A `(label, total)` pair produced by grouping expenses along one dimension.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregationBucket {
    pub label: String,
    pub total: Decimal,
}

/// Headline figures for a set of expense records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub grand_total: Decimal,
    pub count: usize,
    pub average: Decimal,
    pub max_record: Option<ExpenseRecord>,
    pub top_category: Option<AggregationBucket>,
    pub top_location: Option<AggregationBucket>,
    pub top_date: Option<AggregationBucket>,
}
