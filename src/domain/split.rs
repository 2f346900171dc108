//! Editable split-ledger structures for one expense being created or edited.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::member::{Member, MemberId};

/// Policy governing how owed shares are derived.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    /// Every member owes an equal share; edits auto-balance the others.
    Equal,
    /// Paid and owed shares are independently editable per member.
    Custom,
    /// The carried member owes 100%, everyone else owes nothing.
    Personal(MemberId),
}

/// Selects who paid: one member absorbs the total, or several members
/// split the paid column by hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayerSelector {
    Single(MemberId),
    Multiple,
}

/// One member's line in the ledger.
///
/// `owed_percent` tracks `owed_amount / total_cost * 100` at one decimal
/// place whenever the total is positive. It is a derived display value,
/// authoritative only during an explicit percent edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShareRow {
    pub member_id: MemberId,
    pub paid_amount: Decimal,
    pub owed_amount: Decimal,
    pub owed_percent: Decimal,
}

impl ShareRow {
    pub fn zeroed(member_id: impl Into<MemberId>) -> Self {
        Self {
            member_id: member_id.into(),
            paid_amount: Decimal::ZERO,
            owed_amount: Decimal::ZERO,
            owed_percent: Decimal::ZERO,
        }
    }
}

/// The editable per-member paid/owed table for a single expense.
///
/// After every completed edit the owed column reconciles to `total_cost`
/// through the residual-to-last-row rule. The paid column summing to the
/// total is the submittability condition, checked only at submit time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ledger {
    pub total_cost: Decimal,
    pub payer: PayerSelector,
    pub mode: SplitMode,
    pub rows: Vec<ShareRow>,
}

impl Ledger {
    /// Builds a zeroed equal-split ledger with the first member as payer.
    pub fn for_members(members: &[Member]) -> Self {
        let payer = members
            .first()
            .map(|m| PayerSelector::Single(m.id.clone()))
            .unwrap_or(PayerSelector::Multiple);
        Self {
            total_cost: Decimal::ZERO,
            payer,
            mode: SplitMode::Equal,
            rows: members.iter().map(|m| ShareRow::zeroed(&m.id)).collect(),
        }
    }

    pub fn row(&self, member_id: &str) -> Option<&ShareRow> {
        self.rows.iter().find(|r| r.member_id == member_id)
    }

    pub fn row_index(&self, member_id: &str) -> Option<usize> {
        self.rows.iter().position(|r| r.member_id == member_id)
    }

    pub fn paid_total(&self) -> Decimal {
        self.rows.iter().map(|r| r.paid_amount).sum()
    }

    pub fn owed_total(&self) -> Decimal {
        self.rows.iter().map(|r| r.owed_amount).sum()
    }
}
