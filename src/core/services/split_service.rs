//! The split-ledger engine: single-field edits over a per-member
//! paid/owed table that must always reconcile to the expense total.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::core::rounding::{
    percent_of, round_currency, round_percent, split_evenly, submit_tolerance,
};
use crate::domain::expense::{ExpenseRecord, MemberShare};
use crate::domain::member::{Member, MemberId};
use crate::domain::split::{Ledger, PayerSelector, ShareRow, SplitMode};
use crate::errors::{LedgerError, Result};

/// A single user edit, expressed as data so every edit kind funnels
/// through one reducer and one redistribution rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    SetTotal(Decimal),
    SetPayer(PayerSelector),
    SetMode(SplitMode),
    EditPaid { member_id: MemberId, amount: Decimal },
    EditPercent { member_id: MemberId, percent: Decimal },
    EditAmount { member_id: MemberId, amount: Decimal },
}

/// Stateless operations over a [`Ledger`].
///
/// Every operation either completes, leaving the owed column reconciled to
/// the total, or fails and leaves the ledger untouched.
pub struct SplitService;

impl SplitService {
    /// Builds a fresh zeroed ledger in equal mode, first member as payer.
    pub fn initialize(members: &[Member]) -> Ledger {
        Ledger::for_members(members)
    }

    /// Reconstructs an editable ledger from a persisted expense record.
    ///
    /// The payer is the single member with a positive paid share, or
    /// `Multiple` when several paid. Mode becomes `Custom` so the stored
    /// values stay exactly as loaded until the user edits them.
    pub fn load_from_record(record: &ExpenseRecord, members: &[Member]) -> Ledger {
        let total = round_currency(record.amount_base_currency);
        let rows = members
            .iter()
            .map(|member| {
                let share = record.shares.iter().find(|s| s.member_id == member.id);
                let paid = share.map(|s| s.paid_share).unwrap_or(Decimal::ZERO);
                let owed = share.map(|s| s.owed_share).unwrap_or(Decimal::ZERO);
                ShareRow {
                    member_id: member.id.clone(),
                    paid_amount: paid,
                    owed_amount: owed,
                    owed_percent: percent_of(owed, total),
                }
            })
            .collect::<Vec<_>>();
        let mut payers = rows.iter().filter(|r| r.paid_amount > Decimal::ZERO);
        let payer = match (payers.next(), payers.next()) {
            (Some(only), None) => PayerSelector::Single(only.member_id.clone()),
            _ => PayerSelector::Multiple,
        };
        Ledger {
            total_cost: total,
            payer,
            mode: SplitMode::Custom,
            rows,
        }
    }

    /// Applies one [`EditOp`] to the ledger.
    pub fn apply(ledger: &mut Ledger, op: EditOp) -> Result<()> {
        match op {
            EditOp::SetTotal(total) => Self::set_total_cost(ledger, total),
            EditOp::SetPayer(payer) => Self::set_payer(ledger, payer),
            EditOp::SetMode(mode) => Self::set_split_mode(ledger, mode),
            EditOp::EditPaid { member_id, amount } => Self::edit_paid(ledger, &member_id, amount),
            EditOp::EditPercent { member_id, percent } => {
                Self::edit_owed_percent(ledger, &member_id, percent)
            }
            EditOp::EditAmount { member_id, amount } => {
                Self::edit_owed_amount(ledger, &member_id, amount)
            }
        }
    }

    /// Replaces the total cost, re-deriving paid amounts and, in equal
    /// mode, the owed column.
    pub fn set_total_cost(ledger: &mut Ledger, new_total: Decimal) -> Result<()> {
        if new_total < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "total cost cannot be negative: {new_total}"
            )));
        }
        ledger.total_cost = round_currency(new_total);
        Self::rederive_paid(ledger);
        if ledger.mode == SplitMode::Equal {
            Self::rederive_equal_owed(ledger);
        }
        debug!(total = %ledger.total_cost, "total cost updated");
        Ok(())
    }

    /// Changes who paid. A single payer absorbs the full total; selecting
    /// `Multiple` leaves the paid column freely editable.
    pub fn set_payer(ledger: &mut Ledger, payer: PayerSelector) -> Result<()> {
        if let PayerSelector::Single(ref member_id) = payer {
            if ledger.row(member_id).is_none() {
                return Err(LedgerError::UnknownMember(member_id.clone()));
            }
        }
        ledger.payer = payer;
        Self::rederive_paid(ledger);
        Ok(())
    }

    /// Switches the split policy.
    ///
    /// Equal re-derives the owed column by even division; personal assigns
    /// the full total to the carried member; custom freezes the current
    /// values for manual editing.
    pub fn set_split_mode(ledger: &mut Ledger, mode: SplitMode) -> Result<()> {
        if let SplitMode::Personal(ref member_id) = mode {
            if ledger.row(member_id).is_none() {
                return Err(LedgerError::UnknownMember(member_id.clone()));
            }
        }
        ledger.mode = mode;
        match &ledger.mode {
            SplitMode::Equal => Self::rederive_equal_owed(ledger),
            SplitMode::Personal(member_id) => {
                let member_id = member_id.clone();
                let total = ledger.total_cost;
                for row in &mut ledger.rows {
                    if row.member_id == member_id {
                        row.owed_amount = total;
                        row.owed_percent = Decimal::ONE_HUNDRED;
                    } else {
                        row.owed_amount = Decimal::ZERO;
                        row.owed_percent = Decimal::ZERO;
                    }
                }
            }
            SplitMode::Custom => {}
        }
        Ok(())
    }

    /// Overwrites one member's paid amount.
    ///
    /// In equal mode the remainder is spread evenly across the other rows
    /// so the paid column keeps summing to the total; custom mode leaves
    /// balancing to the caller.
    pub fn edit_paid(ledger: &mut Ledger, member_id: &str, amount: Decimal) -> Result<()> {
        let index = ledger
            .row_index(member_id)
            .ok_or_else(|| LedgerError::UnknownMember(member_id.to_string()))?;
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "paid amount cannot be negative: {amount}"
            )));
        }
        let amount = round_currency(amount);
        ledger.rows[index].paid_amount = amount;
        if ledger.mode == SplitMode::Equal {
            let remainder = (ledger.total_cost - amount).max(Decimal::ZERO);
            Self::distribute_paid_remainder(ledger, index, remainder);
        }
        Ok(())
    }

    /// Overwrites one member's owed percentage, deriving the owed amount.
    pub fn edit_owed_percent(ledger: &mut Ledger, member_id: &str, percent: Decimal) -> Result<()> {
        let index = ledger
            .row_index(member_id)
            .ok_or_else(|| LedgerError::UnknownMember(member_id.to_string()))?;
        if percent < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "owed percent cannot be negative: {percent}"
            )));
        }
        let percent = round_percent(percent);
        let owed = round_currency(ledger.total_cost * percent / Decimal::ONE_HUNDRED);
        ledger.rows[index].owed_amount = owed;
        ledger.rows[index].owed_percent = percent;
        if ledger.mode == SplitMode::Equal {
            Self::redistribute_owed(ledger, index);
        }
        Ok(())
    }

    /// Overwrites one member's owed amount, deriving the percentage.
    pub fn edit_owed_amount(ledger: &mut Ledger, member_id: &str, amount: Decimal) -> Result<()> {
        let index = ledger
            .row_index(member_id)
            .ok_or_else(|| LedgerError::UnknownMember(member_id.to_string()))?;
        if amount < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(format!(
                "owed amount cannot be negative: {amount}"
            )));
        }
        let amount = round_currency(amount);
        ledger.rows[index].owed_amount = amount;
        ledger.rows[index].owed_percent = percent_of(amount, ledger.total_cost);
        if ledger.mode == SplitMode::Equal {
            Self::redistribute_owed(ledger, index);
        }
        Ok(())
    }

    /// True when the ledger can be submitted: a positive total and a paid
    /// column within the manual-entry tolerance of it.
    pub fn is_submittable(ledger: &Ledger) -> bool {
        ledger.total_cost > Decimal::ZERO
            && (ledger.paid_total() - ledger.total_cost).abs() <= submit_tolerance()
    }

    /// Emits the per-member shares the persistence layer stores.
    ///
    /// Fails with the unreconciled totals when the ledger is incomplete,
    /// so the caller can surface them instead of force-correcting.
    pub fn submit(ledger: &Ledger) -> Result<Vec<MemberShare>> {
        if !Self::is_submittable(ledger) {
            warn!(
                paid = %ledger.paid_total(),
                total = %ledger.total_cost,
                "submission blocked: paid column does not reconcile"
            );
            return Err(LedgerError::NotSubmittable {
                paid_total: ledger.paid_total(),
                total_cost: ledger.total_cost,
            });
        }
        Ok(ledger
            .rows
            .iter()
            .map(|row| MemberShare {
                member_id: row.member_id.clone(),
                paid_share: row.paid_amount,
                owed_share: row.owed_amount,
            })
            .collect())
    }

    /// Parses a form-field amount, mapping junk input to `InvalidAmount`.
    pub fn parse_amount(raw: &str) -> Result<Decimal> {
        raw.trim()
            .parse::<Decimal>()
            .map_err(|_| LedgerError::InvalidAmount(raw.to_string()))
    }

    /// Re-derives the paid column from the payer selection: a single payer
    /// absorbs the full total, everyone else pays zero. `Multiple` keeps
    /// the hand-entered amounts.
    fn rederive_paid(ledger: &mut Ledger) {
        if let PayerSelector::Single(ref payer_id) = ledger.payer {
            let payer_id = payer_id.clone();
            let total = ledger.total_cost;
            for row in &mut ledger.rows {
                row.paid_amount = if row.member_id == payer_id {
                    total
                } else {
                    Decimal::ZERO
                };
            }
        }
    }

    /// Equal division of the total across all rows, residual to the last.
    fn rederive_equal_owed(ledger: &mut Ledger) {
        let n = ledger.rows.len();
        if n == 0 {
            return;
        }
        let shares = split_evenly(ledger.total_cost, n);
        let percent = round_percent(Decimal::ONE_HUNDRED / Decimal::from(n as u64));
        for (row, share) in ledger.rows.iter_mut().zip(shares) {
            row.owed_amount = share;
            row.owed_percent = percent;
        }
        debug!(rows = n, total = %ledger.total_cost, "owed column re-derived equally");
    }

    /// Spreads what the edited row does not owe across the other rows.
    ///
    /// The edited row keeps its user-supplied value; the last remaining
    /// row in member order absorbs the residual cent.
    fn redistribute_owed(ledger: &mut Ledger, edited: usize) {
        let total = ledger.total_cost;
        let remainder = (total - ledger.rows[edited].owed_amount).max(Decimal::ZERO);
        let others: Vec<usize> = (0..ledger.rows.len()).filter(|&i| i != edited).collect();
        for (position, &i) in others.iter().enumerate() {
            let owed = Self::share_at(remainder, others.len(), position);
            ledger.rows[i].owed_amount = owed;
            ledger.rows[i].owed_percent = percent_of(owed, total);
        }
    }

    /// Paid-side counterpart of [`Self::redistribute_owed`].
    fn distribute_paid_remainder(ledger: &mut Ledger, edited: usize, remainder: Decimal) {
        let others: Vec<usize> = (0..ledger.rows.len()).filter(|&i| i != edited).collect();
        for (position, &i) in others.iter().enumerate() {
            ledger.rows[i].paid_amount = Self::share_at(remainder, others.len(), position);
        }
    }

    /// The `position`-th of `n` even shares of `total`; the last position
    /// receives the residual.
    fn share_at(total: Decimal, n: usize, position: usize) -> Decimal {
        let share = round_currency(total / Decimal::from(n as u64));
        if position + 1 == n {
            total - share * Decimal::from((n - 1) as u64)
        } else {
            share
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn members() -> Vec<Member> {
        vec![
            Member::new("11", "Asha"),
            Member::new("22", "Ravi"),
            Member::new("33", "Mira"),
        ]
    }

    fn equal_ledger(total: &str) -> Ledger {
        let mut ledger = SplitService::initialize(&members());
        SplitService::set_total_cost(&mut ledger, dec(total)).unwrap();
        ledger
    }

    #[test]
    fn initialize_defaults_to_first_payer_and_equal_mode() {
        let ledger = SplitService::initialize(&members());
        assert_eq!(ledger.payer, PayerSelector::Single("11".into()));
        assert_eq!(ledger.mode, SplitMode::Equal);
        assert_eq!(ledger.total_cost, Decimal::ZERO);
        assert!(ledger.rows.iter().all(|r| r.owed_amount == Decimal::ZERO));
    }

    #[test]
    fn negative_total_is_rejected_and_ledger_unchanged() {
        let mut ledger = equal_ledger("100.00");
        let before = ledger.clone();
        let err = SplitService::set_total_cost(&mut ledger, dec("-1")).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(ledger, before);
    }

    #[test]
    fn unknown_member_edit_is_a_no_op() {
        let mut ledger = equal_ledger("100.00");
        let before = ledger.clone();
        let err = SplitService::edit_paid(&mut ledger, "99", dec("10.00")).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownMember(ref id) if id == "99"));
        assert_eq!(ledger, before);
    }

    #[test]
    fn single_payer_absorbs_the_total() {
        let ledger = equal_ledger("100.00");
        assert_eq!(ledger.rows[0].paid_amount, dec("100.00"));
        assert_eq!(ledger.rows[1].paid_amount, Decimal::ZERO);
        assert_eq!(ledger.rows[2].paid_amount, Decimal::ZERO);
    }

    #[test]
    fn multiple_payer_keeps_hand_entered_paid_amounts() {
        let mut ledger = equal_ledger("100.00");
        SplitService::set_payer(&mut ledger, PayerSelector::Multiple).unwrap();
        SplitService::set_split_mode(&mut ledger, SplitMode::Custom).unwrap();
        SplitService::edit_paid(&mut ledger, "11", dec("60.00")).unwrap();
        SplitService::edit_paid(&mut ledger, "22", dec("40.00")).unwrap();
        SplitService::set_total_cost(&mut ledger, dec("100.00")).unwrap();
        assert_eq!(ledger.rows[0].paid_amount, dec("60.00"));
        assert_eq!(ledger.rows[1].paid_amount, dec("40.00"));
    }

    #[test]
    fn personal_mode_assigns_full_total_to_acting_member() {
        let mut ledger = equal_ledger("90.00");
        SplitService::set_split_mode(&mut ledger, SplitMode::Personal("22".into())).unwrap();
        assert_eq!(ledger.rows[1].owed_amount, dec("90.00"));
        assert_eq!(ledger.rows[1].owed_percent, Decimal::ONE_HUNDRED);
        assert_eq!(ledger.rows[0].owed_amount, Decimal::ZERO);
        assert_eq!(ledger.rows[2].owed_percent, Decimal::ZERO);
    }

    #[test]
    fn personal_mode_rejects_unknown_member() {
        let mut ledger = equal_ledger("90.00");
        let before = ledger.clone();
        let err =
            SplitService::set_split_mode(&mut ledger, SplitMode::Personal("77".into())).unwrap_err();
        assert!(matches!(err, LedgerError::UnknownMember(_)));
        assert_eq!(ledger, before);
    }

    #[test]
    fn custom_mode_leaves_values_untouched() {
        let mut ledger = equal_ledger("100.00");
        let owed_before: Vec<_> = ledger.rows.iter().map(|r| r.owed_amount).collect();
        SplitService::set_split_mode(&mut ledger, SplitMode::Custom).unwrap();
        let owed_after: Vec<_> = ledger.rows.iter().map(|r| r.owed_amount).collect();
        assert_eq!(owed_before, owed_after);
    }

    #[test]
    fn custom_mode_owed_edit_does_not_rebalance_others() {
        let mut ledger = equal_ledger("100.00");
        SplitService::set_split_mode(&mut ledger, SplitMode::Custom).unwrap();
        SplitService::edit_owed_amount(&mut ledger, "11", dec("80.00")).unwrap();
        assert_eq!(ledger.rows[0].owed_amount, dec("80.00"));
        assert_eq!(ledger.rows[0].owed_percent, dec("80.0"));
        // Rows 2 and 3 keep their previous equal shares.
        assert_eq!(ledger.rows[1].owed_amount, dec("33.33"));
        assert_eq!(ledger.rows[2].owed_amount, dec("33.34"));
    }

    #[test]
    fn apply_dispatches_every_edit_kind() {
        let mut ledger = SplitService::initialize(&members());
        SplitService::apply(&mut ledger, EditOp::SetTotal(dec("60.00"))).unwrap();
        SplitService::apply(&mut ledger, EditOp::SetPayer(PayerSelector::Single("22".into())))
            .unwrap();
        SplitService::apply(&mut ledger, EditOp::SetMode(SplitMode::Custom)).unwrap();
        SplitService::apply(
            &mut ledger,
            EditOp::EditPercent {
                member_id: "33".into(),
                percent: dec("50.0"),
            },
        )
        .unwrap();
        assert_eq!(ledger.rows[2].owed_amount, dec("30.00"));
        assert_eq!(ledger.rows[1].paid_amount, dec("60.00"));
    }

    #[test]
    fn parse_amount_maps_junk_to_invalid_amount() {
        assert!(matches!(
            SplitService::parse_amount("abc").unwrap_err(),
            LedgerError::InvalidAmount(_)
        ));
        assert_eq!(SplitService::parse_amount(" 12.50 ").unwrap(), dec("12.50"));
    }

    #[test]
    fn submit_rejects_unreconciled_paid_column() {
        let mut ledger = equal_ledger("100.00");
        SplitService::set_payer(&mut ledger, PayerSelector::Multiple).unwrap();
        SplitService::set_split_mode(&mut ledger, SplitMode::Custom).unwrap();
        SplitService::edit_paid(&mut ledger, "11", dec("95.00")).unwrap();
        let err = SplitService::submit(&ledger).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::NotSubmittable { paid_total, total_cost }
                if paid_total == dec("95.00") && total_cost == dec("100.00")
        ));
    }
}
