use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Direction, EngineError, MoneyCents, ResultEngine, util::normalize_note};

/// One signed change to apply to an account balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct BalanceAdjustment {
    pub(super) account_id: Uuid,
    pub(super) delta: MoneyCents,
    /// Whether the engine's non-negative mode applies to this delta.
    /// Reversals of an existing effect are never floored.
    pub(super) floored: bool,
}

pub(super) fn ensure_positive_amount(amount: MoneyCents) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::Validation("amount must be > 0".to_string()));
    }
    Ok(())
}

/// Deltas that move a transaction's balance effect from
/// `(old_account, old_amount)` to `(new_account, new_amount)`.
///
/// Same account: one delta for the signed difference, nothing if the amount
/// did not change. Different accounts: the old effect is reversed on the old
/// account, then the new effect is applied on the new one.
pub(super) fn balance_adjustments(
    direction: Direction,
    old_account: Uuid,
    old_amount: MoneyCents,
    new_account: Uuid,
    new_amount: MoneyCents,
) -> ResultEngine<Vec<BalanceAdjustment>> {
    if old_account == new_account {
        let diff = new_amount
            .checked_sub(old_amount)
            .ok_or_else(|| EngineError::Validation("amount out of range".to_string()))?;
        if diff == MoneyCents::ZERO {
            return Ok(Vec::new());
        }
        return Ok(vec![BalanceAdjustment {
            account_id: new_account,
            delta: direction.signed(diff),
            floored: true,
        }]);
    }

    Ok(vec![
        BalanceAdjustment {
            account_id: old_account,
            delta: -direction.signed(old_amount),
            floored: false,
        },
        BalanceAdjustment {
            account_id: new_account,
            delta: direction.signed(new_amount),
            floored: true,
        },
    ])
}

/// A `None` patch keeps the stored note; a blank patch clears it.
pub(super) fn apply_note_patch(
    existing: Option<String>,
    patch: Option<&str>,
) -> ResultEngine<Option<String>> {
    match patch {
        None => Ok(existing),
        Some(value) => normalize_note(Some(value)),
    }
}

pub(super) fn apply_datetime_patch(
    existing: DateTime<Utc>,
    patch: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    patch.unwrap_or(existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(value: i64) -> MoneyCents {
        MoneyCents::new(value)
    }

    #[test]
    fn same_account_outgoing_increase_debits_the_difference() {
        let account = Uuid::new_v4();
        let adjustments =
            balance_adjustments(Direction::Out, account, cents(50_00), account, cents(80_00))
                .unwrap();
        assert_eq!(
            adjustments,
            vec![BalanceAdjustment {
                account_id: account,
                delta: cents(-30_00),
                floored: true,
            }]
        );
    }

    #[test]
    fn same_account_incoming_decrease_debits_the_difference() {
        let account = Uuid::new_v4();
        let adjustments =
            balance_adjustments(Direction::In, account, cents(100_00), account, cents(40_00))
                .unwrap();
        assert_eq!(adjustments[0].delta, cents(-60_00));
    }

    #[test]
    fn same_account_same_amount_is_a_no_op() {
        let account = Uuid::new_v4();
        let adjustments =
            balance_adjustments(Direction::Out, account, cents(10_00), account, cents(10_00))
                .unwrap();
        assert!(adjustments.is_empty());
    }

    #[test]
    fn account_change_reverses_then_reapplies() {
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        let adjustments =
            balance_adjustments(Direction::Out, old, cents(50_00), new, cents(70_00)).unwrap();
        assert_eq!(
            adjustments,
            vec![
                BalanceAdjustment {
                    account_id: old,
                    delta: cents(50_00),
                    floored: false,
                },
                BalanceAdjustment {
                    account_id: new,
                    delta: cents(-70_00),
                    floored: true,
                },
            ]
        );
    }

    #[test]
    fn incoming_account_change_moves_the_credit() {
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        let adjustments =
            balance_adjustments(Direction::In, old, cents(25_00), new, cents(25_00)).unwrap();
        assert_eq!(adjustments[0].delta, cents(-25_00));
        assert_eq!(adjustments[1].delta, cents(25_00));
    }

    #[test]
    fn note_patch_keeps_or_clears() {
        let existing = Some("rent".to_string());
        assert_eq!(apply_note_patch(existing.clone(), None).unwrap(), existing);
        assert_eq!(apply_note_patch(existing, Some("  ")).unwrap(), None);
    }
}
