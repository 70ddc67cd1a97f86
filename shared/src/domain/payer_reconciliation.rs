//! Validation of who paid for an expense.
//!
//! A single payer always covers the whole amount; several payers must each
//! pay something and together match the total.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use super::expense_draft::PayerEntry;
use super::split_calculator::SPLIT_TOLERANCE;
use crate::money::{round_money, within_tolerance};
use crate::{Participant, PayerDetail, UserId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PayerError {
    #[error("At least one payer is required")]
    NoPayers,
    #[error("At least one payer is required")]
    LastPayer,
    #[error("Please select a valid user for each payer")]
    MissingPayer,
    #[error("Payer #{0} is not part of this expense")]
    UnknownPayer(UserId),
    #[error("Payer #{0} is listed more than once")]
    DuplicatePayer(UserId),
    #[error("Each payer must pay an amount greater than 0")]
    NonPositivePayment(UserId),
    #[error("Total paid ({paid:.2}) must equal the expense amount ({expected:.2})")]
    TotalMismatch { paid: Decimal, expected: Decimal },
    #[error("The amounts paid are too large to add up")]
    ValueTooLarge,
}

/// With exactly one payer, force their contribution to the full amount.
/// Returns `true` when an entry was changed.
pub fn sync_single_payer(payers: &mut [PayerEntry], amount: Decimal) -> bool {
    match payers {
        [only] if only.amount_paid != amount => {
            only.amount_paid = amount;
            true
        }
        _ => false,
    }
}

/// Validate the payer rows against the expense amount and participants.
pub fn reconcile_payers(
    payers: &[PayerEntry],
    amount: Decimal,
    participants: &[Participant],
) -> Result<Vec<PayerDetail>, PayerError> {
    reconcile_payers_with_tolerance(payers, amount, participants, SPLIT_TOLERANCE)
}

pub fn reconcile_payers_with_tolerance(
    payers: &[PayerEntry],
    amount: Decimal,
    participants: &[Participant],
    tolerance: Decimal,
) -> Result<Vec<PayerDetail>, PayerError> {
    if payers.is_empty() {
        return Err(PayerError::NoPayers);
    }

    let mut seen = BTreeSet::new();
    for payer in payers {
        let user_id = payer.user_id.ok_or(PayerError::MissingPayer)?;
        if !participants.iter().any(|p| p.id == user_id) {
            return Err(PayerError::UnknownPayer(user_id));
        }
        if !seen.insert(user_id) {
            return Err(PayerError::DuplicatePayer(user_id));
        }
    }

    let amount = round_money(amount);

    if let [only] = payers {
        // The lone payer is auto-corrected, whatever was typed before
        return Ok(vec![PayerDetail {
            user_id: only.user_id.ok_or(PayerError::MissingPayer)?,
            amount_paid: amount,
        }]);
    }

    let mut details = Vec::with_capacity(payers.len());
    let mut paid = Decimal::ZERO;
    for payer in payers {
        let user_id = payer.user_id.ok_or(PayerError::MissingPayer)?;
        if payer.amount_paid <= Decimal::ZERO {
            return Err(PayerError::NonPositivePayment(user_id));
        }
        paid = paid.checked_add(payer.amount_paid).ok_or(PayerError::ValueTooLarge)?;
        details.push(PayerDetail {
            user_id,
            amount_paid: round_money(payer.amount_paid),
        });
    }

    if !within_tolerance(paid, amount, tolerance) {
        return Err(PayerError::TotalMismatch {
            paid: round_money(paid),
            expected: amount,
        });
    }

    Ok(details)
}

/// Append a payer row for the first participant not already paying.
/// The new row starts at zero; if everyone already pays it is left unassigned.
pub fn add_payer(payers: &mut Vec<PayerEntry>, participants: &[Participant]) {
    let paying: BTreeSet<UserId> = payers.iter().filter_map(|p| p.user_id).collect();
    let next = participants.iter().map(|p| p.id).find(|id| !paying.contains(id));
    payers.push(PayerEntry {
        user_id: next,
        amount_paid: Decimal::ZERO,
    });
}

/// Remove a payer row, refusing to drop the last one
pub fn remove_payer(payers: &mut Vec<PayerEntry>, index: usize, amount: Option<Decimal>) -> Result<(), PayerError> {
    if payers.len() <= 1 {
        return Err(PayerError::LastPayer);
    }
    if index < payers.len() {
        payers.remove(index);
    }
    if let Some(amount) = amount {
        sync_single_payer(payers, amount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn people(ids: &[UserId]) -> Vec<Participant> {
        ids.iter()
            .map(|id| Participant {
                id: *id,
                name: format!("User {}", id),
                email: format!("user{}@example.com", id),
            })
            .collect()
    }

    fn paying(entries: &[(UserId, Decimal)]) -> Vec<PayerEntry> {
        entries
            .iter()
            .map(|(id, amount)| PayerEntry {
                user_id: Some(*id),
                amount_paid: *amount,
            })
            .collect()
    }

    #[test]
    fn test_single_payer_follows_amount() {
        let mut payers = paying(&[(1, dec!(20))]);
        assert!(sync_single_payer(&mut payers, dec!(25)));
        assert_eq!(payers[0].amount_paid, dec!(25));
        assert!(!sync_single_payer(&mut payers, dec!(25)));
    }

    #[test]
    fn test_sync_ignores_multiple_payers() {
        let mut payers = paying(&[(1, dec!(10)), (2, dec!(10))]);
        assert!(!sync_single_payer(&mut payers, dec!(25)));
        assert_eq!(payers[0].amount_paid, dec!(10));
    }

    #[test]
    fn test_single_payer_is_forced_to_total() {
        let details = reconcile_payers(&paying(&[(1, dec!(3))]), dec!(40), &people(&[1, 2])).unwrap();
        assert_eq!(details, vec![PayerDetail { user_id: 1, amount_paid: dec!(40) }]);
    }

    #[test]
    fn test_multiple_payers_must_match_total() {
        let participants = people(&[1, 2]);
        assert!(reconcile_payers(&paying(&[(1, dec!(20)), (2, dec!(20))]), dec!(40), &participants).is_ok());

        let err = reconcile_payers(&paying(&[(1, dec!(20)), (2, dec!(15))]), dec!(40), &participants).unwrap_err();
        assert_eq!(err, PayerError::TotalMismatch { paid: dec!(35), expected: dec!(40) });
        assert_eq!(err.to_string(), "Total paid (35.00) must equal the expense amount (40.00)");
    }

    #[test]
    fn test_multiple_payers_must_each_pay() {
        let err = reconcile_payers(&paying(&[(1, dec!(40)), (2, dec!(0))]), dec!(40), &people(&[1, 2])).unwrap_err();
        assert_eq!(err, PayerError::NonPositivePayment(2));
    }

    #[test]
    fn test_invalid_payer_rows() {
        let participants = people(&[1, 2]);
        assert_eq!(reconcile_payers(&[], dec!(10), &participants).unwrap_err(), PayerError::NoPayers);

        let unassigned = vec![PayerEntry { user_id: None, amount_paid: dec!(10) }];
        assert_eq!(reconcile_payers(&unassigned, dec!(10), &participants).unwrap_err(), PayerError::MissingPayer);

        let stranger = paying(&[(7, dec!(10))]);
        assert_eq!(reconcile_payers(&stranger, dec!(10), &participants).unwrap_err(), PayerError::UnknownPayer(7));

        let twice = paying(&[(1, dec!(5)), (1, dec!(5))]);
        let err = reconcile_payers(&twice, dec!(10), &participants).unwrap_err();
        assert_eq!(err, PayerError::DuplicatePayer(1));
        assert_eq!(err.to_string(), "Payer #1 is listed more than once");
    }

    #[test]
    fn test_payments_overflowing_their_sum() {
        let participants = people(&[1, 2]);
        let payers = paying(&[(1, Decimal::MAX), (2, dec!(1))]);
        let err = reconcile_payers(&payers, dec!(10), &participants).unwrap_err();
        assert_eq!(err, PayerError::ValueTooLarge);

        let payers = paying(&[(1, dec!(50000000000000000000000000000)), (2, dec!(20000000000000000000000000000))]);
        let details = reconcile_payers(&payers, dec!(70000000000000000000000000000), &participants).unwrap();
        assert_eq!(details.len(), 2);
    }

    #[test]
    fn test_add_and_remove_payers() {
        let participants = people(&[1, 2]);
        let mut payers = paying(&[(1, dec!(30))]);

        add_payer(&mut payers, &participants);
        assert_eq!(payers[1].user_id, Some(2));
        add_payer(&mut payers, &participants);
        assert_eq!(payers[2].user_id, None);

        remove_payer(&mut payers, 2, Some(dec!(30))).unwrap();
        remove_payer(&mut payers, 1, Some(dec!(30))).unwrap();
        assert_eq!(payers, paying(&[(1, dec!(30))]));
        assert_eq!(remove_payer(&mut payers, 0, None).unwrap_err(), PayerError::LastPayer);
    }

    #[test]
    fn test_removing_down_to_one_payer_resyncs_amount() {
        let mut payers = paying(&[(1, dec!(10)), (2, dec!(15))]);
        remove_payer(&mut payers, 1, Some(dec!(25))).unwrap();
        assert_eq!(payers, paying(&[(1, dec!(25))]));
    }
}
