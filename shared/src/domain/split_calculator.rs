//! Split calculation for a single expense.
//!
//! Turns (amount, split type, included participants, raw per-participant
//! values) into what each participant owes, or explains why the input cannot
//! be split. Participants are always processed in ascending id order; the
//! participant with the highest id is "last" and absorbs any rounding
//! remainder, which is the same tie-break the backend uses.

use std::collections::BTreeMap;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::expense_draft::SplitValue;
use crate::money::{checked_sum, parse_positive_amount, round_money, within_tolerance, MONEY_SCALE};
use crate::{SplitDetail, SplitType, UserId};

/// Tolerance used when comparing EXACT sums to the amount and PERCENTAGE sums to 100
pub const SPLIT_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 3);

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// What one participant owes for the expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwedShare {
    pub user_id: UserId,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplitError {
    #[error("Please enter an amount greater than 0")]
    NonPositiveAmount,
    #[error("Please select at least one participant")]
    NoParticipants,
    #[error("Please enter a valid {} value for each included participant", .split_type.noun())]
    InvalidValue { user_id: UserId, split_type: SplitType },
    #[error("Sum of exact amounts ({actual:.2}) must equal the total expense amount ({expected:.2})")]
    ExactSumMismatch { expected: Decimal, actual: Decimal },
    #[error("Percentages must add up to 100 (currently {actual})")]
    PercentageSumMismatch { actual: Decimal },
    #[error("Shares must add up to more than 0")]
    ZeroShares,
    #[error("The {} values are too large to split", .split_type.noun())]
    ValueTooLarge { split_type: SplitType },
}

/// Compute the owed amounts with the default 0.005 tolerance.
pub fn calculate_split(
    amount: Decimal,
    split_type: SplitType,
    included: &[UserId],
    values: &BTreeMap<UserId, SplitValue>,
) -> Result<Vec<OwedShare>, SplitError> {
    calculate_split_with_tolerance(amount, split_type, included, values, SPLIT_TOLERANCE)
}

pub fn calculate_split_with_tolerance(
    amount: Decimal,
    split_type: SplitType,
    included: &[UserId],
    values: &BTreeMap<UserId, SplitValue>,
    tolerance: Decimal,
) -> Result<Vec<OwedShare>, SplitError> {
    if amount <= Decimal::ZERO {
        return Err(SplitError::NonPositiveAmount);
    }
    let amount = round_money(amount);

    let ids = ordered_ids(included);
    if ids.is_empty() {
        return Err(SplitError::NoParticipants);
    }

    match split_type {
        SplitType::Equal => Ok(equal_shares(amount, &ids)),
        SplitType::Exact => {
            let exact = resolve_values(&ids, values, split_type)?;
            let total = checked_sum(&exact).ok_or(SplitError::ValueTooLarge { split_type })?;
            if !within_tolerance(total, amount, tolerance) {
                return Err(SplitError::ExactSumMismatch {
                    expected: amount,
                    actual: round_money(total),
                });
            }
            Ok(ids
                .iter()
                .zip(exact)
                .map(|(&user_id, value)| OwedShare {
                    user_id,
                    amount: round_money(value),
                })
                .collect())
        }
        SplitType::Percentage => {
            let percentages = resolve_values(&ids, values, split_type)?;
            let total = checked_sum(&percentages).ok_or(SplitError::ValueTooLarge { split_type })?;
            if !within_tolerance(total, ONE_HUNDRED, tolerance) {
                return Err(SplitError::PercentageSumMismatch { actual: total.normalize() });
            }
            proportional_shares(amount, &ids, &percentages, ONE_HUNDRED)
                .ok_or(SplitError::ValueTooLarge { split_type })
        }
        SplitType::Share => {
            let weights = resolve_values(&ids, values, split_type)?;
            let total = checked_sum(&weights).ok_or(SplitError::ValueTooLarge { split_type })?;
            if total.is_zero() {
                return Err(SplitError::ZeroShares);
            }
            proportional_shares(amount, &ids, &weights, total).ok_or(SplitError::ValueTooLarge { split_type })
        }
    }
}

/// Live EQUAL preview while the user is still typing. `None` until the
/// amount parses and at least one participant is included.
pub fn preview_equal_split(amount_input: &str, included: &[UserId]) -> Option<Vec<OwedShare>> {
    let amount = parse_positive_amount(amount_input).ok()?;
    calculate_split(amount, SplitType::Equal, included, &BTreeMap::new()).ok()
}

/// Wire form of the computed split. EQUAL sends no values (the backend
/// divides it again), EXACT sends the owed cents, PERCENTAGE and SHARE send
/// the resolved values the user entered.
pub fn to_split_details(
    split_type: SplitType,
    shares: &[OwedShare],
    values: &BTreeMap<UserId, SplitValue>,
) -> Vec<SplitDetail> {
    shares
        .iter()
        .map(|share| {
            let value = match split_type {
                SplitType::Equal => None,
                SplitType::Exact => Some(share.amount),
                SplitType::Percentage | SplitType::Share => {
                    values.get(&share.user_id).and_then(SplitValue::resolve)
                }
            };
            SplitDetail {
                user_id: share.user_id,
                value,
            }
        })
        .collect()
}

fn ordered_ids(included: &[UserId]) -> Vec<UserId> {
    let mut ids = included.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn equal_shares(amount: Decimal, ids: &[UserId]) -> Vec<OwedShare> {
    let count = Decimal::from(ids.len());
    // Rounded down so the remainder handed to the last participant is never negative
    let per_person = (amount / count).round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero);
    let last = ids.len() - 1;

    ids.iter()
        .enumerate()
        .map(|(index, &user_id)| {
            let owed = if index == last {
                amount - per_person * Decimal::from(last)
            } else {
                per_person
            };
            OwedShare { user_id, amount: owed }
        })
        .collect()
}

fn proportional_shares(
    amount: Decimal,
    ids: &[UserId],
    weights: &[Decimal],
    divisor: Decimal,
) -> Option<Vec<OwedShare>> {
    let last = ids.len() - 1;
    let mut running_total = Decimal::ZERO;
    let mut shares = Vec::with_capacity(ids.len());

    for (index, (&user_id, weight)) in ids.iter().zip(weights).enumerate() {
        let owed = if index == last {
            amount.checked_sub(running_total)?
        } else {
            // Ratio first: it is at most 1, so the product stays within `amount`
            round_money(amount.checked_mul(weight.checked_div(divisor)?)?)
        };
        running_total = running_total.checked_add(owed)?;
        shares.push(OwedShare { user_id, amount: owed });
    }
    Some(shares)
}

fn resolve_values(
    ids: &[UserId],
    values: &BTreeMap<UserId, SplitValue>,
    split_type: SplitType,
) -> Result<Vec<Decimal>, SplitError> {
    ids.iter()
        .map(|user_id| {
            values
                .get(user_id)
                .and_then(SplitValue::resolve)
                .filter(|value| !value.is_sign_negative())
                .ok_or(SplitError::InvalidValue {
                    user_id: *user_id,
                    split_type,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(entries: &[(UserId, &str)]) -> BTreeMap<UserId, SplitValue> {
        entries
            .iter()
            .map(|(id, value)| (*id, SplitValue::Raw(value.to_string())))
            .collect()
    }

    fn amounts(shares: &[OwedShare]) -> Vec<Decimal> {
        shares.iter().map(|s| s.amount).collect()
    }

    #[test]
    fn test_equal_split_assigns_remainder_to_last() {
        let shares = calculate_split(dec!(10.00), SplitType::Equal, &[1, 2, 3], &BTreeMap::new()).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(3.33), dec!(3.33), dec!(3.34)]);
        assert_eq!(shares[2].user_id, 3);
    }

    #[test]
    fn test_equal_split_sums_exactly_for_many_sizes() {
        let totals = [dec!(0.01), dec!(0.02), dec!(1.00), dec!(10.00), dec!(99.99), dec!(1234.57)];
        for total in totals {
            for n in 1..=12i64 {
                let ids: Vec<UserId> = (1..=n).collect();
                let shares = calculate_split(total, SplitType::Equal, &ids, &BTreeMap::new()).unwrap();
                let sum: Decimal = shares.iter().map(|s| s.amount).sum();
                assert_eq!(sum, total, "total {} across {} participants", total, n);
                assert!(shares.iter().all(|s| !s.amount.is_sign_negative()));
            }
        }
    }

    #[test]
    fn test_equal_split_order_does_not_depend_on_input_order() {
        let forward = calculate_split(dec!(10), SplitType::Equal, &[3, 1, 2], &BTreeMap::new()).unwrap();
        let backward = calculate_split(dec!(10), SplitType::Equal, &[2, 3, 1, 3], &BTreeMap::new()).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.iter().map(|s| s.user_id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_exact_split_accepts_matching_sum() {
        let values = raw(&[(1, "20"), (2, "20"), (3, "10")]);
        let shares = calculate_split(dec!(50.00), SplitType::Exact, &[1, 2, 3], &values).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(20), dec!(20), dec!(10)]);
    }

    #[test]
    fn test_exact_split_rejects_mismatch() {
        let values = raw(&[(1, "20"), (2, "20"), (3, "9")]);
        let err = calculate_split(dec!(50.00), SplitType::Exact, &[1, 2, 3], &values).unwrap_err();
        assert_eq!(
            err,
            SplitError::ExactSumMismatch { expected: dec!(50.00), actual: dec!(49) }
        );
        assert_eq!(
            err.to_string(),
            "Sum of exact amounts (49.00) must equal the total expense amount (50.00)"
        );
    }

    #[test]
    fn test_exact_split_tolerance_boundary() {
        let inside = raw(&[(1, "25.004"), (2, "25")]);
        assert!(calculate_split(dec!(50), SplitType::Exact, &[1, 2], &inside).is_ok());

        let outside = raw(&[(1, "25.006"), (2, "25")]);
        assert!(calculate_split(dec!(50), SplitType::Exact, &[1, 2], &outside).is_err());
    }

    #[test]
    fn test_missing_or_invalid_values_name_the_method() {
        let values = raw(&[(1, "20")]);
        let err = calculate_split(dec!(40), SplitType::Exact, &[1, 2], &values).unwrap_err();
        assert_eq!(err, SplitError::InvalidValue { user_id: 2, split_type: SplitType::Exact });
        assert_eq!(err.to_string(), "Please enter a valid exact value for each included participant");

        let values = raw(&[(1, "abc"), (2, "50")]);
        let err = calculate_split(dec!(40), SplitType::Percentage, &[1, 2], &values).unwrap_err();
        assert!(matches!(err, SplitError::InvalidValue { user_id: 1, .. }));

        let mut values = raw(&[(1, "1")]);
        values.insert(2, SplitValue::Unset);
        let err = calculate_split(dec!(40), SplitType::Share, &[1, 2], &values).unwrap_err();
        assert!(matches!(err, SplitError::InvalidValue { user_id: 2, split_type: SplitType::Share }));
    }

    #[test]
    fn test_negative_values_are_rejected() {
        let mut values = BTreeMap::new();
        values.insert(1, SplitValue::Parsed(dec!(60)));
        values.insert(2, SplitValue::Parsed(dec!(-10)));
        let err = calculate_split(dec!(50), SplitType::Exact, &[1, 2], &values).unwrap_err();
        assert!(matches!(err, SplitError::InvalidValue { user_id: 2, .. }));
    }

    #[test]
    fn test_percentage_split() {
        let values = raw(&[(1, "50"), (2, "50")]);
        let shares = calculate_split(dec!(25.00), SplitType::Percentage, &[1, 2], &values).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(12.50), dec!(12.50)]);

        let values = raw(&[(1, "50"), (2, "40")]);
        let err = calculate_split(dec!(25.00), SplitType::Percentage, &[1, 2], &values).unwrap_err();
        assert_eq!(err, SplitError::PercentageSumMismatch { actual: dec!(90) });
        assert_eq!(err.to_string(), "Percentages must add up to 100 (currently 90)");
    }

    #[test]
    fn test_percentage_split_absorbs_rounding() {
        let values = raw(&[(1, "33.33"), (2, "33.33"), (3, "33.34")]);
        let shares = calculate_split(dec!(10.00), SplitType::Percentage, &[1, 2, 3], &values).unwrap();
        let sum: Decimal = shares.iter().map(|s| s.amount).sum();
        assert_eq!(sum, dec!(10.00));
        assert_eq!(amounts(&shares), vec![dec!(3.33), dec!(3.33), dec!(3.34)]);
    }

    #[test]
    fn test_share_split_is_proportional() {
        let values = raw(&[(1, "1"), (2, "2")]);
        let shares = calculate_split(dec!(30), SplitType::Share, &[1, 2], &values).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(10), dec!(20)]);
    }

    #[test]
    fn test_share_split_sums_to_total_for_awkward_weights() {
        let values = raw(&[(1, "3"), (2, "7"), (3, "11"), (4, "0")]);
        let shares = calculate_split(dec!(100.00), SplitType::Share, &[1, 2, 3, 4], &values).unwrap();
        let sum: Decimal = shares.iter().map(|s| s.amount).sum();
        assert_eq!(sum, dec!(100.00));
        assert_eq!(shares[0].amount, dec!(14.29));
    }

    #[test]
    fn test_share_split_rejects_all_zero_weights() {
        let values = raw(&[(1, "0"), (2, "0.0")]);
        let err = calculate_split(dec!(30), SplitType::Share, &[1, 2], &values).unwrap_err();
        assert_eq!(err, SplitError::ZeroShares);
    }

    #[test]
    fn test_empty_participants_and_bad_amount() {
        let err = calculate_split(dec!(30), SplitType::Equal, &[], &BTreeMap::new()).unwrap_err();
        assert_eq!(err.to_string(), "Please select at least one participant");

        let err = calculate_split(dec!(0), SplitType::Equal, &[1], &BTreeMap::new()).unwrap_err();
        assert_eq!(err, SplitError::NonPositiveAmount);
    }

    #[test]
    fn test_recomputing_is_idempotent() {
        let values = raw(&[(4, "2"), (9, "5"), (2, "1")]);
        let first = calculate_split(dec!(77.77), SplitType::Share, &[9, 2, 4], &values).unwrap();
        let second = calculate_split(dec!(77.77), SplitType::Share, &[9, 2, 4], &values).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_preview_equal_split() {
        assert!(preview_equal_split("", &[1, 2]).is_none());
        assert!(preview_equal_split("abc", &[1, 2]).is_none());
        assert!(preview_equal_split("20", &[]).is_none());

        let preview = preview_equal_split("20", &[1, 2]).unwrap();
        assert_eq!(amounts(&preview), vec![dec!(10), dec!(10)]);
    }

    #[test]
    fn test_split_details_per_method() {
        let values = raw(&[(1, "1"), (2, "2")]);
        let shares = calculate_split(dec!(30), SplitType::Share, &[1, 2], &values).unwrap();
        let details = to_split_details(SplitType::Share, &shares, &values);
        assert_eq!(details[1], SplitDetail { user_id: 2, value: Some(dec!(2)) });

        let shares = calculate_split(dec!(10), SplitType::Equal, &[1, 2, 3], &BTreeMap::new()).unwrap();
        let details = to_split_details(SplitType::Equal, &shares, &BTreeMap::new());
        assert_eq!(details[2], SplitDetail { user_id: 3, value: None });
    }

    #[test]
    fn test_exact_details_are_sent_in_cents() {
        let values = raw(&[(1, "25.004"), (2, "25")]);
        let shares = calculate_split(dec!(50), SplitType::Exact, &[1, 2], &values).unwrap();
        let details = to_split_details(SplitType::Exact, &shares, &values);
        assert_eq!(details[0], SplitDetail { user_id: 1, value: Some(dec!(25.00)) });
        assert_eq!(details[1], SplitDetail { user_id: 2, value: Some(dec!(25)) });
    }

    #[test]
    fn test_huge_share_weight_still_splits() {
        let values = raw(&[(1, "100000000000000000000000000"), (2, "1")]);
        let shares = calculate_split(dec!(1000), SplitType::Share, &[1, 2], &values).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(1000), dec!(0)]);
    }

    #[test]
    fn test_share_weights_overflowing_their_sum() {
        let values = raw(&[(1, "50000000000000000000000000000"), (2, "50000000000000000000000000000")]);
        let err = calculate_split(dec!(10), SplitType::Share, &[1, 2], &values).unwrap_err();
        assert_eq!(err, SplitError::ValueTooLarge { split_type: SplitType::Share });
        assert_eq!(err.to_string(), "The share values are too large to split");

        // Large but summable weights still split
        let values = raw(&[(1, "30000000000000000000000000000"), (2, "30000000000000000000000000000")]);
        let shares = calculate_split(dec!(10), SplitType::Share, &[1, 2], &values).unwrap();
        assert_eq!(amounts(&shares), vec![dec!(5), dec!(5)]);
    }

    #[test]
    fn test_percentages_near_decimal_max() {
        let values = raw(&[(1, "79228162514264337593543950335"), (2, "1")]);
        let err = calculate_split(dec!(10), SplitType::Percentage, &[1, 2], &values).unwrap_err();
        assert_eq!(err, SplitError::ValueTooLarge { split_type: SplitType::Percentage });

        let values = raw(&[(1, "50"), (2, "50")]);
        let shares = calculate_split(Decimal::MAX, SplitType::Percentage, &[1, 2], &values).unwrap();
        assert_eq!(checked_sum(shares.iter().map(|s| &s.amount)), Some(Decimal::MAX));
    }

    #[test]
    fn test_exact_values_overflowing_their_sum() {
        let values = raw(&[(1, "79228162514264337593543950335"), (2, "1")]);
        let err = calculate_split(dec!(10), SplitType::Exact, &[1, 2], &values).unwrap_err();
        assert_eq!(err, SplitError::ValueTooLarge { split_type: SplitType::Exact });
    }

    #[test]
    fn test_equal_split_of_the_largest_amount() {
        let shares = calculate_split(Decimal::MAX, SplitType::Equal, &[1, 2, 3], &BTreeMap::new()).unwrap();
        let sum = checked_sum(shares.iter().map(|s| &s.amount)).unwrap();
        assert_eq!(sum, Decimal::MAX);
    }
}
