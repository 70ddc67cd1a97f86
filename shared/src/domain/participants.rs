use std::collections::BTreeSet;

use crate::{ExpenseResponse, FriendshipResponse, GroupResponse, Participant, PaymentResponse};

/// The signed-in user followed by the group's creator and members, without repeats
pub fn participants_for_group(group: &GroupResponse, current_user: &Participant) -> Vec<Participant> {
    let others = std::iter::once(&group.creator)
        .chain(group.members.iter())
        .map(Participant::from);
    with_current_user_first(current_user, others)
}

/// The signed-in user and one friend
pub fn participants_for_friend(friendship: &FriendshipResponse, current_user: &Participant) -> Vec<Participant> {
    with_current_user_first(current_user, std::iter::once(Participant::from(&friendship.other_user)))
}

/// Everyone who can take part when an existing expense is edited: the
/// group's members when the group is known, plus whoever already paid or owes.
pub fn participants_for_expense(
    expense: &ExpenseResponse,
    group: Option<&GroupResponse>,
    current_user: &Participant,
) -> Vec<Participant> {
    let members = group
        .map(|g| participants_for_group(g, current_user))
        .unwrap_or_default();
    let involved = expense
        .payers
        .iter()
        .map(|p| Participant::from(&p.user))
        .chain(expense.splits.iter().map(|s| Participant::from(&s.owed_by)));
    with_current_user_first(current_user, members.into_iter().chain(involved))
}

/// Payer and recipient of a payment, plus the group's members when known
pub fn participants_for_payment(
    payment: &PaymentResponse,
    group: Option<&GroupResponse>,
    current_user: &Participant,
) -> Vec<Participant> {
    let members = group
        .map(|g| participants_for_group(g, current_user))
        .unwrap_or_default();
    let involved = [Participant::from(&payment.paid_by), Participant::from(&payment.paid_to)];
    with_current_user_first(current_user, members.into_iter().chain(involved))
}

fn with_current_user_first(
    current_user: &Participant,
    others: impl Iterator<Item = Participant>,
) -> Vec<Participant> {
    let mut seen = BTreeSet::from([current_user.id]);
    std::iter::once(current_user.clone())
        .chain(others.filter(|p| seen.insert(p.id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FriendshipStatus, UserResponse};

    fn user(id: i64, name: &str) -> UserResponse {
        UserResponse {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            created_at: None,
        }
    }

    #[test]
    fn test_group_participants_start_with_current_user() {
        let group = GroupResponse {
            id: 10,
            name: "Flat".to_string(),
            created_at: None,
            creator: user(2, "Ben"),
            members: vec![user(1, "Ana"), user(2, "Ben"), user(3, "Cy")],
            payments: vec![],
        };
        let me = Participant::from(&user(1, "Ana"));

        let ids: Vec<i64> = participants_for_group(&group, &me).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_expense_participants_merge_group_and_involved_users() {
        use crate::{PayerResponse, SplitResponse, SplitType};
        use rust_decimal_macros::dec;

        let group = GroupResponse {
            id: 10,
            name: "Flat".to_string(),
            created_at: None,
            creator: user(2, "Ben"),
            members: vec![user(1, "Ana"), user(2, "Ben")],
            payments: vec![],
        };
        let expense = ExpenseResponse {
            id: 5,
            description: "Rent".to_string(),
            amount: dec!(100),
            currency: "USD".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            created_at: String::new(),
            group_id: Some(10),
            split_type: SplitType::Equal,
            payers: vec![PayerResponse { user: user(2, "Ben"), amount_paid: dec!(100) }],
            splits: vec![SplitResponse { split_id: 1, owed_by: user(4, "Dee"), amount_owed: dec!(100) }],
            notes: None,
            receipt_url: None,
        };
        let me = Participant::from(&user(1, "Ana"));

        let ids: Vec<i64> = participants_for_expense(&expense, Some(&group), &me).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        let ids: Vec<i64> = participants_for_expense(&expense, None, &me).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_payment_participants() {
        let payment = PaymentResponse {
            id: 8,
            amount: rust_decimal::Decimal::ONE,
            currency: "USD".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            created_at: String::new(),
            group_id: None,
            paid_by: user(1, "Ana"),
            paid_to: user(3, "Cy"),
            description: None,
        };
        let me = Participant::from(&user(1, "Ana"));
        let ids: Vec<i64> = participants_for_payment(&payment, None, &me).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_friend_participants() {
        let friendship = FriendshipResponse {
            id: 4,
            other_user: user(7, "Gus"),
            status: FriendshipStatus::Accepted,
            direction: None,
            action_user_id: None,
            net_balance: None,
        };
        let me = Participant::from(&user(1, "Ana"));

        let people = participants_for_friend(&friendship, &me);
        assert_eq!(people.len(), 2);
        assert_eq!(people[0], me);
        assert_eq!(people[1].name, "Gus");
    }
}
