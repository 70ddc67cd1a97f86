use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{parse_decimal, parse_positive_amount, sanitize_decimal_input};
use crate::{Participant, SplitType, UserId};

/// A participant's split input before it is resolved to a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum SplitValue {
    #[default]
    Unset,
    /// Text as typed, possibly partial ("12.")
    Raw(String),
    Parsed(Decimal),
}

impl SplitValue {
    /// Build from a keystroke, keeping digits and a single decimal point
    pub fn from_input(input: &str) -> Self {
        let sanitized = sanitize_decimal_input(input);
        if sanitized.is_empty() {
            SplitValue::Unset
        } else {
            SplitValue::Raw(sanitized)
        }
    }

    pub fn resolve(&self) -> Option<Decimal> {
        match self {
            SplitValue::Unset => None,
            SplitValue::Raw(text) => parse_decimal(text).ok(),
            SplitValue::Parsed(value) => Some(*value),
        }
    }

    /// Text to show in the input box
    pub fn as_input(&self) -> String {
        match self {
            SplitValue::Unset => String::new(),
            SplitValue::Raw(text) => text.clone(),
            SplitValue::Parsed(value) => value.normalize().to_string(),
        }
    }
}

/// One row of the "Paid by" section. `user_id` is `None` until a payer is picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerEntry {
    pub user_id: Option<UserId>,
    pub amount_paid: Decimal,
}

impl PayerEntry {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            amount_paid: Decimal::ZERO,
        }
    }
}

/// Transient state of an expense being composed. It lives for one form
/// session and is discarded on submit or cancel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    /// The signed-in user composing the expense
    pub owner_id: UserId,
    pub description: String,
    /// Amount as typed; parsed when validating
    pub amount_input: String,
    pub currency: String,
    pub date: NaiveDate,
    pub notes: String,
    pub group_id: Option<i64>,
    pub split_type: SplitType,
    pub participants: Vec<Participant>,
    pub included: BTreeSet<UserId>,
    pub split_values: BTreeMap<UserId, SplitValue>,
    pub payers: Vec<PayerEntry>,
    pub receipt_file_name: Option<String>,
}

impl ExpenseDraft {
    /// Fresh draft where the owner is the only participant and pays everything
    pub fn new(owner: Participant, currency: &str, today: NaiveDate) -> Self {
        let owner_id = owner.id;
        Self {
            owner_id,
            description: String::new(),
            amount_input: String::new(),
            currency: currency.to_string(),
            date: today,
            notes: String::new(),
            group_id: None,
            split_type: SplitType::Equal,
            participants: vec![owner],
            included: BTreeSet::from([owner_id]),
            split_values: BTreeMap::new(),
            payers: vec![PayerEntry::new(owner_id)],
            receipt_file_name: None,
        }
    }

    /// Parsed amount, or `None` while the input is empty, invalid or not positive
    pub fn amount(&self) -> Option<Decimal> {
        parse_positive_amount(&self.amount_input).ok()
    }

    pub fn participant(&self, user_id: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == user_id)
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.participant(user_id).is_some()
    }

    /// Included participants in ascending id order
    pub fn included_ids(&self) -> Vec<UserId> {
        self.included
            .iter()
            .copied()
            .filter(|id| self.is_participant(*id))
            .collect()
    }

    /// Replace the participant set (group or friend picked). Everyone becomes
    /// included, stale split values and payers are dropped, and if no payer
    /// survives the owner (or the first participant) pays.
    pub fn replace_participants(&mut self, participants: Vec<Participant>) {
        let mut seen = BTreeSet::new();
        self.participants = participants
            .into_iter()
            .filter(|p| seen.insert(p.id))
            .collect();

        self.included = self.participants.iter().map(|p| p.id).collect();

        let ids = self.included.clone();
        self.split_values.retain(|id, _| ids.contains(id));
        self.payers
            .retain(|payer| payer.user_id.map_or(false, |id| ids.contains(&id)));

        if self.payers.is_empty() {
            let fallback = if ids.contains(&self.owner_id) {
                Some(self.owner_id)
            } else {
                self.participants.first().map(|p| p.id)
            };
            if let Some(user_id) = fallback {
                self.payers.push(PayerEntry::new(user_id));
            }
        }
    }

    /// Display name for a participant, "You" for the owner
    pub fn display_name(&self, user_id: UserId) -> String {
        if user_id == self.owner_id {
            return "You".to_string();
        }
        self.participant(user_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("User #{}", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn person(id: UserId, name: &str) -> Participant {
        Participant {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn draft() -> ExpenseDraft {
        ExpenseDraft::new(person(1, "Ana"), "USD", NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
    }

    #[test]
    fn test_split_value_resolution() {
        assert_eq!(SplitValue::Unset.resolve(), None);
        assert_eq!(SplitValue::Raw("12.".to_string()).resolve(), Some(dec!(12)));
        assert_eq!(SplitValue::Raw(".".to_string()).resolve(), None);
        assert_eq!(SplitValue::Parsed(dec!(3.5)).resolve(), Some(dec!(3.5)));
    }

    #[test]
    fn test_split_value_from_input() {
        assert_eq!(SplitValue::from_input("abc"), SplitValue::Unset);
        assert_eq!(SplitValue::from_input("4x5.5.0"), SplitValue::Raw("45.50".to_string()));
        assert_eq!(SplitValue::Parsed(dec!(2.50)).as_input(), "2.5");
    }

    #[test]
    fn test_new_draft_owner_pays() {
        let draft = draft();
        assert_eq!(draft.included_ids(), vec![1]);
        assert_eq!(draft.payers, vec![PayerEntry::new(1)]);
        assert_eq!(draft.amount(), None);
        assert_eq!(draft.display_name(1), "You");
    }

    #[test]
    fn test_replace_participants_dedupes_and_includes_everyone() {
        let mut draft = draft();
        draft.split_values.insert(9, SplitValue::Raw("5".to_string()));
        draft.replace_participants(vec![person(1, "Ana"), person(3, "Cy"), person(2, "Ben"), person(3, "Cy")]);

        assert_eq!(draft.participants.len(), 3);
        assert_eq!(draft.included_ids(), vec![1, 2, 3]);
        assert!(draft.split_values.is_empty());
        assert_eq!(draft.payers, vec![PayerEntry::new(1)]);
        assert_eq!(draft.display_name(2), "Ben");
        assert_eq!(draft.display_name(42), "User #42");
    }

    #[test]
    fn test_replace_participants_without_owner_falls_back_to_first() {
        let mut draft = draft();
        draft.replace_participants(vec![person(5, "Eve"), person(6, "Fay")]);
        assert_eq!(draft.payers, vec![PayerEntry::new(5)]);
    }
}
