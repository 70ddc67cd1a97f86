//! Feeds shown on the activity screen and the group page.
//!
//! Expenses and group creations are merged into one newest-first list, and
//! each expense carries the signed-in user's net change: what they paid
//! minus what they owe.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;

use crate::money::checked_sum;
use crate::{ExpenseResponse, GroupResponse, TransactionDto, UserId};

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityKind {
    ExpenseAdded(ExpenseResponse),
    GroupCreated(GroupResponse),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub timestamp: Option<NaiveDateTime>,
    /// "You" or the other user's name
    pub actor_name: String,
    pub description: String,
    /// `in "Group name"` when the expense belongs to a known group
    pub context: Option<String>,
    /// Positive when the user gets money back
    pub net_change: Option<Decimal>,
    pub currency: Option<String>,
}

impl ActivityItem {
    /// Stable key for list rendering
    pub fn key(&self) -> String {
        match &self.kind {
            ActivityKind::ExpenseAdded(expense) => format!("expense-{}", expense.id),
            ActivityKind::GroupCreated(group) => format!("group-{}", group.id),
        }
    }
}

pub fn build_activity(expenses: &[ExpenseResponse], groups: &[GroupResponse], user_id: UserId) -> Vec<ActivityItem> {
    let actor = |id: Option<UserId>, name: Option<&str>| -> String {
        match (id, name) {
            (Some(id), _) if id == user_id => "You".to_string(),
            (_, Some(name)) => name.to_string(),
            _ => "Someone".to_string(),
        }
    };

    let expense_items = expenses.iter().map(|expense| {
        let first_payer = expense.payers.first().map(|p| &p.user);
        let group_name = expense
            .group_id
            .and_then(|id| groups.iter().find(|g| g.id == id))
            .map(|g| g.name.as_str());
        ActivityItem {
            kind: ActivityKind::ExpenseAdded(expense.clone()),
            timestamp: parse_timestamp(&expense.created_at),
            actor_name: actor(first_payer.map(|u| u.id), first_payer.map(|u| u.name.as_str())),
            description: format!("added \"{}\"", expense.description),
            context: group_name.map(|name| format!("in \"{}\"", name)),
            net_change: net_change_for(expense, user_id),
            currency: Some(expense.currency.clone()),
        }
    });

    let group_items = groups.iter().map(|group| ActivityItem {
        kind: ActivityKind::GroupCreated(group.clone()),
        timestamp: group.created_at.as_deref().and_then(parse_timestamp),
        actor_name: actor(Some(group.creator.id), Some(group.creator.name.as_str())),
        description: format!("created the group \"{}\"", group.name),
        context: None,
        net_change: None,
        currency: None,
    });

    let mut items: Vec<ActivityItem> = expense_items.chain(group_items).collect();
    // Newest first; entries without a readable timestamp go last
    items.sort_by_key(|item| Reverse(item.timestamp));
    items
}

/// What `user_id` paid minus what they owe on one expense.
/// `None` if the backend sent amounts too large to combine.
pub fn net_change_for(expense: &ExpenseResponse, user_id: UserId) -> Option<Decimal> {
    let paid = checked_sum(
        expense
            .payers
            .iter()
            .filter(|p| p.user.id == user_id)
            .map(|p| &p.amount_paid),
    )?;
    let owed = checked_sum(
        expense
            .splits
            .iter()
            .filter(|s| s.owed_by.id == user_id)
            .map(|s| &s.amount_owed),
    )?;
    paid.checked_sub(owed)
}

/// Group feed order: newest date first, later ids first within a day
pub fn sort_transactions(transactions: &mut [TransactionDto]) {
    transactions.sort_by_key(|t| Reverse((t.date(), t.id())));
}

/// Backend timestamps come as RFC 3339 or as a zone-less local time
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}
