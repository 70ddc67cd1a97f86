use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod domain;
pub mod error;
pub mod money;

pub use config::ClientConfig;
pub use error::{ApiError, ErrorResponse};

/// Backend user identifier
pub type UserId = i64;

/// A registered user as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// RFC 3339 timestamp, omitted by some endpoints
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Someone who can take part in an expense on the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&UserResponse> for Participant {
    fn from(user: &UserResponse) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<UserResponse> for Participant {
    fn from(user: UserResponse) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// How an expense total is divided among participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitType {
    #[default]
    Equal,
    Exact,
    Percentage,
    Share,
}

impl SplitType {
    pub const ALL: [SplitType; 4] = [
        SplitType::Equal,
        SplitType::Exact,
        SplitType::Percentage,
        SplitType::Share,
    ];

    /// Wire name, as the backend expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Equal => "EQUAL",
            SplitType::Exact => "EXACT",
            SplitType::Percentage => "PERCENTAGE",
            SplitType::Share => "SHARE",
        }
    }

    /// Label used in error messages and on the split button ("exact", "share", ...)
    pub fn noun(&self) -> &'static str {
        match self {
            SplitType::Equal => "equal",
            SplitType::Exact => "exact",
            SplitType::Percentage => "percentage",
            SplitType::Share => "share",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SplitType::Equal => "Split equally",
            SplitType::Exact => "Split by exact amounts",
            SplitType::Percentage => "Split by percentages",
            SplitType::Share => "Split by shares",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Auth ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Token issued by the backend on login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    pub id: UserId,
    pub email: String,
    pub name: String,
}

impl JwtResponse {
    pub fn user(&self) -> Participant {
        Participant {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

// --- Groups ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    pub creator: UserResponse,
    #[serde(default)]
    pub members: Vec<UserResponse>,
    #[serde(default)]
    pub payments: Vec<PaymentResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupCreateRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub member_email: String,
}

// --- Friendships ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FriendshipDirection {
    Incoming,
    Outgoing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub id: i64,
    pub other_user: UserResponse,
    pub status: FriendshipStatus,
    #[serde(default)]
    pub direction: Option<FriendshipDirection>,
    #[serde(default)]
    pub action_user_id: Option<UserId>,
    #[serde(default)]
    pub net_balance: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub recipient_email: String,
}

// --- Balances ---

/// Net amount between the current user and one other user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDto {
    pub other_user: UserResponse,
    /// Positive when the other user owes the current user
    pub net_amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallBalanceSummary {
    pub total_owed_to_user: Decimal,
    pub total_owed_by_user: Decimal,
    pub currency: String,
}

impl OverallBalanceSummary {
    pub fn net(&self) -> Decimal {
        self.total_owed_to_user - self.total_owed_by_user
    }
}

// --- Expenses ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerDetail {
    pub user_id: UserId,
    pub amount_paid: Decimal,
}

/// One participant's resolved split value; for EQUAL it is the computed owed amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitDetail {
    pub user_id: UserId,
    pub value: Option<Decimal>,
}

/// Body of the create/update expense endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseCreateRequest {
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    /// Serialized as YYYY-MM-DD
    pub date: NaiveDate,
    pub group_id: Option<i64>,
    pub split_type: SplitType,
    pub payers: Vec<PayerDetail>,
    pub splits: Vec<SplitDetail>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayerResponse {
    pub user: UserResponse,
    pub amount_paid: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitResponse {
    pub split_id: i64,
    pub owed_by: UserResponse,
    pub amount_owed: Decimal,
}

/// Expense record echoed back by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub created_at: String,
    #[serde(default)]
    pub group_id: Option<i64>,
    pub split_type: SplitType,
    pub payers: Vec<PayerResponse>,
    pub splits: Vec<SplitResponse>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
}

// --- Payments ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCreateRequest {
    pub paid_to_user_id: UserId,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub currency: String,
    pub group_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: i64,
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub created_at: String,
    #[serde(default)]
    pub group_id: Option<i64>,
    pub paid_by: UserResponse,
    pub paid_to: UserResponse,
    #[serde(default)]
    pub description: Option<String>,
}

/// Entry of a group's activity feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransactionDto {
    Expense(ExpenseResponse),
    Payment(PaymentResponse),
}

impl TransactionDto {
    pub fn id(&self) -> i64 {
        match self {
            TransactionDto::Expense(e) => e.id,
            TransactionDto::Payment(p) => p.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            TransactionDto::Expense(e) => e.date,
            TransactionDto::Payment(p) => p.date,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            TransactionDto::Expense(e) => e.amount,
            TransactionDto::Payment(p) => p.amount,
        }
    }
}

// --- Comments ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentCreateRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i64,
    pub content: String,
    pub created_at: String,
    pub author: UserResponse,
    pub expense_id: i64,
}

// --- Receipts ---

/// Parsed receipt returned by the scan endpoint; every field may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptScanResponse {
    pub store_name: Option<String>,
    pub date: Option<String>,
    pub total_amount: Option<Decimal>,
    pub items: Vec<ReceiptItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReceiptItem {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_split_type_wire_names() {
        assert_eq!(serde_json::to_string(&SplitType::Percentage).unwrap(), "\"PERCENTAGE\"");
        let parsed: SplitType = serde_json::from_str("\"SHARE\"").unwrap();
        assert_eq!(parsed, SplitType::Share);
        assert_eq!(SplitType::from_wire("EXACT"), Some(SplitType::Exact));
        assert_eq!(SplitType::from_wire("exact"), None);
    }

    #[test]
    fn test_expense_request_shape() {
        let request = ExpenseCreateRequest {
            description: "Dinner".to_string(),
            amount: dec!(30.00),
            currency: "USD".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            group_id: None,
            split_type: SplitType::Share,
            payers: vec![PayerDetail { user_id: 1, amount_paid: dec!(30.00) }],
            splits: vec![
                SplitDetail { user_id: 1, value: Some(dec!(1)) },
                SplitDetail { user_id: 2, value: Some(dec!(2)) },
            ],
            notes: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["date"], "2025-03-14");
        assert_eq!(json["splitType"], "SHARE");
        assert_eq!(json["groupId"], serde_json::Value::Null);
        assert_eq!(json["payers"][0]["userId"], 1);
        assert_eq!(json["payers"][0]["amountPaid"].as_f64(), Some(30.0));
        assert_eq!(json["splits"][1]["value"].as_f64(), Some(2.0));
    }

    #[test]
    fn test_transaction_feed_is_tagged() {
        let json = r#"[
            {"type": "payment", "id": 7, "amount": 12.5, "currency": "USD", "date": "2025-01-02",
             "createdAt": "2025-01-02T10:00:00Z",
             "paidBy": {"id": 1, "name": "Ana", "email": "ana@example.com"},
             "paidTo": {"id": 2, "name": "Ben", "email": "ben@example.com"}}
        ]"#;

        let feed: Vec<TransactionDto> = serde_json::from_str(json).unwrap();
        assert_eq!(feed.len(), 1);
        assert!(matches!(feed[0], TransactionDto::Payment(_)));
        assert_eq!(feed[0].id(), 7);
        assert_eq!(feed[0].amount(), dec!(12.5));
    }

    #[test]
    fn test_receipt_scan_tolerates_missing_fields() {
        let scan: ReceiptScanResponse = serde_json::from_str(r#"{"storeName": "Corner Shop"}"#).unwrap();
        assert_eq!(scan.store_name.as_deref(), Some("Corner Shop"));
        assert!(scan.total_amount.is_none());
        assert!(scan.items.is_empty());
    }

    #[test]
    fn test_overall_balance_net() {
        let summary = OverallBalanceSummary {
            total_owed_to_user: dec!(40.00),
            total_owed_by_user: dec!(15.50),
            currency: "USD".to_string(),
        };
        assert_eq!(summary.net(), dec!(24.50));
    }
}
