//! Pre-populating a draft from a scanned receipt.

use chrono::NaiveDate;
use tracing::debug;

use super::expense_draft::ExpenseDraft;
use super::payer_reconciliation::sync_single_payer;
use crate::money::format_plain;
use crate::ReceiptScanResponse;

/// Which draft fields a scan overwrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReceiptAutofill {
    pub description: bool,
    pub amount_changed: bool,
    pub date: bool,
    pub notes: bool,
}

impl ReceiptAutofill {
    /// The payer and split sections were set up for a different amount
    pub fn needs_review(&self) -> bool {
        self.amount_changed
    }
}

/// Copy whatever the scan recognised into the draft. Fields the scan could
/// not read are left as the user had them.
pub fn apply_receipt(draft: &mut ExpenseDraft, scan: &ReceiptScanResponse) -> ReceiptAutofill {
    let mut filled = ReceiptAutofill::default();

    if let Some(store) = scan.store_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        draft.description = store.to_string();
        filled.description = true;
    }

    if let Some(date) = scan.date.as_deref().and_then(parse_receipt_date) {
        draft.date = date;
        filled.date = true;
    }

    if let Some(total) = scan.total_amount.filter(|t| t.is_sign_positive() && !t.is_zero()) {
        let previous = draft.amount();
        draft.amount_input = format_plain(total);
        filled.amount_changed = previous != draft.amount();
        if let Some(amount) = draft.amount() {
            sync_single_payer(&mut draft.payers, amount);
        }
    }

    let lines: Vec<String> = scan
        .items
        .iter()
        .map(|item| {
            let name = item
                .name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or("Item");
            let price = item.price.map(format_plain).unwrap_or_else(|| "N/A".to_string());
            format!("{}: {}", name, price)
        })
        .collect();
    if !lines.is_empty() {
        draft.notes = lines.join("\n");
        filled.notes = true;
    }

    debug!(?filled, "applied receipt scan");
    filled
}

/// Receipt dates arrive as `YYYY-MM-DD` or a full RFC 3339 timestamp
fn parse_receipt_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Participant, ReceiptItem};
    use rust_decimal_macros::dec;

    fn draft() -> ExpenseDraft {
        let owner = Participant {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        };
        let mut draft = ExpenseDraft::new(owner, "USD", NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        draft.description = "Lunch".to_string();
        draft.amount_input = "12".to_string();
        draft.notes = "typed by hand".to_string();
        draft
    }

    #[test]
    fn test_full_scan_fills_every_field() {
        let mut draft = draft();
        let scan = ReceiptScanResponse {
            store_name: Some("Corner Market".to_string()),
            date: Some("2025-02-14T18:30:00Z".to_string()),
            total_amount: Some(dec!(23.5)),
            items: vec![
                ReceiptItem { name: Some("Bread".to_string()), price: Some(dec!(3.5)) },
                ReceiptItem { name: None, price: None },
            ],
        };

        let filled = apply_receipt(&mut draft, &scan);

        assert!(filled.description && filled.date && filled.notes);
        assert!(filled.needs_review());
        assert_eq!(draft.description, "Corner Market");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 2, 14).unwrap());
        assert_eq!(draft.amount_input, "23.50");
        assert_eq!(draft.notes, "Bread: 3.50\nItem: N/A");
        assert_eq!(draft.payers[0].amount_paid, dec!(23.50));
    }

    #[test]
    fn test_missing_fields_keep_user_input() {
        let mut draft = draft();
        let scan = ReceiptScanResponse {
            store_name: Some("   ".to_string()),
            date: Some("last tuesday".to_string()),
            total_amount: None,
            items: vec![],
        };

        let filled = apply_receipt(&mut draft, &scan);

        assert_eq!(filled, ReceiptAutofill::default());
        assert_eq!(draft.description, "Lunch");
        assert_eq!(draft.amount_input, "12");
        assert_eq!(draft.notes, "typed by hand");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_same_total_is_not_flagged() {
        let mut draft = draft();
        let scan = ReceiptScanResponse {
            total_amount: Some(dec!(12)),
            ..Default::default()
        };
        assert!(!apply_receipt(&mut draft, &scan).amount_changed);
    }
}
