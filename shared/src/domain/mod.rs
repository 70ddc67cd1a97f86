//! Client-side business rules for composing expenses and payments.
//!
//! The UI only renders state and forwards events; every rule about how an
//! expense is split, who paid, and when a draft may be sent lives here so it
//! can be exercised without a browser.

pub mod activity;
pub mod expense_draft;
pub mod expense_form;
pub mod participants;
pub mod payer_reconciliation;
pub mod payment_form;
pub mod receipt_autofill;
pub mod registration;
pub mod split_calculator;
pub mod submission;

pub use activity::{build_activity, net_change_for, sort_transactions, ActivityItem, ActivityKind};
pub use expense_draft::{ExpenseDraft, PayerEntry, SplitValue};
pub use expense_form::{ExpenseFormController, FormError, FormPhase};
pub use participants::{
    participants_for_expense, participants_for_friend, participants_for_group, participants_for_payment,
};
pub use payer_reconciliation::{add_payer, reconcile_payers, remove_payer, sync_single_payer, PayerError};
pub use payment_form::{PaymentDraft, PaymentFormController, PaymentFormError};
pub use receipt_autofill::{apply_receipt, ReceiptAutofill};
pub use registration::{normalize_email, RegistrationDraft, RegistrationError};
pub use split_calculator::{calculate_split, preview_equal_split, to_split_details, OwedShare, SplitError};
pub use submission::{
    submit_expense, submit_payment, ExpenseGateway, PaymentGateway, SubmitError, SubmitTarget,
    SubmitTicket,
};
