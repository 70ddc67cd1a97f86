//! Form state controller for adding or editing an expense.
//!
//! The controller owns one [`ExpenseDraft`] and walks it through
//! `Editing -> Validating -> Submitting -> Done`. The UI forwards every user
//! event to it and renders whatever it exposes; it never edits the draft
//! directly. Validation runs entirely here before anything touches the
//! network, and at most one submission can be in flight per draft.

use chrono::NaiveDate;
use futures::future::AbortHandle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::expense_draft::{ExpenseDraft, PayerEntry, SplitValue};
use super::payer_reconciliation::{self, reconcile_payers_with_tolerance, sync_single_payer, PayerError};
use super::receipt_autofill::{apply_receipt, ReceiptAutofill};
use super::split_calculator::{
    calculate_split_with_tolerance, preview_equal_split, to_split_details, OwedShare, SplitError,
};
use super::submission::{SubmitError, SubmitTarget, SubmitTicket};
use crate::config::ClientConfig;
use crate::money::{format_plain, parse_decimal, round_money};
use crate::{
    ExpenseCreateRequest, ExpenseResponse, Participant, ReceiptScanResponse, SplitType, UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormPhase {
    Editing,
    Validating,
    Submitting,
    Done,
}

impl FormPhase {
    /// Inputs are locked while a save is being prepared or is in flight
    pub fn is_busy(self) -> bool {
        matches!(self, FormPhase::Validating | FormPhase::Submitting)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Please enter a description")]
    EmptyDescription,
    #[error("Description is too long ({length} characters). Maximum is {max}.")]
    DescriptionTooLong { length: usize, max: usize },
    #[error("Please enter an amount greater than 0")]
    InvalidAmount,
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Payer(#[from] PayerError),
    #[error("This expense is already being saved")]
    AlreadySubmitting,
    #[error("This expense has already been saved")]
    Closed,
    #[error("Failed to save expense: {0}")]
    Submit(#[from] SubmitError),
}

#[derive(Debug, Clone)]
pub struct ExpenseFormController {
    config: ClientConfig,
    draft: ExpenseDraft,
    phase: FormPhase,
    error: Option<FormError>,
    target: SubmitTarget,
    in_flight: Option<AbortHandle>,
    saved: Option<ExpenseResponse>,
}

impl ExpenseFormController {
    /// Blank form where `owner` is the only participant and pays
    pub fn new(owner: Participant, today: NaiveDate) -> Self {
        Self::with_config(ClientConfig::default(), owner, today)
    }

    pub fn with_config(config: ClientConfig, owner: Participant, today: NaiveDate) -> Self {
        let draft = ExpenseDraft::new(owner, &config.default_currency, today);
        Self {
            config,
            draft,
            phase: FormPhase::Editing,
            error: None,
            target: SubmitTarget::Create,
            in_flight: None,
            saved: None,
        }
    }

    /// Seed the form from a saved expense so submitting updates it.
    ///
    /// The backend only echoes owed amounts, so PERCENTAGE values are
    /// recovered from them (highest id takes the rounding remainder) and
    /// SHARE weights are the owed amounts themselves.
    pub fn from_existing(
        config: ClientConfig,
        owner: Participant,
        expense: &ExpenseResponse,
        participants: Vec<Participant>,
    ) -> Self {
        let mut draft = ExpenseDraft::new(owner.clone(), &expense.currency, expense.date);
        draft.description = expense.description.clone();
        draft.amount_input = format_plain(expense.amount);
        draft.notes = expense.notes.clone().unwrap_or_default();
        draft.group_id = expense.group_id;
        draft.split_type = expense.split_type;

        let known = std::iter::once(owner)
            .chain(participants)
            .chain(expense.payers.iter().map(|p| Participant::from(&p.user)))
            .chain(expense.splits.iter().map(|s| Participant::from(&s.owed_by)));
        draft.replace_participants(known.collect());

        draft.included = expense.splits.iter().map(|s| s.owed_by.id).collect();
        draft.payers = expense
            .payers
            .iter()
            .map(|p| PayerEntry {
                user_id: Some(p.user.id),
                amount_paid: p.amount_paid,
            })
            .collect();

        let mut owed: Vec<(UserId, Decimal)> = expense
            .splits
            .iter()
            .map(|s| (s.owed_by.id, s.amount_owed))
            .collect();
        owed.sort_by_key(|(id, _)| *id);
        draft.split_values = match expense.split_type {
            SplitType::Equal => Default::default(),
            SplitType::Exact | SplitType::Share => owed
                .into_iter()
                .map(|(id, amount)| (id, SplitValue::Parsed(amount)))
                .collect(),
            SplitType::Percentage => percentages_from_owed(&owed, expense.amount),
        };

        Self {
            config,
            draft,
            phase: FormPhase::Editing,
            error: None,
            target: SubmitTarget::Update(expense.id),
            in_flight: None,
            saved: None,
        }
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn target(&self) -> SubmitTarget {
        self.target
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    /// The single message the form shows, if any
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    /// Response of the successful submission once the form is `Done`
    pub fn saved(&self) -> Option<&ExpenseResponse> {
        self.saved.as_ref()
    }

    // --- Edits ---

    pub fn set_description(&mut self, description: &str) -> bool {
        self.edit(|draft| draft.description = description.to_string())
    }

    pub fn set_amount_input(&mut self, input: &str) -> bool {
        self.edit(|draft| {
            draft.amount_input = input.to_string();
            let amount = draft.amount().unwrap_or(Decimal::ZERO);
            sync_single_payer(&mut draft.payers, amount);
        })
    }

    pub fn set_date(&mut self, date: NaiveDate) -> bool {
        self.edit(|draft| draft.date = date)
    }

    pub fn set_notes(&mut self, notes: &str) -> bool {
        self.edit(|draft| draft.notes = notes.to_string())
    }

    pub fn set_split_type(&mut self, split_type: SplitType) -> bool {
        self.edit(|draft| draft.split_type = split_type)
    }

    /// Store a participant's split input, keeping digits and one decimal point
    pub fn set_split_value(&mut self, user_id: UserId, input: &str) -> bool {
        self.edit(|draft| {
            if draft.is_participant(user_id) {
                draft.split_values.insert(user_id, SplitValue::from_input(input));
            }
        })
    }

    pub fn toggle_included(&mut self, user_id: UserId) -> bool {
        self.edit(|draft| {
            if !draft.is_participant(user_id) {
                return;
            }
            if !draft.included.remove(&user_id) {
                draft.included.insert(user_id);
            }
        })
    }

    /// Switch to a new participant set, e.g. after picking a group or friend
    pub fn set_participants(&mut self, participants: Vec<Participant>, group_id: Option<i64>) -> bool {
        self.edit(|draft| {
            draft.replace_participants(participants);
            draft.group_id = group_id;
            let amount = draft.amount().unwrap_or(Decimal::ZERO);
            sync_single_payer(&mut draft.payers, amount);
        })
    }

    pub fn add_payer(&mut self) -> bool {
        self.edit(|draft| payer_reconciliation::add_payer(&mut draft.payers, &draft.participants))
    }

    pub fn remove_payer(&mut self, index: usize) -> bool {
        if !self.accepts_edits() {
            return false;
        }
        self.error = None;
        let amount = self.draft.amount().or(Some(Decimal::ZERO));
        if let Err(e) = payer_reconciliation::remove_payer(&mut self.draft.payers, index, amount) {
            self.error = Some(e.into());
            return false;
        }
        true
    }

    pub fn set_payer_user(&mut self, index: usize, user_id: Option<UserId>) -> bool {
        self.edit(|draft| {
            if let Some(payer) = draft.payers.get_mut(index) {
                payer.user_id = user_id.filter(|id| draft.participants.iter().any(|p| p.id == *id));
            }
        })
    }

    /// Amount typed for one of several payers; unparseable input counts as zero
    pub fn set_payer_amount(&mut self, index: usize, input: &str) -> bool {
        self.edit(|draft| {
            if let Some(payer) = draft.payers.get_mut(index) {
                payer.amount_paid = parse_decimal(input).unwrap_or(Decimal::ZERO);
            }
        })
    }

    pub fn attach_receipt(&mut self, file_name: Option<String>) -> bool {
        self.edit(|draft| draft.receipt_file_name = file_name)
    }

    /// Fill fields from a receipt scan. `None` when the form is not editable.
    pub fn apply_receipt(&mut self, scan: &ReceiptScanResponse) -> Option<ReceiptAutofill> {
        if !self.accepts_edits() {
            return None;
        }
        self.error = None;
        Some(apply_receipt(&mut self.draft, scan))
    }

    /// Live EQUAL preview for the split section
    pub fn equal_preview(&self) -> Option<Vec<OwedShare>> {
        preview_equal_split(&self.draft.amount_input, &self.draft.included_ids())
    }

    // --- Submission ---

    /// Assemble the request body without changing state
    pub fn validate(&self) -> Result<ExpenseCreateRequest, FormError> {
        let draft = &self.draft;
        let tolerance = self.config.money_tolerance;

        let description = draft.description.trim();
        if description.is_empty() {
            return Err(FormError::EmptyDescription);
        }
        let length = description.chars().count();
        if length > self.config.max_description_length {
            return Err(FormError::DescriptionTooLong {
                length,
                max: self.config.max_description_length,
            });
        }

        let amount = draft.amount().map(round_money).ok_or(FormError::InvalidAmount)?;
        let included = draft.included_ids();
        if included.is_empty() {
            return Err(SplitError::NoParticipants.into());
        }

        let payers = reconcile_payers_with_tolerance(&draft.payers, amount, &draft.participants, tolerance)?;
        let shares = calculate_split_with_tolerance(
            amount,
            draft.split_type,
            &included,
            &draft.split_values,
            tolerance,
        )?;

        let notes = draft.notes.trim();
        Ok(ExpenseCreateRequest {
            description: description.to_string(),
            amount,
            currency: draft.currency.clone(),
            date: draft.date,
            group_id: draft.group_id,
            split_type: draft.split_type,
            payers,
            splits: to_split_details(draft.split_type, &shares, &draft.split_values),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }

    /// Validate and, if the draft is sound, hand out the one ticket that may
    /// be sent. The controller keeps the abort handle for [`Self::dispose`].
    pub fn begin_submit(&mut self) -> Result<SubmitTicket<ExpenseCreateRequest>, FormError> {
        match self.phase {
            FormPhase::Submitting | FormPhase::Validating => return Err(FormError::AlreadySubmitting),
            FormPhase::Done => return Err(FormError::Closed),
            FormPhase::Editing => {}
        }

        self.phase = FormPhase::Validating;
        debug!(submit_target = ?self.target, "validating expense draft");

        match self.validate() {
            Ok(request) => {
                let (ticket, handle) = SubmitTicket::issue(self.target, request);
                self.in_flight = Some(handle);
                self.error = None;
                self.phase = FormPhase::Submitting;
                debug!("expense draft submitting");
                Ok(ticket)
            }
            Err(e) => {
                warn!(error = %e, "expense draft rejected");
                self.error = Some(e.clone());
                self.phase = FormPhase::Editing;
                Err(e)
            }
        }
    }

    /// Apply the outcome of the request started by [`Self::begin_submit`]
    pub fn finish_submit(&mut self, result: Result<ExpenseResponse, SubmitError>) {
        if self.phase != FormPhase::Submitting {
            debug!(phase = ?self.phase, "ignoring stale submission result");
            return;
        }
        self.in_flight = None;

        match result {
            Ok(response) => {
                debug!(expense_id = response.id, "expense form done");
                self.clear_draft();
                self.saved = Some(response);
                self.phase = FormPhase::Done;
            }
            Err(SubmitError::Aborted) => {
                self.phase = FormPhase::Editing;
            }
            Err(e) => {
                warn!(error = %e, "expense submission failed");
                self.error = Some(e.into());
                self.phase = FormPhase::Editing;
            }
        }
    }

    /// Abandon any in-flight request; called when the form goes away
    pub fn dispose(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            debug!("aborting in-flight expense submission");
            handle.abort();
        }
        if self.phase == FormPhase::Submitting {
            self.phase = FormPhase::Editing;
        }
    }

    /// Start another expense with the same participants after a save
    pub fn start_over(&mut self) {
        if self.phase == FormPhase::Done {
            self.target = SubmitTarget::Create;
            self.saved = None;
            self.error = None;
            self.phase = FormPhase::Editing;
        }
    }

    fn accepts_edits(&self) -> bool {
        self.phase == FormPhase::Editing
    }

    fn edit(&mut self, apply: impl FnOnce(&mut ExpenseDraft)) -> bool {
        if !self.accepts_edits() {
            return false;
        }
        self.error = None;
        apply(&mut self.draft);
        true
    }

    fn clear_draft(&mut self) {
        let draft = &mut self.draft;
        draft.description.clear();
        draft.amount_input.clear();
        draft.notes.clear();
        draft.split_values.clear();
        draft.receipt_file_name = None;
        draft.split_type = SplitType::Equal;
        let participants = std::mem::take(&mut draft.participants);
        draft.payers.clear();
        draft.replace_participants(participants);
    }
}

fn percentages_from_owed(
    owed: &[(UserId, Decimal)],
    amount: Decimal,
) -> std::collections::BTreeMap<UserId, SplitValue> {
    let mut values = std::collections::BTreeMap::new();
    if owed.is_empty() || amount.is_zero() {
        return values;
    }
    let last = owed.len() - 1;
    let mut assigned = Decimal::ZERO;
    for (index, (id, owed_amount)) in owed.iter().enumerate() {
        let pct = if index == last {
            Decimal::ONE_HUNDRED - assigned
        } else {
            match owed_amount.checked_div(amount).and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED)) {
                Some(pct) => round_money(pct),
                // Left blank for the user to re-enter
                None => return std::collections::BTreeMap::new(),
            }
        };
        assigned = match assigned.checked_add(pct) {
            Some(total) => total,
            None => return std::collections::BTreeMap::new(),
        };
        values.insert(*id, SplitValue::Parsed(pct.normalize()));
    }
    values
}
