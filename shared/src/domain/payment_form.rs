//! Form state for recording a settle-up payment from the signed-in user to
//! someone they owe. Same phase machine as the expense form, with far fewer
//! rules.

use chrono::NaiveDate;
use futures::future::AbortHandle;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::expense_form::FormPhase;
use super::submission::{SubmitError, SubmitTarget, SubmitTicket};
use crate::config::ClientConfig;
use crate::money::{format_plain, parse_positive_amount, round_money};
use crate::{Participant, PaymentCreateRequest, PaymentResponse, UserId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaymentFormError {
    #[error("Please select a recipient and enter a valid positive amount.")]
    MissingRecipient,
    #[error("You cannot record a payment to yourself")]
    SelfPayment,
    #[error("Please select a recipient and enter a valid positive amount.")]
    InvalidAmount,
    #[error("This payment is already being saved")]
    AlreadySubmitting,
    #[error("This payment has already been saved")]
    Closed,
    #[error("Could not save payment: {0}")]
    Submit(#[from] SubmitError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDraft {
    /// The signed-in user, always the payer
    pub payer_id: UserId,
    pub recipient_id: Option<UserId>,
    pub amount_input: String,
    pub date: NaiveDate,
    pub currency: String,
    pub group_id: Option<i64>,
}

impl PaymentDraft {
    pub fn amount(&self) -> Option<Decimal> {
        parse_positive_amount(&self.amount_input).ok()
    }
}

#[derive(Debug, Clone)]
pub struct PaymentFormController {
    draft: PaymentDraft,
    /// People the payer may pay; never includes the payer
    recipients: Vec<Participant>,
    phase: FormPhase,
    error: Option<PaymentFormError>,
    target: SubmitTarget,
    in_flight: Option<AbortHandle>,
    saved: Option<PaymentResponse>,
}

impl PaymentFormController {
    pub fn new(
        config: &ClientConfig,
        payer_id: UserId,
        candidates: Vec<Participant>,
        group_id: Option<i64>,
        today: NaiveDate,
    ) -> Self {
        let recipients: Vec<Participant> = candidates.into_iter().filter(|p| p.id != payer_id).collect();
        // Settling with a single friend needs no choice
        let recipient_id = match recipients.as_slice() {
            [only] => Some(only.id),
            _ => None,
        };
        Self {
            draft: PaymentDraft {
                payer_id,
                recipient_id,
                amount_input: String::new(),
                date: today,
                currency: config.default_currency.clone(),
                group_id,
            },
            recipients,
            phase: FormPhase::Editing,
            error: None,
            target: SubmitTarget::Create,
            in_flight: None,
            saved: None,
        }
    }

    /// Edit a payment the signed-in user made earlier
    pub fn from_existing(payment: &PaymentResponse, candidates: Vec<Participant>) -> Self {
        let payer_id = payment.paid_by.id;
        let mut recipients: Vec<Participant> = candidates.into_iter().filter(|p| p.id != payer_id).collect();
        if !recipients.iter().any(|p| p.id == payment.paid_to.id) {
            recipients.push(Participant::from(&payment.paid_to));
        }
        Self {
            draft: PaymentDraft {
                payer_id,
                recipient_id: Some(payment.paid_to.id),
                amount_input: format_plain(payment.amount),
                date: payment.date,
                currency: payment.currency.clone(),
                group_id: payment.group_id,
            },
            recipients,
            phase: FormPhase::Editing,
            error: None,
            target: SubmitTarget::Update(payment.id),
            in_flight: None,
            saved: None,
        }
    }

    pub fn draft(&self) -> &PaymentDraft {
        &self.draft
    }

    pub fn recipients(&self) -> &[Participant] {
        &self.recipients
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn target(&self) -> SubmitTarget {
        self.target
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn saved(&self) -> Option<&PaymentResponse> {
        self.saved.as_ref()
    }

    pub fn set_recipient(&mut self, recipient_id: Option<UserId>) -> bool {
        self.edit(|draft| draft.recipient_id = recipient_id)
    }

    pub fn set_amount_input(&mut self, input: &str) -> bool {
        self.edit(|draft| draft.amount_input = input.to_string())
    }

    pub fn set_date(&mut self, date: NaiveDate) -> bool {
        self.edit(|draft| draft.date = date)
    }

    pub fn validate(&self) -> Result<PaymentCreateRequest, PaymentFormError> {
        let draft = &self.draft;
        let recipient = draft.recipient_id.ok_or(PaymentFormError::MissingRecipient)?;
        if recipient == draft.payer_id {
            return Err(PaymentFormError::SelfPayment);
        }
        let amount = draft.amount().ok_or(PaymentFormError::InvalidAmount)?;

        Ok(PaymentCreateRequest {
            paid_to_user_id: recipient,
            amount: round_money(amount),
            date: draft.date,
            currency: draft.currency.clone(),
            group_id: draft.group_id,
        })
    }

    pub fn begin_submit(&mut self) -> Result<SubmitTicket<PaymentCreateRequest>, PaymentFormError> {
        match self.phase {
            FormPhase::Submitting | FormPhase::Validating => return Err(PaymentFormError::AlreadySubmitting),
            FormPhase::Done => return Err(PaymentFormError::Closed),
            FormPhase::Editing => {}
        }

        self.phase = FormPhase::Validating;
        match self.validate() {
            Ok(request) => {
                let (ticket, handle) = SubmitTicket::issue(self.target, request);
                self.in_flight = Some(handle);
                self.error = None;
                self.phase = FormPhase::Submitting;
                debug!(submit_target = ?self.target, "payment submitting");
                Ok(ticket)
            }
            Err(e) => {
                warn!(error = %e, "payment draft rejected");
                self.error = Some(e.clone());
                self.phase = FormPhase::Editing;
                Err(e)
            }
        }
    }

    pub fn finish_submit(&mut self, result: Result<PaymentResponse, SubmitError>) {
        if self.phase != FormPhase::Submitting {
            return;
        }
        self.in_flight = None;
        match result {
            Ok(response) => {
                self.saved = Some(response);
                self.phase = FormPhase::Done;
            }
            Err(SubmitError::Aborted) => self.phase = FormPhase::Editing,
            Err(e) => {
                warn!(error = %e, "payment submission failed");
                self.error = Some(e.into());
                self.phase = FormPhase::Editing;
            }
        }
    }

    pub fn dispose(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        if self.phase == FormPhase::Submitting {
            self.phase = FormPhase::Editing;
        }
    }

    fn edit(&mut self, apply: impl FnOnce(&mut PaymentDraft)) -> bool {
        if self.phase != FormPhase::Editing {
            return false;
        }
        self.error = None;
        apply(&mut self.draft);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserResponse;
    use rust_decimal_macros::dec;

    fn person(id: UserId, name: &str) -> Participant {
        Participant {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
    }

    fn group_form() -> PaymentFormController {
        PaymentFormController::new(
            &ClientConfig::default(),
            1,
            vec![person(1, "Ana"), person(2, "Ben"), person(3, "Cy")],
            Some(10),
            today(),
        )
    }

    #[test]
    fn test_recipients_exclude_payer() {
        let form = group_form();
        let ids: Vec<UserId> = form.recipients().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(form.draft().recipient_id, None);
    }

    #[test]
    fn test_single_friend_is_preselected() {
        let form = PaymentFormController::new(
            &ClientConfig::default(),
            1,
            vec![person(1, "Ana"), person(5, "Eve")],
            None,
            today(),
        );
        assert_eq!(form.draft().recipient_id, Some(5));
    }

    #[test]
    fn test_payment_validation() {
        let mut form = group_form();
        form.set_amount_input("15");
        assert_eq!(form.begin_submit().unwrap_err(), PaymentFormError::MissingRecipient);

        form.set_recipient(Some(1));
        assert_eq!(form.begin_submit().unwrap_err(), PaymentFormError::SelfPayment);

        form.set_recipient(Some(2));
        form.set_amount_input("0");
        assert_eq!(form.begin_submit().unwrap_err(), PaymentFormError::InvalidAmount);
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_payment_submit_flow() {
        let mut form = group_form();
        form.set_recipient(Some(3));
        form.set_amount_input("12.345");

        let ticket = form.begin_submit().unwrap();
        assert_eq!(
            ticket.request,
            PaymentCreateRequest {
                paid_to_user_id: 3,
                amount: dec!(12.35),
                date: today(),
                currency: "USD".to_string(),
                group_id: Some(10),
            }
        );
        assert_eq!(form.begin_submit().unwrap_err(), PaymentFormError::AlreadySubmitting);

        form.finish_submit(Err(SubmitError::Api(crate::ApiError::Network("offline".to_string()))));
        assert_eq!(
            form.error_message().as_deref(),
            Some("Could not save payment: Network error: offline")
        );
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_edit_existing_payment() {
        let user = |id: UserId, name: &str| UserResponse {
            id,
            name: name.to_string(),
            email: String::new(),
            created_at: None,
        };
        let payment = PaymentResponse {
            id: 77,
            amount: dec!(20),
            currency: "EUR".to_string(),
            date: today(),
            created_at: "2025-07-04T10:00:00Z".to_string(),
            group_id: None,
            paid_by: user(1, "Ana"),
            paid_to: user(4, "Dee"),
            description: None,
        };

        let mut form = PaymentFormController::from_existing(&payment, vec![]);
        assert_eq!(form.target(), SubmitTarget::Update(77));
        assert_eq!(form.recipients().len(), 1);
        let ticket = form.begin_submit().unwrap();
        assert_eq!(ticket.target, SubmitTarget::Update(77));
        assert_eq!(ticket.request.currency, "EUR");
    }
}
