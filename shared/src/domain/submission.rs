//! Sending a validated draft to the backend.
//!
//! The form controllers hand out a [`SubmitTicket`] when validation passes.
//! The ticket's request runs inside an `Abortable` future whose handle stays
//! with the controller, so a form that is torn down mid-request can abandon
//! the call instead of applying a stale result.

use async_trait::async_trait;
use futures::future::{AbortHandle, AbortRegistration, Abortable, Aborted};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::{ExpenseCreateRequest, ExpenseResponse, PaymentCreateRequest, PaymentResponse};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("Request was cancelled")]
    Aborted,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Whether a ticket creates a new record or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    Update(i64),
}

/// A validated request that may be sent exactly once
#[derive(Debug)]
pub struct SubmitTicket<R> {
    pub target: SubmitTarget,
    pub request: R,
    registration: AbortRegistration,
}

impl<R> SubmitTicket<R> {
    /// Create a ticket and the handle that can cancel it
    pub(crate) fn issue(target: SubmitTarget, request: R) -> (Self, AbortHandle) {
        let (handle, registration) = AbortHandle::new_pair();
        (
            Self {
                target,
                request,
                registration,
            },
            handle,
        )
    }
}

/// Persistence endpoints for expenses
#[async_trait(?Send)]
pub trait ExpenseGateway {
    /// Receipt file sent along with the expense (a browser `File` in the frontend)
    type Attachment;

    async fn create_expense(
        &self,
        request: &ExpenseCreateRequest,
        attachment: Option<&Self::Attachment>,
    ) -> Result<ExpenseResponse, ApiError>;

    async fn update_expense(
        &self,
        expense_id: i64,
        request: &ExpenseCreateRequest,
        attachment: Option<&Self::Attachment>,
    ) -> Result<ExpenseResponse, ApiError>;
}

/// Persistence endpoints for settle-up payments
#[async_trait(?Send)]
pub trait PaymentGateway {
    async fn record_payment(&self, request: &PaymentCreateRequest) -> Result<PaymentResponse, ApiError>;

    async fn update_payment(
        &self,
        payment_id: i64,
        request: &PaymentCreateRequest,
    ) -> Result<PaymentResponse, ApiError>;
}

pub async fn submit_expense<G>(
    gateway: &G,
    ticket: SubmitTicket<ExpenseCreateRequest>,
    attachment: Option<&G::Attachment>,
) -> Result<ExpenseResponse, SubmitError>
where
    G: ExpenseGateway + ?Sized,
{
    let SubmitTicket {
        target,
        request,
        registration,
    } = ticket;
    debug!(submit_target = ?target, description = %request.description, "submitting expense");

    let call = async {
        match target {
            SubmitTarget::Create => gateway.create_expense(&request, attachment).await,
            SubmitTarget::Update(id) => gateway.update_expense(id, &request, attachment).await,
        }
    };

    let response = finish(Abortable::new(call, registration).await)?;
    info!(expense_id = response.id, "expense saved");
    Ok(response)
}

pub async fn submit_payment<G>(
    gateway: &G,
    ticket: SubmitTicket<PaymentCreateRequest>,
) -> Result<PaymentResponse, SubmitError>
where
    G: PaymentGateway + ?Sized,
{
    let SubmitTicket {
        target,
        request,
        registration,
    } = ticket;
    debug!(submit_target = ?target, paid_to = request.paid_to_user_id, "submitting payment");

    let call = async {
        match target {
            SubmitTarget::Create => gateway.record_payment(&request).await,
            SubmitTarget::Update(id) => gateway.update_payment(id, &request).await,
        }
    };

    let response = finish(Abortable::new(call, registration).await)?;
    info!(payment_id = response.id, "payment saved");
    Ok(response)
}

fn finish<T>(outcome: Result<Result<T, ApiError>, Aborted>) -> Result<T, SubmitError> {
    match outcome {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(error)) => {
            warn!(%error, "backend rejected submission");
            Err(SubmitError::Api(error))
        }
        Err(Aborted) => {
            debug!("submission abandoned");
            Err(SubmitError::Aborted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExpenseFormController, FormPhase, PaymentFormController};
    use crate::{ClientConfig, Participant, PayerResponse, SplitResponse, SplitType, UserResponse};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::cell::RefCell;

    fn person(id: i64, name: &str) -> Participant {
        Participant {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn user(id: i64, name: &str) -> UserResponse {
        UserResponse {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            created_at: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()
    }

    /// In-memory backend that records what it was asked to save
    #[derive(Default)]
    struct FakeBackend {
        calls: RefCell<Vec<(SubmitTarget, ExpenseCreateRequest, Option<String>)>>,
        fail_with: Option<ApiError>,
        hang: bool,
    }

    impl FakeBackend {
        async fn respond(
            &self,
            target: SubmitTarget,
            request: &ExpenseCreateRequest,
            attachment: Option<&String>,
        ) -> Result<ExpenseResponse, ApiError> {
            if self.hang {
                futures::future::pending::<()>().await;
            }
            self.calls
                .borrow_mut()
                .push((target, request.clone(), attachment.cloned()));
            if let Some(error) = &self.fail_with {
                return Err(error.clone());
            }
            Ok(ExpenseResponse {
                id: match target {
                    SubmitTarget::Create => 900,
                    SubmitTarget::Update(id) => id,
                },
                description: request.description.clone(),
                amount: request.amount,
                currency: request.currency.clone(),
                date: request.date,
                created_at: "2025-08-20T09:00:00Z".to_string(),
                group_id: request.group_id,
                split_type: request.split_type,
                payers: vec![PayerResponse {
                    user: user(1, "Ana"),
                    amount_paid: request.amount,
                }],
                splits: vec![],
                notes: request.notes.clone(),
                receipt_url: attachment.map(|name| format!("/receipts/{}", name)),
            })
        }
    }

    #[async_trait(?Send)]
    impl ExpenseGateway for FakeBackend {
        type Attachment = String;

        async fn create_expense(
            &self,
            request: &ExpenseCreateRequest,
            attachment: Option<&String>,
        ) -> Result<ExpenseResponse, ApiError> {
            self.respond(SubmitTarget::Create, request, attachment).await
        }

        async fn update_expense(
            &self,
            expense_id: i64,
            request: &ExpenseCreateRequest,
            attachment: Option<&String>,
        ) -> Result<ExpenseResponse, ApiError> {
            self.respond(SubmitTarget::Update(expense_id), request, attachment).await
        }
    }

    #[derive(Default)]
    struct FakePayments {
        recorded: RefCell<Vec<PaymentCreateRequest>>,
    }

    #[async_trait(?Send)]
    impl PaymentGateway for FakePayments {
        async fn record_payment(&self, request: &PaymentCreateRequest) -> Result<PaymentResponse, ApiError> {
            self.recorded.borrow_mut().push(request.clone());
            Ok(PaymentResponse {
                id: 31,
                amount: request.amount,
                currency: request.currency.clone(),
                date: request.date,
                created_at: "2025-08-20T09:00:00Z".to_string(),
                group_id: request.group_id,
                paid_by: user(1, "Ana"),
                paid_to: user(request.paid_to_user_id, "Ben"),
                description: None,
            })
        }

        async fn update_payment(
            &self,
            _payment_id: i64,
            _request: &PaymentCreateRequest,
        ) -> Result<PaymentResponse, ApiError> {
            Err(ApiError::Server {
                status: 403,
                message: "Only the payer can edit this payment".to_string(),
            })
        }
    }

    fn ready_form() -> ExpenseFormController {
        let mut form = ExpenseFormController::new(person(1, "Ana"), today());
        form.set_participants(vec![person(1, "Ana"), person(2, "Ben")], None);
        form.set_description("Concert tickets");
        form.set_amount_input("80");
        form.set_split_type(SplitType::Percentage);
        form.set_split_value(1, "25");
        form.set_split_value(2, "75");
        form
    }

    #[tokio::test]
    async fn test_submit_expense_creates_and_closes_form() {
        let backend = FakeBackend::default();
        let mut form = ready_form();
        form.attach_receipt(Some("stub.jpg".to_string()));

        let ticket = form.begin_submit().unwrap();
        let result = submit_expense(&backend, ticket, Some(&"stub.jpg".to_string())).await;
        form.finish_submit(result);

        assert_eq!(form.phase(), FormPhase::Done);
        let saved = form.saved().unwrap();
        assert_eq!(saved.id, 900);
        assert_eq!(saved.receipt_url.as_deref(), Some("/receipts/stub.jpg"));

        let calls = backend.calls.borrow();
        assert_eq!(calls.len(), 1);
        let (target, request, attachment) = &calls[0];
        assert_eq!(*target, SubmitTarget::Create);
        assert_eq!(request.amount, dec!(80));
        assert_eq!(request.splits.iter().filter_map(|s| s.value).sum::<rust_decimal::Decimal>(), dec!(100));
        assert_eq!(attachment.as_deref(), Some("stub.jpg"));
    }

    #[tokio::test]
    async fn test_backend_error_surfaces_as_one_message() {
        let backend = FakeBackend {
            fail_with: Some(ApiError::from_response(
                400,
                r#"{"status":400,"error":"Bad Request","message":"Validation failed","details":[]}"#,
            )),
            ..Default::default()
        };
        let mut form = ready_form();

        let ticket = form.begin_submit().unwrap();
        let result = submit_expense(&backend, ticket, None).await;
        form.finish_submit(result);

        assert_eq!(form.phase(), FormPhase::Editing);
        assert_eq!(form.error_message().as_deref(), Some("Failed to save expense: Validation failed"));
        assert_eq!(form.draft().description, "Concert tickets");
    }

    #[tokio::test]
    async fn test_disposed_form_never_reaches_backend() {
        let backend = FakeBackend::default();
        let mut form = ready_form();

        let ticket = form.begin_submit().unwrap();
        form.dispose();
        let result = submit_expense(&backend, ticket, None).await;

        assert_eq!(result.unwrap_err(), SubmitError::Aborted);
        assert!(backend.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_dispose_interrupts_request_in_flight() {
        let backend = FakeBackend {
            hang: true,
            ..Default::default()
        };
        let mut form = ready_form();
        let ticket = form.begin_submit().unwrap();

        let (result, _) = tokio::join!(submit_expense(&backend, ticket, None), async {
            tokio::task::yield_now().await;
            form.dispose();
        });

        assert_eq!(result.unwrap_err(), SubmitError::Aborted);
        form.finish_submit(Err(SubmitError::Aborted));
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.error_message().is_none());
    }

    #[tokio::test]
    async fn test_existing_expense_is_updated() {
        let backend = FakeBackend::default();
        let mut form = ready_form();
        let ticket = form.begin_submit().unwrap();
        let mut created = submit_expense(&backend, ticket, None).await.unwrap();
        created.splits = vec![
            SplitResponse { split_id: 1, owed_by: user(1, "Ana"), amount_owed: dec!(20) },
            SplitResponse { split_id: 2, owed_by: user(2, "Ben"), amount_owed: dec!(60) },
        ];

        let mut edit = ExpenseFormController::from_existing(
            ClientConfig::default(),
            person(1, "Ana"),
            &created,
            vec![person(2, "Ben")],
        );
        edit.set_description("Concert tickets (balcony)");
        let ticket = edit.begin_submit().unwrap();
        assert_eq!(ticket.target, SubmitTarget::Update(900));
        let updated = submit_expense(&backend, ticket, None).await.unwrap();

        assert_eq!(updated.id, 900);
        let calls = backend.calls.borrow();
        let (_, request, _) = &calls[1];
        assert_eq!(request.description, "Concert tickets (balcony)");
        assert_eq!(request.splits[0].value, Some(dec!(25)));
        assert_eq!(request.splits[1].value, Some(dec!(75)));
    }

    #[tokio::test]
    async fn test_submit_payment() {
        let gateway = FakePayments::default();
        let mut form = PaymentFormController::new(
            &ClientConfig::default(),
            1,
            vec![person(1, "Ana"), person(2, "Ben")],
            None,
            today(),
        );
        form.set_amount_input("25");

        let ticket = form.begin_submit().unwrap();
        let result = submit_payment(&gateway, ticket).await;
        form.finish_submit(result);

        assert_eq!(form.phase(), FormPhase::Done);
        assert_eq!(form.saved().map(|p| p.id), Some(31));
        assert_eq!(gateway.recorded.borrow()[0].paid_to_user_id, 2);
    }

    #[tokio::test]
    async fn test_payment_update_rejection() {
        let gateway = FakePayments::default();
        let ticket = SubmitTicket::issue(
            SubmitTarget::Update(5),
            PaymentCreateRequest {
                paid_to_user_id: 2,
                amount: dec!(5),
                date: today(),
                currency: "USD".to_string(),
                group_id: None,
            },
        )
        .0;

        let err = submit_payment(&gateway, ticket).await.unwrap_err();
        assert_eq!(err.to_string(), "Only the payer can edit this payment");
    }
}
