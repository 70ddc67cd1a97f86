use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use shared::domain::{submit_payment, FormPhase, PaymentDraft, PaymentFormController};
use shared::{Participant, PaymentResponse, UserId};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::date_utils;
use crate::services::logging::Logger;

/// What the payment form starts from
#[derive(Clone, PartialEq)]
pub enum PaymentFormSeed {
    New {
        payer_id: UserId,
        candidates: Vec<Participant>,
        group_id: Option<i64>,
    },
    Existing {
        payment: PaymentResponse,
        candidates: Vec<Participant>,
    },
}

#[derive(Clone, PartialEq)]
pub struct PaymentFormState {
    pub draft: PaymentDraft,
    pub recipients: Vec<Participant>,
    pub phase: FormPhase,
    pub error: Option<String>,
}

pub struct UsePaymentFormResult {
    pub state: PaymentFormState,
    pub actions: UsePaymentFormActions,
}

#[derive(Clone, PartialEq)]
pub struct UsePaymentFormActions {
    pub on_recipient_change: Callback<Option<UserId>>,
    pub on_amount_change: Callback<String>,
    pub on_date_change: Callback<NaiveDate>,
    pub submit: Callback<()>,
}

#[hook]
pub fn use_payment_form(
    api_client: &ApiClient,
    seed: PaymentFormSeed,
    on_saved: Callback<PaymentResponse>,
) -> UsePaymentFormResult {
    let controller: Rc<RefCell<PaymentFormController>> = {
        let config = api_client.config().clone();
        use_mut_ref(move || match seed {
            PaymentFormSeed::New {
                payer_id,
                candidates,
                group_id,
            } => PaymentFormController::new(&config, payer_id, candidates, group_id, date_utils::today()),
            PaymentFormSeed::Existing { payment, candidates } => {
                PaymentFormController::from_existing(&payment, candidates)
            }
        })
    };
    let update = use_force_update();

    {
        let controller = controller.clone();
        use_effect_with((), move |_| {
            move || {
                controller.borrow_mut().dispose();
            }
        });
    }

    let on_recipient_change = {
        let controller = controller.clone();
        let update = update.clone();
        Callback::from(move |recipient: Option<UserId>| {
            controller.borrow_mut().set_recipient(recipient);
            update.force_update();
        })
    };

    let on_amount_change = {
        let controller = controller.clone();
        let update = update.clone();
        Callback::from(move |value: String| {
            controller.borrow_mut().set_amount_input(&value);
            update.force_update();
        })
    };

    let on_date_change = {
        let controller = controller.clone();
        let update = update.clone();
        Callback::from(move |date: NaiveDate| {
            controller.borrow_mut().set_date(date);
            update.force_update();
        })
    };

    let submit = {
        let api_client = api_client.clone();
        let controller = controller.clone();
        let update = update.clone();

        Callback::from(move |_: ()| {
            let ticket = controller.borrow_mut().begin_submit();
            update.force_update();
            let Ok(ticket) = ticket else { return };

            let api_client = api_client.clone();
            let controller = controller.clone();
            let update = update.clone();
            let on_saved = on_saved.clone();

            spawn_local(async move {
                let result = submit_payment(&api_client, ticket).await;
                let saved = {
                    let mut form = controller.borrow_mut();
                    form.finish_submit(result);
                    form.saved().cloned()
                };
                update.force_update();

                if let Some(payment) = saved {
                    Logger::info_with_component("payment_form", &format!("Recorded payment {}", payment.id));
                    on_saved.emit(payment);
                }
            });
        })
    };

    let state = {
        let form = controller.borrow();
        PaymentFormState {
            draft: form.draft().clone(),
            recipients: form.recipients().to_vec(),
            phase: form.phase(),
            error: form.error_message(),
        }
    };

    UsePaymentFormResult {
        state,
        actions: UsePaymentFormActions {
            on_recipient_change,
            on_amount_change,
            on_date_change,
            submit,
        },
    }
}
