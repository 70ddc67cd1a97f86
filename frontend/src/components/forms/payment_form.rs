use shared::PaymentResponse;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::hooks::use_payment_form::{use_payment_form, PaymentFormSeed};
use crate::services::api::ApiClient;
use crate::services::date_utils;

#[derive(Properties, PartialEq)]
pub struct PaymentFormProps {
    pub api_client: ApiClient,
    pub seed: PaymentFormSeed,
    pub on_saved: Callback<PaymentResponse>,
    pub on_cancel: Callback<()>,
}

#[function_component(PaymentForm)]
pub fn payment_form(props: &PaymentFormProps) -> Html {
    let form = use_payment_form(&props.api_client, props.seed.clone(), props.on_saved.clone());
    let editing = matches!(props.seed, PaymentFormSeed::Existing { .. });
    let state = &form.state;
    let actions = &form.actions;
    let submitting = state.phase.is_busy();
    let selected = state.draft.recipient_id.map(|id| id.to_string()).unwrap_or_default();

    let on_recipient_change = {
        let on_recipient_change = actions.on_recipient_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            on_recipient_change.emit(select.value().parse().ok());
        })
    };

    let on_amount_input = {
        let on_amount_change = actions.on_amount_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_amount_change.emit(input.value());
        })
    };

    let on_date_input = {
        let on_date_change = actions.on_date_change.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Some(date) = date_utils::parse_input_value(&input.value()) {
                on_date_change.emit(date);
            }
        })
    };

    let on_submit = {
        let submit = actions.submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            submit.emit(());
        })
    };

    let on_cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_: MouseEvent| on_cancel.emit(()))
    };

    html! {
        <section class="payment-form-section">
            <h2>{if editing { "Edit payment" } else { "Record a payment" }}</h2>

            {if let Some(error) = state.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="payment-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="payment-recipient">{"You paid"}</label>
                    <select id="payment-recipient" onchange={on_recipient_change} disabled={submitting}>
                        <option value="" selected={selected.is_empty()}>{"Select recipient"}</option>
                        {for state.recipients.iter().map(|p| {
                            let value = p.id.to_string();
                            html! { <option selected={value == selected} value={value.clone()}>{&p.name}</option> }
                        })}
                    </select>
                </div>

                <div class="form-row">
                    <div class="form-group">
                        <label for="payment-amount">{format!("Amount ({})", state.draft.currency)}</label>
                        <input
                            type="text"
                            id="payment-amount"
                            inputmode="decimal"
                            placeholder="0.00"
                            value={state.draft.amount_input.clone()}
                            oninput={on_amount_input}
                            disabled={submitting}
                        />
                    </div>
                    <div class="form-group">
                        <label for="payment-date">{"Date"}</label>
                        <input
                            type="date"
                            id="payment-date"
                            value={date_utils::to_input_value(state.draft.date)}
                            onchange={on_date_input}
                            disabled={submitting}
                        />
                    </div>
                </div>

                <div class="form-actions">
                    <button type="button" class="btn btn-secondary" onclick={on_cancel}>
                        {"Cancel"}
                    </button>
                    <button type="submit" class="btn btn-primary" disabled={submitting}>
                        {if submitting { "Saving..." } else { "Save payment" }}
                    </button>
                </div>
            </form>
        </section>
    }
}
