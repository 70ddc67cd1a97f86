use shared::ExpenseResponse;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use super::payer_section::PayerSection;
use super::split_options::SplitOptions;
use crate::hooks::use_expense_form::{use_expense_form, ExpenseFormSeed};
use crate::services::api::ApiClient;
use crate::services::date_utils;

#[derive(Properties, PartialEq)]
pub struct ExpenseFormProps {
    pub api_client: ApiClient,
    pub seed: ExpenseFormSeed,
    pub on_saved: Callback<ExpenseResponse>,
    pub on_cancel: Callback<()>,
}

#[function_component(ExpenseForm)]
pub fn expense_form(props: &ExpenseFormProps) -> Html {
    let form = use_expense_form(&props.api_client, props.seed.clone(), props.on_saved.clone());
    let state = &form.state;
    let actions = &form.actions;
    let draft = &state.draft;
    let submitting = state.phase.is_busy();

    let on_description_input = {
        let on_description_change = actions.on_description_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_description_change.emit(input.value());
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

    let on_notes_input = {
        let on_notes_change = actions.on_notes_change.clone();
        Callback::from(move |e: InputEvent| {
            let textarea: HtmlTextAreaElement = e.target_unchecked_into();
            on_notes_change.emit(textarea.value());
        })
    };

    let on_receipt_change = {
        let on_receipt_selected = actions.on_receipt_selected.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let file = input.files().and_then(|files| files.get(0));
            on_receipt_selected.emit(file);
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

    let title = if state.editing_existing { "Edit expense" } else { "Add an expense" };

    html! {
        <section class="expense-form-section">
            <h2>{title}</h2>

            {if let Some(error) = state.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="expense-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="expense-description">{"Description"}</label>
                    <input
                        type="text"
                        id="expense-description"
                        placeholder="Enter a description"
                        value={draft.description.clone()}
                        oninput={on_description_input}
                        disabled={submitting}
                    />
                </div>

                <div class="form-row">
                    <div class="form-group">
                        <label for="expense-amount">{format!("Amount ({})", draft.currency)}</label>
                        <input
                            type="text"
                            id="expense-amount"
                            inputmode="decimal"
                            placeholder="0.00"
                            value={draft.amount_input.clone()}
                            oninput={on_amount_input}
                            disabled={submitting}
                        />
                    </div>
                    <div class="form-group">
                        <label for="expense-date">{"Date"}</label>
                        <input
                            type="date"
                            id="expense-date"
                            value={date_utils::to_input_value(draft.date)}
                            onchange={on_date_input}
                            disabled={submitting}
                        />
                    </div>
                </div>

                <div class="form-group receipt-group">
                    <label for="expense-receipt">{"Receipt"}</label>
                    <input
                        type="file"
                        id="expense-receipt"
                        accept="image/*,application/pdf"
                        onchange={on_receipt_change}
                        disabled={submitting || state.scanning}
                    />
                    {if let Some(name) = draft.receipt_file_name.as_ref() {
                        html! { <span class="receipt-name">{name}</span> }
                    } else { html! {} }}
                    {if state.scanning {
                        html! { <div class="form-message info">{"Scanning receipt..."}</div> }
                    } else { html! {} }}
                    {if let Some(error) = state.scan_error.as_ref() {
                        html! { <div class="form-message error">{format!("Could not read receipt: {}", error)}</div> }
                    } else { html! {} }}
                    {if let Some(notice) = state.scan_notice.as_ref() {
                        html! { <div class="form-message info">{notice}</div> }
                    } else { html! {} }}
                </div>

                <PayerSection
                    draft={draft.clone()}
                    disabled={submitting}
                    on_add_payer={actions.on_add_payer.clone()}
                    on_remove_payer={actions.on_remove_payer.clone()}
                    on_payer_user_change={actions.on_payer_user_change.clone()}
                    on_payer_amount_change={actions.on_payer_amount_change.clone()}
                />

                <SplitOptions
                    draft={draft.clone()}
                    equal_preview={state.equal_preview.clone()}
                    disabled={submitting}
                    on_split_type_change={actions.on_split_type_change.clone()}
                    on_split_value_change={actions.on_split_value_change.clone()}
                    on_toggle_included={actions.on_toggle_included.clone()}
                />

                <div class="form-group">
                    <label for="expense-notes">{"Notes"}</label>
                    <textarea
                        id="expense-notes"
                        rows="3"
                        value={draft.notes.clone()}
                        oninput={on_notes_input}
                        disabled={submitting}
                    />
                </div>

                <div class="form-actions">
                    <button type="button" class="btn btn-secondary" onclick={on_cancel}>
                        {"Cancel"}
                    </button>
                    <button type="submit" class="btn btn-primary" disabled={submitting}>
                        {if submitting { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>
        </section>
    }
}
