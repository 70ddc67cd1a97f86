use shared::domain::ExpenseDraft;
use shared::money::{checked_sum, format_money, format_plain};
use shared::UserId;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PayerSectionProps {
    pub draft: ExpenseDraft,
    pub disabled: bool,
    pub on_add_payer: Callback<()>,
    pub on_remove_payer: Callback<usize>,
    pub on_payer_user_change: Callback<(usize, Option<UserId>)>,
    pub on_payer_amount_change: Callback<(usize, String)>,
}

/// "Paid by" rows. A lone payer is charged the whole amount automatically;
/// several payers each enter what they paid.
#[function_component(PayerSection)]
pub fn payer_section(props: &PayerSectionProps) -> Html {
    let draft = &props.draft;
    let multiple = draft.payers.len() > 1;
    let paid_total = checked_sum(draft.payers.iter().map(|p| &p.amount_paid));

    let payer_row = |index: usize| -> Html {
        let payer = &draft.payers[index];
        let selected = payer.user_id.map(|id| id.to_string()).unwrap_or_default();

        let on_user_change = {
            let on_payer_user_change = props.on_payer_user_change.clone();
            Callback::from(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                on_payer_user_change.emit((index, select.value().parse().ok()));
            })
        };

        let amount_cell = if multiple {
            let on_amount_change = {
                let on_payer_amount_change = props.on_payer_amount_change.clone();
                Callback::from(move |e: Event| {
                    let input: HtmlInputElement = e.target_unchecked_into();
                    on_payer_amount_change.emit((index, input.value()));
                })
            };
            let on_remove = {
                let on_remove_payer = props.on_remove_payer.clone();
                Callback::from(move |_: MouseEvent| on_remove_payer.emit(index))
            };
            html! {
                <>
                    <input
                        type="text"
                        inputmode="decimal"
                        class="payer-amount"
                        placeholder="0.00"
                        value={format_plain(payer.amount_paid)}
                        onchange={on_amount_change}
                        disabled={props.disabled}
                    />
                    <button type="button" class="btn btn-link" onclick={on_remove} disabled={props.disabled}>
                        {"Remove"}
                    </button>
                </>
            }
        } else {
            html! {
                <span class="payer-amount auto">{format_money(payer.amount_paid, &draft.currency)}</span>
            }
        };

        html! {
            <div class="payer-row" key={index.to_string()}>
                <select onchange={on_user_change} disabled={props.disabled}>
                    <option value="" selected={selected.is_empty()}>{"Select payer"}</option>
                    {for draft.participants.iter().map(|p| {
                        let value = p.id.to_string();
                        html! {
                            <option selected={value == selected} value={value.clone()}>{draft.display_name(p.id)}</option>
                        }
                    })}
                </select>
                {amount_cell}
            </div>
        }
    };

    let on_add = {
        let on_add_payer = props.on_add_payer.clone();
        Callback::from(move |_: MouseEvent| on_add_payer.emit(()))
    };
    let can_add = draft.payers.len() < draft.participants.len();

    html! {
        <div class="form-group payer-section">
            <label>{"Paid by"}</label>
            {for (0..draft.payers.len()).map(payer_row)}
            {if multiple {
                let amount = draft.amount().unwrap_or_default();
                match paid_total {
                    Some(paid) => html! {
                        <div class={if paid == amount { "payer-total" } else { "payer-total mismatch" }}>
                            {format!(
                                "Paid {} of {}",
                                format_money(paid, &draft.currency),
                                format_money(amount, &draft.currency),
                            )}
                        </div>
                    },
                    None => html! { <div class="payer-total mismatch">{"Amounts paid are too large"}</div> },
                }
            } else { html! {} }}
            <button type="button" class="btn btn-secondary" onclick={on_add} disabled={props.disabled || !can_add}>
                {"+ Add payer"}
            </button>
        </div>
    }
}
