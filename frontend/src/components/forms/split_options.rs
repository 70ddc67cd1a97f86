use rust_decimal::Decimal;
use shared::domain::{ExpenseDraft, OwedShare};
use shared::money::{checked_sum, format_money};
use shared::{SplitType, UserId};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SplitOptionsProps {
    pub draft: ExpenseDraft,
    pub equal_preview: Option<Vec<OwedShare>>,
    pub disabled: bool,
    pub on_split_type_change: Callback<SplitType>,
    pub on_split_value_change: Callback<(UserId, String)>,
    pub on_toggle_included: Callback<UserId>,
}

#[function_component(SplitOptions)]
pub fn split_options(props: &SplitOptionsProps) -> Html {
    let draft = &props.draft;
    let split_type = draft.split_type;

    let type_buttons = SplitType::ALL.iter().map(|&option| {
        let on_click = {
            let on_split_type_change = props.on_split_type_change.clone();
            Callback::from(move |_: MouseEvent| on_split_type_change.emit(option))
        };
        let class = if option == split_type { "btn split-type active" } else { "btn split-type" };
        html! {
            <button type="button" class={class} title={option.label()} onclick={on_click} disabled={props.disabled}>
                {option.noun()}
            </button>
        }
    });

    let preview_for = |user_id: UserId| -> Option<Decimal> {
        props
            .equal_preview
            .as_ref()?
            .iter()
            .find(|share| share.user_id == user_id)
            .map(|share| share.amount)
    };

    let rows = draft.participants.iter().map(|participant| {
        let user_id = participant.id;
        let included = draft.included.contains(&user_id);

        let on_toggle = {
            let on_toggle_included = props.on_toggle_included.clone();
            Callback::from(move |_: Event| on_toggle_included.emit(user_id))
        };

        let value_cell = match split_type {
            SplitType::Equal => match preview_for(user_id) {
                Some(amount) if included => html! {
                    <span class="split-preview">{format_money(amount, &draft.currency)}</span>
                },
                _ => html! { <span class="split-preview muted">{"-"}</span> },
            },
            _ => {
                let on_input = {
                    let on_split_value_change = props.on_split_value_change.clone();
                    Callback::from(move |e: InputEvent| {
                        let input: HtmlInputElement = e.target_unchecked_into();
                        on_split_value_change.emit((user_id, input.value()));
                    })
                };
                let value = draft
                    .split_values
                    .get(&user_id)
                    .map(|v| v.as_input())
                    .unwrap_or_default();
                html! {
                    <input
                        type="text"
                        inputmode="decimal"
                        class="split-value"
                        placeholder={value_placeholder(split_type)}
                        value={value}
                        oninput={on_input}
                        disabled={props.disabled || !included}
                    />
                }
            }
        };

        html! {
            <li class="split-row" key={user_id.to_string()}>
                <label>
                    <input
                        type="checkbox"
                        checked={included}
                        onchange={on_toggle}
                        disabled={props.disabled}
                    />
                    {draft.display_name(user_id)}
                </label>
                {value_cell}
            </li>
        }
    });

    html! {
        <div class="form-group split-options">
            <label>{"Split"}</label>
            <div class="split-types">{for type_buttons}</div>
            <ul class="split-rows">{for rows}</ul>
            {running_total(draft)}
        </div>
    }
}

fn value_placeholder(split_type: SplitType) -> &'static str {
    match split_type {
        SplitType::Exact => "0.00",
        SplitType::Percentage => "%",
        SplitType::Share => "shares",
        SplitType::Equal => "",
    }
}

/// Sum of the entered values next to what they must add up to
fn running_total(draft: &ExpenseDraft) -> Html {
    let values: Vec<Decimal> = draft
        .included
        .iter()
        .filter_map(|id| draft.split_values.get(id).and_then(|v| v.resolve()))
        .collect();
    let Some(entered) = checked_sum(&values) else {
        return html! { <div class="split-total mismatch">{"Values are too large"}</div> };
    };

    let (text, balanced) = match draft.split_type {
        SplitType::Equal => return html! {},
        SplitType::Exact => {
            let amount = draft.amount().unwrap_or_default();
            (
                format!(
                    "{} of {}",
                    format_money(entered, &draft.currency),
                    format_money(amount, &draft.currency)
                ),
                entered == amount,
            )
        }
        SplitType::Percentage => (format!("{}% of 100%", entered.normalize()), entered == Decimal::ONE_HUNDRED),
        SplitType::Share => (format!("{} shares", entered.normalize()), entered > Decimal::ZERO),
    };

    let class = if balanced { "split-total" } else { "split-total mismatch" };
    html! { <div class={class}>{text}</div> }
}
