use rust_decimal::Decimal;
use shared::domain::{build_activity, ActivityItem, ActivityKind};
use shared::money::format_money;
use shared::{ExpenseResponse, GroupResponse, Participant};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct ActivityPageProps {
    pub api_client: ApiClient,
    pub user: Participant,
    pub expenses: Vec<ExpenseResponse>,
    pub groups: Vec<GroupResponse>,
    pub loading: bool,
    pub on_edit_expense: Callback<ExpenseResponse>,
    pub on_changed: Callback<()>,
}

#[function_component(ActivityPage)]
pub fn activity_page(props: &ActivityPageProps) -> Html {
    let error_message = use_state(|| Option::<String>::None);
    let items = use_memo(
        (props.expenses.clone(), props.groups.clone(), props.user.id),
        |(expenses, groups, user_id)| build_activity(expenses, groups, *user_id),
    );

    let on_delete = {
        let api_client = props.api_client.clone();
        let error_message = error_message.clone();
        let on_changed = props.on_changed.clone();
        Callback::from(move |expense_id: i64| {
            if !gloo::dialogs::confirm("Delete this expense?") {
                return;
            }
            let api_client = api_client.clone();
            let error_message = error_message.clone();
            let on_changed = on_changed.clone();
            spawn_local(async move {
                match api_client.delete_expense(expense_id).await {
                    Ok(()) => {
                        Logger::info_with_component("activity", &format!("Deleted expense {}", expense_id));
                        error_message.set(None);
                        on_changed.emit(());
                    }
                    Err(e) => error_message.set(Some(e.to_string())),
                }
            });
        })
    };

    html! {
        <section class="activity-section">
            <h2>{"Recent activity"}</h2>

            {if let Some(error) = error_message.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            {if items.is_empty() {
                html! {
                    <div class="empty-state">
                        {if props.loading { "Loading activity..." } else { "Nothing here yet" }}
                    </div>
                }
            } else {
                html! {
                    <ul class="activity-list">
                        {for items.iter().map(|item| activity_row(item, &props.on_edit_expense, &on_delete))}
                    </ul>
                }
            }}
        </section>
    }
}

fn activity_row(item: &ActivityItem, on_edit: &Callback<ExpenseResponse>, on_delete: &Callback<i64>) -> Html {
    let when = item
        .timestamp
        .map(|t| t.format("%b %-d, %Y %H:%M").to_string())
        .unwrap_or_default();

    match &item.kind {
        ActivityKind::ExpenseAdded(expense) => {
            let currency = item.currency.as_deref().unwrap_or(&expense.currency);
            let net = item.net_change.map(|net| {
                let (text, class) = if net > Decimal::ZERO {
                    (format!("you get back {}", format_money(net, currency)), "positive")
                } else if net < Decimal::ZERO {
                    (format!("you owe {}", format_money(net.abs(), currency)), "negative")
                } else {
                    ("no change for you".to_string(), "")
                };
                html! { <span class={classes!("activity-net", class)}>{text}</span> }
            });
            let edit = {
                let on_edit = on_edit.clone();
                let expense = expense.clone();
                Callback::from(move |_: MouseEvent| on_edit.emit(expense.clone()))
            };
            let delete = {
                let on_delete = on_delete.clone();
                let id = expense.id;
                Callback::from(move |_: MouseEvent| on_delete.emit(id))
            };
            html! {
                <li key={item.key()} class="activity-item">
                    <span class="activity-text">
                        {format!("{} {}", item.actor_name, item.description)}
                        {item.context.as_ref().map(|c| format!(" {}", c)).unwrap_or_default()}
                    </span>
                    {net.unwrap_or_default()}
                    <span class="activity-time">{when}</span>
                    <button class="btn-link" onclick={edit}>{"Edit"}</button>
                    <button class="btn-link" onclick={delete}>{"Delete"}</button>
                </li>
            }
        }
        ActivityKind::GroupCreated(_) => html! {
            <li key={item.key()} class="activity-item">
                <span class="activity-text">
                    {format!("{} {}", item.actor_name, item.description)}
                </span>
                <span class="activity-time">{when}</span>
            </li>
        },
    }
}
