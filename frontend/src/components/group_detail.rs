use rust_decimal::Decimal;
use shared::domain::normalize_email;
use shared::money::format_money;
use shared::{ExpenseResponse, Participant, PaymentResponse, TransactionDto};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::components::comments_panel::CommentsPanel;
use crate::hooks::use_group_detail::use_group_detail;
use crate::services::api::ApiClient;
use crate::services::date_utils;

#[derive(Properties, PartialEq)]
pub struct GroupDetailProps {
    pub api_client: ApiClient,
    pub group_id: i64,
    pub user: Participant,
    pub on_add_expense: Callback<()>,
    pub on_settle_up: Callback<()>,
    pub on_edit_expense: Callback<ExpenseResponse>,
    pub on_edit_payment: Callback<PaymentResponse>,
    /// The user left or deleted the group
    pub on_gone: Callback<()>,
    pub on_changed: Callback<()>,
}

#[function_component(GroupDetail)]
pub fn group_detail(props: &GroupDetailProps) -> Html {
    let detail = use_group_detail(
        &props.api_client,
        props.group_id,
        props.on_gone.clone(),
        props.on_changed.clone(),
    );
    let member_email = use_state(String::new);
    let member_error = use_state(|| Option::<String>::None);
    let state = &detail.state;

    let Some(group) = state.group.as_ref() else {
        return html! {
            <section class="group-section">
                {if let Some(error) = state.error.as_ref() {
                    html! { <div class="form-message error">{error}</div> }
                } else {
                    html! { <div class="loading">{"Loading group..."}</div> }
                }}
            </section>
        };
    };
    let is_creator = group.creator.id == props.user.id;

    let on_member_input = {
        let member_email = member_email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            member_email.set(input.value());
        })
    };

    let on_add_member = {
        let member_email = member_email.clone();
        let member_error = member_error.clone();
        let add_member = detail.actions.add_member.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match normalize_email(&member_email) {
                Some(email) => {
                    member_error.set(None);
                    member_email.set(String::new());
                    add_member.emit(email);
                }
                None => member_error.set(Some("Please enter a valid email address".to_string())),
            }
        })
    };

    let on_leave = {
        let leave = detail.actions.leave.clone();
        let user_id = props.user.id;
        Callback::from(move |_: MouseEvent| {
            if gloo::dialogs::confirm("Leave this group?") {
                leave.emit(user_id);
            }
        })
    };

    let on_delete_group = {
        let delete_group = detail.actions.delete_group.clone();
        Callback::from(move |_: MouseEvent| {
            if gloo::dialogs::confirm("Delete this group and all of its expenses?") {
                delete_group.emit(());
            }
        })
    };

    let button = |label: &'static str, class: &'static str, callback: &Callback<()>| {
        let callback = callback.clone();
        html! {
            <button class={class} onclick={Callback::from(move |_: MouseEvent| callback.emit(()))}>{label}</button>
        }
    };

    html! {
        <section class="group-section">
            <div class="group-header">
                <h2>{&group.name}</h2>
                <div class="form-actions">
                    {button("Add an expense", "btn btn-primary", &props.on_add_expense)}
                    {button("Settle up", "btn btn-secondary", &props.on_settle_up)}
                </div>
            </div>

            {if let Some(error) = state.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <div class="group-columns">
                <div class="group-members">
                    <h3>{"Members"}</h3>
                    <ul>
                        {for group.members.iter().map(|member| html! {
                            <li key={member.id.to_string()}>
                                {&member.name}
                                {if member.id == group.creator.id { " (creator)" } else { "" }}
                            </li>
                        })}
                    </ul>
                    <form class="inline-form" onsubmit={on_add_member}>
                        <input
                            type="email"
                            placeholder="Member email"
                            value={(*member_email).clone()}
                            oninput={on_member_input}
                            disabled={state.adding_member}
                        />
                        <button type="submit" class="btn btn-secondary" disabled={state.adding_member}>
                            {"Add member"}
                        </button>
                    </form>
                    {if let Some(error) = member_error.as_ref() {
                        html! { <div class="form-message error">{error}</div> }
                    } else { html! {} }}
                </div>

                <div class="group-balances">
                    <h3>{"Balances"}</h3>
                    {if state.balances.iter().all(|b| b.net_amount.is_zero()) {
                        html! { <div class="empty-state">{"Everyone is settled up"}</div> }
                    } else {
                        html! {
                            <ul>
                                {for state.balances.iter().filter(|b| !b.net_amount.is_zero()).map(|balance| {
                                    let (text, class) = if balance.net_amount > Decimal::ZERO {
                                        (format!("{} owes you", balance.other_user.name), "positive")
                                    } else {
                                        (format!("You owe {}", balance.other_user.name), "negative")
                                    };
                                    html! {
                                        <li key={balance.other_user.id.to_string()} class={classes!("balance-row", class)}>
                                            <span>{text}</span>
                                            <span>{format_money(balance.net_amount.abs(), &balance.currency)}</span>
                                        </li>
                                    }
                                })}
                            </ul>
                        }
                    }}
                </div>
            </div>

            <h3>{"Transactions"}</h3>
            {if state.transactions.is_empty() {
                html! {
                    <div class="empty-state">
                        {if state.loading { "Loading transactions..." } else { "No transactions yet" }}
                    </div>
                }
            } else {
                html! {
                    <ul class="transaction-list">
                        {for state.transactions.iter().map(|transaction| {
                            let key = match transaction {
                                TransactionDto::Expense(e) => format!("expense-{}", e.id),
                                TransactionDto::Payment(p) => format!("payment-{}", p.id),
                            };
                            html! {
                                <TransactionRow
                                    key={key}
                                    api_client={props.api_client.clone()}
                                    transaction={transaction.clone()}
                                    user={props.user.clone()}
                                    on_edit_expense={props.on_edit_expense.clone()}
                                    on_edit_payment={props.on_edit_payment.clone()}
                                    on_delete={detail.actions.delete_transaction.clone()}
                                />
                            }
                        })}
                    </ul>
                }
            }}

            <div class="danger-zone">
                <button class="btn btn-secondary" onclick={on_leave}>{"Leave group"}</button>
                {if is_creator {
                    html! { <button class="btn btn-danger" onclick={on_delete_group}>{"Delete group"}</button> }
                } else { html! {} }}
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct TransactionRowProps {
    api_client: ApiClient,
    transaction: TransactionDto,
    user: Participant,
    on_edit_expense: Callback<ExpenseResponse>,
    on_edit_payment: Callback<PaymentResponse>,
    on_delete: Callback<TransactionDto>,
}

#[function_component(TransactionRow)]
fn transaction_row(props: &TransactionRowProps) -> Html {
    let show_comments = use_state(|| false);

    let you_or = |id, name: &str| if id == props.user.id { "You".to_string() } else { name.to_string() };

    let (title, subtitle, currency) = match &props.transaction {
        TransactionDto::Expense(expense) => {
            let payer = expense
                .payers
                .first()
                .map(|p| you_or(p.user.id, &p.user.name))
                .unwrap_or_else(|| "Someone".to_string());
            (expense.description.clone(), format!("{} paid", payer), expense.currency.as_str())
        }
        TransactionDto::Payment(payment) => (
            format!(
                "{} paid {}",
                you_or(payment.paid_by.id, &payment.paid_by.name),
                you_or(payment.paid_to.id, &payment.paid_to.name)
            ),
            "Payment".to_string(),
            payment.currency.as_str(),
        ),
    };

    let on_edit = {
        let transaction = props.transaction.clone();
        let on_edit_expense = props.on_edit_expense.clone();
        let on_edit_payment = props.on_edit_payment.clone();
        Callback::from(move |_: MouseEvent| match &transaction {
            TransactionDto::Expense(expense) => on_edit_expense.emit(expense.clone()),
            TransactionDto::Payment(payment) => on_edit_payment.emit(payment.clone()),
        })
    };

    let on_delete = {
        let transaction = props.transaction.clone();
        let on_delete = props.on_delete.clone();
        Callback::from(move |_: MouseEvent| {
            if gloo::dialogs::confirm("Delete this transaction?") {
                on_delete.emit(transaction.clone());
            }
        })
    };

    let toggle_comments = {
        let show_comments = show_comments.clone();
        Callback::from(move |_: MouseEvent| show_comments.set(!*show_comments))
    };

    html! {
        <li class="transaction-item">
            <div class="transaction-main">
                <span class="transaction-date">{date_utils::format_display_date(props.transaction.date())}</span>
                <span class="transaction-title">{title}</span>
                <span class="transaction-subtitle">{subtitle}</span>
                <span class="transaction-amount">{format_money(props.transaction.amount(), currency)}</span>
            </div>
            <div class="transaction-actions">
                {if let TransactionDto::Expense(_) = &props.transaction {
                    html! {
                        <button class="btn-link" onclick={toggle_comments}>
                            {if *show_comments { "Hide comments" } else { "Comments" }}
                        </button>
                    }
                } else { html! {} }}
                <button class="btn-link" onclick={on_edit}>{"Edit"}</button>
                <button class="btn-link" onclick={on_delete}>{"Delete"}</button>
            </div>
            {match (&props.transaction, *show_comments) {
                (TransactionDto::Expense(expense), true) => html! {
                    <CommentsPanel
                        api_client={props.api_client.clone()}
                        expense_id={expense.id}
                        current_user_id={props.user.id}
                    />
                },
                _ => html! {},
            }}
        </li>
    }
}
