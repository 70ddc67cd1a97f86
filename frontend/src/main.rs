use shared::domain::{participants_for_expense, participants_for_friend, participants_for_group, participants_for_payment};
use shared::{ExpenseResponse, GroupResponse, Participant, PaymentResponse};
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::activity_page::ActivityPage;
use components::balance_summary::BalanceSummary;
use components::forms::expense_form::ExpenseForm;
use components::forms::payment_form::PaymentForm;
use components::friends_page::FriendsPage;
use components::group_detail::GroupDetail;
use components::groups_page::GroupsPage;
use components::header::Header;
use components::login_form::LoginForm;
use components::nav_bar::{NavBar, View};
use components::register_form::RegisterForm;
use components::target_selector::{ExpenseTarget, TargetSelector};
use components::verify_email::{token_from_location, VerifyEmail};
use hooks::use_app_data::use_app_data;
use hooks::use_expense_form::ExpenseFormSeed;
use hooks::use_payment_form::PaymentFormSeed;
use hooks::use_session::use_session;
use services::api::ApiClient;
use services::logging::Logger;

#[derive(Clone, PartialEq)]
enum AuthView {
    Login,
    Register,
    Verify(String),
}

#[derive(Clone, PartialEq)]
enum FormMode {
    Closed,
    Expense,
    Payment,
    EditExpense(ExpenseResponse),
    EditPayment(PaymentResponse),
}

#[function_component(App)]
fn app() -> Html {
    let api_client = use_state(ApiClient::new);
    let session = use_session(&api_client);
    let signed_in = session.state.user.is_some();
    let app_data = use_app_data(&api_client, signed_in, session.actions.reload.clone());

    let auth_view = use_state(|| token_from_location().map_or(AuthView::Login, AuthView::Verify));
    let view = use_state(|| View::Dashboard);
    let target = use_state(|| Option::<ExpenseTarget>::None);
    let mode = use_state(|| FormMode::Closed);
    // Bumped after a save so the open group page reloads its feed
    let revision = use_state(|| 0u32);

    {
        let auth_view = auth_view.clone();
        use_effect_with(session.state.notice.clone(), move |notice| {
            if notice.is_some() {
                auth_view.set(AuthView::Login);
            }
            || ()
        });
    }

    let Some(user) = session.state.user.clone() else {
        let show = |next: AuthView| {
            let auth_view = auth_view.clone();
            Callback::from(move |_: ()| auth_view.set(next.clone()))
        };
        let screen = match &*auth_view {
            AuthView::Login => html! {
                <LoginForm
                    logging_in={session.state.logging_in}
                    error={session.state.error.clone()}
                    notice={session.state.notice.clone()}
                    on_login={session.actions.login.clone()}
                    on_show_register={show(AuthView::Register)}
                />
            },
            AuthView::Register => html! {
                <RegisterForm
                    submitting={session.state.logging_in}
                    error={session.state.error.clone()}
                    on_register={session.actions.register.clone()}
                    on_show_login={show(AuthView::Login)}
                />
            },
            AuthView::Verify(token) => html! {
                <VerifyEmail
                    token={token.clone()}
                    verifying={session.state.logging_in}
                    on_verify={session.actions.verify_email.clone()}
                    on_done={show(AuthView::Login)}
                />
            },
        };

        return html! {
            <>
                <Header user={None::<Participant>} on_logout={session.actions.logout.clone()} />
                <main class="main">
                    <div class="container">{screen}</div>
                </main>
            </>
        };
    };

    let find_group = |id: Option<i64>| id.and_then(|id| app_data.state.groups.iter().find(|g| g.id == id));

    // Everyone the form can split with, the signed-in user first
    let (participants, group_id) = match *target {
        Some(ExpenseTarget::Group(id)) => match find_group(Some(id)) {
            Some(group) => (participants_for_group(group, &user), Some(id)),
            None => (vec![user.clone()], None),
        },
        Some(ExpenseTarget::Friend(id)) => {
            match app_data.state.friends.iter().find(|f| f.other_user.id == id) {
                Some(friendship) => (participants_for_friend(friendship, &user), None),
                None => (vec![user.clone()], None),
            }
        }
        None => (vec![user.clone()], None),
    };

    let navigate = {
        let view = view.clone();
        let mode = mode.clone();
        Callback::from(move |next: View| {
            mode.set(FormMode::Closed);
            view.set(next);
        })
    };

    let on_select = {
        let target = target.clone();
        let mode = mode.clone();
        Callback::from(move |selected: Option<ExpenseTarget>| {
            target.set(selected);
            if selected.is_none() {
                mode.set(FormMode::Closed);
            }
        })
    };

    let open_mode = |next: FormMode| {
        let mode = mode.clone();
        Callback::from(move |_: MouseEvent| mode.set(next.clone()))
    };

    // From a group page: target that group, then open the form
    let open_for_group = |group_id: i64, next: FormMode| {
        let target = target.clone();
        let mode = mode.clone();
        Callback::from(move |_: ()| {
            target.set(Some(ExpenseTarget::Group(group_id)));
            mode.set(next.clone());
        })
    };

    let edit_expense = {
        let mode = mode.clone();
        Callback::from(move |expense: ExpenseResponse| mode.set(FormMode::EditExpense(expense)))
    };

    let edit_payment = {
        let mode = mode.clone();
        Callback::from(move |payment: PaymentResponse| mode.set(FormMode::EditPayment(payment)))
    };

    let close_form = {
        let mode = mode.clone();
        Callback::from(move |_: ()| mode.set(FormMode::Closed))
    };

    let after_save = {
        let mode = mode.clone();
        let revision = revision.clone();
        let refresh = app_data.refresh.clone();
        move || {
            mode.set(FormMode::Closed);
            revision.set(*revision + 1);
            refresh.emit(());
        }
    };

    let on_expense_saved = {
        let after_save = after_save.clone();
        Callback::from(move |expense: ExpenseResponse| {
            Logger::info_with_component("app", &format!("Expense {} saved", expense.id));
            after_save();
        })
    };

    let on_payment_saved = {
        let after_save = after_save.clone();
        Callback::from(move |payment: PaymentResponse| {
            Logger::info_with_component("app", &format!("Payment {} saved", payment.id));
            after_save();
        })
    };

    // Remount the form whenever its subject changes so it starts from a fresh draft
    let form_key = match (&*mode, *target) {
        (FormMode::EditExpense(expense), _) => format!("edit-expense-{}", expense.id),
        (FormMode::EditPayment(payment), _) => format!("edit-payment-{}", payment.id),
        (_, Some(ExpenseTarget::Group(id))) => format!("group-{}", id),
        (_, Some(ExpenseTarget::Friend(id))) => format!("friend-{}", id),
        (_, None) => "none".to_string(),
    };

    let form = match &*mode {
        FormMode::Closed => html! {},
        FormMode::Expense => html! {
            <ExpenseForm
                key={form_key}
                api_client={(*api_client).clone()}
                seed={ExpenseFormSeed::New {
                    owner: user.clone(),
                    participants: participants.clone(),
                    group_id,
                }}
                on_saved={on_expense_saved}
                on_cancel={close_form}
            />
        },
        FormMode::EditExpense(expense) => html! {
            <ExpenseForm
                key={form_key}
                api_client={(*api_client).clone()}
                seed={ExpenseFormSeed::Existing {
                    owner: user.clone(),
                    expense: expense.clone(),
                    participants: participants_for_expense(expense, find_group(expense.group_id), &user),
                }}
                on_saved={on_expense_saved}
                on_cancel={close_form}
            />
        },
        FormMode::Payment => html! {
            <PaymentForm
                key={form_key}
                api_client={(*api_client).clone()}
                seed={PaymentFormSeed::New {
                    payer_id: user.id,
                    candidates: participants.clone(),
                    group_id,
                }}
                on_saved={on_payment_saved}
                on_cancel={close_form}
            />
        },
        FormMode::EditPayment(payment) => html! {
            <PaymentForm
                key={form_key}
                api_client={(*api_client).clone()}
                seed={PaymentFormSeed::Existing {
                    payment: payment.clone(),
                    candidates: participants_for_payment(payment, find_group(payment.group_id), &user),
                }}
                on_saved={on_payment_saved}
                on_cancel={close_form}
            />
        },
    };

    let page = match *view {
        View::Dashboard => html! {
            <>
                <BalanceSummary
                    summary={app_data.state.summary.clone()}
                    loading={app_data.state.loading}
                />

                <section class="actions-section">
                    <TargetSelector
                        groups={app_data.state.groups.clone()}
                        friends={app_data.state.friends.clone()}
                        selected={*target}
                        on_select={on_select}
                    />
                    <div class="form-actions">
                        <button
                            class="btn btn-primary"
                            onclick={open_mode(FormMode::Expense)}
                            disabled={target.is_none()}
                        >
                            {"Add an expense"}
                        </button>
                        <button
                            class="btn btn-secondary"
                            onclick={open_mode(FormMode::Payment)}
                            disabled={target.is_none() || participants.len() < 2}
                        >
                            {"Settle up"}
                        </button>
                    </div>
                </section>
            </>
        },
        View::Groups => {
            let open = {
                let view = view.clone();
                Callback::from(move |id: i64| view.set(View::Group(id)))
            };
            let on_created = {
                let view = view.clone();
                let refresh = app_data.refresh.clone();
                Callback::from(move |group: GroupResponse| {
                    refresh.emit(());
                    view.set(View::Group(group.id));
                })
            };
            html! {
                <GroupsPage
                    api_client={(*api_client).clone()}
                    groups={app_data.state.groups.clone()}
                    loading={app_data.state.loading}
                    on_open={open}
                    on_created={on_created}
                />
            }
        }
        View::Group(id) => {
            let on_gone = {
                let view = view.clone();
                let target = target.clone();
                let refresh = app_data.refresh.clone();
                Callback::from(move |_: ()| {
                    target.set(None);
                    view.set(View::Groups);
                    refresh.emit(());
                })
            };
            html! {
                <GroupDetail
                    key={format!("group-{}-{}", id, *revision)}
                    api_client={(*api_client).clone()}
                    group_id={id}
                    user={user.clone()}
                    on_add_expense={open_for_group(id, FormMode::Expense)}
                    on_settle_up={open_for_group(id, FormMode::Payment)}
                    on_edit_expense={edit_expense.clone()}
                    on_edit_payment={edit_payment}
                    on_gone={on_gone}
                    on_changed={app_data.refresh.clone()}
                />
            }
        }
        View::Friends => html! {
            <FriendsPage
                api_client={(*api_client).clone()}
                currency={api_client.config().default_currency.clone()}
                on_changed={app_data.refresh.clone()}
            />
        },
        View::Activity => html! {
            <ActivityPage
                api_client={(*api_client).clone()}
                user={user.clone()}
                expenses={app_data.state.expenses.clone()}
                groups={app_data.state.groups.clone()}
                loading={app_data.state.loading}
                on_edit_expense={edit_expense}
                on_changed={app_data.refresh.clone()}
            />
        },
    };

    html! {
        <>
            <Header user={Some(user.clone())} on_logout={session.actions.logout.clone()} />
            <NavBar current={*view} on_navigate={navigate} />
            <main class="main">
                <div class="container">
                    {if let Some(error) = app_data.state.error.as_ref() {
                        html! { <div class="form-message error">{error}</div> }
                    } else { html! {} }}

                    {form}
                    {page}
                </div>
            </main>
        </>
    }
}

fn main() {
    services::logging::init_tracing();
    yew::Renderer::<App>::new().render();
}
