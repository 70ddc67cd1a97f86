use rust_decimal::Decimal;
use shared::domain::normalize_email;
use shared::money::format_money;
use shared::FriendshipResponse;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::use_friends::{use_friends, FriendAction};
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct FriendsPageProps {
    pub api_client: ApiClient,
    pub currency: String,
    pub on_changed: Callback<()>,
}

#[function_component(FriendsPage)]
pub fn friends_page(props: &FriendsPageProps) -> Html {
    let friends = use_friends(&props.api_client, props.on_changed.clone());
    let email = use_state(String::new);
    let email_error = use_state(|| Option::<String>::None);
    let state = &friends.state;

    let on_email_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_send = {
        let email = email.clone();
        let email_error = email_error.clone();
        let send_request = friends.actions.send_request.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match normalize_email(&email) {
                Some(address) => {
                    email_error.set(None);
                    email.set(String::new());
                    send_request.emit(address);
                }
                None => email_error.set(Some("Please enter a valid email address".to_string())),
            }
        })
    };

    let action_button = |friendship: &FriendshipResponse, action: FriendAction, label: &'static str| {
        let respond = friends.actions.respond.clone();
        let id = friendship.id;
        let confirm_text = (action == FriendAction::Remove)
            .then(|| format!("Remove {} from your friends?", friendship.other_user.name));
        html! {
            <button
                class="btn-link"
                onclick={Callback::from(move |_: MouseEvent| {
                    let confirmed = confirm_text.as_deref().map_or(true, gloo::dialogs::confirm);
                    if confirmed {
                        respond.emit((id, action));
                    }
                })}
            >
                {label}
            </button>
        }
    };

    let balance_text = |balance: Option<Decimal>| match balance {
        Some(net) if net > Decimal::ZERO => html! {
            <span class="positive">{format!("owes you {}", format_money(net, &props.currency))}</span>
        },
        Some(net) if net < Decimal::ZERO => html! {
            <span class="negative">{format!("you owe {}", format_money(net.abs(), &props.currency))}</span>
        },
        _ => html! { <span>{"settled up"}</span> },
    };

    html! {
        <section class="friends-section">
            <h2>{"Friends"}</h2>

            <form class="inline-form" onsubmit={on_send}>
                <input
                    type="email"
                    placeholder="Friend's email"
                    value={(*email).clone()}
                    oninput={on_email_input}
                />
                <button type="submit" class="btn btn-primary">{"Send request"}</button>
            </form>

            {for [email_error.as_ref(), state.error.as_ref()].into_iter().flatten().map(|error| html! {
                <div class="form-message error">{error}</div>
            })}
            {if let Some(notice) = state.notice.as_ref() {
                html! { <div class="form-message success">{notice}</div> }
            } else { html! {} }}

            {if !state.incoming.is_empty() {
                html! {
                    <>
                        <h3>{"Requests for you"}</h3>
                        <ul class="friend-list">
                            {for state.incoming.iter().map(|request| html! {
                                <li key={request.id.to_string()} class="friend-item">
                                    <span>{format!("{} ({})", request.other_user.name, request.other_user.email)}</span>
                                    {action_button(request, FriendAction::Accept, "Accept")}
                                    {action_button(request, FriendAction::Reject, "Reject")}
                                </li>
                            })}
                        </ul>
                    </>
                }
            } else { html! {} }}

            {if !state.outgoing.is_empty() {
                html! {
                    <>
                        <h3>{"Waiting for a reply"}</h3>
                        <ul class="friend-list">
                            {for state.outgoing.iter().map(|request| html! {
                                <li key={request.id.to_string()} class="friend-item">
                                    <span>{&request.other_user.name}</span>
                                    <span class="pending">{"Pending"}</span>
                                </li>
                            })}
                        </ul>
                    </>
                }
            } else { html! {} }}

            <h3>{"Your friends"}</h3>
            {if state.friends.is_empty() {
                html! {
                    <div class="empty-state">
                        {if state.loading { "Loading friends..." } else { "No friends yet" }}
                    </div>
                }
            } else {
                html! {
                    <ul class="friend-list">
                        {for state.friends.iter().map(|friend| html! {
                            <li key={friend.id.to_string()} class="friend-item">
                                <span>{&friend.other_user.name}</span>
                                {balance_text(friend.net_balance)}
                                {action_button(friend, FriendAction::Remove, "Remove")}
                            </li>
                        })}
                    </ul>
                }
            }}
        </section>
    }
}
