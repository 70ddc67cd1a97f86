use shared::{ApiError, FriendshipResponse};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Clone, PartialEq, Default)]
pub struct FriendsState {
    pub friends: Vec<FriendshipResponse>,
    pub incoming: Vec<FriendshipResponse>,
    pub outgoing: Vec<FriendshipResponse>,
    pub loading: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

pub struct UseFriendsResult {
    pub state: FriendsState,
    pub actions: UseFriendsActions,
}

#[derive(Clone, PartialEq)]
pub struct UseFriendsActions {
    pub refresh: Callback<()>,
    pub send_request: Callback<String>,
    pub respond: Callback<(i64, FriendAction)>,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FriendAction {
    Accept,
    Reject,
    Remove,
}

/// Friend list and pending requests. `on_changed` fires whenever the set of
/// accepted friends changes so the rest of the app can reload.
#[hook]
pub fn use_friends(api_client: &ApiClient, on_changed: Callback<()>) -> UseFriendsResult {
    let state = use_state(FriendsState::default);

    let refresh = {
        let api_client = api_client.clone();
        let state = state.clone();

        use_callback((), move |_: (), _| {
            let api_client = api_client.clone();
            let state = state.clone();

            spawn_local(async move {
                state.set(FriendsState {
                    loading: true,
                    ..(*state).clone()
                });

                let loaded = async {
                    let friends = api_client.friends().await?;
                    let incoming = api_client.incoming_requests().await?;
                    let outgoing = api_client.outgoing_requests().await?;
                    Ok::<_, ApiError>((friends, incoming, outgoing))
                }
                .await;

                match loaded {
                    Ok((friends, incoming, outgoing)) => state.set(FriendsState {
                        friends,
                        incoming,
                        outgoing,
                        loading: false,
                        error: None,
                        ..(*state).clone()
                    }),
                    Err(e) => {
                        Logger::error_with_component("friends", &format!("Failed to load friends: {}", e));
                        state.set(FriendsState {
                            loading: false,
                            error: Some(e.to_string()),
                            ..(*state).clone()
                        });
                    }
                }
            });
        })
    };

    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let send_request = {
        let api_client = api_client.clone();
        let state = state.clone();
        let refresh = refresh.clone();

        Callback::from(move |email: String| {
            let api_client = api_client.clone();
            let state = state.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                match api_client.send_friend_request(&email).await {
                    Ok(_) => {
                        state.set(FriendsState {
                            error: None,
                            notice: Some(format!("Friend request sent to {}", email)),
                            ..(*state).clone()
                        });
                        refresh.emit(());
                    }
                    Err(e) => state.set(FriendsState {
                        error: Some(e.to_string()),
                        notice: None,
                        ..(*state).clone()
                    }),
                }
            });
        })
    };

    let respond = {
        let api_client = api_client.clone();
        let state = state.clone();
        let refresh = refresh.clone();

        Callback::from(move |(friendship_id, action): (i64, FriendAction)| {
            let api_client = api_client.clone();
            let state = state.clone();
            let refresh = refresh.clone();
            let on_changed = on_changed.clone();

            spawn_local(async move {
                let result = match action {
                    FriendAction::Accept => api_client.accept_friend_request(friendship_id).await.map(|_| ()),
                    FriendAction::Reject => api_client.reject_friend_request(friendship_id).await,
                    FriendAction::Remove => api_client.remove_friend(friendship_id).await,
                };

                match result {
                    Ok(()) => {
                        refresh.emit(());
                        on_changed.emit(());
                    }
                    Err(e) => {
                        Logger::warn_with_component(
                            "friends",
                            &format!("Friendship {} update failed: {}", friendship_id, e),
                        );
                        state.set(FriendsState {
                            error: Some(e.to_string()),
                            notice: None,
                            ..(*state).clone()
                        });
                    }
                }
            });
        })
    };

    UseFriendsResult {
        state: (*state).clone(),
        actions: UseFriendsActions {
            refresh,
            send_request,
            respond,
        },
    }
}

