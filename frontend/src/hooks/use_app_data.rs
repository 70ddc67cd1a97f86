use shared::{ApiError, ExpenseResponse, FriendshipResponse, GroupResponse, OverallBalanceSummary};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

/// Groups, friends, the user's expenses and the balance overview
#[derive(Clone, PartialEq, Default)]
pub struct AppDataState {
    pub groups: Vec<GroupResponse>,
    pub friends: Vec<FriendshipResponse>,
    pub expenses: Vec<ExpenseResponse>,
    pub summary: Option<OverallBalanceSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct UseAppDataResult {
    pub state: AppDataState,
    pub refresh: Callback<()>,
}

/// Loads everything the dashboard needs whenever `signed_in` becomes true.
/// `on_unauthorized` fires when the backend rejects the stored token.
#[hook]
pub fn use_app_data(api_client: &ApiClient, signed_in: bool, on_unauthorized: Callback<()>) -> UseAppDataResult {
    let state = use_state(AppDataState::default);

    let refresh = {
        let api_client = api_client.clone();
        let state = state.clone();

        use_callback(on_unauthorized, move |_: (), on_unauthorized| {
            let api_client = api_client.clone();
            let state = state.clone();
            let on_unauthorized = on_unauthorized.clone();

            spawn_local(async move {
                state.set(AppDataState {
                    loading: true,
                    ..(*state).clone()
                });

                let loaded = async {
                    let groups = api_client.my_groups().await?;
                    let friends = api_client.friends().await?;
                    let expenses = api_client.my_expenses().await?;
                    let summary = api_client.overall_balance().await?;
                    Ok::<_, ApiError>((groups, friends, expenses, summary))
                }
                .await;

                match loaded {
                    Ok((groups, friends, expenses, summary)) => state.set(AppDataState {
                        groups,
                        friends,
                        expenses,
                        summary: Some(summary),
                        loading: false,
                        error: None,
                    }),
                    Err(e) => {
                        Logger::error_with_component("app_data", &format!("Failed to load data: {}", e));
                        if e == ApiError::Unauthorized {
                            on_unauthorized.emit(());
                        }
                        state.set(AppDataState {
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
        use_effect_with(signed_in, move |signed_in| {
            if *signed_in {
                refresh.emit(());
            }
            || ()
        });
    }

    UseAppDataResult {
        state: (*state).clone(),
        refresh,
    }
}
