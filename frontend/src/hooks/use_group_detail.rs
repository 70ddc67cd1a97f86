use shared::domain::sort_transactions;
use shared::{ApiError, BalanceDto, GroupResponse, TransactionDto, UserId};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Clone, PartialEq, Default)]
pub struct GroupDetailState {
    pub group: Option<GroupResponse>,
    pub balances: Vec<BalanceDto>,
    /// Newest first
    pub transactions: Vec<TransactionDto>,
    pub loading: bool,
    pub error: Option<String>,
    pub adding_member: bool,
}

pub struct UseGroupDetailResult {
    pub state: GroupDetailState,
    pub actions: UseGroupDetailActions,
}

#[derive(Clone, PartialEq)]
pub struct UseGroupDetailActions {
    pub refresh: Callback<()>,
    pub add_member: Callback<String>,
    pub delete_transaction: Callback<TransactionDto>,
    pub leave: Callback<UserId>,
    pub delete_group: Callback<()>,
}

/// Loads one group with its balances and transaction feed. `on_gone` fires
/// once the user has left or deleted the group, `on_changed` after anything
/// that moves the overall balance.
#[hook]
pub fn use_group_detail(
    api_client: &ApiClient,
    group_id: i64,
    on_gone: Callback<()>,
    on_changed: Callback<()>,
) -> UseGroupDetailResult {
    let state = use_state(GroupDetailState::default);

    let refresh = {
        let api_client = api_client.clone();
        let state = state.clone();

        use_callback(group_id, move |_: (), group_id| {
            let api_client = api_client.clone();
            let state = state.clone();
            let group_id = *group_id;

            spawn_local(async move {
                state.set(GroupDetailState {
                    loading: true,
                    ..(*state).clone()
                });

                let loaded = async {
                    let group = api_client.group(group_id).await?;
                    let balances = api_client.group_balances(group_id).await?;
                    let mut transactions = api_client.group_transactions(group_id).await?;
                    sort_transactions(&mut transactions);
                    Ok::<_, ApiError>((group, balances, transactions))
                }
                .await;

                match loaded {
                    Ok((group, balances, transactions)) => state.set(GroupDetailState {
                        group: Some(group),
                        balances,
                        transactions,
                        loading: false,
                        error: None,
                        adding_member: false,
                    }),
                    Err(e) => {
                        Logger::error_with_component("group_detail", &format!("Failed to load group {}: {}", group_id, e));
                        state.set(GroupDetailState {
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
        use_effect_with(group_id, move |_| {
            refresh.emit(());
            || ()
        });
    }

    let add_member = {
        let api_client = api_client.clone();
        let state = state.clone();

        use_callback(group_id, move |email: String, group_id| {
            let api_client = api_client.clone();
            let state = state.clone();
            let group_id = *group_id;

            spawn_local(async move {
                state.set(GroupDetailState {
                    adding_member: true,
                    error: None,
                    ..(*state).clone()
                });

                match api_client.add_group_member(group_id, &email).await {
                    Ok(group) => {
                        Logger::info_with_component("group_detail", &format!("Added {} to group {}", email, group_id));
                        state.set(GroupDetailState {
                            group: Some(group),
                            adding_member: false,
                            ..(*state).clone()
                        });
                    }
                    Err(e) => state.set(GroupDetailState {
                        adding_member: false,
                        error: Some(e.to_string()),
                        ..(*state).clone()
                    }),
                }
            });
        })
    };

    let delete_transaction = {
        let api_client = api_client.clone();
        let state = state.clone();
        let refresh = refresh.clone();
        let on_changed = on_changed.clone();

        Callback::from(move |transaction: TransactionDto| {
            let api_client = api_client.clone();
            let state = state.clone();
            let refresh = refresh.clone();
            let on_changed = on_changed.clone();

            spawn_local(async move {
                let deleted = match &transaction {
                    TransactionDto::Expense(expense) => api_client.delete_expense(expense.id).await,
                    TransactionDto::Payment(payment) => api_client.delete_payment(payment.id).await,
                };

                match deleted {
                    Ok(()) => {
                        refresh.emit(());
                        on_changed.emit(());
                    }
                    Err(e) => {
                        Logger::warn_with_component("group_detail", &format!("Delete failed: {}", e));
                        state.set(GroupDetailState {
                            error: Some(e.to_string()),
                            ..(*state).clone()
                        });
                    }
                }
            });
        })
    };

    let leave = {
        let api_client = api_client.clone();
        let state = state.clone();
        let on_gone = on_gone.clone();

        Callback::from(move |user_id: UserId| {
            let api_client = api_client.clone();
            let state = state.clone();
            let on_gone = on_gone.clone();

            spawn_local(async move {
                match api_client.leave_group(group_id, user_id).await {
                    Ok(()) => on_gone.emit(()),
                    Err(e) => state.set(GroupDetailState {
                        error: Some(e.to_string()),
                        ..(*state).clone()
                    }),
                }
            });
        })
    };

    let delete_group = {
        let api_client = api_client.clone();
        let state = state.clone();

        Callback::from(move |_: ()| {
            let api_client = api_client.clone();
            let state = state.clone();
            let on_gone = on_gone.clone();

            spawn_local(async move {
                match api_client.delete_group(group_id).await {
                    Ok(()) => {
                        Logger::info_with_component("group_detail", &format!("Deleted group {}", group_id));
                        on_gone.emit(());
                    }
                    Err(e) => state.set(GroupDetailState {
                        error: Some(e.to_string()),
                        ..(*state).clone()
                    }),
                }
            });
        })
    };

    UseGroupDetailResult {
        state: (*state).clone(),
        actions: UseGroupDetailActions {
            refresh,
            add_member,
            delete_transaction,
            leave,
            delete_group,
        },
    }
}
