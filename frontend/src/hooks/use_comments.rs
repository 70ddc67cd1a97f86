use shared::CommentResponse;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Clone, PartialEq, Default)]
pub struct CommentsState {
    pub comments: Vec<CommentResponse>,
    pub loading: bool,
    pub posting: bool,
    pub error: Option<String>,
}

pub struct UseCommentsResult {
    pub state: CommentsState,
    pub actions: UseCommentsActions,
}

#[derive(Clone, PartialEq)]
pub struct UseCommentsActions {
    pub add: Callback<String>,
    pub delete: Callback<i64>,
}

#[hook]
pub fn use_comments(api_client: &ApiClient, expense_id: i64) -> UseCommentsResult {
    let state = use_state(CommentsState::default);

    {
        let api_client = api_client.clone();
        let state = state.clone();
        use_effect_with(expense_id, move |expense_id| {
            let expense_id = *expense_id;
            spawn_local(async move {
                state.set(CommentsState {
                    loading: true,
                    ..CommentsState::default()
                });
                match api_client.comments(expense_id).await {
                    Ok(comments) => state.set(CommentsState {
                        comments,
                        ..CommentsState::default()
                    }),
                    Err(e) => {
                        Logger::warn_with_component("comments", &format!("Failed to load comments: {}", e));
                        state.set(CommentsState {
                            error: Some(e.to_string()),
                            ..CommentsState::default()
                        });
                    }
                }
            });
            || ()
        });
    }

    let add = {
        let api_client = api_client.clone();
        let state = state.clone();

        use_callback(expense_id, move |content: String, expense_id| {
            let content = content.trim().to_string();
            if content.is_empty() {
                return;
            }
            let api_client = api_client.clone();
            let state = state.clone();
            let expense_id = *expense_id;

            spawn_local(async move {
                state.set(CommentsState {
                    posting: true,
                    error: None,
                    ..(*state).clone()
                });
                match api_client.add_comment(expense_id, &content).await {
                    Ok(comment) => {
                        let mut comments = state.comments.clone();
                        comments.push(comment);
                        state.set(CommentsState {
                            comments,
                            ..CommentsState::default()
                        });
                    }
                    Err(e) => state.set(CommentsState {
                        posting: false,
                        error: Some(e.to_string()),
                        ..(*state).clone()
                    }),
                }
            });
        })
    };

    let delete = {
        let api_client = api_client.clone();
        let state = state.clone();

        Callback::from(move |comment_id: i64| {
            let api_client = api_client.clone();
            let state = state.clone();

            spawn_local(async move {
                match api_client.delete_comment(comment_id).await {
                    Ok(()) => state.set(CommentsState {
                        comments: state.comments.iter().filter(|c| c.id != comment_id).cloned().collect(),
                        error: None,
                        ..(*state).clone()
                    }),
                    Err(e) => state.set(CommentsState {
                        error: Some(e.to_string()),
                        ..(*state).clone()
                    }),
                }
            });
        })
    };

    UseCommentsResult {
        state: (*state).clone(),
        actions: UseCommentsActions { add, delete },
    }
}
