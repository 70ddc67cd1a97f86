use shared::UserId;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;

use crate::hooks::use_comments::use_comments;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct CommentsPanelProps {
    pub api_client: ApiClient,
    pub expense_id: i64,
    pub current_user_id: UserId,
}

#[function_component(CommentsPanel)]
pub fn comments_panel(props: &CommentsPanelProps) -> Html {
    let comments = use_comments(&props.api_client, props.expense_id);
    let content = use_state(String::new);
    let state = &comments.state;

    let on_input = {
        let content = content.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            content.set(input.value());
        })
    };

    let on_submit = {
        let content = content.clone();
        let add = comments.actions.add.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            add.emit((*content).clone());
            content.set(String::new());
        })
    };

    html! {
        <div class="comments-panel">
            {if state.loading {
                html! { <div class="loading">{"Loading comments..."}</div> }
            } else if state.comments.is_empty() {
                html! { <div class="empty-state">{"No comments yet"}</div> }
            } else {
                html! {
                    <ul class="comment-list">
                        {for state.comments.iter().map(|comment| {
                            let delete = comments.actions.delete.clone();
                            let id = comment.id;
                            html! {
                                <li key={comment.id.to_string()} class="comment">
                                    <span class="comment-author">{&comment.author.name}</span>
                                    <span class="comment-content">{&comment.content}</span>
                                    {if comment.author.id == props.current_user_id {
                                        html! {
                                            <button class="btn-link" onclick={Callback::from(move |_: MouseEvent| delete.emit(id))}>
                                                {"Delete"}
                                            </button>
                                        }
                                    } else { html! {} }}
                                </li>
                            }
                        })}
                    </ul>
                }
            }}

            {if let Some(error) = state.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="comment-form" onsubmit={on_submit}>
                <textarea
                    placeholder="Add a comment"
                    value={(*content).clone()}
                    oninput={on_input}
                    disabled={state.posting}
                />
                <button type="submit" class="btn btn-secondary" disabled={state.posting || content.trim().is_empty()}>
                    {"Post"}
                </button>
            </form>
        </div>
    }
}
