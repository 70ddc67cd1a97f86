use shared::{GroupCreateRequest, GroupResponse};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;

#[derive(Properties, PartialEq)]
pub struct GroupsPageProps {
    pub api_client: ApiClient,
    pub groups: Vec<GroupResponse>,
    pub loading: bool,
    pub on_open: Callback<i64>,
    pub on_created: Callback<GroupResponse>,
}

#[function_component(GroupsPage)]
pub fn groups_page(props: &GroupsPageProps) -> Html {
    let name = use_state(String::new);
    let is_submitting = use_state(|| false);
    let error_message = use_state(|| Option::<String>::None);

    let on_name_change = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };

    let on_submit = {
        let api_client = props.api_client.clone();
        let name = name.clone();
        let is_submitting = is_submitting.clone();
        let error_message = error_message.clone();
        let on_created = props.on_created.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let trimmed = name.trim().to_string();
            if trimmed.is_empty() {
                error_message.set(Some("Please enter a group name".to_string()));
                return;
            }

            let api_client = api_client.clone();
            let name = name.clone();
            let is_submitting = is_submitting.clone();
            let error_message = error_message.clone();
            let on_created = on_created.clone();

            is_submitting.set(true);
            error_message.set(None);

            spawn_local(async move {
                match api_client.create_group(&GroupCreateRequest { name: trimmed }).await {
                    Ok(group) => {
                        Logger::info_with_component("groups", &format!("Created group {}", group.id));
                        name.set(String::new());
                        on_created.emit(group);
                    }
                    Err(e) => error_message.set(Some(e.to_string())),
                }
                is_submitting.set(false);
            });
        })
    };

    html! {
        <section class="groups-section">
            <h2>{"Your groups"}</h2>

            <form class="inline-form" onsubmit={on_submit}>
                <input
                    type="text"
                    placeholder="New group name"
                    value={(*name).clone()}
                    oninput={on_name_change}
                    disabled={*is_submitting}
                />
                <button type="submit" class="btn btn-primary" disabled={*is_submitting}>
                    {if *is_submitting { "Creating..." } else { "Create group" }}
                </button>
            </form>

            {if let Some(error) = error_message.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            {if props.groups.is_empty() {
                html! {
                    <div class="empty-state">
                        {if props.loading { "Loading groups..." } else { "You are not in any groups yet" }}
                    </div>
                }
            } else {
                html! {
                    <ul class="group-list">
                        {for props.groups.iter().map(|group| {
                            let on_open = props.on_open.clone();
                            let id = group.id;
                            html! {
                                <li key={group.id.to_string()} class="group-item">
                                    <button class="btn-link" onclick={Callback::from(move |_: MouseEvent| on_open.emit(id))}>
                                        {&group.name}
                                    </button>
                                    <span class="group-members">
                                        {format!("{} members", group.members.len())}
                                    </span>
                                </li>
                            }
                        })}
                    </ul>
                }
            }}
        </section>
    }
}
