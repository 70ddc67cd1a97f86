use shared::Participant;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub user: Option<Participant>,
    pub on_logout: Callback<()>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    html! {
        <header class="header">
            <div class="container">
                <h1>{"SplitLedger"}</h1>
                {if let Some(user) = &props.user {
                    let on_logout = props.on_logout.clone();
                    html! {
                        <div class="header-right">
                            <span class="header-user">{format!("Signed in as {}", user.name)}</span>
                            <button class="btn btn-secondary" onclick={Callback::from(move |_: MouseEvent| on_logout.emit(()))}>
                                {"Log out"}
                            </button>
                        </div>
                    }
                } else { html! {} }}
            </div>
        </header>
    }
}
