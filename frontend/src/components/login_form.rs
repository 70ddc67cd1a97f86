use shared::LoginRequest;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct LoginFormProps {
    pub logging_in: bool,
    pub error: Option<String>,
    #[prop_or_default]
    pub notice: Option<String>,
    pub on_login: Callback<LoginRequest>,
    pub on_show_register: Callback<()>,
}

#[function_component(LoginForm)]
pub fn login_form(props: &LoginFormProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);

    let on_email_change = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_login.emit(LoginRequest {
                email: email.trim().to_string(),
                password: (*password).clone(),
            });
        })
    };

    let on_show_register = {
        let on_show_register = props.on_show_register.clone();
        Callback::from(move |_: MouseEvent| on_show_register.emit(()))
    };

    html! {
        <section class="login-section">
            <h2>{"Log in"}</h2>

            {if let Some(notice) = props.notice.as_ref() {
                html! { <div class="form-message success">{notice}</div> }
            } else { html! {} }}

            {if let Some(error) = props.error.as_ref() {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="login-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="login-email">{"Email"}</label>
                    <input
                        type="email"
                        id="login-email"
                        value={(*email).clone()}
                        oninput={on_email_change}
                        disabled={props.logging_in}
                    />
                </div>
                <div class="form-group">
                    <label for="login-password">{"Password"}</label>
                    <input
                        type="password"
                        id="login-password"
                        value={(*password).clone()}
                        oninput={on_password_change}
                        disabled={props.logging_in}
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled={props.logging_in}>
                    {if props.logging_in { "Logging in..." } else { "Log in" }}
                </button>
            </form>

            <p class="auth-switch">
                {"New here? "}
                <button type="button" class="btn-link" onclick={on_show_register}>{"Create an account"}</button>
            </p>
        </section>
    }
}
