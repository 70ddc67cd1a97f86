use shared::domain::RegistrationDraft;
use shared::RegisterRequest;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RegisterFormProps {
    pub submitting: bool,
    pub error: Option<String>,
    pub on_register: Callback<RegisterRequest>,
    pub on_show_login: Callback<()>,
}

#[function_component(RegisterForm)]
pub fn register_form(props: &RegisterFormProps) -> Html {
    let draft = use_state(RegistrationDraft::default);
    let local_error = use_state(|| Option::<String>::None);

    let field = |apply: fn(&mut RegistrationDraft, String)| {
        let draft = draft.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut next = (*draft).clone();
            apply(&mut next, input.value());
            draft.set(next);
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let local_error = local_error.clone();
        let on_register = props.on_register.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match draft.validate() {
                Ok(request) => {
                    local_error.set(None);
                    on_register.emit(request);
                }
                Err(e) => local_error.set(Some(e.to_string())),
            }
        })
    };

    let on_show_login = {
        let on_show_login = props.on_show_login.clone();
        Callback::from(move |_: MouseEvent| on_show_login.emit(()))
    };

    let error = (*local_error).clone().or_else(|| props.error.clone());

    html! {
        <section class="login-section">
            <h2>{"Create an account"}</h2>

            {if let Some(error) = error {
                html! { <div class="form-message error">{error}</div> }
            } else { html! {} }}

            <form class="login-form" onsubmit={on_submit}>
                <div class="form-group">
                    <label for="register-name">{"Name"}</label>
                    <input
                        type="text"
                        id="register-name"
                        value={draft.name.clone()}
                        oninput={field(|d, v| d.name = v)}
                        disabled={props.submitting}
                    />
                </div>
                <div class="form-group">
                    <label for="register-email">{"Email"}</label>
                    <input
                        type="email"
                        id="register-email"
                        value={draft.email.clone()}
                        oninput={field(|d, v| d.email = v)}
                        disabled={props.submitting}
                    />
                </div>
                <div class="form-group">
                    <label for="register-password">{"Password"}</label>
                    <input
                        type="password"
                        id="register-password"
                        value={draft.password.clone()}
                        oninput={field(|d, v| d.password = v)}
                        disabled={props.submitting}
                    />
                </div>
                <div class="form-group">
                    <label for="register-confirm">{"Confirm password"}</label>
                    <input
                        type="password"
                        id="register-confirm"
                        value={draft.confirm_password.clone()}
                        oninput={field(|d, v| d.confirm_password = v)}
                        disabled={props.submitting}
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled={props.submitting}>
                    {if props.submitting { "Creating account..." } else { "Sign up" }}
                </button>
            </form>

            <p class="auth-switch">
                {"Already have an account? "}
                <button type="button" class="btn-link" onclick={on_show_login}>{"Log in"}</button>
            </p>
        </section>
    }
}
