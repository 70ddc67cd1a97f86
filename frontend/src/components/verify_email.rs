use web_sys::UrlSearchParams;
use yew::prelude::*;

/// The `token` query parameter of a verification link, if the page was opened from one
pub fn token_from_location() -> Option<String> {
    let search = gloo::utils::window().location().search().ok()?;
    token_from_query(&search)
}

fn token_from_query(search: &str) -> Option<String> {
    let params = UrlSearchParams::new_with_str(search).ok()?;
    params.get("token").filter(|token| !token.trim().is_empty())
}

#[derive(Properties, PartialEq)]
pub struct VerifyEmailProps {
    pub token: String,
    pub verifying: bool,
    pub on_verify: Callback<String>,
    pub on_done: Callback<()>,
}

/// Sends the token once on mount, then shows the session's notice or error
/// through the login screen the user is returned to.
#[function_component(VerifyEmail)]
pub fn verify_email(props: &VerifyEmailProps) -> Html {
    {
        let on_verify = props.on_verify.clone();
        let on_done = props.on_done.clone();
        use_effect_with(props.token.clone(), move |token| {
            on_verify.emit(token.clone());
            on_done.emit(());
            || ()
        });
    }

    html! {
        <section class="login-section">
            <div class="loading">
                {if props.verifying { "Verifying your email..." } else { "Checking verification link..." }}
            </div>
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_token_from_query() {
        assert_eq!(token_from_query("?token=abc123").as_deref(), Some("abc123"));
        assert_eq!(token_from_query("?other=1&token=x%2By").as_deref(), Some("x+y"));
        assert_eq!(token_from_query("?token="), None);
        assert_eq!(token_from_query(""), None);
    }
}
