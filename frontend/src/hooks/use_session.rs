use shared::{LoginRequest, Participant, RegisterRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;
use crate::services::logging::Logger;
use crate::services::session::SessionStore;

#[derive(Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<Participant>,
    pub logging_in: bool,
    pub error: Option<String>,
    /// Success text from registration or email verification
    pub notice: Option<String>,
}

pub struct UseSessionResult {
    pub state: SessionState,
    pub actions: UseSessionActions,
}

#[derive(Clone, PartialEq)]
pub struct UseSessionActions {
    pub login: Callback<LoginRequest>,
    pub register: Callback<RegisterRequest>,
    /// Confirm an email address with the token from the verification link
    pub verify_email: Callback<String>,
    pub logout: Callback<()>,
    /// Re-read local storage, e.g. after a request came back 401
    pub reload: Callback<()>,
}

#[hook]
pub fn use_session(api_client: &ApiClient) -> UseSessionResult {
    let user = use_state(SessionStore::user);
    let logging_in = use_state(|| false);
    let error = use_state(|| Option::<String>::None);
    let notice = use_state(|| Option::<String>::None);

    let login = {
        let api_client = api_client.clone();
        let user = user.clone();
        let logging_in = logging_in.clone();
        let error = error.clone();
        let notice = notice.clone();

        use_callback((), move |request: LoginRequest, _| {
            let api_client = api_client.clone();
            let user = user.clone();
            let logging_in = logging_in.clone();
            let error = error.clone();
            let notice = notice.clone();

            spawn_local(async move {
                logging_in.set(true);
                error.set(None);

                match api_client.login(&request).await {
                    Ok(jwt) => {
                        SessionStore::save(&jwt);
                        notice.set(None);
                        Logger::info_with_component("session", &format!("Signed in as user {}", jwt.id));
                        user.set(Some(jwt.user()));
                    }
                    Err(e) => {
                        Logger::warn_with_component("session", &format!("Login failed: {}", e));
                        error.set(Some(e.to_string()));
                    }
                }

                logging_in.set(false);
            });
        })
    };

    let register = {
        let api_client = api_client.clone();
        let logging_in = logging_in.clone();
        let error = error.clone();
        let notice = notice.clone();

        use_callback((), move |request: RegisterRequest, _| {
            let api_client = api_client.clone();
            let logging_in = logging_in.clone();
            let error = error.clone();
            let notice = notice.clone();

            spawn_local(async move {
                logging_in.set(true);
                error.set(None);
                notice.set(None);

                match api_client.register(&request).await {
                    Ok(created) => {
                        Logger::info_with_component("session", &format!("Registered user {}", created.id));
                        notice.set(Some(
                            "Registration successful! Check your email to verify your account, then log in."
                                .to_string(),
                        ));
                    }
                    Err(e) => {
                        Logger::warn_with_component("session", &format!("Registration failed: {}", e));
                        error.set(Some(e.to_string()));
                    }
                }

                logging_in.set(false);
            });
        })
    };

    let verify_email = {
        let api_client = api_client.clone();
        let logging_in = logging_in.clone();
        let error = error.clone();
        let notice = notice.clone();

        use_callback((), move |token: String, _| {
            let api_client = api_client.clone();
            let logging_in = logging_in.clone();
            let error = error.clone();
            let notice = notice.clone();

            spawn_local(async move {
                logging_in.set(true);
                error.set(None);

                match api_client.verify_email(&token).await {
                    Ok(message) => {
                        let message = if message.trim().is_empty() {
                            "Email verified. You can now log in.".to_string()
                        } else {
                            message
                        };
                        notice.set(Some(message));
                    }
                    Err(e) => {
                        Logger::warn_with_component("session", &format!("Email verification failed: {}", e));
                        error.set(Some(e.to_string()));
                    }
                }

                logging_in.set(false);
            });
        })
    };

    let logout = {
        let user = user.clone();
        use_callback((), move |_: (), _| {
            SessionStore::clear();
            user.set(None);
        })
    };

    let reload = {
        let user = user.clone();
        use_callback((), move |_: (), _| user.set(SessionStore::user()))
    };

    UseSessionResult {
        state: SessionState {
            user: (*user).clone(),
            logging_in: *logging_in,
            error: (*error).clone(),
            notice: (*notice).clone(),
        },
        actions: UseSessionActions {
            login,
            register,
            verify_email,
            logout,
            reload,
        },
    }
}
