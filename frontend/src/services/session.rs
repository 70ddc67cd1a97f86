//! The signed-in user, persisted in local storage between visits.

use gloo::storage::{LocalStorage, Storage};
use shared::{JwtResponse, Participant};

use super::logging::Logger;

const TOKEN_KEY: &str = "authToken";
const USER_KEY: &str = "userInfo";

pub struct SessionStore;

impl SessionStore {
    pub fn save(jwt: &JwtResponse) {
        if let Err(e) = LocalStorage::set(TOKEN_KEY, &jwt.token) {
            Logger::error_with_component("session", &format!("Failed to store token: {}", e));
        }
        if let Err(e) = LocalStorage::set(USER_KEY, jwt.user()) {
            Logger::error_with_component("session", &format!("Failed to store user: {}", e));
        }
    }

    pub fn token() -> Option<String> {
        LocalStorage::get::<String>(TOKEN_KEY).ok()
    }

    /// The stored user, only while a token is present too
    pub fn user() -> Option<Participant> {
        Self::token()?;
        LocalStorage::get::<Participant>(USER_KEY).ok()
    }

    pub fn clear() {
        LocalStorage::delete(TOKEN_KEY);
        LocalStorage::delete(USER_KEY);
    }
}
