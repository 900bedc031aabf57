use crate::models::AuthUser;
use crate::router::SessionStore;
use serde::{Deserialize, Serialize};

/// Access token of the signed-in Supabase session (localStorage).
pub(crate) const SESSION_TOKEN_KEY: &str = "plant_hub_session_token";

/// Cached auth user for this tab (sessionStorage).
pub(crate) const CURRENT_USER_KEY: &str = "current_user";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.session_storage().ok().flatten())
}

/// `sessionStorage`, scoped to the tab and cleared when it closes.
#[derive(Clone, Default)]
pub(crate) struct WebSessionStore;

impl SessionStore for WebSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        session_storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = session_storage() {
            let _ = storage.set_item(key, value);
        }
    }
}

pub(crate) fn load_session_token() -> Option<String> {
    local_storage()?
        .get_item(SESSION_TOKEN_KEY)
        .ok()
        .flatten()
        .filter(|t| !t.trim().is_empty())
}

pub(crate) fn save_session_token(token: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(SESSION_TOKEN_KEY, token);
    }
}

pub(crate) fn clear_session_token() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(SESSION_TOKEN_KEY);
    }
}

fn load_json_from_session<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let json = session_storage()?.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

fn save_json_to_session<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = session_storage() {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn load_cached_user() -> Option<AuthUser> {
    load_json_from_session(CURRENT_USER_KEY)
}

pub(crate) fn save_cached_user(user: &AuthUser) {
    save_json_to_session(CURRENT_USER_KEY, user);
}

pub(crate) fn clear_cached_user() {
    if let Some(storage) = session_storage() {
        let _ = storage.remove_item(CURRENT_USER_KEY);
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::router::{NavigationState, Route, CURRENT_VIEW_KEY};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_current_view_survives_in_session_storage() {
        let store = WebSessionStore;
        store.set(CURRENT_VIEW_KEY, "reports");
        assert_eq!(NavigationState::restore(&store), Route::view("reports"));
    }

    #[wasm_bindgen_test]
    fn test_session_token_roundtrip() {
        clear_session_token();
        assert!(load_session_token().is_none());

        save_session_token("t1");
        assert_eq!(load_session_token().as_deref(), Some("t1"));

        clear_session_token();
        assert!(load_session_token().is_none());
    }

    #[wasm_bindgen_test]
    fn test_cached_user_roundtrip() {
        let user = AuthUser {
            id: "u-1".to_string(),
            email: Some("u@example.com".to_string()),
            user_metadata: serde_json::json!({}),
        };
        save_cached_user(&user);
        assert_eq!(load_cached_user(), Some(user));

        clear_cached_user();
        assert!(load_cached_user().is_none());
    }
}
