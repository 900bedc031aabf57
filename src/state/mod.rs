use crate::api::activity::ActivityClient;
use crate::api::{ApiError, SupabaseClient};
use crate::config::AppConfig;
use crate::models::AuthUser;
use crate::router::{NavHighlight, RouterEvent, ViewName};
use crate::storage::load_cached_user;
use leptos::logging::warn;
use leptos::prelude::*;

/// The signed-in session: API client plus the user it belongs to.
#[derive(Clone, Copy)]
pub(crate) struct Session {
    pub api: RwSignal<SupabaseClient>,
    pub user: RwSignal<Option<AuthUser>>,
}

impl Session {
    pub fn client(&self) -> SupabaseClient {
        self.api.get_untracked()
    }

    /// Drops the token and cached user. `RootAuthed` falls back to the login page.
    pub fn end(&self) {
        let mut api = self.api.get_untracked();
        api.logout();
        self.api.set(api);
        self.user.set(None);
    }

    /// Ends the session and sends the user to log in again when the backend
    /// rejected the token. Returns whether it did.
    pub fn handle_error(&self, e: &ApiError) -> bool {
        if !e.is_unauthorized() {
            return false;
        }
        warn!("Session expired, signing out");
        self.end();
        let _ = window().location().set_href("/login");
        true
    }
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub config: StoredValue<AppConfig>,
    pub api_client: RwSignal<SupabaseClient>,
    pub activity_client: StoredValue<ActivityClient>,
    pub current_user: RwSignal<Option<AuthUser>>,

    /// Sidebar item to highlight; follows router events.
    pub active_view: RwSignal<Option<ViewName>>,

    /// View the router is loading or showing (drives the toolbar).
    pub current_view: RwSignal<Option<ViewName>>,

    pub activity_open: RwSignal<bool>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let api = SupabaseClient::load_from_storage(&config);
        let activity = ActivityClient::new(config.activity_api_url.clone());
        let stored_user = if api.is_authenticated() {
            load_cached_user()
        } else {
            None
        };

        Self {
            config: StoredValue::new(config),
            api_client: RwSignal::new(api),
            activity_client: StoredValue::new(activity),
            current_user: RwSignal::new(stored_user),
            active_view: RwSignal::new(None),
            current_view: RwSignal::new(None),
            activity_open: RwSignal::new(false),
        }
    }

    pub fn session(&self) -> Session {
        Session {
            api: self.api_client,
            user: self.current_user,
        }
    }

    /// Mirrors a router event into the shell's signals.
    pub fn apply_router_event(&self, event: &RouterEvent) {
        self.current_view.set(Some(event.route().view.clone()));
        match event.highlight() {
            NavHighlight::Keep => {}
            NavHighlight::Set(view) => self.active_view.set(Some(view)),
            NavHighlight::Clear => self.active_view.set(None),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
